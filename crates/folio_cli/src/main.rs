//! Operator command line for the Folio content store.
//!
//! # Responsibility
//! - Map subcommands onto `folio_core` services and dashboard controllers.
//! - Print queued notifications after each command.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_core::dashboard::InboxBackend;
use folio_core::db::open_db;
use folio_core::model::bio::Bio;
use folio_core::model::contact::{ContactMessage, ContactSubmission};
use folio_core::model::showcase::Skill;
use folio_core::{
    init_logging, AnalyticsService, AutoSaveSynchronizer, BioService, CatalogService,
    EntityEditor, FolioConfig, InboxManager, InboxService, NotificationKind, QueryCache,
    RecordingNotifier, SaveNow, SiteRenderer, SqliteAnalyticsRepository, SqliteEntityRepository,
};
use log::{error, info};
use rusqlite::Connection;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Manage portfolio site content")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, default_value = "folio.toml")]
    config: PathBuf,
    /// Database path, overriding `[storage] db_path`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log level, overriding `[logging] level`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// User id recorded as `updated_by` on biography writes.
    #[arg(long, global = true)]
    operator: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show or edit the biography.
    #[command(subcommand)]
    Bio(BioCommand),
    /// Read and manage contact messages.
    #[command(subcommand)]
    Inbox(InboxCommand),
    /// Manage the skills list.
    #[command(subcommand)]
    Skills(SkillsCommand),
    /// Record one page visit for today.
    Visit { path: String },
    /// Print the visit summary.
    Analytics,
    /// Print the public page as JSON.
    Site,
}

#[derive(Debug, Subcommand)]
enum BioCommand {
    Show,
    /// Replace the biography in one write.
    Set { content: String },
    /// Append stdin lines to the biography with autosave.
    ///
    /// A line consisting of `:save` saves immediately.
    Edit,
}

#[derive(Debug, Subcommand)]
enum InboxCommand {
    List,
    /// Open a message, marking it read.
    Show { id: Uuid },
    Delete {
        id: Uuid,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Submit a message as a site visitor would.
    Submit(SubmitArgs),
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
}

#[derive(Debug, Subcommand)]
enum SkillsCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Remove { id: Uuid },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FolioConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(dir) = &config.logging.dir {
        let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
        init_logging(level, dir).context("starting logging")?;
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.storage.db_path.clone());
    let conn = open_db(&db_path).with_context(|| format!("opening {}", db_path.display()))?;
    let cache = QueryCache::new();
    let notifier = RecordingNotifier::new();

    let outcome = run(
        cli.command,
        &config,
        cli.operator.as_deref(),
        &conn,
        &cache,
        &notifier,
    );
    match &outcome {
        Ok(()) => info!("event=cli_exit module=cli status=ok"),
        Err(err) => error!("event=cli_exit module=cli status=error error={err:#}"),
    }
    print_notifications(&notifier);
    outcome
}

fn run(
    command: Command,
    config: &FolioConfig,
    operator: Option<&str>,
    conn: &Connection,
    cache: &QueryCache,
    notifier: &RecordingNotifier,
) -> Result<()> {
    match command {
        Command::Bio(command) => run_bio(command, config, operator, conn, cache, notifier),
        Command::Inbox(command) => run_inbox(command, conn, cache, notifier),
        Command::Skills(command) => run_skills(command, conn, cache, notifier),
        Command::Visit { path } => {
            let service = AnalyticsService::new(SqliteAnalyticsRepository::new(conn), cache);
            let count = service.log_visit_today(&path)?;
            println!("{path}: {count} visit(s) today");
            Ok(())
        }
        Command::Analytics => {
            let service = AnalyticsService::new(SqliteAnalyticsRepository::new(conn), cache);
            println!("{}", serde_json::to_string_pretty(&service.summary()?)?);
            Ok(())
        }
        Command::Site => {
            let page = SiteRenderer::new(conn, cache).render();
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(())
        }
    }
}

fn run_bio(
    command: BioCommand,
    config: &FolioConfig,
    operator: Option<&str>,
    conn: &Connection,
    cache: &QueryCache,
    notifier: &RecordingNotifier,
) -> Result<()> {
    let mut service = BioService::new(SqliteEntityRepository::<Bio>::new(conn), cache);
    if let Some(operator) = operator {
        service = service.with_operator(operator);
    }
    match command {
        BioCommand::Show => {
            match service.fetch()? {
                Some(bio) => println!("{}", bio.content),
                None => println!("(no biography yet)"),
            }
            Ok(())
        }
        BioCommand::Set { content } => {
            match service.fetch()? {
                Some(bio) => service.update_content(bio.id, &content)?,
                None => service.create(content)?,
            };
            println!("biography saved");
            Ok(())
        }
        BioCommand::Edit => {
            if service.fetch()?.is_none() {
                service.create("")?;
            }
            let mut sync = AutoSaveSynchronizer::new(&service, notifier, config.autosave_timing());
            sync.load()?;

            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading stdin")?;
                if line.trim() == ":save" {
                    if sync.save_now(Instant::now()) == SaveNow::Busy {
                        eprintln!("a save is already running");
                    }
                } else {
                    let buffer = sync.session().buffer();
                    let text = if buffer.is_empty() {
                        line
                    } else {
                        format!("{buffer}\n{line}")
                    };
                    sync.edit(text, Instant::now());
                }
                sync.tick(Instant::now());
                print_notifications(notifier);
            }

            while let Some(deadline) = sync.next_wakeup() {
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                sync.tick(Instant::now());
            }
            if sync.session().is_dirty() {
                bail!("biography has unsaved changes");
            }
            sync.close();
            Ok(())
        }
    }
}

fn run_inbox(
    command: InboxCommand,
    conn: &Connection,
    cache: &QueryCache,
    notifier: &RecordingNotifier,
) -> Result<()> {
    let service = InboxService::new(SqliteEntityRepository::<ContactMessage>::new(conn), cache);
    match command {
        InboxCommand::Submit(args) => {
            let submission = ContactSubmission {
                name: args.name,
                email: args.email,
                subject: args.subject,
                message: args.message,
            };
            let message = service.submit_and_notify(submission, notifier)?;
            println!("{}", message.id);
            Ok(())
        }
        InboxCommand::List => {
            let inbox = load_inbox(&service, notifier)?;
            println!("{} unread", inbox.unread_count());
            for message in inbox.messages() {
                let marker = if message.is_read { ' ' } else { '*' };
                println!(
                    "{marker} {} {:<24} {}",
                    message.id, message.name, message.subject
                );
            }
            Ok(())
        }
        InboxCommand::Show { id } => {
            let mut inbox = load_inbox(&service, notifier)?;
            let Some(message) = inbox.select_message(id) else {
                bail!("no message with id {id}");
            };
            println!("From: {} <{}>", message.name, message.email);
            println!("Subject: {}", message.subject);
            println!();
            println!("{}", message.message);
            Ok(())
        }
        InboxCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete without --yes");
            }
            let mut inbox = load_inbox(&service, notifier)?;
            if !inbox.delete_message(id) {
                bail!("message {id} was not deleted");
            }
            Ok(())
        }
    }
}

fn load_inbox<'n, B: InboxBackend>(
    backend: B,
    notifier: &'n RecordingNotifier,
) -> Result<InboxManager<B, &'n RecordingNotifier>> {
    let mut inbox = InboxManager::new(backend, notifier);
    inbox.refresh()?;
    Ok(inbox)
}

fn run_skills(
    command: SkillsCommand,
    conn: &Connection,
    cache: &QueryCache,
    notifier: &RecordingNotifier,
) -> Result<()> {
    let service = CatalogService::new(SqliteEntityRepository::<Skill>::new(conn), cache);
    let mut editor = EntityEditor::new(&service, notifier);
    editor.refresh()?;
    match command {
        SkillsCommand::List => {
            for skill in editor.items() {
                println!(
                    "{:>3} {} {:<20} {}",
                    skill.display_order, skill.id, skill.name, skill.category
                );
            }
        }
        SkillsCommand::Add {
            name,
            category,
            description,
        } => {
            let skill = editor.add_skill(&name, &description, &category)?;
            println!("{}", skill.id);
        }
        SkillsCommand::Remove { id } => editor.delete(id)?,
    }
    Ok(())
}

fn print_notifications(notifier: &RecordingNotifier) {
    for notification in notifier.drain() {
        let tag = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        match notification.description {
            Some(description) => eprintln!("[{tag}] {}: {description}", notification.title),
            None => eprintln!("[{tag}] {}", notification.title),
        }
    }
}
