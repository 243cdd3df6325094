use folio_core::cache::{QueryCache, QueryKey};
use folio_core::dashboard::{AutoSaveSynchronizer, AutosaveTiming, SaveNow, SaveStatus};
use folio_core::db::open_db_in_memory;
use folio_core::model::bio::Bio;
use folio_core::notify::{NotificationKind, RecordingNotifier};
use folio_core::repo::{EntityRepository, SqliteEntityRepository};
use folio_core::service::BioService;
use std::time::{Duration, Instant};

fn timing() -> AutosaveTiming {
    AutosaveTiming {
        debounce: Duration::from_millis(2000),
        saved_display: Duration::from_millis(2000),
    }
}

#[test]
fn debounced_edits_produce_one_commit_with_final_text() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    let bio = service.create("Hello").unwrap();

    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();
    assert_eq!(sync.session().buffer(), "Hello");

    let t0 = Instant::now();
    sync.edit("Hello w", t0);
    sync.edit("Hello wo", t0 + Duration::from_millis(500));
    sync.edit("Hello world", t0 + Duration::from_millis(1000));
    assert!(sync.tick(t0 + Duration::from_millis(2500)).is_none());

    assert!(sync.tick(t0 + Duration::from_millis(3000)).is_some());
    assert_eq!(sync.session().status(), SaveStatus::Saved);
    assert!(!sync.session().is_dirty());

    let stored = service.fetch().unwrap().unwrap();
    assert_eq!(stored.id, bio.id);
    assert_eq!(stored.content, "Hello world");
    assert_eq!(notifier.count(NotificationKind::Success), 1);

    sync.tick(t0 + Duration::from_millis(5000));
    assert_eq!(sync.session().status(), SaveStatus::Idle);
}

#[test]
fn manual_save_with_clean_buffer_does_not_write() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    service.create("Unchanged").unwrap();

    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();

    assert_eq!(sync.save_now(Instant::now()), SaveNow::Unchanged);
    assert!(notifier.snapshot().is_empty());
}

#[test]
fn manual_save_cancels_pending_debounce() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    service.create("Draft").unwrap();

    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();

    let t0 = Instant::now();
    sync.edit("Draft, revised", t0);
    assert_eq!(sync.save_now(t0 + Duration::from_millis(100)), SaveNow::Committed);
    assert!(sync.tick(t0 + Duration::from_millis(2100)).is_none());
    assert_eq!(notifier.count(NotificationKind::Success), 1);
    assert_eq!(service.fetch().unwrap().unwrap().content, "Draft, revised");
}

#[test]
fn repeated_commits_of_same_content_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    let bio = service.create("Start").unwrap();

    let first = service.update_content(bio.id, "Same text").unwrap();
    let second = service.update_content(bio.id, "Same text").unwrap();
    assert_eq!(first.content, second.content);
    assert!(first.updated_at >= bio.updated_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(service.fetch().unwrap().unwrap().content, "Same text");
}

#[test]
fn commit_invalidates_cached_bio() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    let bio = service.create("Cached").unwrap();

    service.fetch().unwrap();
    assert!(cache.contains(QueryKey::Bio));
    service.update_content(bio.id, "Fresh").unwrap();
    assert!(!cache.contains(QueryKey::Bio));
    assert_eq!(service.fetch().unwrap().unwrap().content, "Fresh");
}

#[test]
fn session_without_stored_bio_never_commits() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);

    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();

    let t0 = Instant::now();
    sync.edit("Orphan text", t0);
    assert!(sync.tick(t0 + Duration::from_millis(2000)).is_none());
    assert_eq!(sync.save_now(t0 + Duration::from_millis(2000)), SaveNow::NoTarget);
    assert!(service.fetch().unwrap().is_none());
}

#[test]
fn refresh_after_commit_keeps_the_same_bio_row() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let repo = SqliteEntityRepository::<Bio>::new(&conn);
    let mut older = Bio::new("first row");
    older.updated_at = 1;
    let mut newer = Bio::new("second row");
    newer.updated_at = 2;
    repo.create_one(&older).unwrap();
    repo.create_one(&newer).unwrap();

    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache);
    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();
    let loaded_id = sync.session().bio_id().unwrap();

    let t0 = Instant::now();
    sync.edit("my edit", t0);
    assert!(sync.tick(t0 + Duration::from_millis(2000)).is_some());
    sync.load().unwrap();

    assert_eq!(sync.session().bio_id(), Some(loaded_id));
    assert_eq!(sync.session().buffer(), "my edit");
    let stored = service.fetch().unwrap().unwrap();
    assert_eq!(stored.id, loaded_id);
    assert_eq!(stored.content, "my edit");
}

#[test]
fn commits_are_stamped_with_the_operator() {
    let conn = open_db_in_memory().unwrap();
    let cache = QueryCache::new();
    let service = BioService::new(SqliteEntityRepository::<Bio>::new(&conn), &cache)
        .with_operator("owner@example.com");
    let created = service.create("Hello").unwrap();
    assert_eq!(created.updated_by.as_deref(), Some("owner@example.com"));

    let notifier = RecordingNotifier::new();
    let mut sync = AutoSaveSynchronizer::new(&service, &notifier, timing());
    sync.load().unwrap();
    let t0 = Instant::now();
    sync.edit("Hello again", t0);
    assert_eq!(sync.save_now(t0), SaveNow::Committed);

    let stored = service.fetch().unwrap().unwrap();
    assert_eq!(stored.content, "Hello again");
    assert_eq!(stored.updated_by.as_deref(), Some("owner@example.com"));
}
