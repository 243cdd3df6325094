//! Add/edit/delete form controllers for showcase entities and the profile.
//!
//! # Responsibility
//! - Track which form is open and what the last loaded list looks like.
//! - Validate required fields before contacting the store.
//! - Report every outcome through the injected `Notifier` exactly once.
//!
//! # Invariants
//! - A validation failure never reaches the store.
//! - After a successful write the list is reloaded from the store.
//! - A failed load keeps the previous list.

use crate::error::{ServiceError, ServiceResult};
use crate::model::profile::Profile;
use crate::model::showcase::Skill;
use crate::model::EntityId;
use crate::notify::Notifier;
use crate::repo::EntityRepository;
use crate::service::{CatalogEntity, CatalogService};
use crate::upload::{upload_checked, ObjectStore, Upload, UploadError, UploadPolicy};
use log::{info, warn};

/// Which form is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Viewing,
    Adding,
    Editing(EntityId),
}

pub struct EntityEditor<'s, 'c, E, R, N>
where
    E: CatalogEntity,
    R: EntityRepository<E>,
    N: Notifier,
{
    service: &'s CatalogService<'c, E, R>,
    notifier: N,
    items: Vec<E>,
    mode: EditorMode,
}

impl<'s, 'c, E, R, N> EntityEditor<'s, 'c, E, R, N>
where
    E: CatalogEntity,
    R: EntityRepository<E>,
    N: Notifier,
{
    pub fn new(service: &'s CatalogService<'c, E, R>, notifier: N) -> Self {
        Self {
            service,
            notifier,
            items: Vec::new(),
            mode: EditorMode::Viewing,
        }
    }

    pub fn refresh(&mut self) -> ServiceResult<()> {
        match self.service.list() {
            Ok(items) => {
                self.items = items;
                if let EditorMode::Editing(id) = self.mode {
                    if self.find(id).is_none() {
                        self.mode = EditorMode::Viewing;
                    }
                }
                Ok(())
            }
            Err(err) => {
                let title = format!("Error loading {}s", E::LABEL.to_lowercase());
                self.notifier.error(&title, &err.to_string());
                Err(err)
            }
        }
    }

    pub fn begin_add(&mut self) {
        self.mode = EditorMode::Adding;
    }

    /// Opens the edit form for `id`. Returns the record being edited.
    pub fn begin_edit(&mut self, id: EntityId) -> Option<&E> {
        let idx = self.items.iter().position(|item| item.id() == id)?;
        self.mode = EditorMode::Editing(id);
        self.items.get(idx)
    }

    pub fn cancel(&mut self) {
        self.mode = EditorMode::Viewing;
    }

    pub fn add(&mut self, record: &E) -> ServiceResult<E> {
        self.check_required(record)?;
        let result = self.service.create(record);
        self.finish_write(result, "added", "adding")
    }

    pub fn update(&mut self, record: &E) -> ServiceResult<E> {
        self.check_required(record)?;
        let result = self.service.update(record);
        self.finish_write(result, "updated", "updating")
    }

    pub fn delete(&mut self, id: EntityId) -> ServiceResult<()> {
        let result = self.service.delete(id);
        self.finish_write(result, "deleted", "deleting")
    }

    /// Applies `policy` and stores an attachment for the open form.
    pub fn attach<S: ObjectStore + ?Sized>(
        &self,
        store: &S,
        policy: UploadPolicy,
        upload: &Upload,
    ) -> ServiceResult<String> {
        upload_attachment(store, policy, upload, &self.notifier)
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn editing(&self) -> Option<&E> {
        match self.mode {
            EditorMode::Editing(id) => self.find(id),
            _ => None,
        }
    }

    fn find(&self, id: EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn check_required(&self, record: &E) -> ServiceResult<()> {
        record.validate().map_err(|err| {
            self.notifier.error("Missing Fields", &err.to_string());
            ServiceError::from(err)
        })
    }

    fn finish_write<T>(
        &mut self,
        result: ServiceResult<T>,
        done: &str,
        doing: &str,
    ) -> ServiceResult<T> {
        match result {
            Ok(value) => {
                self.notifier
                    .success(&format!("{} {done} successfully", E::LABEL));
                info!(
                    "event=editor_write module=editor status=ok entity={} action={done}",
                    E::TABLE
                );
                self.mode = EditorMode::Viewing;
                // A failed reload is already reported and keeps the old list.
                let _ = self.refresh();
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event=editor_write module=editor status=error entity={} action={done} error={err}",
                    E::TABLE
                );
                let title = format!("Error {doing} {}", E::LABEL.to_lowercase());
                self.notifier.error(&title, &err.to_string());
                Err(err)
            }
        }
    }
}

impl<R, N> EntityEditor<'_, '_, Skill, R, N>
where
    R: EntityRepository<Skill>,
    N: Notifier,
{
    /// Position a newly added skill takes: the end of the list.
    pub fn next_display_order(&self) -> i64 {
        self.items.len() as i64
    }

    pub fn add_skill(
        &mut self,
        name: &str,
        description: &str,
        category: &str,
    ) -> ServiceResult<Skill> {
        let skill = Skill::new(
            name.trim(),
            description.trim(),
            category.trim(),
            self.next_display_order(),
        );
        self.add(&skill)
    }
}

/// Singleton profile form: load, upsert and portrait upload.
pub struct ProfileEditor<'s, 'c, R, N>
where
    R: EntityRepository<Profile>,
    N: Notifier,
{
    service: &'s CatalogService<'c, Profile, R>,
    notifier: N,
    current: Option<Profile>,
}

impl<'s, 'c, R, N> ProfileEditor<'s, 'c, R, N>
where
    R: EntityRepository<Profile>,
    N: Notifier,
{
    pub fn new(service: &'s CatalogService<'c, Profile, R>, notifier: N) -> Self {
        Self {
            service,
            notifier,
            current: None,
        }
    }

    pub fn load(&mut self) -> ServiceResult<Option<&Profile>> {
        match self.service.fetch_one() {
            Ok(profile) => {
                self.current = profile;
                Ok(self.current.as_ref())
            }
            Err(err) => {
                self.notifier.error("Error loading profile", &err.to_string());
                Err(err)
            }
        }
    }

    /// Creates the profile on first save and updates it afterwards.
    ///
    /// The stored id wins over the id carried by `draft`, so at most one
    /// profile row exists.
    pub fn save(&mut self, draft: &Profile) -> ServiceResult<Profile> {
        if let Err(err) = draft.validate() {
            self.notifier.error("Missing Fields", &err.to_string());
            return Err(err.into());
        }

        let result = match &self.current {
            Some(existing) => {
                let mut record = draft.clone();
                record.id = existing.id;
                self.service.update(&record)
            }
            None => self.service.create(draft),
        };

        match result {
            Ok(saved) => {
                self.notifier.success("Profile updated successfully");
                self.current = Some(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                self.notifier.error("Error updating profile", &err.to_string());
                Err(err)
            }
        }
    }

    /// Uploads a portrait and stores its URL on the loaded profile.
    pub fn attach_photo<S: ObjectStore + ?Sized>(
        &mut self,
        store: &S,
        upload: &Upload,
    ) -> ServiceResult<Profile> {
        let mut draft = match &self.current {
            Some(profile) => profile.clone(),
            None => {
                let err = ServiceError::from(crate::model::ValidationError::new(
                    "profile",
                    "save the profile before uploading a photo",
                ));
                self.notifier.error("Missing Fields", &err.to_string());
                return Err(err);
            }
        };
        let url = upload_attachment(store, UploadPolicy::ProfileImage, upload, &self.notifier)?;
        draft.image_url = Some(url);
        self.save(&draft)
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.as_ref()
    }
}

/// Uploads one attachment and reports policy or store failures.
pub fn upload_attachment<S, N>(
    store: &S,
    policy: UploadPolicy,
    upload: &Upload,
    notifier: &N,
) -> ServiceResult<String>
where
    S: ObjectStore + ?Sized,
    N: Notifier + ?Sized,
{
    match upload_checked(store, policy, upload) {
        Ok(url) => {
            info!(
                "event=upload module=editor status=ok name={:?} bytes={}",
                upload.name,
                upload.size()
            );
            Ok(url)
        }
        Err(err) => {
            let title = match &err {
                UploadError::TooLarge { .. } => "File Too Large",
                UploadError::UnsupportedType { .. } => "Invalid File Type",
                UploadError::EmptyName => "Missing Fields",
                UploadError::Store { .. } => "Error uploading file",
            };
            notifier.error(title, &err.to_string());
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorMode, EntityEditor, ProfileEditor};
    use crate::cache::QueryCache;
    use crate::db::open_db_in_memory;
    use crate::model::profile::Profile;
    use crate::model::showcase::{Project, Skill};
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::repo::{count_rows, SqliteEntityRepository};
    use crate::service::CatalogService;
    use crate::upload::{ObjectStore, Upload, UploadError};

    struct MemoryStore;

    impl ObjectStore for MemoryStore {
        fn put(&self, upload: &Upload) -> Result<String, UploadError> {
            Ok(format!("mem://{}", upload.name))
        }

        fn remove(&self, _url: &str) -> Result<(), UploadError> {
            Ok(())
        }
    }

    #[test]
    fn missing_fields_never_reach_the_store() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Project>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = EntityEditor::new(&service, &notifier);

        let project = Project::new("Folio", "", "Portfolio site");
        assert!(editor.add(&project).is_err());

        assert_eq!(count_rows::<Project>(&conn).unwrap(), 0);
        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Missing Fields");
    }

    #[test]
    fn add_skill_appends_and_reloads() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Skill>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = EntityEditor::new(&service, &notifier);
        editor.refresh().unwrap();

        editor.begin_add();
        editor.add_skill("Rust", "Systems work", "Languages").unwrap();
        editor.add_skill("SQL", "", "Data").unwrap();

        assert_eq!(editor.mode(), EditorMode::Viewing);
        let orders: Vec<i64> = editor.items().iter().map(|s| s.display_order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(notifier.drain()[0].title, "Skill added successfully");
    }

    #[test]
    fn edit_then_delete_updates_list() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Skill>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = EntityEditor::new(&service, &notifier);
        let skill = editor.add_skill("Rust", "", "Languages").unwrap();

        let mut draft = editor.begin_edit(skill.id).unwrap().clone();
        assert_eq!(editor.mode(), EditorMode::Editing(skill.id));
        draft.description = "Async services".to_string();
        editor.update(&draft).unwrap();
        assert_eq!(editor.items()[0].description, "Async services");

        editor.delete(skill.id).unwrap();
        assert!(editor.items().is_empty());
        assert_eq!(notifier.count(NotificationKind::Error), 0);
    }

    #[test]
    fn deleting_missing_record_reports_error() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Skill>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = EntityEditor::new(&service, &notifier);

        assert!(editor.delete(uuid::Uuid::new_v4()).is_err());
        assert_eq!(notifier.drain()[0].title, "Error deleting skill");
    }

    #[test]
    fn profile_save_upserts_single_row() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Profile>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = ProfileEditor::new(&service, &notifier);
        assert!(editor.load().unwrap().is_none());

        editor
            .save(&Profile::new("Ada Lovelace", "ada@example.com"))
            .unwrap();
        let mut second = Profile::new("Ada King", "ada@example.com");
        second.tagline = "Analyst".to_string();
        let saved = editor.save(&second).unwrap();

        assert_eq!(count_rows::<Profile>(&conn).unwrap(), 1);
        assert_eq!(saved.full_name, "Ada King");
    }

    #[test]
    fn oversized_photo_is_rejected_before_upload() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service = CatalogService::new(SqliteEntityRepository::<Profile>::new(&conn), &cache);
        let notifier = RecordingNotifier::new();
        let mut editor = ProfileEditor::new(&service, &notifier);
        editor
            .save(&Profile::new("Ada Lovelace", "ada@example.com"))
            .unwrap();
        notifier.drain();

        let huge = Upload::new("me.png", "image/png", vec![0; 5 * 1024 * 1024 + 1]);
        assert!(editor.attach_photo(&MemoryStore, &huge).is_err());
        assert_eq!(notifier.drain()[0].title, "File Too Large");

        let ok = Upload::new("me.png", "image/png", vec![0; 16]);
        let saved = editor.attach_photo(&MemoryStore, &ok).unwrap();
        assert_eq!(saved.image_url.as_deref(), Some("mem://me.png"));
    }
}
