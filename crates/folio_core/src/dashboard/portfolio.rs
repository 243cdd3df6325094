//! Portfolio document uploads, listing, share links and deletion.
//!
//! # Invariants
//! - A file record exists only for objects the store accepted.
//! - An object whose record could not be created is removed again.

use super::editor::upload_attachment;
use crate::error::ServiceResult;
use crate::model::portfolio::PortfolioFile;
use crate::model::EntityId;
use crate::notify::{NotificationKind, Notifier};
use crate::repo::EntityRepository;
use crate::service::CatalogService;
use crate::upload::{ObjectStore, Upload, UploadPolicy};
use log::{info, warn};

pub struct PortfolioManager<'s, 'c, R, S, N>
where
    R: EntityRepository<PortfolioFile>,
    S: ObjectStore,
    N: Notifier,
{
    service: &'s CatalogService<'c, PortfolioFile, R>,
    store: S,
    notifier: N,
    base_url: String,
    files: Vec<PortfolioFile>,
}

impl<'s, 'c, R, S, N> PortfolioManager<'s, 'c, R, S, N>
where
    R: EntityRepository<PortfolioFile>,
    S: ObjectStore,
    N: Notifier,
{
    pub fn new(
        service: &'s CatalogService<'c, PortfolioFile, R>,
        store: S,
        notifier: N,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            service,
            store,
            notifier,
            base_url: base_url.into(),
            files: Vec::new(),
        }
    }

    pub fn refresh(&mut self) -> ServiceResult<()> {
        match self.service.list() {
            Ok(files) => {
                self.files = files;
                Ok(())
            }
            Err(err) => {
                self.notifier.error("Error loading files", &err.to_string());
                Err(err)
            }
        }
    }

    pub fn upload(&mut self, upload: &Upload) -> ServiceResult<PortfolioFile> {
        let url = upload_attachment(
            &self.store,
            UploadPolicy::PortfolioFile,
            upload,
            &self.notifier,
        )?;
        let record = PortfolioFile::new(upload.name.clone(), upload.size() as i64, url.clone());

        let created = match self.service.create(&record) {
            Ok(created) => created,
            Err(err) => {
                if let Err(remove_err) = self.store.remove(&url) {
                    warn!(
                        "event=portfolio_upload module=portfolio status=orphaned url={url:?} error={remove_err}"
                    );
                }
                self.notifier.error("Upload failed", &err.to_string());
                return Err(err);
            }
        };

        self.notifier.notify(
            NotificationKind::Success,
            "File Uploaded",
            Some(&format!("{} has been uploaded successfully.", created.name)),
        );
        info!(
            "event=portfolio_upload module=portfolio status=ok id={} bytes={}",
            created.id, created.size_bytes
        );
        let _ = self.refresh();
        Ok(created)
    }

    /// Deletes the record, then the stored object.
    pub fn delete(&mut self, id: EntityId) -> ServiceResult<()> {
        let url = self
            .files
            .iter()
            .find(|file| file.id == id)
            .map(|file| file.download_url.clone());

        if let Err(err) = self.service.delete(id) {
            self.notifier.error("Delete failed", &err.to_string());
            return Err(err);
        }
        if let Some(url) = url {
            if let Err(err) = self.store.remove(&url) {
                warn!(
                    "event=portfolio_delete module=portfolio status=orphaned url={url:?} error={err}"
                );
            }
        }
        self.notifier.notify(
            NotificationKind::Success,
            "File Deleted",
            Some("File has been deleted successfully."),
        );
        let _ = self.refresh();
        Ok(())
    }

    /// Public download link for `id`, if it is listed.
    pub fn share_link(&self, id: EntityId) -> Option<String> {
        self.files
            .iter()
            .find(|file| file.id == id)
            .map(|file| file.share_link(&self.base_url))
    }

    pub fn files(&self) -> &[PortfolioFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::PortfolioManager;
    use crate::cache::QueryCache;
    use crate::db::open_db_in_memory;
    use crate::model::portfolio::PortfolioFile;
    use crate::notify::RecordingNotifier;
    use crate::repo::SqliteEntityRepository;
    use crate::service::CatalogService;
    use crate::upload::{ObjectStore, Upload, UploadError};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStore {
        objects: RefCell<Vec<String>>,
    }

    impl ObjectStore for MemoryStore {
        fn put(&self, upload: &Upload) -> Result<String, UploadError> {
            let url = format!("mem://portfolio/{}", upload.name);
            self.objects.borrow_mut().push(url.clone());
            Ok(url)
        }

        fn remove(&self, url: &str) -> Result<(), UploadError> {
            self.objects.borrow_mut().retain(|object| object != url);
            Ok(())
        }
    }

    #[test]
    fn upload_share_and_delete() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service =
            CatalogService::new(SqliteEntityRepository::<PortfolioFile>::new(&conn), &cache);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::new();
        let mut manager =
            PortfolioManager::new(&service, &store, &notifier, "https://folio.example");

        let file = manager
            .upload(&Upload::new("deck.pdf", "application/pdf", vec![0; 2048]))
            .unwrap();
        assert_eq!(manager.files().len(), 1);
        assert_eq!(
            manager.share_link(file.id).unwrap(),
            format!("https://folio.example/download/{}", file.id)
        );
        let toast = notifier.drain().remove(0);
        assert_eq!(toast.title, "File Uploaded");
        assert_eq!(
            toast.description.as_deref(),
            Some("deck.pdf has been uploaded successfully.")
        );

        manager.delete(file.id).unwrap();
        assert!(manager.files().is_empty());
        assert!(store.objects.borrow().is_empty());
        assert_eq!(notifier.drain()[0].title, "File Deleted");
    }

    #[test]
    fn oversized_file_is_not_stored() {
        let conn = open_db_in_memory().unwrap();
        let cache = QueryCache::new();
        let service =
            CatalogService::new(SqliteEntityRepository::<PortfolioFile>::new(&conn), &cache);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::new();
        let mut manager = PortfolioManager::new(&service, &store, &notifier, "http://localhost");

        let huge = Upload::new("video.mp4", "video/mp4", vec![0; 50 * 1024 * 1024 + 1]);
        assert!(manager.upload(&huge).is_err());
        assert!(store.objects.borrow().is_empty());
        assert_eq!(notifier.drain()[0].title, "File Too Large");
    }
}
