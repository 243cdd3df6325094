//! Downloadable portfolio documents stored in the external object store.

use super::{now_epoch_ms, require_text, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioFile {
    pub id: EntityId,
    /// Original file name as uploaded.
    pub name: String,
    pub size_bytes: i64,
    /// Object-store URL the file was written to.
    pub download_url: String,
    pub uploaded_at: i64,
}

impl PortfolioFile {
    pub fn new(name: impl Into<String>, size_bytes: i64, download_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size_bytes,
            download_url: download_url.into(),
            uploaded_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("download_url", &self.download_url)?;
        if self.size_bytes < 0 {
            return Err(ValidationError::new("size_bytes", "must not be negative"));
        }
        Ok(())
    }

    /// Size rendered as megabytes with two decimals, e.g. `"1.50 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / BYTES_PER_MB)
    }

    /// Public share link under the configured site base URL.
    pub fn share_link(&self, base_url: &str) -> String {
        format!("{}/download/{}", base_url.trim_end_matches('/'), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::PortfolioFile;

    #[test]
    fn size_label_uses_two_decimal_megabytes() {
        let file = PortfolioFile::new("deck.pdf", 1_572_864, "mem://deck.pdf");
        assert_eq!(file.size_label(), "1.50 MB");
    }

    #[test]
    fn share_link_trims_trailing_slash() {
        let file = PortfolioFile::new("deck.pdf", 10, "mem://deck.pdf");
        let link = file.share_link("https://example.com/");
        assert_eq!(link, format!("https://example.com/download/{}", file.id));
    }
}
