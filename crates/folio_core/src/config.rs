//! Runtime configuration loaded from TOML.
//!
//! # Responsibility
//! - Provide storage, logging, autosave and site settings with defaults.
//! - Reject configurations the dashboard cannot run with.
//!
//! # Invariants
//! - A missing config file yields `FolioConfig::default()`.
//! - Autosave durations are strictly positive.

use crate::dashboard::autosave::AutosaveTiming;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DB_FILE_NAME: &str = "folio.sqlite3";
const DEFAULT_DEBOUNCE_MS: u64 = 2000;
const DEFAULT_SAVED_DISPLAY_MS: u64 = 2000;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub autosave: AutosaveConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
    pub saved_display_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            saved_display_ms: DEFAULT_SAVED_DISPLAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public base URL used for portfolio share links.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FolioConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave.debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "autosave.debounce_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.autosave.saved_display_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "autosave.saved_display_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.site.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "site.base_url",
                reason: "cannot be empty".to_string(),
            });
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    key: "logging.dir",
                    reason: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }
        Ok(())
    }

    pub fn autosave_timing(&self) -> AutosaveTiming {
        AutosaveTiming {
            debounce: Duration::from_millis(self.autosave.debounce_ms),
            saved_display: Duration::from_millis(self.autosave.saved_display_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FolioConfig};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn empty_document_uses_defaults() {
        let config = FolioConfig::from_toml_str("", Path::new("folio.toml")).unwrap();
        assert_eq!(config, FolioConfig::default());
        assert_eq!(config.autosave_timing().debounce, Duration::from_millis(2000));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = FolioConfig::from_toml_str(
            "[autosave]\ndebounce_ms = 500\n[site]\nbase_url = \"https://example.com\"\n",
            Path::new("folio.toml"),
        )
        .unwrap();
        assert_eq!(config.autosave.debounce_ms, 500);
        assert_eq!(config.autosave.saved_display_ms, 2000);
        assert_eq!(config.site.base_url, "https://example.com");
    }

    #[test]
    fn zero_debounce_is_rejected() {
        let err = FolioConfig::from_toml_str("[autosave]\ndebounce_ms = 0\n", Path::new("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "autosave.debounce_ms",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = FolioConfig::from_toml_str("[storage]\npath = \"x\"\n", Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FolioConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, FolioConfig::default());
    }
}
