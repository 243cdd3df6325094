//! Upload policy and the delegated object-store seam.
//!
//! # Responsibility
//! - Reject oversized or disallowed files before any bytes leave the process.
//! - Hand accepted files to an external `ObjectStore`.
//!
//! # Invariants
//! - Policy checks never contact the object store.
//! - Stored objects are addressed only by the URL the store returns.

const MB: u64 = 1024 * 1024;

const CERTIFICATE_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/zip",
];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file `{name}` is {size} bytes; the limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("file `{name}` has unsupported type `{content_type}`")]
    UnsupportedType { name: String, content_type: String },
    #[error("file name cannot be empty")]
    EmptyName,
    #[error("object store rejected `{name}`: {message}")]
    Store { name: String, message: String },
}

impl UploadError {
    /// True for failures raised before contacting the store.
    pub fn is_policy_violation(&self) -> bool {
        !matches!(self, Self::Store { .. })
    }
}

/// Which accept rules apply to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    ProfileImage,
    ProjectImage,
    Certificate,
    PortfolioFile,
}

impl UploadPolicy {
    pub fn max_bytes(self) -> u64 {
        match self {
            Self::ProfileImage | Self::ProjectImage => 5 * MB,
            Self::Certificate => 10 * MB,
            Self::PortfolioFile => 50 * MB,
        }
    }

    fn accepts_type(self, content_type: &str) -> bool {
        match self {
            Self::ProfileImage | Self::ProjectImage => content_type.starts_with("image/"),
            Self::Certificate => CERTIFICATE_TYPES.contains(&content_type),
            Self::PortfolioFile => true,
        }
    }

    /// Checks type and size for one file.
    pub fn check(self, upload: &Upload) -> Result<(), UploadError> {
        if upload.name.trim().is_empty() {
            return Err(UploadError::EmptyName);
        }
        if !self.accepts_type(&upload.content_type) {
            return Err(UploadError::UnsupportedType {
                name: upload.name.clone(),
                content_type: upload.content_type.clone(),
            });
        }
        let size = upload.size();
        if size > self.max_bytes() {
            return Err(UploadError::TooLarge {
                name: upload.name.clone(),
                size,
                limit: self.max_bytes(),
            });
        }
        Ok(())
    }
}

/// One file picked by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// External object storage.
pub trait ObjectStore {
    /// Stores the upload and returns its public URL.
    fn put(&self, upload: &Upload) -> Result<String, UploadError>;
    fn remove(&self, url: &str) -> Result<(), UploadError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn put(&self, upload: &Upload) -> Result<String, UploadError> {
        (**self).put(upload)
    }

    fn remove(&self, url: &str) -> Result<(), UploadError> {
        (**self).remove(url)
    }
}

/// Applies `policy` and then stores the file.
pub fn upload_checked<S: ObjectStore + ?Sized>(
    store: &S,
    policy: UploadPolicy,
    upload: &Upload,
) -> Result<String, UploadError> {
    policy.check(upload)?;
    store.put(upload)
}
