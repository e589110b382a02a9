//! File store error types.

use gymhub_domain::error::GymHubError;

/// Errors raised by the local file store.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The path escapes the storage root or is absolute.
    #[error("unsafe path: {0}")]
    UnsafePath(String),
}

impl From<FileStoreError> for GymHubError {
    fn from(err: FileStoreError) -> Self {
        GymHubError::Files(Box::new(err))
    }
}
