//! File store port: the public disk holding uploaded images.

use std::future::Future;

use gymhub_domain::error::GymHubError;
use gymhub_domain::form::Upload;

/// Stores uploads under entity-named directories and deletes them by path.
pub trait FileStore {
    /// Store `upload` under `directory`, returning its relative path
    /// (e.g. `services/3QbN….png`).
    fn store(
        &self,
        directory: &str,
        upload: Upload,
    ) -> impl Future<Output = Result<String, GymHubError>> + Send;

    /// Delete the file at the relative `path`. Deleting a missing file
    /// succeeds.
    fn delete(&self, path: &str) -> impl Future<Output = Result<(), GymHubError>> + Send;
}
