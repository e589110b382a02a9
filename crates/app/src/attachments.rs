//! Helpers storing and cleaning up the files attached to a record.

use gymhub_domain::error::GymHubError;
use gymhub_domain::form::Upload;

use crate::ports::FileStore;

/// Store an optional upload.
pub(crate) async fn store_one<F: FileStore>(
    files: &F,
    directory: &str,
    upload: Option<Upload>,
) -> Result<Option<String>, GymHubError> {
    match upload {
        Some(upload) => files.store(directory, upload).await.map(Some),
        None => Ok(None),
    }
}

/// Store every upload. When one fails, the ones already stored are discarded.
pub(crate) async fn store_many<F: FileStore>(
    files: &F,
    directory: &str,
    uploads: Vec<Upload>,
) -> Result<Vec<String>, GymHubError> {
    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match files.store(directory, upload).await {
            Ok(path) => stored.push(path),
            Err(err) => {
                discard(files, &stored).await;
                return Err(err);
            }
        }
    }
    Ok(stored)
}

/// Delete files, logging failures instead of returning them.
pub(crate) async fn discard<F: FileStore>(files: &F, paths: &[String]) {
    for path in paths {
        if let Err(err) = files.delete(path).await {
            tracing::warn!(%err, %path, "failed to delete stored file");
        }
    }
}

/// Delete files, stopping at the first failure.
pub(crate) async fn remove_all<F: FileStore>(
    files: &F,
    paths: &[String],
) -> Result<(), GymHubError> {
    for path in paths {
        files.delete(path).await?;
    }
    Ok(())
}
