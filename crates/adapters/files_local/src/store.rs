use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use gymhub_app::credentials::generate_secret;
use gymhub_app::ports::FileStore;
use gymhub_domain::error::GymHubError;
use gymhub_domain::form::Upload;

use crate::error::FileStoreError;

const FALLBACK_EXTENSION: &str = "bin";

/// A [`FileStore`] writing below a root directory on the local disk.
///
/// Returned paths are relative to the root, using `/` separators, so they
/// can be appended to the public `/storage` URL as they are.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path below the root.
    fn resolve(&self, relative: &str) -> Result<PathBuf, FileStoreError> {
        let path = Path::new(relative);
        let safe = !relative.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(FileStoreError::UnsafePath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }

    async fn write(&self, directory: &str, upload: Upload) -> Result<String, FileStoreError> {
        let target_dir = self.resolve(directory)?;
        tokio::fs::create_dir_all(&target_dir).await?;

        let extension = upload
            .extension()
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        let file_name = format!("{}.{extension}", generate_secret());
        tokio::fs::write(target_dir.join(&file_name), &upload.bytes).await?;

        Ok(format!("{}/{file_name}", directory.trim_end_matches('/')))
    }

    async fn remove(&self, path: &str) -> Result<(), FileStoreError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(%path, "file already absent");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl FileStore for LocalFileStore {
    async fn store(&self, directory: &str, upload: Upload) -> Result<String, GymHubError> {
        let size = upload.size();
        let path = self.write(directory, upload).await?;
        tracing::debug!(%path, size, "stored upload");
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), GymHubError> {
        self.remove(path).await?;
        tracing::debug!(%path, "deleted file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store rooted in a fresh temp directory, removed on drop.
    struct TempStore(LocalFileStore);

    impl std::ops::Deref for TempStore {
        type Target = LocalFileStore;

        fn deref(&self) -> &LocalFileStore {
            &self.0
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(self.0.root());
        }
    }

    fn temp_store() -> TempStore {
        let root = std::env::temp_dir().join(format!("gymhub-files-{}", uuid::Uuid::new_v4()));
        TempStore(LocalFileStore::new(root))
    }

    fn png() -> Upload {
        Upload::new("photo.PNG", Some("image/png".to_string()), vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn should_store_upload_under_directory_with_random_name() {
        let store = temp_store();

        let path = store.store("trainers", png()).await.unwrap();

        let (directory, file_name) = path.split_once('/').unwrap();
        assert_eq!(directory, "trainers");
        let (stem, extension) = file_name.rsplit_once('.').unwrap();
        assert_eq!(stem.len(), 40);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(extension, "png");

        let bytes = tokio::fs::read(store.root().join(&path)).await.unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn should_give_each_upload_its_own_name() {
        let store = temp_store();

        let first = store.store("products", png()).await.unwrap();
        let second = store.store("products", png()).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn should_delete_stored_file() {
        let store = temp_store();
        let path = store.store("news", png()).await.unwrap();

        store.delete(&path).await.unwrap();

        assert!(!store.root().join(&path).exists());
    }

    #[tokio::test]
    async fn should_accept_deleting_missing_file() {
        let store = temp_store();
        store.delete("services/missing.png").await.unwrap();
    }

    #[tokio::test]
    async fn should_refuse_paths_outside_root() {
        let store = temp_store();

        for path in ["../etc/passwd", "/etc/passwd", "services/../../x", ""] {
            let result = store.delete(path).await;
            assert!(matches!(result, Err(GymHubError::Files(_))), "{path}");
        }
        assert!(matches!(
            store.store("../outside", png()).await,
            Err(GymHubError::Files(_))
        ));
    }

    #[tokio::test]
    async fn should_remove_temp_root_when_dropped() {
        let store = temp_store();
        store.store("news", png()).await.unwrap();
        let root = store.root().to_path_buf();
        assert!(root.exists());

        drop(store);

        assert!(!root.exists());
    }
}
