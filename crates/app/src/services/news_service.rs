//! News service: use-cases for announcements.

use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::form::Form;
use gymhub_domain::id::NewsId;
use gymhub_domain::news::{NewNews, News, NewsDraft, NewsPatch};
use gymhub_domain::page::{Page, PageRequest};

use crate::attachments;
use crate::ports::{FileStore, NewsRepository};

/// Application service for news CRUD.
pub struct NewsService<R, F> {
    repo: R,
    files: F,
}

impl<R: NewsRepository, F: FileStore> NewsService<R, F> {
    pub fn new(repo: R, files: F) -> Self {
        Self { repo, files }
    }

    /// One page of news items.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_news(&self, page: PageRequest) -> Result<Page<News>, GymHubError> {
        self.repo.list(page).await
    }

    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] when no news item with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_news(&self, id: NewsId) -> Result<News, GymHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "News",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Validate `form`, store the image and persist the news item.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a field is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn create_news(&self, form: Form) -> Result<News, GymHubError> {
        let draft = NewsDraft::from_form(form)?;
        let image = attachments::store_one(&self.files, News::STORAGE_DIR, draft.image).await?;
        let new = NewNews {
            title: draft.title,
            description: draft.description,
            image: image.clone(),
        };
        match self.repo.create(new).await {
            Ok(created) => {
                tracing::info!(news_id = %created.id, "news created");
                Ok(created)
            }
            Err(err) => {
                attachments::discard(&self.files, image.as_slice()).await;
                Err(err)
            }
        }
    }

    /// Apply a partial update: only the fields present in `form` change.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the item does not exist,
    /// [`GymHubError::Validation`] when a sent field is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_news(&self, id: NewsId, form: Form) -> Result<News, GymHubError> {
        let mut news = self.get_news(id).await?;
        let mut patch = NewsPatch::from_form(form)?;

        let image =
            attachments::store_one(&self.files, News::STORAGE_DIR, patch.image.take()).await?;
        let previous = match &image {
            Some(path) => news.image.replace(path.clone()),
            None => None,
        };
        patch.apply_text(&mut news);

        match self.repo.update(news).await {
            Ok(updated) => {
                attachments::discard(&self.files, previous.as_slice()).await;
                tracing::info!(news_id = %id, "news updated");
                Ok(updated)
            }
            Err(err) => {
                attachments::discard(&self.files, image.as_slice()).await;
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the item does not exist, or a
    /// file/storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_news(&self, id: NewsId) -> Result<(), GymHubError> {
        let current = self.get_news(id).await?;
        attachments::remove_all(&self.files, current.image.as_slice()).await?;
        self.repo.delete(id).await?;
        tracing::info!(news_id = %id, "news deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_news(&self) -> Result<u64, GymHubError> {
        self.repo.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCatalog, InMemoryFiles};
    use gymhub_domain::form::Upload;

    fn make_service() -> (NewsService<InMemoryCatalog, InMemoryFiles>, InMemoryFiles) {
        let files = InMemoryFiles::default();
        (NewsService::new(InMemoryCatalog::default(), files.clone()), files)
    }

    fn banner() -> Upload {
        Upload::new("banner.gif", Some("image/gif".to_string()), vec![0x47, 0x49, 0x46])
    }

    #[tokio::test]
    async fn should_create_news_without_description() {
        let (svc, _) = make_service();
        let created = svc
            .create_news(Form::from_pairs([("title", "Opening")]))
            .await
            .unwrap();
        assert_eq!(created.title, "Opening");
        assert_eq!(created.description, None);
        assert_eq!(created.image, None);
    }

    #[tokio::test]
    async fn should_require_title() {
        let (svc, _) = make_service();
        assert!(matches!(
            svc.create_news(Form::from_pairs([("description", "text")])).await,
            Err(GymHubError::Validation(errors)) if errors.contains("title")
        ));
    }

    #[tokio::test]
    async fn should_update_only_sent_fields() {
        let (svc, _) = make_service();
        let created = svc
            .create_news(Form::from_pairs([("title", "Opening"), ("description", "Monday")]))
            .await
            .unwrap();

        let updated = svc
            .update_news(created.id, Form::from_pairs([("description", "Tuesday")]))
            .await
            .unwrap();

        assert_eq!(updated.title, "Opening");
        assert_eq!(updated.description.as_deref(), Some("Tuesday"));
    }

    #[tokio::test]
    async fn should_skip_null_title_on_update() {
        let (svc, _) = make_service();
        let created = svc
            .create_news(Form::from_pairs([("title", "Opening")]))
            .await
            .unwrap();

        let patch = Form::from_json(serde_json::json!({ "title": null, "description": "Tuesday" }))
            .unwrap();
        let updated = svc.update_news(created.id, patch).await.unwrap();

        assert_eq!(updated.title, "Opening");
        assert_eq!(updated.description.as_deref(), Some("Tuesday"));
    }

    #[tokio::test]
    async fn should_replace_image_on_update() {
        let (svc, files) = make_service();
        let mut form = Form::from_pairs([("title", "Opening")]);
        form.push_file("image", banner());
        let created = svc.create_news(form).await.unwrap();

        let mut patch = Form::new();
        patch.push_file("image", banner());
        let updated = svc.update_news(created.id, patch).await.unwrap();

        assert_ne!(updated.image, created.image);
        assert_eq!(files.paths(), vec![updated.image.unwrap()]);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_news() {
        let (svc, _) = make_service();
        assert!(matches!(
            svc.update_news(NewsId::new(3), Form::new()).await,
            Err(GymHubError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_news(NewsId::new(3)).await,
            Err(GymHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_delete_news_image() {
        let (svc, files) = make_service();
        let mut form = Form::from_pairs([("title", "Opening")]);
        form.push_file("image", banner());
        let created = svc.create_news(form).await.unwrap();

        svc.delete_news(created.id).await.unwrap();

        assert!(files.paths().is_empty());
        assert_eq!(svc.count_news().await.unwrap(), 0);
    }
}
