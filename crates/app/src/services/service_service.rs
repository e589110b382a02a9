//! Service service: use-cases for the gym's priced offerings.

use gymhub_domain::error::{GymHubError, NotFoundError, ValidationErrors};
use gymhub_domain::form::Form;
use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::service::{NewService, Service, ServiceDraft, ServiceFilter, ServiceWithTrainers};

use crate::attachments;
use crate::ports::{FileStore, ServiceRepository};

/// Application service for service CRUD and trainer assignment.
pub struct ServiceService<R, F> {
    repo: R,
    files: F,
}

impl<R: ServiceRepository, F: FileStore> ServiceService<R, F> {
    /// Create a new service backed by the given repository and file store.
    pub fn new(repo: R, files: F) -> Self {
        Self { repo, files }
    }

    /// One page of services matching `filter`, trainers loaded.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_services(
        &self,
        filter: &ServiceFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceWithTrainers>, GymHubError> {
        self.repo.list(filter, page).await
    }

    /// Look up a service by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] when no service with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_service(&self, id: ServiceId) -> Result<ServiceWithTrainers, GymHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Service",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Validate `form`, store the image and persist the service with its
    /// trainers.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a field is invalid or a
    /// trainer does not exist, or a file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn create_service(&self, form: Form) -> Result<ServiceWithTrainers, GymHubError> {
        let draft = ServiceDraft::from_form(form)?;
        let trainers = draft.trainers.unwrap_or_default();
        self.ensure_trainers_exist(&trainers).await?;

        let image = attachments::store_one(&self.files, Service::STORAGE_DIR, draft.image).await?;
        let new = NewService {
            title: draft.title,
            description: draft.description,
            price: draft.price,
            image: image.clone(),
        };
        match self.repo.create(new, &trainers).await {
            Ok(created) => {
                tracing::info!(service_id = %created.service.id, "service created");
                Ok(created)
            }
            Err(err) => {
                attachments::discard(&self.files, image.as_slice()).await;
                Err(err)
            }
        }
    }

    /// Replace the fields of an existing service. Trainers are synced only
    /// when the form carries them.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the service does not exist,
    /// [`GymHubError::Validation`] when the form is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_service(
        &self,
        id: ServiceId,
        form: Form,
    ) -> Result<ServiceWithTrainers, GymHubError> {
        let mut service = self.get_service(id).await?.service;
        let draft = ServiceDraft::from_form(form)?;
        if let Some(trainers) = &draft.trainers {
            self.ensure_trainers_exist(trainers).await?;
        }

        let image = attachments::store_one(&self.files, Service::STORAGE_DIR, draft.image).await?;
        let previous = match &image {
            Some(path) => service.image.replace(path.clone()),
            None => None,
        };
        service.title = draft.title;
        service.description = draft.description;
        service.price = draft.price;

        match self.repo.update(service, draft.trainers.as_deref()).await {
            Ok(updated) => {
                attachments::discard(&self.files, previous.as_slice()).await;
                tracing::info!(service_id = %id, "service updated");
                Ok(updated)
            }
            Err(err) => {
                attachments::discard(&self.files, image.as_slice()).await;
                Err(err)
            }
        }
    }

    /// Delete a service, its image and its trainer associations.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the service does not exist, or
    /// a file/storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), GymHubError> {
        let current = self.get_service(id).await?;
        attachments::remove_all(&self.files, current.service.image.as_slice()).await?;
        self.repo.delete(id).await?;
        tracing::info!(service_id = %id, "service deleted");
        Ok(())
    }

    /// Number of stored services.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_services(&self) -> Result<u64, GymHubError> {
        self.repo.count().await
    }

    async fn ensure_trainers_exist(&self, ids: &[TrainerId]) -> Result<(), GymHubError> {
        if ids.is_empty() {
            return Ok(());
        }
        let missing = self.repo.find_missing_trainers(ids).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?missing, "unknown trainers submitted");
            Err(ValidationErrors::single("trainers", "The selected trainers are invalid.").into())
        }
    }
}
