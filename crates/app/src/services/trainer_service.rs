//! Trainer service: use-cases for managing coaches.

use gymhub_domain::error::{GymHubError, NotFoundError, ValidationErrors};
use gymhub_domain::form::Form;
use gymhub_domain::id::{ServiceId, TrainerId};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::trainer::{NewTrainer, Trainer, TrainerDraft, TrainerFilter, TrainerWithServices};

use crate::attachments;
use crate::ports::{FileStore, TrainerRepository};

/// Application service for trainer CRUD and service assignment.
pub struct TrainerService<R, F> {
    repo: R,
    files: F,
}

impl<R: TrainerRepository, F: FileStore> TrainerService<R, F> {
    /// Create a new service backed by the given repository and file store.
    pub fn new(repo: R, files: F) -> Self {
        Self { repo, files }
    }

    /// One page of trainers matching `filter`, services loaded.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_trainers(
        &self,
        filter: &TrainerFilter,
        page: PageRequest,
    ) -> Result<Page<TrainerWithServices>, GymHubError> {
        self.repo.list(filter, page).await
    }

    /// Look up a trainer by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] when no trainer with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_trainer(&self, id: TrainerId) -> Result<TrainerWithServices, GymHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Trainer",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Validate `form`, store the photo and persist the trainer with their
    /// services.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a field is invalid or a
    /// service does not exist, or a file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn create_trainer(&self, form: Form) -> Result<TrainerWithServices, GymHubError> {
        let draft = TrainerDraft::from_form(form)?;
        let services = draft.services.unwrap_or_default();
        self.ensure_services_exist(&services).await?;

        let photo = attachments::store_one(&self.files, Trainer::STORAGE_DIR, draft.photo).await?;
        let new = NewTrainer {
            first_name: draft.first_name,
            last_name: draft.last_name,
            description: draft.description,
            photo: photo.clone(),
        };
        match self.repo.create(new, &services).await {
            Ok(created) => {
                tracing::info!(trainer_id = %created.trainer.id, "trainer created");
                Ok(created)
            }
            Err(err) => {
                attachments::discard(&self.files, photo.as_slice()).await;
                Err(err)
            }
        }
    }

    /// Replace the fields of an existing trainer. Services are synced only
    /// when the form carries them.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the trainer does not exist,
    /// [`GymHubError::Validation`] when the form is invalid, or a
    /// file/storage error.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_trainer(
        &self,
        id: TrainerId,
        form: Form,
    ) -> Result<TrainerWithServices, GymHubError> {
        let mut trainer = self.get_trainer(id).await?.trainer;
        let draft = TrainerDraft::from_form(form)?;
        if let Some(services) = &draft.services {
            self.ensure_services_exist(services).await?;
        }

        let photo = attachments::store_one(&self.files, Trainer::STORAGE_DIR, draft.photo).await?;
        let previous = match &photo {
            Some(path) => trainer.photo.replace(path.clone()),
            None => None,
        };
        trainer.first_name = draft.first_name;
        trainer.last_name = draft.last_name;
        trainer.description = draft.description;

        match self.repo.update(trainer, draft.services.as_deref()).await {
            Ok(updated) => {
                attachments::discard(&self.files, previous.as_slice()).await;
                tracing::info!(trainer_id = %id, "trainer updated");
                Ok(updated)
            }
            Err(err) => {
                attachments::discard(&self.files, photo.as_slice()).await;
                Err(err)
            }
        }
    }

    /// Delete a trainer, their photo and their service associations.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the trainer does not exist, or
    /// a file/storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_trainer(&self, id: TrainerId) -> Result<(), GymHubError> {
        let current = self.get_trainer(id).await?;
        attachments::remove_all(&self.files, current.trainer.photo.as_slice()).await?;
        self.repo.delete(id).await?;
        tracing::info!(trainer_id = %id, "trainer deleted");
        Ok(())
    }

    /// Number of stored trainers.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_trainers(&self) -> Result<u64, GymHubError> {
        self.repo.count().await
    }

    async fn ensure_services_exist(&self, ids: &[ServiceId]) -> Result<(), GymHubError> {
        if ids.is_empty() {
            return Ok(());
        }
        let missing = self.repo.find_missing_services(ids).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?missing, "unknown services submitted");
            Err(ValidationErrors::single("services", "The selected services are invalid.").into())
        }
    }
}
