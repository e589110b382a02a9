//! Training request service: the public intake form and its admin queue.

use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::form::Form;
use gymhub_domain::id::TrainingRequestId;
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::training_request::{TrainingRequest, TrainingRequestDraft};

use crate::ports::TrainingRequestRepository;

/// Application service for training requests.
pub struct TrainingRequestService<R> {
    repo: R,
}

impl<R: TrainingRequestRepository> TrainingRequestService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Record a request sent from the public site.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a field is invalid or consent
    /// was not given, or a storage error from the repository.
    #[tracing::instrument(skip(self, form))]
    pub async fn submit_request(&self, form: &Form) -> Result<TrainingRequest, GymHubError> {
        let draft = TrainingRequestDraft::from_form(form)?;
        let stored = self.repo.create(draft).await?;
        tracing::info!(training_request_id = %stored.id, "training request received");
        Ok(stored)
    }

    /// Newest requests first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_requests(
        &self,
        page: PageRequest,
    ) -> Result<Page<TrainingRequest>, GymHubError> {
        self.repo.list(page).await
    }

    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] when no request with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_request(&self, id: TrainingRequestId) -> Result<TrainingRequest, GymHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "TrainingRequest",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Replace the fields of a stored request. Consent must still be given.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the request does not exist,
    /// [`GymHubError::Validation`] when the form is invalid, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_request(
        &self,
        id: TrainingRequestId,
        form: &Form,
    ) -> Result<TrainingRequest, GymHubError> {
        let mut request = self.get_request(id).await?;
        let draft = TrainingRequestDraft::from_form(form)?;
        request.name = draft.name;
        request.phone = draft.phone;
        request.message = draft.message;
        request.consent = true;
        let updated = self.repo.update(request).await?;
        tracing::info!(training_request_id = %id, "training request updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`GymHubError::NotFound`] if the request does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_request(&self, id: TrainingRequestId) -> Result<(), GymHubError> {
        self.get_request(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(training_request_id = %id, "training request deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_requests(&self) -> Result<u64, GymHubError> {
        self.repo.count().await
    }
}
