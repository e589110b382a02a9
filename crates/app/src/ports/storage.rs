//! Storage port: repository traits for persistence.
//!
//! Repositories stamp `created_at` / `updated_at` themselves. `update` and
//! `delete` return [`GymHubError::NotFound`] when the row vanished.

use std::future::Future;

use gymhub_domain::error::GymHubError;
use gymhub_domain::id::{NewsId, ProductId, ServiceId, TrainerId, TrainingRequestId};
use gymhub_domain::news::{NewNews, News};
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::product::{NewProduct, Product, ProductFilter};
use gymhub_domain::service::{NewService, Service, ServiceFilter, ServiceWithTrainers};
use gymhub_domain::trainer::{NewTrainer, Trainer, TrainerFilter, TrainerWithServices};
use gymhub_domain::training_request::{TrainingRequest, TrainingRequestDraft};

/// Repository for [`Service`]s and their trainer associations.
pub trait ServiceRepository {
    /// Insert a service and attach `trainers` in one transaction.
    fn create(
        &self,
        service: NewService,
        trainers: &[TrainerId],
    ) -> impl Future<Output = Result<ServiceWithTrainers, GymHubError>> + Send;

    /// Get a service with its trainers.
    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<ServiceWithTrainers>, GymHubError>> + Send;

    /// One page of services matching `filter`, ordered by id.
    fn list(
        &self,
        filter: &ServiceFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceWithTrainers>, GymHubError>> + Send;

    /// Persist the columns of `service`; when `trainers` is given, sync the
    /// association to exactly that set.
    fn update(
        &self,
        service: Service,
        trainers: Option<&[TrainerId]>,
    ) -> impl Future<Output = Result<ServiceWithTrainers, GymHubError>> + Send;

    /// Detach every trainer and delete the service.
    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), GymHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send;

    /// Return the ids among `ids` that match no trainer.
    fn find_missing_trainers(
        &self,
        ids: &[TrainerId],
    ) -> impl Future<Output = Result<Vec<TrainerId>, GymHubError>> + Send;
}

/// Repository for [`Trainer`]s and their service associations.
pub trait TrainerRepository {
    /// Insert a trainer and attach `services` in one transaction.
    fn create(
        &self,
        trainer: NewTrainer,
        services: &[ServiceId],
    ) -> impl Future<Output = Result<TrainerWithServices, GymHubError>> + Send;

    fn get_by_id(
        &self,
        id: TrainerId,
    ) -> impl Future<Output = Result<Option<TrainerWithServices>, GymHubError>> + Send;

    fn list(
        &self,
        filter: &TrainerFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<TrainerWithServices>, GymHubError>> + Send;

    /// Persist the columns of `trainer`; when `services` is given, sync the
    /// association to exactly that set.
    fn update(
        &self,
        trainer: Trainer,
        services: Option<&[ServiceId]>,
    ) -> impl Future<Output = Result<TrainerWithServices, GymHubError>> + Send;

    /// Detach every service and delete the trainer.
    fn delete(&self, id: TrainerId) -> impl Future<Output = Result<(), GymHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send;

    /// Return the ids among `ids` that match no service.
    fn find_missing_services(
        &self,
        ids: &[ServiceId],
    ) -> impl Future<Output = Result<Vec<ServiceId>, GymHubError>> + Send;
}

/// Repository for [`Product`]s.
pub trait ProductRepository {
    fn create(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Product, GymHubError>> + Send;

    fn get_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, GymHubError>> + Send;

    fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Product>, GymHubError>> + Send;

    fn update(&self, product: Product)
    -> impl Future<Output = Result<Product, GymHubError>> + Send;

    fn delete(&self, id: ProductId) -> impl Future<Output = Result<(), GymHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send;
}

/// Repository for [`News`] items.
pub trait NewsRepository {
    fn create(&self, news: NewNews) -> impl Future<Output = Result<News, GymHubError>> + Send;

    fn get_by_id(
        &self,
        id: NewsId,
    ) -> impl Future<Output = Result<Option<News>, GymHubError>> + Send;

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<News>, GymHubError>> + Send;

    fn update(&self, news: News) -> impl Future<Output = Result<News, GymHubError>> + Send;

    fn delete(&self, id: NewsId) -> impl Future<Output = Result<(), GymHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send;
}

/// Repository for [`TrainingRequest`]s.
pub trait TrainingRequestRepository {
    fn create(
        &self,
        request: TrainingRequestDraft,
    ) -> impl Future<Output = Result<TrainingRequest, GymHubError>> + Send;

    fn get_by_id(
        &self,
        id: TrainingRequestId,
    ) -> impl Future<Output = Result<Option<TrainingRequest>, GymHubError>> + Send;

    /// One page of requests, newest first.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<TrainingRequest>, GymHubError>> + Send;

    fn update(
        &self,
        request: TrainingRequest,
    ) -> impl Future<Output = Result<TrainingRequest, GymHubError>> + Send;

    fn delete(
        &self,
        id: TrainingRequestId,
    ) -> impl Future<Output = Result<(), GymHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, GymHubError>> + Send;
}
