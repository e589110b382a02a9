//! Shared application state for axum handlers.

use std::sync::Arc;

use gymhub_app::ports::{
    FileStore, NewsRepository, ProductRepository, ServiceRepository, TokenRepository,
    TrainerRepository, TrainingRequestRepository, UserRepository,
};
use gymhub_app::services::auth_service::AuthService;
use gymhub_app::services::news_service::NewsService;
use gymhub_app::services::product_service::ProductService;
use gymhub_app::services::service_service::ServiceService;
use gymhub_app::services::trainer_service::TrainerService;
use gymhub_app::services::training_request_service::TrainingRequestService;

/// The concrete port implementations the HTTP layer runs against, one
/// associated type per port.
pub trait Backend: Send + Sync + 'static {
    type Services: ServiceRepository + Send + Sync + 'static;
    type Trainers: TrainerRepository + Send + Sync + 'static;
    type Products: ProductRepository + Send + Sync + 'static;
    type News: NewsRepository + Send + Sync + 'static;
    type TrainingRequests: TrainingRequestRepository + Send + Sync + 'static;
    type Users: UserRepository + Send + Sync + 'static;
    type Tokens: TokenRepository + Send + Sync + 'static;
    type Files: FileStore + Send + Sync + 'static;
}

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<B: Backend> {
    pub auth_service: Arc<AuthService<B::Users, B::Tokens>>,
    pub service_service: Arc<ServiceService<B::Services, B::Files>>,
    pub trainer_service: Arc<TrainerService<B::Trainers, B::Files>>,
    pub product_service: Arc<ProductService<B::Products, B::Files>>,
    pub news_service: Arc<NewsService<B::News, B::Files>>,
    pub training_request_service: Arc<TrainingRequestService<B::TrainingRequests>>,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            service_service: Arc::clone(&self.service_service),
            trainer_service: Arc::clone(&self.trainer_service),
            product_service: Arc::clone(&self.product_service),
            news_service: Arc::clone(&self.news_service),
            training_request_service: Arc::clone(&self.training_request_service),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Create a new application state from service instances.
    pub fn new(
        auth_service: AuthService<B::Users, B::Tokens>,
        service_service: ServiceService<B::Services, B::Files>,
        trainer_service: TrainerService<B::Trainers, B::Files>,
        product_service: ProductService<B::Products, B::Files>,
        news_service: NewsService<B::News, B::Files>,
        training_request_service: TrainingRequestService<B::TrainingRequests>,
    ) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
            service_service: Arc::new(service_service),
            trainer_service: Arc::new(trainer_service),
            product_service: Arc::new(product_service),
            news_service: Arc::new(news_service),
            training_request_service: Arc::new(training_request_service),
        }
    }
}
