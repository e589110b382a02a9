//! Concrete adapter selection.

use gymhub_adapter_files_local::LocalFileStore;
use gymhub_adapter_http_axum::state::{AppState, Backend};
use gymhub_adapter_storage_sqlite_sqlx::{
    Database, SqliteNewsRepository, SqliteProductRepository, SqliteServiceRepository,
    SqliteTokenRepository, SqliteTrainerRepository, SqliteTrainingRequestRepository,
    SqliteUserRepository,
};
use gymhub_app::services::auth_service::AuthService;
use gymhub_app::services::news_service::NewsService;
use gymhub_app::services::product_service::ProductService;
use gymhub_app::services::service_service::ServiceService;
use gymhub_app::services::trainer_service::TrainerService;
use gymhub_app::services::training_request_service::TrainingRequestService;

/// `SQLite` repositories plus the local public disk.
pub struct SqliteBackend;

impl Backend for SqliteBackend {
    type Services = SqliteServiceRepository;
    type Trainers = SqliteTrainerRepository;
    type Products = SqliteProductRepository;
    type News = SqliteNewsRepository;
    type TrainingRequests = SqliteTrainingRequestRepository;
    type Users = SqliteUserRepository;
    type Tokens = SqliteTokenRepository;
    type Files = LocalFileStore;
}

/// Build every service on top of `db` and `files`.
#[must_use]
pub fn app_state(db: &Database, files: &LocalFileStore) -> AppState<SqliteBackend> {
    let pool = db.pool();

    AppState::new(
        AuthService::new(
            SqliteUserRepository::new(pool.clone()),
            SqliteTokenRepository::new(pool.clone()),
        ),
        ServiceService::new(SqliteServiceRepository::new(pool.clone()), files.clone()),
        TrainerService::new(SqliteTrainerRepository::new(pool.clone()), files.clone()),
        ProductService::new(SqliteProductRepository::new(pool.clone()), files.clone()),
        NewsService::new(SqliteNewsRepository::new(pool.clone()), files.clone()),
        TrainingRequestService::new(SqliteTrainingRequestRepository::new(pool.clone())),
    )
}
