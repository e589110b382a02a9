//! # gymhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `gymhub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Keep the `service_trainer` pivot table in sync inside transactions
//!
//! ## Dependency rule
//! Depends on `gymhub-app` (for port traits) and `gymhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;

mod query;
mod relations;
mod rows;

pub mod news_repo;
pub mod product_repo;
pub mod service_repo;
pub mod token_repo;
pub mod trainer_repo;
pub mod training_request_repo;
pub mod user_repo;

pub use news_repo::SqliteNewsRepository;
pub use pool::{Config, Database};
pub use product_repo::SqliteProductRepository;
pub use service_repo::SqliteServiceRepository;
pub use token_repo::SqliteTokenRepository;
pub use trainer_repo::SqliteTrainerRepository;
pub use training_request_repo::SqliteTrainingRequestRepository;
pub use user_repo::SqliteUserRepository;
