//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod news;
#[allow(clippy::missing_errors_doc)]
pub mod products;
pub mod responses;
#[allow(clippy::missing_errors_doc)]
pub mod services;
#[allow(clippy::missing_errors_doc)]
pub mod stats;
#[allow(clippy::missing_errors_doc)]
pub mod trainers;
#[allow(clippy::missing_errors_doc)]
pub mod training_requests;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post};

use crate::error::ApiError;
use crate::state::{AppState, Backend};

/// Parse a path id. Anything that is not a record id is reported as an
/// unknown record.
fn parse_id<I: FromStr>(raw: &str, entity: &'static str) -> Result<I, ApiError> {
    raw.parse().map_err(|_| ApiError::unknown_id(entity, raw))
}

/// Build the `/api` sub-router.
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        // Auth
        .route("/login", post(auth::login::<B>))
        .route("/logout", post(auth::logout::<B>))
        // Services
        .route(
            "/services",
            get(services::list::<B>).post(services::create::<B>),
        )
        .route(
            "/services/{id}",
            get(services::get::<B>)
                .put(services::update::<B>)
                .delete(services::delete::<B>),
        )
        // Trainers
        .route(
            "/trainers",
            get(trainers::list::<B>).post(trainers::create::<B>),
        )
        .route(
            "/trainers/{id}",
            get(trainers::get::<B>)
                .put(trainers::update::<B>)
                .delete(trainers::delete::<B>),
        )
        // Products
        .route(
            "/products",
            get(products::list::<B>).post(products::create::<B>),
        )
        .route(
            "/products/{id}",
            get(products::get::<B>)
                .put(products::update::<B>)
                .delete(products::delete::<B>),
        )
        // News
        .route("/news", get(news::list::<B>).post(news::create::<B>))
        .route(
            "/news/{id}",
            get(news::get::<B>)
                .put(news::update::<B>)
                .delete(news::delete::<B>),
        )
        // Training requests
        .route(
            "/training-requests",
            get(training_requests::list::<B>).post(training_requests::create::<B>),
        )
        .route(
            "/training-requests/{id}",
            get(training_requests::get::<B>)
                .put(training_requests::update::<B>)
                .delete(training_requests::delete::<B>),
        )
        // Dashboard
        .route("/stats", get(stats::show::<B>))
}
