//! # gymhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api` (services, trainers, products,
//!   news, training requests, login/logout, dashboard stats)
//! - Decode JSON, multipart and url-encoded bodies into a domain
//!   [`Form`](gymhub_domain::form::Form)
//! - Resolve bearer tokens into the current user
//! - Serve the public storage disk under `/storage`
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `gymhub-app` (for port traits and services) and `gymhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
