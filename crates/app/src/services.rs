//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod auth_service;
pub mod news_service;
pub mod product_service;
pub mod service_service;
pub mod trainer_service;
pub mod training_request_service;
