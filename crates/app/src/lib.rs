//! # gymhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRepository`, `TrainerRepository`: CRUD plus the
//!     service ↔ trainer association
//!   - `ProductRepository`, `NewsRepository`, `TrainingRequestRepository`: CRUD
//!   - `UserRepository`, `TokenRepository`: credentials and bearer tokens
//!   - `FileStore`: the public disk holding uploaded images
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AuthService`: login, logout, bearer authentication
//!   - one CRUD service per catalog record kind
//! - Orchestrate validation → file storage → persistence without knowing
//!   *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `gymhub-domain` only (plus hashing crates for credentials).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

mod attachments;
pub mod credentials;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
