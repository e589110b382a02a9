//! # gymhub-adapter-files-local
//!
//! Stores uploaded images on the local "public" disk.
//!
//! ## Responsibilities
//! - Implement the [`FileStore`](gymhub_app::ports::FileStore) port
//! - Name stored files with a random 40 character stem and the upload's
//!   extension, under one directory per record kind
//! - Refuse paths that would escape the storage root
//!
//! The HTTP adapter serves the same root under `/storage`.
//!
//! ## Dependency rule
//! Depends on `gymhub-app` (for the port trait) and `gymhub-domain`.

pub mod error;
mod store;

pub use error::FileStoreError;
pub use store::LocalFileStore;
