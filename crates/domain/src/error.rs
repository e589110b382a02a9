//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`GymHubError`] via `From`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Base error for every use-case in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum GymHubError {
    /// One or more fields failed validation.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// The requested record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Missing, unknown or revoked credentials.
    #[error("unauthenticated")]
    Unauthorized,

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The file store failed.
    #[error("file store error")]
    Files(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Password hashing or token generation failed.
    #[error("credential error: {0}")]
    Credentials(String),
}

/// A record with the given id does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Human-readable record kind, e.g. `"Service"`.
    pub entity: &'static str,
    /// The id that was looked up.
    pub id: String,
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Iterate over the failing field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Return `Ok(value)` when no message was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] carrying `self` otherwise.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, GymHubError> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self.into())
        }
    }

    /// Build an error holding a single message.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
