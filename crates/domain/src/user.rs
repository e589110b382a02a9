//! Users of the admin API and the bearer tokens issued to them.

use serde::Serialize;

use crate::error::{GymHubError, ValidationErrors};
use crate::form::Form;
use crate::id::{TokenId, UserId};
use crate::time::Timestamp;
use crate::validation;

/// An administrator able to manage the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Column values for a user that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A bearer token row. Only the hash of the secret is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: TokenId,
    pub user_id: UserId,
    pub name: String,
    /// Lowercase hex SHA-256 of the token secret.
    pub token_hash: String,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl AccessToken {
    /// Name given to tokens issued by `POST /api/login`.
    pub const DEFAULT_NAME: &'static str = "API Token";

    /// Split a presented `"{id}|{secret}"` token into its parts.
    ///
    /// Tokens without a well-formed id prefix are treated as a bare secret.
    #[must_use]
    pub fn split(presented: &str) -> (Option<TokenId>, &str) {
        match presented.split_once('|') {
            Some((id, secret)) => match id.parse::<TokenId>() {
                Ok(id) => (Some(id), secret),
                Err(_) => (None, presented),
            },
            None => (None, presented),
        }
    }
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validate a submitted login form.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when email or password is missing
    /// or the email is malformed.
    pub fn from_form(form: &Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let email = validation::email(form, &mut errors, "email");
        let password = validation::required_text(form, &mut errors, "password", None);

        errors.finish(|| Self {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}
