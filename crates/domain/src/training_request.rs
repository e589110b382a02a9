//! Training request: a contact form submission asking for a session.

use serde::{Deserialize, Serialize};

use crate::error::{GymHubError, ValidationErrors};
use crate::form::Form;
use crate::id::TrainingRequestId;
use crate::time::Timestamp;
use crate::validation::{self, MAX_STRING};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub id: TrainingRequestId,
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
    /// Consent to personal data processing; always `true` once stored.
    pub consent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TrainingRequest {
    pub const PER_PAGE: u32 = 10;
    pub const MAX_PHONE: usize = 20;
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRequestDraft {
    pub name: String,
    pub phone: String,
    pub message: Option<String>,
}

impl TrainingRequestDraft {
    /// Validate a submitted form. `consent` must be explicitly true.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(form: &Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let name = validation::required_text(form, &mut errors, "name", Some(MAX_STRING));
        let phone =
            validation::required_text(form, &mut errors, "phone", Some(TrainingRequest::MAX_PHONE));
        let message = validation::optional_text(form, &mut errors, "message", None);
        validation::accepted(form, &mut errors, "consent");

        errors.finish(|| Self {
            name: name.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            message: message.flatten(),
        })
    }
}
