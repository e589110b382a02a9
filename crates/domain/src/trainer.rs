//! Trainer: a coach who runs one or more services.

use serde::{Deserialize, Serialize};

use crate::error::{GymHubError, ValidationErrors};
use crate::form::{Form, Upload};
use crate::id::{ServiceId, TrainerId};
use crate::service::Service;
use crate::time::Timestamp;
use crate::validation::{self, MAX_STRING};

/// A coach, optionally pictured by a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    /// Path of the photo on the public disk.
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Trainer {
    pub const STORAGE_DIR: &'static str = "trainers";
    pub const PER_PAGE: u32 = 10;
}

/// A trainer with the services they run eagerly loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerWithServices {
    #[serde(flatten)]
    pub trainer: Trainer,
    pub services: Vec<Service>,
}

/// Column values for a trainer that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrainer {
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub photo: Option<String>,
}

/// Validated create/update payload.
#[derive(Debug)]
pub struct TrainerDraft {
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub photo: Option<Upload>,
    /// Services to attach (create) or sync to (update); `None` when not sent.
    pub services: Option<Vec<ServiceId>>,
}

impl TrainerDraft {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(mut form: Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let first_name =
            validation::required_text(&form, &mut errors, "first_name", Some(MAX_STRING));
        let last_name =
            validation::required_text(&form, &mut errors, "last_name", Some(MAX_STRING));
        let description = validation::required_text(&form, &mut errors, "description", None);
        let services = validation::id_list(&form, &mut errors, "services");
        let photo = validation::optional_image(&mut form, &mut errors, "photo");

        errors.finish(|| Self {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            photo,
            services,
        })
    }
}

/// Listing filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainerFilter {
    /// Substring of either the first or the last name.
    pub name: Option<String>,
    /// Only trainers attached to this service.
    pub service_id: Option<ServiceId>,
    /// Inclusive lower bound on the number of attached services.
    pub min_services: Option<u32>,
    /// Inclusive upper bound on the number of attached services.
    pub max_services: Option<u32>,
}

impl TrainerFilter {
    /// Parse filters from query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a numeric filter is malformed.
    pub fn from_form(form: &Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let service_id = validation::optional_integer(form, &mut errors, "service_id");
        let min_services = validation::optional_integer(form, &mut errors, "min_services");
        let max_services = validation::optional_integer(form, &mut errors, "max_services");

        errors.finish(|| Self {
            name: form.value("name").map(str::to_string),
            service_id,
            min_services,
            max_services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> Form {
        Form::from_pairs([
            ("first_name", "Anna"),
            ("last_name", "Petrova"),
            ("description", "Pilates coach"),
        ])
    }

    #[test]
    fn should_build_draft_when_form_valid() {
        let draft = TrainerDraft::from_form(valid_form()).unwrap();
        assert_eq!(draft.first_name, "Anna");
        assert_eq!(draft.last_name, "Petrova");
        assert!(draft.photo.is_none());
        assert!(draft.services.is_none());
    }

    #[test]
    fn should_reject_missing_names() {
        let form = Form::from_pairs([("description", "d")]);
        let Err(GymHubError::Validation(errors)) = TrainerDraft::from_form(form) else {
            panic!("expected validation error");
        };
        assert!(errors.contains("first_name"));
        assert!(errors.contains("last_name"));
        assert_eq!(
            errors.messages("first_name"),
            ["The first name field is required."]
        );
    }

    #[test]
    fn should_keep_explicitly_empty_service_list() {
        let mut form = valid_form();
        form.mark_present("services");
        let draft = TrainerDraft::from_form(form).unwrap();
        assert_eq!(draft.services, Some(vec![]));
    }

    #[test]
    fn should_reject_oversized_photo() {
        let mut form = valid_form();
        form.push_file(
            "photo",
            Upload::new("big.jpg", None, vec![0; validation::MAX_IMAGE_BYTES + 1]),
        );
        assert!(matches!(
            TrainerDraft::from_form(form),
            Err(GymHubError::Validation(errors)) if errors.contains("photo")
        ));
    }

    #[test]
    fn should_parse_service_count_filters() {
        let form = Form::from_pairs([("name", "ann"), ("min_services", "1"), ("max_services", "3")]);
        let filter = TrainerFilter::from_form(&form).unwrap();
        assert_eq!(filter.name.as_deref(), Some("ann"));
        assert_eq!(filter.min_services, Some(1));
        assert_eq!(filter.max_services, Some(3));
        assert_eq!(filter.service_id, None);
    }

    #[test]
    fn should_reject_negative_service_count_filter() {
        let form = Form::from_pairs([("min_services", "-1")]);
        assert!(TrainerFilter::from_form(&form).is_err());
    }
}
