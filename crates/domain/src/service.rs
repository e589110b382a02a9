//! Service: a gym offering (class, membership, personal session) with a price.

use serde::{Deserialize, Serialize};

use crate::error::{GymHubError, ValidationErrors};
use crate::form::{Form, Upload};
use crate::id::{ServiceId, TrainerId};
use crate::time::Timestamp;
use crate::trainer::Trainer;
use crate::validation::{self, MAX_STRING};

/// A priced offering, optionally illustrated by an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Path of the image on the public disk.
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Service {
    /// Public disk directory holding service images.
    pub const STORAGE_DIR: &'static str = "services";
    /// Listing page size.
    pub const PER_PAGE: u32 = 5;
}

/// A service with its trainers eagerly loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceWithTrainers {
    #[serde(flatten)]
    pub service: Service,
    pub trainers: Vec<Trainer>,
}

/// Column values for a service that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: Option<String>,
}

/// Validated create/update payload.
#[derive(Debug)]
pub struct ServiceDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: Option<Upload>,
    /// Trainers to attach (create) or sync to (update); `None` when not sent.
    pub trainers: Option<Vec<TrainerId>>,
}

impl ServiceDraft {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(mut form: Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let title = validation::required_text(&form, &mut errors, "title", Some(MAX_STRING));
        let description = validation::required_text(&form, &mut errors, "description", None);
        let price = validation::price(&form, &mut errors, "price");
        let trainers = validation::id_list(&form, &mut errors, "trainers");
        let image = validation::optional_image(&mut form, &mut errors, "image");

        errors.finish(|| Self {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            price: price.unwrap_or_default(),
            image,
            trainers,
        })
    }
}

/// Listing filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilter {
    /// Substring of the title.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Only services this trainer is attached to.
    pub trainer_id: Option<TrainerId>,
}

impl ServiceFilter {
    /// Parse filters from query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a numeric filter is malformed.
    pub fn from_form(form: &Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let min_price = validation::optional_number(form, &mut errors, "min_price");
        let max_price = validation::optional_number(form, &mut errors, "max_price");
        let trainer_id = validation::optional_integer(form, &mut errors, "trainer_id");

        errors.finish(|| Self {
            title: form.value("title").map(str::to_string),
            min_price,
            max_price,
            trainer_id,
        })
    }
}
