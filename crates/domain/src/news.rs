//! News: announcements published on the website.

use serde::{Deserialize, Serialize};

use crate::error::{GymHubError, ValidationErrors};
use crate::form::{Form, Upload};
use crate::id::NewsId;
use crate::time::Timestamp;
use crate::validation::{self, MAX_STRING};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl News {
    pub const STORAGE_DIR: &'static str = "news";
    pub const PER_PAGE: u32 = 10;
}

/// Column values for a news item that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Validated create payload.
#[derive(Debug)]
pub struct NewsDraft {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<Upload>,
}

impl NewsDraft {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(mut form: Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let title = validation::required_text(&form, &mut errors, "title", Some(MAX_STRING));
        let description = validation::optional_text(&form, &mut errors, "description", None);
        let image = validation::optional_image(&mut form, &mut errors, "image");

        errors.finish(|| Self {
            title: title.unwrap_or_default(),
            description: description.flatten(),
            image,
        })
    }
}

/// Validated partial update: only the fields that were sent are changed.
#[derive(Debug, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image: Option<Upload>,
}

impl NewsPatch {
    /// Validate a submitted form. `title`, when sent, must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(mut form: Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let title = validation::sometimes_text(&form, &mut errors, "title", Some(MAX_STRING));
        let description = validation::optional_text(&form, &mut errors, "description", None);
        let image = validation::optional_image(&mut form, &mut errors, "image");

        errors.finish(|| Self {
            title,
            description,
            image,
        })
    }

    /// Apply the text changes to `news`. The image is handled by the caller.
    pub fn apply_text(&mut self, news: &mut News) {
        if let Some(title) = self.title.take() {
            news.title = title;
        }
        if let Some(description) = self.description.take() {
            news.description = description;
        }
    }
}
