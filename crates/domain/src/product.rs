//! Product: merchandise sold at the front desk.

use serde::{Deserialize, Serialize};

use crate::error::{GymHubError, ValidationErrors};
use crate::form::{Form, Upload};
use crate::id::ProductId;
use crate::time::Timestamp;
use crate::validation::{self, MAX_STRING};

/// A product with up to [`Product::MAX_IMAGES`] pictures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub color: Option<String>,
    pub composition: Option<String>,
    /// Ordered image paths on the public disk.
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub const STORAGE_DIR: &'static str = "products";
    pub const PER_PAGE: u32 = 10;
    pub const MAX_IMAGES: usize = 3;
    pub const MAX_COLOR: usize = 50;
}

/// Column values for a product that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub color: Option<String>,
    pub composition: Option<String>,
    pub images: Vec<String>,
}

/// Validated create/update payload.
///
/// The nullable text fields use a double `Option`: the outer one is `None`
/// when the field was not sent (an update keeps the stored value), the
/// inner one is `None` when it was sent blank (the value is cleared).
#[derive(Debug)]
pub struct ProductDraft {
    pub title: String,
    pub description: Option<Option<String>>,
    pub price: f64,
    pub color: Option<Option<String>>,
    pub composition: Option<Option<String>>,
    /// Replacement images; `None` keeps the stored ones.
    pub images: Option<Vec<Upload>>,
}

impl ProductDraft {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] listing every invalid field.
    pub fn from_form(mut form: Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let title = validation::required_text(&form, &mut errors, "title", Some(MAX_STRING));
        let description = validation::optional_text(&form, &mut errors, "description", None);
        let price = validation::price(&form, &mut errors, "price");
        let color =
            validation::optional_text(&form, &mut errors, "color", Some(Product::MAX_COLOR));
        let composition =
            validation::optional_text(&form, &mut errors, "composition", Some(MAX_STRING));
        let images = validation::image_list(&mut form, &mut errors, "images", Product::MAX_IMAGES);

        errors.finish(|| Self {
            title: title.unwrap_or_default(),
            description,
            price: price.unwrap_or_default(),
            color,
            composition,
            images,
        })
    }
}

/// Listing filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub title: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Parse filters from query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GymHubError::Validation`] when a price bound is malformed.
    pub fn from_form(form: &Form) -> Result<Self, GymHubError> {
        let mut errors = ValidationErrors::new();
        let min_price = validation::optional_number(form, &mut errors, "min_price");
        let max_price = validation::optional_number(form, &mut errors, "max_price");

        errors.finish(|| Self {
            title: form.value("title").map(str::to_string),
            min_price,
            max_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> Form {
        Form::from_pairs([("title", "Shaker"), ("price", "9.99")])
    }

    #[test]
    fn should_build_draft_with_only_required_fields() {
        let draft = ProductDraft::from_form(valid_form()).unwrap();
        assert_eq!(draft.title, "Shaker");
        assert_eq!(draft.description, None);
        assert_eq!(draft.color, None);
        assert!(draft.images.is_none());
    }

    #[test]
    fn should_reject_long_color() {
        let mut form = valid_form();
        form.push_text("color", "x".repeat(51));
        assert!(matches!(
            ProductDraft::from_form(form),
            Err(GymHubError::Validation(errors)) if errors.contains("color")
        ));
    }

    #[test]
    fn should_mark_blank_optional_fields_as_cleared() {
        let mut form = valid_form();
        form.push_text("composition", "");
        let draft = ProductDraft::from_form(form).unwrap();
        assert_eq!(draft.composition, Some(None));
    }

    #[test]
    fn should_reject_more_than_three_images() {
        let mut form = valid_form();
        for i in 0..4 {
            form.push_file("images[]", Upload::new(format!("{i}.png"), None, vec![1]));
        }
        assert!(matches!(
            ProductDraft::from_form(form),
            Err(GymHubError::Validation(errors)) if errors.contains("images")
        ));
    }

    #[test]
    fn should_require_price() {
        let form = Form::from_pairs([("title", "Towel")]);
        assert!(matches!(
            ProductDraft::from_form(form),
            Err(GymHubError::Validation(errors)) if errors.contains("price") && !errors.contains("title")
        ));
    }

    #[test]
    fn should_parse_price_range_filter() {
        let form = Form::from_pairs([("min_price", "10"), ("max_price", "50")]);
        let filter = ProductFilter::from_form(&form).unwrap();
        assert_eq!(filter.min_price, Some(10.0));
        assert_eq!(filter.max_price, Some(50.0));
        assert_eq!(filter.title, None);
    }
}
