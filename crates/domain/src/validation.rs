//! Reusable field-type validators.
//!
//! Every validator reads one field from a [`Form`], records any violation
//! in a shared [`ValidationErrors`] and returns the parsed value when the
//! field is valid. Entity schemas call several validators in a row and then
//! [`ValidationErrors::finish`] so all violations are reported at once.

use std::str::FromStr;

use crate::error::ValidationErrors;
use crate::form::{Form, Upload};

/// Maximum accepted size of a single image upload (2048 KiB).
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// File extensions accepted as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "svg", "webp"];

/// Default length cap for short text columns.
pub const MAX_STRING: usize = 255;

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn check_max(errors: &mut ValidationErrors, field: &str, value: &str, max: Option<usize>) -> bool {
    match max {
        Some(max) if value.chars().count() > max => {
            errors.add(
                field,
                format!(
                    "The {} may not be greater than {max} characters.",
                    label(field)
                ),
            );
            false
        }
        _ => true,
    }
}

/// A non-blank string of at most `max` characters.
pub fn required_text(
    form: &Form,
    errors: &mut ValidationErrors,
    field: &str,
    max: Option<usize>,
) -> Option<String> {
    let Some(value) = form.value(field) else {
        errors.add(field, format!("The {} field is required.", label(field)));
        return None;
    };
    check_max(errors, field, value, max).then(|| value.to_string())
}

/// A nullable string.
///
/// The outer `Option` tells whether the field was sent at all; the inner one
/// is `None` when it was sent blank.
pub fn optional_text(
    form: &Form,
    errors: &mut ValidationErrors,
    field: &str,
    max: Option<usize>,
) -> Option<Option<String>> {
    if !form.has(field) {
        return None;
    }
    match form.value(field) {
        None => Some(None),
        Some(value) => {
            check_max(errors, field, value, max);
            Some(Some(value.to_string()))
        }
    }
}

/// A `title` that is validated only when present.
pub fn sometimes_text(
    form: &Form,
    errors: &mut ValidationErrors,
    field: &str,
    max: Option<usize>,
) -> Option<String> {
    if !form.has(field) {
        return None;
    }
    required_text(form, errors, field, max)
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A required, finite number greater than or equal to zero.
pub fn price(form: &Form, errors: &mut ValidationErrors, field: &str) -> Option<f64> {
    let Some(value) = form.value(field) else {
        errors.add(field, format!("The {} field is required.", label(field)));
        return None;
    };
    let Some(number) = parse_number(value) else {
        errors.add(field, format!("The {} must be a number.", label(field)));
        return None;
    };
    if number < 0.0 {
        errors.add(field, format!("The {} must be at least 0.", label(field)));
        return None;
    }
    Some(number)
}

/// An optional number, used by listing filters.
pub fn optional_number(form: &Form, errors: &mut ValidationErrors, field: &str) -> Option<f64> {
    let value = form.value(field)?;
    let number = parse_number(value);
    if number.is_none() {
        errors.add(field, format!("The {} must be a number.", label(field)));
    }
    number
}

/// An optional integer-like value such as a foreign id or a count.
pub fn optional_integer<T: FromStr>(
    form: &Form,
    errors: &mut ValidationErrors,
    field: &str,
) -> Option<T> {
    let value = form.value(field)?;
    let parsed = value.parse::<T>().ok();
    if parsed.is_none() {
        errors.add(field, format!("The {} must be an integer.", label(field)));
    }
    parsed
}

/// A list of ids. `None` when the field was not sent at all.
///
/// Duplicates are dropped, first occurrence wins.
pub fn id_list<T>(form: &Form, errors: &mut ValidationErrors, field: &str) -> Option<Vec<T>>
where
    T: FromStr + PartialEq,
{
    if !form.has(field) {
        return None;
    }

    let mut ids = Vec::new();
    let mut invalid = false;
    for raw in form.values(field) {
        match raw.parse::<T>() {
            Ok(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            Err(_) => invalid = true,
        }
    }

    if invalid {
        errors.add(field, format!("The selected {} are invalid.", label(field)));
        return None;
    }
    Some(ids)
}

/// A boolean flag that must be `true`.
pub fn accepted(form: &Form, errors: &mut ValidationErrors, field: &str) -> bool {
    let Some(value) = form.value(field) else {
        errors.add(field, format!("The {} field is required.", label(field)));
        return false;
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => true,
        "0" | "false" | "off" | "no" => {
            errors.add(field, format!("The {} must be accepted.", label(field)));
            false
        }
        _ => {
            errors.add(
                field,
                format!("The {} field must be true or false.", label(field)),
            );
            false
        }
    }
}

/// A syntactically valid e-mail address.
pub fn email(form: &Form, errors: &mut ValidationErrors, field: &str) -> Option<String> {
    let value = required_text(form, errors, field, Some(MAX_STRING))?;
    if is_email(&value) {
        Some(value)
    } else {
        errors.add(
            field,
            format!("The {} must be a valid email address.", label(field)),
        );
        None
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn check_image(errors: &mut ValidationErrors, field: &str, upload: &Upload) -> bool {
    let extension_ok = upload
        .extension()
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
    let content_type_ok = upload
        .content_type
        .as_deref()
        .is_none_or(|ct| ct.starts_with("image/"));

    if !extension_ok || !content_type_ok {
        errors.add(field, format!("The {} must be an image.", label(field)));
        return false;
    }
    if upload.size() > MAX_IMAGE_BYTES {
        errors.add(
            field,
            format!(
                "The {} may not be greater than {} kilobytes.",
                label(field),
                MAX_IMAGE_BYTES / 1024
            ),
        );
        return false;
    }
    true
}

/// An optional single image upload.
///
/// Non-blank text sent under an image field is rejected.
pub fn optional_image(
    form: &mut Form,
    errors: &mut ValidationErrors,
    field: &str,
) -> Option<Upload> {
    let mut files = form.take_files(field);
    if files.is_empty() {
        if form.value(field).is_some() {
            errors.add(field, format!("The {} must be an image.", label(field)));
        }
        return None;
    }
    if files.len() > 1 {
        errors.add(field, format!("The {} must be a single file.", label(field)));
        return None;
    }
    let upload = files.remove(0);
    check_image(errors, field, &upload).then_some(upload)
}

/// An optional list of at most `max_items` images. `None` when none were sent.
pub fn image_list(
    form: &mut Form,
    errors: &mut ValidationErrors,
    field: &str,
    max_items: usize,
) -> Option<Vec<Upload>> {
    let files = form.take_files(field);
    if files.is_empty() {
        if form.value(field).is_some() {
            errors.add(field, format!("The {} must be images.", label(field)));
        }
        return None;
    }
    if files.len() > max_items {
        errors.add(
            field,
            format!(
                "The {} may not have more than {max_items} items.",
                label(field)
            ),
        );
        return None;
    }

    let mut all_valid = true;
    for upload in &files {
        all_valid &= check_image(errors, field, upload);
    }
    all_valid.then_some(files)
}
