//! Framework-agnostic representation of a write payload.
//!
//! A [`Form`] holds text values and uploaded files keyed by field name,
//! whatever the wire encoding was (JSON, multipart, url-encoded, query
//! string). Validation schemas only ever look at a [`Form`].

use std::collections::BTreeMap;

use serde_json::Value;

/// A file received in a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied file name, used only for its extension.
    pub file_name: String,
    /// Declared `Content-Type` of the part, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension of the client file name.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Text values and files keyed by normalized field name.
#[derive(Debug, Default, Clone)]
pub struct Form {
    text: BTreeMap<String, Vec<String>>,
    files: BTreeMap<String, Vec<Upload>>,
}

/// Strip list suffixes: `trainers[]` and `images[0]` both become their base name.
fn normalize(name: &str) -> &str {
    match name.find('[') {
        Some(idx) if name.ends_with(']') && idx > 0 => &name[..idx],
        _ => name,
    }
}

impl Form {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from `key=value` pairs (query strings, url-encoded bodies).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            form.push_text(key.as_ref(), value);
        }
        form
    }

    /// Build a form from a JSON object body.
    ///
    /// Scalars become single values and arrays become multi-values. A `null`
    /// field is skipped as if it were absent.
    ///
    /// # Errors
    ///
    /// Returns the JSON value back when it is not an object.
    pub fn from_json(value: Value) -> Result<Self, Value> {
        let Value::Object(map) = value else {
            return Err(value);
        };

        let mut form = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    form.mark_present(&key);
                    for item in items {
                        if let Some(text) = scalar_to_text(item) {
                            form.push_text(&key, text);
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_to_text(other) {
                        form.push_text(&key, text);
                    }
                }
            }
        }
        Ok(form)
    }

    /// Append a text value to `name`.
    pub fn push_text(&mut self, name: &str, value: impl Into<String>) {
        self.text
            .entry(normalize(name).to_string())
            .or_default()
            .push(value.into());
    }

    /// Append an uploaded file to `name`.
    pub fn push_file(&mut self, name: &str, upload: Upload) {
        self.files
            .entry(normalize(name).to_string())
            .or_default()
            .push(upload);
    }

    /// Record that `name` was sent without any value (e.g. `[]`).
    pub fn mark_present(&mut self, name: &str) {
        self.text.entry(normalize(name).to_string()).or_default();
    }

    /// Whether the field was sent at all, even empty.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.text.contains_key(name) || self.files.contains_key(name)
    }

    /// First non-blank text value, trimmed.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).into_iter().next()
    }

    /// Every non-blank text value, trimmed, in submission order.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.text
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn files(&self, name: &str) -> &[Upload] {
        self.files.get(name).map_or(&[], Vec::as_slice)
    }

    /// Remove and return the files uploaded under `name`.
    pub fn take_files(&mut self, name: &str) -> Vec<Upload> {
        self.files.remove(name).unwrap_or_default()
    }
}

fn scalar_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
