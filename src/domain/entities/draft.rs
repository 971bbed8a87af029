use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::entities::record::{FieldKind, Record};

/// In-progress create/edit form state for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<String, String>,
}

impl Draft {
    /// Empty form for `R`: required enumerated fields start on their first
    /// option, optional ones blank.
    pub fn blank_for<R: Record>() -> Self {
        let mut draft = Draft::default();
        for field in R::schema().iter().filter(|field| field.editable) {
            let initial = match field.kind {
                FieldKind::Enum(options) if field.required => {
                    options.first().copied().unwrap_or_default()
                }
                _ => "",
            };
            draft.set(field.name, initial);
        }
        draft
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }
}

/// Client-side validation failures, keyed by field. Attached to a draft and
/// never sent to a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// Reads typed values out of a draft, collecting every failure instead of
/// stopping at the first one.
pub struct DraftReader<'a> {
    draft: &'a Draft,
    errors: FieldErrors,
}

impl<'a> DraftReader<'a> {
    pub fn new(draft: &'a Draft) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
        }
    }

    pub fn text(&mut self, field: &str) -> String {
        self.draft.get(field).trim().to_string()
    }

    pub fn required_text(&mut self, field: &str) -> String {
        let value = self.text(field);
        if value.is_empty() {
            self.errors.insert(field, "is required");
        }
        value
    }

    pub fn integer(&mut self, field: &str) -> i64 {
        let raw = self.text(field);
        if raw.is_empty() {
            self.errors.insert(field, "is required");
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.errors.insert(field, "must be a whole number");
                0
            }
        }
    }

    pub fn number(&mut self, field: &str) -> f64 {
        let raw = self.text(field);
        if raw.is_empty() {
            self.errors.insert(field, "is required");
            return 0.0;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.errors.insert(field, "must be a number");
                0.0
            }
        }
    }

    /// Like [`DraftReader::integer`], but a blank value means `default`.
    pub fn integer_or(&mut self, field: &str, default: i64) -> i64 {
        if self.text(field).is_empty() {
            return default;
        }
        self.integer(field)
    }

    pub fn number_or(&mut self, field: &str, default: f64) -> f64 {
        if self.text(field).is_empty() {
            return default;
        }
        self.number(field)
    }

    pub fn timestamp(&mut self, field: &str) -> Option<NaiveDateTime> {
        let raw = self.text(field);
        if raw.is_empty() {
            self.errors.insert(field, "is required");
            return None;
        }
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            self.errors.insert(field, "must be a date and time");
        }
        parsed
    }

    pub fn choice(&mut self, field: &str, options: &[&str]) -> String {
        let value = self.optional_choice(field, options);
        if value.is_empty() {
            self.errors.insert(field, "is required");
        }
        value
    }

    /// Like `choice`, but blank is accepted.
    pub fn optional_choice(&mut self, field: &str, options: &[&str]) -> String {
        let value = self.text(field);
        if !value.is_empty() && !options.contains(&value.as_str()) {
            self.errors
                .insert(field, format!("must be one of {}", options.join(", ")));
        }
        value
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field, message);
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Accepts `datetime-local` input (with or without seconds), a space
/// separated form, and RFC 3339 with an offset (normalised to UTC).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|value| value.naive_utc())
        })
}
