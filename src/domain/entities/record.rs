use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::entities::draft::{Draft, FieldErrors};

pub const TIMESTAMP_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Timestamp,
    Enum(&'static [&'static str]),
}

impl FieldKind {
    /// Enumerated and boolean attributes are picked from a fixed set and
    /// filter on exact equality.
    pub fn matches_exactly(&self) -> bool {
        matches!(self, FieldKind::Enum(_) | FieldKind::Bool)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub editable: bool,
    pub required: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            editable: true,
            required: false,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn read_only(self) -> Self {
        Self {
            editable: false,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Number(value) => format_number(*value),
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Timestamp(value) => value.format(TIMESTAMP_DISPLAY_FORMAT).to_string(),
        }
    }

    /// String form accepted back by the draft parsers.
    pub fn input_value(&self) -> String {
        match self {
            FieldValue::Timestamp(value) => value.format(TIMESTAMP_INPUT_FORMAT).to_string(),
            other => other.display(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Alphabetic comparison that ignores accents and case, so "Émile" sorts
/// between "adam" and "Zoe". Accent, then case, then codepoint break ties so
/// the order is total and independent of input order.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ascending order of two attribute values. Missing values sort last.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (FieldValue::Text(a), FieldValue::Text(b)) => collate(a, b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (a, b) => collate(&a.display(), &b.display()),
        },
    }
}

pub fn matches_filter(value: Option<&FieldValue>, kind: FieldKind, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    match (kind, value) {
        // Numbers are identifiers as often as quantities: `1` must not match 10.
        (FieldKind::Number, FieldValue::Number(number)) => needle
            .parse::<f64>()
            .is_ok_and(|wanted| wanted == *number),
        _ if kind.matches_exactly() => value.display() == needle,
        _ => value
            .display()
            .to_lowercase()
            .contains(&needle.to_lowercase()),
    }
}

/// One application entity with a schema fixed at compile time.
///
/// Screens instantiate the CRUD contract with their own `Record` type; the
/// repositories, the query pipeline and the table state are generic over it.
pub trait Record: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {
    type Id: Clone + PartialEq + Eq + Hash + Debug + Display + FromStr + Serialize + DeserializeOwned + 'static;
    /// Attribute map sent on create and update, without the identifier.
    type Payload: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static;

    /// Collection path segment, e.g. `users`.
    const RESOURCE: &'static str;
    const ID_FIELD: &'static str;
    const LABEL: &'static str;

    fn schema() -> &'static [FieldDef];

    fn id(&self) -> Self::Id;

    fn value(&self, field: &str) -> Option<FieldValue>;

    fn payload_from_draft(draft: &Draft) -> Result<Self::Payload, FieldErrors>;

    /// Builds the stored record for `id`. `existing` is the record being
    /// replaced on update, so server-owned attributes can be carried over.
    fn from_payload(id: Self::Id, payload: Self::Payload, existing: Option<&Self>) -> Self;

    /// Identifier for a newly created record, given everything stored so far.
    fn next_id(existing: &[Self]) -> Self::Id;

    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::schema().iter().find(|field| field.name == name)
    }

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::default();
        for field in Self::schema().iter().filter(|field| field.editable) {
            let value = self
                .value(field.name)
                .map(|value| value.input_value())
                .unwrap_or_default();
            draft.set(field.name, value);
        }
        draft
    }
}
