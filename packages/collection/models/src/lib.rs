#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Collection record types as stored by the tracking application.
//!
//! A collection binds one pickup/drop-off event at an areal to a set of
//! weapon counts. Three of its fields (`weapons`, `person`, `date`) are
//! semi-structured JSON documents that may have been written as text, as
//! already-deserialized objects, or not at all. They are modelled as
//! [`Payload`] so every consumer has to decide what to do with each shape.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A semi-structured JSON field of a collection record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Payload {
    /// Serialized JSON text that still has to be parsed.
    Raw(String),
    /// A document that was stored already deserialized.
    Parsed(Value),
    /// Absent, `null`, or a scalar that cannot hold a document.
    #[default]
    Invalid,
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Raw(text),
            Value::Object(_) | Value::Array(_) => Self::Parsed(value),
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Invalid,
        }
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Raw(text) => Self::String(text),
            Payload::Parsed(value) => value,
            Payload::Invalid => Self::Null,
        }
    }
}

/// Why a [`Payload`] could not be decoded.
#[derive(Debug)]
pub enum PayloadError {
    /// The field held no document at all.
    Missing,
    /// The raw text was not valid JSON.
    Syntax(serde_json::Error),
    /// The JSON did not have the expected shape.
    Shape(serde_json::Error),
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "payload is missing"),
            Self::Syntax(e) => write!(f, "payload is not valid JSON: {e}"),
            Self::Shape(e) => write!(f, "payload has an unexpected shape: {e}"),
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing => None,
            Self::Syntax(e) | Self::Shape(e) => Some(e),
        }
    }
}

impl Payload {
    /// Returns the JSON document, parsing raw text if needed. Already
    /// parsed documents are borrowed unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Missing`] for [`Payload::Invalid`] and
    /// [`PayloadError::Syntax`] if raw text is not valid JSON.
    pub fn value(&self) -> Result<Cow<'_, Value>, PayloadError> {
        match self {
            Self::Raw(text) => serde_json::from_str(text)
                .map(Cow::Owned)
                .map_err(PayloadError::Syntax),
            Self::Parsed(value) => Ok(Cow::Borrowed(value)),
            Self::Invalid => Err(PayloadError::Missing),
        }
    }

    /// Decodes the document into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the payload is missing, is not valid
    /// JSON, or does not match the shape of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        match self.value()? {
            Cow::Borrowed(value) => T::deserialize(value).map_err(PayloadError::Shape),
            Cow::Owned(value) => serde_json::from_value(value).map_err(PayloadError::Shape),
        }
    }
}

/// A collection record as returned by the collection repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollection {
    /// Primary key.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Areal where the collection took place.
    #[serde(default)]
    pub areal_id: Option<String>,
    /// Category of that areal.
    #[serde(default)]
    pub areal_category_id: Option<String>,
    /// Kind of user that performed the collection.
    #[serde(default)]
    pub user_type: Option<String>,
    /// Personal identification number of the collector.
    #[serde(default)]
    pub pin: Option<String>,
    /// Map of weapon ID to count.
    #[serde(default)]
    pub weapons: Payload,
    /// Collector and responsible-party details.
    #[serde(default)]
    pub person: Payload,
    /// Collection date and time windows.
    #[serde(default)]
    pub date: Payload,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Accepts strings and numbers as text; anything else becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// The decoded `person` document of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonData {
    /// First name of the collector.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Last name of the collector.
    #[serde(default, deserialize_with = "lenient_string")]
    pub surname: Option<String>,
    /// Organizational unit.
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    /// Name of the responsible person.
    #[serde(default, deserialize_with = "lenient_string")]
    pub responsible: Option<String>,
    /// Contact phone number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    /// Fields not known to this version.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The decoded `date` document of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateData {
    /// Collection date, usually `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    /// Start of the time window.
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    /// End of the time window.
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    /// Fields not known to this version.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters applied by the collection repository before the engine sees
/// any records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilter {
    /// Exact collector PIN.
    pub pin: Option<String>,
    /// Exact areal ID.
    pub areal_id: Option<String>,
    /// Exact areal category ID.
    pub areal_category_id: Option<String>,
    /// Exact user type.
    pub user_type: Option<String>,
    /// Calendar year of `createdAt`.
    pub year: Option<i32>,
    /// Earliest `createdAt` date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest `createdAt` date (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of the collector's name or surname.
    pub person: Option<String>,
    /// Case-insensitive substring of the responsible person.
    pub responsible: Option<String>,
    /// Case-insensitive substring of the unit.
    pub unit: Option<String>,
}

impl CollectionFilter {
    /// Returns `true` if any of the person-document filters is set.
    #[must_use]
    pub const fn filters_person(&self) -> bool {
        self.person.is_some() || self.responsible.is_some() || self.unit.is_some()
    }
}
