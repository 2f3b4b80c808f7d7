//! Defensive decoding of a collection's JSON documents.
//!
//! Nothing in here fails. A document that is missing, is not JSON, or has
//! the wrong shape decodes to `None` (logged at debug level) and the rest
//! of the batch carries on.

use std::borrow::Cow;
use std::collections::BTreeMap;

use armory_collection_models::{DateData, Payload, PersonData, RawCollection};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Weapon ID to stored count, before coercion.
pub type WeaponCounts = BTreeMap<String, Value>;

/// Returns the JSON document held by `payload`. Already-parsed documents
/// are passed through unchanged.
#[must_use]
pub fn parse_value<'a>(payload: &'a Payload, field: &str, id: &str) -> Option<Cow<'a, Value>> {
    payload
        .value()
        .inspect_err(|e| log::debug!("Collection {id}: ignoring {field}: {e}"))
        .ok()
}

fn decode<T: DeserializeOwned>(payload: &Payload, field: &str, id: &str) -> Option<T> {
    payload
        .decode()
        .inspect_err(|e| log::debug!("Collection {id}: ignoring {field}: {e}"))
        .ok()
}

/// Decodes the weapon-count map of a collection.
#[must_use]
pub fn parse_weapons(collection: &RawCollection) -> Option<WeaponCounts> {
    decode(&collection.weapons, "weapons", &collection.id)
}

/// Decodes the person document of a collection.
#[must_use]
pub fn parse_person(collection: &RawCollection) -> Option<PersonData> {
    decode(&collection.person, "person", &collection.id)
}

/// Decodes the date document of a collection.
#[must_use]
pub fn parse_date(collection: &RawCollection) -> Option<DateData> {
    decode(&collection.date, "date", &collection.id)
}

/// Coerces a stored count to an integer.
///
/// Integers pass through, finite floats truncate toward zero, numeric
/// strings are parsed after trimming, and `true` counts as 1. Everything
/// else, including non-numeric strings, counts as 0.
#[must_use]
pub fn coerce_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)).unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// Sums every count in a weapon-count map, whether or not the weapon is
/// known to the catalog. Saturates at the `i64` bounds.
#[must_use]
pub fn total_count(counts: &WeaponCounts) -> i64 {
    saturating_sum(counts.values().map(coerce_count))
}

/// Adds counts, clamping at the `i64` bounds instead of overflowing.
#[must_use]
pub fn saturating_sum(counts: impl IntoIterator<Item = i64>) -> i64 {
    counts.into_iter().fold(0, i64::saturating_add)
}
