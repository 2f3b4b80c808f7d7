//! Multi-dimensional rollups over raw collection records.
//!
//! Every dimension is computed independently: a collection whose date
//! document is unreadable is still counted by user type, areal, and
//! responsible person.

use std::collections::BTreeMap;

use armory_analytics_models::StatisticsResult;
use armory_collection_models::RawCollection;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::payload::{parse_date, parse_person, parse_weapons, total_count};

/// Aggregates statistics over `collections`.
#[must_use]
pub fn aggregate_statistics(collections: &[RawCollection]) -> StatisticsResult {
    let mut result = StatisticsResult {
        total_collections: collections.len() as u64,
        ..StatisticsResult::default()
    };

    for collection in collections {
        if let Some(counts) = parse_weapons(collection) {
            result.total_weapons = result.total_weapons.saturating_add(total_count(&counts));
        }

        bump(&mut result.by_user_type, collection.user_type.as_deref());
        bump(&mut result.by_areal, collection.areal_id.as_deref());

        let month = parse_date(collection)
            .and_then(|d| d.date)
            .and_then(|d| month_key(&d));
        bump(&mut result.by_month, month.as_deref());

        let responsible = parse_person(collection).and_then(|p| p.responsible);
        bump(&mut result.by_responsible, responsible.as_deref());
    }

    result
}

/// Keys are trimmed; blank keys are not counted.
fn bump(counts: &mut BTreeMap<String, u64>, key: Option<&str>) {
    if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
        *counts.entry(key.to_string()).or_default() += 1;
    }
}

/// Truncates an ISO 8601 date or datetime to its `YYYY-MM` month.
#[must_use]
pub fn month_key(s: &str) -> Option<String> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })?;
    Some(date.format("%Y-%m").to_string())
}
