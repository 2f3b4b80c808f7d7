#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report result types produced by the collection reporting engine.
//!
//! All of these are rebuilt for every request and serialized straight to
//! JSON; none of them is ever persisted.

use std::collections::BTreeMap;

use armory_collection_models::{DateData, PersonData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Order in which weapon categories are emitted in a collection table.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategoryOrder {
    /// Order in which categories are first reached while scanning the
    /// weapon catalog.
    #[default]
    Insertion,
    /// Alphabetical by category name.
    Name,
}

/// Knobs for building a collection table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportOptions {
    /// Load only enabled weapons and categories into the catalog.
    pub enabled_weapons_only: bool,
    /// Ordering of the emitted weapon categories.
    pub category_order: CategoryOrder,
}

/// One weapon line of an enriched collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedWeapon {
    /// Weapon ID.
    pub id: String,
    /// Weapon name.
    pub name: String,
    /// Weapon category ID.
    pub category_id: String,
    /// Weapon category name, if the category is in the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Number of weapons of this type in the collection.
    pub count: i64,
}

/// A collection record joined with its catalog names and decoded
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCollection {
    /// Collection ID.
    pub id: String,
    /// When the collection was recorded.
    pub created_at: DateTime<Utc>,
    /// Areal category ID.
    pub areal_category_id: Option<String>,
    /// Areal ID.
    pub areal_id: Option<String>,
    /// Areal category name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areal_category_name: Option<String>,
    /// Areal name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areal_name: Option<String>,
    /// Kind of user that performed the collection.
    pub user_type: Option<String>,
    /// Collector PIN.
    pub pin: Option<String>,
    /// The decoded weapons document as stored (`null` if unreadable).
    pub weapons_raw: serde_json::Value,
    /// Catalog-resolved weapon lines keyed by weapon ID.
    pub weapons: BTreeMap<String, EnrichedWeapon>,
    /// Sum of the counts in [`Self::weapons`].
    pub weapon_sum: i64,
    /// Decoded person document.
    pub person_data: Option<PersonData>,
    /// Decoded date document.
    pub date_data: Option<DateData>,
}

/// A weapon listed under a [`CategorySummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChild {
    /// Weapon ID.
    pub id: String,
    /// Weapon name.
    pub name: String,
}

/// A weapon category column of the collection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Category ID.
    pub id: String,
    /// Category name.
    pub name: String,
    /// Count of this category's weapons across every reported collection.
    pub total: i64,
    /// Weapons of this category that occur in at least one collection.
    pub children: Vec<CategoryChild>,
}

/// Footer totals of a collection table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    /// Number of reported collections.
    pub total_collections: u64,
    /// Sum of every collection's `weaponSum`.
    pub total_weapons: i64,
    /// Distinct areal categories referenced by the collections.
    pub areal_categories: u64,
    /// Distinct areals referenced by the collections.
    pub areals: u64,
}

/// A complete collection table report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTable {
    /// Enriched rows, oldest first.
    pub collections: Vec<EnrichedCollection>,
    /// Category columns with totals.
    pub weapon_categories: Vec<CategorySummary>,
    /// Footer totals.
    pub summary: TableSummary,
}

/// Aggregate statistics over a set of collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    /// Number of collections.
    pub total_collections: u64,
    /// Sum of every count in every weapons document, catalog or not.
    pub total_weapons: i64,
    /// Collections per user type.
    pub by_user_type: BTreeMap<String, u64>,
    /// Collections per `YYYY-MM` month of the collection date.
    pub by_month: BTreeMap<String, u64>,
    /// Collections per areal ID.
    pub by_areal: BTreeMap<String, u64>,
    /// Collections per responsible person.
    pub by_responsible: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn category_order_parses_lowercase() {
        assert_eq!(CategoryOrder::from_str("name").unwrap(), CategoryOrder::Name);
        assert_eq!(CategoryOrder::Insertion.to_string(), "insertion");
        assert!(CategoryOrder::from_str("code").is_err());
    }

    #[test]
    fn options_default_when_fields_missing() {
        let options: ReportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ReportOptions::default());
        assert_eq!(options.category_order, CategoryOrder::Insertion);
    }

    #[test]
    fn unknown_names_are_omitted_from_json() {
        let weapon = EnrichedWeapon {
            id: "w1".to_string(),
            name: "M70".to_string(),
            category_id: "C1".to_string(),
            category_name: None,
            count: 2,
        };
        let json = serde_json::to_value(&weapon).unwrap();
        assert!(json.get("categoryName").is_none());
        assert_eq!(json["categoryId"], "C1");
    }
}
