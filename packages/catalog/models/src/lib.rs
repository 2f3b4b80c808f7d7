#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference catalog types for weapons and areals.
//!
//! These are the per-tenant lookup entities that collection records point
//! at by id. They are loaded fresh for every report and never mutated by
//! the aggregation engine.

use serde::{Deserialize, Serialize};

const fn enabled_by_default() -> bool {
    true
}

/// A single weapon type that can be counted in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponCatalogEntry {
    /// Unique weapon ID within the tenant.
    pub id: String,
    /// Display name.
    pub name: String,
    /// ID of the [`WeaponCategoryCatalogEntry`] this weapon belongs to.
    pub category_id: String,
    /// Whether the weapon is still offered for new collections.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// A grouping of weapons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponCategoryCatalogEntry {
    /// Unique category ID within the tenant.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the category is still offered for new collections.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// A physical location where weapons are picked up or dropped off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArealCatalogEntry {
    /// Unique areal ID within the tenant.
    pub id: String,
    /// Display name.
    pub name: String,
    /// ID of the owning [`ArealCategoryCatalogEntry`].
    pub category_id: String,
}

/// A grouping of areals, listed together with the areals it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArealCategoryCatalogEntry {
    /// Unique areal category ID within the tenant.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short code used on printed reports.
    #[serde(default)]
    pub code: String,
    /// Areals belonging to this category.
    #[serde(default)]
    pub areas: Vec<ArealCatalogEntry>,
}
