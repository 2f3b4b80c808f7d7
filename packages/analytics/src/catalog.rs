//! Per-request reference catalog.
//!
//! The catalog is an immutable snapshot of a tenant's weapons, weapon
//! categories, areal categories, and areals. Each table keeps the order
//! the repository returned it in and is indexed by ID.

use std::collections::{BTreeMap, BTreeSet};

use armory_catalog_models::{
    ArealCatalogEntry, ArealCategoryCatalogEntry, WeaponCatalogEntry, WeaponCategoryCatalogEntry,
};
use armory_database::{ArealRepository, WeaponRepository};

use crate::AnalyticsError;

/// Catalog entries addressable by ID.
pub trait Keyed {
    /// The entry's ID.
    fn key(&self) -> &str;
}

impl Keyed for WeaponCatalogEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for WeaponCategoryCatalogEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ArealCatalogEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ArealCategoryCatalogEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

/// An ordered, ID-indexed table of catalog entries.
///
/// When an ID occurs more than once, the first entry wins.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    entries: Vec<T>,
    index: BTreeMap<String, usize>,
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<T: Keyed> Lookup<T> {
    /// Looks up an entry by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Returns `true` if an entry with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn push(&mut self, entry: T) {
        if self.index.contains_key(entry.key()) {
            log::debug!("Duplicate catalog id {}, keeping the first entry", entry.key());
            return;
        }
        self.index.insert(entry.key().to_string(), self.entries.len());
        self.entries.push(entry);
    }
}

impl<T> Lookup<T> {
    /// Iterates entries in repository order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Keyed> FromIterator<T> for Lookup<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut lookup = Self::default();
        for entry in iter {
            lookup.push(entry);
        }
        lookup
    }
}

impl<T: Keyed> Extend<T> for Lookup<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry);
        }
    }
}

/// A tenant's reference data, built once per report.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Weapons by ID.
    pub weapons: Lookup<WeaponCatalogEntry>,
    /// Weapon categories by ID.
    pub weapon_categories: Lookup<WeaponCategoryCatalogEntry>,
    /// Areal categories (with their areals) by ID.
    pub areal_categories: Lookup<ArealCategoryCatalogEntry>,
    /// Areals by ID, flattened out of the areal categories.
    pub areals: Lookup<ArealCatalogEntry>,
}

impl Catalog {
    /// Assembles a catalog from repository listings.
    #[must_use]
    pub fn from_parts(
        weapons: Vec<WeaponCatalogEntry>,
        weapon_categories: Vec<WeaponCategoryCatalogEntry>,
        areal_categories: Vec<ArealCategoryCatalogEntry>,
    ) -> Self {
        let areals = areal_categories
            .iter()
            .flat_map(|c| c.areas.iter().cloned())
            .collect();

        Self {
            weapons: weapons.into_iter().collect(),
            weapon_categories: weapon_categories.into_iter().collect(),
            areal_categories: areal_categories.into_iter().collect(),
            areals,
        }
    }

    /// Category IDs referenced by a weapon but missing from the category
    /// table, in first-reference order.
    fn dangling_category_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.weapons
            .iter()
            .map(|w| w.category_id.as_str())
            .filter(|id| !self.weapon_categories.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect()
    }
}

/// Loads the reference catalog for `tenant_id`.
///
/// With `enabled_only`, disabled weapons and categories are left out of the
/// listings. Categories that are still referenced by a loaded weapon are
/// then fetched individually so every loaded weapon can be named.
///
/// # Errors
///
/// Returns [`AnalyticsError::Database`] if any repository read fails.
pub async fn load_catalog(
    weapon_repo: &dyn WeaponRepository,
    areal_repo: &dyn ArealRepository,
    tenant_id: &str,
    enabled_only: bool,
) -> Result<Catalog, AnalyticsError> {
    let enabled = enabled_only.then_some(true);

    let (weapons, categories, areal_categories) = tokio::try_join!(
        weapon_repo.list_weapons(tenant_id, enabled),
        weapon_repo.list_categories(tenant_id, enabled),
        areal_repo.list_category_with_areas(tenant_id),
    )?;

    let mut catalog = Catalog::from_parts(weapons, categories, areal_categories);

    for id in catalog.dangling_category_ids() {
        match weapon_repo.find_category_by_id(tenant_id, &id).await? {
            Some(category) => catalog.weapon_categories.extend([category]),
            None => log::debug!("Weapon category {id} referenced by tenant {tenant_id} not found"),
        }
    }

    log::debug!(
        "Loaded catalog for tenant {tenant_id}: {} weapons, {} categories, {} areals",
        catalog.weapons.len(),
        catalog.weapon_categories.len(),
        catalog.areals.len()
    );

    Ok(catalog)
}

#[cfg(test)]
pub(crate) mod tests {
    use armory_database::MemoryStore;

    use super::*;

    pub(crate) fn weapon(id: &str, category_id: &str) -> WeaponCatalogEntry {
        WeaponCatalogEntry {
            id: id.to_string(),
            name: format!("Weapon {id}"),
            category_id: category_id.to_string(),
            enabled: true,
        }
    }

    pub(crate) fn category(id: &str, name: &str) -> WeaponCategoryCatalogEntry {
        WeaponCategoryCatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
        }
    }

    pub(crate) fn areal_category(id: &str, areal_ids: &[&str]) -> ArealCategoryCatalogEntry {
        ArealCategoryCatalogEntry {
            id: id.to_string(),
            name: format!("Areal category {id}"),
            code: id.to_uppercase(),
            areas: areal_ids
                .iter()
                .map(|a| ArealCatalogEntry {
                    id: (*a).to_string(),
                    name: format!("Areal {a}"),
                    category_id: id.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn lookup_keeps_order_and_first_duplicate() {
        let lookup: Lookup<WeaponCategoryCatalogEntry> = [
            category("b", "Second"),
            category("a", "First"),
            category("b", "Shadowed"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = lookup.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(lookup.get("b").map(|c| c.name.as_str()), Some("Second"));
        assert!(lookup.get("c").is_none());
    }

    #[test]
    fn areals_are_flattened_from_categories() {
        let catalog = Catalog::from_parts(
            vec![],
            vec![],
            vec![areal_category("n", &["a1", "a2"]), areal_category("s", &["a3"])],
        );
        assert_eq!(catalog.areals.len(), 3);
        assert_eq!(
            catalog.areals.get("a3").map(|a| a.category_id.as_str()),
            Some("s")
        );
    }

    #[test]
    fn dangling_categories_are_deduplicated() {
        let catalog = Catalog::from_parts(
            vec![weapon("w1", "x"), weapon("w2", "c1"), weapon("w3", "x")],
            vec![category("c1", "Rifles")],
            vec![],
        );
        assert_eq!(catalog.dangling_category_ids(), ["x"]);
    }

    #[tokio::test]
    async fn loads_full_catalog() {
        let store = MemoryStore::from_json_str(include_str!("../../database/fixtures/sample.json"))
            .unwrap();
        let catalog = load_catalog(&store, &store, "T1", false).await.unwrap();
        assert_eq!(catalog.weapons.len(), 3);
        assert_eq!(catalog.weapon_categories.len(), 3);
        assert_eq!(catalog.areal_categories.len(), 1);
        assert_eq!(catalog.areals.len(), 2);
    }

    #[tokio::test]
    async fn enabled_only_resolves_referenced_disabled_category() {
        let store = MemoryStore::from_json_str(include_str!("../../database/fixtures/sample.json"))
            .unwrap();
        let catalog = load_catalog(&store, &store, "T1", true).await.unwrap();
        let ids: Vec<&str> = catalog
            .weapon_categories
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["C1", "C2", "C3"]);
    }
}
