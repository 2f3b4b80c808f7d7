//! Weapon-category columns of the collection table.
//!
//! A category is emitted only if at least one of its weapons occurs in one
//! of the reported collections, and only those weapons are listed as its
//! children. The category total is summed across every reported
//! collection.

use std::collections::{BTreeMap, BTreeSet};

use armory_analytics_models::{
    CategoryChild, CategoryOrder, CategorySummary, EnrichedCollection,
};

use crate::catalog::Catalog;

/// Builds the category summaries for a set of enriched collections.
///
/// With [`CategoryOrder::Insertion`] categories appear in the order their
/// first used weapon appears in the weapon catalog.
#[must_use]
pub fn build_category_summaries(
    collections: &[EnrichedCollection],
    catalog: &Catalog,
    order: CategoryOrder,
) -> Vec<CategorySummary> {
    let used: BTreeSet<&str> = collections
        .iter()
        .flat_map(|c| c.weapons.keys().map(String::as_str))
        .collect();

    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for line in collections.iter().flat_map(|c| c.weapons.values()) {
        let total = totals.entry(line.category_id.as_str()).or_default();
        *total = total.saturating_add(line.count);
    }

    let mut position: BTreeMap<&str, usize> = BTreeMap::new();
    let mut summaries: Vec<CategorySummary> = Vec::new();

    for weapon in catalog.weapons.iter().filter(|w| used.contains(w.id.as_str())) {
        let category_id = weapon.category_id.as_str();
        let idx = *position.entry(category_id).or_insert_with(|| {
            summaries.push(CategorySummary {
                id: category_id.to_string(),
                name: catalog
                    .weapon_categories
                    .get(category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                total: totals.get(category_id).copied().unwrap_or(0),
                children: Vec::new(),
            });
            summaries.len() - 1
        });
        summaries[idx].children.push(CategoryChild {
            id: weapon.id.clone(),
            name: weapon.name.clone(),
        });
    }

    if order == CategoryOrder::Name {
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }

    summaries
}
