//! Report entry points.
//!
//! Each function fetches what it needs through the repository traits and
//! hands the records to the pure builders in the sibling modules.

use std::collections::BTreeSet;

use armory_analytics_models::{CollectionTable, ReportOptions, StatisticsResult, TableSummary};
use armory_collection_models::CollectionFilter;
use armory_database::{ArealRepository, CollectionRepository, WeaponRepository};

use crate::AnalyticsError;
use crate::catalog::load_catalog;
use crate::enrich::enrich_collection;
use crate::payload::saturating_sum;
use crate::pivot::build_category_summaries;
use crate::stats::aggregate_statistics;

/// Builds the collection table for a tenant: enriched rows (oldest
/// first), the used weapon categories with totals, and footer totals.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the catalog or the collections cannot be
/// read.
pub async fn generate_collection_table(
    collection_repo: &dyn CollectionRepository,
    weapon_repo: &dyn WeaponRepository,
    areal_repo: &dyn ArealRepository,
    tenant_id: &str,
    filter: &CollectionFilter,
    options: &ReportOptions,
) -> Result<CollectionTable, AnalyticsError> {
    let catalog = load_catalog(
        weapon_repo,
        areal_repo,
        tenant_id,
        options.enabled_weapons_only,
    )
    .await?;
    let raw = collection_repo.list_collections(tenant_id, filter).await?;

    let mut collections: Vec<_> = raw
        .iter()
        .map(|c| enrich_collection(c, &catalog))
        .collect();
    collections.sort_by_key(|c| c.created_at);

    let weapon_categories =
        build_category_summaries(&collections, &catalog, options.category_order);

    let areal_categories: BTreeSet<&str> = collections
        .iter()
        .filter_map(|c| c.areal_category_id.as_deref())
        .filter(|id| !id.is_empty())
        .collect();
    let areals: BTreeSet<&str> = collections
        .iter()
        .filter_map(|c| c.areal_id.as_deref())
        .filter(|id| !id.is_empty())
        .collect();

    let summary = TableSummary {
        total_collections: collections.len() as u64,
        total_weapons: saturating_sum(collections.iter().map(|c| c.weapon_sum)),
        areal_categories: areal_categories.len() as u64,
        areals: areals.len() as u64,
    };

    log::info!(
        "Collection table for tenant {tenant_id}: {} collections, {} weapons, {} categories",
        summary.total_collections,
        summary.total_weapons,
        weapon_categories.len()
    );

    Ok(CollectionTable {
        collections,
        weapon_categories,
        summary,
    })
}

/// Computes aggregate statistics over a tenant's filtered collections.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the collections cannot be read.
pub async fn get_collection_statistics(
    collection_repo: &dyn CollectionRepository,
    tenant_id: &str,
    filter: &CollectionFilter,
) -> Result<StatisticsResult, AnalyticsError> {
    let raw = collection_repo.list_collections(tenant_id, filter).await?;
    let stats = aggregate_statistics(&raw);

    log::info!(
        "Collection statistics for tenant {tenant_id}: {} collections, {} weapons",
        stats.total_collections,
        stats.total_weapons
    );

    Ok(stats)
}
