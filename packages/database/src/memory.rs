//! Snapshot-backed repository implementation.
//!
//! A snapshot is the JSON document produced by the application's export:
//! one entry per tenant holding its catalogs and collection records. The
//! whole snapshot is held in memory and served read-only.

use std::collections::BTreeMap;
use std::path::Path;

use armory_catalog_models::{
    ArealCategoryCatalogEntry, WeaponCatalogEntry, WeaponCategoryCatalogEntry,
};
use armory_collection_models::{CollectionFilter, RawCollection};
use serde::{Deserialize, Serialize};

use crate::{ArealRepository, CollectionRepository, DbError, WeaponRepository, filter};

/// Everything stored for one tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSnapshot {
    /// Weapon catalog.
    #[serde(default)]
    pub weapons: Vec<WeaponCatalogEntry>,
    /// Weapon category catalog.
    #[serde(default)]
    pub weapon_categories: Vec<WeaponCategoryCatalogEntry>,
    /// Areal categories with their areals.
    #[serde(default)]
    pub areal_categories: Vec<ArealCategoryCatalogEntry>,
    /// Collection records.
    #[serde(default)]
    pub collections: Vec<RawCollection>,
}

/// Top-level snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Per-tenant data keyed by tenant ID.
    #[serde(default)]
    pub tenants: BTreeMap<String, TenantSnapshot>,
}

/// In-memory store serving every repository trait from a [`Snapshot`].
///
/// Unknown tenants behave like tenants without any data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tenants: BTreeMap<String, TenantSnapshot>,
}

impl MemoryStore {
    /// Builds a store from an already-deserialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidSnapshot`] if a collection is filed under
    /// a tenant other than its own `tenantId`.
    pub fn new(snapshot: Snapshot) -> Result<Self, DbError> {
        for (tenant_id, tenant) in &snapshot.tenants {
            if let Some(stray) = tenant
                .collections
                .iter()
                .find(|c| &c.tenant_id != tenant_id)
            {
                return Err(DbError::InvalidSnapshot {
                    message: format!(
                        "collection {} belongs to tenant {} but is stored under {tenant_id}",
                        stray.id, stray.tenant_id
                    ),
                });
            }
        }

        Ok(Self {
            tenants: snapshot.tenants,
        })
    }

    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the JSON is invalid or the snapshot is
    /// inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, DbError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::new(snapshot)
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, DbError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        log::info!(
            "Loaded snapshot {} with {} tenant(s)",
            path.display(),
            store.tenants.len()
        );
        Ok(store)
    }

    fn tenant(&self, tenant_id: &str) -> Option<&TenantSnapshot> {
        let tenant = self.tenants.get(tenant_id);
        if tenant.is_none() {
            log::debug!("No snapshot data for tenant {tenant_id}");
        }
        tenant
    }
}

#[async_trait::async_trait]
impl CollectionRepository for MemoryStore {
    async fn list_collections(
        &self,
        tenant_id: &str,
        filter: &CollectionFilter,
    ) -> Result<Vec<RawCollection>, DbError> {
        Ok(self
            .tenant(tenant_id)
            .map(|t| {
                t.collections
                    .iter()
                    .filter(|c| filter::matches(filter, c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl WeaponRepository for MemoryStore {
    async fn list_weapons(
        &self,
        tenant_id: &str,
        enabled: Option<bool>,
    ) -> Result<Vec<WeaponCatalogEntry>, DbError> {
        Ok(self
            .tenant(tenant_id)
            .map(|t| {
                t.weapons
                    .iter()
                    .filter(|w| enabled.is_none_or(|e| w.enabled == e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_categories(
        &self,
        tenant_id: &str,
        enabled: Option<bool>,
    ) -> Result<Vec<WeaponCategoryCatalogEntry>, DbError> {
        Ok(self
            .tenant(tenant_id)
            .map(|t| {
                t.weapon_categories
                    .iter()
                    .filter(|c| enabled.is_none_or(|e| c.enabled == e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_category_by_id(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<WeaponCategoryCatalogEntry>, DbError> {
        Ok(self
            .tenant(tenant_id)
            .and_then(|t| t.weapon_categories.iter().find(|c| c.id == id))
            .cloned())
    }
}

#[async_trait::async_trait]
impl ArealRepository for MemoryStore {
    async fn list_category_with_areas(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ArealCategoryCatalogEntry>, DbError> {
        Ok(self
            .tenant(tenant_id)
            .map(|t| t.areal_categories.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../fixtures/sample.json");

    fn store() -> MemoryStore {
        MemoryStore::from_json_str(SAMPLE).unwrap()
    }

    #[tokio::test]
    async fn lists_only_the_requested_tenant() {
        let store = store();
        let t1 = store
            .list_collections("T1", &CollectionFilter::default())
            .await
            .unwrap();
        let ids: Vec<&str> = t1.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);

        let t2 = store
            .list_collections("T2", &CollectionFilter::default())
            .await
            .unwrap();
        assert_eq!(t2.len(), 1);
    }

    #[tokio::test]
    async fn unknown_tenant_is_empty() {
        let store = store();
        assert!(store.list_weapons("nobody", None).await.unwrap().is_empty());
        assert!(
            store
                .list_category_with_areas("nobody")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn enabled_filter_on_categories() {
        let store = store();
        let all = store.list_categories("T1", None).await.unwrap();
        let enabled = store.list_categories("T1", Some(true)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(enabled.len(), 2);

        let disabled = store.find_category_by_id("T1", "C3").await.unwrap();
        assert_eq!(disabled.map(|c| c.name), Some("Explosives".to_string()));
    }

    #[tokio::test]
    async fn collection_filter_is_applied() {
        let store = store();
        let filter = CollectionFilter {
            user_type: Some("B".to_string()),
            ..Default::default()
        };
        let rows = store.list_collections("T1", &filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "B");
    }

    #[test]
    fn rejects_collection_under_wrong_tenant() {
        let json = r#"{"tenants":{"T1":{"collections":[
            {"id":"x","tenantId":"T2","createdAt":"2024-01-01T00:00:00Z"}
        ]}}}"#;
        assert!(matches!(
            MemoryStore::from_json_str(json),
            Err(DbError::InvalidSnapshot { .. })
        ));
    }
}
