#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Repository traits for tenant-scoped armory records.
//!
//! The reporting engine only ever reads through these traits. [`MemoryStore`]
//! implements all of them on top of a JSON snapshot in the same format the
//! application exports, which is what the CLI and the tests use.

pub mod filter;
pub mod memory;

use armory_catalog_models::{
    ArealCategoryCatalogEntry, WeaponCatalogEntry, WeaponCategoryCatalogEntry,
};
use armory_collection_models::{CollectionFilter, RawCollection};

pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store held invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot parsed but is internally inconsistent.
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot {
        /// Description of what went wrong.
        message: String,
    },

    /// The backend could not serve the request.
    #[error("Repository unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read access to collection records.
#[async_trait::async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Lists the tenant's collections matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn list_collections(
        &self,
        tenant_id: &str,
        filter: &CollectionFilter,
    ) -> Result<Vec<RawCollection>, DbError>;
}

/// Read access to the weapon catalog.
#[async_trait::async_trait]
pub trait WeaponRepository: Send + Sync {
    /// Lists the tenant's weapons, optionally restricted by `enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn list_weapons(
        &self,
        tenant_id: &str,
        enabled: Option<bool>,
    ) -> Result<Vec<WeaponCatalogEntry>, DbError>;

    /// Lists the tenant's weapon categories, optionally restricted by
    /// `enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn list_categories(
        &self,
        tenant_id: &str,
        enabled: Option<bool>,
    ) -> Result<Vec<WeaponCategoryCatalogEntry>, DbError>;

    /// Looks up a single weapon category regardless of its `enabled` flag.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn find_category_by_id(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<WeaponCategoryCatalogEntry>, DbError>;
}

/// Read access to the areal catalog.
#[async_trait::async_trait]
pub trait ArealRepository: Send + Sync {
    /// Lists the tenant's areal categories, each with its areals.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn list_category_with_areas(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ArealCategoryCatalogEntry>, DbError>;
}
