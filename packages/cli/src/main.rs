#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for collection reports.
//!
//! Reads an exported JSON snapshot, runs the collection table or the
//! statistics report for one tenant, and prints the result as JSON.

mod config;

use std::path::PathBuf;

use armory_analytics::{AnalyticsError, generate_collection_table, get_collection_statistics};
use armory_analytics_models::CategoryOrder;
use armory_collection_models::CollectionFilter;
use armory_database::{DbError, MemoryStore};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The snapshot could not be loaded.
    #[error(transparent)]
    Database(#[from] DbError),

    /// The report failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Serializing the report failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "armory_cli", about = "Collection reports over an exported snapshot")]
struct Cli {
    /// Path to the exported JSON snapshot
    #[arg(long)]
    data: PathBuf,
    /// Path to a TOML report configuration
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enriched collection rows with weapon category totals
    Table {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Only load enabled weapons and categories
        #[arg(long)]
        enabled_only: bool,
        /// Category column order ("insertion" or "name")
        #[arg(long)]
        category_order: Option<CategoryOrder>,
    },
    /// Aggregate statistics by user type, month, areal, and responsible person
    Stats {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// Tenant and collection filters shared by every report.
#[derive(Args)]
struct ScopeArgs {
    /// Tenant to report on
    #[arg(long)]
    tenant: String,
    /// Collector PIN
    #[arg(long)]
    pin: Option<String>,
    /// Areal ID
    #[arg(long)]
    areal_id: Option<String>,
    /// Areal category ID
    #[arg(long)]
    areal_category_id: Option<String>,
    /// User type
    #[arg(long)]
    user_type: Option<String>,
    /// Year the collection was recorded
    #[arg(long)]
    year: Option<i32>,
    /// Earliest record date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest record date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Substring of the collector's name
    #[arg(long)]
    person: Option<String>,
    /// Substring of the responsible person
    #[arg(long)]
    responsible: Option<String>,
    /// Substring of the unit
    #[arg(long)]
    unit: Option<String>,
}

impl ScopeArgs {
    fn into_parts(self) -> (String, CollectionFilter) {
        let filter = CollectionFilter {
            pin: self.pin,
            areal_id: self.areal_id,
            areal_category_id: self.areal_category_id,
            user_type: self.user_type,
            year: self.year,
            date_from: self.from,
            date_to: self.to,
            person: self.person,
            responsible: self.responsible,
            unit: self.unit,
        };
        (self.tenant, filter)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let store = MemoryStore::from_path(&cli.data)?;

    let json = match cli.command {
        Commands::Table {
            scope,
            enabled_only,
            category_order,
        } => {
            let options = config::apply_overrides(
                config::load_report_options(cli.config.as_deref())?,
                enabled_only,
                category_order,
            );
            let (tenant_id, filter) = scope.into_parts();
            let table =
                generate_collection_table(&store, &store, &store, &tenant_id, &filter, &options)
                    .await?;
            serde_json::to_string_pretty(&table)?
        }
        Commands::Stats { scope } => {
            let (tenant_id, filter) = scope.into_parts();
            let stats = get_collection_statistics(&store, &tenant_id, &filter).await?;
            serde_json::to_string_pretty(&stats)?
        }
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_command_with_filters() {
        let cli = Cli::try_parse_from([
            "armory_cli",
            "--data",
            "snapshot.json",
            "table",
            "--tenant",
            "T1",
            "--user-type",
            "M",
            "--from",
            "2024-01-01",
            "--category-order",
            "name",
        ])
        .unwrap();

        let Commands::Table {
            scope,
            enabled_only,
            category_order,
        } = cli.command
        else {
            panic!("expected table command");
        };
        assert!(!enabled_only);
        assert_eq!(category_order, Some(CategoryOrder::Name));

        let (tenant_id, filter) = scope.into_parts();
        assert_eq!(tenant_id, "T1");
        assert_eq!(filter.user_type.as_deref(), Some("M"));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(filter.date_to.is_none());
    }

    #[test]
    fn stats_requires_tenant() {
        assert!(Cli::try_parse_from(["armory_cli", "--data", "s.json", "stats"]).is_err());
    }
}
