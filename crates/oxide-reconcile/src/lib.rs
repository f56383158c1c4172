//! Declarative schema reconciliation for MySQL.
//!
//! `oxide-reconcile` keeps live tables in line with plain-text definition
//! files instead of hand-written migrations:
//! - Each `*.txt` file holds `CREATE SCHEMA` and `CREATE TABLE IF NOT EXISTS`
//!   statements
//! - Missing schemas and tables are created, missing columns are added and
//!   changed columns are modified
//! - Columns no longer declared are kept, or dropped under
//!   [`SyncPolicy::Destructive`]
//! - Every table ends up with an `id INT AUTO_INCREMENT PRIMARY KEY`
//!
//! Runs are idempotent: once a database matches its definitions, running
//! again issues no `ALTER TABLE`.
//!
//! # Architecture
//!
//! - **Parser, extractor, differ, dialect** - `oxide-reconcile-core`
//! - **Catalog** - Introspection and statement execution for one session
//! - **Executor** - Walks files and tables, isolating failures
//! - **Report** - Structured, serializable run results
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_reconcile::{run, SyncConfig, SyncPolicy};
//!
//! let config = SyncConfig::new()
//!     .database_url("mysql://root@127.0.0.1:3306")
//!     .dir("definitions")
//!     .policy(SyncPolicy::Additive);
//! let report = run(&config).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Reconcile once and exit
//! oxide-reconcile --dir definitions --once
//!
//! # Preview the statements a run would issue
//! oxide-reconcile --dry-run --once --report-json
//!
//! # Also drop undeclared columns
//! RECONCILE_POLICY=destructive oxide-reconcile
//! ```

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod listener;
pub mod report;

pub use oxide_reconcile_core::SyncPolicy;

pub use catalog::{Catalog, MemoryCatalog, MySqlCatalog};
pub use config::SyncConfig;
pub use error::{CatalogError, SyncError};
pub use executor::Reconciler;
pub use report::{FileReport, RunReport, TableOutcome, TableReport};

use tracing::warn;

/// Connects to the configured database and reconciles the configured
/// directory.
pub async fn run(config: &SyncConfig) -> Result<RunReport, SyncError> {
    let catalog = MySqlCatalog::connect(&config.database_url)
        .await
        .map_err(|e| SyncError::Connection {
            message: e.to_string(),
        })?;

    let mut reconciler = Reconciler::new(catalog)
        .policy(config.policy)
        .dry_run(config.dry_run)
        .default_schema(config.default_schema.clone());
    let report = reconciler.run(&config.dir, &config.extension).await;

    if let Err(e) = reconciler.into_catalog().close().await {
        warn!(error = %e, "Failed to close database session");
    }
    report
}
