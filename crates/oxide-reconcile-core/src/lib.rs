//! # oxide-reconcile-core
//!
//! Declarative table definitions, parsed and diffed against live tables.
//!
//! This crate is the side-effect free half of schema reconciliation:
//! - A quote- and comment-aware scanner that splits definition files into
//!   statements and table bodies into columns, without regular expressions
//! - Canonical column shapes, so `INTEGER NOT NULL DEFAULT '0'` and the
//!   catalog's `int` / `NO` / `0` compare equal
//! - A differ producing the minimal add/modify/drop plan under an explicit
//!   drop policy
//! - MySQL DDL generation with every identifier backtick-quoted
//!
//! ## Example
//!
//! ```rust
//! use oxide_reconcile_core::{
//!     DefinitionFile, MySqlDialect, ReconcileDialect, SnapshotColumn, SyncPolicy,
//!     TableSnapshot, diff_table, extract_columns,
//! };
//!
//! let file = DefinitionFile::parse(
//!     "shop.txt",
//!     "CREATE SCHEMA shop;
//!      CREATE TABLE IF NOT EXISTS settings (key VARCHAR(20) NOT NULL, value TEXT);",
//! );
//! let plan = file.plan();
//! assert_eq!(plan.target_schema(), Some("shop"));
//!
//! let table = &plan.tables[0];
//! let columns = extract_columns(&table.body).columns;
//! let live = TableSnapshot::new("settings")
//!     .column(SnapshotColumn::new("id", "int").not_null())
//!     .column(SnapshotColumn::new("value", "text"));
//!
//! let diff = diff_table(&columns, &live, SyncPolicy::Additive);
//! let sql: Vec<String> = diff
//!     .operations()
//!     .iter()
//!     .map(|op| MySqlDialect::new().generate_sql(op))
//!     .collect();
//! assert_eq!(
//!     sql,
//!     vec!["ALTER TABLE `settings` ADD COLUMN `key` VARCHAR(20) NOT NULL"]
//! );
//! ```

pub mod columns;
pub mod dialect;
pub mod diff;
pub mod operation;
pub mod scanner;
pub mod shape;
pub mod snapshot;
pub mod statement;

pub use columns::{extract_columns, ColumnParseError, ColumnParseErrorKind, ColumnSpec, Extraction};
pub use dialect::{MySqlDialect, ReconcileDialect};
pub use diff::{
    diff_table, ColumnChange, DiffPlan, Differ, ParsePolicyError, SyncPolicy, IDENTITY_COLUMN,
    IDENTITY_DEFINITION,
};
pub use operation::SchemaOperation;
pub use shape::{mariadb_column_default, ColumnShape};
pub use snapshot::{SnapshotColumn, TableSnapshot};
pub use statement::{
    parse_statement, split_statements, DefinitionFile, FilePlan, SchemaDeclaration, Statement,
    TableDeclaration,
};
