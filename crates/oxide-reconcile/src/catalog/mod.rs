//! Catalog access.
//!
//! A [`Catalog`] is one database session: it answers existence and column
//! questions about the currently selected schema and executes the statements
//! the reconciler generates. [`MySqlCatalog`] talks to a live server;
//! [`MemoryCatalog`] keeps the same state in memory for tests and
//! previews.

mod memory;
mod mysql;

pub use memory::MemoryCatalog;
pub use mysql::MySqlCatalog;

use oxide_reconcile_core::{SchemaOperation, TableSnapshot};

use crate::error::Result;

/// A single database session scoped to one schema at a time.
///
/// Implementations are driven sequentially through `&mut self`; statements
/// such as `USE` change session state that later calls rely on.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Returns the schema the session currently uses, if any.
    async fn current_schema(&mut self) -> Result<Option<String>>;

    /// Returns whether a schema exists.
    async fn schema_exists(&mut self, schema: &str) -> Result<bool>;

    /// Returns whether a table exists in the current schema.
    async fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Reads the columns of a table in the current schema.
    ///
    /// A missing table yields an empty snapshot.
    async fn table_snapshot(&mut self, table: &str) -> Result<TableSnapshot>;

    /// Executes the statement generated for `operation`.
    async fn execute(&mut self, operation: &SchemaOperation, sql: &str) -> Result<()>;
}
