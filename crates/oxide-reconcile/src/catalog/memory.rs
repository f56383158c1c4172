//! In-memory catalog.

use std::collections::BTreeMap;

use oxide_reconcile_core::{
    extract_columns, parse_statement, SchemaOperation, SnapshotColumn, Statement, TableSnapshot,
};

use super::Catalog;
use crate::error::{CatalogError, Result};

/// A catalog that keeps schemas and tables in memory.
///
/// This is a test double for [`MySqlCatalog`](super::MySqlCatalog): it is
/// never used by the binary. It applies operations the way MySQL would
/// (`CREATE TABLE` is parsed from the statement text, columns are stored in
/// `INFORMATION_SCHEMA` spelling) and records every statement it is asked to
/// execute. Failures can be injected per statement fragment or per table.
///
/// ```
/// use oxide_reconcile::{MemoryCatalog, Reconciler, TableOutcome};
/// use oxide_reconcile_core::DefinitionFile;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let file = DefinitionFile::parse(
///     "shop.txt",
///     "CREATE SCHEMA shop; CREATE TABLE IF NOT EXISTS orders (total DECIMAL(10,2) DEFAULT 0);",
/// );
/// let mut reconciler = Reconciler::new(MemoryCatalog::new());
/// let report = reconciler.reconcile_file(&file).await;
/// assert_eq!(report.tables[0].outcome, TableOutcome::Created);
///
/// let orders = reconciler.catalog().table("shop", "orders").unwrap();
/// assert_eq!(orders.get("total").unwrap().default.as_deref(), Some("0.00"));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    schemas: BTreeMap<String, BTreeMap<String, TableSnapshot>>,
    current: Option<String>,
    rejected: Vec<String>,
    unavailable_tables: Vec<String>,
    statements: Vec<String>,
}

impl MemoryCatalog {
    /// Creates an empty catalog with no schema selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schemas.entry(schema.into()).or_default();
        self
    }

    /// Adds a table, creating its schema if needed.
    #[must_use]
    pub fn with_table(mut self, schema: impl Into<String>, table: TableSnapshot) -> Self {
        self.schemas
            .entry(schema.into())
            .or_default()
            .insert(table.name.clone(), table);
        self
    }

    /// Selects a schema, as if the session had been opened on it.
    #[must_use]
    pub fn using(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        self.schemas.entry(schema.clone()).or_default();
        self.current = Some(schema);
        self
    }

    /// Makes every statement containing `fragment` fail.
    #[must_use]
    pub fn reject_statements_containing(mut self, fragment: impl Into<String>) -> Self {
        self.rejected.push(fragment.into());
        self
    }

    /// Makes every metadata query about `table` fail.
    #[must_use]
    pub fn fail_introspection_of(mut self, table: impl Into<String>) -> Self {
        self.unavailable_tables.push(table.into());
        self
    }

    /// Statements executed so far, including failed ones.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Forgets the recorded statements.
    pub fn clear_statements(&mut self) {
        self.statements.clear();
    }

    /// The selected schema.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns whether a schema exists.
    #[must_use]
    pub fn has_schema(&self, schema: &str) -> bool {
        self.schemas.contains_key(schema)
    }

    /// Looks up a table.
    #[must_use]
    pub fn table(&self, schema: &str, table: &str) -> Option<&TableSnapshot> {
        self.schemas.get(schema)?.get(table)
    }

    fn check_available(&self, table: &str) -> Result<()> {
        if self.unavailable_tables.iter().any(|t| t == table) {
            return Err(CatalogError::Unavailable(format!(
                "metadata for '{table}' cannot be read"
            )));
        }
        Ok(())
    }

    fn current_tables(&mut self) -> Result<&mut BTreeMap<String, TableSnapshot>> {
        let schema = self.current.as_ref().ok_or(CatalogError::NoSchemaSelected)?;
        self.schemas
            .get_mut(schema)
            .ok_or_else(|| CatalogError::UnknownSchema(schema.clone()))
    }

    fn existing_table(&mut self, table: &str) -> Result<&mut TableSnapshot> {
        self.current_tables()?
            .get_mut(table)
            .ok_or_else(|| CatalogError::UnknownTable(table.to_string()))
    }

    fn create_table(&mut self, sql: &str) -> Result<()> {
        let Some(Statement::Table(declaration)) = parse_statement(sql) else {
            return Err(CatalogError::Rejected(sql.to_string()));
        };
        let extraction = extract_columns(&declaration.body);
        if extraction.columns.is_empty() || !extraction.errors.is_empty() {
            return Err(CatalogError::Rejected(sql.to_string()));
        }

        let tables = self.current_tables()?;
        tables.entry(declaration.name.clone()).or_insert_with(|| {
            TableSnapshot::from_columns(declaration.name.clone(), &extraction.columns)
        });
        Ok(())
    }

    fn apply(&mut self, operation: &SchemaOperation, sql: &str) -> Result<()> {
        match operation {
            SchemaOperation::CreateSchema { name } => {
                self.schemas.entry(name.clone()).or_default();
            }
            SchemaOperation::UseSchema { name } => {
                if !self.schemas.contains_key(name) {
                    return Err(CatalogError::UnknownSchema(name.clone()));
                }
                self.current = Some(name.clone());
            }
            SchemaOperation::CreateTable { .. } => self.create_table(sql)?,
            SchemaOperation::AddColumn { table, column } => {
                let snapshot = self.existing_table(table)?;
                // MySQL column names are case-insensitive.
                if snapshot
                    .column_names()
                    .any(|c| c.eq_ignore_ascii_case(&column.name))
                {
                    return Err(CatalogError::DuplicateColumn {
                        table: table.clone(),
                        column: column.name.clone(),
                    });
                }
                snapshot.push(SnapshotColumn::from_spec(column));
            }
            SchemaOperation::ModifyColumn { table, column } => {
                let snapshot = self.existing_table(table)?;
                if !snapshot.has_column(&column.name) {
                    return Err(CatalogError::UnknownColumn {
                        table: table.clone(),
                        column: column.name.clone(),
                    });
                }
                snapshot.push(SnapshotColumn::from_spec(column));
            }
            SchemaOperation::DropColumn { table, column } => {
                let snapshot = self.existing_table(table)?;
                if snapshot.remove(column).is_none() {
                    return Err(CatalogError::UnknownColumn {
                        table: table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    async fn current_schema(&mut self) -> Result<Option<String>> {
        Ok(self.current.clone())
    }

    async fn schema_exists(&mut self, schema: &str) -> Result<bool> {
        Ok(self.has_schema(schema))
    }

    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        self.check_available(table)?;
        Ok(self
            .current
            .as_deref()
            .is_some_and(|schema| self.table(schema, table).is_some()))
    }

    async fn table_snapshot(&mut self, table: &str) -> Result<TableSnapshot> {
        self.check_available(table)?;
        let snapshot = self
            .current
            .as_deref()
            .and_then(|schema| self.table(schema, table))
            .cloned()
            .unwrap_or_else(|| TableSnapshot::new(table));
        Ok(snapshot)
    }

    async fn execute(&mut self, operation: &SchemaOperation, sql: &str) -> Result<()> {
        self.statements.push(sql.to_string());
        if self.rejected.iter().any(|fragment| sql.contains(fragment.as_str())) {
            return Err(CatalogError::Rejected(sql.to_string()));
        }
        self.apply(operation, sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_reconcile_core::ColumnSpec;

    #[tokio::test]
    async fn test_create_and_alter() {
        let mut catalog = MemoryCatalog::new().using("shop");
        let sql = "CREATE TABLE IF NOT EXISTS orders (name VARCHAR(50))";
        catalog
            .execute(&SchemaOperation::create_table("orders", sql), sql)
            .await
            .unwrap();
        assert!(catalog.table_exists("orders").await.unwrap());

        let add = SchemaOperation::AddColumn {
            table: "orders".to_string(),
            column: ColumnSpec::new("total", "DECIMAL(10,2) NOT NULL"),
        };
        catalog.execute(&add, "ALTER ...").await.unwrap();

        let snapshot = catalog.table_snapshot("orders").await.unwrap();
        assert_eq!(
            snapshot.column_names().collect::<Vec<_>>(),
            vec!["name", "total"]
        );
        let total = snapshot.get("total").unwrap();
        assert!(!total.nullable);
        assert_eq!(total.column_type, "decimal(10,2)");
        assert_eq!(snapshot.get("name").unwrap().column_type, "varchar(50)");
        assert_eq!(catalog.statements().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_column_is_rejected() {
        let mut catalog = MemoryCatalog::new().with_table(
            "shop",
            TableSnapshot::new("t").column(SnapshotColumn::new("name", "text")),
        );
        let use_shop = SchemaOperation::use_schema("shop");
        catalog.execute(&use_shop, "USE `shop`").await.unwrap();

        let add = SchemaOperation::AddColumn {
            table: "t".to_string(),
            column: ColumnSpec::new("Name", "TEXT"),
        };
        let err = catalog.execute(&add, "ALTER ...").await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateColumn { .. }));
    }

    #[tokio::test]
    async fn test_use_unknown_schema() {
        let mut catalog = MemoryCatalog::new();
        let err = catalog
            .execute(&SchemaOperation::use_schema("nope"), "USE `nope`")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSchema(_)));
        assert_eq!(catalog.current_schema().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut catalog = MemoryCatalog::new()
            .using("shop")
            .reject_statements_containing("`bad`")
            .fail_introspection_of("broken");
        assert!(catalog.table_exists("broken").await.is_err());

        let drop = SchemaOperation::DropColumn {
            table: "t".to_string(),
            column: "bad".to_string(),
        };
        let err = catalog
            .execute(&drop, "ALTER TABLE `t` DROP COLUMN `bad`")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Rejected(_)));
    }
}
