//! SQL generation for schema operations.

use crate::operation::SchemaOperation;

/// Trait for database-specific SQL generation.
pub trait ReconcileDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Quotes an identifier (schema, table or column name).
    fn quote_identifier(&self, name: &str) -> String;

    /// Generates the statement for an operation.
    fn generate_sql(&self, operation: &SchemaOperation) -> String {
        match operation {
            SchemaOperation::CreateSchema { name } => {
                format!("CREATE SCHEMA IF NOT EXISTS {}", self.quote_identifier(name))
            }
            SchemaOperation::UseSchema { name } => {
                format!("USE {}", self.quote_identifier(name))
            }
            // Declarations are executed exactly as written.
            SchemaOperation::CreateTable { sql, .. } => sql.clone(),
            SchemaOperation::AddColumn { table, column } => format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                self.quote_identifier(table),
                self.quote_identifier(&column.name),
                column.definition
            ),
            SchemaOperation::ModifyColumn { table, column } => format!(
                "ALTER TABLE {} MODIFY COLUMN {} {}",
                self.quote_identifier(table),
                self.quote_identifier(&column.name),
                column.definition
            ),
            SchemaOperation::DropColumn { table, column } => format!(
                "ALTER TABLE {} DROP COLUMN {}",
                self.quote_identifier(table),
                self.quote_identifier(column)
            ),
        }
    }
}

/// MySQL and MariaDB dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReconcileDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }
}
