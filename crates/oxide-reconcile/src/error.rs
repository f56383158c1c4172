//! Error types for the reconciliation runtime.

use serde::Serialize;

/// Errors returned by a [`Catalog`](crate::catalog::Catalog).
///
/// [`MySqlCatalog`](crate::catalog::MySqlCatalog) only returns
/// [`CatalogError::Database`]; the other variants mirror the server's
/// messages for the in-memory test double,
/// [`MemoryCatalog`](crate::catalog::MemoryCatalog).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The catalog could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// A statement needs a schema but none is selected.
    #[error("No database selected")]
    NoSchemaSelected,

    /// The schema does not exist.
    #[error("Unknown database '{0}'")]
    UnknownSchema(String),

    /// The table does not exist.
    #[error("Table '{0}' doesn't exist")]
    UnknownTable(String),

    /// The column does not exist.
    #[error("Unknown column '{column}' in '{table}'")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// The column already exists.
    #[error("Duplicate column name '{column}' in '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// The statement was rejected by the database.
    #[error("Statement rejected: {0}")]
    Rejected(String),
}

/// A failure caught while reconciling, recorded in the run report.
///
/// Every variant is scoped to the smallest unit of work it aborts: the run,
/// a file, a table or a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncError {
    /// The definitions directory could not be listed. Fatal to the run.
    #[error("Failed to read definitions directory {path}: {message}")]
    DirectoryRead {
        /// Directory path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// A definition file could not be read. Fatal to that file.
    #[error("Failed to read definition file {path}: {message}")]
    FileRead {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// The database session could not be opened. Fatal to the run.
    #[error("Database connection failed: {message}")]
    Connection {
        /// Underlying error.
        message: String,
    },

    /// The target schema could not be created, selected or determined.
    /// Fatal to the remaining tables of the file.
    #[error("Failed to resolve schema{}: {message}", .schema.as_deref().map(|s| format!(" '{s}'")).unwrap_or_default())]
    SchemaResolution {
        /// Schema name, `None` when the file has no schema context.
        schema: Option<String>,
        /// Underlying error.
        message: String,
    },

    /// Table existence or column metadata could not be read. The table is
    /// skipped.
    #[error("Failed to introspect table '{table}': {message}")]
    Introspection {
        /// Table name.
        table: String,
        /// Underlying error.
        message: String,
    },

    /// A column entry could not be parsed. The column is skipped.
    #[error("Skipped column '{column}' of table '{table}': {message}")]
    ColumnParse {
        /// Table name.
        table: String,
        /// Column name or raw entry.
        column: String,
        /// Parse error.
        message: String,
    },

    /// A column alteration failed. The column is skipped.
    #[error("Failed to alter column '{column}' of table '{table}': {message}")]
    ColumnAlter {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// The failing statement.
        sql: String,
        /// Underlying error.
        message: String,
    },

    /// A table could not be created. The table is skipped.
    #[error("Failed to create table '{table}': {message}")]
    TableCreate {
        /// Table name.
        table: String,
        /// Underlying error.
        message: String,
    },
}

impl SyncError {
    /// Error for a file that declares tables but has no schema to put them
    /// in.
    #[must_use]
    pub fn missing_schema() -> Self {
        Self::SchemaResolution {
            schema: None,
            message: "no CREATE SCHEMA statement, no default schema and no database selected"
                .to_string(),
        }
    }

    /// Returns `true` if the error aborts the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryRead { .. } | Self::Connection { .. })
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_resolution_display() {
        let err = SyncError::SchemaResolution {
            schema: Some("shop".to_string()),
            message: "access denied".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to resolve schema 'shop': access denied");
        assert!(SyncError::missing_schema()
            .to_string()
            .starts_with("Failed to resolve schema: no CREATE SCHEMA"));
    }

    #[test]
    fn test_serialized_kind_tag() {
        let err = SyncError::TableCreate {
            table: "orders".to_string(),
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "table_create");
        assert_eq!(json["table"], "orders");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(SyncError::Connection {
            message: String::new()
        }
        .is_fatal());
        assert!(!SyncError::missing_schema().is_fatal());
    }
}
