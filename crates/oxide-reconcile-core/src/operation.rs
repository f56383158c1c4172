//! Structural operations applied to the catalog.

use crate::columns::ColumnSpec;

/// A single DDL operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOperation {
    /// Create a schema.
    CreateSchema {
        /// Schema name.
        name: String,
    },
    /// Switch the session to a schema.
    UseSchema {
        /// Schema name.
        name: String,
    },
    /// Create a table from its declaration, verbatim.
    CreateTable {
        /// Table name.
        table: String,
        /// The declaring `CREATE TABLE IF NOT EXISTS` statement.
        sql: String,
    },
    /// Add a column to an existing table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column to add.
        column: ColumnSpec,
    },
    /// Redefine an existing column.
    ModifyColumn {
        /// Table name.
        table: String,
        /// New column definition.
        column: ColumnSpec,
    },
    /// Drop a column.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

impl SchemaOperation {
    /// Creates a `CreateSchema` operation.
    #[must_use]
    pub fn create_schema(name: impl Into<String>) -> Self {
        Self::CreateSchema { name: name.into() }
    }

    /// Creates a `UseSchema` operation.
    #[must_use]
    pub fn use_schema(name: impl Into<String>) -> Self {
        Self::UseSchema { name: name.into() }
    }

    /// Creates a `CreateTable` operation.
    #[must_use]
    pub fn create_table(table: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::CreateTable {
            table: table.into(),
            sql: sql.into(),
        }
    }

    /// Short snake-case name of the operation, used in logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateSchema { .. } => "create_schema",
            Self::UseSchema { .. } => "use_schema",
            Self::CreateTable { .. } => "create_table",
            Self::AddColumn { .. } => "add_column",
            Self::ModifyColumn { .. } => "modify_column",
            Self::DropColumn { .. } => "drop_column",
        }
    }

    /// The table the operation targets, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::CreateSchema { .. } | Self::UseSchema { .. } => None,
            Self::CreateTable { table, .. }
            | Self::AddColumn { table, .. }
            | Self::ModifyColumn { table, .. }
            | Self::DropColumn { table, .. } => Some(table),
        }
    }

    /// The column the operation targets, if any.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::AddColumn { column, .. } | Self::ModifyColumn { column, .. } => {
                Some(&column.name)
            }
            Self::DropColumn { column, .. } => Some(column),
            _ => None,
        }
    }

    /// Returns `true` for column-level alterations.
    #[must_use]
    pub const fn is_column_change(&self) -> bool {
        matches!(
            self,
            Self::AddColumn { .. } | Self::ModifyColumn { .. } | Self::DropColumn { .. }
        )
    }
}
