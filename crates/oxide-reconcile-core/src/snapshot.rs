//! Live table state as read from the catalog.

use crate::columns::ColumnSpec;
use crate::shape::ColumnShape;

/// One column of a live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotColumn {
    /// Column name as stored by the catalog.
    pub name: String,
    /// `COLUMN_TYPE`, e.g. `varchar(255)` or `int unsigned`.
    pub column_type: String,
    /// Whether `IS_NULLABLE` is `YES`.
    pub nullable: bool,
    /// Raw `COLUMN_DEFAULT`.
    pub default: Option<String>,
}

impl SnapshotColumn {
    /// Creates a nullable column without a default.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: true,
            default: None,
        }
    }

    /// Marks the column as `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the raw default value.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Builds the column a declaration would produce once created, spelled
    /// the way `INFORMATION_SCHEMA.COLUMNS` reports it.
    #[must_use]
    pub fn from_spec(spec: &ColumnSpec) -> Self {
        let shape = ColumnShape::from_definition(&spec.definition);
        Self {
            name: spec.name.clone(),
            column_type: shape.catalog_type(),
            nullable: shape.nullable,
            default: shape.catalog_default(),
        }
    }

    /// Returns the comparable shape of this column.
    #[must_use]
    pub fn shape(&self) -> ColumnShape {
        ColumnShape::from_catalog(&self.column_type, self.nullable, self.default.as_deref())
    }
}

/// The columns of a live table in ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Table name.
    pub name: String,
    /// Columns, unique by name.
    pub columns: Vec<SnapshotColumn>,
}

impl TableSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column, replacing any column of the same name.
    #[must_use]
    pub fn column(mut self, column: SnapshotColumn) -> Self {
        self.push(column);
        self
    }

    /// Adds a column in place, replacing any column of the same name.
    pub fn push(&mut self, column: SnapshotColumn) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Removes a column by name, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<SnapshotColumn> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(index))
    }

    /// Builds the snapshot a table declaration would produce once created.
    #[must_use]
    pub fn from_columns(name: impl Into<String>, columns: &[ColumnSpec]) -> Self {
        columns
            .iter()
            .map(SnapshotColumn::from_spec)
            .fold(Self::new(name), Self::column)
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SnapshotColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the table has a column with this name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Column names in ordinal order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
