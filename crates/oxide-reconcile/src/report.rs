//! Structured results of a reconciliation run.

use serde::Serialize;

use crate::error::SyncError;

/// What happened to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOutcome {
    /// The table did not exist and was created.
    Created,
    /// At least one column statement was applied.
    Altered,
    /// The table already matched its declaration.
    Unchanged,
    /// Changes were needed but none could be applied.
    Failed,
}

/// Result of reconciling one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    /// Table name.
    pub table: String,
    /// Overall outcome.
    pub outcome: TableOutcome,
    /// Statements applied (or, in dry-run mode, that would be applied).
    pub statements: Vec<String>,
    /// Table-level clauses that were not reconciled.
    pub skipped_clauses: Vec<String>,
    /// Failures isolated to this table or its columns.
    pub errors: Vec<SyncError>,
}

impl TableReport {
    /// Creates an empty report for a table.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            outcome: TableOutcome::Unchanged,
            statements: Vec::new(),
            skipped_clauses: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Records a failure that stops work on the table.
    #[must_use]
    pub fn failed(mut self, error: SyncError) -> Self {
        self.outcome = TableOutcome::Failed;
        self.errors.push(error);
        self
    }
}

/// Result of reconciling one definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File path.
    pub path: String,
    /// Schema the file's tables were reconciled in.
    pub schema: Option<String>,
    /// Schemas that had to be created.
    pub schemas_created: Vec<String>,
    /// Number of recognised statements.
    pub statements: usize,
    /// Per-table results in declaration order.
    pub tables: Vec<TableReport>,
    /// Failures that stopped the file.
    pub errors: Vec<SyncError>,
}

impl FileReport {
    /// Creates an empty report for a file.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            schema: None,
            schemas_created: Vec::new(),
            statements: 0,
            tables: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Records a failure that stops the file.
    #[must_use]
    pub fn failed(mut self, error: SyncError) -> Self {
        self.errors.push(error);
        self
    }

    /// Looks up a table result by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Drop policy the run used.
    pub policy: String,
    /// Whether statements were only previewed.
    pub dry_run: bool,
    /// Per-file results in processing order.
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Iterates over every table result of the run.
    pub fn tables(&self) -> impl Iterator<Item = &TableReport> {
        self.files.iter().flat_map(|f| f.tables.iter())
    }

    /// Looks up the first result for a table name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables().find(|t| t.table == name)
    }

    /// Iterates over every recorded failure, file-level first.
    pub fn errors(&self) -> impl Iterator<Item = &SyncError> {
        self.files.iter().flat_map(|f| {
            f.errors
                .iter()
                .chain(f.tables.iter().flat_map(|t| t.errors.iter()))
        })
    }

    /// Iterates over every statement applied to tables.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.tables()
            .flat_map(|t| t.statements.iter().map(String::as_str))
    }

    /// Returns `true` if nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Counts tables per outcome.
    #[must_use]
    pub fn count(&self, outcome: TableOutcome) -> usize {
        self.tables().filter(|t| t.outcome == outcome).count()
    }
}
