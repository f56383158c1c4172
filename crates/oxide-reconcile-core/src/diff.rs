//! Column-level diffing of declared and live tables.
//!
//! The differ compares the [`ColumnSpec`]s of a table declaration with the
//! [`TableSnapshot`] read from the catalog and produces the [`DiffPlan`] that
//! brings the live table in line. Columns are matched by name; a matched
//! column is modified only when its canonical [`ColumnShape`] differs, so a
//! plan computed right after applying the previous one is empty.

use std::fmt;
use std::str::FromStr;

use crate::columns::ColumnSpec;
use crate::operation::SchemaOperation;
use crate::shape::ColumnShape;
use crate::snapshot::{SnapshotColumn, TableSnapshot};

/// Name of the identity column every managed table carries.
pub const IDENTITY_COLUMN: &str = "id";

/// Definition used when the identity column has to be synthesized.
pub const IDENTITY_DEFINITION: &str = "INT AUTO_INCREMENT PRIMARY KEY";

/// What to do with live columns that are no longer declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncPolicy {
    /// Keep them. Reconciliation only ever adds or modifies columns.
    #[default]
    Additive,
    /// Drop them, except for the identity column.
    Destructive,
}

impl SyncPolicy {
    /// Returns the policy name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Destructive => "destructive",
        }
    }

    /// Returns `true` if undeclared columns are dropped.
    #[must_use]
    pub const fn drops_columns(self) -> bool {
        matches!(self, Self::Destructive)
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown sync policy '{}' (expected 'additive' or 'destructive')",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for SyncPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "destructive" => Ok(Self::Destructive),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// A declared column whose live counterpart has a different shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    /// The column as declared.
    pub desired: ColumnSpec,
    /// The column as it currently exists.
    pub current: SnapshotColumn,
}

/// The column changes needed to reconcile one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPlan {
    /// Table name.
    pub table: String,
    /// Declared columns missing from the live table, the identity column
    /// last.
    pub to_add: Vec<ColumnSpec>,
    /// Declared columns whose live shape differs.
    pub to_modify: Vec<ColumnChange>,
    /// Live columns to drop. Always empty under [`SyncPolicy::Additive`].
    pub to_drop: Vec<String>,
}

impl DiffPlan {
    /// Returns `true` if the table is already reconciled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_modify.is_empty() && self.to_drop.is_empty()
    }

    /// Returns the total number of column changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_modify.len() + self.to_drop.len()
    }

    /// Converts the plan into operations in execution order.
    ///
    /// Additions come first, then modifications, then drops. The identity
    /// column is added after everything else so a failing primary key does
    /// not hide the other changes.
    #[must_use]
    pub fn operations(&self) -> Vec<SchemaOperation> {
        let (identity, columns): (Vec<&ColumnSpec>, Vec<&ColumnSpec>) = self
            .to_add
            .iter()
            .partition(|c| c.name == IDENTITY_COLUMN);

        let adds = columns.into_iter().map(|column| SchemaOperation::AddColumn {
            table: self.table.clone(),
            column: column.clone(),
        });
        let modifies = self
            .to_modify
            .iter()
            .map(|change| SchemaOperation::ModifyColumn {
                table: self.table.clone(),
                column: change.desired.clone(),
            });
        let drops = self.to_drop.iter().map(|name| SchemaOperation::DropColumn {
            table: self.table.clone(),
            column: name.clone(),
        });
        let identity = identity.into_iter().map(|column| SchemaOperation::AddColumn {
            table: self.table.clone(),
            column: column.clone(),
        });

        adds.chain(modifies).chain(drops).chain(identity).collect()
    }
}

/// Computes [`DiffPlan`]s under a fixed [`SyncPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ {
    policy: SyncPolicy,
}

impl Differ {
    /// Creates a differ with the given policy.
    #[must_use]
    pub const fn new(policy: SyncPolicy) -> Self {
        Self { policy }
    }

    /// Returns the drop policy.
    #[must_use]
    pub const fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Diffs the declared columns of a table against its live snapshot.
    #[must_use]
    pub fn diff_table(&self, desired: &[ColumnSpec], snapshot: &TableSnapshot) -> DiffPlan {
        let mut plan = DiffPlan {
            table: snapshot.name.clone(),
            ..DiffPlan::default()
        };
        let mut identity = None;

        for column in desired {
            match snapshot.get(&column.name) {
                None if column.name == IDENTITY_COLUMN => identity = Some(column.clone()),
                None => plan.to_add.push(column.clone()),
                // The identity column is only ever created, never reshaped.
                Some(_) if column.name == IDENTITY_COLUMN => {}
                Some(current) => {
                    if ColumnShape::from_definition(&column.definition) != current.shape() {
                        plan.to_modify.push(ColumnChange {
                            desired: column.clone(),
                            current: current.clone(),
                        });
                    }
                }
            }
        }

        if !snapshot.has_column(IDENTITY_COLUMN) {
            plan.to_add.push(identity.unwrap_or_else(|| {
                ColumnSpec::new(IDENTITY_COLUMN, IDENTITY_DEFINITION)
            }));
        }

        if self.policy.drops_columns() {
            plan.to_drop = snapshot
                .column_names()
                .filter(|name| *name != IDENTITY_COLUMN)
                .filter(|name| !desired.iter().any(|c| c.name == *name))
                .map(str::to_string)
                .collect();
        }

        plan
    }
}

/// Diffs a table with a one-off [`Differ`].
#[must_use]
pub fn diff_table(desired: &[ColumnSpec], snapshot: &TableSnapshot, policy: SyncPolicy) -> DiffPlan {
    Differ::new(policy).diff_table(desired, snapshot)
}
