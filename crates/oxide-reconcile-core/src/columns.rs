//! Column list extraction.
//!
//! Turns the body of a `CREATE TABLE` statement into an ordered list of
//! [`ColumnSpec`]s. The body is split on commas at parenthesis depth zero,
//! so type arguments such as `DECIMAL(10,2)` or `ENUM('a','b')` stay intact.

use std::collections::BTreeSet;
use std::fmt;

use crate::scanner::{collapse_whitespace, split_on, strip_unbalanced_closers};
use crate::statement::{is_word_char, read_quoted_identifier};

/// Leading keywords of table-level clauses (indexes, keys, constraints).
const CLAUSE_KEYWORDS: &[&str] = &[
    "CHECK",
    "CONSTRAINT",
    "FOREIGN",
    "FULLTEXT",
    "INDEX",
    "KEY",
    "PRIMARY",
    "SPATIAL",
    "UNIQUE",
];

/// Data type names that may open a column definition.
const DATA_TYPES: &[&str] = &[
    "BIGINT",
    "BINARY",
    "BIT",
    "BLOB",
    "BOOL",
    "BOOLEAN",
    "CHAR",
    "CHARACTER",
    "DATE",
    "DATETIME",
    "DEC",
    "DECIMAL",
    "DOUBLE",
    "ENUM",
    "FIXED",
    "FLOAT",
    "GEOMETRY",
    "INT",
    "INTEGER",
    "JSON",
    "LINESTRING",
    "LONGBLOB",
    "LONGTEXT",
    "MEDIUMBLOB",
    "MEDIUMINT",
    "MEDIUMTEXT",
    "NCHAR",
    "NUMERIC",
    "NVARCHAR",
    "POINT",
    "POLYGON",
    "REAL",
    "SERIAL",
    "SET",
    "SMALLINT",
    "TEXT",
    "TIME",
    "TIMESTAMP",
    "TINYBLOB",
    "TINYINT",
    "TINYTEXT",
    "VARBINARY",
    "VARCHAR",
    "YEAR",
];

/// Returns `true` if `word` names a data type.
#[must_use]
pub fn is_data_type(word: &str) -> bool {
    DATA_TYPES.iter().any(|t| t.eq_ignore_ascii_case(word))
}

/// A column as declared in a definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name, unquoted, case as written.
    pub name: String,
    /// Type and constraint text, e.g. `VARCHAR(255) NOT NULL DEFAULT 'x'`.
    pub definition: String,
}

impl ColumnSpec {
    /// Creates a new column spec.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// Why a column entry could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnParseErrorKind {
    /// The entry has a name but no type or constraint text.
    EmptyDefinition,
    /// The entry does not start with a usable column name.
    MissingName,
    /// The column name was already declared earlier in the list.
    DuplicateColumn,
}

/// A column entry that was skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnParseError {
    /// The offending column name, or the raw entry when no name was found.
    pub column: String,
    /// What was wrong with it.
    pub kind: ColumnParseErrorKind,
}

impl ColumnParseError {
    fn new(column: impl Into<String>, kind: ColumnParseErrorKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}

impl fmt::Display for ColumnParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ColumnParseErrorKind::EmptyDefinition => {
                write!(f, "Column definition is empty: {}", self.column)
            }
            ColumnParseErrorKind::MissingName => {
                write!(f, "Column entry has no name: {}", self.column)
            }
            ColumnParseErrorKind::DuplicateColumn => {
                write!(f, "Column declared more than once: {}", self.column)
            }
        }
    }
}

impl std::error::Error for ColumnParseError {}

/// Result of extracting the columns of one table body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Usable columns in declaration order.
    pub columns: Vec<ColumnSpec>,
    /// Entries that were rejected.
    pub errors: Vec<ColumnParseError>,
    /// Table-level clauses (keys, indexes, constraints) that were skipped.
    pub clauses: Vec<String>,
}

impl Extraction {
    /// Looks up an extracted column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// One comma-separated entry of a column list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Column(ColumnSpec),
    Clause(String),
    Invalid(ColumnParseError),
}

/// Splits a table body into its comma-separated entries.
#[must_use]
pub fn split_column_list(body: &str) -> Vec<&str> {
    split_on(body, ',', true)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extracts the columns declared in a table body.
///
/// Bad entries are reported in [`Extraction::errors`] and do not stop the
/// remaining entries from being extracted.
#[must_use]
pub fn extract_columns(body: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let mut seen = BTreeSet::new();

    for raw in split_column_list(body) {
        match parse_entry(raw) {
            Entry::Column(column) => {
                if seen.insert(column.name.clone()) {
                    extraction.columns.push(column);
                } else {
                    extraction.errors.push(ColumnParseError::new(
                        column.name,
                        ColumnParseErrorKind::DuplicateColumn,
                    ));
                }
            }
            Entry::Clause(clause) => extraction.clauses.push(clause),
            Entry::Invalid(error) => extraction.errors.push(error),
        }
    }

    extraction
}

fn parse_entry(raw: &str) -> Entry {
    let (name, quoted, rest) = match split_name(raw) {
        Some(parts) => parts,
        None => {
            return Entry::Invalid(ColumnParseError::new(
                collapse_whitespace(raw),
                ColumnParseErrorKind::MissingName,
            ))
        }
    };

    if !quoted && is_clause_keyword(&name) && !starts_with_data_type(rest) {
        return Entry::Clause(collapse_whitespace(raw));
    }

    let definition = collapse_whitespace(rest);
    let definition = strip_unbalanced_closers(&definition);
    if definition.is_empty() {
        return Entry::Invalid(ColumnParseError::new(
            name,
            ColumnParseErrorKind::EmptyDefinition,
        ));
    }

    Entry::Column(ColumnSpec::new(name, definition))
}

/// Splits an entry into its leading name and the remaining text.
///
/// Returns the name, whether it was quoted, and the rest of the entry.
fn split_name(raw: &str) -> Option<(String, bool, &str)> {
    let first = raw.chars().next()?;
    if first == '`' || first == '"' {
        let (name, consumed) = read_quoted_identifier(raw, first)?;
        return Some((name, true, &raw[consumed..]));
    }

    let len = raw
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(raw.len(), |(i, _)| i);
    if len == 0 {
        return None;
    }
    let rest = &raw[len..];
    // A name must be followed by a separator, not glued to other symbols.
    if rest
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace() && c != '(')
    {
        return None;
    }
    Some((raw[..len].to_string(), false, rest))
}

fn is_clause_keyword(word: &str) -> bool {
    CLAUSE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

fn starts_with_data_type(rest: &str) -> bool {
    let rest = rest.trim_start();
    let len = rest
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(rest.len(), |(i, _)| i);
    is_data_type(&rest[..len])
}
