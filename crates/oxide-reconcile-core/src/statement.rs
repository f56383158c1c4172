//! Definition file parsing.
//!
//! A definition file is a sequence of `;`-terminated statements. Only two
//! forms are recognised:
//!
//! ```sql
//! CREATE SCHEMA <name>;
//! CREATE TABLE IF NOT EXISTS <name> ( <column> <definition>, ... );
//! ```
//!
//! Everything else (comments, `INSERT`s, plain `CREATE TABLE`) is ignored.

use crate::scanner::{matching_paren, split_on};

/// A `CREATE SCHEMA` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDeclaration {
    /// Schema name, unquoted.
    pub name: String,
}

/// A `CREATE TABLE IF NOT EXISTS` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDeclaration {
    /// Table name, unquoted.
    pub name: String,
    /// Text between the outer parentheses of the column list.
    pub body: String,
    /// The statement exactly as written, without the trailing `;`.
    pub sql: String,
}

/// A recognised statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `CREATE SCHEMA <name>`.
    Schema(SchemaDeclaration),
    /// `CREATE TABLE IF NOT EXISTS <name> (...)`.
    Table(TableDeclaration),
}

impl Statement {
    /// Returns the name of the declared schema or table.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Schema(s) => &s.name,
            Self::Table(t) => &t.name,
        }
    }
}

/// Splits file text into trimmed, non-empty statements.
///
/// Semicolons inside quoted literals, quoted identifiers and comments do not
/// terminate a statement.
#[must_use]
pub fn split_statements(text: &str) -> Vec<&str> {
    split_on(text, ';', false)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Classifies a single statement.
///
/// Returns `None` for anything that is not a schema declaration or an
/// idempotent table declaration.
#[must_use]
pub fn parse_statement(sql: &str) -> Option<Statement> {
    let sql = sql.trim();
    let mut cursor = Cursor::new(sql);

    if !cursor.keyword("CREATE") {
        return None;
    }

    if cursor.keyword("SCHEMA") || cursor.keyword("DATABASE") {
        cursor.if_not_exists();
        let name = cursor.identifier()?;
        return Some(Statement::Schema(SchemaDeclaration { name }));
    }

    if !cursor.keyword("TABLE") || !cursor.if_not_exists() {
        return None;
    }
    let name = cursor.identifier()?;
    cursor.skip_trivia();

    let open = cursor.pos;
    if !sql[open..].starts_with('(') {
        return None;
    }
    // An unterminated column list keeps everything after the opener; stray
    // closers are dealt with per column.
    let body = match matching_paren(sql, open) {
        Some(close) => &sql[open + 1..close],
        None => &sql[open + 1..],
    };

    Some(Statement::Table(TableDeclaration {
        name,
        body: body.to_string(),
        sql: sql.to_string(),
    }))
}

/// A parsed definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    /// File name, used for reporting.
    pub name: String,
    /// Recognised statements in file order.
    pub statements: Vec<Statement>,
}

impl DefinitionFile {
    /// Parses file text, keeping only recognised statements.
    #[must_use]
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let statements = split_statements(text)
            .into_iter()
            .filter_map(parse_statement)
            .collect();
        Self {
            name: name.into(),
            statements,
        }
    }

    /// Reduces the statements to the schemas and tables to reconcile.
    #[must_use]
    pub fn plan(&self) -> FilePlan {
        FilePlan::fold(&self.statements)
    }
}

/// The effective content of a definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePlan {
    /// Declared schemas, each once, ordered so that the last declared one
    /// comes last.
    pub schemas: Vec<String>,
    /// Table declarations, one per name, in order of first appearance.
    pub tables: Vec<TableDeclaration>,
}

impl FilePlan {
    /// Folds a statement sequence into a plan.
    ///
    /// The last `CREATE SCHEMA` wins as the target schema, and a later
    /// declaration of the same table replaces the earlier one in place.
    pub fn fold<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> Self {
        statements.into_iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, statement: &Statement) -> Self {
        match statement {
            Statement::Schema(schema) => {
                self.schemas.retain(|s| s != &schema.name);
                self.schemas.push(schema.name.clone());
            }
            Statement::Table(table) => {
                match self.tables.iter_mut().find(|t| t.name == table.name) {
                    Some(existing) => *existing = table.clone(),
                    None => self.tables.push(table.clone()),
                }
            }
        }
        self
    }

    /// The schema all tables of the file belong to.
    #[must_use]
    pub fn target_schema(&self) -> Option<&str> {
        self.schemas.last().map(String::as_str)
    }

    /// Looks up a table declaration by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDeclaration> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns `true` if the file declares nothing to reconcile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.tables.is_empty()
    }
}

/// Word-level cursor over a statement prefix.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("--") || trimmed.starts_with('#') {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else if let Some(comment) = trimmed.strip_prefix("/*") {
                self.pos += comment.find("*/").map_or(trimmed.len(), |end| end + 4);
            } else {
                break;
            }
        }
    }

    /// Consumes `keyword` (case-insensitive) if it is the next word.
    fn keyword(&mut self, keyword: &str) -> bool {
        self.skip_trivia();
        let rest = self.rest();
        let Some(head) = rest.get(..keyword.len()) else {
            return false;
        };
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        if head.eq_ignore_ascii_case(keyword) && boundary {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    /// Consumes an optional `IF NOT EXISTS`.
    fn if_not_exists(&mut self) -> bool {
        let saved = self.pos;
        if self.keyword("IF") && self.keyword("NOT") && self.keyword("EXISTS") {
            true
        } else {
            self.pos = saved;
            false
        }
    }

    /// Consumes a plain, backtick-quoted or double-quoted identifier.
    fn identifier(&mut self) -> Option<String> {
        self.skip_trivia();
        let rest = self.rest();
        let first = rest.chars().next()?;

        if first == '`' || first == '"' {
            let (name, consumed) = read_quoted_identifier(rest, first)?;
            self.pos += consumed;
            return Some(name);
        }

        let len = rest
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(rest[..len].to_string())
    }
}

/// Characters allowed in an unquoted MySQL identifier.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Reads a quoted identifier at the start of `input`.
///
/// Returns the unquoted name (doubled quotes collapsed) and the number of
/// bytes consumed, closing quote included.
pub(crate) fn read_quoted_identifier(input: &str, quote: char) -> Option<(String, usize)> {
    let mut name = String::new();
    let mut chars = input.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            if chars.peek().is_some_and(|(_, next)| *next == quote) {
                chars.next();
                name.push(quote);
                continue;
            }
            if name.is_empty() {
                return None;
            }
            return Some((name, i + c.len_utf8()));
        }
        name.push(c);
    }
    None
}
