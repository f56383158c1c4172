//! Canonical column shapes.
//!
//! A declared column definition and a catalog row describe the same column
//! in different words: `INTEGER NOT NULL DEFAULT '0'` in a definition file is
//! `int` / `NO` / `0` in `INFORMATION_SCHEMA.COLUMNS`. Both sides are reduced
//! to a [`ColumnShape`] holding only what the catalog can report (type,
//! nullability, default) in one canonical spelling, so comparing rendered
//! shapes is a plain string comparison.

use std::fmt;

use crate::scanner::{CharClass, Scanned, Scanner};

/// Integer types whose display width is not part of the type.
const INTEGER_TYPES: &[&str] = &["TINYINT", "SMALLINT", "MEDIUMINT", "INT", "BIGINT"];

/// Types whose defaults may be `CURRENT_TIMESTAMP` and friends.
const TEMPORAL_TYPES: &[&str] = &["DATETIME", "TIMESTAMP", "DATE", "TIME"];

/// Binary string types; their literal defaults are reported as `0x..`.
const BINARY_TYPES: &[&str] = &[
    "BINARY",
    "VARBINARY",
    "TINYBLOB",
    "BLOB",
    "MEDIUMBLOB",
    "LONGBLOB",
];

/// The comparable part of a column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnShape {
    /// Canonical type, e.g. `VARCHAR(255)`, `INT UNSIGNED`, `ENUM('a','b')`.
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Canonical default value, `None` when there is none (or it is NULL).
    pub default: Option<String>,
}

impl ColumnShape {
    /// Reduces declared type/constraint text to its canonical shape.
    ///
    /// Attributes the catalog does not report back through
    /// `INFORMATION_SCHEMA.COLUMNS` type/nullability/default (such as
    /// `AUTO_INCREMENT`, `UNIQUE`, `COMMENT`, `COLLATE`, `ON UPDATE`) are
    /// ignored.
    #[must_use]
    pub fn from_definition(definition: &str) -> Self {
        let tokens = tokenize(definition);
        let mut tokens = tokens.iter().copied().peekable();
        let mut shape = Self {
            data_type: String::new(),
            nullable: true,
            default: None,
        };

        if let Some(&Token::Word(word)) = tokens.peek() {
            tokens.next();
            let mut name = word.to_ascii_uppercase();
            if let Some(&Token::Word(second)) = tokens.peek() {
                let pair = format!("{name} {}", second.to_ascii_uppercase());
                if pair == "DOUBLE PRECISION" || pair == "CHARACTER VARYING" {
                    tokens.next();
                    name = pair;
                }
            }

            let args = match tokens.peek() {
                Some(&Token::Group(group)) => {
                    tokens.next();
                    Some(canonical_expression(group))
                }
                _ => None,
            };

            let mut unsigned = false;
            let mut zerofill = false;
            while let Some(&Token::Word(word)) = tokens.peek() {
                match word.to_ascii_uppercase().as_str() {
                    "UNSIGNED" => unsigned = true,
                    "ZEROFILL" => zerofill = true,
                    "SIGNED" => {}
                    _ => break,
                }
                tokens.next();
            }

            if name == "SERIAL" {
                shape.data_type = "BIGINT UNSIGNED".to_string();
                shape.nullable = false;
            } else {
                shape.data_type = canonical_type(&name, args, unsigned, zerofill);
            }
        }

        while let Some(token) = tokens.next() {
            let Token::Word(word) = token else {
                continue;
            };
            match word.to_ascii_uppercase().as_str() {
                "NOT" => {
                    if let Some(&Token::Word(next)) = tokens.peek() {
                        if next.eq_ignore_ascii_case("NULL") {
                            tokens.next();
                            shape.nullable = false;
                        }
                    }
                }
                "NULL" => shape.nullable = true,
                "PRIMARY" => shape.nullable = false,
                "DEFAULT" => {
                    shape.default = match tokens.next() {
                        Some(Token::Quoted(literal)) => Some(canonical_literal(literal)),
                        Some(Token::Word(value)) => {
                            let call = match tokens.peek() {
                                Some(&Token::Group(args)) => {
                                    tokens.next();
                                    args
                                }
                                _ => "",
                            };
                            canonical_default_word(value, call)
                        }
                        Some(Token::Group(expr)) => {
                            let inner = expr
                                .strip_prefix('(')
                                .and_then(|e| e.strip_suffix(')'))
                                .unwrap_or(expr);
                            Some(collapse_expression(inner))
                        }
                        None => None,
                    };
                }
                _ => {}
            }
        }

        shape.default = shape
            .default
            .take()
            .map(|value| typed_default(&shape.data_type, value));
        shape
    }

    /// Builds the shape of a column as reported by the catalog.
    ///
    /// `column_type` is `INFORMATION_SCHEMA.COLUMNS.COLUMN_TYPE` and `default`
    /// is `COLUMN_DEFAULT` as MySQL reports it: string literals unquoted,
    /// `None` for no default. MariaDB values go through
    /// [`mariadb_column_default`] first.
    #[must_use]
    pub fn from_catalog(column_type: &str, nullable: bool, default: Option<&str>) -> Self {
        let mut shape = Self::from_definition(column_type);
        shape.nullable = nullable;
        shape.default = default.map(|raw| {
            let value = canonical_catalog_default(&shape.data_type, raw);
            typed_default(&shape.data_type, value)
        });
        shape
    }

    /// `COLUMN_TYPE` MySQL reports for a column of this shape.
    #[must_use]
    pub fn catalog_type(&self) -> String {
        Scanner::new(&self.data_type)
            .map(|s| {
                if s.class == CharClass::Code {
                    s.ch.to_ascii_lowercase()
                } else {
                    s.ch
                }
            })
            .collect()
    }

    /// `COLUMN_DEFAULT` MySQL reports for a column of this shape.
    ///
    /// Decimal defaults are padded to the column's scale (`0` on a
    /// `DECIMAL(10,2)` reads back as `0.00`).
    #[must_use]
    pub fn catalog_default(&self) -> Option<String> {
        let default = self.default.as_deref()?;
        let padded = decimal_scale(&self.data_type)
            .and_then(|scale| pad_scale(default, scale))
            .unwrap_or_else(|| default.to_string());
        Some(padded)
    }
}

/// Converts a MariaDB `COLUMN_DEFAULT` to the MySQL spelling expected by
/// [`ColumnShape::from_catalog`].
///
/// MariaDB reports no default as the text `NULL` and quotes string literals.
#[must_use]
pub fn mariadb_column_default(raw: &str) -> Option<String> {
    if raw == "NULL" {
        None
    } else if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        Some(unquote(raw))
    } else {
        Some(raw.to_string())
    }
}

impl fmt::Display for ColumnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data_type)?;
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        if let Some(default) = &self.default {
            write!(f, " DEFAULT '{}'", default.replace('\'', "''"))?;
        }
        Ok(())
    }
}

/// A lexical unit of a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// A bare word: keyword, identifier, number.
    Word(&'a str),
    /// A quoted literal, quotes included.
    Quoted(&'a str),
    /// A parenthesized group, parentheses included.
    Group(&'a str),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let scanned: Vec<Scanned> = Scanner::new(input).collect();
    let end_of = |j: usize| scanned.get(j).map_or(input.len(), |s| s.offset);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < scanned.len() {
        let s = scanned[i];
        match s.class {
            CharClass::Comment => i += 1,
            CharClass::Code if s.ch.is_whitespace() => i += 1,
            CharClass::Quoted => {
                let mut j = i + 1;
                while j < scanned.len() && scanned[j].class == CharClass::Quoted {
                    j += 1;
                }
                tokens.push(Token::Quoted(&input[s.offset..end_of(j)]));
                i = j;
            }
            CharClass::Code if s.ch == '(' => {
                let outer = s.depth - 1;
                let mut j = i + 1;
                while j < scanned.len()
                    && !(scanned[j].class == CharClass::Code
                        && scanned[j].ch == ')'
                        && scanned[j].depth == outer)
                {
                    j += 1;
                }
                let end = scanned.get(j).map_or(input.len(), |c| c.offset + 1);
                tokens.push(Token::Group(&input[s.offset..end]));
                i = j + 1;
            }
            CharClass::Code => {
                let mut j = i + 1;
                while j < scanned.len()
                    && scanned[j].class == CharClass::Code
                    && !scanned[j].ch.is_whitespace()
                    && scanned[j].ch != '('
                {
                    j += 1;
                }
                let word = &input[s.offset..end_of(j)];
                // `b'0'`, `x'0F'`, `N'abc'` and `_utf8mb4'abc'` are one literal.
                if j < scanned.len()
                    && scanned[j].class == CharClass::Quoted
                    && matches!(scanned[j].ch, '\'' | '"')
                    && is_literal_prefix(word)
                {
                    j += 1;
                    while j < scanned.len() && scanned[j].class == CharClass::Quoted {
                        j += 1;
                    }
                    tokens.push(Token::Quoted(&input[s.offset..end_of(j)]));
                } else {
                    tokens.push(Token::Word(word));
                }
                i = j;
            }
        }
    }

    tokens
}

fn is_literal_prefix(word: &str) -> bool {
    matches!(word, "b" | "B" | "x" | "X" | "n" | "N")
        || word.strip_prefix('_').is_some_and(|charset| {
            !charset.is_empty() && charset.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}

/// Base type name of a canonical type, e.g. `DECIMAL` for `DECIMAL(10,2)`.
fn base_type(data_type: &str) -> &str {
    data_type.split(['(', ' ']).next().unwrap_or_default()
}

/// Maps a type name and its parts to the spelling MySQL reports.
fn canonical_type(name: &str, args: Option<String>, unsigned: bool, zerofill: bool) -> String {
    let base = match name {
        "INTEGER" => "INT",
        "BOOL" | "BOOLEAN" => "TINYINT",
        "DEC" | "NUMERIC" | "FIXED" => "DECIMAL",
        "CHARACTER" | "NCHAR" => "CHAR",
        "NVARCHAR" | "CHARACTER VARYING" => "VARCHAR",
        "REAL" | "DOUBLE PRECISION" => "DOUBLE",
        other => other,
    };

    let args = if INTEGER_TYPES.contains(&base) || base == "YEAR" {
        None
    } else {
        match base {
            "DECIMAL" => Some(match args {
                None => "(10,0)".to_string(),
                Some(a) if !a.contains(',') => format!("{},0)", a.trim_end_matches(')')),
                Some(a) => a,
            }),
            "CHAR" | "BINARY" | "BIT" => args.or_else(|| Some("(1)".to_string())),
            _ => args,
        }
    };

    let mut out = base.to_string();
    if let Some(args) = args {
        out.push_str(&args);
    }
    if unsigned || zerofill {
        out.push_str(" UNSIGNED");
    }
    if zerofill {
        out.push_str(" ZEROFILL");
    }
    out
}

/// Removes code whitespace and uppercases code characters; quoted text is
/// kept verbatim.
fn canonical_expression(input: &str) -> String {
    Scanner::new(input)
        .filter(|s| !(s.class == CharClass::Code && s.ch.is_whitespace()))
        .filter(|s| s.class != CharClass::Comment)
        .map(|s| {
            if s.class == CharClass::Code {
                s.ch.to_ascii_uppercase()
            } else {
                s.ch
            }
        })
        .collect()
}

/// Removes code whitespace, keeping case; used for expression defaults.
fn collapse_expression(input: &str) -> String {
    Scanner::new(input)
        .filter(|s| s.class == CharClass::Quoted || !s.ch.is_whitespace())
        .filter(|s| s.class != CharClass::Comment)
        .map(|s| s.ch)
        .collect()
}

/// Strips the surrounding quotes of a literal and resolves escapes.
fn unquote(literal: &str) -> String {
    let mut chars = literal.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let inner: String = chars.collect();
    let inner = inner.strip_suffix(quote).unwrap_or(&inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && quote != '`' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == quote && chars.peek() == Some(&quote) {
            chars.next();
            out.push(quote);
        } else {
            out.push(c);
        }
    }
    out
}

/// Canonical value of a quoted literal. Bit-value and hexadecimal literals
/// keep their prefix; charset introducers are dropped.
fn canonical_literal(literal: &str) -> String {
    let start = literal.find(['\'', '"']).unwrap_or(0);
    let (prefix, quoted) = literal.split_at(start);
    let value = unquote(quoted);
    match prefix {
        "b" | "B" => format!("b'{value}'"),
        "x" | "X" => format!("x'{value}'"),
        _ => canonical_number(&value),
    }
}

/// Canonical spelling of a temporal function default (`now()`,
/// `CURRENT_TIMESTAMP(3)`); `None` for any other word.
fn temporal_function(word: &str, call: &str) -> Option<String> {
    let args = match canonical_expression(call).as_str() {
        "()" => String::new(),
        other => other.to_string(),
    };
    let value = match word.to_ascii_uppercase().as_str() {
        "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIME" | "LOCALTIMESTAMP" => {
            format!("CURRENT_TIMESTAMP{args}")
        }
        "CURRENT_DATE" | "CURDATE" => "CURRENT_DATE".to_string(),
        "CURRENT_TIME" | "CURTIME" => format!("CURRENT_TIME{args}"),
        _ => return None,
    };
    Some(value)
}

/// Canonical spelling of an unquoted declared default (`0`, `TRUE`,
/// `now()`). `call` is the argument group that followed the word, if any.
fn canonical_default_word(word: &str, call: &str) -> Option<String> {
    if let Some(function) = temporal_function(word, call) {
        return Some(function);
    }
    let value = match word.to_ascii_uppercase().as_str() {
        "NULL" => return None,
        "TRUE" => "1".to_string(),
        "FALSE" => "0".to_string(),
        _ => canonical_number(&format!("{word}{call}")),
    };
    Some(value)
}

/// Canonical form of a raw `COLUMN_DEFAULT`. The text is a literal value
/// unless it is a prefixed literal, or a temporal function on a temporal
/// column.
fn canonical_catalog_default(data_type: &str, raw: &str) -> String {
    let temporal = TEMPORAL_TYPES.contains(&base_type(data_type));
    match tokenize(raw).as_slice() {
        [Token::Quoted(literal)] if !literal.starts_with(['\'', '"']) => canonical_literal(literal),
        [Token::Word(word)] if temporal => {
            temporal_function(word, "").unwrap_or_else(|| raw.to_string())
        }
        [Token::Word(word), Token::Group(call)] if temporal => {
            temporal_function(word, call).unwrap_or_else(|| raw.to_string())
        }
        _ => canonical_number(raw),
    }
}

/// Rewrites a canonical default into the form its column type reports:
/// `b'101'` for `BIT`, `0x0F` for binary strings.
fn typed_default(data_type: &str, value: String) -> String {
    let base = base_type(data_type);
    if base == "BIT" {
        let number = radix_digits(&value)
            .and_then(|(radix, digits)| u64::from_str_radix(digits, radix).ok());
        if let Some(number) = number {
            return format!("b'{number:b}'");
        }
    } else if BINARY_TYPES.contains(&base) {
        if let Some((16, digits)) = radix_digits(&value) {
            return format!("0x{}", digits.to_ascii_uppercase());
        }
    }
    value
}

/// Splits a bit-value (`b'101'`, `0b101`), hexadecimal (`x'0F'`, `0x0F`) or
/// decimal literal into its radix and digits.
fn radix_digits(value: &str) -> Option<(u32, &str)> {
    let quoted = |prefix: [char; 2]| {
        value
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('\''))
            .and_then(|rest| rest.strip_suffix('\''))
    };
    let (radix, digits) = if let Some(digits) = value.strip_prefix("0b") {
        (2, digits)
    } else if let Some(digits) = value.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = quoted(['b', 'B']) {
        (2, digits)
    } else if let Some(digits) = quoted(['x', 'X']) {
        (16, digits)
    } else {
        (10, value)
    };
    let valid = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    valid.then_some((radix, digits))
}

/// Scale of a `DECIMAL(p,s)` type.
fn decimal_scale(data_type: &str) -> Option<usize> {
    let args = data_type.strip_prefix("DECIMAL(")?;
    let (_, scale) = args.split_once(',')?;
    scale.split(')').next()?.parse().ok()
}

/// Pads a canonical decimal number to `scale` fractional digits.
fn pad_scale(value: &str, scale: usize) -> Option<String> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !is_digits(int_part) || !is_digits(frac_part) {
        return None;
    }
    let sign = if value.starts_with('-') { "-" } else { "" };
    if scale == 0 {
        return Some(format!("{sign}{int_part}"));
    }
    Some(format!("{sign}{int_part}.{frac_part:0<scale$}"))
}

/// Normalizes a decimal number (`+1.50` → `1.5`, `0.00` → `0`); any other
/// text is returned unchanged.
fn canonical_number(value: &str) -> String {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let mut parts = unsigned.splitn(2, '.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part = parts.next();
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || frac_part.is_some_and(|f| !is_digits(f)) {
        return value.to_string();
    }

    let sign = if value.starts_with('-') { "-" } else { "" };
    let mut out = format!("{sign}{int_part}");
    if let Some(frac) = frac_part.map(|f| f.trim_end_matches('0')) {
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(definition: &str) -> String {
        ColumnShape::from_definition(definition).to_string()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("ENUM('a','b') DEFAULT 'a' NOT NULL"),
            vec![
                Token::Word("ENUM"),
                Token::Group("('a','b')"),
                Token::Word("DEFAULT"),
                Token::Quoted("'a'"),
                Token::Word("NOT"),
                Token::Word("NULL"),
            ]
        );
    }

    #[test]
    fn test_type_aliases_and_widths() {
        assert_eq!(shape("INTEGER(11)"), "INT");
        assert_eq!(shape("int(10) unsigned"), "INT UNSIGNED");
        assert_eq!(shape("BOOLEAN"), "TINYINT");
        assert_eq!(shape("tinyint(1)"), "TINYINT");
        assert_eq!(shape("NUMERIC(8)"), "DECIMAL(8,0)");
        assert_eq!(shape("decimal(10, 2)"), "DECIMAL(10,2)");
        assert_eq!(shape("CHAR"), "CHAR(1)");
        assert_eq!(shape("DOUBLE PRECISION"), "DOUBLE");
        assert_eq!(shape("SERIAL"), "BIGINT UNSIGNED NOT NULL");
        assert_eq!(shape("INT ZEROFILL"), "INT UNSIGNED ZEROFILL");
    }

    #[test]
    fn test_enum_values_keep_case() {
        assert_eq!(shape("enum('Yes', 'No')"), "ENUM('Yes','No')");
    }

    #[test]
    fn test_nullability() {
        assert_eq!(shape("VARCHAR(5) NOT NULL"), "VARCHAR(5) NOT NULL");
        assert_eq!(shape("VARCHAR(5) NULL"), "VARCHAR(5)");
        assert_eq!(shape("INT AUTO_INCREMENT PRIMARY KEY"), "INT NOT NULL");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(shape("VARCHAR(5) DEFAULT 'x'"), "VARCHAR(5) DEFAULT 'x'");
        assert_eq!(shape("VARCHAR(5) DEFAULT NULL"), "VARCHAR(5)");
        assert_eq!(shape("INT DEFAULT '0'"), "INT DEFAULT '0'");
        assert_eq!(shape("DECIMAL(10,2) DEFAULT 0.00"), "DECIMAL(10,2) DEFAULT '0'");
        assert_eq!(shape("TINYINT(1) DEFAULT TRUE"), "TINYINT DEFAULT '1'");
        assert_eq!(
            shape("TIMESTAMP DEFAULT now() ON UPDATE CURRENT_TIMESTAMP"),
            "TIMESTAMP DEFAULT 'CURRENT_TIMESTAMP'"
        );
        assert_eq!(
            shape("VARCHAR(36) DEFAULT (uuid())"),
            "VARCHAR(36) DEFAULT 'uuid()'"
        );
    }

    #[test]
    fn test_ignored_attributes() {
        assert_eq!(
            shape("VARCHAR(20) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin UNIQUE COMMENT 'NOT NULL'"),
            "VARCHAR(20)"
        );
    }

    #[test]
    fn test_catalog_shapes_match_declarations() {
        let pairs = [
            ("VARCHAR(255) NOT NULL DEFAULT 'x'", ("varchar(255)", false, Some("x"))),
            ("INT", ("int(11)", true, None)),
            ("DECIMAL(10,2) DEFAULT 0", ("decimal(10,2)", true, Some("0.00"))),
            ("DATETIME DEFAULT CURRENT_TIMESTAMP", ("datetime", true, Some("current_timestamp()"))),
            ("DATETIME DEFAULT now()", ("datetime", true, Some("CURRENT_TIMESTAMP"))),
            ("VARCHAR(10) DEFAULT 'a''b'", ("varchar(10)", true, Some("a'b"))),
            ("VARCHAR(10) DEFAULT NULL", ("varchar(10)", true, None)),
            ("BIGINT UNSIGNED NOT NULL", ("bigint unsigned", false, None)),
            ("BIT(1) NOT NULL DEFAULT b'0'", ("bit(1)", false, Some("b'0'"))),
            ("BIT(8) DEFAULT 5", ("bit(8)", true, Some("b'101'"))),
            ("VARBINARY(4) DEFAULT x'0f'", ("varbinary(4)", true, Some("0x0F"))),
            ("VARCHAR(10) DEFAULT N'abc'", ("varchar(10)", true, Some("abc"))),
            ("VARCHAR(10) DEFAULT _utf8mb4'abc'", ("varchar(10)", true, Some("abc"))),
            ("ENUM('new','paid') DEFAULT 'new'", ("enum('new','paid')", true, Some("new"))),
        ];
        for (declared, (column_type, nullable, default)) in pairs {
            assert_eq!(
                ColumnShape::from_definition(declared),
                ColumnShape::from_catalog(column_type, nullable, default),
                "{declared} vs {column_type}"
            );
        }
    }

    #[test]
    fn test_prefixed_literals_are_one_token() {
        assert_eq!(
            tokenize("BIT(1) DEFAULT b'0' COMMENT 'x'"),
            vec![
                Token::Word("BIT"),
                Token::Group("(1)"),
                Token::Word("DEFAULT"),
                Token::Quoted("b'0'"),
                Token::Word("COMMENT"),
                Token::Quoted("'x'"),
            ]
        );
        assert_eq!(
            tokenize("_utf8mb4'x' X'0F'"),
            vec![Token::Quoted("_utf8mb4'x'"), Token::Quoted("X'0F'")]
        );
        assert_eq!(
            ColumnShape::from_definition("BIT(1) NOT NULL DEFAULT b'0'")
                .default
                .as_deref(),
            Some("b'0'")
        );
    }

    #[test]
    fn test_string_defaults_that_look_like_keywords() {
        for value in ["now", "TRUE", "NULL", "CURRENT_TIMESTAMP", "0x1F"] {
            let declared = format!("VARCHAR(20) DEFAULT '{value}'");
            assert_eq!(
                ColumnShape::from_definition(&declared),
                ColumnShape::from_catalog("varchar(20)", true, Some(value)),
                "{declared}"
            );
        }
        assert_eq!(
            ColumnShape::from_catalog("timestamp", true, Some("now()"))
                .default
                .as_deref(),
            Some("CURRENT_TIMESTAMP")
        );
    }

    #[test]
    fn test_catalog_spelling_reads_back() {
        let definitions = [
            "INTEGER(11) UNSIGNED NOT NULL DEFAULT 7",
            "DECIMAL(10,2) NOT NULL DEFAULT 0",
            "enum('Yes','No') DEFAULT 'Yes'",
            "BIT(1) DEFAULT 1",
            "TIMESTAMP DEFAULT now()",
            "VARCHAR(10) DEFAULT 'now'",
        ];
        for definition in definitions {
            let declared = ColumnShape::from_definition(definition);
            let column_type = declared.catalog_type();
            let default = declared.catalog_default();
            assert_eq!(
                ColumnShape::from_catalog(&column_type, declared.nullable, default.as_deref()),
                declared,
                "{definition}"
            );
        }

        let decimal = ColumnShape::from_definition("DECIMAL(10,2) DEFAULT 1.5");
        assert_eq!(decimal.catalog_type(), "decimal(10,2)");
        assert_eq!(decimal.catalog_default().as_deref(), Some("1.50"));
        let flag = ColumnShape::from_definition("ENUM('Yes','No')");
        assert_eq!(flag.catalog_type(), "enum('Yes','No')");
    }

    #[test]
    fn test_mariadb_column_default() {
        assert_eq!(mariadb_column_default("NULL"), None);
        assert_eq!(mariadb_column_default("'NULL'").as_deref(), Some("NULL"));
        assert_eq!(mariadb_column_default("'a''b'").as_deref(), Some("a'b"));
        assert_eq!(
            mariadb_column_default("current_timestamp()").as_deref(),
            Some("current_timestamp()")
        );
        assert_eq!(mariadb_column_default("b'0'").as_deref(), Some("b'0'"));
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number("+1.50"), "1.5");
        assert_eq!(canonical_number("0.00"), "0");
        assert_eq!(canonical_number("-0.0"), "0");
        assert_eq!(canonical_number("-12"), "-12");
        assert_eq!(canonical_number("1.2.3"), "1.2.3");
        assert_eq!(canonical_number("abc"), "abc");
        assert_eq!(canonical_number(""), "");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'it''s'"), "it's");
        assert_eq!(unquote(r"'a\'b'"), "a'b");
        assert_eq!(unquote("''"), "");
    }
}
