//! Integration tests for definition parsing and diffing.
//!
//! These tests parse whole definition files, diff the declared tables
//! against hand-built snapshots and check the generated MySQL statements.

use oxide_reconcile_core::{
    diff_table, extract_columns, ColumnSpec, DefinitionFile, MySqlDialect, ReconcileDialect,
    SnapshotColumn, SyncPolicy, TableSnapshot,
};

const SHOP: &str = r"
-- Shop schema
CREATE SCHEMA IF NOT EXISTS shop;

CREATE TABLE IF NOT EXISTS orders (
    id INT AUTO_INCREMENT PRIMARY KEY,
    customer VARCHAR(100) NOT NULL,
    total DECIMAL(10,2) NOT NULL DEFAULT 0.00,
    status ENUM('new','paid','sent') DEFAULT 'new',
    note TEXT COMMENT 'free text; may contain commas, parens ()',
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    KEY idx_customer (customer)
) ENGINE=InnoDB;

INSERT INTO orders (customer) VALUES ('ignored; not a table');

CREATE TABLE IF NOT EXISTS settings (
    `key` VARCHAR(20) NOT NULL,
    value TEXT
);
";

fn sql_for(columns: &[ColumnSpec], snapshot: &TableSnapshot, policy: SyncPolicy) -> Vec<String> {
    let dialect = MySqlDialect::new();
    diff_table(columns, snapshot, policy)
        .operations()
        .iter()
        .map(|op| dialect.generate_sql(op))
        .collect()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_file_plan() {
    let plan = DefinitionFile::parse("shop.txt", SHOP).plan();
    assert_eq!(plan.target_schema(), Some("shop"));
    let tables: Vec<&str> = plan.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tables, vec!["orders", "settings"]);

    let orders = extract_columns(&plan.tables[0].body);
    let names: Vec<&str> = orders.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "customer", "total", "status", "note", "created_at"]
    );
    assert_eq!(orders.clauses, vec!["KEY idx_customer (customer)".to_string()]);
    assert_eq!(
        orders.column("note").unwrap().definition,
        "TEXT COMMENT 'free text; may contain commas, parens ()'"
    );
}

#[test]
fn test_decimal_and_enum_tokenization() {
    let file = DefinitionFile::parse(
        "t.txt",
        "CREATE TABLE IF NOT EXISTS t (a DECIMAL(10,2) NOT NULL, b ENUM('x','y') DEFAULT 'x')",
    );
    let plan = file.plan();
    let extraction = extract_columns(&plan.tables[0].body);
    assert_eq!(
        extraction.columns,
        vec![
            ColumnSpec::new("a", "DECIMAL(10,2) NOT NULL"),
            ColumnSpec::new("b", "ENUM('x','y') DEFAULT 'x'"),
        ]
    );
}

// =============================================================================
// Diffing
// =============================================================================

#[test]
fn test_reconciled_table_has_no_changes() {
    let plan = DefinitionFile::parse("shop.txt", SHOP).plan();
    let columns = extract_columns(&plan.tables[0].body).columns;
    let live = TableSnapshot::new("orders")
        .column(SnapshotColumn::new("id", "int").not_null())
        .column(SnapshotColumn::new("customer", "varchar(100)").not_null())
        .column(
            SnapshotColumn::new("total", "decimal(10,2)")
                .not_null()
                .default_value("0.00"),
        )
        .column(SnapshotColumn::new("status", "enum('new','paid','sent')").default_value("new"))
        .column(SnapshotColumn::new("note", "text"))
        .column(SnapshotColumn::new("created_at", "timestamp").default_value("CURRENT_TIMESTAMP"));

    assert!(sql_for(&columns, &live, SyncPolicy::Destructive).is_empty());
}

#[test]
fn test_snapshot_of_created_table_converges() {
    let plan = DefinitionFile::parse("shop.txt", SHOP).plan();
    for table in &plan.tables {
        let columns = extract_columns(&table.body).columns;
        let created = TableSnapshot::from_columns(&table.name, &columns)
            .column(SnapshotColumn::new("id", "int").not_null());
        assert!(
            sql_for(&columns, &created, SyncPolicy::Additive).is_empty(),
            "{} did not converge",
            table.name
        );
    }
}

#[test]
fn test_prefixed_default_literals_converge() {
    let columns = extract_columns(
        "id INT AUTO_INCREMENT PRIMARY KEY,
         active BIT(1) NOT NULL DEFAULT b'0',
         mask VARBINARY(2) DEFAULT x'0fa0',
         title VARCHAR(40) DEFAULT N'untitled'",
    )
    .columns;
    let live = TableSnapshot::new("flags")
        .column(SnapshotColumn::new("id", "int").not_null())
        .column(
            SnapshotColumn::new("active", "bit(1)")
                .not_null()
                .default_value("b'0'"),
        )
        .column(SnapshotColumn::new("mask", "varbinary(2)").default_value("0x0FA0"))
        .column(SnapshotColumn::new("title", "varchar(40)").default_value("untitled"));

    assert!(sql_for(&columns, &live, SyncPolicy::Destructive).is_empty());
}

#[test]
fn test_reserved_word_column_is_quoted() {
    let plan = DefinitionFile::parse("shop.txt", SHOP).plan();
    let settings = plan.table("settings").unwrap();
    let columns = extract_columns(&settings.body).columns;
    let live = TableSnapshot::new("settings").column(SnapshotColumn::new("value", "text"));

    assert_eq!(
        sql_for(&columns, &live, SyncPolicy::Additive),
        vec![
            "ALTER TABLE `settings` ADD COLUMN `key` VARCHAR(20) NOT NULL",
            "ALTER TABLE `settings` ADD COLUMN `id` INT AUTO_INCREMENT PRIMARY KEY",
        ]
    );
}

#[test]
fn test_destructive_drop_statement() {
    let columns = vec![ColumnSpec::new("a", "INT")];
    let live = TableSnapshot::new("t")
        .column(SnapshotColumn::new("id", "int").not_null())
        .column(SnapshotColumn::new("a", "int"))
        .column(SnapshotColumn::new("b", "int"));

    assert!(sql_for(&columns, &live, SyncPolicy::Additive).is_empty());
    assert_eq!(
        sql_for(&columns, &live, SyncPolicy::Destructive),
        vec!["ALTER TABLE `t` DROP COLUMN `b`"]
    );
}
