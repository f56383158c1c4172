//! Integration tests for directory-level reconciliation.
//!
//! These tests write definition files into a temporary directory and run the
//! reconciler against an in-memory catalog.

use std::path::Path;

use oxide_reconcile::{
    MemoryCatalog, Reconciler, SyncError, SyncPolicy, TableOutcome,
};
use oxide_reconcile_core::{SnapshotColumn, TableSnapshot, IDENTITY_COLUMN};

fn write(dir: &Path, name: &str, contents: &[u8]) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn shop_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "01_customers.txt",
        b"CREATE SCHEMA shop;
          CREATE TABLE IF NOT EXISTS customers (
              name VARCHAR(100) NOT NULL,
              email VARCHAR(255),
              UNIQUE KEY uk_email (email)
          );",
    );
    write(
        dir.path(),
        "02_orders.txt",
        b"CREATE SCHEMA shop;
          CREATE TABLE IF NOT EXISTS orders (
              id INT AUTO_INCREMENT PRIMARY KEY,
              customer_id INT NOT NULL,
              total DECIMAL(10,2) NOT NULL DEFAULT 0.00,
              status ENUM('new','paid') DEFAULT 'new',
              created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
          );",
    );
    write(dir.path(), "README.md", b"not a definition file");
    dir
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn test_first_run_creates_everything() {
    let dir = shop_dir();
    let mut reconciler = Reconciler::new(MemoryCatalog::new());
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert_eq!(report.files.len(), 2);
    assert!(report.is_clean(), "{:?}", report.errors().collect::<Vec<_>>());
    assert_eq!(report.count(TableOutcome::Created), 2);
    assert_eq!(report.files[0].schemas_created, vec!["shop".to_string()]);
    assert!(report.files[1].schemas_created.is_empty());
    assert_eq!(
        report.table("customers").unwrap().skipped_clauses,
        vec!["UNIQUE KEY uk_email (email)".to_string()]
    );

    let catalog = reconciler.catalog();
    for table in ["customers", "orders"] {
        let snapshot = catalog.table("shop", table).unwrap();
        let identities = snapshot
            .column_names()
            .filter(|c| *c == IDENTITY_COLUMN)
            .count();
        assert_eq!(identities, 1, "{table} must have one identity column");
    }
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = shop_dir();
    let mut reconciler = Reconciler::new(MemoryCatalog::new());
    reconciler.run(dir.path(), "txt").await.unwrap();

    let mut catalog = reconciler.into_catalog();
    catalog.clear_statements();
    let mut reconciler = Reconciler::new(catalog).policy(SyncPolicy::Destructive);
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert_eq!(report.count(TableOutcome::Unchanged), 2);
    assert_eq!(report.statements().count(), 0);
    assert!(reconciler
        .catalog()
        .statements()
        .iter()
        .all(|s| s.starts_with("USE ")));
}

#[tokio::test]
async fn test_existing_table_gains_new_columns() {
    let dir = shop_dir();
    let catalog = MemoryCatalog::new().with_table(
        "shop",
        TableSnapshot::new("customers")
            .column(SnapshotColumn::new("id", "int").not_null())
            .column(SnapshotColumn::new("name", "varchar(50)").not_null())
            .column(SnapshotColumn::new("legacy", "text")),
    );
    let mut reconciler = Reconciler::new(catalog);
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    let customers = report.table("customers").unwrap();
    assert_eq!(customers.outcome, TableOutcome::Altered);
    assert_eq!(
        customers.statements,
        vec![
            "ALTER TABLE `customers` ADD COLUMN `email` VARCHAR(255)",
            "ALTER TABLE `customers` MODIFY COLUMN `name` VARCHAR(100) NOT NULL",
        ]
    );
    // Additive by default: the undeclared column survives.
    let snapshot = reconciler.catalog().table("shop", "customers").unwrap();
    assert!(snapshot.has_column("legacy"));
}

#[tokio::test]
async fn test_catalog_spellings_match_declarations() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ledger.txt",
        b"CREATE SCHEMA shop;
          CREATE TABLE IF NOT EXISTS ledger (
              id INT AUTO_INCREMENT PRIMARY KEY,
              active BIT(1) NOT NULL DEFAULT b'0',
              state ENUM('open','closed') NOT NULL DEFAULT 'open',
              amount DECIMAL(12,2) NOT NULL DEFAULT 0,
              created_at TIMESTAMP NULL DEFAULT CURRENT_TIMESTAMP,
              label VARCHAR(20) DEFAULT 'now',
              qty INT(11) UNSIGNED DEFAULT '0'
          );",
    );
    // Rows as INFORMATION_SCHEMA.COLUMNS reports them on MySQL 8.
    let catalog = MemoryCatalog::new().with_table(
        "shop",
        TableSnapshot::new("ledger")
            .column(SnapshotColumn::new("id", "int").not_null())
            .column(
                SnapshotColumn::new("active", "bit(1)")
                    .not_null()
                    .default_value("b'0'"),
            )
            .column(
                SnapshotColumn::new("state", "enum('open','closed')")
                    .not_null()
                    .default_value("open"),
            )
            .column(
                SnapshotColumn::new("amount", "decimal(12,2)")
                    .not_null()
                    .default_value("0.00"),
            )
            .column(SnapshotColumn::new("created_at", "timestamp").default_value("CURRENT_TIMESTAMP"))
            .column(SnapshotColumn::new("label", "varchar(20)").default_value("now"))
            .column(SnapshotColumn::new("qty", "int unsigned").default_value("0")),
    );

    let mut reconciler = Reconciler::new(catalog).policy(SyncPolicy::Destructive);
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.count(TableOutcome::Unchanged), 1);
    assert_eq!(report.statements().count(), 0);
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn test_unreadable_file_does_not_stop_the_run() {
    let dir = shop_dir();
    write(dir.path(), "00_binary.txt", &[0xff, 0xfe, 0x00, 0x80]);

    let mut reconciler = Reconciler::new(MemoryCatalog::new());
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert_eq!(report.files.len(), 3);
    assert!(matches!(
        report.files[0].errors.as_slice(),
        [SyncError::FileRead { .. }]
    ));
    assert_eq!(report.count(TableOutcome::Created), 2);
}

#[tokio::test]
async fn test_missing_directory_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut reconciler = Reconciler::new(MemoryCatalog::new());
    let err = reconciler
        .run(&dir.path().join("missing"), "txt")
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::DirectoryRead { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_file_without_schema_uses_initial_session_schema() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.txt",
        b"CREATE SCHEMA other; CREATE TABLE IF NOT EXISTS x (a INT);",
    );
    write(dir.path(), "b.txt", b"CREATE TABLE IF NOT EXISTS y (b INT);");

    let mut reconciler = Reconciler::new(MemoryCatalog::new().using("app"));
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.files[1].schema.as_deref(), Some("app"));
    assert!(reconciler.catalog().table("other", "x").is_some());
    assert!(reconciler.catalog().table("app", "y").is_some());
}

#[tokio::test]
async fn test_file_without_any_schema_context_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"CREATE TABLE IF NOT EXISTS y (b INT);");

    let mut reconciler = Reconciler::new(MemoryCatalog::new());
    let report = reconciler.run(dir.path(), "txt").await.unwrap();

    assert_eq!(
        report.errors().cloned().collect::<Vec<_>>(),
        vec![SyncError::missing_schema()]
    );
}
