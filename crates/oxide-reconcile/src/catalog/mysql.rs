//! MySQL catalog backed by a single connection.

use sqlx::mysql::MySqlConnection;
use sqlx::Connection;
use tracing::debug;

use oxide_reconcile_core::{mariadb_column_default, SchemaOperation, SnapshotColumn, TableSnapshot};

use super::Catalog;
use crate::error::Result;

/// Reads the columns of a table in the current schema. Text columns are cast
/// so servers reporting them as binary strings decode the same way.
const COLUMNS_SQL: &str = r"
SELECT CAST(COLUMN_NAME AS CHAR),
       CAST(COLUMN_TYPE AS CHAR),
       CAST(IS_NULLABLE AS CHAR),
       CAST(COLUMN_DEFAULT AS CHAR)
FROM INFORMATION_SCHEMA.COLUMNS
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
ORDER BY ORDINAL_POSITION
";

const TABLE_EXISTS_SQL: &str = r"
SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
";

const SCHEMA_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?";

/// A MySQL or MariaDB session.
///
/// One connection is held for the whole run since `USE` only affects the
/// connection it is issued on.
pub struct MySqlCatalog {
    conn: MySqlConnection,
    mariadb: Option<bool>,
}

impl MySqlCatalog {
    /// Opens a session.
    pub async fn connect(url: &str) -> Result<Self> {
        let conn = MySqlConnection::connect(url).await?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already open connection.
    #[must_use]
    pub fn from_connection(conn: MySqlConnection) -> Self {
        Self {
            conn,
            mariadb: None,
        }
    }

    /// Closes the session.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    /// Whether the server is MariaDB, read once per session.
    async fn is_mariadb(&mut self) -> Result<bool> {
        if let Some(mariadb) = self.mariadb {
            return Ok(mariadb);
        }
        let version: String = sqlx::query_scalar("SELECT CAST(VERSION() AS CHAR)")
            .fetch_one(&mut self.conn)
            .await?;
        let mariadb = is_mariadb_version(&version);
        debug!(version = %version, mariadb, "Detected server");
        self.mariadb = Some(mariadb);
        Ok(mariadb)
    }
}

fn is_mariadb_version(version: &str) -> bool {
    version.to_ascii_lowercase().contains("mariadb")
}

impl Catalog for MySqlCatalog {
    async fn current_schema(&mut self) -> Result<Option<String>> {
        let schema: Option<String> = sqlx::query_scalar("SELECT CAST(DATABASE() AS CHAR)")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(schema)
    }

    async fn schema_exists(&mut self, schema: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(SCHEMA_EXISTS_SQL)
            .bind(schema)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count > 0)
    }

    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(TABLE_EXISTS_SQL)
            .bind(table)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count > 0)
    }

    async fn table_snapshot(&mut self, table: &str) -> Result<TableSnapshot> {
        let mariadb = self.is_mariadb().await?;
        let rows: Vec<(String, String, String, Option<String>)> = sqlx::query_as(COLUMNS_SQL)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await?;

        let snapshot = rows.into_iter().fold(
            TableSnapshot::new(table),
            |snapshot, (name, column_type, nullable, default)| {
                snapshot.column(SnapshotColumn {
                    name,
                    column_type,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                    default: if mariadb {
                        default.as_deref().and_then(mariadb_column_default)
                    } else {
                        default
                    },
                })
            },
        );
        debug!(table = %table, columns = snapshot.columns.len(), "Read table snapshot");
        Ok(snapshot)
    }

    async fn execute(&mut self, _operation: &SchemaOperation, sql: &str) -> Result<()> {
        // `USE` is not available through prepared statements.
        sqlx::raw_sql(sql).execute(&mut self.conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mariadb_version() {
        assert!(is_mariadb_version("10.11.6-MariaDB-0+deb12u1"));
        assert!(is_mariadb_version("11.4.2-MariaDB"));
        assert!(!is_mariadb_version("8.0.36"));
        assert!(!is_mariadb_version("8.4.0-commercial"));
    }
}
