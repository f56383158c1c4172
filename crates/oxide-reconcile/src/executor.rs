//! Reconciliation executor.
//!
//! This module walks definition files and applies the changes that bring a
//! catalog in line with them. Every failure is caught at the smallest unit of
//! work (column, table, file) and recorded in the [`RunReport`]; only an
//! unreadable definitions directory or an unusable session aborts a run.

use std::path::Path;

use tracing::{debug, error, info, warn};

use oxide_reconcile_core::{
    extract_columns, DefinitionFile, Differ, MySqlDialect, ReconcileDialect, SchemaOperation,
    SyncPolicy, TableDeclaration, TableSnapshot,
};

use crate::catalog::Catalog;
use crate::discovery::discover;
use crate::error::{CatalogError, SyncError};
use crate::report::{FileReport, RunReport, TableOutcome, TableReport};

/// State of a file's target schema after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaState {
    /// The schema exists and the session uses it.
    Ready,
    /// Dry run only: the schema would be created, so none of its tables
    /// exist yet.
    Pending,
}

/// Applies definition files to a catalog.
pub struct Reconciler<C: Catalog, D: ReconcileDialect = MySqlDialect> {
    catalog: C,
    dialect: D,
    differ: Differ,
    dry_run: bool,
    default_schema: Option<String>,
    session_schema: Option<Option<String>>,
}

impl<C: Catalog> Reconciler<C> {
    /// Creates a reconciler generating MySQL statements.
    pub fn new(catalog: C) -> Self {
        Self::with_dialect(catalog, MySqlDialect::new())
    }
}

impl<C: Catalog, D: ReconcileDialect> Reconciler<C, D> {
    /// Creates a reconciler with a custom dialect.
    pub fn with_dialect(catalog: C, dialect: D) -> Self {
        Self {
            catalog,
            dialect,
            differ: Differ::default(),
            dry_run: false,
            default_schema: None,
            session_schema: None,
        }
    }

    /// Sets the drop policy.
    #[must_use]
    pub fn policy(mut self, policy: SyncPolicy) -> Self {
        self.differ = Differ::new(policy);
        self
    }

    /// Enables dry-run mode (statements are reported but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Sets the schema used for files without `CREATE SCHEMA`.
    #[must_use]
    pub fn default_schema(mut self, schema: Option<String>) -> Self {
        self.default_schema = schema;
        self
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Consumes the reconciler, returning the catalog.
    pub fn into_catalog(self) -> C {
        self.catalog
    }

    /// Reconciles every definition file in `dir`, in file name order.
    pub async fn run(&mut self, dir: &Path, extension: &str) -> Result<RunReport, SyncError> {
        let files = discover(dir, extension).await?;
        info!(
            dir = %dir.display(),
            files = files.len(),
            policy = %self.differ.policy(),
            dry_run = self.dry_run,
            "Starting reconciliation"
        );

        // The session's initial schema is the fallback for files without
        // their own, so it must be read before any file switches it.
        self.session_schema().await.map_err(|e| SyncError::Connection {
            message: e.to_string(),
        })?;

        let mut report = RunReport {
            policy: self.differ.policy().to_string(),
            dry_run: self.dry_run,
            files: Vec::with_capacity(files.len()),
        };
        for path in &files {
            report.files.push(self.reconcile_path(path).await);
        }

        info!(
            created = report.count(TableOutcome::Created),
            altered = report.count(TableOutcome::Altered),
            unchanged = report.count(TableOutcome::Unchanged),
            failed = report.count(TableOutcome::Failed),
            errors = report.errors().count(),
            "Reconciliation finished"
        );
        Ok(report)
    }

    /// Reads and reconciles a single definition file.
    pub async fn reconcile_path(&mut self, path: &Path) -> FileReport {
        let file_name = path.display().to_string();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => self.reconcile_file(&DefinitionFile::parse(file_name, &text)).await,
            Err(e) => {
                error!(file = %file_name, error = %e, "Failed to read definition file");
                let error = SyncError::FileRead {
                    path: file_name.clone(),
                    message: e.to_string(),
                };
                FileReport::new(file_name).failed(error)
            }
        }
    }

    /// Reconciles a parsed definition file.
    pub async fn reconcile_file(&mut self, file: &DefinitionFile) -> FileReport {
        let mut report = FileReport::new(&file.name);
        report.statements = file.statements.len();
        let plan = file.plan();
        if plan.is_empty() {
            info!(file = %file.name, "No schema or table declarations, skipping");
            return report;
        }
        info!(
            file = %file.name,
            schemas = plan.schemas.len(),
            tables = plan.tables.len(),
            "Reconciling definition file"
        );

        let mut state = SchemaState::Ready;
        if plan.schemas.is_empty() {
            let Some(schema) = self.fallback_schema().await else {
                if plan.tables.is_empty() {
                    return report;
                }
                let error = SyncError::missing_schema();
                error!(file = %file.name, error = %error, "No schema for table declarations");
                return report.failed(error);
            };
            match self.ensure_schema(&schema, &mut report).await {
                Ok(s) => state = s,
                Err(error) => return report.failed(error),
            }
        }
        // Declared schemas are ensured in order; the last one is the target
        // and stays selected.
        for schema in &plan.schemas {
            match self.ensure_schema(schema, &mut report).await {
                Ok(s) => state = s,
                Err(error) => return report.failed(error),
            }
        }

        for table in &plan.tables {
            let table_report = self.reconcile_table(table, state).await;
            report.tables.push(table_report);
        }
        report
    }

    /// Creates `schema` if it does not exist, then switches the session to
    /// it.
    async fn ensure_schema(
        &mut self,
        schema: &str,
        report: &mut FileReport,
    ) -> Result<SchemaState, SyncError> {
        let resolution_error = |e: CatalogError| {
            let error = SyncError::SchemaResolution {
                schema: Some(schema.to_string()),
                message: e.to_string(),
            };
            error!(schema = %schema, error = %error, "Failed to resolve schema");
            error
        };

        report.schema = Some(schema.to_string());
        let exists = self
            .catalog
            .schema_exists(schema)
            .await
            .map_err(resolution_error)?;
        if !exists {
            info!(schema = %schema, "Creating schema");
            self.execute(&SchemaOperation::create_schema(schema))
                .await
                .map_err(resolution_error)?;
            report.schemas_created.push(schema.to_string());
            if self.dry_run {
                return Ok(SchemaState::Pending);
            }
        }

        // USE runs in dry-run mode too; introspection follows the session.
        let operation = SchemaOperation::use_schema(schema);
        let sql = self.dialect.generate_sql(&operation);
        debug!(sql = %sql, "Executing SQL");
        self.catalog
            .execute(&operation, &sql)
            .await
            .map_err(resolution_error)?;
        Ok(SchemaState::Ready)
    }

    /// Brings one table in line with its declaration.
    async fn reconcile_table(&mut self, table: &TableDeclaration, state: SchemaState) -> TableReport {
        let name = table.name.as_str();
        let mut report = TableReport::new(name);

        let extraction = extract_columns(&table.body);
        for error in &extraction.errors {
            warn!(table = %name, error = %error, "Skipping column");
            report.errors.push(SyncError::ColumnParse {
                table: name.to_string(),
                column: error.column.clone(),
                message: error.to_string(),
            });
        }
        for clause in &extraction.clauses {
            debug!(table = %name, clause = %clause, "Skipping table-level clause");
        }
        report.skipped_clauses.clone_from(&extraction.clauses);

        let exists = match state {
            SchemaState::Pending => false,
            SchemaState::Ready => match self.catalog.table_exists(name).await {
                Ok(exists) => exists,
                Err(e) => return report.failed(introspection_error(name, &e)),
            },
        };

        let snapshot = if exists {
            match self.catalog.table_snapshot(name).await {
                Ok(snapshot) => snapshot,
                Err(e) => return report.failed(introspection_error(name, &e)),
            }
        } else {
            info!(table = %name, "Creating table");
            let operation = SchemaOperation::create_table(name, &table.sql);
            match self.execute(&operation).await {
                Ok(sql) => report.statements.push(sql),
                Err(e) => {
                    let error = SyncError::TableCreate {
                        table: name.to_string(),
                        message: e.to_string(),
                    };
                    error!(table = %name, error = %error, "Failed to create table");
                    return report.failed(error);
                }
            }
            report.outcome = TableOutcome::Created;

            if self.dry_run {
                TableSnapshot::from_columns(name, &extraction.columns)
            } else {
                match self.catalog.table_snapshot(name).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        let error = introspection_error(name, &e);
                        report.errors.push(error);
                        return report;
                    }
                }
            }
        };

        let plan = self.differ.diff_table(&extraction.columns, &snapshot);
        if plan.is_empty() {
            debug!(table = %name, "Table is up to date");
            return report;
        }
        info!(
            table = %name,
            add = plan.to_add.len(),
            modify = plan.to_modify.len(),
            drop = plan.to_drop.len(),
            "Applying column changes"
        );

        let mut applied = 0;
        for operation in plan.operations() {
            match self.execute(&operation).await {
                Ok(sql) => {
                    report.statements.push(sql);
                    applied += 1;
                }
                Err(e) => {
                    let column = operation.column().unwrap_or_default().to_string();
                    warn!(
                        table = %name,
                        column = %column,
                        operation = operation.kind(),
                        error = %e,
                        "Column change failed, skipping"
                    );
                    report.errors.push(SyncError::ColumnAlter {
                        table: name.to_string(),
                        column,
                        sql: self.dialect.generate_sql(&operation),
                        message: e.to_string(),
                    });
                }
            }
        }

        if report.outcome != TableOutcome::Created {
            report.outcome = if applied > 0 {
                TableOutcome::Altered
            } else {
                TableOutcome::Failed
            };
        }
        report
    }

    /// Executes an operation, or only logs it in dry-run mode.
    ///
    /// Returns the generated statement.
    async fn execute(&mut self, operation: &SchemaOperation) -> Result<String, CatalogError> {
        let sql = self.dialect.generate_sql(operation);
        if self.dry_run {
            info!(sql = %sql, "Dry run, not executing");
        } else {
            debug!(sql = %sql, "Executing SQL");
            self.catalog.execute(operation, &sql).await?;
        }
        Ok(sql)
    }

    /// The schema the session was opened on, read once.
    async fn session_schema(&mut self) -> Result<Option<String>, CatalogError> {
        if let Some(schema) = &self.session_schema {
            return Ok(schema.clone());
        }
        let schema = self.catalog.current_schema().await?;
        self.session_schema = Some(schema.clone());
        Ok(schema)
    }

    /// Schema for files without `CREATE SCHEMA`: the configured default,
    /// else the session's initial schema.
    async fn fallback_schema(&mut self) -> Option<String> {
        if let Some(schema) = &self.default_schema {
            return Some(schema.clone());
        }
        match self.session_schema().await {
            Ok(schema) => schema,
            Err(e) => {
                warn!(error = %e, "Failed to read the session schema");
                None
            }
        }
    }
}

fn introspection_error(table: &str, e: &CatalogError) -> SyncError {
    let error = SyncError::Introspection {
        table: table.to_string(),
        message: e.to_string(),
    };
    error!(table = %table, error = %error, "Failed to introspect table");
    error
}
