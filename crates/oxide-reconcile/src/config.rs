//! Run configuration.

use std::path::PathBuf;

use oxide_reconcile_core::SyncPolicy;

/// Default database URL.
pub const DEFAULT_DATABASE_URL: &str = "mysql://root@127.0.0.1:3306";

/// Default definitions directory.
pub const DEFAULT_DIR: &str = "definitions";

/// Default definition file extension.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Default keep-alive listener address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3009";

/// Everything a reconciliation run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// MySQL connection URL.
    pub database_url: String,
    /// Directory holding the definition files.
    pub dir: PathBuf,
    /// Extension of definition files, without the dot.
    pub extension: String,
    /// Drop policy for undeclared columns.
    pub policy: SyncPolicy,
    /// Schema used for files without `CREATE SCHEMA`.
    pub default_schema: Option<String>,
    /// Log and report statements without executing them.
    pub dry_run: bool,
    /// Address of the keep-alive listener.
    pub listen: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            dir: PathBuf::from(DEFAULT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            policy: SyncPolicy::default(),
            default_schema: None,
            dry_run: false,
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl SyncConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database URL.
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Sets the definitions directory.
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the definition file extension. A leading dot is ignored.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Sets the drop policy.
    #[must_use]
    pub const fn policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the fallback schema.
    #[must_use]
    pub fn default_schema(mut self, schema: Option<String>) -> Self {
        self.default_schema = schema.filter(|s| !s.trim().is_empty());
        self
    }

    /// Enables dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Sets the listener address.
    #[must_use]
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen = addr.into();
        self
    }
}
