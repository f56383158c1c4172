//! oxide-reconcile CLI
//!
//! Reconciles a MySQL database with a directory of definition files once at
//! startup, then stays resident behind a keep-alive listener.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_reconcile::config::{DEFAULT_DATABASE_URL, DEFAULT_DIR, DEFAULT_EXTENSION, DEFAULT_LISTEN};
use oxide_reconcile::{listener, SyncConfig, SyncPolicy};

/// Keeps MySQL tables in line with declarative definition files.
#[derive(Parser)]
#[command(name = "oxide-reconcile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database: String,

    /// Definitions directory.
    #[arg(long, env = "RECONCILE_DIR", default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// Extension of definition files.
    #[arg(long, env = "RECONCILE_EXTENSION", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// What to do with columns no longer declared (additive, destructive).
    #[arg(short, long, env = "RECONCILE_POLICY", default_value_t = SyncPolicy::Additive)]
    policy: SyncPolicy,

    /// Schema for files without CREATE SCHEMA.
    #[arg(long, env = "RECONCILE_DEFAULT_SCHEMA")]
    default_schema: Option<String>,

    /// Keep-alive listener address.
    #[arg(long, env = "RECONCILE_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: String,

    /// Show SQL without executing (dry run).
    #[arg(long)]
    dry_run: bool,

    /// Exit after the run instead of staying resident.
    #[arg(long)]
    once: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    report_json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> SyncConfig {
        SyncConfig::new()
            .database_url(&self.database)
            .dir(&self.dir)
            .extension(&self.extension)
            .policy(self.policy)
            .default_schema(self.default_schema.clone())
            .dry_run(self.dry_run)
            .listen(&self.listen)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config();

    let server = if cli.once {
        None
    } else {
        let listener = listener::bind(&config.listen).await?;
        Some(tokio::spawn(listener::serve(listener)))
    };

    match oxide_reconcile::run(&config).await {
        Ok(report) => {
            if cli.report_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Err(e) if cli.once => return Err(e.into()),
        Err(e) => error!(error = %e, "Reconciliation aborted"),
    }

    if let Some(server) = server {
        info!("Reconciliation done, press Ctrl+C to stop");
        tokio::select! {
            result = server => {
                result??;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutting down");
            }
        }
    }

    Ok(())
}
