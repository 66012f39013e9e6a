//! Export command implementation
//!
//! Runs the catalog export for every configured organization, or one.

use crate::adapters::database::connect_catalog;
use crate::adapters::transfer::SftpUploaderFactory;
use crate::config::load_config;
use crate::core::export::summary::BatchOutcome;
use crate::core::export::{validate_run_options, ExportCoordinator, ExportSummary, RunOptions};
use crate::domain::{CatalogError, FailureKind};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Exit code for configuration errors
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code when the catalog database is unreachable
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Export every record with holdings instead of a delta
    #[arg(long, conflicts_with = "since")]
    pub full: bool,

    /// Incremental lower bound (RFC 3339, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD")
    #[arg(long, value_name = "TIMESTAMP")]
    pub since: Option<String>,

    /// Only process the organization with this name
    #[arg(long, value_name = "NAME")]
    pub organization: Option<String>,

    /// Write batch files but skip transfer and keep the files
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            full: self.full,
            since: self.since.clone(),
            organization: self.organization.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration load failed");
                eprintln!("{e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let options = self.run_options();
        if let Err(e) = validate_run_options(&config, &options) {
            tracing::error!(error = %e, "Invalid export options");
            eprintln!("{e}");
            return Ok(EXIT_CONFIGURATION);
        }

        if self.dry_run || config.application.dry_run {
            tracing::info!("Dry run mode enabled - batch files are kept and not transferred");
            println!("🔍 DRY RUN MODE - batch files will be written but not transferred");
            println!();
        }

        let sources = match connect_catalog(&config.database).await {
            Ok(sources) => sources,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to catalog database");
                eprintln!("Failed to connect to catalog database: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let coordinator = ExportCoordinator::new(config, sources, Arc::new(SftpUploaderFactory))
            .with_shutdown(shutdown_signal);

        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export(&options).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);
        Ok(summary.exit_code())
    }
}

/// Exit code for an error that stopped the run before it produced a summary
pub fn exit_code_for(error: &CatalogError) -> i32 {
    match error.category() {
        FailureKind::Configuration => EXIT_CONFIGURATION,
        FailureKind::Connection => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Organizations: {}", summary.organizations);
    println!("  Records written: {}", summary.records_written());
    println!("  Batches transferred: {}", summary.transferred());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for batch in &summary.batches {
        let outcome = match &batch.outcome {
            BatchOutcome::Empty => "empty".to_string(),
            BatchOutcome::Transferred { remote_path } => format!("transferred to {remote_path}"),
            BatchOutcome::TransferFailed => "transfer failed, file kept".to_string(),
            BatchOutcome::DryRun => "dry run, file kept".to_string(),
            BatchOutcome::Failed(kind) => format!("failed ({kind})"),
        };
        println!(
            "  {} / {}: {} records, {}",
            batch.organization, batch.kind, batch.records, outcome
        );
        if let Some(file) = &batch.file {
            println!("    {}", file.display());
        }
    }

    if !summary.failures.is_empty() {
        println!();
        println!("⚠️  Failures:");
        for failure in &summary.failures {
            let batch = failure.batch.map(|b| b.label()).unwrap_or("organization");
            println!(
                "  - {} / {} [{}]: {}",
                failure.organization, batch, failure.failure, failure.message
            );
        }
    }
    println!();

    if summary.interrupted {
        println!("⚠️  Export interrupted; remaining batches were not started.");
        tracing::info!("Export interrupted by user signal");
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with failures");
    }
}
