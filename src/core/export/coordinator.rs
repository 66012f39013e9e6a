//! Export coordinator - main orchestrator for the export process
//!
//! For each selected organization, in file order, and each batch kind of the
//! run's extraction window, in order:
//! resolve the record set, build the holdings index (non-delete batches
//! only), materialize and write the batch file, then transfer it.
//!
//! A failed batch is recorded and the next batch kind runs. An organization
//! that overruns its deadline is recorded and the next organization runs.
//! A shutdown signal stops the run before the next batch starts.

use crate::adapters::database::traits::{HoldingsSource, RecordSetSource, RecordStore};
use crate::adapters::transfer::{Uploader, UploaderFactory};
use crate::config::{CatalogExportConfig, OrganizationConfig};
use crate::core::export::summary::{BatchOutcome, BatchReport, ExportSummary};
use crate::core::export::writer::{BatchFile, ExportWriter};
use crate::core::holdings::HoldingsIndex;
use crate::core::materialize::RecordMaterializer;
use crate::core::record_set::RecordSetEngine;
use crate::core::scope::{resolve_window, ExtractionWindow};
use crate::domain::{BatchKind, CatalogError, Result};
use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::Instrument;

/// Catalog database seams used by a run
#[derive(Clone)]
pub struct CatalogSources {
    /// Record-set queries
    pub record_sets: Arc<dyn RecordSetSource>,
    /// Holdings lookups
    pub holdings: Arc<dyn HoldingsSource>,
    /// Stored record payloads
    pub records: Arc<dyn RecordStore>,
}

impl CatalogSources {
    /// Uses one value for all three seams
    pub fn from_database<D>(database: D) -> Self
    where
        D: RecordSetSource + HoldingsSource + RecordStore + 'static,
    {
        let database = Arc::new(database);
        Self {
            record_sets: database.clone(),
            holdings: database.clone(),
            records: database,
        }
    }
}

/// Per-run choices made on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Force a full export
    pub full: bool,
    /// Explicit incremental lower bound
    pub since: Option<String>,
    /// Restrict the run to one organization
    pub organization: Option<String>,
    /// Write files but skip transfer; ORed with `application.dry_run`
    pub dry_run: bool,
}

/// Checks the window flags and organization selection without touching the
/// database.
///
/// # Errors
///
/// Returns [`CatalogError::Configuration`] if `full` and `since` are both
/// set, `since` is unparseable or in the future, or the requested
/// organization is unknown.
pub fn validate_run_options(config: &CatalogExportConfig, options: &RunOptions) -> Result<()> {
    resolve_window(options.full, options.since.as_deref(), Local::now())?;
    config
        .select_organizations(options.organization.as_deref())
        .map_err(CatalogError::Configuration)?;
    Ok(())
}

/// Export coordinator
pub struct ExportCoordinator {
    config: CatalogExportConfig,
    sources: CatalogSources,
    uploaders: Arc<dyn UploaderFactory>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        config: CatalogExportConfig,
        sources: CatalogSources,
        uploaders: Arc<dyn UploaderFactory>,
    ) -> Self {
        let (_tx, shutdown) = watch::channel(false);
        Self {
            config,
            sources,
            uploaders,
            shutdown,
        }
    }

    /// Stop between batches once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Execute the export
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Configuration`] if the window flags conflict,
    /// `since` cannot be parsed, or the requested organization is unknown.
    /// Every later failure is recorded in the returned summary instead.
    pub async fn execute_export(&self, options: &RunOptions) -> Result<ExportSummary> {
        let start_time = Instant::now();

        let window = resolve_window(options.full, options.since.as_deref(), Local::now())?;
        let organizations = self
            .config
            .select_organizations(options.organization.as_deref())
            .map_err(CatalogError::Configuration)?;
        let dry_run = options.dry_run || self.config.application.dry_run;

        tracing::info!(
            window = %window,
            organizations = organizations.len(),
            dry_run,
            "Starting export run"
        );

        let mut summary = ExportSummary::new();
        let deadline = Duration::from_secs(self.config.export.organization_timeout_secs);

        for organization in organizations {
            if self.shutdown_requested() {
                summary.mark_interrupted();
                break;
            }
            summary.organizations += 1;

            let span = tracing::info_span!(
                "organization",
                organization = %organization.name,
                source_id = %organization.source_id
            );
            let run = self
                .process_organization(organization, &window, dry_run, &mut summary)
                .instrument(span.clone());

            if tokio::time::timeout(deadline, run).await.is_err() {
                let error = CatalogError::Timeout(format!(
                    "organization '{}' exceeded {}s",
                    organization.name,
                    deadline.as_secs()
                ));
                span.in_scope(|| crate::log_batch_failure!(&error));
                summary.add_failure(&organization.name, None, &error);
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn process_organization(
        &self,
        organization: &OrganizationConfig,
        window: &ExtractionWindow,
        dry_run: bool,
        summary: &mut ExportSummary,
    ) {
        let uploader = self.uploaders.uploader_for(organization);

        for &kind in window.batch_plan() {
            if self.shutdown_requested() {
                tracing::warn!("Shutdown requested; stopping before next batch");
                summary.mark_interrupted();
                return;
            }

            let report = self
                .process_batch(organization, kind, window, dry_run, uploader.as_ref(), summary)
                .instrument(tracing::info_span!("batch", batch = kind.label()))
                .await;
            summary.add_batch(report);
        }
    }

    async fn process_batch(
        &self,
        organization: &OrganizationConfig,
        kind: BatchKind,
        window: &ExtractionWindow,
        dry_run: bool,
        uploader: &dyn Uploader,
        summary: &mut ExportSummary,
    ) -> BatchReport {
        match self.write_batch(organization, kind, window).await {
            Ok(None) => {
                tracing::info!("No qualifying records; batch skipped");
                BatchReport::empty(&organization.name, kind)
            }
            Ok(Some(batch)) => {
                self.deliver(organization, batch, dry_run, uploader, summary)
                    .await
            }
            Err(error) => {
                crate::log_batch_failure!(&error);
                summary.add_failure(&organization.name, Some(kind), &error);
                BatchReport::failed(&organization.name, kind, error.category())
            }
        }
    }

    /// Resolves, enriches and writes one batch; `None` when no record qualifies
    async fn write_batch(
        &self,
        organization: &OrganizationConfig,
        kind: BatchKind,
        window: &ExtractionWindow,
    ) -> Result<Option<BatchFile>> {
        let org_units = organization.org_units.as_slice();

        let ids = RecordSetEngine::new(self.sources.record_sets.as_ref())
            .resolve_for(kind, window, org_units)
            .await?;
        if ids.is_empty() {
            return Ok(None);
        }
        tracing::info!(records = ids.len(), "Resolved record set");

        let holdings = if kind.is_delete() {
            None
        } else {
            Some(
                HoldingsIndex::build(
                    self.sources.holdings.as_ref(),
                    &ids,
                    org_units,
                    self.config.export.holdings_chunk_size,
                )
                .await?,
            )
        };

        let store = self.sources.records.as_ref();
        let materializer = match &holdings {
            Some(index) => RecordMaterializer::enriching(store, &organization.agency_code, index),
            None => RecordMaterializer::deletes(store),
        };

        let writer = ExportWriter::new(organization.output_dir.clone(), &organization.source_id);
        let batch = writer.write(kind, &ids, &materializer, Local::now()).await?;
        crate::log_batch_written!(batch.records, batch.path.display(), batch.sha256);
        Ok(Some(batch))
    }

    async fn deliver(
        &self,
        organization: &OrganizationConfig,
        batch: BatchFile,
        dry_run: bool,
        uploader: &dyn Uploader,
        summary: &mut ExportSummary,
    ) -> BatchReport {
        let mut report = BatchReport {
            organization: organization.name.clone(),
            kind: batch.kind,
            records: batch.records,
            file: Some(batch.path.clone()),
            sha256: Some(batch.sha256.clone()),
            outcome: BatchOutcome::DryRun,
        };

        if dry_run {
            tracing::info!(
                path = %batch.path.display(),
                "Dry run: transfer skipped, file kept"
            );
            return report;
        }

        match uploader.upload(&batch.path, batch.kind).await {
            Ok(receipt) => {
                tracing::info!(
                    remote_path = %receipt.remote_path,
                    bytes = receipt.bytes,
                    "Batch transferred"
                );
                match tokio::fs::remove_file(&batch.path).await {
                    Ok(()) => report.file = None,
                    Err(e) => tracing::warn!(
                        path = %batch.path.display(),
                        error = %e,
                        "Failed to remove transferred batch file"
                    ),
                }
                report.outcome = BatchOutcome::Transferred {
                    remote_path: receipt.remote_path,
                };
            }
            Err(error) => {
                crate::log_transfer_failure!(batch.path.display(), error);
                summary.add_failure(&organization.name, Some(batch.kind), &error);
                report.outcome = BatchOutcome::TransferFailed;
            }
        }
        report
    }
}
