//! Export orchestration, batch writing and run reporting
//!
//! - [`writer`] - Streams materialized records into batch files
//! - [`coordinator`] - Drives organizations and batch kinds through the pipeline
//! - [`summary`] - Per-batch results, failures and the process exit code

pub mod coordinator;
pub mod summary;
pub mod writer;

pub use coordinator::{validate_run_options, CatalogSources, ExportCoordinator, RunOptions};
pub use summary::{BatchOutcome, BatchReport, ExportSummary, FailureRecord};
pub use writer::{batch_filename, BatchFile, ExportWriter};
