// catalog-export - MARC catalog delta exporter
// Copyright (c) 2025 Catalog Export Contributors
// Licensed under the MIT License

//! # catalog-export - MARC catalog deltas for discovery indexes
//!
//! catalog-export reads bibliographic records from an Evergreen-style
//! PostgreSQL catalog, enriches them with holdings for each publishing
//! organization, writes binary MARC batch files and delivers them over SFTP.
//!
//! ## Overview
//!
//! One run, per configured organization:
//! - **Scope**: a full export on the first day of a quarter (or on request),
//!   otherwise an incremental window covering the last day or an explicit
//!   `--since` bound
//! - **Record sets**: base, changed and deleted record ids, ordered and
//!   deduplicated
//! - **Holdings**: call numbers, copies and locations, fetched in chunks
//! - **Materialization**: stored MARCXML turned into binary MARC with `852`
//!   holdings fields, or with leader status `d` for deletes
//! - **Delivery**: one file per batch kind, checksummed, then uploaded to
//!   `full/`, `updates/` or `deletes/` and removed locally
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Scope resolution, record sets, holdings, materialization, export
//! - [`adapters`] - PostgreSQL catalog access and SFTP transfer
//! - [`marc`] - MARC 21 records, ISO 2709 codec and MARCXML parsing
//! - [`domain`] - Identifiers, batch kinds and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_export::adapters::database::connect_catalog;
//! use catalog_export::adapters::transfer::SftpUploaderFactory;
//! use catalog_export::config::load_config;
//! use catalog_export::core::export::{ExportCoordinator, RunOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("catalog-export.toml")?;
//!     let sources = connect_catalog(&config.database).await?;
//!
//!     let coordinator = ExportCoordinator::new(config, sources, Arc::new(SftpUploaderFactory));
//!     let summary = coordinator.execute_export(&RunOptions::default()).await?;
//!
//!     println!("Wrote {} records", summary.records_written());
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type
//! [`domain::CatalogError`] maps onto a [`domain::FailureKind`] for logging
//! and exit codes:
//!
//! ```rust
//! use catalog_export::domain::{CatalogError, FailureKind};
//!
//! let error = CatalogError::RecordNotFound(42);
//! assert_eq!(error.category(), FailureKind::RecordNotFound);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod marc;
