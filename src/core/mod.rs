//! Core export engine.
//!
//! # Modules
//!
//! - [`scope`] - Extraction window resolution (full, rolling, explicit since)
//! - [`record_set`] - Base, changed and deleted record sets
//! - [`holdings`] - Holdings index used to rebuild 852 fields
//! - [`materialize`] - Per-record mutation and re-serialization
//! - [`export`] - Batch writing, orchestration and summary
//! - [`verification`] - SHA-256 of batch files
//!
//! # Export Workflow
//!
//! 1. **Scope**: pick full or incremental for the run
//! 2. **Record sets**: resolve ids per batch kind and organization
//! 3. **Holdings**: index holdings for full and updates batches
//! 4. **Materialize**: flip leader status or rebuild 852 fields
//! 5. **Write**: one `.mrc` file per non-empty batch
//! 6. **Transfer**: upload, verify size, remove the local copy
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_export::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use catalog_export::adapters::transfer::SftpUploaderFactory;
//! use catalog_export::config::load_config;
//! use catalog_export::core::export::{CatalogSources, ExportCoordinator, RunOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("catalog-export.toml")?;
//! let client = PostgreSQLClient::new(config.database.clone())?;
//! let sources = CatalogSources::from_database(PostgreSQLAdapter::new(client));
//!
//! let coordinator = ExportCoordinator::new(config, sources, Arc::new(SftpUploaderFactory));
//! let summary = coordinator.execute_export(&RunOptions::default()).await?;
//!
//! println!("Records written: {}", summary.records_written());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod holdings;
pub mod materialize;
pub mod record_set;
pub mod scope;
pub mod verification;
