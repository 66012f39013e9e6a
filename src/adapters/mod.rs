//! External system integrations.
//!
//! - [`database`] - Catalog database seams and their factory
//! - [`postgresql`] - Evergreen PostgreSQL implementation
//! - [`transfer`] - Outbound SFTP delivery of batch files
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export engine
//! can be tested with in-memory implementations:
//!
//! ```rust,no_run
//! use catalog_export::adapters::database::connect_catalog;
//! use catalog_export::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("catalog-export.toml")?;
//! let sources = connect_catalog(&config.database).await?;
//! # let _ = sources;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod transfer;
