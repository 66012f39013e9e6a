//! Configuration management for catalog-export.
//!
//! TOML or YAML configuration files with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CATALOG_EXPORT_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalog_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("catalog-export.toml")?;
//! for org in &config.organizations {
//!     println!("{} -> {}", org.name, org.transfer.host);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! connection_string = "${CATALOG_EXPORT_DB_URL}"
//!
//! [[organizations]]
//! name = "Example Library"
//! org_units = [4, 5]
//! source_id = "examplelib"
//! agency_code = "EXL"
//!
//! [organizations.transfer]
//! host = "sftp.example.com"
//! username = "examplelib"
//! password = "${EXAMPLE_SFTP_PASSWORD}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CatalogExportConfig, DatabaseConfig, ExportConfig, LoggingConfig,
    OrganizationConfig, SslMode, TransferConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
