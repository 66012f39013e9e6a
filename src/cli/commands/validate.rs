//! Validate config command implementation
//!
//! Loads and validates the configuration file, then prints what a run would
//! use. Secrets are never printed.

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::{load_config, CatalogExportConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                print!("{}", describe(&config));
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                Ok(2)
            }
        }
    }
}

fn describe(config: &CatalogExportConfig) -> String {
    let mut out = String::new();
    out.push_str("Configuration Summary:\n");
    out.push_str(&format!("  Log Level: {}\n", config.application.log_level));
    out.push_str(&format!("  Dry Run: {}\n", config.application.dry_run));
    out.push_str(&format!(
        "  Database: {}\n",
        redact_connection_string(config.database.connection_string.expose_secret().as_ref())
    ));
    out.push_str(&format!(
        "  SSL Mode: {}\n",
        config.database.ssl_mode.as_str()
    ));
    out.push_str(&format!(
        "  Max Connections: {}\n",
        config.database.max_connections
    ));
    out.push_str(&format!(
        "  Holdings Chunk Size: {}\n",
        config.export.holdings_chunk_size
    ));
    out.push_str(&format!(
        "  Organization Timeout: {}s\n",
        config.export.organization_timeout_secs
    ));
    out.push_str(&format!("  Organizations: {}\n", config.organizations.len()));
    for org in &config.organizations {
        out.push_str(&format!(
            "    - {} (source_id={}, agency={}, org_units={:?})\n",
            org.name,
            org.source_id,
            org.agency_code,
            org.org_unit_ids()
        ));
        out.push_str(&format!("      Output: {}\n", org.output_dir.display()));
        out.push_str(&format!(
            "      Transfer: {}@{}:{}/{}\n",
            org.transfer.username,
            org.transfer.host,
            org.transfer.port,
            org.transfer.remote_base_dir.trim_start_matches('/')
        ));
    }
    out
}
