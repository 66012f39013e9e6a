//! Init command implementation
//!
//! Writes a commented sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Sample configuration written by `init`
pub const SAMPLE_CONFIG: &str = r#"# catalog-export configuration
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any [application], [database], [export] or [logging] key can also be
# overridden with CATALOG_EXPORT_<SECTION>_<KEY>.

[application]
log_level = "info"        # trace | debug | info | warn | error
dry_run = false           # write files, skip transfer, keep files

[database]
connection_string = "${CATALOG_EXPORT_DB_URL}"
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 600
ssl_mode = "prefer"       # disable | prefer | require

[export]
holdings_chunk_size = 500           # record ids per holdings lookup (1-10000)
organization_timeout_secs = 3600    # deadline for one organization

[logging]
local_enabled = false
local_path = "/var/log/catalog-export"
local_rotation = "daily"            # daily | hourly

# One entry per publishing organization, processed in this order.
[[organizations]]
name = "Example Library"
org_units = [4, 5]                  # holdings circulating from these units count
source_id = "examplelib"            # used in batch file names
agency_code = "EXL"                 # written to 852 $a
output_dir = "/var/spool/catalog-export"

[organizations.transfer]
host = "sftp.example.com"
port = 22
username = "examplelib"
password = "${EXAMPLE_SFTP_PASSWORD}"
remote_base_dir = ""                # full/, updates/ and deletes/ live under this
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "catalog-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your organizations", self.output);
                println!("  2. Set CATALOG_EXPORT_DB_URL and the SFTP passwords in .env");
                println!("  3. Validate: catalog-export -c {} validate-config", self.output);
                println!("  4. Try a run: catalog-export -c {} export --dry-run", self.output);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}
