//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// catalog-export - publish MARC catalog deltas with holdings to discovery indexes
#[derive(Parser, Debug)]
#[command(name = "catalog-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML, or YAML by extension)
    #[arg(
        short,
        long,
        default_value = "catalog-export.toml",
        env = "CATALOG_EXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CATALOG_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export full or incremental catalog batches and transfer them
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}
