//! Configuration loader with TOML/YAML parsing and environment variable overrides

use super::schema::CatalogExportConfig;
use super::secret::secret_string;
use crate::domain::errors::CatalogError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override file values
pub const ENV_PREFIX: &str = "CATALOG_EXPORT_";

/// Loads configuration from a TOML or YAML file
///
/// This function:
/// 1. Reads the file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses it as YAML for `.yml`/`.yaml`, TOML otherwise
/// 4. Applies `CATALOG_EXPORT_*` environment overrides
/// 5. Validates the result
///
/// # Errors
///
/// Returns [`CatalogError::Configuration`] if any step fails.
///
/// # Examples
///
/// ```no_run
/// use catalog_export::config::loader::load_config;
///
/// let config = load_config("catalog-export.toml")?;
/// # Ok::<(), catalog_export::domain::CatalogError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CatalogExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CatalogError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CatalogError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config = parse_config(path, &contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CatalogError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<CatalogExportConfig> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yml") | Some("yaml") => serde_yaml::from_str(contents)
            .map_err(|e| CatalogError::Configuration(format!("Failed to parse YAML: {}", e))),
        _ => toml::from_str(contents)
            .map_err(|e| CatalogError::Configuration(format!("Failed to parse TOML: {}", e))),
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CatalogError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Both TOML and YAML comments start with '#'
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(CatalogError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CatalogError::Configuration(format!(
            "Invalid value '{value}' for environment variable {ENV_PREFIX}{key}"
        ))
    })
}

/// Applies environment variable overrides using the CATALOG_EXPORT_* prefix
///
/// Environment variables follow the pattern `CATALOG_EXPORT_<SECTION>_<KEY>`,
/// for example `CATALOG_EXPORT_DATABASE_CONNECTION_STRING`. Organization
/// entries are not overridable; use `${VAR}` substitution for their secrets.
fn apply_env_overrides(config: &mut CatalogExportConfig) -> Result<()> {
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env("APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("APPLICATION_DRY_RUN", &val)?;
    }

    if let Some(val) = env("DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Some(val) = env("DATABASE_MAX_CONNECTIONS") {
        config.database.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", &val)?;
    }
    if let Some(val) = env("DATABASE_STATEMENT_TIMEOUT_SECONDS") {
        config.database.statement_timeout_seconds =
            parse_env("DATABASE_STATEMENT_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env("DATABASE_SSL_MODE") {
        config.database.ssl_mode = val.parse().map_err(CatalogError::Configuration)?;
    }

    if let Some(val) = env("EXPORT_HOLDINGS_CHUNK_SIZE") {
        config.export.holdings_chunk_size = parse_env("EXPORT_HOLDINGS_CHUNK_SIZE", &val)?;
    }
    if let Some(val) = env("EXPORT_ORGANIZATION_TIMEOUT_SECS") {
        config.export.organization_timeout_secs =
            parse_env("EXPORT_ORGANIZATION_TIMEOUT_SECS", &val)?;
    }

    if let Some(val) = env("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
