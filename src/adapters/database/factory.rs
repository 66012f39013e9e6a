//! Catalog source factory
//!
//! Builds the run's database seams from configuration.

use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::DatabaseConfig;
use crate::core::export::CatalogSources;
use crate::domain::Result;

/// Connects to the catalog database and returns its sources
///
/// The pool is created once and shared by all three seams. The connection is
/// tested before returning so an unreachable database fails the run up front.
///
/// # Errors
///
/// Returns [`crate::domain::CatalogError::Configuration`] for a bad
/// connection string and [`crate::domain::CatalogError::Database`] if the
/// database cannot be reached.
pub async fn connect_catalog(config: &DatabaseConfig) -> Result<CatalogSources> {
    let client = PostgreSQLClient::new(config.clone())?;
    tracing::info!(
        database = %client.connection_string_safe(),
        max_connections = config.max_connections,
        "Creating PostgreSQL pool"
    );
    client.test_connection().await?;
    Ok(CatalogSources::from_database(PostgreSQLAdapter::new(client)))
}
