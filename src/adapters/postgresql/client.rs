//! PostgreSQL client implementation
//!
//! Owns the connection pool for one run. Connection failures surface as
//! [`CatalogError::Database`]; statement failures as [`CatalogError::Query`].

use crate::config::schema::{DatabaseConfig, SslMode};
use crate::domain::{CatalogError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

/// Pooled PostgreSQL client for the catalog database
pub struct PostgreSQLClient {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily; call [`test_connection`](Self::test_connection)
    /// to fail fast on a bad host or credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Configuration`] for an unparseable connection
    /// string and [`CatalogError::Database`] if the pool or TLS connector
    /// cannot be built.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                CatalogError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;
        let options = session_options(pg_config.get_options(), config.statement_timeout_seconds);
        pg_config.options(&options);
        pg_config.ssl_mode(match config.ssl_mode {
            SslMode::Disable => tokio_postgres::config::SslMode::Disable,
            SslMode::Prefer => tokio_postgres::config::SslMode::Prefer,
            SslMode::Require => tokio_postgres::config::SslMode::Require,
        });

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode {
            SslMode::Disable => Manager::from_config(pg_config, NoTls, manager_config),
            SslMode::Prefer | SslMode::Require => {
                let connector = native_tls::TlsConnector::new().map_err(|e| {
                    CatalogError::Database(format!("Failed to build TLS connector: {}", e))
                })?;
                Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
            }
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                CatalogError::Database(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| CatalogError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!(
            database = %self.connection_string_safe(),
            ssl_mode = self.config.ssl_mode.as_str(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            CatalogError::Database(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Execute a query; the statement timeout is set per connection at startup
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if no connection is available and
    /// [`CatalogError::Query`] if the statement fails.
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        let statement = client.prepare_cached(query).await?;
        Ok(client.query(&statement, params).await?)
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret().as_ref())
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

/// Startup `options` carrying the statement timeout, after any options
/// already present in the connection string
fn session_options(existing: Option<&str>, statement_timeout_seconds: u64) -> String {
    let timeout = format!("-c statement_timeout={}", statement_timeout_seconds * 1000);
    match existing.map(str::trim).filter(|o| !o.is_empty()) {
        Some(existing) => format!("{existing} {timeout}"),
        None => timeout,
    }
}

/// Replaces everything before the host with `***`
pub fn redact_connection_string(connection_string: &str) -> String {
    match connection_string.rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{}", host),
        None => connection_string.to_string(),
    }
}
