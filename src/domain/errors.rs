//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Errors carry
//! messages rather than third-party types so that adapters stay swappable.
//! [`CatalogError::category`] maps each error onto the [`FailureKind`] used in
//! logs and the run summary, which keeps transfer failures distinguishable from
//! fatal ones.

use crate::domain::ids::RecordId;
use crate::marc::MarcError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the exporter.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Mutually exclusive flags, missing or invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection pool creation or connection acquisition failed
    #[error("Database error: {0}")]
    Database(String),

    /// Query preparation, binding or execution failed
    #[error("Query error: {0}")]
    Query(String),

    /// The record store has no payload for the identifier
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// The stored payload could not be parsed into a MARC record
    #[error("Failed to parse record {id}: {source}")]
    RecordParse {
        /// Identifier of the record being materialized
        id: RecordId,
        /// Underlying parse failure
        #[source]
        source: MarcError,
    },

    /// Remote transfer failed
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Per-organization deadline expired
    #[error("Timed out: {0}")]
    Timeout(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Failure categories used for operational alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Configuration problem, aborts the run
    Configuration,
    /// Database connectivity, aborts the run
    Connection,
    /// Query failure, fatal to one batch kind
    Query,
    /// Record lookup or parse failure, fatal to one batch write
    Record,
    /// Local file failure, fatal to one batch write
    Io,
    /// Organization deadline expired
    Timeout,
    /// Upload failure, local file retained
    Transfer,
}

impl FailureKind {
    /// Returns the stable label written to logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Connection => "connection",
            FailureKind::Query => "query",
            FailureKind::Record => "record",
            FailureKind::Io => "io",
            FailureKind::Timeout => "timeout",
            FailureKind::Transfer => "transfer",
        }
    }

    /// Transfer failures are expected operational conditions; everything
    /// else indicates a bug or an environment problem.
    pub fn is_operational(&self) -> bool {
        matches!(self, FailureKind::Transfer)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CatalogError {
    /// Returns the failure category of this error
    pub fn category(&self) -> FailureKind {
        match self {
            CatalogError::Configuration(_) => FailureKind::Configuration,
            CatalogError::Database(_) => FailureKind::Connection,
            CatalogError::Query(_) => FailureKind::Query,
            CatalogError::RecordNotFound(_) | CatalogError::RecordParse { .. } => {
                FailureKind::Record
            }
            CatalogError::Transfer(_) => FailureKind::Transfer,
            CatalogError::Timeout(_) => FailureKind::Timeout,
            CatalogError::Io(_) => FailureKind::Io,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Configuration(format!("YAML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for CatalogError {
    fn from(err: tokio_postgres::Error) -> Self {
        CatalogError::Query(err.to_string())
    }
}
