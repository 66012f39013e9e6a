//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - Console output, always on
//! - Optional rolling JSON log file
//! - `organization` and `batch` spans entered by the export coordinator
//! - Macros keeping the `failure` category field uniform
//!
//! # Example
//!
//! ```no_run
//! use catalog_export::config::LoggingConfig;
//! use catalog_export::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! tracing::info!("Application started");
//! # Ok::<(), catalog_export::domain::CatalogError>(())
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log progress through a chunked operation
///
/// # Example
///
/// ```no_run
/// use catalog_export::log_batch_progress;
///
/// log_batch_progress!(2, 10, "Resolving holdings");
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr, $msg:literal) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / ($total as f64).max(1.0) * 100.0),
            $msg
        );
    };
}

/// Log a finished batch file
///
/// # Example
///
/// ```no_run
/// use catalog_export::log_batch_written;
///
/// log_batch_written!(12, "/tmp/lib-catalog-full.mrc", "ab12");
/// ```
#[macro_export]
macro_rules! log_batch_written {
    ($records:expr, $path:expr, $sha256:expr) => {
        tracing::info!(
            records = $records,
            path = %$path,
            sha256 = %$sha256,
            "Batch file written"
        );
    };
}

/// Log a failed batch with its failure category
///
/// Operational failures log at WARN, everything else at ERROR.
///
/// # Example
///
/// ```no_run
/// use catalog_export::log_batch_failure;
/// use catalog_export::domain::CatalogError;
///
/// let error = CatalogError::Query("relation does not exist".to_string());
/// log_batch_failure!(&error);
/// ```
#[macro_export]
macro_rules! log_batch_failure {
    ($error:expr) => {{
        let error: &$crate::domain::CatalogError = $error;
        let failure = error.category();
        if failure.is_operational() {
            tracing::warn!(failure = failure.as_str(), error = %error, "Batch failed");
        } else {
            tracing::error!(failure = failure.as_str(), error = %error, "Batch failed");
        }
    }};
}

/// Log a failed transfer; the local file is retained
///
/// # Example
///
/// ```no_run
/// use catalog_export::log_transfer_failure;
/// use catalog_export::domain::CatalogError;
///
/// let error = CatalogError::Transfer("connection refused".to_string());
/// log_transfer_failure!("/tmp/lib-catalog-full.mrc", &error);
/// ```
#[macro_export]
macro_rules! log_transfer_failure {
    ($path:expr, $error:expr) => {
        tracing::warn!(
            failure = "transfer",
            path = %$path,
            error = %$error,
            "Transfer failed; local file retained"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::CatalogError;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let error = CatalogError::Transfer("refused".to_string());
        crate::log_batch_progress!(1, 0, "Resolving holdings");
        crate::log_batch_written!(3usize, "/tmp/x.mrc", "00");
        crate::log_batch_failure!(&error);
        crate::log_transfer_failure!("/tmp/x.mrc", &error);
    }
}
