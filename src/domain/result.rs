//! Result type alias for the exporter

use super::errors::CatalogError;

/// Result type alias using [`CatalogError`] as the error type.
///
/// # Examples
///
/// ```
/// use catalog_export::domain::result::Result;
/// use catalog_export::domain::errors::CatalogError;
///
/// fn failing_function() -> Result<()> {
///     Err(CatalogError::Configuration("missing organizations".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, CatalogError>;
