//! Domain types shared across the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`], [`OrgUnitId`]) and the
//!   ordered [`RecordIdSet`] produced by record-set queries
//! - **Batch kinds** ([`BatchKind`]) selecting query, mutation and destination
//! - **Error types** ([`CatalogError`], [`FailureKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use catalog_export::domain::{CatalogError, Result};
//! use catalog_export::domain::RecordId;
//!
//! fn parse_id(raw: i64) -> Result<RecordId> {
//!     RecordId::new(raw).map_err(CatalogError::Configuration)
//! }
//!
//! assert!(parse_id(0).is_err());
//! ```

pub mod batch;
pub mod errors;
pub mod ids;
pub mod result;

pub use batch::BatchKind;
pub use errors::{CatalogError, FailureKind};
pub use ids::{OrgUnitId, RecordId, RecordIdSet};
pub use result::Result;
