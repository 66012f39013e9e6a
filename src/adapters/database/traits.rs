//! Catalog database abstraction traits
//!
//! The core depends on these seams instead of a concrete database so that
//! record-set resolution, holdings enrichment and materialization can be
//! exercised against in-memory fakes.

use crate::core::scope::WindowBound;
use crate::domain::{OrgUnitId, RecordId, Result};
use async_trait::async_trait;

/// Raw record-set queries.
///
/// Implementations return identifiers as the database yields them;
/// deduplication, ordering and filtering of non-positive ids happen in
/// [`crate::core::record_set::RecordSetEngine`].
#[async_trait]
pub trait RecordSetSource: Send + Sync {
    /// Records with at least one non-deleted holding in `org_units`
    async fn base_record_ids(&self, org_units: &[OrgUnitId]) -> Result<Vec<i64>>;

    /// Base records whose in-scope holdings were created or activated within the window
    async fn changed_record_ids(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<Vec<i64>>;

    /// Records with an in-scope holding deletion in the window and no
    /// remaining qualifying holding
    async fn deleted_record_ids(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<Vec<i64>>;
}

/// One aggregated holdings row as returned by the database.
///
/// The five lists are positionally paired, one entry per holding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHoldings {
    /// Bibliographic record the holdings belong to
    pub record_id: i64,
    /// Owning branch names
    pub branches: Vec<String>,
    /// Shelving location names
    pub locations: Vec<String>,
    /// Call number labels
    pub call_numbers: Vec<String>,
    /// Call number prefixes (empty string when none)
    pub prefixes: Vec<String>,
    /// Call number suffixes (empty string when none)
    pub suffixes: Vec<String>,
}

/// Holdings lookup for enrichment
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Aggregated, in-scope, non-deleted holdings for the given records.
    ///
    /// Records with no matching holdings are simply absent from the result.
    async fn holdings_for(
        &self,
        record_ids: &[RecordId],
        org_units: &[OrgUnitId],
    ) -> Result<Vec<RawHoldings>>;
}

/// Keyed lookup of stored bibliographic payloads
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stored payload (MARCXML or ISO 2709) for `id`, or `None` if absent
    async fn fetch_record(&self, id: RecordId) -> Result<Option<Vec<u8>>>;
}
