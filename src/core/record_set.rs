//! Record set resolution
//!
//! Wraps a [`RecordSetSource`] and turns raw query output into ordered,
//! unique [`RecordIdSet`]s.

use crate::adapters::database::traits::RecordSetSource;
use crate::core::scope::{ExtractionWindow, WindowBound};
use crate::domain::{BatchKind, CatalogError, OrgUnitId, RecordIdSet, Result};

/// Resolves base, changed and deleted record sets for an organization scope
pub struct RecordSetEngine<'a> {
    source: &'a dyn RecordSetSource,
}

impl<'a> RecordSetEngine<'a> {
    /// Creates an engine over the given source
    pub fn new(source: &'a dyn RecordSetSource) -> Self {
        Self { source }
    }

    /// All records with undeleted holdings in `org_units`
    pub async fn resolve_base_set(&self, org_units: &[OrgUnitId]) -> Result<RecordIdSet> {
        let raw = self.source.base_record_ids(org_units).await?;
        Ok(RecordIdSet::from_raw(raw))
    }

    /// Base records with holdings created or activated within the window
    pub async fn resolve_changed_set(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<RecordIdSet> {
        let raw = self.source.changed_record_ids(org_units, bound).await?;
        Ok(RecordIdSet::from_raw(raw))
    }

    /// Records whose in-scope holdings were deleted within the window and
    /// which are not in the base set.
    ///
    /// The source query already excludes records with a current qualifying
    /// holding. The base set is subtracted again here so that a source which
    /// races with concurrent cataloging cannot emit a record as both
    /// present and deleted.
    pub async fn resolve_deleted_set(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<RecordIdSet> {
        let mut deleted =
            RecordIdSet::from_raw(self.source.deleted_record_ids(org_units, bound).await?);
        if deleted.is_empty() {
            return Ok(deleted);
        }

        let base = self.resolve_base_set(org_units).await?;
        let overlap = deleted.subtract(&base);
        if overlap > 0 {
            tracing::warn!(
                overlap,
                "Deleted-record query returned records that still have holdings; dropped them"
            );
        }
        Ok(deleted)
    }

    /// Resolves the record set for one batch kind of a window
    pub async fn resolve_for(
        &self,
        kind: BatchKind,
        window: &ExtractionWindow,
        org_units: &[OrgUnitId],
    ) -> Result<RecordIdSet> {
        match (kind, window) {
            (BatchKind::Full, _) => self.resolve_base_set(org_units).await,
            (BatchKind::Updates, ExtractionWindow::Incremental(bound)) => {
                self.resolve_changed_set(org_units, bound).await
            }
            (BatchKind::Deletes, ExtractionWindow::Incremental(bound)) => {
                self.resolve_deleted_set(org_units, bound).await
            }
            (kind, ExtractionWindow::Full) => Err(CatalogError::Configuration(format!(
                "{kind} batch requires an incremental window"
            ))),
        }
    }
}
