//! Holdings enrichment index
//!
//! Resolves, for a batch's record ids, the holdings data written into each
//! record's 852 fields. Lookups are chunked so a full export of a large
//! catalog does not bind one enormous array parameter.

use crate::adapters::database::traits::{HoldingsSource, RawHoldings};
use crate::domain::{CatalogError, OrgUnitId, RecordId, RecordIdSet, Result};
use std::collections::HashMap;

/// Holdings for one record, one entry per physical holding.
///
/// Entry `i` of every list describes the same holding. Equal list lengths
/// are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingsRow {
    branches: Vec<String>,
    locations: Vec<String>,
    call_numbers: Vec<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

/// One holding, borrowed from a [`HoldingsRow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holding<'a> {
    /// Owning branch name
    pub branch: &'a str,
    /// Shelving location name
    pub location: &'a str,
    /// Call number label
    pub call_number: &'a str,
    /// Call number prefix, possibly empty
    pub prefix: &'a str,
    /// Call number suffix, possibly empty
    pub suffix: &'a str,
}

impl HoldingsRow {
    /// Builds a row from parallel lists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Query`] if the lists differ in length.
    pub fn new(
        branches: Vec<String>,
        locations: Vec<String>,
        call_numbers: Vec<String>,
        prefixes: Vec<String>,
        suffixes: Vec<String>,
    ) -> Result<Self> {
        let len = branches.len();
        let lengths = [
            locations.len(),
            call_numbers.len(),
            prefixes.len(),
            suffixes.len(),
        ];
        if lengths.iter().any(|l| *l != len) {
            return Err(CatalogError::Query(format!(
                "holdings lists have unequal lengths: branches={len}, locations={}, call_numbers={}, prefixes={}, suffixes={}",
                lengths[0], lengths[1], lengths[2], lengths[3]
            )));
        }
        Ok(Self {
            branches,
            locations,
            call_numbers,
            prefixes,
            suffixes,
        })
    }

    /// Number of holdings
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Returns true if the row has no holdings
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Holdings in stored order
    pub fn iter(&self) -> impl Iterator<Item = Holding<'_>> + '_ {
        (0..self.len()).map(move |i| Holding {
            branch: &self.branches[i],
            location: &self.locations[i],
            call_number: &self.call_numbers[i],
            prefix: &self.prefixes[i],
            suffix: &self.suffixes[i],
        })
    }
}

impl TryFrom<RawHoldings> for HoldingsRow {
    type Error = CatalogError;

    fn try_from(raw: RawHoldings) -> Result<Self> {
        HoldingsRow::new(
            raw.branches,
            raw.locations,
            raw.call_numbers,
            raw.prefixes,
            raw.suffixes,
        )
        .map_err(|e| CatalogError::Query(format!("record {}: {e}", raw.record_id)))
    }
}

/// Record id to holdings mapping for one batch
#[derive(Debug, Default)]
pub struct HoldingsIndex {
    rows: HashMap<RecordId, HoldingsRow>,
}

impl HoldingsIndex {
    /// Resolves holdings for `record_ids`, `chunk_size` ids per lookup.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Query`] if a lookup fails or yields a row with
    /// mismatched list lengths.
    pub async fn build(
        source: &dyn HoldingsSource,
        record_ids: &RecordIdSet,
        org_units: &[OrgUnitId],
        chunk_size: usize,
    ) -> Result<Self> {
        let ids: Vec<RecordId> = record_ids.iter().copied().collect();
        let mut rows = HashMap::with_capacity(ids.len());

        let chunk_size = chunk_size.max(1);
        let chunks = ids.len().div_ceil(chunk_size);
        for (n, chunk) in ids.chunks(chunk_size).enumerate() {
            crate::log_batch_progress!(n + 1, chunks, "Resolving holdings");
            for raw in source.holdings_for(chunk, org_units).await? {
                let Ok(id) = RecordId::new(raw.record_id) else {
                    continue;
                };
                if !record_ids.contains(&id) {
                    continue;
                }
                rows.insert(id, HoldingsRow::try_from(raw)?);
            }
        }

        tracing::debug!(
            requested = ids.len(),
            with_holdings = rows.len(),
            "Holdings index built"
        );
        Ok(Self { rows })
    }

    /// Holdings for a record, if it has any in scope
    pub fn get(&self, id: &RecordId) -> Option<&HoldingsRow> {
        self.rows.get(id)
    }

    /// Number of records with holdings
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no record has holdings
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_row_rejects_unequal_lengths() {
        let result = HoldingsRow::new(
            strings(&["Main", "East"]),
            strings(&["Stacks"]),
            strings(&["QA76", "QA77"]),
            strings(&["", ""]),
            strings(&["", ""]),
        );
        assert!(matches!(result, Err(CatalogError::Query(_))));
    }

    #[test]
    fn test_row_iterates_positionally() {
        let row = HoldingsRow::new(
            strings(&["Main", "East"]),
            strings(&["Stacks", "Reference"]),
            strings(&["QA76", "QA77"]),
            strings(&["", "OVERSIZE"]),
            strings(&["REF", ""]),
        )
        .unwrap();
        let holdings: Vec<_> = row.iter().collect();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[1].branch, "East");
        assert_eq!(holdings[1].location, "Reference");
        assert_eq!(holdings[1].prefix, "OVERSIZE");
        assert_eq!(holdings[0].suffix, "REF");
    }

    struct Recording {
        calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl HoldingsSource for Recording {
        async fn holdings_for(
            &self,
            record_ids: &[RecordId],
            _: &[OrgUnitId],
        ) -> Result<Vec<RawHoldings>> {
            self.calls.lock().unwrap().push(record_ids.len());
            Ok(record_ids
                .iter()
                .filter(|id| id.get() % 2 == 0)
                .map(|id| RawHoldings {
                    record_id: id.get(),
                    branches: strings(&["Main"]),
                    locations: strings(&["Stacks"]),
                    call_numbers: strings(&["QA76"]),
                    prefixes: strings(&[""]),
                    suffixes: strings(&[""]),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_build_chunks_and_skips_absent_records() {
        let source = Recording {
            calls: Mutex::new(Vec::new()),
        };
        let ids = RecordIdSet::from_raw(1..=5);
        let org_units = vec![OrgUnitId::new(4).unwrap()];
        let index = HoldingsIndex::build(&source, &ids, &org_units, 2)
            .await
            .unwrap();

        assert_eq!(*source.calls.lock().unwrap(), vec![2, 2, 1]);
        assert_eq!(index.len(), 2);
        assert!(index.get(&RecordId::new(2).unwrap()).is_some());
        assert!(index.get(&RecordId::new(3).unwrap()).is_none());
    }
}
