//! Record materialization
//!
//! Turns a stored bibliographic payload into the bytes written to an export
//! batch. Delete batches only flip the leader status to `d`. Every other batch
//! replaces the record's 852 holdings fields with ones built from the
//! holdings index.

use crate::adapters::database::traits::RecordStore;
use crate::core::holdings::{Holding, HoldingsIndex, HoldingsRow};
use crate::domain::{CatalogError, RecordId, Result};
use crate::marc::leader::STATUS_DELETED;
use crate::marc::{parse_payload, serialize, DataField, Field, Record};
use async_trait::async_trait;

/// Holdings location field tag
pub const HOLDINGS_TAG: &str = "852";

/// How a record is mutated before it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<'a> {
    /// Mark the record deleted; nothing else changes
    Delete,
    /// Replace holdings fields, crediting `agency_code` in subfield `a`
    Enrich {
        /// Catalog agency code for 852 $a
        agency_code: &'a str,
    },
}

/// Materializes one stored payload.
///
/// # Errors
///
/// Returns [`CatalogError::RecordParse`] if the payload cannot be parsed or
/// the mutated record cannot be serialized.
pub fn materialize(
    id: RecordId,
    payload: &[u8],
    mutation: Mutation<'_>,
    holdings: Option<&HoldingsRow>,
) -> Result<Vec<u8>> {
    let mut record =
        parse_payload(payload).map_err(|source| CatalogError::RecordParse { id, source })?;

    match mutation {
        Mutation::Delete => record.leader.set_status(STATUS_DELETED),
        Mutation::Enrich { agency_code } => replace_holdings(&mut record, agency_code, holdings),
    }

    serialize(&record).map_err(|source| CatalogError::RecordParse { id, source })
}

fn replace_holdings(record: &mut Record, agency_code: &str, holdings: Option<&HoldingsRow>) {
    record.remove_fields(HOLDINGS_TAG);
    for holding in holdings.into_iter().flat_map(HoldingsRow::iter) {
        record.insert_in_tag_order(Field::Data(holdings_field(agency_code, &holding)));
    }
}

/// Builds one 852 field: indicators `4` and blank, then `$a` agency,
/// `$b` branch, `$c` location, `$j` call number, and `$k` prefix / `$m`
/// suffix only when non-empty.
pub fn holdings_field(agency_code: &str, holding: &Holding<'_>) -> DataField {
    let mut field = DataField::new(HOLDINGS_TAG, '4', ' ')
        .with_subfield('a', agency_code)
        .with_subfield('b', holding.branch)
        .with_subfield('c', holding.location)
        .with_subfield('j', holding.call_number);
    if !holding.prefix.is_empty() {
        field.add_subfield('k', holding.prefix);
    }
    if !holding.suffix.is_empty() {
        field.add_subfield('m', holding.suffix);
    }
    field
}

/// Produces the bytes for one record id
#[async_trait]
pub trait MaterializeRecord: Send + Sync {
    /// Fetches and mutates the record with the given id
    async fn materialize(&self, id: RecordId) -> Result<Vec<u8>>;
}

/// Materializer for one batch: a record store plus the batch's mutation
/// and, for non-delete batches, its holdings index.
pub struct RecordMaterializer<'a> {
    store: &'a dyn RecordStore,
    mutation: Mutation<'a>,
    holdings: Option<&'a HoldingsIndex>,
}

impl<'a> RecordMaterializer<'a> {
    /// Materializer for a delete batch
    pub fn deletes(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            mutation: Mutation::Delete,
            holdings: None,
        }
    }

    /// Materializer for a full or updates batch
    pub fn enriching(
        store: &'a dyn RecordStore,
        agency_code: &'a str,
        holdings: &'a HoldingsIndex,
    ) -> Self {
        Self {
            store,
            mutation: Mutation::Enrich { agency_code },
            holdings: Some(holdings),
        }
    }
}

#[async_trait]
impl<'a> MaterializeRecord for RecordMaterializer<'a> {
    async fn materialize(&self, id: RecordId) -> Result<Vec<u8>> {
        let payload = self
            .store
            .fetch_record(id)
            .await?
            .ok_or(CatalogError::RecordNotFound(id))?;
        let row = self.holdings.and_then(|index| index.get(&id));
        materialize(id, &payload, self.mutation, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marc::{parse_record, Leader};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn stored() -> Vec<u8> {
        let mut record = Record::new(Leader::from_bytes(b"00000cam a2200000 a 4500").unwrap());
        record.push(Field::Control {
            tag: "001".to_string(),
            value: "42".to_string(),
        });
        record.push(Field::Data(
            DataField::new("245", '1', '0').with_subfield('a', "A title"),
        ));
        record.push(Field::Data(
            DataField::new("852", ' ', ' ').with_subfield('b', "STALE"),
        ));
        record.push(Field::Data(
            DataField::new("901", ' ', ' ').with_subfield('c', "42"),
        ));
        serialize(&record).unwrap()
    }

    fn id() -> RecordId {
        RecordId::new(42).unwrap()
    }

    #[test]
    fn test_delete_changes_only_status_byte() {
        let original = stored();
        let out = materialize(id(), &original, Mutation::Delete, None).unwrap();
        assert_eq!(out.len(), original.len());
        let diffs: Vec<usize> = original
            .iter()
            .zip(out.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(diffs, vec![5]);
        assert_eq!(out[5], b'd');
    }

    #[test]
    fn test_enrich_without_holdings_strips_852() {
        let out = materialize(id(), &stored(), Mutation::Enrich { agency_code: "EXL" }, None)
            .unwrap();
        let record = parse_record(&out).unwrap();
        assert_eq!(record.data_fields("852").count(), 0);
        assert_eq!(record.data_fields("245").count(), 1);
        assert_eq!(record.data_fields("901").count(), 1);
    }

    #[test]
    fn test_enrich_prefix_empty_suffix_ref() {
        let row = HoldingsRow::new(
            strings(&["Main"]),
            strings(&["Reference"]),
            strings(&["QA76.73 .R87"]),
            strings(&[""]),
            strings(&["REF"]),
        )
        .unwrap();
        let out = materialize(
            id(),
            &stored(),
            Mutation::Enrich { agency_code: "EXL" },
            Some(&row),
        )
        .unwrap();
        let record = parse_record(&out).unwrap();
        let fields: Vec<_> = record.data_fields("852").collect();
        assert_eq!(fields.len(), 1);
        let field = fields[0];
        assert_eq!((field.indicator1, field.indicator2), ('4', ' '));
        let codes: String = field.subfields.iter().map(|sf| sf.code).collect();
        assert_eq!(codes, "abcjm");
        assert!(field.subfield_values('k').is_empty());
        assert_eq!(field.subfield_values('m'), vec!["REF"]);
        assert_eq!(field.subfield_values('a'), vec!["EXL"]);
    }

    #[test]
    fn test_enrich_inserts_in_tag_order_and_holdings_order() {
        let row = HoldingsRow::new(
            strings(&["Main", "East"]),
            strings(&["Stacks", "Stacks"]),
            strings(&["QA1", "QA2"]),
            strings(&["", ""]),
            strings(&["", ""]),
        )
        .unwrap();
        let out = materialize(
            id(),
            &stored(),
            Mutation::Enrich { agency_code: "EXL" },
            Some(&row),
        )
        .unwrap();
        let record = parse_record(&out).unwrap();
        let tags: Vec<_> = record.fields().iter().map(Field::tag).collect();
        assert_eq!(tags, vec!["001", "245", "852", "852", "901"]);
        let branches: Vec<_> = record
            .data_fields("852")
            .flat_map(|f| f.subfield_values('b'))
            .collect();
        assert_eq!(branches, vec!["Main", "East"]);
    }

    #[test]
    fn test_materialize_is_deterministic() {
        let row = HoldingsRow::new(
            strings(&["Main"]),
            strings(&["Stacks"]),
            strings(&["QA1"]),
            strings(&["BIG"]),
            strings(&[""]),
        )
        .unwrap();
        let mutation = Mutation::Enrich { agency_code: "EXL" };
        let first = materialize(id(), &stored(), mutation, Some(&row)).unwrap();
        let second = materialize(id(), &stored(), mutation, Some(&row)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unparseable_payload() {
        let result = materialize(id(), b"garbage", Mutation::Delete, None);
        assert!(matches!(result, Err(CatalogError::RecordParse { .. })));
    }
}
