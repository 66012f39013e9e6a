//! ISO 2709 serialization.

use super::error::{MarcError, Result};
use super::leader::LEADER_LEN;
use super::record::{Field, Record};
use super::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};

const MAX_FIELD_LEN: usize = 9_999;
const MAX_OFFSET: usize = 99_999;

/// Serializes a record to ISO 2709 bytes.
///
/// Fields are written in record order. The record length (leader 0-4) and
/// base address (leader 12-16) are recomputed; every other leader byte is
/// written as stored.
///
/// # Errors
///
/// Returns [`MarcError::TooLarge`] if a field or the record exceeds the
/// limits of the directory encoding, and [`MarcError::InvalidField`] for a
/// tag that is not three bytes long.
pub fn serialize(record: &Record) -> Result<Vec<u8>> {
    let mut directory = Vec::with_capacity(record.fields().len() * 12 + 1);
    let mut data = Vec::new();

    for field in record.fields() {
        let start = data.len();
        match field {
            Field::Control { value, .. } => {
                data.extend_from_slice(value.as_bytes());
            }
            Field::Data(field) => {
                data.push(field.indicator1 as u8);
                data.push(field.indicator2 as u8);
                for subfield in &field.subfields {
                    data.push(SUBFIELD_DELIMITER);
                    let mut code = [0u8; 4];
                    data.extend_from_slice(subfield.code.encode_utf8(&mut code).as_bytes());
                    data.extend_from_slice(subfield.value.as_bytes());
                }
            }
        }
        data.push(FIELD_TERMINATOR);

        let length = data.len() - start;
        if length > MAX_FIELD_LEN {
            return Err(MarcError::TooLarge(format!(
                "field {} is {length} bytes",
                field.tag()
            )));
        }
        if start > MAX_OFFSET {
            return Err(MarcError::TooLarge(format!(
                "field {} starts at offset {start}",
                field.tag()
            )));
        }
        if field.tag().len() != 3 {
            return Err(MarcError::InvalidField {
                tag: field.tag().to_string(),
                reason: "tag does not fit a directory entry".to_string(),
            });
        }
        directory.extend_from_slice(field.tag().as_bytes());
        directory.extend_from_slice(format!("{length:04}{start:05}").as_bytes());
    }
    directory.push(FIELD_TERMINATOR);

    let base_address = LEADER_LEN + directory.len();
    let record_length = base_address + data.len() + 1;

    let mut leader = record.leader.clone();
    leader.set_lengths(record_length, base_address)?;

    let mut out = Vec::with_capacity(record_length);
    out.extend_from_slice(leader.as_bytes());
    out.extend_from_slice(&directory);
    out.extend_from_slice(&data);
    out.push(RECORD_TERMINATOR);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marc::leader::Leader;
    use crate::marc::reader::parse_record;
    use crate::marc::record::DataField;

    fn leader() -> Leader {
        Leader::from_bytes(b"99999cam a2299999 a 4500").unwrap()
    }

    #[test]
    fn test_lengths_recomputed() {
        let mut record = Record::new(leader());
        record.push(Field::Control {
            tag: "001".to_string(),
            value: "42".to_string(),
        });
        let bytes = serialize(&record).unwrap();

        // leader + one directory entry + terminator + "42" + FT + RT
        assert_eq!(bytes.len(), 24 + 12 + 1 + 2 + 1 + 1);
        assert_eq!(&bytes[0..5], format!("{:05}", bytes.len()).as_bytes());
        assert_eq!(&bytes[12..17], b"00037");
        assert_eq!(bytes[bytes.len() - 1], RECORD_TERMINATOR);
    }

    #[test]
    fn test_directory_entry_layout() {
        let mut record = Record::new(leader());
        record.push(Field::Data(
            DataField::new("852", '4', ' ').with_subfield('a', "EXL"),
        ));
        let bytes = serialize(&record).unwrap();
        // "4 " + 0x1F + "a" + "EXL" + FT = 8 bytes at offset 0
        assert_eq!(&bytes[24..36], b"852000800000");
    }

    #[test]
    fn test_reserialize_is_stable() {
        let mut record = Record::new(leader());
        record.push(Field::Data(
            DataField::new("245", '0', '0').with_subfield('a', "Titre accentué"),
        ));
        let first = serialize(&record).unwrap();
        let second = serialize(&parse_record(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_field_rejected() {
        let mut record = Record::new(leader());
        record.push(Field::Data(
            DataField::new("500", ' ', ' ').with_subfield('a', "x".repeat(10_000)),
        ));
        assert!(matches!(serialize(&record), Err(MarcError::TooLarge(_))));
    }

    #[test]
    fn test_short_tag_rejected() {
        let mut record = Record::new(leader());
        record.push(Field::Data(DataField::new("85", ' ', ' ').with_subfield('a', "x")));
        assert!(matches!(
            serialize(&record),
            Err(MarcError::InvalidField { .. })
        ));
    }
}
