//! ISO 2709 record parsing.
//!
//! A record is the 24-byte leader, a directory of 12-byte entries
//! (tag, 4-digit length, 5-digit offset) closed by a field terminator, then
//! the data area, then a record terminator.

use super::error::{MarcError, Result};
use super::leader::{parse_digits, Leader, LEADER_LEN};
use super::record::{is_control_tag, DataField, Field, Record};
use super::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};
use std::io::{ErrorKind, Read};

const DIRECTORY_ENTRY_LEN: usize = 12;

/// Parses exactly one ISO 2709 record from `bytes`.
///
/// Trailing bytes after the declared record length are ignored.
///
/// # Errors
///
/// Returns an error if the leader, directory or any field is malformed or if
/// field data is not valid UTF-8.
pub fn parse_record(bytes: &[u8]) -> Result<Record> {
    let leader = Leader::from_bytes(bytes)?;
    let record_length = leader.record_length()?;
    let base_address = leader.base_address()?;

    if record_length > bytes.len() {
        return Err(MarcError::InvalidRecord(format!(
            "declared length {record_length} exceeds available {} bytes",
            bytes.len()
        )));
    }
    if base_address <= LEADER_LEN || base_address > record_length {
        return Err(MarcError::InvalidRecord(format!(
            "base address {base_address} outside record of length {record_length}"
        )));
    }

    let directory = &bytes[LEADER_LEN..base_address];
    let data = &bytes[base_address..record_length];
    let mut record = Record::new(leader);

    let mut pos = 0;
    while pos < directory.len() && directory[pos] != FIELD_TERMINATOR {
        let entry = directory
            .get(pos..pos + DIRECTORY_ENTRY_LEN)
            .ok_or_else(|| MarcError::InvalidRecord("incomplete directory entry".to_string()))?;
        pos += DIRECTORY_ENTRY_LEN;

        let tag = std::str::from_utf8(&entry[0..3])
            .map_err(|_| MarcError::InvalidRecord("non-ASCII tag in directory".to_string()))?
            .to_string();
        let length = parse_digits(&entry[3..7], "field length")?;
        let start = parse_digits(&entry[7..12], "field offset")?;

        let field_data = data.get(start..start + length).ok_or_else(|| {
            MarcError::InvalidField {
                tag: tag.clone(),
                reason: format!("offset {start} + length {length} exceeds data area"),
            }
        })?;
        record.push(parse_field(tag, field_data)?);
    }

    Ok(record)
}

fn parse_field(tag: String, data: &[u8]) -> Result<Field> {
    let body = data.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(data);

    if is_control_tag(&tag) {
        let value = decode(&tag, body)?;
        return Ok(Field::Control { tag, value });
    }

    if body.len() < 2 {
        return Err(MarcError::InvalidField {
            tag,
            reason: "data field too short for indicators".to_string(),
        });
    }
    let mut field = DataField::new(tag.clone(), body[0] as char, body[1] as char);

    let subfield_area = &body[2..];
    if subfield_area.is_empty() {
        return Ok(Field::Data(field));
    }
    if subfield_area[0] != SUBFIELD_DELIMITER {
        return Err(MarcError::InvalidField {
            tag,
            reason: "expected subfield delimiter after indicators".to_string(),
        });
    }
    for chunk in subfield_area[1..].split(|b| *b == SUBFIELD_DELIMITER) {
        let Some((&code, value)) = chunk.split_first() else {
            continue;
        };
        field.add_subfield(code as char, decode(&tag, value)?);
    }
    Ok(Field::Data(field))
}

fn decode(tag: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| MarcError::Encoding(format!("field {tag}: {e}")))
}

/// Reads consecutive ISO 2709 records from a byte stream.
#[derive(Debug)]
pub struct MarcReader<R> {
    reader: R,
    records_read: usize,
}

impl<R: Read> MarcReader<R> {
    /// Wraps a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            records_read: 0,
        }
    }

    /// Reads the next record, or `None` at a clean end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated or malformed records.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut leader = [0u8; LEADER_LEN];
        match self.reader.read_exact(&mut leader) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(MarcError::InvalidRecord(e.to_string())),
        }

        let record_length = Leader::from_bytes(&leader)?.record_length()?;
        if record_length <= LEADER_LEN {
            return Err(MarcError::InvalidRecord(format!(
                "record length {record_length} too small"
            )));
        }

        let mut bytes = Vec::with_capacity(record_length);
        bytes.extend_from_slice(&leader);
        bytes.resize(record_length, 0);
        self.reader
            .read_exact(&mut bytes[LEADER_LEN..])
            .map_err(|e| MarcError::InvalidRecord(format!("truncated record: {e}")))?;

        if bytes.last() != Some(&RECORD_TERMINATOR) {
            return Err(MarcError::InvalidRecord(
                "missing record terminator".to_string(),
            ));
        }

        let record = parse_record(&bytes)?;
        self.records_read += 1;
        Ok(Some(record))
    }

    /// Number of records read so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }
}

impl<R: Read> Iterator for MarcReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
