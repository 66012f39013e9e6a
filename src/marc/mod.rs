//! MARC 21 bibliographic record handling.
//!
//! Just enough of MARC to rewrite records on their way out: a record model
//! that preserves field order, ISO 2709 reading and writing, and MARCXML
//! reading for payloads held in the catalog database.
//!
//! ```
//! use catalog_export::marc::{parse_payload, serialize};
//!
//! let xml = r#"<record><leader>00000nam a2200000 a 4500</leader>
//!   <controlfield tag="001">42</controlfield></record>"#;
//! let mut record = parse_payload(xml.as_bytes()).unwrap();
//! record.leader.set_status(b'd');
//! let bytes = serialize(&record).unwrap();
//! assert_eq!(bytes[5], b'd');
//! ```

pub mod error;
pub mod leader;
pub mod marcxml;
pub mod reader;
pub mod record;
pub mod writer;

pub use error::MarcError;
pub use leader::Leader;
pub use marcxml::parse_marcxml;
pub use reader::{parse_record, MarcReader};
pub use record::{DataField, Field, Record, Subfield};
pub use writer::serialize;

/// Ends every field, and the directory
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Precedes every subfield code
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
/// Ends every record
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Parses a stored payload, accepting MARCXML or ISO 2709.
///
/// A payload whose first non-whitespace byte is `<` is treated as MARCXML.
///
/// # Errors
///
/// Returns the parser's error for the detected format.
pub fn parse_payload(payload: &[u8]) -> error::Result<Record> {
    let first = payload.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'<') {
        let xml = std::str::from_utf8(payload)
            .map_err(|e| MarcError::Encoding(format!("MARCXML payload: {e}")))?;
        parse_marcxml(xml)
    } else {
        parse_record(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_detection() {
        let xml = b"  <record><leader>00000nam a2200000 a 4500</leader></record>";
        assert!(parse_payload(xml).is_ok());

        let record = parse_payload(xml).unwrap();
        let iso = serialize(&record).unwrap();
        let reparsed = parse_payload(&iso).unwrap();
        assert_eq!(reparsed.fields(), record.fields());
        assert_eq!(reparsed.leader.status(), b'n');
    }

    #[test]
    fn test_garbage_payload() {
        assert!(parse_payload(b"not a record").is_err());
        assert!(parse_payload(b"").is_err());
    }
}
