//! MARC record leader.
//!
//! The leader is the fixed 24-byte header of every record:
//!
//! - Positions 0-4: record length (5 digits)
//! - Position 5: record status (`c`, `d`, `n`, ...)
//! - Position 6: type of record
//! - Position 9: character coding scheme
//! - Positions 12-16: base address of data (5 digits)
//!
//! The leader is kept as raw bytes so that positions this crate does not
//! manage survive a parse/serialize cycle untouched. Only the status byte and
//! the two length fields are ever rewritten.

use super::error::{MarcError, Result};

/// Length of a MARC leader in bytes
pub const LEADER_LEN: usize = 24;

/// Status byte marking a record as deleted
pub const STATUS_DELETED: u8 = b'd';

const STATUS_POS: usize = 5;

/// MARC leader, 24 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader([u8; LEADER_LEN]);

impl Leader {
    /// Parses a leader from at least 24 bytes.
    ///
    /// Length and base-address digits are not validated here: MARCXML
    /// leaders frequently carry placeholders in those positions, and both
    /// are recomputed on serialization anyway.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 24 bytes are given or any byte is not ASCII.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "expected {LEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut raw = [0u8; LEADER_LEN];
        raw.copy_from_slice(&bytes[..LEADER_LEN]);
        if let Some(pos) = raw.iter().position(|b| !b.is_ascii()) {
            return Err(MarcError::InvalidLeader(format!(
                "non-ASCII byte at position {pos}"
            )));
        }
        Ok(Self(raw))
    }

    /// Parses a leader from MARCXML text, padding a whitespace-trimmed tail
    /// back to 24 bytes.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.len() > LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "expected {LEADER_LEN} characters, got {}",
                text.len()
            )));
        }
        let mut padded = text.as_bytes().to_vec();
        padded.resize(LEADER_LEN, b' ');
        Self::from_bytes(&padded)
    }

    /// Raw leader bytes
    pub fn as_bytes(&self) -> &[u8; LEADER_LEN] {
        &self.0
    }

    /// Record status (position 5)
    pub fn status(&self) -> u8 {
        self.0[STATUS_POS]
    }

    /// Overwrites the record status (position 5)
    pub fn set_status(&mut self, status: u8) {
        self.0[STATUS_POS] = status;
    }

    /// Record length declared in positions 0-4
    pub fn record_length(&self) -> Result<usize> {
        parse_digits(&self.0[0..5], "record length")
    }

    /// Base address of data declared in positions 12-16
    pub fn base_address(&self) -> Result<usize> {
        parse_digits(&self.0[12..17], "base address")
    }

    /// Writes the record length and base address used by the ISO 2709 writer
    pub(crate) fn set_lengths(&mut self, record_length: usize, base_address: usize) -> Result<()> {
        if record_length > 99_999 {
            return Err(MarcError::TooLarge(format!(
                "record length {record_length} exceeds 99999 bytes"
            )));
        }
        self.0[0..5].copy_from_slice(format!("{record_length:05}").as_bytes());
        self.0[12..17].copy_from_slice(format!("{base_address:05}").as_bytes());
        Ok(())
    }
}

pub(crate) fn parse_digits(bytes: &[u8], what: &str) -> Result<usize> {
    let mut value = 0usize;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return Err(MarcError::InvalidRecord(format!(
                "{what} is not numeric: {:?}",
                String::from_utf8_lossy(bytes)
            )));
        }
        value = value * 10 + usize::from(byte - b'0');
    }
    Ok(value)
}
