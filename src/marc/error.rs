//! Error types for MARC parsing and serialization.

use thiserror::Error;

/// Errors raised while parsing or serializing MARC records.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The 24-byte leader is missing or malformed
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// The record structure (directory, lengths, terminators) is malformed
    #[error("Invalid MARC record: {0}")]
    InvalidRecord(String),

    /// A field could not be decoded
    #[error("Invalid field {tag}: {reason}")]
    InvalidField {
        /// Tag of the offending field
        tag: String,
        /// What was wrong with it
        reason: String,
    },

    /// Field data is not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// MARCXML could not be parsed
    #[error("MARCXML parse error: {0}")]
    Xml(String),

    /// Record exceeds an ISO 2709 length limit
    #[error("Record too large: {0}")]
    TooLarge(String),
}

/// Convenience alias for MARC operations.
pub type Result<T> = std::result::Result<T, MarcError>;
