//! Batch file verification
//!
//! Every finished batch carries a SHA-256 digest so operators can correlate
//! local and remote copies.

pub mod checksum;

pub use checksum::{calculate_checksum_bytes, checksum_file, StreamingChecksum};
