//! Checksums for export batch files
//!
//! The export writer hashes records as they are written so the digest of a
//! finished batch is known without reading the file back. [`checksum_file`]
//! recomputes it from disk for verification.

use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Incremental SHA-256 over written bytes
#[derive(Clone, Default)]
pub struct StreamingChecksum {
    hasher: Sha256,
    bytes: u64,
}

impl StreamingChecksum {
    /// Starts an empty digest
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bytes into the digest
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes += data.len() as u64;
    }

    /// Bytes hashed so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Hex-encoded digest (64 characters)
    pub fn finalize(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// Calculate SHA-256 checksum of raw bytes
///
/// # Examples
///
/// ```
/// use catalog_export::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"");
/// assert_eq!(
///     checksum,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut checksum = StreamingChecksum::new();
    checksum.update(data);
    checksum.finalize()
}

/// Calculate SHA-256 checksum of a file on disk
pub async fn checksum_file(path: impl AsRef<Path>) -> Result<String> {
    let mut file = tokio::fs::File::open(path.as_ref()).await?;
    let mut checksum = StreamingChecksum::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        checksum.update(&buf[..n]);
    }
    Ok(checksum.finalize())
}
