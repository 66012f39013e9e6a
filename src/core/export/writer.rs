//! Export batch writer
//!
//! Streams materialized records into `<source_id>-catalog-<kind>-<timestamp>.mrc`
//! under the organization's output directory. A record that fails to
//! materialize aborts the batch and the partial file is removed, as does
//! dropping the write future.

use crate::core::materialize::MaterializeRecord;
use crate::core::verification::StreamingChecksum;
use crate::domain::{BatchKind, CatalogError, RecordIdSet, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Format of the timestamp embedded in batch filenames
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// A finished, flushed batch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    /// Location on local disk
    pub path: PathBuf,
    /// Kind of batch
    pub kind: BatchKind,
    /// Number of records written
    pub records: usize,
    /// File size in bytes
    pub bytes: u64,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

impl BatchFile {
    /// Filename component of the path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Builds a batch filename
///
/// ```
/// use catalog_export::core::export::writer::batch_filename;
/// use catalog_export::domain::BatchKind;
/// use chrono::{Local, TimeZone};
///
/// let at = Local.with_ymd_and_hms(2024, 4, 2, 3, 4, 5).unwrap();
/// assert_eq!(
///     batch_filename("examplelib", BatchKind::Updates, at),
///     "examplelib-catalog-updates-2024-04-02-03-04-05.mrc"
/// );
/// ```
pub fn batch_filename(source_id: &str, kind: BatchKind, timestamp: DateTime<Local>) -> String {
    format!(
        "{source_id}-catalog-{}-{}.mrc",
        kind.label(),
        timestamp.format(FILENAME_TIMESTAMP_FORMAT)
    )
}

/// Writes export batches for one organization
#[derive(Debug, Clone)]
pub struct ExportWriter {
    output_dir: PathBuf,
    source_id: String,
}

impl ExportWriter {
    /// Creates a writer placing files in `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, source_id: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            source_id: source_id.into(),
        }
    }

    /// Directory batch files are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Materializes `ids` in ascending order and writes them to a new batch file.
    ///
    /// # Errors
    ///
    /// Returns the first materialization error, or an I/O error. In either
    /// case no file is left behind.
    pub async fn write(
        &self,
        kind: BatchKind,
        ids: &RecordIdSet,
        materializer: &dyn MaterializeRecord,
        timestamp: DateTime<Local>,
    ) -> Result<BatchFile> {
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            CatalogError::Io(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let path = self
            .output_dir
            .join(batch_filename(&self.source_id, kind, timestamp));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                CatalogError::Io(format!("Failed to create {}: {e}", path.display()))
            })?;

        let guard = PartialFile::new(path.clone());
        let (records, checksum) = write_records(file, ids, materializer).await?;
        guard.keep();

        Ok(BatchFile {
            path,
            kind,
            records,
            bytes: checksum.bytes(),
            sha256: checksum.finalize(),
        })
    }
}

/// Removes a batch file on drop unless [`keep`](Self::keep) was called.
///
/// Covers both error returns and a write future dropped by a deadline.
struct PartialFile {
    path: Option<PathBuf>,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn keep(mut self) {
        self.path = None;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove partial batch file"
                    );
                }
            }
        }
    }
}

async fn write_records(
    file: fs::File,
    ids: &RecordIdSet,
    materializer: &dyn MaterializeRecord,
) -> Result<(usize, StreamingChecksum)> {
    let mut out = BufWriter::new(file);
    let mut checksum = StreamingChecksum::new();
    let mut records = 0usize;

    for id in ids {
        let bytes = materializer.materialize(*id).await?;
        out.write_all(&bytes).await?;
        checksum.update(&bytes);
        records += 1;
    }

    out.flush().await?;
    out.into_inner().sync_all().await?;
    Ok((records, checksum))
}
