//! Outbound transfer of finished batch files
//!
//! The destination directory depends only on the batch kind, joined under
//! the organization's optional remote base directory.

pub mod sftp;

pub use sftp::SftpUploader;

use crate::config::schema::OrganizationConfig;
use crate::domain::{BatchKind, Result};
use async_trait::async_trait;
use std::path::Path;

/// Result of a verified transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Path of the file on the remote host
    pub remote_path: String,
    /// Bytes confirmed on the remote side
    pub bytes: u64,
}

/// Sends one local batch file to the remote directory for `destination`
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads `local` and verifies the remote copy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CatalogError::Transfer`] on any connection,
    /// authentication, write or verification failure.
    async fn upload(&self, local: &Path, destination: BatchKind) -> Result<UploadReceipt>;
}

/// Builds the uploader for an organization
pub trait UploaderFactory: Send + Sync {
    /// Uploader bound to `organization`'s transfer settings
    fn uploader_for(&self, organization: &OrganizationConfig) -> Box<dyn Uploader>;
}

/// Creates [`SftpUploader`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct SftpUploaderFactory;

impl UploaderFactory for SftpUploaderFactory {
    fn uploader_for(&self, organization: &OrganizationConfig) -> Box<dyn Uploader> {
        Box::new(SftpUploader::new(organization.transfer.clone()))
    }
}

/// Remote path for a batch file
///
/// ```
/// use catalog_export::adapters::transfer::remote_path;
/// use catalog_export::domain::BatchKind;
///
/// assert_eq!(remote_path("", BatchKind::Full, "a.mrc"), "full/a.mrc");
/// assert_eq!(remote_path("/outgoing/", BatchKind::Deletes, "a.mrc"), "/outgoing/deletes/a.mrc");
/// ```
pub fn remote_path(base_dir: &str, destination: BatchKind, file_name: &str) -> String {
    let base = base_dir.trim_end_matches('/');
    if base.is_empty() {
        format!("{}/{}", destination.remote_dir(), file_name)
    } else {
        format!("{}/{}/{}", base, destination.remote_dir(), file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", BatchKind::Full, "full/x.mrc")]
    #[test_case("", BatchKind::Updates, "updates/x.mrc")]
    #[test_case("base", BatchKind::Deletes, "base/deletes/x.mrc")]
    #[test_case("/srv/in//", BatchKind::Updates, "/srv/in/updates/x.mrc")]
    fn test_remote_path(base: &str, kind: BatchKind, expected: &str) {
        assert_eq!(remote_path(base, kind, "x.mrc"), expected);
    }
}
