//! SFTP uploader
//!
//! `ssh2` is blocking, so each upload runs on the blocking thread pool.

use super::{remote_path, UploadReceipt, Uploader};
use crate::config::schema::TransferConfig;
use crate::domain::{BatchKind, CatalogError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use ssh2::Session;
use std::fs::File;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

/// Password-authenticated SFTP uploader for one organization
pub struct SftpUploader {
    config: TransferConfig,
}

impl SftpUploader {
    /// Creates an uploader; no connection is made until [`Uploader::upload`]
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    /// `host:port` of the remote server
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

#[async_trait]
impl Uploader for SftpUploader {
    async fn upload(&self, local: &Path, destination: BatchKind) -> Result<UploadReceipt> {
        let file_name = local
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CatalogError::Transfer(format!("{} has no file name", local.display()))
            })?;
        let remote = remote_path(&self.config.remote_base_dir, destination, &file_name);
        let config = self.config.clone();
        let local = local.to_path_buf();

        tracing::debug!(
            endpoint = %self.endpoint(),
            remote_path = %remote,
            "Starting SFTP upload"
        );

        tokio::task::spawn_blocking(move || upload_blocking(&config, &local, remote))
            .await
            .map_err(|e| CatalogError::Transfer(format!("SFTP upload task failed: {e}")))?
    }
}

fn transfer_error(context: &str, error: impl std::fmt::Display) -> CatalogError {
    CatalogError::Transfer(format!("{context}: {error}"))
}

fn connect(config: &TransferConfig) -> Result<Session> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let endpoint = format!("{}:{}", config.host, config.port);

    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| transfer_error(&format!("Failed to resolve {endpoint}"), e))?
        .next()
        .ok_or_else(|| CatalogError::Transfer(format!("No address found for {endpoint}")))?;

    let tcp = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| transfer_error(&format!("Failed to connect to {endpoint}"), e))?;

    let mut session =
        Session::new().map_err(|e| transfer_error("Failed to create SSH session", e))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
    session
        .handshake()
        .map_err(|e| transfer_error(&format!("SSH handshake with {endpoint} failed"), e))?;
    session
        .userauth_password(&config.username, config.password.expose_secret().as_ref())
        .map_err(|e| {
            transfer_error(
                &format!("Authentication as '{}' failed", config.username),
                e,
            )
        })?;

    if !session.authenticated() {
        return Err(CatalogError::Transfer(format!(
            "Authentication as '{}' was not accepted by {endpoint}",
            config.username
        )));
    }
    Ok(session)
}

fn upload_blocking(
    config: &TransferConfig,
    local: &Path,
    remote: String,
) -> Result<UploadReceipt> {
    let local_size = std::fs::metadata(local)
        .map_err(|e| transfer_error(&format!("Failed to stat {}", local.display()), e))?
        .len();

    let session = connect(config)?;
    let sftp = session
        .sftp()
        .map_err(|e| transfer_error("Failed to start SFTP subsystem", e))?;

    let remote_file = Path::new(&remote);
    {
        let mut source = File::open(local)
            .map_err(|e| transfer_error(&format!("Failed to open {}", local.display()), e))?;
        let mut target = sftp
            .create(remote_file)
            .map_err(|e| transfer_error(&format!("Failed to create remote {remote}"), e))?;
        io::copy(&mut source, &mut target)
            .map_err(|e| transfer_error(&format!("Failed to write remote {remote}"), e))?;
    }

    let remote_size = sftp
        .stat(remote_file)
        .map_err(|e| transfer_error(&format!("Failed to stat remote {remote}"), e))?
        .size
        .unwrap_or(0);

    if remote_size != local_size {
        return Err(CatalogError::Transfer(format!(
            "Remote size mismatch for {remote}: local {local_size} bytes, remote {remote_size} bytes"
        )));
    }

    Ok(UploadReceipt {
        remote_path: remote,
        bytes: remote_size,
    })
}
