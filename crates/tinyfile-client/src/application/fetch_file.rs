//! FetchFileUseCase: metadata, preview and download of a single remote file.
//!
//! The protocol client hands back whatever body bytes arrived, even if the
//! server closed early. This use case is the caller that must not accept such
//! a body: every content-returning operation runs the result through
//! [`FetchResult::ensure_complete`] and fails with
//! [`TransferError::Truncated`] otherwise.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tinyfile_core::{FetchResult, Preview};
use tracing::{debug, info};

use super::source::{FileSource, TransferError};

/// Metadata of a remote file as reported by `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    /// Empty when the server sent no `TYPE` header.
    pub mime: String,
    pub size: u64,
}

impl FileInfo {
    /// The MIME type for display, `"unknown"` when absent.
    pub fn type_text(&self) -> &str {
        if self.mime.is_empty() {
            "unknown"
        } else {
            &self.mime
        }
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Type: {}", self.type_text())?;
        write!(f, "Size: {} bytes", self.size)
    }
}

/// The Fetch File use case.
pub struct FetchFileUseCase {
    source: Arc<dyn FileSource>,
}

impl FetchFileUseCase {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        Self { source }
    }

    /// Retrieves only the metadata of `name`.
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidName`] for names with line breaks, otherwise
    /// whatever the source reports.
    pub async fn inspect(&self, name: &str) -> Result<FileInfo, TransferError> {
        validate_name(name)?;
        let result = self.source.fetch(name, true).await?;
        Ok(FileInfo {
            name: name.to_string(),
            mime: result.mime,
            size: result.size,
        })
    }

    /// Retrieves the full body of `name`, rejecting short bodies.
    ///
    /// # Errors
    ///
    /// [`TransferError::Truncated`] when fewer bytes arrived than declared.
    pub async fn get(&self, name: &str) -> Result<FetchResult, TransferError> {
        validate_name(name)?;
        let result = self.source.fetch(name, false).await?;
        let result = result
            .ensure_complete()
            .map_err(|source| TransferError::Truncated {
                name: name.to_string(),
                source,
            })?;
        debug!(name, size = result.size, "body complete");
        Ok(result)
    }

    /// Fetches `name` and classifies its content for display.
    pub async fn preview(&self, name: &str) -> Result<Preview, TransferError> {
        let result = self.get(name).await?;
        Ok(Preview::classify(name, &result.mime, &result.body))
    }

    /// Fetches `name` and writes it to `target`, returning the bytes written.
    ///
    /// Nothing is written when the body is truncated.
    pub async fn download(&self, name: &str, target: &Path) -> Result<u64, TransferError> {
        let result = self.get(name).await?;
        tokio::fs::write(target, &result.body)
            .await
            .map_err(|source| TransferError::Write {
                path: target.to_path_buf(),
                source,
            })?;
        info!(name, path = %target.display(), bytes = result.size, "saved file");
        Ok(result.size)
    }
}

/// Rejects names that would split the request line.
fn validate_name(name: &str) -> Result<(), TransferError> {
    if name.contains(['\n', '\r']) {
        return Err(TransferError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
