//! The [`FileSource`] seam between use cases and the network.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tinyfile_core::{DirectoryEntry, FetchResult, ProtocolError, TruncatedBody};

/// Error type for browse and transfer operations.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The server could not be reached or the connection failed mid-exchange.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The connect or a read/write exceeded the configured timeout.
    #[error("{0}")]
    Timeout(String),
    /// The server's reply was malformed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The body ended before its declared size.
    #[error("{name}: {source}")]
    Truncated {
        name: String,
        #[source]
        source: TruncatedBody,
    },
    /// The name would corrupt the single-line request.
    #[error("invalid file name {0:?}: names must not contain line breaks")]
    InvalidName(String),
    /// Writing a downloaded file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where files come from.
///
/// Implemented by `RemoteFileSource` in the infrastructure layer; one call is
/// one exchange with the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Returns the remote directory listing.
    async fn list(&self) -> Result<Vec<DirectoryEntry>, TransferError>;

    /// Fetches `name`, or only its metadata when `metadata_only` is set.
    ///
    /// The body may be shorter than the declared size.
    async fn fetch(&self, name: &str, metadata_only: bool) -> Result<FetchResult, TransferError>;
}
