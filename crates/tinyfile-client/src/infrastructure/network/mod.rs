//! Network infrastructure for the client application.
//!
//! Implements the two protocol operations on top of a plain TCP connection.
//!
//! Architecture:
//! - [`FileClient`] opens one connection per call and drops it on every exit
//!   path, successful or not.
//! - The exchange itself (`list_over` / `fetch_over`) is generic over any
//!   `AsyncRead + AsyncWrite` transport so tests can drive it with scripted
//!   mock streams.
//! - [`RemoteFileSource`] binds a client to one endpoint and implements the
//!   application layer's [`FileSource`] seam.
//!
//! # Exchange sequence (for beginners)
//!
//! ```text
//!  client                                server
//!    │──── LIST\n ──────────────────────────▶│
//!    │◀─── FILES 2\n ────────────────────────│   header line
//!    │◀─── a.txt\t120\n ─────────────────────│
//!    │◀─── b.png\timage/png\t2048\n ─────────│   entry block
//!    │◀─── \n ───────────────────────────────│   blank line ends the block
//!
//!    │──── GET a.txt\n ─────────────────────▶│
//!    │◀─── TYPE text/plain\n ────────────────│   optional
//!    │◀─── SIZE 120\n ───────────────────────│   mandatory
//!    │◀─── \n ───────────────────────────────│
//!    │◀─── <120 raw bytes> ──────────────────│   GET only
//! ```

mod stream;

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tinyfile_core::{
    check_list_header, parse_listing,
    protocol::codec::strip_list_terminator,
    DirectoryEntry, FetchResult, HeaderLine, ProtocolError, Request, ResponseHeaders,
    TruncatedBody,
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
    time,
};
use tracing::{debug, info, warn};

use crate::application::{FileSource, TransferError};
use stream::ExchangeStream;

/// Default bound for the connect and for each individual read or write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// TCP connection to the server failed (refused, unreachable, DNS).
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// The connect or a single read/write did not finish in time.
    #[error("timed out after {after:?} while trying to {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[source] io::Error),
    /// The server's reply did not follow the protocol.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A body shorter than its declared size, reported by
    /// [`FetchResult::ensure_complete`].
    #[error(transparent)]
    Truncated(#[from] TruncatedBody),
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect failure, timeout or connection-level I/O failure.
    Connection,
    /// Malformed server reply.
    Protocol,
    /// Short body.
    Truncated,
}

impl ClientError {
    /// Returns the kind a caller should branch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect { .. } | Self::Timeout { .. } | Self::Io(_) => ErrorKind::Connection,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Truncated(_) => ErrorKind::Truncated,
        }
    }

    /// Converts to the application error for a request about `name`.
    ///
    /// `name` labels a [`TransferError::Truncated`] so the message says which
    /// file came up short.
    pub fn into_transfer_error(self, name: &str) -> TransferError {
        match self {
            Self::Protocol(e) => TransferError::Protocol(e),
            Self::Truncated(source) => TransferError::Truncated {
                name: name.to_string(),
                source,
            },
            Self::Timeout { .. } => TransferError::Timeout(self.to_string()),
            Self::Connect { .. } | Self::Io(_) => TransferError::Connection(self.to_string()),
        }
    }
}

/// Configuration for the client's network behaviour.
#[derive(Debug, Clone)]
pub struct FileClientConfig {
    /// Bound for the connect and for each individual read or write.
    pub timeout: Duration,
}

impl Default for FileClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Stateless protocol client. Every call is an independent exchange.
#[derive(Debug, Clone, Default)]
pub struct FileClient {
    config: FileClientConfig,
}

impl FileClient {
    /// Creates a client with the given configuration.
    pub fn new(config: FileClientConfig) -> Self {
        Self { config }
    }

    /// Returns the configured per-operation timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Retrieves the directory listing from `host:port`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Connect`] / [`ClientError::Timeout`] / [`ClientError::Io`]
    ///   when the connection cannot be established or fails.
    /// - [`ClientError::Protocol`] when the first line is not a `FILES ` header.
    pub async fn list(&self, host: &str, port: u16) -> Result<Vec<DirectoryEntry>, ClientError> {
        let stream = self.connect(host, port).await?;
        self.list_over(stream).await
    }

    /// Retrieves a file (`GET`) or only its metadata (`HEAD`) from `host:port`.
    ///
    /// The returned body may be shorter than `size` if the server closed the
    /// connection early; use [`FetchResult::ensure_complete`] before trusting it.
    ///
    /// # Errors
    ///
    /// Connection-kind errors as for [`FileClient::list`];
    /// [`ClientError::Protocol`] when `SIZE` is missing or not a number.
    pub async fn fetch(
        &self,
        host: &str,
        port: u16,
        name: &str,
        metadata_only: bool,
    ) -> Result<FetchResult, ClientError> {
        let stream = self.connect(host, port).await?;
        self.fetch_over(stream, name, metadata_only).await
    }

    /// Runs the `LIST` exchange over an already-connected transport.
    pub async fn list_over<S>(&self, stream: S) -> Result<Vec<DirectoryEntry>, ClientError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut stream = ExchangeStream::new(stream, self.config.timeout);
        stream.send(&Request::List).await?;

        let header = stream.read_line("read listing header").await?;
        check_list_header(&header)?;

        let mut block = stream.read_block().await?;
        if !strip_list_terminator(&mut block) {
            debug!(len = block.len(), "listing ended before blank line; using partial block");
        }

        let entries = parse_listing(&block);
        debug!(count = entries.len(), "received listing");
        Ok(entries)
    }

    /// Runs the `GET`/`HEAD` exchange over an already-connected transport.
    pub async fn fetch_over<S>(
        &self,
        stream: S,
        name: &str,
        metadata_only: bool,
    ) -> Result<FetchResult, ClientError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if name.contains('\n') {
            warn!(name, "file name contains a line break; the request line will be split");
        }

        let mut stream = ExchangeStream::new(stream, self.config.timeout);
        stream.send(&Request::fetch(name, metadata_only)).await?;

        let mut headers = ResponseHeaders::new();
        loop {
            let line = stream.read_line("read response header").await?;
            if headers.feed(&line)? == HeaderLine::End {
                break;
            }
        }
        let (mime, size) = headers.finish()?;

        if metadata_only {
            debug!(name, %mime, size, "received metadata");
            return Ok(FetchResult {
                body: Vec::new(),
                mime,
                size,
            });
        }

        let body = stream.read_body(size).await?;
        if (body.len() as u64) < size {
            warn!(name, expected = size, received = body.len(), "connection closed before full body");
        } else {
            debug!(name, %mime, size, "received body");
        }
        Ok(FetchResult { body, mime, size })
    }

    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream, ClientError> {
        let addr = format!("{host}:{port}");
        match time::timeout(self.config.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                debug!(%addr, "connected");
                Ok(stream)
            }
            Ok(Err(source)) => Err(ClientError::Connect { addr, source }),
            Err(_) => Err(ClientError::Timeout {
                operation: "connect",
                after: self.config.timeout,
            }),
        }
    }
}

// ── Remote file source ────────────────────────────────────────────────────────

/// Host and port of a Tiny File server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub host: String,
    pub port: u16,
}

impl RemoteEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A [`FileClient`] bound to one server; the production [`FileSource`].
#[derive(Debug, Clone)]
pub struct RemoteFileSource {
    client: FileClient,
    endpoint: RemoteEndpoint,
}

impl RemoteFileSource {
    pub fn new(client: FileClient, endpoint: RemoteEndpoint) -> Self {
        info!(%endpoint, timeout = ?client.timeout(), "using remote file source");
        Self { client, endpoint }
    }
}

#[async_trait]
impl FileSource for RemoteFileSource {
    async fn list(&self) -> Result<Vec<DirectoryEntry>, TransferError> {
        self.client
            .list(&self.endpoint.host, self.endpoint.port)
            .await
            .map_err(|err| err.into_transfer_error("listing"))
    }

    async fn fetch(&self, name: &str, metadata_only: bool) -> Result<FetchResult, TransferError> {
        self.client
            .fetch(&self.endpoint.host, self.endpoint.port, name, metadata_only)
            .await
            .map_err(|err| err.into_transfer_error(name))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
