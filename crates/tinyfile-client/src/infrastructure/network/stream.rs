//! Buffered line/block/body reading over one request's connection.
//!
//! [`ExchangeStream`] wraps any `AsyncRead + AsyncWrite` transport in a
//! [`BufReader`] and bounds every individual read or write with the client
//! timeout. The buffering replaces byte-at-a-time reads without changing what
//! a "line" or a "block" is:
//!
//! - a line ends at the first `\n` (included) or at EOF;
//! - the `LIST` block ends when the accumulated bytes end with `\n\n`;
//! - a body is at most `size` bytes, read in chunks of at most 64 KiB.
//!
//! None of the readers treat EOF as an error. They return what arrived and
//! leave the decision to the protocol layer.

use std::future::Future;
use std::io;
use std::time::Duration;

use tinyfile_core::protocol::messages::{Request, LIST_TERMINATOR, MAX_CHUNK_SIZE};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time;
use tracing::trace;

use super::ClientError;

/// Cap on the up-front body allocation; larger bodies grow as bytes arrive.
const INITIAL_BODY_CAPACITY: u64 = 1024 * 1024;

/// Runs `fut` under `limit`, mapping expiry to [`ClientError::Timeout`].
pub(crate) async fn with_timeout<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, ClientError>
where
    F: Future<Output = io::Result<T>>,
{
    match time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ClientError::Io),
        Err(_) => Err(ClientError::Timeout {
            operation,
            after: limit,
        }),
    }
}

/// One request/response exchange over a buffered transport.
///
/// Dropping the value drops the transport, which closes a TCP connection.
pub(crate) struct ExchangeStream<S> {
    inner: BufReader<S>,
    timeout: Duration,
}

impl<S> ExchangeStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, timeout: Duration) -> Self {
        Self {
            inner: BufReader::new(stream),
            timeout,
        }
    }

    /// Writes the encoded command line and flushes it.
    pub(crate) async fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        let bytes = request.encode();
        trace!(len = bytes.len(), "sending request");
        with_timeout(self.timeout, "send request", self.inner.write_all(&bytes)).await?;
        with_timeout(self.timeout, "send request", self.inner.flush()).await
    }

    /// Reads one line including its `\n`.
    ///
    /// At EOF the partial line (possibly empty) is returned instead.
    pub(crate) async fn read_line(&mut self, operation: &'static str) -> Result<Vec<u8>, ClientError> {
        let mut line = Vec::new();
        with_timeout(self.timeout, operation, self.inner.read_until(b'\n', &mut line)).await?;
        Ok(line)
    }

    /// Accumulates lines until the bytes read so far end with `\n\n`, or EOF.
    ///
    /// The terminator, when present, is part of the returned block.
    pub(crate) async fn read_block(&mut self) -> Result<Vec<u8>, ClientError> {
        let mut block = Vec::new();
        loop {
            let line = self.read_line("read listing").await?;
            if line.is_empty() {
                break;
            }
            block.extend_from_slice(&line);
            if block.ends_with(LIST_TERMINATOR) {
                break;
            }
        }
        Ok(block)
    }

    /// Reads at most `size` bytes, stopping early on EOF.
    pub(crate) async fn read_body(&mut self, size: u64) -> Result<Vec<u8>, ClientError> {
        let mut body = Vec::with_capacity(size.min(INITIAL_BODY_CAPACITY) as usize);
        let mut chunk = vec![0u8; MAX_CHUNK_SIZE];
        let mut remaining = size;

        while remaining > 0 {
            let want = remaining.min(MAX_CHUNK_SIZE as u64) as usize;
            let n = with_timeout(self.timeout, "read body", self.inner.read(&mut chunk[..want])).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
            remaining -= n as u64;
        }
        Ok(body)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
