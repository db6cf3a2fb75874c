//! Accept loop and per-connection request handling.
//!
//! One request per connection: the handler reads a single command line,
//! writes the response and closes. Each accepted connection gets its own
//! Tokio task, so a slow client never holds up the accept loop.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tinyfile_core::{decode_request, encode_error, encode_fetch_header, encode_listing, Request};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, ServeError};

/// Longest accepted command line, terminator included.
pub const MAX_REQUEST_LINE: u64 = 512;

/// How often the accept loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Runs the accept loop until `running` is set to `false`.
///
/// # Errors
///
/// Never fails after the listener is bound; accept errors are logged and the
/// loop continues.
pub async fn run_server(
    listener: TcpListener,
    catalog: Arc<Catalog>,
    running: Arc<AtomicBool>,
) -> io::Result<()> {
    info!(
        addr = %listener.local_addr()?,
        root = %catalog.root().display(),
        "serving files"
    );

    while running.load(Ordering::Relaxed) {
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                debug!(%peer, "connection accepted");
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, &catalog).await {
                        warn!(%peer, "connection failed: {e}");
                    }
                });
            }
            Ok(Err(e)) => error!("accept error: {e}"),
            Err(_) => {}
        }
    }

    info!("accept loop stopped");
    Ok(())
}

/// Serves exactly one request on `stream`, then shuts the write side down.
///
/// A peer that closes without sending anything gets no reply.
///
/// # Errors
///
/// Returns I/O errors from the transport. Request-level problems are answered
/// with an `ERR` line instead.
pub async fn handle_connection<S>(stream: S, catalog: &Catalog) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);

    let mut line = Vec::new();
    (&mut stream)
        .take(MAX_REQUEST_LINE)
        .read_until(b'\n', &mut line)
        .await?;
    if line.is_empty() {
        debug!("peer closed without a request");
        return Ok(());
    }

    match decode_request(&line) {
        Ok(Request::List) => match catalog.entries().await {
            Ok(entries) => {
                debug!(count = entries.len(), "LIST");
                stream.write_all(&encode_listing(&entries)).await?;
            }
            Err(e) => reply_error(&mut stream, &e).await?,
        },
        Ok(request) => {
            let want_body = !request.is_metadata_only();
            let name = request.name().unwrap_or_default();
            match catalog.open(name).await {
                Ok(served) => {
                    debug!(name, size = served.size, want_body, "serving file");
                    stream
                        .write_all(&encode_fetch_header(&served.mime, served.size))
                        .await?;
                    if want_body {
                        let mut body = served.file.take(served.size);
                        let sent = tokio::io::copy(&mut body, &mut stream).await?;
                        if sent < served.size {
                            warn!(name, expected = served.size, sent, "file shrank while sending");
                        }
                    }
                }
                Err(e) => reply_error(&mut stream, &e).await?,
            }
        }
        Err(e) => {
            debug!("rejecting request: {e}");
            reply_error(&mut stream, &ServeError::UnknownCommand).await?;
        }
    }

    stream.flush().await?;
    stream.shutdown().await
}

async fn reply_error<W>(stream: &mut W, err: &ServeError) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    debug!("replying with error: {err}");
    stream.write_all(&encode_error(&err.to_string())).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
