//! Request and response types of the Tiny File protocol.
//!
//! Requests are single ASCII command lines. Responses are a header block
//! terminated by a blank line, optionally followed by a raw payload.

use thiserror::Error;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Prefix of the first line of a `LIST` response (`FILES <n>\n`).
pub const LIST_HEADER_PREFIX: &[u8] = b"FILES ";

/// Header key carrying the MIME type of a fetched file.
pub const TYPE_HEADER_PREFIX: &[u8] = b"TYPE ";

/// Header key carrying the payload length of a fetched file.
pub const SIZE_HEADER_PREFIX: &[u8] = b"SIZE ";

/// Prefix of a server error reply.
pub const ERROR_PREFIX: &str = "ERR ";

/// Two-byte sequence that ends the entry block of a `LIST` response.
pub const LIST_TERMINATOR: &[u8] = b"\n\n";

/// Upper bound on a single payload read.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

// ── Requests ──────────────────────────────────────────────────────────────────

/// A client command.
///
/// The name is sent verbatim. A name containing `\n` would split the command
/// line in two; callers must reject such names before building a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `LIST\n` – request the remote directory.
    List,
    /// `GET <name>\n` – request metadata and payload.
    Get { name: String },
    /// `HEAD <name>\n` – request metadata only.
    Head { name: String },
}

impl Request {
    /// Builds a `HEAD` request when `metadata_only` is set, `GET` otherwise.
    pub fn fetch(name: impl Into<String>, metadata_only: bool) -> Self {
        let name = name.into();
        if metadata_only {
            Request::Head { name }
        } else {
            Request::Get { name }
        }
    }

    /// Encodes the request as the exact bytes written to the socket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tinyfile_core::Request;
    ///
    /// assert_eq!(Request::List.encode(), b"LIST\n");
    /// assert_eq!(Request::fetch("a.txt", true).encode(), b"HEAD a.txt\n");
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Request::List => b"LIST\n".to_vec(),
            Request::Get { name } => format!("GET {name}\n").into_bytes(),
            Request::Head { name } => format!("HEAD {name}\n").into_bytes(),
        }
    }

    /// Returns the file name targeted by a `GET` or `HEAD` request.
    pub fn name(&self) -> Option<&str> {
        match self {
            Request::List => None,
            Request::Get { name } | Request::Head { name } => Some(name),
        }
    }

    /// Returns `true` if the response carries no payload.
    pub fn is_metadata_only(&self) -> bool {
        !matches!(self, Request::Get { .. })
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// One line of a `LIST` response.
///
/// `size` is kept exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Empty when the server used the two-field `<name>\t<size>` form.
    pub mime: String,
    pub size: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size: size.into(),
        }
    }

    /// Renders the entry the way listings are displayed to a user.
    ///
    /// ```rust
    /// use tinyfile_core::DirectoryEntry;
    ///
    /// let entry = DirectoryEntry::new("b.png", "image/png", "2048");
    /// assert_eq!(entry.label(), "b.png    [image/png] (2048 bytes)");
    /// ```
    pub fn label(&self) -> String {
        if self.mime.is_empty() {
            format!("{}    ({} bytes)", self.name, self.size)
        } else {
            format!("{}    [{}] ({} bytes)", self.name, self.mime, self.size)
        }
    }
}

/// Result of a `GET` or `HEAD` exchange.
///
/// `size` is the size declared by the server. For `HEAD`, `body` is empty.
/// For `GET`, `body` may be shorter than `size` if the connection closed early;
/// the caller decides whether to accept that (see [`FetchResult::ensure_complete`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchResult {
    pub body: Vec<u8>,
    pub mime: String,
    pub size: u64,
}

impl FetchResult {
    /// Returns `true` if the body holds every declared byte.
    pub fn is_complete(&self) -> bool {
        self.body.len() as u64 == self.size
    }

    /// Number of declared bytes that never arrived.
    pub fn missing_bytes(&self) -> u64 {
        self.size.saturating_sub(self.body.len() as u64)
    }

    /// Returns the result unchanged if complete, otherwise a [`TruncatedBody`] error.
    ///
    /// # Errors
    ///
    /// Returns [`TruncatedBody`] when fewer bytes were received than declared.
    pub fn ensure_complete(self) -> Result<Self, TruncatedBody> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(TruncatedBody {
                expected: self.size,
                received: self.body.len() as u64,
            })
        }
    }
}

/// A payload that ended before its declared `SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("truncated body: received {received} of {expected} declared bytes")]
pub struct TruncatedBody {
    pub expected: u64,
    pub received: u64,
}
