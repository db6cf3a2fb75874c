//! Line codec for the Tiny File protocol.
//!
//! Client side:
//! - [`check_list_header`] validates the `FILES <n>` line of a `LIST` response.
//! - [`parse_listing`] turns the entry block into [`DirectoryEntry`] values.
//! - [`ResponseHeaders`] accumulates the `TYPE`/`SIZE` header block of a
//!   `GET`/`HEAD` response, one line at a time.
//!
//! Server side:
//! - [`decode_request`] parses a command line.
//! - [`encode_listing`], [`encode_fetch_header`] and [`encode_error`] build replies.
//!
//! Text is always decoded lossily: invalid UTF-8 becomes U+FFFD and is never
//! an error.

use thiserror::Error;
use tracing::trace;

use crate::protocol::messages::{
    DirectoryEntry, Request, ERROR_PREFIX, LIST_HEADER_PREFIX, LIST_TERMINATOR,
    SIZE_HEADER_PREFIX, TYPE_HEADER_PREFIX,
};

/// Errors raised while interpreting protocol bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The first line of a `LIST` response did not start with `FILES `.
    #[error("bad LIST header: {0:?}")]
    BadListHeader(String),

    /// A `SIZE` header had no value or a value that is not an unsigned integer.
    #[error("bad SIZE header: {0:?}")]
    BadSize(String),

    /// The header block ended without a `SIZE` header.
    #[error("missing SIZE header")]
    MissingSize,

    /// A command line that is not `LIST`, `GET <name>` or `HEAD <name>`.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
}

// ── LIST responses ────────────────────────────────────────────────────────────

/// Validates the first line of a `LIST` response.
///
/// Only the `FILES ` prefix is checked; the announced count is informational.
///
/// # Errors
///
/// Returns [`ProtocolError::BadListHeader`] carrying the received line.
pub fn check_list_header(line: &[u8]) -> Result<(), ProtocolError> {
    if line.starts_with(LIST_HEADER_PREFIX) {
        Ok(())
    } else {
        Err(ProtocolError::BadListHeader(
            String::from_utf8_lossy(line).into_owned(),
        ))
    }
}

/// Removes the trailing `\n\n` terminator from an accumulated entry block.
///
/// Returns `false` (leaving the block untouched) when the block was cut off
/// before the terminator arrived.
pub fn strip_list_terminator(block: &mut Vec<u8>) -> bool {
    if block.ends_with(LIST_TERMINATOR) {
        block.truncate(block.len() - LIST_TERMINATOR.len());
        true
    } else {
        false
    }
}

/// Parses the entry block of a `LIST` response (terminator already removed).
///
/// Entries keep the order in which the server sent them. Blank lines and
/// lines without a tab are skipped.
///
/// # Examples
///
/// ```rust
/// use tinyfile_core::{parse_listing, DirectoryEntry};
///
/// let entries = parse_listing(b"a.txt\t120\nb.png\timage/png\t2048");
/// assert_eq!(
///     entries,
///     vec![
///         DirectoryEntry::new("a.txt", "", "120"),
///         DirectoryEntry::new("b.png", "image/png", "2048"),
///     ]
/// );
/// ```
pub fn parse_listing(block: &[u8]) -> Vec<DirectoryEntry> {
    String::from_utf8_lossy(block)
        .lines()
        .filter_map(parse_entry_line)
        .collect()
}

/// Parses one listing line.
///
/// - `<name>\t<size>` → entry with an empty MIME type.
/// - `<name>\t<mime>\t…\t<size>` → first field is the name, second the MIME
///   type, last the size. Fields in between have no defined meaning and are
///   dropped.
/// - Anything else (blank, or no tab at all) → `None`.
pub fn parse_entry_line(line: &str) -> Option<DirectoryEntry> {
    if line.trim().is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [name, size] => Some(DirectoryEntry::new(*name, "", *size)),
        [name, mime, .., size] => Some(DirectoryEntry::new(*name, *mime, *size)),
        _ => {
            trace!("skipping listing line without tab: {line:?}");
            None
        }
    }
}

// ── GET / HEAD responses ──────────────────────────────────────────────────────

/// Outcome of feeding one line into [`ResponseHeaders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// More header lines follow.
    Continue,
    /// The blank line (or end of stream) closing the header block was seen.
    End,
}

/// Accumulates the header block of a `GET`/`HEAD` response.
///
/// `TYPE` is optional and `SIZE` is mandatory. Unknown header lines are
/// accepted and ignored so that servers can add headers without breaking
/// older clients. If a header repeats, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub mime: String,
    pub size: Option<u64>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line as returned by the line reader (terminator included).
    ///
    /// An empty slice stands for end of stream and closes the block, as does
    /// a line that is exactly `\n` or `\r\n`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BadSize`] if a `SIZE` header cannot be parsed.
    pub fn feed(&mut self, line: &[u8]) -> Result<HeaderLine, ProtocolError> {
        if is_header_terminator(line) {
            return Ok(HeaderLine::End);
        }

        if let Some(value) = line.strip_prefix(TYPE_HEADER_PREFIX) {
            self.mime = String::from_utf8_lossy(value).trim().to_string();
        } else if line.starts_with(SIZE_HEADER_PREFIX) {
            self.size = Some(parse_size_header(line)?);
        } else {
            trace!(
                "ignoring unknown header line {:?}",
                String::from_utf8_lossy(line)
            );
        }
        Ok(HeaderLine::Continue)
    }

    /// Finishes the block, returning `(mime, size)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingSize`] if no `SIZE` header was seen.
    pub fn finish(self) -> Result<(String, u64), ProtocolError> {
        let size = self.size.ok_or(ProtocolError::MissingSize)?;
        Ok((self.mime, size))
    }
}

fn is_header_terminator(line: &[u8]) -> bool {
    matches!(line, b"" | b"\n" | b"\r\n")
}

/// Parses `SIZE <n>`, taking the second whitespace-separated token.
fn parse_size_header(line: &[u8]) -> Result<u64, ProtocolError> {
    let text = String::from_utf8_lossy(line);
    text.split_whitespace()
        .nth(1)
        .and_then(|value| value.parse::<u64>().ok())
        .ok_or_else(|| ProtocolError::BadSize(text.into_owned()))
}

// ── Server side ───────────────────────────────────────────────────────────────

/// Parses a command line received by a server.
///
/// The line is cut at the first `\r` or `\n`. The name after `GET `/`HEAD ` is
/// returned as-is; validating it is up to the server.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownCommand`] for anything other than the
/// three supported commands.
pub fn decode_request(line: &[u8]) -> Result<Request, ProtocolError> {
    let end = line
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(line.len());
    let command = String::from_utf8_lossy(&line[..end]);

    if command == "LIST" {
        Ok(Request::List)
    } else if let Some(name) = command.strip_prefix("GET ") {
        Ok(Request::Get { name: name.to_string() })
    } else if let Some(name) = command.strip_prefix("HEAD ") {
        Ok(Request::Head { name: name.to_string() })
    } else {
        Err(ProtocolError::UnknownCommand(command.into_owned()))
    }
}

/// Encodes a complete `LIST` response, terminator included.
///
/// Entries with an empty MIME type use the two-field form.
pub fn encode_listing(entries: &[DirectoryEntry]) -> Vec<u8> {
    let mut buf = format!("FILES {}\n", entries.len()).into_bytes();
    for entry in entries {
        let line = if entry.mime.is_empty() {
            format!("{}\t{}\n", entry.name, entry.size)
        } else {
            format!("{}\t{}\t{}\n", entry.name, entry.mime, entry.size)
        };
        buf.extend_from_slice(line.as_bytes());
    }
    buf.push(b'\n');
    buf
}

/// Encodes the header block of a `GET`/`HEAD` response, blank line included.
///
/// `TYPE` is omitted when `mime` is empty.
pub fn encode_fetch_header(mime: &str, size: u64) -> Vec<u8> {
    let mut header = String::new();
    if !mime.is_empty() {
        header.push_str(&format!("TYPE {mime}\n"));
    }
    header.push_str(&format!("SIZE {size}\n\n"));
    header.into_bytes()
}

/// Encodes an `ERR <message>\n` reply.
pub fn encode_error(message: &str) -> Vec<u8> {
    format!("{ERROR_PREFIX}{message}\n").into_bytes()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(lines: &[&[u8]]) -> Result<(String, u64), ProtocolError> {
        let mut headers = ResponseHeaders::new();
        for line in lines {
            if headers.feed(line)? == HeaderLine::End {
                break;
            }
        }
        headers.finish()
    }

    // ── LIST header ───────────────────────────────────────────────────────────

    #[test]
    fn test_check_list_header_accepts_files_prefix() {
        assert!(check_list_header(b"FILES 3\n").is_ok());
        assert!(check_list_header(b"FILES whatever\n").is_ok());
    }

    #[test]
    fn test_check_list_header_rejects_missing_s() {
        // Arrange / Act
        let err = check_list_header(b"FILE 1\n").unwrap_err();

        // Assert
        assert_eq!(err, ProtocolError::BadListHeader("FILE 1\n".to_string()));
        assert_eq!(err.to_string(), r#"bad LIST header: "FILE 1\n""#);
    }

    #[test]
    fn test_check_list_header_rejects_empty_line() {
        assert!(matches!(
            check_list_header(b""),
            Err(ProtocolError::BadListHeader(_))
        ));
    }

    #[test]
    fn test_strip_list_terminator_only_strips_complete_terminator() {
        let mut complete = b"a\t1\n\n".to_vec();
        assert!(strip_list_terminator(&mut complete));
        assert_eq!(complete, b"a\t1".to_vec());

        let mut partial = b"a\t1\n".to_vec();
        assert!(!strip_list_terminator(&mut partial));
        assert_eq!(partial, b"a\t1\n".to_vec());
    }

    // ── Listing lines ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_entry_line_two_fields_has_empty_mime() {
        assert_eq!(
            parse_entry_line("a.txt\t120"),
            Some(DirectoryEntry::new("a.txt", "", "120"))
        );
    }

    #[test]
    fn test_parse_entry_line_three_fields_has_mime() {
        assert_eq!(
            parse_entry_line("b.png\timage/png\t2048"),
            Some(DirectoryEntry::new("b.png", "image/png", "2048"))
        );
    }

    #[test]
    fn test_parse_entry_line_extra_fields_use_first_second_and_last() {
        assert_eq!(
            parse_entry_line("c.bin\tapplication/octet-stream\tx\ty\t9"),
            Some(DirectoryEntry::new("c.bin", "application/octet-stream", "9"))
        );
    }

    #[test]
    fn test_parse_entry_line_skips_lines_without_tab() {
        assert_eq!(parse_entry_line("README"), None);
        assert_eq!(parse_entry_line("   "), None);
        assert_eq!(parse_entry_line(""), None);
    }

    #[test]
    fn test_parse_entry_line_keeps_empty_fields() {
        assert_eq!(
            parse_entry_line("a\t"),
            Some(DirectoryEntry::new("a", "", ""))
        );
    }

    #[test]
    fn test_parse_listing_preserves_order_and_skips_blank_lines() {
        // Arrange
        let block = b"z.txt\t1\n\n  \na.txt\ttext/plain\t2\nnotab\nm.txt\t3";

        // Act
        let entries = parse_listing(block);

        // Assert
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt", "m.txt"]);
    }

    #[test]
    fn test_parse_listing_drops_carriage_returns() {
        let entries = parse_listing(b"a.txt\t5\r\nb.txt\t6\r");
        assert_eq!(entries[0], DirectoryEntry::new("a.txt", "", "5"));
        assert_eq!(entries[1].name, "b.txt");
    }

    #[test]
    fn test_parse_listing_replaces_invalid_utf8() {
        let entries = parse_listing(b"caf\xE9.txt\t4");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "caf\u{FFFD}.txt");
    }

    // ── Fetch headers ─────────────────────────────────────────────────────────

    #[test]
    fn test_response_headers_type_and_size() {
        let result = feed_all(&[b"TYPE text/plain\n", b"SIZE 5\n", b"\n"]);
        assert_eq!(result, Ok(("text/plain".to_string(), 5)));
    }

    #[test]
    fn test_response_headers_type_is_trimmed() {
        let result = feed_all(&[b"TYPE   image/png \r\n", b"SIZE 1\n", b"\r\n"]);
        assert_eq!(result, Ok(("image/png".to_string(), 1)));
    }

    #[test]
    fn test_response_headers_type_is_optional() {
        assert_eq!(feed_all(&[b"SIZE 42\n", b"\n"]), Ok((String::new(), 42)));
    }

    #[test]
    fn test_response_headers_missing_size_fails_with_or_without_type() {
        assert_eq!(
            feed_all(&[b"TYPE text/plain\n", b"\n"]),
            Err(ProtocolError::MissingSize)
        );
        assert_eq!(feed_all(&[b"\n"]), Err(ProtocolError::MissingSize));
    }

    #[test]
    fn test_response_headers_eof_ends_block() {
        // An empty line from the reader means the stream ended.
        let mut headers = ResponseHeaders::new();
        assert_eq!(headers.feed(b"SIZE 3\n"), Ok(HeaderLine::Continue));
        assert_eq!(headers.feed(b""), Ok(HeaderLine::End));
        assert_eq!(headers.finish(), Ok((String::new(), 3)));
    }

    #[test]
    fn test_response_headers_bad_size_values_are_rejected() {
        for line in [&b"SIZE abc\n"[..], b"SIZE \n", b"SIZE -4\n", b"SIZE 1.5\n"] {
            let mut headers = ResponseHeaders::new();
            assert!(
                matches!(headers.feed(line), Err(ProtocolError::BadSize(_))),
                "expected BadSize for {line:?}"
            );
        }
    }

    #[test]
    fn test_response_headers_ignore_unknown_lines() {
        let result = feed_all(&[
            b"X-CHECKSUM abc\n",
            b"SIZE 10\n",
            b"ERR later\n",
            b"\n",
        ]);
        assert_eq!(result, Ok((String::new(), 10)));
    }

    #[test]
    fn test_response_headers_last_size_wins() {
        assert_eq!(
            feed_all(&[b"SIZE 1\n", b"SIZE 2\n", b"\n"]),
            Ok((String::new(), 2))
        );
    }

    // ── Server side ───────────────────────────────────────────────────────────

    #[test]
    fn test_decode_request_recognises_commands() {
        assert_eq!(decode_request(b"LIST\n"), Ok(Request::List));
        assert_eq!(
            decode_request(b"GET a.txt\r\n"),
            Ok(Request::Get { name: "a.txt".to_string() })
        );
        assert_eq!(
            decode_request(b"HEAD a b.txt\n"),
            Ok(Request::Head { name: "a b.txt".to_string() })
        );
    }

    #[test]
    fn test_decode_request_rejects_unknown_command() {
        assert_eq!(
            decode_request(b"PUT x\n"),
            Err(ProtocolError::UnknownCommand("PUT x".to_string()))
        );
        assert!(decode_request(b"GET\n").is_err());
    }

    #[test]
    fn test_encode_listing_uses_two_and_three_field_forms() {
        let bytes = encode_listing(&[
            DirectoryEntry::new("a.txt", "", "120"),
            DirectoryEntry::new("b.png", "image/png", "2048"),
        ]);
        assert_eq!(
            bytes,
            b"FILES 2\na.txt\t120\nb.png\timage/png\t2048\n\n".to_vec()
        );
    }

    #[test]
    fn test_encode_fetch_header_omits_empty_type() {
        assert_eq!(
            encode_fetch_header("text/plain", 5),
            b"TYPE text/plain\nSIZE 5\n\n".to_vec()
        );
        assert_eq!(encode_fetch_header("", 0), b"SIZE 0\n\n".to_vec());
    }

    #[test]
    fn test_encode_error_formats_err_line() {
        assert_eq!(encode_error("bad name"), b"ERR bad name\n".to_vec());
    }
}
