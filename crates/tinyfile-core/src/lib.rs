//! # tinyfile-core
//!
//! Shared library for Tiny File containing the line-oriented wire codec and
//! the small amount of domain logic the client needs to present fetched files.
//!
//! This crate is used by both the client and the server. It has zero
//! dependencies on sockets, runtimes, or the file system: every function works
//! on byte slices that the network layer has already read.
//!
//! # The protocol in one screen
//!
//! A client opens a TCP connection, writes exactly one command line and reads
//! one response. The connection is then closed.
//!
//! ```text
//! client                         server
//! ───────────────────────────────────────────────────────────
//! LIST\n                   ──>
//!                          <──   FILES 2\n
//!                                a.txt\t120\n
//!                                b.png\timage/png\t2048\n
//!                                \n
//!
//! GET a.txt\n              ──>
//!                          <──   TYPE text/plain\n
//!                                SIZE 120\n
//!                                \n
//!                                <120 raw bytes>
//! ```
//!
//! `HEAD <name>\n` receives the same header block as `GET` but no payload.
//!
//! - **`protocol`** – request framing, response header parsing, listing
//!   parsing, and the server-side encoders.
//! - **`domain`** – presentation-independent helpers, currently the preview
//!   classifier that decides whether fetched bytes are text, an image, or
//!   opaque binary data.

pub mod domain;
pub mod protocol;

pub use domain::preview::{sniff_mime, Preview};
pub use protocol::codec::{
    check_list_header, decode_request, encode_error, encode_fetch_header, encode_listing,
    parse_entry_line, parse_listing, HeaderLine, ProtocolError, ResponseHeaders,
};
pub use protocol::messages::{DirectoryEntry, FetchResult, Request, TruncatedBody};
