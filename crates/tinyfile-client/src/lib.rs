//! tinyfile-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the client do?
//!
//! Every operation is one short TCP exchange with a Tiny File server:
//!
//! 1. Connect to `host:port` (bounded by a timeout).
//! 2. Write one command line: `LIST`, `GET <name>` or `HEAD <name>`.
//! 3. Read the header block and, for `GET`, exactly `SIZE` payload bytes.
//! 4. Drop the connection and hand a typed result to the caller.
//!
//! The `infrastructure::network` module implements that exchange. The
//! `application` module holds the caller-side rules built on top of it, most
//! importantly that a body shorter than its declared size is a failure.

/// Application layer: use cases for browsing and fetching files.
pub mod application;

/// Infrastructure layer: TCP protocol client and configuration storage.
pub mod infrastructure;
