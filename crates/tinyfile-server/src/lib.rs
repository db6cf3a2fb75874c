//! tinyfile-server library entry point.
//!
//! A small server for the Tiny File line protocol. It answers `LIST`, `GET`
//! and `HEAD` for the regular files directly inside one root directory and
//! closes the connection after every response.
//!
//! - **`catalog`** – the file system side: which names exist, their MIME
//!   type and size, and which names are acceptable at all.
//! - **`server`** – the accept loop and the per-connection request handler.

pub mod catalog;
pub mod server;

pub use catalog::{Catalog, ServeError, ServedFile};
pub use server::{handle_connection, run_server};
