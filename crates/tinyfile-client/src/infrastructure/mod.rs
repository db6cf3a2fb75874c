//! Infrastructure layer for the client application.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tinyfile_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – the protocol client. Opens one TCP connection per
//!   request, frames the command, parses the response and closes the
//!   connection on every exit path. Also provides `RemoteFileSource`, the
//!   adapter that plugs the client into the application layer.
//!
//! - **`storage`** – TOML configuration file holding the default server
//!   endpoint, timeout and log level.

pub mod network;
pub mod storage;
