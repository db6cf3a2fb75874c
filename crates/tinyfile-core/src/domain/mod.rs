//! Domain helpers for presenting fetched files.
//!
//! Nothing in here touches the network or the file system. The presentation
//! layer (CLI today, possibly a GUI later) asks these helpers what kind of
//! content it holds and renders accordingly.

/// Text / image / binary classification of fetched bytes.
pub mod preview;
