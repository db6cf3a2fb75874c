//! Application layer use cases for the client application.
//!
//! # What use cases does the client have?
//!
//! - **`browse_files`** – Fetches the remote listing and renders one display
//!   label per entry.
//!
//! - **`fetch_file`** – Everything that works on a single named file:
//!   inspecting its metadata (`HEAD`), previewing its content, and
//!   downloading it to disk. This is where a body shorter than its declared
//!   size becomes an error; the protocol client only reports it.
//!
//! Both use cases talk to the server through the [`FileSource`] trait. The
//! production implementation lives in `infrastructure::network`; tests inject
//! a `mockall` mock.

pub mod browse_files;
pub mod fetch_file;
pub mod source;

pub use browse_files::{BrowseFilesUseCase, Listing};
pub use fetch_file::{FetchFileUseCase, FileInfo};
pub use source::{FileSource, TransferError};
