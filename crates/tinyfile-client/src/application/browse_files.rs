//! BrowseFilesUseCase: fetches the remote listing for display.

use std::sync::Arc;

use tinyfile_core::DirectoryEntry;
use tracing::info;

use super::source::{FileSource, TransferError};

/// A fetched listing together with its display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<DirectoryEntry>,
}

impl Listing {
    /// One label per entry, in server order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(DirectoryEntry::label).collect()
    }
}

/// The Browse Files use case.
pub struct BrowseFilesUseCase {
    source: Arc<dyn FileSource>,
}

impl BrowseFilesUseCase {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        Self { source }
    }

    /// Retrieves the current listing.
    ///
    /// # Errors
    ///
    /// Propagates any [`TransferError`] from the source.
    pub async fn browse(&self) -> Result<Listing, TransferError> {
        let entries = self.source.list().await?;
        info!(count = entries.len(), "listing loaded");
        Ok(Listing { entries })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
