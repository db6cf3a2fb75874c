//! The served directory.
//!
//! Only plain file names are accepted: no path separators and no `..`, so a
//! request can never leave the root directory.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tinyfile_core::DirectoryEntry;
use tokio::fs::{self, File};
use tracing::debug;

/// Why a request could not be served.
///
/// Each variant maps to the text of an `ERR <message>` reply.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("unknown command")]
    UnknownCommand,
    #[error("bad name")]
    BadName,
    #[error("open ({0})")]
    Open(#[source] io::Error),
    #[error("not file")]
    NotFile,
    #[error("list failed ({0})")]
    List(#[source] io::Error),
}

/// An opened regular file ready to be streamed.
#[derive(Debug)]
pub struct ServedFile {
    pub file: File,
    pub mime: String,
    pub size: u64,
}

/// The set of files under one root directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the regular files in the root, sorted by name.
    ///
    /// Names that are not UTF-8, fail [`validate_name`], or contain a tab or
    /// line break are left out since they could not be requested back.
    ///
    /// # Errors
    ///
    /// [`ServeError::List`] if the root directory cannot be read.
    pub async fn entries(&self) -> Result<Vec<DirectoryEntry>, ServeError> {
        let mut dir = fs::read_dir(&self.root).await.map_err(ServeError::List)?;
        let mut entries = Vec::new();

        while let Some(item) = dir.next_entry().await.map_err(ServeError::List)? {
            let Ok(name) = item.file_name().into_string() else {
                debug!(name = ?item.file_name(), "skipping non-UTF-8 name");
                continue;
            };
            if validate_name(&name).is_err() || name.contains(['\t', '\n', '\r']) {
                debug!(%name, "skipping unservable name");
                continue;
            }
            // Follows symlinks, the same way `open` does.
            match fs::metadata(item.path()).await {
                Ok(meta) if meta.is_file() => {
                    let mime = mime_for(&name);
                    entries.push(DirectoryEntry::new(name, mime, meta.len().to_string()));
                }
                Ok(_) => {}
                Err(e) => debug!(%name, "skipping entry: {e}"),
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Opens `name` for serving.
    ///
    /// # Errors
    ///
    /// [`ServeError::BadName`], [`ServeError::Open`] or [`ServeError::NotFile`].
    pub async fn open(&self, name: &str) -> Result<ServedFile, ServeError> {
        validate_name(name)?;
        let file = File::open(self.root.join(name)).await.map_err(ServeError::Open)?;
        let meta = file.metadata().await.map_err(ServeError::Open)?;
        if !meta.is_file() {
            return Err(ServeError::NotFile);
        }
        Ok(ServedFile {
            file,
            mime: mime_for(name),
            size: meta.len(),
        })
    }
}

/// Accepts only non-empty plain names without `/`, `\` or `..`.
pub fn validate_name(name: &str) -> Result<(), ServeError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(ServeError::BadName);
    }
    Ok(())
}

fn mime_for(name: &str) -> String {
    mime_guess::from_path(name).first_or_octet_stream().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn populated_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"HELLO").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        dir
    }

    #[test]
    fn test_validate_name_accepts_plain_names() {
        for name in ["a.txt", "report final.pdf", ".hidden", "x"] {
            assert!(validate_name(name).is_ok(), "{name} must be accepted");
        }
    }

    #[test]
    fn test_validate_name_rejects_traversal_and_separators() {
        for name in ["", "../secret", "dir/file", "dir\\file", "a..b"] {
            assert!(
                matches!(validate_name(name), Err(ServeError::BadName)),
                "{name:?} must be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_entries_lists_regular_files_sorted_with_mime() {
        // Arrange
        let dir = populated_root();
        let catalog = Catalog::new(dir.path());

        // Act
        let entries = catalog.entries().await.unwrap();

        // Assert
        assert_eq!(
            entries,
            vec![
                DirectoryEntry::new("a.txt", "text/plain", "5"),
                DirectoryEntry::new("b.png", "image/png", "4"),
            ]
        );
    }

    #[tokio::test]
    async fn test_entries_of_missing_root_is_list_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(dir.path().join("absent"));

        assert!(matches!(catalog.entries().await, Err(ServeError::List(_))));
    }

    #[tokio::test]
    async fn test_open_returns_file_with_size_and_mime() {
        // Arrange
        let dir = populated_root();
        let catalog = Catalog::new(dir.path());

        // Act
        let mut served = catalog.open("a.txt").await.unwrap();

        // Assert
        assert_eq!(served.size, 5);
        assert_eq!(served.mime, "text/plain");
        let mut content = Vec::new();
        served.file.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"HELLO");
    }

    #[tokio::test]
    async fn test_open_errors() {
        let dir = populated_root();
        let catalog = Catalog::new(dir.path());

        assert!(matches!(catalog.open("../a.txt").await, Err(ServeError::BadName)));
        assert!(matches!(catalog.open("missing.txt").await, Err(ServeError::Open(_))));
        assert!(matches!(catalog.open("subdir").await, Err(ServeError::NotFile)));
    }

    #[test]
    fn test_mime_for_unknown_extension_is_octet_stream() {
        assert_eq!(mime_for("blob.zzz-unknown"), "application/octet-stream");
    }
}
