//! Writing the composed document to disk
//!
//! The document is serialised into a temporary file next to the destination
//! and renamed over it only after serialisation succeeded, so a failed write
//! never leaves a truncated PDF behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use super::compose::NotesDocument;

impl NotesDocument {
    /// Compress and write the document to `path`, replacing any existing file
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;

        self.doc.compress();
        self.doc.save_to(&mut temp).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;

        temp.persist(path).map_err(|e| write_err(e.error))?;

        info!("Wrote {} pages to {}", self.page_count(), path.display());
        Ok(())
    }
}
