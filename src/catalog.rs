//! Navigation over the reference documents in the data directory.

use crate::{constants::INKML_EXTENSION, Error, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Sorted list of reference documents with a cursor
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    files: Vec<PathBuf>,
    index: usize,
}

impl SourceCatalog {
    /// List the `.inkml` files in `dir`, creating the directory if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or holds no documents
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            info!("Creating data directory: {}", dir.display());
            std::fs::create_dir_all(dir)?;
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_inkml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(INKML_EXTENSION));
            if is_inkml && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        info!("Found {} reference documents in {}", files.len(), dir.display());
        Self::from_files(files)
    }

    /// Catalog over an explicit list of files
    ///
    /// # Errors
    ///
    /// Returns an error if `files` is empty
    pub fn from_files(files: Vec<PathBuf>) -> Result<Self> {
        if files.is_empty() {
            return Err(Error::InvalidInput("no .inkml files found".to_string()));
        }
        Ok(Self { files, index: 0 })
    }

    /// Document under the cursor
    #[must_use]
    pub fn current(&self) -> &Path {
        &self.files[self.index]
    }

    /// Cursor position
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false; a catalog holds at least one document
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Move to the next document; false at the last one
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.files.len() {
            self.index += 1;
            true
        } else {
            warn!("At the last file, no next file available");
            false
        }
    }

    /// Move to the previous document; false at the first one
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            warn!("At the first file, no previous file available");
            false
        }
    }

    /// Move the cursor to `path`, matching on file name
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog entry has that file name
    pub fn select<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let wanted = path.as_ref().file_name();
        let index = self
            .files
            .iter()
            .position(|f| f.file_name() == wanted)
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} is not in the catalog", path.as_ref().display()))
            })?;
        self.index = index;
        Ok(())
    }
}
