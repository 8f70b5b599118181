//! Storage file load/save

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Result, StoreError};

/// Handle on the JSON storage file
#[derive(Debug, Clone)]
pub struct StorageFile {
    path: PathBuf,
}

impl StorageFile {
    /// Make sure the file and its directory exist
    ///
    /// Creates missing parent directories recursively and an empty file if
    /// none exists. Any failure here is fatal for construction.
    pub fn bootstrap(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Construction(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // create_new leaves an existing file untouched
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => tracing::debug!(path = %path.display(), "created empty storage file"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(StoreError::Construction(format!(
                    "cannot create storage file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        Ok(Self { path })
    }

    /// Wrap a path without touching the filesystem
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file into a Document
    ///
    /// Never fails: a missing, unreadable, empty or malformed file yields an
    /// empty document.
    pub fn load(&self) -> Document {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file unreadable, using empty document");
                return Document::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Document::new();
        }

        match serde_json::from_slice::<Document>(&bytes) {
            Ok(document) => {
                tracing::debug!(path = %self.path.display(), entries = document.len(), "loaded storage file");
                document
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file malformed, using empty document");
                Document::new()
            }
        }
    }

    /// Serialize the whole document and overwrite the file
    pub fn save(&self, document: &Document) -> Result<()> {
        let data =
            serde_json::to_vec(document).map_err(|e| StoreError::Encoding(e.to_string()))?;

        fs::write(&self.path, data).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), entries = document.len(), "saved storage file");
        Ok(())
    }
}
