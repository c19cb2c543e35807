//! Zip container access for quiz packages.
//!
//! The archive is read fully into memory when opened: every entry's bytes
//! are decompressed once and kept behind `Arc` handles so later media
//! resolution is a map lookup, not a re-read. The archive is owned for the
//! duration of one parse call and dropped with it.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use log::{debug, warn};

use crate::pack::error::{PackageError, Result};

/// Canonical name of the root document, matched case-insensitively.
const ROOT_DOCUMENT: &str = "content.xml";

/// One entry from the package archive.
pub(crate) struct ArchiveEntry {
    pub data: Arc<Vec<u8>>,
    pub is_dir: bool,
}

/// An opened package archive: canonical entry path to raw bytes, with a
/// directory flag per entry.
pub(crate) struct PackageArchive {
    entries: HashMap<String, ArchiveEntry>,
    /// Canonical paths in archive order, for deterministic iteration.
    order: Vec<String>,
    root_document: String,
}

impl PackageArchive {
    /// Opens the byte buffer as a zip container and reads every entry.
    ///
    /// # Errors
    /// Fails only when the buffer is not a readable zip archive or the
    /// root `content.xml` entry is missing. Individual entries that cannot
    /// be decompressed are skipped with a warning.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| PackageError::InvalidArchive(e.to_string()))?;

        let mut entries = HashMap::new();
        let mut order = Vec::new();

        for i in 0..zip.len() {
            let mut file = match zip.by_index(i) {
                Ok(f) => f,
                Err(e) => {
                    warn!("Skipping unreadable archive entry #{}: {}", i, e);
                    continue;
                }
            };

            // Some authoring tools write backslash separators.
            let path = file.name().replace('\\', "/");
            if entries.contains_key(&path) {
                continue;
            }

            let is_dir = file.is_dir();
            let mut data = Vec::new();
            if !is_dir {
                if let Err(e) = file.read_to_end(&mut data) {
                    warn!("Skipping archive entry {:?}: {}", path, e);
                    continue;
                }
            }

            entries.insert(
                path.clone(),
                ArchiveEntry {
                    data: Arc::new(data),
                    is_dir,
                },
            );
            order.push(path);
        }

        let root_document = order
            .iter()
            .find(|p| p.eq_ignore_ascii_case(ROOT_DOCUMENT))
            .cloned()
            .ok_or(PackageError::MissingRootDocument)?;

        debug!(
            "Package archive opened: {} entries, root document {:?}",
            order.len(),
            root_document
        );

        Ok(Self {
            entries,
            order,
            root_document,
        })
    }

    /// Raw bytes of the root `content.xml` document.
    pub fn root_document(&self) -> &[u8] {
        &self.entries[&self.root_document].data
    }

    /// Looks up an entry by its canonical path.
    pub fn read_entry(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.get(path)
    }

    /// Canonical paths of all non-directory entries, in archive order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|p| !self.entries[p.as_str()].is_dir)
            .map(String::as_str)
    }
}
