//! # Link Store
//!
//! Persists the link table as a single JSON document so links survive
//! runtime restarts.
//!
//! ## Layout
//!
//! ```text
//! <store dir>/
//! └── links.json
//! ```
//!
//! ```json
//! {
//!   "version": 1,
//!   "links": {
//!     "4a2f6c1e9b0d:DB": { "to_id": "...", "from_id": "...", ... }
//!   }
//! }
//! ```
//!
//! Entries are kept in insertion order, which is the order
//! [`LinkRepository::links_for_consumer`](crate::LinkRepository::links_for_consumer)
//! reports after a reload.
//!
//! ## Atomic Writes
//!
//! The document is written to a uniquely named temp file and renamed over
//! `links.json`, so a crash mid-write leaves the previous table intact.
//!
//! ## Corruption
//!
//! There is no repair path. An unreadable document, an unknown schema
//! version, a record that violates a link invariant (empty or
//! non-normalized alias, empty bridge address, empty IDs), or an entry
//! whose key does not match its link's ID fails the open with
//! [`Error::StoreUnavailable`].

use crate::constants::{LINK_STORE_FILE, LINK_STORE_VERSION};
use crate::error::{Error, Result};
use crate::link::Link;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Link table keyed by link ID, in insertion order.
pub type LinkTable = IndexMap<String, Link>;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    links: &'a LinkTable,
}

#[derive(Deserialize)]
struct Document {
    version: u32,
    links: LinkTable,
}

/// File-backed link table.
#[derive(Debug, Clone)]
pub struct LinkStore {
    dir: PathBuf,
}

impl LinkStore {
    /// Opens (creating if needed) the store directory and loads its table.
    ///
    /// A missing `links.json` is an empty table.
    pub fn open(dir: impl Into<PathBuf>) -> Result<(Self, LinkTable)> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::StoreUnavailable {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let store = Self { dir };
        let table = store.load()?;

        info!(
            "Link store opened at {} ({} links)",
            store.dir.display(),
            table.len()
        );
        Ok((store, table))
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the table document.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(LINK_STORE_FILE)
    }

    fn unavailable(&self, reason: impl Into<String>) -> Error {
        Error::StoreUnavailable {
            path: self.file_path(),
            reason: reason.into(),
        }
    }

    fn load(&self) -> Result<LinkTable> {
        let path = self.file_path();
        if !path.exists() {
            debug!("No link table at {}, starting empty", path.display());
            return Ok(LinkTable::new());
        }

        let data = fs::read(&path).map_err(|e| self.unavailable(e.to_string()))?;
        let doc: Document = serde_json::from_slice(&data)
            .map_err(|e| self.unavailable(format!("corrupt link table: {e}")))?;

        if doc.version != LINK_STORE_VERSION {
            return Err(self.unavailable(format!(
                "unsupported link table version {} (expected {})",
                doc.version, LINK_STORE_VERSION
            )));
        }

        for (key, link) in &doc.links {
            let id = link.id();
            if *key != id {
                return Err(self.unavailable(format!(
                    "corrupt link table: entry '{key}' holds link '{id}'"
                )));
            }
        }

        Ok(doc.links)
    }

    /// Writes the whole table atomically.
    pub fn save(&self, links: &LinkTable) -> Result<()> {
        let doc = DocumentRef {
            version: LINK_STORE_VERSION,
            links,
        };
        let data = serde_json::to_vec_pretty(&doc).map_err(|e| self.unavailable(e.to_string()))?;

        let path = self.file_path();
        let temp_path = path.with_extension(format!("json.tmp.{}", uuid::Uuid::now_v7()));
        fs::write(&temp_path, &data).map_err(|e| self.unavailable(e.to_string()))?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.unavailable(e.to_string())
        })?;

        debug!("Saved {} links to {}", links.len(), path.display());
        Ok(())
    }
}
