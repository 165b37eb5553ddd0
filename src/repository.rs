//! # Link Repository
//!
//! Owns every [`Link`] in the runtime. Links are created only through
//! [`LinkRepository::new_link`], which validates the endpoints and inserts
//! the link under the repository's write lock.
//!
//! ## Concurrency
//!
//! The table sits behind a `RwLock`:
//! - `get`, `links_for_consumer`, `links_for_provider` take the read lock
//!   and return owned clones.
//! - `new_link`, `remove`, `refresh_provider` hold the write lock for the
//!   whole check, mutate, and persist sequence. The duplicate-ID check and
//!   the insert are one critical section.
//!
//! ## Persistence
//!
//! With a backing store, every write is persisted before the lock is
//! released. If the write fails the in-memory change is rolled back and
//! the caller gets [`Error::StoreUnavailable`]; memory and disk never
//! disagree. Failures are never retried here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use magiklink::{ContainerRef, LinkRepository};
//!
//! let repo = LinkRepository::new("")?; // ephemeral
//! let link = repo.new_link(&web, &redis, "172.17.0.1", "db")?;
//! let env = link.to_env(); // DB_PORT=tcp://172.17.0.5:6379, ...
//! ```

use crate::constants::{LINK_STORE_DIR, MAX_LINKS};
use crate::container::ContainerRef;
use crate::error::{Error, Result};
use crate::id::truncate_id;
use crate::link::Link;
use crate::store::{LinkStore, LinkTable};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

// =============================================================================
// Refresh Report
// =============================================================================

/// Outcome of [`LinkRepository::refresh_provider`].
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// IDs of links that were refreshed and are now active.
    pub refreshed: Vec<String>,
    /// Links that could not be refreshed, with the reason.
    pub failures: Vec<(String, Error)>,
}

impl RefreshReport {
    /// Returns true if every matching link was refreshed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of links that matched the provider.
    #[must_use]
    pub fn total(&self) -> usize {
        self.refreshed.len() + self.failures.len()
    }
}

// =============================================================================
// Link Repository
// =============================================================================

/// Concurrent, optionally persistent table of links.
///
/// ## Thread Safety
///
/// `LinkRepository` is `Send + Sync`; share it with `Arc`.
///
/// ## Resource Cleanup
///
/// Dropping the repository discards the in-memory table. A persisted table
/// stays on disk and is reloaded by the next [`LinkRepository::open`].
#[derive(Debug)]
pub struct LinkRepository {
    links: RwLock<LinkTable>,
    store: Option<LinkStore>,
}

impl LinkRepository {
    /// Creates a repository backed by `storage_path`.
    ///
    /// An empty path selects an ephemeral, process-local table.
    pub fn new(storage_path: &str) -> Result<Self> {
        if storage_path.is_empty() {
            Ok(Self::ephemeral())
        } else {
            Self::open(storage_path)
        }
    }

    /// Creates an empty repository that is never persisted.
    #[must_use]
    pub fn ephemeral() -> Self {
        debug!("Ephemeral link repository created");
        Self {
            links: RwLock::new(LinkTable::new()),
            store: None,
        }
    }

    /// Opens (or creates) a repository persisted in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let (store, table) = LinkStore::open(dir.as_ref())?;
        Ok(Self {
            links: RwLock::new(table),
            store: Some(store),
        })
    }

    /// Opens the repository at the default location, `~/.magiklink/links`.
    pub fn with_default_path() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Returns the default store directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(".magiklink").join(LINK_STORE_DIR)
        } else {
            PathBuf::from(".magiklink").join(LINK_STORE_DIR)
        }
    }

    /// Returns the store directory, or `None` for an ephemeral repository.
    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.store.as_ref().map(LinkStore::dir)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LinkTable>> {
        self.links
            .read()
            .map_err(|e| Error::Internal(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LinkTable>> {
        self.links
            .write()
            .map_err(|e| Error::Internal(format!("lock poisoned: {e}")))
    }

    fn persist(&self, links: &LinkTable) -> Result<()> {
        match &self.store {
            Some(store) => store.save(links),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validates and stores a new link from `consumer` to `provider`.
    ///
    /// Fails with `ProviderNotRunning`, `MissingBridgeAddress`, or
    /// `MissingAlias` from validation, `DuplicateLink` if the consumer
    /// already has a link under this alias, `LimitExceeded` at
    /// `MAX_LINKS`, or `StoreUnavailable` if persisting fails. On any
    /// failure the table is unchanged.
    pub fn new_link(
        &self,
        consumer: &ContainerRef,
        provider: &ContainerRef,
        bridge_address: &str,
        alias: &str,
    ) -> Result<Link> {
        let link = Link::build(consumer, provider, bridge_address, alias)?;
        let id = link.id();

        // Check-and-insert under one write lock
        let mut links = self.write()?;
        if links.contains_key(&id) {
            return Err(Error::DuplicateLink(id));
        }
        if links.len() >= MAX_LINKS {
            return Err(Error::LimitExceeded { limit: MAX_LINKS });
        }

        links.insert(id.clone(), link.clone());
        if let Err(e) = self.persist(&links) {
            links.shift_remove(&id);
            return Err(e);
        }

        info!(
            "Created link {} ({} -> {} at {})",
            id,
            link.from_id(),
            link.to_id(),
            link.to_ip()
        );
        Ok(link)
    }

    /// Removes a link and returns it.
    ///
    /// Not idempotent: removing an absent ID fails with `NotFound`.
    pub fn remove(&self, id: &str) -> Result<Link> {
        let mut links = self.write()?;
        let Some(index) = links.get_index_of(id) else {
            return Err(Error::NotFound(id.to_string()));
        };

        let Some((key, link)) = links.shift_remove_index(index) else {
            return Err(Error::NotFound(id.to_string()));
        };
        if let Err(e) = self.persist(&links) {
            links.shift_insert(index, key, link);
            return Err(e);
        }

        info!("Removed link {}", id);
        Ok(link)
    }

    /// Re-snapshots every link whose provider is `provider_id`.
    ///
    /// `provider_id` may be full or truncated. Each link is refreshed from
    /// `fresh` independently; failures are collected in the report and do
    /// not stop the others. A stopped `fresh` marks the links stale.
    pub fn refresh_provider(&self, provider_id: &str, fresh: &ContainerRef) -> Result<RefreshReport> {
        let short_id = truncate_id(provider_id);
        let mut links = self.write()?;
        let previous = links.clone();

        let mut report = RefreshReport::default();
        for (id, link) in links.iter_mut().filter(|(_, l)| l.to_id() == short_id) {
            match link.refresh(fresh) {
                Ok(()) => report.refreshed.push(id.clone()),
                Err(e) => {
                    warn!("Failed to refresh link {}: {}", id, e);
                    report.failures.push((id.clone(), e));
                }
            }
        }

        if report.total() == 0 {
            debug!("No links for provider {}", short_id);
            return Ok(report);
        }

        if let Err(e) = self.persist(&links) {
            *links = previous;
            return Err(e);
        }

        info!(
            "Refreshed provider {}: {} ok, {} failed",
            short_id,
            report.refreshed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Looks up a link by composite ID.
    pub fn get(&self, id: &str) -> Result<Option<Link>> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Returns true if a link with this ID exists.
    pub fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(id))
    }

    /// Returns all links held by a consumer, in insertion order.
    ///
    /// `consumer_id` may be full or truncated.
    pub fn links_for_consumer(&self, consumer_id: &str) -> Result<Vec<Link>> {
        let short_id = truncate_id(consumer_id);
        Ok(self
            .read()?
            .values()
            .filter(|l| l.from_id() == short_id)
            .cloned()
            .collect())
    }

    /// Returns all links pointing at a provider, in insertion order.
    ///
    /// `provider_id` may be full or truncated.
    pub fn links_for_provider(&self, provider_id: &str) -> Result<Vec<Link>> {
        let short_id = truncate_id(provider_id);
        Ok(self
            .read()?
            .values()
            .filter(|l| l.to_id() == short_id)
            .cloned()
            .collect())
    }

    /// Returns every link ID in insertion order.
    pub fn ids(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    /// Number of links.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Returns true if the repository holds no links.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }
}
