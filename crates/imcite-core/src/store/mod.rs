//! Citation store access
//!
//! The store belongs to the reference manager; this bridge only ever reads
//! it. Every load opens the database, reads a full snapshot, and closes it
//! again, so concurrent modification by the manager (or a sync agent)
//! is tolerated by re-read-or-fail.

mod papers2;

pub use papers2::Papers2Store;

use std::path::PathBuf;
use std::time::SystemTime;

use crate::citekey::CiteKey;
use crate::config::{Backend, Config};
use crate::error::Result;
use crate::record::PaperRecord;

/// Capability interface implemented by each supported reference-manager
/// backend.
pub trait CitationStore {
    /// Read a full snapshot of the store, most recently added first.
    fn load_records(&self) -> Result<Vec<PaperRecord>>;

    /// Resolve the PDF linked to the publication matching a citekey. The
    /// returned path is not checked against the filesystem.
    fn resolve_pdf_by_key(&self, key: &CiteKey) -> Result<PathBuf>;

    /// Freshness marker for the underlying store; `None` when it cannot be
    /// read, which forces the next access to re-load.
    fn version(&self) -> Option<SystemTime>;
}

struct Snapshot {
    records: Vec<PaperRecord>,
    version: Option<SystemTime>,
}

/// Live reference to the underlying database plus a cached snapshot.
///
/// Owned by exactly one invocation; the cache is never shared. The cached
/// snapshot is served as long as the store's freshness marker is unchanged
/// and re-read otherwise.
pub struct StoreHandle {
    backend: Box<dyn CitationStore>,
    snapshot: Option<Snapshot>,
}

impl StoreHandle {
    pub fn new(backend: Box<dyn CitationStore>) -> Self {
        Self {
            backend,
            snapshot: None,
        }
    }

    /// Select and open the configured backend.
    pub fn open(config: &Config) -> Result<Self> {
        let backend: Box<dyn CitationStore> = match config.library.backend {
            Backend::Papers2 => Box::new(Papers2Store::with_database(
                config.library.root.clone(),
                config.database_path(),
            )),
        };
        Ok(Self::new(backend))
    }

    /// Cached records, re-read when the store changed on disk.
    pub fn records(&mut self) -> Result<&[PaperRecord]> {
        let version = self.backend.version();
        let fresh = match (&self.snapshot, &version) {
            (Some(snapshot), Some(v)) => snapshot.version.as_ref() == Some(v),
            _ => false,
        };
        if fresh {
            return Ok(self.cached());
        }
        self.refresh()
    }

    /// Force a re-read of the store.
    pub fn refresh(&mut self) -> Result<&[PaperRecord]> {
        let version = self.backend.version();
        let records = self.backend.load_records()?;
        tracing::debug!(count = records.len(), "read store snapshot");
        self.snapshot = Some(Snapshot { records, version });
        Ok(self.cached())
    }

    fn cached(&self) -> &[PaperRecord] {
        self.snapshot
            .as_ref()
            .map(|s| s.records.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a citekey's PDF through the backend.
    pub fn resolve_pdf_by_key(&self, key: &CiteKey) -> Result<PathBuf> {
        self.backend.resolve_pdf_by_key(key)
    }
}
