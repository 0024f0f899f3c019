//! Read → filter → act pipeline
//!
//! One `Bridge` per host invocation: it owns the store handle and its
//! snapshot, so overlapping invocations never share a mutable cache. Each
//! operation is a stateless pass over the current snapshot.

use std::path::PathBuf;

use crate::cite;
use crate::citekey::CiteKey;
use crate::config::Config;
use crate::error::Result;
use crate::filter;
use crate::pdf;
use crate::record::PaperRecord;
use crate::store::StoreHandle;

pub struct Bridge {
    config: Config,
    handle: StoreHandle,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Bridge {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let handle = StoreHandle::open(&config)?;
        Ok(Self { config, handle })
    }

    /// Load (or reuse) the snapshot and narrow it by the query. An empty
    /// query lists the whole library, most recently added first.
    pub fn search(&mut self, query: &str) -> Result<Vec<PaperRecord>> {
        let records = self.handle.records()?;
        Ok(filter::filter(records, query))
    }

    /// Exact lookup of the snapshot record carrying a citekey.
    pub fn record_for_key(&mut self, key: &CiteKey) -> Result<Option<PaperRecord>> {
        let rendered = key.to_string();
        Ok(self
            .handle
            .records()?
            .iter()
            .find(|record| record.cite_key == rendered)
            .cloned())
    }

    /// Format one record for insertion with the configured style.
    pub fn cite(&self, record: &PaperRecord) -> Result<String> {
        self.config.style.format(record)
    }

    /// Render a brace group for a set of keys.
    pub fn cite_group(&self, keys: &[CiteKey]) -> String {
        cite::format_key_group(keys)
    }

    /// Resolve a record's PDF path, verifying it still exists on disk.
    pub fn resolve_pdf(&self, record: &PaperRecord) -> Result<PathBuf> {
        pdf::resolve_pdf_path(record)
    }

    /// Resolve a record's PDF and hand it to the platform opener. Returns
    /// the path that was opened.
    pub fn open(&self, record: &PaperRecord) -> Result<PathBuf> {
        let path = self.resolve_pdf(record)?;
        pdf::open_path(&path)?;
        Ok(path)
    }

    /// Resolve a citekey's PDF through the store and open it. Returns the
    /// path that was opened.
    pub fn open_key(&mut self, key: &CiteKey) -> Result<PathBuf> {
        let path = self.handle.resolve_pdf_by_key(key)?;
        let path = pdf::ensure_exists(path)?;
        pdf::open_path(&path)?;
        Ok(path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
