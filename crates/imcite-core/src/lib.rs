//! imcite-core — read-only bridge between a host editor and a reference
//! manager's citation database.
//!
//! The pipeline is stateless per invocation: read (or reuse) a snapshot of
//! the store, narrow it with the user's query, then either format a
//! citation for insertion at the host's cursor or resolve the selected
//! record's PDF and hand it to the platform opener. The store is never
//! written to; the reference manager owns all mutation.

pub mod bridge;
pub mod cite;
pub mod citekey;
pub mod config;
pub mod error;
pub mod filter;
pub mod pdf;
pub mod record;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use bridge::Bridge;
pub use cite::CitationStyle;
pub use citekey::CiteKey;
pub use config::{Backend, Config, LibraryConfig};
pub use error::{ImciteError, Result};
pub use record::PaperRecord;
pub use store::{CitationStore, Papers2Store, StoreHandle};
