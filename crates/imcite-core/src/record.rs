//! Paper record domain model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single bibliographic entry read from the reference manager's store.
///
/// Records are immutable snapshots: the bridge never writes to the store,
/// and a record is not updated after it has been read. The linked PDF path
/// may be stale by the time it is opened; resolution fails at open-time
/// rather than substituting another record's file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaperRecord {
    /// Stable key from the store (the SQLite rowid), unique per read
    pub id: i64,
    pub title: String,
    /// Ordered author list as displayed by the reference manager
    pub authors: Vec<String>,
    pub year: Option<i32>,
    /// Universal citekey, `<base>:<year><hash>`
    pub cite_key: String,
    /// Absolute path to the linked PDF, if any
    pub pdf_path: Option<PathBuf>,
}

impl PaperRecord {
    /// First author, if any
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// One-line label for selection lists: "<authors> <year> <title>"
    pub fn display_label(&self) -> String {
        let mut label = String::new();
        if !self.authors.is_empty() {
            label.push_str(&self.authors.join(", "));
        }
        if let Some(year) = self.year {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str(&year.to_string());
        }
        if !self.title.is_empty() {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str(&self.title);
        }
        label
    }
}
