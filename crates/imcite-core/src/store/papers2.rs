//! Papers2 library backend
//!
//! Reads the `Database.papersdb` SQLite file inside a Papers2 library
//! folder. The `Publication` table carries the display string, titles,
//! DOI, citekey base and a packed date (`99YYYYMMDD…`); linked files live
//! in the `PDF` table with paths relative to the library root. The library
//! is often a synced folder, so the database is opened read-only for each
//! read and closed before returning.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::citekey::{self, CiteKey};
use crate::error::{ImciteError, Result};
use crate::record::PaperRecord;
use crate::store::CitationStore;

/// Table/column pairs a Papers2 database must carry.
const REQUIRED_COLUMNS: [(&str, &str); 8] = [
    ("Publication", "author_year_string"),
    ("Publication", "attributed_title"),
    ("Publication", "canonical_title"),
    ("Publication", "doi"),
    ("Publication", "citekey_base"),
    ("Publication", "publication_date"),
    ("PDF", "object_id"),
    ("PDF", "Path"),
];

pub struct Papers2Store {
    root: PathBuf,
    db_path: PathBuf,
}

struct RawPublication {
    rowid: i64,
    author_year: Option<String>,
    attributed_title: Option<String>,
    canonical_title: Option<String>,
    doi: Option<String>,
    citekey_base: Option<String>,
    publication_date: Option<String>,
}

impl Papers2Store {
    /// Backend for a library root with the standard Papers2 layout
    /// (`<root>/Library.papers2/Database.papersdb`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let db_path = root.join("Library.papers2").join("Database.papersdb");
        Self { root, db_path }
    }

    /// Backend with an explicit database file.
    pub fn with_database(root: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_path: db_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn connect(&self) -> Result<Connection> {
        if !self.db_path.is_file() {
            return Err(ImciteError::StoreUnavailable(format!(
                "{}: no such database",
                self.db_path.display()
            )));
        }
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            ImciteError::StoreUnavailable(format!("{}: {}", self.db_path.display(), e))
        })
    }

    /// Distinguish "not a Papers2 database" from plain read failure.
    fn check_schema(conn: &Connection) -> Result<()> {
        for (table, column) in REQUIRED_COLUMNS {
            let present: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                    rusqlite::params![table, column],
                    |row| row.get(0),
                )
                .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
            if present == 0 {
                return Err(ImciteError::SchemaMismatch(format!(
                    "missing {table}.{column}"
                )));
            }
        }
        Ok(())
    }

    /// First linked PDF per publication, keyed by rowid.
    fn load_pdf_index(conn: &Connection) -> Result<HashMap<i64, String>> {
        let mut stmt = conn
            .prepare("SELECT object_id, Path FROM PDF ORDER BY ROWID")
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;

        let mut index = HashMap::new();
        for row in rows {
            let (object_id, path) =
                row.map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
            index.entry(object_id).or_insert(path);
        }
        Ok(index)
    }

    fn build_record(&self, raw: RawPublication, pdfs: &HashMap<i64, String>) -> Option<PaperRecord> {
        let base = raw.citekey_base.as_deref().filter(|b| !b.is_empty())?;
        let year = year_from_date(raw.publication_date.as_deref())?;

        let key = CiteKey::derive(
            base,
            year,
            raw.doi.as_deref(),
            raw.canonical_title.as_deref(),
        );
        let title = raw
            .attributed_title
            .or(raw.canonical_title)
            .unwrap_or_default();
        let authors = raw
            .author_year
            .as_deref()
            .map(parse_authors)
            .unwrap_or_default();

        Some(PaperRecord {
            id: raw.rowid,
            title,
            authors,
            year: year.parse().ok(),
            cite_key: key.to_string(),
            pdf_path: pdfs.get(&raw.rowid).map(|p| self.root.join(p)),
        })
    }
}

impl CitationStore for Papers2Store {
    fn load_records(&self) -> Result<Vec<PaperRecord>> {
        let conn = self.connect()?;
        Self::check_schema(&conn)?;
        let pdfs = Self::load_pdf_index(&conn)?;

        let mut stmt = conn
            .prepare(
                "SELECT ROWID, author_year_string, attributed_title, canonical_title, \
                        doi, citekey_base, publication_date \
                 FROM Publication ORDER BY ROWID DESC",
            )
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RawPublication {
                    rowid: row.get(0)?,
                    author_year: row.get(1)?,
                    attributed_title: row.get(2)?,
                    canonical_title: row.get(3)?,
                    doi: row.get(4)?,
                    citekey_base: row.get(5)?,
                    publication_date: row.get(6)?,
                })
            })
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
            let rowid = raw.rowid;
            match self.build_record(raw, &pdfs) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!(rowid, "skipping row without citekey base or 4-digit year");
                }
            }
        }
        Ok(records)
    }

    fn resolve_pdf_by_key(&self, key: &CiteKey) -> Result<PathBuf> {
        let conn = self.connect()?;
        Self::check_schema(&conn)?;

        // The hash half of the key is not stored; narrow by base and year,
        // then re-derive hashes for the candidates.
        let mut stmt = conn
            .prepare(
                "SELECT ROWID, canonical_title, doi FROM Publication \
                 WHERE citekey_base = ?1 AND substr(publication_date, 3, 4) = ?2 \
                 ORDER BY ROWID",
            )
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params![key.base, key.year], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;

        let mut matched = false;
        for row in rows {
            let (rowid, title, doi) =
                row.map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
            let title_matches =
                citekey::title_hash(title.as_deref().unwrap_or_default()) == key.hash;
            let doi_matches = doi
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| citekey::doi_hash(d) == key.hash)
                .unwrap_or(false);
            if !(title_matches || doi_matches) {
                continue;
            }
            matched = true;

            // First PDF entry wins; when this publication has none, keep
            // scanning — duplicate entries can share the same hash.
            let path: Option<String> = conn
                .query_row(
                    "SELECT Path FROM PDF WHERE object_id = ?1 ORDER BY ROWID",
                    rusqlite::params![rowid],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| ImciteError::StoreUnavailable(e.to_string()))?;
            if let Some(path) = path {
                return Ok(self.root.join(path));
            }
        }

        if matched {
            Err(ImciteError::PdfMissing(key.to_string()))
        } else {
            Err(ImciteError::KeyNotFound(key.to_string()))
        }
    }

    fn version(&self) -> Option<SystemTime> {
        fs::metadata(&self.db_path).and_then(|m| m.modified()).ok()
    }
}

/// Papers2 packs dates as `99YYYYMMDD…`; the year is characters 3–6.
fn year_from_date(date: Option<&str>) -> Option<&str> {
    let year = date?.get(2..6)?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// Split a Papers2 `author_year_string` ("Smith & Jones 2001",
/// "Curie and Curie (1903)") into the author list, dropping the trailing
/// year token. "et al." stays attached to its author.
fn parse_authors(author_year: &str) -> Vec<String> {
    let mut names = author_year.trim();

    if names.ends_with(')') {
        if let Some(open) = names.rfind('(') {
            if is_year_token(&names[open + 1..names.len() - 1]) {
                names = names[..open].trim_end();
            }
        }
    } else if let Some(space) = names.rfind(' ') {
        if is_year_token(&names[space + 1..]) {
            names = names[..space].trim_end();
        }
    }

    names
        .replace(" and ", " & ")
        .split(['&', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// A four-digit year, optionally followed by a disambiguating letter
/// ("2001", "2001a").
fn is_year_token(token: &str) -> bool {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    digits == 4 && token.len() <= 5 && token.chars().skip(4).all(|c| c.is_ascii_alphabetic())
}
