//! Shared test fixtures: minimal Papers2 libraries on disk.

use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use tempfile::TempDir;

pub(crate) struct FixtureRow {
    pub author_year: Option<String>,
    pub attributed_title: Option<String>,
    pub canonical_title: Option<String>,
    pub doi: Option<String>,
    pub citekey_base: Option<String>,
    pub publication_date: Option<String>,
    pub pdf: Option<String>,
}

impl FixtureRow {
    pub fn new(author_year: &str, title: &str, base: &str, date: &str) -> Self {
        Self {
            author_year: Some(author_year.into()),
            attributed_title: Some(title.into()),
            canonical_title: Some(title.into()),
            doi: None,
            citekey_base: Some(base.into()),
            publication_date: Some(date.into()),
            pdf: None,
        }
    }

    pub fn with_doi(mut self, doi: &str) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_pdf(mut self, path: &str) -> Self {
        self.pdf = Some(path.into());
        self
    }
}

/// Build a Papers2-shaped library under a temp dir. Linked PDF files are
/// created on disk so open-time checks pass until a test deletes them.
pub(crate) fn library_with(rows: &[FixtureRow]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let db_dir = root.join("Library.papers2");
    fs::create_dir_all(&db_dir).unwrap();

    let conn = Connection::open(db_dir.join("Database.papersdb")).unwrap();
    conn.execute_batch(
        "CREATE TABLE Publication (
            author_year_string TEXT,
            attributed_title TEXT,
            canonical_title TEXT,
            doi TEXT,
            citekey_base TEXT,
            publication_date TEXT
         );
         CREATE TABLE PDF (object_id INTEGER, Path TEXT);",
    )
    .unwrap();

    for row in rows {
        conn.execute(
            "INSERT INTO Publication (author_year_string, attributed_title, \
             canonical_title, doi, citekey_base, publication_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.author_year,
                row.attributed_title,
                row.canonical_title,
                row.doi,
                row.citekey_base,
                row.publication_date,
            ],
        )
        .unwrap();

        if let Some(pdf) = &row.pdf {
            let rowid = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO PDF (object_id, Path) VALUES (?1, ?2)",
                rusqlite::params![rowid, pdf],
            )
            .unwrap();

            let on_disk = root.join(pdf);
            if let Some(parent) = on_disk.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(on_disk, b"%PDF-1.4").unwrap();
        }
    }

    (dir, root)
}
