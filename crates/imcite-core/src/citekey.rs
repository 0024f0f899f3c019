//! Universal citekey generation and parsing
//!
//! Papers2 derives citation keys of the form `<base>:<year><hash>`. The two
//! hash characters come from a CRC-32 (zlib polynomial) of the DOI when one
//! is present, otherwise of the canonical title. The first character is
//! drawn from `b..k` for DOI hashes and `t..w` for title hashes, so the two
//! kinds never collide. The hash half is not persisted in the database, so
//! lookups by key must re-derive it for every candidate row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ImciteError, Result};

const ALPHABET_LEN: u32 = 26;
const TITLE_SUFFIXES: &[u8] = b"tuvw";
const DOI_SUFFIXES: &[u8] = b"bcdefghijk";

fn hash_chars(text: &str, suffixes: &[u8]) -> String {
    let crc = crc32fast::hash(text.as_bytes());
    let n = crc % (ALPHABET_LEN * suffixes.len() as u32);
    let suffix = suffixes[(n / ALPHABET_LEN) as usize] as char;
    let letter = (b'a' + (n % ALPHABET_LEN) as u8) as char;
    let mut hash = String::with_capacity(2);
    hash.push(suffix);
    hash.push(letter);
    hash
}

/// Two-character hash of a canonical title, in the `t..w` range.
pub fn title_hash(title: &str) -> String {
    hash_chars(title, TITLE_SUFFIXES)
}

/// Two-character hash of a DOI, in the `b..k` range.
pub fn doi_hash(doi: &str) -> String {
    hash_chars(doi, DOI_SUFFIXES)
}

/// A parsed universal citekey.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiteKey {
    /// Author-derived base, e.g. `Euler`
    pub base: String,
    /// Four ASCII digits
    pub year: String,
    /// Two ASCII letters
    pub hash: String,
}

impl CiteKey {
    /// Derive the citekey for a publication row. The DOI wins over the
    /// title when both are present; an empty DOI counts as absent.
    pub fn derive(base: &str, year: &str, doi: Option<&str>, title: Option<&str>) -> Self {
        let hash = match doi.filter(|d| !d.is_empty()) {
            Some(d) => doi_hash(d),
            None => title_hash(title.unwrap_or_default()),
        };
        Self {
            base: base.to_string(),
            year: year.to_string(),
            hash,
        }
    }

    /// Parse `<base>:<year><hash>` — an alphabetic base, a colon, four
    /// digits, and two letters. Anything else is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ImciteError::InvalidCiteKey(input.to_string());

        let (base, suffix) = input.split_once(':').ok_or_else(invalid)?;
        if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if suffix.len() != 6 || !suffix.is_ascii() {
            return Err(invalid());
        }
        let (year, hash) = suffix.split_at(4);
        if !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !hash.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        Ok(Self {
            base: base.to_string(),
            year: year.to_string(),
            hash: hash.to_string(),
        })
    }
}

impl fmt::Display for CiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.base, self.year, self.hash)
    }
}
