//! Citation formatting
//!
//! Template-driven rendering of a record into insertion text, plus the
//! brace-group and Markdown renderings of citekey groups that the host
//! inserts verbatim at the cursor.

use serde::{Deserialize, Serialize};

use crate::citekey::CiteKey;
use crate::error::{ImciteError, Result};
use crate::record::PaperRecord;

/// Template fields understood by [`CitationStyle`].
const FIELDS: [&str; 5] = ["author", "authors", "year", "title", "citekey"];

fn default_template() -> String {
    "{author}, {year}".to_string()
}

fn default_required() -> Vec<String> {
    vec!["author".to_string()]
}

fn default_placeholder() -> String {
    "??".to_string()
}

/// Citation style configuration.
///
/// The template may reference `{author}` (first author), `{authors}`
/// (comma-joined list), `{year}`, `{title}`, and `{citekey}`. A field in
/// `required` must be present on the record; any other absent field renders
/// as `placeholder`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CitationStyle {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_required")]
    pub required: Vec<String>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self {
            template: default_template(),
            required: default_required(),
            placeholder: default_placeholder(),
        }
    }
}

impl CitationStyle {
    /// Render a record with this style. Deterministic: the same record and
    /// style always yield the same string.
    pub fn format(&self, record: &PaperRecord) -> Result<String> {
        let mut out = self.template.clone();
        for field in FIELDS {
            let token = format!("{{{field}}}");
            if !out.contains(&token) {
                continue;
            }
            let value = match field_value(record, field) {
                Some(value) => value,
                None if self.required.iter().any(|r| r == field) => {
                    return Err(ImciteError::MissingField(field.to_string()));
                }
                None => self.placeholder.clone(),
            };
            out = out.replace(&token, &value);
        }
        Ok(out)
    }

    /// Reject empty templates, unknown `{...}` tokens, and unknown names in
    /// the `required` list.
    pub fn validate(&self) -> Result<()> {
        if self.template.trim().is_empty() {
            return Err(ImciteError::Config("citation template is empty".into()));
        }
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                return Err(ImciteError::Config(
                    "unbalanced braces in citation template".into(),
                ));
            };
            let name = &rest[start + 1..start + len];
            if !FIELDS.contains(&name) {
                return Err(ImciteError::Config(format!(
                    "unknown template field: {name}"
                )));
            }
            rest = &rest[start + len + 1..];
        }
        for field in &self.required {
            if !FIELDS.contains(&field.as_str()) {
                return Err(ImciteError::Config(format!(
                    "unknown required field: {field}"
                )));
            }
        }
        Ok(())
    }
}

fn field_value(record: &PaperRecord, field: &str) -> Option<String> {
    match field {
        "author" => record.first_author().map(str::to_string),
        "authors" => {
            if record.authors.is_empty() {
                None
            } else {
                Some(record.authors.join(", "))
            }
        }
        "year" => record.year.map(|y| y.to_string()),
        "title" => {
            if record.title.is_empty() {
                None
            } else {
                Some(record.title.clone())
            }
        }
        "citekey" => {
            if record.cite_key.is_empty() {
                None
            } else {
                Some(record.cite_key.clone())
            }
        }
        _ => None,
    }
}

/// Render a citekey group for insertion: `{Euler:1736ta, Gauss:1801bc}`.
/// Keys are deduplicated and ordered by year, then textually.
pub fn format_key_group(keys: &[CiteKey]) -> String {
    let mut sorted: Vec<&CiteKey> = keys.iter().collect();
    sorted.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.base.cmp(&b.base))
            .then_with(|| a.hash.cmp(&b.hash))
    });
    sorted.dedup();
    let joined = sorted
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{joined}}}")
}

/// Render keys as Markdown deep links into the reference manager, in the
/// order given.
pub fn format_markdown_links(keys: &[CiteKey]) -> String {
    keys.iter()
        .map(|k| format!("[{k}](papers2://publication/citekey/{k})"))
        .collect::<Vec<_>>()
        .join(", ")
}
