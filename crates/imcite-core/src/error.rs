//! Error types for imcite-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, ImciteError>;

/// Main error type for bridge operations
///
/// None of these are fatal to the host: every variant renders as one short
/// human-readable line suitable for a notification, and a failed query can
/// simply be re-invoked.
#[derive(Debug, Error)]
pub enum ImciteError {
    /// The database could not be opened or read
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The database opened but its layout is not one we recognize
    #[error("unrecognized database layout: {0}")]
    SchemaMismatch(String),

    /// A stored file path no longer exists on disk
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No publication row matches a cite key
    #[error("no publication matches cite key {0}")]
    KeyNotFound(String),

    /// A matching publication exists but has no linked PDF
    #[error("no PDF linked for cite key {0}")]
    PdfMissing(String),

    /// A required citation template field is absent from the record
    #[error("missing citation field: {0}")]
    MissingField(String),

    /// A cite key string does not have the `<base>:<year><hash>` shape
    #[error("invalid cite key: {0}")]
    InvalidCiteKey(String),

    /// The platform opener refused the path
    #[error("could not open file: {0}")]
    OpenFailed(String),

    /// Configuration could not be read or failed validation
    #[error("config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_one_line() {
        let errors: Vec<ImciteError> = vec![
            ImciteError::StoreUnavailable("Database.papersdb: no such file".into()),
            ImciteError::SchemaMismatch("missing Publication.citekey_base".into()),
            ImciteError::FileNotFound(PathBuf::from("/papers/euler.pdf")),
            ImciteError::KeyNotFound("Euler:1736ta".into()),
            ImciteError::PdfMissing("Euler:1736ta".into()),
            ImciteError::MissingField("author".into()),
            ImciteError::InvalidCiteKey("not-a-key".into()),
            ImciteError::OpenFailed("no handler registered".into()),
            ImciteError::Config("citation template is empty".into()),
        ];
        for err in errors {
            let rendered = err.to_string();
            assert!(!rendered.is_empty());
            assert!(!rendered.contains('\n'));
        }
    }
}
