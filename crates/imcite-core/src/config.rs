//! Bridge configuration
//!
//! Loaded from TOML; the default location is `imcite/config.toml` under the
//! platform config directory. The library root and database path replace
//! the globals the host would otherwise have to edit into the bridge.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cite::CitationStyle;
use crate::error::{ImciteError, Result};

/// Reference-manager backend reading the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Papers2,
}

/// Location of the reference library.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Root folder of the library (e.g. `~/Papers2`); linked file paths in
    /// the store are relative to it
    pub root: PathBuf,
    /// Database file override; defaults to the Papers2 layout under `root`
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub backend: Backend,
}

/// Bridge configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub style: CitationStyle,
}

impl Config {
    /// Configuration for a library root, everything else defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            library: LibraryConfig {
                root: root.into(),
                database: None,
                backend: Backend::default(),
            },
            style: CitationStyle::default(),
        }
    }

    /// `imcite/config.toml` under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imcite").join("config.toml"))
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ImciteError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| ImciteError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Database file for the configured backend.
    pub fn database_path(&self) -> PathBuf {
        match &self.library.database {
            Some(path) => path.clone(),
            None => self
                .library
                .root
                .join("Library.papers2")
                .join("Database.papersdb"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.library.root.as_os_str().is_empty() {
            return Err(ImciteError::Config("library root is not set".into()));
        }
        self.style.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [library]
            root = "/home/user/Papers2"
            database = "/home/user/Papers2/Library.papers2/Database.papersdb"
            backend = "papers2"

            [style]
            template = "{authors} ({year})"
            required = ["authors", "year"]
            placeholder = "n.d."
            "#,
        )
        .unwrap();
        assert_eq!(config.library.backend, Backend::Papers2);
        assert_eq!(config.style.template, "{authors} ({year})");
        assert_eq!(config.style.placeholder, "n.d.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [library]
            root = "/home/user/Papers2"
            "#,
        )
        .unwrap();
        assert_eq!(config.library.backend, Backend::Papers2);
        assert_eq!(config.style, CitationStyle::default());
        assert_eq!(
            config.database_path(),
            PathBuf::from("/home/user/Papers2/Library.papers2/Database.papersdb")
        );
    }

    #[test]
    fn partial_style_section_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [library]
            root = "/home/user/Papers2"

            [style]
            template = "{citekey}"
            "#,
        )
        .unwrap();
        assert_eq!(config.style.template, "{citekey}");
        assert_eq!(config.style.placeholder, "??");
    }

    #[test]
    fn empty_root_fails_validation() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ImciteError::Config(_))
        ));
    }

    #[test]
    fn bad_style_fails_validation() {
        let mut config = Config::with_root("/home/user/Papers2");
        config.style.template = "{journal}".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_database_overrides_layout() {
        let mut config = Config::with_root("/library");
        config.library.database = Some(PathBuf::from("/elsewhere/db.papersdb"));
        assert_eq!(config.database_path(), PathBuf::from("/elsewhere/db.papersdb"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[library]\nroot = \"/home/user/Papers2\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.library.root, PathBuf::from("/home/user/Papers2"));

        let missing = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ImciteError::Config(_))));
    }
}
