//! CLI configuration, read from RON.
//!
//! ```ron
//! (
//!     log_filter: "pageblocks_tree=debug,info",
//!     indent: 4,
//!     preview_chars: 60,
//! )
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings for the `pageblocks` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Spaces per depth level in outline output.
    pub indent: usize,
    /// Longest content preview in outline output. 0 disables previews.
    pub preview_chars: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            indent: 2,
            preview_chars: 40,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("RON parse error in {path}: {source}")]
    Ron {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// `$XDG_CONFIG_HOME/pageblocks/config.ron` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pageblocks").join("config.ron"))
}

impl CliConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Load from `explicit` if given (it must exist), else from the default
    /// path if a file is there, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text).map_err(|source| ConfigError::Ron {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = CliConfig::from_ron_str("(indent: 4)").unwrap();
        assert_eq!(config.indent, 4);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.preview_chars, 40);
    }

    #[test]
    fn test_empty_struct_is_default() {
        assert_eq!(CliConfig::from_ron_str("()").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_unknown_syntax_is_error() {
        assert!(CliConfig::from_ron_str("(indent: \"wide\")").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(dir.path().join("nope.ron").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(log_filter: \"debug\", preview_chars: 0)").unwrap();
        let config = CliConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.preview_chars, 0);
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(indent: ").unwrap();
        let err = CliConfig::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("config.ron"));
    }
}
