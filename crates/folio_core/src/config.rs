use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub html: HtmlConfig,
    pub typst: TypstConfig,
}

/// Policy for a code fence that is still open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedCode {
    /// Drop the buffered lines.
    #[default]
    Discard,
    /// Emit the buffered lines as a code block.
    Flush,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct RenderOptions {
    pub unterminated_code: UnterminatedCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub heading_ids: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { heading_ids: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypstConfig {
    pub keep_headings_with_content: bool,
}

impl Default for TypstConfig {
    fn default() -> Self {
        Self {
            keep_headings_with_content: true,
        }
    }
}

impl Config {
    /// The bundled `default_config.toml`. Its syntax is checked by the build
    /// script, so parsing only falls back to `Default` if the two drift apart.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse config from TOML text. Missing keys take their default values.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load config from a TOML file, or return the compiled default if the
    /// file does not exist. A file that exists but is unreadable or invalid
    /// is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::compiled_default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_default_impl() {
        assert_eq!(
            toml::from_str::<Config>(DEFAULT_CONFIG).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            "[render]\nunterminated_code = \"flush\"\n",
            Path::new("folio.toml"),
        )
        .unwrap();
        assert_eq!(config.render.unterminated_code, UnterminatedCode::Flush);
        assert!(config.html.heading_ids);
        assert!(config.typst.keep_headings_with_content);
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = Config::from_toml(
            "[render]\nunterminated_code = \"keep\"\n",
            Path::new("folio.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("folio.toml"));
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "[html]\nheading_ids = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.html.heading_ids);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("folio.toml")).unwrap();
        assert_eq!(config, Config::compiled_default());
    }

    #[test]
    fn load_or_default_still_reports_bad_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "[render\n").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
