/*
 * app_config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The user's panjob.yaml: presets and pandoc location.
 */

//! Application configuration.
//!
//! `panjob.yaml` holds the named presets and, optionally, the pandoc binary
//! to run:
//!
//! ```yaml
//! pandoc_path: /opt/pandoc/bin/pandoc
//! presets:
//!   journal:
//!     output_format: pdf
//!     filters:
//!       pagebreak.lua: true
//! ```
//!
//! Without an explicit path the file is looked up in the current directory,
//! the home directory and the user config directory, in that order.

use std::path::{Path, PathBuf};

use panjob_config::{ConfigError, PresetStore, Value};
use serde::Deserialize;
use tracing::debug;

use crate::error::{PanjobError, Result};

/// File name looked up during discovery.
pub const CONFIG_FILENAME: &str = "panjob.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAppConfig {
    #[serde(default)]
    presets: Value,

    #[serde(default)]
    pandoc_path: Option<PathBuf>,
}

/// Loaded application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Flattened presets, ready for resolution
    pub presets: PresetStore,

    /// Explicit pandoc binary, if configured
    pub pandoc_path: Option<PathBuf>,

    /// File this configuration was read from
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Parse configuration text. An empty file is an empty configuration.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, ConfigError> {
        let value: Value = if yaml.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(yaml)?
        };
        if value.is_null() {
            return Ok(Self::default());
        }

        let raw: RawAppConfig = serde_yaml::from_value(value)?;
        Ok(Self {
            presets: PresetStore::load(&raw.presets)?,
            pandoc_path: raw.pandoc_path,
            source: None,
        })
    }

    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PanjobError::ConfigNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| PanjobError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&text).map_err(|source| PanjobError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.source = Some(path.to_path_buf());

        debug!(
            path = %path.display(),
            presets = config.presets.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Load from `explicit` if given, otherwise discover the file.
    pub fn load_or_discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::discover(),
        }
    }

    /// Load the first configuration file found in the standard locations.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let searched = search_paths(&cwd, home_dir(), config_dir());
        Self::discover_in(searched)
    }

    /// Load the first existing file among `candidates`.
    pub fn discover_in(candidates: Vec<PathBuf>) -> Result<Self> {
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(PanjobError::NoConfigFile {
                searched: candidates,
            }),
        }
    }
}

/// Candidate configuration files in lookup order.
pub fn search_paths(cwd: &Path, home: Option<PathBuf>, config: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(CONFIG_FILENAME)];
    if let Some(home) = home {
        paths.push(home.join(CONFIG_FILENAME));
    }
    if let Some(config) = config {
        paths.push(config.join(CONFIG_FILENAME));
    }
    paths.dedup();
    paths
}

/// The user's home directory (`HOME`, then `USERPROFILE`).
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// The user config directory (`$XDG_CONFIG_HOME`, else `~/.config`).
pub fn config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|h| h.join(".config")))
}

/// A commented starting point for `panjob.yaml`.
pub fn config_template() -> &'static str {
    r#"# panjob configuration
#
# Jobs in a document's front matter may name one of these presets with
# `use_preset` and override any of its fields.

# Path to the pandoc binary. Defaults to $PANJOB_PANDOC, then PATH.
# pandoc_path: /usr/local/bin/pandoc

presets:
  default:
    output_format: html
    pandoc_args:
      standalone: true

  journal:
    output_format: pdf
    metadata:
      documentclass: article
    pandoc_args:
      pdf_engine: xelatex
    filters:
      pagebreak.lua: true

  # Presets may build on each other.
  draft:
    use_preset: journal
    metadata:
      draft: true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let config = AppConfig::from_yaml_str(
            r#"
pandoc_path: /opt/pandoc
presets:
  default:
    output_format: html
"#,
        )
        .unwrap();
        assert_eq!(config.pandoc_path, Some(PathBuf::from("/opt/pandoc")));
        assert!(config.presets.contains("default"));
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml_str("~\n").unwrap(), AppConfig::default());
        assert!(AppConfig::from_yaml_str("presets:\n").unwrap().presets.is_empty());
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = AppConfig::from_yaml_str("pressets: {}\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("pressets"));
    }

    #[test]
    fn test_invalid_preset_is_config_error() {
        let err = AppConfig::from_yaml_str("presets: {bad: {colour: red}}").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPreset { .. }));
    }

    #[test]
    fn test_template_parses() {
        let config = AppConfig::from_yaml_str(config_template()).unwrap();
        assert_eq!(
            config.presets.names().collect::<Vec<_>>(),
            vec!["default", "journal", "draft"]
        );
        let draft = config.presets.get("draft").unwrap();
        assert_eq!(draft.output_format.as_deref(), Some("pdf"));
    }

    #[test]
    fn test_load_sets_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "presets: {web: {output_format: html}}").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert!(config.presets.contains("web"));
    }

    #[test]
    fn test_load_missing_path() {
        let err = AppConfig::load(Path::new("/no/such/panjob.yaml")).unwrap_err();
        assert!(matches!(err, PanjobError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "presets: [not, a, mapping]").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, PanjobError::Config { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_search_order() {
        let paths = search_paths(
            Path::new("/work"),
            Some(PathBuf::from("/home/u")),
            Some(PathBuf::from("/home/u/.config")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/work/panjob.yaml"),
                PathBuf::from("/home/u/panjob.yaml"),
                PathBuf::from("/home/u/.config/panjob.yaml"),
            ]
        );
    }

    #[test]
    fn test_discover_first_existing() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(
            second.path().join(CONFIG_FILENAME),
            "presets: {found: {output_format: docx}}",
        )
        .unwrap();

        let config =
            AppConfig::discover_in(search_paths(first.path(), Some(second.path().into()), None))
                .unwrap();
        assert!(config.presets.contains("found"));
    }

    #[test]
    fn test_discover_nothing_found() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::discover_in(search_paths(dir.path(), None, None)).unwrap_err();
        match err {
            PanjobError::NoConfigFile { searched } => assert_eq!(searched.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
