//! Configuration file for `maturity`.
//!
//! Looked up at `--config <path>`, or `maturity.toml` in the working
//! directory when present. Relative paths resolve against the directory of
//! the file. Command-line flags override anything set here.
//!
//! # Example
//!
//! ```toml
//! catalogue = ["data/activities.yaml"]
//! selection = "data/selected.csv"
//!
//! [report]
//! performed = true
//! planned = true
//! aggregated = false
//! ```

use std::path::{Path, PathBuf};

use maturity_core::ReportOptions;
use serde::Deserialize;

/// File name picked up from the working directory without `--config`.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "maturity.toml";

/// Selection file used when neither the flags nor the config name one.
pub(crate) const DEFAULT_SELECTION_FILE: &str = "selected.csv";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no catalogue files given (use --catalogue or set `catalogue` in maturity.toml)")]
    NoCatalogue,
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub catalogue: Vec<PathBuf>,
    pub selection: Option<PathBuf>,
    #[serde(default)]
    pub report: ReportSection,
}

/// `[report]` section. Unset flags fall back to showing everything,
/// unaggregated.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReportSection {
    pub performed: Option<bool>,
    pub planned: Option<bool>,
    pub aggregated: Option<bool>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub config: Option<PathBuf>,
    pub catalogue: Vec<PathBuf>,
    pub selection: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub catalogue: Vec<PathBuf>,
    pub selection: PathBuf,
    pub report: ReportOptions,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl ConfigFile {
    pub(crate) fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let mut config: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for file in config.catalogue.iter_mut() {
            *file = resolve_against(base, file);
        }
        if let Some(selection) = config.selection.as_mut() {
            *selection = resolve_against(base, selection);
        }
        Ok(config)
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl ReportSection {
    pub(crate) fn options(self) -> ReportOptions {
        ReportOptions {
            performed: self.performed.unwrap_or(true),
            planned: self.planned.unwrap_or(true),
            aggregated: self.aggregated.unwrap_or(false),
        }
    }
}

impl Settings {
    /// Merge the config file (explicit, or the default one if present) with
    /// the command-line overrides.
    pub(crate) fn resolve(overrides: Overrides) -> Result<Self, ConfigError> {
        let config = match &overrides.config {
            Some(path) => ConfigFile::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                ConfigFile::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => ConfigFile::default(),
        };
        Ok(Self::merge(config, overrides))
    }

    pub(crate) fn merge(config: ConfigFile, overrides: Overrides) -> Self {
        let catalogue = if overrides.catalogue.is_empty() {
            config.catalogue
        } else {
            overrides.catalogue
        };
        let selection = overrides
            .selection
            .or(config.selection)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SELECTION_FILE));
        tracing::debug!(
            catalogue = catalogue.len(),
            selection = %selection.display(),
            "resolved settings"
        );
        Settings {
            catalogue,
            selection,
            report: config.report.options(),
        }
    }

    /// Catalogue files, or an error when none were configured.
    pub(crate) fn catalogue_files(&self) -> Result<&[PathBuf], ConfigError> {
        if self.catalogue.is_empty() {
            return Err(ConfigError::NoCatalogue);
        }
        Ok(&self.catalogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let text = r#"
catalogue = ["data/activities.yaml", "/srv/extra.yaml"]
selection = "data/selected.csv"
"#;
        let config = ConfigFile::parse(Path::new("/etc/maturity/maturity.toml"), text).unwrap();
        assert_eq!(
            config.catalogue,
            vec![
                PathBuf::from("/etc/maturity/data/activities.yaml"),
                PathBuf::from("/srv/extra.yaml"),
            ]
        );
        assert_eq!(
            config.selection,
            Some(PathBuf::from("/etc/maturity/data/selected.csv"))
        );
    }

    #[test]
    fn report_section_defaults() {
        let config = ConfigFile::parse(Path::new("maturity.toml"), "[report]\nplanned = false\n").unwrap();
        let options = config.report.options();
        assert!(options.performed);
        assert!(!options.planned);
        assert!(!options.aggregated);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConfigFile::parse(Path::new("maturity.toml"), "catalog = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn flags_override_config() {
        let config = ConfigFile {
            catalogue: vec![PathBuf::from("a.yaml")],
            selection: Some(PathBuf::from("a.csv")),
            report: ReportSection::default(),
        };
        let settings = Settings::merge(
            config,
            Overrides {
                config: None,
                catalogue: vec![PathBuf::from("b.yaml")],
                selection: None,
            },
        );
        assert_eq!(settings.catalogue, vec![PathBuf::from("b.yaml")]);
        assert_eq!(settings.selection, PathBuf::from("a.csv"));
    }

    #[test]
    fn missing_catalogue_is_reported_on_use() {
        let settings = Settings::merge(ConfigFile::default(), Overrides::default());
        assert_eq!(settings.selection, PathBuf::from(DEFAULT_SELECTION_FILE));
        assert!(matches!(
            settings.catalogue_files(),
            Err(ConfigError::NoCatalogue)
        ));
    }
}
