//! User settings: built-in defaults, an optional TOML file, then command-line overrides.
//!
//! File support lives behind the `config` feature (on by default). Without it only the defaults
//! and flags apply.

use crate::error::{CordexError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Rows shown in the preview table.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;
/// Terms drawn in the word cloud.
pub const DEFAULT_CLOUD_TERMS: usize = 40;

/// Named color themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

impl FromStr for ThemeName {
    type Err = CordexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ThemeName::Default),
            "monochrome" => Ok(ThemeName::Monochrome),
            "high-contrast" => Ok(ThemeName::HighContrast),
            other => Err(CordexError::invalid_argument(format!(
                "unknown theme '{other}' (expected default, monochrome or high-contrast)"
            ))),
        }
    }
}

/// Effective settings for a session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct Settings {
    pub preview_rows: usize,
    pub top_sources: usize,
    pub cloud_terms: usize,
    pub export_dir: PathBuf,
    pub theme: ThemeName,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            top_sources: crate::aggregate::DEFAULT_TOP_SOURCES,
            cloud_terms: DEFAULT_CLOUD_TERMS,
            export_dir: PathBuf::from("."),
            theme: ThemeName::Default,
        }
    }
}

impl Settings {
    /// Load settings from `explicit` if given, otherwise from the default location if present.
    ///
    /// An explicit path that does not exist is an error; a missing default file is not.
    #[cfg(feature = "config")]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => return Err(CordexError::config_not_found(path)),
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| CordexError::config(format!("cannot read {}: {e}", path.display())))?;
        let settings: Self = toml::from_str(&text)
            .map_err(|e| CordexError::config(format!("{}: {e}", path.display())))?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    #[cfg(not(feature = "config"))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(_) => Err(CordexError::config(
                "built without configuration file support",
            )),
            None => Ok(Self::default()),
        }
    }

    /// `<config dir>/cordex/config.toml`
    #[cfg(feature = "config")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cordex").join("config.toml"))
    }

    #[cfg(feature = "config")]
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CordexError::config(e.to_string()))
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(rows) = overrides.preview_rows {
            self.preview_rows = rows;
        }
        if let Some(top) = overrides.top_sources {
            self.top_sources = top;
        }
        if let Some(dir) = &overrides.export_dir {
            self.export_dir = dir.clone();
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        self
    }
}

/// Values given on the command line; `None` leaves the loaded setting alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub preview_rows: Option<usize>,
    pub top_sources: Option<usize>,
    pub export_dir: Option<PathBuf>,
    pub theme: Option<ThemeName>,
}
