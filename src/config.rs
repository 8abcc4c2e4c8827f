//! Configuration loaded from TOML.

use crate::error::Result;
use crate::types::ComponentName;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options that shape how the registry parses and ranks searchables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryOptions {
    /// Ignore all suggestion configuration declared by components
    pub inhibit_suggestions: bool,

    /// Preferred web search target, used when no default has been set explicitly
    pub default_web_search: Option<ComponentName>,
}

/// Top-level configuration file.
///
/// ```toml
/// manifests = "/var/lib/searchables/packages"
///
/// [registry]
/// inhibit-suggestions = false
/// default-web-search = "com.example.browser/.WebSearch"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub registry: RegistryOptions,

    /// Directory of package manifests for the CLI's package inspector
    pub manifests: Option<PathBuf>,
}

impl Config {
    /// Per-user config location: `<config dir>/searchables/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("searchables").join("config.toml"))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load an explicit config file, or the per-user one if it exists, or defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
