//! Installed-package set backed by manifests.
//!
//! [`InstalledPackages`] is a [`PackageInspector`] over a list of
//! [`PackageManifest`]s. It can be populated in memory or loaded from a
//! directory of TOML manifests:
//!
//! ```toml
//! package = "com.example.notes"
//! providers = ["com.example.notes.suggest"]
//!
//! [[activities]]
//! name = ".SearchNotes"
//! web-search = false
//!
//! [[activities.metadata]]
//! element = "searchable"
//! label = 5
//! searchSuggestAuthority = "com.example.notes.suggest"
//!
//! [[activities.metadata]]
//! element = "actionkey"
//! keycode = 5
//! queryActionMsg = "call"
//! ```

use crate::error::{InspectError, Result};
use crate::events::PackageEvent;
use crate::inspector::PackageInspector;
use crate::metadata::MetadataElement;
use crate::types::ComponentName;
use anyhow::Context;
use ignore::WalkBuilder;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One activity declared by a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActivityManifest {
    /// Class name; a leading `.` is relative to the package
    pub name: String,

    /// Handles web searches
    #[serde(default)]
    pub web_search: bool,

    /// Searchable metadata stream
    #[serde(default)]
    pub metadata: Vec<MetadataElement>,
}

impl ActivityManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn web_search(mut self, web_search: bool) -> Self {
        self.web_search = web_search;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, elements: impl IntoIterator<Item = MetadataElement>) -> Self {
        self.metadata.extend(elements);
        self
    }
}

/// Everything the registry needs to know about one installed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageManifest {
    pub package: String,

    /// Content provider authorities owned by this package
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(default)]
    pub activities: Vec<ActivityManifest>,
}

impl PackageManifest {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_provider(mut self, authority: impl Into<String>) -> Self {
        self.providers.push(authority.into());
        self
    }

    #[must_use]
    pub fn with_activity(mut self, activity: ActivityManifest) -> Self {
        self.activities.push(activity);
        self
    }

    /// Component identity of one of this package's activities.
    pub fn component(&self, activity: &ActivityManifest) -> ComponentName {
        ComponentName::new(self.package.as_str(), &activity.name)
    }

    fn find_activity(&self, component: &ComponentName) -> Option<&ActivityManifest> {
        if self.package != component.package() {
            return None;
        }
        self.activities
            .iter()
            .find(|activity| &self.component(activity) == component)
    }
}

/// The set of installed packages, safe to mutate while a registry reads it.
#[derive(Debug, Default)]
pub struct InstalledPackages {
    packages: RwLock<Vec<PackageManifest>>,
}

impl InstalledPackages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifests(manifests: impl IntoIterator<Item = PackageManifest>) -> Self {
        let installed = Self::new();
        for manifest in manifests {
            installed.install(manifest);
        }
        installed
    }

    /// Load every `*.toml` manifest under `dir`, in path order.
    ///
    /// Manifests that fail to parse are logged and skipped.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("Manifest directory {} does not exist", dir.display());
        }

        let mut paths: Vec<_> = WalkBuilder::new(dir)
            .build()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(|e| e.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let installed = Self::new();
        for path in paths {
            match Self::read_manifest(&path) {
                Ok(manifest) => {
                    installed.install(manifest);
                }
                Err(e) => tracing::warn!("Skipping manifest: {:#}", e),
            }
        }

        tracing::debug!(
            "Loaded {} package manifests from {}",
            installed.packages.read().len(),
            dir.display()
        );
        Ok(installed)
    }

    fn read_manifest(path: &Path) -> Result<PackageManifest> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    /// Install or replace a package, returning the matching lifecycle event.
    pub fn install(&self, manifest: PackageManifest) -> PackageEvent {
        let mut packages = self.packages.write();
        if let Some(existing) = packages.iter_mut().find(|p| p.package == manifest.package) {
            *existing = manifest;
            PackageEvent::changed(existing.package.clone())
        } else {
            let event = PackageEvent::added(manifest.package.clone());
            packages.push(manifest);
            event
        }
    }

    /// Remove a package. Returns `None` if it was not installed.
    pub fn uninstall(&self, package: &str) -> Option<PackageEvent> {
        let mut packages = self.packages.write();
        let position = packages.iter().position(|p| p.package == package)?;
        packages.remove(position);
        Some(PackageEvent::removed(package))
    }

    /// Names of installed packages, in install order.
    pub fn package_names(&self) -> Vec<String> {
        self.packages.read().iter().map(|p| p.package.clone()).collect()
    }
}

impl PackageInspector for InstalledPackages {
    fn list_searchable_components(&self) -> Vec<ComponentName> {
        self.packages
            .read()
            .iter()
            .flat_map(|package| {
                package
                    .activities
                    .iter()
                    .filter(|activity| !activity.metadata.is_empty())
                    .map(|activity| package.component(activity))
            })
            .collect()
    }

    fn raw_metadata(&self, component: &ComponentName) -> std::result::Result<Vec<MetadataElement>, InspectError> {
        self.packages
            .read()
            .iter()
            .find_map(|package| package.find_activity(component))
            .map(|activity| activity.metadata.clone())
            .ok_or_else(|| InspectError::MetadataUnavailable(component.clone()))
    }

    fn resolve_provider_owner(&self, authority: &str) -> std::result::Result<String, InspectError> {
        self.packages
            .read()
            .iter()
            .find(|package| package.providers.iter().any(|a| a == authority))
            .map(|package| package.package.clone())
            .ok_or_else(|| InspectError::ProviderNotFound(authority.to_string()))
    }

    fn list_web_search_components(&self) -> Vec<ComponentName> {
        self.packages
            .read()
            .iter()
            .flat_map(|package| {
                package
                    .activities
                    .iter()
                    .filter(|activity| activity.web_search)
                    .map(|activity| package.component(activity))
            })
            .collect()
    }
}
