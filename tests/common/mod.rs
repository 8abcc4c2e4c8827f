//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test builds its own package set and event bus, so tests can run in
//! parallel without interference. Each test gets:
//! - A fresh [`InstalledPackages`] populated in memory
//! - Its own event bus and [`SearchManager`] (uninitialized until first query)
//! - A temp directory via [`TempWorkspace`] when it needs manifests on disk
//!
//! # Available Fixtures
//!
//! - `harness`: manager over a small notes/browser/mail package set (recommended)
//! - `empty_harness`: manager over no packages at all
//!
//! # Slow Rebuilds
//!
//! [`SlowInspector`] wraps any inspector and sleeps in every metadata lookup,
//! stretching each rebuild so concurrent readers overlap with it.

use rstest::fixture;
use searchables::{
    ActivityManifest, ComponentName, InspectError, InstalledPackages, MetadataElement, PackageEvent,
    PackageInspector, PackageManifest, RegistryOptions, SearchManager, SearchablesChanged,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// How long a test waits for an asynchronous notification before failing.
#[allow(dead_code)]
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// A temporary directory for test isolation.
///
/// Automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }
}

/// `searchable` metadata element with a label and global-search opt-in.
#[allow(dead_code)]
pub fn searchable(label: i32, global: bool) -> MetadataElement {
    MetadataElement::new("searchable")
        .with("label", label)
        .with("includeInGlobalSearch", global)
}

/// A package with one `.Search` activity declaring `metadata`.
#[allow(dead_code)]
pub fn app(package: &str, web: bool, metadata: impl IntoIterator<Item = MetadataElement>) -> PackageManifest {
    PackageManifest::new(package).with_activity(ActivityManifest::new(".Search").web_search(web).with_metadata(metadata))
}

/// Component identity of the `.Search` activity created by [`app`].
#[allow(dead_code)]
pub fn search_component(package: &str) -> ComponentName {
    ComponentName::new(package, ".Search")
}

/// A manager wired to an in-memory package set and event bus.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct Harness {
    pub installed: Arc<InstalledPackages>,
    pub bus: broadcast::Sender<PackageEvent>,
    pub manager: SearchManager,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl Harness {
    pub fn new(manifests: impl IntoIterator<Item = PackageManifest>) -> Self {
        Self::with_options(manifests, RegistryOptions::default())
    }

    pub fn with_options(manifests: impl IntoIterator<Item = PackageManifest>, options: RegistryOptions) -> Self {
        let installed = Arc::new(InstalledPackages::from_manifests(manifests));
        let (bus, _) = broadcast::channel(64);
        let manager = SearchManager::new(
            Arc::clone(&installed) as Arc<dyn PackageInspector>,
            bus.clone(),
            options,
        );
        Self {
            installed,
            bus,
            manager,
        }
    }

    /// Install a package and publish the event on the bus.
    pub fn install(&self, manifest: PackageManifest) {
        let event = self.installed.install(manifest);
        self.bus.send(event).expect("manager is not subscribed");
    }

    /// Uninstall a package and publish the event on the bus.
    pub fn uninstall(&self, package: &str) {
        let event = self
            .installed
            .uninstall(package)
            .unwrap_or_else(|| panic!("{} is not installed", package));
        self.bus.send(event).expect("manager is not subscribed");
    }
}

/// Wait for the next change notification, failing the test on timeout.
#[allow(dead_code)]
pub async fn next_change(changes: &mut broadcast::Receiver<SearchablesChanged>) {
    match tokio::time::timeout(NOTIFY_TIMEOUT, changes.recv()).await {
        Ok(Ok(SearchablesChanged)) => {}
        Ok(Err(e)) => panic!("Change notification stream failed: {}", e),
        Err(_) => panic!("No change notification within {:?}", NOTIFY_TIMEOUT),
    }
}

/// Inspector that sleeps in every metadata lookup.
#[allow(dead_code)]
pub struct SlowInspector<I> {
    pub inner: I,
    pub delay: Duration,
}

#[allow(dead_code)]
impl<I: PackageInspector> PackageInspector for SlowInspector<I> {
    fn list_searchable_components(&self) -> Vec<ComponentName> {
        self.inner.list_searchable_components()
    }

    fn raw_metadata(&self, component: &ComponentName) -> Result<Vec<MetadataElement>, InspectError> {
        std::thread::sleep(self.delay);
        self.inner.raw_metadata(component)
    }

    fn resolve_provider_owner(&self, authority: &str) -> Result<String, InspectError> {
        self.inner.resolve_provider_owner(authority)
    }

    fn list_web_search_components(&self) -> Vec<ComponentName> {
        self.inner.list_web_search_components()
    }
}

/// Notes (global), browser (global + web) and mail (web) searchables.
#[allow(dead_code)]
#[fixture]
pub fn harness() -> Harness {
    searchables::tracing::init();
    Harness::new([
        app("com.example.notes", false, [searchable(1, true)]),
        app("com.example.browser", true, [searchable(2, true)]),
        app("com.example.mail", true, [searchable(3, false)]),
    ])
}

#[allow(dead_code)]
#[fixture]
pub fn empty_harness() -> Harness {
    searchables::tracing::init();
    Harness::new([])
}
