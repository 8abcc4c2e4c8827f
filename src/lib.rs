pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod inspector;
pub mod manager;
pub mod metadata;
pub mod packages;
pub mod registry;
pub mod searchable;
pub mod tracing;
pub mod types;

pub use config::{Config, RegistryOptions};
pub use error::{InspectError, RegistryError, WireError};
pub use events::{PackageEvent, PackageEventKind, SearchablesChanged};
pub use inspector::PackageInspector;
pub use manager::SearchManager;
pub use metadata::{AttributeValue, MetadataElement};
pub use packages::{ActivityManifest, InstalledPackages, PackageManifest};
pub use registry::SearchableRegistry;
pub use searchable::{ActionKeyInfo, ActionKeyTable, SearchMode, SearchableInfo, SearchableParser, VoiceSearchMode};
pub use types::{ComponentName, KeyCode, ResourceId};
