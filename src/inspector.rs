//! The seam between the registry and the platform's package manager.

use crate::error::InspectError;
use crate::metadata::MetadataElement;
use crate::types::ComponentName;

/// Read access to installed components and their declared metadata.
///
/// Implementations must be cheap to call repeatedly; the registry calls
/// [`list_searchable_components`](Self::list_searchable_components) once per
/// rebuild and the per-component methods once per listed component.
pub trait PackageInspector: Send + Sync {
    /// Components that declare searchable metadata, in a stable order.
    fn list_searchable_components(&self) -> Vec<ComponentName>;

    /// The raw metadata stream declared by `component`.
    fn raw_metadata(&self, component: &ComponentName) -> Result<Vec<MetadataElement>, InspectError>;

    /// The package that owns the content provider registered under `authority`.
    fn resolve_provider_owner(&self, authority: &str) -> Result<String, InspectError>;

    /// Components that handle web searches. Only searchable ones are considered
    /// by the registry.
    fn list_web_search_components(&self) -> Vec<ComponentName> {
        Vec::new()
    }
}
