//! Immutable snapshot of every searchable component and the views derived from it.

use crate::config::RegistryOptions;
use crate::error::RegistryError;
use crate::inspector::PackageInspector;
use crate::searchable::{SearchableInfo, SearchableParser};
use crate::types::ComponentName;
use ahash::{AHashMap, AHashSet};
use std::sync::Arc;
use std::time::Instant;

/// One complete build of the searchable registry.
///
/// A snapshot is never modified after [`build`](Self::build); a rebuild
/// produces a new one. The identity map, both candidate lists and the default
/// web search target therefore always describe the same set of components.
#[derive(Debug, Clone, Default)]
pub struct SearchableRegistry {
    /// Parsed records keyed by component
    by_component: AHashMap<ComponentName, Arc<SearchableInfo>>,

    /// All records in build order
    ordered: Vec<Arc<SearchableInfo>>,

    /// Records that opted into global search, in build order
    global_search: Vec<Arc<SearchableInfo>>,

    /// Records whose component handles web searches, in build order
    web_search: Vec<Arc<SearchableInfo>>,

    default_web_search: Option<Arc<SearchableInfo>>,
}

impl SearchableRegistry {
    /// Parse `components` and derive all views.
    ///
    /// Components whose metadata can't be read, that aren't configured for
    /// search, or that repeat an earlier identity are skipped. The default web
    /// search target is `default_override` if registered, then the configured
    /// preference if it is a web candidate, then the first web candidate.
    pub fn build(
        components: &[ComponentName],
        inspector: &dyn PackageInspector,
        options: &RegistryOptions,
        default_override: Option<&ComponentName>,
    ) -> Self {
        let start = Instant::now();
        let parser = SearchableParser::new(inspector).inhibit_suggestions(options.inhibit_suggestions);

        let mut by_component = AHashMap::with_capacity(components.len());
        let mut ordered = Vec::with_capacity(components.len());

        for component in components {
            if by_component.contains_key(component) {
                tracing::debug!("Ignoring duplicate component {}", component.flatten_to_short_string());
                continue;
            }

            let elements = match inspector.raw_metadata(component) {
                Ok(elements) => elements,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", component.flatten_to_short_string(), e);
                    continue;
                }
            };

            let Some(info) = parser.parse(&elements, component) else {
                continue;
            };

            let info = Arc::new(info);
            by_component.insert(component.clone(), Arc::clone(&info));
            ordered.push(info);
        }

        let global_search = ordered
            .iter()
            .filter(|info| info.include_in_global_search())
            .cloned()
            .collect();

        let web_handlers: AHashSet<ComponentName> = inspector.list_web_search_components().into_iter().collect();
        let web_search = ordered
            .iter()
            .filter(|info| web_handlers.contains(info.component()))
            .cloned()
            .collect();

        let mut registry = Self {
            by_component,
            ordered,
            global_search,
            web_search,
            default_web_search: None,
        };
        registry.default_web_search =
            registry.resolve_default_web_search(default_override, options.default_web_search.as_ref());

        tracing::info!(
            "Built searchable registry: {} searchables ({} global, {} web) in {:?}",
            registry.ordered.len(),
            registry.global_search.len(),
            registry.web_search.len(),
            start.elapsed()
        );

        registry
    }

    fn resolve_default_web_search(
        &self,
        explicit: Option<&ComponentName>,
        preferred: Option<&ComponentName>,
    ) -> Option<Arc<SearchableInfo>> {
        explicit
            .and_then(|component| self.get(component))
            .or_else(|| {
                preferred.and_then(|component| {
                    self.web_search
                        .iter()
                        .find(|info| info.component() == component)
                })
            })
            .or_else(|| self.web_search.first())
            .cloned()
    }

    /// A copy of this snapshot with a different default web search target.
    pub fn with_default_web_search(&self, component: &ComponentName) -> Result<Self, RegistryError> {
        let target = self
            .get(component)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered(component.clone()))?;

        Ok(Self {
            default_web_search: Some(target),
            ..self.clone()
        })
    }

    pub fn get(&self, component: &ComponentName) -> Option<&Arc<SearchableInfo>> {
        self.by_component.get(component)
    }

    pub fn contains(&self, component: &ComponentName) -> bool {
        self.by_component.contains_key(component)
    }

    pub fn global_search_candidates(&self) -> &[Arc<SearchableInfo>] {
        &self.global_search
    }

    pub fn web_search_candidates(&self) -> &[Arc<SearchableInfo>] {
        &self.web_search
    }

    pub fn default_web_search(&self) -> Option<&Arc<SearchableInfo>> {
        self.default_web_search.as_ref()
    }

    /// All records in build order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<SearchableInfo>> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataElement;
    use crate::packages::{ActivityManifest, InstalledPackages, PackageManifest};
    use assert2::{check, let_assert};

    fn searchable(label: i32, global: bool) -> Vec<MetadataElement> {
        vec![
            MetadataElement::new("searchable")
                .with("label", label)
                .with("includeInGlobalSearch", global),
        ]
    }

    fn package(name: &str, activities: Vec<ActivityManifest>) -> PackageManifest {
        activities
            .into_iter()
            .fold(PackageManifest::new(name), PackageManifest::with_activity)
    }

    fn installed() -> InstalledPackages {
        InstalledPackages::from_manifests([
            package(
                "com.example.notes",
                vec![
                    ActivityManifest::new(".Search").with_metadata(searchable(1, true)),
                    ActivityManifest::new(".Broken").with_metadata(searchable(0, true)),
                ],
            ),
            package(
                "com.example.browser",
                vec![
                    ActivityManifest::new(".WebSearch")
                        .web_search(true)
                        .with_metadata(searchable(2, true)),
                ],
            ),
            package(
                "com.example.mail",
                vec![
                    ActivityManifest::new(".Find").with_metadata(searchable(3, false)),
                    ActivityManifest::new(".AltWeb")
                        .web_search(true)
                        .with_metadata(searchable(4, false)),
                ],
            ),
        ])
    }

    fn build(inspector: &InstalledPackages, options: &RegistryOptions, explicit: Option<&ComponentName>) -> SearchableRegistry {
        SearchableRegistry::build(&inspector.list_searchable_components(), inspector, options, explicit)
    }

    fn components(infos: &[Arc<SearchableInfo>]) -> Vec<String> {
        infos.iter().map(|i| i.component().flatten_to_short_string()).collect()
    }

    #[test]
    fn test_build_skips_unconfigured_components() {
        let inspector = installed();
        let registry = build(&inspector, &RegistryOptions::default(), None);

        check!(registry.len() == 4);
        check!(!registry.contains(&ComponentName::new("com.example.notes", ".Broken")));
        check!(registry.iter().all(|info| info.is_valid()));
    }

    #[test]
    fn test_global_candidates_in_build_order() {
        let inspector = installed();
        let registry = build(&inspector, &RegistryOptions::default(), None);

        check!(
            components(registry.global_search_candidates())
                == vec!["com.example.notes/.Search", "com.example.browser/.WebSearch"]
        );
    }

    #[test]
    fn test_web_candidates_and_default() {
        let inspector = installed();
        let registry = build(&inspector, &RegistryOptions::default(), None);

        check!(
            components(registry.web_search_candidates())
                == vec!["com.example.browser/.WebSearch", "com.example.mail/.AltWeb"]
        );
        let_assert!(Some(default) = registry.default_web_search());
        check!(default.component() == &ComponentName::new("com.example.browser", ".WebSearch"));
    }

    #[test]
    fn test_configured_default_web_search() {
        let inspector = installed();
        let options = RegistryOptions {
            default_web_search: Some(ComponentName::new("com.example.mail", ".AltWeb")),
            ..RegistryOptions::default()
        };
        let registry = build(&inspector, &options, None);

        let_assert!(Some(default) = registry.default_web_search());
        check!(default.label_id() == 4);
    }

    #[test]
    fn test_configured_default_must_handle_web_search() {
        let inspector = installed();
        let options = RegistryOptions {
            default_web_search: Some(ComponentName::new("com.example.mail", ".Find")),
            ..RegistryOptions::default()
        };
        let registry = build(&inspector, &options, None);

        let_assert!(Some(default) = registry.default_web_search());
        check!(default.label_id() == 2);
    }

    #[test]
    fn test_explicit_default_wins() {
        let inspector = installed();
        let explicit = ComponentName::new("com.example.notes", ".Search");
        let registry = build(&inspector, &RegistryOptions::default(), Some(&explicit));

        let_assert!(Some(default) = registry.default_web_search());
        check!(default.component() == &explicit);
    }

    #[test]
    fn test_with_default_web_search() {
        let inspector = installed();
        let registry = build(&inspector, &RegistryOptions::default(), None);

        let target = ComponentName::new("com.example.mail", ".Find");
        let_assert!(Ok(updated) = registry.with_default_web_search(&target));
        check!(updated.default_web_search().map(|i| i.component()) == Some(&target));
        check!(updated.len() == registry.len());

        let unknown = ComponentName::new("org.unknown", ".Nope");
        let_assert!(Err(RegistryError::NotRegistered(name)) = registry.with_default_web_search(&unknown));
        check!(name == unknown);
    }

    #[test]
    fn test_missing_metadata_does_not_abort_build() {
        let inspector = installed();
        let mut listed = inspector.list_searchable_components();
        listed.insert(0, ComponentName::new("com.example.gone", ".Search"));

        let registry = SearchableRegistry::build(&listed, &inspector, &RegistryOptions::default(), None);
        check!(registry.len() == 4);
    }

    #[test]
    fn test_duplicate_components_are_registered_once() {
        let inspector = installed();
        let mut listed = inspector.list_searchable_components();
        listed.push(listed[0].clone());

        let registry = SearchableRegistry::build(&listed, &inspector, &RegistryOptions::default(), None);
        check!(registry.len() == 4);
        check!(registry.global_search_candidates().len() == 2);
    }

    #[test]
    fn test_empty_registry() {
        let inspector = InstalledPackages::new();
        let registry = build(&inspector, &RegistryOptions::default(), None);
        check!(registry.is_empty());
        check!(registry.default_web_search().is_none());
        check!(registry.web_search_candidates().is_empty());
    }
}
