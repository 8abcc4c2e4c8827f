//! Builds [`SearchableInfo`] records from a component's raw metadata stream.

use super::action_key::ActionKeyInfo;
use super::info::{SearchMode, SearchableInfo, VoiceSearchMode};
use crate::inspector::PackageInspector;
use crate::metadata::MetadataElement;
use crate::types::{ComponentName, DEFAULT_IME_OPTIONS, DEFAULT_INPUT_TYPE};

/// Element that starts a searchable declaration.
pub const SEARCHABLE_ELEMENT: &str = "searchable";

/// Element that declares an action key inside a searchable declaration.
pub const ACTION_KEY_ELEMENT: &str = "actionkey";

/// Parses searchable declarations.
///
/// The parser borrows the package inspector only to resolve the package that
/// owns a suggestion authority; everything else comes from the metadata stream.
#[derive(Clone, Copy)]
pub struct SearchableParser<'a> {
    inspector: &'a dyn PackageInspector,
    inhibit_suggestions: bool,
}

impl<'a> SearchableParser<'a> {
    pub fn new(inspector: &'a dyn PackageInspector) -> Self {
        Self {
            inspector,
            inhibit_suggestions: false,
        }
    }

    /// Drop all suggestion configuration from parsed records.
    #[must_use]
    pub fn inhibit_suggestions(mut self, inhibit: bool) -> Self {
        self.inhibit_suggestions = inhibit;
        self
    }

    /// Walk `elements` and build the searchable record for `component`.
    ///
    /// Returns `None` when the component is not configured for search: no
    /// `searchable` element, a label of 0, or an `actionkey` that appears before
    /// any `searchable` element.
    pub fn parse(&self, elements: &[MetadataElement], component: &ComponentName) -> Option<SearchableInfo> {
        let mut result: Option<SearchableInfo> = None;

        for element in elements {
            match element.name.as_str() {
                SEARCHABLE_ELEMENT => {
                    let info = self.parse_searchable(element, component);
                    if !info.is_valid() {
                        return None;
                    }
                    result = Some(info);
                }
                ACTION_KEY_ELEMENT => {
                    // An action key can't be processed without its enclosing searchable
                    let Some(info) = result.as_mut() else {
                        tracing::debug!(
                            "Action key declared before searchable in {}",
                            component.flatten_to_short_string()
                        );
                        return None;
                    };
                    self.fold_action_key(info, element, component);
                }
                other => {
                    tracing::trace!("Skipping metadata element '{}'", other);
                }
            }
        }

        if result.is_none() {
            tracing::debug!(
                "No searchable element in metadata for {}",
                component.flatten_to_short_string()
            );
        }
        result
    }

    fn parse_searchable(&self, element: &MetadataElement, component: &ComponentName) -> SearchableInfo {
        let mut info = SearchableInfo::unconfigured(component.clone());

        info.search_mode = element.flags("searchMode", SearchMode::ATTRIBUTE_NAMES);
        info.label_id = element.resource_id("label");
        info.hint_id = element.resource_id("hint");
        info.icon_id = element.resource_id("icon");
        info.search_button_text = element.resource_id("searchButtonText");
        info.input_type = element.int_or("inputType", DEFAULT_INPUT_TYPE);
        info.ime_options = element.int_or("imeOptions", DEFAULT_IME_OPTIONS);
        info.include_in_global_search = element.bool_or("includeInGlobalSearch", false);
        info.apply_search_mode();

        if !self.inhibit_suggestions {
            info.suggest_authority = element.string("searchSuggestAuthority");
            info.suggest_path = element.string("searchSuggestPath");
            info.suggest_selection = element.string("searchSuggestSelection");
            info.suggest_intent_action = element.string("searchSuggestIntentAction");
            info.suggest_intent_data = element.string("searchSuggestIntentData");
            info.suggest_threshold = element.int_or("searchSuggestThreshold", 0);
        }

        info.voice_search_mode = element.flags("voiceSearchMode", VoiceSearchMode::ATTRIBUTE_NAMES);
        info.voice_language_model_id = element.resource_id("voiceLanguageModel");
        info.voice_prompt_text_id = element.resource_id("voicePromptText");
        info.voice_language_id = element.resource_id("voiceLanguage");
        info.voice_max_results = element.int_or("voiceMaxResults", 0);

        if let Some(authority) = info.suggest_authority.as_deref() {
            match self.inspector.resolve_provider_owner(authority) {
                Ok(package) => info.suggest_provider_package = Some(package),
                Err(e) => tracing::debug!(
                    "Suggestions for {} unresolved: {}",
                    component.flatten_to_short_string(),
                    e
                ),
            }
        }

        if info.label_id != 0 {
            info.searchable = true;
        } else {
            tracing::warn!(
                "Insufficient metadata to configure searchability for {}",
                component.flatten_to_short_string()
            );
        }

        info
    }

    fn fold_action_key(&self, info: &mut SearchableInfo, element: &MetadataElement, component: &ComponentName) {
        let (suggest_action_msg, suggest_action_msg_column) = if self.inhibit_suggestions {
            (None, None)
        } else {
            (
                element.string("suggestActionMsg"),
                element.string("suggestActionMsgColumn"),
            )
        };

        let key = ActionKeyInfo {
            key_code: element.int_or("keycode", 0),
            query_action_msg: element.string("queryActionMsg"),
            suggest_action_msg,
            suggest_action_msg_column,
        };
        let key_code = key.key_code;

        if !info.action_keys.push_front(key) {
            tracing::debug!(
                "Dropping unusable action key {} for {}",
                key_code,
                component.flatten_to_short_string()
            );
        }
    }
}
