//! The resolved, immutable description of one searchable component.

use super::action_key::{ActionKeyInfo, ActionKeyTable};
use crate::types::{ComponentName, DEFAULT_IME_OPTIONS, DEFAULT_INPUT_TYPE, KeyCode, ResourceId};
use serde::Serialize;

bitflags::bitflags! {
    /// Presentation flags packed into the `searchMode` attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SearchMode: i32 {
        const BADGE_LABEL = 0x04;
        const BADGE_ICON = 0x08;
        const QUERY_REWRITE_FROM_DATA = 0x10;
        const QUERY_REWRITE_FROM_TEXT = 0x20;
    }
}

impl SearchMode {
    /// Flag names accepted in declared metadata.
    pub const ATTRIBUTE_NAMES: &'static [(&'static str, i32)] = &[
        ("showSearchLabelAsBadge", Self::BADGE_LABEL.bits()),
        ("showSearchIconAsBadge", Self::BADGE_ICON.bits()),
        ("queryRewriteFromData", Self::QUERY_REWRITE_FROM_DATA.bits()),
        ("queryRewriteFromText", Self::QUERY_REWRITE_FROM_TEXT.bits()),
    ];
}

bitflags::bitflags! {
    /// Voice-search behavior packed into the `voiceSearchMode` attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VoiceSearchMode: i32 {
        const SHOW_BUTTON = 0x1;
        const LAUNCH_WEB_SEARCH = 0x2;
        const LAUNCH_RECOGNIZER = 0x4;
    }
}

impl VoiceSearchMode {
    /// Flag names accepted in declared metadata.
    pub const ATTRIBUTE_NAMES: &'static [(&'static str, i32)] = &[
        ("showVoiceSearchButton", Self::SHOW_BUTTON.bits()),
        ("launchWebSearch", Self::LAUNCH_WEB_SEARCH.bits()),
        ("launchRecognizer", Self::LAUNCH_RECOGNIZER.bits()),
    ];
}

/// Everything the search UI needs to know about a searchable component.
///
/// Resource references (`*_id`, `search_button_text`) are opaque handles that
/// must be resolved against the owning component's own resources.
///
/// Instances are produced by [`SearchableParser`](super::SearchableParser) or
/// decoded from bytes with [`SearchableInfo::from_bytes`], and are read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchableInfo {
    pub(super) searchable: bool,
    pub(super) label_id: ResourceId,
    pub(super) component: ComponentName,
    pub(super) hint_id: ResourceId,
    pub(super) search_mode: i32,
    pub(super) badge_label: bool,
    pub(super) badge_icon: bool,
    pub(super) query_rewrite_from_data: bool,
    pub(super) query_rewrite_from_text: bool,
    pub(super) icon_id: ResourceId,
    pub(super) search_button_text: ResourceId,
    pub(super) input_type: i32,
    pub(super) ime_options: i32,
    pub(super) include_in_global_search: bool,
    pub(super) suggest_authority: Option<String>,
    pub(super) suggest_path: Option<String>,
    pub(super) suggest_selection: Option<String>,
    pub(super) suggest_intent_action: Option<String>,
    pub(super) suggest_intent_data: Option<String>,
    pub(super) suggest_threshold: i32,
    pub(super) action_keys: ActionKeyTable,
    pub(super) suggest_provider_package: Option<String>,
    pub(super) voice_search_mode: i32,
    pub(super) voice_language_model_id: ResourceId,
    pub(super) voice_prompt_text_id: ResourceId,
    pub(super) voice_language_id: ResourceId,
    pub(super) voice_max_results: i32,
}

impl SearchableInfo {
    /// A record with every field at its default, not yet valid.
    pub(super) fn unconfigured(component: ComponentName) -> Self {
        Self {
            searchable: false,
            label_id: 0,
            component,
            hint_id: 0,
            search_mode: 0,
            badge_label: false,
            badge_icon: false,
            query_rewrite_from_data: false,
            query_rewrite_from_text: false,
            icon_id: 0,
            search_button_text: 0,
            input_type: DEFAULT_INPUT_TYPE,
            ime_options: DEFAULT_IME_OPTIONS,
            include_in_global_search: false,
            suggest_authority: None,
            suggest_path: None,
            suggest_selection: None,
            suggest_intent_action: None,
            suggest_intent_data: None,
            suggest_threshold: 0,
            action_keys: ActionKeyTable::new(),
            suggest_provider_package: None,
            voice_search_mode: 0,
            voice_language_model_id: 0,
            voice_prompt_text_id: 0,
            voice_language_id: 0,
            voice_max_results: 0,
        }
    }

    /// Derive the presentation flags from the packed search mode.
    ///
    /// The icon badge needs an icon to show, so it stays off without one.
    pub(super) fn apply_search_mode(&mut self) {
        let mode = self.search_mode();
        self.badge_label = mode.contains(SearchMode::BADGE_LABEL);
        self.badge_icon = mode.contains(SearchMode::BADGE_ICON) && self.icon_id != 0;
        self.query_rewrite_from_data = mode.contains(SearchMode::QUERY_REWRITE_FROM_DATA);
        self.query_rewrite_from_text = mode.contains(SearchMode::QUERY_REWRITE_FROM_TEXT);
    }

    /// True once the record carries enough metadata to be registered.
    pub const fn is_valid(&self) -> bool {
        self.searchable
    }

    pub const fn component(&self) -> &ComponentName {
        &self.component
    }

    /// User-visible name of the searchable context.
    pub const fn label_id(&self) -> ResourceId {
        self.label_id
    }

    /// Hint text shown in an empty search box, or 0.
    pub const fn hint_id(&self) -> ResourceId {
        self.hint_id
    }

    pub const fn icon_id(&self) -> ResourceId {
        self.icon_id
    }

    /// Replacement text for the "Search" button, or 0.
    pub const fn search_button_text(&self) -> ResourceId {
        self.search_button_text
    }

    /// Raw search mode, unknown bits included.
    pub const fn search_mode(&self) -> SearchMode {
        SearchMode::from_bits_retain(self.search_mode)
    }

    pub const fn badge_label(&self) -> bool {
        self.badge_label
    }

    pub const fn badge_icon(&self) -> bool {
        self.badge_icon
    }

    pub const fn query_rewrite_from_data(&self) -> bool {
        self.query_rewrite_from_data
    }

    pub const fn query_rewrite_from_text(&self) -> bool {
        self.query_rewrite_from_text
    }

    pub const fn input_type(&self) -> i32 {
        self.input_type
    }

    pub const fn ime_options(&self) -> i32 {
        self.ime_options
    }

    pub const fn include_in_global_search(&self) -> bool {
        self.include_in_global_search
    }

    /// Authority of the provider supplying suggestions.
    pub fn suggest_authority(&self) -> Option<&str> {
        self.suggest_authority.as_deref()
    }

    pub fn suggest_path(&self) -> Option<&str> {
        self.suggest_path.as_deref()
    }

    /// Selection pattern for suggestion queries, with a single `?` for the typed text.
    pub fn suggest_selection(&self) -> Option<&str> {
        self.suggest_selection.as_deref()
    }

    /// Default intent action for suggestions; individual suggestions may override it.
    pub fn suggest_intent_action(&self) -> Option<&str> {
        self.suggest_intent_action.as_deref()
    }

    /// Default intent data for suggestions; individual suggestions may override it.
    pub fn suggest_intent_data(&self) -> Option<&str> {
        self.suggest_intent_data.as_deref()
    }

    /// Minimum typed length before suggestions are queried.
    pub const fn suggest_threshold(&self) -> i32 {
        self.suggest_threshold
    }

    /// Package owning the suggestion provider, resolved once when the record was built.
    pub fn suggest_provider_package(&self) -> Option<&str> {
        self.suggest_provider_package.as_deref()
    }

    /// True when the suggestion provider lives in the searchable's own package,
    /// so the component's resources can be reused for it.
    pub fn provider_shares_package(&self) -> bool {
        self.suggest_provider_package.as_deref() == Some(self.component.package())
    }

    pub const fn action_keys(&self) -> &ActionKeyTable {
        &self.action_keys
    }

    /// The binding for `key_code`, if any.
    pub fn find_action_key(&self, key_code: KeyCode) -> Option<&ActionKeyInfo> {
        self.action_keys.find(key_code)
    }

    pub const fn voice_search_mode(&self) -> VoiceSearchMode {
        VoiceSearchMode::from_bits_retain(self.voice_search_mode)
    }

    pub const fn voice_search_enabled(&self) -> bool {
        self.voice_search_mode().contains(VoiceSearchMode::SHOW_BUTTON)
    }

    pub const fn voice_search_launch_web_search(&self) -> bool {
        self.voice_search_mode()
            .contains(VoiceSearchMode::LAUNCH_WEB_SEARCH)
    }

    pub const fn voice_search_launch_recognizer(&self) -> bool {
        self.voice_search_mode()
            .contains(VoiceSearchMode::LAUNCH_RECOGNIZER)
    }

    pub const fn voice_language_model_id(&self) -> ResourceId {
        self.voice_language_model_id
    }

    pub const fn voice_prompt_text_id(&self) -> ResourceId {
        self.voice_prompt_text_id
    }

    pub const fn voice_language_id(&self) -> ResourceId {
        self.voice_language_id
    }

    pub const fn voice_max_results(&self) -> i32 {
        self.voice_max_results
    }
}
