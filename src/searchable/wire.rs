//! Binary form of a [`SearchableInfo`] for handing records across a process boundary.
//!
//! The record is a fixed, ordered sequence of fields encoded with postcard:
//!
//! | # | Field |
//! |---|---|
//! | 1 | validity flag |
//! | 2 | label ref |
//! | 3 | component identity |
//! | 4-9 | hint ref, search mode, icon ref, button-text ref, input type, IME options |
//! | 10 | include-in-global-search flag |
//! | 11-15 | suggestion authority, path, selection, intent action, intent data |
//! | 16 | suggestion threshold |
//! | 17 | action-key count, then that many `(key, query, suggest, column)` records |
//! | 18 | suggestion provider package |
//! | 19-23 | voice mode, language model ref, prompt text ref, language ref, max results |
//!
//! Every field is always present; absent strings carry an explicit "none" tag.
//! Action keys are written oldest declaration first and prepended back on
//! decode, so the decoded table scans in the same order as the encoded one.

use super::action_key::{ActionKeyInfo, ActionKeyTable};
use super::info::SearchableInfo;
use crate::error::WireError;
use crate::types::{ComponentName, KeyCode, ResourceId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct WireActionKey {
    key_code: KeyCode,
    query_action_msg: Option<String>,
    suggest_action_msg: Option<String>,
    suggest_action_msg_column: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireRecord {
    searchable: bool,
    label_id: ResourceId,
    component: ComponentName,
    hint_id: ResourceId,
    search_mode: i32,
    icon_id: ResourceId,
    search_button_text: ResourceId,
    input_type: i32,
    ime_options: i32,
    include_in_global_search: bool,
    suggest_authority: Option<String>,
    suggest_path: Option<String>,
    suggest_selection: Option<String>,
    suggest_intent_action: Option<String>,
    suggest_intent_data: Option<String>,
    suggest_threshold: i32,
    action_keys: Vec<WireActionKey>,
    suggest_provider_package: Option<String>,
    voice_search_mode: i32,
    voice_language_model_id: ResourceId,
    voice_prompt_text_id: ResourceId,
    voice_language_id: ResourceId,
    voice_max_results: i32,
}

impl From<&SearchableInfo> for WireRecord {
    fn from(info: &SearchableInfo) -> Self {
        Self {
            searchable: info.searchable,
            label_id: info.label_id,
            component: info.component.clone(),
            hint_id: info.hint_id,
            search_mode: info.search_mode,
            icon_id: info.icon_id,
            search_button_text: info.search_button_text,
            input_type: info.input_type,
            ime_options: info.ime_options,
            include_in_global_search: info.include_in_global_search,
            suggest_authority: info.suggest_authority.clone(),
            suggest_path: info.suggest_path.clone(),
            suggest_selection: info.suggest_selection.clone(),
            suggest_intent_action: info.suggest_intent_action.clone(),
            suggest_intent_data: info.suggest_intent_data.clone(),
            suggest_threshold: info.suggest_threshold,
            // Oldest declaration first; decode prepends, restoring scan order
            action_keys: info
                .action_keys
                .iter()
                .rev()
                .map(|key| WireActionKey {
                    key_code: key.key_code,
                    query_action_msg: key.query_action_msg.clone(),
                    suggest_action_msg: key.suggest_action_msg.clone(),
                    suggest_action_msg_column: key.suggest_action_msg_column.clone(),
                })
                .collect(),
            suggest_provider_package: info.suggest_provider_package.clone(),
            voice_search_mode: info.voice_search_mode,
            voice_language_model_id: info.voice_language_model_id,
            voice_prompt_text_id: info.voice_prompt_text_id,
            voice_language_id: info.voice_language_id,
            voice_max_results: info.voice_max_results,
        }
    }
}

impl TryFrom<WireRecord> for SearchableInfo {
    type Error = WireError;

    fn try_from(record: WireRecord) -> Result<Self, Self::Error> {
        if record.searchable != (record.label_id != 0) {
            return Err(WireError::ValidityMismatch {
                label_id: record.label_id,
            });
        }

        let mut action_keys = ActionKeyTable::new();
        for key in record.action_keys {
            let key_code = key.key_code;
            let accepted = action_keys.push_front(ActionKeyInfo {
                key_code,
                query_action_msg: key.query_action_msg,
                suggest_action_msg: key.suggest_action_msg,
                suggest_action_msg_column: key.suggest_action_msg_column,
            });
            if !accepted {
                return Err(WireError::UnusableActionKey(key_code));
            }
        }

        let mut info = Self {
            searchable: record.searchable,
            label_id: record.label_id,
            component: record.component,
            hint_id: record.hint_id,
            search_mode: record.search_mode,
            badge_label: false,
            badge_icon: false,
            query_rewrite_from_data: false,
            query_rewrite_from_text: false,
            icon_id: record.icon_id,
            search_button_text: record.search_button_text,
            input_type: record.input_type,
            ime_options: record.ime_options,
            include_in_global_search: record.include_in_global_search,
            suggest_authority: record.suggest_authority,
            suggest_path: record.suggest_path,
            suggest_selection: record.suggest_selection,
            suggest_intent_action: record.suggest_intent_action,
            suggest_intent_data: record.suggest_intent_data,
            suggest_threshold: record.suggest_threshold,
            action_keys,
            suggest_provider_package: record.suggest_provider_package,
            voice_search_mode: record.voice_search_mode,
            voice_language_model_id: record.voice_language_model_id,
            voice_prompt_text_id: record.voice_prompt_text_id,
            voice_language_id: record.voice_language_id,
            voice_max_results: record.voice_max_results,
        };
        info.apply_search_mode();
        Ok(info)
    }
}

impl SearchableInfo {
    /// Encode the record in its wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        Ok(postcard::to_stdvec(&WireRecord::from(self))?)
    }

    /// Decode a record written by [`to_bytes`](Self::to_bytes).
    ///
    /// The whole buffer must be consumed by exactly one record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let (record, rest): (WireRecord, _) = postcard::take_from_bytes(bytes)?;
        if !rest.is_empty() {
            return Err(WireError::TrailingBytes(rest.len()));
        }
        Self::try_from(record)
    }
}
