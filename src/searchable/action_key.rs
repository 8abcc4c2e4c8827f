//! Action-key bindings attached to a searchable component.

use crate::types::KeyCode;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A key that, pressed while the searchable has focus, fires a predefined
/// query or suggestion message instead of typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionKeyInfo {
    pub key_code: KeyCode,
    /// Message sent with a query launched from the search box
    pub query_action_msg: Option<String>,
    /// Message sent when a suggestion is selected
    pub suggest_action_msg: Option<String>,
    /// Suggestion column holding a per-suggestion message
    pub suggest_action_msg_column: Option<String>,
}

impl ActionKeyInfo {
    /// Returns false when the binding has no key or no message to deliver.
    pub const fn is_usable(&self) -> bool {
        self.key_code != 0
            && (self.query_action_msg.is_some()
                || self.suggest_action_msg.is_some()
                || self.suggest_action_msg_column.is_some())
    }
}

/// Prepend-only sequence of action keys.
///
/// Bindings are scanned front to back, and each new binding goes to the
/// front, so for duplicate key codes the most recently declared binding wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionKeyTable {
    entries: VecDeque<ActionKeyInfo>,
}

impl ActionKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding at the head of the table.
    ///
    /// Returns false, leaving the table unchanged, if the binding is unusable.
    pub fn prepend(
        &mut self,
        key_code: KeyCode,
        query_action_msg: Option<String>,
        suggest_action_msg: Option<String>,
        suggest_action_msg_column: Option<String>,
    ) -> bool {
        self.push_front(ActionKeyInfo {
            key_code,
            query_action_msg,
            suggest_action_msg,
            suggest_action_msg_column,
        })
    }

    pub(crate) fn push_front(&mut self, info: ActionKeyInfo) -> bool {
        if !info.is_usable() {
            return false;
        }
        self.entries.push_front(info);
        true
    }

    /// First binding for `key_code` in scan order.
    pub fn find(&self, key_code: KeyCode) -> Option<&ActionKeyInfo> {
        self.entries.iter().find(|info| info.key_code == key_code)
    }

    /// Bindings in scan order (most recently declared first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActionKeyInfo> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
