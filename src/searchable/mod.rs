//! Searchable records: the value object, its action keys, the metadata parser
//! and the wire codec.

pub mod action_key;
pub mod info;
pub mod parser;
mod wire;

pub use action_key::{ActionKeyInfo, ActionKeyTable};
pub use info::{SearchMode, SearchableInfo, VoiceSearchMode};
pub use parser::{ACTION_KEY_ELEMENT, SEARCHABLE_ELEMENT, SearchableParser};
