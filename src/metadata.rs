//! Raw component metadata: the attribute stream a package inspector hands back.
//!
//! Metadata is a flat sequence of named elements, each carrying a bag of
//! attributes. Values are loosely typed the way declarative metadata usually is,
//! so the getters here coerce (`"0x7f040001"` is a valid resource reference,
//! `"queryRewriteFromText|showSearchLabelAsBadge"` a valid flag set).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single attribute value as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One element of a metadata stream, e.g. `searchable` or `actionkey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataElement {
    /// Element name
    #[serde(rename = "element")]
    pub name: String,

    /// Declared attributes, keyed by attribute name
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl MetadataElement {
    /// Create an element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Raw attribute lookup.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Integer attribute. Strings holding decimal or `0x` hex integers are accepted.
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            AttributeValue::Int(value) => i32::try_from(*value).ok(),
            AttributeValue::Str(s) => parse_int(s),
            AttributeValue::Bool(_) => None,
        }
    }

    /// Integer attribute with a default for absent or unreadable values.
    pub fn int_or(&self, name: &str, default: i32) -> i32 {
        self.int(name).unwrap_or(default)
    }

    /// Resource reference attribute; `0` when absent.
    pub fn resource_id(&self, name: &str) -> crate::types::ResourceId {
        self.int_or(name, 0)
    }

    /// String attribute. Empty strings count as absent.
    pub fn string(&self, name: &str) -> Option<String> {
        let value = match self.get(name)? {
            AttributeValue::Str(s) => s.clone(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Bool(b) => b.to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    /// Boolean attribute with a default.
    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(AttributeValue::Bool(b)) => *b,
            Some(AttributeValue::Int(i)) => *i != 0,
            Some(AttributeValue::Str(s)) => match s.trim() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            None => default,
        }
    }

    /// Flag-set attribute: an integer, or `|`-separated flag names resolved via `names`.
    ///
    /// Unknown flag names are logged and contribute nothing.
    pub fn flags(&self, name: &str, names: &[(&str, i32)]) -> i32 {
        match self.get(name) {
            Some(AttributeValue::Str(s)) => {
                if let Some(value) = parse_int(s) {
                    return value;
                }
                s.split('|')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .fold(0, |bits, flag| {
                        match names.iter().find(|(known, _)| *known == flag) {
                            Some((_, bit)) => bits | bit,
                            None => {
                                tracing::debug!("Ignoring unknown flag '{}' in {}", flag, name);
                                bits
                            }
                        }
                    })
            }
            _ => self.int_or(name, 0),
        }
    }
}

fn parse_int(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        // Resource ids live in the high range, so read as u32 and reinterpret
        return u32::from_str_radix(hex, 16).ok().map(|v| v as i32);
    }
    s.parse().ok()
}
