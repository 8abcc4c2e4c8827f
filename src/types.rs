//! Identity and handle types shared across the registry.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque handle into the owning component's resources.
///
/// The registry never interprets these; `0` means "not specified".
pub type ResourceId = i32;

/// Platform key code used by action-key bindings.
pub type KeyCode = i32;

/// Input type used when a searchable does not declare one: plain text class,
/// normal variation.
pub const DEFAULT_INPUT_TYPE: i32 = TYPE_CLASS_TEXT | TYPE_TEXT_VARIATION_NORMAL;

/// IME options used when a searchable does not declare any: the "search" action.
pub const DEFAULT_IME_OPTIONS: i32 = IME_ACTION_SEARCH;

const TYPE_CLASS_TEXT: i32 = 0x0000_0001;
const TYPE_TEXT_VARIATION_NORMAL: i32 = 0x0000_0000;
const IME_ACTION_SEARCH: i32 = 0x0000_0003;

/// Fully qualified identity of an application component (package + class).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentName {
    package: String,
    class: String,
}

impl ComponentName {
    /// Create a component name. A class starting with `.` is relative to the package.
    pub fn new(package: impl Into<String>, class: impl AsRef<str>) -> Self {
        let package = package.into();
        let class = class.as_ref();
        let class = if class.starts_with('.') {
            format!("{}{}", package, class)
        } else {
            class.to_string()
        };
        Self { package, class }
    }

    /// Package that owns the component.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Fully qualified class name.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Short form used in diagnostics: `pkg/.Class` when the class lives inside the package.
    pub fn flatten_to_short_string(&self) -> String {
        match self
            .class
            .strip_prefix(self.package.as_str())
            .filter(|rest| rest.starts_with('.'))
        {
            Some(rest) => format!("{}/{}", self.package, rest),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

impl FromStr for ComponentName {
    type Err = ParseComponentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (package, class) = s
            .split_once('/')
            .ok_or_else(|| ParseComponentError::MissingSeparator(s.to_string()))?;

        if package.is_empty() {
            return Err(ParseComponentError::EmptyPackage(s.to_string()));
        }
        if class.is_empty() || class == "." {
            return Err(ParseComponentError::EmptyClass(s.to_string()));
        }

        Ok(Self::new(package, class))
    }
}

impl Serialize for ComponentName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComponentName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for component name parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseComponentError {
    #[error("component name '{0}' is missing the '/' separator")]
    MissingSeparator(String),
    #[error("component name '{0}' has an empty package")]
    EmptyPackage(String),
    #[error("component name '{0}' has an empty class")]
    EmptyClass(String),
}
