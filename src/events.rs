//! Package lifecycle events in, change notifications out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageEventKind {
    Added,
    Removed,
    Changed,
}

impl fmt::Display for PackageEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        };
        f.write_str(name)
    }
}

/// A notification from the system event stream.
///
/// The registry always rescans everything; `package` is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEvent {
    pub kind: PackageEventKind,
    pub package: String,
}

impl PackageEvent {
    pub fn added(package: impl Into<String>) -> Self {
        Self {
            kind: PackageEventKind::Added,
            package: package.into(),
        }
    }

    pub fn removed(package: impl Into<String>) -> Self {
        Self {
            kind: PackageEventKind::Removed,
            package: package.into(),
        }
    }

    pub fn changed(package: impl Into<String>) -> Self {
        Self {
            kind: PackageEventKind::Changed,
            package: package.into(),
        }
    }
}

impl fmt::Display for PackageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.package)
    }
}

/// Broadcast after every rebuild or default change. Carries no payload;
/// subscribers re-query what they need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchablesChanged;
