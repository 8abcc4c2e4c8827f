//! Error handling types and utilities.

use crate::types::{ComponentName, KeyCode, ResourceId};

/// A specialized Result type for application-level operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods when loading configuration and manifests.
pub type Result<T> = anyhow::Result<T>;

/// Errors reported by a [`PackageInspector`](crate::inspector::PackageInspector).
///
/// Both are per-component failures: a rebuild logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    /// The component's metadata could not be read (e.g. removed mid-scan).
    #[error("metadata unavailable for {0}")]
    MetadataUnavailable(ComponentName),
    /// No installed provider owns the suggestion authority.
    #[error("no provider found for authority '{0}'")]
    ProviderNotFound(String),
}

/// Error returned when a [`SearchableInfo`](crate::SearchableInfo) cannot be encoded or decoded.
///
/// These indicate a wire-format or version mismatch and are never papered over
/// with defaults.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The stream ended early, a count disagreed with the data, or a field was unreadable.
    #[error("searchable record codec error: {0}")]
    Codec(#[from] postcard::Error),
    /// The record decoded but bytes were left over.
    #[error("searchable record has {0} trailing bytes")]
    TrailingBytes(usize),
    /// The validity flag disagrees with the label reference.
    #[error("searchable record validity flag disagrees with label id {label_id}")]
    ValidityMismatch { label_id: ResourceId },
    /// An action-key record has no key code or no message.
    #[error("searchable record carries unusable action key {0}")]
    UnusableActionKey(KeyCode),
}

/// Errors surfaced by registry administration calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The component is not a registered searchable.
    #[error("{0} is not a registered searchable component")]
    NotRegistered(ComponentName),
}
