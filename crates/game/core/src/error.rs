//! Common error infrastructure for dungeon-rules.
//!
//! Domain-specific errors (`EffectError`, `CatalogError`, `BalanceError`) live
//! next to the modules that raise them. This module only provides the shared
//! severity classification used to decide how callers react.
//!
//! # Propagation Policy
//!
//! - **Content errors** (unknown effect ids, malformed tables) surface
//!   immediately. They indicate broken data, not a runtime condition.
//! - **Stale references** (an entity that no longer exists) are absorbed at
//!   the call boundary so a single entity never aborts a tick batch.
//! - **Self-healed states** (stack counts over the cap) are clamped in place
//!   and only logged.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the operation became a no-op; log and continue
/// - **Validation**: invalid input, reject without retry
/// - **Internal**: unexpected state inconsistency, self-healed where possible
/// - **Fatal**: broken content data, cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the operation was skipped.
    ///
    /// Examples: entity destroyed earlier in the turn
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: checkpoint table with duplicate floors
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: stack count above the definition cap
    Internal,

    /// Fatal error - content data is broken.
    ///
    /// Examples: effect id missing from the catalog
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or broken data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all dungeon-rules errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
