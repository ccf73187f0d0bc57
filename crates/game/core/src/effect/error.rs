//! Effect resolution and catalog errors.

use crate::effect::EffectId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

/// Errors raised by effect resolution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// The effect id is not registered in the catalog.
    ///
    /// Indicates broken content data. Never silently ignored.
    #[error("effect '{0}' is not registered in the catalog")]
    UnknownEffect(EffectId),

    /// The entity is not registered in the ledger (destroyed or stale id).
    ///
    /// The operation was a no-op.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// An entry violated the stack/duration invariants.
    ///
    /// Only used for logging: the resolver clamps the entry and continues.
    #[error("effect '{effect}' on entity {entity} has invalid stack state ({stacks}/{max_stacks})")]
    InvalidStackState {
        entity: EntityId,
        effect: EffectId,
        stacks: u32,
        max_stacks: u32,
    },
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEffect(_) => ErrorSeverity::Fatal,
            Self::EntityNotFound(_) => ErrorSeverity::Recoverable,
            Self::InvalidStackState { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffect(_) => "EFFECT_UNKNOWN",
            Self::EntityNotFound(_) => "EFFECT_ENTITY_NOT_FOUND",
            Self::InvalidStackState { .. } => "EFFECT_INVALID_STACK_STATE",
        }
    }
}

/// Errors raised while assembling a catalog from content data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("effect '{0}' is defined more than once")]
    DuplicateEffect(EffectId),

    #[error("{context} references unknown effect '{effect}'")]
    UnknownReference {
        context: &'static str,
        effect: EffectId,
    },

    #[error("effect '{0}' cannot cancel itself")]
    SelfCancellation(EffectId),

    #[error("synergy granting '{0}' needs at least two required effects")]
    DegenerateSynergy(EffectId),
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEffect(_) => "CATALOG_DUPLICATE_EFFECT",
            Self::UnknownReference { .. } => "CATALOG_UNKNOWN_REFERENCE",
            Self::SelfCancellation(_) => "CATALOG_SELF_CANCELLATION",
            Self::DegenerateSynergy(_) => "CATALOG_DEGENERATE_SYNERGY",
        }
    }
}
