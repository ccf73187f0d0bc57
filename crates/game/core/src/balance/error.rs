use crate::error::{ErrorSeverity, GameError};

/// Errors raised while validating balance data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BalanceError {
    #[error("more than one checkpoint is defined for floor {0}")]
    DuplicateCheckpoint(u32),

    /// A growth factor or multiplier is not a finite positive number.
    #[error("curve '{name}' must be finite and positive, got {value}")]
    InvalidCurve { name: &'static str, value: f64 },

    /// An interval used as a divisor is zero.
    #[error("interval '{0}' must be greater than zero")]
    ZeroInterval(&'static str),
}

impl GameError for BalanceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCheckpoint(_) => "BALANCE_DUPLICATE_CHECKPOINT",
            Self::InvalidCurve { .. } => "BALANCE_INVALID_CURVE",
            Self::ZeroInterval(_) => "BALANCE_ZERO_INTERVAL",
        }
    }
}
