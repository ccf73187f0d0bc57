//! Progression balance engine.
//!
//! Converts a floor number into scaled enemy and boss stats, player stat
//! requirements and risk estimates, all driven by [`BalanceCurves`].
mod checkpoints;
mod curves;
mod engine;
mod error;
mod stats;

pub use checkpoints::{Checkpoint, CheckpointTable};
pub use curves::{BalanceCurves, BossAbilityUnlock, ExtrapolationCoefficients};
pub use engine::BalanceCurveEngine;
pub use error::BalanceError;
pub use stats::{
    BossStats, EnemyStats, ItemStats, LoadoutAdvice, PlayerStats, Requirements, ScaledStats,
    Shortfall, StatDimension,
};
