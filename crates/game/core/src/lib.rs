//! Deterministic rules core for the dungeon-crawler.
//!
//! `dungeon-rules` owns the two engines every other game system consumes:
//!
//! - the effect resolution engine ([`effect::EffectResolver`]), which applies,
//!   stacks, ticks and expires status conditions recorded in per-entity
//!   [`state::ConditionTrack`]s, and
//! - the progression balance engine ([`balance::BalanceCurveEngine`]), which
//!   derives floor-scaled combat numbers from read-only curve tables.
//!
//! Read-only data (catalog, curves, RNG, stat provider) reaches the engines
//! through an explicit [`env::RulesEnv`] owned by the surrounding game loop.
pub mod balance;
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod state;

pub use balance::{
    BalanceCurveEngine, BalanceCurves, BalanceError, BossAbilityUnlock, BossStats, Checkpoint,
    CheckpointTable, EnemyStats, ExtrapolationCoefficients, ItemStats, LoadoutAdvice, PlayerStats,
    Requirements, ScaledStats, Shortfall, StatDimension,
};
pub use combat::{effective_boss_stats, effective_enemy_stats, mitigated_damage};
pub use config::RulesConfig;
pub use effect::{
    ActionCondition, ActionKind, ActionTarget, Allegiance, ApplyOutcome, ApplyResult,
    CancellationPair, CatalogError, CleanseFilter, EffectAction, EffectCatalog, EffectDefinition,
    EffectError, EffectId, EffectKind, EffectResolver, Modifier, ModifierKind, NetModifier,
    ResolvedTarget, StackingPolicy, StackingRule, StaticEffectCatalog, SynergyRule,
    TriggerContext, TriggerEvent, TriggeredAction, Triggers,
};
pub use env::{
    EntityStats, PcgRng, RngOracle, RulesEnv, SnapshotStatsOracle, StatsOracle, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{ConditionEntry, ConditionLedger, ConditionTrack, EntityId, Turn};
