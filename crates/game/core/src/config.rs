/// Rules configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Base seed mixed into every trigger-chance roll.
    /// Two runs with the same seed replay the same trigger sequence.
    pub game_seed: u64,
    /// HP percentage (of maximum) below which `ON_LOW_HEALTH` fires.
    pub low_health_percent: u8,
    /// Warmth percentage (of maximum) below which `ON_LOW_WARMTH` fires.
    pub low_warmth_percent: u8,
}

impl RulesConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of distinct effects tracked on a single entity.
    pub const MAX_EFFECTS_PER_ENTITY: usize = 32;
    /// Upper bound of a trigger chance roll (exclusive).
    pub const TRIGGER_ROLL_RANGE: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GAME_SEED: u64 = 0;
    pub const DEFAULT_LOW_HEALTH_PERCENT: u8 = 30;
    pub const DEFAULT_LOW_WARMTH_PERCENT: u8 = 30;

    pub fn new() -> Self {
        Self {
            game_seed: Self::DEFAULT_GAME_SEED,
            low_health_percent: Self::DEFAULT_LOW_HEALTH_PERCENT,
            low_warmth_percent: Self::DEFAULT_LOW_WARMTH_PERCENT,
        }
    }

    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::new()
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
