//! Tunable progression curves.
//!
//! All balance math reads from a single [`BalanceCurves`] value. Defaults
//! reproduce the shipped tuning; content data may override any field.

use crate::balance::{BalanceError, Checkpoint, CheckpointTable, Requirements};

/// Per-dimension growth applied past the last authored checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtrapolationCoefficients {
    pub damage: f64,
    pub defense: f64,
    pub warmth: f64,
    pub hp: f64,
}

impl ExtrapolationCoefficients {
    pub const DEFAULT: Self = Self {
        damage: 0.5,
        defense: 0.4,
        warmth: 0.3,
        hp: 0.4,
    };
}

impl Default for ExtrapolationCoefficients {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A boss ability that becomes available from `floor` onward.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossAbilityUnlock {
    pub floor: u32,
    pub ability: String,
}

impl BossAbilityUnlock {
    pub fn new(floor: u32, ability: impl Into<String>) -> Self {
        Self {
            floor,
            ability: ability.into(),
        }
    }
}

/// Read-only progression tables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceCurves {
    /// Damage growth per ten floors.
    pub damage_per_floor: f64,
    /// HP growth per ten floors.
    pub health_per_floor: f64,
    /// Flat accuracy gained per floor.
    pub accuracy_per_floor: f64,
    /// Floors between speed bonuses.
    pub speed_bonus_interval: u32,
    pub speed_bonus_per_interval: i32,
    /// Warmth lost per turn on floor zero.
    pub warmth_decay_rate: f64,
    pub boss_health_multiplier: f64,
    /// Floors per extrapolation step past the last checkpoint.
    pub extrapolation_step: u32,
    pub extrapolation: ExtrapolationCoefficients,
    pub boss_unlocks: Vec<BossAbilityUnlock>,
    pub checkpoints: CheckpointTable,
}

impl BalanceCurves {
    pub const DEFAULT_DAMAGE_PER_FLOOR: f64 = 1.8;
    pub const DEFAULT_HEALTH_PER_FLOOR: f64 = 1.6;
    pub const DEFAULT_ACCURACY_PER_FLOOR: f64 = 1.0;
    pub const DEFAULT_SPEED_BONUS_INTERVAL: u32 = 5;
    pub const DEFAULT_SPEED_BONUS_PER_INTERVAL: i32 = 1;
    pub const DEFAULT_WARMTH_DECAY_RATE: f64 = 1.0;
    pub const DEFAULT_BOSS_HEALTH_MULTIPLIER: f64 = 3.0;
    pub const DEFAULT_EXTRAPOLATION_STEP: u32 = 5;

    /// Checks every multiplier and divisor.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), BalanceError> {
        let growth = [
            ("damage_per_floor", self.damage_per_floor),
            ("health_per_floor", self.health_per_floor),
            ("boss_health_multiplier", self.boss_health_multiplier),
        ];
        for (name, value) in growth {
            if !value.is_finite() || value <= 0.0 {
                return Err(BalanceError::InvalidCurve { name, value });
            }
        }

        let non_negative = [
            ("accuracy_per_floor", self.accuracy_per_floor),
            ("warmth_decay_rate", self.warmth_decay_rate),
            ("extrapolation.damage", self.extrapolation.damage),
            ("extrapolation.defense", self.extrapolation.defense),
            ("extrapolation.warmth", self.extrapolation.warmth),
            ("extrapolation.hp", self.extrapolation.hp),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(BalanceError::InvalidCurve { name, value });
            }
        }

        if self.speed_bonus_interval == 0 {
            return Err(BalanceError::ZeroInterval("speed_bonus_interval"));
        }
        if self.extrapolation_step == 0 {
            return Err(BalanceError::ZeroInterval("extrapolation_step"));
        }
        Ok(())
    }

    fn default_unlocks() -> Vec<BossAbilityUnlock> {
        vec![
            BossAbilityUnlock::new(10, "enrage"),
            BossAbilityUnlock::new(15, "summon_minions"),
            BossAbilityUnlock::new(20, "frost_nova"),
        ]
    }

    fn default_checkpoints() -> CheckpointTable {
        let checkpoints = vec![
            Checkpoint::new(1, Requirements::new(3, 1, 30, 40)),
            Checkpoint::new(5, Requirements::new(6, 3, 50, 60)),
            Checkpoint::new(10, Requirements::new(10, 6, 70, 100)),
            Checkpoint::new(15, Requirements::new(16, 10, 90, 150)),
            Checkpoint::new(20, Requirements::new(24, 15, 110, 220)),
        ];
        CheckpointTable::new(checkpoints).unwrap_or_default()
    }
}

impl Default for BalanceCurves {
    fn default() -> Self {
        Self {
            damage_per_floor: Self::DEFAULT_DAMAGE_PER_FLOOR,
            health_per_floor: Self::DEFAULT_HEALTH_PER_FLOOR,
            accuracy_per_floor: Self::DEFAULT_ACCURACY_PER_FLOOR,
            speed_bonus_interval: Self::DEFAULT_SPEED_BONUS_INTERVAL,
            speed_bonus_per_interval: Self::DEFAULT_SPEED_BONUS_PER_INTERVAL,
            warmth_decay_rate: Self::DEFAULT_WARMTH_DECAY_RATE,
            boss_health_multiplier: Self::DEFAULT_BOSS_HEALTH_MULTIPLIER,
            extrapolation_step: Self::DEFAULT_EXTRAPOLATION_STEP,
            extrapolation: ExtrapolationCoefficients::DEFAULT,
            boss_unlocks: Self::default_unlocks(),
            checkpoints: Self::default_checkpoints(),
        }
    }
}
