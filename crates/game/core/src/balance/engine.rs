//! Floor-based progression math.
//!
//! Every function is pure: the engine only reads its [`BalanceCurves`].
use strum::IntoEnumIterator;

use crate::balance::{
    BalanceCurves, BossStats, EnemyStats, ItemStats, LoadoutAdvice, PlayerStats, Requirements,
    ScaledStats, Shortfall, StatDimension,
};

/// Absorbs representation error before flooring (e.g. `0.1 * 30.0`).
const FLOOR_EPSILON: f64 = 1e-9;

const FLOORS_PER_GROWTH_STEP: f64 = 10.0;

const BOSS_HEALTH_PER_FLOOR: f64 = 0.3;
const BOSS_DAMAGE_PER_FLOOR: f64 = 0.25;

const WARMTH_DECAY_PER_FLOOR: f64 = 0.1;

/// Death-risk model. Penalties are additive on top of the base risk.
mod risk {
    pub const BASE: f64 = 0.10;
    pub const MAX: f64 = 0.95;
    pub const DAMAGE_DEFICIT: f64 = 0.30;
    pub const DEFENSE_DEFICIT: f64 = 0.25;
    pub const WARMTH_DEFICIT: f64 = 0.40;
    pub const LOW_HP: f64 = 0.20;
    pub const LOW_WARMTH: f64 = 0.30;
    pub const PER_FLOOR: f64 = 0.05;
}

/// Dimensions below requirement before a player counts as underpowered.
const UNDERPOWERED_THRESHOLD: usize = 2;

/// Floors a non-negative product, saturating at `u32::MAX`.
fn floor_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let floored = (value + FLOOR_EPSILON).floor();
    if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floored as u32
    }
}

/// Stateless view over a set of curves.
#[derive(Clone, Copy, Debug)]
pub struct BalanceCurveEngine<'a> {
    curves: &'a BalanceCurves,
}

impl<'a> BalanceCurveEngine<'a> {
    pub fn new(curves: &'a BalanceCurves) -> Self {
        Self { curves }
    }

    pub fn curves(&self) -> &'a BalanceCurves {
        self.curves
    }

    /// Scales an enemy template to `floor`.
    ///
    /// Damage and HP grow geometrically (one curve step per ten floors),
    /// accuracy grows linearly and speed in discrete intervals. Defense and
    /// abilities are carried over unchanged.
    pub fn scale_enemy_stats(&self, floor: u32, base: &EnemyStats) -> ScaledStats {
        let curves = self.curves;
        let exponent = f64::from(floor) / FLOORS_PER_GROWTH_STEP;

        let damage = floor_u32(f64::from(base.damage) * curves.damage_per_floor.powf(exponent));
        let max_hp = floor_u32(f64::from(base.max_hp) * curves.health_per_floor.powf(exponent));
        let accuracy =
            floor_u32(f64::from(base.accuracy) + f64::from(floor) * curves.accuracy_per_floor);

        ScaledStats {
            damage,
            max_hp,
            accuracy,
            speed: base.speed.saturating_add(self.speed_bonus(floor)),
            defense: base.defense,
            abilities: base.abilities.clone(),
        }
    }

    fn speed_bonus(&self, floor: u32) -> i32 {
        let intervals = floor / self.curves.speed_bonus_interval.max(1);
        i32::try_from(intervals)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.curves.speed_bonus_per_interval)
    }

    /// Scales a boss template to `floor` and adds every unlocked ability.
    pub fn scale_boss_stats(&self, floor: u32, base: &BossStats) -> ScaledStats {
        let curves = self.curves;
        let floor_f = f64::from(floor);

        let max_hp = floor_u32(
            f64::from(base.max_hp)
                * curves.boss_health_multiplier
                * (1.0 + floor_f * BOSS_HEALTH_PER_FLOOR),
        );
        let damage = floor_u32(f64::from(base.damage) * (1.0 + floor_f * BOSS_DAMAGE_PER_FLOOR));
        let defense = base.defense.saturating_add(floor / 2);

        let mut abilities = base.abilities.clone();
        for unlock in curves.boss_unlocks.iter().filter(|u| floor >= u.floor) {
            if !abilities.contains(&unlock.ability) {
                abilities.push(unlock.ability.clone());
            }
        }

        ScaledStats {
            damage,
            max_hp,
            accuracy: base.accuracy,
            speed: base.speed,
            defense,
            abilities,
        }
    }

    /// Minimum stats expected of the player on `floor`.
    ///
    /// Uses the greatest checkpoint at or below `floor`. Floors before the
    /// first checkpoint use the first one; floors past the last one are
    /// extrapolated from it.
    pub fn required_stats_for_floor(&self, floor: u32) -> Requirements {
        let table = &self.curves.checkpoints;
        let Some(last) = table.last() else {
            return Requirements::default();
        };

        if floor > last.floor {
            return self.extrapolate(&last.requirements, floor - last.floor);
        }

        table
            .at_or_below(floor)
            .or_else(|| table.first())
            .map(|c| c.requirements)
            .unwrap_or_default()
    }

    fn extrapolate(&self, anchor: &Requirements, floors_past: u32) -> Requirements {
        let coef = &self.curves.extrapolation;
        let scale = f64::from(floors_past) / f64::from(self.curves.extrapolation_step.max(1));
        let grow = |value: u32, c: f64| floor_u32(f64::from(value) * (1.0 + scale * c));

        Requirements {
            min_damage: grow(anchor.min_damage, coef.damage),
            min_defense: grow(anchor.min_defense, coef.defense),
            min_warmth: grow(anchor.min_warmth, coef.warmth),
            min_hp: grow(anchor.min_hp, coef.hp),
        }
    }

    /// Weighted value of an item relative to the requirements of `floor`.
    ///
    /// Each rolled dimension contributes `stat / requirement * weight`.
    pub fn item_value(&self, item: &ItemStats, floor: u32) -> f64 {
        let requirements = self.required_stats_for_floor(floor);
        StatDimension::iter()
            .filter_map(|dimension| {
                let stat = item.value(dimension)?;
                let weight = dimension.item_weight()?;
                let required = requirements.get(dimension).max(1);
                Some(f64::from(stat) / f64::from(required) * weight)
            })
            .sum()
    }

    /// Returns true if at least two dimensions fall below the requirements
    /// of `floor`.
    pub fn is_underpowered(&self, player: &PlayerStats, floor: u32) -> bool {
        let requirements = self.required_stats_for_floor(floor);
        StatDimension::iter()
            .filter(|&d| player.value(d) < requirements.get(d))
            .count()
            >= UNDERPOWERED_THRESHOLD
    }

    /// Estimated chance of dying on `floor`, always within `[0.10, 0.95]`.
    pub fn death_probability(&self, player: &PlayerStats, floor: u32) -> f64 {
        let requirements = self.required_stats_for_floor(floor);
        let mut risk = risk::BASE;

        if player.total_damage < requirements.min_damage {
            risk += risk::DAMAGE_DEFICIT;
        }
        if player.total_defense < requirements.min_defense {
            risk += risk::DEFENSE_DEFICIT;
        }
        if player.max_warmth < requirements.min_warmth {
            risk += risk::WARMTH_DEFICIT;
        }
        // hp < 50% and warmth < 30%, in integer arithmetic
        if u64::from(player.current_hp) * 2 < u64::from(player.max_hp) {
            risk += risk::LOW_HP;
        }
        if u64::from(player.current_warmth) * 10 < u64::from(player.max_warmth) * 3 {
            risk += risk::LOW_WARMTH;
        }
        risk += f64::from(floor) * risk::PER_FLOOR;

        risk.clamp(risk::BASE, risk::MAX)
    }

    /// Warmth lost per turn on `floor`.
    pub fn warmth_decay_per_turn(&self, floor: u32) -> f64 {
        self.curves.warmth_decay_rate * (1.0 + f64::from(floor) * WARMTH_DECAY_PER_FLOOR)
    }

    /// Lists every dimension below the requirements of `floor`, most urgent
    /// first.
    pub fn recommended_loadout(&self, player: &PlayerStats, floor: u32) -> LoadoutAdvice {
        let requirements = self.required_stats_for_floor(floor);
        let mut shortfalls: Vec<Shortfall> = StatDimension::iter()
            .map(|dimension| Shortfall {
                dimension,
                current: player.value(dimension),
                required: requirements.get(dimension),
            })
            .filter(|s| s.deficit() > 0)
            .collect();

        // stable sort keeps dimension order on ties
        shortfalls.sort_by(|a, b| b.priority().total_cmp(&a.priority()));

        LoadoutAdvice {
            floor,
            requirements,
            shortfalls,
        }
    }
}
