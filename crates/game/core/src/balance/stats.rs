//! Typed stat blocks consumed and produced by the balance engine.

use crate::env::EntityStats;

/// The four dimensions authored requirements are expressed in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatDimension {
    Damage,
    Defense,
    Warmth,
    Hp,
}

impl StatDimension {
    /// Weight of the dimension when valuing loot. HP never rolls on items.
    pub const fn item_weight(self) -> Option<f64> {
        match self {
            Self::Damage => Some(40.0),
            Self::Defense => Some(25.0),
            Self::Warmth => Some(35.0),
            Self::Hp => None,
        }
    }

    /// Weight used to order upgrade advice.
    pub const fn priority_weight(self) -> f64 {
        match self {
            Self::Damage => 40.0,
            Self::Defense => 25.0,
            Self::Warmth => 35.0,
            Self::Hp => 25.0,
        }
    }
}

/// Authored base stats of an enemy or boss template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyStats {
    pub damage: u32,
    pub max_hp: u32,
    pub accuracy: u32,
    pub speed: i32,
    pub defense: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

/// Boss templates share the enemy stat block.
pub type BossStats = EnemyStats;

/// Floor-scaled stats ready for combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledStats {
    pub damage: u32,
    pub max_hp: u32,
    pub accuracy: u32,
    pub speed: i32,
    pub defense: u32,
    pub abilities: Vec<String>,
}

/// Player power as seen by the balance checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    pub total_damage: u32,
    pub total_defense: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_warmth: u32,
    pub max_warmth: u32,
}

impl PlayerStats {
    /// Value compared against the requirement of `dimension`.
    pub const fn value(&self, dimension: StatDimension) -> u32 {
        match dimension {
            StatDimension::Damage => self.total_damage,
            StatDimension::Defense => self.total_defense,
            StatDimension::Warmth => self.max_warmth,
            StatDimension::Hp => self.max_hp,
        }
    }
}

impl From<EntityStats> for PlayerStats {
    fn from(stats: EntityStats) -> Self {
        Self {
            total_damage: stats.total_damage,
            total_defense: stats.total_defense,
            current_hp: stats.current_hp,
            max_hp: stats.max_hp,
            current_warmth: stats.current_warmth,
            max_warmth: stats.max_warmth,
        }
    }
}

/// Stat dimensions an item rolls. Absent dimensions do not count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStats {
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub warmth: Option<u32>,
}

impl ItemStats {
    pub const fn value(&self, dimension: StatDimension) -> Option<u32> {
        match dimension {
            StatDimension::Damage => self.damage,
            StatDimension::Defense => self.defense,
            StatDimension::Warmth => self.warmth,
            StatDimension::Hp => None,
        }
    }
}

/// Minimum player stats expected on a floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirements {
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_defense: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_warmth: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_hp: u32,
}

impl Requirements {
    pub const fn new(min_damage: u32, min_defense: u32, min_warmth: u32, min_hp: u32) -> Self {
        Self {
            min_damage,
            min_defense,
            min_warmth,
            min_hp,
        }
    }

    pub const fn get(&self, dimension: StatDimension) -> u32 {
        match dimension {
            StatDimension::Damage => self.min_damage,
            StatDimension::Defense => self.min_defense,
            StatDimension::Warmth => self.min_warmth,
            StatDimension::Hp => self.min_hp,
        }
    }
}

/// One dimension where the player falls short of a floor's requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortfall {
    pub dimension: StatDimension,
    pub current: u32,
    pub required: u32,
}

impl Shortfall {
    pub const fn deficit(&self) -> u32 {
        self.required.saturating_sub(self.current)
    }

    /// Deficit relative to the requirement, weighted by dimension priority.
    pub fn priority(&self) -> f64 {
        if self.required == 0 {
            return 0.0;
        }
        f64::from(self.deficit()) / f64::from(self.required) * self.dimension.priority_weight()
    }
}

/// Upgrade advice for reaching a floor's requirements.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadoutAdvice {
    pub floor: u32,
    pub requirements: Requirements,
    /// Ordered from most to least urgent.
    pub shortfalls: Vec<Shortfall>,
}

impl LoadoutAdvice {
    /// Returns true if the player already meets every requirement.
    pub fn is_ready(&self) -> bool {
        self.shortfalls.is_empty()
    }

    /// Dimension to invest in first, if any.
    pub fn top_priority(&self) -> Option<StatDimension> {
        self.shortfalls.first().map(|s| s.dimension)
    }
}
