//! Read access to live entity stats.
//!
//! The rules core never owns HP or warmth. Conditions on actions and the
//! low-health / low-warmth thresholds read them through [`StatsOracle`].

use std::collections::HashMap;

use crate::state::EntityId;

/// Snapshot of the stats an effect or balance check may read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityStats {
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_warmth: u32,
    pub max_warmth: u32,
    pub total_damage: u32,
    pub total_defense: u32,
}

impl EntityStats {
    /// Returns true if `current` is strictly below `percent`% of `maximum`.
    ///
    /// An entity without a maximum (0) is never considered below threshold.
    fn below(current: u32, maximum: u32, percent: u8) -> bool {
        if maximum == 0 {
            return false;
        }
        u64::from(current) * 100 < u64::from(maximum) * u64::from(percent)
    }

    pub fn hp_below(&self, percent: u8) -> bool {
        Self::below(self.current_hp, self.max_hp, percent)
    }

    pub fn warmth_below(&self, percent: u8) -> bool {
        Self::below(self.current_warmth, self.max_warmth, percent)
    }
}

/// Oracle providing stat snapshots for live entities.
pub trait StatsOracle: Send + Sync {
    /// Returns the stats of `entity`, or `None` if it does not exist.
    fn stats(&self, entity: EntityId) -> Option<EntityStats>;
}

/// Stats oracle backed by a captured snapshot.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStatsOracle {
    stats: HashMap<EntityId, EntityStats>,
}

impl SnapshotStatsOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entity: EntityId, stats: EntityStats) -> Self {
        self.stats.insert(entity, stats);
        self
    }

    pub fn insert(&mut self, entity: EntityId, stats: EntityStats) {
        self.stats.insert(entity, stats);
    }
}

impl StatsOracle for SnapshotStatsOracle {
    fn stats(&self, entity: EntityId) -> Option<EntityStats> {
        self.stats.get(&entity).copied()
    }
}
