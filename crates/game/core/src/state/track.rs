//! Per-entity ledger of active effects.
//!
//! A track records *that* an effect is active and for how long. What the
//! effect does is always looked up in the catalog, so the track never holds
//! modifier values that could drift from their definitions.

use arrayvec::ArrayVec;

use crate::config::RulesConfig;
use crate::effect::EffectId;
use crate::state::{EntityId, Turn};

/// A single active effect on an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionEntry {
    pub effect: EffectId,
    /// Always at least 1 and never above the definition's `max_stacks`.
    pub stacks: u32,
    /// Turns left before expiry. Permanent effects keep 0 here and are
    /// never decremented.
    pub remaining_duration: u32,
    /// Turn at which the over-time action last fired.
    pub last_tick: Option<Turn>,
    /// Entity that applied the effect, if any.
    pub source: Option<EntityId>,
    pub applied_at: Turn,
}

impl ConditionEntry {
    pub fn new(
        effect: EffectId,
        duration: u32,
        source: Option<EntityId>,
        applied_at: Turn,
    ) -> Self {
        Self {
            effect,
            stacks: 1,
            remaining_duration: duration,
            last_tick: None,
            source,
            applied_at,
        }
    }
}

/// Insertion-ordered effects active on one entity.
///
/// Iteration order is the order in which effects were first applied, which
/// keeps tick and trigger sequences reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionTrack {
    entries: ArrayVec<ConditionEntry, { RulesConfig::MAX_EFFECTS_PER_ENTITY }>,
}

impl ConditionTrack {
    /// Creates an empty track.
    pub fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    /// Returns the entry for `effect`, if active.
    pub fn get(&self, effect: &EffectId) -> Option<&ConditionEntry> {
        self.entries.iter().find(|e| &e.effect == effect)
    }

    /// Returns a mutable entry for `effect`, if active.
    pub fn get_mut(&mut self, effect: &EffectId) -> Option<&mut ConditionEntry> {
        self.entries.iter_mut().find(|e| &e.effect == effect)
    }

    /// Checks whether `effect` is active.
    pub fn contains(&self, effect: &EffectId) -> bool {
        self.get(effect).is_some()
    }

    /// Appends a new entry at the end of the track.
    ///
    /// Returns the entry back when the track is already at capacity.
    pub fn insert(&mut self, entry: ConditionEntry) -> Result<(), ConditionEntry> {
        debug_assert!(!self.contains(&entry.effect));
        self.entries.try_push(entry).map_err(|e| e.element())
    }

    /// Removes `effect`, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, effect: &EffectId) -> Option<ConditionEntry> {
        let index = self.entries.iter().position(|e| &e.effect == effect)?;
        Some(self.entries.remove(index))
    }

    /// Keeps only the entries matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&mut ConditionEntry) -> bool) {
        self.entries.retain(keep);
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ConditionEntry> {
        self.entries.iter()
    }

    /// Iterates the ids of active effects in insertion order.
    pub fn effect_ids(&self) -> impl Iterator<Item = &EffectId> {
        self.entries.iter().map(|e| &e.effect)
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
