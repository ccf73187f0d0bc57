use std::collections::BTreeMap;

use crate::state::{ConditionTrack, EntityId};

/// World-owned collection of condition tracks, one per live entity.
///
/// Entities are registered when they enter the world and dropped when they
/// are destroyed; dropping an entity destroys its track with it. Operations
/// addressed to an unregistered entity are reported as `EntityNotFound` by
/// the resolver.
///
/// Tracks are keyed by `EntityId` in a `BTreeMap` so batch operations visit
/// entities in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionLedger {
    tracks: BTreeMap<EntityId, ConditionTrack>,
}

impl ConditionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live entity. Its track starts empty and gains entries as
    /// effects are applied.
    ///
    /// Returns false if the entity was already registered; its track is
    /// left untouched.
    pub fn spawn(&mut self, entity: EntityId) -> bool {
        if self.tracks.contains_key(&entity) {
            return false;
        }
        self.tracks.insert(entity, ConditionTrack::new());
        true
    }

    /// Destroys an entity and its track.
    pub fn despawn(&mut self, entity: EntityId) -> Option<ConditionTrack> {
        self.tracks.remove(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.tracks.contains_key(&entity)
    }

    pub fn track(&self, entity: EntityId) -> Option<&ConditionTrack> {
        self.tracks.get(&entity)
    }

    pub fn track_mut(&mut self, entity: EntityId) -> Option<&mut ConditionTrack> {
        self.tracks.get_mut(&entity)
    }

    /// Registered entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.tracks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
