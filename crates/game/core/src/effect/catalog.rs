//! Read-only effect registry.
//!
//! The catalog maps effect ids to their definitions and also carries the
//! authored interaction rules between effects:
//!
//! - **Cancellation pairs** annihilate each other (frozen ↔ burning).
//! - **Synergies** grant a third effect once all of their components are
//!   active on the same entity.

use std::collections::HashMap;

use crate::effect::{CatalogError, EffectDefinition, EffectError, EffectId};

/// Two effects that cancel each other out.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancellationPair {
    pub first: EffectId,
    pub second: EffectId,
}

impl CancellationPair {
    pub fn new(first: impl Into<EffectId>, second: impl Into<EffectId>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Returns the other side of the pair if `id` belongs to it.
    pub fn partner_of(&self, id: &EffectId) -> Option<&EffectId> {
        if &self.first == id {
            Some(&self.second)
        } else if &self.second == id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Grants `grants` when every effect in `requires` is active.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyRule {
    pub requires: Vec<EffectId>,
    pub grants: EffectId,
}

impl SynergyRule {
    pub fn new(requires: impl IntoIterator<Item = EffectId>, grants: impl Into<EffectId>) -> Self {
        Self {
            requires: requires.into_iter().collect(),
            grants: grants.into(),
        }
    }

    pub fn involves(&self, id: &EffectId) -> bool {
        self.requires.contains(id)
    }
}

/// Registry of effect definitions.
///
/// Implementations are built once at startup and shared read-only by every
/// caller for the lifetime of the process.
pub trait EffectCatalog: Send + Sync {
    /// Returns the definition for `id`, if registered.
    fn definition(&self, id: &EffectId) -> Option<&EffectDefinition>;

    /// Authored cancellation pairs.
    fn cancellation_pairs(&self) -> &[CancellationPair];

    /// Authored synergy rules.
    fn synergies(&self) -> &[SynergyRule];

    /// Looks up a definition, failing fast on unregistered ids.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::UnknownEffect` if `id` is not registered. This is
    /// a content bug, not a recoverable runtime condition.
    fn lookup(&self, id: &EffectId) -> Result<&EffectDefinition, EffectError> {
        self.definition(id).ok_or_else(|| {
            tracing::error!(effect = %id, "effect lookup failed: id not in catalog");
            EffectError::UnknownEffect(id.clone())
        })
    }

    /// Effects that annihilate with `id`.
    fn cancellation_partners<'a>(&'a self, id: &'a EffectId) -> Vec<&'a EffectId> {
        self.cancellation_pairs()
            .iter()
            .filter_map(|pair| pair.partner_of(id))
            .collect()
    }
}

/// In-memory catalog backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct StaticEffectCatalog {
    definitions: HashMap<EffectId, EffectDefinition>,
    cancellations: Vec<CancellationPair>,
    synergies: Vec<SynergyRule>,
}

impl StaticEffectCatalog {
    /// Builds a catalog and validates every cross-reference.
    ///
    /// # Errors
    ///
    /// - `DuplicateEffect` if two definitions share an id
    /// - `UnknownReference` if a pair, synergy or `ApplyEffect` action names
    ///   an unregistered effect
    /// - `SelfCancellation` if a pair lists the same effect twice
    /// - `DegenerateSynergy` if a synergy requires fewer than two effects
    pub fn new(
        definitions: impl IntoIterator<Item = EffectDefinition>,
        cancellations: Vec<CancellationPair>,
        synergies: Vec<SynergyRule>,
    ) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for definition in definitions {
            let id = definition.id.clone();
            if map.insert(id.clone(), definition).is_some() {
                return Err(CatalogError::DuplicateEffect(id));
            }
        }

        let require = |context: &'static str, effect: &EffectId| {
            if map.contains_key(effect) {
                Ok(())
            } else {
                Err(CatalogError::UnknownReference {
                    context,
                    effect: effect.clone(),
                })
            }
        };

        for definition in map.values() {
            for referenced in definition.referenced_effects() {
                require("ApplyEffect action", referenced)?;
            }
        }

        for pair in &cancellations {
            if pair.first == pair.second {
                return Err(CatalogError::SelfCancellation(pair.first.clone()));
            }
            require("cancellation pair", &pair.first)?;
            require("cancellation pair", &pair.second)?;
        }

        for synergy in &synergies {
            if synergy.requires.len() < 2 {
                return Err(CatalogError::DegenerateSynergy(synergy.grants.clone()));
            }
            for required in &synergy.requires {
                require("synergy", required)?;
            }
            require("synergy", &synergy.grants)?;
        }

        Ok(Self {
            definitions: map,
            cancellations,
            synergies,
        })
    }

    /// Builds a catalog with no interaction rules.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = EffectDefinition>,
    ) -> Result<Self, CatalogError> {
        Self::new(definitions, Vec::new(), Vec::new())
    }

    /// Registered effect ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &EffectId> {
        self.definitions.keys()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl EffectCatalog for StaticEffectCatalog {
    fn definition(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.definitions.get(id)
    }

    fn cancellation_pairs(&self) -> &[CancellationPair] {
        &self.cancellations
    }

    fn synergies(&self) -> &[SynergyRule] {
        &self.synergies
    }
}
