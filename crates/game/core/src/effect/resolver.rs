//! Effect resolver: the only code that mutates condition tracks.
//!
//! # Ordering
//!
//! Within one entity, entries are processed in the order they were first
//! applied. Across entities, batch operations visit ledger entries in
//! ascending id order. Together with the seeded RNG this makes every
//! trigger and expiry sequence reproducible.
//!
//! # Failure Semantics
//!
//! - Unknown effect ids fail fast with `EffectError::UnknownEffect`.
//! - Unregistered entities yield `EffectError::EntityNotFound`; nothing is
//!   mutated. Batch operations absorb these so one stale id never aborts
//!   the batch.
//! - Stack counts outside `[1, max_stacks]` are clamped in place and logged.

use crate::effect::action::resolve_action;
use crate::effect::{
    EffectDefinition, EffectError, EffectId, EffectKind, ModifierKind, NetModifier,
    StackingPolicy, TriggerContext, TriggerEvent, TriggeredAction,
};
use crate::env::{RulesEnv, compute_seed};
use crate::error::GameError;
use crate::state::{ConditionEntry, ConditionLedger, ConditionTrack, EntityId, Turn};

/// What `apply` did to the entity's track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new instance was created (or an instant effect fired).
    Applied,
    /// An existing instance gained a stack; `capped` when it was already at
    /// the maximum and only the duration was reset.
    Stacked { stacks: u32, capped: bool },
    /// An existing instance had its duration reset.
    Refreshed,
    /// The effect was already active and ignores re-application.
    Unchanged,
    /// The incoming effect annihilated with an active one. Neither remains.
    Cancelled { removed: EffectId },
    /// An active effect grants immunity to the incoming one.
    Resisted,
    /// The track has no room for another effect.
    Rejected,
}

impl ApplyOutcome {
    /// Returns true when the incoming effect is active after the call.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Applied | Self::Stacked { .. } | Self::Refreshed | Self::Unchanged
        )
    }
}

/// Result of `apply`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyResult {
    pub outcome: ApplyOutcome,
    /// Actions fired immediately (instant effects).
    pub actions: Vec<TriggeredAction>,
    /// Effects granted by synergies completed by this application.
    pub granted: Vec<EffectId>,
}

impl ApplyResult {
    fn outcome(outcome: ApplyOutcome) -> Self {
        Self {
            outcome,
            actions: Vec::new(),
            granted: Vec::new(),
        }
    }
}

/// Which effects a cleanse strips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CleanseFilter {
    Harmful,
    Beneficial,
    All,
}

impl CleanseFilter {
    fn matches(self, definition: &EffectDefinition) -> bool {
        match self {
            Self::Harmful => definition.is_harmful(),
            Self::Beneficial => definition.is_beneficial(),
            Self::All => true,
        }
    }
}

/// Applies, ticks and queries effects against a [`ConditionLedger`].
///
/// The resolver holds no state of its own; it is a view over the read-only
/// [`RulesEnv`] and can be created freely.
#[derive(Clone, Copy, Debug)]
pub struct EffectResolver<'a> {
    env: RulesEnv<'a>,
}

impl<'a> EffectResolver<'a> {
    pub fn new(env: RulesEnv<'a>) -> Self {
        Self { env }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Applies `effect` to `entity`.
    ///
    /// Resolution order:
    /// 1. immunity granted by an active effect → `Resisted`
    /// 2. active cancellation partner → both removed, `Cancelled`
    /// 3. instant effects fire their actions and never enter the track
    /// 4. stacking policy of an already-active instance
    /// 5. synergies completed by the application grant their product
    ///
    /// # Errors
    ///
    /// - `UnknownEffect` if `effect` is not in the catalog
    /// - `EntityNotFound` if `entity` is not registered in `ledger`
    pub fn apply(
        &self,
        ledger: &mut ConditionLedger,
        entity: EntityId,
        effect: &EffectId,
        source: Option<EntityId>,
        turn: Turn,
    ) -> Result<ApplyResult, EffectError> {
        let definition = self.env.catalog().lookup(effect)?;
        let track = Self::track_mut(ledger, entity)?;

        let mut result = self.apply_definition(track, entity, definition, source, turn)?;

        if definition.kind != EffectKind::Instant
            && matches!(
                result.outcome,
                ApplyOutcome::Applied | ApplyOutcome::Stacked { .. } | ApplyOutcome::Refreshed
            )
        {
            self.grant_synergies(track, entity, effect, source, turn, &mut result)?;
        }

        Ok(result)
    }

    /// Removes `effect` regardless of `dispellable` (unequip, death cleanup).
    ///
    /// Returns whether an instance was removed.
    pub fn remove(
        &self,
        ledger: &mut ConditionLedger,
        entity: EntityId,
        effect: &EffectId,
    ) -> Result<bool, EffectError> {
        self.env.catalog().lookup(effect)?;
        let track = Self::track_mut(ledger, entity)?;
        let removed = track.remove(effect).is_some();
        if removed {
            tracing::debug!(%entity, %effect, "effect removed");
        }
        Ok(removed)
    }

    /// Removes `effect` only if its definition is dispellable.
    pub fn dispel(
        &self,
        ledger: &mut ConditionLedger,
        entity: EntityId,
        effect: &EffectId,
    ) -> Result<bool, EffectError> {
        let definition = self.env.catalog().lookup(effect)?;
        let track = Self::track_mut(ledger, entity)?;
        if !definition.dispellable {
            tracing::debug!(%entity, %effect, "dispel refused: effect is not dispellable");
            return Ok(false);
        }
        let removed = track.remove(effect).is_some();
        if removed {
            tracing::debug!(%entity, %effect, "effect dispelled");
        }
        Ok(removed)
    }

    /// Dispels every dispellable effect matching `filter`.
    ///
    /// Returns the removed ids in track order.
    pub fn cleanse(
        &self,
        ledger: &mut ConditionLedger,
        entity: EntityId,
        filter: CleanseFilter,
    ) -> Result<Vec<EffectId>, EffectError> {
        let catalog = self.env.catalog();
        let track = Self::track_mut(ledger, entity)?;

        let mut targets = Vec::new();
        for entry in track.iter() {
            let definition = catalog.lookup(&entry.effect)?;
            if definition.dispellable && filter.matches(definition) {
                targets.push(entry.effect.clone());
            }
        }
        for effect in &targets {
            track.remove(effect);
        }

        if !targets.is_empty() {
            tracing::debug!(%entity, ?filter, removed = targets.len(), "effects cleansed");
        }
        Ok(targets)
    }

    /// Advances `entity`'s effects by one turn.
    ///
    /// For every entry, in insertion order:
    /// 1. timed entries lose one turn of duration (permanent ones are skipped)
    /// 2. over-time entries fire their actions if their interval has elapsed
    ///    since the last firing (or they never fired)
    /// 3. timed entries that reached zero are removed and fire nothing more
    pub fn tick(
        &self,
        ledger: &mut ConditionLedger,
        entity: EntityId,
        turn: Turn,
    ) -> Result<Vec<TriggeredAction>, EffectError> {
        let catalog = self.env.catalog();
        let stats = self.env.stats();
        let track = Self::track_mut(ledger, entity)?;

        let definitions = track
            .iter()
            .map(|entry| catalog.lookup(&entry.effect))
            .collect::<Result<Vec<_>, _>>()?;
        let mut definitions = definitions.into_iter();

        let ctx = TriggerContext::new(turn);
        let mut emitted = Vec::new();

        track.retain(|entry| {
            let Some(definition) = definitions.next() else {
                return true;
            };
            Self::heal_entry(entity, entry, definition);

            if !definition.is_permanent() {
                if entry.remaining_duration == 0 {
                    let error = EffectError::InvalidStackState {
                        entity,
                        effect: entry.effect.clone(),
                        stacks: entry.stacks,
                        max_stacks: definition.stacking.effective_max(),
                    };
                    tracing::warn!(%error, "purging timed entry with no remaining duration");
                    return false;
                }
                entry.remaining_duration -= 1;
            }

            if definition.kind == EffectKind::OverTime
                && entry
                    .last_tick
                    .is_none_or(|last| turn.since(last) >= definition.interval())
            {
                entry.last_tick = Some(turn);
                let current: &ConditionEntry = entry;
                emitted.extend(
                    definition
                        .actions
                        .iter()
                        .filter_map(|action| resolve_action(action, entity, current, &ctx, stats)),
                );
            }

            if !definition.is_permanent() && entry.remaining_duration == 0 {
                tracing::debug!(%entity, effect = %entry.effect, %turn, "effect expired");
                return false;
            }
            true
        });

        Ok(emitted)
    }

    /// Ticks the given entities, skipping ids that are no longer registered.
    ///
    /// Stale ids are logged and absorbed; catalog errors still surface.
    pub fn tick_batch(
        &self,
        ledger: &mut ConditionLedger,
        entities: impl IntoIterator<Item = EntityId>,
        turn: Turn,
    ) -> Result<Vec<TriggeredAction>, EffectError> {
        let mut emitted = Vec::new();
        for entity in entities {
            match self.tick(ledger, entity, turn) {
                Ok(actions) => emitted.extend(actions),
                Err(error) if error.severity().is_recoverable() => {
                    tracing::debug!(
                        %entity,
                        code = error.error_code(),
                        "skipping tick for missing entity"
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Ok(emitted)
    }

    /// Ticks every registered entity in ascending id order.
    pub fn tick_all(
        &self,
        ledger: &mut ConditionLedger,
        turn: Turn,
    ) -> Result<Vec<TriggeredAction>, EffectError> {
        let entities: Vec<_> = ledger.entities().collect();
        self.tick_batch(ledger, entities, turn)
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// Fires passive and triggered effects listening for `event`.
    ///
    /// Each matching entry rolls a uniform `[0, 100)` draw against its
    /// trigger chance. The roll is seeded by the game seed, turn, entity,
    /// `ctx.sequence`, event and track position. Callers evaluating the same
    /// event more than once in a turn number those evaluations through
    /// [`TriggerContext::with_sequence`] so each one draws independently.
    pub fn evaluate_trigger(
        &self,
        ledger: &ConditionLedger,
        entity: EntityId,
        event: TriggerEvent,
        ctx: &TriggerContext,
    ) -> Result<Vec<TriggeredAction>, EffectError> {
        let catalog = self.env.catalog();
        let track = Self::track(ledger, entity)?;

        let mut emitted = Vec::new();
        for (index, entry) in track.iter().enumerate() {
            let definition = catalog.lookup(&entry.effect)?;
            if !definition.listens_to(event) {
                continue;
            }

            let roll_context =
                (u64::from(ctx.sequence) << 32) | ((event as u64) << 16) | (index as u64);
            let seed = compute_seed(self.env.config().game_seed, ctx.turn.0, entity.0, roll_context);
            if !self.env.rng().chance(seed, definition.chance()) {
                tracing::trace!(%entity, effect = %entry.effect, %event, "trigger roll failed");
                continue;
            }

            tracing::debug!(%entity, effect = %entry.effect, %event, "trigger fired");
            emitted.extend(
                definition
                    .actions
                    .iter()
                    .filter_map(|action| {
                        resolve_action(action, entity, entry, ctx, self.env.stats())
                    }),
            );
        }
        Ok(emitted)
    }

    /// Fires `OnLowHealth` / `OnLowWarmth` if the entity's current stats are
    /// below the configured thresholds.
    ///
    /// Without a stat provider, or for an entity it does not know, nothing
    /// fires.
    pub fn evaluate_thresholds(
        &self,
        ledger: &ConditionLedger,
        entity: EntityId,
        ctx: &TriggerContext,
    ) -> Result<Vec<TriggeredAction>, EffectError> {
        Self::track(ledger, entity)?;
        let Some(stats) = self.env.stats().and_then(|oracle| oracle.stats(entity)) else {
            return Ok(Vec::new());
        };

        let config = self.env.config();
        let mut emitted = Vec::new();
        if stats.hp_below(config.low_health_percent) {
            emitted.extend(self.evaluate_trigger(ledger, entity, TriggerEvent::OnLowHealth, ctx)?);
        }
        if stats.warmth_below(config.low_warmth_percent) {
            emitted.extend(self.evaluate_trigger(ledger, entity, TriggerEvent::OnLowWarmth, ctx)?);
        }
        Ok(emitted)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Folds every active stat modifier targeting `stat`.
    ///
    /// Additive values sum, multipliers multiply, so the result does not
    /// depend on application order.
    pub fn net_modifier(
        &self,
        ledger: &ConditionLedger,
        entity: EntityId,
        stat: &str,
    ) -> Result<NetModifier, EffectError> {
        let catalog = self.env.catalog();
        let track = Self::track(ledger, entity)?;

        let mut net = NetModifier::NEUTRAL;
        for entry in track.iter() {
            let definition = catalog.lookup(&entry.effect)?;
            let stacks = entry.stacks.clamp(1, definition.stacking.effective_max());
            for modifier in definition
                .modifiers
                .iter()
                .filter(|m| m.kind == ModifierKind::Stat && m.target == stat)
            {
                net.fold(modifier, stacks);
            }
        }
        Ok(net)
    }

    /// Incoming damage multiplier for `damage_type`.
    ///
    /// Immunity yields 0. Otherwise `1 - Σ resistance + Σ vulnerability`,
    /// floored at 0.
    pub fn damage_multiplier(
        &self,
        ledger: &ConditionLedger,
        entity: EntityId,
        damage_type: &str,
    ) -> Result<f64, EffectError> {
        let catalog = self.env.catalog();
        let track = Self::track(ledger, entity)?;

        let mut resistance = 0.0;
        let mut vulnerability = 0.0;
        for entry in track.iter() {
            let definition = catalog.lookup(&entry.effect)?;
            for modifier in definition.modifiers.iter().filter(|m| m.target == damage_type) {
                match modifier.kind {
                    ModifierKind::Immunity => return Ok(0.0),
                    ModifierKind::Resistance => resistance += modifier.value,
                    ModifierKind::Vulnerability => vulnerability += modifier.value,
                    ModifierKind::Stat | ModifierKind::EffectImmunity => {}
                }
            }
        }
        Ok((1.0 - resistance + vulnerability).max(0.0))
    }

    /// Read-only view of the entity's active effects.
    pub fn active_effects<'l>(
        &self,
        ledger: &'l ConditionLedger,
        entity: EntityId,
    ) -> Result<&'l ConditionTrack, EffectError> {
        Self::track(ledger, entity)
    }

    /// Returns true if `effect` is active on `entity`.
    pub fn is_active(
        &self,
        ledger: &ConditionLedger,
        entity: EntityId,
        effect: &EffectId,
    ) -> Result<bool, EffectError> {
        Ok(Self::track(ledger, entity)?.contains(effect))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn track(ledger: &ConditionLedger, entity: EntityId) -> Result<&ConditionTrack, EffectError> {
        ledger.track(entity).ok_or_else(|| {
            tracing::debug!(%entity, "condition track lookup for unknown entity");
            EffectError::EntityNotFound(entity)
        })
    }

    fn track_mut(
        ledger: &mut ConditionLedger,
        entity: EntityId,
    ) -> Result<&mut ConditionTrack, EffectError> {
        ledger.track_mut(entity).ok_or_else(|| {
            tracing::debug!(%entity, "condition track lookup for unknown entity");
            EffectError::EntityNotFound(entity)
        })
    }

    /// Applies a definition to a track without completing synergies.
    fn apply_definition(
        &self,
        track: &mut ConditionTrack,
        entity: EntityId,
        definition: &EffectDefinition,
        source: Option<EntityId>,
        turn: Turn,
    ) -> Result<ApplyResult, EffectError> {
        let catalog = self.env.catalog();
        let effect = &definition.id;

        for entry in track.iter() {
            if catalog
                .lookup(&entry.effect)?
                .grants_immunity_to(effect)
            {
                tracing::debug!(%entity, %effect, immune_via = %entry.effect, "effect resisted");
                return Ok(ApplyResult::outcome(ApplyOutcome::Resisted));
            }
        }

        if let Some(partner) = catalog
            .cancellation_partners(effect)
            .into_iter()
            .find(|partner| track.contains(partner))
        {
            let removed = partner.clone();
            track.remove(&removed);
            tracing::debug!(%entity, %effect, %removed, "effects cancelled each other");
            return Ok(ApplyResult::outcome(ApplyOutcome::Cancelled { removed }));
        }

        if definition.kind == EffectKind::Instant {
            let entry = ConditionEntry::new(effect.clone(), 0, source, turn);
            let ctx = TriggerContext::new(turn);
            let actions = definition
                .actions
                .iter()
                .filter_map(|action| resolve_action(action, entity, &entry, &ctx, self.env.stats()))
                .collect();
            tracing::debug!(%entity, %effect, "instant effect fired");
            return Ok(ApplyResult {
                outcome: ApplyOutcome::Applied,
                actions,
                granted: Vec::new(),
            });
        }

        let Some(entry) = track.get_mut(effect) else {
            let entry = ConditionEntry::new(effect.clone(), definition.duration, source, turn);
            if track.insert(entry).is_err() {
                tracing::warn!(%entity, %effect, "condition track full, effect rejected");
                return Ok(ApplyResult::outcome(ApplyOutcome::Rejected));
            }
            tracing::debug!(%entity, %effect, duration = definition.duration, "effect applied");
            return Ok(ApplyResult::outcome(ApplyOutcome::Applied));
        };

        let stacking = definition.stacking;
        if stacking.ignores_reapply() {
            return Ok(ApplyResult::outcome(ApplyOutcome::Unchanged));
        }

        Self::heal_entry(entity, entry, definition);
        entry.remaining_duration = definition.duration;
        if source.is_some() {
            entry.source = source;
        }

        let outcome = match stacking.policy {
            StackingPolicy::DurationRefresh => ApplyOutcome::Refreshed,
            StackingPolicy::EffectStack => {
                let max = stacking.effective_max();
                let capped = entry.stacks >= max;
                entry.stacks = (entry.stacks + 1).min(max);
                ApplyOutcome::Stacked {
                    stacks: entry.stacks,
                    capped,
                }
            }
            StackingPolicy::NoStack => ApplyOutcome::Unchanged,
        };
        tracing::debug!(%entity, %effect, ?outcome, "effect re-applied");
        Ok(ApplyResult::outcome(outcome))
    }

    /// Grants the products of synergies completed by `effect`.
    ///
    /// Granted effects do not chain into further synergies.
    fn grant_synergies(
        &self,
        track: &mut ConditionTrack,
        entity: EntityId,
        effect: &EffectId,
        source: Option<EntityId>,
        turn: Turn,
        result: &mut ApplyResult,
    ) -> Result<(), EffectError> {
        let catalog = self.env.catalog();
        for synergy in catalog.synergies().iter().filter(|s| s.involves(effect)) {
            if track.contains(&synergy.grants)
                || !synergy.requires.iter().all(|required| track.contains(required))
            {
                continue;
            }

            let product = catalog.lookup(&synergy.grants)?;
            let granted = self.apply_definition(track, entity, product, source, turn)?;
            tracing::debug!(
                %entity,
                trigger = %effect,
                granted = %synergy.grants,
                outcome = ?granted.outcome,
                "synergy completed"
            );
            if granted.outcome.is_active() {
                result.granted.push(synergy.grants.clone());
            }
            result.actions.extend(granted.actions);
        }
        Ok(())
    }

    /// Clamps an entry back into `[1, max_stacks]`.
    fn heal_entry(entity: EntityId, entry: &mut ConditionEntry, definition: &EffectDefinition) {
        let max_stacks = definition.stacking.effective_max();
        if (1..=max_stacks).contains(&entry.stacks) {
            return;
        }
        let error = EffectError::InvalidStackState {
            entity,
            effect: entry.effect.clone(),
            stacks: entry.stacks,
            max_stacks,
        };
        tracing::warn!(%error, "clamping stack count");
        entry.stacks = entry.stacks.clamp(1, max_stacks);
    }
}
