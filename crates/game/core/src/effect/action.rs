//! Resolution of effect actions into concrete, emitted operations.

use crate::effect::{ActionCondition, ActionKind, ActionTarget, EffectAction, EffectId};
use crate::env::StatsOracle;
use crate::state::{ConditionEntry, EntityId, Turn};

/// Facts about the event that caused actions to fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerContext {
    pub turn: Turn,
    /// The other participant of the event: the attacker for
    /// `OnTakeDamage`, the victim for `OnHit` / `OnKill`.
    pub opponent: Option<EntityId>,
    /// Damage dealt or taken in the event.
    pub damage: u32,
    /// Position of this event among same-turn events of the same kind.
    pub sequence: u32,
}

impl TriggerContext {
    pub fn new(turn: Turn) -> Self {
        Self {
            turn,
            opponent: None,
            damage: 0,
            sequence: 0,
        }
    }

    pub fn with_opponent(mut self, opponent: EntityId) -> Self {
        self.opponent = Some(opponent);
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Numbers repeated events within one turn (second hit = 1, ...).
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

/// Which side of an area action is affected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Allegiance {
    Allies,
    Enemies,
}

/// Concrete recipient of an emitted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedTarget {
    Entity(EntityId),
    /// Everyone of `allegiance` within `range` tiles of `center`; the spatial
    /// query belongs to the caller.
    Area {
        center: EntityId,
        range: u32,
        allegiance: Allegiance,
    },
}

/// An action emitted by a tick or trigger, ready for the combat system.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggeredAction {
    /// Entity carrying the effect that fired.
    pub bearer: EntityId,
    pub effect: EffectId,
    pub kind: ActionKind,
    pub amount: f64,
    pub target: ResolvedTarget,
}

/// Radius used by area actions that do not specify one.
const DEFAULT_AREA_RANGE: u32 = 1;

/// Resolves `action` for `entry` on `bearer`.
///
/// Returns `None` when the action's condition fails or its target cannot be
/// resolved in this context.
pub(crate) fn resolve_action(
    action: &EffectAction,
    bearer: EntityId,
    entry: &ConditionEntry,
    ctx: &TriggerContext,
    stats: Option<&dyn StatsOracle>,
) -> Option<TriggeredAction> {
    if let Some(condition) = action.condition {
        if !condition_met(condition, bearer, ctx, stats) {
            tracing::trace!(
                entity = %bearer,
                effect = %entry.effect,
                ?condition,
                "action condition not met"
            );
            return None;
        }
    }

    let target = match action.target {
        ActionTarget::SelfTarget => ResolvedTarget::Entity(bearer),
        ActionTarget::Caster => ResolvedTarget::Entity(entry.source.unwrap_or(bearer)),
        ActionTarget::Opponent => ResolvedTarget::Entity(ctx.opponent?),
        ActionTarget::NearbyAllies => ResolvedTarget::Area {
            center: bearer,
            range: action.range.unwrap_or(DEFAULT_AREA_RANGE),
            allegiance: Allegiance::Allies,
        },
        ActionTarget::NearbyEnemies => ResolvedTarget::Area {
            center: bearer,
            range: action.range.unwrap_or(DEFAULT_AREA_RANGE),
            allegiance: Allegiance::Enemies,
        },
    };

    let amount = if action.kind.scales_with_damage() {
        action.value * f64::from(ctx.damage)
    } else {
        action.value * f64::from(entry.stacks)
    };

    Some(TriggeredAction {
        bearer,
        effect: entry.effect.clone(),
        kind: action.kind.clone(),
        amount,
        target,
    })
}

fn condition_met(
    condition: ActionCondition,
    bearer: EntityId,
    ctx: &TriggerContext,
    stats: Option<&dyn StatsOracle>,
) -> bool {
    let Some(stats) = stats else {
        return false;
    };
    match condition {
        ActionCondition::HealthBelow(pct) => stats.stats(bearer).is_some_and(|s| s.hp_below(pct)),
        ActionCondition::WarmthBelow(pct) => {
            stats.stats(bearer).is_some_and(|s| s.warmth_below(pct))
        }
        ActionCondition::TargetHealthBelow(pct) => ctx
            .opponent
            .and_then(|opponent| stats.stats(opponent))
            .is_some_and(|s| s.hp_below(pct)),
    }
}
