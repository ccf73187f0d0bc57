//! Immutable effect definitions.
//!
//! A definition describes everything an effect *can* do: how long it lasts,
//! which stats it modifies, which events it listens to and how re-application
//! stacks. Definitions are created once at startup and shared read-only.

use std::fmt;

use bitflags::bitflags;

/// Catalog key of an effect (`"frozen"`, `"poisoned"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectId(String);

impl EffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EffectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad category of an effect.
///
/// The category decides how the resolver treats an instance: `Instant`
/// effects never enter a track, `OverTime` effects fire on their interval,
/// `Passive` and `Triggered` effects answer trigger events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Instant,
    OverTime,
    Buff,
    Debuff,
    Aura,
    Triggered,
    Passive,
}

impl EffectKind {
    /// Returns true for kinds that answer trigger events.
    pub const fn is_triggerable(self) -> bool {
        matches!(self, Self::Passive | Self::Triggered)
    }
}

bitflags! {
    /// Set of trigger events an effect listens to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    ///
    /// Serialized as flag names joined by `|` (`"ON_HIT | ON_KILL"`).
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Triggers: u16 {
        const ON_HIT = 1 << 0;
        const ON_TAKE_DAMAGE = 1 << 1;
        const ON_KILL = 1 << 2;
        const ON_TURN_START = 1 << 3;
        const ON_TURN_END = 1 << 4;
        const ON_LOW_HEALTH = 1 << 5;
        const ON_LOW_WARMTH = 1 << 6;
    }
}

/// A single game event that can fire trigger effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    OnHit,
    OnTakeDamage,
    OnKill,
    OnTurnStart,
    OnTurnEnd,
    OnLowHealth,
    OnLowWarmth,
}

impl TriggerEvent {
    /// Returns the flag matching this event.
    pub const fn flag(self) -> Triggers {
        match self {
            Self::OnHit => Triggers::ON_HIT,
            Self::OnTakeDamage => Triggers::ON_TAKE_DAMAGE,
            Self::OnKill => Triggers::ON_KILL,
            Self::OnTurnStart => Triggers::ON_TURN_START,
            Self::OnTurnEnd => Triggers::ON_TURN_END,
            Self::OnLowHealth => Triggers::ON_LOW_HEALTH,
            Self::OnLowWarmth => Triggers::ON_LOW_WARMTH,
        }
    }
}

/// What a modifier acts upon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Changes a named stat (`target` is the stat name).
    Stat,
    /// Reduces incoming damage of a type by `value` (fraction, 0.25 = 25%).
    Resistance,
    /// Blocks a damage type entirely (`target` is the damage type).
    Immunity,
    /// Blocks an effect from being applied (`target` is the effect id).
    EffectImmunity,
    /// Increases incoming damage of a type by `value` (fraction).
    Vulnerability,
}

/// A stat, resistance, immunity or vulnerability change granted by an effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    pub target: String,
    pub value: f64,
    /// Multiplicative (`×value`) instead of additive (`+value`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_multiplier: bool,
}

impl Modifier {
    /// Additive stat modifier (`+value`).
    pub fn add(target: impl Into<String>, value: f64) -> Self {
        Self {
            kind: ModifierKind::Stat,
            target: target.into(),
            value,
            is_multiplier: false,
        }
    }

    /// Multiplicative stat modifier (`×value`).
    pub fn multiply(target: impl Into<String>, value: f64) -> Self {
        Self {
            kind: ModifierKind::Stat,
            target: target.into(),
            value,
            is_multiplier: true,
        }
    }

    pub fn resistance(damage_type: impl Into<String>, value: f64) -> Self {
        Self {
            kind: ModifierKind::Resistance,
            target: damage_type.into(),
            value,
            is_multiplier: false,
        }
    }

    pub fn vulnerability(damage_type: impl Into<String>, value: f64) -> Self {
        Self {
            kind: ModifierKind::Vulnerability,
            target: damage_type.into(),
            value,
            is_multiplier: false,
        }
    }

    /// Immunity to a damage type.
    pub fn immunity(damage_type: impl Into<String>) -> Self {
        Self {
            kind: ModifierKind::Immunity,
            target: damage_type.into(),
            value: 1.0,
            is_multiplier: false,
        }
    }

    /// Immunity to an effect id.
    pub fn effect_immunity(effect: impl Into<EffectId>) -> Self {
        let effect: EffectId = effect.into();
        Self {
            kind: ModifierKind::EffectImmunity,
            target: effect.as_str().to_owned(),
            value: 1.0,
            is_multiplier: false,
        }
    }
}

/// Side-effecting operation emitted by ticks and triggers.
///
/// The rules core only *describes* the operation; the combat system executes
/// it against live entities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Damage,
    Heal,
    RestoreWarmth,
    DrainWarmth,
    ApplyEffect(EffectId),
    /// Returns `value` × damage taken to the attacker.
    Reflect,
    /// Heals `value` × damage dealt.
    Lifesteal,
}

impl ActionKind {
    /// Returns true when the amount is a fraction of the damage in context.
    pub const fn scales_with_damage(&self) -> bool {
        matches!(self, Self::Reflect | Self::Lifesteal)
    }
}

/// Who an action is aimed at, before resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionTarget {
    SelfTarget,
    Caster,
    /// The other participant of the triggering event.
    Opponent,
    NearbyAllies,
    NearbyEnemies,
}

/// Gate evaluated against entity stats before an action is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCondition {
    /// Affected entity HP below the given percentage of its maximum.
    HealthBelow(u8),
    /// Affected entity warmth below the given percentage of its maximum.
    WarmthBelow(u8),
    /// Context target HP below the given percentage of its maximum.
    TargetHealthBelow(u8),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectAction {
    pub kind: ActionKind,
    pub value: f64,
    pub target: ActionTarget,
    /// Radius in tiles for area targets.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<ActionCondition>,
}

impl EffectAction {
    pub fn new(kind: ActionKind, value: f64, target: ActionTarget) -> Self {
        Self {
            kind,
            value,
            target,
            range: None,
            condition: None,
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_condition(mut self, condition: ActionCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// What happens when an already-active effect is applied again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackingPolicy {
    /// Reset the remaining duration, keep the stack count.
    DurationRefresh,
    /// Add a stack (up to the cap) and reset the remaining duration.
    EffectStack,
    /// Ignore the re-application.
    #[default]
    NoStack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackingRule {
    pub stackable: bool,
    pub max_stacks: u32,
    pub policy: StackingPolicy,
}

impl StackingRule {
    pub const NONE: Self = Self {
        stackable: false,
        max_stacks: 1,
        policy: StackingPolicy::NoStack,
    };

    pub const fn refresh() -> Self {
        Self {
            stackable: true,
            max_stacks: 1,
            policy: StackingPolicy::DurationRefresh,
        }
    }

    pub const fn stack(max_stacks: u32) -> Self {
        Self {
            stackable: true,
            max_stacks,
            policy: StackingPolicy::EffectStack,
        }
    }

    /// Returns true when re-application must leave the instance untouched.
    pub const fn ignores_reapply(&self) -> bool {
        !self.stackable || matches!(self.policy, StackingPolicy::NoStack)
    }

    /// Stack cap actually enforced. Never below 1.
    pub fn effective_max(&self) -> u32 {
        match self.policy {
            StackingPolicy::EffectStack if self.stackable => self.max_stacks.max(1),
            _ => 1,
        }
    }
}

impl Default for StackingRule {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(feature = "serde")]
const fn default_trigger_chance() -> u8 {
    100
}

/// Immutable description of an effect, keyed by [`EffectId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    pub kind: EffectKind,
    /// Turns the effect lasts. `0` means permanent until removed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_interval: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggers: Triggers,
    /// Percent chance in `[0, 100]` that a matching trigger fires.
    #[cfg_attr(feature = "serde", serde(default = "default_trigger_chance"))]
    pub trigger_chance: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<EffectAction>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking: StackingRule,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dispellable: bool,
}

impl EffectDefinition {
    /// Creates a definition with no modifiers, actions or triggers.
    pub fn new(id: impl Into<EffectId>, kind: EffectKind, duration: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            duration,
            tick_interval: None,
            triggers: Triggers::empty(),
            trigger_chance: 100,
            modifiers: Vec::new(),
            actions: Vec::new(),
            stacking: StackingRule::NONE,
            dispellable: false,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_action(mut self, action: EffectAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_tick_interval(mut self, interval: u32) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    pub fn with_triggers(mut self, triggers: Triggers, chance: u8) -> Self {
        self.triggers = triggers;
        self.trigger_chance = chance;
        self
    }

    pub fn with_stacking(mut self, stacking: StackingRule) -> Self {
        self.stacking = stacking;
        self
    }

    pub fn dispellable(mut self, dispellable: bool) -> Self {
        self.dispellable = dispellable;
        self
    }

    /// Permanent effects are never expired by the tick loop.
    pub const fn is_permanent(&self) -> bool {
        self.duration == 0
    }

    /// Turns between over-time firings. An unset or zero interval fires
    /// every turn.
    pub fn interval(&self) -> u64 {
        u64::from(self.tick_interval.unwrap_or(1).max(1))
    }

    /// Trigger chance clamped to `[0, 100]`.
    pub fn chance(&self) -> u32 {
        u32::from(self.trigger_chance.min(100))
    }

    /// Returns true if this effect answers `event`.
    pub fn listens_to(&self, event: TriggerEvent) -> bool {
        self.kind.is_triggerable() && self.triggers.contains(event.flag())
    }

    /// Returns true if any modifier blocks applying `effect`.
    pub fn grants_immunity_to(&self, effect: &EffectId) -> bool {
        self.modifiers
            .iter()
            .any(|m| m.kind == ModifierKind::EffectImmunity && m.target == effect.as_str())
    }

    /// Debuffs and damaging over-time effects.
    pub fn is_harmful(&self) -> bool {
        match self.kind {
            EffectKind::Debuff => true,
            EffectKind::OverTime => self
                .actions
                .iter()
                .any(|a| matches!(a.kind, ActionKind::Damage | ActionKind::DrainWarmth)),
            _ => false,
        }
    }

    /// Buffs, auras and restorative over-time effects.
    pub fn is_beneficial(&self) -> bool {
        match self.kind {
            EffectKind::Buff | EffectKind::Aura => true,
            EffectKind::OverTime => self
                .actions
                .iter()
                .any(|a| matches!(a.kind, ActionKind::Heal | ActionKind::RestoreWarmth)),
            _ => false,
        }
    }

    /// Effect ids referenced by `ApplyEffect` actions.
    pub fn referenced_effects(&self) -> impl Iterator<Item = &EffectId> {
        self.actions.iter().filter_map(|a| match &a.kind {
            ActionKind::ApplyEffect(id) => Some(id),
            _ => None,
        })
    }
}
