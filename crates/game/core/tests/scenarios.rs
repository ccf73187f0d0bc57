//! End-to-end behaviour of the effect resolver and balance engine.

use dungeon_rules::{
    ActionKind, ActionTarget, ApplyOutcome, BalanceCurveEngine, BalanceCurves, CancellationPair,
    CleanseFilter, ConditionLedger, EffectAction, EffectCatalog, EffectDefinition, EffectError,
    EffectId, EffectKind, EntityId, EntityStats, Modifier, PcgRng, PlayerStats, ResolvedTarget,
    RulesConfig, RulesEnv, SnapshotStatsOracle, StackingRule, StaticEffectCatalog, SynergyRule,
    TriggerContext, TriggerEvent, Triggers, Turn,
};

const HERO: EntityId = EntityId::PLAYER;
const WOLF: EntityId = EntityId(4);

fn catalog() -> StaticEffectCatalog {
    let definitions = vec![
        EffectDefinition::new("frozen", EffectKind::Debuff, 3)
            .with_modifier(Modifier::multiply("speed", 0.5))
            .with_stacking(StackingRule::refresh())
            .dispellable(true),
        EffectDefinition::new("poisoned", EffectKind::OverTime, 8)
            .with_tick_interval(2)
            .with_action(EffectAction::new(ActionKind::Damage, 3.0, ActionTarget::SelfTarget))
            .with_stacking(StackingRule::stack(3))
            .dispellable(true),
        EffectDefinition::new("burning", EffectKind::OverTime, 4)
            .with_action(EffectAction::new(ActionKind::Damage, 5.0, ActionTarget::SelfTarget))
            .dispellable(true),
        EffectDefinition::new("wet", EffectKind::Debuff, 5).dispellable(true),
        EffectDefinition::new("chilled", EffectKind::Debuff, 5).dispellable(true),
        EffectDefinition::new("regeneration", EffectKind::OverTime, 5)
            .with_action(EffectAction::new(ActionKind::Heal, 2.0, ActionTarget::SelfTarget))
            .dispellable(true),
        EffectDefinition::new("fire_ward", EffectKind::Buff, 5)
            .with_modifier(Modifier::effect_immunity("burning"))
            .with_modifier(Modifier::resistance("fire", 0.5)),
        EffectDefinition::new("enraged", EffectKind::Buff, 5)
            .with_modifier(Modifier::multiply("damage", 1.5)),
        EffectDefinition::new("sharpened", EffectKind::Buff, 5)
            .with_modifier(Modifier::add("damage", 3.0)),
        EffectDefinition::new("weakened", EffectKind::Debuff, 5)
            .with_modifier(Modifier::multiply("damage", 0.8)),
        EffectDefinition::new("thorns", EffectKind::Passive, 0)
            .with_triggers(Triggers::ON_TAKE_DAMAGE, 100)
            .with_action(EffectAction::new(ActionKind::Reflect, 0.5, ActionTarget::Opponent)),
        EffectDefinition::new("jinxed", EffectKind::Triggered, 0)
            .with_triggers(Triggers::ON_HIT, 0)
            .with_action(EffectAction::new(ActionKind::Damage, 1.0, ActionTarget::SelfTarget)),
        EffectDefinition::new("fickle", EffectKind::Triggered, 0)
            .with_triggers(Triggers::ON_HIT, 50)
            .with_action(EffectAction::new(ActionKind::Damage, 1.0, ActionTarget::Opponent)),
        EffectDefinition::new("last_stand", EffectKind::Passive, 0)
            .with_triggers(Triggers::ON_LOW_HEALTH | Triggers::ON_LOW_WARMTH, 100)
            .with_action(EffectAction::new(ActionKind::Heal, 10.0, ActionTarget::SelfTarget)),
        EffectDefinition::new("healing_potion", EffectKind::Instant, 0)
            .with_action(EffectAction::new(ActionKind::Heal, 25.0, ActionTarget::SelfTarget)),
        EffectDefinition::new("blessed", EffectKind::Buff, 0),
        EffectDefinition::new("fireproof", EffectKind::Buff, 5)
            .with_modifier(Modifier::immunity("fire")),
    ];

    StaticEffectCatalog::new(
        definitions,
        vec![CancellationPair::new("burning", "frozen")],
        vec![SynergyRule::new(
            [EffectId::from("wet"), EffectId::from("chilled")],
            "frozen",
        )],
    )
    .unwrap()
}

struct Fixture {
    catalog: StaticEffectCatalog,
    curves: BalanceCurves,
    config: RulesConfig,
    rng: PcgRng,
}

impl Fixture {
    fn new() -> Self {
        Self {
            catalog: catalog(),
            curves: BalanceCurves::default(),
            config: RulesConfig::with_seed(42),
            rng: PcgRng,
        }
    }

    fn env(&self) -> RulesEnv<'_> {
        RulesEnv::new(&self.catalog, &self.curves, &self.rng, &self.config)
    }
}

fn ledger() -> ConditionLedger {
    let mut ledger = ConditionLedger::new();
    ledger.spawn(HERO);
    ledger.spawn(WOLF);
    ledger
}

fn id(name: &str) -> EffectId {
    EffectId::from(name)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn frozen_expires_after_its_duration() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("frozen"), Some(WOLF), Turn(0))
        .unwrap();
    assert!(!resolver.net_modifier(&ledger, HERO, "speed").unwrap().is_neutral());

    for turn in 1..=2 {
        resolver.tick(&mut ledger, HERO, Turn(turn)).unwrap();
        assert!(resolver.is_active(&ledger, HERO, &id("frozen")).unwrap());
    }
    resolver.tick(&mut ledger, HERO, Turn(3)).unwrap();

    assert!(!resolver.is_active(&ledger, HERO, &id("frozen")).unwrap());
    assert!(resolver.net_modifier(&ledger, HERO, "speed").unwrap().is_neutral());
}

#[test]
fn poison_fires_on_its_interval() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("poisoned"), None, Turn(0))
        .unwrap();

    let mut fired_on = Vec::new();
    for turn in 0..12 {
        let actions = resolver.tick(&mut ledger, HERO, Turn(turn)).unwrap();
        for action in actions {
            assert_eq!(action.kind, ActionKind::Damage);
            assert_eq!(action.target, ResolvedTarget::Entity(HERO));
            assert_eq!(action.amount, 3.0);
            fired_on.push(turn);
        }
    }

    assert_eq!(fired_on, vec![0, 2, 4, 6]);
    assert!(!resolver.is_active(&ledger, HERO, &id("poisoned")).unwrap());
}

#[test]
fn permanent_effects_survive_ticks() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("blessed"), None, Turn(0))
        .unwrap();
    for turn in 0..100 {
        resolver.tick(&mut ledger, HERO, Turn(turn)).unwrap();
    }
    assert!(resolver.is_active(&ledger, HERO, &id("blessed")).unwrap());
}

#[test]
fn expiry_happens_after_exactly_duration_ticks() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();

    for name in ["frozen", "poisoned", "burning", "wet", "regeneration"] {
        let duration = fixture.catalog.lookup(&id(name)).unwrap().duration;
        let mut ledger = ledger();
        resolver
            .apply(&mut ledger, HERO, &id(name), None, Turn(0))
            .unwrap();

        for turn in 0..u64::from(duration) - 1 {
            resolver.tick(&mut ledger, HERO, Turn(turn)).unwrap();
        }
        assert!(resolver.is_active(&ledger, HERO, &id(name)).unwrap(), "{name}");

        resolver
            .tick(&mut ledger, HERO, Turn(u64::from(duration)))
            .unwrap();
        assert!(!resolver.is_active(&ledger, HERO, &id(name)).unwrap(), "{name}");
    }
}

// ============================================================================
// Stacking
// ============================================================================

#[test]
fn stacks_grow_monotonically_up_to_the_cap() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    let poison = id("poisoned");

    let outcomes: Vec<_> = (0..5)
        .map(|_| {
            resolver
                .apply(&mut ledger, HERO, &poison, None, Turn(0))
                .unwrap()
                .outcome
        })
        .collect();

    assert_eq!(
        outcomes,
        vec![
            ApplyOutcome::Applied,
            ApplyOutcome::Stacked { stacks: 2, capped: false },
            ApplyOutcome::Stacked { stacks: 3, capped: false },
            ApplyOutcome::Stacked { stacks: 3, capped: true },
            ApplyOutcome::Stacked { stacks: 3, capped: true },
        ]
    );

    let actions = resolver.tick(&mut ledger, HERO, Turn(0)).unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].amount, 9.0);
}

#[test]
fn reapplication_refreshes_duration() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    let frozen = id("frozen");

    resolver.apply(&mut ledger, HERO, &frozen, None, Turn(0)).unwrap();
    resolver.tick(&mut ledger, HERO, Turn(1)).unwrap();
    resolver.tick(&mut ledger, HERO, Turn(2)).unwrap();

    let result = resolver.apply(&mut ledger, HERO, &frozen, None, Turn(2)).unwrap();
    assert_eq!(result.outcome, ApplyOutcome::Refreshed);

    let track = resolver.active_effects(&ledger, HERO).unwrap();
    assert_eq!(track.len(), 1);
    assert_eq!(track.get(&frozen).unwrap().remaining_duration, 3);
    assert_eq!(track.get(&frozen).unwrap().stacks, 1);
}

#[test]
fn non_stackable_reapply_is_idempotent() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    let wet = id("wet");

    resolver.apply(&mut ledger, HERO, &wet, None, Turn(0)).unwrap();
    let before = resolver.active_effects(&ledger, HERO).unwrap().clone();

    let result = resolver.apply(&mut ledger, HERO, &wet, None, Turn(1)).unwrap();

    assert_eq!(result.outcome, ApplyOutcome::Unchanged);
    assert_eq!(resolver.active_effects(&ledger, HERO).unwrap(), &before);
}

// ============================================================================
// Interactions
// ============================================================================

#[test]
fn opposing_effects_cancel() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("burning"), None, Turn(0))
        .unwrap();
    let result = resolver
        .apply(&mut ledger, HERO, &id("frozen"), None, Turn(1))
        .unwrap();

    assert_eq!(
        result.outcome,
        ApplyOutcome::Cancelled {
            removed: id("burning")
        }
    );
    assert!(resolver.active_effects(&ledger, HERO).unwrap().is_empty());
}

#[test]
fn synergy_grants_its_product() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    let first = resolver
        .apply(&mut ledger, WOLF, &id("wet"), None, Turn(0))
        .unwrap();
    assert!(first.granted.is_empty());

    let second = resolver
        .apply(&mut ledger, WOLF, &id("chilled"), Some(HERO), Turn(0))
        .unwrap();
    assert_eq!(second.granted, vec![id("frozen")]);

    let track = resolver.active_effects(&ledger, WOLF).unwrap();
    assert_eq!(track.get(&id("frozen")).unwrap().source, Some(HERO));
}

#[test]
fn immunity_resists_incoming_effect() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("fire_ward"), None, Turn(0))
        .unwrap();
    let result = resolver
        .apply(&mut ledger, HERO, &id("burning"), None, Turn(0))
        .unwrap();

    assert_eq!(result.outcome, ApplyOutcome::Resisted);
    assert!(!resolver.is_active(&ledger, HERO, &id("burning")).unwrap());
    assert_eq!(resolver.damage_multiplier(&ledger, HERO, "fire").unwrap(), 0.5);
}

#[test]
fn damage_immunity_does_not_resist_effects() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("fireproof"), None, Turn(0))
        .unwrap();
    let result = resolver
        .apply(&mut ledger, HERO, &id("burning"), None, Turn(0))
        .unwrap();

    assert_eq!(result.outcome, ApplyOutcome::Applied);
    assert_eq!(resolver.damage_multiplier(&ledger, HERO, "fire").unwrap(), 0.0);
}

#[test]
fn instant_effects_fire_without_entering_the_track() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    let result = resolver
        .apply(&mut ledger, HERO, &id("healing_potion"), None, Turn(0))
        .unwrap();

    assert_eq!(result.outcome, ApplyOutcome::Applied);
    assert_eq!(result.actions.len(), 1);
    assert_eq!(result.actions[0].kind, ActionKind::Heal);
    assert_eq!(result.actions[0].amount, 25.0);
    assert!(resolver.active_effects(&ledger, HERO).unwrap().is_empty());
}

#[test]
fn modifier_folding_ignores_application_order() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let names = ["enraged", "sharpened", "weakened"];

    let mut forward = ledger();
    for name in names {
        resolver.apply(&mut forward, HERO, &id(name), None, Turn(0)).unwrap();
    }
    let mut backward = ledger();
    for name in names.iter().rev() {
        resolver.apply(&mut backward, HERO, &id(name), None, Turn(0)).unwrap();
    }

    let a = resolver.net_modifier(&forward, HERO, "damage").unwrap();
    let b = resolver.net_modifier(&backward, HERO, "damage").unwrap();
    assert!((a.apply(10.0) - b.apply(10.0)).abs() < 1e-9);
    // (10 + 3) * 1.5 * 0.8
    assert!((a.apply(10.0) - 15.6).abs() < 1e-9);
}

#[test]
fn apply_then_remove_restores_the_track() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver.apply(&mut ledger, HERO, &id("wet"), None, Turn(0)).unwrap();
    let before = resolver.active_effects(&ledger, HERO).unwrap().clone();

    resolver
        .apply(&mut ledger, HERO, &id("enraged"), None, Turn(0))
        .unwrap();
    assert!(resolver.remove(&mut ledger, HERO, &id("enraged")).unwrap());

    assert_eq!(resolver.active_effects(&ledger, HERO).unwrap(), &before);
    assert!(resolver.net_modifier(&ledger, HERO, "damage").unwrap().is_neutral());
    assert!(!resolver.remove(&mut ledger, HERO, &id("enraged")).unwrap());
}

#[test]
fn dispel_respects_dispellable_flag() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver
        .apply(&mut ledger, HERO, &id("fire_ward"), None, Turn(0))
        .unwrap();
    resolver.apply(&mut ledger, HERO, &id("wet"), None, Turn(0)).unwrap();

    assert!(!resolver.dispel(&mut ledger, HERO, &id("fire_ward")).unwrap());
    assert!(resolver.dispel(&mut ledger, HERO, &id("wet")).unwrap());
    assert!(resolver.is_active(&ledger, HERO, &id("fire_ward")).unwrap());
}

#[test]
fn cleanse_strips_only_matching_effects() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    for name in ["poisoned", "regeneration", "wet", "fire_ward"] {
        resolver.apply(&mut ledger, HERO, &id(name), None, Turn(0)).unwrap();
    }

    let removed = resolver
        .cleanse(&mut ledger, HERO, CleanseFilter::Harmful)
        .unwrap();

    assert_eq!(removed, vec![id("poisoned"), id("wet")]);
    let remaining: Vec<_> = resolver
        .active_effects(&ledger, HERO)
        .unwrap()
        .effect_ids()
        .cloned()
        .collect();
    assert_eq!(remaining, vec![id("regeneration"), id("fire_ward")]);
}

// ============================================================================
// Triggers
// ============================================================================

#[test]
fn thorns_reflect_damage_to_the_attacker() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver.apply(&mut ledger, HERO, &id("thorns"), None, Turn(0)).unwrap();

    let ctx = TriggerContext::new(Turn(3)).with_opponent(WOLF).with_damage(10);
    let actions = resolver
        .evaluate_trigger(&ledger, HERO, TriggerEvent::OnTakeDamage, &ctx)
        .unwrap();

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::Reflect);
    assert_eq!(actions[0].amount, 5.0);
    assert_eq!(actions[0].target, ResolvedTarget::Entity(WOLF));

    let unrelated = resolver
        .evaluate_trigger(&ledger, HERO, TriggerEvent::OnKill, &ctx)
        .unwrap();
    assert!(unrelated.is_empty());
}

#[test]
fn zero_chance_never_fires() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver.apply(&mut ledger, HERO, &id("jinxed"), None, Turn(0)).unwrap();

    for turn in 0..200 {
        let ctx = TriggerContext::new(Turn(turn)).with_opponent(WOLF);
        let actions = resolver
            .evaluate_trigger(&ledger, HERO, TriggerEvent::OnHit, &ctx)
            .unwrap();
        assert!(actions.is_empty());
    }
}

#[test]
fn trigger_rolls_replay_for_the_same_seed() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver.apply(&mut ledger, HERO, &id("fickle"), None, Turn(0)).unwrap();

    let run = || -> Vec<bool> {
        (0..64)
            .map(|turn| {
                let ctx = TriggerContext::new(Turn(turn)).with_opponent(WOLF);
                !resolver
                    .evaluate_trigger(&ledger, HERO, TriggerEvent::OnHit, &ctx)
                    .unwrap()
                    .is_empty()
            })
            .collect()
    };

    let first = run();
    assert_eq!(first, run());
    let fired = first.iter().filter(|&&hit| hit).count();
    assert!(fired > 0 && fired < first.len());
}

#[test]
fn repeated_events_in_one_turn_roll_independently() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver.apply(&mut ledger, HERO, &id("fickle"), None, Turn(0)).unwrap();

    let fires = |turn: u64, sequence: u32| {
        let ctx = TriggerContext::new(Turn(turn))
            .with_opponent(WOLF)
            .with_sequence(sequence);
        !resolver
            .evaluate_trigger(&ledger, HERO, TriggerEvent::OnHit, &ctx)
            .unwrap()
            .is_empty()
    };

    let mut disagreements = 0;
    for turn in 0..200 {
        let first_hit = fires(turn, 0);
        let second_hit = fires(turn, 1);
        assert_eq!(second_hit, fires(turn, 1));
        if first_hit != second_hit {
            disagreements += 1;
        }
    }
    assert!(disagreements > 0);
}

#[test]
fn thresholds_fire_low_health_and_low_warmth() {
    let fixture = Fixture::new();
    let stats = SnapshotStatsOracle::new()
        .with(
            HERO,
            EntityStats {
                current_hp: 20,
                max_hp: 100,
                current_warmth: 10,
                max_warmth: 100,
                ..EntityStats::default()
            },
        )
        .with(
            WOLF,
            EntityStats {
                current_hp: 90,
                max_hp: 100,
                current_warmth: 90,
                max_warmth: 100,
                ..EntityStats::default()
            },
        );
    let env = fixture.env().with_stats(&stats);
    let resolver = env.resolver();
    let mut ledger = ledger();
    resolver
        .apply(&mut ledger, HERO, &id("last_stand"), None, Turn(0))
        .unwrap();
    resolver
        .apply(&mut ledger, WOLF, &id("last_stand"), None, Turn(0))
        .unwrap();

    let ctx = TriggerContext::new(Turn(5));
    assert_eq!(resolver.evaluate_thresholds(&ledger, HERO, &ctx).unwrap().len(), 2);
    assert!(resolver.evaluate_thresholds(&ledger, WOLF, &ctx).unwrap().is_empty());

    let blind = fixture.env().resolver();
    assert!(blind.evaluate_thresholds(&ledger, HERO, &ctx).unwrap().is_empty());
}

// ============================================================================
// Failure semantics
// ============================================================================

#[test]
fn unknown_effect_fails_fast() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    let result = resolver.apply(&mut ledger, HERO, &id("petrified"), None, Turn(0));

    assert_eq!(result, Err(EffectError::UnknownEffect(id("petrified"))));
    assert!(resolver.active_effects(&ledger, HERO).unwrap().is_empty());
}

#[test]
fn missing_entity_is_reported_and_absorbed_in_batches() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    let ghost = EntityId(99);

    assert_eq!(
        resolver.apply(&mut ledger, ghost, &id("wet"), None, Turn(0)),
        Err(EffectError::EntityNotFound(ghost))
    );

    resolver
        .apply(&mut ledger, WOLF, &id("burning"), None, Turn(0))
        .unwrap();
    let actions = resolver
        .tick_batch(&mut ledger, [ghost, WOLF], Turn(0))
        .unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].bearer, WOLF);
}

#[test]
fn despawned_entities_lose_their_track() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    assert!(resolver.active_effects(&ledger, WOLF).unwrap().is_empty());
    resolver
        .apply(&mut ledger, WOLF, &id("burning"), None, Turn(0))
        .unwrap();
    ledger.despawn(WOLF);

    assert_eq!(
        resolver.apply(&mut ledger, WOLF, &id("wet"), None, Turn(1)),
        Err(EffectError::EntityNotFound(WOLF))
    );
    assert!(!ledger.contains(WOLF));
}

#[test]
fn out_of_range_stacks_are_clamped_on_tick() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    let max = fixture
        .catalog
        .lookup(&id("poisoned"))
        .unwrap()
        .stacking
        .effective_max();

    resolver
        .apply(&mut ledger, HERO, &id("poisoned"), None, Turn(0))
        .unwrap();
    resolver
        .apply(&mut ledger, WOLF, &id("poisoned"), None, Turn(0))
        .unwrap();
    let poisoned = id("poisoned");
    ledger.track_mut(HERO).unwrap().get_mut(&poisoned).unwrap().stacks = max + 7;
    ledger.track_mut(WOLF).unwrap().get_mut(&poisoned).unwrap().stacks = 0;

    let actions = resolver.tick(&mut ledger, HERO, Turn(0)).unwrap();
    resolver.tick(&mut ledger, WOLF, Turn(0)).unwrap();

    let hero_stacks = ledger.track(HERO).unwrap().get(&poisoned).unwrap().stacks;
    let wolf_stacks = ledger.track(WOLF).unwrap().get(&poisoned).unwrap().stacks;
    assert_eq!(hero_stacks, max);
    assert_eq!(wolf_stacks, 1);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].amount, 3.0 * f64::from(max));
}

#[test]
fn timed_entry_without_duration_is_purged() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();

    resolver
        .apply(&mut ledger, HERO, &id("burning"), None, Turn(0))
        .unwrap();
    ledger
        .track_mut(HERO)
        .unwrap()
        .get_mut(&id("burning"))
        .unwrap()
        .remaining_duration = 0;

    let actions = resolver.tick(&mut ledger, HERO, Turn(1)).unwrap();

    assert!(actions.is_empty());
    assert!(!resolver.is_active(&ledger, HERO, &id("burning")).unwrap());
}

#[test]
fn full_track_rejects_new_effects() {
    let capacity = RulesConfig::MAX_EFFECTS_PER_ENTITY;
    let catalog = StaticEffectCatalog::from_definitions(
        (0..=capacity).map(|n| EffectDefinition::new(format!("mark_{n}"), EffectKind::Buff, 0)),
    )
    .unwrap();
    let curves = BalanceCurves::default();
    let config = RulesConfig::default();
    let rng = PcgRng;
    let env = RulesEnv::new(&catalog, &curves, &rng, &config);
    let resolver = env.resolver();
    let mut ledger = ledger();

    for n in 0..capacity {
        let result = resolver
            .apply(&mut ledger, HERO, &id(&format!("mark_{n}")), None, Turn(0))
            .unwrap();
        assert_eq!(result.outcome, ApplyOutcome::Applied);
    }
    let before = ledger.track(HERO).unwrap().clone();

    let overflow = id(&format!("mark_{capacity}"));
    let result = resolver
        .apply(&mut ledger, HERO, &overflow, None, Turn(1))
        .unwrap();

    assert_eq!(result.outcome, ApplyOutcome::Rejected);
    assert!(!result.outcome.is_active());
    assert_eq!(ledger.track(HERO).unwrap(), &before);
    assert_eq!(before.len(), capacity);
    assert!(!resolver.is_active(&ledger, HERO, &overflow).unwrap());
}

#[test]
fn tick_all_visits_entities_in_id_order() {
    let fixture = Fixture::new();
    let resolver = fixture.env().resolver();
    let mut ledger = ledger();
    resolver
        .apply(&mut ledger, WOLF, &id("burning"), None, Turn(0))
        .unwrap();
    resolver
        .apply(&mut ledger, HERO, &id("regeneration"), None, Turn(0))
        .unwrap();

    let bearers: Vec<_> = resolver
        .tick_all(&mut ledger, Turn(0))
        .unwrap()
        .into_iter()
        .map(|action| action.bearer)
        .collect();
    assert_eq!(bearers, vec![HERO, WOLF]);
}

// ============================================================================
// Balance
// ============================================================================

#[test]
fn death_probability_stays_in_bounds() {
    let curves = BalanceCurves::default();
    let engine = BalanceCurveEngine::new(&curves);

    for floor in [0, 1, 5, 12, 20, 40, 200] {
        for power in [0, 5, 50, 500] {
            let player = PlayerStats {
                total_damage: power,
                total_defense: power,
                current_hp: power / 3,
                max_hp: power,
                current_warmth: power / 4,
                max_warmth: power,
            };
            let p = engine.death_probability(&player, floor);
            assert!((0.10..=0.95).contains(&p), "floor {floor} power {power}: {p}");
        }
    }
}

#[test]
fn requirements_never_shrink_with_depth() {
    let curves = BalanceCurves::default();
    let engine = BalanceCurveEngine::new(&curves);

    let mut previous = engine.required_stats_for_floor(0);
    for floor in 1..80 {
        let current = engine.required_stats_for_floor(floor);
        assert!(current.min_damage >= previous.min_damage, "floor {floor}");
        assert!(current.min_hp >= previous.min_hp, "floor {floor}");
        previous = current;
    }
}
