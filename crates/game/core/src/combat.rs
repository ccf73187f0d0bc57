//! Composition of the two engines.
//!
//! Floor scaling runs first; modifiers from active effects are applied on
//! top of the scaled numbers.

use crate::balance::{BossStats, EnemyStats, ScaledStats};
use crate::effect::{EffectError, EffectResolver};
use crate::env::RulesEnv;
use crate::state::{ConditionLedger, EntityId};

/// Stat names targeted by `ModifierKind::Stat` modifiers.
pub mod stat {
    pub const DAMAGE: &str = "damage";
    pub const MAX_HP: &str = "max_hp";
    pub const ACCURACY: &str = "accuracy";
    pub const SPEED: &str = "speed";
    pub const DEFENSE: &str = "defense";
}

/// Floor-scaled enemy stats with the entity's active modifiers applied.
pub fn effective_enemy_stats(
    env: &RulesEnv<'_>,
    ledger: &ConditionLedger,
    entity: EntityId,
    floor: u32,
    base: &EnemyStats,
) -> Result<ScaledStats, EffectError> {
    let scaled = env.balance().scale_enemy_stats(floor, base);
    apply_modifiers(&env.resolver(), ledger, entity, scaled)
}

/// Floor-scaled boss stats with the entity's active modifiers applied.
pub fn effective_boss_stats(
    env: &RulesEnv<'_>,
    ledger: &ConditionLedger,
    entity: EntityId,
    floor: u32,
    base: &BossStats,
) -> Result<ScaledStats, EffectError> {
    let scaled = env.balance().scale_boss_stats(floor, base);
    apply_modifiers(&env.resolver(), ledger, entity, scaled)
}

/// Damage left after the target's resistances, vulnerabilities and
/// immunities for `damage_type`. Rounds down.
pub fn mitigated_damage(
    env: &RulesEnv<'_>,
    ledger: &ConditionLedger,
    target: EntityId,
    raw: u32,
    damage_type: &str,
) -> Result<u32, EffectError> {
    let multiplier = env
        .resolver()
        .damage_multiplier(ledger, target, damage_type)?;
    let mitigated = (f64::from(raw) * multiplier).floor();
    Ok(if mitigated >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        mitigated as u32
    })
}

fn apply_modifiers(
    resolver: &EffectResolver<'_>,
    ledger: &ConditionLedger,
    entity: EntityId,
    mut stats: ScaledStats,
) -> Result<ScaledStats, EffectError> {
    let net = |name: &str| resolver.net_modifier(ledger, entity, name);

    stats.damage = net(stat::DAMAGE)?.apply_u32(stats.damage);
    stats.max_hp = net(stat::MAX_HP)?.apply_u32(stats.max_hp);
    stats.accuracy = net(stat::ACCURACY)?.apply_u32(stats.accuracy);
    stats.speed = net(stat::SPEED)?.apply_i32(stats.speed);
    stats.defense = net(stat::DEFENSE)?.apply_u32(stats.defense);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceCurves;
    use crate::config::RulesConfig;
    use crate::effect::{EffectDefinition, EffectId, EffectKind, Modifier, StaticEffectCatalog};
    use crate::env::PcgRng;
    use crate::state::Turn;

    fn catalog() -> StaticEffectCatalog {
        StaticEffectCatalog::from_definitions(vec![
            EffectDefinition::new("enraged", EffectKind::Buff, 5)
                .with_modifier(Modifier::multiply(stat::DAMAGE, 1.5)),
            EffectDefinition::new("frozen", EffectKind::Debuff, 3)
                .with_modifier(Modifier::multiply(stat::SPEED, 0.0)),
            EffectDefinition::new("fire_ward", EffectKind::Buff, 5)
                .with_modifier(Modifier::resistance("fire", 0.5)),
            EffectDefinition::new("soaked", EffectKind::Debuff, 5)
                .with_modifier(Modifier::vulnerability("frost", 0.25)),
            EffectDefinition::new("fireproof", EffectKind::Buff, 5)
                .with_modifier(Modifier::immunity("fire")),
        ])
        .unwrap()
    }

    fn base() -> EnemyStats {
        EnemyStats {
            damage: 10,
            max_hp: 100,
            accuracy: 50,
            speed: 10,
            defense: 2,
            abilities: Vec::new(),
        }
    }

    #[test]
    fn modifiers_apply_after_scaling() {
        let catalog = catalog();
        let curves = BalanceCurves::default();
        let config = RulesConfig::default();
        let env = RulesEnv::new(&catalog, &curves, &PcgRng, &config);
        let resolver = env.resolver();

        let mut ledger = ConditionLedger::new();
        let orc = EntityId(7);
        ledger.spawn(orc);
        resolver
            .apply(&mut ledger, orc, &EffectId::from("enraged"), None, Turn::ZERO)
            .unwrap();
        resolver
            .apply(&mut ledger, orc, &EffectId::from("frozen"), None, Turn::ZERO)
            .unwrap();

        let stats = effective_enemy_stats(&env, &ledger, orc, 10, &base()).unwrap();

        // 18 scaled damage * 1.5
        assert_eq!(stats.damage, 27);
        assert_eq!(stats.max_hp, 160);
        assert_eq!(stats.speed, 0);
    }

    #[test]
    fn missing_entity_is_reported() {
        let catalog = catalog();
        let curves = BalanceCurves::default();
        let config = RulesConfig::default();
        let env = RulesEnv::new(&catalog, &curves, &PcgRng, &config);

        let result = effective_boss_stats(&env, &ConditionLedger::new(), EntityId(3), 1, &base());
        assert_eq!(result, Err(EffectError::EntityNotFound(EntityId(3))));
    }

    #[test]
    fn mitigation_follows_damage_multiplier() {
        let catalog = catalog();
        let curves = BalanceCurves::default();
        let config = RulesConfig::default();
        let env = RulesEnv::new(&catalog, &curves, &PcgRng, &config);
        let resolver = env.resolver();

        let mut ledger = ConditionLedger::new();
        let hero = EntityId::PLAYER;
        ledger.spawn(hero);
        for id in ["fire_ward", "soaked"] {
            resolver
                .apply(&mut ledger, hero, &EffectId::from(id), None, Turn::ZERO)
                .unwrap();
        }

        assert_eq!(mitigated_damage(&env, &ledger, hero, 21, "fire").unwrap(), 10);
        assert_eq!(mitigated_damage(&env, &ledger, hero, 20, "frost").unwrap(), 25);
        assert_eq!(mitigated_damage(&env, &ledger, hero, 20, "physical").unwrap(), 20);

        resolver
            .apply(&mut ledger, hero, &EffectId::from("fireproof"), None, Turn::ZERO)
            .unwrap();
        assert_eq!(mitigated_damage(&env, &ledger, hero, 999, "fire").unwrap(), 0);
    }
}
