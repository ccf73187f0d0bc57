//! Read-only collaborators of the rules core.
//!
//! The effect catalog, balance curves, RNG and stat provider are bundled in
//! a [`RulesEnv`] owned by the surrounding game loop and passed explicitly
//! to every operation. Nothing in the crate reaches for global state, so
//! independent environments (e.g. parallel tests) never interfere.
mod rng;
mod stats;

pub use rng::{PcgRng, RngOracle, compute_seed};
pub use stats::{EntityStats, SnapshotStatsOracle, StatsOracle};

use crate::balance::{BalanceCurveEngine, BalanceCurves};
use crate::config::RulesConfig;
use crate::effect::{EffectCatalog, EffectResolver};

/// Aggregates the read-only data required by the resolver and balance engine.
#[derive(Clone, Copy)]
pub struct RulesEnv<'a> {
    catalog: &'a dyn EffectCatalog,
    curves: &'a BalanceCurves,
    rng: &'a dyn RngOracle,
    config: &'a RulesConfig,
    stats: Option<&'a dyn StatsOracle>,
}

impl<'a> RulesEnv<'a> {
    pub fn new(
        catalog: &'a dyn EffectCatalog,
        curves: &'a BalanceCurves,
        rng: &'a dyn RngOracle,
        config: &'a RulesConfig,
    ) -> Self {
        Self {
            catalog,
            curves,
            rng,
            config,
            stats: None,
        }
    }

    /// Attaches a stat provider (builder pattern).
    ///
    /// Without one, stat-gated action conditions never pass and threshold
    /// triggers never fire.
    #[must_use]
    pub fn with_stats(mut self, stats: &'a dyn StatsOracle) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn catalog(&self) -> &'a dyn EffectCatalog {
        self.catalog
    }

    pub fn curves(&self) -> &'a BalanceCurves {
        self.curves
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a RulesConfig {
        self.config
    }

    pub fn stats(&self) -> Option<&'a dyn StatsOracle> {
        self.stats
    }

    /// Effect resolver bound to this environment.
    pub fn resolver(&self) -> EffectResolver<'a> {
        EffectResolver::new(*self)
    }

    /// Balance engine bound to this environment's curves.
    pub fn balance(&self) -> BalanceCurveEngine<'a> {
        BalanceCurveEngine::new(self.curves)
    }
}

impl core::fmt::Debug for RulesEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RulesEnv")
            .field("curves", self.curves)
            .field("config", self.config)
            .field("has_stats", &self.stats.is_some())
            .finish_non_exhaustive()
    }
}
