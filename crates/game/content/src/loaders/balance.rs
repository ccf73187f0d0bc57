//! Balance curve loader.

use std::path::Path;

use dungeon_rules::BalanceCurves;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance curves and checkpoints from TOML files.
pub struct BalanceLoader;

impl BalanceLoader {
    /// Load and validate balance curves from a TOML file.
    ///
    /// Omitted keys keep the built-in tuning. Checkpoints may be listed in
    /// any order but at most once per floor.
    pub fn load(path: &Path) -> LoadResult<BalanceCurves> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BalanceCurves> {
        let curves: BalanceCurves = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;
        curves
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid balance curves: {}", e))?;

        tracing::debug!(
            checkpoints = curves.checkpoints.len(),
            boss_unlocks = curves.boss_unlocks.len(),
            "balance curves loaded"
        );
        Ok(curves)
    }
}
