//! Rules configuration loader.

use std::path::Path;

use dungeon_rules::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for rules configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.low_health_percent > 100 || config.low_warmth_percent > 100 {
            anyhow::bail!(
                "Threshold percentages must be within 0..=100 (health {}, warmth {})",
                config.low_health_percent,
                config.low_warmth_percent
            );
        }

        tracing::debug!(
            game_seed = config.game_seed,
            low_health_percent = config.low_health_percent,
            low_warmth_percent = config.low_warmth_percent,
            "rules config loaded"
        );
        Ok(config)
    }
}
