//! Content factory for building the rules tables from data files.

use std::path::{Path, PathBuf};

use dungeon_rules::{BalanceCurves, RngOracle, RulesConfig, RulesEnv, StaticEffectCatalog};

use crate::loaders::{BalanceLoader, ConfigLoader, EffectLoader, LoadResult};

/// Every read-only table the rules core needs, loaded together.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub catalog: StaticEffectCatalog,
    pub curves: BalanceCurves,
    pub config: RulesConfig,
}

impl ContentBundle {
    /// Borrows the bundle as a rules environment.
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> RulesEnv<'a> {
        RulesEnv::new(&self.catalog, &self.curves, rng, &self.config)
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── balance.toml
/// └── effects.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rules configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load balance curves from `balance.toml`.
    pub fn load_balance(&self) -> LoadResult<BalanceCurves> {
        let path = self.data_dir.join("balance.toml");
        BalanceLoader::load(&path)
    }

    /// Load the effect catalog from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<StaticEffectCatalog> {
        let path = self.data_dir.join("effects.ron");
        EffectLoader::load(&path)
    }

    /// Load every table at once.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            catalog: self.load_effects()?,
            curves: self.load_balance()?,
            config: self.load_config()?,
        };
        tracing::info!(data_dir = %self.data_dir.display(), "content loaded");
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
