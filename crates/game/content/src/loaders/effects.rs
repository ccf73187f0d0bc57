//! Effect catalog loader.

use std::path::Path;

use dungeon_rules::{
    CancellationPair, EffectCatalog, EffectDefinition, StaticEffectCatalog, SynergyRule,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectCatalogFile {
    pub effects: Vec<EffectDefinition>,
    #[serde(default)]
    pub cancellations: Vec<CancellationPair>,
    #[serde(default)]
    pub synergies: Vec<SynergyRule>,
}

impl EffectCatalogFile {
    /// Validates cross-references and builds the in-memory catalog.
    pub fn into_catalog(self) -> LoadResult<StaticEffectCatalog> {
        let effects = self.effects.len();
        let catalog = StaticEffectCatalog::new(self.effects, self.cancellations, self.synergies)
            .map_err(|e| anyhow::anyhow!("Invalid effect catalog: {}", e))?;

        tracing::debug!(
            effects,
            cancellations = catalog.cancellation_pairs().len(),
            synergies = catalog.synergies().len(),
            "effect catalog loaded"
        );
        Ok(catalog)
    }
}

/// Loader for the effect catalog from RON files.
pub struct EffectLoader;

impl EffectLoader {
    /// Load and validate an effect catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an [`EffectCatalogFile`]
    pub fn load(path: &Path) -> LoadResult<StaticEffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StaticEffectCatalog> {
        let file: EffectCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;
        file.into_catalog()
    }
}
