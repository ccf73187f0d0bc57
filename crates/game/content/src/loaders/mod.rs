//! Content loaders for reading game data from files.
//!
//! Each loader parses one file format into `dungeon-rules` types and runs
//! the same validation the rules core applies to hand-built tables.

pub mod balance;
pub mod config;
pub mod effects;
pub mod factory;

pub use balance::BalanceLoader;
pub use config::ConfigLoader;
pub use effects::{EffectCatalogFile, EffectLoader};
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
