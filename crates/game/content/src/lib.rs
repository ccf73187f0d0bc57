//! Data-driven content definitions and loaders.
//!
//! This crate turns the data files of a game into the read-only tables the
//! rules core consumes:
//! - Effect catalog with cancellation pairs and synergies (RON)
//! - Balance curves and requirement checkpoints (TOML)
//! - Rules configuration (TOML)
//!
//! Content is built once at startup and shared by reference; it never
//! appears in mutable game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceLoader, ConfigLoader, ContentBundle, ContentFactory, EffectCatalogFile, EffectLoader,
    LoadResult,
};
