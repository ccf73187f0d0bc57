//! Effect resolution engine.
//!
//! Definitions live in an [`EffectCatalog`]; live instances live in the
//! per-entity condition tracks; the [`EffectResolver`] is the only code that
//! moves between the two.
mod action;
mod catalog;
mod definition;
mod error;
mod modifier;
mod resolver;

pub use action::{Allegiance, ResolvedTarget, TriggerContext, TriggeredAction};
pub use catalog::{CancellationPair, EffectCatalog, StaticEffectCatalog, SynergyRule};
pub use definition::{
    ActionCondition, ActionKind, ActionTarget, EffectAction, EffectDefinition, EffectId,
    EffectKind, Modifier, ModifierKind, StackingPolicy, StackingRule, TriggerEvent, Triggers,
};
pub use error::{CatalogError, EffectError};
pub use modifier::NetModifier;
pub use resolver::{ApplyOutcome, ApplyResult, CleanseFilter, EffectResolver};
