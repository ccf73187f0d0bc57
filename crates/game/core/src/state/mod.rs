//! Mutable condition state owned by combat participants.
//!
//! Everything else in the crate is read-only configuration. The only state
//! the rules core mutates is the per-entity [`ConditionTrack`], collected in
//! a world-owned [`ConditionLedger`].
mod common;
mod ledger;
mod track;

pub use common::{EntityId, Turn};
pub use ledger::ConditionLedger;
pub use track::{ConditionEntry, ConditionTrack};
