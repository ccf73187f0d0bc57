//! Sparse, floor-indexed requirement checkpoints.

use crate::balance::{BalanceError, Requirements};

/// Authored requirements anchored at a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    pub floor: u32,
    pub requirements: Requirements,
}

impl Checkpoint {
    pub const fn new(floor: u32, requirements: Requirements) -> Self {
        Self {
            floor,
            requirements,
        }
    }
}

/// Checkpoints sorted by ascending floor, at most one per floor.
///
/// Any set of floors is accepted; lookups use a binary search for the
/// greatest checkpoint at or below the queried floor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Checkpoint>", into = "Vec<Checkpoint>")
)]
pub struct CheckpointTable {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointTable {
    /// Sorts `checkpoints` by floor.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::DuplicateCheckpoint` if two checkpoints share
    /// a floor.
    pub fn new(mut checkpoints: Vec<Checkpoint>) -> Result<Self, BalanceError> {
        checkpoints.sort_by_key(|c| c.floor);
        if let Some(pair) = checkpoints.windows(2).find(|w| w[0].floor == w[1].floor) {
            return Err(BalanceError::DuplicateCheckpoint(pair[0].floor));
        }
        Ok(Self { checkpoints })
    }

    /// Greatest checkpoint whose floor is `<= floor`.
    pub fn at_or_below(&self, floor: u32) -> Option<&Checkpoint> {
        let index = self.checkpoints.partition_point(|c| c.floor <= floor);
        index.checked_sub(1).map(|i| &self.checkpoints[i])
    }

    pub fn first(&self) -> Option<&Checkpoint> {
        self.checkpoints.first()
    }

    pub fn last(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

impl TryFrom<Vec<Checkpoint>> for CheckpointTable {
    type Error = BalanceError;

    fn try_from(checkpoints: Vec<Checkpoint>) -> Result<Self, Self::Error> {
        Self::new(checkpoints)
    }
}

impl From<CheckpointTable> for Vec<Checkpoint> {
    fn from(table: CheckpointTable) -> Self {
        table.checkpoints
    }
}
