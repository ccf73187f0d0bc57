//! Net modifier aggregate.
//!
//! Follows the same calculation order as the stat bonus stack:
//! additive values are summed first, then multipliers are applied.
//!
//! ```text
//! result = (base + Σ additive) × Π multiplicative
//! ```
//!
//! The aggregate is rebuilt from the condition track on every query and is
//! never stored, so it cannot drift from the catalog.

use crate::effect::{Modifier, ModifierKind};

/// Folded stat modifiers for a single stat on a single entity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetModifier {
    pub additive: f64,
    pub multiplicative: f64,
}

impl NetModifier {
    /// No change: `+0`, `×1`.
    pub const NEUTRAL: Self = Self {
        additive: 0.0,
        multiplicative: 1.0,
    };

    /// Folds one stat modifier carried by an instance with `stacks` stacks.
    ///
    /// Each stack contributes the modifier once: additive values scale
    /// linearly, multipliers compound.
    pub fn fold(&mut self, modifier: &Modifier, stacks: u32) {
        debug_assert_eq!(modifier.kind, ModifierKind::Stat);
        if modifier.is_multiplier {
            let exponent = i32::try_from(stacks).unwrap_or(i32::MAX);
            self.multiplicative *= modifier.value.powi(exponent);
        } else {
            self.additive += modifier.value * f64::from(stacks);
        }
    }

    /// Applies the aggregate to a base value.
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.additive) * self.multiplicative
    }

    /// Applies the aggregate to an integer stat, flooring and clamping at 0.
    pub fn apply_u32(&self, base: u32) -> u32 {
        let value = self.apply(f64::from(base)).floor();
        if value <= 0.0 {
            0
        } else if value >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            value as u32
        }
    }

    /// Applies the aggregate to a signed integer stat, flooring.
    pub fn apply_i32(&self, base: i32) -> i32 {
        let value = self.apply(f64::from(base)).floor();
        value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

impl Default for NetModifier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
