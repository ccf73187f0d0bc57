//! RNG oracle for deterministic trigger rolls.
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same value. Trigger sequences are therefore
//! reproducible for a fixed game seed, which the tests rely on.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform draw in `[0, 100)`.
    fn roll_percent(&self, seed: u64) -> u32 {
        self.next_u32(seed) % 100
    }

    /// Returns true when a `[0, 100)` draw lands below `percent`.
    ///
    /// `0` never succeeds, `100` always does.
    fn chance(&self, seed: u64, percent: u32) -> bool {
        self.roll_percent(seed) < percent
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state, a single
/// multiply + xorshift + rotate per draw.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed for one trigger roll.
///
/// # Arguments
///
/// * `game_seed` - Base seed set at game start (for replay/determinism)
/// * `turn` - Current turn number
/// * `entity` - Entity whose effect is rolling
/// * `context` - Distinguishes independent rolls within the same turn
///   (roll sequence, event kind and track position)
///
/// Distinct contexts always yield distinct seeds for the same game seed,
/// turn and entity.
pub fn compute_seed(game_seed: u64, turn: u64, entity: u32, context: u64) -> u64 {
    // SplitMix64 / FxHash style multipliers
    let mut hash = game_seed;

    hash ^= turn.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (entity as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= context.wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_roll() {
        let rng = PcgRng;
        let seed = compute_seed(42, 7, 3, 1);
        assert_eq!(rng.roll_percent(seed), rng.roll_percent(seed));
    }

    #[test]
    fn rolls_stay_in_percent_range() {
        let rng = PcgRng;
        for turn in 0..500 {
            let roll = rng.roll_percent(compute_seed(1, turn, 0, 0));
            assert!(roll < 100);
        }
    }

    #[test]
    fn chance_bounds_are_absolute() {
        let rng = PcgRng;
        for turn in 0..200 {
            let seed = compute_seed(9, turn, 1, 2);
            assert!(!rng.chance(seed, 0));
            assert!(rng.chance(seed, 100));
        }
    }

    #[test]
    fn context_changes_seed() {
        assert_ne!(compute_seed(1, 1, 1, 0), compute_seed(1, 1, 1, 1));
        assert_ne!(compute_seed(1, 1, 1, 0), compute_seed(1, 1, 2, 0));
        assert_ne!(compute_seed(1, 1, 1, 1), compute_seed(1, 1, 1, 1 << 32));
    }
}
