use crate::hash::position;
use crate::rank::RankedBits;
use crate::util::BitSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One stage of the cascade: a rank-indexed bit vector, the seed that placed
/// keys into it, and its total set-bit count.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub(crate) bits: RankedBits,
    pub(crate) seed: u64,
    /// Total 1-bits, i.e. the number of keys this level placed.
    pub(crate) ones: u64,
}

impl Level {
    /// Fills one level from `keys` and hands back the keys that collided.
    ///
    /// The level is sized `floor(gamma * keys.len())`. A position ends up set
    /// iff exactly one key hashed to it; the claimed/collided pair walks each
    /// position through the three reachable states {unclaimed, single-claim,
    /// collision} without per-slot counters. Keys that kept a unique slot are
    /// consumed; the rest are returned for the next stage.
    pub(crate) fn build(keys: Vec<Vec<u8>>, gamma: f64, seed: u64) -> (Self, Vec<Vec<u8>>) {
        let size = (gamma * keys.len() as f64) as usize;
        if size == 0 {
            // No slots to hash into; every key falls through untouched.
            let level = Self { bits: RankedBits::new(Box::new([]), 0), seed, ones: 0 };
            return (level, keys);
        }

        let positions = hash_positions(&keys, seed, size);

        let mut claimed = BitSet::new(size);
        let mut collided = BitSet::new(size);
        for &pos in &positions {
            if collided.test(pos) {
                // Permanently a collision, nothing more to record.
            } else if claimed.test(pos) {
                // Second claimant evicts the first.
                claimed.clear(pos);
                collided.set(pos);
            } else {
                claimed.set(pos);
            }
        }

        let mut leftover = Vec::new();
        for (key, pos) in keys.into_iter().zip(&positions) {
            if !claimed.test(*pos) {
                leftover.push(key);
            }
        }

        let (words, len) = claimed.into_parts();
        let bits = RankedBits::new(words, len);
        let ones = bits.ones();
        (Self { bits, seed, ones }, leftover)
    }

    /// Level size in bits.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.bits.len()
    }
}

/// Hash every key to its slot, in parallel when the `parallel` feature is on.
/// Bit transitions stay sequential either way; only the hashing fans out.
fn hash_positions(keys: &[Vec<u8>], seed: u64, size: usize) -> Vec<usize> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        keys.par_iter().map(|k| position(k, seed, size)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        keys.iter().map(|k| position(k, seed, size)).collect()
    }
}
