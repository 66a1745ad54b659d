use crate::hash::position;
use crate::level::Level;
use hashbrown::{HashMap, HashSet};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use thiserror::Error;

/// Number of cascade levels before the fallback table takes over.
pub const LEVELS: usize = 3;

/// Per-level seeds. Fixed constants so a key's path through the cascade is
/// reproducible between construction and query without being stored.
pub const DEFAULT_SEEDS: [u64; LEVELS] = [777, 888, 999];

/// Added to `n` to form the not-a-member return value.
pub const SENTINEL_OFFSET: u64 = 1_234_567;

/// Minimal perfect hash over a fixed key set: three cascading rank-indexed
/// bit arrays plus a fallback table for the keys that collide through all
/// three. Maps each original key to a distinct index in `[1, n]`.
///
/// Write-once: built by [`Builder`], read-only afterwards. Queries are pure
/// reads and safe to run concurrently.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Mphf {
    n: u64,
    gamma: f64,
    levels: Vec<Level>,
    fallback: HashMap<Box<[u8]>, u64>,
}

impl Mphf {
    /// O(1) lookup. Replays the cascade: the first level whose bit is set for
    /// this key yields `cumulative rank + inclusive rank at the slot`; a key
    /// that misses every level is looked up in the fallback table.
    ///
    /// Returns a value in `[1, n]` for keys from the original set. For alien
    /// keys returns [`Self::sentinel`], except when the key happens to hit a
    /// set bit at some level, in which case an in-range index comes back (the
    /// false-positive rate shrinks as gamma grows).
    pub fn index(&self, key: &[u8]) -> u64 {
        let mut cum_rank = 0u64;
        for level in &self.levels {
            let size = level.len();
            if size == 0 {
                continue;
            }
            let pos = position(key, level.seed, size);
            if level.bits.get(pos) {
                // rank() counts [0, pos); the matched slot itself must count.
                return cum_rank + level.bits.rank(pos + 1);
            }
            cum_rank += level.ones;
        }
        match self.fallback.get(key) {
            Some(&idx) => idx,
            None => self.sentinel(),
        }
    }

    #[inline]
    pub fn index_str(&self, s: &str) -> u64 {
        self.index(s.as_bytes())
    }

    /// Number of keys the structure was built over.
    #[inline]
    pub fn num_keys(&self) -> u64 {
        self.n
    }

    /// The gamma the structure was built with.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Value returned for keys outside the original set: `n + 1234567`.
    #[inline]
    pub fn sentinel(&self) -> u64 {
        self.n + SENTINEL_OFFSET
    }

    /// Total bits across the three level arrays.
    pub fn bit_size(&self) -> u64 {
        self.levels.iter().map(|l| l.len() as u64).sum()
    }

    /// Number of keys that fell through to the fallback table.
    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, MphError> {
        Ok(bincode::serialize(self)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MphError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Build parameters.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Bit-array size relative to the keys entering each level. Larger gamma
    /// lowers the per-level collision rate at the cost of space; practical
    /// range is 1..=8.
    pub gamma: f64,
    /// Seeds for the three levels. Must stay fixed across the lifetime of a
    /// structure; change them only together with a full rebuild.
    pub seeds: [u64; LEVELS],
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { gamma: 2.0, seeds: DEFAULT_SEEDS }
    }
}

#[derive(Debug, Error)]
pub enum MphError {
    #[error("duplicate key detected during build")]
    DuplicateKey,
    #[error("gamma must be a positive finite number, got {0}")]
    InvalidGamma(f64),
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] Box<bincode::ErrorKind>),
}

pub struct Builder {
    cfg: BuildConfig,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self { cfg: BuildConfig::default() }
    }

    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.cfg.gamma = gamma;
        self
    }

    /// Build the MPH. Keys must be unique; duplicates are rejected rather
    /// than silently breaking the bijection. An empty key set builds a
    /// trivial structure whose every query returns the sentinel.
    pub fn build<K, I>(self, keys: I) -> Result<Mphf, MphError>
    where
        K: Borrow<[u8]>,
        I: IntoIterator<Item = K>,
    {
        if !(self.cfg.gamma.is_finite() && self.cfg.gamma > 0.0) {
            return Err(MphError::InvalidGamma(self.cfg.gamma));
        }

        // Collect and verify true uniqueness (exact bytes, not hashes).
        let mut uniq = Vec::<Vec<u8>>::new();
        let mut seen = HashSet::<Vec<u8>>::new();
        for k in keys {
            let v = k.borrow().to_vec();
            if !seen.insert(v.clone()) {
                return Err(MphError::DuplicateKey);
            }
            uniq.push(v);
        }

        Ok(build_cascade(uniq, &self.cfg))
    }
}

/// Runs the level builder once per seed, each level consuming the keys the
/// previous one failed to place, then maps the rest through the fallback
/// table. Levels must be built in order: each level's size depends on the
/// previous level's leftover count.
fn build_cascade(keys: Vec<Vec<u8>>, cfg: &BuildConfig) -> Mphf {
    let n = keys.len() as u64;

    let mut working = keys;
    let mut levels = Vec::with_capacity(LEVELS);
    for &seed in &cfg.seeds {
        let (level, leftover) = Level::build(working, cfg.gamma, seed);
        levels.push(level);
        working = leftover;
    }

    let fallback = build_fallback(working, n);
    Mphf { n, gamma: cfg.gamma, levels, fallback }
}

/// Direct map for keys that collided through every level. The `offset`-th
/// leftover key (input order) gets index `n - |leftover| + 1 + offset`,
/// picking up exactly where the level ranks leave off.
fn build_fallback(leftover: Vec<Vec<u8>>, n: u64) -> HashMap<Box<[u8]>, u64> {
    let mut table = HashMap::with_capacity(leftover.len());
    let mut index = n - leftover.len() as u64 + 1;
    for key in leftover {
        table.insert(key.into_boxed_slice(), index);
        index += 1;
    }
    table
}
