//! bbmph — cascading bit-array MPH (BBHash-style).
//!
//! - Build once on a set of **unique** keys (bytes/str).
//! - O(1) lookups: key -> unique index in `[1..=n]`.
//! - Three rank-indexed levels; keys that collide through all three land in a
//!   small fallback table. Alien keys return `n + 1234567` (modulo a bounded
//!   false-positive rate, tunable via gamma).

mod cascade;
mod hash;
mod level;
mod rank;
mod util;

pub use cascade::{BuildConfig, Builder, MphError, Mphf, DEFAULT_SEEDS, LEVELS, SENTINEL_OFFSET};
pub use rank::RankedBits;
pub use util::read_keys;
