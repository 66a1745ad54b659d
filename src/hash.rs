use xxhash_rust::xxh3::xxh3_64_with_seed;

/// One 64-bit hash family (XXH3) for both construction and query.
/// A key's slot at a level is fully determined by `(key bytes, level seed)`,
/// so the cascade can be replayed at query time without storing anything
/// per key.
#[inline]
pub(crate) fn hash_key(key: &[u8], seed: u64) -> u64 {
    // Level seeds are small integers; splitmix spreads them before xxh3.
    xxh3_64_with_seed(key, splitmix64(seed))
}

/// Slot of `key` in a level of `size` slots. `size` must be non-zero.
#[inline]
pub(crate) fn position(key: &[u8], seed: u64, size: usize) -> usize {
    debug_assert!(size > 0);
    (hash_key(key, seed) % size as u64) as usize
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
