#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Words per superblock; one cumulative count is kept per 512 bits.
const BLOCK_WORDS: usize = 8;

/// Immutable bit vector with O(1) rank support.
///
/// `blocks[i]` holds the number of 1-bits strictly before word `i * 8`, so a
/// rank query is one table read, at most seven whole-word popcounts and one
/// masked popcount. Vectors are frozen after construction; there is no
/// mutation surface.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct RankedBits {
    words: Box<[u64]>,
    blocks: Box<[u64]>,
    len: usize,
}

impl RankedBits {
    /// Builds the rank index over `words`, of which the first `len` bits are
    /// meaningful. Bits past `len` in the last word must be zero.
    pub(crate) fn new(words: Box<[u64]>, len: usize) -> Self {
        debug_assert_eq!(words.len(), len.div_ceil(64));
        let mut blocks = Vec::with_capacity(words.len() / BLOCK_WORDS + 1);
        let mut acc = 0u64;
        blocks.push(0);
        for chunk in words.chunks(BLOCK_WORDS) {
            acc += chunk.iter().map(|w| w.count_ones() as u64).sum::<u64>();
            blocks.push(acc);
        }
        Self { words, blocks: blocks.into_boxed_slice(), len }
    }

    /// Number of bits in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of set bits.
    #[inline]
    pub fn ones(&self) -> u64 {
        // Last superblock entry covers a partial chunk, if any.
        *self.blocks.last().unwrap_or(&0)
    }

    /// Bit at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        // Safety: idx < len, so idx / 64 < words.len()
        let word = unsafe { *self.words.get_unchecked(idx / 64) };
        (word >> (idx % 64)) & 1 == 1
    }

    /// Number of 1-bits in positions `[0, idx)`. `idx` may equal `len()`.
    #[inline]
    pub fn rank(&self, idx: usize) -> u64 {
        debug_assert!(idx <= self.len);
        let word = idx / 64;
        let rem = idx % 64;
        let block = word / BLOCK_WORDS;
        // Safety: word <= words.len(), so block < blocks.len()
        let mut r = unsafe { *self.blocks.get_unchecked(block) };
        for w in block * BLOCK_WORDS..word {
            // Safety: w < word <= words.len()
            r += unsafe { self.words.get_unchecked(w) }.count_ones() as u64;
        }
        if rem != 0 {
            // Safety: rem != 0 implies idx is not word-aligned, so word < words.len()
            let partial = unsafe { *self.words.get_unchecked(word) };
            r += (partial & ((1u64 << rem) - 1)).count_ones() as u64;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive_rank(words: &[u64], idx: usize) -> u64 {
        (0..idx)
            .filter(|&i| (words[i / 64] >> (i % 64)) & 1 == 1)
            .count() as u64
    }

    #[test]
    fn empty_vector() {
        let rb = RankedBits::new(Box::new([]), 0);
        assert_eq!(rb.len(), 0);
        assert_eq!(rb.ones(), 0);
        assert_eq!(rb.rank(0), 0);
    }

    #[test]
    fn rank_matches_naive_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [1usize, 63, 64, 65, 511, 512, 513, 4096, 5000] {
            let mut words = vec![0u64; len.div_ceil(64)];
            for w in words.iter_mut() {
                *w = rng.r#gen();
            }
            // Zero the tail past len.
            if len % 64 != 0 {
                let last = words.len() - 1;
                words[last] &= (1u64 << (len % 64)) - 1;
            }
            let rb = RankedBits::new(words.clone().into_boxed_slice(), len);
            assert_eq!(rb.ones(), naive_rank(&words, len), "len {len}");
            for idx in 0..=len {
                assert_eq!(rb.rank(idx), naive_rank(&words, idx), "len {len} idx {idx}");
            }
            for idx in 0..len {
                assert_eq!(rb.get(idx), (words[idx / 64] >> (idx % 64)) & 1 == 1);
            }
        }
    }

    #[test]
    fn rank_at_len_equals_ones() {
        let words = vec![u64::MAX, 0b1011];
        let rb = RankedBits::new(words.into_boxed_slice(), 128);
        assert_eq!(rb.rank(128), 67);
        assert_eq!(rb.ones(), 67);
    }
}
