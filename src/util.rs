use std::io::{self, BufRead};

/// Plain mutable bit set used while filling a level. Frozen into
/// [`RankedBits`](crate::RankedBits) once the level is final.
#[derive(Debug)]
pub(crate) struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    pub(crate) fn new(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)], len }
    }

    #[inline]
    pub(crate) fn test(&self, idx: usize) -> bool {
        let (w, b) = (idx / 64, idx % 64);
        (self.words[w] >> b) & 1 == 1
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: usize) {
        let (w, b) = (idx / 64, idx % 64);
        self.words[w] |= 1u64 << b;
    }

    #[inline]
    pub(crate) fn clear(&mut self, idx: usize) {
        let (w, b) = (idx / 64, idx % 64);
        self.words[w] &= !(1u64 << b);
    }

    pub(crate) fn into_parts(self) -> (Box<[u64]>, usize) {
        (self.words.into_boxed_slice(), self.len)
    }
}

/// Read keys from a line-oriented source: one key per line, empty lines
/// skipped. Keys keep their source order, which in turn fixes the fallback
/// table's index assignment.
pub fn read_keys<R: BufRead>(reader: R) -> io::Result<Vec<Vec<u8>>> {
    let mut keys = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            keys.push(line.into_bytes());
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_test() {
        let mut bs = BitSet::new(130);
        bs.set(0);
        bs.set(64);
        bs.set(129);
        assert!(bs.test(0) && bs.test(64) && bs.test(129));
        assert!(!bs.test(1) && !bs.test(128));
        bs.clear(64);
        assert!(!bs.test(64));
        let (words, len) = bs.into_parts();
        assert_eq!(len, 130);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn read_keys_skips_empty_lines() {
        let src = b"alpha\n\nbeta\ngamma\n\n" as &[u8];
        let keys = read_keys(src).unwrap();
        assert_eq!(keys, vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
    }
}
