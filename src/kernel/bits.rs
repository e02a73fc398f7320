//! Fixed-length boolean vectors.
//!
//! A [`BitVector`] is one 0/1 label vector over a [`LabelIndex`](super::LabelIndex):
//! the objects of a concept, its contexts, or one column of a binary
//! incidence matrix. Bits are packed into `u64` words; bits past `len`
//! are always zero so that equality and hashing can compare words directly.

use std::fmt;

const WORD_BITS: usize = 64;

/// A packed vector of `len` booleans.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
}

impl BitVector {
    /// Create an all-zero vector.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; words_for(len)],
        }
    }

    /// Create an all-one vector.
    pub fn ones(len: usize) -> Self {
        let mut v = Self {
            len,
            words: vec![u64::MAX; words_for(len)],
        };
        v.clear_tail();
        v
    }

    /// Create a vector with ones at the given positions.
    ///
    /// # Panics
    /// If any position is `>= len`.
    pub fn from_indexes<I>(len: usize, indexes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut v = Self::zeros(len);
        for i in indexes {
            v.set(i, true);
        }
        v
    }

    /// Create a vector from a boolean slice.
    pub fn from_bools(bits: &[bool]) -> Self {
        Self::from_indexes(
            bits.len(),
            bits.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| i),
        )
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Read one position.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "bit index {} out of range {}", index, self.len);
        self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Write one position.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "bit index {} out of range {}", index, self.len);
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Number of positions set to one.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no position is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// True when every position is set.
    pub fn is_full(&self) -> bool {
        self.count_ones() == self.len
    }

    /// Elementwise AND (intersection).
    pub fn and(&self, other: &BitVector) -> BitVector {
        self.zip_words(other, |a, b| a & b)
    }

    /// Elementwise OR (union).
    pub fn or(&self, other: &BitVector) -> BitVector {
        self.zip_words(other, |a, b| a | b)
    }

    /// Elementwise AND-NOT: positions set here but not in `other`.
    pub fn and_not(&self, other: &BitVector) -> BitVector {
        self.zip_words(other, |a, b| a & !b)
    }

    /// In-place AND.
    pub fn and_assign(&mut self, other: &BitVector) {
        self.check_len(other);
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a &= b;
        }
    }

    /// True when the two vectors share at least one positive position.
    pub fn intersects(&self, other: &BitVector) -> bool {
        self.check_len(other);
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Number of shared positive positions.
    pub fn overlap(&self, other: &BitVector) -> usize {
        self.check_len(other);
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// True when every position set here is also set in `other`.
    pub fn is_subset_of(&self, other: &BitVector) -> bool {
        self.check_len(other);
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// Iterate over the positions set to one, ascending.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Iterate over the positions set to zero, ascending.
    pub fn iter_zeros(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| !self.get(i))
    }

    fn zip_words(&self, other: &BitVector, op: impl Fn(u64, u64) -> u64) -> BitVector {
        self.check_len(other);
        let words = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(&a, &b)| op(a, b))
            .collect();
        let mut v = BitVector {
            len: self.len,
            words,
        };
        v.clear_tail();
        v
    }

    fn check_len(&self, other: &BitVector) {
        assert_eq!(
            self.len, other.len,
            "Length mismatch between bit vectors"
        );
    }

    fn clear_tail(&mut self) {
        let rem = self.len % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

fn words_for(len: usize) -> usize {
    (len + WORD_BITS - 1) / WORD_BITS
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector(")?;
        for i in 0..self.len {
            write!(f, "{}", if self.get(i) { '1' } else { '0' })?;
        }
        write!(f, ")")
    }
}

/// Iterator over set positions of a [`BitVector`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            if self.word_index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_index];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ones_clears_tail() {
        let v = BitVector::ones(70);
        assert_eq!(v.count_ones(), 70);
        assert!(v.is_full());
        assert_eq!(v, BitVector::from_indexes(70, 0..70));
    }

    #[test]
    fn test_and_or() {
        let a = BitVector::from_bools(&[true, true, false, false]);
        let b = BitVector::from_bools(&[true, false, true, false]);
        assert_eq!(a.and(&b), BitVector::from_bools(&[true, false, false, false]));
        assert_eq!(a.or(&b), BitVector::from_bools(&[true, true, true, false]));
        assert_eq!(a.and_not(&b), BitVector::from_bools(&[false, true, false, false]));
    }

    #[test]
    fn test_intersects() {
        let a = BitVector::from_indexes(130, [3, 129]);
        let b = BitVector::from_indexes(130, [129]);
        let c = BitVector::from_indexes(130, [4]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.overlap(&b), 1);
    }

    #[test]
    fn test_subset() {
        let small = BitVector::from_indexes(10, [1, 5]);
        let big = BitVector::from_indexes(10, [1, 2, 5]);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert!(BitVector::zeros(10).is_subset_of(&small));
    }

    #[test]
    fn test_iter_ones_across_words() {
        let v = BitVector::from_indexes(200, [0, 63, 64, 128, 199]);
        let ones: Vec<usize> = v.iter_ones().collect();
        assert_eq!(ones, vec![0, 63, 64, 128, 199]);
        assert_eq!(v.iter_zeros().count(), 195);
    }

    #[test]
    fn test_empty_vector() {
        let v = BitVector::zeros(0);
        assert!(v.is_empty());
        assert!(v.is_full());
        assert_eq!(v.iter_ones().count(), 0);
    }
}
