//! Compact bitset representation for taxon sets.
//!
//! Each bit position corresponds to one taxon index in the shared
//! [`TaxonNamespace`](crate::namespace::TaxonNamespace). A clade
//! {T1, T3} over a 4-taxon namespace is the bitset `0b0101`.

/// A fixed-width bitset over taxon indices.
///
/// Bits are stored in `Vec<u64>` words so trees of any size are supported;
/// each word covers 64 taxon indices. Derives `Eq`, `Hash` and `Ord` because
/// split identity is bitmask equality and split sets are kept in a
/// deterministic order.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Bitset(pub Vec<u64>);

impl Bitset {
    /// Creates a bitset of `words * 64` bits, all clear.
    ///
    /// `words` is `(num_taxa + 63) / 64`.
    pub fn zeros(words: usize) -> Self {
        Bitset(vec![0u64; words])
    }

    /// Sets the bit for taxon `idx`.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        let word = idx >> 6;
        let bit = idx & 63;
        self.0[word] |= 1u64 << bit;
    }

    /// Returns whether the bit for taxon `idx` is set.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        let word = idx >> 6;
        let bit = idx & 63;
        (self.0[word] >> bit) & 1 == 1
    }

    /// In-place union: `self` becomes `self ∪ other`.
    #[inline]
    pub fn or_assign(&mut self, other: &Bitset) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a |= *b;
        }
    }

    /// Number of set bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Size of `self ∩ other` without materializing the intersection.
    ///
    /// Used for the shared-taxa guard: two trees can only be BSD-compared
    /// when their leaf sets overlap in at least 4 taxa.
    #[inline]
    pub fn intersection_count(&self, other: &Bitset) -> usize {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_contains() {
        let mut bs = Bitset::zeros(1);
        bs.set(0);
        bs.set(2);
        assert_eq!(bs.0[0], 0b0101);
        assert!(bs.contains(0));
        assert!(!bs.contains(1));
        assert!(bs.contains(2));
    }

    #[test]
    fn union() {
        let mut left = Bitset::zeros(1);
        left.set(0);
        left.set(1);

        let mut right = Bitset::zeros(1);
        right.set(2);
        right.set(3);

        left.or_assign(&right);
        assert_eq!(left.0[0], 0b1111);
    }

    #[test]
    fn popcount() {
        let mut bs = Bitset::zeros(1);
        bs.set(0);
        bs.set(2);
        bs.set(5);
        assert_eq!(bs.count_ones(), 3);
    }

    #[test]
    fn intersection_count_overlapping() {
        let mut a = Bitset::zeros(1);
        for i in [0, 1, 2, 3] {
            a.set(i);
        }
        let mut b = Bitset::zeros(1);
        for i in [2, 3, 4, 5] {
            b.set(i);
        }
        assert_eq!(a.intersection_count(&b), 2);
        assert_eq!(b.intersection_count(&a), 2);
    }

    #[test]
    fn multi_word() {
        // More than 64 taxa spans several words.
        let mut bs = Bitset::zeros(2);
        bs.set(0);
        bs.set(63);
        bs.set(64);
        bs.set(127);

        assert_eq!(bs.count_ones(), 4);
        assert!(bs.contains(64));
        assert!(!bs.contains(65));
        assert_eq!(bs.0[0], 1u64 | (1u64 << 63));
        assert_eq!(bs.0[1], 1u64 | (1u64 << 63));
    }
}
