//! Gray-code step indices.
//!
//! Consecutive Gray codes `i ^ (i >> 1)` differ in exactly one bit: the lowest
//! zero bit of `i`. Stepping from point `i` to point `i + 1` therefore XORs in
//! the direction number at that bit's one-based position.

/// One-based position of the lowest zero bit of `i`.
///
/// Always at least 1.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::sobol::lowest_zero_bit;
///
/// assert_eq!(lowest_zero_bit(0), 1);
/// assert_eq!(lowest_zero_bit(0b0111), 4);
/// assert_eq!(lowest_zero_bit(0b1010), 1);
/// ```
#[inline]
pub fn lowest_zero_bit(i: usize) -> u32 {
    i.trailing_ones() + 1
}

/// Gray-code index `C[i]` for every sequence position `i < N`.
///
/// `C[i]` selects the direction number applied when advancing from point `i`
/// to point `i + 1`. Entries consumed by the generator (`i < N - 1`) never
/// exceed the bit depth of `N`; the final entry is kept so the array has one
/// slot per point and may reach `L + 1` when `N` is a power of two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayCodeIndices {
    indices: Vec<u8>,
}

impl GrayCodeIndices {
    /// Computes `C[0..n]`.
    pub fn new(n: usize) -> Self {
        // At most 65 on 64-bit targets.
        let indices = (0..n).map(|i| lowest_zero_bit(i) as u8).collect();
        Self { indices }
    }

    /// Number of entries (`N`).
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no points were requested.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `C[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        u32::from(self.indices[i])
    }

    /// Iterator over `C[0], C[1], ...`.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().map(|&c| u32::from(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sobol::bit_depth;
    use proptest::prelude::*;

    #[test]
    fn test_first_indices() {
        let c = GrayCodeIndices::new(16);
        let expected = [1, 2, 1, 3, 1, 2, 1, 4, 1, 2, 1, 3, 1, 2, 1, 5];
        assert_eq!(c.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_single_point() {
        let c = GrayCodeIndices::new(1);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(0), 1);
    }

    #[test]
    fn test_empty() {
        assert!(GrayCodeIndices::new(0).is_empty());
    }

    #[test]
    fn test_matches_gray_code_transition() {
        // The bit flipped between gray(i) and gray(i + 1) is the one C[i] names.
        for i in 0..4096usize {
            let g0 = i ^ (i >> 1);
            let g1 = (i + 1) ^ ((i + 1) >> 1);
            let flipped = g0 ^ g1;
            assert_eq!(flipped.count_ones(), 1);
            assert_eq!(flipped.trailing_zeros() + 1, lowest_zero_bit(i));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_consumed_indices_within_bit_depth(n in 2usize..20_000) {
            let c = GrayCodeIndices::new(n);
            let bits = bit_depth(n);
            prop_assert_eq!(c.len(), n);
            for i in 0..n - 1 {
                let ci = c.get(i);
                prop_assert!(ci >= 1);
                prop_assert!(ci <= bits, "C[{}] = {} exceeds bit depth {}", i, ci, bits);
            }
            prop_assert!(c.get(n - 1) >= 1);
            prop_assert!(c.get(n - 1) <= bits + 1);
        }

        #[test]
        fn test_lowest_zero_bit_is_zero(i in 0usize..usize::MAX) {
            let pos = lowest_zero_bit(i);
            prop_assert_eq!((i >> (pos - 1)) & 1, 0);
            prop_assert_eq!(i & ((1usize << (pos - 1)) - 1), (1usize << (pos - 1)) - 1);
        }
    }
}
