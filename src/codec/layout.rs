//! Fixed enumeration of all non-trivial splits over a taxon universe.
//!
//! A split of `n` taxa is identified by its signature, the side containing
//! taxon `0` (the lexicographically smallest label). A split is non-trivial
//! if both sides have at least two taxa, so signatures are exactly the sets
//! `S` with `0 ∈ S` and `2 <= |S| <= n - 2`. There are
//! [`max_internal_edges(n)`](max_internal_edges) `= 2^(n-1) - n - 1` of them.
//!
//! [SplitLayout] orders signatures lexicographically by their sorted member
//! tuples (a proper prefix first), and maps between a signature and its
//! rank in that order without materializing the enumeration.
//!
//! # Growth
//! The number of positions doubles with every taxon. Vectors for 20 taxa
//! have 524 287 entries, for 30 taxa over half a billion.

use fixedbitset::FixedBitSet;

/// Largest universe for which positions fit into 64 bit.
pub const MAX_LAYOUT_TAXA: usize = 63;

/// Returns the number of non-trivial splits over `num_taxa` taxa, which is
/// the number of internal-edge positions of a vector.
///
/// # Panics
/// Panics if the result overflows [usize];
/// use [checked_max_internal_edges] to avoid this.
///
/// # Example
/// ```
/// use phylovec::codec::max_internal_edges;
///
/// assert_eq!(max_internal_edges(3), 0);
/// assert_eq!(max_internal_edges(4), 3);
/// assert_eq!(max_internal_edges(5), 10);
/// ```
pub fn max_internal_edges(num_taxa: usize) -> usize {
    checked_max_internal_edges(num_taxa).expect("number of splits overflows usize")
}

/// Returns the number of non-trivial splits over `num_taxa` taxa,
/// or `None` on overflow.
pub fn checked_max_internal_edges(num_taxa: usize) -> Option<usize> {
    if num_taxa < 4 {
        return Some(0);
    }
    let exponent = u32::try_from(num_taxa - 1).ok()?;
    let subsets = 1usize.checked_shl(exponent)?;
    // 2^(n-1) subsets containing taxon 0, minus sizes 1, n-1 and n
    Some(subsets - num_taxa - 1)
}

/// Returns the vector length `n + max_internal_edges(n)` for `num_taxa`
/// taxa, or `None` if such a vector of `f64` could not be allocated
/// (more than `isize::MAX` bytes).
pub fn checked_vector_len(num_taxa: usize) -> Option<usize> {
    let len = checked_max_internal_edges(num_taxa)?.checked_add(num_taxa)?;
    let bytes = len.checked_mul(std::mem::size_of::<f64>())?;
    (bytes <= isize::MAX as usize).then_some(len)
}

// =#========================================================================#=
// SPLIT LAYOUT
// =#========================================================================#=
/// Ranking and unranking of split signatures over a fixed number of taxa.
///
/// Construction precomputes, for every prefix length `m` and last member
/// `e`, how many valid signatures extend a prefix ending in `e`
/// (an `n × n` table). Ranking and unranking are then `O(n^2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLayout {
    num_taxa: usize,
    num_splits: usize,
    /// `extensions[m][e]`: number of valid signatures of which a prefix of
    /// length `m` ending in `e` is a prefix (including the prefix itself)
    extensions: Vec<Vec<usize>>,
}

impl SplitLayout {
    /// Creates the layout for `num_taxa` taxa.
    ///
    /// # Panics
    /// Panics if `num_taxa` exceeds [MAX_LAYOUT_TAXA].
    pub fn new(num_taxa: usize) -> Self {
        assert!(
            num_taxa <= MAX_LAYOUT_TAXA,
            "Split layout supports at most {} taxa, got {}",
            MAX_LAYOUT_TAXA,
            num_taxa
        );

        let binomials = pascal_triangle(num_taxa);
        let is_valid = |size: usize| size >= 2 && size + 2 <= num_taxa;

        let mut extensions = vec![vec![0; num_taxa]; num_taxa + 1];
        for (length, row) in extensions.iter_mut().enumerate().skip(1) {
            for (last, count) in row.iter_mut().enumerate() {
                let remaining = num_taxa - 1 - last;
                *count = (0..=remaining)
                    .filter(|&extra| is_valid(length + extra))
                    .map(|extra| binomials[remaining][extra])
                    .sum();
            }
        }

        let num_splits = if num_taxa == 0 { 0 } else { extensions[1][0] };
        debug_assert_eq!(Some(num_splits), checked_max_internal_edges(num_taxa));

        Self {
            num_taxa,
            num_splits,
            extensions,
        }
    }

    /// Returns the number of taxa.
    pub fn num_taxa(&self) -> usize {
        self.num_taxa
    }

    /// Returns the number of split positions.
    pub fn num_splits(&self) -> usize {
        self.num_splits
    }

    fn is_valid_size(&self, size: usize) -> bool {
        size >= 2 && size + 2 <= self.num_taxa
    }

    /// Returns the rank of `signature` among all signatures, or `None` if it
    /// is not the signature of a non-trivial split over this universe.
    pub fn position(&self, signature: &FixedBitSet) -> Option<usize> {
        let members: Vec<usize> = signature.ones().collect();
        if members.first() != Some(&0)
            || !self.is_valid_size(members.len())
            || members.last().is_some_and(|&last| last >= self.num_taxa)
        {
            return None;
        }

        let mut rank = 0;
        for length in 1..members.len() {
            // The proper prefix itself precedes the signature
            if self.is_valid_size(length) {
                rank += 1;
            }
            // All signatures branching off with a smaller next member precede it
            for skipped in members[length - 1] + 1..members[length] {
                rank += self.extensions[length + 1][skipped];
            }
        }

        Some(rank)
    }

    /// Returns the signature at `position`, or `None` if out of range.
    pub fn signature_at(&self, position: usize) -> Option<FixedBitSet> {
        if position >= self.num_splits {
            return None;
        }

        let mut remaining = position;
        let mut members = vec![0];
        loop {
            if self.is_valid_size(members.len()) {
                if remaining == 0 {
                    break;
                }
                remaining -= 1;
            }

            let last = *members.last()?;
            let next = (last + 1..self.num_taxa).find(|&candidate| {
                let count = self.extensions[members.len() + 1][candidate];
                if remaining < count {
                    true
                } else {
                    remaining -= count;
                    false
                }
            })?;
            members.push(next);
        }

        let mut signature = FixedBitSet::with_capacity(self.num_taxa);
        for member in members {
            signature.insert(member);
        }
        Some(signature)
    }

    /// Returns an iterator over all signatures in layout order.
    pub fn signatures(&self) -> impl Iterator<Item = FixedBitSet> + '_ {
        (0..self.num_splits).filter_map(|position| self.signature_at(position))
    }
}

/// Returns `binomials[r][k] = C(r, k)` for `0 <= k <= r < n`.
fn pascal_triangle(n: usize) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(n);
    for r in 0..n {
        let mut row = vec![1; r + 1];
        for k in 1..r {
            row[k] = rows[r - 1][k - 1] + rows[r - 1][k];
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(members: &[usize], n: usize) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(n);
        for &m in members {
            set.insert(m);
        }
        set
    }

    #[test]
    fn test_max_internal_edges_small() {
        assert_eq!(max_internal_edges(0), 0);
        assert_eq!(max_internal_edges(1), 0);
        assert_eq!(max_internal_edges(2), 0);
        assert_eq!(max_internal_edges(3), 0);
        assert_eq!(max_internal_edges(4), 3);
        assert_eq!(max_internal_edges(5), 10);
        assert_eq!(max_internal_edges(6), 25);
    }

    #[test]
    fn test_checked_max_internal_edges_overflow() {
        assert!(checked_max_internal_edges(64).is_some());
        assert_eq!(checked_max_internal_edges(65), None);
        assert_eq!(checked_vector_len(5), Some(15));
    }

    #[test]
    fn test_checked_vector_len_limited_by_allocation() {
        assert_eq!(checked_vector_len(60), Some((1 << 59) - 1));
        assert_eq!(checked_vector_len(61), None);
        assert_eq!(checked_vector_len(MAX_LAYOUT_TAXA), None);
    }

    #[test]
    fn test_layout_matches_closed_form() {
        for n in 0..=16 {
            assert_eq!(SplitLayout::new(n).num_splits(), max_internal_edges(n));
        }
    }

    #[test]
    fn test_five_taxa_order() {
        let layout = SplitLayout::new(5);
        let expected: Vec<Vec<usize>> = vec![
            vec![0, 1],
            vec![0, 1, 2],
            vec![0, 1, 3],
            vec![0, 1, 4],
            vec![0, 2],
            vec![0, 2, 3],
            vec![0, 2, 4],
            vec![0, 3],
            vec![0, 3, 4],
            vec![0, 4],
        ];
        let actual: Vec<Vec<usize>> = layout.signatures().map(|s| s.ones().collect()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_position_inverts_signature_at() {
        for n in 4..=9 {
            let layout = SplitLayout::new(n);
            for position in 0..layout.num_splits() {
                let signature = layout.signature_at(position).unwrap();
                assert_eq!(layout.position(&signature), Some(position));
            }
            assert_eq!(layout.signature_at(layout.num_splits()), None);
        }
    }

    #[test]
    fn test_position_rejects_trivial_and_foreign_sets() {
        let layout = SplitLayout::new(5);
        // without taxon 0
        assert_eq!(layout.position(&bits(&[1, 2], 5)), None);
        // singleton and complement of singleton
        assert_eq!(layout.position(&bits(&[0], 5)), None);
        assert_eq!(layout.position(&bits(&[0, 1, 2, 3], 5)), None);
        // member outside the universe
        assert_eq!(layout.position(&bits(&[0, 7], 8)), None);
    }
}
