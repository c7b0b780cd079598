//! Random trees over a taxon set, e.g. as start points for an optimizer
//! working on vectors.

use crate::codec::{CodecError, TreeDefect, VectorCodec};
use crate::model::vertex::BranchLength;
use crate::model::{SimpleTree, TaxonSet, VertexIndex};
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Range;

// =#========================================================================#=
// RANDOM TREE GENERATOR
// =#========================================================================#=
/// Draws random trees by repeatedly joining a random group of subtrees
/// under a new vertex until a single tree remains.
///
/// # Configuration
/// * [`with_branch_lengths(range)`](Self::with_branch_lengths) - range
///   branch lengths are drawn uniformly from, default `0.0..1.0`
/// * [`with_max_arity(k)`](Self::with_max_arity) - largest number of
///   subtrees joined at once, default `2` (binary trees)
///
/// # Example
/// ```
/// use phylovec::model::{RandomTreeGenerator, TaxonSet};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let taxa = TaxonSet::new(["A", "B", "C", "D", "E"])?;
/// let mut rng = StdRng::seed_from_u64(42);
/// let tree = RandomTreeGenerator::new()
///     .with_branch_lengths(0.5..2.0)
///     .generate(&taxa, &mut rng)?;
///
/// assert_eq!(tree.num_leaves(), 5);
/// assert!(tree.is_binary());
/// # Ok::<(), phylovec::codec::CodecError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomTreeGenerator {
    branch_lengths: Range<f64>,
    max_arity: usize,
}

impl Default for RandomTreeGenerator {
    fn default() -> Self {
        Self {
            branch_lengths: 0.0..1.0,
            max_arity: 2,
        }
    }
}

impl RandomTreeGenerator {
    /// Creates a generator for binary trees with lengths in `0.0..1.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the range branch lengths are drawn from.
    ///
    /// # Panics
    /// Panics if the range is empty, negative or not finite.
    pub fn with_branch_lengths(mut self, range: Range<f64>) -> Self {
        assert!(
            range.start >= 0.0 && range.end.is_finite() && range.start < range.end,
            "Branch length range must be non-empty, non-negative and finite, got {:?}",
            range
        );
        self.branch_lengths = range;
        self
    }

    /// Sets the largest number of subtrees joined under one vertex.
    ///
    /// # Panics
    /// Panics if `max_arity` is smaller than two.
    pub fn with_max_arity(mut self, max_arity: usize) -> Self {
        assert!(max_arity >= 2, "Arity must be at least two, got {}", max_arity);
        self.max_arity = max_arity;
        self
    }

    /// Draws a random tree with one leaf per taxon in `taxa`.
    ///
    /// The root of the result may have two children, in which case its
    /// two edges form a single edge of the unrooted tree.
    ///
    /// # Errors
    /// [CodecError::InvalidTree] with [TreeDefect::EmptyTree] if `taxa`
    /// is empty.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        taxa: &TaxonSet,
        rng: &mut R,
    ) -> Result<SimpleTree, CodecError> {
        if taxa.is_empty() {
            return Err(TreeDefect::EmptyTree.into());
        }

        let mut tree = SimpleTree::new(taxa.len());
        if let [label] = taxa.labels() {
            tree.add_root_leaf(None, label.clone());
            return Ok(tree);
        }

        let mut pool: Vec<VertexIndex> = taxa
            .iter()
            .map(|label| tree.add_leaf(Some(self.draw_length(rng)), label.to_string()))
            .collect();

        while pool.len() > 1 {
            let arity = rng.gen_range(2..=self.max_arity.min(pool.len()));
            pool.shuffle(rng);
            let children = pool.split_off(pool.len() - arity);
            if pool.is_empty() {
                tree.add_root(children, None);
            } else {
                let vertex = tree.add_internal_vertex(children, Some(self.draw_length(rng)));
                pool.push(vertex);
            }
        }

        Ok(tree)
    }

    /// Draws a random tree over `taxa` and encodes it with `codec`.
    ///
    /// # Errors
    /// See [`generate`](Self::generate) and
    /// [`VectorCodec::encode`](crate::codec::VectorCodec::encode).
    pub fn random_vector<R: Rng + ?Sized>(
        &self,
        codec: &VectorCodec,
        taxa: &TaxonSet,
        rng: &mut R,
    ) -> Result<Vec<f64>, CodecError> {
        let tree = self.generate(taxa, rng)?;
        codec.encode(&tree, Some(taxa))
    }

    fn draw_length<R: Rng + ?Sized>(&self, rng: &mut R) -> BranchLength {
        BranchLength::new(rng.gen_range(self.branch_lengths.clone()))
    }
}
