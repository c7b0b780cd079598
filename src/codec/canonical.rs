//! Canonical form of a phylogenetic tree.
//!
//! The [Canonicalizer] reduces a tree to its leaf edge lengths (per taxon)
//! and its non-trivial splits with their lengths, sorted by signature. The
//! result depends only on labels, topology and lengths: children order,
//! vertex identities and the position of the root do not matter.
//!
//! # Conventions
//! * The root's own branch length is not an edge and is ignored.
//! * Edges inducing the same bipartition of the leaves have their lengths
//!   summed. This happens at a root with two children, where the two
//!   root edges form one edge of the unrooted tree.
//! * An edge separating a single leaf from the rest is that leaf's edge.
//!   With two leaves, each leaf keeps the length of its own edge.
//! * A single-leaf tree has leaf length `0.0` and no splits.

use crate::codec::error::{CodecError, TreeDefect};
use crate::model::{TaxonSet, TreeView};
use fixedbitset::FixedBitSet;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

// =#========================================================================#=
// MISSING BRANCH LENGTH POLICY
// =#========================================================================#=
/// How edges without branch length are treated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MissingBranchLength {
    /// Fail with [TreeDefect::MissingBranchLength].
    #[default]
    Reject,
    /// Use the given length.
    Assume(f64),
}

// =#========================================================================#=
// CANONICAL FORM
// =#========================================================================#=
/// A non-trivial split together with the length of its edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSplit {
    signature: FixedBitSet,
    length: f64,
}

impl CanonicalSplit {
    /// Returns the signature as set of taxon positions.
    pub fn signature(&self) -> &FixedBitSet {
        &self.signature
    }

    /// Returns the length of the edge inducing this split.
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// Canonical form of a tree over a taxon universe.
///
/// Two canonical forms over the same universe are equal iff their trees are
/// isomorphic as unrooted trees with identical branch lengths.
///
/// # Signatures
/// A split separates the tree's leaves `T` into the side `A` containing the
/// smallest label `min(T)` and the other side `B`. Its signature is the set
/// `U ∖ B` of universe positions, which is `A` when the universe `U` equals
/// `T`, and otherwise additionally contains all taxa absent from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalForm {
    taxa: TaxonSet,
    leaf_lengths: Vec<Option<f64>>,
    splits: Vec<CanonicalSplit>,
}

impl CanonicalForm {
    /// Returns the taxon universe this form is defined over.
    pub fn taxa(&self) -> &TaxonSet {
        &self.taxa
    }

    /// Returns the sorted labels of the tree's leaves.
    pub fn leaf_labels(&self) -> impl Iterator<Item = &str> {
        self.taxa
            .iter()
            .zip(&self.leaf_lengths)
            .filter_map(|(label, length)| length.map(|_| label))
    }

    /// Returns the number of leaves of the tree.
    pub fn num_leaves(&self) -> usize {
        self.leaf_lengths.iter().flatten().count()
    }

    /// Returns leaf edge lengths by universe position, `None` for taxa
    /// not in the tree.
    pub fn leaf_lengths(&self) -> &[Option<f64>] {
        &self.leaf_lengths
    }

    /// Returns the leaf edge length of `label`, if it is a leaf of the tree.
    pub fn leaf_length(&self, label: &str) -> Option<f64> {
        let position = self.taxa.position(label)?;
        self.leaf_lengths[position]
    }

    /// Returns the splits sorted by signature.
    pub fn splits(&self) -> &[CanonicalSplit] {
        &self.splits
    }

    /// Returns the length of the split whose signature consists of `labels`.
    pub fn split_length(&self, labels: &[&str]) -> Option<f64> {
        let mut signature = FixedBitSet::with_capacity(self.taxa.len());
        for label in labels {
            signature.insert(self.taxa.position(label)?);
        }
        self.splits
            .iter()
            .find(|split| split.signature == signature)
            .map(CanonicalSplit::length)
    }

    /// Returns the labels of a signature in sorted order.
    pub fn signature_labels(&self, signature: &FixedBitSet) -> Vec<&str> {
        signature
            .ones()
            .filter_map(|position| self.taxa.get(position))
            .collect()
    }
}

/// Renders a signature as `{A,B,C}`.
pub(crate) fn format_signature(taxa: &TaxonSet, signature: &FixedBitSet) -> String {
    let labels: Vec<&str> = signature
        .ones()
        .filter_map(|position| taxa.get(position))
        .collect();
    format!("{{{}}}", labels.join(","))
}

/// Orders signatures lexicographically by their sorted members.
pub(crate) fn cmp_signatures(a: &FixedBitSet, b: &FixedBitSet) -> Ordering {
    a.ones().cmp(b.ones())
}

// =#========================================================================#=
// CANONICALIZER
// =#========================================================================#=
/// Derives [CanonicalForm]s from trees.
///
/// # Configuration
/// * [`with_missing_branch_lengths(policy)`](Self::with_missing_branch_lengths)
///     - how edges without length are handled, default
///       [MissingBranchLength::Reject]
///
/// # Example
/// ```
/// use phylovec::codec::Canonicalizer;
/// use phylovec::parse_newick_str;
///
/// let first = parse_newick_str("((A:1,B:2):0.5,C:3,D:4);").unwrap();
/// let second = parse_newick_str("(D:4,(B:2,A:1):0.25,C:3):0;").unwrap();
/// let canonicalizer = Canonicalizer::new();
/// let first = canonicalizer.canonicalize(&first)?;
/// let second = canonicalizer.canonicalize(&second)?;
///
/// assert_eq!(first.split_length(&["A", "B"]), Some(0.5));
/// assert_ne!(first, second);
/// # Ok::<(), phylovec::codec::CodecError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Canonicalizer {
    missing_branch_length: MissingBranchLength,
}

impl Canonicalizer {
    /// Creates a canonicalizer rejecting missing branch lengths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how edges without branch length are treated.
    ///
    /// # Panics
    /// Panics if the policy assumes a negative or non-finite length.
    pub fn with_missing_branch_lengths(mut self, policy: MissingBranchLength) -> Self {
        if let MissingBranchLength::Assume(length) = policy {
            assert!(
                length >= 0.0 && length.is_finite(),
                "Assumed branch length must be non-negative and finite, got {}",
                length
            );
        }
        self.missing_branch_length = policy;
        self
    }

    /// Returns the configured policy for missing branch lengths.
    pub fn missing_branch_lengths(&self) -> MissingBranchLength {
        self.missing_branch_length
    }

    /// Canonicalizes `tree` over the universe of its own leaf labels.
    ///
    /// # Errors
    /// * [CodecError::InvalidTree] for malformed trees
    /// * [CodecError::DuplicateLabel] if a leaf label occurs twice
    pub fn canonicalize<T: TreeView>(&self, tree: &T) -> Result<CanonicalForm, CodecError> {
        let scan = scan_tree(tree)?;
        let taxa = TaxonSet::new(scan.leaves.iter().map(|&(_, label)| label))?;
        self.build_form(tree, scan, taxa)
    }

    /// Canonicalizes `tree` over the universe `taxa`, which must contain
    /// every leaf label of the tree.
    ///
    /// # Errors
    /// * [CodecError::InvalidTree] for malformed trees
    /// * [CodecError::DuplicateLabel] if a leaf label occurs twice
    /// * [CodecError::LabelSetMismatch] if a leaf label is not in `taxa`
    pub fn canonicalize_over<T: TreeView>(
        &self,
        tree: &T,
        taxa: &TaxonSet,
    ) -> Result<CanonicalForm, CodecError> {
        let scan = scan_tree(tree)?;

        let mut missing: Vec<String> = scan
            .leaves
            .iter()
            .filter(|(_, label)| !taxa.contains(label))
            .map(|(_, label)| label.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(CodecError::LabelSetMismatch { missing });
        }

        self.build_form(tree, scan, taxa.clone())
    }

    fn build_form<T: TreeView>(
        &self,
        tree: &T,
        scan: Scan<'_, T::Node>,
        taxa: TaxonSet,
    ) -> Result<CanonicalForm, CodecError> {
        let num_taxa = taxa.len();

        let mut leaf_positions = HashMap::with_capacity(scan.leaves.len());
        let mut present = FixedBitSet::with_capacity(num_taxa);
        let mut leaf_lengths = vec![None; num_taxa];
        for &(node, label) in &scan.leaves {
            if let Some(position) = taxa.position(label) {
                leaf_positions.insert(node, position);
                present.insert(position);
                leaf_lengths[position] = Some(0.0);
            }
        }
        let num_leaves = scan.leaves.len();
        let Some(root_taxon) = present.ones().next() else {
            return Err(TreeDefect::EmptyTree.into());
        };

        let mut universe = FixedBitSet::with_capacity(num_taxa);
        universe.insert_range(..);

        // Children are always processed before their parent in reversed pre-order
        let mut clades: HashMap<T::Node, FixedBitSet> = HashMap::new();
        let mut split_lengths: HashMap<FixedBitSet, f64> = HashMap::new();
        for &node in scan.order.iter().rev() {
            let mut clade = FixedBitSet::with_capacity(num_taxa);
            if let Some(&position) = leaf_positions.get(&node) {
                clade.insert(position);
            } else {
                for child in tree.children(node) {
                    if let Some(child_clade) = clades.remove(child) {
                        clade.union_with(&child_clade);
                    }
                }
            }

            if node != scan.root {
                let length = self.edge_length(tree, node)?;
                let clade_size = clade.count_ones(..);
                let complement_size = num_leaves - clade_size;

                if clade_size == 1 {
                    add_to_leaf(&mut leaf_lengths, clade.ones().next(), length);
                } else if complement_size == 1 {
                    add_to_leaf(&mut leaf_lengths, present.difference(&clade).next(), length);
                } else {
                    // Signature: universe without the side not holding the root taxon
                    let mut far_side = clade.clone();
                    if clade.contains(root_taxon) {
                        far_side = present.clone();
                        far_side.difference_with(&clade);
                    }
                    let mut signature = universe.clone();
                    signature.difference_with(&far_side);
                    *split_lengths.entry(signature).or_insert(0.0) += length;
                }
            }

            clades.insert(node, clade);
        }

        let mut splits: Vec<CanonicalSplit> = split_lengths
            .into_iter()
            .map(|(signature, length)| CanonicalSplit { signature, length })
            .collect();
        splits.sort_by(|a, b| cmp_signatures(&a.signature, &b.signature));

        for split in &splits {
            trace!(
                signature = %format_signature(&taxa, &split.signature),
                length = split.length,
                "split"
            );
        }
        debug!(
            num_taxa,
            num_leaves,
            num_splits = splits.len(),
            "canonicalized tree"
        );

        Ok(CanonicalForm {
            taxa,
            leaf_lengths,
            splits,
        })
    }

    /// Returns the validated length of the edge above `node`.
    fn edge_length<T: TreeView>(&self, tree: &T, node: T::Node) -> Result<f64, TreeDefect> {
        match tree.branch_length(node) {
            None => match self.missing_branch_length {
                MissingBranchLength::Reject => Err(TreeDefect::MissingBranchLength {
                    vertex: format!("{:?}", node),
                }),
                MissingBranchLength::Assume(length) => Ok(length),
            },
            Some(length) if !length.is_finite() => Err(TreeDefect::NonFiniteBranchLength {
                vertex: format!("{:?}", node),
                length,
            }),
            Some(length) if length < 0.0 => Err(TreeDefect::NegativeBranchLength {
                vertex: format!("{:?}", node),
                length,
            }),
            Some(length) => Ok(length),
        }
    }
}

fn add_to_leaf(leaf_lengths: &mut [Option<f64>], position: Option<usize>, length: f64) {
    if let Some(entry) = position.and_then(|p| leaf_lengths.get_mut(p)) {
        *entry = Some(entry.unwrap_or(0.0) + length);
    }
}

// ============================================================================
// Structural validation
// ============================================================================
/// Vertices of a validated tree in pre-order, with its labeled leaves.
struct Scan<'t, N> {
    root: N,
    order: Vec<N>,
    leaves: Vec<(N, &'t str)>,
}

/// Walks the tree from its root, checking it is a tree with labeled leaves,
/// unique labels and no vertex with a single child.
fn scan_tree<T: TreeView>(tree: &T) -> Result<Scan<'_, T::Node>, CodecError> {
    let root = tree.root().ok_or(TreeDefect::EmptyTree)?;

    let mut order = Vec::new();
    let mut leaves = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            return Err(TreeDefect::NotATree {
                vertex: format!("{:?}", node),
            }
            .into());
        }
        order.push(node);

        if tree.is_leaf(node) {
            let label = tree
                .label(node)
                .filter(|label| !label.is_empty())
                .ok_or_else(|| TreeDefect::UnlabeledLeaf {
                    vertex: format!("{:?}", node),
                })?;
            leaves.push((node, label));
        } else {
            let children = tree.children(node);
            if children.len() < 2 {
                return Err(TreeDefect::TooFewChildren {
                    vertex: format!("{:?}", node),
                    num_children: children.len(),
                }
                .into());
            }
            stack.extend(children.iter().rev());
        }
    }

    let mut seen = HashSet::with_capacity(leaves.len());
    for &(_, label) in &leaves {
        if !seen.insert(label) {
            return Err(CodecError::DuplicateLabel(label.to_string()));
        }
    }

    Ok(Scan {
        root,
        order,
        leaves,
    })
}

// =#========================================================================#=
// QUICK API
// =#========================================================================#=
/// Canonicalizes `tree` over its own leaf labels with default settings.
///
/// See [`Canonicalizer::canonicalize`].
pub fn canonicalize<T: TreeView>(tree: &T) -> Result<CanonicalForm, CodecError> {
    Canonicalizer::new().canonicalize(tree)
}

/// Canonicalizes `tree` over the universe `taxa` with default settings.
///
/// See [`Canonicalizer::canonicalize_over`].
pub fn canonicalize_over<T: TreeView>(
    tree: &T,
    taxa: &TaxonSet,
) -> Result<CanonicalForm, CodecError> {
    Canonicalizer::new().canonicalize_over(tree, taxa)
}

/// Returns whether two trees are the same unrooted tree, with the same leaf
/// labels and identical branch lengths, regardless of rooting and children
/// order.
///
/// # Example
/// ```
/// use phylovec::codec::same_tree;
/// use phylovec::parse_newick_str;
///
/// let rooted = parse_newick_str("((A:1,B:1):0.5,(C:1,D:1):0.5);").unwrap();
/// let unrooted = parse_newick_str("(C:1,D:1,(B:1,A:1):1);").unwrap();
/// assert!(same_tree(&rooted, &unrooted)?);
/// # Ok::<(), phylovec::codec::CodecError>(())
/// ```
pub fn same_tree<A: TreeView, B: TreeView>(first: &A, second: &B) -> Result<bool, CodecError> {
    Ok(canonicalize(first)? == canonicalize(second)?)
}
