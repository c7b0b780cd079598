//! Encoding of trees into fixed-length vectors and decoding back.
//!
//! # Vector layout
//! For a universe of `n` taxa a vector has `n + max_internal_edges(n)`
//! entries:
//! * positions `0..n`: leaf edge lengths, in [TaxonSet] order
//! * positions `n..`: split lengths, in [SplitLayout] order
//!
//! Entries of taxa or splits absent from the tree hold the sentinel, a
//! negative value (default [DEFAULT_SENTINEL]) that no branch length takes.

use crate::codec::canonical::{
    CanonicalForm, Canonicalizer, MissingBranchLength, cmp_signatures, format_signature,
};
use crate::codec::error::{CodecError, TreeDefect};
use crate::codec::layout::{MAX_LAYOUT_TAXA, SplitLayout, checked_vector_len};
use crate::model::{LabelStorage, SimpleTree, SimpleTreeBuilder, TaxonSet, TreeBuilder, TreeView};
use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

/// Default marker for absent entries.
pub const DEFAULT_SENTINEL: f64 = -1.0;

/// Default upper bound on the number of taxa; vectors then have at most
/// `2^23 - 1` entries.
pub const DEFAULT_MAX_TAXA: usize = 24;

// =#========================================================================#=
// VECTOR CODEC
// =#========================================================================#=
/// Encodes trees into vectors and decodes vectors into trees.
///
/// # Configuration
/// * [`with_sentinel(value)`](Self::with_sentinel) - marker for absent
///   entries, default [DEFAULT_SENTINEL]
/// * [`with_missing_branch_lengths(policy)`](Self::with_missing_branch_lengths)
///   - how edges without length are encoded, default reject
/// * [`with_max_taxa(n)`](Self::with_max_taxa) - largest accepted universe,
///   default [DEFAULT_MAX_TAXA]
///
/// A codec is an immutable value and can be shared between threads.
///
/// # Example
/// ```
/// use phylovec::codec::VectorCodec;
/// use phylovec::model::TaxonSet;
/// use phylovec::parse_newick_str;
///
/// let tree = parse_newick_str("((A:1,B:2):0.5,C:3,D:4);").unwrap();
/// let codec = VectorCodec::new();
///
/// let vector = codec.encode(&tree, None)?;
/// assert_eq!(vector, [1.0, 2.0, 3.0, 4.0, 0.5, -1.0, -1.0]);
///
/// let taxa = TaxonSet::new(["A", "B", "C", "D"])?;
/// let decoded = codec.decode(&vector, &taxa)?;
/// assert_eq!(codec.encode(&decoded, Some(&taxa))?, vector);
/// # Ok::<(), phylovec::codec::CodecError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorCodec {
    sentinel: f64,
    max_taxa: usize,
    canonicalizer: Canonicalizer,
}

impl Default for VectorCodec {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            max_taxa: DEFAULT_MAX_TAXA,
            canonicalizer: Canonicalizer::new(),
        }
    }
}

impl VectorCodec {
    /// Creates a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the marker for absent entries.
    ///
    /// # Panics
    /// Panics if `sentinel` is not negative and finite, since it must not
    /// collide with any branch length.
    pub fn with_sentinel(mut self, sentinel: f64) -> Self {
        assert!(
            sentinel < 0.0 && sentinel.is_finite(),
            "Sentinel must be negative and finite, got {}",
            sentinel
        );
        self.sentinel = sentinel;
        self
    }

    /// Sets how edges without branch length are treated when encoding.
    ///
    /// # Panics
    /// Panics if the policy assumes a negative or non-finite length.
    pub fn with_missing_branch_lengths(mut self, policy: MissingBranchLength) -> Self {
        self.canonicalizer = self.canonicalizer.with_missing_branch_lengths(policy);
        self
    }

    /// Sets the largest universe accepted by encode and decode.
    ///
    /// # Panics
    /// Panics if `max_taxa` exceeds [MAX_LAYOUT_TAXA].
    pub fn with_max_taxa(mut self, max_taxa: usize) -> Self {
        assert!(
            max_taxa <= MAX_LAYOUT_TAXA,
            "At most {} taxa are supported, got {}",
            MAX_LAYOUT_TAXA,
            max_taxa
        );
        self.max_taxa = max_taxa;
        self
    }

    /// Returns the sentinel.
    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    /// Returns the largest accepted universe size.
    pub fn max_taxa(&self) -> usize {
        self.max_taxa
    }

    /// Returns the canonicalizer used for encoding.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Returns whether `value` is the sentinel.
    pub fn is_sentinel(&self, value: f64) -> bool {
        value == self.sentinel
    }

    /// Returns the vector length for `num_taxa` taxa.
    ///
    /// # Errors
    /// [CodecError::UniverseTooLarge] if `num_taxa` exceeds the
    /// configured maximum or the vector would not fit into memory.
    pub fn vector_len(&self, num_taxa: usize) -> Result<usize, CodecError> {
        let too_large = CodecError::UniverseTooLarge {
            num_taxa,
            max_taxa: self.max_taxa,
        };
        if num_taxa > self.max_taxa {
            return Err(too_large);
        }
        checked_vector_len(num_taxa).ok_or(too_large)
    }

    // ------------------------------------------------------------------------
    // Encode
    // ------------------------------------------------------------------------
    /// Encodes `tree` over `taxa`, or over its own leaf labels if `None`.
    ///
    /// # Errors
    /// * [CodecError::InvalidTree] for malformed trees
    /// * [CodecError::DuplicateLabel] if a leaf label occurs twice
    /// * [CodecError::LabelSetMismatch] if a leaf label is not in `taxa`
    /// * [CodecError::UniverseTooLarge] if the universe exceeds the maximum
    pub fn encode<T: TreeView>(
        &self,
        tree: &T,
        taxa: Option<&TaxonSet>,
    ) -> Result<Vec<f64>, CodecError> {
        if let Some(taxa) = taxa {
            self.vector_len(taxa.len())?;
        }
        let form = match taxa {
            Some(taxa) => self.canonicalizer.canonicalize_over(tree, taxa)?,
            None => self.canonicalizer.canonicalize(tree)?,
        };
        self.encode_canonical(&form)
    }

    /// Encodes a canonical form over its universe.
    ///
    /// # Errors
    /// [CodecError::UniverseTooLarge] if the universe exceeds the maximum
    /// or the vector cannot be allocated.
    pub fn encode_canonical(&self, form: &CanonicalForm) -> Result<Vec<f64>, CodecError> {
        let num_taxa = form.taxa().len();
        let vector_len = self.vector_len(num_taxa)?;

        let mut vector = Vec::new();
        vector
            .try_reserve_exact(vector_len)
            .map_err(|_| CodecError::UniverseTooLarge {
                num_taxa,
                max_taxa: self.max_taxa,
            })?;
        vector.resize(vector_len, self.sentinel);
        for (entry, length) in vector.iter_mut().zip(form.leaf_lengths()) {
            if let Some(length) = length {
                *entry = *length;
            }
        }

        let layout = SplitLayout::new(num_taxa);
        for split in form.splits() {
            // Canonical signatures always hold taxon 0 and leave two taxa out
            let offset = layout
                .position(split.signature())
                .expect("canonical signature is a non-trivial split");
            trace!(position = num_taxa + offset, length = split.length(), "placed split");
            vector[num_taxa + offset] = split.length();
        }

        debug!(
            num_taxa,
            num_splits = form.splits().len(),
            vector_len,
            "encoded tree"
        );
        Ok(vector)
    }

    // ------------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------------
    /// Decodes `vector` over `taxa` into a [SimpleTree].
    ///
    /// See [`decode_with`](Self::decode_with).
    pub fn decode(&self, vector: &[f64], taxa: &TaxonSet) -> Result<SimpleTree, CodecError> {
        let mut builder = SimpleTreeBuilder::new();
        let mut storage = SimpleTreeBuilder::create_storage(taxa.len());
        self.decode_with(vector, taxa, &mut builder, &mut storage)
    }

    /// Decodes `vector` over `taxa`, building the tree with `builder`.
    ///
    /// The tree is rooted at a vertex of degree at least three (for at least
    /// three taxa), with children ordered by their smallest taxon. Its root
    /// has no branch length.
    ///
    /// # Errors
    /// * [CodecError::UniverseTooLarge] if `taxa` exceeds the maximum
    /// * [CodecError::VectorLength] if `vector` does not fit `taxa`
    /// * [CodecError::InvalidTree] for entries that are neither the sentinel
    ///   nor a valid length, splits that are not splits of the present taxa,
    ///   or a vector without any present taxon
    /// * [CodecError::NonLaminarSplit] for two incompatible splits
    pub fn decode_with<B: TreeBuilder>(
        &self,
        vector: &[f64],
        taxa: &TaxonSet,
        builder: &mut B,
        storage: &mut B::Storage,
    ) -> Result<B::Tree, CodecError> {
        let num_taxa = taxa.len();
        let expected = self.vector_len(num_taxa)?;
        if vector.len() != expected {
            return Err(CodecError::VectorLength {
                expected,
                actual: vector.len(),
                num_taxa,
            });
        }

        if let Some((position, &value)) = vector
            .iter()
            .enumerate()
            .find(|&(_, &value)| !self.is_sentinel(value) && !(value.is_finite() && value >= 0.0))
        {
            return Err(TreeDefect::InvalidVectorEntry { position, value }.into());
        }

        let (leaf_entries, split_entries) = vector.split_at(num_taxa);
        let mut present = FixedBitSet::with_capacity(num_taxa);
        for (position, &value) in leaf_entries.iter().enumerate() {
            if !self.is_sentinel(value) {
                present.insert(position);
            }
        }
        if present.is_clear() {
            return Err(TreeDefect::EmptyTree.into());
        }

        let clades = self.collect_clades(split_entries, taxa, &present)?;
        let hierarchy = CladeHierarchy::new(clades, taxa)?;

        builder.init_next(present.count_ones(..));
        hierarchy.build(builder, storage, taxa, leaf_entries, &present);
        let tree = builder
            .finish_tree()
            .expect("builder initialized before construction");

        debug!(
            num_taxa,
            num_leaves = present.count_ones(..),
            num_splits = hierarchy.clades.len(),
            "decoded vector"
        );
        Ok(tree)
    }

    /// Turns non-sentinel split entries into clades, the side of each split
    /// not containing the smallest present taxon.
    fn collect_clades(
        &self,
        split_entries: &[f64],
        taxa: &TaxonSet,
        present: &FixedBitSet,
    ) -> Result<Vec<Clade>, CodecError> {
        let num_taxa = taxa.len();
        let num_present = present.count_ones(..);
        let Some(root_taxon) = present.ones().next() else {
            return Ok(Vec::new());
        };

        let mut absent = FixedBitSet::with_capacity(num_taxa);
        absent.insert_range(..);
        absent.difference_with(present);

        let layout = SplitLayout::new(num_taxa);
        let mut clades = Vec::new();
        for (offset, &length) in split_entries.iter().enumerate() {
            if self.is_sentinel(length) {
                continue;
            }
            let position = num_taxa + offset;
            let Some(signature) = layout.signature_at(offset) else {
                continue;
            };

            let inside = signature.intersection(present).count();
            let realizable = absent.is_subset(&signature)
                && signature.contains(root_taxon)
                && inside >= 2
                && num_present - inside >= 2;
            if !realizable {
                return Err(TreeDefect::UnrealizableSplit {
                    position,
                    signature: format_signature(taxa, &signature),
                }
                .into());
            }

            let mut members = present.clone();
            members.difference_with(&signature);
            clades.push(Clade {
                size: num_present - inside,
                members,
                signature,
                length,
            });
        }

        Ok(clades)
    }
}

// ============================================================================
// Reconstruction
// ============================================================================
/// Present taxa below an internal edge.
#[derive(Debug)]
struct Clade {
    members: FixedBitSet,
    size: usize,
    signature: FixedBitSet,
    length: f64,
}

impl Clade {
    fn min_taxon(&self) -> usize {
        self.members.ones().next().unwrap_or(usize::MAX)
    }
}

/// A laminar family of clades, smallest first, with the parent of each.
struct CladeHierarchy {
    clades: Vec<Clade>,
    /// Index of the smallest strictly larger clade, `None` below the root
    parents: Vec<Option<usize>>,
}

impl CladeHierarchy {
    /// Orders clades by size and links each to its parent.
    ///
    /// # Errors
    /// [CodecError::NonLaminarSplit] if two clades overlap without nesting.
    fn new(mut clades: Vec<Clade>, taxa: &TaxonSet) -> Result<Self, CodecError> {
        // Stable: equally sized clades stay in vector order
        clades.sort_by_key(|clade| clade.size);

        let mut parents = vec![None; clades.len()];
        for (i, clade) in clades.iter().enumerate() {
            for (j, other) in clades.iter().enumerate().skip(i + 1) {
                if clade.members.is_disjoint(&other.members) {
                    continue;
                }
                if !clade.members.is_subset(&other.members) {
                    let (first, second) =
                        if cmp_signatures(&clade.signature, &other.signature).is_le() {
                            (clade, other)
                        } else {
                            (other, clade)
                        };
                    return Err(CodecError::NonLaminarSplit {
                        first: format_signature(taxa, &first.signature),
                        second: format_signature(taxa, &second.signature),
                    });
                }
                if parents[i].is_none() {
                    parents[i] = Some(j);
                }
            }
        }

        Ok(Self { clades, parents })
    }

    /// Emits leaves, then clades smallest first, then the root.
    fn build<B: TreeBuilder>(
        &self,
        builder: &mut B,
        storage: &mut B::Storage,
        taxa: &TaxonSet,
        leaf_entries: &[f64],
        present: &FixedBitSet,
    ) {
        let mut labels = present.ones().filter_map(|taxon| {
            let label = taxa.get(taxon)?;
            let label_ref = storage
                .check_and_ref(label)
                .unwrap_or_else(|| storage.store_and_ref(label));
            Some((taxon, label_ref))
        });

        if present.count_ones(..) == 1 {
            if let Some((_, label_ref)) = labels.next() {
                builder.add_root_leaf(None, label_ref);
            }
            return;
        }

        // Children as (smallest taxon, vertex), per clade and for the root
        let mut clade_children: Vec<Vec<(usize, B::VertexIdx)>> =
            vec![Vec::new(); self.clades.len()];
        let mut root_children: Vec<(usize, B::VertexIdx)> = Vec::new();

        for (taxon, label_ref) in labels {
            let vertex = builder.add_leaf(Some(leaf_entries[taxon]), label_ref);
            let owner = self
                .clades
                .iter()
                .position(|clade| clade.members.contains(taxon));
            match owner {
                Some(index) => clade_children[index].push((taxon, vertex)),
                None => root_children.push((taxon, vertex)),
            }
        }

        for (index, clade) in self.clades.iter().enumerate() {
            let mut children = std::mem::take(&mut clade_children[index]);
            children.sort_by_key(|&(min_taxon, _)| min_taxon);
            let child_vertices: Vec<B::VertexIdx> =
                children.into_iter().map(|(_, vertex)| vertex).collect();

            let vertex = builder.add_internal(&child_vertices, Some(clade.length));
            trace!(
                signature = %format_signature(taxa, &clade.signature),
                num_children = child_vertices.len(),
                "reconstructed clade"
            );

            let entry = (clade.min_taxon(), vertex);
            match self.parents[index] {
                Some(parent) => clade_children[parent].push(entry),
                None => root_children.push(entry),
            }
        }

        root_children.sort_by_key(|&(min_taxon, _)| min_taxon);
        let root_vertices: Vec<B::VertexIdx> =
            root_children.into_iter().map(|(_, vertex)| vertex).collect();
        builder.add_root(&root_vertices, None);
    }
}
