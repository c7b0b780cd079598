//! Trait for constructing phylogenetic trees during parsing and decoding.
//!
//! The [`TreeBuilder`] trait decouples producers of trees (the Newick parser
//! and the vector decoder) from concrete tree representations. Producers
//! call builder methods as they discover leaves, internal vertices and the
//! root, and the builder assembles whatever tree structure it wants.
//!
//! # Label handling
//! A [`TreeBuilder`] works together with a [`LabelStorage`] to handle leaf
//! labels. The key connection is the associated type
//! [`LabelRef`](TreeBuilder::LabelRef):
//!
//! - **[LabelStorage]** gets label strings and returns `LabelRef` values
//! - **[TreeBuilder]** receives those `LabelRef` values in
//!   [`add_leaf`](TreeBuilder::add_leaf)
//!
//! # Built-in implementations
//! * [`CompactTreeBuilder`] - Builds [`CompactTree`] with labels stored in a shared [`LeafLabelMap`]
//! * [`SimpleTreeBuilder`] - Builds [`SimpleTree`] with labels (copies) stored directly in leaves
//!
//! # Custom implementations
//! You can implement [`TreeBuilder`] to construct your own tree representation,
//! allowing you to reuse the parsing and decoding logic without adopting this
//! library's tree model. Your implementation must also provide a compatible
//! [`LabelStorage`] via the associated type [`Storage`](TreeBuilder::Storage).
//!
//! # Builder lifecycle
//! A builder can construct multiple trees sequentially:
//!
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_* ──→ finish_tree() ──→ Empty
//!   ↑                                                                  │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
// Imports for doc links
#[allow(unused_imports)]
use crate::model::{
    CompactTree, CompactTreeBuilder, LeafLabelMap, SimpleTree, SimpleTreeBuilder,
};

use crate::model::label_storage::LabelStorage;

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees bottom-up.
///
/// Producers are generic over this trait, calling its methods as they
/// encounter leaves, internal vertices, and roots. This allows the same
/// parser or decoder to build different tree representations.
///
/// # Implementing this trait
/// Implementors typically maintain internal state for the tree under construction.
/// The producer drives the lifecycle:
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal),
///    then [`add_root`](Self::add_root) (or
///    [`add_root_leaf`](Self::add_root_leaf) for a single-leaf tree)
///    -> build structure, children always before their parent
/// 3. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
///
/// After `finish_tree`, the builder returns to an empty state,
/// ready for `init_next` again.
pub trait TreeBuilder {
    /// The type used to reference labels within the tree.
    ///
    /// For trees with shared label storage, this is typically an index into
    /// a [`LeafLabelMap`]. For self-contained trees, this might be [`String`].
    type LabelRef;

    /// The type used to identify vertices during construction.
    ///
    /// Returned by the `add_*` methods, then passed to subsequent calls to
    /// connect parent-child relationships.
    type VertexIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// The [`LabelStorage`] type compatible with this builder.
    ///
    /// The constraint `LabelRef = Self::LabelRef` ensures the storage
    /// produces references that this builder can accept in
    /// [`add_leaf`](Self::add_leaf).
    type Storage: LabelStorage<LabelRef = Self::LabelRef>;

    /// Creates a new [`LabelStorage`] instance.
    ///
    /// The `capacity` hint is typically the expected number of leaves.
    fn create_storage(capacity: usize) -> Self::Storage;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of leaves (hint for allocation)
    fn init_next(&mut self, num_leaves: usize);

    /// Adds a leaf vertex to the tree under construction and returns its
    /// vertex index.
    ///
    /// # Arguments
    /// * `branch_len` - Branch length to parent, if known
    /// * `label` - Label reference obtained from the [LabelStorage]
    fn add_leaf(&mut self, branch_len: Option<f64>, label: Self::LabelRef) -> Self::VertexIdx;

    /// Adds an internal (non-root) vertex over previously added children.
    ///
    /// # Arguments
    /// * `children` - Indices of the child vertices
    /// * `branch_len` - Branch length to parent, if known
    fn add_internal(
        &mut self,
        children: &[Self::VertexIdx],
        branch_len: Option<f64>,
    ) -> Self::VertexIdx;

    /// Adds the root vertex, completing the tree structure.
    ///
    /// # Arguments
    /// * `children` - Indices of the root's child vertices
    /// * `branch_len` - Root branch length (rare, but allowed in Newick)
    fn add_root(&mut self, children: &[Self::VertexIdx], branch_len: Option<f64>)
    -> Self::VertexIdx;

    /// Adds a leaf that is also the root, completing a single-leaf tree.
    fn add_root_leaf(&mut self, branch_len: Option<f64>, label: Self::LabelRef)
    -> Self::VertexIdx;

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Transitions builder from a "construction" state to an "empty" state,
    /// assuming construction of current tree was done and valid.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}
