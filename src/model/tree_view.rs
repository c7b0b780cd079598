//! Read-only access to trees for canonicalization, encoding and writing.
//!
//! The [`TreeView`] trait is the minimal capability set the codec needs from
//! a tree: its root, the children of a vertex, whether a vertex is a leaf,
//! a leaf's label and a vertex's branch length. The library's own tree
//! models implement it ([`SimpleTree`] directly, [`CompactTree`] through a
//! [`CompactTreeView`] that pairs it with its [`LeafLabelMap`]), and any
//! other tree representation can implement it to be encoded without
//! converting it first.

use crate::model::leaf_label_map::LeafLabelMap;
use crate::model::tree::{CompactTree, SimpleTree, VertexIndex};
use std::fmt::Debug;
use std::hash::Hash;

// =#========================================================================#=
// TREE VIEW (trait)
// =#========================================================================T=
/// Read-only view of a rooted phylogenetic tree.
///
/// Children order carries no meaning. The branch length of a vertex is the
/// length of the edge to its parent, so the root's branch length is ignored
/// by all consumers.
pub trait TreeView {
    /// Handle identifying a vertex.
    type Node: Copy + Eq + Hash + Debug;

    /// Returns the root, or `None` for an empty tree.
    fn root(&self) -> Option<Self::Node>;

    /// Returns the children of `node` (empty for leaves).
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Returns whether `node` is a leaf.
    fn is_leaf(&self, node: Self::Node) -> bool {
        self.children(node).is_empty()
    }

    /// Returns the label of a leaf, `None` for unlabeled vertices.
    fn label(&self, node: Self::Node) -> Option<&str>;

    /// Returns the length of the edge above `node`, if set.
    fn branch_length(&self, node: Self::Node) -> Option<f64>;
}

impl TreeView for SimpleTree {
    type Node = VertexIndex;

    fn root(&self) -> Option<VertexIndex> {
        self.is_root_set().then(|| self.root_index())
    }

    fn children(&self, node: VertexIndex) -> &[VertexIndex] {
        self[node].children().unwrap_or(&[])
    }

    fn is_leaf(&self, node: VertexIndex) -> bool {
        self[node].is_leaf()
    }

    fn label(&self, node: VertexIndex) -> Option<&str> {
        self[node].label().map(String::as_str)
    }

    fn branch_length(&self, node: VertexIndex) -> Option<f64> {
        self[node].branch_length().map(|length| *length)
    }
}

// =#========================================================================#=
// COMPACT TREE VIEW
// =#========================================================================#=
/// A [CompactTree] together with the [LeafLabelMap] its label indices point into.
///
/// Obtained via [`CompactTree::view`].
#[derive(Debug, Clone, Copy)]
pub struct CompactTreeView<'a> {
    tree: &'a CompactTree,
    labels: &'a LeafLabelMap,
}

impl<'a> CompactTreeView<'a> {
    /// Creates a view on `tree` resolving labels through `labels`.
    pub fn new(tree: &'a CompactTree, labels: &'a LeafLabelMap) -> Self {
        Self { tree, labels }
    }

    /// Returns the underlying tree.
    pub fn tree(&self) -> &'a CompactTree {
        self.tree
    }

    /// Returns the label map used to resolve leaf labels.
    pub fn labels(&self) -> &'a LeafLabelMap {
        self.labels
    }
}

impl TreeView for CompactTreeView<'_> {
    type Node = VertexIndex;

    fn root(&self) -> Option<VertexIndex> {
        self.tree.is_root_set().then(|| self.tree.root_index())
    }

    fn children(&self, node: VertexIndex) -> &[VertexIndex] {
        self.tree[node].children().unwrap_or(&[])
    }

    fn is_leaf(&self, node: VertexIndex) -> bool {
        self.tree[node].is_leaf()
    }

    fn label(&self, node: VertexIndex) -> Option<&str> {
        let index = *self.tree[node].label()?;
        self.labels.get_label(index)
    }

    fn branch_length(&self, node: VertexIndex) -> Option<f64> {
        self.tree[node].branch_length().map(|length| *length)
    }
}
