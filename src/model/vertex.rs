//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children, no parent and possibly a branch_length
///   (ignored for encoding, but allowed in Newick)
/// - **Internal**: Has children, no label, might have branch_length
/// - **Leaf**: Has no children, has label (ref) and might have branch_length
///
/// Generic over `L`, the way a leaf refers to its label
/// (e.g. [LabelIndex](crate::model::LabelIndex) or [String]).
///
/// # Invariants
/// - `index` is index in arena
/// - `branch_length` is non-negative and finite (enforced by [BranchLength])
/// - Internal vertices and leaves have `parent` set to the [VertexIndex] of
///   their parent; `NO_PARENT_SET` only during construction
///   or for a leaf that is the root of a single-leaf tree
/// - Root and internal vertices have any number of `children`,
///   a valid tree requires at least two
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex<L> {
    /// Root vertex of the tree (has no parent)
    Root {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Indices of the child vertices
        children: Vec<VertexIndex>,
        /// Root branch length, if given in the input
        branch_length: Option<BranchLength>,
    },
    /// Internal vertex (has parent and children, no label)
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Indices of the child vertices
        children: Vec<VertexIndex>,
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex (has parent and label, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Label reference of this leaf
        label: L,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
}

impl<L> Vertex<L> {
    /// Creates a new root vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Child indices
    /// * `branch_length` - Optional root branch length
    pub fn new_root(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Root {
            index,
            children,
            branch_length,
        }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Child indices
    /// * `branch_length` - Distance to parent vertex
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            branch_length,
        }
    }

    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `branch_length` - Distance to parent vertex
    /// * `label` - Label reference of this leaf
    pub fn new_leaf(index: VertexIndex, branch_length: Option<BranchLength>, label: L) -> Self {
        Vertex::Leaf {
            index,
            label,
            parent: NO_PARENT_SET,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. } => *index,
            Vertex::Internal { index, .. } => *index,
            Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length().is_some()
    }

    /// Returns the branch length of this vertex, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Returns the label reference if this is a leaf, else `None`.
    pub fn label(&self) -> Option<&L> {
        match self {
            Vertex::Leaf { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children if this is a root or internal vertex, else `None`.
    pub fn children(&self) -> Option<&[VertexIndex]> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(children.as_slice()),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: VertexIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } => *p = parent,
            Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex with parent set,
    /// else `None`.
    ///
    /// Note that parent might not be set yet during construction.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                if *parent == NO_PARENT_SET {
                    None
                } else {
                    Some(*parent)
                }
            }
            Vertex::Root { .. } => None,
        }
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(
            length >= 0.0,
            "Branch length must be non-negative, got {}",
            length
        );
        assert!(
            length.is_finite(),
            "Branch length must be finite, got {}",
            length
        );
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative,
    /// NaN or infinite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
