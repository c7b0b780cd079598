//! Provides generic tree representations.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [`GenTree<LabelRef>`] - Main tree structure using the arena pattern
//!   for efficient memory layout, generic over way vertices handle labels.
//! * [CompactTree] as realization with [LabelIndex]
//! * [SimpleTree] as realization with [String]
//! * [VertexIndex] as type used to index vertices in tree

use crate::model::leaf_label_map::{LabelIndex, LeafLabelMap};
use crate::model::tree_view::CompactTreeView;
use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// Generic over `L` (LabelRef), representing how leaves handle labels
/// (e.g. as index or String).
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - Root and internal vertices may have any number of children
///   (multifurcating trees are allowed).
/// - A tree with a single leaf has that leaf as its root.
/// - No assumption on order of indices is maintained.
///   (e.g. leaves must not be first `n` indices)
/// - Leaves handle labels via their label reference type `L`,
///   e.g. implementation [CompactTree] pointing into a shared [LeafLabelMap].
/// - Branch lengths are optional, but if provided must be non-negative.
///
/// # Construction
/// To construct a tree, specify its size based on the number of leaves,
/// then add vertices one by one bottom-up, finishing with the root.
/// Test validity with [`GenTree::is_valid()`].
#[derive(Debug, Clone)]
pub struct GenTree<L> {
    /// Number of leaf nodes this tree was initialized for
    num_leaves_init: usize,

    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex<L>>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// Convenient type aliases
/// Tree with shared labels via [LeafLabelMap], which is efficient for set of trees.
pub type CompactTree = GenTree<LabelIndex>;

/// Tree with embedded String labels.
pub type SimpleTree = GenTree<String>;

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl<L> GenTree<L> {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// # Arguments
    /// `num_leaves` - expected number of leaves, used as capacity hint; must be positive
    ///
    /// # Panics
    /// Panics if `num_leaves` is zero.
    pub fn new(num_leaves: usize) -> Self {
        assert!(num_leaves > 0);
        let capacity = 2 * num_leaves - 1;
        GenTree {
            num_leaves_init: num_leaves,
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices
    /// * `branch_length` - Optional length of incoming edge (for special cases, non-negative)
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or refers to a root.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.attach_children(index, &children);
        self.vertices
            .push(Vertex::new_root(index, children, branch_length));
        self.root_index = index;

        index
    }

    /// Adds a root without branch length to the tree,
    /// assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root_without_branch(&mut self, children: Vec<VertexIndex>) -> VertexIndex {
        self.add_root(children, None)
    }

    /// Adds a leaf and makes it the root, resulting in a single-leaf tree.
    ///
    /// # Arguments
    /// * `branch_length` - Optional root branch length
    /// * `label` - Label (ref) for this leaf
    ///
    /// # Returns
    /// The index of the newly created leaf vertex.
    pub fn add_root_leaf(&mut self, branch_length: Option<BranchLength>, label: L) -> VertexIndex {
        let index = self.add_leaf(branch_length, label);
        self.root_index = index;
        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    ///
    /// # Returns
    /// The index of the newly created internal vertex.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or refers to a root.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.attach_children(index, &children);
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    /// * `label` - Label (ref) for this leaf (type depends on tree variant)
    ///
    /// # Returns
    /// The index of the newly created leaf vertex.
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, label: L) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label));
        index
    }

    fn attach_children(&mut self, parent: VertexIndex, children: &[VertexIndex]) {
        for &child in children {
            self[child].set_parent(parent);
        }
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex<L> {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex<L> {
        &self[index]
    }

    /// Returns the number of leaves this tree was initialized to hold.
    ///
    /// This represents the capacity, not necessarily the current count of leaf vertices.
    pub fn num_leaves_init(&self) -> usize {
        self.num_leaves_init
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (excluding the root) in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether every vertex has at most two children.
    pub fn is_binary(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.children().is_none_or(|c| c.len() <= 2))
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .filter(|v| v.index() != self.root_index)
            .all(Vertex::has_branch_length)
    }
}

impl<L: ValidLabel> GenTree<L> {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and points to a Root vertex
    ///   (or to the only vertex, a leaf, of a single-leaf tree)
    /// - All vertex indices match their position in the arena
    /// - Root and internal vertices have at least two children
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - All vertices are reachable from the root
    /// - All leaves have a valid label
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.vertices.len() {
            return false;
        }

        let root = &self.vertices[self.root_index];
        if root.is_leaf() {
            return self.vertices.len() == 1
                && !root.has_parent()
                && root.label().is_some_and(ValidLabel::is_valid_label);
        }
        if !root.is_root() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Only one root
            if vertex.is_root() && index != self.root_index {
                return false;
            }

            // Check children references
            if let Some(children) = vertex.children() {
                if children.len() < 2 {
                    return false;
                }
                for &child in children {
                    if child >= self.vertices.len() || self.vertices[child].parent() != Some(index)
                    {
                        return false;
                    }
                }
            }

            // Check parent references; root has no parent by construction
            if !vertex.is_root() {
                match vertex.parent() {
                    None => return false,
                    Some(parent) => {
                        let listed = self
                            .vertices
                            .get(parent)
                            .and_then(Vertex::children)
                            .is_some_and(|c| c.contains(&index));
                        if !listed {
                            return false;
                        }
                    }
                }
            }

            if let Some(label) = vertex.label() {
                if !label.is_valid_label() {
                    return false;
                }
            }
        }

        // With consistent parent/child references, the walk from the root
        // terminates; it must reach every vertex
        self.pre_order_iter().count() == self.vertices.len()
    }
}

impl<L> std::ops::Index<VertexIndex> for GenTree<L> {
    type Output = Vertex<L>;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl<L> std::ops::IndexMut<VertexIndex> for GenTree<L> {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

impl CompactTree {
    /// Pairs this tree with its label map, giving a
    /// [TreeView](crate::model::TreeView) that resolves leaf labels.
    pub fn view<'a>(&'a self, labels: &'a LeafLabelMap) -> CompactTreeView<'a> {
        CompactTreeView::new(self, labels)
    }
}

impl SimpleTree {
    /// Returns the labels of all leaves in pre-order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter_map(|v| v.label().map(String::as_str))
            .collect()
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl<L> GenTree<L> {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for aggregating data from leaves upward.
    ///
    /// # Example
    /// ```
    /// use phylovec::model::tree::GenTree;
    /// use phylovec::model::vertex::BranchLength;
    ///
    /// let mut tree = GenTree::new(3);
    /// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A".to_string());
    /// let b = tree.add_leaf(Some(BranchLength::new(1.0)), "B".to_string());
    /// let c = tree.add_leaf(Some(BranchLength::new(1.0)), "C".to_string());
    /// let root = tree.add_root_without_branch(vec![a, b, c]);
    ///
    /// let indices: Vec<_> = tree.post_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![a, b, c, root]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_, L> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    ///
    /// # Example
    /// ```
    /// use phylovec::model::tree::GenTree;
    /// use phylovec::model::vertex::BranchLength;
    ///
    /// let mut tree = GenTree::new(2);
    /// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A".to_string());
    /// let b = tree.add_leaf(Some(BranchLength::new(1.0)), "B".to_string());
    /// let root = tree.add_root_without_branch(vec![a, b]);
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![root, a, b]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_, L> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a, L> {
    tree: &'a GenTree<L>,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a, L> PostOrderIter<'a, L> {
    fn new(tree: &'a GenTree<L>) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a, L> Iterator for PostOrderIter<'a, L> {
    type Item = &'a Vertex<L>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            match vertex.children() {
                Some(children) if !children_visited => {
                    self.stack.push((index, true));
                    // Push in reverse, so first child is processed first
                    self.stack
                        .extend(children.iter().rev().map(|&child| (child, false)));
                }
                _ => return Some(vertex),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a, L> {
    tree: &'a GenTree<L>,
    stack: Vec<VertexIndex>,
}

impl<'a, L> PreOrderIter<'a, L> {
    fn new(tree: &'a GenTree<L>) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a, L> Iterator for PreOrderIter<'a, L> {
    type Item = &'a Vertex<L>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        if let Some(children) = vertex.children() {
            self.stack.extend(children.iter().rev());
        }

        Some(vertex)
    }
}

// =#========================================================================#=
// VALID LABEL TRAIT
// =#========================================================================T=
/// Trait for label types that can be validated in a tree context.
pub trait ValidLabel {
    /// Checks whether this label is valid on a very basic level,
    /// e.g. for a String that it is non-empty.
    fn is_valid_label(&self) -> bool;
}

impl ValidLabel for LabelIndex {
    fn is_valid_label(&self) -> bool {
        true
    }
}

impl ValidLabel for String {
    fn is_valid_label(&self) -> bool {
        !self.is_empty()
    }
}
