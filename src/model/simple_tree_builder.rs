//! Provides [TreeBuilder] and [LabelStorage] implementation structs for
//! [SimpleTree].

use crate::model::label_storage::LabelStorage;
use crate::model::tree_builder::TreeBuilder;
use crate::model::vertex::BranchLength;
use crate::model::{SimpleTree, VertexIndex};

// =#========================================================================#=
// SIMPLE TREE BUILDER
// =#========================================================================#=
/// Builder that constructs [SimpleTree] instances, with each leaf owning
/// a copy of its label.
///
/// Used by [`parse_newick_str`](crate::parse_newick_str) and by
/// [`VectorCodec::decode`](crate::codec::VectorCodec::decode).
#[derive(Default)]
pub struct SimpleTreeBuilder {
    current_tree: Option<SimpleTree>,
}

impl SimpleTreeBuilder {
    /// Creates a new builder in the empty state.
    pub fn new() -> Self {
        Self { current_tree: None }
    }

    fn tree(&mut self) -> &mut SimpleTree {
        self.current_tree.as_mut().expect("init not called")
    }
}

impl TreeBuilder for SimpleTreeBuilder {
    type LabelRef = String;
    type VertexIdx = VertexIndex;
    type Tree = SimpleTree;
    type Storage = SimpleLabelStorage;

    fn create_storage(capacity: usize) -> SimpleLabelStorage {
        SimpleLabelStorage::with_capacity(capacity)
    }

    fn init_next(&mut self, num_leaves: usize) {
        self.current_tree = Some(SimpleTree::new(num_leaves.max(1)));
    }

    fn add_leaf(&mut self, branch_len: Option<f64>, label: String) -> VertexIndex {
        self.tree().add_leaf(branch_len.map(BranchLength::new), label)
    }

    fn add_internal(&mut self, children: &[VertexIndex], branch_len: Option<f64>) -> VertexIndex {
        self.tree()
            .add_internal_vertex(children.to_vec(), branch_len.map(BranchLength::new))
    }

    fn add_root(&mut self, children: &[VertexIndex], branch_len: Option<f64>) -> VertexIndex {
        self.tree()
            .add_root(children.to_vec(), branch_len.map(BranchLength::new))
    }

    fn add_root_leaf(&mut self, branch_len: Option<f64>, label: String) -> VertexIndex {
        self.tree()
            .add_root_leaf(branch_len.map(BranchLength::new), label)
    }

    fn finish_tree(&mut self) -> Option<SimpleTree> {
        self.current_tree.take()
    }
}

// =#========================================================================#=
// SIMPLE LABEL STORAGE
// =#========================================================================S=
/// Basic [`LabelStorage`] implementation using owned strings.
///
/// Stores labels in a [`Vec<String>`] and returns cloned strings as references.
/// Simple but involves string allocation on each operation.
///
/// For more efficient storage with shared labels across trees,
/// see [`LeafLabelMap`](crate::model::LeafLabelMap).
#[derive(Debug, Default)]
pub struct SimpleLabelStorage {
    labels: Vec<String>,
}

impl LabelStorage for SimpleLabelStorage {
    type LabelRef = String;

    fn with_capacity(num_labels: usize) -> Self {
        Self {
            labels: Vec::with_capacity(num_labels),
        }
    }

    fn store_and_ref(&mut self, label: &str) -> String {
        self.labels.push(label.to_string());
        label.to_string()
    }

    fn check_and_ref(&self, label: &str) -> Option<String> {
        self.labels
            .iter()
            .any(|l| l == label)
            .then(|| label.to_string())
    }

    fn num_labels(&self) -> usize {
        self.labels.len()
    }
}
