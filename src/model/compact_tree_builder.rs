//! Provides [TreeBuilder] implementation structs for [CompactTree].

use crate::model::tree_builder::TreeBuilder;
use crate::model::vertex::BranchLength;
use crate::model::{CompactTree, LabelIndex, LeafLabelMap, VertexIndex};

/// Builder that constructs [CompactTree] instances.
///
/// [CompactTreeBuilder] implements [TreeBuilder] to construct
/// [CompactTree] instances during parsing or decoding. Labels are stored
/// externally in a [LeafLabelMap], with leaves holding only [LabelIndex]
/// references.
///
/// This is the recommended builder for many trees over the same taxa,
/// as all trees share a single label map, avoiding string duplication.
///
/// # Panics
/// Branch lengths handed to the builder must be non-negative and finite,
/// and `add_*` must not be called before `init_next`.
///
/// # Example
/// ```
/// use phylovec::newick::NewickParser;
/// use phylovec::parser::byte_parser::ByteParser;
///
/// let byte_parser = ByteParser::for_str("(A:1,(B:1,C:1):1);(A:1,B:1,C:2);");
/// let mut parser = NewickParser::new_compact_defaults();
/// let trees = parser.parse_all(byte_parser)?;
/// let labels = parser.into_label_storage();
/// assert_eq!(trees.len(), 2);
/// assert_eq!(labels.num_labels(), 3);
/// # Ok::<(), phylovec::parser::ParsingError>(())
/// ```
pub struct CompactTreeBuilder {
    current_tree: Option<CompactTree>,
}

impl CompactTreeBuilder {
    /// Creates a new builder in the empty state.
    pub fn new() -> Self {
        Self { current_tree: None }
    }

    fn tree(&mut self) -> &mut CompactTree {
        self.current_tree.as_mut().expect("init not called")
    }
}

impl Default for CompactTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder for CompactTreeBuilder {
    type LabelRef = LabelIndex;
    type VertexIdx = VertexIndex;
    type Tree = CompactTree;
    type Storage = LeafLabelMap;

    fn create_storage(capacity: usize) -> LeafLabelMap {
        LeafLabelMap::new(capacity)
    }

    fn init_next(&mut self, num_leaves: usize) {
        self.current_tree = Some(CompactTree::new(num_leaves.max(1)));
    }

    fn add_leaf(&mut self, branch_len: Option<f64>, label: LabelIndex) -> VertexIndex {
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

    fn add_root_leaf(&mut self, branch_len: Option<f64>, label: LabelIndex) -> VertexIndex {
        self.tree()
            .add_root_leaf(branch_len.map(BranchLength::new), label)
    }

    fn finish_tree(&mut self) -> Option<CompactTree> {
        self.current_tree.take()
    }
}
