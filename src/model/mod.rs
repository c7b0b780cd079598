//! Data model for phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [GenTree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Roots and internal vertices may have any
//! number of children; a single leaf can also be the root of a tree.
//!
//! Two concrete tree types are provided:
//!
//! | Type | Label storage | Use case |
//! |------|---------------|----------|
//! | [CompactTree] | [LabelIndex] into shared [LeafLabelMap] | Multiple trees with same taxa |
//! | [SimpleTree] | Owned [String] per leaf | Single self-contained tree |
//!
//! # Reading trees
//! The codec reads trees through the [TreeView] trait. [SimpleTree]
//! implements it directly, a [CompactTree] through
//! [`CompactTree::view`] with its [LeafLabelMap].
//!
//! # Building trees
//! Trees are constructed by the Newick parser and by vector decoding via the
//! [TreeBuilder] trait, which decouples producers from concrete tree types:
//!
//! - [CompactTreeBuilder] → [CompactTree]
//! - [SimpleTreeBuilder] → [SimpleTree]
//!
//! # Taxa
//! A [TaxonSet] fixes the sorted label universe that vectors are defined
//! over. [RandomTreeGenerator] draws random trees over one.

pub mod compact_tree_builder;
pub mod label_storage;
pub mod leaf_label_map;
pub mod random;
pub mod simple_tree_builder;
pub mod taxon_set;
pub mod tree;
pub mod tree_builder;
pub mod tree_view;
pub mod vertex;

// Tree (generic)
pub use tree::GenTree;
pub use tree::VertexIndex;
pub use tree_builder::TreeBuilder;
pub use tree_view::TreeView;
pub use vertex::BranchLength;
pub use vertex::Vertex;
// Compact tree
pub use compact_tree_builder::CompactTreeBuilder;
pub use leaf_label_map::LabelIndex;
pub use leaf_label_map::LeafLabelMap;
pub use tree::CompactTree;
pub use tree_view::CompactTreeView;
// Simple Tree
pub use simple_tree_builder::SimpleLabelStorage;
pub use simple_tree_builder::SimpleTreeBuilder;
pub use tree::SimpleTree;
// Label handling
pub use label_storage::LabelStorage;
// Taxa
pub use random::RandomTreeGenerator;
pub use taxon_set::TaxonSet;
