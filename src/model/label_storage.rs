//! Trait for label storage backends used by tree builders.

use std::fmt::Debug;

// =#========================================================================#=
// LABEL STORAGE
// =#========================================================================T=
/// Backend storage for labels during parsing and decoding.
///
/// A [LabelStorage] works with a [TreeBuilder](crate::model::TreeBuilder)
/// to handle leaf labels. The Newick parser and the vector decoder call
/// [`store_and_ref`](Self::store_and_ref) to convert label strings into
/// [LabelRef](Self::LabelRef) values that get passed to the builder.
///
/// The associated type [LabelRef](Self::LabelRef) must match
/// [`TreeBuilder::LabelRef`](crate::model::TreeBuilder::LabelRef).
///
/// # Implementations
/// * [SimpleLabelStorage](crate::model::SimpleLabelStorage):
///   returns owned [String]s
/// * [LeafLabelMap](crate::model::LeafLabelMap):
///   returns indices into shared storage
pub trait LabelStorage: Debug {
    /// The reference type stored in tree leaves.
    type LabelRef: Clone + Debug;

    /// Creates a new storage with capacity for the expected number of labels.
    fn with_capacity(num_labels: usize) -> Self;

    /// Stores a label and returns its reference.
    fn store_and_ref(&mut self, label: &str) -> Self::LabelRef;

    /// Looks up an existing label, returning its reference if found.
    ///
    /// Does not modify storage.
    fn check_and_ref(&self, label: &str) -> Option<Self::LabelRef>;

    /// Returns the number of labels in storage.
    fn num_labels(&self) -> usize;
}
