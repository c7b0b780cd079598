//! Error types for canonicalization, encoding and decoding.
//!
//! All codec operations return [CodecError]. Errors are raised at the first
//! validation point that detects them and fail the whole call; nothing is
//! retried or silently repaired.

use thiserror::Error;

// =#========================================================================#=
// CODEC ERROR
// =#========================================================================#=
/// Error raised by the [Canonicalizer](crate::codec::Canonicalizer) and the
/// [VectorCodec](crate::codec::VectorCodec).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A leaf label (or taxon of a supplied universe) occurs more than once.
    #[error("Duplicate leaf label '{0}'")]
    DuplicateLabel(String),

    /// A taxon label is the empty string.
    #[error("Empty taxon label")]
    EmptyLabel,

    /// The tree (or the tree described by a vector) is malformed.
    #[error("Invalid tree - {0}")]
    InvalidTree(#[from] TreeDefect),

    /// The supplied taxon universe does not cover all leaves of the tree.
    #[error("Leaf labels {missing:?} are not part of the taxon set")]
    LabelSetMismatch {
        /// Tree labels absent from the universe, sorted
        missing: Vec<String>,
    },

    /// A vector's length does not match its taxon universe.
    #[error("Vector of length {actual} does not match {num_taxa} taxa (expected length {expected})")]
    VectorLength {
        /// Length required for the universe
        expected: usize,
        /// Length of the given vector
        actual: usize,
        /// Number of taxa in the universe
        num_taxa: usize,
    },

    /// Two splits of a vector cannot be present in the same tree.
    #[error("Splits {first} and {second} are neither nested nor disjoint")]
    NonLaminarSplit {
        /// Signature of the first split, e.g. `{A,B}`
        first: String,
        /// Signature of the second split
        second: String,
    },

    /// The universe is too large for a vector to be allocated.
    #[error("{num_taxa} taxa exceed the supported maximum of {max_taxa}")]
    UniverseTooLarge {
        /// Number of taxa requested
        num_taxa: usize,
        /// Configured maximum
        max_taxa: usize,
    },
}

// =#========================================================================#=
// TREE DEFECT
// =#========================================================================#=
/// Details for [CodecError::InvalidTree].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeDefect {
    /// Tree without any vertex.
    #[error("tree is empty")]
    EmptyTree,

    /// Root or internal vertex with fewer than two children.
    #[error("vertex {vertex} has {num_children} child(ren), at least two required")]
    TooFewChildren {
        /// Debug rendering of the vertex handle
        vertex: String,
        /// Number of children found
        num_children: usize,
    },

    /// A vertex is reachable along more than one path (cycle or shared child).
    #[error("vertex {vertex} is reached more than once")]
    NotATree {
        /// Debug rendering of the vertex handle
        vertex: String,
    },

    /// Leaf without label, or with an empty label.
    #[error("leaf {vertex} has no label")]
    UnlabeledLeaf {
        /// Debug rendering of the vertex handle
        vertex: String,
    },

    /// Edge with negative length.
    #[error("negative branch length {length} above vertex {vertex}")]
    NegativeBranchLength {
        /// Debug rendering of the vertex handle
        vertex: String,
        /// Offending length
        length: f64,
    },

    /// Edge with NaN or infinite length.
    #[error("non-finite branch length {length} above vertex {vertex}")]
    NonFiniteBranchLength {
        /// Debug rendering of the vertex handle
        vertex: String,
        /// Offending length
        length: f64,
    },

    /// Edge without length while missing lengths are rejected.
    #[error("missing branch length above vertex {vertex}")]
    MissingBranchLength {
        /// Debug rendering of the vertex handle
        vertex: String,
    },

    /// Vector entry that is neither the sentinel nor a valid length.
    #[error("vector entry {value} at position {position} is neither a length nor the sentinel")]
    InvalidVectorEntry {
        /// Position in the vector
        position: usize,
        /// Offending value
        value: f64,
    },

    /// Vector split entry that does not describe a non-trivial split of the
    /// taxa present in the vector.
    #[error("split {signature} at position {position} is not a split of the present taxa")]
    UnrealizableSplit {
        /// Position in the vector
        position: usize,
        /// Signature of the split, e.g. `{A,B}`
        signature: String,
    },
}
