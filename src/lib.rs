//! Phylovec is a library to encode phylogenetic trees as fixed-length
//! numeric vectors and to decode such vectors back into trees.
//!
//! The encoding is canonical, deterministic and reversible: the same
//! unrooted tree (same leaf labels, topology and branch lengths) always
//! gives the bit-identical vector, regardless of children order and of
//! where the tree is rooted, and decoding the vector gives that tree back.
//! Core functionality provided:
//! - Canonicalizer: reduces a tree to its leaf edge lengths and its splits
//!   (bipartitions of the leaves induced by internal edges) in a fixed order.
//! - Vector codec: places these lengths at fixed positions of a vector over
//!   a taxon universe of `n` labels, which has one entry per taxon and one
//!   per possible non-trivial split (`2^(n-1) - 1` entries in total).
//!   Absent entries hold a negative sentinel.
//! - Tree models: [SimpleTree] and [CompactTree] + [LeafLabelMap] in arena
//!   style; other tree types plug in through
//!   [TreeView](crate::model::TreeView) and
//!   [TreeBuilder](crate::model::TreeBuilder).
//! - Newick: parse and write (also in sorted form) Newick strings.
//!
//! Limitations:
//! - Vector length grows exponentially with the number of taxa; the codec
//!   refuses universes beyond a configurable maximum (default 24 taxa).
//! - Only leaf labels and branch lengths are considered; internal labels
//!   and annotations are dropped when parsing.
//!
//! # Usage patterns
//! 1. Quick functions with default settings, see below and [crate::newick].
//! 2. Configure a [VectorCodec](crate::codec::VectorCodec) (sentinel,
//!    handling of missing branch lengths, maximum number of taxa) and
//!    decode into your own tree type via
//!    [`decode_with`](crate::codec::VectorCodec::decode_with).
//!
//! ## Example
//! ```
//! use phylovec::model::TaxonSet;
//! use phylovec::{decode, encode, parse_newick_str};
//!
//! let tree = parse_newick_str("((A:1,B:2):0.5,(C:3,D:4):0.25);").unwrap();
//! let taxa = TaxonSet::new(["A", "B", "C", "D"])?;
//!
//! // Rooted on an edge: both root edges form the {A,B}|{C,D} edge
//! let vector = encode(&tree, Some(&taxa))?;
//! assert_eq!(vector, [1.0, 2.0, 3.0, 4.0, 0.75, -1.0, -1.0]);
//!
//! let decoded = decode(&vector, &taxa)?;
//! assert_eq!(phylovec::newick::to_sorted_newick(&decoded), "(A:1,B:2,(C:3,D:4):0.75);");
//! # Ok::<(), phylovec::codec::CodecError>(())
//! ```

pub mod codec;
pub mod model;
pub mod newick;
pub mod parser;

use crate::codec::{CanonicalForm, CodecError, VectorCodec};
use crate::model::CompactTree;
use crate::model::SimpleTree;
use crate::model::TaxonSet;
use crate::model::TreeView;
use crate::model::leaf_label_map::LeafLabelMap;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings,
/// returning a [SimpleTree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<SimpleTree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse a file containing a semicolon-separated list of Newick strings
/// using default settings, returning a vector of [CompactTree] together
/// with their shared [LeafLabelMap].
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<CompactTree>, LeafLabelMap), ParsingError> {
    newick::parse_file(path)
}

// ============================================================================
// Quick Codec API
// ============================================================================
/// Canonicalizes a tree over its own leaf labels using default settings.
///
/// See [`codec::Canonicalizer`].
pub fn canonicalize<T: TreeView>(tree: &T) -> Result<CanonicalForm, CodecError> {
    codec::canonicalize(tree)
}

/// Encodes a tree using default settings, over `taxa` if given, else over
/// its own leaf labels.
///
/// See [`VectorCodec::encode`].
pub fn encode<T: TreeView>(tree: &T, taxa: Option<&TaxonSet>) -> Result<Vec<f64>, CodecError> {
    VectorCodec::new().encode(tree, taxa)
}

/// Decodes a vector over `taxa` using default settings.
///
/// See [`VectorCodec::decode`].
pub fn decode(vector: &[f64], taxa: &TaxonSet) -> Result<SimpleTree, CodecError> {
    VectorCodec::new().decode(vector, taxa)
}
