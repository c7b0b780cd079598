//! Canonical forms of phylogenetic trees and their vector encoding.
//!
//! # Pipeline
//! * [Canonicalizer] - reduces a tree to a [CanonicalForm]: leaf edge
//!   lengths per taxon and non-trivial splits with lengths, independent of
//!   children order and root placement
//! * [SplitLayout] - fixed position of each possible split over a taxon
//!   universe
//! * [VectorCodec] - writes canonical forms to vectors of length
//!   `n + max_internal_edges(n)` and reconstructs trees from such vectors
//!
//! Encoding and decoding are inverse on the tree's unrooted topology and
//! branch lengths: decoding an encoded tree gives a tree with the same
//! canonical form, which encodes to the bit-identical vector.
//!
//! # Example
//! ```
//! use phylovec::codec::{VectorCodec, same_tree};
//! use phylovec::model::TaxonSet;
//! use phylovec::parse_newick_str;
//!
//! let taxa = TaxonSet::new(["A", "B", "C", "D", "E"])?;
//! let tree = parse_newick_str("((A:1,B:1):0.5,(C:1,D:1):0.25);").unwrap();
//!
//! let codec = VectorCodec::new();
//! let vector = codec.encode(&tree, Some(&taxa))?;
//! assert_eq!(vector.len(), 15);
//! assert_eq!(vector[4], -1.0); // E is not in the tree
//!
//! let decoded = codec.decode(&vector, &taxa)?;
//! assert!(same_tree(&tree, &decoded)?);
//! # Ok::<(), phylovec::codec::CodecError>(())
//! ```

pub mod canonical;
pub mod error;
pub mod layout;
pub mod vector_codec;

pub use canonical::CanonicalForm;
pub use canonical::CanonicalSplit;
pub use canonical::Canonicalizer;
pub use canonical::MissingBranchLength;
pub use canonical::{canonicalize, canonicalize_over, same_tree};
pub use error::CodecError;
pub use error::TreeDefect;
pub use layout::SplitLayout;
pub use layout::{MAX_LAYOUT_TAXA, checked_max_internal_edges, checked_vector_len, max_internal_edges};
pub use vector_codec::VectorCodec;
pub use vector_codec::{DEFAULT_MAX_TAXA, DEFAULT_SENTINEL};
