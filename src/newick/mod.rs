//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick format strings
//! into tree structures. The parser uses a
//! [TreeBuilder](crate::model::TreeBuilder) internally, whose
//! [LabelStorage](crate::model::LabelStorage) stores the labels.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_file`] - parses a file, returns [CompactTree]s + [LeafLabelMap]
//! * [`parse_str`] - parses a single string, returns a [SimpleTree]
//! * [`to_newick`] / [`to_sorted_newick`] - writes any
//!   [TreeView](crate::model::TreeView)
//!
//! # Full API
//! For more control, configure a [NewickParser] and
//! provide data via a [ByteParser]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//! * [`NewickParser::into_iter`] - obtain an iterator over trees
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex {',' vertex} ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Labels may be quoted with single quotes, doubling internal quotes
//! * Comments are square brackets and can occur anywhere where whitespace
//!   is allowed, so annotations like `[&rate=0.5]` are skipped
//! * A tree may consist of a single leaf, e.g. `A;`

mod defs;
pub mod parser;
pub mod writer;

pub use parser::{NewickIterator, NewickParser};
pub use writer::{
    NewickStyle, to_newick, to_newick_with_style, to_sorted_newick, write_newick,
    write_newick_file,
};

use crate::model::{CompactTree, LeafLabelMap, SimpleTree};
use crate::parser::{ByteParser, MemorySource, ParsingError};
use std::path::Path;
use tracing::debug;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a Newick file eagerly and returns all trees (as [CompactTree])
/// together with their shared [label mapping](LeafLabelMap).
///
/// This is a convenience function to parse a file containing
/// semicolon-separated list of Newick strings,
/// using default settings and thus not requiring configuration of a parser.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///   with semicolon-separated list of Newick strings
///
/// # Returns
/// * `(Vec<CompactTree>, LeafLabelMap)` - All parsed trees and their shared label mapping
/// * [ParsingError] - If file reading fails or Newick format is invalid
///
/// # Example
/// ```no_run
/// use phylovec::newick::parse_file;
///
/// let (trees, label_map) = parse_file("anseriformes.nwk")?;
/// println!("Parsed {} trees with {} taxa", trees.len(), label_map.num_labels());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<CompactTree>, LeafLabelMap), ParsingError> {
    let byte_parser = ByteParser::from_file(path)?;
    parse_all_compact(byte_parser)
}

/// Parses all Newick trees in `newick` as [CompactTree]s with their shared
/// [LeafLabelMap], as [parse_file] does for files.
pub fn parse_str_all<S: AsRef<str>>(
    newick: S,
) -> Result<(Vec<CompactTree>, LeafLabelMap), ParsingError> {
    parse_all_compact(ByteParser::for_str(newick.as_ref()))
}

fn parse_all_compact(
    byte_parser: ByteParser<MemorySource>,
) -> Result<(Vec<CompactTree>, LeafLabelMap), ParsingError> {
    let mut newick_parser = NewickParser::new_compact_defaults();
    let trees = newick_parser.parse_all(byte_parser)?;
    let label_map = newick_parser.into_label_storage();
    debug!(
        num_trees = trees.len(),
        num_labels = label_map.num_labels(),
        "parsed newick trees"
    );
    Ok((trees, label_map))
}

/// Parses a single Newick string to obtain a [SimpleTree].
///
/// This is a convenience function for quick parsing of a single Newick string
/// using default settings and thus not requiring configuration of a parser.
///
/// # Example
/// ```
/// use phylovec::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<SimpleTree, ParsingError> {
    let mut newick_parser = NewickParser::new_simple_defaults();
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    newick_parser.parse_str(&mut byte_parser)
}
