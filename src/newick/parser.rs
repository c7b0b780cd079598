//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse files or single strings, as well as lazy parsing via a
//! [NewickIterator].

use crate::model::label_storage::LabelStorage;
use crate::model::simple_tree_builder::{SimpleLabelStorage, SimpleTreeBuilder};
use crate::model::tree_builder::TreeBuilder;
use crate::model::{CompactTreeBuilder, LeafLabelMap};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single/multiple Newick format phylogenetic
/// trees with any number of children per vertex.
///
/// Generic over [TreeBuilder] (construction). Leaf labels are stored in the
/// builder's [LabelStorage], which hands out the label references placed in
/// the leaves.
///
/// # Construction
/// * [`new(tree_builder)`](Self::new) - generic constructor
/// * [`new_compact_defaults()`](Self::new_compact_defaults)
///     - uses [CompactTreeBuilder] and a [LeafLabelMap] shared by all trees
/// * [`new_simple_defaults()`](Self::new_simple_defaults)
///     - uses [SimpleTreeBuilder] and a [SimpleLabelStorage]
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with number of leaves in trees to parse,
///       otherwise it is inferred from the first parsed tree and then stored.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - Parse trees lazily
///
/// Internal vertex labels and support values (e.g. `(A,B)95:0.1`) are
/// accepted and dropped. Branch lengths must be non-negative and finite.
///
/// # Example
/// ```
/// use phylovec::newick::NewickParser;
/// use phylovec::parser::byte_parser::ByteParser;
///
/// let input = "(A_meleagrides:1.0,A_vulturinum:1.0,(N_meleagris:1.0,G_plumifera:1.0):0.5);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::new_compact_defaults();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// let labels = newick_parser.into_label_storage();
/// assert_eq!(tree.num_leaves(), 4);
/// assert_eq!(labels.num_labels(), 4);
/// ```
pub struct NewickParser<T: TreeBuilder> {
    know_num_leaves: bool,
    num_leaves: usize,
    tree_builder: T,
    storage: T::Storage,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Creates a new [NewickParser] with the given tree builder.
    pub fn new(tree_builder: T) -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            tree_builder,
            storage: T::create_storage(DEFAULT_NUM_LEAVES_GUESS),
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of data structures for better performance.
    /// If not set, the parser will count leaves during parsing.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }

    /// Consumes the parser and returns the underlying [LabelStorage].
    ///
    /// This should be called after all trees have been parsed to retrieve
    /// the mapping of leaf labels to indices.
    pub fn into_label_storage(self) -> T::Storage {
        self.storage
    }

    /// Get ref to the underlying [LabelStorage]
    pub fn label_storage(&self) -> &T::Storage {
        &self.storage
    }
}

// Convenience Default 1
impl NewickParser<CompactTreeBuilder> {
    /// Creates a new [NewickParser] for [CompactTree](crate::model::CompactTree)
    /// with a fresh [LeafLabelMap]; the number of leaves is counted during
    /// parsing of the first tree.
    pub fn new_compact_defaults() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            tree_builder: CompactTreeBuilder::new(),
            storage: LeafLabelMap::new(DEFAULT_NUM_LEAVES_GUESS),
        }
    }
}

impl Default for NewickParser<CompactTreeBuilder> {
    fn default() -> Self {
        Self::new_compact_defaults()
    }
}

// Convenience Default 2
impl NewickParser<SimpleTreeBuilder> {
    /// Creates a new [NewickParser] for [SimpleTree](crate::model::SimpleTree);
    /// the number of leaves is counted during parsing of the first tree.
    pub fn new_simple_defaults() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            tree_builder: SimpleTreeBuilder::new(),
            storage: SimpleLabelStorage::default(),
        }
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Consumes the parser and returns an iterator over trees from the byte source.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    pub fn into_iter<B: ByteSource>(self, byte_parser: ByteParser<B>) -> NewickIterator<B, T> {
        NewickIterator {
            byte_parser,
            parser: self,
            done: false,
        }
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<T::Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<T::Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(T::Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::Tree, ParsingError> {
        self.tree_builder.init_next(self.num_leaves);

        // If number of leaves not know yet, reset it to 0,
        // so actual count can now be tracked
        if !self.know_num_leaves {
            self.num_leaves = 0;
        }

        self.parse_root(parser)?;

        // Having parsed a full tree,
        // the number of leaves in a tree is now known
        self.know_num_leaves = true;

        Ok(self
            .tree_builder
            .finish_tree()
            .expect("tree builder initialized by init_next"))
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][:branch_length];` or `label[:branch_length];`
    /// - Skips leading comments and whitespace
    fn parse_root<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        if parser.peek_is(b'(') {
            let children = self.parse_children(parser)?;
            self.skip_internal_label(parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            Self::expect_semicolon(parser)?;
            self.tree_builder.add_root(&children, branch_length);
        } else {
            // Single-leaf tree
            let (label_ref, branch_length) = self.parse_leaf_parts(parser)?;
            Self::expect_semicolon(parser)?;
            self.tree_builder.add_root_leaf(branch_length, label_ref);
        }

        Ok(())
    }

    fn expect_semicolon<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.consume_if(b';') {
            return Ok(());
        }
        match parser.peek() {
            None => Err(ParsingError::unexpected_eof(parser)),
            Some(b) => Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", char::from(b)),
            )),
        }
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its vertex:
    /// - Skips leading comments and whitespace
    /// - Dispatches to `parse_internal_vertex` if starts with `(`, otherwise `parse_leaf`
    fn parse_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser)
        } else {
            self.parse_leaf(parser)
        }
    }

    /// Parses internal vertex, adds it to tree, and returns its index:
    /// - `(children)[label][:branch_length]`
    fn parse_internal_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        let children = self.parse_children(parser)?;
        self.skip_internal_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;
        Ok(self.tree_builder.add_internal(&children, branch_length))
    }

    /// Parses a comma separated list of children `(c1,c2,...)` and returns
    /// their indices:
    /// - Expects parser at opening `(`
    ///   (caller should skip leading comments/whitespace)
    fn parse_children<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Vec<T::VertexIdx>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = Vec::with_capacity(2);
        loop {
            children.push(self.parse_vertex(parser)?);

            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b',') {
                continue;
            }
            if parser.consume_if(b')') {
                break;
            }
            return match parser.peek() {
                None => Err(ParsingError::unexpected_eof(parser)),
                Some(b) => Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", char::from(b)),
                )),
            };
        }

        Ok(children)
    }

    /// Skips an optional label or support value of an internal vertex.
    fn skip_internal_label<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        match parser.peek() {
            Some(b) if !NEWICK_LABEL_DELIMITERS.contains(&b) => {
                parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `label[:branch_length]`
    /// - Expects parser at start of label
    ///   (caller should skip leading comments/whitespace)
    fn parse_leaf<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        let (label_ref, branch_length) = self.parse_leaf_parts(parser)?;
        Ok(self.tree_builder.add_leaf(branch_length, label_ref))
    }

    fn parse_leaf_parts<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<(T::LabelRef, Option<f64>), ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let label_ref = self.storage.store_and_ref(&label);
        let branch_length = self.parse_branch_length(parser)?;
        if !self.know_num_leaves {
            self.num_leaves += 1;
        }
        Ok((label_ref, branch_length))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if the value is malformed, negative or not finite
    fn parse_branch_length<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        // Find end of branch length substring
        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(char::from(b));
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_branch_length(parser, format!("'{}'", branch_length_str))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(ParsingError::invalid_branch_length(
                parser,
                format!("{} must be non-negative and finite", branch_length_str),
            ));
        }
        Ok(Some(value))
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator to parse Newick trees.
///
/// Created by [NewickParser::into_iter()].
/// Yields `Result<T::Tree, ParsingError>` for each tree.
///
/// After iteration, the underlying [NewickParser] can be retrieved
/// via [into_parser()](Self::into_parser) to access the label storage.
pub struct NewickIterator<B, T>
where
    B: ByteSource,
    T: TreeBuilder,
{
    parser: NewickParser<T>,
    byte_parser: ByteParser<B>,
    done: bool,
}

impl<B, T> NewickIterator<B, T>
where
    B: ByteSource,
    T: TreeBuilder,
{
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser<T> {
        self.parser
    }
}

impl<B, T> Iterator for NewickIterator<B, T>
where
    B: ByteSource,
    T: TreeBuilder,
{
    type Item = Result<T::Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Skip whitespace and check EOF before each tree
        if let Err(e) = self.byte_parser.skip_comment_and_whitespace() {
            self.done = true;
            return Some(Err(e));
        }
        if self.byte_parser.is_eof() {
            self.done = true;
            return None;
        }

        let result = self.parser.parse_str(&mut self.byte_parser);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
