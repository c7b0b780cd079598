//! Low-level byte-by-byte parser for text formats.
//!
//! This module provides [ByteParser] for parsing text-based formats with
//! support for peeking, consuming, comment skipping and quote-aware label
//! parsing. Used as the foundation of the Newick parser.

use crate::parser::byte_source::{ByteSource, MemorySource};
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser with support for peeking, consuming, and skipping.
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, doubled to escape)
/// - Labels decoded as UTF-8
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylovec::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("[rooted] ('Wilson''s Storm-petrel':1.5,Prion:2);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.consume_if(b'('));
///
/// let label = parser.parse_label(b",:;()").unwrap();
/// assert_eq!(label, "Wilson's Storm-petrel");
///
/// parser.consume_until(b',', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b'P'));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<MemorySource> {
    /// Creates a new `ByteParser` from a byte slice by copying it.
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(MemorySource::new(input.to_vec()))
    }

    /// Creates a new `ByteParser` from a string by copying it.
    pub fn for_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` reading the whole file into memory.
    ///
    /// # Errors
    /// Returns a [ParsingError] if the file cannot be read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        Ok(Self::new(MemorySource::read_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive ASCII whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.next_byte();
        }
    }

    /// Skips (consumes) a comment enclosed in square brackets `[...]`,
    /// if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but is never closed.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte is `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Checks if the following bytes equal `sequence`, without consuming.
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        self.source.peek_slice(sequence.len()) == sequence
    }

    /// Consumes the current byte if it is `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        self.consume_until_any(&[target], mode).is_some()
    }

    /// Consumes bytes until any of the target bytes is found.
    ///
    /// # Returns
    /// `Some(u8)` with the found byte, or `None` if EOF was reached first
    pub fn consume_until_any(&mut self, targets: &[u8], mode: ConsumeMode) -> Option<u8> {
        while let Some(b) = self.peek() {
            if targets.contains(&b) {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return Some(b);
            }
            self.next_byte();
        }
        None
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Sets the position in the byte stream.
    pub fn set_position(&mut self, pos: usize) {
        self.source.set_position(pos);
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&self, k: usize) -> Vec<u8> {
        self.source.peek_slice(k).to_vec()
    }

    /// Returns up to `k` bytes from the current position as string,
    /// replacing invalid UTF-8.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(&self.get_context(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed or a label is not
    /// valid UTF-8.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a label enclosed in single quotes.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes within
    /// the label are escaped by doubling them (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the label is not closed before EOF.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next_byte(); // consume opening '

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') if self.peek_is(b'\'') => {
                    bytes.push(b'\'');
                    self.next_byte();
                }
                Some(b'\'') => break,
                Some(b) => bytes.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }

        self.label_from_bytes(bytes)
    }

    /// Parses an unquoted label until any of the given delimiters (or EOF).
    ///
    /// # Errors
    /// Returns an error if the label is not valid UTF-8.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }

        self.label_from_bytes(bytes)
    }

    fn label_from_bytes(&self, bytes: Vec<u8>) -> Result<String, ParsingError> {
        String::from_utf8(bytes).map_err(|e| {
            ParsingError::invalid_newick_string(self, format!("Label is not valid UTF-8 - {}", e))
        })
    }
}

/// Specifies whether to consume or leave the target when using `consume_until` methods.
///
/// # Examples
/// ```
/// use phylovec::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("[&R] ((A:0.5,B:0.5):0.3,C:0.8);");
///
/// // Inclusive: consume up to and including ']'
/// parser.consume_until(b']', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b' '));
///
/// // Exclusive: stop at ':'
/// parser.consume_until(b':', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b':'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}
