//! Sources of bytes for the [ByteParser](crate::parser::ByteParser).
//!
//! Trees that can be encoded have at most a few dozen leaves, so inputs are
//! read into memory as a whole ([MemorySource]). Other sources, e.g. over
//! memory-mapped files, plug in through the [ByteSource] trait.

use std::fs;
use std::io;
use std::path::Path;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Cursor over a sequence of bytes.
pub trait ByteSource {
    /// Returns the byte at the cursor, `None` at the end.
    fn peek(&self) -> Option<u8>;

    /// Returns the byte at the cursor and advances past it.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns up to `k` bytes from the cursor on, without advancing.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Returns the offset of the cursor.
    fn position(&self) -> usize;

    /// Moves the cursor to offset `pos`.
    fn set_position(&mut self, pos: usize);

    /// Returns whether the cursor is past the last byte.
    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }
}

// =#========================================================================#=
// MEMORY SOURCE
// =#========================================================================#=
/// Owned bytes held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
    cursor: usize,
}

impl MemorySource {
    /// Wraps `bytes`, with the cursor at the start.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Reads the file at `path` into memory.
    pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        fs::read(path).map(Self::new)
    }
}

impl ByteSource for MemorySource {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.cursor += 1;
        Some(byte)
    }

    fn peek_slice(&self, k: usize) -> &[u8] {
        let start = self.cursor.min(self.bytes.len());
        let end = self.cursor.saturating_add(k).min(self.bytes.len());
        &self.bytes[start..end]
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn set_position(&mut self, pos: usize) {
        self.cursor = pos;
    }
}
