//! Byte-level parsing shared by the Newick reader: a cursor over the input
//! ([ByteParser]), quote-aware labels and positioned errors ([ParsingError]).

pub mod byte_parser;
pub mod byte_source;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use byte_source::{ByteSource, MemorySource};
pub use parsing_error::ParsingError;
