//! Command line definition.

use clap::{Parser, Subcommand};
use phylovec::codec::{DEFAULT_MAX_TAXA, DEFAULT_SENTINEL};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phylovec", version)]
#[command(about = "Encode phylogenetic trees as fixed-length vectors and decode them back")]
pub struct Cli {
    /// Marker for absent vector entries, must be negative
    #[arg(long, global = true, allow_negative_numbers = true, default_value_t = DEFAULT_SENTINEL)]
    pub sentinel: f64,

    /// Largest accepted number of taxa
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TAXA)]
    pub max_taxa: usize,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode Newick trees as vectors
    Encode {
        /// Newick file (or stdin if not provided)
        input: Option<PathBuf>,
        /// Comma separated taxon universe (default: all labels of the input)
        #[arg(long, value_delimiter = ',')]
        taxa: Option<Vec<String>>,
        /// Length used for edges without branch length (default: reject)
        #[arg(long)]
        assume_length: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode vectors (CSV lines or JSON from `encode`) into Newick trees
    Decode {
        /// Vector file (or stdin if not provided)
        input: Option<PathBuf>,
        /// Comma separated taxon universe (default: taken from the input)
        #[arg(long, value_delimiter = ',')]
        taxa: Option<Vec<String>>,
        /// Write children in sorted order
        #[arg(long)]
        sorted: bool,
    },
    /// Rewrite Newick trees with children in sorted order
    Sort {
        /// Newick file (or stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (or stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Draw random trees over taxa `t1..tN`
    Random {
        /// Number of leaves
        #[arg(long)]
        leaves: usize,
        /// Number of trees
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Seed for reproducible output (default: random)
        #[arg(long)]
        seed: Option<u64>,
        /// Largest number of children per vertex
        #[arg(long, default_value_t = 2)]
        max_arity: usize,
        /// Print Newick instead of vectors
        #[arg(long)]
        newick: bool,
    },
}
