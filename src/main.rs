//! Phylovec CLI - encode, decode, sort and draw phylogenetic trees.

use anyhow::{Result, ensure};
use clap::Parser;
use phylovec::codec::{MAX_LAYOUT_TAXA, VectorCodec};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{decode, encode, random, sort};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging, warnings only unless asked for more
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    ensure!(
        cli.sentinel < 0.0 && cli.sentinel.is_finite(),
        "sentinel must be negative and finite, got {}",
        cli.sentinel
    );
    ensure!(
        cli.max_taxa <= MAX_LAYOUT_TAXA,
        "at most {} taxa are supported, got {}",
        MAX_LAYOUT_TAXA,
        cli.max_taxa
    );
    let codec = VectorCodec::new()
        .with_sentinel(cli.sentinel)
        .with_max_taxa(cli.max_taxa);

    match cli.command {
        Commands::Encode {
            input,
            taxa,
            assume_length,
            json,
        } => encode::run(&codec, input, taxa, assume_length, json),
        Commands::Decode {
            input,
            taxa,
            sorted,
        } => decode::run(&codec, input, taxa, sorted),
        Commands::Sort { input, output } => sort::run(input, output),
        Commands::Random {
            leaves,
            count,
            seed,
            max_arity,
            newick,
        } => random::run(&codec, leaves, count, seed, max_arity, newick),
    }
}
