//! `phylovec sort`: rewrite Newick trees with sorted children.

use crate::commands::io;
use anyhow::{Context, Result};
use phylovec::newick::{self, NewickStyle, write_newick};
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let text = io::read_input(input.as_deref())?;
    let (trees, labels) = newick::parse_str_all(&text).context("failed to parse Newick input")?;

    let out = io::open_output(output.as_deref())?;
    write_newick(
        out,
        trees.iter().map(|tree| tree.view(&labels)),
        NewickStyle::Sorted,
    )?;
    Ok(())
}
