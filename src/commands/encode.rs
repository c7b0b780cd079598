//! `phylovec encode`: Newick trees to vectors.

use crate::commands::io::{self, EncodedTrees};
use anyhow::{Context, Result, ensure};
use phylovec::codec::{MissingBranchLength, VectorCodec};
use phylovec::model::TaxonSet;
use phylovec::newick;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub fn run(
    codec: &VectorCodec,
    input: Option<PathBuf>,
    taxa: Option<Vec<String>>,
    assume_length: Option<f64>,
    json: bool,
) -> Result<()> {
    let codec = match assume_length {
        Some(length) => {
            ensure!(
                length >= 0.0 && length.is_finite(),
                "assumed branch length must be non-negative and finite, got {length}"
            );
            codec
                .clone()
                .with_missing_branch_lengths(MissingBranchLength::Assume(length))
        }
        None => codec.clone(),
    };

    let text = io::read_input(input.as_deref())?;
    let (trees, labels) = newick::parse_str_all(&text).context("failed to parse Newick input")?;
    let taxa = match taxa {
        Some(taxa) => TaxonSet::new(taxa)?,
        None => TaxonSet::from_label_map(&labels)?,
    };
    info!(num_trees = trees.len(), num_taxa = taxa.len(), "encoding trees");

    let vectors = trees
        .iter()
        .enumerate()
        .map(|(i, tree)| {
            codec
                .encode(&tree.view(&labels), Some(&taxa))
                .with_context(|| format!("failed to encode tree {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut out = io::open_output(None)?;
    if json {
        let encoded = EncodedTrees {
            taxa: taxa.labels().to_vec(),
            sentinel: codec.sentinel(),
            vectors,
        };
        serde_json::to_writer_pretty(&mut out, &encoded)?;
        writeln!(out)?;
        out.flush()?;
    } else {
        io::write_csv(out, taxa.labels(), &vectors)?;
    }
    Ok(())
}
