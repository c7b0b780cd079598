//! `phylovec decode`: vectors to Newick trees.

use crate::commands::io::{self, EncodedTrees};
use anyhow::{Context, Result, ensure};
use phylovec::codec::VectorCodec;
use phylovec::model::TaxonSet;
use phylovec::newick::{NewickStyle, write_newick};
use std::path::PathBuf;
use tracing::info;

pub fn run(
    codec: &VectorCodec,
    input: Option<PathBuf>,
    taxa: Option<Vec<String>>,
    sorted: bool,
) -> Result<()> {
    let text = io::read_input(input.as_deref())?;

    // JSON from `encode --json` carries its own sentinel
    let (codec, input_taxa, vectors) = if text.trim_start().starts_with('{') {
        let encoded: EncodedTrees =
            serde_json::from_str(&text).context("failed to parse JSON input")?;
        ensure!(
            encoded.sentinel < 0.0 && encoded.sentinel.is_finite(),
            "sentinel must be negative and finite, got {}",
            encoded.sentinel
        );
        let codec = codec.clone().with_sentinel(encoded.sentinel);
        (codec, Some(encoded.taxa), encoded.vectors)
    } else {
        let parsed = io::parse_csv(&text)?;
        (codec.clone(), parsed.taxa, parsed.vectors)
    };

    let labels = taxa
        .or(input_taxa)
        .context("no taxa given, pass --taxa or provide a '#taxa=' header")?;
    let taxa = TaxonSet::new(labels)?;
    info!(num_vectors = vectors.len(), num_taxa = taxa.len(), "decoding vectors");

    let trees = vectors
        .iter()
        .enumerate()
        .map(|(i, vector)| {
            codec
                .decode(vector, &taxa)
                .with_context(|| format!("failed to decode vector {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let style = if sorted {
        NewickStyle::Sorted
    } else {
        NewickStyle::Verbatim
    };
    write_newick(io::open_output(None)?, trees, style)?;
    Ok(())
}
