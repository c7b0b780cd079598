//! `phylovec random`: random trees over taxa `t1..tN`.

use crate::commands::io;
use anyhow::{Result, ensure};
use phylovec::codec::VectorCodec;
use phylovec::model::{RandomTreeGenerator, TaxonSet};
use phylovec::newick::{NewickStyle, write_newick};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

pub fn run(
    codec: &VectorCodec,
    leaves: usize,
    count: usize,
    seed: Option<u64>,
    max_arity: usize,
    newick: bool,
) -> Result<()> {
    ensure!(leaves > 0, "number of leaves must be positive");
    ensure!(max_arity >= 2, "max arity must be at least 2, got {max_arity}");

    let taxa = TaxonSet::new((1..=leaves).map(|i| format!("t{i}")))?;
    let generator = RandomTreeGenerator::new().with_max_arity(max_arity);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(leaves, count, ?seed, "drawing random trees");

    let out = io::open_output(None)?;
    if newick {
        let trees = (0..count)
            .map(|_| generator.generate(&taxa, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;
        write_newick(out, trees, NewickStyle::Verbatim)?;
    } else {
        let vectors = (0..count)
            .map(|_| generator.random_vector(codec, &taxa, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;
        io::write_csv(out, taxa.labels(), &vectors)?;
    }
    Ok(())
}
