use criterion::{Criterion, criterion_group, criterion_main};
use phylovec::codec::VectorCodec;
use phylovec::model::{RandomTreeGenerator, SimpleTree, TaxonSet};
use phylovec::newick::{parse_str, to_newick};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

const REGRESSION_SIZES: &[usize] = &[8, 12, 16];

const REPORTING_SIZES: &[usize] = &[20, 22];

fn random_tree(num_taxa: usize) -> (SimpleTree, TaxonSet) {
    let taxa = TaxonSet::new((1..=num_taxa).map(|i| format!("t{i}"))).unwrap();
    let tree = RandomTreeGenerator::new()
        .with_max_arity(3)
        .generate(&taxa, &mut StdRng::seed_from_u64(num_taxa as u64))
        .unwrap();
    (tree, taxa)
}

fn codec_round_trip(c: &mut Criterion, sizes: &[usize]) {
    let codec = VectorCodec::new();
    for &num_taxa in sizes {
        let (tree, taxa) = random_tree(num_taxa);
        let vector = codec.encode(&tree, Some(&taxa)).unwrap();

        c.bench_function(&format!("encode-n{num_taxa}"), |b| {
            b.iter(|| codec.encode(black_box(&tree), Some(&taxa)).unwrap());
        });
        c.bench_function(&format!("decode-n{num_taxa}"), |b| {
            b.iter(|| codec.decode(black_box(&vector), &taxa).unwrap());
        });
    }
}

fn codec_regression(c: &mut Criterion) {
    codec_round_trip(c, REGRESSION_SIZES);

    let (tree, _) = random_tree(64);
    let newick = to_newick(&tree);
    c.bench_function("newick-n64", |b| {
        b.iter(|| parse_str(black_box(&newick)).unwrap());
    });
}

fn codec_reporting(c: &mut Criterion) {
    codec_round_trip(c, REPORTING_SIZES);
}

criterion_group!(regression, codec_regression);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = codec_reporting
}
criterion_main!(regression, reporting);
