mod common;

use common::{Unrooted, numbered_taxa, shuffled};
use phylovec::codec::{VectorCodec, max_internal_edges, same_tree};
use phylovec::model::vertex::BranchLength;
use phylovec::model::{RandomTreeGenerator, SimpleTree, TaxonSet, Vertex};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Random tree over `t1..tN` drawn from a seeded generator.
fn random_tree(num_taxa: usize, max_arity: usize, seed: u64) -> (SimpleTree, TaxonSet) {
    let taxa = numbered_taxa(num_taxa);
    let tree = RandomTreeGenerator::new()
        .with_branch_lengths(0.0..2.0)
        .with_max_arity(max_arity)
        .generate(&taxa, &mut StdRng::seed_from_u64(seed))
        .unwrap();
    (tree, taxa)
}

/// Random tree over a random subset of the universe `t1..tN`.
fn random_subtree(num_taxa: usize, seed: u64) -> (SimpleTree, TaxonSet) {
    let universe = numbered_taxa(num_taxa);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut labels: Vec<&str> = universe.iter().collect();
    labels.shuffle(&mut rng);
    let size = rng.gen_range(1..=labels.len());
    let subset = TaxonSet::new(labels[..size].iter().copied()).unwrap();

    let tree = RandomTreeGenerator::new()
        .with_max_arity(3)
        .generate(&subset, &mut rng)
        .unwrap();
    (tree, universe)
}

/// Copy of `tree` with the length above its `nth` non-root vertex increased.
fn with_longer_edge(tree: &SimpleTree, nth: usize) -> SimpleTree {
    let mut edited = tree.clone();
    let target = tree
        .pre_order_iter()
        .map(Vertex::index)
        .filter(|&index| index != tree.root_index())
        .nth(nth)
        .unwrap();

    let longer = |length: &mut Option<BranchLength>| {
        let current = length.map_or(0.0, |l| *l);
        *length = Some(BranchLength::new(current + 0.5));
    };
    match &mut edited[target] {
        Vertex::Leaf { branch_length, .. } | Vertex::Internal { branch_length, .. } => {
            longer(branch_length)
        }
        Vertex::Root { .. } => unreachable!("root is skipped"),
    }
    edited
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(num_taxa in 1usize..=9, max_arity in 2usize..=4, seed in any::<u64>()) {
        let (tree, taxa) = random_tree(num_taxa, max_arity, seed);
        let codec = VectorCodec::new();

        let vector = codec.encode(&tree, Some(&taxa)).unwrap();
        let decoded = codec.decode(&vector, &taxa).unwrap();

        prop_assert!(decoded.is_valid());
        prop_assert!(same_tree(&tree, &decoded).unwrap());
        prop_assert_eq!(codec.encode(&decoded, Some(&taxa)).unwrap(), vector);
    }

    #[test]
    fn prop_round_trip_over_universe(num_taxa in 1usize..=8, seed in any::<u64>()) {
        let (tree, universe) = random_subtree(num_taxa, seed);
        let codec = VectorCodec::new();

        let vector = codec.encode(&tree, Some(&universe)).unwrap();
        let decoded = codec.decode(&vector, &universe).unwrap();

        prop_assert_eq!(decoded.num_leaves(), tree.num_leaves());
        prop_assert!(same_tree(&tree, &decoded).unwrap());
    }

    #[test]
    fn prop_children_order_invariance(num_taxa in 2usize..=9, seed in any::<u64>()) {
        let (tree, taxa) = random_tree(num_taxa, 4, seed);
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let codec = VectorCodec::new();

        let vector = codec.encode(&tree, Some(&taxa)).unwrap();
        for _ in 0..4 {
            let reordered = shuffled(&tree, &mut rng);
            prop_assert_eq!(&codec.encode(&reordered, Some(&taxa)).unwrap(), &vector);
        }
    }

    #[test]
    fn prop_rooting_invariance(num_taxa in 3usize..=9, max_arity in 2usize..=3, seed in any::<u64>()) {
        let (tree, taxa) = random_tree(num_taxa, max_arity, seed);
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let codec = VectorCodec::new();
        let vector = codec.encode(&tree, Some(&taxa)).unwrap();

        let unrooted = Unrooted::from_tree(&tree);
        for root in unrooted.internal_vertices() {
            let rerooted = unrooted.rooted_at(root, &mut rng);
            prop_assert_eq!(&codec.encode(&rerooted, Some(&taxa)).unwrap(), &vector);
        }
        for (u, v, _) in unrooted.edges() {
            let rerooted = unrooted.rooted_on_edge(u, v, &mut rng);
            prop_assert_eq!(&codec.encode(&rerooted, Some(&taxa)).unwrap(), &vector);
        }
    }

    #[test]
    fn prop_length_consistency(num_taxa in 1usize..=10, seed in any::<u64>()) {
        let (tree, universe) = random_subtree(num_taxa, seed);
        let vector = VectorCodec::new().encode(&tree, Some(&universe)).unwrap();

        prop_assert_eq!(vector.len(), num_taxa + max_internal_edges(num_taxa));
        if num_taxa >= 3 {
            prop_assert_eq!(vector.len(), (1usize << (num_taxa - 1)) - 1);
        }
    }

    #[test]
    fn prop_discriminativity(num_taxa in 2usize..=7, first in any::<u64>(), second in any::<u64>()) {
        let (tree, taxa) = random_tree(num_taxa, 3, first);
        let (other, _) = random_tree(num_taxa, 3, second);
        let codec = VectorCodec::new();

        let vector = codec.encode(&tree, Some(&taxa)).unwrap();
        let other_vector = codec.encode(&other, Some(&taxa)).unwrap();
        prop_assert_eq!(same_tree(&tree, &other).unwrap(), vector == other_vector);

        // Changing any single edge length changes the vector
        let num_edges = tree.num_vertices() - 1;
        let edited = with_longer_edge(&tree, (first as usize) % num_edges);
        prop_assert_ne!(codec.encode(&edited, Some(&taxa)).unwrap(), vector);
    }
}
