use phylovec::codec::{
    CodecError, MissingBranchLength, TreeDefect, VectorCodec, canonicalize, canonicalize_over,
    max_internal_edges, same_tree,
};
use phylovec::model::TaxonSet;
use phylovec::newick::{parse_str, parse_str_all, to_newick, to_sorted_newick};
use phylovec::model::{SimpleTree, TreeView};
use phylovec::{decode, encode};

fn taxa(labels: &[&str]) -> TaxonSet {
    TaxonSet::new(labels.iter().copied()).unwrap()
}

fn tree(newick: &str) -> SimpleTree {
    parse_str(newick).unwrap()
}

// --- CANONICAL FORM ---
#[test]
fn test_canonical_form_of_rooted_binary_tree() {
    let form = canonicalize(&tree("((A:1,B:2):0.5,(C:3,D:4):0.25);")).unwrap();

    assert_eq!(form.leaf_labels().collect::<Vec<_>>(), ["A", "B", "C", "D"]);
    assert_eq!(form.leaf_lengths(), [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(form.splits().len(), 1);
    // Both root edges form one edge {A,B}|{C,D}
    assert_eq!(form.split_length(&["A", "B"]), Some(0.75));
    assert_eq!(form.signature_labels(form.splits()[0].signature()), ["A", "B"]);
}

#[test]
fn test_canonical_form_ignores_order_and_rooting() {
    let first = canonicalize(&tree("((A:1,B:2):0.5,(C:3,D:4):0.25);")).unwrap();
    let second = canonicalize(&tree("(D:4,C:3,(B:2,A:1):0.75);")).unwrap();
    let third = canonicalize(&tree("(A:1,(B:2,(C:3,D:4):0.75):0);")).unwrap();

    assert_eq!(first, second);
    // Rooted above A with a zero length: A keeps 1 + 0
    assert_eq!(first, third);
}

#[test]
fn test_canonical_form_over_universe() {
    let universe = taxa(&["A", "B", "C", "D", "E"]);
    let form = canonicalize_over(&tree("((A:1,B:1):0.5,C:1,D:1);"), &universe).unwrap();

    assert_eq!(form.num_leaves(), 4);
    assert_eq!(form.leaf_length("E"), None);
    // Signature is the universe without the far side {C,D}, so it holds E
    assert_eq!(form.signature_labels(form.splits()[0].signature()), ["A", "B", "E"]);
}

#[test]
fn test_canonical_form_of_polytomy() {
    let form = canonicalize(&tree("(A:1,B:1,C:1,D:1,E:1);")).unwrap();
    assert!(form.splits().is_empty());

    let form = canonicalize(&tree("((A:1,B:1,C:1):2,D:1,E:1);")).unwrap();
    assert_eq!(form.splits().len(), 1);
    assert_eq!(form.split_length(&["A", "B", "C"]), Some(2.0));
}

#[test]
fn test_canonicalize_compact_tree() {
    let (trees, labels) = parse_str_all("((A:1,B:1):1,C:1,D:1);\n(C:1,(D:1,A:1):1,B:1);").unwrap();

    let first = canonicalize(&trees[0].view(&labels)).unwrap();
    let second = canonicalize(&trees[1].view(&labels)).unwrap();
    assert_eq!(first.split_length(&["A", "B"]), Some(1.0));
    assert_eq!(second.split_length(&["A", "D"]), Some(1.0));
    assert_ne!(first, second);
}

#[test]
fn test_same_tree() {
    let rooted = tree("((A:1,B:1):0.5,(C:1,D:1):0.5);");
    let unrooted = tree("(C:1,D:1,(B:1,A:1):1);");
    let other = tree("(A:1,C:1,(B:1,D:1):1);");

    assert!(same_tree(&rooted, &unrooted).unwrap());
    assert!(!same_tree(&rooted, &other).unwrap());
}

// --- ENCODE ---
#[test]
fn test_encode_star_with_three_leaves() {
    let vector = encode(&tree("(B:2,C:3,A:1);"), None).unwrap();

    // Three taxa have no non-trivial split
    assert_eq!(max_internal_edges(3), 0);
    assert_eq!(vector, [1.0, 2.0, 3.0]);
}

#[test]
fn test_encode_four_leaves_with_split() {
    let universe = taxa(&["A", "B", "C", "D"]);
    let vector = encode(&tree("((A:0.5,B:0.5):0.2,C:0.5,D:0.5);"), Some(&universe)).unwrap();

    assert_eq!(vector.len(), 4 + max_internal_edges(4));
    assert_eq!(vector, [0.5, 0.5, 0.5, 0.5, 0.2, -1.0, -1.0]);
}

#[test]
fn test_encode_split_positions_for_four_taxa() {
    // Positions: {A,B} | {A,C} | {A,D}
    let ab = encode(&tree("((A:1,B:1):0.5,C:1,D:1);"), None).unwrap();
    let ac = encode(&tree("((A:1,C:1):0.5,B:1,D:1);"), None).unwrap();
    let ad = encode(&tree("((B:1,C:1):0.5,A:1,D:1);"), None).unwrap();

    assert_eq!(&ab[4..], [0.5, -1.0, -1.0]);
    assert_eq!(&ac[4..], [-1.0, 0.5, -1.0]);
    assert_eq!(&ad[4..], [-1.0, -1.0, 0.5]);
}

#[test]
fn test_encode_two_leaves_keeps_both_lengths() {
    let vector = encode(&tree("(A:1,B:2);"), None).unwrap();
    assert_eq!(vector, [1.0, 2.0]);
}

#[test]
fn test_encode_single_leaf() {
    let vector = encode(&tree("A:5;"), None).unwrap();
    assert_eq!(vector, [0.0]);

    let universe = taxa(&["A", "B", "C"]);
    let vector = encode(&tree("B;"), Some(&universe)).unwrap();
    assert_eq!(vector, [-1.0, 0.0, -1.0]);
}

#[test]
fn test_encode_zero_length_is_not_sentinel() {
    let vector = encode(&tree("((A:0,B:0):0,C:0,D:0);"), None).unwrap();
    assert_eq!(vector, [0.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0]);
}

#[test]
fn test_encode_with_custom_sentinel() {
    let codec = VectorCodec::new().with_sentinel(-7.5);
    let vector = codec
        .encode(&tree("((A:1,B:1):0.5,C:1,D:1);"), None)
        .unwrap();
    assert_eq!(vector, [1.0, 1.0, 1.0, 1.0, 0.5, -7.5, -7.5]);
}

#[test]
fn test_encode_over_universe_superset() {
    let universe = taxa(&["A", "B", "C", "D", "E"]);
    let vector = encode(&tree("((A:1,B:1):0.5,C:1,D:1);"), Some(&universe)).unwrap();

    assert_eq!(vector.len(), 15);
    assert_eq!(&vector[..5], [1.0, 1.0, 1.0, 1.0, -1.0]);
    // Splits over five taxa in order: {A,B} {A,B,C} {A,B,D} {A,B,E} {A,C} ...
    let expected_position = 5 + 3;
    for (position, &value) in vector.iter().enumerate().skip(5) {
        if position == expected_position {
            assert_eq!(value, 0.5);
        } else {
            assert_eq!(value, -1.0);
        }
    }
}

#[test]
fn test_encode_missing_branch_length() {
    let without = tree("((A:1,B:1),C:1,D:1);");
    let err = encode(&without, None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::MissingBranchLength { .. })
    ));

    assert_eq!(
        VectorCodec::new().canonicalizer().missing_branch_lengths(),
        MissingBranchLength::Reject
    );
    let codec = VectorCodec::new().with_missing_branch_lengths(MissingBranchLength::Assume(0.0));
    assert_eq!(
        codec.canonicalizer().missing_branch_lengths(),
        MissingBranchLength::Assume(0.0)
    );
    let vector = codec.encode(&without, None).unwrap();
    assert_eq!(vector, [1.0, 1.0, 1.0, 1.0, 0.0, -1.0, -1.0]);
}

#[test]
fn test_encode_ignores_root_branch_length() {
    let with_root_length = encode(&tree("(A:1,B:2,C:3):9;"), None).unwrap();
    assert_eq!(with_root_length, [1.0, 2.0, 3.0]);
}

// --- ENCODE ERRORS ---
#[test]
fn test_encode_duplicate_label() {
    let err = encode(&tree("(A:1,B:1,A:1);"), None).unwrap_err();
    assert_eq!(err, CodecError::DuplicateLabel("A".to_string()));
}

#[test]
fn test_encode_label_set_mismatch() {
    let universe = taxa(&["A", "B"]);
    let err = encode(&tree("(C:1,A:1,D:1);"), Some(&universe)).unwrap_err();
    assert_eq!(
        err,
        CodecError::LabelSetMismatch {
            missing: vec!["C".to_string(), "D".to_string()]
        }
    );
}

#[test]
fn test_encode_unlabeled_leaf() {
    let err = encode(&tree("(A:1,:1,C:1);"), None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::UnlabeledLeaf { .. })
    ));
}

#[test]
fn test_encode_vertex_with_single_child() {
    let err = encode(&tree("((A:1):1,B:1,C:1);"), None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::TooFewChildren { num_children: 1, .. })
    ));
}

#[test]
fn test_encode_empty_tree() {
    let empty = SimpleTree::new(1);
    let err = encode(&empty, None).unwrap_err();
    assert_eq!(err, CodecError::InvalidTree(TreeDefect::EmptyTree));
}

#[test]
fn test_encode_universe_too_large() {
    let codec = VectorCodec::new().with_max_taxa(4);
    let universe = taxa(&["A", "B", "C", "D", "E"]);
    let err = codec
        .encode(&tree("(A:1,B:1,C:1);"), Some(&universe))
        .unwrap_err();
    assert_eq!(
        err,
        CodecError::UniverseTooLarge {
            num_taxa: 5,
            max_taxa: 4
        }
    );
}

/// Tree whose edges are only reachable through a view, used to feed lengths
/// the tree models refuse to store.
struct RawTree {
    children: Vec<Vec<usize>>,
    labels: Vec<Option<&'static str>>,
    lengths: Vec<Option<f64>>,
}

impl TreeView for RawTree {
    type Node = usize;

    fn root(&self) -> Option<usize> {
        (!self.children.is_empty()).then_some(0)
    }

    fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    fn label(&self, node: usize) -> Option<&str> {
        self.labels[node]
    }

    fn branch_length(&self, node: usize) -> Option<f64> {
        self.lengths[node]
    }
}

fn raw_star(lengths: [f64; 3]) -> RawTree {
    RawTree {
        children: vec![vec![1, 2, 3], vec![], vec![], vec![]],
        labels: vec![None, Some("A"), Some("B"), Some("C")],
        lengths: vec![None, Some(lengths[0]), Some(lengths[1]), Some(lengths[2])],
    }
}

#[test]
fn test_encode_negative_and_non_finite_lengths() {
    let err = encode(&raw_star([1.0, -0.5, 1.0]), None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::NegativeBranchLength { length, .. }) if length == -0.5
    ));

    let err = encode(&raw_star([1.0, 1.0, f64::NAN]), None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::NonFiniteBranchLength { .. })
    ));
}

#[test]
fn test_encode_negative_zero_as_zero() {
    let vector = encode(&raw_star([-0.0, 1.0, 1.0]), None).unwrap();
    assert!(vector[0].is_sign_positive());
}

#[test]
fn test_encode_shared_child() {
    let shared = RawTree {
        children: vec![vec![1, 2, 3], vec![3, 4], vec![], vec![], vec![]],
        labels: vec![None, None, Some("A"), Some("B"), Some("C")],
        lengths: vec![None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
    };
    let err = encode(&shared, None).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::NotATree { .. })
    ));
}

// --- DECODE ---
#[test]
fn test_decode_star() {
    let decoded = decode(&[1.0, 2.0, 3.0], &taxa(&["A", "B", "C"])).unwrap();
    assert_eq!(to_newick(&decoded), "(A:1,B:2,C:3);");
}

#[test]
fn test_decode_four_leaves() {
    let universe = taxa(&["A", "B", "C", "D"]);
    let decoded = decode(&[1.0, 2.0, 3.0, 4.0, 0.5, -1.0, -1.0], &universe).unwrap();

    assert!(decoded.is_valid());
    assert_eq!(to_newick(&decoded), "(A:1,B:2,(C:3,D:4):0.5);");
}

#[test]
fn test_decode_nested_splits() {
    let original = tree("(((A:1,B:1):0.25,C:1):0.5,(D:1,E:1):0.75,F:1);");
    let universe = taxa(&["A", "B", "C", "D", "E", "F"]);
    let vector = encode(&original, Some(&universe)).unwrap();
    let decoded = decode(&vector, &universe).unwrap();

    assert!(same_tree(&original, &decoded).unwrap());
    // Decoded trees hang off the vertex next to the smallest taxon
    assert_eq!(
        to_sorted_newick(&decoded),
        "(A:1,B:1,(C:1,(F:1,(D:1,E:1):0.75):0.5):0.25);"
    );
}

#[test]
fn test_decode_subset_of_universe() {
    let universe = taxa(&["A", "B", "C", "D", "E"]);
    let original = tree("((A:1,B:1):0.5,C:1,D:1);");
    let vector = encode(&original, Some(&universe)).unwrap();
    let decoded = decode(&vector, &universe).unwrap();

    assert_eq!(decoded.num_leaves(), 4);
    assert_eq!(to_newick(&decoded), "(A:1,B:1,(C:1,D:1):0.5);");
}

#[test]
fn test_decode_single_and_two_leaves() {
    let universe = taxa(&["A", "B", "C"]);
    let single = decode(&[-1.0, 0.0, -1.0], &universe).unwrap();
    assert_eq!(to_newick(&single), "B;");

    let pair = decode(&[1.0, 2.0], &taxa(&["A", "B"])).unwrap();
    assert_eq!(to_newick(&pair), "(A:1,B:2);");
}

#[test]
fn test_decode_into_compact_tree() {
    use phylovec::model::{CompactTreeBuilder, TreeBuilder};

    let universe = taxa(&["A", "B", "C", "D"]);
    let codec = VectorCodec::new();
    let mut builder = CompactTreeBuilder::new();
    let mut labels = CompactTreeBuilder::create_storage(universe.len());
    let decoded = codec
        .decode_with(
            &[1.0, 2.0, 3.0, 4.0, -1.0, 0.5, -1.0],
            &universe,
            &mut builder,
            &mut labels,
        )
        .unwrap();

    assert_eq!(
        to_newick(&decoded.view(&labels)),
        "(A:1,(B:2,D:4):0.5,C:3);"
    );
}

// --- DECODE ERRORS ---
#[test]
fn test_decode_vector_length_off_by_one() {
    let universe = taxa(&["A", "B", "C", "D"]);
    let short = decode(&[1.0, 1.0, 1.0, 1.0, 0.5, -1.0], &universe).unwrap_err();
    let long = decode(&[1.0, 1.0, 1.0, 1.0, 0.5, -1.0, -1.0, -1.0], &universe).unwrap_err();

    assert_eq!(
        short,
        CodecError::VectorLength {
            expected: 7,
            actual: 6,
            num_taxa: 4
        }
    );
    assert!(matches!(long, CodecError::VectorLength { actual: 8, .. }));
}

#[test]
fn test_decode_non_laminar_splits() {
    let universe = taxa(&["A", "B", "C", "D"]);
    let err = decode(&[1.0, 1.0, 1.0, 1.0, 0.5, 0.5, -1.0], &universe).unwrap_err();
    assert_eq!(
        err,
        CodecError::NonLaminarSplit {
            first: "{A,B}".to_string(),
            second: "{A,C}".to_string()
        }
    );
}

#[test]
fn test_decode_invalid_entries() {
    let universe = taxa(&["A", "B", "C"]);
    let err = decode(&[1.0, -0.5, 1.0], &universe).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::InvalidVectorEntry { position: 1, .. })
    ));

    let err = decode(&[1.0, f64::INFINITY, 1.0], &universe).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidTree(TreeDefect::InvalidVectorEntry { position: 1, .. })
    ));

    let err = decode(&[-1.0, -1.0, -1.0], &universe).unwrap_err();
    assert_eq!(err, CodecError::InvalidTree(TreeDefect::EmptyTree));
}

#[test]
fn test_decode_unrealizable_split() {
    let universe = taxa(&["A", "B", "C", "D"]);
    // D absent, so {A,B}|{C} is no longer an internal edge
    let err = decode(&[1.0, 1.0, 1.0, -1.0, 0.5, -1.0, -1.0], &universe).unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidTree(TreeDefect::UnrealizableSplit {
            position: 4,
            signature: "{A,B}".to_string()
        })
    );
}

#[test]
fn test_decode_universe_too_large() {
    let codec = VectorCodec::new().with_max_taxa(3);
    let err = codec
        .decode(&[1.0; 7], &taxa(&["A", "B", "C", "D"]))
        .unwrap_err();
    assert!(matches!(err, CodecError::UniverseTooLarge { num_taxa: 4, .. }));
}

// --- CONCURRENCY ---
#[test]
fn test_codec_shared_between_threads() {
    let codec = VectorCodec::new();
    let universe = taxa(&["A", "B", "C", "D", "E"]);
    let newicks = [
        "((A:1,B:1):0.5,C:1,D:1,E:1);",
        "((A:1,C:1):0.25,(B:1,D:1):0.75,E:1);",
        "(A:1,B:1,C:1,D:1,E:1);",
        "(((A:1,E:1):1,D:1):1,B:1,C:1);",
    ];

    let sequential: Vec<Vec<f64>> = newicks
        .iter()
        .map(|n| codec.encode(&tree(n), Some(&universe)).unwrap())
        .collect();

    let parallel: Vec<Vec<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = newicks
            .iter()
            .map(|n| {
                let (codec, universe) = (&codec, &universe);
                scope.spawn(move || {
                    let vector = codec.encode(&tree(n), Some(universe)).unwrap();
                    let decoded = codec.decode(&vector, universe).unwrap();
                    codec.encode(&decoded, Some(universe)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
