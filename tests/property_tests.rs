//! Property-based tests using proptest

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rapid_pacsum::*;

/// Square matrix with 1..=8 rows and entries in [-1, 1]
fn square_matrix() -> impl Strategy<Value = SimilarityMatrix> {
    (1usize..=8).prop_flat_map(|n| {
        prop::collection::vec(-1.0f64..1.0, n * n)
            .prop_map(move |values| SimilarityMatrix::from_flat(n, values).unwrap())
    })
}

fn hyper_params() -> impl Strategy<Value = HyperParams> {
    (0.0f64..=1.0, -1.0f64..=1.0, -1.0f64..=1.0)
        .prop_map(|(beta, lambda1, lambda2)| HyperParams::new(beta, lambda1, lambda2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_edge_weight_conservation(m in square_matrix(), threshold in -1.0f64..1.0) {
        let scores = compute_scores(&m, threshold);

        let forward: f64 = scores.forward.iter().sum();
        let backward: f64 = scores.backward.iter().sum();
        let edges = scores.total_edge_weight();

        prop_assert!((forward - edges).abs() < 1e-9, "forward {} vs edges {}", forward, edges);
        prop_assert!((backward - edges).abs() < 1e-9, "backward {} vs edges {}", backward, edges);
        prop_assert!(scores.edges.iter().all(|e| e.source < e.target && e.weight > threshold));
    }

    #[test]
    fn test_only_upper_triangle_is_read(
        m in square_matrix(),
        noise in prop::collection::vec(-5.0f64..5.0, 64),
        threshold in -1.0f64..1.0,
    ) {
        let n = m.len();
        let mut rows = m.to_rows();
        for i in 0..n {
            for j in 0..=i {
                rows[i][j] = noise[i * 8 + j];
            }
        }
        let perturbed = SimilarityMatrix::from_rows(rows).unwrap();

        prop_assert_eq!(compute_scores(&m, threshold), compute_scores(&perturbed, threshold));
    }

    #[test]
    fn test_positive_scaling_preserves_selection(
        m in square_matrix(),
        params in hyper_params(),
        extract_num in 1usize..5,
        seed in any::<u64>(),
    ) {
        let base = select_tops(&m, &params, extract_num, &mut StdRng::seed_from_u64(seed)).unwrap();
        let base_threshold = m.min_max().map(|(lo, hi)| params.edge_threshold(lo, hi));

        for factor in [0.5, 2.0, 4.0] {
            let scaled = m.scaled(factor);
            let threshold = scaled.min_max().map(|(lo, hi)| params.edge_threshold(lo, hi));
            prop_assert_eq!(threshold, base_threshold.map(|t| t * factor));

            let selected =
                select_tops(&scaled, &params, extract_num, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(&selected, &base, "factor {}", factor);
        }
    }

    #[test]
    fn test_large_extract_num_returns_every_index(
        m in square_matrix(),
        params in hyper_params(),
        extra in 0usize..4,
        seed in any::<u64>(),
    ) {
        let n = m.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut selected = select_tops(&m, &params, n + extra, &mut rng).unwrap();

        prop_assert_eq!(selected.len(), n);
        selected.sort_unstable();
        prop_assert_eq!(selected, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_selection_is_ranked_and_reproducible(
        m in square_matrix(),
        params in hyper_params(),
        extract_num in 1usize..9,
        seed in any::<u64>(),
    ) {
        let a = select_tops(&m, &params, extract_num, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = select_tops(&m, &params, extract_num, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(&a, &b);

        let scores = summarizer::selector::node_scores(&m, &params);
        for pair in a.windows(2) {
            prop_assert!(scores[pair[0]] >= scores[pair[1]]);
        }
    }
}

#[test]
fn test_single_sentence_degenerate() {
    let m = SimilarityMatrix::from_rows(vec![vec![0.7]]).unwrap();
    let scores = compute_scores(&m, 0.7);

    assert!(scores.edges.is_empty());
    assert_eq!(scores.forward, vec![0.0]);
    assert_eq!(scores.backward, vec![0.0]);

    let selected = select_tops(&m, &HyperParams::new(0.5, 0.5, 0.5), 1, &mut StdRng::seed_from_u64(0));
    assert_eq!(selected.unwrap(), vec![0]);
}

#[test]
fn test_constant_matrix_has_no_edges() {
    let m = SimilarityMatrix::from_rows(vec![vec![0.3; 4]; 4]).unwrap();
    let (lo, hi) = m.min_max().unwrap();
    let threshold = HyperParams::new(0.5, 0.0, 0.0).edge_threshold(lo, hi);

    assert_eq!(threshold, 0.3);
    assert!(compute_scores(&m, threshold).edges.is_empty());
}
