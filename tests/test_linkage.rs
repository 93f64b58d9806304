use ndarray::array;
use phylowick::distance::DistanceMatrix;
use phylowick::error::ErrorKind;
use phylowick::linkage::{LinkageMethod, MergeRecord, linkage, linkage_condensed};
use proptest::prelude::*;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{i}")).collect()
}

fn three_points() -> DistanceMatrix {
    let d = array![[0.0, 1.0, 4.0], [1.0, 0.0, 6.0], [4.0, 6.0, 0.0]];
    DistanceMatrix::from_array(names(3), d).unwrap()
}

// --- TESTS UPDATE RULES ---
#[test]
fn test_single_linkage() {
    let record = linkage(&three_points(), LinkageMethod::Single).unwrap();
    assert_eq!(record.pairs(), &[(1, 2), (3, 4)]);
    assert_eq!(record.heights(), &[1.0, 4.0]);
}

#[test]
fn test_complete_linkage() {
    let record = linkage(&three_points(), LinkageMethod::Complete).unwrap();
    assert_eq!(record.pairs(), &[(1, 2), (3, 4)]);
    assert_eq!(record.heights(), &[1.0, 6.0]);
}

#[test]
fn test_average_linkage() {
    let record = linkage(&three_points(), LinkageMethod::Average).unwrap();
    assert_eq!(record.pairs(), &[(1, 2), (3, 4)]);
    assert_eq!(record.heights(), &[1.0, 5.0]);
}

/// Characterizes the weighted update `a + b / 2`, which is not the
/// textbook WPGMA mean `(a + b) / 2` (that would give 5 here).
#[test]
fn test_weighted_linkage_characterization() {
    let record = linkage(&three_points(), LinkageMethod::Weighted).unwrap();
    assert_eq!(record.pairs(), &[(1, 2), (3, 4)]);
    assert_eq!(record.heights(), &[1.0, 7.0]);
}

#[test]
fn test_average_linkage_four_points() {
    // Cluster {a, b} at 2, {c, d} at 4, both at mean(6, 8, 10, 12) = 9
    let d = array![
        [0.0, 2.0, 6.0, 8.0],
        [2.0, 0.0, 10.0, 12.0],
        [6.0, 10.0, 0.0, 4.0],
        [8.0, 12.0, 4.0, 0.0]
    ];
    let matrix = DistanceMatrix::from_array(names(4), d).unwrap();
    let record = linkage(&matrix, LinkageMethod::Average).unwrap();

    assert_eq!(record.pairs(), &[(1, 2), (3, 4), (5, 6)]);
    assert_eq!(record.heights(), &[2.0, 4.0, 9.0]);
}

#[test]
fn test_ties_go_to_first_pair() {
    let d = array![
        [0.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0, 0.0]
    ];
    let matrix = DistanceMatrix::from_array(names(4), d).unwrap();
    let record = linkage(&matrix, LinkageMethod::Single).unwrap();

    // The merged cluster takes the row of its first member
    assert_eq!(record.pairs(), &[(1, 2), (3, 5), (4, 6)]);
}

#[test]
fn test_later_pair_merged_first() {
    let d = array![[0.0, 5.0, 6.0], [5.0, 0.0, 1.0], [6.0, 1.0, 0.0]];
    let matrix = DistanceMatrix::from_array(names(3), d).unwrap();
    let record = linkage(&matrix, LinkageMethod::Complete).unwrap();

    assert_eq!(record.pairs(), &[(2, 3), (1, 4)]);
    assert_eq!(record.heights(), &[1.0, 6.0]);
}

#[test]
fn test_two_points() {
    let matrix = DistanceMatrix::from_array(names(2), array![[0.0, 3.0], [3.0, 0.0]]).unwrap();
    let record = linkage(&matrix, LinkageMethod::Average).unwrap();
    assert_eq!(record.pairs(), &[(1, 2)]);
    assert_eq!(record.num_leaves(), 2);
}

// --- TESTS ERRORS ---
#[test]
fn test_unimplemented_methods() {
    for method in [LinkageMethod::Centroid, LinkageMethod::Median, LinkageMethod::Ward] {
        assert!(!method.is_implemented());
        let err = linkage(&three_points(), method).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented, "{}", method.name());
    }
}

#[test]
fn test_too_few_points() {
    let matrix = DistanceMatrix::from_array(names(1), array![[0.0]]).unwrap();
    let err = linkage(&matrix, LinkageMethod::Average).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_condensed_length_mismatch() {
    let err = linkage_condensed(vec![1.0, 2.0], 3, LinkageMethod::Single).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_merge_record_length_mismatch() {
    let err = MergeRecord::new(vec![(1, 2)], vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// --- TESTS TREES FROM MERGE RECORDS ---
#[test]
fn test_average_linkage_tree_is_ultrametric() {
    let matrix = three_points();
    let tree = linkage(&matrix, LinkageMethod::Average)
        .unwrap()
        .to_tree(matrix.names())
        .unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_branches(), 2);
    assert_eq!(tree.num_nodes(), 5);
    assert_eq!(tree.leaf_names(), vec!["t0", "t1", "t2"]);
    assert!(tree.is_valid());
    assert!(tree.is_ultrametric());
    assert_eq!(tree.height(), 5.0);

    assert_eq!(tree[0].distance(), 1.0);
    assert_eq!(tree[2].distance(), 5.0);
    assert_eq!(tree[3].distance(), 4.0);
    assert_eq!(tree.root().distance(), 0.0);
}

#[test]
fn test_to_tree_rejects_bad_ids() {
    let record = MergeRecord::new(vec![(1, 7)], vec![1.0]).unwrap();
    let err = record.to_tree(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let record = MergeRecord::new(vec![(0, 1)], vec![1.0]).unwrap();
    assert!(record.to_tree(&[]).is_err());
}

// --- PROPERTY TESTS ---
/// Plain UPGMA over cluster member lists, used as reference.
fn reference_upgma(n: usize, d: &[Vec<f64>]) -> (Vec<(usize, usize)>, Vec<f64>) {
    let mut clusters: Vec<(usize, Vec<usize>)> = (0..n).map(|i| (i + 1, vec![i])).collect();
    let mut pairs = Vec::new();
    let mut heights = Vec::new();

    for s in 1..n {
        let mut best = (0, 1, f64::INFINITY);
        for i in 0..clusters.len() {
            for j in i + 1..clusters.len() {
                let sum: f64 = clusters[i]
                    .1
                    .iter()
                    .flat_map(|&a| clusters[j].1.iter().map(move |&b| (a, b)))
                    .map(|(a, b)| d[a][b])
                    .sum();
                let mean = sum / (clusters[i].1.len() * clusters[j].1.len()) as f64;
                if mean < best.2 {
                    best = (i, j, mean);
                }
            }
        }
        let (i, j, v) = best;
        let (id_i, id_j) = (clusters[i].0, clusters[j].0);
        pairs.push((id_i.min(id_j), id_i.max(id_j)));
        heights.push(v);

        let (_, members) = clusters.remove(j);
        clusters[i].0 = n + s;
        clusters[i].1.extend(members);
    }
    (pairs, heights)
}

fn distance_matrix() -> impl Strategy<Value = (usize, Vec<u32>)> {
    (3usize..9).prop_flat_map(|n| (Just(n), prop::collection::vec(1u32..20, n * (n - 1) / 2)))
}

fn to_full(n: usize, condensed: &[u32]) -> Vec<Vec<f64>> {
    let mut d = vec![vec![0.0; n]; n];
    let mut k = 0;
    for i in 0..n {
        for j in i + 1..n {
            d[i][j] = condensed[k] as f64;
            d[j][i] = condensed[k] as f64;
            k += 1;
        }
    }
    d
}

proptest! {
    #[test]
    fn prop_average_matches_reference_upgma((n, condensed) in distance_matrix()) {
        let y: Vec<f64> = condensed.iter().map(|&v| v as f64).collect();
        let record = linkage_condensed(y, n, LinkageMethod::Average).unwrap();
        let (pairs, heights) = reference_upgma(n, &to_full(n, &condensed));

        prop_assert_eq!(record.pairs(), pairs.as_slice());
        for (h, r) in record.heights().iter().zip(&heights) {
            prop_assert!((h - r).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_every_cluster_merged_once((n, condensed) in distance_matrix()) {
        let y: Vec<f64> = condensed.iter().map(|&v| v as f64).collect();
        for method in [LinkageMethod::Single, LinkageMethod::Complete, LinkageMethod::Average, LinkageMethod::Weighted] {
            let record = linkage_condensed(y.clone(), n, method).unwrap();
            prop_assert_eq!(record.len(), n - 1);

            // Every id except the final cluster appears exactly once, after its creation
            let mut seen = vec![0usize; 2 * n - 1];
            for (s, &(a, b)) in record.pairs().iter().enumerate() {
                prop_assert!(a < b);
                prop_assert!(b < n + s + 1);
                seen[a - 1] += 1;
                seen[b - 1] += 1;
            }
            prop_assert!(seen[..2 * n - 2].iter().all(|&c| c == 1));
            prop_assert_eq!(seen[2 * n - 2], 0);

            let tree = record.to_tree(&[]).unwrap();
            prop_assert_eq!(tree.num_leaves(), n);
            prop_assert_eq!(tree.num_branches(), n - 1);
            prop_assert_eq!(tree.num_nodes(), 2 * n - 1);
        }
    }
}
