use phylowick::error::ErrorKind;
use phylowick::model::{NodeKind, Tree};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// ((A,B),(C,D)) with C and D merged first
fn four_leaf_pairs() -> Vec<(usize, usize)> {
    vec![(2, 3), (0, 1), (4, 5)]
}

// --- TESTS CONSTRUCTION ---
#[test]
fn test_building_tree() {
    let tree = Tree::from_merges(&four_leaf_pairs(), &names(&["A", "B", "C", "D"]), None).unwrap();

    // Counts
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_branches(), 3);
    assert_eq!(tree.num_nodes(), 7);
    assert_eq!(tree.root_index(), 6);
    assert!(tree.is_valid());

    // Leaf
    let c = &tree[2];
    assert!(c.is_leaf());
    assert_eq!(c.kind(), NodeKind::Leaf);
    assert_eq!(c.name(), "C");
    assert_eq!(c.parent(), Some(4));

    // Branch
    let cd = &tree[4];
    assert!(cd.is_branch());
    assert_eq!(cd.children(), Some((2, 3)));
    assert_eq!(cd.name(), "0");
    assert_eq!(cd.parent(), Some(6));

    // Root
    assert_eq!(tree.root().children(), Some((4, 5)));
    assert_eq!(tree.root().parent(), None);
}

#[test]
fn test_default_names() {
    let tree = Tree::from_merges(&four_leaf_pairs(), &names(&["A", "", "C"]), None).unwrap();
    assert_eq!(tree.leaf_names(), vec!["A", "1", "C", "3"]);
    let branch_names: Vec<_> = tree.branches().map(|b| b.name()).collect();
    assert_eq!(branch_names, vec!["0", "1", "2"]);
}

#[test]
fn test_names_for_branches() {
    let all = names(&["A", "B", "C", "D", "cd", "ab", "root"]);
    let tree = Tree::from_merges(&four_leaf_pairs(), &all, None).unwrap();
    assert_eq!(tree[4].name(), "cd");
    assert_eq!(tree.root().name(), "root");
}

#[test]
fn test_topological_default_distances() {
    // Caterpillar (((A,B),C),D)
    let tree = Tree::from_merges(&[(0, 1), (4, 2), (5, 3)], &[], None).unwrap();
    let distances: Vec<f64> = tree.nodes().map(|n| n.distance()).collect();
    // Levels: leaves 0, branches 1, 2, 3
    assert_eq!(distances, vec![1.0, 1.0, 2.0, 3.0, 1.0, 1.0, 0.0]);
    assert!(tree.is_ultrametric());
}

#[test]
fn test_distances_per_node() {
    let dist = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], Some(&dist)).unwrap();
    for (node, d) in tree.nodes().zip(dist) {
        assert_eq!(node.distance(), d);
    }
    assert!((tree.total_branch_length() - 2.8).abs() < 1e-12);
}

#[test]
fn test_negative_distance_keeps_default() {
    let dist = [0.5, -1.0, 0.5];
    let tree = Tree::from_merges(&[(0, 1)], &[], Some(&dist)).unwrap();
    assert_eq!(tree[0].distance(), 0.5);
    assert_eq!(tree[1].distance(), 1.0);
}

#[test]
fn test_merge_heights() {
    let heights = [1.0, 2.0, 5.0];
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], Some(&heights)).unwrap();

    assert_eq!(tree[2].distance(), 1.0);
    assert_eq!(tree[3].distance(), 1.0);
    assert_eq!(tree[0].distance(), 2.0);
    assert_eq!(tree[4].distance(), 4.0);
    assert_eq!(tree[5].distance(), 3.0);
    assert_eq!(tree.root().distance(), 0.0);
    assert!(tree.is_ultrametric());
    assert_eq!(tree.height(), 5.0);
}

#[test]
fn test_single_leaf_tree() {
    let tree = Tree::from_merges(&[], &names(&["only"]), None).unwrap();
    assert_eq!(tree.num_leaves(), 1);
    assert_eq!(tree.num_branches(), 0);
    assert_eq!(tree.parent(0), None);
    assert!(tree.is_valid());
}

// --- TESTS ERRORS ---
#[test]
fn test_reference_out_of_range() {
    let err = Tree::from_merges(&[(0, 1), (2, 9)], &[], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_reference_to_later_branch() {
    // Branch 3 references branch 4, which is created after it
    let err = Tree::from_merges(&[(0, 4), (1, 2)], &[], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_child_used_twice() {
    let err = Tree::from_merges(&[(0, 1), (0, 3)], &[], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = Tree::from_merges(&[(1, 1), (0, 3)], &[], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_wrong_distance_length() {
    let err = Tree::from_merges(&four_leaf_pairs(), &[], Some(&[1.0, 2.0])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_too_many_names() {
    let err = Tree::from_merges(&[(0, 1)], &names(&["a", "b", "c", "d"]), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// --- TESTS PARENT ---
#[test]
fn test_parent() {
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], None).unwrap();
    assert_eq!(tree.parent(0), Some(5));
    assert_eq!(tree.parent(3), Some(4));
    assert_eq!(tree.parent(4), Some(6));
    // Root is its own parent
    assert_eq!(tree.parent(6), Some(6));
    assert_eq!(tree.parent(7), None);
}

// --- TESTS LAYOUT ---
#[test]
fn test_layout_after_construction() {
    let heights = [1.0, 2.0, 5.0];
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], Some(&heights)).unwrap();
    assert!(!tree.needs_layout());

    // x accumulates distances from the root down
    assert_eq!(tree.root().x(), 0.0);
    assert_eq!(tree[4].x(), 4.0);
    assert_eq!(tree[2].x(), 5.0);
    assert_eq!(tree.max_x(), 5.0);

    // y: leaf slot, branches take the mean of their children
    assert_eq!(tree[3].y(), 3.0);
    assert_eq!(tree[4].y(), 2.5);
    assert_eq!(tree[5].y(), 0.5);
    assert_eq!(tree.root().y(), 1.5);
    assert_eq!(tree.max_y(), 3.0);
}

#[test]
fn test_edits_mark_layout_stale() {
    let mut tree = Tree::from_merges(&four_leaf_pairs(), &[], Some(&[1.0, 2.0, 5.0])).unwrap();

    tree.set_distance(2, 3.0).unwrap();
    assert!(tree.needs_layout());
    // Coordinates are only refreshed by validate
    assert_eq!(tree[2].x(), 5.0);
    tree.validate();
    assert!(!tree.needs_layout());
    assert_eq!(tree[2].x(), 7.0);

    tree.set_name(0, "Kea").unwrap();
    assert!(tree.needs_layout());
    assert_eq!(tree[0].name(), "Kea");
}

#[test]
fn test_invalid_edits() {
    let mut tree = Tree::from_merges(&[(0, 1)], &[], None).unwrap();
    assert_eq!(tree.set_distance(0, -1.0).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(tree.set_distance(0, f64::NAN).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(tree.set_name(3, "x").unwrap_err().kind(), ErrorKind::InvalidInput);
    assert!(!tree.needs_layout());
}

#[test]
fn test_blank_names_rejected() {
    let mut tree = Tree::from_merges(&[(0, 1)], &names(&["A", "B"]), None).unwrap();
    assert_eq!(tree.set_name(0, "").unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(tree.set_name(2, " \t ").unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(tree[0].name(), "A");
    assert!(!tree.needs_layout());
}

// --- TESTS QUERIES ---
#[test]
fn test_not_ultrametric() {
    let dist = [1.0, 2.0, 1.0, 0.0, 0.0];
    let tree = Tree::from_merges(&[(0, 1), (2, 3)], &[], Some(&dist)).unwrap();
    assert!(!tree.is_ultrametric());
    assert_eq!(tree.height(), 2.0);
}

#[test]
fn test_tree_name() {
    let mut tree = Tree::from_merges(&[(0, 1)], &[], None).unwrap().with_name("kiwi");
    assert_eq!(tree.name(), "kiwi");
    tree.rename("kakapo");
    assert_eq!(tree.name(), "kakapo");
}

// --- TESTS ITERATORS ---
#[test]
fn test_post_order() {
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], None).unwrap();
    let order: Vec<_> = tree.post_order_iter().map(|n| n.index()).collect();
    assert_eq!(order, vec![2, 3, 4, 0, 1, 5, 6]);
}

#[test]
fn test_pre_order() {
    let tree = Tree::from_merges(&four_leaf_pairs(), &[], None).unwrap();
    let order: Vec<_> = tree.pre_order_iter().map(|n| n.index()).collect();
    assert_eq!(order, vec![6, 4, 2, 3, 5, 0, 1]);
}

// --- TESTS PRINTING ---
#[test]
fn test_display() {
    let tree = Tree::from_merges(&[(0, 1), (2, 3)], &names(&["A", "B", "C"]), Some(&[0.1, 0.4]))
        .unwrap()
        .with_name("example");
    let text = tree.to_string();

    let expected = "Tree \"example\" with 3 leaves (5 nodes total):\n\
                    [4] Branch \"1\" (distance: 0.000)\n  \
                    ├─ [2] Leaf \"C\" (distance: 0.400)\n  \
                    └─ [3] Branch \"0\" (distance: 0.300)\n     \
                    ├─ [0] Leaf \"A\" (distance: 0.100)\n     \
                    └─ [1] Leaf \"B\" (distance: 0.100)\n";
    assert_eq!(text, expected);
}
