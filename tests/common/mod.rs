#![allow(dead_code)]

use phylowick::model::Tree;
use phylowick::sequence::{AlignedSequenceSet, Alphabet};
use proptest::prelude::*;

/// Random binary tree with leaves `taxon0..`: every merge joins two of
/// the clusters still open, branch lengths are multiples of 1/8.
pub fn random_tree() -> impl Strategy<Value = Tree> {
    (2usize..12).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), n - 1),
            prop::collection::vec(0u32..1000, 2 * n - 1),
        )
            .prop_map(|(n, picks, lengths)| {
                let mut active: Vec<usize> = (0..n).collect();
                let mut pairs = Vec::with_capacity(n - 1);
                for (b, (first, second)) in picks.into_iter().enumerate() {
                    let c1 = active.remove(first.index(active.len()));
                    let c2 = active.remove(second.index(active.len()));
                    pairs.push((c1, c2));
                    active.push(n + b);
                }
                let names: Vec<String> = (0..n).map(|i| format!("taxon{i}")).collect();
                let distances: Vec<f64> = lengths.into_iter().map(|l| l as f64 / 8.0).collect();
                Tree::from_merges(&pairs, &names, Some(&distances)).unwrap()
            })
    })
}

/// Four short DNA sequences: human and chimp differ at one site, gorilla
/// at two more, orangutan is the farthest.
pub fn great_apes() -> AlignedSequenceSet {
    let fasta = ">human\nACGTA\n>chimp\nACGTT\n>gorilla\nACCAT\n>orangutan\nTGCAT\n";
    AlignedSequenceSet::from_fasta_str(fasta, Alphabet::Dna).unwrap()
}
