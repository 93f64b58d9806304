use criterion::{Criterion, criterion_group, criterion_main};
use phylowick::distance::{DistanceMatrix, DistanceModel, DistanceOptions};
use phylowick::linkage::{LinkageMethod, linkage_condensed};
use phylowick::newick::{NewickStyle, parse_str, to_newick};
use phylowick::sequence::{AlignedSequence, AlignedSequenceSet, Alphabet};
use std::hint::black_box;

const LINKAGE_SIZES: &[usize] = &[50, 200];

const ALIGNMENT_SIZES: &[(usize, usize)] = &[(50, 500), (100, 1000)];

/// Deterministic condensed distances without ties between distant pairs.
fn condensed_distances(n: usize) -> Vec<f64> {
    let mut y = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            y.push(((i * 31 + j * 17) % 97) as f64 + (i + j) as f64 / (n * n) as f64 + 1.0);
        }
    }
    y
}

fn alignment(m: usize, len: usize) -> AlignedSequenceSet {
    const BASES: &[u8] = b"ACGT-";
    let sequences = (0..m)
        .map(|i| {
            let data: Vec<u8> = (0..len).map(|k| BASES[(k * 7 + i * (k % 3 + 1)) % BASES.len()]).collect();
            AlignedSequence::new(format!("seq{i}"), Alphabet::Dna, data)
        })
        .collect();
    AlignedSequenceSet::new(sequences).unwrap()
}

fn newick_of_size(n: usize) -> String {
    let record = linkage_condensed(condensed_distances(n), n, LinkageMethod::Average).unwrap();
    let names: Vec<String> = (0..n).map(|i| format!("taxon_{i}")).collect();
    let tree = record.to_tree(&names).unwrap();
    to_newick(&tree, NewickStyle::Label, false)
}

fn linkage_methods(c: &mut Criterion) {
    for &n in LINKAGE_SIZES {
        let y = condensed_distances(n);
        for method in [LinkageMethod::Single, LinkageMethod::Average] {
            c.bench_function(&format!("linkage {} n={n}", method.name()), |b| {
                b.iter(|| linkage_condensed(black_box(y.clone()), n, method).unwrap());
            });
        }
    }
}

fn distance_matrix(c: &mut Criterion) {
    let options = DistanceOptions::new().with_model(DistanceModel::JukesCantor);
    for &(m, len) in ALIGNMENT_SIZES {
        let set = alignment(m, len);
        c.bench_function(&format!("jukes-cantor m={m} len={len}"), |b| {
            b.iter(|| DistanceMatrix::compute(black_box(&set), &options).unwrap());
        });
    }
}

fn newick_parsing(c: &mut Criterion) {
    for &n in LINKAGE_SIZES {
        let newick = newick_of_size(n);
        c.bench_function(&format!("parse newick n={n}"), |b| {
            b.iter(|| parse_str(black_box(&newick)).unwrap());
        });
    }
}

criterion_group!(regression, linkage_methods, newick_parsing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = distance_matrix
}
criterion_main!(regression, reporting);
