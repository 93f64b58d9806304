//! Agglomerative hierarchical clustering over a distance matrix.
//!
//! [linkage] repeatedly merges the two closest clusters until one cluster
//! is left, recording the merge order in a [MergeRecord]. The working
//! distances live in a condensed vector (see [condensed]) that shrinks by
//! one cluster per merge; a remapping table tracks which original or
//! synthesized cluster occupies each live row.
//!
//! Cluster ids in a [MergeRecord] are 1-based: `1..=n` denote the input
//! points and `n + s` the cluster created by merge `s`.

pub mod condensed;

use crate::distance::DistanceMatrix;
use crate::error::{PhyloError, Result};
use crate::model::Tree;
use condensed::{condensed_len, index_to_pair, unordered_pair_to_index};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Rule recomputing the distance between a merged cluster and the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkageMethod {
    /// Nearest neighbour: `min(a, b)`
    Single,
    /// Farthest neighbour: `max(a, b)`
    Complete,
    /// UPGMA: size-weighted mean distance
    #[default]
    Average,
    /// `a + b / 2`
    Weighted,
    Centroid,
    Median,
    Ward,
}

impl LinkageMethod {
    pub fn name(&self) -> &'static str {
        match self {
            LinkageMethod::Single => "single",
            LinkageMethod::Complete => "complete",
            LinkageMethod::Average => "average",
            LinkageMethod::Weighted => "weighted",
            LinkageMethod::Centroid => "centroid",
            LinkageMethod::Median => "median",
            LinkageMethod::Ward => "ward",
        }
    }

    /// Returns `true` if [linkage] supports this method.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, LinkageMethod::Centroid | LinkageMethod::Median | LinkageMethod::Ward)
    }

    /// Combines the distances `a = d(u, i)` and `b = d(u, j)` into `d(u, i+j)`.
    ///
    /// Average keeps the unnormalized sum; it is divided by the cluster sizes
    /// only when the minimum is selected.
    fn update(&self, a: f64, b: f64) -> f64 {
        match self {
            LinkageMethod::Single => a.min(b),
            LinkageMethod::Complete => a.max(b),
            LinkageMethod::Average => a + b,
            LinkageMethod::Weighted => a + b / 2.0,
            // Rejected before clustering starts
            LinkageMethod::Centroid | LinkageMethod::Median | LinkageMethod::Ward => f64::NAN,
        }
    }
}

// =#========================================================================#=
// MERGE RECORD
// =#========================================================================#=
/// Result of a clustering: `n - 1` merges of 1-based cluster ids with their heights.
///
/// Each pair is sorted so that the smaller id comes first. Heights are the
/// linkage distances at which the merges happened; they are not guaranteed
/// to be monotone for every linkage rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRecord {
    pairs: Vec<(usize, usize)>,
    heights: Vec<f64>,
}

impl MergeRecord {
    /// Creates a merge record from 1-based pairs and their heights.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if the number of pairs and heights differ.
    pub fn new(pairs: Vec<(usize, usize)>, heights: Vec<f64>) -> Result<Self> {
        if pairs.len() != heights.len() {
            return Err(PhyloError::invalid_input(format!(
                "Merge record has {} pairs but {} heights",
                pairs.len(),
                heights.len()
            )));
        }
        Ok(Self { pairs, heights })
    }

    /// Merged pairs of 1-based cluster ids, in creation order.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Merge heights, one per pair.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of clustered points, one more than the number of merges.
    pub fn num_leaves(&self) -> usize {
        self.pairs.len() + 1
    }

    /// Pairs converted to 0-based node indices.
    pub fn zero_based_pairs(&self) -> Result<Vec<(usize, usize)>> {
        self.pairs
            .iter()
            .enumerate()
            .map(|(row, &(a, b))| {
                if a == 0 || b == 0 {
                    Err(PhyloError::invalid_input(format!("Merge {row} references cluster id 0")))
                } else {
                    Ok((a - 1, b - 1))
                }
            })
            .collect()
    }

    /// Builds the ultrametric tree of this clustering; `names` label the leaves.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if a pair references an unknown cluster or
    /// there are more names than nodes.
    pub fn to_tree(&self, names: &[String]) -> Result<Tree> {
        Tree::from_merges(&self.zero_based_pairs()?, names, Some(&self.heights))
    }
}

// =#========================================================================#=
// LINKAGE
// =#========================================================================#=
/// Clusters the points of `matrix` with the given linkage rule.
///
/// # Errors
/// * [PhyloError::InvalidInput] if the matrix has fewer than two rows
/// * [PhyloError::NotImplemented] for centroid, median and Ward linkage
///
/// # Example
/// ```
/// use ndarray::array;
/// use phylowick::distance::DistanceMatrix;
/// use phylowick::linkage::{linkage, LinkageMethod};
///
/// let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let d = array![[0.0, 2.0, 6.0], [2.0, 0.0, 4.0], [6.0, 4.0, 0.0]];
/// let matrix = DistanceMatrix::from_array(names, d).unwrap();
///
/// let record = linkage(&matrix, LinkageMethod::Average).unwrap();
/// assert_eq!(record.pairs(), &[(1, 2), (3, 4)]);
/// assert_eq!(record.heights(), &[2.0, 5.0]);
/// ```
pub fn linkage(matrix: &DistanceMatrix, method: LinkageMethod) -> Result<MergeRecord> {
    linkage_condensed(matrix.condensed(), matrix.dim(), method)
}

/// Clusters `n` points given as a condensed distance vector of length `n(n-1)/2`.
///
/// # Errors
/// See [linkage]; additionally [PhyloError::InvalidInput] if the vector
/// length does not match `n`.
pub fn linkage_condensed(mut y: Vec<f64>, n: usize, method: LinkageMethod) -> Result<MergeRecord> {
    if n < 2 {
        return Err(PhyloError::invalid_input(format!("Linkage needs at least 2 points, got {n}")));
    }
    if y.len() != condensed_len(n) {
        return Err(PhyloError::invalid_input(format!(
            "Condensed distance vector of length {} does not fit {n} points",
            y.len()
        )));
    }
    if !method.is_implemented() {
        return Err(PhyloError::not_implemented(format!("{} linkage", method.name())));
    }

    debug!(method = method.name(), points = n, "clustering");

    // sizes[id - 1]: number of points in cluster id (ids 1..=2n-1)
    let mut sizes = vec![0usize; 2 * n - 1];
    sizes[..n].fill(1);
    // remap[r - 1]: cluster id currently living in row r
    let mut remap: Vec<usize> = (1..=n).collect();
    let mut m = n;

    let mut pairs = Vec::with_capacity(n - 1);
    let mut heights = Vec::with_capacity(n - 1);
    let mut removed = vec![false; y.len()];

    for s in 1..n {
        let (k, v) = select_minimum(&y, &remap, &sizes, m, method);
        let (i, j) = index_to_pair(m, k);

        let (a, b) = (remap[i - 1], remap[j - 1]);
        trace!(step = s, left = a, right = b, height = v, "merge");
        pairs.push(if a < b { (a, b) } else { (b, a) });
        heights.push(v);

        // Fold row j into row i and mark the slots of j for removal
        removed.truncate(y.len());
        removed.fill(false);
        for u in (1..=m).filter(|&u| u != i && u != j) {
            let ui = unordered_pair_to_index(m, u, i) - 1;
            let uj = unordered_pair_to_index(m, u, j) - 1;
            y[ui] = method.update(y[ui], y[uj]);
            removed[uj] = true;
        }
        removed[k - 1] = true;

        let mut slot = 0;
        y.retain(|_| {
            let keep = !removed[slot];
            slot += 1;
            keep
        });

        m -= 1;
        let merged = n + s;
        sizes[merged - 1] = sizes[a - 1] + sizes[b - 1];
        remap[i - 1] = merged;
        remap.remove(j - 1);
    }

    MergeRecord::new(pairs, heights)
}

/// Finds the 1-based condensed index of the closest pair and its linkage distance.
/// Ties go to the first index.
fn select_minimum(y: &[f64], remap: &[usize], sizes: &[usize], m: usize, method: LinkageMethod) -> (usize, f64) {
    let mut best_k = 1;
    let mut best = f64::INFINITY;

    if method == LinkageMethod::Average {
        let mut k = 0;
        for row in 1..m {
            let row_size = sizes[remap[row - 1] - 1] as f64;
            for col in row + 1..=m {
                let value = y[k] / (row_size * sizes[remap[col - 1] - 1] as f64);
                k += 1;
                if value < best {
                    best = value;
                    best_k = k;
                }
            }
        }
    } else {
        for (k, &value) in y.iter().enumerate() {
            if value < best {
                best = value;
                best_k = k + 1;
            }
        }
    }

    // If every remaining distance is infinite (or NaN) the first pair is merged
    (best_k, best)
}
