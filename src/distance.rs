//! Pairwise evolutionary distances between aligned sequences.
//!
//! Every model starts from the proportion `p` of mismatching positions
//! among the positions selected by the [GapPolicy], and then applies its
//! correction to `p`:
//!
//! | Model | Distance |
//! |-------|----------|
//! | [DistanceModel::PDistance] | `p` |
//! | [DistanceModel::Poisson] | `-ln(1 - p)` |
//! | [DistanceModel::Gamma] | `a * ((1 - p)^(-1/a) - 1)` |
//! | [DistanceModel::JukesCantor] | `-3/4 ln(1 - 4p/3)` (nucleotides), `-19/20 ln(1 - 20p/19)` (protein) |
//!
//! The substitution-model corrections listed in [DistanceModel] without a
//! formula fail with [PhyloError::NotImplemented].

use crate::error::{PhyloError, Result};
use crate::sequence::{AlignedSequence, AlignedSequenceSet, Alphabet};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum number of sequences for a distance computation.
pub const MIN_SEQUENCES: usize = 3;

/// Default shape parameter of the gamma distance.
pub const DEFAULT_GAMMA_SHAPE: f64 = 2.0;

// =#========================================================================#=
// DISTANCE MODEL
// =#========================================================================#=
/// Distance model used to turn mismatch proportions into distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum DistanceModel {
    /// Proportion of mismatching sites
    #[default]
    PDistance,
    /// Poisson correction
    Poisson,
    /// Gamma correction with the given shape parameter `a`
    Gamma { shape: f64 },
    /// Jukes-Cantor correction, alphabet dependent
    JukesCantor,
    AlignmentScore,
    Hasegawa,
    Kimura,
    TajimaNei,
    Tamura,
    TamuraNei,
}

impl DistanceModel {
    /// Gamma model with the default shape of 2.
    pub fn gamma() -> Self {
        DistanceModel::Gamma { shape: DEFAULT_GAMMA_SHAPE }
    }

    /// Human readable name of the model.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceModel::PDistance => "p-distance",
            DistanceModel::Poisson => "Poisson",
            DistanceModel::Gamma { .. } => "Gamma",
            DistanceModel::JukesCantor => "Jukes-Cantor",
            DistanceModel::AlignmentScore => "Alignment-score",
            DistanceModel::Hasegawa => "Hasegawa",
            DistanceModel::Kimura => "Kimura",
            DistanceModel::TajimaNei => "Tajima-Nei",
            DistanceModel::Tamura => "Tamura",
            DistanceModel::TamuraNei => "Tamura-Nei",
        }
    }

    /// Returns `true` if [DistanceMatrix::compute] supports this model.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            DistanceModel::PDistance
                | DistanceModel::Poisson
                | DistanceModel::Gamma { .. }
                | DistanceModel::JukesCantor
        )
    }

    /// Applies the model's correction to the mismatch proportion `p`.
    fn correct(&self, p: f64, alphabet: Alphabet) -> Result<f64> {
        match *self {
            DistanceModel::PDistance => Ok(p),
            DistanceModel::Poisson => Ok(-(1.0 - p).ln()),
            DistanceModel::Gamma { shape } => Ok(shape * ((1.0 - p).powf(-1.0 / shape) - 1.0)),
            DistanceModel::JukesCantor => {
                // max() keeps the logarithm argument positive for saturated pairs
                if alphabet == Alphabet::Protein {
                    Ok(-19.0 / 20.0 * f64::max(f64::MIN_POSITIVE, 1.0 - 20.0 * p / 19.0).ln())
                } else {
                    Ok(-3.0 / 4.0 * f64::max(f64::MIN_POSITIVE, 1.0 - 4.0 * p / 3.0).ln())
                }
            }
            _ => Err(PhyloError::not_implemented(format!("{} distance", self.name()))),
        }
    }
}

/// Which alignment columns take part in the comparison of two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GapPolicy {
    /// Skip only columns where both sequences have a gap.
    #[default]
    PairwiseDeletion,
    /// Skip every column where either sequence has a gap.
    Strict,
}

impl GapPolicy {
    /// Returns whether column `k` is scored for the pair `(a, b)`.
    fn includes(&self, a: &AlignedSequence, b: &AlignedSequence, k: usize) -> bool {
        match self {
            GapPolicy::PairwiseDeletion => !(a.is_gap(k) && b.is_gap(k)),
            GapPolicy::Strict => !a.is_gap(k) && !b.is_gap(k),
        }
    }
}

// =#========================================================================#=
// DISTANCE OPTIONS
// =#========================================================================#=
/// Configuration of a distance computation.
///
/// # Example
/// ```
/// use phylowick::distance::{DistanceModel, DistanceOptions, GapPolicy};
///
/// let options = DistanceOptions::new()
///     .with_model(DistanceModel::JukesCantor)
///     .with_gap_policy(GapPolicy::Strict);
/// assert_eq!(options.model, DistanceModel::JukesCantor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DistanceOptions {
    pub model: DistanceModel,
    pub gap_policy: GapPolicy,
}

impl DistanceOptions {
    /// p-distance with pairwise deletion of double gaps.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: DistanceModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }
}

// =#========================================================================#=
// DISTANCE MATRIX
// =#========================================================================#=
/// Symmetric matrix of pairwise distances with zero diagonal.
///
/// Rows and columns follow the order of the input sequences; the names
/// are kept so that trees built from the matrix can label their leaves.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    names: Vec<String>,
    data: Array2<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances of `sequences` under `options`.
    ///
    /// # Errors
    /// * [PhyloError::InvalidInput] if there are fewer than three sequences,
    ///   the sequences differ in length or the gamma shape is not positive
    /// * [PhyloError::NotImplemented] if the model has no implementation
    ///
    /// # Example
    /// ```
    /// use phylowick::distance::{DistanceMatrix, DistanceOptions};
    /// use phylowick::sequence::{AlignedSequence, AlignedSequenceSet, Alphabet};
    ///
    /// let set = AlignedSequenceSet::new(vec![
    ///     AlignedSequence::new("a", Alphabet::Dna, "ACGT"),
    ///     AlignedSequence::new("b", Alphabet::Dna, "ACGA"),
    ///     AlignedSequence::new("c", Alphabet::Dna, "TCGA"),
    /// ]).unwrap();
    /// let matrix = DistanceMatrix::compute(&set, &DistanceOptions::new()).unwrap();
    /// assert_eq!(matrix.get(0, 1), 0.25);
    /// assert_eq!(matrix.get(0, 2), 0.5);
    /// ```
    pub fn compute(sequences: &AlignedSequenceSet, options: &DistanceOptions) -> Result<Self> {
        let m = sequences.len();
        if m < MIN_SEQUENCES {
            return Err(PhyloError::invalid_input(format!(
                "There must be at least {MIN_SEQUENCES} sequences, got {m}"
            )));
        }
        let len = sequences.alignment_len();
        if sequences.iter().any(|s| s.len() != len) {
            return Err(PhyloError::invalid_input("Input sequences must be aligned"));
        }
        if !options.model.is_implemented() {
            return Err(PhyloError::not_implemented(format!("{} distance", options.model.name())));
        }
        if let DistanceModel::Gamma { shape } = options.model {
            if !shape.is_finite() || shape <= 0.0 {
                return Err(PhyloError::invalid_input(format!(
                    "Gamma shape must be finite and positive, got {shape}"
                )));
            }
        }

        debug!(model = options.model.name(), sequences = m, length = len, "computing distance matrix");

        let alphabet = sequences.alphabet().unwrap_or(Alphabet::Dna);
        let mut data = Array2::<f64>::zeros((m, m));

        for i in 0..m - 1 {
            for j in i + 1..m {
                let p = mismatch_proportion(&sequences[i], &sequences[j], options.gap_policy);
                let d = options.model.correct(p, alphabet)?;
                data[[i, j]] = d;
                data[[j, i]] = d;
            }
        }

        Ok(Self { names: sequences.names(), data })
    }

    /// Wraps a precomputed square distance matrix.
    ///
    /// Only the upper triangle is read by the clustering; the lower
    /// triangle is overwritten with its mirror image.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if the matrix is not square, does not
    /// match the number of names, or holds negative or NaN entries.
    pub fn from_array(names: Vec<String>, mut data: Array2<f64>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(PhyloError::invalid_input(format!("Distance matrix must be square, got {rows}x{cols}")));
        }
        if names.len() != rows {
            return Err(PhyloError::invalid_input(format!(
                "Number of names ({}) does not match matrix dimension ({rows})",
                names.len()
            )));
        }
        for i in 0..rows {
            data[[i, i]] = 0.0;
            for j in i + 1..rows {
                let d = data[[i, j]];
                if d.is_nan() || d < 0.0 {
                    return Err(PhyloError::invalid_input(format!("Invalid distance {d} at ({i}, {j})")));
                }
                data[[j, i]] = d;
            }
        }
        Ok(Self { names, data })
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.names.len()
    }

    /// Distance between `i` and `j`; the diagonal is zero.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Underlying `M x M` array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Upper triangle flattened row by row over the pairs `i < j`.
    pub fn condensed(&self) -> Vec<f64> {
        let m = self.dim();
        let mut condensed = Vec::with_capacity(m * m.saturating_sub(1) / 2);
        for i in 0..m {
            for j in i + 1..m {
                condensed.push(self.data[[i, j]]);
            }
        }
        condensed
    }
}

/// Proportion of mismatching positions among the positions scored under `gap_policy`.
/// Pairs without any scored position have proportion 0.
fn mismatch_proportion(a: &AlignedSequence, b: &AlignedSequence, gap_policy: GapPolicy) -> f64 {
    let (diffs, valid) = (0..a.len())
        .filter(|&k| gap_policy.includes(a, b, k))
        .fold((0usize, 0usize), |(d, v), k| {
            (d + usize::from(a.data()[k] != b.data()[k]), v + 1)
        });

    if valid > 0 {
        diffs as f64 / valid as f64
    } else {
        0.0
    }
}
