//! Phylowick builds distance-based phylogenetic trees and reads and writes
//! them as Newick strings.
//!
//! Core functionality provided:
//! - Distances: pairwise distances of aligned sequences under the
//!   p-distance, Poisson, gamma or Jukes-Cantor model
//!   ([DistanceMatrix](distance::DistanceMatrix)).
//! - Clustering: agglomerative hierarchical clustering with single,
//!   complete, average (UPGMA) or weighted linkage
//!   ([linkage](linkage::linkage)), recorded as a
//!   [MergeRecord](linkage::MergeRecord).
//! - Tree model: [Tree] stores leaves and branches in an arena; it is built
//!   from merge records or parsed from Newick text and carries layout
//!   coordinates for drawing. See [crate::model] for details.
//! - Leaf ordering: [Tree::pretty_order] permutes the leaves so that a
//!   drawing has no crossing branches.
//! - Newick: parser (resolving vertices with more than two children into
//!   binary cascades) and writer, see [crate::newick].
//!
//! Limitations:
//! - Only binary trees; a tree has at least two leaves unless built directly
//! - Sequences must already be aligned
//! - Substitution-model corrections beyond Jukes-Cantor and centroid,
//!   median and Ward linkage are recognized but report
//!   [PhyloError::NotImplemented]
//!
//! # Usage patterns
//! 1. [build_tree] runs the full pipeline with a [TreeConfig].
//! 2. Each step can be run separately:
//!    [DistanceMatrix::compute](distance::DistanceMatrix::compute),
//!    [linkage](linkage::linkage), [MergeRecord::to_tree](linkage::MergeRecord::to_tree),
//!    [Tree::pretty_order].
//!
//! ## Example
//! ```
//! use phylowick::build_tree;
//! use phylowick::config::TreeConfig;
//! use phylowick::newick::{to_newick, NewickStyle};
//! use phylowick::sequence::{AlignedSequenceSet, Alphabet};
//!
//! let fasta = ">human\nACGTACGT\n>chimp\nACGTACGA\n>gorilla\nACGAACGA\n>orangutan\nTCGAACTA\n";
//! let sequences = AlignedSequenceSet::from_fasta_str(fasta, Alphabet::Dna)?;
//!
//! let tree = build_tree(&sequences, &TreeConfig::default())?;
//! assert_eq!(tree.num_leaves(), 4);
//! println!("{}", to_newick(&tree, NewickStyle::Label, true));
//! # Ok::<(), phylowick::error::PhyloError>(())
//! ```
//!
//! Parse a single Newick string:
//! ```
//! use phylowick::parse_newick_str;
//!
//! let tree = parse_newick_str("((A:0.1,B:0.2):0.3,C:0.4);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! ```
//!
//! # Logging
//! Events are emitted through [tracing]; install a subscriber to see them.

pub mod config;
pub mod distance;
pub mod error;
pub mod linkage;
pub mod model;
pub mod newick;
pub mod sequence;

pub use crate::config::TreeConfig;
pub use crate::error::{ErrorKind, PhyloError, Result};
pub use crate::model::Tree;

use crate::distance::DistanceMatrix;
use crate::sequence::AlignedSequenceSet;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Quick pipeline API
// ============================================================================
/// Builds a tree from aligned sequences: distances, clustering and,
/// if configured, leaf reordering. Leaves are named after the sequences.
///
/// # Errors
/// * [PhyloError::InvalidInput] if there are fewer than three sequences or
///   they are not aligned
/// * [PhyloError::NotImplemented] if the configured distance model or
///   linkage method is not provided
pub fn build_tree(sequences: &AlignedSequenceSet, config: &TreeConfig) -> Result<Tree> {
    let matrix = DistanceMatrix::compute(sequences, &config.distance)?;
    let record = linkage::linkage(&matrix, config.linkage)?;
    let tree = record.to_tree(matrix.names())?;

    debug!(
        leaves = tree.num_leaves(),
        pretty_order = config.pretty_order,
        "built tree"
    );

    if config.pretty_order {
        tree.pretty_order()
    } else {
        Ok(tree)
    }
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string, returning a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree> {
    newick::parse_str(newick)
}

/// Parse a file containing one Newick string, returning a [Tree].
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    newick::parse_file(path)
}
