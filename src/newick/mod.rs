//! Newick format parser and writer for phylogenetic trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string into a [Tree]
//! * [`parse_file`] - reads a file holding one Newick string
//! * [`to_newick`] - serializes a [Tree]
//! * [`write_newick_file`] - writes trees to a file, one per line
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= node [";"]`
//! * `node ::= leaf | branch`
//! * `branch ::= "(" node ("," node)+ ")" [label] [":" number]`
//! * `leaf ::= label [':' number]`
//!
//! Furthermore:
//! * Line breaks can occur anywhere and are removed before parsing
//! * Whitespace around labels and distances is ignored
//! * Comments are square brackets and are removed before parsing
//! * Groups with more than two children are resolved into binary
//!   cascades of nameless branches with distance 0
//! * Redundant parentheses around a single node are dropped
//!
//! The number of leaves is derived from the number of commas, so a tree
//! needs at least two leaves.

mod defs;
pub mod parser;
pub mod writer;

pub use writer::{NewickStyle, sanitize_label, to_newick, write_newick_file};

use crate::error::Result;
use crate::model::Tree;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [Tree].
///
/// # Errors
/// [PhyloError::Format](crate::error::PhyloError::Format) if the string is
/// not valid Newick format.
///
/// # Example
/// ```
/// use phylowick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata:2,(Fratercula_arctica:1,Fratercula_corniculata:1):1);")?;
/// assert_eq!(tree.num_leaves(), 3);
/// assert!(tree.is_ultrametric());
///
/// # Ok::<(), phylowick::error::PhyloError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree> {
    parser::parse(newick.as_ref())
}

/// Reads a file and parses its content as one Newick tree.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Errors
/// * [PhyloError::Io](crate::error::PhyloError::Io) if reading fails
/// * [PhyloError::Format](crate::error::PhyloError::Format) if the content
///   is not valid Newick format
///
/// # Example
/// ```no_run
/// use phylowick::newick::parse_file;
///
/// let tree = parse_file("anseriformes.nwk")?;
/// println!("Parsed tree with {} leaves", tree.num_leaves());
///
/// # Ok::<(), phylowick::error::PhyloError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    let content = std::fs::read_to_string(path)?;
    parse_str(content)
}
