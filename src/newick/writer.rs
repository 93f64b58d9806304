//! Newick format writing for [Tree]s.

use crate::error::Result;
use crate::model::{NodeIndex, Tree};
use crate::newick::defs::{BRANCH_LENGTH_CHARS, LABEL_REPLACEMENT, STRUCTURAL_CHARS};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing tree to Newick format,
/// controlling how leaf labels are represented in the output string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Use the leaf names
    #[default]
    Label,
    /// Use 0-based leaf indices (0, 1, 2, ...)
    ZeroIndexed,
    /// Use 1-based leaf indices (1, 2, 3, ...)
    OneIndexed,
}

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// Internal node names are included.
///
/// # Errors
/// [PhyloError::Io](crate::error::PhyloError::Io) if creating or writing the file fails.
///
/// # Example
/// ```no_run
/// use phylowick::newick::{self, NewickStyle};
///
/// let tree = newick::parse_str("((A:1,B:1):1,C:2);")?;
/// newick::write_newick_file("trees.nwk", &[tree], NewickStyle::Label)?;
/// # Ok::<(), phylowick::error::PhyloError>(())
/// ```
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[Tree], style: NewickStyle) -> Result<()> {
    let Some(first) = trees.first() else {
        File::create(path)?;
        return Ok(());
    };

    let mut writer = BufWriter::new(File::create(path)?);
    let estimated_capacity = estimate_newick_len(style, first);
    for tree in trees {
        let newick = to_newick_with_capacity(tree, style, false, estimated_capacity);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Every node is followed by `:distance`, the root included. Names of
/// branches are written after their closing parenthesis unless
/// `hide_internal` is set. Labels containing `(),:;[]` or line breaks are
/// written with those characters replaced by `_`.
///
/// # Example
/// ```
/// use phylowick::model::Tree;
/// use phylowick::newick::{to_newick, NewickStyle};
///
/// let names = vec!["A".to_string(), "B".to_string()];
/// let tree = Tree::from_merges(&[(0, 1)], &names, Some(&[1.0, 2.0, 0.0])).unwrap();
///
/// assert_eq!(to_newick(&tree, NewickStyle::Label, true), "(A:1,B:2):0;");
/// assert_eq!(to_newick(&tree, NewickStyle::OneIndexed, false), "(1:1,2:2)0:0;");
/// ```
pub fn to_newick(tree: &Tree, style: NewickStyle, hide_internal: bool) -> String {
    let estimated_capacity = estimate_newick_len(style, tree);
    to_newick_with_capacity(tree, style, hide_internal, estimated_capacity)
}

/// Returns the Newick representation of a tree with pre-allocated capacity.
///
/// This is an optimization for writing multiple trees with similar structure,
/// where the capacity can be estimated once and reused.
pub(crate) fn to_newick_with_capacity(
    tree: &Tree,
    style: NewickStyle,
    hide_internal: bool,
    estimated_capacity: usize,
) -> String {
    // Helper for adding distances
    fn build_newick_distance(newick: &mut String, distance: f64) {
        newick.push(':');
        newick.push_str(&distance.to_string());
    }

    // Recursive helper for building the Newick string
    fn build_newick(tree: &Tree, newick: &mut String, index: NodeIndex, style: NewickStyle, hide_internal: bool) {
        let node = &tree[index];

        match node.children() {
            None => {
                match style {
                    NewickStyle::Label => newick.push_str(&sanitize_label(node.name())),
                    NewickStyle::ZeroIndexed => newick.push_str(&index.to_string()),
                    NewickStyle::OneIndexed => newick.push_str(&(index + 1).to_string()),
                }
                build_newick_distance(newick, node.distance());
            }
            Some((left, right)) => {
                newick.push('(');
                build_newick(tree, newick, left, style, hide_internal);
                newick.push(',');
                build_newick(tree, newick, right, style, hide_internal);
                newick.push(')');

                if !hide_internal {
                    newick.push_str(&sanitize_label(node.name()));
                }
                build_newick_distance(newick, node.distance());
            }
        }
    }

    let mut newick = String::with_capacity(estimated_capacity);

    build_newick(tree, &mut newick, tree.root_index(), style, hide_internal);
    newick.push(';');

    newick
}

/// Replaces structural characters and line breaks in a label by `_` and
/// trims surrounding whitespace, so that the label reads back unchanged.
pub fn sanitize_label(label: &str) -> Cow<'_, str> {
    let needs_replacement = |c: char| STRUCTURAL_CHARS.contains(&c) || c == '\r' || c == '\n';
    let trimmed = label.trim();

    if !trimmed.contains(needs_replacement) {
        return Cow::Borrowed(trimmed);
    }

    let sanitized: String = trimmed
        .chars()
        .map(|c| if needs_replacement(c) { LABEL_REPLACEMENT } else { c })
        .collect();
    warn!(label, sanitized = sanitized.as_str(), "replaced structural characters in Newick label");
    Cow::Owned(sanitized)
}

/// Estimates the length of a Newick string for a given tree.
///
/// Accounts for structure, labels or indices, and one distance per node.
fn estimate_newick_len(style: NewickStyle, tree: &Tree) -> usize {
    // Each branch: "(,)"
    const INTERNAL_NODE_CHARS: usize = 3;

    let structure_capacity = tree.num_branches() * INTERNAL_NODE_CHARS;
    let label_capacity: usize = match style {
        NewickStyle::Label => tree.nodes().map(|n| n.name().len()).sum(),
        NewickStyle::ZeroIndexed | NewickStyle::OneIndexed => {
            tree.num_leaves() * (tree.num_leaves().to_string().len())
        }
    };
    let distance_capacity = tree.num_nodes() * BRANCH_LENGTH_CHARS;

    structure_capacity + label_capacity + distance_capacity + BUFFER_CHARS
}
