//! Constants and definitions for the Newick parser and writer.

/// Characters with structural meaning in Newick text, never part of a label
pub(crate) const STRUCTURAL_CHARS: &[char] = &['(', ')', ',', ':', ';', '[', ']'];

/// Replacement for structural characters and line breaks in written labels
pub(crate) const LABEL_REPLACEMENT: char = '_';

/// Separator of a label's name and its distance
pub(crate) const DISTANCE_SEPARATOR: char = ':';

/// Opening `(` or `,` followed by a leaf label run; group 1 is the run
pub(crate) const LEAF_LABEL_PATTERN: &str = r"[(,]\s*([^\s(),;\[\]][^(),;\[\]]*)";

/// Closing `)` followed by a possibly empty label run; group 1 is the run
pub(crate) const INTERNAL_LABEL_PATTERN: &str = r"\)([^(),;\[\]]*)";

/// Characters per branch length in capacity estimates (e.g. ":0.009529961339106089")
pub(crate) const BRANCH_LENGTH_CHARS: usize = 20;
