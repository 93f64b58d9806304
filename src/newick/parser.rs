//! Logic to parse Newick strings into a [Tree].
//!
//! Parsing runs in three passes over the cleaned text:
//! 1. Structural checks: at least one comma (which fixes the number of
//!    leaves and branches) and balanced parentheses.
//! 2. Label scans: leaf labels after `(` or `,`, internal labels after `)`,
//!    each split at its last colon into name and distance.
//! 3. A stack automaton over the tokens `(`, `)` and one marker per leaf,
//!    creating one branch per closing parenthesis. Groups with more than
//!    two members are resolved into a cascade of nameless zero-length
//!    branches by joining the last two members until two remain.
//!
//! The automaton output is handed to [Tree::from_merges] with one name and
//! one distance per node. Missing distances are 0; negative and NaN
//! distances are kept as written.

use crate::error::{PhyloError, Result};
use crate::model::Tree;
use crate::newick::defs::{DISTANCE_SEPARATOR, INTERNAL_LABEL_PATTERN, LEAF_LABEL_PATTERN};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

static LEAF_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LEAF_LABEL_PATTERN).expect("leaf label pattern is a valid regex"));

static INTERNAL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INTERNAL_LABEL_PATTERN).expect("internal label pattern is a valid regex"));

/// Open parenthesis marker on the automaton stack; node ids are 1-based
const OPEN_MARKER: usize = 0;

/// Token of the automaton; the tokens are paired with their position in the cleaned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Leaf,
}

/// Name and distance parsed from a label run.
#[derive(Debug, Clone, PartialEq)]
struct Label {
    name: String,
    distance: f64,
}

/// Parses a single Newick string into a [Tree].
///
/// Line breaks and `[...]` comments are removed first; a trailing `;` is
/// optional.
///
/// # Errors
/// [PhyloError::Format] if the string has no comma, unbalanced
/// parentheses, an empty group `()`, an empty leaf, an unclosed comment or
/// an unreadable distance.
pub fn parse(newick: &str) -> Result<Tree> {
    let text = clean(newick)?;

    // Structural checks
    let num_branches = text.bytes().filter(|&b| b == b',').count();
    if num_branches == 0 {
        return Err(PhyloError::format_at(
            0,
            "There is not any comma in the data, input may not be in Newick format",
        ));
    }
    let num_leaves = num_branches + 1;
    let num_nodes = num_leaves + num_branches;
    check_parentheses(&text)?;

    // Labels
    let mut leaf_labels = Vec::with_capacity(num_leaves);
    let mut tokens = Vec::with_capacity(num_nodes + num_branches);
    for caps in LEAF_LABEL.captures_iter(&text) {
        if let Some(run) = caps.get(1) {
            leaf_labels.push(parse_label(run.as_str(), run.start())?);
            tokens.push((run.start(), Token::Leaf));
        }
    }
    if leaf_labels.len() != num_leaves {
        let position = find_empty_leaf(&text).unwrap_or(text.len());
        return Err(PhyloError::format_at(
            position,
            format!("Expected {} leaves but found {}", num_leaves, leaf_labels.len()),
        ));
    }
    let internal_labels = INTERNAL_LABEL
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|run| parse_label(run.as_str(), run.start()))
        .collect::<Result<Vec<Label>>>()?;

    for (position, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => tokens.push((position, Token::Open)),
            b')' => tokens.push((position, Token::Close)),
            _ => {}
        }
    }
    tokens.sort_unstable_by_key(|&(position, _)| position);

    // Automaton
    let mut names = vec![String::new(); num_nodes];
    let mut distances = vec![0.0; num_nodes];
    for (i, label) in leaf_labels.into_iter().enumerate() {
        names[i] = label.name;
        distances[i] = label.distance;
    }

    let mut stack: Vec<usize> = Vec::with_capacity(2 * num_leaves);
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(num_branches);
    let mut next_leaf = 1;
    let mut next_label = 0;
    let mut phantoms = 0;

    let mut cursor = 0;
    while cursor < tokens.len() {
        let (position, token) = tokens[cursor];
        match token {
            Token::Open => stack.push(OPEN_MARKER),
            Token::Leaf => {
                stack.push(next_leaf);
                next_leaf += 1;
            }
            Token::Close => {
                let open = stack
                    .iter()
                    .rposition(|&id| id == OPEN_MARKER)
                    .ok_or_else(|| PhyloError::format_at(position, "Closing parenthesis without opening one"))?;
                let count = (stack.len() - open - 1).min(3);

                match count {
                    0 => {
                        return Err(PhyloError::format_at(position, "Found parenthesis pair with no data"));
                    }
                    1 => {
                        // Redundant parentheses around a single element
                        stack.remove(open);
                        next_label += 1;
                    }
                    _ => {
                        if pairs.len() == num_branches {
                            return Err(PhyloError::format_at(position, "More branches than commas allow"));
                        }
                        let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                            return Err(PhyloError::format_at(position, "Unexpected end of group"));
                        };
                        let id = num_leaves + pairs.len() + 1;
                        pairs.push((left, right));

                        if count == 2 {
                            if let Some(label) = internal_labels.get(next_label) {
                                names[id - 1] = label.name.clone();
                                distances[id - 1] = label.distance;
                            }
                            next_label += 1;
                            // Replace the open marker
                            stack.pop();
                            stack.push(id);
                            trace!(branch = id, left, right, "reduce group");
                        } else {
                            // Join the last two members and reprocess the same parenthesis
                            stack.push(id);
                            phantoms += 1;
                            trace!(branch = id, left, right, "resolve polytomy");
                            continue;
                        }
                    }
                }
            }
        }
        cursor += 1;
    }

    if pairs.len() != num_branches || stack.len() != 1 {
        return Err(PhyloError::format_at(
            text.len(),
            format!(
                "Incomplete tree: created {} of {} branches, {} elements left open",
                pairs.len(),
                num_branches,
                stack.len()
            ),
        ));
    }

    debug!(leaves = num_leaves, branches = num_branches, phantoms, "parsed Newick string");

    let pairs: Vec<(usize, usize)> = pairs.into_iter().map(|(a, b)| (a - 1, b - 1)).collect();
    let mut tree = Tree::from_merges(&pairs, &names, Some(&distances))?;
    // The builder keeps its default for negative entries; written values win
    if distances.iter().any(|d| d.is_nan() || *d < 0.0) {
        tree.overwrite_distances(&distances);
    }
    Ok(tree)
}

/// Removes line breaks and `[...]` comments.
fn clean(newick: &str) -> Result<String> {
    let text: String = newick.chars().filter(|&c| c != '\r' && c != '\n').collect();

    let mut cleaned = String::with_capacity(text.len());
    let mut comment_start = None;
    for (position, c) in text.char_indices() {
        match (c, comment_start) {
            ('[', None) => comment_start = Some(position),
            (']', Some(_)) => comment_start = None,
            (']', None) => {
                return Err(PhyloError::format_at(position, "Closing bracket without opening comment"));
            }
            (_, Some(_)) => {}
            (c, None) => cleaned.push(c),
        }
    }
    if let Some(position) = comment_start {
        return Err(PhyloError::format_at(position, "Unclosed comment"));
    }

    match cleaned.find(|c: char| !c.is_whitespace()) {
        Some(position) if !cleaned[position..].starts_with('(') => Err(PhyloError::format_at(
            position,
            "Newick string must start with an opening parenthesis",
        )),
        _ => Ok(cleaned),
    }
}

/// Fails if the parenthesis balance goes negative or does not end at zero.
fn check_parentheses(text: &str) -> Result<()> {
    let mut unpaired: i64 = 0;
    for (position, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => unpaired += 1,
            b')' => unpaired -= 1,
            _ => {}
        }
        if unpaired < 0 {
            return Err(PhyloError::format_at(position, "The parentheses structure is inconsistent"));
        }
    }
    if unpaired != 0 {
        return Err(PhyloError::format_at(text.len(), "The parentheses structure is inconsistent"));
    }
    Ok(())
}

/// Splits a label run at its last colon into name and distance.
/// Without a colon the whole run is the name.
fn parse_label(run: &str, position: usize) -> Result<Label> {
    match run.rfind(DISTANCE_SEPARATOR) {
        Some(colon) => {
            let value = run[colon + 1..].trim();
            let distance = value.parse::<f64>().map_err(|_| {
                PhyloError::format_at(position + colon + 1, format!("Cannot read distance '{value}'"))
            })?;
            Ok(Label {
                name: run[..colon].trim().to_string(),
                distance,
            })
        }
        None => Ok(Label {
            name: run.trim().to_string(),
            distance: 0.0,
        }),
    }
}

/// Position right after the first `(` or `,` that is not followed by a leaf label.
fn find_empty_leaf(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        if b != b'(' && b != b',' {
            return None;
        }
        let next = bytes[i + 1..].iter().copied().find(|c| !c.is_ascii_whitespace());
        match next {
            None | Some(b',') | Some(b')') | Some(b';') => Some(i + 1),
            _ => None,
        }
    })
}
