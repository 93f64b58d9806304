//! Provides the binary phylogenetic tree.
//!
//! [Tree] stores all [Node]s in an arena in a fixed order: leaves first
//! (indices `0..num_leaves`), then branches in creation order. Every
//! branch is created after both of its children, so the last branch is
//! the root and a single pass over increasing indices visits children
//! before parents.

use crate::error::{PhyloError, Result};
use crate::model::node::Node;
use std::fmt;

/// Float comparison tolerance
const EPSILON: f64 = 1e-7;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A binary phylogenetic tree represented using the arena pattern on [Node].
///
/// # Structure
/// - `num_leaves` leaves followed by `num_leaves - 1` branches
/// - Children of a branch always have smaller indices than the branch
/// - The last node is the root; a tree with a single leaf has no branch
/// - Layout coordinates are recomputed by [Tree::validate] after edits
///
/// Trees are created by [Tree::from_merges], by
/// [MergeRecord::to_tree](crate::linkage::MergeRecord::to_tree), by the
/// Newick parser or by [Tree::pretty_order].
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Name of tree, may be empty
    name: String,

    /// Number of leaf nodes, which come first in the arena
    num_leaves: usize,

    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Set when names or distances changed since the last layout
    needs_layout: bool,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Assembles a tree from an already linked arena; layout is left pending.
    pub(super) fn from_parts(nodes: Vec<Node>, num_leaves: usize) -> Self {
        Tree {
            name: String::new(),
            num_leaves,
            nodes,
            needs_layout: true,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the name of this tree, empty if never set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames this tree.
    pub fn rename<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Returns the number of branches (internal nodes, root included).
    pub fn num_branches(&self) -> usize {
        self.nodes.len() - self.num_leaves
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the index of the root, the last node of the arena.
    pub fn root_index(&self) -> NodeIndex {
        self.nodes.len() - 1
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &Node {
        &self.nodes[self.root_index()]
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Returns the node at the given index, `None` if out of bounds.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Iterates over all nodes in index order.
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Iterates over the leaves in index order.
    pub fn leaves(&self) -> std::slice::Iter<'_, Node> {
        self.nodes[..self.num_leaves].iter()
    }

    /// Iterates over the branches in creation order.
    pub fn branches(&self) -> std::slice::Iter<'_, Node> {
        self.nodes[self.num_leaves..].iter()
    }

    /// Names of the leaves in index order.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.leaves().map(|n| n.name()).collect()
    }

    /// Returns the index of the parent of `index`.
    ///
    /// The root returns its own index; the only leaf of a single-leaf tree
    /// returns `None`. Out-of-range indices return `None` as well.
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        let node = self.nodes.get(index)?;
        match node.parent() {
            Some(parent) => Some(parent),
            None if node.is_branch() => Some(index),
            None => None,
        }
    }

    /// Sets the distance of a node to its parent and marks the layout stale.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if `index` is out of range or `distance`
    /// is negative or NaN.
    pub fn set_distance(&mut self, index: NodeIndex, distance: f64) -> Result<()> {
        if distance.is_nan() || distance < 0.0 {
            return Err(PhyloError::invalid_input(format!("Distance must be non-negative, got {distance}")));
        }
        self.node_mut(index)?.set_distance(distance);
        self.needs_layout = true;
        Ok(())
    }

    /// Sets the name of a node and marks the layout stale.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if `index` is out of range or `name` is
    /// empty or whitespace only, since such a name reads back as the default.
    pub fn set_name<S: Into<String>>(&mut self, index: NodeIndex, name: S) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PhyloError::invalid_input(format!("Name of node {index} must not be blank")));
        }
        self.node_mut(index)?.set_name(name);
        self.needs_layout = true;
        Ok(())
    }

    /// Overwrites the distance of every node with `distances[index]`, negative
    /// or NaN values included, and refreshes the layout.
    pub(crate) fn overwrite_distances(&mut self, distances: &[f64]) {
        for (node, &distance) in self.nodes.iter_mut().zip(distances) {
            node.set_distance(distance);
        }
        self.needs_layout = true;
        self.validate();
    }

    fn node_mut(&mut self, index: NodeIndex) -> Result<&mut Node> {
        let num_nodes = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or_else(|| PhyloError::invalid_input(format!("Node index {index} out of range (0..{num_nodes})")))
    }

    /// Returns the sum of the distances of all nodes.
    pub fn total_branch_length(&self) -> f64 {
        self.nodes.iter().map(|n| n.distance()).sum()
    }

    /// Distance from the root to every node; the root itself has depth 0.
    pub fn depths(&self) -> Vec<f64> {
        let mut depths = vec![0.0; self.nodes.len()];
        for branch in self.branches().rev() {
            if let Some((c1, c2)) = branch.children() {
                depths[c1] = self.nodes[c1].distance() + depths[branch.index()];
                depths[c2] = self.nodes[c2].distance() + depths[branch.index()];
            }
        }
        depths
    }

    /// Returns the distance of the root to its leaves, assuming the tree is
    /// ultrametric (the maximum over all leaves otherwise).
    pub fn height(&self) -> f64 {
        let depths = self.depths();
        depths[..self.num_leaves].iter().copied().fold(0.0, f64::max)
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from root).
    pub fn is_ultrametric(&self) -> bool {
        let depths = self.depths();
        let leaf_depths = &depths[..self.num_leaves];
        let max = leaf_depths.iter().copied().fold(f64::MIN, f64::max);
        let min = leaf_depths.iter().copied().fold(f64::MAX, f64::min);
        max - min <= EPSILON
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Leaves come first and all indices match their arena position
    /// - Every branch references two distinct children created before it
    /// - Children point back to their parent
    /// - Exactly one node (the last) has no parent
    /// - Distances are non-negative
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.num_leaves == 0 || self.nodes.len() != 2 * self.num_leaves - 1 {
            return false;
        }

        let root = self.root_index();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index || node.is_leaf() != (index < self.num_leaves) {
                return false;
            }

            if node.distance().is_nan() || node.distance() < 0.0 {
                return false;
            }

            // Check children references
            if let Some((left, right)) = node.children() {
                if left == right || left >= index || right >= index {
                    return false;
                }
                if self.nodes[left].parent() != Some(index) || self.nodes[right].parent() != Some(index) {
                    return false;
                }
            }

            // Check parent references
            match node.parent() {
                None if index != root => return false,
                Some(_) if index == root => return false,
                Some(parent) => match self.nodes.get(parent).and_then(|p| p.children()) {
                    Some((left, right)) if left == index || right == index => {}
                    _ => return false,
                },
                None => {}
            }
        }

        true
    }
}

impl std::ops::Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Layout (pub)
// ============================================================================
impl Tree {
    /// Returns `true` if names or distances changed since the last layout.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Recomputes the layout coordinates if they are stale.
    ///
    /// `x` of a node is its own distance plus the `x` of its parent, so the
    /// root sits at its own distance. Leaf `i` gets `y = i` and a branch the
    /// mean `y` of its children.
    pub fn validate(&mut self) {
        if !self.needs_layout {
            return;
        }

        let mut x: Vec<f64> = self.nodes.iter().map(|n| n.distance()).collect();
        let mut y = vec![0.0; self.nodes.len()];

        for index in (self.num_leaves..self.nodes.len()).rev() {
            if let Some((c1, c2)) = self.nodes[index].children() {
                x[c1] += x[index];
                x[c2] += x[index];
            }
        }
        for (index, slot) in y.iter_mut().enumerate().take(self.num_leaves) {
            *slot = index as f64;
        }
        for index in self.num_leaves..self.nodes.len() {
            if let Some((c1, c2)) = self.nodes[index].children() {
                y[index] = (y[c1] + y[c2]) / 2.0;
            }
        }

        for (node, (x, y)) in self.nodes.iter_mut().zip(x.into_iter().zip(y)) {
            node.set_layout(x, y);
        }
        self.needs_layout = false;
    }

    /// Maximum `x` over the leaves.
    pub fn max_x(&self) -> f64 {
        self.leaves().map(|n| n.x()).fold(f64::MIN, f64::max)
    }

    /// Maximum `y` over the leaves.
    pub fn max_y(&self) -> f64 {
        self.leaves().map(|n| n.y()).fold(f64::MIN, f64::max)
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Renders an indented view of the tree.
///
/// # Example Output
/// ```text
/// Tree "example" with 3 leaves (5 nodes total):
/// [4] Branch "1" (distance: 0.000)
///   ├─ [2] Leaf "C" (distance: 0.400)
///   └─ [3] Branch "0" (distance: 0.300)
///      ├─ [0] Leaf "A" (distance: 0.100)
///      └─ [1] Leaf "B" (distance: 0.100)
/// ```
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Tree \"{}\" with {} leaves ({} nodes total):",
            self.name,
            self.num_leaves,
            self.nodes.len()
        )?;
        self.fmt_node(f, self.root_index(), "", true)
    }
}

impl Tree {
    /// Helper function to recursively render a node and its children.
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, index: NodeIndex, prefix: &str, is_last: bool) -> fmt::Result {
        let node = &self.nodes[index];

        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        let kind = if node.is_leaf() { "Leaf" } else { "Branch" };
        writeln!(
            f,
            "{}{}[{}] {} \"{}\" (distance: {:.3})",
            prefix,
            connector,
            index,
            kind,
            node.name(),
            node.distance()
        )?;

        if let Some((left, right)) = node.children() {
            let new_prefix = if prefix.is_empty() {
                "  ".to_string()
            } else {
                format!("{}{}  ", prefix, if is_last { " " } else { "│" })
            };
            self.fmt_node(f, left, &new_prefix, false)?;
            self.fmt_node(f, right, &new_prefix, true)?;
        }
        Ok(())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// # Example
    /// ```
    /// use phylowick::model::Tree;
    ///
    /// let tree = Tree::from_merges(&[(0, 1)], &[], None).unwrap();
    /// let indices: Vec<_> = tree.post_order_iter().map(|n| n.index()).collect();
    /// assert_eq!(indices, vec![0, 1, 2]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// use phylowick::model::Tree;
    ///
    /// let tree = Tree::from_merges(&[(0, 1)], &[], None).unwrap();
    /// let indices: Vec<_> = tree.pre_order_iter().map(|n| n.index()).collect();
    /// assert_eq!(indices, vec![2, 0, 1]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Uses an explicit stack instead of recursion.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(tree.root_index(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            match node.children() {
                Some((left, right)) if !children_visited => {
                    self.stack.push((index, true));
                    // Right first, so left is processed first
                    self.stack.push((right, false));
                    self.stack.push((left, false));
                }
                _ => return Some(node),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PreOrderIter {
            tree,
            stack: vec![tree.root_index()],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }

        Some(node)
    }
}
