//! Node module for phylogenetic tree representation.

use crate::model::tree::NodeIndex;

// =#========================================================================#=
// NODE KIND
// =#========================================================================#=
/// Distinguishes leaves from branches (internal nodes, including the root).
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NodeKind {
    /// Leaf node, has no children
    Leaf,
    /// Internal node with exactly two children
    Branch {
        /// Indices of the two child nodes in the owning tree
        children: (NodeIndex, NodeIndex),
    },
}

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node of a [Tree](crate::model::Tree).
///
/// A node does not own its children; they are referenced by index into the
/// arena of the owning tree.
///
/// # Invariants
/// - `index` is the position of the node in the arena
/// - `distance` (to the parent) is non-negative; the root has distance 0
///   when built from a merge record
/// - `parent` is `None` only for the root
/// - `x` and `y` are layout coordinates, valid after
///   [Tree::validate](crate::model::Tree::validate)
#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    index: NodeIndex,
    name: String,
    distance: f64,
    parent: Option<NodeIndex>,
    kind: NodeKind,
    x: f64,
    y: f64,
}

impl Node {
    /// Creates a new leaf without parent.
    pub fn new_leaf(index: NodeIndex, name: String) -> Self {
        Node {
            index,
            name,
            distance: 0.0,
            parent: None,
            kind: NodeKind::Leaf,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Creates a new branch with the given children and without parent.
    pub fn new_branch(index: NodeIndex, name: String, children: (NodeIndex, NodeIndex)) -> Self {
        Node {
            index,
            name,
            distance: 0.0,
            parent: None,
            kind: NodeKind::Branch { children },
            x: 0.0,
            y: 0.0,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the distance to the parent node.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the index of the parent, `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the children if this is a branch, else `None`.
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self.kind {
            NodeKind::Branch { children } => Some(children),
            NodeKind::Leaf => None,
        }
    }

    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Returns `true` if this node is a branch.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    /// Horizontal layout coordinate: distance from the root's parent.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical layout coordinate: leaf slot, or mean of the children's `y`.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    pub(crate) fn set_parent(&mut self, parent: NodeIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn set_layout(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_leaf() { "Leaf" } else { "Branch" };
        write!(
            f,
            "{}: {} (x: {}, y: {}, distance: {})",
            kind, self.name, self.x, self.y, self.distance
        )
    }
}
