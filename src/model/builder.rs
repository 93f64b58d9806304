//! Construction of a [Tree] from a merge encoding.
//!
//! A tree with `n` leaves is described by `n - 1` rows of 0-based child
//! indices. Leaves are `0..n`; row `b` creates branch `n + b`. Names and
//! distances are optional overlays on top of the defaults.

use crate::error::{PhyloError, Result};
use crate::model::node::Node;
use crate::model::tree::{NodeIndex, Tree};

impl Tree {
    /// Builds a tree from merge pairs, optional names and optional distances.
    ///
    /// # Arguments
    /// * `pairs` - One row per branch holding its two 0-based children, in
    ///   creation order; children must be created before the branch
    /// * `names` - Node names by index; empty entries keep the default names
    ///   `"0".."n-1"` for leaves and `"0".."n-2"` for branches
    /// * `distances` - Either one distance per node (negative entries keep
    ///   the default), or one absolute merge height per branch, from which
    ///   an ultrametric tree is derived. `None` gives every node the
    ///   difference of topological levels to its parent.
    ///
    /// # Errors
    /// [PhyloError::InvalidInput] if a pair references a node that does not
    /// exist yet or is already a child, if there are more names than nodes,
    /// or if `distances` matches neither length.
    ///
    /// # Example
    /// ```
    /// use phylowick::model::Tree;
    ///
    /// let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    /// let tree = Tree::from_merges(&[(0, 1), (2, 3)], &names, Some(&[1.0, 3.0])).unwrap();
    ///
    /// assert_eq!(tree.num_nodes(), 5);
    /// assert_eq!(tree[0].distance(), 1.0);
    /// assert_eq!(tree[2].distance(), 3.0);
    /// assert_eq!(tree[3].distance(), 2.0);
    /// assert!(tree.is_ultrametric());
    /// ```
    pub fn from_merges(pairs: &[(NodeIndex, NodeIndex)], names: &[String], distances: Option<&[f64]>) -> Result<Tree> {
        let num_branches = pairs.len();
        let num_leaves = num_branches + 1;
        let num_nodes = num_leaves + num_branches;

        let mut nodes: Vec<Node> = Vec::with_capacity(num_nodes);
        for i in 0..num_leaves {
            nodes.push(Node::new_leaf(i, i.to_string()));
        }

        // Topological levels, children always precede their parent
        let mut levels = vec![0usize; num_nodes];
        for (row, &(c1, c2)) in pairs.iter().enumerate() {
            let index = num_leaves + row;
            for child in [c1, c2] {
                if child >= index {
                    return Err(PhyloError::invalid_input(format!(
                        "Incorrect element in merge pairs at row {row}: node {child} is not created before node {index}"
                    )));
                }
                if nodes[child].parent().is_some() || c1 == c2 {
                    return Err(PhyloError::invalid_input(format!(
                        "Incorrect element in merge pairs at row {row}: node {child} already has a parent"
                    )));
                }
                nodes[child].set_parent(index);
            }
            levels[index] = levels[c1].max(levels[c2]) + 1;
            nodes.push(Node::new_branch(index, row.to_string(), (c1, c2)));
        }

        let root = num_nodes - 1;
        for node in nodes.iter_mut() {
            let parent = node.parent().unwrap_or(root);
            node.set_distance((levels[parent] - levels[node.index()]) as f64);
        }

        if names.len() > num_nodes {
            return Err(PhyloError::invalid_input(format!(
                "Got {} names for a tree with {num_nodes} nodes",
                names.len()
            )));
        }
        for (node, name) in nodes.iter_mut().zip(names) {
            if !name.is_empty() {
                node.set_name(name.clone());
            }
        }

        match distances {
            None => {}
            Some(dist) if dist.len() == num_nodes => {
                for (node, &d) in nodes.iter_mut().zip(dist) {
                    if d >= 0.0 {
                        node.set_distance(d);
                    }
                }
            }
            Some(heights) if heights.len() == num_branches => {
                assign_merge_heights(&mut nodes, pairs, heights, num_leaves);
            }
            Some(dist) => {
                return Err(PhyloError::invalid_input(format!(
                    "Length of distances ({}) must equal the number of nodes ({num_nodes}) or branches ({num_branches})",
                    dist.len()
                )));
            }
        }

        let mut tree = Tree::from_parts(nodes, num_leaves);
        tree.validate();
        Ok(tree)
    }
}

/// Converts absolute merge heights into distances to the parent.
///
/// Relies on branches being created in increasing merge order: a child's
/// absolute height is stored before its parent converts it.
fn assign_merge_heights(nodes: &mut [Node], pairs: &[(NodeIndex, NodeIndex)], heights: &[f64], num_leaves: usize) {
    for leaf in nodes[..num_leaves].iter_mut() {
        leaf.set_distance(0.0);
    }
    for (b, &h) in heights.iter().enumerate() {
        if h >= 0.0 {
            nodes[num_leaves + b].set_distance(h);
        }
    }
    for (b, &(c1, c2)) in pairs.iter().enumerate() {
        for child in [c1, c2] {
            let absolute = nodes[child].distance();
            nodes[child].set_distance(heights[b] - absolute);
        }
    }
    if let Some(root) = nodes[num_leaves..].last_mut() {
        root.set_distance(0.0);
    }
}
