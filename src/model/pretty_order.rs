//! Leaf reordering that avoids crossing branches in a drawing.

use crate::error::Result;
use crate::model::tree::Tree;
use tracing::debug;

impl Tree {
    /// Returns a new tree whose leaves are permuted so that, drawn with leaf
    /// `i` at row `i`, no branches cross.
    ///
    /// Each branch owns a contiguous range of leaf slots. Its two children
    /// split that range, and the child reaching deeper from the root takes
    /// the upper end. Branches keep their index, name and distance; leaves
    /// keep name and distance but move to their new slot. The tree itself
    /// is not modified.
    ///
    /// # Errors
    /// Only fails if this tree violates the arena invariants, which trees
    /// built by this crate never do.
    ///
    /// # Example
    /// ```
    /// use phylowick::newick;
    ///
    /// let tree = newick::parse_str("(C:2,(A:1,B:1):1);").unwrap();
    /// let ordered = tree.pretty_order().unwrap();
    /// assert_eq!(ordered.leaf_names(), vec!["A", "B", "C"]);
    /// ```
    pub fn pretty_order(&self) -> Result<Tree> {
        let num_leaves = self.num_leaves();
        let num_nodes = self.num_nodes();

        let mut leaf_counts = vec![1usize; num_nodes];
        for branch in self.branches() {
            if let Some((c1, c2)) = branch.children() {
                leaf_counts[branch.index()] = leaf_counts[c1] + leaf_counts[c2];
            }
        }

        let depths = self.depths();

        // Half-open leaf slot range [lower, upper) of every node
        let mut lower = vec![0usize; num_nodes];
        let mut upper = vec![0usize; num_nodes];
        upper[self.root_index()] = num_leaves;
        for branch in self.branches().rev() {
            let Some((c1, c2)) = branch.children() else {
                continue;
            };
            let index = branch.index();
            for c in [c1, c2] {
                lower[c] = lower[index];
                upper[c] = upper[index];
            }
            if depths[c2] >= depths[c1] {
                upper[c1] = lower[c1] + leaf_counts[c1];
                lower[c2] = upper[c2] - leaf_counts[c2];
            } else {
                upper[c2] = lower[c2] + leaf_counts[c2];
                lower[c1] = upper[c1] - leaf_counts[c1];
            }
        }

        // Leaf i moves to slot lower[i]; branches stay where they are
        let slot = |index: usize| if index < num_leaves { lower[index] } else { index };

        let mut names = vec![String::new(); num_nodes];
        let mut distances = vec![0.0; num_nodes];
        for node in self.nodes() {
            names[slot(node.index())] = node.name().to_string();
            distances[slot(node.index())] = node.distance();
        }
        let pairs: Vec<(usize, usize)> = self
            .branches()
            .filter_map(|b| b.children())
            .map(|(c1, c2)| (slot(c1), slot(c2)))
            .collect();

        debug!(leaves = num_leaves, "pretty order");

        Ok(Tree::from_merges(&pairs, &names, Some(&distances))?.with_name(self.name()))
    }
}
