//! Data model for binary phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Node]s referenced by [NodeIndex]. Each node is either a leaf or a
//! branch with exactly two children ([NodeKind]).
//!
//! | Indices | Nodes |
//! |---------|-------|
//! | `0..n` | leaves, in input order |
//! | `n..2n-1` | branches, in creation order; the last one is the root |
//!
//! # Building trees
//! - [Tree::from_merges] from 0-based merge pairs, names and distances
//! - [MergeRecord::to_tree](crate::linkage::MergeRecord::to_tree) from a clustering
//! - [crate::newick::parse_str] from Newick text
//! - [Tree::pretty_order] from another tree, with leaves reordered

pub mod builder;
pub mod node;
pub mod pretty_order;
pub mod tree;

pub use node::{Node, NodeKind};
pub use tree::{NodeIndex, PostOrderIter, PreOrderIter, Tree};
