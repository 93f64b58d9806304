//! Configuration of the sequences-to-tree pipeline.

use crate::distance::{DistanceModel, DistanceOptions};
use crate::linkage::LinkageMethod;
use serde::{Deserialize, Serialize};

/// Settings for [build_tree](crate::build_tree).
///
/// The default computes Jukes-Cantor distances with pairwise deletion of
/// double gaps, clusters with average linkage (UPGMA) and reorders the
/// leaves of the result with [Tree::pretty_order](crate::model::Tree::pretty_order).
///
/// # Example
/// ```
/// use phylowick::config::TreeConfig;
/// use phylowick::distance::DistanceModel;
/// use phylowick::linkage::LinkageMethod;
///
/// let config = TreeConfig::new()
///     .with_model(DistanceModel::PDistance)
///     .with_linkage(LinkageMethod::Single)
///     .with_pretty_order(false);
/// assert_eq!(config.distance.model, DistanceModel::PDistance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub distance: DistanceOptions,
    pub linkage: LinkageMethod,
    pub pretty_order: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            distance: DistanceOptions::new().with_model(DistanceModel::JukesCantor),
            linkage: LinkageMethod::Average,
            pretty_order: true,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance(mut self, distance: DistanceOptions) -> Self {
        self.distance = distance;
        self
    }

    /// Replaces only the distance model, keeping the gap policy.
    pub fn with_model(mut self, model: DistanceModel) -> Self {
        self.distance.model = model;
        self
    }

    pub fn with_linkage(mut self, linkage: LinkageMethod) -> Self {
        self.linkage = linkage;
        self
    }

    pub fn with_pretty_order(mut self, pretty_order: bool) -> Self {
        self.pretty_order = pretty_order;
        self
    }
}
