// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapper configuration loaded from environment variables.

use tidelink_geometry::DEFAULT_MAX_POINTS_PER_NODE;

/// Tuning knobs for matrix construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperConfig {
    /// Use the search tree for polygon sources.
    pub use_search_tree: bool,
    /// The tree is only built when both element counts exceed this.
    pub search_tree_threshold: usize,
    /// Leaf capacity of the search tree.
    pub max_points_per_node: usize,
}

impl MapperConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let standard = Self::standard();
        Self {
            use_search_tree: std::env::var("TIDELINK_USE_SEARCH_TREE")
                .map(|v| parse_flag(&v).unwrap_or(standard.use_search_tree))
                .unwrap_or(standard.use_search_tree),
            search_tree_threshold: std::env::var("TIDELINK_SEARCH_TREE_THRESHOLD")
                .unwrap_or_else(|_| standard.search_tree_threshold.to_string())
                .parse()
                .unwrap_or(standard.search_tree_threshold),
            max_points_per_node: std::env::var("TIDELINK_MAX_POINTS_PER_NODE")
                .unwrap_or_else(|_| standard.max_points_per_node.to_string())
                .parse()
                .unwrap_or(standard.max_points_per_node),
        }
    }

    /// Built-in defaults, ignoring the environment.
    pub const fn standard() -> Self {
        Self {
            use_search_tree: true,
            search_tree_threshold: 10,
            max_points_per_node: DEFAULT_MAX_POINTS_PER_NODE,
        }
    }

    /// Whether a mapping between sets of these sizes should use the tree.
    pub fn tree_applies(&self, from_count: usize, to_count: usize) -> bool {
        self.use_search_tree
            && from_count > self.search_tree_threshold
            && to_count > self.search_tree_threshold
    }

    pub fn with_search_tree(mut self, enabled: bool) -> Self {
        self.use_search_tree = enabled;
        self
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
