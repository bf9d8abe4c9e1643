// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quadtree over element extents for candidate lookup.
//!
//! The tree is shaped by points first and filled with elements second:
//!
//! 1. the root covers the extent of every vertex in the element set,
//! 2. every distinct vertex is added as a point; a leaf holding more than
//!    `max_points_per_node` points splits into four equal quadrants,
//! 3. every element is added, with its own extent, to each leaf it overlaps.
//!
//! Once an element is in the tree its shape is frozen and further points
//! are refused. Queries return a superset of the elements whose extents
//! overlap the query extent; callers still run the exact geometric test.

use rustc_hash::FxHashSet;
use tidelink_core::ElementSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extent::XYExtent;
use crate::primitives::element_extent;

/// Default leaf capacity before a split.
pub const DEFAULT_MAX_POINTS_PER_NODE: usize = 10;

// Quadrants narrower than this stop splitting.
const MAX_DEPTH: usize = 48;

#[derive(Debug, Clone)]
struct Node {
    extent: XYExtent,
    depth: usize,
    /// NE, NW, SW, SE
    children: Option<[usize; 4]>,
    points: Vec<(f64, f64)>,
    elements: Vec<(usize, XYExtent)>,
}

impl Node {
    fn leaf(extent: XYExtent, depth: usize) -> Self {
        Self {
            extent,
            depth,
            children: None,
            points: Vec::new(),
            elements: Vec::new(),
        }
    }
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Number of levels, the root alone being depth 1.
    pub depth: usize,
    pub node_count: usize,
    /// Largest number of element entries held by a single leaf.
    pub max_elements_in_node: usize,
    pub point_count: usize,
    pub element_count: usize,
}

/// Quadtree index of element extents.
#[derive(Debug, Clone)]
pub struct XYElementSearchTree {
    nodes: Vec<Node>,
    max_points_per_node: usize,
    point_count: usize,
    element_count: usize,
}

impl XYElementSearchTree {
    /// An empty tree covering `extent`.
    pub fn new(extent: XYExtent, max_points_per_node: usize) -> Self {
        Self {
            nodes: vec![Node::leaf(extent, 1)],
            max_points_per_node: max_points_per_node.max(1),
            point_count: 0,
            element_count: 0,
        }
    }

    /// Builds the tree for every element of `set`.
    pub fn build(set: &ElementSet, max_points_per_node: usize) -> Result<Self> {
        let mut extent = XYExtent::empty();
        for element in set.elements() {
            for v in &element.vertices {
                extent.include(v.x, v.y);
            }
        }

        let mut tree = Self::new(extent, max_points_per_node);
        for element in set.elements() {
            for v in &element.vertices {
                tree.add_point(v.x, v.y)?;
            }
        }
        for i in 0..set.element_count() {
            tree.add_element(i, element_extent(set, i)?);
        }

        let stats = tree.stats();
        debug!(
            set = %set.id,
            elements = stats.element_count,
            points = stats.point_count,
            nodes = stats.node_count,
            depth = stats.depth,
            max_elements_in_node = stats.max_elements_in_node,
            "Built element search tree"
        );
        Ok(tree)
    }

    pub fn extent(&self) -> &XYExtent {
        &self.nodes[0].extent
    }

    pub fn max_points_per_node(&self) -> usize {
        self.max_points_per_node
    }

    /// Adds a point to shape the tree.
    ///
    /// Returns `Ok(false)` when the point lies outside the root extent or is
    /// already present. Fails once any element has been added.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<bool> {
        if self.element_count > 0 {
            return Err(Error::TreeHasElements);
        }
        if !self.nodes[0].extent.contains(x, y) {
            return Ok(false);
        }

        let leaves = self.leaves_containing(x, y);
        if leaves
            .iter()
            .any(|&leaf| self.nodes[leaf].points.contains(&(x, y)))
        {
            return Ok(false);
        }

        for leaf in leaves {
            self.nodes[leaf].points.push((x, y));
            self.split_if_full(leaf);
        }
        self.point_count += 1;
        Ok(true)
    }

    /// Adds an element index with its extent to every overlapping leaf.
    pub fn add_element(&mut self, index: usize, extent: XYExtent) {
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            if !node.extent.overlaps(&extent) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => node.elements.push((index, extent)),
            }
        }
        self.element_count += 1;
    }

    /// Element indices whose extents overlap `extent`, ascending and unique.
    pub fn find_elements(&self, extent: &XYExtent) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.extent.overlaps(extent) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => seen.extend(
                    node.elements
                        .iter()
                        .filter(|(_, e)| e.overlaps(extent))
                        .map(|&(i, _)| i),
                ),
            }
        }
        let mut found: Vec<usize> = seen.into_iter().collect();
        found.sort_unstable();
        found
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            node_count: self.nodes.len(),
            max_elements_in_node: self
                .nodes
                .iter()
                .map(|n| n.elements.len())
                .max()
                .unwrap_or(0),
            point_count: self.point_count,
            element_count: self.element_count,
        }
    }

    fn leaves_containing(&self, x: f64, y: f64) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.extent.contains(x, y) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => leaves.push(id),
            }
        }
        leaves
    }

    fn split_if_full(&mut self, id: usize) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id];
            if node.children.is_some()
                || node.points.len() <= self.max_points_per_node
                || node.depth >= MAX_DEPTH
            {
                continue;
            }

            let e = node.extent;
            let depth = node.depth + 1;
            let (mx, my) = e.mid();
            let quadrants = [
                XYExtent::new(mx, e.x_max, my, e.y_max),
                XYExtent::new(e.x_min, mx, my, e.y_max),
                XYExtent::new(e.x_min, mx, e.y_min, my),
                XYExtent::new(mx, e.x_max, e.y_min, my),
            ];
            let points = std::mem::take(&mut self.nodes[id].points);

            let first = self.nodes.len();
            for quadrant in quadrants {
                let mut child = Node::leaf(quadrant, depth);
                child.points = points
                    .iter()
                    .copied()
                    .filter(|&(x, y)| quadrant.contains(x, y))
                    .collect();
                self.nodes.push(child);
            }
            let children = [first, first + 1, first + 2, first + 3];
            self.nodes[id].children = Some(children);
            pending.extend(children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidelink_core::{Element, ElementType, RegularGrid};

    fn unit_squares(n: usize) -> ElementSet {
        RegularGrid::new(0.0, 0.0, 1.0, 1.0, n, n)
            .to_element_set("cells")
            .unwrap()
    }

    #[test]
    fn root_only_until_capacity_is_exceeded() {
        let mut tree = XYElementSearchTree::new(XYExtent::new(0.0, 4.0, 0.0, 4.0), 4);
        for i in 0..4 {
            assert!(tree.add_point(i as f64, 1.0).unwrap());
        }
        assert_eq!(tree.stats().node_count, 1);

        assert!(tree.add_point(3.0, 3.0).unwrap());
        let stats = tree.stats();
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.point_count, 5);
    }

    #[test]
    fn duplicate_and_outside_points_are_ignored() {
        let mut tree = XYElementSearchTree::new(XYExtent::new(0.0, 1.0, 0.0, 1.0), 10);
        assert!(tree.add_point(0.5, 0.5).unwrap());
        assert!(!tree.add_point(0.5, 0.5).unwrap());
        assert!(!tree.add_point(2.0, 0.5).unwrap());
        assert_eq!(tree.stats().point_count, 1);
    }

    #[test]
    fn points_are_refused_after_elements() {
        let mut tree = XYElementSearchTree::new(XYExtent::new(0.0, 1.0, 0.0, 1.0), 10);
        tree.add_element(0, XYExtent::new(0.0, 1.0, 0.0, 1.0));
        assert!(matches!(
            tree.add_point(0.5, 0.5),
            Err(Error::TreeHasElements)
        ));
    }

    #[test]
    fn grid_build_and_query() {
        let set = unit_squares(8);
        let tree = XYElementSearchTree::build(&set, DEFAULT_MAX_POINTS_PER_NODE).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.element_count, 64);
        assert_eq!(stats.point_count, 81);
        assert!(stats.depth > 1);

        // Interior of cell (2, 3) only
        let found = tree.find_elements(&XYExtent::new(2.25, 2.75, 3.25, 3.75));
        let expected = set.element_index("2_3").unwrap();
        assert_eq!(found, vec![expected]);

        // A shared corner touches four cells
        let corner = tree.find_elements(&XYExtent::around_point(
            &nalgebra::Point2::new(4.0, 4.0),
            1e-5,
        ));
        assert_eq!(corner.len(), 4);
    }

    #[test]
    fn empty_set_builds_a_single_leaf() {
        let set = ElementSet::new("empty", ElementType::Polygon);
        let tree = XYElementSearchTree::build(&set, 10).unwrap();
        assert_eq!(tree.stats().node_count, 1);
        assert!(tree.find_elements(&XYExtent::new(0.0, 1.0, 0.0, 1.0)).is_empty());
    }

    #[test]
    fn element_spanning_leaves_is_reported_once() {
        let mut set = unit_squares(6);
        set.add_element(Element::from_xy(
            "big",
            &[(0.5, 0.5), (5.5, 0.5), (5.5, 5.5), (0.5, 5.5)],
        ));
        let tree = XYElementSearchTree::build(&set, 4).unwrap();
        let found = tree.find_elements(&XYExtent::new(0.0, 6.0, 0.0, 6.0));
        assert_eq!(found.len(), 37);
        assert_eq!(found.iter().filter(|&&i| i == 36).count(), 1);
    }
}
