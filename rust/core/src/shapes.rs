// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element sets built from plain coordinate lists.

use crate::element_set::{Coordinate, Element, ElementSet, ElementType};
use crate::error::{Error, Result};

/// One point element per coordinate.
pub fn multi_point(id: &str, coordinates: &[Coordinate], has_z: bool) -> ElementSet {
    let mut set = ElementSet::new(id, ElementType::Point).with_description("Multi point");
    set.has_z = has_z;
    for (i, c) in coordinates.iter().enumerate() {
        let mut element = Element::new(i.to_string());
        element.add_vertex(*c);
        set.add_element(element);
    }
    set
}

/// A line string as an element set.
///
/// Node based: one point element per coordinate. Otherwise one two-vertex
/// polyline element per consecutive coordinate pair; `closed` adds the segment
/// from the last coordinate back to the first.
pub fn line_string(
    id: &str,
    coordinates: &[Coordinate],
    node_based: bool,
    closed: bool,
) -> Result<ElementSet> {
    if node_based {
        let mut set = multi_point(id, coordinates, false);
        set.description = "Line string nodes".into();
        return Ok(set);
    }
    if coordinates.len() < 2 {
        return Err(Error::InvalidShape(format!(
            "line string needs at least 2 coordinates, got {}",
            coordinates.len()
        )));
    }

    let mut set = ElementSet::new(id, ElementType::PolyLine).with_description("Line string");
    let mut add_segment = |i: usize, a: Coordinate, b: Coordinate| {
        let mut element = Element::new(i.to_string());
        element.add_vertex(a);
        element.add_vertex(b);
        set.add_element(element);
    };
    for (i, pair) in coordinates.windows(2).enumerate() {
        add_segment(i, pair[0], pair[1]);
    }
    if closed && coordinates.len() > 2 {
        let n = coordinates.len();
        add_segment(n - 1, coordinates[n - 1], coordinates[0]);
    }
    Ok(set)
}

/// An unstructured mesh of nodes and elements given by node indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpatialMesh {
    pub nodes: Vec<Coordinate>,
    /// Node indices of each element, in ring order.
    pub connectivity: Vec<Vec<usize>>,
    /// Values live on nodes rather than on elements.
    pub node_based: bool,
    pub has_z: bool,
}

impl SpatialMesh {
    pub fn new(nodes: Vec<Coordinate>, connectivity: Vec<Vec<usize>>) -> Self {
        Self {
            nodes,
            connectivity,
            node_based: false,
            has_z: false,
        }
    }

    pub fn node_based(mut self, node_based: bool) -> Self {
        self.node_based = node_based;
        self
    }

    pub fn element_count(&self) -> usize {
        if self.node_based {
            self.nodes.len()
        } else {
            self.connectivity.len()
        }
    }

    /// Node based meshes give one point per node, others one polygon per
    /// connectivity row. Connectivity is checked in both cases.
    pub fn to_element_set(&self, id: &str) -> Result<ElementSet> {
        for (element, row) in self.connectivity.iter().enumerate() {
            if let Some(&node) = row.iter().find(|&&n| n >= self.nodes.len()) {
                return Err(Error::MeshNodeIndex {
                    element,
                    node,
                    node_count: self.nodes.len(),
                });
            }
        }

        if self.node_based {
            let mut set = multi_point(id, &self.nodes, self.has_z);
            set.description = "Mesh nodes".into();
            return Ok(set);
        }

        let mut set = ElementSet::new(id, ElementType::Polygon).with_description("Mesh");
        set.has_z = self.has_z;
        for (i, row) in self.connectivity.iter().enumerate() {
            let mut element = Element::new(i.to_string());
            for &node in row {
                element.add_vertex(self.nodes[node]);
            }
            set.add_element(element);
        }
        Ok(set)
    }
}
