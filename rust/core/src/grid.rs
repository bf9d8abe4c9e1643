// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured 2D grids and their element-set form.
//!
//! A grid is either node based (one point element per grid node) or cell based
//! (one quadrilateral polygon per cell). Elements are numbered row by row:
//! `index = k * x_count + j`, with `j` running along the grid x-axis. Cell
//! vertices are emitted lower-left, lower-right, upper-right, upper-left so
//! that an unrotated grid yields counter-clockwise polygons.

use crate::element_set::{Coordinate, Element, ElementSet, ElementType};
use crate::error::{Error, Result};

/// Grid node offsets of the four cell corners, counter-clockwise.
const CELL_CORNERS: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// A regular grid with constant spacing, optionally rotated about its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
    /// Number of elements along the grid x-axis.
    pub x_count: usize,
    /// Number of elements along the grid y-axis.
    pub y_count: usize,
    /// `true`: elements are grid nodes. `false`: elements are cells.
    pub node_based: bool,
    orientation: f64,
    rotation: [[f64; 2]; 2],
}

impl RegularGrid {
    /// Creates an unrotated cell-based grid.
    pub fn new(x0: f64, y0: f64, dx: f64, dy: f64, x_count: usize, y_count: usize) -> Self {
        Self {
            x0,
            y0,
            dx,
            dy,
            x_count,
            y_count,
            node_based: false,
            orientation: 0.0,
            rotation: [[1.0, 0.0], [0.0, 1.0]],
        }
    }

    /// Switches between node- and cell-based elements.
    pub fn node_based(mut self, node_based: bool) -> Self {
        self.node_based = node_based;
        self
    }

    /// Sets the clockwise rotation of the grid y-axis from north, in degrees.
    pub fn with_orientation(mut self, degrees: f64) -> Self {
        self.set_orientation(degrees);
        self
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn set_orientation(&mut self, degrees: f64) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.orientation = degrees;
        self.rotation = [[cos, sin], [-sin, cos]];
    }

    pub fn element_count(&self) -> usize {
        self.x_count * self.y_count
    }

    /// World coordinate of grid node `(j, k)`.
    pub fn coordinate(&self, j: usize, k: usize) -> Coordinate {
        let gx = j as f64 * self.dx;
        let gy = k as f64 * self.dy;
        let r = &self.rotation;
        Coordinate::new(
            self.x0 + r[0][0] * gx + r[0][1] * gy,
            self.y0 + r[1][0] * gx + r[1][1] * gy,
        )
    }

    /// Materialises the grid as an element set.
    pub fn to_element_set(&self, id: &str) -> Result<ElementSet> {
        if self.dx <= 0.0 || self.dy <= 0.0 {
            return Err(Error::InvalidShape(format!(
                "grid spacing must be positive, got dx={} dy={}",
                self.dx, self.dy
            )));
        }
        let element_type = if self.node_based {
            ElementType::Point
        } else {
            ElementType::Polygon
        };
        let mut set = ElementSet::new(id, element_type).with_description("Regular grid");
        for k in 0..self.y_count {
            for j in 0..self.x_count {
                set.add_element(grid_element(j, k, self.node_based, |jv, kv| {
                    Ok(self.coordinate(jv, kv))
                })?);
            }
        }
        Ok(set)
    }
}

/// A curvilinear grid given by explicit node coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvilinearGrid {
    /// Node coordinates indexed `[j][k]`.
    pub nodes: Vec<Vec<Coordinate>>,
    pub node_based: bool,
}

impl CurvilinearGrid {
    /// Creates a grid from node columns. All columns must have the same length.
    pub fn new(nodes: Vec<Vec<Coordinate>>, node_based: bool) -> Result<Self> {
        let y_nodes = nodes.first().map_or(0, Vec::len);
        if let Some((j, col)) = nodes.iter().enumerate().find(|(_, c)| c.len() != y_nodes) {
            return Err(Error::InvalidShape(format!(
                "node column {} has {} nodes, expected {}",
                j,
                col.len(),
                y_nodes
            )));
        }
        Ok(Self { nodes, node_based })
    }

    fn x_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn y_nodes(&self) -> usize {
        self.nodes.first().map_or(0, Vec::len)
    }

    pub fn x_count(&self) -> usize {
        if self.node_based {
            self.x_nodes()
        } else {
            self.x_nodes().saturating_sub(1)
        }
    }

    pub fn y_count(&self) -> usize {
        if self.node_based {
            self.y_nodes()
        } else {
            self.y_nodes().saturating_sub(1)
        }
    }

    pub fn element_count(&self) -> usize {
        self.x_count() * self.y_count()
    }

    pub fn coordinate(&self, j: usize, k: usize) -> Result<Coordinate> {
        self.nodes
            .get(j)
            .and_then(|col| col.get(k))
            .copied()
            .ok_or(Error::GridIndex {
                j,
                k,
                x_nodes: self.x_nodes(),
                y_nodes: self.y_nodes(),
            })
    }

    pub fn to_element_set(&self, id: &str) -> Result<ElementSet> {
        let element_type = if self.node_based {
            ElementType::Point
        } else {
            ElementType::Polygon
        };
        let mut set = ElementSet::new(id, element_type).with_description("Curvilinear grid");
        for k in 0..self.y_count() {
            for j in 0..self.x_count() {
                set.add_element(grid_element(j, k, self.node_based, |jv, kv| {
                    self.coordinate(jv, kv)
                })?);
            }
        }
        Ok(set)
    }
}

fn grid_element(
    j: usize,
    k: usize,
    node_based: bool,
    node: impl Fn(usize, usize) -> Result<Coordinate>,
) -> Result<Element> {
    let mut element = Element::new(format!("{}_{}", j, k));
    if node_based {
        element.add_vertex(node(j, k)?);
    } else {
        for (dj, dk) in CELL_CORNERS {
            element.add_vertex(node(j + dj, k + dk)?);
        }
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-12;

    fn rotated(node_based: bool) -> RegularGrid {
        RegularGrid::new(10.0, 20.0, 2.0, 4.0, 4, 3)
            .node_based(node_based)
            .with_orientation(30.0)
    }

    #[test]
    fn test_node_grid() {
        let set = rotated(true).to_element_set("nodes").unwrap();
        let (s, c) = 30f64.to_radians().sin_cos();

        assert_eq!(set.element_type(), ElementType::Point);
        assert_eq!(set.element_count(), 12);
        assert_eq!(set.vertex_count(11).unwrap(), 1);
        assert_abs_diff_eq!(set.vertex_x(0, 0).unwrap(), 10.0, epsilon = TOL);
        assert_abs_diff_eq!(set.vertex_x(3, 0).unwrap(), 10.0 + c * 6.0, epsilon = TOL);
        assert_abs_diff_eq!(set.vertex_y(3, 0).unwrap(), 20.0 - s * 6.0, epsilon = TOL);
        assert_abs_diff_eq!(set.vertex_x(8, 0).unwrap(), 10.0 + s * 8.0, epsilon = TOL);
        assert_abs_diff_eq!(set.vertex_y(8, 0).unwrap(), 20.0 + c * 8.0, epsilon = TOL);
    }

    #[test]
    fn test_cell_grid() {
        let set = rotated(false).to_element_set("cells").unwrap();
        let (s, c) = 30f64.to_radians().sin_cos();

        assert_eq!(set.element_type(), ElementType::Polygon);
        assert_eq!(set.element_count(), 12);
        assert_eq!(set.vertex_count(0).unwrap(), 4);

        // Last cell: j = 3, k = 2
        let expected = [
            (6.0, 8.0),
            (8.0, 8.0),
            (8.0, 12.0),
            (6.0, 12.0),
        ];
        for (v, (gx, gy)) in expected.iter().enumerate() {
            let (x, y) = (set.vertex_x(11, v).unwrap(), set.vertex_y(11, v).unwrap());
            assert_abs_diff_eq!(x, 10.0 + c * gx + s * gy, epsilon = TOL);
            assert_abs_diff_eq!(y, 20.0 - s * gx + c * gy, epsilon = TOL);
        }
    }

    #[test]
    fn test_curvilinear_cells() {
        let col = |x: f64, ys: &[f64]| ys.iter().map(|&y| Coordinate::new(x, y)).collect();
        let grid = CurvilinearGrid::new(
            vec![col(0.0, &[0.0, 5.0, 12.0]), col(5.0, &[0.0, 5.0, 12.0])],
            false,
        )
        .unwrap();
        let set = grid.to_element_set("curvi").unwrap();
        assert_eq!(set.element_count(), 2);
        assert_eq!(set.vertex(1, 2).unwrap(), Coordinate::new(5.0, 12.0));
    }

    #[test]
    fn test_curvilinear_ragged() {
        let grid = CurvilinearGrid::new(
            vec![vec![Coordinate::new(0.0, 0.0)], vec![]],
            true,
        );
        assert!(matches!(grid, Err(Error::InvalidShape(_))));
    }
}
