// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar geometry values derived from element sets.
//!
//! These are built on demand while a mapping is constructed and carry no
//! identity beyond that; the element set remains the source of truth.

use nalgebra::Point2;
use tidelink_core::{ElementSet, ElementType};

use crate::error::{Error, Result};
use crate::extent::XYExtent;

/// A planar point.
pub type XYPoint = Point2<f64>;

/// A line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XYLine {
    pub p1: XYPoint,
    pub p2: XYPoint,
}

impl XYLine {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            p1: Point2::new(x1, y1),
            p2: Point2::new(x2, y2),
        }
    }

    pub fn from_points(p1: XYPoint, p2: XYPoint) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.p1, &self.p2)
    }

    pub fn midpoint(&self) -> XYPoint {
        nalgebra::center(&self.p1, &self.p2)
    }

    pub fn extent(&self) -> XYExtent {
        XYExtent::from_points([&self.p1, &self.p2])
    }
}

/// An open chain of line segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XYPolyline {
    pub points: Vec<XYPoint>,
}

impl XYPolyline {
    pub fn new(points: Vec<XYPoint>) -> Self {
        Self { points }
    }

    /// Reads a polyline element. The element set must hold polylines.
    pub fn from_element(set: &ElementSet, index: usize) -> Result<Self> {
        if set.element_type() != ElementType::PolyLine {
            return Err(Error::ElementType {
                shape: "XYPolyline",
                found: set.element_type(),
            });
        }
        Ok(Self::new(element_points(set, index)?))
    }

    pub fn line_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Segment `i`, from point `i` to point `i + 1`.
    pub fn line(&self, i: usize) -> XYLine {
        XYLine::from_points(self.points[i], self.points[i + 1])
    }

    pub fn lines(&self) -> impl Iterator<Item = XYLine> + '_ {
        self.points.windows(2).map(|w| XYLine::from_points(w[0], w[1]))
    }

    /// Total length of all segments.
    pub fn length(&self) -> f64 {
        self.lines().map(|l| l.length()).sum()
    }

    pub fn extent(&self) -> XYExtent {
        XYExtent::from_points(&self.points)
    }
}

/// A closed ring. The last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XYPolygon {
    pub points: Vec<XYPoint>,
}

impl XYPolygon {
    pub fn new(points: Vec<XYPoint>) -> Self {
        Self { points }
    }

    /// Reads a polygon element. The element set must hold polygons.
    pub fn from_element(set: &ElementSet, index: usize) -> Result<Self> {
        if set.element_type() != ElementType::Polygon {
            return Err(Error::ElementType {
                shape: "XYPolygon",
                found: set.element_type(),
            });
        }
        Ok(Self::new(element_points(set, index)?))
    }

    pub fn line_count(&self) -> usize {
        self.points.len()
    }

    /// Edge `i`; the last edge wraps to the first point.
    pub fn line(&self, i: usize) -> XYLine {
        let j = if i + 1 == self.points.len() { 0 } else { i + 1 };
        XYLine::from_points(self.points[i], self.points[j])
    }

    pub fn lines(&self) -> impl Iterator<Item = XYLine> + '_ {
        (0..self.points.len()).map(move |i| self.line(i))
    }

    /// Signed shoelace area, positive for counter-clockwise rings.
    ///
    /// Rings with fewer than three points have zero area.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        0.5 * self
            .lines()
            .map(|edge| edge.p1.x * edge.p2.y - edge.p2.x * edge.p1.y)
            .sum::<f64>()
    }

    /// Even-odd ray cast towards `+x`.
    ///
    /// Boundary points are not classified reliably; callers that care use
    /// the edge-distance predicates in [`tools`](crate::tools).
    pub fn ray_cast_contains(&self, point: &XYPoint) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        self.lines()
            .filter(|edge| {
                let (low, high) = if edge.p1.y <= edge.p2.y {
                    (edge.p1, edge.p2)
                } else {
                    (edge.p2, edge.p1)
                };
                if point.y < low.y || point.y >= high.y {
                    return false;
                }
                let x_at = low.x + (point.y - low.y) * (high.x - low.x) / (high.y - low.y);
                point.x < x_at
            })
            .count()
            % 2
            == 1
    }

    pub fn extent(&self) -> XYExtent {
        XYExtent::from_points(&self.points)
    }
}

/// Reads a point element. The element set must hold points.
pub fn point_from_element(set: &ElementSet, index: usize) -> Result<XYPoint> {
    if set.element_type() != ElementType::Point {
        return Err(Error::ElementType {
            shape: "XYPoint",
            found: set.element_type(),
        });
    }
    let v = set.vertex(index, 0)?;
    Ok(Point2::new(v.x, v.y))
}

/// Bounding box of one element, whatever its type.
pub fn element_extent(set: &ElementSet, index: usize) -> Result<XYExtent> {
    let element = set.element(index)?;
    let mut extent = XYExtent::empty();
    for v in &element.vertices {
        extent.include(v.x, v.y);
    }
    Ok(extent)
}

fn element_points(set: &ElementSet, index: usize) -> Result<Vec<XYPoint>> {
    let element = set.element(index)?;
    Ok(element
        .vertices
        .iter()
        .map(|v| Point2::new(v.x, v.y))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tidelink_core::Element;

    #[test]
    fn test_polyline_length() {
        let line = XYPolyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 10.0),
        ]);
        assert_eq!(line.line_count(), 2);
        assert_relative_eq!(line.length(), 11.0);
    }

    #[test]
    fn test_polygon_area_and_wrap() {
        let square = XYPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]);
        assert_relative_eq!(square.area(), 100.0);
        assert_eq!(square.line(3), XYLine::new(0.0, 10.0, 0.0, 0.0));

        let clockwise = XYPolygon::new(square.points.iter().rev().copied().collect());
        assert_relative_eq!(clockwise.area(), -100.0);
        assert_eq!(XYPolygon::new(square.points[..2].to_vec()).area(), 0.0);
    }

    #[test]
    fn test_ray_cast_concave_ring() {
        // U shape open at the top
        let u = XYPolygon::new(
            [
                (0.0, 0.0),
                (3.0, 0.0),
                (3.0, 3.0),
                (2.0, 3.0),
                (2.0, 1.0),
                (1.0, 1.0),
                (1.0, 3.0),
                (0.0, 3.0),
            ]
            .iter()
            .map(|&(x, y)| Point2::new(x, y))
            .collect(),
        );
        assert!(u.ray_cast_contains(&Point2::new(0.5, 2.0)));
        assert!(u.ray_cast_contains(&Point2::new(1.5, 0.5)));
        assert!(!u.ray_cast_contains(&Point2::new(1.5, 2.0)));
        assert!(!u.ray_cast_contains(&Point2::new(4.0, 0.5)));
        // Ray through the vertex at (3, 3) counts once
        assert!(!u.ray_cast_contains(&Point2::new(-1.0, 3.0)));
        let sliver = XYPolygon::new(u.points[..2].to_vec());
        assert!(!sliver.ray_cast_contains(&Point2::new(0.5, 0.0)));
    }

    #[test]
    fn test_from_element_checks_type() {
        let mut set = ElementSet::new("pts", ElementType::Point);
        set.add_element(Element::from_xy("a", &[(2.0, 3.0)]));

        assert_eq!(point_from_element(&set, 0).unwrap(), Point2::new(2.0, 3.0));
        assert!(matches!(
            XYPolygon::from_element(&set, 0),
            Err(Error::ElementType { shape: "XYPolygon", .. })
        ));
        assert!(matches!(point_from_element(&set, 1), Err(Error::CoreError(_))));
    }
}
