// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared area of two polygons.
//!
//! The intersection itself is computed by i_overlay, which copes with concave
//! rings, shared edges and touching vertices.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::primitives::XYPolygon;

/// Shared areas below this are reported as zero.
const AREA_NOISE: f64 = 1e-10;

/// Area of the intersection of two simple polygons.
///
/// Slivers with less than three points or no area, and polygons whose
/// extents are disjoint, share nothing.
pub fn intersection_area(a: &XYPolygon, b: &XYPolygon) -> f64 {
    if a.area().abs() <= AREA_NOISE || b.area().abs() <= AREA_NOISE {
        return 0.0;
    }
    if !a.extent().overlaps(&b.extent()) {
        return 0.0;
    }

    let subject = vec![as_path(a)];
    let clip = vec![as_path(b)];

    // Each result shape is an outer contour followed by its holes
    let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

    let area: f64 = shapes.iter().map(|shape| shape_area(shape)).sum();
    if area < AREA_NOISE {
        0.0
    } else {
        area
    }
}

fn as_path(polygon: &XYPolygon) -> Vec<[f64; 2]> {
    polygon.points.iter().map(|p| [p.x, p.y]).collect()
}

fn shape_area(shape: &[Vec<[f64; 2]>]) -> f64 {
    let mut contours = shape.iter().map(|path| path_area(path).abs());
    let Some(outer) = contours.next() else {
        return 0.0;
    };
    (outer - contours.sum::<f64>()).max(0.0)
}

fn path_area(path: &[[f64; 2]]) -> f64 {
    let ring = XYPolygon::new(path.iter().map(|&[x, y]| nalgebra::Point2::new(x, y)).collect());
    ring.area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn polygon(xy: &[(f64, f64)]) -> XYPolygon {
        XYPolygon::new(xy.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    fn square(x0: f64, y0: f64, size: f64) -> XYPolygon {
        polygon(&[
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ])
    }

    #[test]
    fn test_overlapping_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        assert_relative_eq!(intersection_area(&a, &b), 25.0, epsilon = 1e-6);
        assert_relative_eq!(intersection_area(&a, &a), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clockwise_ring_gives_positive_area() {
        let a = square(0.0, 0.0, 10.0);
        let b = XYPolygon::new(square(5.0, 5.0, 10.0).points.into_iter().rev().collect());
        assert_relative_eq!(intersection_area(&a, &b), 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_touching_and_disjoint_squares() {
        let a = square(0.0, 0.0, 10.0);
        assert!(intersection_area(&a, &square(10.0, 0.0, 10.0)) < 1e-9);
        assert_eq!(intersection_area(&a, &square(30.0, 30.0, 1.0)), 0.0);
    }

    #[test]
    fn test_concave_intersection() {
        // U shape: 3x3 square minus the 1x2 notch in the top middle
        let u = polygon(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ]);
        let bar = polygon(&[(0.0, 2.0), (3.0, 2.0), (3.0, 3.0), (0.0, 3.0)]);
        assert_relative_eq!(intersection_area(&u, &bar), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_input() {
        let line = polygon(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let sq = square(0.0, 0.0, 10.0);
        assert_eq!(intersection_area(&line, &sq), 0.0);
        assert_eq!(intersection_area(&XYPolygon::default(), &sq), 0.0);
    }
}
