// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance, containment and overlap predicates used by the element mapper.
//!
//! All functions accept degenerate input (empty rings, zero-length segments,
//! repeated vertices) and return a neutral value instead of failing.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

use crate::clip;
use crate::primitives::{XYLine, XYPoint, XYPolygon, XYPolyline};

/// Absolute tolerance for boundary membership and point query extents.
pub const EPSILON: f64 = 1e-5;

/// Parameter-space tolerance when clipping segments.
const PARAM_EPSILON: f64 = 1e-12;

#[inline]
fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Euclidean distance between two points.
#[inline]
pub fn point_to_point_distance(p1: &XYPoint, p2: &XYPoint) -> f64 {
    nalgebra::distance(p1, p2)
}

/// Shortest distance from a point to a segment.
pub fn point_to_line_distance(line: &XYLine, point: &XYPoint) -> f64 {
    let d = line.p2 - line.p1;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return point_to_point_distance(&line.p1, point);
    }
    let t = ((point - line.p1).dot(&d) / len2).clamp(0.0, 1.0);
    point_to_point_distance(&(line.p1 + d * t), point)
}

/// Shortest distance from a point to any segment of a polyline.
///
/// A single-vertex polyline degenerates to point distance; an empty one is
/// infinitely far away.
pub fn polyline_to_point_distance(polyline: &XYPolyline, point: &XYPoint) -> f64 {
    match polyline.points.as_slice() {
        [] => f64::INFINITY,
        [only] => point_to_point_distance(only, point),
        _ => polyline
            .lines()
            .map(|line| point_to_line_distance(&line, point))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Whether two segments cross at a point interior to both.
///
/// Segments that only touch at an endpoint, or that are collinear, do not
/// cross. Adjacent polygon edges therefore never count as crossing.
pub fn do_line_segments_intersect(l1: &XYLine, l2: &XYLine) -> bool {
    let r = l1.p2 - l1.p1;
    let s = l2.p2 - l2.p1;
    let qp = l2.p1 - l1.p1;

    let o1 = cross(&r, &qp);
    let o2 = cross(&r, &(l2.p2 - l1.p1));
    let o3 = cross(&s, &(l1.p1 - l2.p1));
    let o4 = cross(&s, &(l1.p2 - l2.p1));

    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Parameter `t` along `l1` where it meets `l2`, touching endpoints included.
///
/// Parallel (including collinear) and disjoint segments give `None`.
fn segment_intersection_param(l1: &XYLine, l2: &XYLine) -> Option<f64> {
    let r = l1.p2 - l1.p1;
    let s = l2.p2 - l2.p1;
    let denom = cross(&r, &s);
    if denom.abs() <= f64::EPSILON * r.norm() * s.norm() {
        return None;
    }
    let qp = l2.p1 - l1.p1;
    let t = cross(&qp, &s) / denom;
    let u = cross(&qp, &r) / denom;
    let range = -PARAM_EPSILON..=1.0 + PARAM_EPSILON;
    (range.contains(&t) && range.contains(&u)).then(|| t.clamp(0.0, 1.0))
}

/// Whether a point lies within [`EPSILON`] of any polygon edge.
pub fn is_point_on_polygon_edge(point: &XYPoint, polygon: &XYPolygon) -> bool {
    polygon
        .lines()
        .any(|edge| point_to_line_distance(&edge, point) < EPSILON)
}

/// Strict containment: inside the ring and not on its boundary.
pub fn is_point_in_polygon(point: &XYPoint, polygon: &XYPolygon) -> bool {
    polygon.ray_cast_contains(point) && !is_point_on_polygon_edge(point, polygon)
}

/// Containment that also accepts points on the boundary.
pub fn is_point_in_polygon_or_on_edge(point: &XYPoint, polygon: &XYPolygon) -> bool {
    if polygon.points.len() < 3 {
        return false;
    }
    is_point_on_polygon_edge(point, polygon) || polygon.ray_cast_contains(point)
}

/// Length of a segment that lies inside a polygon.
///
/// The segment is split at every crossing with a polygon edge and at every
/// polygon vertex lying on it. A piece running along a polygon edge counts
/// half its length, so a line following the shared edge of two neighbouring
/// polygons is split evenly between them. Other pieces count in full when
/// their midpoint is inside the polygon.
pub fn length_of_line_inside_polygon(line: &XYLine, polygon: &XYPolygon) -> f64 {
    let length = line.length();
    if length == 0.0 || polygon.points.len() < 3 {
        return 0.0;
    }
    if !line.extent().overlaps(&polygon.extent()) {
        return 0.0;
    }

    let dir = line.p2 - line.p1;
    let mut params: SmallVec<[f64; 8]> = SmallVec::new();
    params.push(0.0);
    params.push(1.0);

    for edge in polygon.lines() {
        if let Some(t) = segment_intersection_param(line, &edge) {
            params.push(t);
        }
    }
    for vertex in &polygon.points {
        if point_to_line_distance(line, vertex) < EPSILON {
            let t = (vertex - line.p1).dot(&dir) / (length * length);
            params.push(t.clamp(0.0, 1.0));
        }
    }

    params.sort_by(f64::total_cmp);
    params.dedup_by(|a, b| (*a - *b).abs() <= PARAM_EPSILON);

    let mut inside = 0.0;
    for w in params.windows(2) {
        let piece = (w[1] - w[0]) * length;
        if piece <= 0.0 {
            continue;
        }
        let mid: Point2<f64> = line.p1 + dir * (0.5 * (w[0] + w[1]));
        if is_point_on_polygon_edge(&mid, polygon) {
            inside += 0.5 * piece;
        } else if polygon.ray_cast_contains(&mid) {
            inside += piece;
        }
    }
    inside
}

/// Summed length of all polyline segments inside a polygon.
pub fn length_of_polyline_inside_polygon(polyline: &XYPolyline, polygon: &XYPolygon) -> f64 {
    polyline
        .lines()
        .map(|line| length_of_line_inside_polygon(&line, polygon))
        .sum()
}

/// Area shared by two polygons.
pub fn shared_area(a: &XYPolygon, b: &XYPolygon) -> f64 {
    clip::intersection_area(a, b)
}
