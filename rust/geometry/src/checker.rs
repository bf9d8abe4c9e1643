// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural validation of element sets before mapping.
//!
//! | element type | checks |
//! |---|---|
//! | Point | exactly one vertex |
//! | PolyLine | at least two vertices, no zero-length segment |
//! | Polygon | at least three vertices, positive (counter-clockwise) area, no zero-length edge, no crossing edges |
//!
//! Other element types are accepted as-is.

use tidelink_core::{ElementSet, ElementType};

use crate::error::{Error, Result};
use crate::primitives::{XYPolygon, XYPolyline};
use crate::tools::do_line_segments_intersect;

/// Validates every element of the set.
///
/// The first failing element is reported, wrapped with its id and the
/// caption of the set.
pub fn check_element_set(set: &ElementSet) -> Result<()> {
    for i in 0..set.element_count() {
        check_element(set, i).map_err(|source| Error::InvalidElementSet {
            caption: set.caption.clone(),
            source: Box::new(Error::InvalidElement {
                element: set.element_id(i).unwrap_or_default().to_string(),
                source: Box::new(source),
            }),
        })?;
    }
    Ok(())
}

fn check_element(set: &ElementSet, index: usize) -> Result<()> {
    match set.element_type() {
        ElementType::Point => {
            let count = set.vertex_count(index)?;
            if count != 1 {
                return Err(Error::PointVertexCount(count));
            }
            Ok(())
        }
        ElementType::PolyLine => validate_polyline(&XYPolyline::from_element(set, index)?),
        ElementType::Polygon => validate_polygon(&XYPolygon::from_element(set, index)?),
        ElementType::IdBased | ElementType::Polyhedron => Ok(()),
    }
}

/// At least two points and no zero-length segment.
pub fn validate_polyline(polyline: &XYPolyline) -> Result<()> {
    if polyline.points.len() < 2 {
        return Err(Error::TooFewVertices {
            shape: "polyline",
            required: 2,
            found: polyline.points.len(),
        });
    }
    if let Some(j) = polyline.lines().position(|l| l.length() == 0.0) {
        return Err(Error::ZeroLengthSegment(j));
    }
    Ok(())
}

/// At least three points, counter-clockwise, no zero-length or crossing edges.
pub fn validate_polygon(polygon: &XYPolygon) -> Result<()> {
    let n = polygon.points.len();
    if n < 3 {
        return Err(Error::TooFewVertices {
            shape: "polygon",
            required: 3,
            found: n,
        });
    }
    if polygon.area() <= 0.0 {
        return Err(Error::NonPositiveArea);
    }
    if let Some(j) = polygon.lines().position(|l| l.length() == 0.0) {
        return Err(Error::ZeroLengthSegment(j));
    }
    for j in 0..n {
        for m in 0..j {
            if do_line_segments_intersect(&polygon.line(j), &polygon.line(m)) {
                return Err(Error::CrossingEdges { first: j, second: m });
            }
        }
    }
    Ok(())
}
