// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tidelink Geometry
//!
//! Planar geometry for element mapping: distances, containment and
//! intersection predicates, polygon clipping for shared areas, element set
//! validation and a quadtree for candidate lookup.
//!
//! Points are `nalgebra::Point2<f64>`; polygons are counter-clockwise rings
//! without a repeated closing vertex.
//!
//! ```rust
//! use tidelink_geometry::{tools, Point2, XYPolygon};
//!
//! let square = XYPolygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ]);
//! assert!(tools::is_point_in_polygon(&Point2::new(1.0, 1.0), &square));
//! assert!(!tools::is_point_in_polygon(&Point2::new(2.0, 1.0), &square));
//! assert!(tools::is_point_in_polygon_or_on_edge(&Point2::new(2.0, 1.0), &square));
//! ```

pub mod checker;
pub mod clip;
pub mod error;
pub mod extent;
pub mod primitives;
pub mod search_tree;
pub mod tools;

pub use nalgebra::Point2;

pub use checker::{check_element_set, validate_polygon, validate_polyline};
pub use error::{Error, Result};
pub use extent::XYExtent;
pub use primitives::{element_extent, point_from_element, XYLine, XYPoint, XYPolygon, XYPolyline};
pub use search_tree::{TreeStats, XYElementSearchTree, DEFAULT_MAX_POINTS_PER_NODE};
pub use tools::EPSILON;
