// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tidelink Core
//!
//! Data model shared by the Tidelink crates: the things coupled models
//! exchange and the spatial definitions those values live on.
//!
//! ## Overview
//!
//! - **Element sets**: ordered points, polylines, polygons or polyhedrons with
//!   X/Y (optional Z/M) vertices, see [`ElementSet`]
//! - **Builders**: regular and curvilinear grids, unstructured meshes,
//!   multi-point and line-string sets that materialise into element sets
//! - **Value sets**: time × element tables of scalar values
//! - **Quantities**: units with SI conversion and dimensions as powers of base
//!   quantities
//! - **Arguments**: typed, optionally read-only parameters of adapted outputs
//!
//! ## Quick Start
//!
//! ```rust
//! use tidelink_core::{RegularGrid, ElementType};
//!
//! let cells = RegularGrid::new(0.0, 0.0, 10.0, 10.0, 3, 2)
//!     .to_element_set("cells")
//!     .unwrap();
//! assert_eq!(cells.element_type(), ElementType::Polygon);
//! assert_eq!(cells.element_count(), 6);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the data model

pub mod argument;
pub mod element_set;
pub mod error;
pub mod grid;
pub mod identity;
pub mod quantity;
pub mod shapes;
pub mod time;
pub mod value_set;

pub use argument::{ArgValue, Argument, Arguments};
pub use element_set::{Coordinate, Element, ElementSet, ElementType};
pub use error::{Error, Result};
pub use grid::{CurvilinearGrid, RegularGrid};
pub use identity::Identity;
pub use quantity::{Dimension, DimensionBase, PredefinedDimension, PredefinedUnit, Quantity, Unit};
pub use shapes::{line_string, multi_point, SpatialMesh};
pub use time::{Time, TimeSet};
pub use value_set::ValueSet;
