// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tidelink Mapping
//!
//! Builds sparse mapping matrices between element sets and applies them to
//! value sets.
//!
//! ## Supported mappings
//!
//! | from | to | methods |
//! |------|----|---------|
//! | Point | Point | Nearest, Inverse |
//! | Point | PolyLine | Nearest, Inverse |
//! | Point | Polygon | Mean, Sum |
//! | PolyLine | Point | Nearest, Inverse |
//! | PolyLine | Polygon | WeightedMean, WeightedSum |
//! | Polygon | Point | Value |
//! | Polygon | PolyLine | WeightedMean, WeightedSum |
//! | Polygon | Polygon | WeightedMean, WeightedSum, Distribute |
//!
//! Each combination has a stable identifier in the [`catalog`], e.g.
//! `ElementMapper802` for polygon-to-polygon Distribute.
//!
//! Mean methods suit state quantities such as water level. Sum and
//! Distribute methods suit fluxes and volumes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod mapper;
pub mod sparse;

mod build;

pub use catalog::{available_methods, has_id, MappingMethod, SpatialMethod};
pub use config::MapperConfig;
pub use error::{Error, Result};
pub use mapper::ElementMapper;
pub use sparse::DoubleSparseMatrix;
