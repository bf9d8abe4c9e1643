// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;
use tidelink_core::ElementType;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("{shape} must have at least {required} vertices, found {found}")]
    TooFewVertices {
        shape: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Number of vertices in point element is different from 1: {0}")]
    PointVertexCount(usize),

    #[error("Length of line segment no: {0} (0-based) is zero")]
    ZeroLengthSegment(usize),

    #[error("Area of polygon is negative or zero. XYPolygons must be ordered counter clockwise.")]
    NonPositiveArea,

    #[error("Line no: {first} and line no: {second} of polygon crosses")]
    CrossingEdges { first: usize, second: usize },

    #[error("ElementID = {element}: {source}")]
    InvalidElement {
        element: String,
        #[source]
        source: Box<Error>,
    },

    #[error("ElementSet with ID = {caption} is invalid: {source}")]
    InvalidElementSet {
        caption: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Cannot create {shape} from element set of type {found}")]
    ElementType {
        shape: &'static str,
        found: ElementType,
    },

    #[error("Can not add nodes when tree has elements")]
    TreeHasElements,

    #[error("Element set error: {0}")]
    CoreError(#[from] tidelink_core::Error),
}
