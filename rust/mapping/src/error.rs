// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mapping construction and application.

use tidelink_core::ElementType;

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or applying a mapping.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source or target element set failed validation.
    #[error("Cannot map, {role} element set is invalid: {source}")]
    InvalidElementSet {
        role: &'static str,
        #[source]
        source: tidelink_geometry::Error,
    },

    /// No catalog entry has this identifier.
    #[error("Invalid identifier: {0}")]
    UnknownMethod(String),

    /// No mapping exists between the two element types.
    #[error("Mapping of specified element types not implemented: {from} to {to}")]
    UnsupportedElementTypes { from: ElementType, to: ElementType },

    /// The method does not apply to the element types it was given.
    #[error("Method {method} is not defined for {from} to {to} mapping")]
    MethodShapeMismatch {
        method: &'static str,
        from: ElementType,
        to: ElementType,
    },

    /// A mapping branch failed while computing weights.
    #[error("{from} to {to} mapping failed: {source}")]
    MappingFailed {
        from: ElementType,
        to: ElementType,
        #[source]
        source: Box<Error>,
    },

    /// Input element count does not match the matrix columns.
    #[error("Dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("{what} index {index} is out of range (count {count})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        count: usize,
    },

    #[error(transparent)]
    Geometry(#[from] tidelink_geometry::Error),

    #[error(transparent)]
    Core(#[from] tidelink_core::Error),
}
