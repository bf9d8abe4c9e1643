// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the exchange data model.

use crate::element_set::ElementType;

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by element sets, value sets and arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Element index outside `0..count`.
    #[error("element index {index} out of range, element set '{set}' has {count} elements")]
    ElementIndex {
        set: String,
        index: usize,
        count: usize,
    },

    /// Vertex index outside the vertex list of an element.
    #[error("vertex index {vertex} out of range, element {element} has {count} vertices")]
    VertexIndex {
        element: usize,
        vertex: usize,
        count: usize,
    },

    /// An element set of a different element type was expected.
    #[error("expected element type {expected}, found {found}")]
    ElementType {
        expected: ElementType,
        found: ElementType,
    },

    /// Grid node index outside the grid.
    #[error("grid node ({j},{k}) outside grid of {x_nodes}x{y_nodes} nodes")]
    GridIndex {
        j: usize,
        k: usize,
        x_nodes: usize,
        y_nodes: usize,
    },

    /// Mesh connectivity refers to a node that does not exist.
    #[error("mesh element {element} refers to node {node}, mesh has {node_count} nodes")]
    MeshNodeIndex {
        element: usize,
        node: usize,
        node_count: usize,
    },

    /// Grid or line string parameters cannot produce elements.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Rows of a value set have different lengths.
    #[error("value set rows differ in length: row {row} has {found} values, expected {expected}")]
    RaggedValues {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Time or element index outside a value set.
    #[error("value set index ({time},{element}) out of range for {times}x{elements} values")]
    ValueIndex {
        time: usize,
        element: usize,
        times: usize,
        elements: usize,
    },

    /// Factor vector length does not match the element count.
    #[error("expected {expected} element factors, got {found}")]
    FactorCount { expected: usize, found: usize },

    /// No argument with the given id.
    #[error("argument not found: {0}")]
    ArgumentNotFound(String),

    /// Attempt to change a read-only argument.
    #[error("argument '{0}' is read-only")]
    ArgumentReadOnly(String),

    /// Assigned value has a different type than the argument.
    #[error("argument '{id}' expects a {expected} value, got {found}")]
    ArgumentType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
}
