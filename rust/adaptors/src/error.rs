// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for exchange items and adapted outputs.

use crate::keys::ItemKey;

/// Result type alias for adaptor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the exchange arena and the adapted-output factory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced exchange item was not found in the arena.
    #[error("exchange item not found: {0}")]
    NotFound(ItemKey),

    /// The factory does not know this adapted output id.
    #[error("Adapted output id could not be found: {0}")]
    UnknownAdaptedOutput(String),

    /// A mapping adapted output was requested without a target.
    #[error("Target not defined, can not create adapted output {0}")]
    TargetRequired(String),

    /// The adaptee cannot be wrapped by the requested adapted output.
    #[error("invalid adaptee: {0}")]
    InvalidAdaptee(String),

    /// Values were requested before `initialize` was called.
    #[error("adapted output '{0}' has not been initialised")]
    NotInitialised(String),

    /// The output has no values for a requested time.
    #[error("output '{id}' has no values for time {time}")]
    NoValues { id: String, time: f64 },

    /// Values can only be assigned to source outputs.
    #[error("values of adapted output '{0}' are derived from its adaptee")]
    DerivedValues(String),

    /// Assigned or accumulated values do not fit the output.
    #[error("output '{id}' expects {expected_times}x{expected_elements} values, got {found_times}x{found_elements}")]
    ValueShape {
        id: String,
        expected_times: usize,
        expected_elements: usize,
        found_times: usize,
        found_elements: usize,
    },

    #[error(transparent)]
    Mapping(#[from] tidelink_mapping::Error),

    #[error(transparent)]
    Geometry(#[from] tidelink_geometry::Error),

    #[error(transparent)]
    Core(#[from] tidelink_core::Error),
}
