// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tidelink Adaptors
//!
//! Adapted outputs sit between a providing output and a consuming input and
//! transform values on the way:
//!
//! - **Element mapper** (`ElementMapper100` .. `ElementMapper802`): maps onto
//!   the consumer's element set
//! - **Line-length operation** (`ElementOperation200`): multiplies by polyline
//!   length to a power
//! - **Area operation** (`ElementOperation300`): multiplies by polygon area to
//!   a power
//! - **Linear operation**: `y = A*x + B`
//!
//! All exchange items live in an [`ExchangeArena`] and are referenced by
//! [`OutputKey`] / [`InputKey`]. Adapted outputs can be chained; reading one
//! pulls values through the chain from the source output.

pub mod adaptation;
pub mod arena;
pub mod error;
pub mod factory;
pub mod keys;

pub use adaptation::{
    Adaptation, ElementOperation, LinearOperation, MapperAdaptation, OperationKind,
};
pub use arena::{ExchangeArena, InputData, OutputData};
pub use error::{Error, Result};
pub use factory::{available_adapted_output_ids, create_adapted_output, create_linear_operation};
pub use keys::{InputKey, ItemKey, OutputKey};
