// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Creating spatial adapted outputs from catalog identifiers.

use std::sync::Arc;

use tidelink_core::Identity;
use tidelink_mapping::{available_methods, SpatialMethod};
use tracing::info;

use crate::adaptation::{
    Adaptation, ElementOperation, LinearOperation, MapperAdaptation, OperationKind,
};
use crate::arena::ExchangeArena;
use crate::error::{Error, Result};
use crate::keys::{InputKey, OutputKey};

/// Methods that can adapt `adaptee`, optionally towards `target`.
///
/// Operations on the adaptee's element type come first. Mapping methods are
/// only listed when a target is given.
pub fn available_adapted_output_ids(
    arena: &ExchangeArena,
    adaptee: OutputKey,
    target: Option<InputKey>,
) -> Result<Vec<SpatialMethod>> {
    let from = arena.element_set(adaptee)?.element_type();
    let to = match target {
        Some(input) => Some(arena.input(input)?.element_set.element_type()),
        None => None,
    };
    Ok(available_methods(from, to))
}

/// Creates the adapted output named by `id` and registers it on `adaptee`.
///
/// Identifiers are matched ignoring case. Mapping methods need a `target`
/// whose element set becomes the spatial definition of the new output.
pub fn create_adapted_output(
    arena: &mut ExchangeArena,
    id: &str,
    adaptee: OutputKey,
    target: Option<InputKey>,
) -> Result<OutputKey> {
    let method = SpatialMethod::from_id_ignore_case(id)
        .ok_or_else(|| Error::UnknownAdaptedOutput(id.to_string()))?;
    let adaptee_set = arena.element_set(adaptee)?;
    let adaptee_id = arena.output(adaptee)?.identity.id.clone();

    let (identity, arguments, adaptation) = if method.is_operation() {
        let kind = match method {
            SpatialMethod::AreaOperation => OperationKind::Area,
            _ => OperationKind::LineLength,
        };
        let op = ElementOperation::new(kind, &adaptee_set)?;
        let caption = arena.output(adaptee)?.identity.caption.clone();
        let identity = Identity::new(method.id())
            .with_caption(caption)
            .with_description(method.description());
        (identity, op.arguments(), Adaptation::ElementOperation(op))
    } else {
        let target = target.ok_or_else(|| Error::TargetRequired(method.id().to_string()))?;
        let target_set = Arc::clone(&arena.input(target)?.element_set);
        let mapper = MapperAdaptation::new(method, &adaptee_set, target_set)?;
        let identity = Identity::new(format!("{}->{}", adaptee_id, method.id()))
            .with_description(method.description());
        (identity, method.arguments(), Adaptation::ElementMapper(mapper))
    };

    let new_id = identity.id.clone();
    let key = arena.add_adapted_output(adaptee, identity, arguments, adaptation)?;
    info!(id = %new_id, adaptee = %adaptee_id, method = method.id(), "Created adapted output");
    Ok(key)
}

/// Wraps `adaptee` in `y = A*x + B` with `A = 1`, `B = 0` until changed.
pub fn create_linear_operation(arena: &mut ExchangeArena, adaptee: OutputKey) -> Result<OutputKey> {
    let adaptee_id = arena.output(adaptee)?.identity.id.clone();
    let identity = Identity::new(format!("{} => LinearOperation", adaptee_id))
        .with_caption(format!("{} => y = A*x + B", adaptee_id))
        .with_description("Performs a linear operation on the form: y = Ax + B");
    let key = arena.add_adapted_output(
        adaptee,
        identity,
        LinearOperation::arguments(),
        Adaptation::Linear(LinearOperation::default()),
    )?;
    info!(adaptee = %adaptee_id, "Created linear operation");
    Ok(key)
}
