// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for exchange items.
//!
//! The [`ExchangeArena`] owns every output and input of a composition. Source
//! outputs hold values written by their model; adapted outputs hold an
//! [`Adaptation`] and pull values from their adaptee on demand, so a chain
//! `source -> mapper -> linear` evaluates from the root each time it is read.
//!
//! Links are kept in both directions: an output knows its adapted outputs and
//! its consumers, an input knows its provider.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use tidelink_core::{Arguments, ElementSet, Identity, Quantity, Time, TimeSet, ValueSet};
use tracing::debug;

use crate::adaptation::Adaptation;
use crate::error::{Error, Result};
use crate::keys::{InputKey, OutputKey};

/// Two times are the same request when stamps and durations agree this closely (days).
const TIME_TOLERANCE: f64 = 1e-10;

/// Values written by a model for its own output.
#[derive(Debug, Clone)]
pub(crate) struct SourceValues {
    quantity: Quantity,
    element_set: Arc<ElementSet>,
    time_set: TimeSet,
    values: ValueSet,
}

#[derive(Debug, Clone)]
pub(crate) enum OutputSource {
    Values(SourceValues),
    Adapted {
        adaptee: OutputKey,
        adaptation: Adaptation,
    },
}

/// Data stored for an output.
#[derive(Debug, Clone)]
pub struct OutputData {
    pub identity: Identity,
    pub arguments: Arguments,
    pub(crate) source: OutputSource,
    pub(crate) adapted_outputs: Vec<OutputKey>,
    pub(crate) consumers: Vec<InputKey>,
}

impl OutputData {
    pub fn is_adapted(&self) -> bool {
        matches!(self.source, OutputSource::Adapted { .. })
    }
}

/// Data stored for an input.
#[derive(Debug, Clone)]
pub struct InputData {
    pub identity: Identity,
    pub quantity: Quantity,
    pub element_set: Arc<ElementSet>,
    /// Times the consumer asks for. Empty means all available times.
    pub time_set: TimeSet,
    pub(crate) provider: Option<OutputKey>,
}

impl InputData {
    pub fn provider(&self) -> Option<OutputKey> {
        self.provider
    }
}

/// Owner of all outputs and inputs and the links between them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tidelink_adaptors::ExchangeArena;
/// use tidelink_core::{Dimension, Element, ElementSet, ElementType, Identity};
/// use tidelink_core::{PredefinedDimension, Quantity, TimeSet, Unit, ValueSet};
///
/// let mut set = ElementSet::new("gauges", ElementType::Point);
/// set.add_element(Element::from_xy("g1", &[(0.0, 0.0)]));
/// let metre = Unit::new("m", Dimension::predefined(PredefinedDimension::Length));
/// let level = Quantity::new("level", metre);
///
/// let mut arena = ExchangeArena::new();
/// let out = arena.add_output(Identity::new("level"), level, Arc::new(set), TimeSet::default());
/// arena.set_values(out, ValueSet::single(vec![2.5]))?;
/// assert_eq!(arena.values(out)?.get(0, 0)?, 2.5);
/// # Ok::<(), tidelink_adaptors::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ExchangeArena {
    pub(crate) outputs: SlotMap<OutputKey, OutputData>,
    pub(crate) inputs: SlotMap<InputKey, InputData>,
}

impl ExchangeArena {
    pub fn new() -> Self {
        Self {
            outputs: SlotMap::with_key(),
            inputs: SlotMap::with_key(),
        }
    }

    // --- Items ---

    /// Adds a source output with zero values.
    ///
    /// An empty time set makes the output time independent: it holds one row
    /// of values that answers every request.
    pub fn add_output(
        &mut self,
        identity: Identity,
        quantity: Quantity,
        element_set: Arc<ElementSet>,
        time_set: TimeSet,
    ) -> OutputKey {
        let values = ValueSet::zeros(time_set.len().max(1), element_set.element_count());
        self.outputs.insert(OutputData {
            identity,
            arguments: Arguments::new(),
            source: OutputSource::Values(SourceValues {
                quantity,
                element_set,
                time_set,
                values,
            }),
            adapted_outputs: Vec::new(),
            consumers: Vec::new(),
        })
    }

    pub fn add_input(
        &mut self,
        identity: Identity,
        quantity: Quantity,
        element_set: Arc<ElementSet>,
        time_set: TimeSet,
    ) -> InputKey {
        self.inputs.insert(InputData {
            identity,
            quantity,
            element_set,
            time_set,
            provider: None,
        })
    }

    /// Adds an adapted output and registers it on its adaptee.
    pub(crate) fn add_adapted_output(
        &mut self,
        adaptee: OutputKey,
        identity: Identity,
        arguments: Arguments,
        adaptation: Adaptation,
    ) -> Result<OutputKey> {
        self.output(adaptee)?;
        let key = self.outputs.insert(OutputData {
            identity,
            arguments,
            source: OutputSource::Adapted {
                adaptee,
                adaptation,
            },
            adapted_outputs: Vec::new(),
            consumers: Vec::new(),
        });
        self.output_mut(adaptee)?.adapted_outputs.push(key);
        Ok(key)
    }

    pub fn output(&self, key: OutputKey) -> Result<&OutputData> {
        self.outputs.get(key).ok_or(Error::NotFound(key.into()))
    }

    fn output_mut(&mut self, key: OutputKey) -> Result<&mut OutputData> {
        self.outputs.get_mut(key).ok_or(Error::NotFound(key.into()))
    }

    pub fn input(&self, key: InputKey) -> Result<&InputData> {
        self.inputs.get(key).ok_or(Error::NotFound(key.into()))
    }

    pub fn input_mut(&mut self, key: InputKey) -> Result<&mut InputData> {
        self.inputs.get_mut(key).ok_or(Error::NotFound(key.into()))
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Arguments of an output, editable before [`initialize`](Self::initialize).
    pub fn arguments_mut(&mut self, key: OutputKey) -> Result<&mut Arguments> {
        Ok(&mut self.output_mut(key)?.arguments)
    }

    // --- Links ---

    pub fn adaptee(&self, key: OutputKey) -> Result<Option<OutputKey>> {
        Ok(match self.output(key)?.source {
            OutputSource::Values(_) => None,
            OutputSource::Adapted { adaptee, .. } => Some(adaptee),
        })
    }

    pub fn adaptation(&self, key: OutputKey) -> Result<Option<&Adaptation>> {
        Ok(match &self.output(key)?.source {
            OutputSource::Values(_) => None,
            OutputSource::Adapted { adaptation, .. } => Some(adaptation),
        })
    }

    pub fn adapted_outputs(&self, key: OutputKey) -> Result<&[OutputKey]> {
        Ok(&self.output(key)?.adapted_outputs)
    }

    pub fn consumers(&self, key: OutputKey) -> Result<&[InputKey]> {
        Ok(&self.output(key)?.consumers)
    }

    /// Makes `output` the provider of `input`. A previous provider is dropped.
    pub fn connect(&mut self, output: OutputKey, input: InputKey) -> Result<()> {
        self.output(output)?;
        if let Some(previous) = self.input(input)?.provider {
            self.disconnect(previous, input)?;
        }
        self.input_mut(input)?.provider = Some(output);
        let consumers = &mut self.output_mut(output)?.consumers;
        if !consumers.contains(&input) {
            consumers.push(input);
        }
        Ok(())
    }

    pub fn disconnect(&mut self, output: OutputKey, input: InputKey) -> Result<()> {
        self.output_mut(output)?.consumers.retain(|&c| c != input);
        let data = self.input_mut(input)?;
        if data.provider == Some(output) {
            data.provider = None;
        }
        Ok(())
    }

    // --- Definitions ---

    fn root(&self, mut key: OutputKey) -> Result<&SourceValues> {
        loop {
            match &self.output(key)?.source {
                OutputSource::Values(values) => return Ok(values),
                OutputSource::Adapted { adaptee, .. } => key = *adaptee,
            }
        }
    }

    /// The element set values of `key` are defined on.
    ///
    /// Mapper outputs report their target set; other adapted outputs report
    /// their adaptee's.
    pub fn element_set(&self, key: OutputKey) -> Result<Arc<ElementSet>> {
        match &self.output(key)?.source {
            OutputSource::Values(values) => Ok(Arc::clone(&values.element_set)),
            OutputSource::Adapted {
                adaptation: Adaptation::ElementMapper(mapper),
                ..
            } => Ok(Arc::clone(&mapper.target)),
            OutputSource::Adapted { adaptee, .. } => self.element_set(*adaptee),
        }
    }

    /// The time set of the source output at the root of the chain.
    pub fn time_set(&self, key: OutputKey) -> Result<&TimeSet> {
        Ok(&self.root(key)?.time_set)
    }

    /// The quantity of values produced by `key`.
    ///
    /// Area and line-length operations rewrite the quantity when initialised
    /// and report [`Error::NotInitialised`] before that.
    pub fn quantity(&self, key: OutputKey) -> Result<Quantity> {
        let data = self.output(key)?;
        match &data.source {
            OutputSource::Values(values) => Ok(values.quantity.clone()),
            OutputSource::Adapted {
                adaptation: Adaptation::ElementOperation(op),
                ..
            } => op
                .quantity()
                .cloned()
                .ok_or_else(|| Error::NotInitialised(data.identity.id.clone())),
            OutputSource::Adapted { adaptee, .. } => self.quantity(*adaptee),
        }
    }

    /// Replaces the element set of a source output and zeroes its values.
    ///
    /// Adapted outputs below it keep their old definition until they are
    /// initialised again.
    pub fn set_element_set(&mut self, key: OutputKey, element_set: Arc<ElementSet>) -> Result<()> {
        let data = self.output_mut(key)?;
        let OutputSource::Values(source) = &mut data.source else {
            return Err(Error::DerivedValues(data.identity.id.clone()));
        };
        source.values = ValueSet::zeros(source.time_set.len().max(1), element_set.element_count());
        source.element_set = element_set;
        debug!(
            id = %data.identity.id,
            elements = source.element_set.element_count(),
            "Replaced element set"
        );
        Ok(())
    }

    // --- Values ---

    /// Replaces the values of a source output.
    pub fn set_values(&mut self, key: OutputKey, values: ValueSet) -> Result<()> {
        let data = self.output_mut(key)?;
        let OutputSource::Values(source) = &mut data.source else {
            return Err(Error::DerivedValues(data.identity.id.clone()));
        };
        let expected_times = source.time_set.len().max(1);
        let expected_elements = source.element_set.element_count();
        if values.times_count() != expected_times || values.element_count() != expected_elements {
            return Err(Error::ValueShape {
                id: data.identity.id.clone(),
                expected_times,
                expected_elements,
                found_times: values.times_count(),
                found_elements: values.element_count(),
            });
        }
        source.values = values;
        Ok(())
    }

    /// All current values of `key`.
    pub fn values(&self, key: OutputKey) -> Result<ValueSet> {
        self.values_for(key, &TimeSet::default())
    }

    /// Values of `key` at the times `consumer` asks for.
    pub fn get_values(&self, key: OutputKey, consumer: InputKey) -> Result<ValueSet> {
        self.values_for(key, &self.input(consumer)?.time_set)
    }

    /// Values of `key` at `times`, or at all times when `times` is empty.
    pub fn values_for(&self, key: OutputKey, times: &TimeSet) -> Result<ValueSet> {
        let data = self.output(key)?;
        match &data.source {
            OutputSource::Values(source) => select_times(&data.identity.id, source, times),
            OutputSource::Adapted {
                adaptee,
                adaptation,
            } => adaptation.apply(&data.identity.id, self.values_for(*adaptee, times)?),
        }
    }

    /// Adds the values `consumer` asks for to `output`.
    ///
    /// Mapper outputs accumulate straight through the mapping matrix.
    pub fn get_values_into(
        &self,
        key: OutputKey,
        consumer: InputKey,
        output: &mut ValueSet,
    ) -> Result<()> {
        let times = &self.input(consumer)?.time_set;
        let data = self.output(key)?;
        if let OutputSource::Adapted {
            adaptee,
            adaptation: Adaptation::ElementMapper(mapper),
        } = &data.source
        {
            let incoming = self.values_for(*adaptee, times)?;
            mapper.mapper.map_values_into(output, &incoming)?;
            return Ok(());
        }

        let values = self.values_for(key, times)?;
        if values.times_count() != output.times_count()
            || values.element_count() != output.element_count()
        {
            return Err(Error::ValueShape {
                id: data.identity.id.clone(),
                expected_times: values.times_count(),
                expected_elements: values.element_count(),
                found_times: output.times_count(),
                found_elements: output.element_count(),
            });
        }
        for (out, row) in output.rows_mut().zip(values.rows()) {
            for (o, v) in out.iter_mut().zip(row) {
                *o += v;
            }
        }
        Ok(())
    }

    // --- Lifecycle ---

    /// Reads the arguments of an adapted output and prepares its adaptation.
    ///
    /// Mapper outputs rebuild their matrix from the adaptee's current element
    /// set, so a set replaced with [`set_element_set`](Self::set_element_set)
    /// takes effect here.
    pub fn initialize(&mut self, key: OutputKey) -> Result<()> {
        let Some(adaptee) = self.adaptee(key)? else {
            return Ok(());
        };
        let adaptee_set = self.element_set(adaptee)?;
        let adaptee_quantity = self.quantity(adaptee);

        let data = self.output_mut(key)?;
        let OutputSource::Adapted { adaptation, .. } = &mut data.source else {
            return Ok(());
        };
        match adaptation {
            Adaptation::ElementMapper(mapper) => mapper.rebuild(&adaptee_set)?,
            Adaptation::ElementOperation(op) => {
                op.initialise(&data.arguments, &adaptee_set, &adaptee_quantity?)?
            }
            Adaptation::Linear(op) => op.initialise(&data.arguments)?,
        }
        debug!(
            id = %data.identity.id,
            adaptation = adaptation.name(),
            "Initialised adapted output"
        );
        Ok(())
    }

    /// Notifies the adapted outputs below `key` that new values are available.
    ///
    /// Returns the number of adapted outputs reached.
    pub fn refresh(&self, key: OutputKey) -> Result<usize> {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<OutputKey> = self.output(key)?.adapted_outputs.clone();
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let data = self.output(next)?;
            debug!(
                id = %data.identity.id,
                consumers = data.consumers.len(),
                "Refreshed adapted output"
            );
            stack.extend(data.adapted_outputs.iter().copied());
        }
        Ok(visited.len())
    }
}

fn same_time(a: &Time, b: &Time) -> bool {
    (a.stamp - b.stamp).abs() <= TIME_TOLERANCE && (a.duration - b.duration).abs() <= TIME_TOLERANCE
}

fn select_times(id: &str, source: &SourceValues, times: &TimeSet) -> Result<ValueSet> {
    if times.is_empty() || source.time_set.is_empty() {
        return Ok(source.values.clone());
    }
    let rows = times
        .times
        .iter()
        .map(|t| {
            source
                .time_set
                .times
                .iter()
                .position(|s| same_time(s, t))
                .and_then(|i| source.values.element_values(i).ok())
                .map(<[f64]>::to_vec)
                .ok_or_else(|| Error::NoValues {
                    id: id.to_string(),
                    time: t.stamp,
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ValueSet::from_rows(rows)?)
}
