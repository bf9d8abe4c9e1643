// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time × element value tables.

use crate::error::{Error, Result};

/// Scalar values for a number of time steps, each holding one value per element.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSet {
    values: Vec<Vec<f64>>,
}

impl ValueSet {
    /// Creates a zero-filled value set.
    pub fn zeros(times: usize, elements: usize) -> Self {
        Self {
            values: vec![vec![0.0; elements]; times],
        }
    }

    /// Creates a value set from per-time rows, which must all have the same length.
    pub fn from_rows(values: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = values.first() {
            let expected = first.len();
            for (row, v) in values.iter().enumerate() {
                if v.len() != expected {
                    return Err(Error::RaggedValues {
                        row,
                        expected,
                        found: v.len(),
                    });
                }
            }
        }
        Ok(Self { values })
    }

    /// A single time step.
    pub fn single(values: Vec<f64>) -> Self {
        Self {
            values: vec![values],
        }
    }

    pub fn times_count(&self) -> usize {
        self.values.len()
    }

    /// Number of elements per time step; zero when there are no time steps.
    pub fn element_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn get(&self, time: usize, element: usize) -> Result<f64> {
        self.values
            .get(time)
            .and_then(|row| row.get(element))
            .copied()
            .ok_or_else(|| self.index_error(time, element))
    }

    pub fn set(&mut self, time: usize, element: usize, value: f64) -> Result<()> {
        let err = self.index_error(time, element);
        let cell = self
            .values
            .get_mut(time)
            .and_then(|row| row.get_mut(element))
            .ok_or(err)?;
        *cell = value;
        Ok(())
    }

    /// Values of all elements at one time step.
    pub fn element_values(&self, time: usize) -> Result<&[f64]> {
        self.values
            .get(time)
            .map(Vec::as_slice)
            .ok_or_else(|| self.index_error(time, 0))
    }

    pub fn element_values_mut(&mut self, time: usize) -> Result<&mut [f64]> {
        let err = self.index_error(time, 0);
        self.values.get_mut(time).map(Vec::as_mut_slice).ok_or(err)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.iter().map(Vec::as_slice)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.values.iter_mut().map(Vec::as_mut_slice)
    }

    /// Multiplies each element's values by its factor, at every time step.
    pub fn multiply_element_values(mut self, factors: &[f64]) -> Result<Self> {
        let elements = self.element_count();
        if self.times_count() > 0 && factors.len() != elements {
            return Err(Error::FactorCount {
                expected: elements,
                found: factors.len(),
            });
        }
        for row in &mut self.values {
            for (v, f) in row.iter_mut().zip(factors) {
                *v *= f;
            }
        }
        Ok(self)
    }

    /// Applies `f` to every value.
    pub fn map(mut self, f: impl Fn(f64) -> f64) -> Self {
        for v in self.values.iter_mut().flatten() {
            *v = f(*v);
        }
        self
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.values
    }

    fn index_error(&self, time: usize, element: usize) -> Error {
        Error::ValueIndex {
            time,
            element,
            times: self.times_count(),
            elements: self.element_count(),
        }
    }
}
