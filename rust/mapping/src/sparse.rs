// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sparse matrix of mapping weights.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// A `rows × cols` matrix storing only non-zero entries.
///
/// Reading an absent cell yields `0.0`; writing `0.0` removes the cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoubleSparseMatrix {
    rows: usize,
    cols: usize,
    values: FxHashMap<(usize, usize), f64>,
}

impl DoubleSparseMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`, or `0.0` when the cell is empty or out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// Stores `value` at `(row, col)`; exactly zero clears the cell.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        if value == 0.0 {
            self.values.remove(&(row, col));
        } else {
            self.values.insert((row, col), value);
        }
        Ok(())
    }

    pub fn is_cell_empty(&self, row: usize, col: usize) -> bool {
        !self.values.contains_key(&(row, col))
    }

    pub fn nonzero_count(&self) -> usize {
        self.values.len()
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.values
            .iter()
            .filter(|((r, _), _)| *r == row)
            .map(|(_, v)| v)
            .sum()
    }

    /// Non-zero entries as `(row, col, value)`, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.values.iter().map(|(&(r, c), &v)| (r, c, v))
    }

    /// Matrix-vector product into a fresh zero vector.
    pub fn product(&self, vector: &[f64]) -> Result<Vec<f64>> {
        let mut result = vec![0.0; self.rows];
        self.product_into(&mut result, vector)?;
        Ok(result)
    }

    /// Adds `self · vector` to `result`.
    ///
    /// `result` is not cleared first, so repeated calls accumulate.
    pub fn product_into(&self, result: &mut [f64], vector: &[f64]) -> Result<()> {
        if vector.len() != self.cols {
            return Err(Error::DimensionMismatch {
                expected: self.cols,
                found: vector.len(),
            });
        }
        if result.len() != self.rows {
            return Err(Error::DimensionMismatch {
                expected: self.rows,
                found: result.len(),
            });
        }
        for (&(row, col), &value) in &self.values {
            result[row] += value * vector[col];
        }
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                what: "row",
                index: row,
                count: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                what: "column",
                index: col,
                count: self.cols,
            });
        }
        Ok(())
    }
}
