// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes.

use nalgebra::Point2;

/// Axis-aligned bounding box.
///
/// The default extent is empty (`x_min = +inf`, `x_max = -inf`) so that it
/// excludes every point and any [`include`](XYExtent::include) sets it to that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XYExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for XYExtent {
    fn default() -> Self {
        Self::empty()
    }
}

impl XYExtent {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// The extent that contains nothing.
    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY)
    }

    /// Bounding box of a set of points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2<f64>>) -> Self {
        let mut extent = Self::empty();
        for p in points {
            extent.include(p.x, p.y);
        }
        extent
    }

    /// A square of half-width `epsilon` centred on a point.
    pub fn around_point(point: &Point2<f64>, epsilon: f64) -> Self {
        Self::new(
            point.x - epsilon,
            point.x + epsilon,
            point.y - epsilon,
            point.y + epsilon,
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Grows the extent to include `(x, y)`.
    #[inline]
    pub fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    /// Inclusive overlap test; extents that share only an edge overlap.
    #[inline]
    pub fn overlaps(&self, other: &XYExtent) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    pub fn mid(&self) -> (f64, f64) {
        (
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
        )
    }
}
