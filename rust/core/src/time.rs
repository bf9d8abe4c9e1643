// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time stamps and time sets.
//!
//! Times are Modified Julian Day numbers; a time with a non-zero duration is a
//! span starting at `stamp`.

/// A time stamp or span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub stamp: f64,
    pub duration: f64,
}

impl Time {
    pub fn stamp(stamp: f64) -> Self {
        Self { stamp, duration: 0.0 }
    }

    pub fn span(start: f64, end: f64) -> Self {
        Self {
            stamp: start,
            duration: end - start,
        }
    }

    pub fn end(&self) -> f64 {
        self.stamp + self.duration
    }
}

/// Ordered times at which values are requested or available.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSet {
    pub times: Vec<Time>,
    pub has_durations: bool,
}

impl TimeSet {
    pub fn new(times: Vec<Time>) -> Self {
        let has_durations = times.iter().any(|t| t.duration != 0.0);
        Self {
            times,
            has_durations,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
