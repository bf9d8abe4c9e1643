// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical quantities, units and dimensions.
//!
//! A [`Dimension`] stores the (possibly fractional) power of each SI base
//! quantity. Units carry a dimension plus the affine conversion to SI:
//! `si = value * conversion_factor_to_si + offset_to_si`.

/// SI base quantities, plus currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionBase {
    Length = 0,
    Mass = 1,
    Time = 2,
    ElectricCurrent = 3,
    Temperature = 4,
    AmountOfSubstance = 5,
    LuminousIntensity = 6,
    Currency = 7,
}

impl DimensionBase {
    pub const ALL: [DimensionBase; 8] = [
        DimensionBase::Length,
        DimensionBase::Mass,
        DimensionBase::Time,
        DimensionBase::ElectricCurrent,
        DimensionBase::Temperature,
        DimensionBase::AmountOfSubstance,
        DimensionBase::LuminousIntensity,
        DimensionBase::Currency,
    ];
}

/// Commonly used dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedDimension {
    Length,
    Area,
    Volume,
    LengthPerTime,
    VolumePerTime,
    VolumePerTimePerLength,
    VolumePerTimePerArea,
    Mass,
    MassPerTime,
}

/// Powers of the base quantities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    powers: [f64; 8],
}

impl Dimension {
    /// The dimensionless dimension.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predefined(which: PredefinedDimension) -> Self {
        use DimensionBase::{Length, Mass, Time};
        let mut d = Self::new();
        match which {
            PredefinedDimension::Length => d.set_power(Length, 1.0),
            PredefinedDimension::Area => d.set_power(Length, 2.0),
            PredefinedDimension::Volume => d.set_power(Length, 3.0),
            PredefinedDimension::LengthPerTime => {
                d.set_power(Length, 1.0);
                d.set_power(Time, -1.0);
            }
            PredefinedDimension::VolumePerTime => {
                d.set_power(Length, 3.0);
                d.set_power(Time, -1.0);
            }
            PredefinedDimension::VolumePerTimePerLength => {
                d.set_power(Length, 2.0);
                d.set_power(Time, -1.0);
            }
            PredefinedDimension::VolumePerTimePerArea => {
                d.set_power(Length, 1.0);
                d.set_power(Time, -1.0);
            }
            PredefinedDimension::Mass => d.set_power(Mass, 1.0),
            PredefinedDimension::MassPerTime => {
                d.set_power(Mass, 1.0);
                d.set_power(Time, -1.0);
            }
        }
        d
    }

    #[inline]
    pub fn power(&self, base: DimensionBase) -> f64 {
        self.powers[base as usize]
    }

    #[inline]
    pub fn set_power(&mut self, base: DimensionBase, power: f64) {
        self.powers[base as usize] = power;
    }

    /// Returns a copy with `delta` added to the power of `base`.
    pub fn with_added_power(mut self, base: DimensionBase, delta: f64) -> Self {
        self.powers[base as usize] += delta;
        self
    }
}

/// Commonly used units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedUnit {
    Meter,
    Liter,
    CubicMeterPerSecond,
    LiterPerSecond,
    MillimeterPerDay,
}

/// A unit of measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub caption: String,
    pub description: String,
    pub dimension: Dimension,
    pub conversion_factor_to_si: f64,
    pub offset_to_si: f64,
}

impl Unit {
    /// Creates an SI unit (factor 1, offset 0).
    pub fn new(caption: impl Into<String>, dimension: Dimension) -> Self {
        let caption = caption.into();
        Self {
            description: caption.clone(),
            caption,
            dimension,
            conversion_factor_to_si: 1.0,
            offset_to_si: 0.0,
        }
    }

    pub fn predefined(which: PredefinedUnit) -> Self {
        let (caption, description, dimension, factor) = match which {
            PredefinedUnit::Meter => ("m", "meter", PredefinedDimension::Length, 1.0),
            PredefinedUnit::Liter => ("L", "Liter", PredefinedDimension::Volume, 0.001),
            PredefinedUnit::CubicMeterPerSecond => (
                "m3/s",
                "cubic meter per second",
                PredefinedDimension::VolumePerTime,
                1.0,
            ),
            PredefinedUnit::LiterPerSecond => (
                "liter/s",
                "liter per second",
                PredefinedDimension::VolumePerTime,
                0.001,
            ),
            PredefinedUnit::MillimeterPerDay => (
                "mm/day",
                "millimeters per day",
                PredefinedDimension::VolumePerTimePerArea,
                1.15741e-8,
            ),
        };
        Self {
            caption: caption.into(),
            description: description.into(),
            dimension: Dimension::predefined(dimension),
            conversion_factor_to_si: factor,
            offset_to_si: 0.0,
        }
    }

    #[inline]
    pub fn to_si(&self, value: f64) -> f64 {
        value * self.conversion_factor_to_si + self.offset_to_si
    }

    #[inline]
    pub fn from_si(&self, value: f64) -> f64 {
        (value - self.offset_to_si) / self.conversion_factor_to_si
    }
}

/// A named physical quantity with its unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub caption: String,
    pub description: String,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(caption: impl Into<String>, unit: Unit) -> Self {
        let caption = caption.into();
        Self {
            description: caption.clone(),
            caption,
            unit,
        }
    }
}
