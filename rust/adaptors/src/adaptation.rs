// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transformations an adapted output applies to its adaptee's values.

use std::sync::Arc;

use tidelink_core::{
    Argument, Arguments, DimensionBase, ElementSet, ElementType, Quantity, Unit, ValueSet,
};
use tidelink_geometry::{XYPolygon, XYPolyline};
use tidelink_mapping::{ElementMapper, SpatialMethod};

use crate::error::{Error, Result};

/// What an adapted output does to the values it pulls from its adaptee.
#[derive(Debug, Clone)]
pub enum Adaptation {
    /// Maps values onto a target element set.
    ElementMapper(MapperAdaptation),
    /// Multiplies each element's value by its area or length raised to a power.
    ElementOperation(ElementOperation),
    /// `y = A*x + B` on every value.
    Linear(LinearOperation),
}

impl Adaptation {
    /// Transforms adaptee values. `id` names the adapted output in errors.
    pub fn apply(&self, id: &str, values: ValueSet) -> Result<ValueSet> {
        match self {
            Adaptation::ElementMapper(m) => Ok(m.mapper.map_values(&values)?),
            Adaptation::ElementOperation(op) => {
                let factors = op
                    .factors
                    .as_deref()
                    .ok_or_else(|| Error::NotInitialised(id.to_string()))?;
                Ok(values.multiply_element_values(factors)?)
            }
            Adaptation::Linear(op) => Ok(values.map(|x| op.a * x + op.b)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Adaptation::ElementMapper(_) => "ElementMapper",
            Adaptation::ElementOperation(op) => op.kind.method().id(),
            Adaptation::Linear(_) => "LinearOperation",
        }
    }
}

/// An element mapper bound to its target element set.
#[derive(Debug, Clone)]
pub struct MapperAdaptation {
    pub(crate) mapper: ElementMapper,
    pub(crate) target: Arc<ElementSet>,
}

impl MapperAdaptation {
    pub fn new(
        method: SpatialMethod,
        source: &ElementSet,
        target: Arc<ElementSet>,
    ) -> Result<Self> {
        let mapper = ElementMapper::initialise(method, source, &target)?;
        Ok(Self { mapper, target })
    }

    pub fn mapper(&self) -> &ElementMapper {
        &self.mapper
    }

    pub fn target(&self) -> &ElementSet {
        &self.target
    }

    /// Rebuilds the matrix against the adaptee's current element set.
    pub(crate) fn rebuild(&mut self, source: &ElementSet) -> Result<()> {
        self.mapper = ElementMapper::initialise(self.mapper.method(), source, &self.target)?;
        Ok(())
    }
}

/// Which element measure an [`ElementOperation`] multiplies by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Area,
    LineLength,
}

impl OperationKind {
    pub fn method(&self) -> SpatialMethod {
        match self {
            OperationKind::Area => SpatialMethod::AreaOperation,
            OperationKind::LineLength => SpatialMethod::LineLengthOperation,
        }
    }

    pub fn exponent_argument(&self) -> &'static str {
        match self {
            OperationKind::Area => "AreaExponent",
            OperationKind::LineLength => "LineLengthExponent",
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            OperationKind::Area => ElementType::Polygon,
            OperationKind::LineLength => ElementType::PolyLine,
        }
    }

    /// Powers of length in one unit of the measure.
    fn length_power(&self) -> f64 {
        match self {
            OperationKind::Area => 2.0,
            OperationKind::LineLength => 1.0,
        }
    }

    fn measure_name(&self) -> &'static str {
        match self {
            OperationKind::Area => "area",
            OperationKind::LineLength => "length",
        }
    }

    fn measure(&self, set: &ElementSet, index: usize) -> Result<f64> {
        Ok(match self {
            OperationKind::Area => XYPolygon::from_element(set, index)?.area(),
            OperationKind::LineLength => XYPolyline::from_element(set, index)?.length(),
        })
    }
}

/// Area or line-length scaling with a configurable exponent.
///
/// Factors and the rewritten quantity are computed by [`initialise`]; until
/// then values cannot be produced.
///
/// [`initialise`]: ElementOperation::initialise
#[derive(Debug, Clone)]
pub struct ElementOperation {
    kind: OperationKind,
    exponent: f64,
    factors: Option<Vec<f64>>,
    quantity: Option<Quantity>,
}

impl ElementOperation {
    /// Checks that the adaptee's elements have the measure this operation needs.
    pub fn new(kind: OperationKind, adaptee_set: &ElementSet) -> Result<Self> {
        if adaptee_set.element_type() != kind.element_type() {
            return Err(Error::InvalidAdaptee(format!(
                "{} needs {} elements, adaptee '{}' has {}",
                kind.method().id(),
                kind.element_type(),
                adaptee_set.id,
                adaptee_set.element_type()
            )));
        }
        Ok(Self {
            kind,
            exponent: 1.0,
            factors: None,
            quantity: None,
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Arguments the operation reads on initialisation.
    pub fn arguments(&self) -> Arguments {
        let mut args = self.kind.method().arguments();
        args.push(
            Argument::double(self.kind.exponent_argument(), 1.0).with_description(format!(
                "Power of the element {} the values are multiplied by",
                self.kind.measure_name()
            )),
        );
        args
    }

    /// The rewritten quantity, available after initialisation.
    pub fn quantity(&self) -> Option<&Quantity> {
        self.quantity.as_ref()
    }

    pub fn factors(&self) -> Option<&[f64]> {
        self.factors.as_deref()
    }

    /// Reads the exponent and computes one factor per element.
    pub fn initialise(
        &mut self,
        arguments: &Arguments,
        set: &ElementSet,
        source: &Quantity,
    ) -> Result<()> {
        let exponent = arguments.double_value(self.kind.exponent_argument())?;
        let factors = (0..set.element_count())
            .map(|i| {
                let measure = self.kind.measure(set, i)?;
                Ok(if exponent == 1.0 {
                    measure
                } else if exponent == -1.0 {
                    1.0 / measure
                } else {
                    measure.powf(exponent)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.exponent = exponent;
        self.quantity = Some(scaled_quantity(source, self.kind, exponent));
        self.factors = Some(factors);
        Ok(())
    }
}

/// `source` multiplied by the element measure to the power `exponent`.
fn scaled_quantity(source: &Quantity, kind: OperationKind, exponent: f64) -> Quantity {
    let length_power = kind.length_power() * exponent;
    let unit_suffix = format!(" * m^{}", length_power);
    let quantity_suffix = format!(" * {}^{}", kind.measure_name(), exponent);

    let unit = Unit {
        caption: format!("{}{}", source.unit.caption, unit_suffix),
        description: format!("{}{}", source.unit.description, unit_suffix),
        dimension: source
            .unit
            .dimension
            .with_added_power(DimensionBase::Length, length_power),
        ..source.unit.clone()
    };
    Quantity {
        caption: format!("{}{}", source.caption, quantity_suffix),
        description: format!("{}{}", source.description, quantity_suffix),
        unit,
    }
}

/// Elementwise `y = A*x + B`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearOperation {
    pub a: f64,
    pub b: f64,
}

impl Default for LinearOperation {
    fn default() -> Self {
        Self { a: 1.0, b: 0.0 }
    }
}

impl LinearOperation {
    pub fn arguments() -> Arguments {
        [
            Argument::double("A", 1.0).with_description("A in y = A*x + B"),
            Argument::double("B", 0.0).with_description("B in y = A*x + B"),
        ]
        .into_iter()
        .collect()
    }

    pub fn initialise(&mut self, arguments: &Arguments) -> Result<()> {
        self.a = arguments.double_value("A")?;
        self.b = arguments.double_value("B")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidelink_core::{Dimension, Element, PredefinedDimension};

    fn velocity() -> Quantity {
        let unit = Unit::new("m/s", Dimension::predefined(PredefinedDimension::LengthPerTime));
        Quantity::new("vd: m/s", unit)
    }

    #[test]
    fn area_quantity_rewrite() {
        let q = scaled_quantity(&velocity(), OperationKind::Area, 1.0);
        assert_eq!(q.caption, "vd: m/s * area^1");
        assert_eq!(q.unit.caption, "m/s * m^2");
        assert_eq!(q.unit.dimension.power(DimensionBase::Length), 3.0);
        assert_eq!(q.unit.dimension.power(DimensionBase::Time), -1.0);

        let q = scaled_quantity(&velocity(), OperationKind::LineLength, 0.5);
        assert_eq!(q.caption, "vd: m/s * length^0.5");
        assert_eq!(q.unit.caption, "m/s * m^0.5");
        assert_eq!(q.unit.dimension.power(DimensionBase::Length), 1.5);
    }

    #[test]
    fn operation_rejects_wrong_elements() {
        let mut set = ElementSet::new("pts", ElementType::Point);
        set.add_element(Element::from_xy("a", &[(0.0, 0.0)]));
        let err = ElementOperation::new(OperationKind::Area, &set).unwrap_err();
        assert!(matches!(err, Error::InvalidAdaptee(msg) if msg.contains("ElementOperation300")));
    }

    #[test]
    fn uninitialised_operation_has_no_values() {
        let mut set = ElementSet::new("lines", ElementType::PolyLine);
        set.add_element(Element::from_xy("a", &[(0.0, 0.0), (3.0, 4.0)]));
        let op = ElementOperation::new(OperationKind::LineLength, &set).unwrap();
        let adaptation = Adaptation::ElementOperation(op);
        let err = adaptation.apply("len", ValueSet::single(vec![1.0])).unwrap_err();
        assert!(matches!(err, Error::NotInitialised(id) if id == "len"));
    }

    #[test]
    fn linear_reads_arguments() {
        let mut args = LinearOperation::arguments();
        args.set("A", tidelink_core::ArgValue::Double(2.0)).unwrap();
        args.set("B", tidelink_core::ArgValue::Int(3)).unwrap();
        let mut op = LinearOperation::default();
        op.initialise(&args).unwrap();
        let out = Adaptation::Linear(op)
            .apply("lin", ValueSet::single(vec![1.0, -1.0]))
            .unwrap();
        assert_eq!(out.element_values(0).unwrap(), [5.0, 1.0]);
    }
}
