// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The element mapper: a mapping matrix built once and applied per time step.

use tidelink_core::{ElementSet, ElementType, ValueSet};
use tidelink_geometry::check_element_set;
use tracing::debug;

use crate::build;
use crate::catalog::{self, MappingMethod, SpatialMethod};
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::sparse::DoubleSparseMatrix;

/// A built mapping from a source element set to a target element set.
///
/// The only way to obtain a mapper is a successful `initialise*` call, so a
/// mapper that exists always holds a complete matrix. Rebuilding for new
/// element sets means initialising a new mapper.
///
/// ```rust
/// use tidelink_core::{Element, ElementSet, ElementType, ValueSet};
/// use tidelink_mapping::{ElementMapper, SpatialMethod};
///
/// let mut from = ElementSet::new("gauges", ElementType::Point);
/// from.add_element(Element::from_xy("a", &[(0.0, 0.0)]));
/// from.add_element(Element::from_xy("b", &[(10.0, 0.0)]));
/// let mut to = ElementSet::new("sites", ElementType::Point);
/// to.add_element(Element::from_xy("s", &[(3.0, 0.0)]));
///
/// let mapper = ElementMapper::initialise(SpatialMethod::PointToPointNearest, &from, &to)?;
/// let mapped = mapper.map_values(&ValueSet::single(vec![1.5, 4.0]))?;
/// assert_eq!(mapped.get(0, 0)?, 1.5);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ElementMapper {
    method: SpatialMethod,
    mapping: MappingMethod,
    from_type: ElementType,
    to_type: ElementType,
    matrix: DoubleSparseMatrix,
}

impl ElementMapper {
    /// Builds a mapper using the configuration from the environment.
    pub fn initialise(method: SpatialMethod, from: &ElementSet, to: &ElementSet) -> Result<Self> {
        Self::initialise_with(&MapperConfig::default(), method, from, to)
    }

    /// Builds a mapper for a catalog identifier.
    pub fn initialise_by_id(method_id: &str, from: &ElementSet, to: &ElementSet) -> Result<Self> {
        Self::initialise(catalog::find(method_id)?, from, to)
    }

    /// Validates both sets and computes the mapping matrix.
    pub fn initialise_with(
        config: &MapperConfig,
        method: SpatialMethod,
        from: &ElementSet,
        to: &ElementSet,
    ) -> Result<Self> {
        check_element_set(from).map_err(|source| Error::InvalidElementSet {
            role: "source",
            source,
        })?;
        check_element_set(to).map_err(|source| Error::InvalidElementSet {
            role: "target",
            source,
        })?;

        let from_type = from.element_type();
        let to_type = to.element_type();
        if catalog::available_methods(from_type, Some(to_type))
            .iter()
            .all(|m| m.is_operation())
        {
            return Err(Error::UnsupportedElementTypes {
                from: from_type,
                to: to_type,
            });
        }
        let mapping = match method.mapping_method() {
            Some(mapping)
                if method.from_element_type() == from_type
                    && method.to_element_type() == Some(to_type) =>
            {
                mapping
            }
            _ => {
                return Err(Error::MethodShapeMismatch {
                    method: method.id(),
                    from: from_type,
                    to: to_type,
                })
            }
        };

        let (matrix, used_tree) =
            Self::compute(config, mapping, from, to).map_err(|source| Error::MappingFailed {
                from: from_type,
                to: to_type,
                source: Box::new(source),
            })?;

        debug!(
            method = method.id(),
            rows = matrix.row_count(),
            columns = matrix.column_count(),
            nonzero = matrix.nonzero_count(),
            search_tree = used_tree,
            "Built mapping matrix"
        );

        Ok(Self {
            method,
            mapping,
            from_type,
            to_type,
            matrix,
        })
    }

    fn compute(
        config: &MapperConfig,
        mapping: MappingMethod,
        from: &ElementSet,
        to: &ElementSet,
    ) -> Result<(DoubleSparseMatrix, bool)> {
        use ElementType::{Point, PolyLine, Polygon};
        match (from.element_type(), to.element_type()) {
            (Point, Point) => Ok((build::point_to_point(from, to, mapping)?, false)),
            (Point, PolyLine) => Ok((build::point_to_polyline(from, to, mapping)?, false)),
            (PolyLine, Point) => Ok((build::polyline_to_point(from, to, mapping)?, false)),
            (Point, Polygon) => Ok((build::point_to_polygon(from, to, mapping)?, false)),
            (Polygon, Point) => build::polygon_to_point(config, from, to),
            (PolyLine, Polygon) => Ok((build::polyline_to_polygon(from, to, mapping)?, false)),
            (Polygon, PolyLine) => Ok((build::polygon_to_polyline(from, to, mapping)?, false)),
            (Polygon, Polygon) => build::polygon_to_polygon(config, from, to, mapping),
            (from, to) => Err(Error::UnsupportedElementTypes { from, to }),
        }
    }

    pub fn method(&self) -> SpatialMethod {
        self.method
    }

    pub fn mapping_method(&self) -> MappingMethod {
        self.mapping
    }

    pub fn from_element_type(&self) -> ElementType {
        self.from_type
    }

    pub fn to_element_type(&self) -> ElementType {
        self.to_type
    }

    pub fn matrix(&self) -> &DoubleSparseMatrix {
        &self.matrix
    }

    /// Number of target elements.
    pub fn row_count(&self) -> usize {
        self.matrix.row_count()
    }

    /// Number of source elements.
    pub fn column_count(&self) -> usize {
        self.matrix.column_count()
    }

    pub fn value(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.matrix.get(row, col))
    }

    /// Overrides a single weight.
    pub fn set_value(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.matrix.set(row, col, value)
    }

    /// A zero value set shaped for `times` mapped time steps.
    pub fn create_result_value_set(&self, times: usize) -> ValueSet {
        ValueSet::zeros(times, self.row_count())
    }

    /// Maps every time step of `input` into a fresh value set.
    pub fn map_values(&self, input: &ValueSet) -> Result<ValueSet> {
        let mut output = self.create_result_value_set(input.times_count());
        self.map_values_into(&mut output, input)?;
        Ok(output)
    }

    /// Adds the mapped values of `input` to `output`.
    ///
    /// `output` must already have one row of target values per input time
    /// step; existing values are accumulated into, not replaced.
    pub fn map_values_into(&self, output: &mut ValueSet, input: &ValueSet) -> Result<()> {
        if output.times_count() != input.times_count() {
            return Err(Error::DimensionMismatch {
                expected: input.times_count(),
                found: output.times_count(),
            });
        }
        for (out, values) in output.rows_mut().zip(input.rows()) {
            if values.len() != self.column_count() {
                return Err(Error::DimensionMismatch {
                    expected: self.column_count(),
                    found: values.len(),
                });
            }
            self.matrix.product_into(out, values)?;
        }
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.row_count() {
            return Err(Error::IndexOutOfRange {
                what: "row",
                index: row,
                count: self.row_count(),
            });
        }
        if col >= self.column_count() {
            return Err(Error::IndexOutOfRange {
                what: "column",
                index: col,
                count: self.column_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tidelink_core::Element;

    fn point_set(id: &str, xy: &[(f64, f64)]) -> ElementSet {
        let mut set = ElementSet::new(id, ElementType::Point);
        for (i, &p) in xy.iter().enumerate() {
            set.add_element(Element::from_xy(format!("{}{}", id, i), &[p]));
        }
        set
    }

    #[test]
    fn nearest_point_scenario() {
        let from = point_set("f", &[(0.0, 0.0), (10.0, 0.0)]);
        let to = point_set("t", &[(3.0, 0.0), (7.0, 0.0), (5.0, 0.0)]);
        let mapper = ElementMapper::initialise_with(
            &MapperConfig::standard(),
            SpatialMethod::PointToPointNearest,
            &from,
            &to,
        )
        .unwrap();
        assert_eq!(mapper.value(0, 0).unwrap(), 1.0);
        assert_eq!(mapper.value(0, 1).unwrap(), 0.0);
        assert_eq!(mapper.value(1, 1).unwrap(), 1.0);
        assert_relative_eq!(mapper.value(2, 0).unwrap(), 0.5);
        assert_relative_eq!(mapper.value(2, 1).unwrap(), 0.5);
    }

    #[test]
    fn method_must_fit_element_types() {
        let from = point_set("f", &[(0.0, 0.0)]);
        let to = point_set("t", &[(1.0, 0.0)]);
        let err = ElementMapper::initialise_with(
            &MapperConfig::standard(),
            SpatialMethod::PolygonToPointValue,
            &from,
            &to,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MethodShapeMismatch { method: "ElementMapper600", .. }));

        let err = ElementMapper::initialise_by_id("ElementOperation300", &from, &to).unwrap_err();
        assert!(matches!(err, Error::MethodShapeMismatch { .. }));
    }

    #[test]
    fn unknown_identifier() {
        let set = point_set("f", &[(0.0, 0.0)]);
        let err = ElementMapper::initialise_by_id("NoSuchMethod", &set, &set).unwrap_err();
        assert!(matches!(err, Error::UnknownMethod(id) if id == "NoSuchMethod"));
    }

    #[test]
    fn map_values_checks_dimensions() {
        let from = point_set("f", &[(0.0, 0.0), (1.0, 0.0)]);
        let mapper = ElementMapper::initialise_with(
            &MapperConfig::standard(),
            SpatialMethod::PointToPointInverse,
            &from,
            &from,
        )
        .unwrap();
        let err = mapper.map_values(&ValueSet::single(vec![1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 3 }));

        let empty = mapper.map_values(&ValueSet::default()).unwrap();
        assert_eq!(empty.times_count(), 0);
    }

    #[test]
    fn map_values_into_accumulates() {
        let from = point_set("f", &[(0.0, 0.0), (1.0, 0.0)]);
        let mapper = ElementMapper::initialise_with(
            &MapperConfig::standard(),
            SpatialMethod::PointToPointNearest,
            &from,
            &from,
        )
        .unwrap();
        let input = ValueSet::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let mut out = mapper.create_result_value_set(2);
        mapper.map_values_into(&mut out, &input).unwrap();
        mapper.map_values_into(&mut out, &input).unwrap();
        assert_eq!(out.into_rows(), vec![vec![2.0, 4.0], vec![6.0, 8.0]]);
    }

    #[test]
    fn index_checks_and_overrides() {
        let from = point_set("f", &[(0.0, 0.0), (1.0, 0.0)]);
        let mut mapper = ElementMapper::initialise_with(
            &MapperConfig::standard(),
            SpatialMethod::PointToPointNearest,
            &from,
            &from,
        )
        .unwrap();
        assert!(matches!(
            mapper.value(2, 0),
            Err(Error::IndexOutOfRange { what: "row", .. })
        ));
        mapper.set_value(0, 1, 0.25).unwrap();
        assert_eq!(mapper.matrix().get(0, 1), 0.25);
        assert_eq!(mapper.method().id(), "ElementMapper100");
        assert_eq!(mapper.mapping_method(), MappingMethod::Nearest);
    }
}
