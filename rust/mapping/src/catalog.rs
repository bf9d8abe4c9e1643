// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The closed catalog of spatial methods and their stable identifiers.
//!
//! Identifiers are persisted by compositions and never renumbered. Every
//! variant maps to its identifier explicitly in [`SpatialMethod::id`].

use std::fmt;

use tidelink_core::{Argument, Arguments, ElementType};

use crate::error::{Error, Result};

/// How weights are computed once the element types are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MappingMethod {
    Nearest,
    Inverse,
    Mean,
    Sum,
    WeightedMean,
    WeightedSum,
    Distribute,
    Value,
}

impl MappingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMethod::Nearest => "Nearest",
            MappingMethod::Inverse => "Inverse",
            MappingMethod::Mean => "Mean",
            MappingMethod::Sum => "Sum",
            MappingMethod::WeightedMean => "WeightedMean",
            MappingMethod::WeightedSum => "WeightedSum",
            MappingMethod::Distribute => "Distribute",
            MappingMethod::Value => "Value",
        }
    }
}

impl fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every spatial method offered to compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpatialMethod {
    LineLengthOperation,
    AreaOperation,
    PointToPointNearest,
    PointToPointInverse,
    PointToPolylineNearest,
    PointToPolylineInverse,
    PointToPolygonMean,
    PointToPolygonSum,
    PolylineToPointNearest,
    PolylineToPointInverse,
    PolylineToPolygonWeightedMean,
    PolylineToPolygonWeightedSum,
    PolygonToPointValue,
    PolygonToPolylineWeightedMean,
    PolygonToPolylineWeightedSum,
    PolygonToPolygonWeightedMean,
    PolygonToPolygonWeightedSum,
    PolygonToPolygonDistribute,
}

impl SpatialMethod {
    /// Catalog order: operations first, then mappings by identifier.
    pub const ALL: [SpatialMethod; 18] = [
        SpatialMethod::LineLengthOperation,
        SpatialMethod::AreaOperation,
        SpatialMethod::PointToPointNearest,
        SpatialMethod::PointToPointInverse,
        SpatialMethod::PointToPolylineNearest,
        SpatialMethod::PointToPolylineInverse,
        SpatialMethod::PointToPolygonMean,
        SpatialMethod::PointToPolygonSum,
        SpatialMethod::PolylineToPointNearest,
        SpatialMethod::PolylineToPointInverse,
        SpatialMethod::PolylineToPolygonWeightedMean,
        SpatialMethod::PolylineToPolygonWeightedSum,
        SpatialMethod::PolygonToPointValue,
        SpatialMethod::PolygonToPolylineWeightedMean,
        SpatialMethod::PolygonToPolylineWeightedSum,
        SpatialMethod::PolygonToPolygonWeightedMean,
        SpatialMethod::PolygonToPolygonWeightedSum,
        SpatialMethod::PolygonToPolygonDistribute,
    ];

    /// The persisted identifier.
    pub fn id(&self) -> &'static str {
        match self {
            SpatialMethod::LineLengthOperation => "ElementOperation200",
            SpatialMethod::AreaOperation => "ElementOperation300",
            SpatialMethod::PointToPointNearest => "ElementMapper100",
            SpatialMethod::PointToPointInverse => "ElementMapper101",
            SpatialMethod::PointToPolylineNearest => "ElementMapper200",
            SpatialMethod::PointToPolylineInverse => "ElementMapper201",
            SpatialMethod::PointToPolygonMean => "ElementMapper300",
            SpatialMethod::PointToPolygonSum => "ElementMapper301",
            SpatialMethod::PolylineToPointNearest => "ElementMapper400",
            SpatialMethod::PolylineToPointInverse => "ElementMapper401",
            SpatialMethod::PolylineToPolygonWeightedMean => "ElementMapper500",
            SpatialMethod::PolylineToPolygonWeightedSum => "ElementMapper501",
            SpatialMethod::PolygonToPointValue => "ElementMapper600",
            SpatialMethod::PolygonToPolylineWeightedMean => "ElementMapper700",
            SpatialMethod::PolygonToPolylineWeightedSum => "ElementMapper701",
            SpatialMethod::PolygonToPolygonWeightedMean => "ElementMapper800",
            SpatialMethod::PolygonToPolygonWeightedSum => "ElementMapper801",
            SpatialMethod::PolygonToPolygonDistribute => "ElementMapper802",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SpatialMethod::LineLengthOperation => "Polyline operation, multiply by line length",
            SpatialMethod::AreaOperation => "Polygon operation, multiply by area",
            SpatialMethod::PointToPointNearest => "Point-to-point Nearest",
            SpatialMethod::PointToPointInverse => "Point-to-point Inverse",
            SpatialMethod::PointToPolylineNearest => "Point-to-polyline Nearest",
            SpatialMethod::PointToPolylineInverse => "Point-to-polyline Inverse",
            SpatialMethod::PointToPolygonMean => "Point-to-polygon Mean",
            SpatialMethod::PointToPolygonSum => "Point-to-polygon Sum",
            SpatialMethod::PolylineToPointNearest => "Polyline-to-point Nearest",
            SpatialMethod::PolylineToPointInverse => "Polyline-to-point Inverse",
            SpatialMethod::PolylineToPolygonWeightedMean => "Polyline-to-polygon Weighted Mean",
            SpatialMethod::PolylineToPolygonWeightedSum => "Polyline-to-polygon Weighted Sum",
            SpatialMethod::PolygonToPointValue => "Polygon-to-point Value",
            SpatialMethod::PolygonToPolylineWeightedMean => "Polygon-to-polyline Weighted Mean",
            SpatialMethod::PolygonToPolylineWeightedSum => "Polygon-to-polyline Weighted Sum",
            SpatialMethod::PolygonToPolygonWeightedMean => "Polygon-to-polygon Weighted Mean",
            SpatialMethod::PolygonToPolygonWeightedSum => "Polygon-to-polygon Weighted Sum",
            SpatialMethod::PolygonToPolygonDistribute => "Polygon-to-polygon Distribute",
        }
    }

    /// Element type of the values the method consumes.
    pub fn from_element_type(&self) -> ElementType {
        use SpatialMethod::*;
        match self {
            PointToPointNearest | PointToPointInverse | PointToPolylineNearest
            | PointToPolylineInverse | PointToPolygonMean | PointToPolygonSum => ElementType::Point,
            LineLengthOperation
            | PolylineToPointNearest
            | PolylineToPointInverse
            | PolylineToPolygonWeightedMean
            | PolylineToPolygonWeightedSum => ElementType::PolyLine,
            AreaOperation
            | PolygonToPointValue
            | PolygonToPolylineWeightedMean
            | PolygonToPolylineWeightedSum
            | PolygonToPolygonWeightedMean
            | PolygonToPolygonWeightedSum
            | PolygonToPolygonDistribute => ElementType::Polygon,
        }
    }

    /// Element type of the target; operations keep the source elements.
    pub fn to_element_type(&self) -> Option<ElementType> {
        use SpatialMethod::*;
        match self {
            LineLengthOperation | AreaOperation => None,
            PointToPointNearest | PointToPointInverse | PolylineToPointNearest
            | PolylineToPointInverse | PolygonToPointValue => Some(ElementType::Point),
            PointToPolylineNearest
            | PointToPolylineInverse
            | PolygonToPolylineWeightedMean
            | PolygonToPolylineWeightedSum => Some(ElementType::PolyLine),
            PointToPolygonMean
            | PointToPolygonSum
            | PolylineToPolygonWeightedMean
            | PolylineToPolygonWeightedSum
            | PolygonToPolygonWeightedMean
            | PolygonToPolygonWeightedSum
            | PolygonToPolygonDistribute => Some(ElementType::Polygon),
        }
    }

    /// Weighting rule of a mapping; `None` for operations.
    pub fn mapping_method(&self) -> Option<MappingMethod> {
        use SpatialMethod::*;
        Some(match self {
            LineLengthOperation | AreaOperation => return None,
            PointToPointNearest | PointToPolylineNearest | PolylineToPointNearest => {
                MappingMethod::Nearest
            }
            PointToPointInverse | PointToPolylineInverse | PolylineToPointInverse => {
                MappingMethod::Inverse
            }
            PointToPolygonMean => MappingMethod::Mean,
            PointToPolygonSum => MappingMethod::Sum,
            PolylineToPolygonWeightedMean
            | PolygonToPolylineWeightedMean
            | PolygonToPolygonWeightedMean => MappingMethod::WeightedMean,
            PolylineToPolygonWeightedSum
            | PolygonToPolylineWeightedSum
            | PolygonToPolygonWeightedSum => MappingMethod::WeightedSum,
            PolygonToPolygonDistribute => MappingMethod::Distribute,
            PolygonToPointValue => MappingMethod::Value,
        })
    }

    #[inline]
    pub fn is_operation(&self) -> bool {
        self.to_element_type().is_none()
    }

    /// Exact identifier lookup.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    /// Case-insensitive identifier lookup.
    pub fn from_id_ignore_case(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id().eq_ignore_ascii_case(id))
    }

    /// Read-only descriptive arguments of the method.
    pub fn arguments(&self) -> Arguments {
        let mut args = Arguments::new();
        args.push(Argument::fixed_string("Caption", self.id()));
        args.push(Argument::fixed_string("Description", self.description()));
        match self.to_element_type() {
            Some(to) => {
                args.push(Argument::fixed_string("Type", "SpatialMapping"));
                args.push(Argument::fixed_string(
                    "FromElementType",
                    self.from_element_type().as_str(),
                ));
                args.push(Argument::fixed_string("ToElementType", to.as_str()));
            }
            None => {
                args.push(Argument::fixed_string("Type", "SpatialOperation"));
                args.push(Argument::fixed_string(
                    "FromElementType",
                    self.from_element_type().as_str(),
                ));
            }
        }
        args
    }
}

impl fmt::Display for SpatialMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Looks up a method by exact identifier.
pub fn find(id: &str) -> Result<SpatialMethod> {
    SpatialMethod::from_id(id).ok_or_else(|| Error::UnknownMethod(id.to_string()))
}

/// Whether any method has this identifier, ignoring case.
pub fn has_id(id: &str) -> bool {
    SpatialMethod::from_id_ignore_case(id).is_some()
}

/// Methods applicable to values on `from` elements.
///
/// Operations matching `from` come first. Mappings are included only when a
/// target type is given, and then only those that produce it.
pub fn available_methods(from: ElementType, to: Option<ElementType>) -> Vec<SpatialMethod> {
    let operations = SpatialMethod::ALL
        .into_iter()
        .filter(|m| m.is_operation() && m.from_element_type() == from);
    let mappings = SpatialMethod::ALL.into_iter().filter(move |m| {
        !m.is_operation()
            && m.from_element_type() == from
            && to.is_some()
            && m.to_element_type() == to
    });
    operations.chain(mappings).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidelink_core::ArgValue;

    #[test]
    fn identifiers_are_unique_and_round_trip() {
        for m in SpatialMethod::ALL {
            assert_eq!(SpatialMethod::from_id(m.id()), Some(m));
        }
        let mut ids: Vec<_> = SpatialMethod::ALL.iter().map(|m| m.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SpatialMethod::ALL.len());
    }

    #[test]
    fn lookup_case_rules() {
        assert!(has_id("elementmapper802"));
        assert!(matches!(find("elementmapper802"), Err(Error::UnknownMethod(_))));
        assert_eq!(find("ElementMapper802").unwrap(), SpatialMethod::PolygonToPolygonDistribute);
        let err = find("ElementMapper999").unwrap_err();
        assert!(err.to_string().starts_with("Invalid identifier"));
    }

    #[test]
    fn polygon_source_listing() {
        let ids: Vec<_> = available_methods(ElementType::Polygon, Some(ElementType::Polygon))
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(
            ids,
            ["ElementOperation300", "ElementMapper800", "ElementMapper801", "ElementMapper802"]
        );

        let ops: Vec<_> = available_methods(ElementType::Polygon, None)
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(ops, ["ElementOperation300"]);

        assert!(available_methods(ElementType::IdBased, Some(ElementType::Point)).is_empty());
    }

    #[test]
    fn point_to_polyline_descriptions() {
        let described: Vec<_> = available_methods(ElementType::Point, Some(ElementType::PolyLine))
            .into_iter()
            .map(|m| (m.id(), m.description()))
            .collect();
        assert_eq!(
            described,
            [
                ("ElementMapper200", "Point-to-polyline Nearest"),
                ("ElementMapper201", "Point-to-polyline Inverse"),
            ]
        );
    }

    #[test]
    fn arguments_are_read_only() {
        let args = SpatialMethod::PolylineToPolygonWeightedSum.arguments();
        assert_eq!(args.len(), 5);
        assert_eq!(
            args.get("ToElementType").unwrap().value(),
            &ArgValue::String("Polygon".into())
        );
        assert!(args.iter().all(|a| a.read_only));

        let op = SpatialMethod::AreaOperation.arguments();
        assert_eq!(op.len(), 4);
        assert_eq!(op.get("Type").unwrap().value(), &ArgValue::String("SpatialOperation".into()));
    }
}
