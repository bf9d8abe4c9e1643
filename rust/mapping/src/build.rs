// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weight computation for each supported pair of element types.
//!
//! Rows are target elements and columns are source elements. Geometry is
//! extracted once per set before any pairwise work.

use tidelink_core::ElementSet;
use tidelink_geometry::tools::{
    is_point_in_polygon, is_point_in_polygon_or_on_edge, length_of_polyline_inside_polygon,
    point_to_point_distance, polyline_to_point_distance, shared_area,
};
use tidelink_geometry::{
    point_from_element, XYElementSearchTree, XYExtent, XYPoint, XYPolygon, XYPolyline, EPSILON,
};
use tracing::warn;

use crate::catalog::MappingMethod;
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::sparse::DoubleSparseMatrix;

/// Candidate source columns for a query, from the tree or all of them.
struct Candidates {
    tree: Option<XYElementSearchTree>,
    count: usize,
}

impl Candidates {
    fn new(config: &MapperConfig, from: &ElementSet, to_count: usize) -> Result<Self> {
        let tree = if config.tree_applies(from.element_count(), to_count) {
            Some(XYElementSearchTree::build(from, config.max_points_per_node)?)
        } else {
            None
        };
        Ok(Self {
            tree,
            count: from.element_count(),
        })
    }

    fn find(&self, extent: &XYExtent) -> Vec<usize> {
        match &self.tree {
            Some(tree) => tree.find_elements(extent),
            None => (0..self.count).collect(),
        }
    }

    fn uses_tree(&self) -> bool {
        self.tree.is_some()
    }
}

fn points(set: &ElementSet) -> Result<Vec<XYPoint>> {
    (0..set.element_count())
        .map(|i| point_from_element(set, i).map_err(Error::from))
        .collect()
}

fn polylines(set: &ElementSet) -> Result<Vec<XYPolyline>> {
    (0..set.element_count())
        .map(|i| XYPolyline::from_element(set, i).map_err(Error::from))
        .collect()
}

fn polygons(set: &ElementSet) -> Result<Vec<XYPolygon>> {
    (0..set.element_count())
        .map(|i| XYPolygon::from_element(set, i).map_err(Error::from))
        .collect()
}

/// Turns one row of distances into Nearest or Inverse weights.
///
/// Nearest splits `1/k` over the `k` columns tied at the minimum. Inverse
/// normalises `1/d`, falling back to Nearest when the minimum is zero.
fn distance_row(
    matrix: &mut DoubleSparseMatrix,
    row: usize,
    distances: &[f64],
    method: MappingMethod,
) -> Result<()> {
    let Some(min) = distances.iter().copied().reduce(f64::min) else {
        return Ok(());
    };

    if method == MappingMethod::Nearest || min == 0.0 {
        let ties = distances.iter().filter(|&&d| d == min).count();
        let weight = 1.0 / ties as f64;
        for (col, _) in distances.iter().enumerate().filter(|&(_, &d)| d == min) {
            matrix.set(row, col, weight)?;
        }
    } else {
        let denominator: f64 = distances.iter().map(|d| 1.0 / d).sum();
        for (col, d) in distances.iter().enumerate() {
            matrix.set(row, col, (1.0 / d) / denominator)?;
        }
    }
    Ok(())
}

pub(crate) fn point_to_point(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = points(from)?;
    let targets = points(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    let mut distances = Vec::with_capacity(sources.len());
    for (row, target) in targets.iter().enumerate() {
        distances.clear();
        distances.extend(sources.iter().map(|s| point_to_point_distance(target, s)));
        distance_row(&mut matrix, row, &distances, method)?;
    }
    Ok(matrix)
}

pub(crate) fn point_to_polyline(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = points(from)?;
    let targets = polylines(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    let mut distances = Vec::with_capacity(sources.len());
    for (row, target) in targets.iter().enumerate() {
        distances.clear();
        distances.extend(sources.iter().map(|s| polyline_to_point_distance(target, s)));
        distance_row(&mut matrix, row, &distances, method)?;
    }
    Ok(matrix)
}

pub(crate) fn polyline_to_point(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = polylines(from)?;
    let targets = points(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    let mut distances = Vec::with_capacity(sources.len());
    for (row, target) in targets.iter().enumerate() {
        distances.clear();
        distances.extend(sources.iter().map(|s| polyline_to_point_distance(s, target)));
        distance_row(&mut matrix, row, &distances, method)?;
    }
    Ok(matrix)
}

/// Mean gives each contained point `1/count`, Sum gives each `1`.
pub(crate) fn point_to_polygon(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = points(from)?;
    let targets = polygons(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    for (row, polygon) in targets.iter().enumerate() {
        let inside: Vec<usize> = sources
            .iter()
            .enumerate()
            .filter(|(_, p)| is_point_in_polygon(p, polygon))
            .map(|(col, _)| col)
            .collect();
        let weight = match method {
            MappingMethod::Mean => 1.0 / inside.len() as f64,
            _ => 1.0,
        };
        for col in inside {
            matrix.set(row, col, weight)?;
        }
    }
    Ok(matrix)
}

/// Strict containment first, boundary membership only when nothing contains
/// the point. Several hits share the weight evenly.
pub(crate) fn polygon_to_point(
    config: &MapperConfig,
    from: &ElementSet,
    to: &ElementSet,
) -> Result<(DoubleSparseMatrix, bool)> {
    let sources = polygons(from)?;
    let targets = points(to)?;
    let candidates = Candidates::new(config, from, targets.len())?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());

    for (row, point) in targets.iter().enumerate() {
        let cols = candidates.find(&XYExtent::around_point(point, EPSILON));
        let mut hits: Vec<usize> = cols
            .iter()
            .copied()
            .filter(|&c| is_point_in_polygon(point, &sources[c]))
            .collect();
        if hits.is_empty() {
            hits = cols
                .into_iter()
                .filter(|&c| is_point_in_polygon_or_on_edge(point, &sources[c]))
                .collect();
        }
        let weight = 1.0 / hits.len() as f64;
        for col in hits {
            matrix.set(row, col, weight)?;
        }
    }
    Ok((matrix, candidates.uses_tree()))
}

pub(crate) fn polyline_to_polygon(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = polylines(from)?;
    let targets = polygons(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    let mut lengths = Vec::with_capacity(sources.len());

    for (row, polygon) in targets.iter().enumerate() {
        lengths.clear();
        lengths.extend(
            sources
                .iter()
                .map(|line| length_of_polyline_inside_polygon(line, polygon)),
        );
        match method {
            MappingMethod::WeightedMean => {
                let total: f64 = lengths.iter().sum();
                if total > 0.0 {
                    for (col, len) in lengths.iter().enumerate() {
                        matrix.set(row, col, len / total)?;
                    }
                } else {
                    let polygon = to.element_id(row)?;
                    warn!(row, polygon, "No polyline length inside polygon, row left empty");
                }
            }
            _ => {
                for (col, (len, line)) in lengths.iter().zip(&sources).enumerate() {
                    matrix.set(row, col, len / line.length())?;
                }
            }
        }
    }
    Ok(matrix)
}

pub(crate) fn polygon_to_polyline(
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<DoubleSparseMatrix> {
    let sources = polygons(from)?;
    let targets = polylines(to)?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());
    let mut lengths = Vec::with_capacity(sources.len());

    for (row, line) in targets.iter().enumerate() {
        lengths.clear();
        lengths.extend(
            sources
                .iter()
                .map(|polygon| length_of_polyline_inside_polygon(line, polygon)),
        );
        match method {
            MappingMethod::WeightedMean => {
                let total: f64 = lengths.iter().sum();
                if total > 0.0 {
                    for (col, len) in lengths.iter().enumerate() {
                        matrix.set(row, col, len / total)?;
                    }
                } else {
                    let polyline = to.element_id(row)?;
                    warn!(row, polyline, "Polyline lies outside every polygon, row left empty");
                }
            }
            _ => {
                let own = line.length();
                for (col, len) in lengths.iter().enumerate() {
                    matrix.set(row, col, len / own)?;
                }
            }
        }
    }
    Ok(matrix)
}

/// Shared area weights. Distribute divides by the source area, WeightedSum
/// by the target area and WeightedMean normalises the row.
pub(crate) fn polygon_to_polygon(
    config: &MapperConfig,
    from: &ElementSet,
    to: &ElementSet,
    method: MappingMethod,
) -> Result<(DoubleSparseMatrix, bool)> {
    let sources = polygons(from)?;
    let targets = polygons(to)?;
    let candidates = Candidates::new(config, from, targets.len())?;
    let mut matrix = DoubleSparseMatrix::new(targets.len(), sources.len());

    for (row, target) in targets.iter().enumerate() {
        let weights: Vec<(usize, f64)> = candidates
            .find(&target.extent())
            .into_iter()
            .map(|col| {
                let area = shared_area(target, &sources[col]);
                match method {
                    MappingMethod::Distribute => (col, area / sources[col].area()),
                    _ => (col, area),
                }
            })
            .collect();

        let scale = match method {
            MappingMethod::WeightedMean => {
                let denominator: f64 = weights.iter().map(|(_, w)| w).sum();
                if denominator != 0.0 {
                    1.0 / denominator
                } else {
                    1.0
                }
            }
            MappingMethod::WeightedSum => 1.0 / target.area(),
            _ => 1.0,
        };
        for (col, w) in weights {
            matrix.set(row, col, w * scale)?;
        }
    }
    Ok((matrix, candidates.uses_tree()))
}
