// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element sets: ordered collections of spatial elements.
//!
//! An [`ElementSet`] describes where a quantity is defined. Every element is an
//! ordered list of vertices; how those vertices are interpreted (a single
//! point, a chain of line segments, a closed ring) is decided by the set's
//! [`ElementType`]. Vertex lookups are index based and return an error when an
//! index falls outside the set.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Shape of the elements in an element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// Elements carry an id only, no geometry.
    IdBased,
    Point,
    PolyLine,
    Polygon,
    Polyhedron,
}

impl ElementType {
    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::IdBased => "IdBased",
            ElementType::Point => "Point",
            ElementType::PolyLine => "PolyLine",
            ElementType::Polygon => "Polygon",
            ElementType::Polyhedron => "Polyhedron",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex with optional elevation (`z`) and measure (`m`) values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl Coordinate {
    /// Creates a planar coordinate (`z` and `m` are zero).
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, m: 0.0 }
    }

    /// Creates a coordinate with an elevation.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, m: 0.0 }
    }
}

/// A single element: an id plus its vertices.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub id: String,
    pub vertices: SmallVec<[Coordinate; 4]>,
    /// Faces as vertex index lists. Only used by polyhedrons.
    pub faces: Vec<Vec<usize>>,
}

impl Element {
    /// Creates an element without vertices.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertices: SmallVec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates an element from `(x, y)` pairs.
    pub fn from_xy(id: impl Into<String>, xy: &[(f64, f64)]) -> Self {
        let mut element = Self::new(id);
        element
            .vertices
            .extend(xy.iter().map(|&(x, y)| Coordinate::new(x, y)));
        element
    }

    pub fn add_vertex(&mut self, vertex: Coordinate) {
        self.vertices.push(vertex);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// An ordered collection of elements sharing one [`ElementType`].
///
/// # Example
///
/// ```
/// use tidelink_core::{Element, ElementSet, ElementType};
///
/// let mut set = ElementSet::new("gauges", ElementType::Point);
/// set.add_element(Element::from_xy("g1", &[(0.0, 0.0)]));
/// set.add_element(Element::from_xy("g2", &[(10.0, 0.0)]));
///
/// assert_eq!(set.element_count(), 2);
/// assert_eq!(set.element_index("g2"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSet {
    pub id: String,
    pub caption: String,
    pub description: String,
    pub has_z: bool,
    pub has_m: bool,
    element_type: ElementType,
    elements: Vec<Element>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: FxHashMap<String, usize>,
}

impl ElementSet {
    /// Creates an empty element set. The caption defaults to the id.
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        let id = id.into();
        Self {
            caption: id.clone(),
            id,
            description: String::new(),
            has_z: false,
            has_m: false,
            element_type,
            elements: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Sets the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an element and returns its index.
    pub fn add_element(&mut self, element: Element) -> usize {
        let index = self.elements.len();
        if !element.id.is_empty() {
            self.index.entry(element.id.clone()).or_insert(index);
        }
        self.elements.push(element);
        index
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the element at `index`.
    pub fn element(&self, index: usize) -> Result<&Element> {
        self.elements.get(index).ok_or_else(|| Error::ElementIndex {
            set: self.caption.clone(),
            index,
            count: self.elements.len(),
        })
    }

    /// Returns the id of the element at `index`.
    pub fn element_id(&self, index: usize) -> Result<&str> {
        Ok(self.element(index)?.id.as_str())
    }

    /// Looks up the index of the first element with the given id.
    pub fn element_index(&self, id: &str) -> Option<usize> {
        if self.index.is_empty() && !self.elements.is_empty() {
            // Index is skipped on deserialization.
            return self.elements.iter().position(|e| e.id == id);
        }
        self.index.get(id).copied()
    }

    pub fn vertex_count(&self, element: usize) -> Result<usize> {
        Ok(self.element(element)?.vertex_count())
    }

    /// Returns a vertex of an element.
    pub fn vertex(&self, element: usize, vertex: usize) -> Result<Coordinate> {
        let e = self.element(element)?;
        e.vertices
            .get(vertex)
            .copied()
            .ok_or(Error::VertexIndex {
                element,
                vertex,
                count: e.vertices.len(),
            })
    }

    pub fn vertex_x(&self, element: usize, vertex: usize) -> Result<f64> {
        Ok(self.vertex(element, vertex)?.x)
    }

    pub fn vertex_y(&self, element: usize, vertex: usize) -> Result<f64> {
        Ok(self.vertex(element, vertex)?.y)
    }

    pub fn vertex_z(&self, element: usize, vertex: usize) -> Result<f64> {
        Ok(self.vertex(element, vertex)?.z)
    }

    pub fn vertex_m(&self, element: usize, vertex: usize) -> Result<f64> {
        Ok(self.vertex(element, vertex)?.m)
    }

    /// Number of faces of a polyhedron element; zero for other shapes.
    pub fn face_count(&self, element: usize) -> Result<usize> {
        Ok(self.element(element)?.faces.len())
    }

    pub fn face_vertex_indices(&self, element: usize, face: usize) -> Result<&[usize]> {
        let e = self.element(element)?;
        e.faces
            .get(face)
            .map(Vec::as_slice)
            .ok_or(Error::VertexIndex {
                element,
                vertex: face,
                count: e.faces.len(),
            })
    }

    /// Fails unless the set holds elements of `expected` type.
    pub fn expect_type(&self, expected: ElementType) -> Result<()> {
        if self.element_type != expected {
            return Err(Error::ElementType {
                expected,
                found: self.element_type,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares() -> ElementSet {
        let mut set = ElementSet::new("grid", ElementType::Polygon).with_caption("two squares");
        set.add_element(Element::from_xy(
            "e1",
            &[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)],
        ));
        set.add_element(Element::from_xy(
            "e2",
            &[(3.0, 1.0), (5.0, 1.0), (5.0, 3.0), (3.0, 3.0)],
        ));
        set
    }

    #[test]
    fn test_vertex_access() {
        let set = squares();
        assert_eq!(set.element_count(), 2);
        assert_eq!(set.vertex_count(1).unwrap(), 4);
        assert_eq!(set.vertex_x(1, 1).unwrap(), 5.0);
        assert_eq!(set.vertex_y(0, 2).unwrap(), 3.0);
        assert_eq!(set.vertex_z(0, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_range() {
        let set = squares();
        assert!(matches!(
            set.element(2),
            Err(Error::ElementIndex { index: 2, count: 2, .. })
        ));
        assert!(matches!(
            set.vertex(0, 4),
            Err(Error::VertexIndex { element: 0, vertex: 4, count: 4 })
        ));
    }

    #[test]
    fn test_element_lookup() {
        let set = squares();
        assert_eq!(set.element_index("e2"), Some(1));
        assert_eq!(set.element_index("missing"), None);
        assert_eq!(set.element_id(0).unwrap(), "e1");
    }

    #[test]
    fn test_expect_type() {
        let set = squares();
        assert!(set.expect_type(ElementType::Polygon).is_ok());
        assert!(set.expect_type(ElementType::Point).is_err());
        assert_eq!(ElementType::PolyLine.to_string(), "PolyLine");
    }
}
