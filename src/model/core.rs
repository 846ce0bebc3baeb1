//! Core geometry types produced by the parser

use crate::error::GeometryWarning;

/// Name of the group that collects faces before any naming directive
pub const DEFAULT_GROUP: &str = "default";

/// A 3D vertex with x, y, z coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A polygonal face as an ordered list of zero-based vertex indices
///
/// Faces are only constructed by the parser once at least 3 references have
/// survived range filtering, so every stored face is a polygon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    indices: Vec<usize>,
}

impl Face {
    /// Create a face from resolved indices
    ///
    /// Returns `None` if fewer than 3 indices are given.
    pub fn new(indices: Vec<usize>) -> Option<Self> {
        if indices.len() < 3 {
            return None;
        }
        Some(Self { indices })
    }

    /// Vertex indices in winding order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of corners
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if the face has no corners
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }

    /// The three indices in order
    pub fn indices(&self) -> [usize; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Largest index referenced
    pub fn max_index(&self) -> usize {
        self.v1.max(self.v2).max(self.v3)
    }

    /// Same triangle with every index shifted by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self::new(self.v1 + offset, self.v2 + offset, self.v3 + offset)
    }
}

/// A named, ordered collection of faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group name exactly as written after the naming directive
    pub name: String,
    /// Faces in source order
    pub faces: Vec<Face>,
}

impl Group {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }

    /// True if no face was assigned to this group
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Result of parsing one geometry source
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGeometry {
    /// All vertices in source order
    pub vertices: Vec<Vertex>,
    /// Every accepted face, ignoring grouping
    pub faces: Vec<Face>,
    /// Groups in first-encounter order; the default group is always first
    pub groups: Vec<Group>,
    /// Recoverable problems found while parsing
    pub warnings: Vec<GeometryWarning>,
}

impl ParsedGeometry {
    /// Create an empty result holding only the default group
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            groups: vec![Group::new(DEFAULT_GROUP)],
            warnings: Vec::new(),
        }
    }

    /// Number of parsed vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of accepted faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Groups that received at least one face
    pub fn non_empty_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    /// Look up a group by exact name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// True if there is nothing to triangulate
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

impl Default for ParsedGeometry {
    fn default() -> Self {
        Self::new()
    }
}
