//! Colored meshes and the scenes handed to the exporter

use super::color::{Color, MeshColor, Paintable};
use super::core::{Triangle, Vertex};
use crate::error::EncodeError;

/// Label used for meshes that carry no name
const UNNAMED: &str = "<unnamed>";

/// A triangle mesh with flat coloring
///
/// Every triangle index is below the vertex count; [`ColoredMesh::new`]
/// refuses to build a mesh that would break this.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredMesh {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    color: MeshColor,
}

impl ColoredMesh {
    /// Create an uncolored mesh, checking every triangle index
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Result<Self, EncodeError> {
        let vertex_count = vertices.len();
        for (i, triangle) in triangles.iter().enumerate() {
            let index = triangle.max_index();
            if index >= vertex_count {
                return Err(EncodeError::IndexOutOfRange {
                    mesh: UNNAMED.to_string(),
                    triangle: i,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            vertices,
            triangles,
            color: MeshColor::Unset,
        })
    }

    /// Create a mesh painted with one color
    pub fn with_uniform_color(
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        color: Color,
    ) -> Result<Self, EncodeError> {
        let mut mesh = Self::new(vertices, triangles)?;
        mesh.paint_uniform(color);
        Ok(mesh)
    }

    /// Create a mesh with one color per triangle
    pub fn with_triangle_colors(
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        colors: Vec<Color>,
    ) -> Result<Self, EncodeError> {
        let mut mesh = Self::new(vertices, triangles)?;
        mesh.paint_triangles(colors)
            .map_err(|colors| EncodeError::ColorCountMismatch {
                mesh: UNNAMED.to_string(),
                colors: colors.len(),
                triangles: mesh.triangles.len(),
            })?;
        Ok(mesh)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangles indexing into [`ColoredMesh::vertices`]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Paintable for ColoredMesh {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn color(&self) -> &MeshColor {
        &self.color
    }

    fn paint_uniform(&mut self, color: Color) {
        self.color = MeshColor::Uniform(color);
    }

    fn paint_triangles(&mut self, colors: Vec<Color>) -> Result<(), Vec<Color>> {
        if colors.len() != self.triangles.len() {
            return Err(colors);
        }
        self.color = MeshColor::PerTriangle(colors);
        Ok(())
    }
}

/// A named mesh inside a multi-mesh scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    /// Group name the mesh was built from
    pub name: String,
    /// The mesh itself
    pub mesh: ColoredMesh,
}

impl SceneEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, mesh: ColoredMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }
}

/// What the exporter serializes
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    /// One named mesh per group, in group order
    Named(Vec<SceneEntry>),
    /// A single unnamed mesh produced by combination or banded fallback
    Single(ColoredMesh),
}

impl Scene {
    /// Meshes paired with their names, in output order
    pub fn meshes(&self) -> Vec<(Option<&str>, &ColoredMesh)> {
        match self {
            Scene::Named(entries) => entries
                .iter()
                .map(|e| (Some(e.name.as_str()), &e.mesh))
                .collect(),
            Scene::Single(mesh) => vec![(None, mesh)],
        }
    }

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        match self {
            Scene::Named(entries) => entries.len(),
            Scene::Single(_) => 1,
        }
    }

    /// Total triangles across all meshes
    pub fn triangle_count(&self) -> usize {
        self.meshes().iter().map(|(_, m)| m.triangle_count()).sum()
    }

    /// Total vertices across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes().iter().map(|(_, m)| m.vertex_count()).sum()
    }

    /// True if there is no triangle to export
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }
}
