//! Building colored meshes from parsed geometry
//!
//! Three assembly modes back the three export tiers:
//!
//! - [`assemble_per_group`] builds one uniformly colored mesh per non-empty group
//! - [`combine`] merges an assembled scene into a single mesh with per-triangle colors
//! - [`assemble_banded`] ignores groups entirely and colors contiguous triangle bands
//!
//! Every mode reconstructs its meshes from scratch, so a failed tier never
//! leaves state behind for the next one.

use std::collections::HashMap;

use crate::error::EncodeError;
use crate::model::{
    Color, ColoredMesh, Group, Paintable, ParsedGeometry, Scene, SceneEntry, Triangle, Vertex,
};
use crate::palette::RoomPalette;
use crate::triangulation::triangulate_all;

/// Build one named, uniformly colored mesh per group
///
/// Groups without faces, or whose faces produce no triangles, are skipped.
/// Each mesh owns a compacted copy of just the vertices its triangles use,
/// in first-use order.
pub fn assemble_per_group(parsed: &ParsedGeometry, palette: &RoomPalette) -> Scene {
    let mut entries = Vec::new();

    for group in parsed.non_empty_groups() {
        let Some(mesh) = group_mesh(group, &parsed.vertices, palette) else {
            continue;
        };
        tracing::debug!(
            "Group '{}': {} vertices, {} triangles",
            group.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        entries.push(SceneEntry::new(group.name.clone(), mesh));
    }

    Scene::Named(entries)
}

fn group_mesh(group: &Group, vertices: &[Vertex], palette: &RoomPalette) -> Option<ColoredMesh> {
    let triangles = triangulate_all(&group.faces);
    if triangles.is_empty() {
        return None;
    }

    let color = palette.color_for(&group.name);
    let mesh = compact(vertices, &triangles).and_then(|(local_vertices, local_triangles)| {
        ColoredMesh::with_uniform_color(local_vertices, local_triangles, color)
    });

    match mesh {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            tracing::warn!("Skipping group '{}': {}", group.name, e);
            None
        }
    }
}

/// Copy the referenced vertices and remap triangles onto the copy
///
/// Vertices no triangle uses are left out.
fn compact(
    vertices: &[Vertex],
    triangles: &[Triangle],
) -> Result<(Vec<Vertex>, Vec<Triangle>), EncodeError> {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut local_vertices = Vec::new();
    let mut local_triangles = Vec::with_capacity(triangles.len());

    for (position, triangle) in triangles.iter().enumerate() {
        let mut corners = [0usize; 3];
        for (slot, index) in corners.iter_mut().zip(triangle.indices()) {
            *slot = match remap.get(&index) {
                Some(&local) => local,
                None => {
                    let vertex = *vertices.get(index).ok_or_else(|| {
                        EncodeError::IndexOutOfRange {
                            mesh: "<source>".to_string(),
                            triangle: position,
                            index,
                            vertex_count: vertices.len(),
                        }
                    })?;
                    let local = local_vertices.len();
                    local_vertices.push(vertex);
                    remap.insert(index, local);
                    local
                }
            };
        }
        let [v1, v2, v3] = corners;
        local_triangles.push(Triangle::new(v1, v2, v3));
    }

    Ok((local_vertices, local_triangles))
}

/// Merge every mesh of a scene into one mesh
///
/// Vertex buffers are concatenated, each mesh's triangles are shifted by the
/// number of vertices that precede it, and colors become a per-triangle array.
/// Uniform colors are expanded; meshes without color get `fallback`.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyScene`] if the scene has no triangles.
pub fn combine(scene: &Scene, fallback: Color) -> Result<ColoredMesh, EncodeError> {
    if scene.is_empty() {
        return Err(EncodeError::EmptyScene(
            "nothing to combine, scene has no triangles".to_string(),
        ));
    }

    let meshes = scene.meshes();
    let mut vertices = Vec::with_capacity(scene.vertex_count());
    let mut triangles = Vec::with_capacity(scene.triangle_count());
    let mut colors = Vec::with_capacity(scene.triangle_count());

    for (_, mesh) in meshes {
        let offset = vertices.len();
        vertices.extend_from_slice(mesh.vertices());
        triangles.extend(mesh.triangles().iter().map(|t| t.offset(offset)));
        colors.extend(mesh.triangle_colors(fallback));
    }

    ColoredMesh::with_triangle_colors(vertices, triangles, colors)
}

/// Band a triangle at `position` falls into
///
/// Bands are `ceil(total / bands)` triangles wide; the final band takes
/// whatever remains.
pub fn band_index(position: usize, total: usize, bands: usize) -> usize {
    if total == 0 || bands == 0 {
        return 0;
    }
    let band_size = total.div_ceil(bands);
    (position / band_size).min(bands - 1)
}

/// Triangulate all faces regardless of group and color them in bands
///
/// Only vertices referenced by a face are carried into the mesh.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyScene`] if there are no triangles or no band
/// colors.
pub fn assemble_banded(
    parsed: &ParsedGeometry,
    band_colors: &[Color],
) -> Result<ColoredMesh, EncodeError> {
    if band_colors.is_empty() {
        return Err(EncodeError::EmptyScene("no band colors configured".to_string()));
    }

    let triangles = triangulate_all(&parsed.faces);
    if triangles.is_empty() {
        return Err(EncodeError::EmptyScene(
            "source has no faces to triangulate".to_string(),
        ));
    }

    let total = triangles.len();
    let colors = (0..total)
        .map(|i| band_colors[band_index(i, total, band_colors.len())])
        .collect();

    let (vertices, triangles) = compact(&parsed.vertices, &triangles)?;
    ColoredMesh::with_triangle_colors(vertices, triangles, colors)
}
