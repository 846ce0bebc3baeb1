//! Binary container (GLB) encoding
//!
//! A container is a 12-byte header followed by a JSON chunk describing the
//! scene and a BIN chunk holding vertex, index and color data:
//!
//! ```text
//! magic "glTF" | version 2 | total length
//! chunk length | "JSON"   | scene document, space padded
//! chunk length | "BIN\0"  | buffer data, zero padded
//! ```
//!
//! Uniformly colored meshes are written as indexed primitives whose material
//! carries the color. Meshes with per-triangle colors are un-indexed so that
//! each triangle's three corners can carry its color in `COLOR_0`.

mod buffer;
pub mod document;

use std::collections::BTreeMap;

use crate::error::EncodeError;
use crate::model::{Color, ColoredMesh, MeshColor, Paintable, Scene, Vertex};

use buffer::BufferBuilder;
use document::{
    Asset, Buffer, Document, Material, MeshDef, Node, PbrMetallicRoughness, Primitive, SceneNodes,
    TRIANGLES,
};

/// Container magic, "glTF" in little-endian
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container version
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// BIN chunk type
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Encode a scene into container bytes
///
/// Nothing is written anywhere; the caller decides where the bytes go.
///
/// # Errors
///
/// Fails if the scene has no meshes, a mesh has no triangles, a vertex is
/// not finite, a triangle index is out of range, per-triangle colors do not
/// match the triangle count, or the output would exceed 32-bit sizes.
pub fn encode_scene(scene: &Scene, generator: &str) -> Result<Vec<u8>, EncodeError> {
    let meshes = scene.meshes();
    if meshes.is_empty() {
        return Err(EncodeError::EmptyScene("scene has no meshes".to_string()));
    }

    let mut builder = BufferBuilder::new();
    let mut nodes = Vec::with_capacity(meshes.len());
    let mut mesh_defs = Vec::with_capacity(meshes.len());
    let mut materials = Vec::new();

    for (i, (name, mesh)) in meshes.into_iter().enumerate() {
        let label = name.map(str::to_string).unwrap_or_else(|| format!("mesh_{}", i));
        validate_mesh(&label, mesh)?;

        let primitive = encode_primitive(&mut builder, &mut materials, name, mesh)?;
        mesh_defs.push(MeshDef {
            name: name.map(str::to_string),
            primitives: vec![primitive],
        });
        nodes.push(Node {
            mesh: i,
            name: name.map(str::to_string),
        });
    }

    let (bin, buffer_views, accessors) = builder.finish();
    let document = Document {
        asset: Asset {
            version: "2.0".to_string(),
            generator: Some(generator.to_string()),
        },
        scene: 0,
        scenes: vec![SceneNodes {
            nodes: (0..nodes.len()).collect(),
        }],
        nodes,
        meshes: mesh_defs,
        materials,
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: bin.len(),
        }],
    };

    let json = serde_json::to_vec(&document)?;
    write_container(json, bin)
}

fn validate_mesh(label: &str, mesh: &ColoredMesh) -> Result<(), EncodeError> {
    if mesh.is_empty() {
        return Err(EncodeError::EmptyScene(format!(
            "mesh '{}' has no triangles",
            label
        )));
    }

    if let Some(vertex) = mesh
        .vertices()
        .iter()
        .position(|v| !narrow(v).iter().all(|c| c.is_finite()))
    {
        return Err(EncodeError::NonFiniteVertex {
            mesh: label.to_string(),
            vertex,
        });
    }

    let vertex_count = mesh.vertex_count();
    for (triangle, t) in mesh.triangles().iter().enumerate() {
        let index = t.max_index();
        if index >= vertex_count {
            return Err(EncodeError::IndexOutOfRange {
                mesh: label.to_string(),
                triangle,
                index,
                vertex_count,
            });
        }
    }

    if let MeshColor::PerTriangle(colors) = mesh.color() {
        if colors.len() != mesh.triangle_count() {
            return Err(EncodeError::ColorCountMismatch {
                mesh: label.to_string(),
                colors: colors.len(),
                triangles: mesh.triangle_count(),
            });
        }
    }

    if u32::try_from(mesh.vertex_count().max(mesh.triangle_count() * 3)).is_err() {
        return Err(EncodeError::BufferTooLarge(format!(
            "mesh '{}' has more elements than 32-bit indices can address",
            label
        )));
    }

    Ok(())
}

fn encode_primitive(
    builder: &mut BufferBuilder,
    materials: &mut Vec<Material>,
    name: Option<&str>,
    mesh: &ColoredMesh,
) -> Result<Primitive, EncodeError> {
    let mut attributes = BTreeMap::new();

    let (indices, base_color) = match mesh.color() {
        MeshColor::PerTriangle(colors) => {
            let mut positions = Vec::with_capacity(mesh.triangle_count() * 3);
            let mut corner_colors = Vec::with_capacity(mesh.triangle_count() * 3);
            for (triangle, color) in mesh.triangles().iter().zip(colors) {
                let rgba = color.to_rgba8();
                for index in triangle.indices() {
                    positions.push(narrow(&mesh.vertices()[index]));
                    corner_colors.push(rgba);
                }
            }
            attributes.insert("POSITION".to_string(), builder.push_positions(&positions)?);
            attributes.insert("COLOR_0".to_string(), builder.push_colors(&corner_colors)?);
            (None, Color::WHITE)
        }
        MeshColor::Uniform(_) | MeshColor::Unset => {
            let positions: Vec<[f32; 3]> = mesh.vertices().iter().map(narrow).collect();
            let indices: Vec<u32> = mesh
                .triangles()
                .iter()
                .flat_map(|t| t.indices())
                .map(|i| i as u32)
                .collect();
            attributes.insert("POSITION".to_string(), builder.push_positions(&positions)?);
            let base_color = match mesh.color() {
                MeshColor::Uniform(color) => *color,
                _ => Color::DEFAULT_GRAY,
            };
            (Some(builder.push_indices(&indices)?), base_color)
        }
    };

    materials.push(Material {
        name: name.map(str::to_string),
        pbr_metallic_roughness: PbrMetallicRoughness {
            base_color_factor: base_color.to_array(),
            metallic_factor: 0.0,
            roughness_factor: 0.9,
        },
        double_sided: true,
    });

    Ok(Primitive {
        attributes,
        indices,
        material: Some(materials.len() - 1),
        mode: TRIANGLES,
    })
}

/// Single-precision position; NaN, infinite and out-of-range values stay non-finite
fn narrow(v: &Vertex) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

fn write_container(mut json: Vec<u8>, bin: Vec<u8>) -> Result<Vec<u8>, EncodeError> {
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = HEADER_LEN + CHUNK_HEADER_LEN + json.len() + CHUNK_HEADER_LEN + bin.len();
    let total_u32 = u32::try_from(total).map_err(|_| {
        EncodeError::BufferTooLarge(format!("container of {} bytes exceeds 4 GiB", total))
    })?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_u32.to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin);

    Ok(out)
}

/// Split container bytes back into the scene document and binary chunk
///
/// # Errors
///
/// Returns [`EncodeError::Document`] if the header, chunk layout or JSON is
/// not what [`encode_scene`] produces.
pub fn read_container(bytes: &[u8]) -> Result<(Document, Vec<u8>), EncodeError> {
    let word = |offset: usize| -> Result<u32, EncodeError> {
        bytes
            .get(offset..offset + 4)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
            .ok_or_else(|| EncodeError::Document(format!("truncated at byte {}", offset)))
    };

    if word(0)? != GLB_MAGIC {
        return Err(EncodeError::Document("missing glTF magic".to_string()));
    }
    if word(4)? != GLB_VERSION {
        return Err(EncodeError::Document("unsupported container version".to_string()));
    }
    if word(8)? as usize != bytes.len() {
        return Err(EncodeError::Document(
            "declared length does not match data".to_string(),
        ));
    }

    let json_len = word(HEADER_LEN)? as usize;
    if word(HEADER_LEN + 4)? != CHUNK_JSON {
        return Err(EncodeError::Document("first chunk is not JSON".to_string()));
    }
    let json_start = HEADER_LEN + CHUNK_HEADER_LEN;
    let json = bytes
        .get(json_start..json_start + json_len)
        .ok_or_else(|| EncodeError::Document("truncated JSON chunk".to_string()))?;
    let document: Document = serde_json::from_slice(json)?;

    let bin_header = json_start + json_len;
    let bin = if bin_header < bytes.len() {
        let bin_len = word(bin_header)? as usize;
        if word(bin_header + 4)? != CHUNK_BIN {
            return Err(EncodeError::Document("second chunk is not BIN".to_string()));
        }
        let start = bin_header + CHUNK_HEADER_LEN;
        bytes
            .get(start..start + bin_len)
            .ok_or_else(|| EncodeError::Document("truncated BIN chunk".to_string()))?
            .to_vec()
    } else {
        Vec::new()
    };

    Ok((document, bin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SceneEntry, Triangle};

    fn quad() -> (Vec<Vertex>, Vec<Triangle>) {
        (
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(1.0, 0.0, 0.0),
                Vertex::new(1.0, 1.0, 0.0),
                Vertex::new(0.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
        )
    }

    #[test]
    fn test_header_and_alignment() {
        let (v, t) = quad();
        let mesh = ColoredMesh::with_uniform_color(v, t, Color::rgb(1.0, 0.6, 0.8)).unwrap();
        let bytes = encode_scene(&Scene::Named(vec![SceneEntry::new("Bedroom1", mesh)]), "test")
            .unwrap();

        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(
            u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize,
            bytes.len()
        );
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(&bytes[16..20], b"JSON");
    }

    #[test]
    fn test_uniform_mesh_is_indexed_with_material_color() {
        let (v, t) = quad();
        let mesh = ColoredMesh::with_uniform_color(v, t, Color::rgb(0.4, 0.6, 1.0)).unwrap();
        let bytes = encode_scene(&Scene::Named(vec![SceneEntry::new("Kitchen", mesh)]), "test")
            .unwrap();
        let (doc, bin) = read_container(&bytes).unwrap();

        assert_eq!(doc.nodes[0].name.as_deref(), Some("Kitchen"));
        let primitive = &doc.meshes[0].primitives[0];
        let indices = primitive.indices.unwrap();
        assert_eq!(doc.accessors[indices].count, 6);
        assert_eq!(doc.accessors[primitive.attributes["POSITION"]].count, 4);
        assert!(!primitive.attributes.contains_key("COLOR_0"));
        assert_eq!(
            doc.materials[primitive.material.unwrap()]
                .pbr_metallic_roughness
                .base_color_factor,
            [0.4, 0.6, 1.0, 1.0]
        );
        assert_eq!(doc.buffers[0].byte_length, bin.len());
    }

    #[test]
    fn test_per_triangle_mesh_is_unindexed_with_vertex_colors() {
        let (v, t) = quad();
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let mesh = ColoredMesh::with_triangle_colors(v, t, vec![red, blue]).unwrap();
        let bytes = encode_scene(&Scene::Single(mesh), "test").unwrap();
        let (doc, bin) = read_container(&bytes).unwrap();

        assert_eq!(doc.nodes[0].name, None);
        let primitive = &doc.meshes[0].primitives[0];
        assert_eq!(primitive.indices, None);
        let colors = &doc.accessors[primitive.attributes["COLOR_0"]];
        assert_eq!(colors.count, 6);
        assert_eq!(colors.normalized, Some(true));

        let view = &doc.buffer_views[colors.buffer_view];
        let color_bytes = &bin[view.byte_offset..view.byte_offset + view.byte_length];
        assert_eq!(&color_bytes[0..4], &[255, 0, 0, 255]);
        assert_eq!(&color_bytes[12..16], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_empty_scene_is_rejected() {
        assert!(matches!(
            encode_scene(&Scene::Named(Vec::new()), "test"),
            Err(EncodeError::EmptyScene(_))
        ));
    }

    #[test]
    fn test_mesh_without_triangles_is_rejected() {
        let (v, _) = quad();
        let mesh = ColoredMesh::new(v, Vec::new()).unwrap();
        assert!(matches!(
            encode_scene(&Scene::Single(mesh), "test"),
            Err(EncodeError::EmptyScene(_))
        ));
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let (mut v, t) = quad();
        v[2] = Vertex::new(f64::NAN, 0.0, 0.0);
        let mesh = ColoredMesh::new(v, t).unwrap();
        assert!(matches!(
            encode_scene(&Scene::Single(mesh), "test"),
            Err(EncodeError::NonFiniteVertex { vertex: 2, .. })
        ));
    }

    #[test]
    fn test_f32_overflow_is_rejected() {
        let (mut v, t) = quad();
        v[0] = Vertex::new(1e300, 0.0, 0.0);
        let mesh = ColoredMesh::new(v, t).unwrap();
        assert!(matches!(
            encode_scene(&Scene::Single(mesh), "test"),
            Err(EncodeError::NonFiniteVertex { vertex: 0, .. })
        ));
    }

    #[test]
    fn test_read_container_rejects_garbage() {
        assert!(read_container(b"nope").is_err());
        assert!(read_container(&[0u8; 20]).is_err());
    }
}
