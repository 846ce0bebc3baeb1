//! JSON scene document stored in the container's first chunk
//!
//! Only the subset of glTF 2.0 the converter emits is modelled: one buffer,
//! flat-colored materials, and triangle primitives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `componentType` for 8-bit unsigned integers
pub const UNSIGNED_BYTE: u32 = 5121;
/// `componentType` for 32-bit unsigned integers
pub const UNSIGNED_INT: u32 = 5125;
/// `componentType` for 32-bit floats
pub const FLOAT: u32 = 5126;

/// Buffer view target for vertex attributes
pub const ARRAY_BUFFER: u32 = 34962;
/// Buffer view target for index data
pub const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Primitive mode for triangle lists
pub const TRIANGLES: u32 = 4;

/// Top-level scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Format metadata
    pub asset: Asset,
    /// Index of the scene to display
    pub scene: usize,
    /// Scenes (always exactly one)
    pub scenes: Vec<SceneNodes>,
    /// One node per mesh
    pub nodes: Vec<Node>,
    /// Meshes in output order
    pub meshes: Vec<MeshDef>,
    /// Flat-color materials
    pub materials: Vec<Material>,
    /// Typed views into buffer views
    pub accessors: Vec<Accessor>,
    /// Byte ranges of the binary chunk
    pub buffer_views: Vec<BufferView>,
    /// The binary chunk (always exactly one)
    pub buffers: Vec<Buffer>,
}

/// Format metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Format version, always "2.0"
    pub version: String,
    /// Tool that produced the file
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub generator: Option<String>,
}

/// Root nodes of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNodes {
    /// Node indices
    pub nodes: Vec<usize>,
}

/// A scene graph node referencing a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Mesh index
    pub mesh: usize,
    /// Optional node name
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

/// A mesh made of primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDef {
    /// Optional mesh name
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Primitives (the converter emits one per mesh)
    pub primitives: Vec<Primitive>,
}

/// A drawable set of triangles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Attribute name to accessor index
    pub attributes: BTreeMap<String, usize>,
    /// Index accessor, absent for un-indexed primitives
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub indices: Option<usize>,
    /// Material index
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub material: Option<usize>,
    /// Primitive topology
    pub mode: u32,
}

/// Flat-colored material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Optional material name
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Base color parameters
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    /// Render both faces; room walls are viewed from inside and out
    pub double_sided: bool,
}

/// Base color parameters of a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    /// Linear RGBA factor
    pub base_color_factor: [f32; 4],
    /// Metalness
    pub metallic_factor: f32,
    /// Roughness
    pub roughness_factor: f32,
}

/// Typed view into a buffer view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Buffer view index
    pub buffer_view: usize,
    /// Element component type
    pub component_type: u32,
    /// Integer components map to [0, 1]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub normalized: Option<bool>,
    /// Number of elements
    pub count: usize,
    /// Element shape ("SCALAR", "VEC3", "VEC4")
    #[serde(rename = "type")]
    pub kind: String,
    /// Per-component minimum (required for positions)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<Vec<f32>>,
    /// Per-component maximum (required for positions)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<Vec<f32>>,
}

/// Byte range of the binary chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    /// Buffer index
    pub buffer: usize,
    /// Start of the range
    pub byte_offset: usize,
    /// Length of the range
    pub byte_length: usize,
    /// Intended GPU binding
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<u32>,
}

/// The binary chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    /// Length in bytes
    pub byte_length: usize,
}
