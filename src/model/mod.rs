//! Data structures for parsed geometry and colored scenes

// Declare all submodules
mod color;
mod core;
mod scene;

// Re-export all public types from core module
pub use core::{DEFAULT_GROUP, Face, Group, ParsedGeometry, Triangle, Vertex};

// Re-export all public types from color module
pub use color::{Color, MeshColor, Paintable};

// Re-export all public types from scene module
pub use scene::{ColoredMesh, Scene, SceneEntry};
