//! # roomglb
//!
//! Converts OBJ-style room geometry into a binary glTF (GLB) scene.
//!
//! The source is a text file of vertices, polygonal faces and named groups,
//! typically one group per room. Each group is triangulated, colored by the
//! room keyword in its name, and written as its own mesh. Export escalates
//! through three tiers until one produces a valid file:
//!
//! 1. one named mesh per group
//! 2. all groups merged into a single mesh with per-triangle colors
//! 3. all faces, ignoring groups, colored in five contiguous bands
//!
//! Malformed lines and faces in the source are skipped and reported as
//! warnings. Only an unreadable source or the failure of every tier is an
//! error.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = roomglb::convert_file("house.obj", "house.glb")?;
//! println!(
//!     "Wrote {} meshes via the {} tier",
//!     report.mesh_count, report.tier
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assembly;
pub mod converter;
pub mod error;
pub mod export;
pub mod model;
pub mod palette;
pub mod parser;
pub mod triangulation;
pub mod writer;

pub use converter::{
    ConversionController, ConversionReport, ConverterConfig, Tier, default_output_path,
};
pub use error::{EncodeError, Error, ExportError, GeometryWarning, ParseError, Result};
pub use export::{BandedExport, CombinedExport, ExportOutcome, ExportStrategy, PerGroupExport};
pub use model::{
    Color, ColoredMesh, Face, Group, MeshColor, Paintable, ParsedGeometry, Scene, SceneEntry,
    Triangle, Vertex,
};
pub use palette::RoomPalette;

use std::path::Path;

/// Convert `input` to `output` with the default configuration
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input cannot be read and [`Error::Export`]
/// if every export tier fails.
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
    ConversionController::default().convert_file(input, output)
}

/// Convert `input` to a `.glb` file next to it
///
/// # Errors
///
/// Same as [`convert_file`].
pub fn convert_in_place(input: impl AsRef<Path>) -> Result<ConversionReport> {
    let input = input.as_ref();
    convert_file(input, default_output_path(input))
}
