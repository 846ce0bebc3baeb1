//! Export tiers
//!
//! Each tier is an [`ExportStrategy`]: it rebuilds a scene from the parsed
//! geometry, encodes it, and commits the bytes to disk. The controller holds
//! the strategies in an ordered list and stops at the first one that
//! succeeds, so the escalation order is data rather than control flow.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::assembly::{assemble_banded, assemble_per_group, combine};
use crate::converter::{ConverterConfig, Tier};
use crate::error::{EncodeError, ExportError};
use crate::model::{ParsedGeometry, Scene};
use crate::writer::encode_scene;

/// What a successful tier produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// File the container was written to
    pub path: PathBuf,
    /// Meshes in the written scene
    pub mesh_count: usize,
    /// Triangles in the written scene
    pub triangle_count: usize,
    /// Size of the container in bytes
    pub byte_len: usize,
}

/// One export tier
pub trait ExportStrategy {
    /// Tier this strategy implements
    fn tier(&self) -> Tier;

    /// Build the scene this tier exports
    fn build_scene(
        &self,
        parsed: &ParsedGeometry,
        config: &ConverterConfig,
    ) -> Result<Scene, EncodeError>;

    /// Build, encode and commit; any failure is reported as this tier failing
    fn export(
        &self,
        parsed: &ParsedGeometry,
        config: &ConverterConfig,
        output: &Path,
    ) -> Result<ExportOutcome, ExportError> {
        let tier = self.tier();
        let scene = self
            .build_scene(parsed, config)
            .map_err(|e| ExportError::tier_failed(tier, e))?;
        let bytes = encode_scene(&scene, config.generator())
            .map_err(|e| ExportError::tier_failed(tier, e))?;
        commit(&bytes, output).map_err(|e| {
            ExportError::tier_failed(tier, format!("cannot write '{}': {}", output.display(), e))
        })?;

        Ok(ExportOutcome {
            path: output.to_path_buf(),
            mesh_count: scene.mesh_count(),
            triangle_count: scene.triangle_count(),
            byte_len: bytes.len(),
        })
    }
}

/// Tier 1: one named mesh per group
#[derive(Debug, Clone, Copy, Default)]
pub struct PerGroupExport;

impl ExportStrategy for PerGroupExport {
    fn tier(&self) -> Tier {
        Tier::PerGroup
    }

    fn build_scene(
        &self,
        parsed: &ParsedGeometry,
        config: &ConverterConfig,
    ) -> Result<Scene, EncodeError> {
        let scene = assemble_per_group(parsed, config.palette());
        if scene.mesh_count() == 0 {
            return Err(EncodeError::EmptyScene(
                "no group produced any triangles".to_string(),
            ));
        }
        Ok(scene)
    }
}

/// Tier 2: the per-group scene merged into one mesh
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinedExport;

impl ExportStrategy for CombinedExport {
    fn tier(&self) -> Tier {
        Tier::Combined
    }

    fn build_scene(
        &self,
        parsed: &ParsedGeometry,
        config: &ConverterConfig,
    ) -> Result<Scene, EncodeError> {
        let grouped = assemble_per_group(parsed, config.palette());
        let mesh = combine(&grouped, config.default_color())?;
        Ok(Scene::Single(mesh))
    }
}

/// Tier 3: all faces, ungrouped, colored in contiguous bands
#[derive(Debug, Clone, Copy, Default)]
pub struct BandedExport;

impl ExportStrategy for BandedExport {
    fn tier(&self) -> Tier {
        Tier::Banded
    }

    fn build_scene(
        &self,
        parsed: &ParsedGeometry,
        config: &ConverterConfig,
    ) -> Result<Scene, EncodeError> {
        let mesh = assemble_banded(parsed, config.band_colors())?;
        Ok(Scene::Single(mesh))
    }
}

/// The tiers in escalation order
pub fn default_strategies() -> Vec<Box<dyn ExportStrategy>> {
    vec![
        Box::new(PerGroupExport),
        Box::new(CombinedExport),
        Box::new(BandedExport),
    ]
}

/// Write `bytes` to `output` all at once
///
/// The data goes to a temporary file in the destination directory which is
/// renamed over `output` only after every byte is on disk. A failure leaves
/// any existing file at `output` untouched and no partial file behind.
pub fn commit(bytes: &[u8], output: &Path) -> std::io::Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(output).map_err(|e| e.error)?;
    Ok(())
}
