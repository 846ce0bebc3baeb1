//! Conversion orchestration
//!
//! A conversion moves through these stages:
//!
//! ```text
//! Start -> Parsed -> PerGroup -> Combined -> Banded -> Succeeded | Failed
//! ```
//!
//! Reading the source is the only step that can abort early. After that each
//! tier is attempted once, in order, and the first success ends the run.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, GeometryWarning, Result};
use crate::export::{ExportStrategy, default_strategies};
use crate::model::{Color, ParsedGeometry};
use crate::palette::{BAND_COLORS, RoomPalette};
use crate::parser::parse_file;

/// Export tiers in escalation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// One named, uniformly colored mesh per group
    PerGroup,
    /// All group meshes merged into one mesh with per-triangle colors
    Combined,
    /// Ungrouped faces colored in contiguous bands
    Banded,
}

impl Tier {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Tier::PerGroup => "per-group",
            Tier::Combined => "combined",
            Tier::Banded => "banded",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by every tier
///
/// # Example
///
/// ```
/// use roomglb::ConverterConfig;
/// use roomglb::model::Color;
/// use roomglb::palette::RoomPalette;
///
/// let config = ConverterConfig::new()
///     .with_palette(RoomPalette::default().with_entry("study", [0.3, 0.3, 0.6]))
///     .with_default_color(Color::rgb(0.5, 0.5, 0.5))
///     .with_generator("my-pipeline");
/// assert_eq!(config.generator(), "my-pipeline");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    palette: RoomPalette,
    default_color: Color,
    band_colors: [Color; 5],
    generator: String,
}

impl ConverterConfig {
    /// Create a configuration with the built-in room palette
    pub fn new() -> Self {
        Self {
            palette: RoomPalette::default(),
            default_color: Color::DEFAULT_GRAY,
            band_colors: BAND_COLORS,
            generator: format!("roomglb {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Replace the keyword palette
    ///
    /// The palette's fallback is replaced by the configured default color.
    pub fn with_palette(mut self, palette: RoomPalette) -> Self {
        self.palette = palette.with_fallback(self.default_color);
        self
    }

    /// Color for groups that match no keyword and meshes with no color
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self.palette = self.palette.with_fallback(color);
        self
    }

    /// Replace the five banded fallback colors
    pub fn with_band_colors(mut self, colors: [Color; 5]) -> Self {
        self.band_colors = colors;
        self
    }

    /// Tool name recorded in the container
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Keyword palette
    pub fn palette(&self) -> &RoomPalette {
        &self.palette
    }

    /// Color for unmatched groups and uncolored meshes
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Banded fallback colors
    pub fn band_colors(&self) -> &[Color; 5] {
        &self.band_colors
    }

    /// Tool name recorded in the container
    pub fn generator(&self) -> &str {
        &self.generator
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a successful conversion
#[derive(Debug)]
pub struct ConversionReport {
    /// Written container
    pub output: PathBuf,
    /// Tier that produced it
    pub tier: Tier,
    /// Failures of the tiers tried before it, in order
    pub failed_attempts: Vec<ExportError>,
    /// Meshes in the written scene
    pub mesh_count: usize,
    /// Triangles in the written scene
    pub triangle_count: usize,
    /// Size of the container in bytes
    pub byte_len: usize,
    /// Recoverable problems found in the source
    pub warnings: Vec<GeometryWarning>,
}

impl ConversionReport {
    /// True if the first tier did not succeed
    pub fn used_fallback(&self) -> bool {
        !self.failed_attempts.is_empty()
    }
}

/// Runs a conversion through the ordered export tiers
pub struct ConversionController {
    config: ConverterConfig,
    strategies: Vec<Box<dyn ExportStrategy>>,
}

impl ConversionController {
    /// Controller with the standard three tiers
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_strategies(config, default_strategies())
    }

    /// Controller with a custom ordered list of tiers
    pub fn with_strategies(
        config: ConverterConfig,
        strategies: Vec<Box<dyn ExportStrategy>>,
    ) -> Self {
        Self { config, strategies }
    }

    /// Tiers in the order they will be attempted
    pub fn tiers(&self) -> Vec<Tier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Parse `input` and export it to `output`
    ///
    /// # Errors
    ///
    /// - [`ParseError::Unreadable`](crate::error::ParseError::Unreadable) if `input` cannot be read
    /// - [`ExportError::Exhausted`] if every tier fails
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ConversionReport> {
        let input = input.as_ref();
        tracing::info!("Converting '{}'", input.display());
        let parsed = parse_file(input)?;
        Ok(self.convert_parsed(&parsed, output.as_ref())?)
    }

    /// Export already-parsed geometry to `output`
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Exhausted`] carrying every tier's failure if no
    /// tier succeeds.
    pub fn convert_parsed(
        &self,
        parsed: &ParsedGeometry,
        output: &Path,
    ) -> std::result::Result<ConversionReport, ExportError> {
        let mut failed_attempts = Vec::new();

        for strategy in &self.strategies {
            match strategy.export(parsed, &self.config, output) {
                Ok(outcome) => {
                    tracing::info!(
                        "Wrote '{}' with {} tier: {} meshes, {} triangles, {} bytes",
                        outcome.path.display(),
                        strategy.tier(),
                        outcome.mesh_count,
                        outcome.triangle_count,
                        outcome.byte_len
                    );
                    return Ok(ConversionReport {
                        output: outcome.path,
                        tier: strategy.tier(),
                        failed_attempts,
                        mesh_count: outcome.mesh_count,
                        triangle_count: outcome.triangle_count,
                        byte_len: outcome.byte_len,
                        warnings: parsed.warnings.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    failed_attempts.push(e);
                }
            }
        }

        Err(ExportError::Exhausted {
            attempts: failed_attempts,
        })
    }
}

impl Default for ConversionController {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl fmt::Debug for ConversionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionController")
            .field("config", &self.config)
            .field("tiers", &self.tiers())
            .finish()
    }
}

/// Output path for an input file: same location and stem, `.glb` extension
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("glb")
}
