//! Flat RGBA colors and the painting capability of meshes

/// An RGBA color with channels normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Default gray used when nothing more specific applies
    pub const DEFAULT_GRAY: Color = Color::rgb(0.7, 0.7, 0.7);

    /// Opaque white
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a fully opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with explicit alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an array, clamped to [0, 1]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c.clamp(0.0, 1.0))
    }

    /// Channels quantized to 8 bits
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.to_array().map(|c| (c * 255.0).round() as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::DEFAULT_GRAY
    }
}

/// How a mesh is colored
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MeshColor {
    /// No explicit color
    #[default]
    Unset,
    /// One color for the whole mesh
    Uniform(Color),
    /// One color per triangle, same length as the triangle list
    PerTriangle(Vec<Color>),
}

/// Capability shared by every mesh representation that carries flat color
pub trait Paintable {
    /// Number of triangles colors apply to
    fn triangle_count(&self) -> usize;

    /// Current coloring
    fn color(&self) -> &MeshColor;

    /// Paint the whole mesh with one color
    fn paint_uniform(&mut self, color: Color);

    /// Paint each triangle individually
    ///
    /// Returns the colors back if their count does not match the triangle count.
    fn paint_triangles(&mut self, colors: Vec<Color>) -> Result<(), Vec<Color>>;

    /// Per-triangle colors, expanding a uniform color and filling unset meshes
    /// with `fallback`
    fn triangle_colors(&self, fallback: Color) -> Vec<Color> {
        let count = self.triangle_count();
        match self.color() {
            MeshColor::Unset => vec![fallback; count],
            MeshColor::Uniform(color) => vec![*color; count],
            MeshColor::PerTriangle(colors) => colors.clone(),
        }
    }
}
