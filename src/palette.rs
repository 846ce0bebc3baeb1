//! Semantic coloring of groups by room keyword
//!
//! A group name is matched against an ordered keyword table. The first keyword
//! (in table order) that occurs anywhere in the name, ignoring case, decides
//! the color. Table order therefore matters: `tv_lounge_1` is colored as `tv`
//! because `tv` is declared before `lounge`, even though both match.

use crate::model::Color;

/// Built-in room keywords and their colors, in match priority order
pub const ROOM_KEYWORDS: &[(&str, [f32; 3])] = &[
    ("bedroom", [1.0, 0.6, 0.8]),
    ("kitchen", [0.4, 0.6, 1.0]),
    ("bathroom", [0.6, 1.0, 0.6]),
    ("living", [1.0, 0.9, 0.5]),
    ("tv", [1.0, 0.7, 0.4]),
    ("lounge", [0.95, 0.6, 0.3]),
    ("dining", [1.0, 0.5, 0.5]),
    ("play", [0.8, 0.6, 1.0]),
    ("office", [0.6, 0.8, 0.9]),
    ("hallway", [0.9, 0.8, 0.7]),
    ("entry", [0.8, 0.8, 0.6]),
    ("terrace", [0.7, 0.9, 0.8]),
    ("washroom", [0.5, 0.9, 0.6]),
    ("garage", [0.6, 0.6, 0.7]),
    ("car", [0.7, 0.7, 0.8]),
    ("lobby", [0.9, 0.8, 0.5]),
];

/// Colors used by the banded fallback, indexed by band
pub const BAND_COLORS: [Color; 5] = [
    Color::rgb(0.9, 0.3, 0.3),
    Color::rgb(0.3, 0.8, 0.3),
    Color::rgb(0.3, 0.4, 0.9),
    Color::rgb(0.9, 0.8, 0.3),
    Color::rgb(0.7, 0.4, 0.8),
];

/// Ordered keyword to color table
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPalette {
    entries: Vec<(String, Color)>,
    fallback: Color,
}

impl RoomPalette {
    /// Create an empty palette that colors everything with the default gray
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: Color::DEFAULT_GRAY,
        }
    }

    /// Append a keyword after all existing ones
    ///
    /// Keywords are matched case-insensitively.
    pub fn with_entry(mut self, keyword: impl AsRef<str>, rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb;
        self.entries
            .push((keyword.as_ref().to_lowercase(), Color::rgb(r, g, b)));
        self
    }

    /// Replace the color used when no keyword matches
    pub fn with_fallback(mut self, color: Color) -> Self {
        self.fallback = color;
        self
    }

    /// Color used when no keyword matches
    pub fn fallback(&self) -> Color {
        self.fallback
    }

    /// Keywords in priority order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// First matching keyword and its color, if any
    pub fn lookup(&self, group_name: &str) -> Option<(&str, Color)> {
        let name = group_name.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(keyword, color)| (keyword.as_str(), *color))
    }

    /// Color for a group, falling back to the default gray
    ///
    /// # Example
    ///
    /// ```
    /// use roomglb::model::Color;
    /// use roomglb::palette::RoomPalette;
    ///
    /// let palette = RoomPalette::default();
    /// assert_eq!(palette.color_for("Bedroom1"), Color::rgb(1.0, 0.6, 0.8));
    /// assert_eq!(palette.color_for("Room42"), Color::DEFAULT_GRAY);
    /// ```
    pub fn color_for(&self, group_name: &str) -> Color {
        self.lookup(group_name)
            .map(|(_, color)| color)
            .unwrap_or(self.fallback)
    }
}

impl Default for RoomPalette {
    fn default() -> Self {
        ROOM_KEYWORDS
            .iter()
            .fold(RoomPalette::new(), |palette, (keyword, rgb)| {
                palette.with_entry(keyword, *rgb)
            })
    }
}
