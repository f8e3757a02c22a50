//! Output records: positioned text and font descriptions.
//!
//! These are the stable, serializable types the extraction pipeline
//! produces. Field names match the serialized form consumed by downstream
//! tooling and must not change.

/// One extracted text run with its page-space bounding box.
///
/// Coordinates are in default user space of the page (origin bottom-left,
/// y grows upward, 1 unit = 1/72 inch), with `width >= 0` and
/// `height >= 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPlacement {
    /// 0-indexed page number.
    pub page: usize,
    /// Identifier of the font that rendered this run; key into the
    /// document's font map.
    pub font_id: u32,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Bottom edge of the bounding box.
    pub y: f64,
    /// Box width (non-negative).
    pub width: f64,
    /// Box height (non-negative).
    pub height: f64,
    /// The decoded UTF-8 text.
    pub text: String,
}

impl TextPlacement {
    /// Right edge of the bounding box.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge of the bounding box.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// Description of a font used by one or more placements.
///
/// Metrics are in 1/1000 text-space units, as stored in the font
/// dictionary. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontInfo {
    /// Stable identifier of the font dictionary in the document.
    pub font_id: u32,
    /// PostScript font name (e.g. `BCDFEE+ArialMT`).
    pub font_name: String,
    /// Font family (e.g. `Arial`).
    pub family_name: String,
    /// Stretch keyword from the descriptor (e.g. `Normal`, `Condensed`).
    pub font_stretch: String,
    /// Weight value from the descriptor (400 regular, 700 bold).
    pub font_weight: i64,
    /// Descriptor flag bits.
    pub font_flags: i64,
    /// Maximum height above the baseline, 1/1000 units.
    pub ascent: f64,
    /// Maximum depth below the baseline, 1/1000 units (negative).
    pub descent: f64,
    /// Width of the space glyph, 1/1000 units.
    pub space_width: f64,
}
