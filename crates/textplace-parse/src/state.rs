//! Graphics-state frames and the text object.
//!
//! [`GraphicsState`] is the frame saved and restored by `q`/`Q`; the
//! collector keeps a stack of them. [`TextObject`] holds the text matrix
//! pair that exists only between `BT` and `ET` — it is deliberately not
//! part of the frame, matching the PDF text model.

use std::rc::Rc;

use textplace_core::Matrix;

use crate::font::FontDecoder;

/// Text rendering mode set by `Tr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Fill glyphs (the default).
    #[default]
    Fill = 0,
    /// Stroke glyph outlines.
    Stroke = 1,
    /// Fill then stroke.
    FillStroke = 2,
    /// Neither fill nor stroke — invisible text.
    Invisible = 3,
    /// Fill and add to the clipping path.
    FillClip = 4,
    /// Stroke and add to the clipping path.
    StrokeClip = 5,
    /// Fill, stroke, and add to the clipping path.
    FillStrokeClip = 6,
    /// Clipping path only.
    Clip = 7,
}

impl RenderMode {
    /// Map the `Tr` operand to a mode; `None` outside 0..=7.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }
}

/// One graphics-state frame.
///
/// Pushed by `q` and restored by `Q`. The font handle is a cheap `Rc`
/// clone; everything else is plain data, so a frame copy is exactly the
/// deep copy the restore semantics require.
#[derive(Debug, Clone)]
pub struct GraphicsState {
    /// Current transformation matrix.
    pub ctm: Matrix,
    /// Active font, unset until a `Tf` or ExtGState `/Font` applies.
    pub font: Option<Rc<FontDecoder>>,
    /// Active font size, unset until `Tf`.
    pub font_size: Option<f64>,
    /// Character spacing (`Tc`).
    pub char_spacing: f64,
    /// Word spacing (`Tw`), applied to the space glyph code.
    pub word_spacing: f64,
    /// Leading (`TL`), the `T*` line step.
    pub leading: f64,
    /// Horizontal scale (`Tz`), stored as a fraction (operand / 100).
    pub horizontal_scale: f64,
    /// Text rise (`Ts`).
    pub rise: f64,
    /// Text rendering mode (`Tr`).
    pub render_mode: RenderMode,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: None,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
            horizontal_scale: 1.0,
            rise: 0.0,
            render_mode: RenderMode::default(),
        }
    }
}

impl GraphicsState {
    /// Pre-multiply the CTM: `ctm := m × ctm` (the `cm` operator).
    pub fn concat_ctm(&mut self, m: Matrix) {
        self.ctm = m.concat(&self.ctm);
    }
}

/// The text-object sub-state, alive only between `BT` and `ET`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    /// Text matrix: the position of the next glyph.
    pub tm: Matrix,
    /// Text line matrix: the anchor `Td`/`T*` displace from.
    pub tlm: Matrix,
}

impl Default for TextObject {
    fn default() -> Self {
        Self::new()
    }
}

impl TextObject {
    /// Fresh text object with both matrices at identity (the `BT` state).
    pub fn new() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
        }
    }

    /// `Td`: displace the line matrix and restart the text matrix there.
    pub fn next_line(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }

    /// `Tm`: set both matrices outright (replace, not concatenate).
    pub fn set_matrix(&mut self, m: Matrix) {
        self.tm = m;
        self.tlm = m;
    }

    /// Advance the text matrix along x after showing glyphs; the line
    /// matrix stays put.
    pub fn advance(&mut self, tx: f64) {
        self.tm = Matrix::translation(tx, 0.0).concat(&self.tm);
    }
}
