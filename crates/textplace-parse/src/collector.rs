//! The text placement collector.
//!
//! [`PlacementCollector`] implements [`StreamHandler`] and owns the whole
//! graphics machine: the `q`/`Q` frame stack, the `BT`/`ET` text object,
//! the resource-scope stack, and the document-scoped font cache. Text
//! showing operators produce one [`PlacedText`] per shown string.

use std::collections::HashMap;
use std::rc::Rc;

use textplace_core::{ExtractWarning, FontInfo, Matrix, Rect, WarningCode};

use crate::font::{FontDecoder, TranslationMethod};
use crate::interpreter::{ResourceScope, StreamHandler};
use crate::state::{GraphicsState, RenderMode, TextObject};
use crate::tokenizer::{Operand, Operation};

/// One emitted text run, in interpreter-level form.
///
/// `matrix` is the text rendering matrix composed with the CTM at the
/// moment the string was shown; `global_box` is `local_box` pushed
/// through it and axis-aligned.
#[derive(Debug, Clone)]
pub struct PlacedText {
    /// Decoded UTF-8 text.
    pub text: String,
    /// Identifier of the rendering font.
    pub font_id: u32,
    /// Text rendering matrix × CTM at the start of the string.
    pub matrix: Matrix,
    /// Box in text space, before the matrix: `[0, descent·size/1000,
    /// total advance, ascent·size/1000]`.
    pub local_box: Rect,
    /// `local_box` transformed to page space.
    pub global_box: Rect,
    /// Space width in text-space units (glyph width + spacing terms).
    pub space_width: f64,
    /// `space_width` carried through the matrix as a vector: the page-
    /// space advance a single space would take, `(x, y)`.
    pub global_space_width: (f64, f64),
    /// How the string bytes were translated, for observability.
    pub method: TranslationMethod,
}

/// Folds interpreter events into [`PlacedText`] records.
///
/// One collector serves a whole document: call
/// [`take_placements`](PlacementCollector::take_placements) at each page
/// boundary — it drains the page's records and resets the per-page state
/// while the font cache keeps interning across pages.
pub struct PlacementCollector<'a> {
    doc: &'a lopdf::Document,
    gs: GraphicsState,
    gs_stack: Vec<GraphicsState>,
    text: Option<TextObject>,
    scopes: Vec<ResourceScope>,
    /// Saved `(stack depth, frame)` per open XObject invocation, so the
    /// state around a form survives unbalanced q/Q inside it.
    xobject_saves: Vec<(usize, GraphicsState)>,
    font_cache: HashMap<u32, Rc<FontDecoder>>,
    fonts_seen: HashMap<u32, FontInfo>,
    next_synthetic_id: u32,
    raw_warned: bool,
    placements: Vec<PlacedText>,
    warnings: Vec<ExtractWarning>,
}

impl<'a> PlacementCollector<'a> {
    /// Create a collector over a document.
    pub fn new(doc: &'a lopdf::Document) -> Self {
        Self {
            doc,
            gs: GraphicsState::default(),
            gs_stack: Vec::new(),
            text: None,
            scopes: Vec::new(),
            xobject_saves: Vec::new(),
            font_cache: HashMap::new(),
            fonts_seen: HashMap::new(),
            next_synthetic_id: u32::MAX,
            raw_warned: false,
            placements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Drain the collected placements and reset per-page state.
    ///
    /// The font cache and accumulated font descriptions survive — they
    /// are document-scoped.
    pub fn take_placements(&mut self) -> Vec<PlacedText> {
        self.gs = GraphicsState::default();
        self.gs_stack.clear();
        self.text = None;
        self.scopes.clear();
        self.xobject_saves.clear();
        self.raw_warned = false;
        std::mem::take(&mut self.placements)
    }

    /// Drain the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<ExtractWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Descriptions of every font seen so far, keyed by font id.
    pub fn fonts(&self) -> &HashMap<u32, FontInfo> {
        &self.fonts_seen
    }

    // --- Operator semantics ---

    fn apply(&mut self, op: &Operation) {
        let args = &op.operands;
        match op.operator.as_str() {
            "q" => self.gs_stack.push(self.gs.clone()),
            "Q" => {
                // A stray Q on an empty stack is a no-op.
                if let Some(frame) = self.gs_stack.pop() {
                    self.gs = frame;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(args) {
                    self.gs.concat_ctm(m);
                }
            }
            "gs" => self.apply_ext_g_state(args),
            "Tf" => self.apply_tf(args),
            "Tc" => {
                if let Some(v) = number_at(args, 0) {
                    self.gs.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number_at(args, 0) {
                    self.gs.word_spacing = v;
                }
            }
            "TL" => {
                if let Some(v) = number_at(args, 0) {
                    self.gs.leading = v;
                }
            }
            "Tz" => {
                if let Some(v) = number_at(args, 0) {
                    self.gs.horizontal_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number_at(args, 0) {
                    self.gs.rise = v;
                }
            }
            "Tr" => {
                if let Some(mode) = args
                    .first()
                    .and_then(Operand::as_i64)
                    .and_then(RenderMode::from_i64)
                {
                    self.gs.render_mode = mode;
                }
            }
            "BT" => self.text = Some(TextObject::new()),
            "ET" => self.text = None,
            // Positioning operators are meaningless outside BT..ET.
            "Td" => {
                if let (Some(tx), Some(ty), Some(text)) =
                    (number_at(args, 0), number_at(args, 1), self.text.as_mut())
                {
                    text.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number_at(args, 0), number_at(args, 1)) {
                    self.gs.leading = -ty;
                    if let Some(text) = self.text.as_mut() {
                        text.next_line(tx, ty);
                    }
                }
            }
            "Tm" => {
                if let (Some(m), Some(text)) = (matrix_operands(args), self.text.as_mut()) {
                    text.set_matrix(m);
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(bytes) = args.first().and_then(Operand::as_bytes) {
                    self.show_bytes(bytes);
                } else {
                    self.warn_malformed("Tj without a string operand");
                }
            }
            "TJ" => self.apply_tj_array(args),
            "'" => {
                self.next_line();
                if let Some(bytes) = args.first().and_then(Operand::as_bytes) {
                    self.show_bytes(bytes);
                }
            }
            "\"" => {
                if args.len() >= 3 {
                    if let Some(aw) = number_at(args, 0) {
                        self.gs.word_spacing = aw;
                    }
                    if let Some(ac) = number_at(args, 1) {
                        self.gs.char_spacing = ac;
                    }
                    self.next_line();
                    if let Some(bytes) = args[2].as_bytes() {
                        self.show_bytes(bytes);
                    }
                } else {
                    self.warn_malformed("\" with fewer than three operands");
                }
            }
            // Painting, color, clipping, and marked-content operators do
            // not affect text placement.
            _ => {}
        }
    }

    fn next_line(&mut self) {
        let leading = self.gs.leading;
        if let Some(text) = self.text.as_mut() {
            text.next_line(0.0, -leading);
        }
    }

    fn apply_tj_array(&mut self, args: &[Operand]) {
        let Some(Operand::Array(items)) = args.first() else {
            self.warn_malformed("TJ without an array operand");
            return;
        };
        for item in items {
            match item {
                Operand::Str(bytes) => self.show_bytes(bytes),
                Operand::Integer(_) | Operand::Real(_) => {
                    let n = item.as_f64().unwrap_or(0.0);
                    let size = self.gs.font_size.unwrap_or(0.0);
                    let shift = -n / 1000.0 * size * self.gs.horizontal_scale;
                    if let Some(text) = self.text.as_mut() {
                        text.advance(shift);
                    }
                }
                _ => {}
            }
        }
    }

    fn apply_tf(&mut self, args: &[Operand]) {
        let (Some(name), Some(size)) = (
            args.first().and_then(Operand::as_name).map(str::to_owned),
            number_at(args, 1),
        ) else {
            self.warn_malformed("Tf expects a name and a size");
            return;
        };

        self.gs.font_size = Some(size);
        match self.lookup_font(&name) {
            Some(font) => self.gs.font = Some(font),
            None => {
                self.gs.font = None;
                self.warnings.push(
                    ExtractWarning::new(
                        WarningCode::MissingFont,
                        format!("font /{name} not found in resources"),
                    )
                    .with_font(name),
                );
            }
        }
    }

    fn apply_ext_g_state(&mut self, args: &[Operand]) {
        let Some(name) = args.first().and_then(Operand::as_name) else {
            self.warn_malformed("gs without a name operand");
            return;
        };

        let entry = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.ext_g_states.get(name))
            .cloned();
        let Some(entry) = entry else {
            self.warnings.push(ExtractWarning::new(
                WarningCode::MissingFont,
                format!("ExtGState /{name} not found in resources"),
            ));
            return;
        };

        // Only the /Font entry matters here; every other ExtGState key
        // is irrelevant to placement and ignored.
        let font_entry = match self.resolve(&entry) {
            lopdf::Object::Dictionary(d) => d.get(b"Font").ok().cloned(),
            _ => None,
        };
        if let Some(lopdf::Object::Array(pair)) = font_entry.map(|o| self.resolve_owned(o)) {
            if pair.len() == 2 {
                if let Some(size) = match &pair[1] {
                    lopdf::Object::Integer(i) => Some(*i as f64),
                    lopdf::Object::Real(f) => Some(f64::from(*f)),
                    _ => None,
                } {
                    if let Some(font) = self.decoder_for(&pair[0]) {
                        self.gs.font = Some(font);
                        self.gs.font_size = Some(size);
                    }
                }
            }
        }
    }

    // --- String showing ---

    fn show_bytes(&mut self, bytes: &[u8]) {
        let Some(tm) = self.text.as_ref().map(|t| t.tm) else {
            return;
        };
        // Showing requires a font and size; without them the operator is
        // skipped, never fatal.
        let (Some(font), Some(size)) = (self.gs.font.clone(), self.gs.font_size) else {
            return;
        };
        if bytes.is_empty() {
            return;
        }

        let (text, method) = font.translate(bytes);
        if method == TranslationMethod::Raw && !self.raw_warned {
            self.raw_warned = true;
            self.warnings.push(ExtractWarning::new(
                WarningCode::EncodingFallback,
                format!(
                    "font {} decoded as raw Latin-1",
                    font.base_font()
                ),
            ));
        }

        let scale = self.gs.horizontal_scale;
        let trm = Matrix::new(size * scale, 0.0, 0.0, size, 0.0, self.gs.rise)
            .concat(&tm)
            .concat(&self.gs.ctm);

        let space_code = font.space_char_code();
        let mut advance = 0.0;
        for d in font.displacements(bytes) {
            let word = if Some(d.code) == space_code {
                self.gs.word_spacing
            } else {
                0.0
            };
            advance += ((d.width / 1000.0) * size + self.gs.char_spacing + word) * scale;
        }

        let local_box = Rect::new(
            0.0,
            font.descent() * size / 1000.0,
            advance,
            font.ascent() * size / 1000.0,
        );
        let global_box = local_box.transformed(&trm);

        let space_width =
            font.space_width() * size / 1000.0 + self.gs.char_spacing + self.gs.word_spacing;
        let global_space_width = trm.transform_vector(space_width, 0.0);

        self.placements.push(PlacedText {
            text,
            font_id: font.font_id(),
            matrix: trm,
            local_box,
            global_box,
            space_width,
            global_space_width,
            method,
        });

        if let Some(text_obj) = self.text.as_mut() {
            text_obj.advance(advance);
        }
    }

    // --- Font resolution ---

    /// Resolve a font resource name through the scope stack, innermost
    /// first, and intern a decoder for it.
    fn lookup_font(&mut self, name: &str) -> Option<Rc<FontDecoder>> {
        let entry = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.fonts.get(name))
            .cloned()?;
        self.decoder_for(&entry)
    }

    /// Decoder for a font object: an indirect reference (interned by
    /// object number) or a direct dictionary (synthetic id, not cached).
    fn decoder_for(&mut self, obj: &lopdf::Object) -> Option<Rc<FontDecoder>> {
        match obj {
            lopdf::Object::Reference(id) => {
                let font_id = id.0;
                if let Some(cached) = self.font_cache.get(&font_id) {
                    return Some(Rc::clone(cached));
                }
                let dict = match self.doc.get_object(*id).ok()? {
                    lopdf::Object::Dictionary(d) => d,
                    _ => return None,
                };
                let decoder = Rc::new(FontDecoder::new(self.doc, dict, font_id));
                self.fonts_seen.insert(font_id, decoder.info());
                self.font_cache.insert(font_id, Rc::clone(&decoder));
                Some(decoder)
            }
            lopdf::Object::Dictionary(dict) => {
                let font_id = self.next_synthetic_id;
                self.next_synthetic_id = self.next_synthetic_id.wrapping_sub(1);
                let decoder = Rc::new(FontDecoder::new(self.doc, dict, font_id));
                self.fonts_seen.insert(font_id, decoder.info());
                Some(decoder)
            }
            _ => None,
        }
    }

    fn resolve<'b>(&'b self, obj: &'b lopdf::Object) -> &'b lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn resolve_owned(&self, obj: lopdf::Object) -> lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(id)
                .cloned()
                .unwrap_or(lopdf::Object::Null),
            other => other,
        }
    }

    fn warn_malformed(&mut self, message: &str) {
        self.warnings.push(ExtractWarning::new(
            WarningCode::MalformedOperator,
            message,
        ));
    }
}

impl StreamHandler for PlacementCollector<'_> {
    fn on_operation(&mut self, op: &Operation) -> bool {
        self.apply(op);
        true
    }

    fn on_resources(&mut self, scope: ResourceScope) {
        self.scopes.push(scope);
    }

    fn on_xobject_begin(&mut self, _name: &str, _id: Option<lopdf::ObjectId>) {
        // The form body runs under an implicit saved state.
        self.xobject_saves.push((self.gs_stack.len(), self.gs.clone()));
    }

    fn on_xobject_end(&mut self, _name: &str) {
        if let Some((depth, frame)) = self.xobject_saves.pop() {
            self.gs_stack.truncate(depth);
            self.gs = frame;
        }
        self.scopes.pop();
        // A text object cannot cross stream boundaries.
        self.text = None;
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}

// --- Operand helpers ---

fn number_at(operands: &[Operand], index: usize) -> Option<f64> {
    operands.get(index).and_then(Operand::as_f64)
}

/// Six numeric operands as a matrix, or `None` on arity/type mismatch.
fn matrix_operands(operands: &[Operand]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    Some(Matrix::new(
        number_at(operands, 0)?,
        number_at(operands, 1)?,
        number_at(operands, 2)?,
        number_at(operands, 3)?,
        number_at(operands, 4)?,
        number_at(operands, 5)?,
    ))
}
