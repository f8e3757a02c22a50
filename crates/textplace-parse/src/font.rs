//! Font decoding: byte strings to UTF-8 text and advance widths.
//!
//! [`FontDecoder`] is built once per font dictionary and interned by the
//! collector. It resolves the strongest available translation path —
//! embedded ToUnicode CMap, simple encoding with Differences, the default
//! standard encoding, or a raw Latin-1 fallback — and carries the width
//! tables and vertical metrics placements are computed from.

use std::collections::HashMap;

use textplace_core::{
    encoding::{glyph_name_to_char, FontEncoding, StandardEncoding},
    FontInfo,
};

use crate::cmap::ToUnicodeCMap;
use crate::provider::decode_stream;
use crate::standard_fonts;

/// How a byte string was translated to text.
///
/// Ordered strongest first; the tag is surfaced for observability and
/// encoding-fallback warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMethod {
    /// Through the font's embedded ToUnicode CMap.
    ToUnicode,
    /// Through the resolved `/Encoding` table (with Differences).
    SimpleEncoding,
    /// Through the default standard encoding (or per-code replacement
    /// characters for composite fonts without a CMap).
    Default,
    /// Bytes passed through as Latin-1 — the font was not understood.
    Raw,
}

impl TranslationMethod {
    /// Stable tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMethod::ToUnicode => "to_unicode",
            TranslationMethod::SimpleEncoding => "simple_encoding",
            TranslationMethod::Default => "default",
            TranslationMethod::Raw => "raw",
        }
    }
}

/// Advance width and code for one character code of a shown string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    /// Advance width in 1/1000 text-space units.
    pub width: f64,
    /// The character code the width belongs to.
    pub code: u32,
}

/// Font classification by `/Subtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontKind {
    /// Single-byte font: Type1, TrueType, Type3, MMType1.
    Simple,
    /// Composite (Type0) font with CMap-driven multi-byte codes.
    Composite,
    /// Unrecognized subtype; decoding falls back to raw bytes.
    Unknown,
}

/// Immutable decoder for one font dictionary.
#[derive(Debug)]
pub struct FontDecoder {
    font_id: u32,
    kind: FontKind,
    base_font: String,

    to_unicode: Option<ToUnicodeCMap>,
    simple_encoding: Option<FontEncoding>,

    widths: HashMap<u32, f64>,
    default_width: f64,
    monospace_width: Option<f64>,

    ascent: f64,
    descent: f64,
    space_char_code: Option<u32>,
    space_width: f64,

    family_name: String,
    font_name: String,
    font_stretch: String,
    font_weight: i64,
    font_flags: i64,
}

impl FontDecoder {
    /// Build a decoder from a font dictionary.
    ///
    /// Construction never fails: anything unreadable degrades to the
    /// weaker translation methods and zeroed metrics.
    pub fn new(doc: &lopdf::Document, font_dict: &lopdf::Dictionary, font_id: u32) -> Self {
        let subtype = dict_name(font_dict, b"Subtype").unwrap_or_default();
        let kind = match subtype.as_str() {
            "Type1" | "TrueType" | "Type3" | "MMType1" => FontKind::Simple,
            "Type0" => FontKind::Composite,
            _ => FontKind::Unknown,
        };
        let base_font = dict_name(font_dict, b"BaseFont").unwrap_or_default();

        let to_unicode = parse_to_unicode(doc, font_dict);
        let simple_encoding = if kind == FontKind::Composite {
            None
        } else {
            parse_simple_encoding(doc, font_dict)
        };

        let mut widths = HashMap::new();
        let mut default_width = 0.0;
        let descriptor_dict;
        match kind {
            FontKind::Composite => {
                let descendant = descendant_font(doc, font_dict);
                if let Some(desc) = descendant {
                    parse_cid_widths(doc, desc, &mut widths);
                    default_width = desc
                        .get(b"DW")
                        .ok()
                        .and_then(|o| number(resolve(doc, o)))
                        .unwrap_or(1000.0);
                }
                descriptor_dict =
                    descendant.and_then(|d| dict_entry(doc, d, b"FontDescriptor"));
            }
            FontKind::Simple | FontKind::Unknown => {
                parse_simple_widths(doc, font_dict, &mut widths);
                descriptor_dict = dict_entry(doc, font_dict, b"FontDescriptor");
                default_width = descriptor_dict
                    .and_then(|d| d.get(b"MissingWidth").ok())
                    .and_then(|o| number(resolve(doc, o)))
                    .unwrap_or(0.0);
            }
        }

        let mut ascent = 0.0;
        let mut descent = 0.0;
        let mut font_flags = 0;
        let mut font_weight = 0;
        let mut family_name = String::new();
        let mut font_stretch = String::new();
        let mut font_name = base_font.clone();
        if let Some(desc) = descriptor_dict {
            ascent = desc
                .get(b"Ascent")
                .ok()
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(0.0);
            descent = desc
                .get(b"Descent")
                .ok()
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(0.0);
            font_flags = desc
                .get(b"Flags")
                .ok()
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(0.0) as i64;
            font_weight = desc
                .get(b"FontWeight")
                .ok()
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(0.0) as i64;
            family_name = desc
                .get(b"FontFamily")
                .ok()
                .and_then(string_value)
                .unwrap_or_default();
            font_stretch = dict_name(desc, b"FontStretch").unwrap_or_default();
            if let Some(name) = dict_name(desc, b"FontName") {
                font_name = name;
            }
        }

        // Standard-14 fallback: a simple font with no /Widths gets the
        // built-in AFM metrics keyed by its base font name.
        if kind == FontKind::Simple && widths.is_empty() {
            if let Some(std) = standard_fonts::lookup(&base_font) {
                widths.extend(std.widths());
                if descriptor_dict.is_none() {
                    ascent = std.ascent();
                    descent = std.descent();
                }
            }
        }

        let monospace_width = detect_monospace(&widths, default_width);

        let mut decoder = Self {
            font_id,
            kind,
            base_font,
            to_unicode,
            simple_encoding,
            widths,
            default_width,
            monospace_width,
            ascent,
            descent,
            space_char_code: None,
            space_width: 0.0,
            family_name,
            font_name,
            font_stretch,
            font_weight,
            font_flags,
        };
        decoder.space_char_code = decoder.find_space_char_code();
        decoder.space_width = match decoder.space_char_code {
            Some(code) => {
                let w = decoder.width(code);
                if w > 0.0 { w } else { decoder.default_width }
            }
            None => decoder.default_width,
        };
        decoder
    }

    /// Stable identifier of the font dictionary.
    pub fn font_id(&self) -> u32 {
        self.font_id
    }

    /// Whether this is a single-byte font.
    pub fn is_simple_font(&self) -> bool {
        self.kind == FontKind::Simple
    }

    /// Ascender in 1/1000 text-space units.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Descender in 1/1000 text-space units (negative).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Width of the space glyph in 1/1000 text-space units.
    pub fn space_width(&self) -> f64 {
        self.space_width
    }

    /// The code whose translation is U+0020, when one exists.
    ///
    /// Word spacing applies to this code, which on multi-byte fonts is
    /// generally not byte 0x20.
    pub fn space_char_code(&self) -> Option<u32> {
        self.space_char_code
    }

    /// The immutable description surfaced in the output font map.
    pub fn info(&self) -> FontInfo {
        FontInfo {
            font_id: self.font_id,
            font_name: self.font_name.clone(),
            family_name: self.family_name.clone(),
            font_stretch: self.font_stretch.clone(),
            font_weight: self.font_weight,
            font_flags: self.font_flags,
            ascent: self.ascent,
            descent: self.descent,
            space_width: self.space_width,
        }
    }

    /// Split a string operand into character codes.
    ///
    /// Simple fonts consume one byte per code. Composite fonts consume a
    /// variable number of bytes driven by the ToUnicode codespace; with
    /// no CMap the implicit two-byte CID default applies.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.kind != FontKind::Composite {
            return bytes.iter().map(|&b| u32::from(b)).collect();
        }

        let mut codes = Vec::with_capacity(bytes.len() / 2 + 1);
        let mut pos = 0;
        while pos < bytes.len() {
            let (code, consumed) = match &self.to_unicode {
                Some(cmap) => cmap.next_code(bytes, pos),
                None => {
                    if pos + 1 < bytes.len() {
                        (
                            u32::from(bytes[pos]) << 8 | u32::from(bytes[pos + 1]),
                            2,
                        )
                    } else {
                        (u32::from(bytes[pos]), 1)
                    }
                }
            };
            codes.push(code);
            pos += consumed.max(1);
        }
        codes
    }

    /// Translate a byte string to UTF-8, tagging the method used.
    ///
    /// The strongest available path wins for the whole string; codes the
    /// chosen table cannot map become U+FFFD. An empty input yields the
    /// empty string.
    pub fn translate(&self, bytes: &[u8]) -> (String, TranslationMethod) {
        if let Some(cmap) = &self.to_unicode {
            let mut out = String::with_capacity(bytes.len());
            for code in self.codes(bytes) {
                match cmap.lookup(code) {
                    Some(s) => out.push_str(s),
                    None => out.push('\u{FFFD}'),
                }
            }
            return (out, TranslationMethod::ToUnicode);
        }

        if let Some(enc) = &self.simple_encoding {
            return (enc.decode_bytes(bytes), TranslationMethod::SimpleEncoding);
        }

        match self.kind {
            FontKind::Simple => (
                StandardEncoding::Standard.decode_bytes(bytes),
                TranslationMethod::Default,
            ),
            FontKind::Composite => {
                // No ToUnicode: the codes are CIDs with no text meaning.
                let out: String = self.codes(bytes).iter().map(|_| '\u{FFFD}').collect();
                (out, TranslationMethod::Default)
            }
            FontKind::Unknown => (
                bytes.iter().map(|&b| char::from(b)).collect(),
                TranslationMethod::Raw,
            ),
        }
    }

    /// Advance width for one code, 1/1000 units.
    ///
    /// Lookup order: monospace short-circuit, explicit entry, default
    /// width, zero.
    pub fn width(&self, code: u32) -> f64 {
        if let Some(w) = self.monospace_width {
            return w;
        }
        self.widths.get(&code).copied().unwrap_or(self.default_width)
    }

    /// Per-code advance widths for a string operand.
    pub fn displacements(&self, bytes: &[u8]) -> Vec<Displacement> {
        self.codes(bytes)
            .into_iter()
            .map(|code| Displacement {
                width: self.width(code),
                code,
            })
            .collect()
    }

    /// Base font name from the dictionary (`/BaseFont`).
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    fn find_space_char_code(&self) -> Option<u32> {
        if let Some(cmap) = &self.to_unicode {
            if let Some(code) = cmap.space_code() {
                return Some(code);
            }
        }
        if let Some(enc) = &self.simple_encoding {
            return enc.space_code().map(u32::from);
        }
        match self.kind {
            FontKind::Simple | FontKind::Unknown => Some(0x20),
            FontKind::Composite => None,
        }
    }
}

// --- Dictionary walking helpers ---

fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

fn name_str(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn dict_name(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(name_str)
}

fn string_value(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Resolve `dict[key]` to a dictionary, following references.
fn dict_entry<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Option<&'a lopdf::Dictionary> {
    let obj = resolve(doc, dict.get(key).ok()?);
    match obj {
        lopdf::Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// First entry of `/DescendantFonts`, resolved to a dictionary.
fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    type0: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let arr = match resolve(doc, type0.get(b"DescendantFonts").ok()?) {
        lopdf::Object::Array(a) => a,
        _ => return None,
    };
    match resolve(doc, arr.first()?) {
        lopdf::Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn parse_to_unicode(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> Option<ToUnicodeCMap> {
    let obj = resolve(doc, font_dict.get(b"ToUnicode").ok()?);
    let stream = match obj {
        lopdf::Object::Stream(s) => s,
        _ => return None,
    };
    let data = decode_stream(stream).ok()?;
    ToUnicodeCMap::parse(&data).ok()
}

fn parse_simple_encoding(
    doc: &lopdf::Document,
    font_dict: &lopdf::Dictionary,
) -> Option<FontEncoding> {
    let obj = resolve(doc, font_dict.get(b"Encoding").ok()?);
    match obj {
        lopdf::Object::Name(name) => {
            let name = String::from_utf8_lossy(name);
            StandardEncoding::from_name(&name).map(FontEncoding::from_standard)
        }
        lopdf::Object::Dictionary(enc_dict) => {
            let base = dict_name(enc_dict, b"BaseEncoding")
                .and_then(|n| StandardEncoding::from_name(&n))
                .unwrap_or(StandardEncoding::Standard);
            let mut overrides = Vec::new();
            if let Some(lopdf::Object::Array(diffs)) = enc_dict
                .get(b"Differences")
                .ok()
                .map(|o| resolve(doc, o))
            {
                // The array alternates: an integer starts a run of codes,
                // each following name claims the next code.
                let mut code: u32 = 0;
                for item in diffs {
                    match item {
                        lopdf::Object::Integer(i) => code = (*i).max(0) as u32,
                        lopdf::Object::Name(name) => {
                            let name = String::from_utf8_lossy(name);
                            if code <= 0xFF {
                                if let Some(ch) = glyph_name_to_char(&name) {
                                    overrides.push((code as u8, ch));
                                }
                            }
                            code = code.saturating_add(1);
                        }
                        _ => {}
                    }
                }
            }
            Some(FontEncoding::with_differences(base, &overrides))
        }
        _ => None,
    }
}

fn parse_simple_widths(
    doc: &lopdf::Document,
    font_dict: &lopdf::Dictionary,
    widths: &mut HashMap<u32, f64>,
) {
    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| number(resolve(doc, o)))
        .unwrap_or(0.0) as u32;
    let arr = match font_dict.get(b"Widths").ok().map(|o| resolve(doc, o)) {
        Some(lopdf::Object::Array(a)) => a,
        _ => return,
    };
    for (i, obj) in arr.iter().enumerate() {
        if let Some(w) = number(resolve(doc, obj)) {
            widths.insert(first_char + i as u32, w);
        }
    }
}

/// Upper bound on a single `W` range; defeats adversarial `[0 4000000 w]`
/// entries.
const MAX_CID_RANGE: u32 = 0xFFFF;

fn parse_cid_widths(
    doc: &lopdf::Document,
    descendant: &lopdf::Dictionary,
    widths: &mut HashMap<u32, f64>,
) {
    let arr = match descendant.get(b"W").ok().map(|o| resolve(doc, o)) {
        Some(lopdf::Object::Array(a)) => a,
        _ => return,
    };

    let mut i = 0;
    while i < arr.len() {
        let Some(c1) = number(resolve(doc, &arr[i])) else {
            break;
        };
        let c1 = c1.max(0.0) as u32;
        match arr.get(i + 1).map(|o| resolve(doc, o)) {
            // c [w1 w2 …]: one width per consecutive code.
            Some(lopdf::Object::Array(per_code)) => {
                for (k, w) in per_code.iter().enumerate() {
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(c1 + k as u32, w);
                    }
                }
                i += 2;
            }
            // c1 c2 w: one width for the whole range.
            Some(other) => {
                let Some(c2) = number(other) else { break };
                let c2 = c2.max(0.0) as u32;
                let Some(w) = arr.get(i + 2).and_then(|o| number(resolve(doc, o))) else {
                    break;
                };
                if c2 >= c1 && c2 - c1 <= MAX_CID_RANGE {
                    for code in c1..=c2 {
                        widths.insert(code, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
}

/// A font is monospaced when every explicit width is the same value and
/// the default width matches it too. Used as a width-lookup short-circuit.
fn detect_monospace(widths: &HashMap<u32, f64>, default_width: f64) -> Option<f64> {
    let mut iter = widths.values();
    let &first = iter.next()?;
    if iter.all(|&w| w == first) && default_width == first {
        Some(first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object, Stream};

    fn doc() -> Document {
        Document::with_version("1.5")
    }

    /// A Type1 font with explicit widths and a descriptor.
    fn simple_font(doc: &mut Document) -> lopdf::Dictionary {
        let widths: Vec<Object> = vec![
            Object::Integer(278), // space (32)
            Object::Integer(556), // !
            Object::Integer(722), // "
        ];
        let widths_id = doc.add_object(Object::Array(widths));
        let desc_id = doc.add_object(Object::Dictionary(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Helvetica",
            "FontFamily" => Object::string_literal("Helvetica"),
            "Flags" => 32i64,
            "FontWeight" => 400i64,
            "Ascent" => 718i64,
            "Descent" => -207i64,
            "MissingWidth" => 300i64,
        }));
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "FirstChar" => 32i64,
            "LastChar" => 34i64,
            "Widths" => widths_id,
            "FontDescriptor" => desc_id,
        }
    }

    // --- Simple fonts ---

    #[test]
    fn simple_font_widths_and_descriptor() {
        let mut d = doc();
        let dict = simple_font(&mut d);
        let font = FontDecoder::new(&d, &dict, 1);

        assert!(font.is_simple_font());
        assert_eq!(font.width(32), 278.0);
        assert_eq!(font.width(33), 556.0);
        assert_eq!(font.width(99), 300.0); // MissingWidth
        assert_eq!(font.ascent(), 718.0);
        assert_eq!(font.descent(), -207.0);
        assert_eq!(font.space_char_code(), Some(0x20));
        assert_eq!(font.space_width(), 278.0);
    }

    #[test]
    fn simple_font_info_fields() {
        let mut d = doc();
        let dict = simple_font(&mut d);
        let info = FontDecoder::new(&d, &dict, 9).info();
        assert_eq!(info.font_id, 9);
        assert_eq!(info.font_name, "Helvetica");
        assert_eq!(info.family_name, "Helvetica");
        assert_eq!(info.font_weight, 400);
        assert_eq!(info.font_flags, 32);
        assert_eq!(info.space_width, 278.0);
    }

    #[test]
    fn simple_font_default_translation_is_standard_encoding() {
        let mut d = doc();
        let dict = simple_font(&mut d);
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, method) = font.translate(b"Hi");
        assert_eq!(text, "Hi");
        assert_eq!(method, TranslationMethod::Default);
    }

    #[test]
    fn empty_bytes_translate_to_empty() {
        let mut d = doc();
        let dict = simple_font(&mut d);
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, _) = font.translate(b"");
        assert!(text.is_empty());
        assert!(font.displacements(b"").is_empty());
    }

    #[test]
    fn translation_is_deterministic() {
        let mut d = doc();
        let dict = simple_font(&mut d);
        let font = FontDecoder::new(&d, &dict, 1);
        let a = font.translate(b"deterministic");
        let b = font.translate(b"deterministic");
        assert_eq!(a, b);
        assert_eq!(
            font.displacements(b"deterministic"),
            font.displacements(b"deterministic")
        );
    }

    // --- Standard-14 fallback ---

    #[test]
    fn standard_14_metrics_without_widths() {
        let d = doc();
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.width(b'H' as u32), 722.0);
        assert_eq!(font.width(b'i' as u32), 222.0);
        assert_eq!(font.space_width(), 278.0);
        assert_eq!(font.ascent(), 718.0);
        assert_eq!(font.descent(), -207.0);
    }

    #[test]
    fn unknown_base_font_without_widths_has_zero_metrics() {
        let d = doc();
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "Mystery",
        };
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.width(65), 0.0);
        assert_eq!(font.ascent(), 0.0);
    }

    // --- Encodings ---

    #[test]
    fn named_encoding_applies() {
        let d = doc();
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        };
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, method) = font.translate(&[0x93, 0x41, 0x94]);
        assert_eq!(text, "\u{201C}A\u{201D}");
        assert_eq!(method, TranslationMethod::SimpleEncoding);
    }

    #[test]
    fn differences_override_base() {
        let mut d = doc();
        let enc_id = d.add_object(Object::Dictionary(dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => vec![
                Object::Integer(65),
                Object::Name(b"alpha".to_vec()),   // unknown name: code skipped
                Object::Name(b"germandbls".to_vec()),
            ],
        }));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "Encoding" => enc_id,
        };
        let font = FontDecoder::new(&d, &dict, 1);
        // 65 had an unknown glyph name: base table survives.
        let (text, _) = font.translate(&[65, 66]);
        assert_eq!(text, "A\u{00DF}"); // 66 remapped to germandbls
    }

    #[test]
    fn differences_code_runs() {
        let mut d = doc();
        let enc_id = d.add_object(Object::Dictionary(dictionary! {
            "Differences" => vec![
                Object::Integer(1),
                Object::Name(b"one".to_vec()),
                Object::Name(b"two".to_vec()),
                Object::Integer(10),
                Object::Name(b"three".to_vec()),
            ],
        }));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "Encoding" => enc_id,
        };
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, _) = font.translate(&[1, 2, 10]);
        assert_eq!(text, "123");
    }

    #[test]
    fn space_code_via_differences() {
        let mut d = doc();
        let enc_id = d.add_object(Object::Dictionary(dictionary! {
            "Differences" => vec![
                Object::Integer(7),
                Object::Name(b"space".to_vec()),
            ],
        }));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "Encoding" => enc_id,
        };
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.space_char_code(), Some(7));
    }

    // --- ToUnicode ---

    fn font_with_tounicode(d: &mut Document, cmap: &[u8], extra_cid: bool) -> lopdf::Dictionary {
        let stream_id = d.add_object(Object::Stream(Stream::new(dictionary! {}, cmap.to_vec())));
        if extra_cid {
            let desc_id = d.add_object(Object::Dictionary(dictionary! {
                "Type" => "Font",
                "Subtype" => "CIDFontType2",
                "BaseFont" => "Inner",
                "DW" => 1000i64,
                "W" => vec![
                    Object::Integer(0x41),
                    Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
                ],
            }));
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "Outer",
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![Object::Reference(desc_id)],
                "ToUnicode" => stream_id,
            }
        } else {
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Custom",
                "ToUnicode" => stream_id,
            }
        }
    }

    #[test]
    fn tounicode_beats_simple_encoding() {
        let mut d = doc();
        let cmap = b"beginbfchar <41> <0062> endbfchar";
        let dict = font_with_tounicode(&mut d, cmap, false);
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, method) = font.translate(b"A");
        assert_eq!(text, "b");
        assert_eq!(method, TranslationMethod::ToUnicode);
    }

    #[test]
    fn tounicode_unmapped_code_becomes_replacement() {
        let mut d = doc();
        let cmap = b"beginbfchar <41> <0062> endbfchar";
        let dict = font_with_tounicode(&mut d, cmap, false);
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, _) = font.translate(b"AZ");
        assert_eq!(text, "b\u{FFFD}");
    }

    #[test]
    fn cid_font_two_byte_codes() {
        let mut d = doc();
        let cmap = b"\
            begincodespacerange <0000> <FFFF> endcodespacerange\n\
            beginbfrange <0041> <0042> <0041> endbfrange";
        let dict = font_with_tounicode(&mut d, cmap, true);
        let font = FontDecoder::new(&d, &dict, 1);

        assert!(!font.is_simple_font());
        assert_eq!(font.codes(&[0x00, 0x41, 0x00, 0x42]), vec![0x41, 0x42]);
        let (text, method) = font.translate(&[0x00, 0x41, 0x00, 0x42]);
        assert_eq!(text, "AB");
        assert_eq!(method, TranslationMethod::ToUnicode);
    }

    #[test]
    fn cid_widths_from_w_array() {
        let mut d = doc();
        let cmap = b"begincodespacerange <0000> <FFFF> endcodespacerange";
        let dict = font_with_tounicode(&mut d, cmap, true);
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.width(0x41), 500.0);
        assert_eq!(font.width(0x42), 600.0);
        assert_eq!(font.width(0x99), 1000.0); // DW
    }

    #[test]
    fn cid_without_tounicode_yields_replacement_chars() {
        let mut d = doc();
        let desc_id = d.add_object(Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType0",
            "BaseFont" => "Inner",
        }));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Outer",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(desc_id)],
        };
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, method) = font.translate(&[0x00, 0x41, 0x00, 0x42]);
        // Two 2-byte codes, both unmapped.
        assert_eq!(text, "\u{FFFD}\u{FFFD}");
        assert_eq!(method, TranslationMethod::Default);
        assert_eq!(font.space_char_code(), None);
    }

    #[test]
    fn tounicode_empty_destination_consumes_bytes() {
        let mut d = doc();
        let cmap = b"\
            begincodespacerange <0000> <FFFF> endcodespacerange\n\
            beginbfchar <0041> <> <0042> <0058> endbfchar";
        let dict = font_with_tounicode(&mut d, cmap, true);
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, _) = font.translate(&[0x00, 0x41, 0x00, 0x42]);
        assert_eq!(text, "X");
        // Both codes still produce displacements.
        assert_eq!(font.displacements(&[0x00, 0x41, 0x00, 0x42]).len(), 2);
    }

    #[test]
    fn cid_space_code_from_tounicode() {
        let mut d = doc();
        let cmap = b"\
            begincodespacerange <0000> <FFFF> endcodespacerange\n\
            beginbfchar <0103> <0020> endbfchar";
        let dict = font_with_tounicode(&mut d, cmap, true);
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.space_char_code(), Some(0x0103));
    }

    // --- Raw fallback ---

    #[test]
    fn unknown_subtype_falls_back_to_raw() {
        let d = doc();
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type42",
            "BaseFont" => "Weird",
        };
        let font = FontDecoder::new(&d, &dict, 1);
        let (text, method) = font.translate(&[0x48, 0x69, 0xE9]);
        assert_eq!(text, "Hi\u{00E9}"); // Latin-1 passthrough
        assert_eq!(method, TranslationMethod::Raw);
    }

    // --- Monospace detection ---

    #[test]
    fn monospace_detected_when_all_widths_equal_default() {
        let mut d = doc();
        let widths_id = d.add_object(Object::Array(vec![
            Object::Integer(600),
            Object::Integer(600),
        ]));
        let desc_id = d.add_object(Object::Dictionary(dictionary! {
            "MissingWidth" => 600i64,
        }));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Mono",
            "FirstChar" => 32i64,
            "Widths" => widths_id,
            "FontDescriptor" => desc_id,
        };
        let font = FontDecoder::new(&d, &dict, 1);
        // Codes far outside the explicit table still get the value.
        assert_eq!(font.width(5000), 600.0);
    }

    #[test]
    fn monospace_not_detected_when_default_differs() {
        let mut d = doc();
        let widths_id = d.add_object(Object::Array(vec![
            Object::Integer(600),
            Object::Integer(600),
        ]));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Mono",
            "FirstChar" => 32i64,
            "Widths" => widths_id,
        };
        let font = FontDecoder::new(&d, &dict, 1);
        assert_eq!(font.width(32), 600.0);
        assert_eq!(font.width(5000), 0.0); // default width, not monospace
    }
}
