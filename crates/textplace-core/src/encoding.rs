//! Standard PDF text encodings and Differences handling.
//!
//! Implements the four named single-byte encodings a font dictionary can
//! reference (`/StandardEncoding`, `/WinAnsiEncoding`, `/MacRomanEncoding`,
//! `/MacExpertEncoding`), the [`FontEncoding`] table a `/Differences` array
//! overlays, and the glyph-name → Unicode lookup used to resolve those
//! overrides.
//!
//! Tables are built at compile time by folding sparse override lists over
//! a shared ASCII base, so each table spells out only where it departs
//! from ASCII (or Latin-1).

/// A named standard single-byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardEncoding {
    /// Adobe standard Latin encoding (the default base encoding).
    Standard,
    /// Windows code page 1252 superset.
    WinAnsi,
    /// Classic Mac OS Roman.
    MacRoman,
    /// Mac expert set: small caps, old-style figures, fractions.
    MacExpert,
}

impl StandardEncoding {
    /// Resolve a PDF encoding name (`WinAnsiEncoding`, …) to an encoding.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(StandardEncoding::Standard),
            "WinAnsiEncoding" => Some(StandardEncoding::WinAnsi),
            "MacRomanEncoding" => Some(StandardEncoding::MacRoman),
            "MacExpertEncoding" => Some(StandardEncoding::MacExpert),
            _ => None,
        }
    }

    fn table(&self) -> &'static [Option<char>; 256] {
        match self {
            StandardEncoding::Standard => &STANDARD_TABLE,
            StandardEncoding::WinAnsi => &WIN_ANSI_TABLE,
            StandardEncoding::MacRoman => &MAC_ROMAN_TABLE,
            StandardEncoding::MacExpert => &MAC_EXPERT_TABLE,
        }
    }

    /// Look up the Unicode character for a byte code.
    ///
    /// Returns `None` for codes the encoding leaves undefined.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.table()[code as usize]
    }

    /// Decode a byte string, replacing undefined codes with U+FFFD.
    pub fn decode_bytes(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| self.decode(b).unwrap_or('\u{FFFD}'))
            .collect()
    }
}

/// A concrete byte → char table for a simple font.
///
/// Represents the resolved `/Encoding` entry of a font dictionary: a base
/// encoding (a standard name, default Standard) with any `/Differences`
/// overrides already applied. Differences glyph names are resolved to
/// characters through [`glyph_name_to_char`] before they reach this type.
#[derive(Debug, Clone)]
pub struct FontEncoding {
    table: [Option<char>; 256],
}

impl FontEncoding {
    /// Start from a standard encoding.
    pub fn from_standard(encoding: StandardEncoding) -> Self {
        Self {
            table: *encoding.table(),
        }
    }

    /// Start from a standard encoding and apply Differences overrides.
    ///
    /// `overrides` holds `(code, character)` pairs in the order the
    /// `/Differences` array listed them; later pairs win.
    pub fn with_differences(encoding: StandardEncoding, overrides: &[(u8, char)]) -> Self {
        let mut enc = Self::from_standard(encoding);
        enc.apply_differences(overrides);
        enc
    }

    /// Apply Differences overrides in place.
    pub fn apply_differences(&mut self, overrides: &[(u8, char)]) {
        for &(code, ch) in overrides {
            self.table[code as usize] = Some(ch);
        }
    }

    /// Look up the character for a byte code.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }

    /// Decode a byte string, replacing undefined codes with U+FFFD.
    pub fn decode_bytes(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| self.decode(b).unwrap_or('\u{FFFD}'))
            .collect()
    }

    /// The byte code mapped to U+0020, if any.
    pub fn space_code(&self) -> Option<u8> {
        self.table
            .iter()
            .position(|&c| c == Some(' '))
            .map(|i| i as u8)
    }
}

impl Default for FontEncoding {
    fn default() -> Self {
        Self::from_standard(StandardEncoding::Standard)
    }
}

/// Resolve an Adobe glyph name to its Unicode character.
///
/// Handles the `uniXXXX` / `uXXXX[XX]` hex forms and a static table of the
/// glyph names that occur in practice in `/Differences` arrays. Returns
/// `None` for names outside the table.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return char::from_u32(code);
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return char::from_u32(code);
            }
        }
    }

    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

// =============================================================================
// Table construction
// =============================================================================

/// Fill 0x20..=0x7E with the ASCII characters. All standard Latin
/// encodings agree on this range (Standard's two quote deviations are
/// applied as overrides).
const fn ascii_base() -> [Option<char>; 256] {
    let mut t = [None; 256];
    let mut code = 0x20usize;
    while code <= 0x7E {
        t[code] = Some(code as u8 as char);
        code += 1;
    }
    t
}

/// Extend a table with the Latin-1 identity mapping for 0xA0..=0xFF.
const fn with_latin1_high(mut t: [Option<char>; 256]) -> [Option<char>; 256] {
    let mut code = 0xA0usize;
    while code <= 0xFF {
        t[code] = Some(code as u8 as char);
        code += 1;
    }
    t
}

/// Fold `(code, char)` overrides into a table.
const fn with_overrides(
    mut t: [Option<char>; 256],
    pairs: &[(u8, char)],
) -> [Option<char>; 256] {
    let mut i = 0;
    while i < pairs.len() {
        t[pairs[i].0 as usize] = Some(pairs[i].1);
        i += 1;
    }
    t
}

/// Adobe StandardEncoding: ASCII with typographic quotes at 0x27/0x60 and
/// a sparse upper region of punctuation, ligatures, and accents.
static STANDARD_TABLE: [Option<char>; 256] =
    with_overrides(ascii_base(), STANDARD_OVERRIDES);

#[rustfmt::skip]
const STANDARD_OVERRIDES: &[(u8, char)] = &[
    (0x27, '\u{2019}'), // quoteright
    (0x60, '\u{2018}'), // quoteleft
    (0xA1, '\u{00A1}'), (0xA2, '\u{00A2}'), (0xA3, '\u{00A3}'),
    (0xA4, '\u{2044}'), // fraction
    (0xA5, '\u{00A5}'),
    (0xA6, '\u{0192}'), // florin
    (0xA7, '\u{00A7}'),
    (0xA8, '\u{00A4}'), // currency
    (0xA9, '\u{0027}'), // quotesingle
    (0xAA, '\u{201C}'), (0xAB, '\u{00AB}'), (0xAC, '\u{2039}'), (0xAD, '\u{203A}'),
    (0xAE, '\u{FB01}'), (0xAF, '\u{FB02}'), // fi fl
    (0xB1, '\u{2013}'), (0xB2, '\u{2020}'), (0xB3, '\u{2021}'), (0xB4, '\u{00B7}'),
    (0xB6, '\u{00B6}'), (0xB7, '\u{2022}'), (0xB8, '\u{201A}'), (0xB9, '\u{201E}'),
    (0xBA, '\u{201D}'), (0xBB, '\u{00BB}'), (0xBC, '\u{2026}'), (0xBD, '\u{2030}'),
    (0xBF, '\u{00BF}'),
    (0xC1, '\u{0060}'), (0xC2, '\u{00B4}'), (0xC3, '\u{02C6}'), (0xC4, '\u{02DC}'),
    (0xC5, '\u{00AF}'), (0xC6, '\u{02D8}'), (0xC7, '\u{02D9}'), (0xC8, '\u{00A8}'),
    (0xCA, '\u{02DA}'), (0xCB, '\u{00B8}'), (0xCD, '\u{02DD}'), (0xCE, '\u{02DB}'),
    (0xCF, '\u{02C7}'),
    (0xD0, '\u{2014}'), // emdash
    (0xE1, '\u{00C6}'), (0xE3, '\u{00AA}'), (0xE8, '\u{0141}'), (0xE9, '\u{00D8}'),
    (0xEA, '\u{0152}'), (0xEB, '\u{00BA}'),
    (0xF1, '\u{00E6}'), (0xF5, '\u{0131}'), (0xF8, '\u{0142}'), (0xF9, '\u{00F8}'),
    (0xFA, '\u{0153}'), (0xFB, '\u{00DF}'),
];

/// WinAnsiEncoding: ASCII + Latin-1 upper half + the CP1252 additions in
/// 0x80..=0x9F. Codes 0x81, 0x8D, 0x8F, 0x90 and 0x9D are undefined.
static WIN_ANSI_TABLE: [Option<char>; 256] =
    with_overrides(with_latin1_high(ascii_base()), WIN_ANSI_OVERRIDES);

#[rustfmt::skip]
const WIN_ANSI_OVERRIDES: &[(u8, char)] = &[
    (0x80, '\u{20AC}'), (0x82, '\u{201A}'), (0x83, '\u{0192}'), (0x84, '\u{201E}'),
    (0x85, '\u{2026}'), (0x86, '\u{2020}'), (0x87, '\u{2021}'), (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'), (0x8A, '\u{0160}'), (0x8B, '\u{2039}'), (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'), (0x92, '\u{2019}'), (0x93, '\u{201C}'), (0x94, '\u{201D}'),
    (0x95, '\u{2022}'), (0x96, '\u{2013}'), (0x97, '\u{2014}'), (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'), (0x9A, '\u{0161}'), (0x9B, '\u{203A}'), (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'), (0x9F, '\u{0178}'),
];

/// MacRomanEncoding: ASCII + the Mac OS Roman upper half.
static MAC_ROMAN_TABLE: [Option<char>; 256] =
    with_overrides(ascii_base(), MAC_ROMAN_OVERRIDES);

#[rustfmt::skip]
const MAC_ROMAN_OVERRIDES: &[(u8, char)] = &[
    (0x80, '\u{00C4}'), (0x81, '\u{00C5}'), (0x82, '\u{00C7}'), (0x83, '\u{00C9}'),
    (0x84, '\u{00D1}'), (0x85, '\u{00D6}'), (0x86, '\u{00DC}'), (0x87, '\u{00E1}'),
    (0x88, '\u{00E0}'), (0x89, '\u{00E2}'), (0x8A, '\u{00E4}'), (0x8B, '\u{00E3}'),
    (0x8C, '\u{00E5}'), (0x8D, '\u{00E7}'), (0x8E, '\u{00E9}'), (0x8F, '\u{00E8}'),
    (0x90, '\u{00EA}'), (0x91, '\u{00EB}'), (0x92, '\u{00ED}'), (0x93, '\u{00EC}'),
    (0x94, '\u{00EE}'), (0x95, '\u{00EF}'), (0x96, '\u{00F1}'), (0x97, '\u{00F3}'),
    (0x98, '\u{00F2}'), (0x99, '\u{00F4}'), (0x9A, '\u{00F6}'), (0x9B, '\u{00F5}'),
    (0x9C, '\u{00FA}'), (0x9D, '\u{00F9}'), (0x9E, '\u{00FB}'), (0x9F, '\u{00FC}'),
    (0xA0, '\u{2020}'), (0xA1, '\u{00B0}'), (0xA2, '\u{00A2}'), (0xA3, '\u{00A3}'),
    (0xA4, '\u{00A7}'), (0xA5, '\u{2022}'), (0xA6, '\u{00B6}'), (0xA7, '\u{00DF}'),
    (0xA8, '\u{00AE}'), (0xA9, '\u{00A9}'), (0xAA, '\u{2122}'), (0xAB, '\u{00B4}'),
    (0xAC, '\u{00A8}'), (0xAD, '\u{2260}'), (0xAE, '\u{00C6}'), (0xAF, '\u{00D8}'),
    (0xB0, '\u{221E}'), (0xB1, '\u{00B1}'), (0xB2, '\u{2264}'), (0xB3, '\u{2265}'),
    (0xB4, '\u{00A5}'), (0xB5, '\u{00B5}'), (0xB6, '\u{2202}'), (0xB7, '\u{2211}'),
    (0xB8, '\u{220F}'), (0xB9, '\u{03C0}'), (0xBA, '\u{222B}'), (0xBB, '\u{00AA}'),
    (0xBC, '\u{00BA}'), (0xBD, '\u{03A9}'), (0xBE, '\u{00E6}'), (0xBF, '\u{00F8}'),
    (0xC0, '\u{00BF}'), (0xC1, '\u{00A1}'), (0xC2, '\u{00AC}'), (0xC3, '\u{221A}'),
    (0xC4, '\u{0192}'), (0xC5, '\u{2248}'), (0xC6, '\u{2206}'), (0xC7, '\u{00AB}'),
    (0xC8, '\u{00BB}'), (0xC9, '\u{2026}'), (0xCA, '\u{00A0}'), (0xCB, '\u{00C0}'),
    (0xCC, '\u{00C3}'), (0xCD, '\u{00D5}'), (0xCE, '\u{0152}'), (0xCF, '\u{0153}'),
    (0xD0, '\u{2013}'), (0xD1, '\u{2014}'), (0xD2, '\u{201C}'), (0xD3, '\u{201D}'),
    (0xD4, '\u{2018}'), (0xD5, '\u{2019}'), (0xD6, '\u{00F7}'), (0xD7, '\u{25CA}'),
    (0xD8, '\u{00FF}'), (0xD9, '\u{0178}'), (0xDA, '\u{2044}'), (0xDB, '\u{20AC}'),
    (0xDC, '\u{2039}'), (0xDD, '\u{203A}'), (0xDE, '\u{FB01}'), (0xDF, '\u{FB02}'),
    (0xE0, '\u{2021}'), (0xE1, '\u{00B7}'), (0xE2, '\u{201A}'), (0xE3, '\u{201E}'),
    (0xE4, '\u{2030}'), (0xE5, '\u{00C2}'), (0xE6, '\u{00CA}'), (0xE7, '\u{00C1}'),
    (0xE8, '\u{00CB}'), (0xE9, '\u{00C8}'), (0xEA, '\u{00CD}'), (0xEB, '\u{00CE}'),
    (0xEC, '\u{00CF}'), (0xED, '\u{00CC}'), (0xEE, '\u{00D3}'), (0xEF, '\u{00D4}'),
    (0xF0, '\u{F8FF}'), (0xF1, '\u{00D2}'), (0xF2, '\u{00DA}'), (0xF3, '\u{00DB}'),
    (0xF4, '\u{00D9}'), (0xF5, '\u{0131}'), (0xF6, '\u{02C6}'), (0xF7, '\u{02DC}'),
    (0xF8, '\u{00AF}'), (0xF9, '\u{02D8}'), (0xFA, '\u{02D9}'), (0xFB, '\u{02DA}'),
    (0xFC, '\u{00B8}'), (0xFD, '\u{02DD}'), (0xFE, '\u{02DB}'), (0xFF, '\u{02C7}'),
];

/// MacExpertEncoding: the commonly encountered subset — old-style figures,
/// small capitals (Adobe corporate-use codepoints), superior parentheses,
/// leaders, and the shared punctuation. Codes outside the subset are
/// undefined and decode to `None`.
static MAC_EXPERT_TABLE: [Option<char>; 256] =
    with_overrides([None; 256], MAC_EXPERT_OVERRIDES);

#[rustfmt::skip]
const MAC_EXPERT_OVERRIDES: &[(u8, char)] = &[
    (0x20, ' '),
    (0x21, '\u{F721}'), // exclamsmall
    (0x24, '\u{F724}'), // dollaroldstyle
    (0x26, '\u{F726}'), // ampersandsmall
    (0x28, '\u{207D}'), (0x29, '\u{207E}'), // superior parens
    (0x2A, '\u{2025}'), (0x2B, '\u{2024}'), // leaders
    (0x2C, ','), (0x2D, '-'), (0x2E, '.'),
    (0x2F, '\u{2044}'), // fraction
    (0x30, '\u{F730}'), (0x31, '\u{F731}'), (0x32, '\u{F732}'), (0x33, '\u{F733}'),
    (0x34, '\u{F734}'), (0x35, '\u{F735}'), (0x36, '\u{F736}'), (0x37, '\u{F737}'),
    (0x38, '\u{F738}'), (0x39, '\u{F739}'), // old-style figures
    (0x3A, ':'), (0x3B, ';'),
    (0x3F, '\u{F73F}'), // questionsmall
    (0x61, '\u{F761}'), (0x62, '\u{F762}'), (0x63, '\u{F763}'), (0x64, '\u{F764}'),
    (0x65, '\u{F765}'), (0x66, '\u{F766}'), (0x67, '\u{F767}'), (0x68, '\u{F768}'),
    (0x69, '\u{F769}'), (0x6A, '\u{F76A}'), (0x6B, '\u{F76B}'), (0x6C, '\u{F76C}'),
    (0x6D, '\u{F76D}'), (0x6E, '\u{F76E}'), (0x6F, '\u{F76F}'), (0x70, '\u{F770}'),
    (0x71, '\u{F771}'), (0x72, '\u{F772}'), (0x73, '\u{F773}'), (0x74, '\u{F774}'),
    (0x75, '\u{F775}'), (0x76, '\u{F776}'), (0x77, '\u{F777}'), (0x78, '\u{F778}'),
    (0x79, '\u{F779}'), (0x7A, '\u{F77A}'), // small capitals
];

/// Glyph names that occur in `/Differences` arrays, sorted for binary
/// search. The `uniXXXX` forms are handled before this table is consulted.
#[rustfmt::skip]
static GLYPH_NAMES: &[(&str, char)] = &[
    ("A", 'A'), ("AE", '\u{00C6}'), ("Aacute", '\u{00C1}'),
    ("Acircumflex", '\u{00C2}'), ("Adieresis", '\u{00C4}'), ("Agrave", '\u{00C0}'),
    ("Aring", '\u{00C5}'), ("Atilde", '\u{00C3}'),
    ("B", 'B'),
    ("C", 'C'), ("Ccedilla", '\u{00C7}'),
    ("D", 'D'),
    ("E", 'E'), ("Eacute", '\u{00C9}'), ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'), ("Egrave", '\u{00C8}'), ("Eth", '\u{00D0}'),
    ("Euro", '\u{20AC}'),
    ("F", 'F'),
    ("G", 'G'),
    ("H", 'H'),
    ("I", 'I'), ("Iacute", '\u{00CD}'), ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'), ("Igrave", '\u{00CC}'),
    ("J", 'J'),
    ("K", 'K'),
    ("L", 'L'), ("Lslash", '\u{0141}'),
    ("M", 'M'),
    ("N", 'N'), ("Ntilde", '\u{00D1}'),
    ("O", 'O'), ("OE", '\u{0152}'), ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'), ("Odieresis", '\u{00D6}'), ("Ograve", '\u{00D2}'),
    ("Oslash", '\u{00D8}'), ("Otilde", '\u{00D5}'),
    ("P", 'P'),
    ("Q", 'Q'),
    ("R", 'R'),
    ("S", 'S'), ("Scaron", '\u{0160}'),
    ("T", 'T'), ("Thorn", '\u{00DE}'),
    ("U", 'U'), ("Uacute", '\u{00DA}'), ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'), ("Ugrave", '\u{00D9}'),
    ("V", 'V'),
    ("W", 'W'),
    ("X", 'X'),
    ("Y", 'Y'), ("Yacute", '\u{00DD}'), ("Ydieresis", '\u{0178}'),
    ("Z", 'Z'), ("Zcaron", '\u{017D}'),
    ("a", 'a'), ("aacute", '\u{00E1}'), ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'), ("adieresis", '\u{00E4}'), ("ae", '\u{00E6}'),
    ("agrave", '\u{00E0}'), ("ampersand", '&'), ("aring", '\u{00E5}'),
    ("asciicircum", '^'), ("asciitilde", '~'), ("asterisk", '*'), ("at", '@'),
    ("atilde", '\u{00E3}'),
    ("b", 'b'), ("backslash", '\\'), ("bar", '|'), ("braceleft", '{'),
    ("braceright", '}'), ("bracketleft", '['), ("bracketright", ']'),
    ("breve", '\u{02D8}'), ("brokenbar", '\u{00A6}'), ("bullet", '\u{2022}'),
    ("c", 'c'), ("caron", '\u{02C7}'), ("ccedilla", '\u{00E7}'),
    ("cedilla", '\u{00B8}'), ("cent", '\u{00A2}'), ("circumflex", '\u{02C6}'),
    ("colon", ':'), ("comma", ','), ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'),
    ("d", 'd'), ("dagger", '\u{2020}'), ("daggerdbl", '\u{2021}'),
    ("degree", '\u{00B0}'), ("dieresis", '\u{00A8}'), ("divide", '\u{00F7}'),
    ("dollar", '$'), ("dotaccent", '\u{02D9}'), ("dotlessi", '\u{0131}'),
    ("e", 'e'), ("eacute", '\u{00E9}'), ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'), ("egrave", '\u{00E8}'), ("eight", '8'),
    ("ellipsis", '\u{2026}'), ("emdash", '\u{2014}'), ("endash", '\u{2013}'),
    ("equal", '='), ("eth", '\u{00F0}'), ("exclam", '!'),
    ("exclamdown", '\u{00A1}'),
    ("f", 'f'), ("fi", '\u{FB01}'), ("five", '5'), ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'), ("four", '4'), ("fraction", '\u{2044}'),
    ("g", 'g'), ("germandbls", '\u{00DF}'), ("grave", '`'), ("greater", '>'),
    ("guillemotleft", '\u{00AB}'), ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'), ("guilsinglright", '\u{203A}'),
    ("h", 'h'), ("hungarumlaut", '\u{02DD}'), ("hyphen", '-'),
    ("i", 'i'), ("iacute", '\u{00ED}'), ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'), ("igrave", '\u{00EC}'),
    ("j", 'j'),
    ("k", 'k'),
    ("l", 'l'), ("less", '<'), ("logicalnot", '\u{00AC}'),
    ("lslash", '\u{0142}'),
    ("m", 'm'), ("macron", '\u{00AF}'), ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'), ("multiply", '\u{00D7}'),
    ("n", 'n'), ("nine", '9'), ("ntilde", '\u{00F1}'), ("numbersign", '#'),
    ("o", 'o'), ("oacute", '\u{00F3}'), ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'), ("oe", '\u{0153}'), ("ogonek", '\u{02DB}'),
    ("ograve", '\u{00F2}'), ("one", '1'), ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'), ("onesuperior", '\u{00B9}'),
    ("ordfeminine", '\u{00AA}'), ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'), ("otilde", '\u{00F5}'),
    ("p", 'p'), ("paragraph", '\u{00B6}'), ("parenleft", '('),
    ("parenright", ')'), ("percent", '%'), ("period", '.'),
    ("periodcentered", '\u{00B7}'), ("perthousand", '\u{2030}'), ("plus", '+'),
    ("plusminus", '\u{00B1}'),
    ("q", 'q'), ("question", '?'), ("questiondown", '\u{00BF}'),
    ("quotedbl", '"'), ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'), ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'), ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'), ("quotesingle", '\''),
    ("r", 'r'), ("registered", '\u{00AE}'), ("ring", '\u{02DA}'),
    ("s", 's'), ("scaron", '\u{0161}'), ("section", '\u{00A7}'),
    ("semicolon", ';'), ("seven", '7'), ("six", '6'), ("slash", '/'),
    ("space", ' '), ("sterling", '\u{00A3}'),
    ("t", 't'), ("thorn", '\u{00FE}'), ("three", '3'),
    ("threequarters", '\u{00BE}'), ("threesuperior", '\u{00B3}'),
    ("tilde", '\u{02DC}'), ("trademark", '\u{2122}'), ("two", '2'),
    ("twosuperior", '\u{00B2}'),
    ("u", 'u'), ("uacute", '\u{00FA}'), ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'), ("ugrave", '\u{00F9}'), ("underscore", '_'),
    ("v", 'v'),
    ("w", 'w'),
    ("x", 'x'),
    ("y", 'y'), ("yacute", '\u{00FD}'), ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("z", 'z'), ("zcaron", '\u{017E}'), ("zero", '0'),
];

#[cfg(test)]
mod tests {
    use super::*;

    // --- Standard encoding tables ---

    #[test]
    fn all_encodings_agree_on_basic_ascii_letters() {
        for enc in [
            StandardEncoding::Standard,
            StandardEncoding::WinAnsi,
            StandardEncoding::MacRoman,
        ] {
            assert_eq!(enc.decode(b'A'), Some('A'));
            assert_eq!(enc.decode(b'z'), Some('z'));
            assert_eq!(enc.decode(b' '), Some(' '));
        }
    }

    #[test]
    fn standard_uses_typographic_quotes() {
        assert_eq!(StandardEncoding::Standard.decode(0x27), Some('\u{2019}'));
        assert_eq!(StandardEncoding::Standard.decode(0x60), Some('\u{2018}'));
        // WinAnsi keeps the ASCII forms.
        assert_eq!(StandardEncoding::WinAnsi.decode(0x27), Some('\''));
    }

    #[test]
    fn standard_high_region() {
        assert_eq!(StandardEncoding::Standard.decode(0xA4), Some('\u{2044}'));
        assert_eq!(StandardEncoding::Standard.decode(0xAE), Some('\u{FB01}'));
        assert_eq!(StandardEncoding::Standard.decode(0xD0), Some('\u{2014}'));
        // 0x80-0xA0 is undefined in StandardEncoding.
        assert_eq!(StandardEncoding::Standard.decode(0x80), None);
    }

    #[test]
    fn winansi_cp1252_additions() {
        assert_eq!(StandardEncoding::WinAnsi.decode(0x80), Some('\u{20AC}'));
        assert_eq!(StandardEncoding::WinAnsi.decode(0x93), Some('\u{201C}'));
        assert_eq!(StandardEncoding::WinAnsi.decode(0x99), Some('\u{2122}'));
    }

    #[test]
    fn winansi_undefined_codes() {
        for code in [0x81u8, 0x8D, 0x8F, 0x90, 0x9D] {
            assert_eq!(StandardEncoding::WinAnsi.decode(code), None);
        }
    }

    #[test]
    fn winansi_latin1_upper_half() {
        assert_eq!(StandardEncoding::WinAnsi.decode(0xE9), Some('\u{00E9}')); // é
        assert_eq!(StandardEncoding::WinAnsi.decode(0xFC), Some('\u{00FC}')); // ü
    }

    #[test]
    fn macroman_upper_half() {
        assert_eq!(StandardEncoding::MacRoman.decode(0x8E), Some('\u{00E9}')); // é
        assert_eq!(StandardEncoding::MacRoman.decode(0xA5), Some('\u{2022}')); // bullet
        assert_eq!(StandardEncoding::MacRoman.decode(0xD5), Some('\u{2019}'));
    }

    #[test]
    fn macexpert_oldstyle_figures_and_small_caps() {
        assert_eq!(StandardEncoding::MacExpert.decode(0x30), Some('\u{F730}'));
        assert_eq!(StandardEncoding::MacExpert.decode(0x61), Some('\u{F761}'));
        assert_eq!(StandardEncoding::MacExpert.decode(0x41), None);
    }

    #[test]
    fn from_name_resolves_the_four_encodings() {
        assert_eq!(
            StandardEncoding::from_name("WinAnsiEncoding"),
            Some(StandardEncoding::WinAnsi)
        );
        assert_eq!(
            StandardEncoding::from_name("MacRomanEncoding"),
            Some(StandardEncoding::MacRoman)
        );
        assert_eq!(
            StandardEncoding::from_name("MacExpertEncoding"),
            Some(StandardEncoding::MacExpert)
        );
        assert_eq!(
            StandardEncoding::from_name("StandardEncoding"),
            Some(StandardEncoding::Standard)
        );
        assert_eq!(StandardEncoding::from_name("Identity-H"), None);
    }

    #[test]
    fn decode_bytes_replaces_undefined_with_replacement_char() {
        let s = StandardEncoding::WinAnsi.decode_bytes(&[b'A', 0x81, b'B']);
        assert_eq!(s, "A\u{FFFD}B");
    }

    // --- FontEncoding / Differences ---

    #[test]
    fn differences_override_base_encoding() {
        let enc = FontEncoding::with_differences(
            StandardEncoding::WinAnsi,
            &[(65, '\u{0391}')], // code 65 remapped to Greek Alpha
        );
        assert_eq!(enc.decode(65), Some('\u{0391}'));
        assert_eq!(enc.decode(66), Some('B')); // untouched
    }

    #[test]
    fn later_differences_win() {
        let mut enc = FontEncoding::from_standard(StandardEncoding::Standard);
        enc.apply_differences(&[(0x41, 'x'), (0x41, 'y')]);
        assert_eq!(enc.decode(0x41), Some('y'));
    }

    #[test]
    fn default_font_encoding_is_standard() {
        let enc = FontEncoding::default();
        assert_eq!(enc.decode(0x27), Some('\u{2019}'));
    }

    #[test]
    fn space_code_found() {
        let enc = FontEncoding::from_standard(StandardEncoding::WinAnsi);
        assert_eq!(enc.space_code(), Some(0x20));
    }

    #[test]
    fn space_code_after_remap() {
        // Remap code 1 to space; 0x20 still maps to space, and the lowest
        // match wins.
        let enc = FontEncoding::with_differences(StandardEncoding::Standard, &[(1, ' ')]);
        assert_eq!(enc.space_code(), Some(1));
    }

    // --- Glyph name resolution ---

    #[test]
    fn glyph_names_table_is_sorted() {
        for pair in GLYPH_NAMES.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "GLYPH_NAMES out of order at {:?} >= {:?}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn glyph_name_common_latin() {
        assert_eq!(glyph_name_to_char("A"), Some('A'));
        assert_eq!(glyph_name_to_char("eacute"), Some('\u{00E9}'));
        assert_eq!(glyph_name_to_char("space"), Some(' '));
        assert_eq!(glyph_name_to_char("germandbls"), Some('\u{00DF}'));
    }

    #[test]
    fn glyph_name_ligatures_and_punctuation() {
        assert_eq!(glyph_name_to_char("fi"), Some('\u{FB01}'));
        assert_eq!(glyph_name_to_char("emdash"), Some('\u{2014}'));
        assert_eq!(glyph_name_to_char("quotedblleft"), Some('\u{201C}'));
    }

    #[test]
    fn glyph_name_uni_form() {
        assert_eq!(glyph_name_to_char("uni0041"), Some('A'));
        assert_eq!(glyph_name_to_char("uni4E2D"), Some('\u{4E2D}'));
    }

    #[test]
    fn glyph_name_u_form() {
        assert_eq!(glyph_name_to_char("u0041"), Some('A'));
        assert_eq!(glyph_name_to_char("u1F600"), Some('\u{1F600}'));
    }

    #[test]
    fn glyph_name_unknown_returns_none() {
        assert_eq!(glyph_name_to_char("g1234"), None);
        assert_eq!(glyph_name_to_char(""), None);
    }
}
