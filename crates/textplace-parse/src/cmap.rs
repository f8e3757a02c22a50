//! ToUnicode CMap parsing.
//!
//! A `/ToUnicode` stream maps raw character codes to Unicode sequences.
//! Besides the `bfchar`/`bfrange` mapping sections this parser keeps the
//! `codespacerange` declarations, which determine how many bytes each
//! code consumes — the piece that makes variable-length CID codes work.

use std::collections::HashMap;

use crate::error::BackendError;

/// A codespace range: two byte strings of equal length bounding the
/// valid codes of that length.
#[derive(Debug, Clone, PartialEq)]
pub struct CodespaceRange {
    low: Vec<u8>,
    high: Vec<u8>,
}

impl CodespaceRange {
    /// Number of bytes a code in this range occupies.
    pub fn byte_len(&self) -> usize {
        self.low.len()
    }

    /// Whether the prefix of `bytes` falls inside this range.
    ///
    /// Comparison is byte-wise on the fixed length, mirroring how CMap
    /// codespaces are defined.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        let n = self.byte_len();
        if bytes.len() < n {
            return false;
        }
        let prefix = &bytes[..n];
        prefix >= self.low.as_slice() && prefix <= self.high.as_slice()
    }
}

/// A parsed ToUnicode CMap.
///
/// Codes are stored as big-endian integers (codes longer than four bytes
/// do not occur in practice). Destination values may be multi-character
/// strings (ligatures) or empty (codes that contribute no text).
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    ranges: Vec<CodespaceRange>,
    mappings: HashMap<u32, String>,
}

impl ToUnicodeCMap {
    /// Parse CMap data.
    ///
    /// Recognizes `begincodespacerange`, `beginbfchar`, and
    /// `beginbfrange` sections anywhere in the stream; surrounding
    /// PostScript boilerplate is skipped token by token.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut scanner = Scanner::new(&text);
        let mut cmap = ToUnicodeCMap::default();

        while let Some(token) = scanner.next() {
            match token {
                Token::Word("begincodespacerange") => {
                    cmap.parse_codespace_section(&mut scanner)?;
                }
                Token::Word("beginbfchar") => {
                    cmap.parse_bfchar_section(&mut scanner)?;
                }
                Token::Word("beginbfrange") => {
                    cmap.parse_bfrange_section(&mut scanner)?;
                }
                _ => {}
            }
        }

        // Order ranges by code length so the shortest match wins during
        // iteration, the convention CID keyed CMaps rely on.
        cmap.ranges.sort_by_key(CodespaceRange::byte_len);
        Ok(cmap)
    }

    fn parse_codespace_section(&mut self, scanner: &mut Scanner<'_>) -> Result<(), BackendError> {
        loop {
            match scanner.next() {
                Some(Token::Hex(low)) => {
                    let Some(Token::Hex(high)) = scanner.next() else {
                        return Err(BackendError::Parse(
                            "codespace range missing high bound".to_string(),
                        ));
                    };
                    let low = hex_bytes(low)?;
                    let high = hex_bytes(high)?;
                    if !low.is_empty() && low.len() == high.len() {
                        self.ranges.push(CodespaceRange { low, high });
                    }
                }
                Some(Token::Word("endcodespacerange")) | None => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn parse_bfchar_section(&mut self, scanner: &mut Scanner<'_>) -> Result<(), BackendError> {
        loop {
            match scanner.next() {
                Some(Token::Hex(src)) => {
                    let Some(Token::Hex(dst)) = scanner.next() else {
                        return Err(BackendError::Parse(
                            "bfchar entry missing destination".to_string(),
                        ));
                    };
                    let code = hex_code(src)?;
                    self.mappings.insert(code, utf16be_hex_to_string(dst)?);
                }
                Some(Token::Word("endbfchar")) | None => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn parse_bfrange_section(&mut self, scanner: &mut Scanner<'_>) -> Result<(), BackendError> {
        loop {
            let low = match scanner.next() {
                Some(Token::Hex(h)) => hex_code(h)?,
                Some(Token::Word("endbfrange")) | None => return Ok(()),
                Some(_) => continue,
            };
            let Some(Token::Hex(high)) = scanner.next() else {
                return Err(BackendError::Parse(
                    "bfrange entry missing high bound".to_string(),
                ));
            };
            let high = hex_code(high)?;

            match scanner.next() {
                // <low> <high> <dstStart>: consecutive codepoints.
                Some(Token::Hex(dst)) => {
                    let start = hex_code(dst)?;
                    for offset in 0..=high.saturating_sub(low) {
                        if let Some(ch) = char::from_u32(start + offset) {
                            self.mappings.insert(low + offset, ch.to_string());
                        }
                    }
                }
                // <low> <high> [<dst1> <dst2> …]: one string per code.
                Some(Token::BracketOpen) => {
                    let mut code = low;
                    loop {
                        match scanner.next() {
                            Some(Token::Hex(dst)) => {
                                if code <= high {
                                    self.mappings.insert(code, utf16be_hex_to_string(dst)?);
                                    code += 1;
                                }
                            }
                            Some(Token::BracketClose) | None => break,
                            Some(_) => {}
                        }
                    }
                }
                _ => {
                    return Err(BackendError::Parse(
                        "bfrange entry missing destination".to_string(),
                    ));
                }
            }
        }
    }

    /// The Unicode translation for a code, if mapped.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Whether any codespace ranges were declared.
    pub fn has_codespace(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Number of code → Unicode mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the CMap carries no mappings.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Read the code starting at `bytes[pos..]`, returning the code and
    /// the number of bytes it consumed.
    ///
    /// The first (shortest) codespace range containing the prefix
    /// decides the length. When no range matches, the shortest declared
    /// range length is consumed; with no ranges at all the implicit CID
    /// default of two bytes applies.
    pub fn next_code(&self, bytes: &[u8], pos: usize) -> (u32, usize) {
        let remaining = &bytes[pos..];
        for range in &self.ranges {
            if range.matches(remaining) {
                let n = range.byte_len();
                return (be_code(&remaining[..n]), n);
            }
        }
        let fallback = self
            .ranges
            .first()
            .map(CodespaceRange::byte_len)
            .unwrap_or(2)
            .min(remaining.len().max(1));
        (be_code(&remaining[..fallback.min(remaining.len())]), fallback)
    }

    /// The lowest code whose translation is a single space (U+0020).
    pub fn space_code(&self) -> Option<u32> {
        self.mappings
            .iter()
            .filter(|(_, v)| v.as_str() == " ")
            .map(|(&k, _)| k)
            .min()
    }
}

/// Big-endian integer value of up to four code bytes.
fn be_code(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Decode a hex token into raw bytes. An odd digit count gets a trailing
/// zero, as in content-stream hex strings.
fn hex_bytes(hex: &str) -> Result<Vec<u8>, BackendError> {
    let mut digits: Vec<u8> = Vec::with_capacity(hex.len());
    for c in hex.chars() {
        let d = c
            .to_digit(16)
            .ok_or_else(|| BackendError::Parse(format!("invalid hex digit {c:?} in CMap")))?;
        digits.push(d as u8);
    }
    if digits.len() % 2 != 0 {
        digits.push(0);
    }
    Ok(digits.chunks(2).map(|d| (d[0] << 4) | d[1]).collect())
}

/// Numeric value of a hex token (codes are at most four bytes).
fn hex_code(hex: &str) -> Result<u32, BackendError> {
    Ok(be_code(&hex_bytes(hex)?))
}

/// Decode a hex token holding UTF-16BE code units into a string.
///
/// Empty tokens are valid and produce the empty string (codes mapped to
/// no text). A lone two-digit token is widened to one code unit.
fn utf16be_hex_to_string(hex: &str) -> Result<String, BackendError> {
    let bytes = hex_bytes(hex)?;
    if bytes.is_empty() {
        return Ok(String::new());
    }
    if bytes.len() == 1 {
        return Ok(char::from(bytes[0]).to_string());
    }
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|c| {
            if c.len() == 2 {
                u16::from_be_bytes([c[0], c[1]])
            } else {
                u16::from(c[0])
            }
        })
        .collect();
    String::from_utf16(&units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE in CMap: {e}")))
}

// --- Token scanning ---

#[derive(Debug, PartialEq)]
enum Token<'a> {
    /// `<…>` hex payload (without the brackets).
    Hex(&'a str),
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// Any other whitespace-delimited word (keywords, numbers, names).
    Word(&'a str),
}

/// Minimal token scanner for the CMap grammar.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        match bytes[self.pos] {
            b'<' => {
                let start = self.pos + 1;
                let end = self.text[start..].find('>').map(|i| start + i)?;
                self.pos = end + 1;
                Some(Token::Hex(&self.text[start..end]))
            }
            b'[' => {
                self.pos += 1;
                Some(Token::BracketOpen)
            }
            b']' => {
                self.pos += 1;
                Some(Token::BracketClose)
            }
            _ => {
                let start = self.pos;
                while self.pos < bytes.len()
                    && !bytes[self.pos].is_ascii_whitespace()
                    && !matches!(bytes[self.pos], b'<' | b'[' | b']')
                {
                    self.pos += 1;
                }
                Some(Token::Word(&self.text[start..self.pos]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Basic parsing ---

    #[test]
    fn empty_cmap() {
        let cmap = ToUnicodeCMap::parse(b"").unwrap();
        assert!(cmap.is_empty());
        assert!(!cmap.has_codespace());
        assert_eq!(cmap.lookup(0x41), None);
    }

    #[test]
    fn bfchar_single() {
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <0041> <0041> endbfchar").unwrap();
        assert_eq!(cmap.lookup(0x41), Some("A"));
        assert_eq!(cmap.len(), 1);
    }

    #[test]
    fn bfchar_multiple_lines() {
        let data = b"2 beginbfchar\n<01> <0041>\n<02> <0042>\nendbfchar";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert_eq!(cmap.lookup(0x01), Some("A"));
        assert_eq!(cmap.lookup(0x02), Some("B"));
    }

    #[test]
    fn bfchar_ligature_destination() {
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <FB01> <00660069> endbfchar").unwrap();
        assert_eq!(cmap.lookup(0xFB01), Some("fi"));
    }

    #[test]
    fn bfchar_surrogate_pair_destination() {
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <01> <D83DDE00> endbfchar").unwrap();
        assert_eq!(cmap.lookup(0x01), Some("\u{1F600}"));
    }

    #[test]
    fn bfchar_empty_destination() {
        // A code explicitly mapped to no text.
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <03> <> endbfchar").unwrap();
        assert_eq!(cmap.lookup(0x03), Some(""));
    }

    #[test]
    fn bfrange_consecutive() {
        let cmap = ToUnicodeCMap::parse(b"beginbfrange <0041> <0043> <0061> endbfrange").unwrap();
        assert_eq!(cmap.lookup(0x41), Some("a"));
        assert_eq!(cmap.lookup(0x42), Some("b"));
        assert_eq!(cmap.lookup(0x43), Some("c"));
        assert_eq!(cmap.len(), 3);
    }

    #[test]
    fn bfrange_array_destinations() {
        let data = b"beginbfrange <01> <03> [<0058> <0059> <005A>] endbfrange";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert_eq!(cmap.lookup(0x01), Some("X"));
        assert_eq!(cmap.lookup(0x02), Some("Y"));
        assert_eq!(cmap.lookup(0x03), Some("Z"));
    }

    #[test]
    fn bfrange_single_code() {
        let cmap = ToUnicodeCMap::parse(b"beginbfrange <20> <20> <0020> endbfrange").unwrap();
        assert_eq!(cmap.lookup(0x20), Some(" "));
    }

    #[test]
    fn multiple_sections_accumulate() {
        let data = b"\
            1 beginbfchar <01> <0041> endbfchar\n\
            1 beginbfchar <02> <0042> endbfchar\n\
            1 beginbfrange <10> <11> <0061> endbfrange";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert_eq!(cmap.len(), 4);
        assert_eq!(cmap.lookup(0x11), Some("b"));
    }

    #[test]
    fn full_boilerplate() {
        let data = b"\
            /CIDInit /ProcSet findresource begin\n\
            12 dict begin\n\
            begincmap\n\
            /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
            /CMapName /Adobe-Identity-UCS def\n\
            /CMapType 2 def\n\
            1 begincodespacerange\n\
            <0000> <FFFF>\n\
            endcodespacerange\n\
            2 beginbfchar\n\
            <0041> <0041>\n\
            <0042> <0042>\n\
            endbfchar\n\
            endcmap\n\
            CMapName currentdict /CMap defineresource pop\n\
            end\nend";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert!(cmap.has_codespace());
        assert_eq!(cmap.lookup(0x41), Some("A"));
        assert_eq!(cmap.lookup(0x42), Some("B"));
    }

    // --- Codespace-driven code iteration ---

    #[test]
    fn two_byte_codespace() {
        let data = b"begincodespacerange <0000> <FFFF> endcodespacerange";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        let bytes = [0x00, 0x41, 0x00, 0x42];
        assert_eq!(cmap.next_code(&bytes, 0), (0x0041, 2));
        assert_eq!(cmap.next_code(&bytes, 2), (0x0042, 2));
    }

    #[test]
    fn mixed_length_codespaces() {
        // One-byte codes 00-7F, two-byte codes 8000-FFFF.
        let data = b"\
            begincodespacerange\n\
            <00> <7F>\n\
            <8000> <FFFF>\n\
            endcodespacerange";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        let bytes = [0x41, 0x80, 0x01, 0x42];
        assert_eq!(cmap.next_code(&bytes, 0), (0x41, 1));
        assert_eq!(cmap.next_code(&bytes, 1), (0x8001, 2));
        assert_eq!(cmap.next_code(&bytes, 3), (0x42, 1));
    }

    #[test]
    fn no_codespace_defaults_to_two_bytes() {
        let cmap = ToUnicodeCMap::parse(b"").unwrap();
        let bytes = [0x00, 0x41, 0x00];
        assert_eq!(cmap.next_code(&bytes, 0), (0x0041, 2));
    }

    #[test]
    fn out_of_codespace_bytes_consume_shortest_range() {
        let data = b"begincodespacerange <20> <7E> endcodespacerange";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        // 0x10 is outside <20>-<7E>; one byte (the shortest range) burns.
        assert_eq!(cmap.next_code(&[0x10, 0x41], 0), (0x10, 1));
    }

    // --- Space glyph search ---

    #[test]
    fn space_code_found() {
        let data = b"beginbfchar <0107> <0020> endbfchar";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert_eq!(cmap.space_code(), Some(0x0107));
    }

    #[test]
    fn space_code_prefers_lowest() {
        let data = b"beginbfchar <0107> <0020> <0020> <0020> endbfchar";
        let cmap = ToUnicodeCMap::parse(data).unwrap();
        assert_eq!(cmap.space_code(), Some(0x0020));
    }

    #[test]
    fn space_code_absent() {
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <01> <0041> endbfchar").unwrap();
        assert_eq!(cmap.space_code(), None);
    }

    // --- Malformed input ---

    #[test]
    fn bfchar_missing_destination_errors() {
        assert!(ToUnicodeCMap::parse(b"beginbfchar <0041> endbfchar").is_err());
    }

    #[test]
    fn invalid_hex_digit_errors() {
        assert!(ToUnicodeCMap::parse(b"beginbfchar <00ZZ> <0041> endbfchar").is_err());
    }

    #[test]
    fn unterminated_section_is_tolerated() {
        // Scanner hits end of input inside the section; what was read stays.
        let cmap = ToUnicodeCMap::parse(b"beginbfchar <01> <0041>").unwrap();
        assert_eq!(cmap.lookup(0x01), Some("A"));
    }
}
