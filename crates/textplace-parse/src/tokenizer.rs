//! Content stream lexer producing operator events.
//!
//! [`OperationReader`] is a pull lexer over raw content-stream bytes:
//! each call to [`next_operation`](OperationReader::next_operation)
//! accumulates operands until an operator keyword and returns the pair.
//! Pull semantics matter for error handling — every operation before a
//! malformed token has already been delivered when the error surfaces,
//! so a broken tail only loses the tail.

use crate::error::BackendError;

/// A content-stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (`42`, `-7`).
    Integer(i64),
    /// Real number (`3.14`, `.5`, `-.002`).
    Real(f64),
    /// Name object (`/F1`), stored without the leading slash and with
    /// `#XX` escapes resolved.
    Name(String),
    /// String object, literal `(…)` or hex `<…>`, as decoded bytes.
    Str(Vec<u8>),
    /// Array of operands (`[(a) -20 (b)]`).
    Array(Vec<Operand>),
    /// Inline dictionary (`<< /MCID 0 >>`), as ordered key-value pairs.
    Dictionary(Vec<(String, Operand)>),
    /// Boolean keyword.
    Boolean(bool),
    /// The null object.
    Null,
}

impl Operand {
    /// Numeric value of an Integer or Real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer value, truncating reals.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Operand::Integer(i) => Some(*i),
            Operand::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Name payload of a Name operand.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    /// String payload of a Str operand.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One operator together with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operator keyword (`"BT"`, `"Tf"`, `"Tj"`, `"'"`, …).
    pub operator: String,
    /// Operands in stack order.
    pub operands: Vec<Operand>,
}

/// Pull lexer over content-stream bytes.
pub struct OperationReader<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Operand>,
}

impl<'a> OperationReader<'a> {
    /// Create a reader over a decoded content stream.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
        }
    }

    /// Produce the next operation, or `None` at end of stream.
    ///
    /// Operands left on the stack at end of stream (no trailing operator)
    /// are discarded. Malformed tokens abort the stream with
    /// [`BackendError::Parse`].
    pub fn next_operation(&mut self) -> Result<Option<Operation>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(&b) = self.input.get(self.pos) else {
                self.stack.clear();
                return Ok(None);
            };

            match b {
                b'(' | b'<' | b'[' | b'/' | b'0'..=b'9' | b'+' | b'-' | b'.' => {
                    let operand = self.read_object()?;
                    self.stack.push(operand);
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                    let keyword = self.read_keyword();
                    match keyword.as_str() {
                        "true" => self.stack.push(Operand::Boolean(true)),
                        "false" => self.stack.push(Operand::Boolean(false)),
                        "null" => self.stack.push(Operand::Null),
                        // Inline images carry raw binary data; consume
                        // through EI so it cannot be misread as operators.
                        "BI" => {
                            self.skip_inline_image()?;
                            self.stack.clear();
                        }
                        _ => {
                            return Ok(Some(Operation {
                                operator: keyword,
                                operands: std::mem::take(&mut self.stack),
                            }));
                        }
                    }
                }
                _ => {
                    return Err(BackendError::Parse(format!(
                        "unexpected byte 0x{b:02X} at offset {}",
                        self.pos
                    )));
                }
            }
        }
    }

    // --- Object parsing ---

    /// Read a single object starting at the current byte.
    fn read_object(&mut self) -> Result<Operand, BackendError> {
        match self.input[self.pos] {
            b'(' => Ok(Operand::Str(self.read_literal_string()?)),
            b'<' => {
                if self.input.get(self.pos + 1) == Some(&b'<') {
                    Ok(Operand::Dictionary(self.read_dictionary()?))
                } else {
                    Ok(Operand::Str(self.read_hex_string()?))
                }
            }
            b'[' => Ok(Operand::Array(self.read_array()?)),
            b'/' => Ok(Operand::Name(self.read_name())),
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.read_number(),
            b'a'..=b'z' | b'A'..=b'Z' => {
                let kw = self.read_keyword();
                match kw.as_str() {
                    "true" => Ok(Operand::Boolean(true)),
                    "false" => Ok(Operand::Boolean(false)),
                    "null" => Ok(Operand::Null),
                    // Bare keywords inside containers have no meaning for
                    // placement extraction; carry them as names.
                    _ => Ok(Operand::Name(kw)),
                }
            }
            b => Err(BackendError::Parse(format!(
                "unexpected byte 0x{b:02X} in object at offset {}",
                self.pos
            ))),
        }
    }

    /// Literal string `(…)` with balanced parentheses and escapes.
    fn read_literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1; // opening '('
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(&b) = self.input.get(self.pos) {
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                    self.pos += 1;
                }
                b')' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => {
                    self.pos += 1;
                    let Some(&esc) = self.input.get(self.pos) else {
                        break;
                    };
                    match esc {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'(' | b')' | b'\\' => out.push(esc),
                        b'\r' => {
                            // Line continuation, CR or CRLF.
                            self.pos += 1;
                            if self.input.get(self.pos) == Some(&b'\n') {
                                self.pos += 1;
                            }
                            continue;
                        }
                        b'\n' => {
                            self.pos += 1;
                            continue;
                        }
                        b'0'..=b'7' => {
                            // Octal escape, up to three digits.
                            let mut val = esc - b'0';
                            for _ in 0..2 {
                                match self.input.get(self.pos + 1) {
                                    Some(&d @ b'0'..=b'7') => {
                                        val = val.wrapping_mul(8).wrapping_add(d - b'0');
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push(val);
                        }
                        other => out.push(other),
                    }
                    self.pos += 1;
                }
                _ => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }

        Err(BackendError::Parse("unterminated literal string".to_string()))
    }

    /// Hex string `<…>`. An odd digit count gets a trailing zero.
    fn read_hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1; // opening '<'
        let mut digits = Vec::new();

        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(BackendError::Parse("unterminated hex string".to_string()));
            };
            self.pos += 1;
            match b {
                b'>' => break,
                _ if is_whitespace(b) => {}
                _ => digits.push(hex_value(b)?),
            }
        }

        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|d| (d[0] << 4) | d[1]).collect())
    }

    /// Array `[…]`.
    fn read_array(&mut self) -> Result<Vec<Operand>, BackendError> {
        self.pos += 1; // opening '['
        let mut items = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            let Some(&b) = self.input.get(self.pos) else {
                return Err(BackendError::Parse("unterminated array".to_string()));
            };
            if b == b']' {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.read_object()?);
        }
    }

    /// Dictionary `<< /Key value … >>`.
    fn read_dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2; // '<<'
        let mut entries = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            match self.input.get(self.pos) {
                None => {
                    return Err(BackendError::Parse("unterminated dictionary".to_string()));
                }
                Some(b'>') if self.input.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    return Ok(entries);
                }
                Some(b'/') => {
                    let key = self.read_name();
                    self.skip_whitespace_and_comments();
                    if self.pos >= self.input.len() {
                        return Err(BackendError::Parse(
                            "unterminated dictionary value".to_string(),
                        ));
                    }
                    let value = self.read_object()?;
                    entries.push((key, value));
                }
                Some(&b) => {
                    return Err(BackendError::Parse(format!(
                        "expected name key in dictionary, got 0x{b:02X}"
                    )));
                }
            }
        }
    }

    /// Name token `/Name`, resolving `#XX` escapes.
    fn read_name(&mut self) -> String {
        self.pos += 1; // '/'
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|&b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Ok(hi), Ok(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    bytes.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            bytes.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Integer or real number.
    fn read_number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        let mut has_dot = false;

        if matches!(self.input.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while let Some(&b) = self.input.get(self.pos) {
            if b == b'.' {
                if has_dot {
                    break;
                }
                has_dot = true;
            } else if !b.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }

        let token = std::str::from_utf8(&self.input[start..self.pos])
            .expect("number token is ASCII by construction");
        if has_dot {
            token
                .parse::<f64>()
                .map(Operand::Real)
                .map_err(|_| BackendError::Parse(format!("invalid real number: {token}")))
        } else {
            token
                .parse::<i64>()
                .map(Operand::Integer)
                .map_err(|_| BackendError::Parse(format!("invalid integer: {token}")))
        }
    }

    /// Operator-shaped keyword: letters plus `*`, `'`, `"`.
    fn read_keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'*' | b'\'' | b'"'))
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Consume `BI … ID <binary> EI` entirely.
    ///
    /// The dictionary entries are read as objects (and dropped); the data
    /// segment is scanned for a whitespace-delimited `EI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        // Dictionary entries until the ID keyword.
        loop {
            self.skip_whitespace_and_comments();
            let Some(&b) = self.input.get(self.pos) else {
                return Err(BackendError::Parse(
                    "unterminated inline image (missing ID)".to_string(),
                ));
            };
            if b == b'I' && self.input.get(self.pos + 1) == Some(&b'D') {
                self.pos += 2;
                // Single whitespace separator after ID.
                if self.input.get(self.pos).is_some_and(|&b| is_whitespace(b)) {
                    self.pos += 1;
                }
                break;
            }
            if b == b'/' {
                let _key = self.read_name();
                self.skip_whitespace_and_comments();
                if self.pos >= self.input.len() {
                    return Err(BackendError::Parse(
                        "unterminated inline image dictionary".to_string(),
                    ));
                }
                let _value = self.read_object()?;
            } else {
                // Tolerate stray tokens before ID.
                let _ = self.read_object()?;
            }
        }

        // Binary data until a standalone EI.
        let data_start = self.pos;
        while self.pos < self.input.len() {
            if self.input[self.pos] == b'E'
                && self.input.get(self.pos + 1) == Some(&b'I')
                && (self.pos == data_start || is_whitespace(self.input[self.pos - 1]))
                && self
                    .input
                    .get(self.pos + 2)
                    .map_or(true, |&b| is_whitespace(b) || is_delimiter(b))
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }

        Err(BackendError::Parse(
            "unterminated inline image (missing EI)".to_string(),
        ))
    }

    // --- Low-level scanning ---

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self
                    .input
                    .get(self.pos)
                    .is_some_and(|&b| b != b'\n' && b != b'\r')
                {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }
}

/// PDF whitespace: space, tab, CR, LF, form feed, NUL.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// PDF delimiter characters.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn hex_value(b: u8) -> Result<u8, BackendError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(BackendError::Parse(format!(
            "invalid hex digit: {:?}",
            b as char
        ))),
    }
}

/// Collect every operation in a stream. Test convenience.
#[cfg(test)]
fn read_all(input: &[u8]) -> Result<Vec<Operation>, BackendError> {
    let mut reader = OperationReader::new(input);
    let mut ops = Vec::new();
    while let Some(op) = reader.next_operation()? {
        ops.push(op);
    }
    Ok(ops)
}
