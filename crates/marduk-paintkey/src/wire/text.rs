//! Text records.
//!
//! Same field sequence as the binary form, spelled as whitespace-separated
//! tokens after the `Pk` magic:
//!
//! | Primitive | Token |
//! |-----------|-------|
//! | byte | `0x54` |
//! | int | `-1138278674` |
//! | long | `4631107791820423168L` |
//! | int array | `I 2 0 1065353216` |
//! | long array | `L 1 0L` |
//! | byte array | `B 3 a1b2c3` (no payload token when empty) |
//!
//! There is no length field: the text record ends with a newline.

use std::fmt::Write as _;

use crate::config::CodecConfig;
use crate::error::DecodeError;

use super::{BYTE_MARKER, INT_MARKER, KeyReader, KeyWriter, LONG_MARKER, MAGIC, check_array_len};

/// Text record writer.
#[derive(Debug)]
pub struct TextWriter {
    out: String,
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextWriter {
    pub fn new() -> Self {
        let mut out = String::with_capacity(64);
        out.extend(MAGIC.iter().map(|&b| b as char));
        Self { out }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn token(&mut self, args: std::fmt::Arguments<'_>) {
        self.out.push(' ');
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
    }

    fn array_header(&mut self, marker: u8, len: usize) {
        self.token(format_args!("{} {len}", marker as char));
    }
}

impl KeyWriter for TextWriter {
    fn write_byte(&mut self, value: u8) {
        self.token(format_args!("0x{value:02x}"));
    }

    fn write_int(&mut self, value: i32) {
        self.token(format_args!("{value}"));
    }

    fn write_long(&mut self, value: i64) {
        self.token(format_args!("{value}L"));
    }

    fn write_int_array(&mut self, values: &[i32]) {
        self.array_header(INT_MARKER, values.len());
        for &v in values {
            self.write_int(v);
        }
    }

    fn write_long_array(&mut self, values: &[i64]) {
        self.array_header(LONG_MARKER, values.len());
        for &v in values {
            self.write_long(v);
        }
    }

    fn write_byte_array(&mut self, values: &[u8]) {
        self.array_header(BYTE_MARKER, values.len());
        if !values.is_empty() {
            self.token(format_args!("{}", hex::encode(values)));
        }
    }

    fn finish_record(&mut self) {
        self.out.push('\n');
    }
}

/// Tokenizing reader over one text record.
#[derive(Debug)]
pub struct TextReader<'s> {
    src: &'s str,
    pos: usize,
    max_array_len: usize,
}

impl<'s> TextReader<'s> {
    pub fn new(src: &'s str, config: &CodecConfig) -> Result<Self, DecodeError> {
        let bytes = src.as_bytes();
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            let mut found = [0; 2];
            for (slot, &b) in found.iter_mut().zip(bytes) {
                *slot = b;
            }
            return Err(DecodeError::BadMagic { found });
        }
        let reader = Self { src, pos: MAGIC.len(), max_array_len: config.max_array_len };
        if !matches!(reader.peek(), Some(c) if c.is_whitespace()) {
            return Err(DecodeError::syntax(reader.pos, "expected whitespace after record magic"));
        }
        Ok(reader)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Next whitespace-delimited token, with its starting offset.
    fn next_token(&mut self, expected: &str) -> Result<(usize, &'s str), DecodeError> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace()) {
            self.advance();
        }
        if start == self.pos {
            return Err(DecodeError::syntax(
                start,
                format!("unexpected end of record, expected {expected}"),
            ));
        }
        Ok((start, &self.src[start..self.pos]))
    }

    fn read_marker(&mut self, marker: u8) -> Result<usize, DecodeError> {
        let (_, tok) = self.next_token("array marker")?;
        let found = tok.as_bytes()[0];
        if tok.len() != 1 || found != marker {
            return Err(DecodeError::BadMarker { expected: marker, found });
        }
        let (offset, tok) = self.next_token("array length")?;
        let len = tok
            .parse::<i32>()
            .map_err(|_| DecodeError::syntax(offset, format!("invalid array length {tok:?}")))?;
        check_array_len(len, self.max_array_len)
    }
}

impl KeyReader for TextReader<'_> {
    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let (offset, tok) = self.next_token("byte")?;
        tok.strip_prefix("0x")
            .filter(|digits| digits.len() == 2)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .ok_or_else(|| DecodeError::syntax(offset, format!("invalid byte {tok:?}")))
    }

    fn read_int(&mut self) -> Result<i32, DecodeError> {
        let (offset, tok) = self.next_token("int")?;
        tok.parse()
            .map_err(|_| DecodeError::syntax(offset, format!("invalid int {tok:?}")))
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        let (offset, tok) = self.next_token("long")?;
        tok.strip_suffix('L')
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| DecodeError::syntax(offset, format!("invalid long {tok:?}")))
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>, DecodeError> {
        let len = self.read_marker(INT_MARKER)?;
        (0..len).map(|_| self.read_int()).collect()
    }

    fn read_long_array(&mut self) -> Result<Vec<i64>, DecodeError> {
        let len = self.read_marker(LONG_MARKER)?;
        (0..len).map(|_| self.read_long()).collect()
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_marker(BYTE_MARKER)?;
        if len == 0 {
            return Ok(Vec::new());
        }
        let (offset, tok) = self.next_token("hex payload")?;
        let bytes = hex::decode(tok)
            .map_err(|e| DecodeError::syntax(offset, format!("invalid hex payload: {e}")))?;
        if bytes.len() != len {
            return Err(DecodeError::syntax(
                offset,
                format!("byte array declares {len} bytes, payload holds {}", bytes.len()),
            ));
        }
        Ok(bytes)
    }

    fn finish_record(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.src.len() - self.pos {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingData { remaining }),
        }
    }
}
