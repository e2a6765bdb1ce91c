//! Primitive writers and readers for key records.
//!
//! Key variants describe their body once, against the [`KeyWriter`] and
//! [`KeyReader`] traits; the binary and text implementations give the same
//! field sequence two encodings.
//!
//! Arrays are self-describing: a one-byte type marker, a signed 32-bit
//! length, then the elements. The text form spells the marker as the same
//! ASCII letter.

mod binary;
mod buffer;
mod text;

use std::fmt;

pub use binary::{BinaryReader, BinaryWriter};
pub use buffer::ChunkedBuffer;
pub use text::{TextReader, TextWriter};

use crate::error::DecodeError;

/// First two bytes of every record, binary or text.
pub const MAGIC: [u8; 2] = *b"Pk";

/// Binary header size: magic, record length, tag hash, content hash.
pub const HEADER_LEN: usize = 2 + 4 + 4 + 4;

pub const BYTE_MARKER: u8 = b'B';
pub const INT_MARKER: u8 = b'I';
pub const LONG_MARKER: u8 = b'L';

/// Sink for record primitives.
///
/// Writers are in-memory and cannot fail. One writer serves one record.
pub trait KeyWriter {
    fn write_byte(&mut self, value: u8);
    fn write_int(&mut self, value: i32);
    fn write_long(&mut self, value: i64);
    fn write_int_array(&mut self, values: &[i32]);
    fn write_long_array(&mut self, values: &[i64]);
    fn write_byte_array(&mut self, values: &[u8]);

    /// Completes the record (length patching, terminator).
    fn finish_record(&mut self);
}

/// Source of record primitives; the dual of [`KeyWriter`].
pub trait KeyReader {
    fn read_byte(&mut self) -> Result<u8, DecodeError>;
    fn read_int(&mut self) -> Result<i32, DecodeError>;
    fn read_long(&mut self) -> Result<i64, DecodeError>;
    fn read_int_array(&mut self) -> Result<Vec<i32>, DecodeError>;
    fn read_long_array(&mut self) -> Result<Vec<i64>, DecodeError>;
    fn read_byte_array(&mut self) -> Result<Vec<u8>, DecodeError>;

    /// Checks that the record has been consumed completely.
    fn finish_record(&mut self) -> Result<(), DecodeError>;
}

/// Record encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RecordFormat {
    Binary,
    Text,
}

impl RecordFormat {
    /// Guesses the encoding of `data`.
    ///
    /// Text records put whitespace right after the magic; in a binary record
    /// that byte is the top byte of the record length, which is never an
    /// ASCII whitespace value for records below 128 MiB.
    pub fn sniff(data: &[u8]) -> RecordFormat {
        match data.get(MAGIC.len()) {
            Some(b) if b.is_ascii_whitespace() => RecordFormat::Text,
            _ => RecordFormat::Binary,
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordFormat::Binary => "binary",
            RecordFormat::Text => "text",
        })
    }
}

/// Validates a decoded array length against the configured limit.
pub(crate) fn check_array_len(length: i32, max: usize) -> Result<usize, DecodeError> {
    let length = usize::try_from(length).map_err(|_| DecodeError::InvalidLength {
        length: length as i64,
    })?;
    if length > max {
        return Err(DecodeError::ArrayTooLong { length, max });
    }
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_formats() {
        assert_eq!(RecordFormat::sniff(b"Pk 12 34\n"), RecordFormat::Text);
        assert_eq!(RecordFormat::sniff(&[b'P', b'k', 0, 0, 0, 20]), RecordFormat::Binary);
        assert_eq!(RecordFormat::sniff(b"P"), RecordFormat::Binary);
    }

    #[test]
    fn array_len_limits() {
        assert_eq!(check_array_len(3, 10), Ok(3));
        assert_eq!(check_array_len(-1, 10), Err(DecodeError::InvalidLength { length: -1 }));
        assert_eq!(
            check_array_len(11, 10),
            Err(DecodeError::ArrayTooLong { length: 11, max: 10 })
        );
    }
}
