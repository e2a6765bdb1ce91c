use byteorder::{BigEndian, ByteOrder};

use crate::config::CodecConfig;
use crate::error::DecodeError;

use super::{
    BYTE_MARKER, ChunkedBuffer, INT_MARKER, KeyReader, KeyWriter, LONG_MARKER, MAGIC,
    check_array_len,
};

/// Offset of the record length placeholder.
const LENGTH_OFFSET: usize = MAGIC.len();

/// Big-endian record writer.
///
/// The record opens with the magic and a zeroed length field;
/// [`finish_record`](KeyWriter::finish_record) patches the final size in.
#[derive(Debug)]
pub struct BinaryWriter {
    buf: ChunkedBuffer,
}

impl BinaryWriter {
    pub fn new(config: &CodecConfig) -> Self {
        let mut buf = ChunkedBuffer::with_chunk_size(config.chunk_size);
        buf.push(&MAGIC);
        buf.push(&[0; 4]);
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_vec()
    }

    fn write_len(&mut self, marker: u8, len: usize) {
        debug_assert!(len <= i32::MAX as usize, "array too long for record");
        self.write_byte(marker);
        self.write_int(len as i32);
    }
}

impl KeyWriter for BinaryWriter {
    fn write_byte(&mut self, value: u8) {
        self.buf.push(&[value]);
    }

    fn write_int(&mut self, value: i32) {
        let mut b = [0; 4];
        BigEndian::write_i32(&mut b, value);
        self.buf.push(&b);
    }

    fn write_long(&mut self, value: i64) {
        let mut b = [0; 8];
        BigEndian::write_i64(&mut b, value);
        self.buf.push(&b);
    }

    fn write_int_array(&mut self, values: &[i32]) {
        self.write_len(INT_MARKER, values.len());
        for &v in values {
            self.write_int(v);
        }
    }

    fn write_long_array(&mut self, values: &[i64]) {
        self.write_len(LONG_MARKER, values.len());
        for &v in values {
            self.write_long(v);
        }
    }

    fn write_byte_array(&mut self, values: &[u8]) {
        self.write_len(BYTE_MARKER, values.len());
        self.buf.push(values);
    }

    fn finish_record(&mut self) {
        let mut b = [0; 4];
        BigEndian::write_i32(&mut b, self.buf.len() as i32);
        self.buf.patch(LENGTH_OFFSET, &b);
    }
}

/// Reader over one complete binary record.
///
/// Construction validates the magic and the record length, so the reader
/// starts positioned at the tag hash.
#[derive(Debug)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    max_array_len: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8], config: &CodecConfig) -> Result<Self, DecodeError> {
        let mut reader = Self { data, pos: 0, max_array_len: config.max_array_len };

        let magic = reader.take(MAGIC.len())?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic { found: [magic[0], magic[1]] });
        }

        let declared = reader.read_int()?;
        match usize::try_from(declared) {
            Ok(len) if len == data.len() => {}
            Ok(len) if len > data.len() => {
                return Err(DecodeError::Truncated { needed: len, available: data.len() });
            }
            _ => {
                return Err(DecodeError::LengthMismatch { declared, actual: data.len() });
            }
        }

        Ok(reader)
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if available < n {
            return Err(DecodeError::Truncated { needed: n, available });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an array header and checks that `element_size * len` bytes follow.
    fn read_len(&mut self, marker: u8, element_size: usize) -> Result<usize, DecodeError> {
        let found = self.read_byte()?;
        if found != marker {
            return Err(DecodeError::BadMarker { expected: marker, found });
        }
        let len = check_array_len(self.read_int()?, self.max_array_len)?;
        let needed = len * element_size;
        let available = self.remaining();
        if available < needed {
            return Err(DecodeError::Truncated { needed, available });
        }
        Ok(len)
    }
}

impl KeyReader for BinaryReader<'_> {
    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_int(&mut self) -> Result<i32, DecodeError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>, DecodeError> {
        let len = self.read_len(INT_MARKER, 4)?;
        let mut out = vec![0; len];
        BigEndian::read_i32_into(self.take(len * 4)?, &mut out);
        Ok(out)
    }

    fn read_long_array(&mut self) -> Result<Vec<i64>, DecodeError> {
        let len = self.read_len(LONG_MARKER, 8)?;
        let mut out = vec![0; len];
        BigEndian::read_i64_into(self.take(len * 8)?, &mut out);
        Ok(out)
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_len(BYTE_MARKER, 1)?;
        Ok(self.take(len)?.to_vec())
    }

    fn finish_record(&mut self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingData { remaining }),
        }
    }
}
