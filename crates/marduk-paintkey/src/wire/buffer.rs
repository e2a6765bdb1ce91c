/// Growable byte buffer made of fixed-size chunks.
///
/// Appending never moves bytes already written; only the last chunk is ever
/// partially filled, which keeps offset arithmetic for [`patch`](Self::patch)
/// trivial.
#[derive(Debug, Clone)]
pub struct ChunkedBuffer {
    chunks: Vec<Vec<u8>>,
    chunk_size: usize,
    len: usize,
}

const MIN_CHUNK: usize = 16;

impl ChunkedBuffer {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            chunk_size: chunk_size.max(MIN_CHUNK),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn push(&mut self, mut bytes: &[u8]) {
        let chunk_size = self.chunk_size;
        while !bytes.is_empty() {
            if self.chunks.last().is_none_or(|c| c.len() == chunk_size) {
                self.chunks.push(Vec::with_capacity(chunk_size));
            }
            let Some(chunk) = self.chunks.last_mut() else {
                return;
            };
            let n = (chunk_size - chunk.len()).min(bytes.len());
            chunk.extend_from_slice(&bytes[..n]);
            self.len += n;
            bytes = &bytes[n..];
        }
    }

    /// Overwrites already-written bytes starting at `offset`.
    ///
    /// Bytes past the current length are ignored.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) {
        debug_assert!(offset + bytes.len() <= self.len, "patch past end of buffer");
        for (i, &b) in bytes.iter().enumerate() {
            let pos = offset + i;
            if let Some(slot) = self
                .chunks
                .get_mut(pos / self.chunk_size)
                .and_then(|c| c.get_mut(pos % self.chunk_size))
            {
                *slot = b;
            }
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in self.chunks {
            out.extend_from_slice(&chunk);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_spills_into_new_chunks() {
        let mut buf = ChunkedBuffer::with_chunk_size(16);
        let data: Vec<u8> = (0..40).collect();
        buf.push(&data[..10]);
        buf.push(&data[10..]);
        assert_eq!(buf.len(), 40);
        assert_eq!(buf.chunk_count(), 3);
        assert_eq!(buf.into_vec(), data);
    }

    #[test]
    fn patch_across_chunk_boundary() {
        let mut buf = ChunkedBuffer::with_chunk_size(16);
        buf.push(&[0u8; 20]);
        buf.patch(14, &[1, 2, 3, 4]);
        let out = buf.into_vec();
        assert_eq!(&out[13..19], &[0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn tiny_chunk_sizes_are_raised() {
        let mut buf = ChunkedBuffer::with_chunk_size(1);
        buf.push(&[7u8; 16]);
        assert_eq!(buf.chunk_count(), 1);
    }

    #[test]
    fn empty_buffer() {
        let buf = ChunkedBuffer::with_chunk_size(64);
        assert!(buf.is_empty());
        assert!(buf.into_vec().is_empty());
    }
}
