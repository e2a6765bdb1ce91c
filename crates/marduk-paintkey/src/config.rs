/// Codec configuration.
///
/// `chunk_size` is the allocation unit of the binary writer's buffer.
/// `max_array_len` bounds every array length read from a record; lengths
/// above it are rejected before anything is allocated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub chunk_size: usize,
    pub max_array_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: 256,
            max_array_len: 1 << 16,
        }
    }
}
