use std::fmt;

use crate::key::KeyKind;

/// Error returned by application adapters (opaque paint codecs).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to turn a record back into a key.
///
/// Every variant carries the expected and the observed value so a failed
/// decode can be diagnosed from the message alone.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The record does not start with the two magic bytes.
    BadMagic { found: [u8; 2] },
    /// Fewer bytes remain than a header or length field requires.
    Truncated { needed: usize, available: usize },
    /// The record length in the header disagrees with the input size.
    LengthMismatch { declared: i32, actual: usize },
    /// An array starts with the wrong type marker.
    BadMarker { expected: u8, found: u8 },
    /// An array length is negative.
    InvalidLength { length: i64 },
    /// An array length exceeds the configured limit.
    ArrayTooLong { length: usize, max: usize },
    /// The cyclic flag byte is neither reserved value.
    InvalidFlag { value: u8 },
    /// An enum byte is outside its closed set.
    InvalidEnum { field: &'static str, value: u8 },
    /// Stop fraction and stop color arrays differ in length.
    StopCountMismatch { fractions: usize, colors: usize },
    /// A transform array does not hold six coefficients.
    BadTransform { coefficients: usize },
    /// The type tag hash is not registered.
    UnknownTag { tag_hash: i32 },
    /// The decoded key does not hash to the recorded content hash.
    HashMismatch { kind: KeyKind, recorded: i32, computed: i32 },
    /// Input continues after the record body.
    TrailingData { remaining: usize },
    /// Malformed token in a text record.
    Syntax { offset: usize, message: String },
    /// The record holds an opaque paint and no opaque codec is installed.
    MissingOpaqueCodec,
    /// The opaque paint codec rejected its payload.
    Opaque(String),
}

impl DecodeError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax { offset, message: message.into() }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => write!(
                f,
                "bad record magic: expected {:02x} {:02x}, found {:02x} {:02x}",
                crate::wire::MAGIC[0],
                crate::wire::MAGIC[1],
                found[0],
                found[1]
            ),
            Self::Truncated { needed, available } => write!(
                f,
                "record truncated: {needed} bytes needed, {available} available"
            ),
            Self::LengthMismatch { declared, actual } => write!(
                f,
                "record length mismatch: header declares {declared} bytes, input has {actual}"
            ),
            Self::BadMarker { expected, found } => write!(
                f,
                "array marker mismatch: expected {:?}, found 0x{found:02x}",
                *expected as char
            ),
            Self::InvalidLength { length } => write!(f, "invalid array length {length}"),
            Self::ArrayTooLong { length, max } => {
                write!(f, "array length {length} exceeds limit {max}")
            }
            Self::InvalidFlag { value } => write!(
                f,
                "invalid cyclic flag 0x{value:02x}: expected 'T' (0x54) or 'F' (0x46)"
            ),
            Self::InvalidEnum { field, value } => write!(f, "invalid {field} byte {value}"),
            Self::StopCountMismatch { fractions, colors } => write!(
                f,
                "gradient has {fractions} stop fractions but {colors} stop colors"
            ),
            Self::BadTransform { coefficients } => write!(
                f,
                "transform needs 6 coefficients, record holds {coefficients}"
            ),
            Self::UnknownTag { tag_hash } => write!(
                f,
                "unresolvable key type tag 0x{:08x} ({tag_hash})",
                *tag_hash as u32
            ),
            Self::HashMismatch { kind, recorded, computed } => write!(
                f,
                "{kind} content hash mismatch: record says 0x{:08x}, decoded key hashes to 0x{:08x}",
                *recorded as u32,
                *computed as u32
            ),
            Self::TrailingData { remaining } => {
                write!(f, "{remaining} bytes of trailing data after record body")
            }
            Self::Syntax { offset, message } => {
                write!(f, "text record syntax error at offset {offset}: {message}")
            }
            Self::MissingOpaqueCodec => {
                write!(f, "record holds an opaque paint but no opaque paint codec is installed")
            }
            Self::Opaque(msg) => write!(f, "opaque paint payload rejected: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Failure to write a key as a record.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    MissingOpaqueCodec,
    Opaque(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOpaqueCodec => {
                write!(f, "cannot encode an opaque paint without an opaque paint codec")
            }
            Self::Opaque(msg) => write!(f, "opaque paint codec failed: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failure to build a key from a paint, or a paint from a key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyError {
    /// The paint cannot be canonicalized (non-finite geometry, bad stops).
    InvalidPaint { kind: KeyKind, reason: String },
    /// The texture store has no pixels for the key's digest.
    MissingTexture { digest: String },
}

impl KeyError {
    pub(crate) fn invalid(kind: KeyKind, reason: impl Into<String>) -> Self {
        Self::InvalidPaint { kind, reason: reason.into() }
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPaint { kind, reason } => write!(f, "invalid {kind}: {reason}"),
            Self::MissingTexture { digest } => {
                write!(f, "texture store has no pixels for digest {digest}")
            }
        }
    }
}

impl std::error::Error for KeyError {}

/// Failure to register a key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two different tags share a 32-bit tag hash.
    TagCollision { tag: String, existing: String, hash: i32 },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagCollision { tag, existing, hash } => write!(
                f,
                "tag {tag:?} hashes to 0x{:08x}, already taken by {existing:?}",
                *hash as u32
            ),
        }
    }
}

impl std::error::Error for RegistryError {}
