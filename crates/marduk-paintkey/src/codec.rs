use crate::config::CodecConfig;
use crate::error::{DecodeError, EncodeError};
use crate::key::{OpaquePaintCodec, PaintKey};
use crate::registry::KeyRegistry;
use crate::wire::{
    BinaryReader, BinaryWriter, KeyReader, KeyWriter, RecordFormat, TextReader, TextWriter,
};

/// Reads and writes paint key records.
///
/// Record header: magic, (binary only) record length, tag hash of the
/// variant's idBase, content hash. The variant body follows; decoding
/// recomputes the content hash and rejects the record on mismatch.
#[derive(Clone, Copy)]
pub struct KeyCodec<'a> {
    registry: &'a KeyRegistry,
    opaque: Option<&'a dyn OpaquePaintCodec>,
    config: CodecConfig,
}

impl<'a> KeyCodec<'a> {
    pub fn new(registry: &'a KeyRegistry) -> Self {
        Self { registry, opaque: None, config: CodecConfig::default() }
    }

    /// Installs the adapter used for [`UnknownKey`](crate::key::UnknownKey) bodies.
    pub fn with_opaque_codec(mut self, codec: &'a dyn OpaquePaintCodec) -> Self {
        self.opaque = Some(codec);
        self
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &'a KeyRegistry {
        self.registry
    }

    // ── encode ────────────────────────────────────────────────────────────

    pub fn encode_binary(&self, key: &PaintKey) -> Result<Vec<u8>, EncodeError> {
        let mut w = BinaryWriter::new(&self.config);
        self.write_record(key, &mut w)?;
        let bytes = w.into_bytes();
        log::debug!("encoded {} as {}-byte binary record", key.kind(), bytes.len());
        Ok(bytes)
    }

    pub fn encode_text(&self, key: &PaintKey) -> Result<String, EncodeError> {
        let mut w = TextWriter::new();
        self.write_record(key, &mut w)?;
        let text = w.into_string();
        log::debug!("encoded {} as {}-byte text record", key.kind(), text.len());
        Ok(text)
    }

    /// Encodes in the requested format, returning the record bytes.
    pub fn encode(&self, key: &PaintKey, format: RecordFormat) -> Result<Vec<u8>, EncodeError> {
        match format {
            RecordFormat::Binary => self.encode_binary(key),
            RecordFormat::Text => self.encode_text(key).map(String::into_bytes),
        }
    }

    fn write_record(&self, key: &PaintKey, w: &mut dyn KeyWriter) -> Result<(), EncodeError> {
        w.write_int(key.kind().tag_hash());
        w.write_int(key.content_hash());
        key.write_body(w, self.opaque)?;
        w.finish_record();
        Ok(())
    }

    // ── decode ────────────────────────────────────────────────────────────

    pub fn decode_binary(&self, data: &[u8]) -> Result<PaintKey, DecodeError> {
        let mut r = BinaryReader::new(data, &self.config)?;
        self.read_record(&mut r)
    }

    pub fn decode_text(&self, src: &str) -> Result<PaintKey, DecodeError> {
        let mut r = TextReader::new(src, &self.config)?;
        self.read_record(&mut r)
    }

    /// Decodes a record of either format, telling them apart by the byte
    /// after the magic.
    pub fn decode(&self, data: &[u8]) -> Result<PaintKey, DecodeError> {
        match RecordFormat::sniff(data) {
            RecordFormat::Binary => self.decode_binary(data),
            RecordFormat::Text => {
                let src = std::str::from_utf8(data).map_err(|e| {
                    DecodeError::syntax(e.valid_up_to(), "text record is not valid UTF-8")
                })?;
                self.decode_text(src)
            }
        }
    }

    fn read_record(&self, r: &mut dyn KeyReader) -> Result<PaintKey, DecodeError> {
        let tag_hash = r.read_int()?;
        let recorded = r.read_int()?;
        let kind = self
            .registry
            .resolve(tag_hash)
            .ok_or(DecodeError::UnknownTag { tag_hash })?;

        let key = PaintKey::read_body(kind, r, self.opaque)?;
        r.finish_record()?;

        let computed = key.content_hash();
        if computed != recorded {
            log::debug!("rejected {kind} record: content hash mismatch");
            return Err(DecodeError::HashMismatch { kind, recorded, computed });
        }
        log::debug!("decoded {}", key.id());
        Ok(key)
    }
}

impl std::fmt::Debug for KeyCodec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCodec")
            .field("registry", self.registry)
            .field("opaque", &self.opaque.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use marduk_paint::coords::{Rect, Transform, Vec2};
    use marduk_paint::paint::{
        Color, ColorSpace, ColorStop, LinearGradient, ManagedTexture, MemoryTextureStore, Paint,
        Pixmap, RadialGradient, SpreadMode, TexturePaint, TwoPointGradient,
    };

    use super::*;
    use crate::key::{KeyKind, Stripes, StripesCodec, UnknownKey};
    use crate::wire::HEADER_LEN;

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.2, Color::from_argb(0xff10_2030)),
            ColorStop::new(0.6, Color::from_argb(0x80ff_8000)),
            ColorStop::new(0.9, Color::from_argb(0xff00_00ff)),
        ]
    }

    fn pixmap() -> Arc<Pixmap> {
        let pixels = (0..6u8).map(|i| Color::from_srgb_u8(i, 2 * i, 3 * i, 255)).collect();
        Arc::new(Pixmap::new(3, 2, pixels).unwrap())
    }

    fn sample_paints() -> Vec<Paint> {
        vec![
            Paint::solid(Color::from_argb(0xcc11_2233)),
            Paint::Gradient(
                TwoPointGradient::new(
                    Vec2::new(10.0, 20.0),
                    Color::white(),
                    Vec2::new(-3.5, 4.25),
                    Color::black(),
                )
                .cyclic(true),
            ),
            Paint::LinearGradient(
                LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(42.0, 47.3), stops(), SpreadMode::Reflect)
                    .with_transform(Transform::rotation(0.3)),
            ),
            Paint::RadialGradient(
                RadialGradient::new(Vec2::new(5.0, 5.0), 12.5, stops(), SpreadMode::Repeat)
                    .with_focus(Vec2::new(6.0, 4.0))
                    .with_color_space(ColorSpace::LinearRgb)
                    .with_transform(Transform::scale(2.0, 0.5)),
            ),
            Paint::Texture(TexturePaint::new(pixmap(), Rect::new(1.0, 2.0, 30.0, 20.0))),
            Paint::ManagedTexture(ManagedTexture::new(pixmap(), Rect::new(0.0, 0.0, 3.0, 2.0))),
        ]
    }

    fn sample_keys() -> Vec<PaintKey> {
        sample_paints().iter().map(|p| PaintKey::from_paint(p).unwrap()).collect()
    }

    // ── round trips ───────────────────────────────────────────────────────

    #[test]
    fn binary_round_trip() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let bytes = codec.encode_binary(&key).unwrap();
            assert_eq!(codec.decode_binary(&bytes).unwrap(), key, "{}", key.id());
        }
    }

    #[test]
    fn text_round_trip() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let text = codec.encode_text(&key).unwrap();
            assert!(text.starts_with("Pk ") && text.ends_with('\n'), "{text}");
            assert_eq!(codec.decode_text(&text).unwrap(), key, "{}", key.id());
        }
    }

    #[test]
    fn both_formats_decode_to_the_same_key() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let from_binary = codec.decode(&codec.encode(&key, RecordFormat::Binary).unwrap());
            let from_text = codec.decode(&codec.encode(&key, RecordFormat::Text).unwrap());
            assert_eq!(from_binary.unwrap(), from_text.unwrap());
        }
    }

    #[test]
    fn decoded_keys_keep_id_and_hash() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let decoded = codec.decode_binary(&codec.encode_binary(&key).unwrap()).unwrap();
            assert_eq!(decoded.id(), key.id());
            assert_eq!(decoded.content_hash(), key.content_hash());
            assert_eq!(decoded.kind(), key.kind());
        }
    }

    #[test]
    fn binary_header_layout() {
        let registry = KeyRegistry::builtin();
        let key = PaintKey::from_paint(&Paint::solid(Color::from_argb(0x0102_0304))).unwrap();
        let bytes = KeyCodec::new(&registry).encode_binary(&key).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 4);
        assert_eq!(&bytes[..2], b"Pk");
        assert_eq!(&bytes[2..6], &18i32.to_be_bytes());
        assert_eq!(&bytes[6..10], &KeyKind::Color.tag_hash().to_be_bytes());
        assert_eq!(&bytes[10..14], &0x0102_0304i32.to_be_bytes());
        assert_eq!(&bytes[14..], &[1, 2, 3, 4]);
    }

    #[test]
    fn color_text_record() {
        let registry = KeyRegistry::builtin();
        let key = PaintKey::from_paint(&Paint::solid(Color::from_argb(0xff)));
        let text = KeyCodec::new(&registry).encode_text(&key.unwrap()).unwrap();
        assert_eq!(text, "Pk -1026237733 255 255\n");
    }

    // ── paint boundary ────────────────────────────────────────────────────

    #[test]
    fn decoded_keys_rebuild_their_paints() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let mut store = MemoryTextureStore::new();
        store.insert(pixmap());

        for key in sample_keys() {
            let decoded = codec.decode_text(&codec.encode_text(&key).unwrap()).unwrap();
            let paint = decoded.to_paint(&store).unwrap();
            assert_eq!(PaintKey::from_paint(&paint).unwrap(), key, "{}", key.id());
        }
    }

    // ── corruption ────────────────────────────────────────────────────────

    #[test]
    fn flipped_body_bytes_never_decode_to_another_key() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let bytes = codec.encode_binary(&key).unwrap();
            for i in HEADER_LEN..bytes.len() {
                let mut corrupt = bytes.clone();
                corrupt[i] ^= 0xff;
                if let Ok(decoded) = codec.decode_binary(&corrupt) {
                    assert_eq!(decoded, key, "{} byte {i}", key.id());
                }
            }
        }
    }

    #[test]
    fn flipped_content_hash_is_a_mismatch() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        for key in sample_keys() {
            let mut bytes = codec.encode_binary(&key).unwrap();
            bytes[HEADER_LEN - 1] ^= 0x01;
            let err = codec.decode_binary(&bytes).unwrap_err();
            assert_eq!(
                err,
                DecodeError::HashMismatch {
                    kind: key.kind(),
                    recorded: key.content_hash() ^ 0x01,
                    computed: key.content_hash(),
                }
            );
        }
    }

    #[test]
    fn text_hash_mismatch() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let err = codec.decode_text("Pk -1026237733 7 255\n").unwrap_err();
        assert!(matches!(err, DecodeError::HashMismatch { kind: KeyKind::Color, recorded: 7, computed: 255 }));
    }

    #[test]
    fn truncated_and_padded_records() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let bytes = codec.encode_binary(&sample_keys()[1]).unwrap();

        let err = codec.decode_binary(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }), "{err}");

        let mut padded = bytes.clone();
        padded.push(0);
        let err = codec.decode_binary(&padded).unwrap_err();
        assert!(matches!(err, DecodeError::LengthMismatch { .. }), "{err}");
    }

    #[test]
    fn trailing_text_tokens() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let err = codec.decode_text("Pk -1026237733 255 255 9\n").unwrap_err();
        assert_eq!(err, DecodeError::TrailingData { remaining: 2 });
    }

    #[test]
    fn bad_magic() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let mut bytes = codec.encode_binary(&sample_keys()[0]).unwrap();
        bytes[1] = b'K';
        assert_eq!(
            codec.decode(&bytes).unwrap_err(),
            DecodeError::BadMagic { found: [b'P', b'K'] }
        );
    }

    #[test]
    fn invalid_utf8_text_record() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let err = codec.decode(b"Pk 1 \xff\n").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { offset: 5, .. }), "{err}");
    }

    #[test]
    fn unregistered_tags_do_not_resolve() {
        let empty = KeyRegistry::new();
        let builtin = KeyRegistry::builtin();
        let bytes = KeyCodec::new(&builtin).encode_binary(&sample_keys()[0]).unwrap();
        assert_eq!(
            KeyCodec::new(&empty).decode_binary(&bytes).unwrap_err(),
            DecodeError::UnknownTag { tag_hash: KeyKind::Color.tag_hash() }
        );
    }

    #[test]
    fn array_limit_comes_from_config() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let strict = KeyCodec::new(&registry)
            .with_config(CodecConfig { max_array_len: 2, ..CodecConfig::default() });
        let bytes = codec.encode_binary(&sample_keys()[2]).unwrap();
        assert!(matches!(
            strict.decode_binary(&bytes),
            Err(DecodeError::ArrayTooLong { max: 2, .. })
        ));
    }

    #[test]
    fn bad_cyclic_flag() {
        let registry = KeyRegistry::builtin();
        let codec = KeyCodec::new(&registry);
        let mut bytes = codec.encode_binary(&sample_keys()[1]).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = b'X';
        assert_eq!(codec.decode_binary(&bytes).unwrap_err(), DecodeError::InvalidFlag { value: b'X' });
    }

    // ── opaque paints ─────────────────────────────────────────────────────

    fn stripes_key(width: u32) -> PaintKey {
        PaintKey::from_paint(&Paint::custom(Stripes { width })).unwrap()
    }

    #[test]
    fn custom_paints_become_unknown_keys() {
        let key = stripes_key(7);
        assert_eq!(key.kind(), KeyKind::Unknown);
        assert_eq!(key, PaintKey::from(UnknownKey::new(Arc::new(Stripes { width: 7 }))));
    }

    #[test]
    fn unknown_round_trip_through_opaque_codec() {
        let registry = KeyRegistry::builtin();
        let opaque = StripesCodec;
        let codec = KeyCodec::new(&registry).with_opaque_codec(&opaque);
        let key = stripes_key(7);

        let decoded = codec.decode_binary(&codec.encode_binary(&key).unwrap()).unwrap();
        assert_eq!(decoded, key);
        let decoded = codec.decode_text(&codec.encode_text(&key).unwrap()).unwrap();
        assert_eq!(decoded, key);
        assert!(matches!(decoded.to_paint(&MemoryTextureStore::new()), Ok(Paint::Custom(_))));
    }

    #[test]
    fn unknown_records_need_an_opaque_codec() {
        let registry = KeyRegistry::builtin();
        let opaque = StripesCodec;
        let bare = KeyCodec::new(&registry);
        let full = KeyCodec::new(&registry).with_opaque_codec(&opaque);
        let key = stripes_key(3);

        assert_eq!(bare.encode_binary(&key).unwrap_err(), EncodeError::MissingOpaqueCodec);
        let bytes = full.encode_binary(&key).unwrap();
        assert_eq!(bare.decode_binary(&bytes).unwrap_err(), DecodeError::MissingOpaqueCodec);
    }

    #[test]
    fn opaque_payload_errors_are_reported() {
        let registry = KeyRegistry::builtin();
        let opaque = StripesCodec;
        let codec = KeyCodec::new(&registry).with_opaque_codec(&opaque);
        let record = format!("Pk {} {} B 1 00\n", KeyKind::Unknown.tag_hash(), 0);
        assert!(matches!(codec.decode_text(&record), Err(DecodeError::Opaque(_))));
    }
}
