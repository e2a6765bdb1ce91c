use std::collections::HashMap;

use crate::error::RegistryError;
use crate::key::KeyKind;
use crate::numeric::tag_hash;

#[derive(Debug, Clone)]
struct Registration {
    tag: String,
    kind: KeyKind,
}

/// Maps record type tags (hashes of idBase strings) to key kinds.
///
/// The host builds one registry, usually [`KeyRegistry::builtin`], and hands
/// it to every [`KeyCodec`](crate::KeyCodec) by reference.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    by_hash: HashMap<i32, Registration>,
}

impl KeyRegistry {
    /// Empty registry. Only `Unknown` records resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every concrete key kind under its idBase.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in KeyKind::ALL {
            if kind == KeyKind::Unknown {
                continue;
            }
            if let Err(e) = registry.register(kind) {
                log::warn!("builtin key registration: {e}");
            }
        }
        registry
    }

    /// Registers `kind` under its own idBase.
    pub fn register(&mut self, kind: KeyKind) -> Result<(), RegistryError> {
        self.register_alias(kind.id_base(), kind)
    }

    /// Registers `kind` under an additional tag, e.g. a legacy idBase.
    ///
    /// Re-registering the same tag for the same kind is a no-op. A tag whose
    /// hash is already taken by a different tag or kind is rejected: decoding
    /// could not tell the two apart.
    pub fn register_alias(&mut self, tag: &str, kind: KeyKind) -> Result<(), RegistryError> {
        let hash = tag_hash(tag);
        if let Some(existing) = self.by_hash.get(&hash) {
            if existing.tag == tag && existing.kind == kind {
                return Ok(());
            }
            return Err(RegistryError::TagCollision {
                tag: tag.to_owned(),
                existing: existing.tag.clone(),
                hash,
            });
        }
        log::debug!("registered key tag {tag:?} (0x{:08x}) as {kind}", hash as u32);
        self.by_hash.insert(hash, Registration { tag: tag.to_owned(), kind });
        Ok(())
    }

    /// Kind recorded under `tag_hash`.
    ///
    /// The `Unknown` kind always resolves, registered or not.
    pub fn resolve(&self, tag_hash: i32) -> Option<KeyKind> {
        match self.by_hash.get(&tag_hash) {
            Some(registration) => Some(registration.kind),
            None if tag_hash == KeyKind::Unknown.tag_hash() => Some(KeyKind::Unknown),
            None => None,
        }
    }

    pub fn is_registered(&self, kind: KeyKind) -> bool {
        self.by_hash.values().any(|r| r.kind == kind)
    }

    /// Registered `(tag, kind)` pairs in tag order.
    pub fn registered_tags(&self) -> impl Iterator<Item = (&str, KeyKind)> {
        let mut tags: Vec<(&str, KeyKind)> =
            self.by_hash.values().map(|r| (r.tag.as_str(), r.kind)).collect();
        tags.sort_unstable_by_key(|&(tag, _)| tag);
        tags.into_iter()
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}
