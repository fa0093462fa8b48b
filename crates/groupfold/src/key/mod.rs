//! Module: key
//! Responsibility: canonical group keys and the hash-bucketed key index.
//! Does not own: collector semantics or output ordering policy.
//! Boundary: equality/hash substrate shared by buckets, set dedup, and map-key dedup.


use crate::value::{Value, canonical_cmp, hash_value};
use std::collections::BTreeMap;

///
/// StableHash
///
/// Fixed-width hash identifier used by key index buckets.
///

pub type StableHash = u64;

/// Derive one stable 64-bit hash from the canonical value hash digest.
#[must_use]
pub const fn stable_hash_from_digest(digest: [u8; 16]) -> StableHash {
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

///
/// GroupKey
///
/// GroupKey is the canonical equality/hash substrate for grouping and
/// distinct semantics. Equality is value equality after canonicalization,
/// never identity.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupKey {
    canonical: Value,
    hash: StableHash,
}

impl GroupKey {
    /// Canonicalize one raw value into a group key.
    #[must_use]
    pub fn new(value: &Value) -> Self {
        let canonical = canonicalize_value(value);
        let hash = stable_hash_from_digest(hash_value(&canonical));

        Self { canonical, hash }
    }

    #[must_use]
    pub const fn hash(&self) -> StableHash {
        self.hash
    }

    // Force one hash so collision handling can be exercised deterministically.
    #[cfg(test)]
    pub(crate) fn with_hash(value: &Value, hash: StableHash) -> Self {
        Self {
            canonical: canonicalize_value(value),
            hash,
        }
    }
}

///
/// KeySlot
///
/// Result of resolving one key against a `KeyIndex`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeySlot {
    Existing(usize),
    Inserted(usize),
}

impl KeySlot {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Existing(index) | Self::Inserted(index) => index,
        }
    }
}

///
/// KeyIndex
///
/// KeyIndex maps canonical keys to dense slot indexes by stable-hash bucket
/// while preserving canonical-value equality checks inside each bucket.
/// Slot indexes are handed out in first-occurrence order.
///

#[derive(Clone, Debug, Default)]
pub struct KeyIndex {
    buckets: BTreeMap<StableHash, Vec<(GroupKey, usize)>>,
    len: usize,
}

impl KeyIndex {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the slot registered for one key, if any.
    #[must_use]
    pub fn find(&self, key: &GroupKey) -> Option<usize> {
        self.buckets
            .get(&key.hash())?
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, slot)| *slot)
    }

    /// Resolve one key, registering the next dense slot when it is new.
    pub fn resolve(&mut self, key: GroupKey) -> KeySlot {
        let next = self.len;
        let bucket = self.buckets.entry(key.hash()).or_default();
        if let Some((_, slot)) = bucket.iter().find(|(existing, _)| *existing == key) {
            return KeySlot::Existing(*slot);
        }

        bucket.push((key, next));
        self.len += 1;

        KeySlot::Inserted(next)
    }

    /// Canonicalize+resolve one raw value.
    pub fn resolve_value(&mut self, value: &Value) -> KeySlot {
        self.resolve(GroupKey::new(value))
    }
}

fn canonicalize_value(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(canonicalize_value).collect()),
        Value::Set(items) => {
            let mut items = items.iter().map(canonicalize_value).collect::<Vec<_>>();
            items.sort_by(canonical_cmp);
            Value::Set(items)
        }
        Value::Map(entries) => {
            let mut entries = entries
                .iter()
                .map(|(key, value)| (canonicalize_value(key), canonicalize_value(value)))
                .collect::<Vec<_>>();
            entries.sort_by(|(left_key, left_value), (right_key, right_value)| {
                canonical_cmp(left_key, right_key).then_with(|| canonical_cmp(left_value, right_value))
            });
            Value::Map(entries)
        }
        Value::Pair(first, second) => Value::pair(canonicalize_value(first), canonicalize_value(second)),
        _ => value.clone(),
    }
}
