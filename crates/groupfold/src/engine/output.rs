use crate::{
    key::{GroupKey, KeyIndex},
    value::Value,
};
use serde::{Serialize, Serializer};

///
/// GroupedMap
///
/// Ordered transform output: one entry per distinct group key, in
/// first-occurrence order of the key in the input. Lookups use the same
/// canonical key equality as bucketing.
///

#[derive(Clone, Debug)]
pub struct GroupedMap<V> {
    index: KeyIndex,
    entries: Vec<(Value, V)>,
}

impl<V> GroupedMap<V> {
    /// Assemble output from entries already in bucket-creation order.
    pub(crate) const fn from_parts(index: KeyIndex, entries: Vec<(Value, V)>) -> Self {
        Self { index, entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result for one key value.
    #[must_use]
    pub fn get(&self, key: impl Into<Value>) -> Option<&V> {
        let key = GroupKey::new(&key.into());
        self.index.find(&key).map(|at| &self.entries[at].1)
    }

    /// Result of the implicit null-key bucket.
    #[must_use]
    pub fn get_null(&self) -> Option<&V> {
        self.get(Value::Null)
    }

    #[must_use]
    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &V)> {
        self.entries.iter().map(entry_refs)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<V> {
        self.entries.into_iter().map(|(_, value)| value).collect()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<(Value, V)> {
        self.entries
    }
}

impl<V> IntoIterator for GroupedMap<V> {
    type Item = (Value, V);
    type IntoIter = std::vec::IntoIter<(Value, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

type EntryRefs<'a, V> = fn(&'a (Value, V)) -> (&'a Value, &'a V);

impl<'a, V> IntoIterator for &'a GroupedMap<V> {
    type Item = (&'a Value, &'a V);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (Value, V)>, EntryRefs<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(entry_refs as EntryRefs<'a, V>)
    }
}

const fn entry_refs<V>(entry: &(Value, V)) -> (&Value, &V) {
    (&entry.0, &entry.1)
}

// Serialized as an ordered sequence of `[key, value]` pairs.
impl<V: Serialize> Serialize for GroupedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
