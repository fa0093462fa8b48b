//! Module: group
//! Responsibility: finalized per-bucket records and their shape-checked accessors.
//! Does not own: accumulation (see `collector`) or bucket routing (see `engine`).
//! Boundary: immutable read surface handed to callers, hooks, and projection binders.


use crate::{
    error::GroupError,
    expr::{ExprKey, Expression, Shape},
    traits::FieldValue,
    value::Value,
};
use serde::{Serialize, Serializer, ser::SerializeStruct};
use std::{any::type_name, collections::BTreeMap};

///
/// GroupEntry
///
/// One finished accumulation, tagged with the identity and collector shape
/// it was declared with.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupEntry {
    key: ExprKey,
    shape: Shape,
    value: Value,
}

impl GroupEntry {
    #[must_use]
    pub(crate) const fn new(key: ExprKey, shape: Shape, value: Value) -> Self {
        Self { key, shape, value }
    }

    #[must_use]
    pub const fn key(&self) -> &ExprKey {
        &self.key
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

///
/// Group
///
/// Group is the read-only result of one bucket. Entries keep declaration
/// order; lookups go through the expression identity used at declaration.
///
/// Accessors never coerce between shapes: reading a `Set` column through
/// `get_list` is a type mismatch, not a conversion.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    key: Value,
    entries: Vec<GroupEntry>,
    index: BTreeMap<ExprKey, usize>,
}

impl Group {
    /// Assemble one group from entries finished in declaration order.
    #[must_use]
    pub(crate) fn new(key: Value, entries: Vec<GroupEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(at, entry)| (entry.key.clone(), at))
            .collect();

        Self {
            key,
            entries,
            index,
        }
    }

    /// Group key value; `Value::Null` for the implicit bucket.
    #[must_use]
    pub const fn key(&self) -> &Value {
        &self.key
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, expr: impl Expression) -> bool {
        self.index.contains_key(&expr.expr_key())
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupEntry> {
        self.entries.iter()
    }

    /// Positional view of every finished value in declaration order.
    #[must_use]
    pub fn to_array(&self) -> Vec<Value> {
        self.entries.iter().map(|entry| entry.value.clone()).collect()
    }

    ///
    /// DYNAMIC ACCESSORS
    ///

    /// Finished value of any declared expression, whatever its shape.
    pub fn get(&self, expr: impl Expression) -> Result<&Value, GroupError> {
        self.entry(&expr.expr_key()).map(GroupEntry::value)
    }

    pub fn get_one(&self, expr: impl Expression) -> Result<&Value, GroupError> {
        self.shaped(&expr.expr_key(), "One", |shape| shape == Shape::One)
    }

    pub fn get_list(&self, expr: impl Expression) -> Result<&[Value], GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "List", |shape| shape == Shape::List)?;

        elements(&key, value)
    }

    /// Distinct values of a `Set` or `SortedSet` declaration, in collector order.
    pub fn get_set(&self, expr: impl Expression) -> Result<&[Value], GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "Set", Shape::is_set)?;

        elements(&key, value)
    }

    pub fn get_sorted_set(&self, expr: impl Expression) -> Result<&[Value], GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "SortedSet", |shape| shape == Shape::SortedSet)?;

        elements(&key, value)
    }

    /// Entries of the map declared over `key` → `value`, in collector order.
    ///
    /// Either side may be a nested group expression; identity is the pair of
    /// both side identities.
    pub fn get_map(
        &self,
        key: impl Expression,
        value: impl Expression,
    ) -> Result<&[(Value, Value)], GroupError> {
        let expr = map_key(&key, &value);
        let found = self.shaped(&expr, "Map", Shape::is_map)?;

        entries(&expr, found)
    }

    pub fn get_sorted_map(
        &self,
        key: impl Expression,
        value: impl Expression,
    ) -> Result<&[(Value, Value)], GroupError> {
        let expr = map_key(&key, &value);
        let found = self.shaped(&expr, "SortedMap", |shape| shape == Shape::SortedMap)?;

        entries(&expr, found)
    }

    ///
    /// TYPED ACCESSORS
    ///

    pub fn one<T: FieldValue>(&self, expr: impl Expression) -> Result<T, GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "One", |shape| shape == Shape::One)?;

        decode(&key, value)
    }

    pub fn list<T: FieldValue>(&self, expr: impl Expression) -> Result<Vec<T>, GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "List", |shape| shape == Shape::List)?;

        decode(&key, value)
    }

    pub fn set<T: FieldValue>(&self, expr: impl Expression) -> Result<Vec<T>, GroupError> {
        let key = expr.expr_key();
        let value = self.shaped(&key, "Set", Shape::is_set)?;

        decode(&key, value)
    }

    pub fn map<K: FieldValue, V: FieldValue>(
        &self,
        key: impl Expression,
        value: impl Expression,
    ) -> Result<Vec<(K, V)>, GroupError> {
        let expr = map_key(&key, &value);
        let found = self.shaped(&expr, "Map", Shape::is_map)?;

        entries(&expr, found)?
            .iter()
            .map(|(k, v)| Ok((decode(&expr, k)?, decode(&expr, v)?)))
            .collect()
    }

    ///
    /// LOOKUP
    ///

    fn entry(&self, key: &ExprKey) -> Result<&GroupEntry, GroupError> {
        self.index
            .get(key)
            .map(|at| &self.entries[*at])
            .ok_or_else(|| GroupError::NotFound {
                expr: key.to_string(),
            })
    }

    fn shaped(
        &self,
        key: &ExprKey,
        requested: &'static str,
        accepts: impl Fn(Shape) -> bool,
    ) -> Result<&Value, GroupError> {
        let entry = self.entry(key)?;
        if !accepts(entry.shape) {
            return Err(GroupError::TypeMismatch {
                expr: key.to_string(),
                declared: entry.shape.label(),
                requested,
            });
        }

        Ok(&entry.value)
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a GroupEntry;
    type IntoIter = std::slice::Iter<'a, GroupEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Serialized as `{ key, values: { "<expr>": value, .. } }` in declaration order.
impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Group", 2)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("values", &Values(&self.entries))?;
        state.end()
    }
}

struct Values<'a>(&'a [GroupEntry]);

impl Serialize for Values<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|entry| (entry.key.to_string(), &entry.value)),
        )
    }
}

fn map_key(key: &impl Expression, value: &impl Expression) -> ExprKey {
    ExprKey::Pair(Box::new(key.expr_key()), Box::new(value.expr_key()))
}

fn elements<'a>(key: &ExprKey, value: &'a Value) -> Result<&'a [Value], GroupError> {
    value.as_elements().ok_or_else(|| GroupError::ValueType {
        expr: key.to_string(),
        expected: "sequence",
    })
}

fn entries<'a>(key: &ExprKey, value: &'a Value) -> Result<&'a [(Value, Value)], GroupError> {
    value.as_entries().ok_or_else(|| GroupError::ValueType {
        expr: key.to_string(),
        expected: "map",
    })
}

fn decode<T: FieldValue>(key: &ExprKey, value: &Value) -> Result<T, GroupError> {
    T::from_value(value).ok_or_else(|| GroupError::ValueType {
        expr: key.to_string(),
        expected: type_name::<T>(),
    })
}
