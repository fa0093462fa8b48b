use crate::{
    key::{KeyIndex, KeySlot},
    value::Value,
};

///
/// DistinctValues
///
/// Distinct values in first-occurrence order; duplicates are dropped by
/// canonical value equality.
///

#[derive(Debug, Default)]
pub(super) struct DistinctValues {
    index: KeyIndex,
    values: Vec<Value>,
}

impl DistinctValues {
    pub(super) fn insert(&mut self, value: Value) {
        if let KeySlot::Inserted(_) = self.index.resolve_value(&value) {
            self.values.push(value);
        }
    }

    pub(super) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
