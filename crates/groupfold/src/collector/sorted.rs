use crate::{error::EvalError, expr::Order, value::Value};
use std::cmp::Ordering;

/// Binary search under a fallible comparator.
///
/// `Ok(Ok(i))` is a comparator-equal hit at `i`, `Ok(Err(i))` the insertion
/// point that keeps `items` ordered. The first value is admitted against
/// itself.
pub(super) fn search_by<T>(
    items: &[T],
    probe: &Value,
    key: impl Fn(&T) -> &Value,
    order: &Order,
) -> Result<Result<usize, usize>, EvalError> {
    if items.is_empty() {
        order.admit(probe)?;
        return Ok(Err(0));
    }

    let mut low = 0;
    let mut high = items.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match order.compare(key(&items[mid]), probe)? {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Ok(Ok(mid)),
        }
    }

    Ok(Err(low))
}

const fn value_key(value: &Value) -> &Value {
    value
}

const fn entry_key(entry: &(Value, Value)) -> &Value {
    &entry.0
}

///
/// SortedValues
///
/// Distinct values kept ordered by one ordering policy. Comparator-equal
/// values are duplicates; the first one stays.
///

pub(super) struct SortedValues<'a> {
    order: &'a Order,
    values: Vec<Value>,
}

impl<'a> SortedValues<'a> {
    pub(super) const fn new(order: &'a Order) -> Self {
        Self {
            order,
            values: Vec::new(),
        }
    }

    pub(super) fn insert(&mut self, value: Value) -> Result<(), EvalError> {
        if let Err(at) = search_by(&self.values, &value, value_key, self.order)? {
            self.values.insert(at, value);
        }

        Ok(())
    }

    pub(super) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

///
/// SortedEntries
///
/// Map entries kept ordered by key. A comparator-equal key replaces the
/// stored value and keeps the stored key.
///

pub(super) struct SortedEntries<'a> {
    order: &'a Order,
    entries: Vec<(Value, Value)>,
}

impl<'a> SortedEntries<'a> {
    pub(super) const fn new(order: &'a Order) -> Self {
        Self {
            order,
            entries: Vec::new(),
        }
    }

    pub(super) fn insert(&mut self, key: Value, value: Value) -> Result<(), EvalError> {
        match search_by(&self.entries, &key, entry_key, self.order)? {
            Ok(at) => self.entries[at].1 = value,
            Err(at) => self.entries.insert(at, (key, value)),
        }

        Ok(())
    }

    pub(super) fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}
