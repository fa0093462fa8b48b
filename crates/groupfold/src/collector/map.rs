use crate::{
    collector::{Collect, Collector, sorted::SortedEntries},
    error::EvalError,
    expr::{Expression, GroupExpr, MapSide, Order},
    key::{KeyIndex, KeySlot},
    value::Value,
};

///
/// SlotHalf
///
/// Key or value half of one map slot. Plain halves hold a raw value; nested
/// halves own a child collector fed every sub-value routed to the slot.
///

enum SlotHalf<'a> {
    Plain(Value),
    Nested(Collector<'a>),
}

impl<'a> SlotHalf<'a> {
    fn start(side: &'a MapSide, value: Value) -> Result<Self, EvalError> {
        match side {
            MapSide::Column(_) => Ok(Self::Plain(value)),
            MapSide::Nested(expr) => {
                let mut collector = Collector::new(expr);
                collector.fold(value)?;
                Ok(Self::Nested(collector))
            }
        }
    }

    fn finish(self) -> Result<Value, EvalError> {
        match self {
            Self::Plain(value) => Ok(value),
            Self::Nested(collector) => collector.finish(),
        }
    }
}

///
/// MapSlot
///

struct MapSlot<'a> {
    key: SlotHalf<'a>,
    value: SlotHalf<'a>,
}

///
/// MapCollector
///
/// MapCollector decomposes each evaluated pair into (sub-key, sub-value) and
/// routes it to the slot of that sub-key, creating slots lazily in
/// first-occurrence order. Plain value halves are last-write-wins; nested
/// halves fold through their child collector.
///

pub(super) struct MapCollector<'a> {
    expr: &'a GroupExpr,
    key: &'a MapSide,
    value: &'a MapSide,
    order: Option<&'a Order>,
    index: KeyIndex,
    slots: Vec<MapSlot<'a>>,
}

impl<'a> MapCollector<'a> {
    pub(super) fn new(
        expr: &'a GroupExpr,
        key: &'a MapSide,
        value: &'a MapSide,
        order: Option<&'a Order>,
    ) -> Self {
        Self {
            expr,
            key,
            value,
            order,
            index: KeyIndex::default(),
            slots: Vec::new(),
        }
    }

    pub(super) fn fold(&mut self, value: Value) -> Result<(), EvalError> {
        let found = value.tag().label();
        let Some((raw_key, raw_value)) = value.into_pair() else {
            return Err(EvalError::ExpectedPair {
                expr: self.expr.expr_key().to_string(),
                found,
            });
        };

        match self.index.resolve_value(&raw_key) {
            KeySlot::Inserted(_) => {
                let key = SlotHalf::start(self.key, raw_key)?;
                let value = SlotHalf::start(self.value, raw_value)?;
                self.slots.push(MapSlot { key, value });
            }
            KeySlot::Existing(at) => {
                let slot = &mut self.slots[at];
                if let SlotHalf::Nested(collector) = &mut slot.key {
                    collector.fold(raw_key)?;
                }
                match &mut slot.value {
                    SlotHalf::Plain(current) => *current = raw_value,
                    SlotHalf::Nested(collector) => collector.fold(raw_value)?,
                }
            }
        }

        Ok(())
    }

    /// Finish every slot and merge the results into final map entries.
    ///
    /// Distinct raw keys may finish into equal keys; the later slot then
    /// replaces the earlier value.
    pub(super) fn finish(self) -> Result<Vec<(Value, Value)>, EvalError> {
        let mut entries = MapEntries::new(self.order);
        for slot in self.slots {
            let key = slot.key.finish()?;
            let value = slot.value.finish()?;
            entries.insert(key, value)?;
        }

        Ok(entries.into_entries())
    }
}

///
/// MapEntries
///

enum MapEntries<'a> {
    Linked {
        index: KeyIndex,
        entries: Vec<(Value, Value)>,
    },
    Sorted(SortedEntries<'a>),
}

impl<'a> MapEntries<'a> {
    fn new(order: Option<&'a Order>) -> Self {
        match order {
            Some(order) => Self::Sorted(SortedEntries::new(order)),
            None => Self::Linked {
                index: KeyIndex::default(),
                entries: Vec::new(),
            },
        }
    }

    fn insert(&mut self, key: Value, value: Value) -> Result<(), EvalError> {
        match self {
            Self::Linked { index, entries } => match index.resolve_value(&key) {
                KeySlot::Inserted(_) => entries.push((key, value)),
                KeySlot::Existing(at) => entries[at].1 = value,
            },
            Self::Sorted(sorted) => sorted.insert(key, value)?,
        }

        Ok(())
    }

    fn into_entries(self) -> Vec<(Value, Value)> {
        match self {
            Self::Linked { entries, .. } => entries,
            Self::Sorted(sorted) => sorted.into_entries(),
        }
    }
}
