//! Module: collector
//! Responsibility: per-expression accumulation state machines.
//! Does not own: bucket routing or group record assembly.
//! Boundary: one collector per declared expression per bucket, fed row by row.

mod distinct;
mod map;
mod sorted;

#[cfg(test)]
mod tests;

use crate::{
    error::EvalError,
    expr::GroupExpr,
    row::Tuple,
    value::Value,
};
use distinct::DistinctValues;
use map::MapCollector;
use sorted::SortedValues;

///
/// Collect
///
/// Canonical accumulation contract. `accept` folds one row while the
/// collector is accumulating; `finish` consumes the collector, so no row can
/// reach it once its value has been produced.
///

pub trait Collect {
    /// Evaluate this collector's expression on one row and fold the result.
    fn accept(&mut self, row: &Tuple) -> Result<(), EvalError>;

    /// Produce the immutable aggregated value.
    fn finish(self) -> Result<Value, EvalError>;
}

///
/// CollectorState
///

enum CollectorState<'a> {
    One(Option<Value>),
    List(Vec<Value>),
    Set(DistinctValues),
    SortedSet(SortedValues<'a>),
    Map(Box<MapCollector<'a>>),
}

///
/// Collector
///
/// Collector binds one declared expression to its accumulation state.
/// Nested map halves own child collectors of the same type, so every nesting
/// level shares one update pipeline.
///

pub struct Collector<'a> {
    expr: &'a GroupExpr,
    state: CollectorState<'a>,
}

impl<'a> Collector<'a> {
    /// Build one empty collector for a declared expression.
    #[must_use]
    pub fn new(expr: &'a GroupExpr) -> Self {
        let state = match expr {
            GroupExpr::One(_) => CollectorState::One(None),
            GroupExpr::List(_) => CollectorState::List(Vec::new()),
            GroupExpr::Set(_) => CollectorState::Set(DistinctValues::default()),
            GroupExpr::SortedSet { order, .. } => CollectorState::SortedSet(SortedValues::new(order)),
            GroupExpr::Map { key, value, order } => CollectorState::Map(Box::new(
                MapCollector::new(expr, key, value, order.as_ref()),
            )),
        };

        Self { expr, state }
    }

    #[must_use]
    pub const fn expr(&self) -> &'a GroupExpr {
        self.expr
    }

    /// Fold one already-evaluated value into this collector.
    pub(crate) fn fold(&mut self, value: Value) -> Result<(), EvalError> {
        match &mut self.state {
            CollectorState::One(first) => {
                if first.is_none() {
                    *first = Some(value);
                }
            }
            CollectorState::List(items) => items.push(value),
            CollectorState::Set(values) => values.insert(value),
            CollectorState::SortedSet(values) => values.insert(value)?,
            CollectorState::Map(map) => map.fold(value)?,
        }

        Ok(())
    }
}

impl Collect for Collector<'_> {
    fn accept(&mut self, row: &Tuple) -> Result<(), EvalError> {
        let value = self.expr.evaluate(row)?;
        self.fold(value)
    }

    fn finish(self) -> Result<Value, EvalError> {
        let value = match self.state {
            CollectorState::One(first) => first.unwrap_or(Value::Null),
            CollectorState::List(items) => Value::List(items),
            CollectorState::Set(values) => Value::Set(values.into_values()),
            CollectorState::SortedSet(values) => Value::Set(values.into_values()),
            CollectorState::Map(map) => Value::Map(map.finish()?),
        };

        Ok(value)
    }
}
