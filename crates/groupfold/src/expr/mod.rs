//! Module: expr
//! Responsibility: group expression declarations, their identity, and ordering policies.
//! Does not own: accumulation state (see `collector`) or group record access.
//! Boundary: immutable descriptors built by factory functions and consumed by the engine.

mod order;


use crate::{
    error::EvalError,
    row::{Column, Tuple},
    value::Value,
};
use std::{fmt, sync::Arc};

// re-exports
pub use order::{Comparator, Order};

///
/// ExprKey
///
/// Identity token of one declared expression. Plain collectors are keyed by
/// their column; map collectors by the pair of their key/value identities.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ExprKey {
    Column(Arc<str>),
    Pair(Box<Self>, Box<Self>),
}

impl fmt::Display for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Pair(key, value) => write!(f, "({key}, {value})"),
        }
    }
}

///
/// Expression
///
/// Anything that can name a declared group expression at access time.
///

pub trait Expression {
    fn expr_key(&self) -> ExprKey;
}

impl Expression for Column {
    fn expr_key(&self) -> ExprKey {
        ExprKey::Column(self.name_arc())
    }
}

impl Expression for GroupExpr {
    fn expr_key(&self) -> ExprKey {
        match self {
            Self::One(column)
            | Self::List(column)
            | Self::Set(column)
            | Self::SortedSet { column, .. } => column.expr_key(),
            Self::Map { key, value, .. } => {
                ExprKey::Pair(Box::new(key.expr_key()), Box::new(value.expr_key()))
            }
        }
    }
}

impl Expression for MapSide {
    fn expr_key(&self) -> ExprKey {
        match self {
            Self::Column(column) => column.expr_key(),
            Self::Nested(expr) => expr.expr_key(),
        }
    }
}

impl<T: Expression + ?Sized> Expression for &T {
    fn expr_key(&self) -> ExprKey {
        (**self).expr_key()
    }
}

///
/// Shape
///
/// Collector shape of one declared expression; accessors check it before
/// handing out a value.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    One,
    List,
    Set,
    SortedSet,
    Map,
    SortedMap,
}

impl Shape {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "One",
            Self::List => "List",
            Self::Set => "Set",
            Self::SortedSet => "SortedSet",
            Self::Map => "Map",
            Self::SortedMap => "SortedMap",
        }
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set | Self::SortedSet)
    }

    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::SortedMap)
    }
}

///
/// MapSide
///
/// Key or value half of a map expression: either a plain column or another
/// group expression collected per distinct sub-key.
///

#[derive(Clone, Debug)]
pub enum MapSide {
    Column(Column),
    Nested(Box<GroupExpr>),
}

impl MapSide {
    /// Evaluate this side against one row.
    pub fn evaluate(&self, row: &Tuple) -> Result<Value, EvalError> {
        match self {
            Self::Column(column) => column.extract(row),
            Self::Nested(expr) => expr.evaluate(row),
        }
    }
}

impl From<Column> for MapSide {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<&Column> for MapSide {
    fn from(column: &Column) -> Self {
        Self::Column(column.clone())
    }
}

impl From<GroupExpr> for MapSide {
    fn from(expr: GroupExpr) -> Self {
        Self::Nested(Box::new(expr))
    }
}

///
/// GroupExpr
///
/// Declares how one output column of a group is accumulated.
///

#[derive(Clone, Debug)]
pub enum GroupExpr {
    /// First value seen in the group; later differing values are ignored.
    One(Column),
    /// Every value in row order, duplicates retained.
    List(Column),
    /// Distinct values in first-occurrence order.
    Set(Column),
    /// Distinct values ordered by `order`.
    SortedSet { column: Column, order: Order },
    /// Per-row key → value mapping; `order` sorts keys when present.
    Map {
        key: MapSide,
        value: MapSide,
        order: Option<Order>,
    },
}

impl GroupExpr {
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::One(_) => Shape::One,
            Self::List(_) => Shape::List,
            Self::Set(_) => Shape::Set,
            Self::SortedSet { .. } => Shape::SortedSet,
            Self::Map { order: None, .. } => Shape::Map,
            Self::Map { order: Some(_), .. } => Shape::SortedMap,
        }
    }

    /// Evaluate this expression against one row.
    ///
    /// Map expressions yield a `Value::Pair` of their key and value halves,
    /// recursively for nested halves.
    pub fn evaluate(&self, row: &Tuple) -> Result<Value, EvalError> {
        match self {
            Self::One(column)
            | Self::List(column)
            | Self::Set(column)
            | Self::SortedSet { column, .. } => column.extract(row),
            Self::Map { key, value, .. } => {
                Ok(Value::pair(key.evaluate(row)?, value.evaluate(row)?))
            }
        }
    }

    /// Visit every column referenced by this expression, depth first.
    pub fn for_each_column(&self, f: &mut impl FnMut(&Column)) {
        match self {
            Self::One(column)
            | Self::List(column)
            | Self::Set(column)
            | Self::SortedSet { column, .. } => f(column),
            Self::Map { key, value, .. } => {
                for side in [key, value] {
                    match side {
                        MapSide::Column(column) => f(column),
                        MapSide::Nested(expr) => expr.for_each_column(f),
                    }
                }
            }
        }
    }
}

impl From<Column> for GroupExpr {
    fn from(column: Column) -> Self {
        Self::One(column)
    }
}

impl From<&Column> for GroupExpr {
    fn from(column: &Column) -> Self {
        Self::One(column.clone())
    }
}

///
/// FACTORIES
///

/// Capture the first value of `column` in each group.
#[must_use]
pub fn one(column: &Column) -> GroupExpr {
    GroupExpr::One(column.clone())
}

/// Collect every value of `column` in row order.
#[must_use]
pub fn list(column: &Column) -> GroupExpr {
    GroupExpr::List(column.clone())
}

/// Collect distinct values of `column` in first-occurrence order.
#[must_use]
pub fn set(column: &Column) -> GroupExpr {
    GroupExpr::Set(column.clone())
}

/// Collect distinct values of `column` in natural order.
#[must_use]
pub fn sorted_set(column: &Column) -> GroupExpr {
    sorted_set_by(column, Order::Natural)
}

/// Collect distinct values of `column` ordered by `order`.
#[must_use]
pub fn sorted_set_by(column: &Column, order: Order) -> GroupExpr {
    GroupExpr::SortedSet {
        column: column.clone(),
        order,
    }
}

/// Collect a key → value mapping, keys in first-occurrence order.
#[must_use]
pub fn map(key: impl Into<MapSide>, value: impl Into<MapSide>) -> GroupExpr {
    GroupExpr::Map {
        key: key.into(),
        value: value.into(),
        order: None,
    }
}

/// Collect a key → value mapping, keys in natural order.
#[must_use]
pub fn sorted_map(key: impl Into<MapSide>, value: impl Into<MapSide>) -> GroupExpr {
    sorted_map_by(key, value, Order::Natural)
}

/// Collect a key → value mapping, keys ordered by `order`.
#[must_use]
pub fn sorted_map_by(key: impl Into<MapSide>, value: impl Into<MapSide>, order: Order) -> GroupExpr {
    GroupExpr::Map {
        key: key.into(),
        value: value.into(),
        order: Some(order),
    }
}
