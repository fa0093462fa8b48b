//! Module: row
//! Responsibility: tuple representation, column extractors, and row sources.
//! Does not own: grouping, collection, or key canonicalization.
//! Boundary: the input contract consumed by the aggregation engine.

mod column;
mod source;


use crate::value::Value;
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};

// re-exports
pub use column::Column;
pub use source::RowSource;

///
/// Tuple
///
/// One fixed-arity row of column values, addressed positionally or through
/// a `Column`.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, IntoIterator, PartialEq, Serialize)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Borrow the value at one position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl<const N: usize> From<[Value; N]> for Tuple {
    fn from(values: [Value; N]) -> Self {
        Self(values.into())
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build one tuple from heterogeneous literal values.
#[macro_export]
macro_rules! tuple {
    () => {
        $crate::row::Tuple::default()
    };
    ( $( $value:expr ),+ $(,)? ) => {
        $crate::row::Tuple::new(vec![ $( $crate::value::Value::from($value) ),+ ])
    };
}
