use crate::{
    error::EvalError,
    value::{Value, strict_order_cmp},
};
use std::{cmp::Ordering, fmt, sync::Arc};

///
/// Comparator
///
/// Caller-supplied total ordering over values.
///

#[derive(Clone)]
pub struct Comparator(Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>);

impl Comparator {
    pub fn new(f: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

///
/// Order
///
/// Ordering policy of sorted collectors. `Natural` requires every value to
/// share one orderable variant; anything else fails at use, including the
/// first value a collector sees.
///

#[derive(Clone, Debug, Default)]
pub enum Order {
    #[default]
    Natural,
    Reverse,
    Custom(Comparator),
}

impl Order {
    /// Order with a caller-supplied comparator.
    pub fn by(f: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static) -> Self {
        Self::Custom(Comparator::new(f))
    }

    /// Compare two values under this policy.
    pub fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
        match self {
            Self::Natural => natural(left, right),
            Self::Reverse => natural(left, right).map(Ordering::reverse),
            Self::Custom(comparator) => Ok((comparator.0)(left, right)),
        }
    }

    /// Check that `value` has a place under this policy at all.
    pub(crate) fn admit(&self, value: &Value) -> Result<(), EvalError> {
        match self {
            Self::Natural | Self::Reverse => natural(value, value).map(|_| ()),
            Self::Custom(_) => Ok(()),
        }
    }
}

fn natural(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    strict_order_cmp(left, right).ok_or_else(|| EvalError::Unorderable {
        left: left.tag().label(),
        right: right.tag().label(),
    })
}
