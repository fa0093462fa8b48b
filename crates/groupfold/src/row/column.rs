use crate::{error::EvalError, row::Tuple, value::Value};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

///
/// ColumnSource
///

#[derive(Clone)]
enum ColumnSource {
    Position(usize),
    Computed(Arc<dyn Fn(&Tuple) -> Value + Send + Sync>),
}

///
/// Column
///
/// Opaque column expression: a stable identity (its name) plus a row-value
/// extractor. Two columns with the same name are the same expression.
///

#[derive(Clone)]
pub struct Column {
    name: Arc<str>,
    source: ColumnSource,
}

impl Column {
    /// Build one column that reads a fixed tuple position.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, position: usize) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Position(position),
        }
    }

    /// Build one column whose value is derived from the whole tuple.
    #[must_use]
    pub fn computed(
        name: impl Into<Arc<str>>,
        f: impl Fn(&Tuple) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Computed(Arc::new(f)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self.source {
            ColumnSource::Position(position) => Some(position),
            ColumnSource::Computed(_) => None,
        }
    }

    /// Extract this column's value from one row.
    pub fn extract(&self, row: &Tuple) -> Result<Value, EvalError> {
        match &self.source {
            ColumnSource::Position(position) => {
                row.get(*position)
                    .cloned()
                    .ok_or_else(|| EvalError::ColumnOutOfRange {
                        column: self.name.to_string(),
                        position: *position,
                        arity: row.arity(),
                    })
            }
            ColumnSource::Computed(f) => Ok(f(row)),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            ColumnSource::Position(position) => write!(f, "Column({}@{position})", self.name),
            ColumnSource::Computed(_) => write!(f, "Column({}@computed)", self.name),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Eq for Column {}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
