use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification shared by every error surface in the crate.
/// Callers branch on the class; messages are diagnostic only.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    NotFound,
    TypeMismatch,
    Binding,
    Source,
    Evaluation,
    Limit,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::NotFound => "not_found",
            Self::TypeMismatch => "type_mismatch",
            Self::Binding => "binding",
            Self::Source => "source",
            Self::Evaluation => "evaluation",
            Self::Limit => "limit",
        };
        write!(f, "{label}")
    }
}

///
/// ConfigError
///
/// Malformed group-by declarations, detected while building a specification
/// object and before any row is read.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("column name must be non-empty (position {position:?})")]
    EmptyColumnName { position: Option<usize> },

    #[error("group expression declared more than once for target '{expr}'")]
    DuplicateExpression { expr: String },

    #[error("property binding for '{expr}' has no name; alias it before binding into a bean")]
    UnnamedBinding { expr: String },

    #[error("group key '{expr}' can only be collected as One, declared as {declared}")]
    KeyShapeMismatch {
        expr: String,
        declared: &'static str,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Configuration
    }
}

///
/// EvalError
///
/// Failures while evaluating expressions against one row or ordering
/// collected values.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("column '{column}' reads position {position} but the row has arity {arity}")]
    ColumnOutOfRange {
        column: String,
        position: usize,
        arity: usize,
    },

    #[error("natural ordering is undefined between {left} and {right} values")]
    Unorderable {
        left: &'static str,
        right: &'static str,
    },

    #[error("nested map expression for '{expr}' evaluated to a non-pair {found} value")]
    ExpectedPair { expr: String, found: &'static str },
}

impl EvalError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Unorderable { .. } => ErrorClass::Configuration,
            Self::ColumnOutOfRange { .. } | Self::ExpectedPair { .. } => ErrorClass::Evaluation,
        }
    }
}

///
/// GroupError
///
/// Accessor failures on a finished group record.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum GroupError {
    #[error("expression '{expr}' is not declared in this group")]
    NotFound { expr: String },

    #[error("expression '{expr}' is declared as {declared}, not {requested}")]
    TypeMismatch {
        expr: String,
        declared: &'static str,
        requested: &'static str,
    },

    #[error("value of '{expr}' cannot be read as {expected}")]
    ValueType {
        expr: String,
        expected: &'static str,
    },
}

impl GroupError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::TypeMismatch { .. } | Self::ValueType { .. } => ErrorClass::TypeMismatch,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

///
/// BindError
///
/// Projection binder failures while constructing a caller type from a group.
///

#[derive(Debug, ThisError)]
pub enum BindError {
    #[error("constructor expected {expected} arguments, projection supplies {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("target type has no property '{property}'")]
    MissingProperty { property: String },

    #[error("argument '{argument}' cannot be bound as {expected}")]
    ArgumentType {
        argument: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Group(#[from] GroupError),
}

impl BindError {
    /// Construct a standardized unknown-property error for `Bean` impls.
    pub fn missing_property(property: impl Into<String>) -> Self {
        Self::MissingProperty {
            property: property.into(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Group(err) => err.class(),
            _ => ErrorClass::Binding,
        }
    }
}

///
/// TransformError
///
/// Everything that can abort one transform. No partial result accompanies
/// any variant.
///

#[derive(Debug, ThisError)]
pub enum TransformError {
    #[error("row source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{0}")]
    Eval(#[from] EvalError),

    #[error("{0}")]
    Bind(#[from] BindError),

    #[error("{0}")]
    Group(#[from] GroupError),

    #[error("group limit exceeded: attempted={attempted}, limit={limit}")]
    GroupLimitExceeded { attempted: u64, limit: u64 },
}

impl TransformError {
    /// Wrap one upstream row-source failure.
    pub fn from_source(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Source(err.into())
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Source(_) => ErrorClass::Source,
            Self::Eval(err) => err.class(),
            Self::Bind(err) => err.class(),
            Self::Group(err) => err.class(),
            Self::GroupLimitExceeded { .. } => ErrorClass::Limit,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}
