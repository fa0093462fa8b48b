use crate::{error::BindError, traits::FieldValue, value::Value};
use std::{any::Any, collections::VecDeque, fmt};

///
/// Payload
///

enum Payload {
    Value(Value),
    Object(Box<dyn Any + Send>),
}

///
/// Argument
///
/// One resolved binding: either the finished value of a group expression or
/// an object built by a nested projection against the same group.
///

pub struct Argument {
    name: String,
    payload: Payload,
}

impl Argument {
    pub(crate) const fn value(name: String, value: Value) -> Self {
        Self {
            name,
            payload: Payload::Value(value),
        }
    }

    pub(crate) fn object(name: String, object: Box<dyn Any + Send>) -> Self {
        Self {
            name,
            payload: Payload::Object(object),
        }
    }

    /// Binding name: the alias, else the column name, else the expression label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decode a value argument into `T`.
    pub fn into_value<T: FieldValue>(self) -> Result<T, BindError> {
        match &self.payload {
            Payload::Value(value) => T::from_value(value).ok_or_else(|| self.mismatch::<T>()),
            Payload::Object(_) => Err(self.mismatch::<T>()),
        }
    }

    /// Take the object built by a nested projection of target type `T`.
    pub fn into_object<T: 'static>(self) -> Result<T, BindError> {
        let Self { name, payload } = self;
        let expected = std::any::type_name::<T>();

        match payload {
            Payload::Object(object) => object
                .downcast::<T>()
                .map(|object| *object)
                .map_err(|_| BindError::ArgumentType {
                    argument: name,
                    expected,
                }),
            Payload::Value(_) => Err(BindError::ArgumentType {
                argument: name,
                expected,
            }),
        }
    }

    fn mismatch<T>(&self) -> BindError {
        BindError::ArgumentType {
            argument: self.name.clone(),
            expected: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Value(value) => write!(f, "Argument({}={value:?})", self.name),
            Payload::Object(_) => write!(f, "Argument({}=<object>)", self.name),
        }
    }
}

///
/// Arguments
///
/// Ordered constructor arguments in binding declaration order. Constructors
/// pull them front to back; pulling past the end, or leaving some unread,
/// is an arity mismatch.
///

#[derive(Debug)]
pub struct Arguments {
    pending: VecDeque<Argument>,
    supplied: usize,
}

impl Arguments {
    pub(crate) fn new(arguments: Vec<Argument>) -> Self {
        Self {
            supplied: arguments.len(),
            pending: arguments.into(),
        }
    }

    /// Pull the next raw argument.
    pub fn next_argument(&mut self) -> Result<Argument, BindError> {
        let consumed = self.supplied - self.pending.len();

        self.pending
            .pop_front()
            .ok_or(BindError::ArityMismatch {
                expected: consumed + 1,
                found: self.supplied,
            })
    }

    /// Pull and decode the next value argument.
    pub fn next_value<T: FieldValue>(&mut self) -> Result<T, BindError> {
        self.next_argument()?.into_value()
    }

    /// Pull the next nested-projection object.
    pub fn next_object<T: 'static>(&mut self) -> Result<T, BindError> {
        self.next_argument()?.into_object()
    }

    /// Fail when the constructor left arguments unread.
    pub(crate) fn finish(self) -> Result<(), BindError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        Err(BindError::ArityMismatch {
            expected: self.supplied - self.pending.len(),
            found: self.supplied,
        })
    }
}
