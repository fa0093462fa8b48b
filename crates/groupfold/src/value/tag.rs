use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by hashing and ordering surfaces.
/// The discriminant doubles as the canonical cross-variant rank.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int = 3,
    Uint = 4,
    Float64 = 5,
    Text = 6,
    Blob = 7,
    List = 8,
    Set = 9,
    Map = 10,
    Pair = 11,
}

impl ValueTag {
    /// Stable hash byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Uint => "Uint",
            Self::Float64 => "Float64",
            Self::Text => "Text",
            Self::Blob => "Blob",
            Self::List => "List",
            Self::Set => "Set",
            Self::Map => "Map",
            Self::Pair => "Pair",
        }
    }
}

#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Blob(_) => ValueTag::Blob,
        Value::Bool(_) => ValueTag::Bool,
        Value::Float64(_) => ValueTag::Float64,
        Value::Int(_) => ValueTag::Int,
        Value::List(_) => ValueTag::List,
        Value::Map(_) => ValueTag::Map,
        Value::Null => ValueTag::Null,
        Value::Pair(_, _) => ValueTag::Pair,
        Value::Set(_) => ValueTag::Set,
        Value::Text(_) => ValueTag::Text,
        Value::Uint(_) => ValueTag::Uint,
    }
}
