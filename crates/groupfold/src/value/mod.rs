//! Module: value
//! Responsibility: dynamic row value model, canonical ordering, and hashing.
//! Does not own: group-key canonicalization or collector semantics.
//! Boundary: the single value representation flowing through rows, collectors, and groups.

mod compare;
mod float;
mod hash;
mod tag;


use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use compare::{canonical_cmp, strict_order_cmp};
pub use float::{Float64, Float64Error};
pub use hash::hash_value;
pub use tag::ValueTag;

///
/// Value
///
/// Null    → absent column value (SQL NULL); also the implicit group key.
/// Set     → distinct elements in collector order (insertion or comparator order).
/// Map     → entries in collector order; keys are unique.
/// Pair    → composite produced by evaluating a nested map expression on one row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float64(Float64),
    Int(i64),
    List(Vec<Self>),
    Map(Vec<(Self, Self)>),
    Null,
    Pair(Box<Self>, Box<Self>),
    Set(Vec<Self>),
    Text(String),
    Uint(u64),
}

impl Value {
    /// Build one composite pair value.
    #[must_use]
    pub fn pair(first: impl Into<Self>, second: impl Into<Self>) -> Self {
        Self::Pair(Box::new(first.into()), Box::new(second.into()))
    }

    /// Build one text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable variant tag used by hashing and diagnostics.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    /// Canonical cross-variant ordering rank.
    #[must_use]
    pub const fn canonical_rank(&self) -> u8 {
        self.tag().to_u8()
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Borrow list or set elements.
    #[must_use]
    pub fn as_elements(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_entries(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Map(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// Split one composite pair into its halves.
    #[must_use]
    pub fn into_pair(self) -> Option<(Self, Self)> {
        match self {
            Self::Pair(first, second) => Some((*first, *second)),
            _ => None,
        }
    }

    /// Look up one map entry by value equality.
    #[must_use]
    pub fn map_get(&self, key: &Self) -> Option<&Self> {
        self.as_entries()?
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(bytes) => write!(f, "blob({} bytes)", bytes.len()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => write_seq(f, "[", items, "]"),
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
            Self::Null => f.write_str("null"),
            Self::Pair(first, second) => write!(f, "({first}, {second})"),
            Self::Set(items) => write_seq(f, "#{", items, "}"),
            Self::Text(s) => f.write_str(s),
            Self::Uint(u) => write!(f, "{u}"),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

///
/// CONVERSIONS
///

macro_rules! impl_from_for_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    Float64 => Float64,
    String => Text,
    &str => Text,
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
