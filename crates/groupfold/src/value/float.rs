use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};
use thiserror::Error as ThisError;

///
/// Float64
///
/// Float column value usable as a group key, set element, or map key.
/// NaN and infinities never enter the value model and zero has a single
/// representation, so bit equality, hashing, and `total_cmp` agree.
///

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Serialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Float64(f64);

impl Float64 {
    /// Admit one finite float; `None` for NaN or an infinity.
    #[must_use]
    pub fn try_new(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }

        // -0.0 folds into 0.0
        Some(Self(raw + 0.0))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Raw IEEE-754 bits; unique per admitted value.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0.to_bits()
    }
}

///
/// Float64Error
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum Float64Error {
    #[error("float column value must be finite")]
    NonFinite,
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Float64 {}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.to_bits());
    }
}

impl TryFrom<f64> for Float64 {
    type Error = Float64Error;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        Self::try_new(raw).ok_or(Float64Error::NonFinite)
    }
}

impl From<Float64> for f64 {
    fn from(value: Float64) -> Self {
        value.0
    }
}
