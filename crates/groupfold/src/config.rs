use crate::error::TransformError;

///
/// TransformConfig
///
/// TransformConfig defines hard limits for one group-by specification.
/// Limits stay policy-owned at the specification boundary instead of inside
/// collector state, so every transform of one specification obeys the same
/// budget.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransformConfig {
    max_groups: Option<u64>,
}

impl TransformConfig {
    /// Build one configuration with no group limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_groups: None }
    }

    /// Cap the number of distinct groups one transform may create.
    #[must_use]
    pub const fn with_max_groups(mut self, max_groups: u64) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    #[must_use]
    pub const fn max_groups(&self) -> Option<u64> {
        self.max_groups
    }

    /// Admit one new group given the number already created.
    pub(crate) fn admit_group(&self, created: usize) -> Result<(), TransformError> {
        let Some(limit) = self.max_groups else {
            return Ok(());
        };

        let attempted = u64::try_from(created).unwrap_or(u64::MAX).saturating_add(1);
        if attempted > limit {
            return Err(TransformError::GroupLimitExceeded { attempted, limit });
        }

        Ok(())
    }
}

///
/// TESTS
///
