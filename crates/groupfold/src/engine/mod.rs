//! Module: engine
//! Responsibility: group-by specification objects and the single-pass transform.
//! Does not own: per-expression accumulation rules or projection binding rules.
//! Boundary: builder entrypoints (`group_by`, `group_all`) and ordered output.

mod fold;
mod output;

#[cfg(test)]
mod tests;

use crate::{
    config::TransformConfig,
    error::{ConfigError, TransformError},
    expr::GroupExpr,
    group::Group,
    obs::{TransformKind, sink::TransformSpan},
    projection::Projection,
    row::{Column, RowSource, Tuple},
    value::Value,
};
use fold::{Bucket, Declaration};
use log::debug;
use std::convert::Infallible;

// re-exports
pub use output::GroupedMap;

/// Start a group-by declaration keyed by `key`.
#[must_use]
pub fn group_by(key: &Column) -> GroupBy {
    GroupBy {
        key: Some(key.clone()),
        config: TransformConfig::unbounded(),
    }
}

/// Start a group-by declaration with no key; every row lands in the single
/// implicit `Value::Null` bucket.
#[must_use]
pub const fn group_all() -> GroupBy {
    GroupBy {
        key: None,
        config: TransformConfig::unbounded(),
    }
}

///
/// GroupBy
///
/// Builder for group-by specifications. Each terminal method validates the
/// declaration and returns an immutable, reusable specification object.
///

#[derive(Clone, Debug)]
pub struct GroupBy {
    key: Option<Column>,
    config: TransformConfig,
}

impl GroupBy {
    /// Attach hard limits to every specification built from this builder.
    #[must_use]
    pub const fn with_config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Collect `exprs` per group into `Group` records.
    ///
    /// The key column leads the declaration as a `One` collector unless it
    /// is declared explicitly.
    pub fn aggregate<I>(self, exprs: I) -> Result<GroupByMap, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<GroupExpr>,
    {
        let exprs = exprs.into_iter().map(Into::into).collect();

        Ok(GroupByMap {
            declaration: Declaration::new(self.key, exprs, self.config, true)?,
        })
    }

    /// Collect one expression per group and emit its finished value directly.
    pub fn value(self, expr: impl Into<GroupExpr>) -> Result<GroupByValue, ConfigError> {
        Ok(GroupByValue {
            declaration: Declaration::new(self.key, vec![expr.into()], self.config, false)?,
        })
    }

    /// Collect what `projection` reads and bind every group into `T`.
    pub fn project<T>(self, projection: Projection<T>) -> Result<GroupByProjection<T>, ConfigError> {
        let exprs = projection.group_exprs();

        Ok(GroupByProjection {
            declaration: Declaration::new(self.key, exprs, self.config, true)?,
            projection,
        })
    }

    /// Collect `exprs` per group and hand each finished group to `hook`.
    ///
    /// The hook runs once per group, after that group's collectors finish.
    pub fn hook<I, F, T, E>(self, exprs: I, hook: F) -> Result<GroupByHook<F>, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<GroupExpr>,
        F: Fn(&Group) -> Result<T, E>,
        E: Into<TransformError>,
    {
        let exprs = exprs.into_iter().map(Into::into).collect();

        Ok(GroupByHook {
            declaration: Declaration::new(self.key, exprs, self.config, true)?,
            hook,
        })
    }
}

///
/// GroupByMap
///

#[derive(Clone, Debug)]
pub struct GroupByMap {
    declaration: Declaration,
}

impl GroupByMap {
    /// Declared expressions in declaration order, key column first.
    #[must_use]
    pub fn exprs(&self) -> &[GroupExpr] {
        self.declaration.exprs()
    }

    #[must_use]
    pub const fn config(&self) -> TransformConfig {
        self.declaration.config()
    }

    pub fn transform<R: RowSource>(&self, rows: R) -> Result<GroupedMap<Group>, TransformError> {
        run(&self.declaration, TransformKind::Groups, rows, Bucket::into_group)
    }

    pub fn transform_rows(
        &self,
        rows: impl IntoIterator<Item = Tuple>,
    ) -> Result<GroupedMap<Group>, TransformError> {
        self.transform(infallible(rows))
    }
}

///
/// GroupByValue
///

#[derive(Clone, Debug)]
pub struct GroupByValue {
    declaration: Declaration,
}

impl GroupByValue {
    pub fn transform<R: RowSource>(&self, rows: R) -> Result<GroupedMap<Value>, TransformError> {
        run(&self.declaration, TransformKind::Value, rows, Bucket::into_value)
    }

    pub fn transform_rows(
        &self,
        rows: impl IntoIterator<Item = Tuple>,
    ) -> Result<GroupedMap<Value>, TransformError> {
        self.transform(infallible(rows))
    }
}

///
/// GroupByProjection
///

#[derive(Clone)]
pub struct GroupByProjection<T> {
    declaration: Declaration,
    projection: Projection<T>,
}

impl<T> GroupByProjection<T> {
    /// Expressions derived from the projection, key column first.
    #[must_use]
    pub fn exprs(&self) -> &[GroupExpr] {
        self.declaration.exprs()
    }

    pub fn transform<R: RowSource>(&self, rows: R) -> Result<GroupedMap<T>, TransformError> {
        run(&self.declaration, TransformKind::Projection, rows, |bucket| {
            let group = bucket.into_group()?;
            Ok(self.projection.bind(&group)?)
        })
    }

    pub fn transform_rows(
        &self,
        rows: impl IntoIterator<Item = Tuple>,
    ) -> Result<GroupedMap<T>, TransformError> {
        self.transform(infallible(rows))
    }
}

///
/// GroupByHook
///

#[derive(Clone)]
pub struct GroupByHook<F> {
    declaration: Declaration,
    hook: F,
}

impl<F> GroupByHook<F> {
    pub fn transform<R, T, E>(&self, rows: R) -> Result<GroupedMap<T>, TransformError>
    where
        R: RowSource,
        F: Fn(&Group) -> Result<T, E>,
        E: Into<TransformError>,
    {
        run(&self.declaration, TransformKind::Hook, rows, |bucket| {
            let group = bucket.into_group()?;
            (self.hook)(&group).map_err(Into::into)
        })
    }

    pub fn transform_rows<T, E>(
        &self,
        rows: impl IntoIterator<Item = Tuple>,
    ) -> Result<GroupedMap<T>, TransformError>
    where
        F: Fn(&Group) -> Result<T, E>,
        E: Into<TransformError>,
    {
        self.transform::<_, T, E>(infallible(rows))
    }
}

// Shared transform driver: fold, finalize, and account one run.
fn run<'a, R, V>(
    declaration: &'a Declaration,
    kind: TransformKind,
    rows: R,
    finish: impl FnMut(Bucket<'a>) -> Result<V, TransformError>,
) -> Result<GroupedMap<V>, TransformError>
where
    R: RowSource,
{
    let mut span = TransformSpan::new(kind);
    let output = declaration.fold(rows, &mut span)?.finish(finish)?;

    debug!(
        "group-by transform finish: kind={}, rows={}, groups={}",
        kind.label(),
        span.rows(),
        output.len(),
    );
    span.finish(u64::try_from(output.len()).unwrap_or(u64::MAX));

    Ok(output)
}

fn infallible(
    rows: impl IntoIterator<Item = Tuple>,
) -> impl Iterator<Item = Result<Tuple, Infallible>> {
    rows.into_iter().map(Ok)
}
