use crate::{
    collector::{Collect, Collector},
    config::TransformConfig,
    engine::GroupedMap,
    error::{ConfigError, TransformError},
    expr::{Expression, GroupExpr, Shape},
    group::{Group, GroupEntry},
    key::{GroupKey, KeyIndex},
    obs::sink::TransformSpan,
    row::{Column, RowSource},
    value::Value,
};
use log::{debug, trace};
use std::collections::BTreeSet;

///
/// Declaration
///
/// Validated, immutable group-by declaration shared by every specification
/// object: optional key column, group expressions in declaration order, and
/// the hard limits every transform obeys.
///

#[derive(Clone, Debug)]
pub(crate) struct Declaration {
    key: Option<Column>,
    exprs: Vec<GroupExpr>,
    config: TransformConfig,
}

impl Declaration {
    /// Validate `exprs` and, when `with_key` is set, lead them with the key
    /// column as `One`, moving an explicit `One(key)` to the front.
    pub(crate) fn new(
        key: Option<Column>,
        exprs: Vec<GroupExpr>,
        config: TransformConfig,
        with_key: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(column) = &key {
            validate_column(column)?;
        }

        let mut seen = BTreeSet::new();
        for expr in &exprs {
            validate_expr(expr)?;
            let expr_key = expr.expr_key();
            if !seen.insert(expr_key.clone()) {
                return Err(ConfigError::DuplicateExpression {
                    expr: expr_key.to_string(),
                });
            }
        }

        let mut exprs = exprs;
        if with_key && let Some(column) = &key {
            lead_with_key(&mut exprs, column)?;
        }

        Ok(Self { key, exprs, config })
    }

    #[must_use]
    pub(crate) fn exprs(&self) -> &[GroupExpr] {
        &self.exprs
    }

    #[must_use]
    pub(crate) const fn config(&self) -> TransformConfig {
        self.config
    }

    /// Single forward pass: route every row to the bucket of its key and
    /// feed it to each of that bucket's collectors.
    ///
    /// Any failure aborts the pass; no bucket escapes.
    pub(crate) fn fold<R: RowSource>(
        &self,
        mut rows: R,
        span: &mut TransformSpan,
    ) -> Result<Buckets<'_>, TransformError> {
        debug!(
            "group-by transform start: kind={}, key={}, exprs={}",
            span.kind().label(),
            self.key.as_ref().map_or("<all>", Column::name),
            self.exprs.len(),
        );

        let mut index = KeyIndex::default();
        let mut buckets = Vec::new();

        while let Some(row) = rows.next_row() {
            let row = row.map_err(TransformError::from_source)?;
            span.add_row();

            let key = match &self.key {
                Some(column) => column.extract(&row)?,
                None => Value::Null,
            };

            let group_key = GroupKey::new(&key);
            let at = if let Some(at) = index.find(&group_key) {
                at
            } else {
                self.config.admit_group(buckets.len())?;
                let at = index.resolve(group_key).index();
                trace!("group-by bucket created: slot={at}, key={key}");
                span.bucket_created();
                buckets.push(Bucket::new(key, &self.exprs));
                at
            };

            for collector in &mut buckets[at].collectors {
                collector.accept(&row)?;
            }
        }

        Ok(Buckets { index, buckets })
    }
}

///
/// Bucket
///
/// In-progress accumulation state for one group key.
///

pub(crate) struct Bucket<'a> {
    key: Value,
    collectors: Vec<Collector<'a>>,
}

impl<'a> Bucket<'a> {
    fn new(key: Value, exprs: &'a [GroupExpr]) -> Self {
        Self {
            key,
            collectors: exprs.iter().map(Collector::new).collect(),
        }
    }

    /// Finish every collector in declaration order into one group.
    pub(crate) fn into_group(self) -> Result<Group, TransformError> {
        let entries = self
            .collectors
            .into_iter()
            .map(|collector| -> Result<GroupEntry, TransformError> {
                let expr = collector.expr();
                let (key, shape) = (expr.expr_key(), expr.shape());

                Ok(GroupEntry::new(key, shape, collector.finish()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Group::new(self.key, entries))
    }

    /// Finish the leading collector; value declarations hold exactly one.
    pub(crate) fn into_value(self) -> Result<Value, TransformError> {
        let value = match self.collectors.into_iter().next() {
            Some(collector) => collector.finish()?,
            None => Value::Null,
        };

        Ok(value)
    }
}

///
/// Buckets
///
/// Every bucket of one finished pass, in creation order, plus the key index
/// that located them.
///

pub(crate) struct Buckets<'a> {
    index: KeyIndex,
    buckets: Vec<Bucket<'a>>,
}

impl<'a> Buckets<'a> {
    /// Finalize every bucket in creation order into ordered output.
    pub(crate) fn finish<V>(
        self,
        mut finish: impl FnMut(Bucket<'a>) -> Result<V, TransformError>,
    ) -> Result<GroupedMap<V>, TransformError> {
        let mut entries = Vec::with_capacity(self.buckets.len());
        for bucket in self.buckets {
            let key = bucket.key.clone();
            entries.push((key, finish(bucket)?));
        }

        Ok(GroupedMap::from_parts(self.index, entries))
    }
}

// The positional view of every group starts with its key.
fn lead_with_key(exprs: &mut Vec<GroupExpr>, key: &Column) -> Result<(), ConfigError> {
    let key_id = key.expr_key();
    let Some(at) = exprs.iter().position(|expr| expr.expr_key() == key_id) else {
        exprs.insert(0, GroupExpr::One(key.clone()));
        return Ok(());
    };

    let shape = exprs[at].shape();
    if shape != Shape::One {
        return Err(ConfigError::KeyShapeMismatch {
            expr: key_id.to_string(),
            declared: shape.label(),
        });
    }

    let declared = exprs.remove(at);
    exprs.insert(0, declared);

    Ok(())
}

fn validate_column(column: &Column) -> Result<(), ConfigError> {
    if column.name().is_empty() {
        return Err(ConfigError::EmptyColumnName {
            position: column.position(),
        });
    }

    Ok(())
}

fn validate_expr(expr: &GroupExpr) -> Result<(), ConfigError> {
    let mut result = Ok(());
    expr.for_each_column(&mut |column| {
        if result.is_ok() {
            result = validate_column(column);
        }
    });

    result
}
