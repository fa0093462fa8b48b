use crate::{
    config::TransformConfig,
    engine::{group_all, group_by},
    error::{ConfigError, ErrorClass, EvalError, GroupError, TransformError},
    expr::{Expression, list, map, one, set},
    group::Group,
    obs::{TransformKind, event_report, event_reset_all},
    row::{Column, Tuple},
    tuple,
    value::Value,
};
use std::{cell::Cell, fmt};

fn columns() -> (Column, Column, Column) {
    (
        Column::new("post", 0),
        Column::new("id", 1),
        Column::new("text", 2),
    )
}

fn rows() -> Vec<Tuple> {
    vec![
        tuple![1_i64, 1_i64, "a"],
        tuple![2_i64, 2_i64, "b"],
        tuple![1_i64, 3_i64, "c"],
        tuple![Value::Null, 4_i64, "d"],
    ]
}

#[derive(Debug)]
struct CursorClosed;

impl fmt::Display for CursorClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cursor closed")
    }
}

impl std::error::Error for CursorClosed {}

#[test]
fn aggregate_leads_declaration_with_key_column() {
    let (post, id, _) = columns();

    let grouping = group_by(&post).aggregate([list(&id)]).expect("declaration");
    let keys = grouping
        .exprs()
        .iter()
        .map(|expr| expr.expr_key().to_string())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["post", "id"]);

    let grouping = group_by(&post)
        .aggregate([list(&id), one(&post)])
        .expect("declaration");
    let keys = grouping
        .exprs()
        .iter()
        .map(|expr| expr.expr_key().to_string())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["post", "id"], "explicit key moves to the front");

    let err = group_by(&post)
        .aggregate([list(&id), set(&post)])
        .expect_err("key collected as a set");
    assert_eq!(
        err,
        ConfigError::KeyShapeMismatch {
            expr: "post".to_string(),
            declared: "Set",
        }
    );
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn duplicate_targets_and_empty_names_fail_before_any_row() {
    let (post, id, text) = columns();

    let err = group_by(&post)
        .aggregate([list(&id), set(&id)])
        .expect_err("same target twice");
    assert_eq!(
        err,
        ConfigError::DuplicateExpression {
            expr: "id".to_string(),
        }
    );

    let blank = Column::new("", 5);
    let err = group_by(&post)
        .aggregate([map(&id, list(&blank)), one(&text)])
        .expect_err("blank nested column");
    assert_eq!(err, ConfigError::EmptyColumnName { position: Some(5) });
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn buckets_follow_first_occurrence_order_including_null_key() {
    let (post, id, _) = columns();

    let result = group_by(&post)
        .aggregate([list(&id)])
        .expect("declaration")
        .transform_rows(rows())
        .expect("transform");

    let keys = result.keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys, vec![Value::Int(1), Value::Int(2), Value::Null]);

    let first = result.get(1_i64).expect("post 1");
    assert_eq!(
        first.get_list(&id),
        Ok([Value::Int(1), Value::Int(3)].as_slice())
    );
    assert_eq!(
        result.get_null().map(|group| group.get_list(&id).map(<[Value]>::len)),
        Some(Ok(1))
    );
}

#[test]
fn group_all_collects_every_row_into_the_null_bucket() {
    let (_, id, _) = columns();

    let result = group_all()
        .aggregate([set(&id)])
        .expect("declaration")
        .transform_rows(rows())
        .expect("transform");

    assert_eq!(result.len(), 1);
    let group = result.get_null().expect("implicit bucket");
    assert_eq!(group.key(), &Value::Null);
    assert_eq!(group.len(), 1, "no key column is prepended");
    assert_eq!(group.set::<i64>(&id), Ok(vec![1, 2, 3, 4]));
}

#[test]
fn value_transform_emits_finished_values_per_key() {
    let (post, id, text) = columns();

    let result = group_by(&post)
        .value(map(&id, &text))
        .expect("declaration")
        .transform_rows(rows())
        .expect("transform");

    assert_eq!(
        result.get(1_i64),
        Some(&Value::Map(vec![
            (Value::Int(1), Value::text("a")),
            (Value::Int(3), Value::text("c")),
        ]))
    );
}

#[test]
fn hook_runs_once_per_finished_group() {
    let (post, id, _) = columns();
    let calls = Cell::new(0_usize);

    let result = group_by(&post)
        .hook([list(&id)], |group: &Group| -> Result<usize, GroupError> {
            calls.set(calls.get() + 1);
            Ok(group.get_list(&id)?.len())
        })
        .expect("declaration")
        .transform_rows(rows())
        .expect("transform");

    assert_eq!(calls.get(), 3);
    assert_eq!(result.into_values(), vec![2, 1, 1]);
}

#[test]
fn hook_errors_abort_the_transform() {
    let (post, id, text) = columns();

    let err = group_by(&post)
        .hook([list(&id)], |group: &Group| group.get_list(&text).map(<[Value]>::len))
        .expect("declaration")
        .transform_rows(rows())
        .expect_err("text is not declared");

    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn source_failure_returns_no_partial_result() {
    let (post, id, _) = columns();
    event_reset_all();

    let source = vec![
        Ok(tuple![1_i64, 1_i64, "a"]),
        Ok(tuple![2_i64, 2_i64, "b"]),
        Err(CursorClosed),
    ];
    let err = group_by(&post)
        .aggregate([list(&id)])
        .expect("declaration")
        .transform(source.into_iter())
        .expect_err("source fails mid-pass");

    assert_eq!(err.class(), ErrorClass::Source);
    assert_eq!(err.to_string(), "row source failed: cursor closed");
    assert_eq!(
        err.display_with_class(),
        "source: row source failed: cursor closed"
    );

    let report = event_report();
    assert_eq!(report.ops.transforms_failed, 1);
    assert_eq!(report.ops.buckets_created, 2);
    assert_eq!(report.kind(TransformKind::Groups).rows, 2);
}

#[test]
fn column_out_of_range_aborts_with_evaluation_error() {
    let (post, _, _) = columns();
    let missing = Column::new("missing", 9);

    let err = group_by(&post)
        .aggregate([list(&missing)])
        .expect("declaration")
        .transform_rows(rows())
        .expect_err("short rows");

    assert!(matches!(
        err,
        TransformError::Eval(EvalError::ColumnOutOfRange {
            position: 9,
            arity: 3,
            ..
        })
    ));
}

#[test]
fn group_limit_aborts_when_a_new_bucket_exceeds_it() {
    let (post, id, _) = columns();

    let grouping = group_by(&post)
        .with_config(TransformConfig::unbounded().with_max_groups(2))
        .aggregate([list(&id)])
        .expect("declaration");
    assert_eq!(grouping.config().max_groups(), Some(2));

    let err = grouping.transform_rows(rows()).expect_err("third key");
    assert!(matches!(
        err,
        TransformError::GroupLimitExceeded {
            attempted: 3,
            limit: 2,
        }
    ));

    let ok = grouping.transform_rows(rows().into_iter().take(3));
    assert_eq!(ok.map(|result| result.len()).ok(), Some(2));
}

#[test]
fn specification_is_reusable_across_transforms() {
    let (post, id, _) = columns();
    event_reset_all();

    let grouping = group_by(&post).aggregate([set(&id)]).expect("declaration");
    let first = grouping.transform_rows(rows()).expect("first");
    let second = grouping.transform_rows(rows()).expect("second");

    assert_eq!(
        first.values().collect::<Vec<_>>(),
        second.values().collect::<Vec<_>>()
    );

    let report = event_report();
    assert_eq!(report.ops.transforms_finished, 2);
    assert_eq!(report.ops.groups_emitted, 6);
    assert_eq!(report.ops.rows_folded, 8);
}
