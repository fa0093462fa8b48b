use crate::{
    collector::{Collect, Collector},
    error::{ErrorClass, EvalError},
    expr::{GroupExpr, Order, list, map, one, set, sorted_map, sorted_map_by, sorted_set, sorted_set_by},
    row::{Column, Tuple},
    tuple,
    value::Value,
};

fn columns() -> (Column, Column, Column) {
    (
        Column::new("post_id", 0),
        Column::new("comment_id", 1),
        Column::new("comment_text", 2),
    )
}

fn collect(expr: &GroupExpr, rows: &[Tuple]) -> Result<Value, EvalError> {
    let mut collector = Collector::new(expr);
    for row in rows {
        collector.accept(row)?;
    }

    collector.finish()
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

fn comment_rows() -> Vec<Tuple> {
    vec![
        tuple![1_i64, 2_i64, "comment 2"],
        tuple![1_i64, 1_i64, "comment 1"],
        tuple![1_i64, 3_i64, "comment 3"],
        tuple![1_i64, 1_i64, "comment 1 edited"],
    ]
}

#[test]
fn one_keeps_first_value_and_ignores_later_rows() {
    let (_, comment_id, _) = columns();

    let value = collect(&one(&comment_id), &comment_rows()).expect("collect");
    assert_eq!(value, Value::Int(2));
}

#[test]
fn one_without_rows_finishes_as_null() {
    let (post_id, _, _) = columns();

    assert_eq!(collect(&one(&post_id), &[]).expect("collect"), Value::Null);
}

#[test]
fn list_preserves_row_order_and_duplicates() {
    let (_, comment_id, _) = columns();

    let value = collect(&list(&comment_id), &comment_rows()).expect("collect");
    assert_eq!(value, Value::List(ints(&[2, 1, 3, 1])));
}

#[test]
fn set_deduplicates_in_first_occurrence_order() {
    let (_, comment_id, _) = columns();

    let value = collect(&set(&comment_id), &comment_rows()).expect("collect");
    assert_eq!(value, Value::Set(ints(&[2, 1, 3])));
}

#[test]
fn sorted_set_orders_naturally_or_by_policy() {
    let (_, comment_id, _) = columns();

    let natural = collect(&sorted_set(&comment_id), &comment_rows()).expect("collect");
    assert_eq!(natural, Value::Set(ints(&[1, 2, 3])));

    let reverse =
        collect(&sorted_set_by(&comment_id, Order::Reverse), &comment_rows()).expect("collect");
    assert_eq!(reverse, Value::Set(ints(&[3, 2, 1])));
}

#[test]
fn sorted_set_surfaces_unorderable_values_at_use() {
    let (_, comment_id, _) = columns();
    let rows = vec![tuple![1_i64, 1_i64, "a"], tuple![1_i64, "x", "b"]];

    let err = collect(&sorted_set(&comment_id), &rows).expect_err("mixed variants");
    assert_eq!(
        err,
        EvalError::Unorderable {
            left: "Int",
            right: "Text",
        }
    );
}

#[test]
fn sorted_set_treats_nulls_alike_whatever_the_row_count() {
    let (_, comment_id, _) = columns();
    let null_row = || tuple![1_i64, Value::Null, "orphan"];

    let one_null = collect(&sorted_set(&comment_id), &[null_row()]).expect("one null");
    assert_eq!(one_null, Value::Set(vec![Value::Null]));

    let two_nulls =
        collect(&sorted_set(&comment_id), &[null_row(), null_row()]).expect("two nulls");
    assert_eq!(two_nulls, Value::Set(vec![Value::Null]), "equal nulls deduplicate");

    let rows = [tuple![1_i64, 4_i64, "a"], null_row()];
    let err = collect(&sorted_set(&comment_id), &rows).expect_err("value then null");
    assert_eq!(
        err,
        EvalError::Unorderable {
            left: "Int",
            right: "Null",
        }
    );

    let rows = [null_row(), tuple![1_i64, 4_i64, "a"]];
    let err = collect(&sorted_set_by(&comment_id, Order::Reverse), &rows)
        .expect_err("null then value");
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn sorted_collectors_reject_an_unorderable_first_value() {
    let (_, comment_id, _) = columns();
    let nested = Column::computed("ids", |_: &Tuple| Value::Map(Vec::new()));

    let err = collect(&sorted_set(&nested), &[tuple![1_i64, 1_i64, "a"]])
        .expect_err("single map value");
    assert_eq!(
        err,
        EvalError::Unorderable {
            left: "Map",
            right: "Map",
        }
    );

    let err = collect(&sorted_map(&nested, &comment_id), &[tuple![1_i64, 1_i64, "a"]])
        .expect_err("single map key");
    assert!(matches!(err, EvalError::Unorderable { .. }));

    let custom = sorted_set_by(&nested, Order::by(|_, _| std::cmp::Ordering::Equal));
    let ok = collect(&custom, &[tuple![1_i64, 1_i64, "a"]]);
    assert_eq!(ok, Ok(Value::Set(vec![Value::Map(Vec::new())])));
}

#[test]
fn map_merges_duplicate_keys_last_write_wins() {
    let (_, comment_id, comment_text) = columns();

    let value = collect(&map(&comment_id, &comment_text), &comment_rows()).expect("collect");
    assert_eq!(
        value,
        Value::Map(vec![
            (Value::Int(2), Value::text("comment 2")),
            (Value::Int(1), Value::text("comment 1 edited")),
            (Value::Int(3), Value::text("comment 3")),
        ]),
        "duplicate key keeps its first position and takes the last value",
    );
}

#[test]
fn sorted_map_orders_keys_by_policy() {
    let (_, comment_id, comment_text) = columns();

    let natural = collect(&sorted_map(&comment_id, &comment_text), &comment_rows()).expect("collect");
    let keys = natural
        .as_entries()
        .expect("map entries")
        .iter()
        .map(|(key, _)| key.clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, ints(&[1, 2, 3]));
    assert_eq!(
        natural.map_get(&Value::Int(1)),
        Some(&Value::text("comment 1 edited"))
    );

    let reverse = collect(
        &sorted_map_by(&comment_id, &comment_text, Order::Reverse),
        &comment_rows(),
    )
    .expect("collect");
    let keys = reverse
        .as_entries()
        .expect("map entries")
        .iter()
        .map(|(key, _)| key.clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, ints(&[3, 2, 1]));
}

#[test]
fn nested_value_map_collects_per_sub_key() {
    let (post_id, comment_id, comment_text) = columns();
    let rows = vec![
        tuple![1_i64, 1_i64, "a"],
        tuple![2_i64, 5_i64, "e"],
        tuple![1_i64, 2_i64, "b"],
        tuple![1_i64, 1_i64, "a2"],
    ];

    let value = collect(&map(&post_id, map(&comment_id, &comment_text)), &rows).expect("collect");
    assert_eq!(
        value,
        Value::Map(vec![
            (
                Value::Int(1),
                Value::Map(vec![
                    (Value::Int(1), Value::text("a2")),
                    (Value::Int(2), Value::text("b")),
                ]),
            ),
            (
                Value::Int(2),
                Value::Map(vec![(Value::Int(5), Value::text("e"))]),
            ),
        ])
    );
}

#[test]
fn nested_key_map_collects_map_valued_keys() {
    let (post_id, comment_id, comment_text) = columns();
    let rows = vec![
        tuple![1_i64, 10_i64, "a"],
        tuple![1_i64, 11_i64, "b"],
        tuple![1_i64, 12_i64, "a"],
    ];

    let value = collect(&map(map(&post_id, &comment_text), &comment_id), &rows).expect("collect");
    assert_eq!(
        value,
        Value::Map(vec![
            (
                Value::Map(vec![(Value::Int(1), Value::text("a"))]),
                Value::Int(12),
            ),
            (
                Value::Map(vec![(Value::Int(1), Value::text("b"))]),
                Value::Int(11),
            ),
        ])
    );
}

#[test]
fn nested_list_value_keeps_every_row_of_its_sub_key() {
    let (post_id, comment_id, _) = columns();

    let value = collect(&map(&post_id, list(&comment_id)), &comment_rows()).expect("collect");
    assert_eq!(
        value,
        Value::Map(vec![(Value::Int(1), Value::List(ints(&[2, 1, 3, 1])))])
    );
}

#[test]
fn one_value_half_keeps_first_value_per_sub_key() {
    let (_, comment_id, comment_text) = columns();

    let value = collect(&map(&comment_id, one(&comment_text)), &comment_rows()).expect("collect");
    assert_eq!(
        value.map_get(&Value::Int(1)),
        Some(&Value::text("comment 1")),
        "an explicit One half keeps the first value, unlike a plain column half",
    );
}

#[test]
fn map_collector_rejects_non_pair_values() {
    let (_, comment_id, comment_text) = columns();
    let expr = map(&comment_id, &comment_text);
    let mut collector = Collector::new(&expr);

    let err = collector.fold(Value::Int(7)).expect_err("non-pair input");
    assert_eq!(
        err,
        EvalError::ExpectedPair {
            expr: "(comment_id, comment_text)".to_string(),
            found: "Int",
        }
    );
}
