mod common;

use common::{Columns, Comment, Post, User, basic_rows, comments, users_with_latest_post};
use groupfold::prelude::*;

fn post_constructor(c: &Columns) -> Projection<Post> {
    Projection::constructor([
        Binding::from(&c.post_id),
        Binding::from(&c.post_name),
        set(&c.comment).into(),
    ])
}

fn post_bean(c: &Columns) -> Projection<Post> {
    Projection::bean([
        Binding::from(&c.post_id),
        Binding::from(&c.post_name),
        set(&c.comment).alias("comments"),
    ])
    .expect("post bean declaration")
}

fn assert_jane(results: &GroupedMap<User>) {
    assert_eq!(results.len(), 2);

    let user = results.get("Jane").expect("Jane");
    assert_eq!(user.name, "Jane");
    assert_eq!(
        user.latest_post,
        Some(Post {
            id: Some(2),
            name: "post 2".to_string(),
            comments: comments(&[4, 5]),
        })
    );
}

#[test]
fn constructor_projection_per_post() {
    let c = Columns::new();

    let results = group_by(&c.post_id)
        .project(post_constructor(&c))
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect("transform");

    assert_eq!(results.len(), 4);
    assert_eq!(
        results.get(1_i64),
        Some(&Post {
            id: Some(1),
            name: "post 1".to_string(),
            comments: comments(&[1, 2, 3]),
        })
    );
    assert_eq!(
        results.get_null().map(|post| (post.id, post.comments.len())),
        Some((None, 2))
    );
}

#[test]
fn bean_projection_matches_constructor_projection() {
    let c = Columns::new();

    let by_bean = group_by(&c.post_id)
        .project(post_bean(&c))
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect("transform");
    let by_constructor = group_by(&c.post_id)
        .project(post_constructor(&c))
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect("transform");

    assert_eq!(by_bean.into_entries(), by_constructor.into_entries());
}

#[test]
fn hook_projection_matches_constructor_projection() {
    let c = Columns::new();

    let by_hook = group_by(&c.post_id)
        .hook(
            [one(&c.post_name), set(&c.comment)],
            |group: &Group| -> Result<Post, GroupError> {
                Ok(Post {
                    id: group.one(&c.post_id)?,
                    name: group.one(&c.post_name)?,
                    comments: Comment::from_pairs(group.set(&c.comment)?),
                })
            },
        )
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect("transform");
    let by_constructor = group_by(&c.post_id)
        .project(post_constructor(&c))
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect("transform");

    assert_eq!(by_hook.into_entries(), by_constructor.into_entries());
}

#[test]
fn nested_constructor_projection_builds_one_to_one_to_many() {
    let c = Columns::new();
    let user = Projection::<User>::constructor([
        Binding::from(&c.user_name),
        post_constructor(&c).into(),
    ]);

    let grouping = group_by(&c.user_name).project(user).expect("declaration");
    let exprs = grouping
        .exprs()
        .iter()
        .map(|expr| expr.expr_key().to_string())
        .collect::<Vec<_>>();
    assert_eq!(exprs, vec!["user_name", "post_id", "post_name", "comment"]);

    let results = grouping
        .transform_rows(users_with_latest_post())
        .expect("transform");
    assert_jane(&results);
}

#[test]
fn nested_bean_projection_builds_one_to_one_to_many() {
    let c = Columns::new();
    let user = Projection::<User>::bean([
        Binding::from(&c.user_name),
        Binding::from(post_bean(&c)).named("latest_post"),
    ])
    .expect("user bean declaration");

    let results = group_by(&c.user_name)
        .project(user)
        .expect("declaration")
        .transform_rows(users_with_latest_post())
        .expect("transform");
    assert_jane(&results);
}

#[test]
fn bean_with_nested_constructor_builds_one_to_one_to_many() {
    let c = Columns::new();
    let user = Projection::<User>::bean([
        Binding::from(&c.user_name),
        Binding::from(post_constructor(&c)).named("latest_post"),
    ])
    .expect("user bean declaration");

    let results = group_by(&c.user_name)
        .project(user)
        .expect("declaration")
        .transform_rows(users_with_latest_post())
        .expect("transform");
    assert_jane(&results);
}

#[test]
fn nested_projection_without_a_name_is_rejected_for_beans() {
    let c = Columns::new();

    let err = Projection::<User>::bean([Binding::from(&c.user_name), post_bean(&c).into()])
        .err()
        .expect("unnamed nested projection");
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn bind_errors_abort_the_projection_transform() {
    let c = Columns::new();
    let short = Projection::<Post>::constructor([Binding::from(&c.post_id)]);

    let err = group_by(&c.post_id)
        .project(short)
        .expect("declaration")
        .transform_rows(basic_rows())
        .expect_err("post needs three arguments");
    assert_eq!(err.class(), ErrorClass::Binding);
}
