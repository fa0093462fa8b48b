#![allow(dead_code)]

use groupfold::{prelude::*, tuple};

///
/// Columns
///
/// Shared row layout: user name, post id, post name, comment id, comment text.
///

pub struct Columns {
    pub user_name: Column,
    pub post_id: Column,
    pub post_name: Column,
    pub comment_id: Column,
    pub comment_text: Column,
    pub comment: Column,
}

impl Columns {
    pub fn new() -> Self {
        Self {
            user_name: Column::new("user_name", 0),
            post_id: Column::new("post_id", 1),
            post_name: Column::new("post_name", 2),
            comment_id: Column::new("comment_id", 3),
            comment_text: Column::new("comment_text", 4),
            comment: Column::computed("comment", |row: &Tuple| {
                let field = |at: usize| row.get(at).cloned().unwrap_or(Value::Null);
                Value::pair(field(3), field(4))
            }),
        }
    }
}

fn row(user: &str, post: Option<i64>, post_name: &str, comment: i64, text: &str) -> Tuple {
    tuple![user, post, post_name, comment, text]
}

/// Three named posts plus two comments on an absent post.
pub fn basic_rows() -> Vec<Tuple> {
    vec![
        row("John", Some(1), "post 1", 1, "comment 1"),
        row("John", Some(1), "post 1", 2, "comment 2"),
        row("John", Some(1), "post 1", 3, "comment 3"),
        row("Jane", Some(2), "post 2", 4, "comment 4"),
        row("Jane", Some(2), "post 2", 5, "comment 5"),
        row("Jane", Some(3), "post 3", 6, "comment 6"),
        row("Anon", None, "null post", 7, "comment 7"),
        row("Anon", None, "null post", 8, "comment 8"),
    ]
}

/// Post 1 with its comments delivered out of order.
pub fn unordered_rows() -> Vec<Tuple> {
    vec![
        row("John", Some(1), "post 1", 2, "comment 2"),
        row("John", Some(1), "post 1", 3, "comment 3"),
        row("John", Some(1), "post 1", 1, "comment 1"),
    ]
}

/// Each user with their latest post and its comments.
pub fn users_with_latest_post() -> Vec<Tuple> {
    vec![
        row("John", Some(1), "post 1", 1, "comment 1"),
        row("John", Some(1), "post 1", 2, "comment 2"),
        row("John", Some(1), "post 1", 3, "comment 3"),
        row("Jane", Some(2), "post 2", 4, "comment 4"),
        row("Jane", Some(2), "post 2", 5, "comment 5"),
    ]
}

///
/// Comment
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Comment {
    pub id: i64,
    pub text: String,
}

impl Comment {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            text: format!("comment {id}"),
        }
    }

    pub fn from_pairs(pairs: Vec<(i64, String)>) -> Vec<Self> {
        pairs
            .into_iter()
            .map(|(id, text)| Self { id, text })
            .collect()
    }
}

///
/// Post
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Post {
    pub id: Option<i64>,
    pub name: String,
    pub comments: Vec<Comment>,
}

impl Construct for Post {
    fn construct(args: &mut Arguments) -> Result<Self, BindError> {
        Ok(Self {
            id: args.next_value()?,
            name: args.next_value()?,
            comments: Comment::from_pairs(args.next_value()?),
        })
    }
}

impl Bean for Post {
    fn assign(&mut self, arg: Argument) -> Result<(), BindError> {
        match arg.name() {
            "post_id" => self.id = arg.into_value()?,
            "post_name" => self.name = arg.into_value()?,
            "comments" => self.comments = Comment::from_pairs(arg.into_value()?),
            other => return Err(BindError::missing_property(other)),
        }

        Ok(())
    }
}

///
/// User
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct User {
    pub name: String,
    pub latest_post: Option<Post>,
}

impl Construct for User {
    fn construct(args: &mut Arguments) -> Result<Self, BindError> {
        Ok(Self {
            name: args.next_value()?,
            latest_post: Some(args.next_object()?),
        })
    }
}

impl Bean for User {
    fn assign(&mut self, arg: Argument) -> Result<(), BindError> {
        match arg.name() {
            "user_name" => self.name = arg.into_value()?,
            "latest_post" => self.latest_post = Some(arg.into_object()?),
            other => return Err(BindError::missing_property(other)),
        }

        Ok(())
    }
}

pub fn comments(ids: &[i64]) -> Vec<Comment> {
    ids.iter().copied().map(Comment::new).collect()
}
