//! Core runtime for GroupFold: single-pass group-by aggregation of ordered
//! tuple streams into typed, order-preserving group records.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod group;
pub mod key;
pub mod obs;
pub mod projection;
pub mod row;
pub mod traits;
pub mod value;

///
/// Prelude
///
/// Prelude contains the declaration vocabulary and result types.
/// Collectors, key indexes, and observability internals stay one level down.
///

pub mod prelude {
    pub use crate::{
        config::TransformConfig,
        engine::{GroupBy, GroupedMap, group_all, group_by},
        error::{BindError, ConfigError, ErrorClass, EvalError, GroupError, TransformError},
        expr::{
            Expression, GroupExpr, Order, list, map, one, set, sorted_map, sorted_map_by,
            sorted_set, sorted_set_by,
        },
        group::Group,
        projection::{Argument, Arguments, Bean, Binding, Construct, Projection},
        row::{Column, Tuple},
        traits::FieldValue,
        value::Value,
    };
}
