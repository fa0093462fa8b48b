//! Module: projection
//! Responsibility: binding finished groups into caller-defined types.
//! Does not own: accumulation or bucket routing.
//! Boundary: constructor and property ("bean") binders, recursive over nested projections.

mod argument;


use crate::{
    error::{BindError, ConfigError},
    expr::{Expression, GroupExpr},
    group::Group,
    row::Column,
};
use std::{any::Any, collections::BTreeSet, sync::Arc};

// re-exports
pub use argument::{Argument, Arguments};

///
/// Construct
///
/// Target built from ordered constructor arguments. Arguments arrive in
/// binding declaration order; nested projections arrive as objects.
///

pub trait Construct: Sized {
    fn construct(args: &mut Arguments) -> Result<Self, BindError>;
}

///
/// Bean
///
/// Target built from its default value, then assigned one named property
/// per binding. Unknown properties should fail with
/// `BindError::missing_property`.
///

pub trait Bean: Default {
    fn assign(&mut self, arg: Argument) -> Result<(), BindError>;
}

///
/// ErasedProjection
///
/// Object-safe view of a `Projection<T>` so projections of different target
/// types can nest inside one binding list.
///

pub trait ErasedProjection: Send + Sync {
    /// Push every group expression this projection reads, depth first.
    fn collect_exprs(&self, out: &mut Vec<GroupExpr>);

    /// Bind one group into a type-erased target object.
    fn bind_erased(&self, group: &Group) -> Result<Box<dyn Any + Send>, BindError>;
}

///
/// Binding
///
/// One constructor argument or bean property: a group expression read from
/// the group, or a nested projection bound against the same group.
///

#[derive(Clone)]
pub enum Binding {
    Expr {
        name: Option<Arc<str>>,
        expr: GroupExpr,
    },
    Nested {
        name: Option<Arc<str>>,
        projection: Arc<dyn ErasedProjection>,
    },
}

impl Binding {
    /// Rename this binding; bean targets receive it as the property name.
    #[must_use]
    pub fn named(self, name: impl Into<Arc<str>>) -> Self {
        let name = Some(name.into());
        match self {
            Self::Expr { expr, .. } => Self::Expr { name, expr },
            Self::Nested { projection, .. } => Self::Nested { name, projection },
        }
    }

    /// Binding name: the alias, else the column name of a single-column
    /// expression. Map expressions and nested projections have none unless
    /// named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Expr { name: Some(name), .. } | Self::Nested { name: Some(name), .. } => {
                Some(name.as_ref())
            }
            Self::Expr { name: None, expr } => expr_column_name(expr),
            Self::Nested { name: None, .. } => None,
        }
    }

    fn label(&self) -> String {
        match (self.name(), self) {
            (Some(name), _) => name.to_string(),
            (None, Self::Expr { expr, .. }) => expr.expr_key().to_string(),
            (None, Self::Nested { .. }) => "<nested>".to_string(),
        }
    }

    fn collect_exprs(&self, out: &mut Vec<GroupExpr>) {
        match self {
            Self::Expr { expr, .. } => out.push(expr.clone()),
            Self::Nested { projection, .. } => projection.collect_exprs(out),
        }
    }

    fn resolve(&self, group: &Group) -> Result<Argument, BindError> {
        match self {
            Self::Expr { expr, .. } => Ok(Argument::value(self.label(), group.get(expr)?.clone())),
            Self::Nested { projection, .. } => {
                Ok(Argument::object(self.label(), projection.bind_erased(group)?))
            }
        }
    }
}

impl From<GroupExpr> for Binding {
    fn from(expr: GroupExpr) -> Self {
        Self::Expr { name: None, expr }
    }
}

impl From<&Column> for Binding {
    fn from(column: &Column) -> Self {
        Self::from(GroupExpr::from(column))
    }
}

impl From<Column> for Binding {
    fn from(column: Column) -> Self {
        Self::from(GroupExpr::from(column))
    }
}

impl<T: Send + 'static> From<Projection<T>> for Binding {
    fn from(projection: Projection<T>) -> Self {
        Self::Nested {
            name: None,
            projection: Arc::new(projection),
        }
    }
}

impl GroupExpr {
    /// Bind this expression under an explicit property name.
    #[must_use]
    pub fn alias(self, name: impl Into<Arc<str>>) -> Binding {
        Binding::from(self).named(name)
    }
}

fn expr_column_name(expr: &GroupExpr) -> Option<&str> {
    match expr {
        GroupExpr::One(column)
        | GroupExpr::List(column)
        | GroupExpr::Set(column)
        | GroupExpr::SortedSet { column, .. } => Some(column.name()),
        GroupExpr::Map { .. } => None,
    }
}

///
/// Target
///

enum Target<T> {
    Construct(fn(&mut Arguments) -> Result<T, BindError>),
    Bean {
        init: fn() -> T,
        assign: fn(&mut T, Argument) -> Result<(), BindError>,
    },
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Target<T> {}

///
/// Projection
///
/// Projection describes how to build `T` from one finished group. It is
/// immutable and reusable across transforms.
///

pub struct Projection<T> {
    bindings: Vec<Binding>,
    target: Target<T>,
}

impl<T> Clone for Projection<T> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            target: self.target,
        }
    }
}

impl<T: Construct> Projection<T> {
    /// Build `T` from ordered constructor arguments.
    #[must_use]
    pub fn constructor(bindings: impl IntoIterator<Item = Binding>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            target: Target::Construct(T::construct),
        }
    }
}

impl<T: Bean> Projection<T> {
    /// Build `T` from its default, then assign one property per binding.
    ///
    /// Every binding needs a name; map expressions and nested projections
    /// must be named explicitly.
    pub fn bean(bindings: impl IntoIterator<Item = Binding>) -> Result<Self, ConfigError> {
        let bindings = bindings.into_iter().collect::<Vec<_>>();
        if let Some(unnamed) = bindings.iter().find(|binding| binding.name().is_none()) {
            return Err(ConfigError::UnnamedBinding {
                expr: unnamed.label(),
            });
        }

        Ok(Self {
            bindings,
            target: Target::Bean {
                init: T::default,
                assign: T::assign,
            },
        })
    }
}

impl<T> Projection<T> {
    /// Every group expression read by this projection, nested projections
    /// included, deduplicated by identity in first-declaration order.
    #[must_use]
    pub fn group_exprs(&self) -> Vec<GroupExpr> {
        let mut all = Vec::new();
        for binding in &self.bindings {
            binding.collect_exprs(&mut all);
        }

        let mut seen = BTreeSet::new();
        all.retain(|expr| seen.insert(expr.expr_key()));

        all
    }

    /// Bind one finished group into `T`.
    pub fn bind(&self, group: &Group) -> Result<T, BindError> {
        match self.target {
            Target::Construct(construct) => {
                let arguments = self
                    .bindings
                    .iter()
                    .map(|binding| binding.resolve(group))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut args = Arguments::new(arguments);
                let target = construct(&mut args)?;
                args.finish()?;

                Ok(target)
            }
            Target::Bean { init, assign } => {
                let mut target = init();
                for binding in &self.bindings {
                    assign(&mut target, binding.resolve(group)?)?;
                }

                Ok(target)
            }
        }
    }
}

impl<T: Send + 'static> ErasedProjection for Projection<T> {
    fn collect_exprs(&self, out: &mut Vec<GroupExpr>) {
        for binding in &self.bindings {
            binding.collect_exprs(out);
        }
    }

    fn bind_erased(&self, group: &Group) -> Result<Box<dyn Any + Send>, BindError> {
        Ok(Box::new(self.bind(group)?))
    }
}
