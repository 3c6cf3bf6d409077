//! The deferred text value.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::args::FormatArg;
use crate::context::ResolutionContext;
use crate::error::ResolveError;
use crate::id::ResourceId;

/// Signature of a custom resolver.
pub type ResolverFn =
    dyn Fn(&dyn ResolutionContext) -> Result<String, ResolveError> + Send + Sync;

/// Text to be determined once a [`ResolutionContext`] is available.
///
/// Descriptors are immutable values: cloning is cheap (shared buffers) and any
/// number of threads may hold the same descriptor.
///
/// # Equality
///
/// Literal, formatted and quantity descriptors compare structurally, with
/// arguments compared element by element in order. Custom descriptors compare
/// by identity: two `custom` calls never produce equal descriptors, even for
/// identical closures, while clones of one custom descriptor share its resolver
/// and stay equal to it. Closures are not comparable, so this asymmetry is part
/// of the contract.
#[derive(Clone)]
pub struct TextDescriptor {
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    Literal(Arc<str>),
    Formatted {
        id: ResourceId,
        args: Arc<[FormatArg]>,
    },
    Quantity {
        id: ResourceId,
        quantity: i64,
        args: Arc<[FormatArg]>,
    },
    Custom(Arc<ResolverFn>),
}

impl TextDescriptor {
    /// Text that is already known. Resolves to `value` under every context.
    pub fn literal(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self {
            repr: Repr::Literal(value.into()),
        }
    }

    /// A string resource formatted with `args`.
    ///
    /// `args` is copied; the resource is not checked until resolution.
    pub fn formatted<I>(id: impl Into<ResourceId>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FormatArg>,
    {
        Self {
            repr: Repr::Formatted {
                id: id.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// A string resource without arguments.
    pub fn resource(id: impl Into<ResourceId>) -> Self {
        Self::formatted(id, std::iter::empty::<FormatArg>())
    }

    /// A plurals resource: the template is chosen by `quantity`, then formatted
    /// with `args`. The count usually appears in `args` as well.
    pub fn quantity<I>(id: impl Into<ResourceId>, quantity: i64, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FormatArg>,
    {
        Self {
            repr: Repr::Quantity {
                id: id.into(),
                quantity,
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Text produced by arbitrary code against the context.
    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&dyn ResolutionContext) -> Result<String, ResolveError> + Send + Sync + 'static,
    {
        Self {
            repr: Repr::Custom(Arc::new(resolver)),
        }
    }

    /// Produce the final string.
    ///
    /// Lookup failures from `ctx` are returned as-is. Nested descriptor
    /// arguments are resolved first, against the same context.
    pub fn resolve(&self, ctx: &dyn ResolutionContext) -> Result<String, ResolveError> {
        match &self.repr {
            Repr::Literal(value) => Ok(value.to_string()),
            Repr::Formatted { id, args } => {
                let args = resolve_nested(args, ctx)?;
                ctx.format_string(id, &args)
            }
            Repr::Quantity { id, quantity, args } => {
                let args = resolve_nested(args, ctx)?;
                ctx.quantity_string(id, *quantity, &args)
            }
            Repr::Custom(resolver) => resolver(ctx),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match &self.repr {
            Repr::Literal(value) => Some(&**value),
            _ => None,
        }
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        match &self.repr {
            Repr::Formatted { id, .. } | Repr::Quantity { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn quantity_value(&self) -> Option<i64> {
        match &self.repr {
            Repr::Quantity { quantity, .. } => Some(*quantity),
            _ => None,
        }
    }

    /// Captured arguments; empty for literal and custom descriptors.
    pub fn args(&self) -> &[FormatArg] {
        match &self.repr {
            Repr::Formatted { args, .. } | Repr::Quantity { args, .. } => &**args,
            _ => &[],
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.repr, Repr::Custom(_))
    }
}

/// Replace [`FormatArg::Text`] entries with their resolved strings.
pub(crate) fn resolve_nested<'a>(
    args: &'a [FormatArg],
    ctx: &dyn ResolutionContext,
) -> Result<Cow<'a, [FormatArg]>, ResolveError> {
    if !args.iter().any(|arg| matches!(arg, FormatArg::Text(_))) {
        return Ok(Cow::Borrowed(args));
    }
    args.iter()
        .map(|arg| match arg {
            FormatArg::Text(text) => text.resolve(ctx).map(FormatArg::Str),
            other => Ok(other.clone()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Cow::Owned)
}

fn resolver_addr(resolver: &Arc<ResolverFn>) -> *const () {
    Arc::as_ptr(resolver) as *const ()
}

impl PartialEq for TextDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Literal(a), Repr::Literal(b)) => a == b,
            (
                Repr::Formatted { id: a_id, args: a_args },
                Repr::Formatted { id: b_id, args: b_args },
            ) => a_id == b_id && a_args == b_args,
            (
                Repr::Quantity {
                    id: a_id,
                    quantity: a_q,
                    args: a_args,
                },
                Repr::Quantity {
                    id: b_id,
                    quantity: b_q,
                    args: b_args,
                },
            ) => a_id == b_id && a_q == b_q && a_args == b_args,
            (Repr::Custom(a), Repr::Custom(b)) => resolver_addr(a) == resolver_addr(b),
            _ => false,
        }
    }
}

impl Eq for TextDescriptor {}

impl Hash for TextDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.repr).hash(state);
        match &self.repr {
            Repr::Literal(value) => value.hash(state),
            Repr::Formatted { id, args } => {
                id.hash(state);
                args.hash(state);
            }
            Repr::Quantity { id, quantity, args } => {
                id.hash(state);
                quantity.hash(state);
                args.hash(state);
            }
            Repr::Custom(resolver) => (resolver_addr(resolver) as usize).hash(state),
        }
    }
}

impl fmt::Debug for TextDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Repr::Formatted { id, args } => f
                .debug_struct("Formatted")
                .field("id", id)
                .field("args", args)
                .finish(),
            Repr::Quantity { id, quantity, args } => f
                .debug_struct("Quantity")
                .field("id", id)
                .field("quantity", quantity)
                .field("args", args)
                .finish(),
            Repr::Custom(resolver) => write!(f, "Custom({:p})", resolver_addr(resolver)),
        }
    }
}

impl From<&str> for TextDescriptor {
    fn from(s: &str) -> Self {
        Self::literal(s)
    }
}

impl From<String> for TextDescriptor {
    fn from(s: String) -> Self {
        Self::literal(s)
    }
}

impl From<&String> for TextDescriptor {
    fn from(s: &String) -> Self {
        Self::literal(s.clone())
    }
}
