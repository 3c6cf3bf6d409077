use std::fmt;

use thiserror::Error;

use crate::format::FormatError;
use crate::id::ResourceId;

/// Which resource table a lookup went to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A plain string template.
    String,
    /// A quantity-sensitive set of templates.
    Plurals,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::String => f.write_str("string"),
            ResourceKind::Plurals => f.write_str("plurals"),
        }
    }
}

/// The referenced id does not exist in the active resolution context.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} resource `{id}` not found")]
pub struct ResourceNotFoundError {
    pub id: ResourceId,
    pub kind: ResourceKind,
}

impl ResourceNotFoundError {
    pub fn new(id: ResourceId, kind: ResourceKind) -> Self {
        Self { id, kind }
    }
}

/// Everything that can go wrong while turning a descriptor into text.
///
/// Errors are never recovered from inside the crate: whatever the lowest-level
/// lookup raises reaches the caller of `resolve` unchanged.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    ResourceNotFound(#[from] ResourceNotFoundError),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// Raised by a user-supplied custom resolver.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ResolveError {
    /// Wrap an arbitrary failure from a custom resolver.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    pub fn not_found(id: ResourceId, kind: ResourceKind) -> Self {
        Self::ResourceNotFound(ResourceNotFoundError::new(id, kind))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_))
    }
}

/// A locale string that could not be parsed into a language identifier.
#[derive(Debug, Error)]
#[error("invalid locale `{input}`: {source}")]
pub struct LocaleError {
    pub input: String,
    #[source]
    pub source: unic_langid::LanguageIdentifierError,
}
