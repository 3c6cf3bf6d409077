//! Deferred, context-resolved text.
//!
//! Goals:
//! - A [`TextDescriptor`] value that view-models and services can build and pass
//!   around without access to any resource system
//! - Resolution against a narrow [`ResolutionContext`] at render time
//! - An in-memory [`ResourceTable`] for platforms without their own resource
//!   lookup, and for tests:
//!   - locale fallback chain (`fr-CA` → `fr` → default)
//!   - CLDR plural category selection for integer quantities
//!   - printf-style positional formatting with locale number symbols
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use textres_core::{formatted, ResourceId, ResourceTable, TextDescriptor};
//! use unic_langid::langid;
//!
//! const GREETING: ResourceId = ResourceId::from_static("greeting");
//!
//! let table = Arc::new(
//!     ResourceTable::builder()
//!         .string(GREETING, "Hello, %1$s")
//!         .localized_string(langid!("fr"), GREETING, "Bonjour, %1$s")
//!         .build(),
//! );
//!
//! let greeting: TextDescriptor = formatted!(GREETING, "Derek");
//! assert_eq!(greeting.resolve(&table.localized(langid!("fr-FR"))).unwrap(), "Bonjour, Derek");
//! ```

mod args;
mod context;
mod descriptor;
mod error;
mod id;
mod resources;

pub mod format;
pub mod locale;
pub mod plural;

pub use args::FormatArg;
pub use context::ResolutionContext;
pub use descriptor::{ResolverFn, TextDescriptor};
pub use error::{LocaleError, ResolveError, ResourceKind, ResourceNotFoundError};
pub use format::FormatError;
pub use id::ResourceId;
pub use locale::{locale_fallback_chain, normalize_locale, parse_locale};
pub use plural::{plural_category, PluralCategory};
pub use resources::{LocalizedResources, PluralForms, ResourceTable, ResourceTableBuilder};

/// Build a formatted [`TextDescriptor`] from a resource id and any number of
/// arguments convertible into [`FormatArg`].
///
/// Examples:
/// - `formatted!(TITLE)`
/// - `formatted!(GREETING, user_name)`
/// - `formatted!(SUMMARY, user_name, 3, 0.5)`
#[macro_export]
macro_rules! formatted {
    ($id:expr $(, $arg:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::FormatArg> =
            ::std::vec![$($crate::FormatArg::from($arg)),*];
        $crate::TextDescriptor::formatted($id, args)
    }};
}

/// Build a quantity [`TextDescriptor`]: resource id, quantity, then arguments.
///
/// `quantity!(APPLES, count, count)` selects the plural form for `count` and
/// substitutes `count` into it.
#[macro_export]
macro_rules! quantity {
    ($id:expr, $quantity:expr $(, $arg:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::FormatArg> =
            ::std::vec![$($crate::FormatArg::from($arg)),*];
        $crate::TextDescriptor::quantity($id, $quantity, args)
    }};
}
