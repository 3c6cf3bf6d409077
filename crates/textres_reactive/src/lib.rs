//! Remembered text descriptors for reactive UIs.
//!
//! This crate ties [`textres_core`] descriptors to a small reactive runtime:
//!
//! - **Signals**: application state whose reads are tracked per render scope
//! - **Remembering**: descriptors built once per scope and rebuilt only when
//!   their keys change
//! - **Ambient context**: one resolution context per [`Composer`]; replacing
//!   it re-runs exactly the scopes that resolved text
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use textres_core::{quantity, PluralForms, ResourceId, ResourceTable};
//! use textres_reactive::{Composer, Composition};
//! use unic_langid::langid;
//!
//! const UNREAD: ResourceId = ResourceId::from_static("unread_messages");
//!
//! let table = Arc::new(
//!     ResourceTable::builder()
//!         .plurals(UNREAD, PluralForms::new().one("%d unread message").other("%d unread messages"))
//!         .build(),
//! );
//!
//! let mut composer = Composer::new(Arc::new(table.localized(langid!("en"))));
//! let unread = composer.create_state(1i64);
//!
//! let mut inbox = Composition::new(composer, move |cx| {
//!     let count = cx.get(unread).unwrap_or(0);
//!     let label = cx.remember_descriptor_keyed(count, || quantity!(UNREAD, count, count));
//!     cx.resolve(&label).unwrap_or_default()
//! });
//! assert_eq!(inbox.output(), "1 unread message");
//!
//! inbox.set_state(unread, 3);
//! inbox.recompose();
//! assert_eq!(inbox.output(), "3 unread messages");
//! ```

mod composer;
mod slots;

pub mod reactive;

pub use composer::{Composer, Composition, RenderCx, RenderScope, ResolveInScope, SharedContext};
pub use reactive::{ObserverId, ReactiveGraph, Signal, SignalId};
