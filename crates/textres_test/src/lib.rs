//! Deterministic text resolution for tests.
//!
//! View-models build [`TextDescriptor`](textres_core::TextDescriptor)s; tests
//! check them by resolving against an in-memory
//! [`ResourceTable`](textres_core::ResourceTable) in an explicit locale. No UI
//! runtime and no global locale are involved, so tests can run in parallel
//! with different locales.
//!
//! # Example
//!
//! ```rust
//! use textres_core::{formatted, ResourceId, ResourceTable};
//! use textres_test::TestResolver;
//! use unic_langid::langid;
//!
//! const GREETING: ResourceId = ResourceId::from_static("greeting");
//!
//! let resolver = TestResolver::new(
//!     ResourceTable::builder()
//!         .string(GREETING, "Hello, %1$s")
//!         .localized_string(langid!("fr"), GREETING, "Bonjour, %1$s")
//!         .build(),
//! );
//!
//! let greeting = formatted!(GREETING, "Derek");
//! assert_eq!(resolver.resolve(&greeting).unwrap(), "Hello, Derek");
//! assert_eq!(
//!     resolver.resolve_with_locale(&greeting, &langid!("fr-FR")).unwrap(),
//!     "Bonjour, Derek"
//! );
//! ```

mod config;
mod logging;
mod resolver;

pub use config::TestResolverConfig;
pub use logging::{init_test_logging, init_test_logging_with};
pub use resolver::{resolve_with_locale, TestResolver};
