//! Resolution without a UI runtime.

use std::path::Path;
use std::sync::Arc;

use textres_core::{LocalizedResources, ResolveError, ResourceTable, TextDescriptor};
use tracing::debug;
use unic_langid::{langid, LanguageIdentifier};

use crate::config::TestResolverConfig;
use crate::logging::init_test_logging_with;

/// Resolve `descriptor` against `resources` pinned to `locale`.
///
/// A fresh [`LocalizedResources`] is built for every call, so calls with
/// different locales never affect each other.
pub fn resolve_with_locale(
    resources: &Arc<ResourceTable>,
    descriptor: &TextDescriptor,
    locale: &LanguageIdentifier,
) -> Result<String, ResolveError> {
    let context = LocalizedResources::new(Arc::clone(resources), locale.clone());
    descriptor.resolve(&context)
}

/// A resource table plus the locale tests resolve in by default.
#[derive(Clone, Debug)]
pub struct TestResolver {
    resources: Arc<ResourceTable>,
    default_locale: LanguageIdentifier,
}

impl TestResolver {
    /// Resolver defaulting to `en-US`.
    pub fn new(resources: impl Into<Arc<ResourceTable>>) -> Self {
        Self {
            resources: resources.into(),
            default_locale: langid!("en-US"),
        }
    }

    /// Resolver configured by `config`; installs its log filter if one is set.
    pub fn with_config(
        resources: impl Into<Arc<ResourceTable>>,
        config: &TestResolverConfig,
    ) -> anyhow::Result<Self> {
        if let Some(filter) = &config.log_filter {
            init_test_logging_with(filter);
        }
        let default_locale = config.locale()?;
        debug!(locale = %default_locale, "TestResolver::with_config");
        Ok(Self {
            resources: resources.into(),
            default_locale,
        })
    }

    /// Resolver configured from a TOML file.
    pub fn from_config_file(
        resources: impl Into<Arc<ResourceTable>>,
        path: &Path,
    ) -> anyhow::Result<Self> {
        let config = TestResolverConfig::load(path)?;
        Self::with_config(resources, &config)
    }

    /// Replace the default locale.
    pub fn with_default_locale(mut self, locale: LanguageIdentifier) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn default_locale(&self) -> &LanguageIdentifier {
        &self.default_locale
    }

    pub fn resources(&self) -> &Arc<ResourceTable> {
        &self.resources
    }

    /// Resolve in the default locale.
    pub fn resolve(&self, descriptor: &TextDescriptor) -> Result<String, ResolveError> {
        resolve_with_locale(&self.resources, descriptor, &self.default_locale)
    }

    pub fn resolve_with_locale(
        &self,
        descriptor: &TextDescriptor,
        locale: &LanguageIdentifier,
    ) -> Result<String, ResolveError> {
        resolve_with_locale(&self.resources, descriptor, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textres_core::ResourceId;

    const HELLO: ResourceId = ResourceId::from_static("hello");

    fn resources() -> ResourceTable {
        ResourceTable::builder()
            .string(HELLO, "Hello")
            .localized_string(langid!("de"), HELLO, "Hallo")
            .build()
    }

    #[test]
    fn test_default_locale_is_en_us() {
        let resolver = TestResolver::new(resources());
        assert_eq!(resolver.default_locale(), &langid!("en-US"));
        assert_eq!(resolver.resolve(&TextDescriptor::resource(HELLO)).unwrap(), "Hello");
    }

    #[test]
    fn test_with_config_sets_locale() {
        let config = TestResolverConfig {
            default_locale: "de_AT".to_string(),
            log_filter: None,
        };
        let resolver = TestResolver::with_config(resources(), &config).unwrap();
        assert_eq!(resolver.resolve(&TextDescriptor::resource(HELLO)).unwrap(), "Hallo");
    }

    #[test]
    fn test_with_config_rejects_bad_locale() {
        let config = TestResolverConfig {
            default_locale: "??".to_string(),
            log_filter: None,
        };
        assert!(TestResolver::with_config(resources(), &config).is_err());
    }
}
