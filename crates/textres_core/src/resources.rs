//! In-memory resource environment.
//!
//! A [`ResourceTable`] holds string templates and plural form sets, each with
//! an unqualified default and optional per-locale overrides. It is immutable
//! once built and meant to be shared through an `Arc`; a
//! [`LocalizedResources`] pins it to one locale and implements
//! [`ResolutionContext`].

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::args::FormatArg;
use crate::context::ResolutionContext;
use crate::descriptor::resolve_nested;
use crate::error::{ResolveError, ResourceKind};
use crate::format::{format_with_symbols, NumberSymbols};
use crate::id::ResourceId;
use crate::locale::locale_fallback_chain;
use crate::plural::{plural_category, PluralCategory};

/// Quantity-specific templates of one plurals resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluralForms {
    forms: SmallVec<[(PluralCategory, String); 2]>,
}

impl PluralForms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template of `category`, replacing any previous one.
    pub fn with(mut self, category: PluralCategory, template: impl Into<String>) -> Self {
        let template = template.into();
        match self.forms.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => *existing = template,
            None => self.forms.push((category, template)),
        }
        self
    }

    pub fn zero(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::Zero, template)
    }

    pub fn one(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::One, template)
    }

    pub fn two(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::Two, template)
    }

    pub fn few(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::Few, template)
    }

    pub fn many(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::Many, template)
    }

    pub fn other(self, template: impl Into<String>) -> Self {
        self.with(PluralCategory::Other, template)
    }

    pub fn get(&self, category: PluralCategory) -> Option<&str> {
        self.forms
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t.as_str())
    }

    /// Template for `category`, falling back to `other`.
    pub fn select(&self, category: PluralCategory) -> Option<&str> {
        self.get(category).or_else(|| self.get(PluralCategory::Other))
    }
}

#[derive(Clone, Debug)]
struct Localized<T> {
    default: Option<T>,
    by_locale: FxHashMap<LanguageIdentifier, T>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self {
            default: None,
            by_locale: FxHashMap::default(),
        }
    }
}

impl<T> Localized<T> {
    fn set(&mut self, locale: Option<LanguageIdentifier>, value: T) {
        match locale {
            Some(locale) => {
                self.by_locale.insert(locale, value);
            }
            None => self.default = Some(value),
        }
    }

    fn lookup(&self, chain: &[LanguageIdentifier]) -> Option<&T> {
        chain
            .iter()
            .find_map(|l| self.by_locale.get(l))
            .or(self.default.as_ref())
    }
}

/// Immutable store of localized templates.
#[derive(Clone, Debug, Default)]
pub struct ResourceTable {
    strings: FxHashMap<ResourceId, Localized<String>>,
    plurals: FxHashMap<ResourceId, Localized<PluralForms>>,
}

impl ResourceTable {
    pub fn builder() -> ResourceTableBuilder {
        ResourceTableBuilder::default()
    }

    /// A resolution context over this table for `locale`.
    pub fn localized(self: &Arc<Self>, locale: LanguageIdentifier) -> LocalizedResources {
        LocalizedResources::new(Arc::clone(self), locale)
    }

    pub fn contains_string(&self, id: &ResourceId) -> bool {
        self.strings.contains_key(id)
    }

    pub fn contains_plurals(&self, id: &ResourceId) -> bool {
        self.plurals.contains_key(id)
    }

    /// The raw string template `locale` would use for `id`.
    pub fn string_template(&self, id: &ResourceId, locale: &LanguageIdentifier) -> Option<&str> {
        let chain = locale_fallback_chain(locale);
        self.strings
            .get(id)
            .and_then(|entry| entry.lookup(&chain))
            .map(String::as_str)
    }

    /// The plural forms `locale` would use for `id`.
    pub fn plural_forms(
        &self,
        id: &ResourceId,
        locale: &LanguageIdentifier,
    ) -> Option<&PluralForms> {
        let chain = locale_fallback_chain(locale);
        self.plurals.get(id).and_then(|entry| entry.lookup(&chain))
    }
}

/// Builder for [`ResourceTable`].
#[derive(Default)]
pub struct ResourceTableBuilder {
    table: ResourceTable,
}

impl ResourceTableBuilder {
    /// Default (unqualified) string template.
    pub fn string(mut self, id: impl Into<ResourceId>, template: impl Into<String>) -> Self {
        self.table
            .strings
            .entry(id.into())
            .or_default()
            .set(None, template.into());
        self
    }

    /// String template for one locale.
    pub fn localized_string(
        mut self,
        locale: LanguageIdentifier,
        id: impl Into<ResourceId>,
        template: impl Into<String>,
    ) -> Self {
        self.table
            .strings
            .entry(id.into())
            .or_default()
            .set(Some(locale), template.into());
        self
    }

    /// Default (unqualified) plural forms.
    pub fn plurals(mut self, id: impl Into<ResourceId>, forms: PluralForms) -> Self {
        self.table
            .plurals
            .entry(id.into())
            .or_default()
            .set(None, forms);
        self
    }

    /// Plural forms for one locale.
    pub fn localized_plurals(
        mut self,
        locale: LanguageIdentifier,
        id: impl Into<ResourceId>,
        forms: PluralForms,
    ) -> Self {
        self.table
            .plurals
            .entry(id.into())
            .or_default()
            .set(Some(locale), forms);
        self
    }

    pub fn build(self) -> ResourceTable {
        self.table
    }
}

/// A [`ResourceTable`] pinned to one locale.
#[derive(Clone, Debug)]
pub struct LocalizedResources {
    table: Arc<ResourceTable>,
    locale: LanguageIdentifier,
    chain: Vec<LanguageIdentifier>,
    symbols: NumberSymbols,
}

impl LocalizedResources {
    pub fn new(table: Arc<ResourceTable>, locale: LanguageIdentifier) -> Self {
        Self {
            chain: locale_fallback_chain(&locale),
            symbols: NumberSymbols::for_locale(&locale),
            table,
            locale,
        }
    }

    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    pub fn table(&self) -> &Arc<ResourceTable> {
        &self.table
    }
}

impl ResolutionContext for LocalizedResources {
    fn format_string(&self, id: &ResourceId, args: &[FormatArg]) -> Result<String, ResolveError> {
        let Some(template) = self.table.strings.get(id).and_then(|e| e.lookup(&self.chain))
        else {
            warn!(id = %id, locale = %self.locale, "string resource not found");
            return Err(ResolveError::not_found(id.clone(), ResourceKind::String));
        };
        let args = resolve_nested(args, self)?;
        Ok(format_with_symbols(template, &args, self.symbols)?)
    }

    fn quantity_string(
        &self,
        id: &ResourceId,
        quantity: i64,
        args: &[FormatArg],
    ) -> Result<String, ResolveError> {
        let category = plural_category(&self.locale, quantity);
        let template = self
            .table
            .plurals
            .get(id)
            .and_then(|e| e.lookup(&self.chain))
            .and_then(|forms| forms.select(category));
        let Some(template) = template else {
            warn!(
                id = %id,
                locale = %self.locale,
                quantity,
                category = %category,
                "plurals resource not found"
            );
            return Err(ResolveError::not_found(id.clone(), ResourceKind::Plurals));
        };
        let args = resolve_nested(args, self)?;
        Ok(format_with_symbols(template, &args, self.symbols)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextDescriptor;
    use pretty_assertions::assert_eq;
    use unic_langid::langid;

    const GREETING: ResourceId = ResourceId::from_static("greeting");
    const APPLES: ResourceId = ResourceId::from_static("apples_count");
    const MISSING: ResourceId = ResourceId::from_static("missing");

    fn table() -> Arc<ResourceTable> {
        Arc::new(
            ResourceTable::builder()
                .string(GREETING, "Hello, %1$s")
                .localized_string(langid!("fr"), GREETING, "Bonjour, %1$s")
                .localized_string(langid!("fr-CA"), GREETING, "Allô, %1$s")
                .plurals(
                    APPLES,
                    PluralForms::new().one("%d apple").other("%d apples"),
                )
                .localized_plurals(
                    langid!("ru"),
                    APPLES,
                    PluralForms::new()
                        .one("%d яблоко")
                        .few("%d яблока")
                        .many("%d яблок"),
                )
                .build(),
        )
    }

    #[test]
    fn locale_chain_picks_most_specific() {
        let t = table();
        let tr = TextDescriptor::formatted(GREETING, ["Derek"]);
        assert_eq!(tr.resolve(&t.localized(langid!("en-US"))).unwrap(), "Hello, Derek");
        assert_eq!(tr.resolve(&t.localized(langid!("fr-FR"))).unwrap(), "Bonjour, Derek");
        assert_eq!(tr.resolve(&t.localized(langid!("fr-CA"))).unwrap(), "Allô, Derek");
    }

    #[test]
    fn quantity_selects_category() {
        let t = table();
        let en = t.localized(langid!("en"));
        assert_eq!(en.quantity_string(&APPLES, 1, &[1.into()]).unwrap(), "1 apple");
        assert_eq!(en.quantity_string(&APPLES, 5, &[5.into()]).unwrap(), "5 apples");
        assert_eq!(en.quantity_string(&APPLES, 0, &[0.into()]).unwrap(), "0 apples");

        let ru = t.localized(langid!("ru-RU"));
        assert_eq!(ru.quantity_string(&APPLES, 21, &[21.into()]).unwrap(), "21 яблоко");
        assert_eq!(ru.quantity_string(&APPLES, 3, &[3.into()]).unwrap(), "3 яблока");
        assert_eq!(ru.quantity_string(&APPLES, 11, &[11.into()]).unwrap(), "11 яблок");
    }

    #[test]
    fn missing_category_falls_back_to_other() {
        let t = Arc::new(
            ResourceTable::builder()
                .plurals(APPLES, PluralForms::new().other("%d apples"))
                .build(),
        );
        let en = t.localized(langid!("en"));
        assert_eq!(en.quantity_string(&APPLES, 1, &[1.into()]).unwrap(), "1 apples");

        let only_one = Arc::new(
            ResourceTable::builder()
                .plurals(APPLES, PluralForms::new().one("one apple"))
                .build(),
        );
        let err = only_one
            .localized(langid!("en"))
            .quantity_string(&APPLES, 2, &[])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn string_and_plurals_are_separate_namespaces() {
        let t = table();
        let en = t.localized(langid!("en"));
        let err = en.format_string(&APPLES, &[]).unwrap_err();
        match err {
            ResolveError::ResourceNotFound(e) => {
                assert_eq!(e.id, APPLES);
                assert_eq!(e.kind, ResourceKind::String);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(en.quantity_string(&GREETING, 1, &[]).unwrap_err().is_not_found());
        assert!(en.format_string(&MISSING, &[]).unwrap_err().is_not_found());
    }

    #[test]
    fn format_errors_pass_through() {
        let t = table();
        let err = t
            .localized(langid!("en"))
            .format_string(&GREETING, &[])
            .unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)));
    }

    #[test]
    fn custom_resolver_may_pass_nested_text() {
        let t = table();
        let nested = TextDescriptor::custom(|ctx| {
            let count = TextDescriptor::quantity(APPLES, 2, [2]);
            ctx.format_string(&GREETING, &[FormatArg::Text(count)])
        });
        assert_eq!(
            nested.resolve(&t.localized(langid!("en"))).unwrap(),
            "Hello, 2 apples"
        );
        assert_eq!(
            t.localized(langid!("fr"))
                .format_string(&GREETING, &[TextDescriptor::literal("Derek").into()])
                .unwrap(),
            "Bonjour, Derek"
        );
    }

    #[test]
    fn raw_template_access() {
        let t = table();
        assert_eq!(t.string_template(&GREETING, &langid!("fr-BE")), Some("Bonjour, %1$s"));
        assert!(t.plural_forms(&APPLES, &langid!("ja")).is_some());
        assert!(t.contains_string(&GREETING));
        assert!(!t.contains_plurals(&GREETING));
    }
}
