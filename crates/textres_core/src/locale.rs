use unic_langid::LanguageIdentifier;

use crate::error::LocaleError;

/// Normalize locale identifiers to a canonical-ish form before parsing.
///
/// - Converts `_` to `-` (platforms often report `en_US`).
/// - Trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-")
}

/// Parse a locale string such as `fr-FR` or `en_US`.
pub fn parse_locale(s: &str) -> Result<LanguageIdentifier, LocaleError> {
    let normalized = normalize_locale(s);
    normalized
        .parse::<LanguageIdentifier>()
        .map_err(|source| LocaleError {
            input: s.to_string(),
            source,
        })
}

/// Lookup chain for a locale, most specific first.
///
/// `sr-Latn-RS` -> `["sr-Latn-RS", "sr-Latn", "sr"]`. The unqualified default
/// bucket is not part of the chain; callers fall back to it last.
pub fn locale_fallback_chain(locale: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let mut chain = vec![locale.clone()];

    if locale.region.is_some() && locale.script.is_some() {
        let mut no_region = locale.clone();
        no_region.region = None;
        push_unique(&mut chain, no_region);
    }

    let mut lang_only = LanguageIdentifier::default();
    lang_only.language = locale.language;
    if !lang_only.language.is_empty() {
        push_unique(&mut chain, lang_only);
    }

    chain
}

fn push_unique(chain: &mut Vec<LanguageIdentifier>, id: LanguageIdentifier) {
    if !chain.contains(&id) {
        chain.push(id);
    }
}
