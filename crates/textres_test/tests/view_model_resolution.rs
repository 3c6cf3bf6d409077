//! Resolving view-model output in tests
//!
//! A small view-model produces descriptors; these tests check the text they
//! resolve to in several locales without any UI runtime.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use textres_core::{
    formatted, quantity, PluralForms, ResolveError, ResourceId, ResourceKind, ResourceTable,
    TextDescriptor,
};
use textres_test::{init_test_logging, resolve_with_locale, TestResolver};
use unic_langid::langid;

const GREETING: ResourceId = ResourceId::from_static("greeting");
const APPLES: ResourceId = ResourceId::from_static("apples_count");
const UNKNOWN: ResourceId = ResourceId::from_static("unknown_id");

fn resources() -> Arc<ResourceTable> {
    Arc::new(
        ResourceTable::builder()
            .string(GREETING, "Hello, %1$s")
            .localized_string(langid!("fr"), GREETING, "Bonjour, %1$s")
            .plurals(APPLES, PluralForms::new().one("%d apple").other("%d apples"))
            .localized_plurals(
                langid!("fr"),
                APPLES,
                PluralForms::new().one("%d pomme").other("%d pommes"),
            )
            .build(),
    )
}

struct BasketViewModel {
    owner: String,
    apples: i64,
}

impl BasketViewModel {
    fn greeting(&self) -> TextDescriptor {
        formatted!(GREETING, self.owner.as_str())
    }

    fn apples(&self) -> TextDescriptor {
        quantity!(APPLES, self.apples, self.apples)
    }
}

#[test]
fn test_greeting_per_locale() {
    init_test_logging();
    let vm = BasketViewModel {
        owner: "Derek".into(),
        apples: 0,
    };
    let resolver = TestResolver::new(resources());

    assert_eq!(resolver.resolve(&vm.greeting()).unwrap(), "Hello, Derek");
    assert_eq!(
        resolver
            .resolve_with_locale(&vm.greeting(), &langid!("fr"))
            .unwrap(),
        "Bonjour, Derek"
    );
}

#[test]
fn test_apples_plurals() {
    let resources = resources();
    let en = langid!("en-US");
    let cases = [(1, "1 apple"), (5, "5 apples"), (0, "0 apples")];

    for (apples, expected) in cases {
        let vm = BasketViewModel {
            owner: String::new(),
            apples,
        };
        assert_eq!(resolve_with_locale(&resources, &vm.apples(), &en).unwrap(), expected);
    }

    // French treats zero as singular.
    let vm = BasketViewModel {
        owner: String::new(),
        apples: 0,
    };
    assert_eq!(
        resolve_with_locale(&resources, &vm.apples(), &langid!("fr-CA")).unwrap(),
        "0 pomme"
    );
}

#[test]
fn test_literal_and_custom() {
    let resolver = TestResolver::new(resources());

    assert_eq!(resolver.resolve(&TextDescriptor::literal("raw")).unwrap(), "raw");
    let custom = TextDescriptor::custom(|_| Ok("Hello, World".to_string()));
    assert_eq!(
        resolver.resolve_with_locale(&custom, &langid!("ja")).unwrap(),
        "Hello, World"
    );
}

#[test]
fn test_unknown_resource_is_not_found() {
    let resolver = TestResolver::new(resources());

    match resolver.resolve(&TextDescriptor::resource(UNKNOWN)) {
        Err(ResolveError::ResourceNotFound(err)) => {
            assert_eq!(err.id, UNKNOWN);
            assert_eq!(err.kind, ResourceKind::String);
        }
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_parallel_locales_are_independent() {
    let resources = resources();
    let greeting = formatted!(GREETING, "Derek");

    let handles: Vec<_> = [langid!("en"), langid!("fr"), langid!("en-GB"), langid!("fr-BE")]
        .into_iter()
        .map(|locale| {
            let resources = Arc::clone(&resources);
            let greeting = greeting.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| resolve_with_locale(&resources, &greeting, &locale))
                    .collect::<Result<Vec<_>, _>>()
            })
        })
        .collect();

    let results: Vec<Vec<String>> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    for (texts, expected) in results
        .iter()
        .zip(["Hello, Derek", "Bonjour, Derek", "Hello, Derek", "Bonjour, Derek"])
    {
        assert!(texts.iter().all(|t| t == expected));
    }
}

#[test]
fn test_resolver_from_config_file() {
    let path = std::env::temp_dir().join(format!("textres-test-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "default_locale = \"fr-FR\"").unwrap();
    drop(file);

    let resolver = TestResolver::from_config_file(resources(), &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        resolver.resolve(&formatted!(GREETING, "Derek")).unwrap(),
        "Bonjour, Derek"
    );
    assert!(TestResolver::from_config_file(resources(), &path).is_err());
}
