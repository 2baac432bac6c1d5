//! Properties that must hold for every input: cleaning is total, its
//! output scans as a balanced object, and cleaning its own output
//! changes nothing.

use proptest::prelude::*;
use rapport_clean::{Cleaner, is_valid};
use rapport_model::CleaningContext;

fn contexts() -> Vec<CleaningContext> {
    let mut all = Vec::new();
    for unicode in [false, true] {
        for structure in [false, true] {
            for fuzzy in [false, true] {
                all.push(
                    CleaningContext::new()
                        .with_unicode_fix(unicode)
                        .with_structure_fix(structure)
                        .with_fuzzy_repair(fuzzy),
                );
            }
        }
    }
    all
}

fn json_soup() -> impl Strategy<Value = String> {
    let glyphs = prop::sample::select("{}[]\",:\\ \n`au1你好".chars().collect::<Vec<_>>());
    prop::collection::vec(glyphs, 0..64).prop_map(|chars| chars.into_iter().collect())
}

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i32>().prop_map(serde_json::Value::from),
        "[a-z0-9你好安全 ]{0,8}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| serde_json::Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn clean_never_panics_and_yields_an_object(raw in ".*") {
        for ctx in contexts() {
            let cleaned = Cleaner::new().clean(&raw, &ctx);
            prop_assert!(cleaned.starts_with('{'), "got {cleaned:?}");
            prop_assert!(is_valid(&cleaned), "unbalanced: {cleaned:?}");
        }
    }

    #[test]
    fn clean_is_idempotent_for_every_toggle(raw in ".*") {
        for ctx in contexts() {
            let once = Cleaner::new().clean(&raw, &ctx);
            let twice = Cleaner::new().clean(&once, &ctx);
            prop_assert_eq!(&twice, &once, "ctx: {:?}", ctx);
        }
    }

    #[test]
    fn json_soup_cleans_to_a_stable_balanced_object(raw in json_soup()) {
        for ctx in contexts() {
            let once = Cleaner::new().clean(&raw, &ctx);
            prop_assert!(once.starts_with('{'), "got {once:?}");
            prop_assert!(is_valid(&once));
            prop_assert_eq!(Cleaner::new().clean(&once, &ctx), once);
        }
    }

    #[test]
    fn serialized_objects_pass_through_untouched(
        members in prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..4),
    ) {
        let object = serde_json::Value::Object(members.into_iter().collect());
        let text = object.to_string();
        let cleaned = Cleaner::new().clean(&text, &CleaningContext::default());
        prop_assert_eq!(&cleaned, &text);
        let reparsed: serde_json::Value =
            serde_json::from_str(&cleaned).expect("clean output of valid json decodes");
        prop_assert_eq!(reparsed, object);
    }
}
