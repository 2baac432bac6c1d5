//! Properties that must hold for every input: mapping is total, only
//! key spans change, and mapping its own output changes nothing.

use proptest::prelude::*;
use rapport_map::FieldMapper;
use rapport_model::MappingContext;

fn contexts() -> Vec<MappingContext> {
    vec![
        MappingContext::default(),
        MappingContext::new().with_fuzzy_matching(true),
        MappingContext::new()
            .with_fuzzy_matching(true)
            .with_fuzzy_threshold(0.95),
    ]
}

fn canonical_names() -> Vec<&'static str> {
    vec![
        "isSafe",
        "riskLevel",
        "suggestion",
        "emotion",
        "interestLevel",
        "analysis",
        "facts",
        "summary",
    ]
}

/// Built-in alternates paired with the canonical name they map to.
fn alternate_pairs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("安全", "isSafe"),
        ("风险等级", "riskLevel"),
        ("建议", "suggestion"),
        ("情绪", "emotion"),
        ("兴趣度", "interestLevel"),
        ("分析", "analysis"),
        ("事实", "facts"),
        ("总结", "summary"),
    ]
}

proptest! {
    #[test]
    fn mapping_is_total_and_idempotent(raw in ".*") {
        let mapper = FieldMapper::builtin();
        for ctx in contexts() {
            let once = mapper.map_fields(&raw, &ctx);
            prop_assert_eq!(mapper.map_fields(&once, &ctx), once, "ctx: {:?}", ctx);
        }
    }

    #[test]
    fn empty_table_is_the_identity(raw in ".*") {
        let mut mapper = FieldMapper::builtin();
        mapper.clear_mappings();
        let ctx = MappingContext::new().with_fuzzy_matching(true);
        prop_assert_eq!(mapper.map_fields(&raw, &ctx), raw);
    }

    #[test]
    fn canonical_objects_pass_through_untouched(
        members in prop::collection::btree_map(
            prop::sample::select(canonical_names()),
            "[a-z0-9安全建议 ]{0,8}",
            0..5,
        ),
    ) {
        let object: serde_json::Map<String, serde_json::Value> = members
            .into_iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::from(value)))
            .collect();
        let text = serde_json::Value::Object(object).to_string();
        let mapper = FieldMapper::builtin();
        for ctx in contexts() {
            prop_assert_eq!(mapper.map_fields(&text, &ctx), text.clone(), "ctx: {:?}", ctx);
        }
    }

    #[test]
    fn alternate_keyed_objects_decode_canonically(
        chosen in prop::sample::subsequence(alternate_pairs(), 1..=4),
        values in prop::collection::vec("[a-z0-9安全建议 ]{0,8}", 4),
    ) {
        let mut object = serde_json::Map::new();
        for ((alternate, _), value) in chosen.iter().zip(&values) {
            object.insert((*alternate).to_string(), serde_json::Value::from(value.clone()));
        }
        let text = serde_json::Value::Object(object).to_string();
        let mapped = FieldMapper::builtin().map_fields(&text, &MappingContext::default());
        let decoded: serde_json::Value =
            serde_json::from_str(&mapped).expect("mapped text decodes");
        for ((alternate, canonical), value) in chosen.iter().zip(&values) {
            prop_assert_eq!(
                &decoded[*canonical],
                &serde_json::Value::from(value.clone()),
                "alternate {} must land on {}",
                alternate,
                canonical
            );
        }
    }
}
