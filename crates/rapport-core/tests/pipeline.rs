use rapport_core::{ParseOutcome, ResponseParser};
use rapport_model::{
    CleaningContext, FallbackStrategy, OperationKind, ParseTarget, ParsingContext,
};
use serde::{Deserialize, Serialize};

fn ctx(operation: OperationKind) -> ParsingContext {
    ParsingContext::new("op-123", "test-model", operation)
}

#[test]
fn fenced_chinese_safety_reply_parses_through_the_builtin_table() {
    let parser = ResponseParser::new();
    let raw = "```json\n{\"安全\": \"true\", \"建议\": \"少聊敏感话题\"}\n```";
    let outcome = parser.parse_safety_check(raw, &ctx(OperationKind::SafetyCheck));
    match outcome {
        ParseOutcome::Parsed(value) => {
            assert!(value.is_safe);
            assert_eq!(value.suggestion, "少聊敏感话题");
        }
        other => panic!("expected a direct parse, got {other:?}"),
    }
}

#[test]
fn plain_refusal_recovers_with_the_canned_default() {
    let parser = ResponseParser::new();
    let outcome = parser.parse_safety_check("not json at all", &ctx(OperationKind::SafetyCheck));
    match outcome {
        ParseOutcome::Recovered {
            value,
            strategy,
            confidence,
        } => {
            assert_eq!(strategy, FallbackStrategy::UseDefaultValues);
            assert!((confidence - 0.30).abs() < f32::EPSILON);
            assert!(value.is_safe);
            assert!(value.suggestion.contains("稍后重试"));
        }
        other => panic!("expected a default-values recovery, got {other:?}"),
    }
}

#[test]
fn truncated_fact_list_parses_after_completion() {
    let parser = ResponseParser::new();
    let raw = "以下是对话要点：{\"facts\": [{\"category\": \"爱好\", \"content\": \"喜欢爬山";
    let outcome = parser.parse_extracted_facts(raw, &ctx(OperationKind::FactExtraction));
    let value = outcome.into_value().expect("completion makes this decodable");
    assert_eq!(value.facts.len(), 1);
    assert_eq!(value.facts[0].content, "喜欢爬山");
}

#[test]
fn null_list_field_is_salvaged_as_partial_data() {
    let parser = ResponseParser::new();
    let raw = r#"{"emotion": "开心", "analysis": "对方很积极", "replySuggestions": null}"#;
    let outcome = parser.parse_analysis(raw, &ctx(OperationKind::MessageAnalysis));
    match outcome {
        ParseOutcome::Recovered {
            value,
            strategy,
            confidence,
        } => {
            assert_eq!(strategy, FallbackStrategy::UsePartialData);
            assert!((confidence - 0.60).abs() < f32::EPSILON);
            assert_eq!(value.emotion, "开心");
            assert_eq!(value.analysis, "对方很积极");
            assert!(!value.reply_suggestions.is_empty(), "default list fills the gap");
        }
        other => panic!("expected a partial-data recovery, got {other:?}"),
    }
}

#[test]
fn surviving_suggestion_is_enough_for_inference() {
    let parser = ResponseParser::new();
    let raw = r#"{"风险等级": "低", "建议": "可以发送", "isSafe": "说不清"}"#;
    let outcome = parser.parse_safety_check(raw, &ctx(OperationKind::SafetyCheck));
    match outcome {
        ParseOutcome::Recovered {
            value, strategy, ..
        } => {
            assert_eq!(strategy, FallbackStrategy::IntelligentInference);
            assert!(value.is_safe, "low risk implies safe");
            assert_eq!(value.suggestion, "可以发送");
        }
        other => panic!("expected an inference recovery, got {other:?}"),
    }
}

#[test]
fn inference_can_be_disabled_at_build_time() {
    let parser = ResponseParser::builder().with_inference(false).build();
    let raw = r#"{"建议": "可以发送"}"#;
    let outcome = parser.parse_safety_check(raw, &ctx(OperationKind::SafetyCheck));
    assert_eq!(outcome.strategy(), Some(FallbackStrategy::UseDefaultValues));
}

#[test]
fn cleaning_toggles_flow_through_the_builder() {
    let parser = ResponseParser::builder()
        .with_cleaning(CleaningContext::new().with_unicode_fix(false))
        .build();
    let raw = "{\"emotion\": \"\\u5f00\\u5fc3\", \"analysis\": \"ok\"}";
    let outcome = parser.parse_analysis(raw, &ctx(OperationKind::MessageAnalysis));
    let value = outcome.into_value().expect("legal json escapes still decode");
    assert_eq!(value.emotion, "开心");
}

#[derive(Debug, Serialize, Deserialize)]
struct Handshake {
    token: String,
}

impl ParseTarget for Handshake {
    const NAME: &'static str = "Handshake";

    fn operation_kind() -> OperationKind {
        OperationKind::Generic
    }

    fn mandatory_fields() -> &'static [&'static str] {
        &["token"]
    }

    fn degraded_default() -> Option<Self> {
        None
    }
}

#[test]
fn type_without_default_reports_failure_with_the_attempted_ladder() {
    let parser = ResponseParser::new();
    let outcome: ParseOutcome<Handshake> = parser.parse("???", &ctx(OperationKind::Generic));
    match outcome {
        ParseOutcome::Failed(failure) => {
            assert_eq!(
                failure.attempted,
                vec![
                    FallbackStrategy::UsePartialData,
                    FallbackStrategy::IntelligentInference,
                    FallbackStrategy::UseDefaultValues,
                ]
            );
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn identical_responses_parse_identically() {
    let parser = ResponseParser::new();
    let raw = "```json\n{\"情绪\": \"平静\", \"分析\": \"语气自然\", \"好感度\": \"七十\"\n```";
    let run = || {
        let outcome = parser.parse_analysis(raw, &ctx(OperationKind::MessageAnalysis));
        let strategy = outcome.strategy();
        let value = outcome.into_value().expect("recovers");
        (
            serde_json::to_string(&value).expect("analysis serializes"),
            strategy,
        )
    };
    assert_eq!(run(), run());
}
