//! Built-in domain result types for the app's three AI operations.
//!
//! Canonical JSON keys are the camelCase names the prompt templates ask
//! the model for; the Field Mapper rewrites localized variants onto them
//! before decoding. Non-mandatory fields default so that a partial object
//! covering the mandatory set always decodes.
//!
//! Degraded defaults carry fixed Chinese user copy that reads as an
//! unavailability notice. A default must never look like a real answer.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::context::{FallbackContext, OperationKind};
use crate::de::truthy_label;
use crate::target::{ParseTarget, PartialFields};

/// Result of analyzing a received conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Detected emotional tone of the message.
    pub emotion: String,
    /// Estimated interest level, 0 (cold) to 100 (very engaged).
    #[serde(
        default = "default_interest_level",
        deserialize_with = "crate::de::lenient_score"
    )]
    pub interest_level: u8,
    /// Suggested replies, best first.
    #[serde(default)]
    pub reply_suggestions: Vec<String>,
    /// Free-form reading of the message.
    pub analysis: String,
}

fn default_interest_level() -> u8 {
    50
}

impl ParseTarget for AnalysisResult {
    const NAME: &'static str = "AnalysisResult";

    fn operation_kind() -> OperationKind {
        OperationKind::MessageAnalysis
    }

    fn mandatory_fields() -> &'static [&'static str] {
        &["emotion", "analysis"]
    }

    fn degraded_default() -> Option<Self> {
        Some(Self {
            emotion: "未知".to_string(),
            interest_level: 50,
            reply_suggestions: vec!["AI 暂时无法生成建议，请稍后重试".to_string()],
            analysis: "AI 暂时无法完成分析，请稍后再试".to_string(),
        })
    }

    fn infer_from_partial(fields: &PartialFields, _ctx: &FallbackContext) -> Option<Self> {
        let emotion = string_field(fields, "emotion");
        let analysis = string_field(fields, "analysis");
        if emotion.is_none() && analysis.is_none() {
            return None;
        }
        let base = Self::degraded_default()?;
        Some(Self {
            emotion: emotion.unwrap_or(base.emotion),
            interest_level: score_field(fields, "interestLevel").unwrap_or(50),
            reply_suggestions: string_list_field(fields, "replySuggestions").unwrap_or_default(),
            analysis: analysis.unwrap_or(base.analysis),
        })
    }
}

/// Risk classification for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lenient label mapping; unrecognized labels read as `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "低" | "轻微" => Self::Low,
            "medium" | "中" | "中等" => Self::Medium,
            "high" | "高" | "严重" | "危险" => Self::High,
            _ => Self::None,
        }
    }

    /// True for levels that should flip a safety verdict.
    #[must_use]
    pub fn is_risky(self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RiskVisitor;

        impl Visitor<'_> for RiskVisitor {
            type Value = RiskLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a risk level label or ordinal")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RiskLevel, E> {
                Ok(RiskLevel::from_label(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<RiskLevel, E> {
                Ok(match value {
                    0 => RiskLevel::None,
                    1 => RiskLevel::Low,
                    2 => RiskLevel::Medium,
                    _ => RiskLevel::High,
                })
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<RiskLevel, E> {
                if value <= 0 {
                    Ok(RiskLevel::None)
                } else {
                    self.visit_u64(value as u64)
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<RiskLevel, E> {
                Ok(RiskLevel::None)
            }
        }

        deserializer.deserialize_any(RiskVisitor)
    }
}

/// Result of checking an outbound message before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyCheckResult {
    /// Whether the message is safe to send as written.
    #[serde(deserialize_with = "crate::de::lenient_bool")]
    pub is_safe: bool,
    /// Risk classification; absent or unrecognized values read as none.
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Advice shown to the user alongside the verdict.
    pub suggestion: String,
}

impl ParseTarget for SafetyCheckResult {
    const NAME: &'static str = "SafetyCheckResult";

    fn operation_kind() -> OperationKind {
        OperationKind::SafetyCheck
    }

    fn mandatory_fields() -> &'static [&'static str] {
        &["isSafe", "suggestion"]
    }

    fn degraded_default() -> Option<Self> {
        // Unavailability must not block the user's own message; the copy
        // makes the missing check explicit.
        Some(Self {
            is_safe: true,
            risk_level: RiskLevel::None,
            suggestion: "AI 暂时无法完成安全检查，请谨慎发送并稍后重试".to_string(),
        })
    }

    fn infer_from_partial(fields: &PartialFields, _ctx: &FallbackContext) -> Option<Self> {
        let risk_level = fields
            .get("riskLevel")
            .map_or(RiskLevel::None, risk_from_value);
        // A missing verdict is read off the risk indicators: no risky
        // signal means safe.
        let is_safe = bool_field(fields, "isSafe").unwrap_or(!risk_level.is_risky());
        let suggestion = string_field(fields, "suggestion").unwrap_or_else(|| {
            if is_safe {
                "未检测到明显风险，请结合语境自行判断".to_string()
            } else {
                "检测到潜在风险，建议调整表述后再发送".to_string()
            }
        });
        Some(Self {
            is_safe,
            risk_level,
            suggestion,
        })
    }
}

/// One fact extracted from a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFact {
    /// Coarse category label ("preference", "schedule", ...).
    #[serde(default)]
    pub category: String,
    /// The fact itself, in the user's language.
    pub content: String,
}

/// Facts extracted from a conversation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFacts {
    pub facts: Vec<ExtractedFact>,
    /// One-line summary of the window.
    #[serde(default)]
    pub summary: String,
}

impl ParseTarget for ExtractedFacts {
    const NAME: &'static str = "ExtractedFacts";

    fn operation_kind() -> OperationKind {
        OperationKind::FactExtraction
    }

    fn mandatory_fields() -> &'static [&'static str] {
        &["facts"]
    }

    fn degraded_default() -> Option<Self> {
        Some(Self {
            facts: Vec::new(),
            summary: "AI 暂时无法提取对话要点，请稍后重试".to_string(),
        })
    }

    fn infer_from_partial(fields: &PartialFields, _ctx: &FallbackContext) -> Option<Self> {
        let facts = fields.get("facts").map_or_else(Vec::new, salvage_facts);
        let summary = string_field(fields, "summary");
        if facts.is_empty() && summary.is_none() {
            return None;
        }
        let summary = summary.unwrap_or_else(|| format!("共提取 {} 条信息", facts.len()));
        Some(Self { facts, summary })
    }
}

/// Keep whatever entries of a malformed facts value still look like facts.
fn salvage_facts(value: &Value) -> Vec<ExtractedFact> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value(item.clone()).ok(),
            Value::String(s) if !s.trim().is_empty() => Some(ExtractedFact {
                category: String::new(),
                content: s.trim().to_string(),
            }),
            _ => None,
        })
        .collect()
}

fn string_field(fields: &PartialFields, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn string_list_field(fields: &PartialFields, key: &str) -> Option<Vec<String>> {
    let Value::Array(items) = fields.get(key)? else {
        return None;
    };
    let list: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect();
    if list.is_empty() { None } else { Some(list) }
}

fn score_field(fields: &PartialFields, key: &str) -> Option<u8> {
    let raw = match fields.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(raw.clamp(0.0, 100.0).round() as u8)
}

fn bool_field(fields: &PartialFields, key: &str) -> Option<bool> {
    match fields.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => truthy_label(s),
        _ => None,
    }
}

fn risk_from_value(value: &Value) -> RiskLevel {
    match value {
        Value::String(s) => RiskLevel::from_label(s),
        Value::Number(n) => match n.as_u64() {
            Some(0) | None => RiskLevel::None,
            Some(1) => RiskLevel::Low,
            Some(2) => RiskLevel::Medium,
            Some(_) => RiskLevel::High,
        },
        _ => RiskLevel::None,
    }
}
