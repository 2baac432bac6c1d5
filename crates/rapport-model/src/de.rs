//! Lenient deserializers for scalar fields that models routinely mistype.
//!
//! Completion output frequently quotes booleans (`"true"`), localizes them
//! (`"是"`) or turns numbers into strings. These helpers accept the forms
//! seen in practice while rejecting anything genuinely ambiguous, so a
//! mistyped scalar does not push an otherwise good response into fallback
//! handling.

use std::fmt;

use serde::Deserializer;
use serde::de::{self, Unexpected, Visitor};

/// Map a boolean-like label to a verdict.
///
/// Shared by the serde visitor and the inference helpers so both accept
/// exactly the same spellings.
#[must_use]
pub fn truthy_label(label: &str) -> Option<bool> {
    match label.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "是" | "安全" => Some(true),
        "false" | "no" | "n" | "0" | "否" | "不安全" => Some(false),
        _ => None,
    }
}

/// Deserialize a bool, also accepting string and numeric spellings.
///
/// # Errors
///
/// Fails on values that are not recognizably boolean (arbitrary strings,
/// arrays, objects).
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl Visitor<'_> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or a boolean-like string or number")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<bool, E> {
            Ok(value != 0.0)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            truthy_label(value)
                .ok_or_else(|| de::Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

/// Deserialize a 0-100 score, also accepting floats and numeric strings.
/// Out-of-range values are clamped.
///
/// # Errors
///
/// Fails on non-numeric strings and non-scalar values.
pub fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScoreVisitor;

    impl Visitor<'_> for ScoreVisitor {
        type Value = u8;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a score between 0 and 100")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u8, E> {
            Ok(clamp_score(value as f64))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u8, E> {
            Ok(clamp_score(value as f64))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u8, E> {
            Ok(clamp_score(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u8, E> {
            value
                .trim()
                .parse::<f64>()
                .map(clamp_score)
                .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}
