//! Response text cleaning.
//!
//! Completion text rarely arrives as bare JSON: models wrap it in
//! markdown fences, preface it with prose, double-escape Unicode, drop
//! commas and truncate mid-object. This crate turns such text into the
//! most plausible JSON object string it contains.
//!
//! Every function here is total. Malformed input degrades to a
//! best-effort string, never an error; `"{}"` is the floor. Cleaning the
//! output of a clean is a no-op, so retrying a pipeline over its own
//! result cannot oscillate.

mod escape;
mod extract;
mod fence;
mod repair;
mod scan;

pub use escape::decode_unicode_escapes;
pub use extract::extract_json_object;
pub use fence::strip_code_fences;
pub use repair::{insert_missing_commas, is_valid, rebalance_braces, validate_and_fix};

use rapport_model::CleaningContext;
use tracing::{debug, trace};

/// The cleaning stage of the parsing pipeline.
///
/// Stage order: fence stripping, Unicode-escape repair, object
/// extraction, comma repair, then (only with `fuzzy_repair`) the
/// last-resort [`validate_and_fix`] ladder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaner;

impl Cleaner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Clean raw response text into a decodable JSON object candidate.
    ///
    /// Total and panic-free; the result always starts with `{` and scans
    /// as brace-balanced.
    #[must_use]
    pub fn clean(&self, raw: &str, ctx: &CleaningContext) -> String {
        let fenced = strip_code_fences(raw);
        if ctx.verbose && fenced.len() != raw.len() {
            debug!(
                removed = raw.len() - fenced.len(),
                "stripped markdown code fence"
            );
        }
        let unescaped = if ctx.fix_unicode_escapes {
            decode_unicode_escapes(fenced)
        } else {
            fenced.to_string()
        };
        if ctx.verbose && unescaped != fenced {
            debug!("decoded unicode escape sequences");
        }
        let extracted = extract_json_object(&unescaped);
        if ctx.verbose && extracted != unescaped {
            debug!(len = extracted.len(), "extracted json object candidate");
        }
        let mut cleaned = extracted;
        if ctx.fix_structure {
            let repaired = insert_missing_commas(&cleaned);
            if repaired != cleaned {
                debug!("inserted missing commas between object members");
                cleaned = repaired;
            }
        }
        if ctx.fuzzy_repair && !is_valid(&cleaned) {
            cleaned = validate_and_fix(&cleaned);
            debug!(len = cleaned.len(), "applied last-resort structural repair");
        }
        trace!(len = cleaned.len(), "cleaning finished");
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_runs_all_stages_in_order() {
        let raw = "```json\n{\"说明\": \"\\u4f60\\u597d\", \"层\": {\"x\": 1} \"后\": 2\n```";
        let cleaned = Cleaner::new().clean(raw, &CleaningContext::default());
        let value: serde_json::Value = serde_json::from_str(&cleaned).expect("cleaned decodes");
        assert_eq!(value["说明"], "你好");
        assert_eq!(value["后"], 2);
    }

    #[test]
    fn disabled_stages_stay_disabled() {
        let ctx = CleaningContext::new()
            .with_unicode_fix(false)
            .with_structure_fix(false);
        let cleaned = Cleaner::new().clean(r#"{"a": "你"} "#, &ctx);
        assert_eq!(cleaned, r#"{"a": "你"}"#);
    }

    #[test]
    fn floor_is_the_empty_object() {
        let cleaned = Cleaner::new().clean("not json at all", &CleaningContext::default());
        assert_eq!(cleaned, "{}");
    }
}
