//! Structural repairs: comma insertion, brace balance, last-resort fixes.

use std::cmp::Ordering;

use crate::scan::JsonScanner;

/// Insert the comma missing between a closing brace and a following
/// quoted key (`... } "next": ...`), a common shape when a model drops
/// the separator between object members. String-aware; whitespace between
/// the brace and the quote is tolerated.
#[must_use]
pub fn insert_missing_commas(text: &str) -> String {
    let mut inserts: Vec<usize> = Vec::new();
    let mut pending: Option<usize> = None;
    for scanned in JsonScanner::new(text) {
        if scanned.in_string {
            continue;
        }
        match scanned.ch {
            '}' => pending = Some(scanned.offset + 1),
            '"' => {
                if let Some(at) = pending.take() {
                    inserts.push(at);
                }
            }
            c if c.is_whitespace() => {}
            _ => pending = None,
        }
    }
    if inserts.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + inserts.len());
    let mut from = 0;
    for at in inserts {
        out.push_str(&text[from..at]);
        out.push(',');
        from = at;
    }
    out.push_str(&text[from..]);
    out
}

/// Structural validity: a `{` exists, string-aware open/close brace
/// counts match from the first `{` on, and no string literal is left
/// unterminated.
#[must_use]
pub fn is_valid(text: &str) -> bool {
    let Some(start) = text.find('{') else {
        return false;
    };
    let (opens, closes, in_string) = brace_counts(&text[start..]);
    opens == closes && !in_string
}

/// Append missing closing braces, or strip excess trailing ones one at a
/// time. Returns `None` when counting cannot reconcile the text (the
/// excess braces are not trailing, or a string is unterminated).
#[must_use]
pub fn rebalance_braces(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let (opens, closes, in_string) = brace_counts(&text[start..]);
    if in_string {
        return None;
    }
    match opens.cmp(&closes) {
        Ordering::Equal => Some(text.to_string()),
        Ordering::Greater => {
            let mut repaired = text.to_string();
            for _ in closes..opens {
                repaired.push('}');
            }
            Some(repaired)
        }
        Ordering::Less => {
            let mut repaired = text.to_string();
            let mut excess = closes - opens;
            while excess > 0 {
                let trimmed = repaired.trim_end();
                if !trimmed.ends_with('}') {
                    return None;
                }
                repaired.truncate(trimmed.len() - 1);
                excess -= 1;
            }
            Some(repaired)
        }
    }
}

/// Last-resort repair for text that still fails [`is_valid`]: brace
/// rebalancing, then a first-`{`-to-last-`}` slice, then the empty
/// object. The result always satisfies [`is_valid`].
#[must_use]
pub fn validate_and_fix(text: &str) -> String {
    if is_valid(text) {
        return text.to_string();
    }
    if let Some(rebalanced) = rebalance_braces(text)
        && is_valid(&rebalanced)
    {
        return rebalanced;
    }
    if let Some(sliced) = slice_object(text)
        && is_valid(&sliced)
    {
        return sliced;
    }
    "{}".to_string()
}

fn slice_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}

fn brace_counts(text: &str) -> (usize, usize, bool) {
    let mut scanner = JsonScanner::new(text);
    let mut opens = 0usize;
    let mut closes = 0usize;
    for scanned in scanner.by_ref() {
        if scanned.in_string {
            continue;
        }
        match scanned.ch {
            '{' => opens += 1,
            '}' => closes += 1,
            _ => {}
        }
    }
    (opens, closes, scanner.in_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_comma_between_members() {
        let text = r#"{"a": {"x": 1} "b": 2}"#;
        let fixed = insert_missing_commas(text);
        assert_eq!(fixed, r#"{"a": {"x": 1}, "b": 2}"#);
        let value: serde_json::Value = serde_json::from_str(&fixed).expect("fixed decodes");
        assert_eq!(value["b"], 2);
    }

    #[test]
    fn tolerates_newlines_before_the_key() {
        let text = "{\"a\": {}\n  \"b\": 2}";
        assert_eq!(insert_missing_commas(text), "{\"a\": {},\n  \"b\": 2}");
    }

    #[test]
    fn leaves_separated_members_alone() {
        for text in [
            r#"{"a": {"x": 1}, "b": 2}"#,
            r#"{"a": "}\" tricky", "b": 2}"#,
            r#"{"a": 1}"#,
        ] {
            assert_eq!(insert_missing_commas(text), text);
        }
    }

    #[test]
    fn insertion_is_idempotent() {
        let text = r#"{"a": {} "b": {} "c": 3}"#;
        let once = insert_missing_commas(text);
        assert_eq!(insert_missing_commas(&once), once);
    }

    #[test]
    fn validity_requires_matched_braces_outside_strings() {
        assert!(is_valid(r#"{"a": 1}"#));
        assert!(is_valid(r#"{"a": "}"}"#));
        assert!(!is_valid(r#"{"a": 1"#));
        assert!(!is_valid(r#"{"a": "unterminated}"#));
        assert!(!is_valid("no braces"));
    }

    #[test]
    fn rebalance_appends_missing_braces() {
        assert_eq!(
            rebalance_braces(r#"{"a": {"b": 1"#).as_deref(),
            Some(r#"{"a": {"b": 1}}"#)
        );
    }

    #[test]
    fn rebalance_strips_excess_trailing_braces() {
        assert_eq!(
            rebalance_braces("{\"a\": 1}}} \n").as_deref(),
            Some(r#"{"a": 1}"#)
        );
    }

    #[test]
    fn rebalance_refuses_non_trailing_excess() {
        assert_eq!(rebalance_braces(r#"{"a"}}: 1"#), None);
        assert_eq!(rebalance_braces(r#"{"a": "open"#), None);
    }

    #[test]
    fn fix_ladder_slices_when_rebalance_fails() {
        // Trailing prose opens a stray string, so counting refuses; the
        // first-to-last slice recovers the object.
        let text = "{\"a\": 1} and then \"oops";
        assert_eq!(validate_and_fix(text), "{\"a\": 1}");
    }

    #[test]
    fn fix_ladder_floor_is_the_empty_object() {
        assert_eq!(validate_and_fix("no json at all"), "{}");
        assert_eq!(validate_and_fix(""), "{}");
    }

    #[test]
    fn fix_output_is_always_valid() {
        for text in [
            r#"{"a": 1}"#,
            r#"{"a": {"b": 1"#,
            "{\"a\": 1}}}",
            "{\"a\": 1} and then \"oops",
            r#"{"a"}}: 1"#,
            "garbage",
            "",
        ] {
            assert!(is_valid(&validate_and_fix(text)), "input: {text:?}");
        }
    }
}
