//! JSON object extraction from prose-wrapped responses.

use crate::scan::JsonScanner;

/// Extract the first complete JSON object from arbitrary text.
///
/// Starts at the first `{` and walks a delimiter stack with string
/// awareness, so braces and brackets inside string literals do not
/// count. A `}` closes the nearest open object, implicitly terminating
/// any arrays opened inside it; a stray `]` that matches no open array
/// is passed over. Truncated input is completed instead of rejected: an
/// unterminated string is closed (a dangling trailing backslash is
/// dropped first) and every still-open array and object gets its closer,
/// innermost first. Text without any `{` yields `"{}"`.
///
/// The result always starts with `{` and always satisfies
/// [`crate::is_valid`].
#[must_use]
pub fn extract_json_object(text: &str) -> String {
    let Some(start) = text.find('{') else {
        return "{}".to_string();
    };
    let candidate = &text[start..];
    let mut scanner = JsonScanner::new(candidate);
    let mut stack: Vec<char> = Vec::new();
    let mut end = None;
    for scanned in scanner.by_ref() {
        if scanned.in_string {
            continue;
        }
        match scanned.ch {
            '{' | '[' => stack.push(scanned.ch),
            '}' => {
                // Close the nearest object, terminating arrays left open
                // inside it.
                while let Some(open) = stack.pop() {
                    if open == '{' {
                        break;
                    }
                }
                if stack.is_empty() {
                    end = Some(scanned.offset + 1);
                    break;
                }
            }
            ']' => {
                if stack.last() == Some(&'[') {
                    stack.pop();
                }
            }
            _ => {}
        }
    }
    match end {
        Some(end) => candidate[..end].to_string(),
        None => close_truncated(candidate, &stack, scanner.in_string(), scanner.escape_pending()),
    }
}

/// Complete a truncated object so the result scans as balanced.
fn close_truncated(candidate: &str, stack: &[char], in_string: bool, escape_pending: bool) -> String {
    let mut repaired = candidate.to_string();
    if in_string {
        if escape_pending {
            // A trailing lone backslash would absorb the quote we add.
            repaired.pop();
        }
        repaired.push('"');
    }
    for open in stack.iter().rev() {
        repaired.push(if *open == '[' { ']' } else { '}' });
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::is_valid;

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let text = "Here is the result: {\"a\": 1} hope it helps!";
        assert_eq!(extract_json_object(text), "{\"a\": 1}");
    }

    #[test]
    fn keeps_nested_objects_whole() {
        let text = "{\"a\": {\"b\": {\"c\": 3}}} trailing";
        assert_eq!(extract_json_object(text), "{\"a\": {\"b\": {\"c\": 3}}}");
    }

    #[test]
    fn ignores_braces_inside_strings() {
        let text = r#"{"a": "}}{", "b": 2}"#;
        assert_eq!(extract_json_object(text), text);
    }

    #[test]
    fn completes_truncated_object() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), r#"{"a": 1}"#);
        assert_eq!(
            extract_json_object(r#"{"a": {"b": {"c": 1"#),
            r#"{"a": {"b": {"c": 1}}}"#
        );
    }

    #[test]
    fn completes_truncated_arrays_innermost_first() {
        assert_eq!(
            extract_json_object(r#"{"facts": [{"content": "喜欢看展"#),
            r#"{"facts": [{"content": "喜欢看展"}]}"#
        );
        let completed = extract_json_object(r#"{"tags": ["a", "b"#);
        assert_eq!(completed, r#"{"tags": ["a", "b"]}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&completed).is_ok());
    }

    #[test]
    fn closes_truncated_strings() {
        assert_eq!(extract_json_object(r#"{"a": "abc"#), r#"{"a": "abc"}"#);
        // Dangling escape: the lone backslash is dropped before closing.
        assert_eq!(extract_json_object("{\"a\": \"x\\"), r#"{"a": "x"}"#);
    }

    #[test]
    fn brace_closes_through_open_arrays() {
        // The model forgot the `]`; the object still ends here.
        assert_eq!(
            extract_json_object(r#"{"a": [1, 2} trailing"#),
            r#"{"a": [1, 2}"#
        );
    }

    #[test]
    fn no_object_yields_empty_object() {
        assert_eq!(extract_json_object("no json here"), "{}");
        assert_eq!(extract_json_object(""), "{}");
    }

    #[test]
    fn completion_is_idempotent_and_valid() {
        for raw in [
            r#"{"a": 1"#,
            r#"{"a": {"b": {"c": 1"#,
            r#"{"a": "abc"#,
            "{\"a\": \"x\\",
            r#"{"facts": [{"content": "喜欢看展"#,
            r#"{"a": [1, 2} trailing"#,
            r#"{"a": ]1}"#,
            "prose only",
        ] {
            let once = extract_json_object(raw);
            assert!(is_valid(&once), "extraction must balance: {raw:?}");
            assert_eq!(extract_json_object(&once), once, "input: {raw:?}");
        }
    }
}
