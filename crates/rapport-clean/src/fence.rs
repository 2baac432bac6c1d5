//! Markdown code-fence stripping.

/// Strip a wrapping markdown code fence from response text.
///
/// Models asked for JSON frequently wrap it in ```` ```json ... ``` ````.
/// When the text starts with a fence (leading whitespace tolerated), the
/// content between the opening fence line and the last ```` ``` ```` is
/// returned; pairing with the last marker keeps fenced values containing
/// backticks intact. Text that does not start with a fence passes through
/// unchanged, so cleaned output (which starts with `{`) is never
/// re-stripped.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.trim_start().strip_prefix("```") else {
        return text;
    };
    // The remainder of the opening line is a language tag. Without a
    // newline the whole fence is on one line ("```json{...}```").
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    match body.rfind("```") {
        Some(close) => &body[..close],
        None => body,
    }
}
