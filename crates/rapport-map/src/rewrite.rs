//! Key rewriting over JSON-shaped text.
//!
//! Works on the text itself rather than a decoded tree, so it also
//! fixes keys in text that does not decode yet (the decode retry
//! happens after mapping). Values are preserved byte for byte.

use rapport_model::MappingContext;
use tracing::debug;

use crate::table::FieldTable;

/// A quoted span that sits in key position.
struct KeySpan {
    /// Offset of the opening quote.
    start: usize,
    /// Offset one past the closing quote.
    end: usize,
    /// The raw text between the quotes.
    inner_start: usize,
    inner_end: usize,
}

/// Rewrite alternate field names in `text` to their canonical form.
///
/// A quoted span counts as a key when the next non-whitespace character
/// after it is `:`, which holds at any nesting depth. Keys that are
/// already canonical stay untouched; unknown keys fall back to a fuzzy
/// lookup when the context enables it.
pub(crate) fn rewrite_keys(text: &str, table: &FieldTable, ctx: &MappingContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut mapped = 0usize;
    for span in key_spans(text) {
        let key = &text[span.inner_start..span.inner_end];
        if table.is_canonical(key) {
            continue;
        }
        let canonical = match table.canonical_for(key) {
            Some(canonical) => canonical,
            None if ctx.fuzzy_matching => {
                match table.fuzzy_canonical_for(key, ctx.fuzzy_threshold) {
                    Some((canonical, similarity)) => {
                        if ctx.verbose {
                            debug!(similarity, "fuzzy key match");
                        }
                        canonical
                    }
                    None => continue,
                }
            }
            None => continue,
        };
        out.push_str(&text[copied..span.start]);
        out.push('"');
        out.push_str(canonical);
        out.push('"');
        copied = span.end;
        mapped += 1;
    }
    out.push_str(&text[copied..]);
    if mapped > 0 {
        debug!(mapped, "rewrote alternate field names");
    }
    out
}

/// Quoted spans in key position, in text order.
fn key_spans(text: &str) -> Vec<KeySpan> {
    let mut spans = Vec::new();
    let mut chars = text.char_indices();
    while let Some((start, ch)) = chars.next() {
        if ch != '"' {
            continue;
        }
        let inner_start = start + 1;
        let mut inner_end = None;
        let mut escaped = false;
        for (offset, ch) in chars.by_ref() {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                inner_end = Some(offset);
                break;
            }
        }
        let Some(inner_end) = inner_end else {
            break;
        };
        let end = inner_end + 1;
        let followed_by_colon = text[end..]
            .chars()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| c == ':');
        if followed_by_colon {
            spans.push(KeySpan {
                start,
                end,
                inner_start,
                inner_end,
            });
        }
    }
    spans
}
