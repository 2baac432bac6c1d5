//! `\uXXXX` escape-sequence repair.

/// JSON's legal single-character escapes, skipped atomically.
const SIMPLE_ESCAPES: [char; 8] = ['"', '\\', '/', 'b', 'f', 'n', 'r', 't'];

/// Decode `\uXXXX` sequences whose decoded character is safe to embed.
///
/// Safe means the character does not itself need escaping inside a JSON
/// string: decoding `\u0022` (`"`), `\u005C` (`\`) or a control character
/// would change how the surrounding text parses, so those stay encoded. A
/// valid high+low surrogate pair decodes to the supplementary-plane
/// character; lone surrogates stay encoded. Legal two-character escapes
/// are skipped atomically, so `\\u0041` reads as an escaped backslash
/// followed by literal text, not as an escape to decode.
#[must_use]
pub fn decode_unicode_escapes(text: &str) -> String {
    if !text.contains("\\u") {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '\\' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let next = chars[i + 1];
        if SIMPLE_ESCAPES.contains(&next) {
            out.push('\\');
            out.push(next);
            i += 2;
            continue;
        }
        if next != 'u' {
            out.push('\\');
            i += 1;
            continue;
        }
        match decode_escape_at(&chars, i) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                i += consumed;
            }
            None => {
                out.push('\\');
                i += 1;
            }
        }
    }
    out
}

/// Decode the escape starting at `chars[start]` (a backslash followed by
/// `u`). Returns the character and how many source chars it consumed.
fn decode_escape_at(chars: &[char], start: usize) -> Option<(char, usize)> {
    let unit = hex_unit(chars, start)?;
    if (0xD800..=0xDBFF).contains(&unit) {
        let low = hex_unit(chars, start + 6)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        let combined = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
        let decoded = char::from_u32(combined)?;
        return safe_to_embed(decoded).then_some((decoded, 12));
    }
    if (0xDC00..=0xDFFF).contains(&unit) {
        // Lone low surrogate.
        return None;
    }
    let decoded = char::from_u32(u32::from(unit))?;
    safe_to_embed(decoded).then_some((decoded, 6))
}

/// Parse the `XXXX` of a `\uXXXX` sequence starting at `chars[start]`.
fn hex_unit(chars: &[char], start: usize) -> Option<u16> {
    if start + 5 >= chars.len() || chars[start] != '\\' || chars[start + 1] != 'u' {
        return None;
    }
    let mut unit: u16 = 0;
    for offset in 2..6 {
        let digit = chars[start + offset].to_digit(16)?;
        unit = unit * 16 + digit as u16;
    }
    Some(unit)
}

/// Characters that would need re-escaping if embedded in a JSON string.
fn safe_to_embed(c: char) -> bool {
    c != '"' && c != '\\' && !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_bmp_escapes() {
        assert_eq!(
            decode_unicode_escapes(r#"{"a": "\u4f60\u597d"}"#),
            r#"{"a": "你好"}"#
        );
    }

    #[test]
    fn decodes_surrogate_pairs() {
        assert_eq!(
            decode_unicode_escapes(r#"{"a": "\uD83D\uDE00"}"#),
            r#"{"a": "😀"}"#
        );
    }

    #[test]
    fn keeps_lone_surrogates_encoded() {
        assert_eq!(
            decode_unicode_escapes(r#"{"a": "\uD83D oops"}"#),
            r#"{"a": "\uD83D oops"}"#
        );
        assert_eq!(
            decode_unicode_escapes(r#"{"a": "\uDE00"}"#),
            r#"{"a": "\uDE00"}"#
        );
    }

    #[test]
    fn never_decodes_quote_backslash_or_controls() {
        for raw in [r#"\u0022"#, r#"\u005C"#, r#"\u0000"#, r#"\u000A"#] {
            assert_eq!(decode_unicode_escapes(raw), raw, "must stay encoded: {raw}");
        }
    }

    #[test]
    fn skips_legal_escapes_atomically() {
        // The backslash pair hides the `u0041`; nothing decodes.
        assert_eq!(decode_unicode_escapes(r#"\\u0041"#), r#"\\u0041"#);
        assert_eq!(decode_unicode_escapes(r#"\nA"#), r#"\nA"#);
    }

    #[test]
    fn leaves_malformed_sequences_alone() {
        assert_eq!(decode_unicode_escapes(r#"\u00"#), r#"\u00"#);
        assert_eq!(decode_unicode_escapes(r#"\uZZZZ"#), r#"\uZZZZ"#);
        assert_eq!(decode_unicode_escapes(r#"trailing \"#), r#"trailing \"#);
    }

    #[test]
    fn decoding_is_idempotent() {
        let raw = r#"{"a": "\u4f60 \uD83D\uDE00 \uDC00"}"#;
        let once = decode_unicode_escapes(raw);
        assert_eq!(decode_unicode_escapes(&once), once);
    }
}
