//! String-aware scanning over JSON-ish text.
//!
//! Every structural repair shares this one definition of "inside a string
//! literal" so they cannot disagree about what a brace means.

/// One scanned character.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanned {
    pub ch: char,
    /// Byte offset of `ch` in the scanned text.
    pub offset: usize,
    /// String state before `ch` was processed: the opening quote of a
    /// string reports `false`, its interior and closing quote `true`.
    pub in_string: bool,
}

/// Character iterator tracking string literals and escape sequences.
#[derive(Debug)]
pub(crate) struct JsonScanner<'a> {
    chars: std::str::CharIndices<'a>,
    in_string: bool,
    escape_pending: bool,
}

impl<'a> JsonScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices(),
            in_string: false,
            escape_pending: false,
        }
    }

    /// True when scanning stopped inside an unterminated string literal.
    pub fn in_string(&self) -> bool {
        self.in_string
    }

    /// True when the last scanned character was an unconsumed backslash.
    pub fn escape_pending(&self) -> bool {
        self.escape_pending
    }
}

impl Iterator for JsonScanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let (offset, ch) = self.chars.next()?;
        let in_string = self.in_string;
        if self.in_string {
            if self.escape_pending {
                self.escape_pending = false;
            } else if ch == '\\' {
                self.escape_pending = true;
            } else if ch == '"' {
                self.in_string = false;
            }
        } else if ch == '"' {
            self.in_string = true;
        }
        Some(Scanned {
            ch,
            offset,
            in_string,
        })
    }
}
