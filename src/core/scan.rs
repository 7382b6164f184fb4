//! Byte-level scanning primitives for recipe documents.
//!
//! Structure is found with three pieces of state (inside-string, brace depth,
//! bracket depth) instead of a tokenizer. All positions are absolute byte
//! offsets into the document, so every caller can report where it failed.
//! Every structural character is ASCII, which never occurs inside a multi-byte
//! UTF-8 sequence, so walking bytes is safe for any `&str`.

use thiserror::Error;

/// Half-open byte range `[start, end)` into the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn of<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Shrinks the span past leading and trailing whitespace.
    pub fn trim(self, text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut start = self.start;
        let mut end = self.end;
        while start < end && bytes[start].is_ascii_whitespace() {
            start += 1;
        }
        while end > start && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    #[error("unexpected '{found}' at byte {offset}")]
    Unbalanced { offset: usize, found: char },

    #[error("'{open}' at byte {offset} is never closed")]
    Unclosed { offset: usize, open: char },
}

impl ScanError {
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedString(offset) => *offset,
            Self::Unbalanced { offset, .. } | Self::Unclosed { offset, .. } => *offset,
        }
    }
}

/// Incremental scanner state. Feed it bytes in order with [`Scanner::step`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Scanner {
    in_string: bool,
    escaped: bool,
    string_start: usize,
    brace_depth: usize,
    bracket_depth: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outside any string and not nested in an object or array.
    pub fn at_top_level(&self) -> bool {
        !self.in_string && self.brace_depth == 0 && self.bracket_depth == 0
    }

    /// Consumes the byte at `offset`. Returns the byte when it is a structural
    /// character outside a string, after applying its depth change.
    pub fn step(&mut self, offset: usize, byte: u8) -> Result<Option<u8>, ScanError> {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            return Ok(None);
        }

        match byte {
            b'"' => {
                self.in_string = true;
                self.string_start = offset;
                Ok(None)
            }
            b'{' => {
                self.brace_depth += 1;
                Ok(Some(byte))
            }
            b'[' => {
                self.bracket_depth += 1;
                Ok(Some(byte))
            }
            b'}' => {
                self.brace_depth = self
                    .brace_depth
                    .checked_sub(1)
                    .ok_or(ScanError::Unbalanced { offset, found: '}' })?;
                Ok(Some(byte))
            }
            b']' => {
                self.bracket_depth = self
                    .bracket_depth
                    .checked_sub(1)
                    .ok_or(ScanError::Unbalanced { offset, found: ']' })?;
                Ok(Some(byte))
            }
            b',' | b':' => Ok(Some(byte)),
            _ => Ok(None),
        }
    }

    /// Fails if the scan ended inside a string or an open container.
    fn finish(&self, opened_at: usize, open: char) -> Result<(), ScanError> {
        if self.in_string {
            return Err(ScanError::UnterminatedString(self.string_start));
        }
        if self.brace_depth > 0 || self.bracket_depth > 0 {
            return Err(ScanError::Unclosed {
                offset: opened_at,
                open,
            });
        }
        Ok(())
    }
}

pub fn skip_whitespace(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Index of the `}` or `]` closing the container opened at `open`.
///
/// The opener's own depth must return to zero while the other kind is also
/// balanced; `[{]` is reported as unbalanced rather than matched.
pub fn find_matching(text: &str, open: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let (opener, closer) = match bytes.get(open).copied() {
        Some(b'{') => ('{', b'}'),
        Some(b'[') => ('[', b']'),
        Some(other) => {
            return Err(ScanError::Unbalanced {
                offset: open,
                found: other as char,
            })
        }
        None => {
            return Err(ScanError::Unclosed {
                offset: open,
                open: '?',
            })
        }
    };

    let mut scanner = Scanner::new();
    for (pos, &byte) in bytes.iter().enumerate().skip(open) {
        if scanner.step(pos, byte)? != Some(closer) {
            continue;
        }
        let (own, other) = if closer == b'}' {
            (scanner.brace_depth, scanner.bracket_depth)
        } else {
            (scanner.bracket_depth, scanner.brace_depth)
        };
        if own == 0 {
            if other != 0 {
                return Err(ScanError::Unbalanced {
                    offset: pos,
                    found: closer as char,
                });
            }
            return Ok(pos);
        }
    }

    scanner.finish(open, opener)?;
    Err(ScanError::Unclosed {
        offset: open,
        open: opener,
    })
}

/// Index of the quote closing the string that starts at `start`.
pub fn find_string_end(text: &str, start: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let mut escaped = false;
    for (pos, &byte) in bytes.iter().enumerate().skip(start + 1) {
        if escaped {
            escaped = false;
        } else if byte == b'\\' {
            escaped = true;
        } else if byte == b'"' {
            return Ok(pos);
        }
    }
    Err(ScanError::UnterminatedString(start))
}

/// End of the value starting at `start`: the first top-level `,`, `}` or `]`
/// before `limit`, or `limit` itself.
pub fn value_end(text: &str, start: usize, limit: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let mut scanner = Scanner::new();
    for pos in start..limit {
        let byte = bytes[pos];
        if scanner.at_top_level() && matches!(byte, b',' | b'}' | b']') {
            return Ok(pos);
        }
        scanner.step(pos, byte)?;
    }
    scanner.finish(start, bytes.get(start).map_or('?', |&b| b as char))?;
    Ok(limit)
}

/// Splits `span` on commas that sit outside strings and nested containers.
///
/// Returned spans are trimmed. Empty pieces are kept so callers can reject
/// `[,]` or trailing commas; a span holding only whitespace yields no pieces.
pub fn split_top_level(text: &str, span: Span) -> Result<Vec<Span>, ScanError> {
    if span.trim(text).is_empty() {
        return Ok(Vec::new());
    }

    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut scanner = Scanner::new();
    let mut piece_start = span.start;

    for pos in span.start..span.end {
        let was_top = scanner.at_top_level();
        if scanner.step(pos, bytes[pos])? == Some(b',') && was_top {
            pieces.push(Span::new(piece_start, pos).trim(text));
            piece_start = pos + 1;
        }
    }
    scanner.finish(span.start, '[')?;
    pieces.push(Span::new(piece_start, span.end).trim(text));

    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces<'a>(text: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().map(|s| s.of(text)).collect()
    }

    #[test]
    fn test_scanner_ignores_structure_inside_strings() {
        let text = r#"{"a": "x}]\"{[", "b": [1]}"#;
        let mut scanner = Scanner::new();
        let mut structural = Vec::new();
        for (pos, byte) in text.bytes().enumerate() {
            if let Some(b) = scanner.step(pos, byte).unwrap() {
                structural.push(b as char);
            }
        }
        assert_eq!(structural.into_iter().collect::<String>(), "{:,:[]}");
        assert!(scanner.at_top_level());
    }

    #[test]
    fn test_find_matching_skips_nested_and_quoted_brackets() {
        let text = r#"[ {"n": "]"}, [1, [2]] ] tail"#;
        let close = find_matching(text, 0).unwrap();
        assert_eq!(&text[close..], "] tail");

        let obj = r#"{"a": {"b": "}"}}"#;
        assert_eq!(find_matching(obj, 0).unwrap(), obj.len() - 1);
    }

    #[test]
    fn test_find_matching_handles_escaped_backslash_before_quote() {
        let text = r#"["a\\", "]"]"#;
        assert_eq!(find_matching(text, 0).unwrap(), text.len() - 1);
    }

    #[test]
    fn test_find_matching_reports_unclosed_and_mismatched() {
        assert_eq!(
            find_matching("[1, 2", 0),
            Err(ScanError::Unclosed { offset: 0, open: '[' })
        );
        assert_eq!(
            find_matching("[{]", 0),
            Err(ScanError::Unbalanced { offset: 2, found: ']' })
        );
        assert_eq!(
            find_matching(r#"["abc"#, 0),
            Err(ScanError::UnterminatedString(1))
        );
    }

    #[test]
    fn test_value_end_stops_at_top_level_terminator() {
        let text = r#"{"a": [1, {"b": 2}], "c": "x,y"}"#;
        let start = text.find('[').unwrap();
        let end = value_end(text, start, text.len()).unwrap();
        assert_eq!(&text[start..end], r#"[1, {"b": 2}]"#);

        let start = text.find("\"x").unwrap();
        let end = value_end(text, start, text.len()).unwrap();
        assert_eq!(&text[start..end], "\"x,y\"");
    }

    #[test]
    fn test_split_top_level_keeps_order_and_nesting() {
        let text = r#" {"a": [1, 2]} , {"b": "c,d"},[3] "#;
        let spans = split_top_level(text, Span::new(0, text.len())).unwrap();
        assert_eq!(
            pieces(text, &spans),
            [r#"{"a": [1, 2]}"#, r#"{"b": "c,d"}"#, "[3]"]
        );
    }

    #[test]
    fn test_split_top_level_reports_empty_pieces() {
        let text = "1,,2,";
        let spans = split_top_level(text, Span::new(0, text.len())).unwrap();
        assert_eq!(pieces(text, &spans), ["1", "", "2", ""]);

        let blank = "  \n ";
        assert!(split_top_level(blank, Span::new(0, blank.len()))
            .unwrap()
            .is_empty());
    }
}
