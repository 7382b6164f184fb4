//! Member extraction and scalar decoding on top of [`crate::core::scan`].

use crate::core::scan::{self, ScanError, Span};
use crate::utils::error::{Location, RecipeError, Result};
use thiserror::Error;

/// One `"key": value` pair of an object, with the value left undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub key: String,
    pub key_offset: usize,
    pub value: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Object,
    Array,
    Bool,
    Null,
    Unknown,
}

impl ValueKind {
    pub fn of(raw: &str) -> Self {
        match raw.as_bytes().first() {
            Some(b'"') => Self::String,
            Some(b'{') => Self::Object,
            Some(b'[') => Self::Array,
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => Self::Number,
            _ => match raw {
                "true" | "false" => Self::Bool,
                "null" => Self::Null,
                _ => Self::Unknown,
            },
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Object => "an object",
            Self::Array => "an array",
            Self::Bool => "a boolean",
            Self::Null => "null",
            Self::Unknown => "an unrecognized value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StringError {
    #[error("expected a string, found {}", .0.describe())]
    NotAString(ValueKind),

    #[error("{0}")]
    InvalidEscape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("not a number")]
    NotANumber,

    #[error("not an integer")]
    NotAnInteger,

    #[error("out of range")]
    OutOfRange,
}

pub(crate) fn scan_error(location: Location, err: ScanError) -> RecipeError {
    RecipeError::structural(location.with_offset(err.offset()), err.to_string())
}

/// Splits the object spanning `object` (braces included) into its top-level
/// members, in source order.
///
/// Keys inside nested values are never visited, so a nested `"name"` cannot
/// shadow a missing one at this level.
pub fn object_members(text: &str, object: Span, location: Location) -> Result<Vec<Member>> {
    let bytes = text.as_bytes();
    let inner_end = object.end - 1;
    let mut members = Vec::new();
    let mut pos = scan::skip_whitespace(text, object.start + 1);

    while pos < inner_end {
        if bytes[pos] != b'"' {
            return Err(RecipeError::structural(
                location.with_offset(pos),
                format!("expected a quoted key, found '{}'", bytes[pos] as char),
            ));
        }
        let key_close = scan::find_string_end(text, pos).map_err(|e| scan_error(location, e))?;
        let key = unescape(&text[pos + 1..key_close]).map_err(|e| {
            RecipeError::structural(location.with_offset(pos), format!("invalid key: {e}"))
        })?;
        let key_offset = pos;

        pos = scan::skip_whitespace(text, key_close + 1);
        if pos >= inner_end || bytes[pos] != b':' {
            return Err(RecipeError::structural(
                location.with_offset(pos),
                format!("expected ':' after key \"{key}\""),
            ));
        }

        let value_start = scan::skip_whitespace(text, pos + 1);
        let end = scan::value_end(text, value_start, inner_end).map_err(|e| scan_error(location, e))?;
        let value = Span::new(value_start, end).trim(text);
        if value.is_empty() {
            return Err(RecipeError::structural(
                location.with_offset(value_start),
                format!("missing value for key \"{key}\""),
            ));
        }
        check_single_value(text, value, location)?;
        members.push(Member {
            key,
            key_offset,
            value,
        });

        pos = end;
        if pos < inner_end {
            if bytes[pos] != b',' {
                return Err(RecipeError::structural(
                    location.with_offset(pos),
                    format!("unexpected '{}' inside object", bytes[pos] as char),
                ));
            }
            pos = scan::skip_whitespace(text, pos + 1);
            if pos >= inner_end {
                return Err(RecipeError::structural(
                    location.with_offset(pos),
                    "trailing comma in object",
                ));
            }
        }
    }

    Ok(members)
}

/// Rejects values with trailing content, e.g. `1 "b": 2` left over from a
/// missing comma.
pub fn check_single_value(text: &str, value: Span, location: Location) -> Result<()> {
    let bytes = text.as_bytes();
    let last = value.end - 1;
    let close = match bytes[value.start] {
        b'{' | b'[' => scan::find_matching(text, value.start).map_err(|e| scan_error(location, e))?,
        b'"' => scan::find_string_end(text, value.start).map_err(|e| scan_error(location, e))?,
        _ => match value.of(text).bytes().position(|b| {
            b.is_ascii_whitespace() || matches!(b, b'"' | b':' | b'{' | b'[')
        }) {
            Some(rel) => value.start + rel,
            None => last,
        },
    };
    if close != last {
        let at = scan::skip_whitespace(text, close + 1).min(last);
        return Err(RecipeError::structural(
            location.with_offset(at),
            "unexpected content after value (missing comma?)",
        ));
    }
    Ok(())
}

/// First member named exactly `key`. Keys are case-sensitive.
pub fn find_member<'m>(members: &'m [Member], key: &str) -> Option<&'m Member> {
    members.iter().find(|m| m.key == key)
}

/// Decodes a raw quoted value into its string contents.
pub fn decode_string(raw: &str) -> std::result::Result<String, StringError> {
    let kind = ValueKind::of(raw);
    if kind != ValueKind::String || raw.len() < 2 || !raw.ends_with('"') {
        return Err(StringError::NotAString(kind));
    }
    unescape(&raw[1..raw.len() - 1]).map_err(StringError::InvalidEscape)
}

/// Reverses JSON string escapes, including `\uXXXX` surrogate pairs.
pub fn unescape(body: &str) -> std::result::Result<String, String> {
    if !body.contains('\\') {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => out.push(read_unicode_escape(&mut chars)?),
            Some(other) => return Err(format!("invalid escape sequence '\\{other}'")),
            None => return Err("dangling backslash at end of string".to_string()),
        }
    }
    Ok(out)
}

fn read_unicode_escape(chars: &mut std::str::Chars<'_>) -> std::result::Result<char, String> {
    let unit = read_hex4(chars)?;
    let code = match unit {
        0xD800..=0xDBFF => {
            if chars.next() != Some('\\') || chars.next() != Some('u') {
                return Err(format!("unpaired surrogate \\u{unit:04X}"));
            }
            let low = read_hex4(chars)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(format!("invalid low surrogate \\u{low:04X}"));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(format!("unpaired surrogate \\u{unit:04X}")),
        _ => unit,
    };
    char::from_u32(code).ok_or_else(|| format!("invalid code point {code:#X}"))
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let mut value = 0;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| "\\u must be followed by four hex digits".to_string())?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn is_numeric_text(raw: &str) -> bool {
    raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Parses a decimal number. Spelled-out specials (`NaN`, `inf`), values that
/// overflow to infinity and nonzero values that underflow to zero are rejected.
pub fn parse_number(raw: &str) -> std::result::Result<f64, NumberError> {
    if !is_numeric_text(raw) {
        return Err(NumberError::NotANumber);
    }
    let value: f64 = raw.parse().map_err(|_| NumberError::NotANumber)?;
    if !value.is_finite() {
        return Err(NumberError::OutOfRange);
    }
    let mantissa = raw.split(['e', 'E']).next().unwrap_or(raw);
    if value == 0.0 && mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        return Err(NumberError::OutOfRange);
    }
    Ok(value)
}

pub fn parse_integer(raw: &str) -> std::result::Result<i64, NumberError> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(match parse_number(raw) {
            Ok(_) => NumberError::NotAnInteger,
            Err(e) => e,
        });
    }
    raw.parse().map_err(|_| NumberError::OutOfRange)
}
