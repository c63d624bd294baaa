//! Double-quoted string literals, as used by tag values.
//!
//! The escape set is the usual one for string literals:
//! `\a \b \f \n \r \t \v \\ \"`, three digit octal `\NNN`,
//! `\xHH`, `\uHHHH` and `\UHHHHHHHH`.
//!
//! Octal and `\x` escapes produce raw bytes, so the lower level
//! [`unescape`] works on bytes and [`unquote`] validates UTF-8 at the end.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::UnquoteError;

// -----------------------------------------------------------------------------
// Quote

/// Quotes `s` as a double-quoted literal.
///
/// Quotes, backslashes and control characters are escaped,
/// every other character is kept as is.
///
/// # Examples
///
/// ```
/// use retag_tag::quote::quote;
///
/// assert_eq!(quote("foo,omitempty"), r#""foo,omitempty""#);
/// assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
/// assert_eq!(quote("\u{1}"), r#""\x01""#);
/// ```
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// -----------------------------------------------------------------------------
// Unquote

/// Decodes a complete double-quoted literal, quotes included.
///
/// # Examples
///
/// ```
/// use retag_tag::{quote::unquote, UnquoteError};
///
/// assert_eq!(unquote(r#""foo\tbar""#).unwrap(), "foo\tbar");
/// assert_eq!(unquote(r#""é""#).unwrap(), "é");
/// assert_eq!(unquote(r#""\q""#), Err(UnquoteError::InvalidEscape { at: 0 }));
/// assert_eq!(unquote("foo"), Err(UnquoteError::Unterminated));
/// ```
pub fn unquote(literal: &str) -> Result<String, UnquoteError> {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return Err(UnquoteError::Unterminated);
    }
    let decoded = unescape(&bytes[1..bytes.len() - 1], b'"')?;
    String::from_utf8(decoded).map_err(|_| UnquoteError::InvalidUtf8)
}

/// Decodes the body of a literal delimited by `quote`.
///
/// The body must not contain a raw newline or an unescaped `quote`.
/// The result may not be valid UTF-8 when `\x` or octal escapes are used.
pub fn unescape(body: &[u8], quote: u8) -> Result<Vec<u8>, UnquoteError> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'\n' => return Err(UnquoteError::Newline),
            b'\\' => i = unescape_one(body, i, quote, &mut out)?,
            b if b == quote => return Err(UnquoteError::UnescapedQuote { at: i }),
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(out)
}

// `body[at]` is a backslash; returns the index after the escape sequence.
fn unescape_one(body: &[u8], at: usize, quote: u8, out: &mut Vec<u8>) -> Result<usize, UnquoteError> {
    let invalid = UnquoteError::InvalidEscape { at };
    let Some(&c) = body.get(at + 1) else {
        return Err(invalid);
    };

    let simple = match c {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0B),
        b'\\' => Some(b'\\'),
        c if c == quote => Some(quote),
        _ => None,
    };
    if let Some(byte) = simple {
        out.push(byte);
        return Ok(at + 2);
    }

    match c {
        b'0'..=b'7' => {
            let digits = body.get(at + 1..at + 4).ok_or(invalid)?;
            let value = digits_value(digits, 8).ok_or(invalid)?;
            let byte = u8::try_from(value).map_err(|_| invalid)?;
            out.push(byte);
            Ok(at + 4)
        }
        b'x' => {
            let digits = body.get(at + 2..at + 4).ok_or(invalid)?;
            let value = digits_value(digits, 16).ok_or(invalid)?;
            // two hex digits always fit
            out.push(value as u8);
            Ok(at + 4)
        }
        b'u' | b'U' => {
            let len = if c == b'u' { 4 } else { 8 };
            let digits = body.get(at + 2..at + 2 + len).ok_or(invalid)?;
            let value = digits_value(digits, 16).ok_or(invalid)?;
            let ch = char::from_u32(value).ok_or(invalid)?;
            let mut buf = [0_u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            Ok(at + 2 + len)
        }
        _ => Err(invalid),
    }
}

fn digits_value(digits: &[u8], radix: u32) -> Option<u32> {
    digits.iter().try_fold(0_u32, |acc, &b| {
        let digit = (b as char).to_digit(radix)?;
        Some(acc * radix + digit)
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{quote, unescape, unquote};
    use crate::UnquoteError;

    #[test]
    fn quote_escapes_controls() {
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("tab\there"), r#""tab\there""#);
        assert_eq!(quote("\u{7f}"), r#""\x7f""#);
        assert_eq!(quote("\u{85}"), r#""\u0085""#);
        assert_eq!(quote("'single'"), r#""'single'""#);
        assert_eq!(quote("héllo"), "\"héllo\"");
    }

    #[test]
    fn unquote_escapes() {
        assert_eq!(unquote(r#""\a\b\f\n\r\t\v""#).unwrap(), "\u{7}\u{8}\u{c}\n\r\t\u{b}");
        assert_eq!(unquote(r#""\101\x42C\U00000044""#).unwrap(), "ABCD");
        assert_eq!(unquote(r#""\"\\""#).unwrap(), "\"\\");
    }

    #[test]
    fn unquote_rejects_bad_input() {
        assert_eq!(unquote("\""), Err(UnquoteError::Unterminated));
        assert_eq!(unquote("'x'"), Err(UnquoteError::Unterminated));
        assert_eq!(unquote("\"a\nb\""), Err(UnquoteError::Newline));
        assert_eq!(unquote(r#""a"b""#), Err(UnquoteError::UnescapedQuote { at: 1 }));
        assert_eq!(unquote(r#""\'""#), Err(UnquoteError::InvalidEscape { at: 0 }));
        assert_eq!(unquote(r#""\400""#), Err(UnquoteError::InvalidEscape { at: 0 }));
        assert_eq!(unquote(r#""\x4""#), Err(UnquoteError::InvalidEscape { at: 0 }));
        assert_eq!(unquote(r#""\ud800""#), Err(UnquoteError::InvalidEscape { at: 0 }));
        assert_eq!(unquote(r#""\xff""#), Err(UnquoteError::InvalidUtf8));
    }

    #[test]
    fn unescape_keeps_raw_bytes() {
        let bytes = unescape(br"\xde\xad\xbe\xef", b'"').unwrap();
        assert_eq!(bytes, [0xde_u8, 0xad, 0xbe, 0xef]);
        assert_eq!(unescape(br"it\'s", b'\'').unwrap(), b"it's");
    }

    #[test]
    fn quote_then_unquote() {
        for s in ["", "foo,omitempty", "a\"b", "\\", "\u{0}\u{1f}\u{7f}", "ünï\ncode\u{9c}"] {
            assert_eq!(unquote(&quote(s)).unwrap(), s);
        }
    }
}
