use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::TagError;
use crate::quote::unescape;

// -----------------------------------------------------------------------------
// Token

/// A decoded option token.
///
/// Plain identifiers borrow from the entry value. Single-quoted tokens are
/// decoded, and may hold arbitrary bytes when `\x` or octal escapes are used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<'a>(Cow<'a, [u8]>);

impl<'a> Token<'a> {
    #[inline]
    const fn borrowed(s: &'a str) -> Self {
        Self(Cow::Borrowed(s.as_bytes()))
    }

    /// Returns the decoded bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the token as text, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }

    /// Returns `true` if the token equals `text`.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        *self.0 == *text.as_bytes()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.write_str(s),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

// Reads one token at the start of `s`, returning it and its raw length.
//
// Identifiers start with `_` or an alphabetic char and go on with `_`,
// alphabetic or numeric chars. Alphabetic is the Unicode `Alphabetic`
// property, so combining marks such as U+0345 count as letters too.
fn read_token(s: &str) -> Result<(Token<'_>, usize), TagError> {
    let Some(first) = s.chars().next() else {
        return Err(TagError::UnexpectedEnd);
    };
    match first {
        c if c == '_' || c.is_alphabetic() => {
            let n = s
                .find(|c: char| !(c == '_' || c.is_alphabetic() || c.is_numeric()))
                .unwrap_or(s.len());
            Ok((Token::borrowed(&s[..n]), n))
        }
        '\'' => {
            let (decoded, n) = read_escaped(s)?;
            Ok((Token(Cow::Owned(decoded)), n))
        }
        _ => Err(TagError::InvalidOptionStart { rest: s.into() }),
    }
}

// `s` starts with a single quote. Inside, `\'` stands for a quote and a bare
// `"` is literal; the body is rewritten into double-quoted form and decoded.
fn read_escaped(s: &str) -> Result<(Vec<u8>, usize), TagError> {
    let bytes = s.as_bytes();
    let mut body = Vec::with_capacity(bytes.len());
    let mut escaping = false;
    let mut i = 1;
    while i < bytes.len() {
        let b = bytes[i];
        if escaping {
            if b == b'\'' {
                body.pop();
            }
            escaping = false;
        } else if b == b'\\' {
            escaping = true;
        } else if b == b'"' {
            body.push(b'\\');
        } else if b == b'\'' {
            let decoded = unescape(&body, b'"').map_err(|_| TagError::InvalidEscape { rest: s.into() })?;
            return Ok((decoded, i + 1));
        }
        body.push(b);
        i += 1;
    }
    Err(TagError::UnterminatedEscape { rest: s.into() })
}

// Reads a single option: an optional leading comma, a token, then an
// optional `:token`, and nothing else. Returns the option name.
pub(crate) fn option_name(option: &str) -> Result<Token<'_>, TagError> {
    let rest = option.strip_prefix(',').unwrap_or(option);
    let (name, n) = read_token(rest)?;
    let mut rest = &rest[n..];
    if let Some(tail) = rest.strip_prefix(':') {
        let (_, n) = read_token(tail)?;
        rest = &tail[n..];
    }
    if !rest.is_empty() {
        return Err(TagError::MalformedOption { value: option.into() });
    }
    Ok(name)
}

// -----------------------------------------------------------------------------
// TagOption

/// One option of an option list: `name` or `name:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOption<'a> {
    pub name: Token<'a>,
    pub value: Option<Token<'a>>,
}

impl TagOption<'_> {
    /// Returns `true` if `candidate` names this option.
    ///
    /// `candidate` is read as a single option, `name` or `name:value` with an
    /// optional leading comma, and matches when its name equals this option
    /// name; the secondary value never takes part. A candidate that is not a
    /// single option matches nothing.
    pub fn matches(&self, candidate: &str) -> bool {
        option_name(candidate).is_ok_and(|name| name == self.name)
    }
}

// -----------------------------------------------------------------------------
// OptionList

// Characters that end a bare name slot.
const RESERVED: &[char] = &[',', '\\', '\'', '"', '`'];

/// An entry value read as `name,opt,opt:value,...`.
///
/// The name slot may be empty (`,omitempty`), a run of characters other than
/// `,` `\` `'` `"` and backtick, or a single-quoted token. Options are
/// identifiers or single-quoted tokens, optionally followed by `:` and a
/// secondary token.
///
/// # Examples
///
/// ```
/// use retag_tag::OptionList;
///
/// let list = OptionList::parse("id,omitempty,format:'2006-01-02'").unwrap();
/// assert!(list.name().unwrap().is("id"));
///
/// let options: Vec<_> = list.iter().collect::<Result<_, _>>().unwrap();
/// assert!(options[0].name.is("omitempty"));
/// assert!(options[1].value.as_ref().unwrap().is("2006-01-02"));
///
/// assert!(list.contains("format:RFC3339").unwrap());
/// assert!(!list.contains("string").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct OptionList<'a> {
    value: &'a str,
    name: Option<Token<'a>>,
    rest: &'a str,
}

impl<'a> OptionList<'a> {
    /// Reads the name slot of `value`; options are scanned lazily.
    pub fn parse(value: &'a str) -> Result<Self, TagError> {
        if value.is_empty() || value.starts_with(',') {
            return Ok(Self {
                value,
                name: None,
                rest: value,
            });
        }

        let n = value.find(RESERVED).unwrap_or(value.len());
        let (name, n) = if n > 0 {
            (Token::borrowed(&value[..n]), n)
        } else {
            read_token(value)?
        };

        Ok(Self {
            value,
            name: Some(name),
            rest: &value[n..],
        })
    }

    /// Returns the name slot, `None` when it is empty.
    #[inline]
    pub fn name(&self) -> Option<&Token<'a>> {
        self.name.as_ref()
    }

    /// Returns the raw text following the name slot.
    #[inline]
    pub fn raw_options(&self) -> &'a str {
        self.rest
    }

    /// Iterates over the options after the name slot.
    #[inline]
    pub fn iter(&self) -> TagOptions<'a> {
        TagOptions {
            value: self.value,
            rest: self.rest,
            failed: false,
        }
    }

    /// Returns `true` if `option` is already present.
    ///
    /// `option` must be a single option and is compared by name, so a leading
    /// comma or a secondary value on it is ignored. Scanning stops at the first
    /// match, so malformed text after it is not reported.
    pub fn contains(&self, option: &str) -> Result<bool, TagError> {
        let name = option_name(option)?;
        for item in self.iter() {
            if item?.name == name {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<'a> IntoIterator for &OptionList<'a> {
    type Item = Result<TagOption<'a>, TagError>;
    type IntoIter = TagOptions<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// -----------------------------------------------------------------------------
// TagOptions

/// Iterator over the options of an [`OptionList`].
///
/// Yields one `Err` at the first malformed option, then stops.
#[derive(Debug, Clone)]
pub struct TagOptions<'a> {
    value: &'a str,
    rest: &'a str,
    failed: bool,
}

impl<'a> TagOptions<'a> {
    fn malformed(&self) -> TagError {
        TagError::MalformedOption {
            value: String::from(self.value),
        }
    }

    fn next_option(&mut self) -> Result<TagOption<'a>, TagError> {
        let Some(rest) = self.rest.strip_prefix(',') else {
            return Err(self.malformed());
        };
        if rest.is_empty() {
            return Err(self.malformed());
        }

        let (name, n) = read_token(rest)?;
        let mut rest = &rest[n..];
        let mut value = None;
        if let Some(tail) = rest.strip_prefix(':') {
            let (secondary, n) = read_token(tail)?;
            value = Some(secondary);
            rest = &tail[n..];
        }

        self.rest = rest;
        Ok(TagOption { name, value })
    }
}

impl<'a> Iterator for TagOptions<'a> {
    type Item = Result<TagOption<'a>, TagError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        let item = self.next_option();
        self.failed = item.is_err();
        Some(item)
    }
}

impl core::iter::FusedIterator for TagOptions<'_> {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{OptionList, TagOption, option_name, read_token};
    use crate::TagError;

    fn options<'a>(list: &OptionList<'a>) -> Vec<TagOption<'a>> {
        list.iter().collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn name_slot_forms() {
        assert!(OptionList::parse("").unwrap().name().is_none());
        assert!(OptionList::parse(",omitempty").unwrap().name().is_none());
        assert!(OptionList::parse("foo-bar:baz").unwrap().name().unwrap().is("foo-bar:baz"));

        let list = OptionList::parse("'a,b',string").unwrap();
        assert!(list.name().unwrap().is("a,b"));
        assert_eq!(list.raw_options(), ",string");
    }

    #[test]
    fn escaped_name_may_hold_raw_bytes() {
        let list = OptionList::parse(r"'\xde\xad\xbe\xef'").unwrap();
        assert_eq!(list.name().unwrap().as_bytes(), [0xde_u8, 0xad, 0xbe, 0xef]);
        assert_eq!(list.name().unwrap().as_str(), None);
        assert_eq!(list.raw_options(), "");
    }

    #[test]
    fn options_with_values() {
        let list = OptionList::parse(",omitzero,format:fizzbuzz,'it\\'s':'\"q\"'").unwrap();
        let opts = options(&list);
        assert_eq!(opts.len(), 3);
        assert!(opts[0].name.is("omitzero") && opts[0].value.is_none());
        assert!(opts[1].name.is("format"));
        assert!(opts[1].value.as_ref().unwrap().is("fizzbuzz"));
        assert!(opts[2].name.is("it's"));
        assert!(opts[2].value.as_ref().unwrap().is("\"q\""));
    }

    #[test]
    fn identifiers_accept_unicode_and_digits() {
        let (token, n) = read_token("ünïcode_42,x").unwrap();
        assert!(token.is("ünïcode_42"));
        assert_eq!(n, "ünïcode_42".len());
    }

    #[test]
    fn identifiers_accept_alphabetic_marks() {
        let (token, n) = read_token("\u{345}x,y").unwrap();
        assert!(token.is("\u{345}x"));
        assert_eq!(n, "\u{345}x".len());
    }

    #[test]
    fn single_option_check() {
        assert!(option_name("omitempty").unwrap().is("omitempty"));
        assert!(option_name(",omitempty").unwrap().is("omitempty"));
        assert!(option_name("format:'2006-01-02'").unwrap().is("format"));
        assert!(option_name("'a,b'").unwrap().is("a,b"));

        assert_eq!(option_name(""), Err(TagError::UnexpectedEnd));
        assert_eq!(option_name(","), Err(TagError::UnexpectedEnd));
        assert_eq!(option_name("format:"), Err(TagError::UnexpectedEnd));
        assert_eq!(
            option_name("a,b"),
            Err(TagError::MalformedOption { value: "a,b".to_string() })
        );
        assert_eq!(
            option_name(",,a"),
            Err(TagError::InvalidOptionStart { rest: ",a".to_string() })
        );
        assert_eq!(
            option_name("a:b:c"),
            Err(TagError::MalformedOption { value: "a:b:c".to_string() })
        );
    }

    #[test]
    fn malformed_lists() {
        fn err(value: &str) -> Result<usize, TagError> {
            let list = OptionList::parse(value)?;
            list.iter().try_fold(0, |n, item| item.map(|_| n + 1))
        }
        assert_eq!(
            err("foo,").unwrap_err(),
            TagError::MalformedOption { value: "foo,".to_string() }
        );
        assert_eq!(
            err("foo'bar").unwrap_err(),
            TagError::MalformedOption { value: "foo'bar".to_string() }
        );
        assert_eq!(
            err(",1st").unwrap_err(),
            TagError::InvalidOptionStart { rest: "1st".to_string() }
        );
        assert_eq!(err(",format:").unwrap_err(), TagError::UnexpectedEnd);
        assert_eq!(
            err(",'open").unwrap_err(),
            TagError::UnterminatedEscape { rest: "'open".to_string() }
        );
        assert_eq!(
            err(r",'\q'").unwrap_err(),
            TagError::InvalidEscape { rest: r"'\q'".to_string() }
        );
        assert!(err(r"\name").is_err());
    }

    #[test]
    fn contains_checks_prefix() {
        let list = OptionList::parse(",omitempty,format:fizzbuzz").unwrap();
        assert!(list.contains("omitempty").unwrap());
        assert!(list.contains(",omitempty").unwrap());
        assert!(list.contains("format").unwrap());
        assert!(list.contains("format:booboo").unwrap());
        assert!(!list.contains("formats:x").unwrap());
        assert!(!list.contains("omitzero").unwrap());

        let list = OptionList::parse("foo,'a,b'").unwrap();
        assert!(list.contains("'a,b'").unwrap());
        assert!(list.contains(",'a,b':x").unwrap());
        assert!(list.contains("a,b").is_err());
    }

    #[test]
    fn contains_stops_at_first_match() {
        let list = OptionList::parse(",omitzero,'broken").unwrap();
        assert!(list.contains("omitzero").unwrap());
        assert!(list.contains("omitempty").is_err());
    }
}
