use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

use crate::quote::{quote, unquote};
use crate::{OptionList, Tag, TagError};

// -----------------------------------------------------------------------------
// TagEntry

/// One `key:"value"` pair of a [`Tag`].
///
/// `value` holds the decoded contents of the quoted value.
///
/// # Examples
///
/// ```
/// use retag_tag::TagEntry;
///
/// let entry = TagEntry::new("json", "say \"hi\"");
/// assert_eq!(entry.to_string(), r#"json:"say \"hi\"""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagEntry {
    pub key: String,
    pub value: String,
}

impl TagEntry {
    /// Creates a new entry from a key and a decoded value.
    #[inline]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Reads the value as an option list: a name slot followed by options.
    #[inline]
    pub fn options(&self) -> Result<OptionList<'_>, TagError> {
        OptionList::parse(&self.value)
    }
}

impl fmt::Display for TagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, quote(&self.value))
    }
}

// -----------------------------------------------------------------------------
// TagEntries

/// A left-to-right scan over the entries of a raw tag.
///
/// Yields one `Err` at the first malformed entry, then stops.
///
/// # Examples
///
/// ```
/// use retag_tag::TagEntries;
///
/// let mut entries = TagEntries::new(r#" json:"a"  xml:"b" "#);
/// assert_eq!(entries.next().unwrap().unwrap().key, "json");
/// assert_eq!(entries.next().unwrap().unwrap().key, "xml");
/// assert!(entries.next().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TagEntries<'a> {
    rest: &'a str,
    failed: bool,
}

impl<'a> TagEntries<'a> {
    /// Starts scanning `tag`.
    #[inline]
    pub const fn new(tag: &'a str) -> Self {
        Self {
            rest: tag,
            failed: false,
        }
    }

    /// Returns the text that has not been consumed yet.
    #[inline]
    pub const fn rest(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for TagEntries<'a> {
    type Item = Result<TagEntry, TagError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.rest = self.rest.trim_start_matches(' ');
        if self.rest.is_empty() {
            return None;
        }
        match parse_entry(self.rest) {
            Ok((entry, rest)) => {
                self.rest = rest;
                Some(Ok(entry))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl core::iter::FusedIterator for TagEntries<'_> {}

// A key ends at a space, a colon, a quote or a control character.
// Only ASCII controls are rejected; multi-byte controls pass through.
#[inline]
fn is_key_byte(b: u8) -> bool {
    b > b' ' && b != b':' && b != b'"' && b != 0x7f
}

// Checks that `key` can be written as the key of an entry.
pub(crate) fn check_key(key: &str) -> Result<(), TagError> {
    if key.is_empty() || !key.bytes().all(is_key_byte) {
        return Err(TagError::InvalidKey { key: key.into() });
    }
    Ok(())
}

// Parses the entry at the start of `tag`, which has no leading space.
fn parse_entry(tag: &str) -> Result<(TagEntry, &str), TagError> {
    let bytes = tag.as_bytes();
    let mut i = 0;
    while i < bytes.len() && is_key_byte(bytes[i]) {
        i += 1;
    }
    if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
        return Err(TagError::UnpairedKey { rest: tag.into() });
    }
    let key = &tag[..i];
    let tag = &tag[i + 1..];

    let bytes = tag.as_bytes();
    let mut i = 1;
    while i < bytes.len() && bytes[i] != b'"' {
        if bytes[i] == b'\\' {
            i += 1;
        }
        i += 1;
    }
    if i >= bytes.len() {
        return Err(TagError::UnterminatedValue {
            key: key.into(),
            rest: tag.into(),
        });
    }

    let value = unquote(&tag[..=i]).map_err(|source| TagError::InvalidValue {
        key: key.into(),
        source,
    })?;

    Ok((TagEntry::new(key, value), &tag[i + 1..]))
}

// -----------------------------------------------------------------------------
// Parse & Serialize

/// Parses a raw tag into its entries, in order.
///
/// # Examples
///
/// ```
/// use retag_tag::{parse_tag, TagEntry};
///
/// let entries = parse_tag(r#"json:"foo,omitempty" xml:"foo""#).unwrap();
/// assert_eq!(entries, [TagEntry::new("json", "foo,omitempty"), TagEntry::new("xml", "foo")]);
///
/// assert!(parse_tag("json").is_err());
/// assert!(parse_tag("").unwrap().is_empty());
/// ```
pub fn parse_tag(tag: &str) -> Result<Vec<TagEntry>, TagError> {
    TagEntries::new(tag).collect()
}

/// Serializes entries back into a tag.
///
/// Values are re-quoted and entries are joined by a single space.
///
/// # Examples
///
/// ```
/// use retag_tag::{tag_of, TagEntry};
///
/// let tag = tag_of(&[TagEntry::new("json", "foo"), TagEntry::new("bar", "baz")]);
/// assert_eq!(tag.as_str(), r#"json:"foo" bar:"baz""#);
/// assert!(tag_of(&[]).is_empty());
/// ```
pub fn tag_of(entries: &[TagEntry]) -> Tag {
    let mut out = String::new();
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{entry}");
    }
    Tag::from(out)
}

// -----------------------------------------------------------------------------
// Tests
