use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{TagEntries, TagEntry, TagError, add_tag_option, parse_tag, tag_of};

// -----------------------------------------------------------------------------
// Tag

/// An owned, raw field tag such as `json:"name,omitempty" xml:"name"`.
///
/// The text is not validated on construction; [`parse`](Tag::parse) and
/// [`entries`](Tag::entries) report malformed input, while
/// [`lookup`](Tag::lookup) and [`get`](Tag::get) are lenient and stop at the
/// first malformed entry.
///
/// # Examples
///
/// ```
/// use retag_tag::Tag;
///
/// let tag = Tag::new(r#"json:"id,omitempty" xml:"-""#);
/// assert_eq!(tag.lookup("json").as_deref(), Some("id,omitempty"));
/// assert_eq!(tag.get("yaml"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from raw text.
    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Creates an empty tag.
    #[inline]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the raw text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the tag and returns the raw text.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the raw text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scans the entries lazily.
    #[inline]
    pub fn entries(&self) -> TagEntries<'_> {
        TagEntries::new(&self.0)
    }

    /// Parses all entries, see [`parse_tag`].
    #[inline]
    pub fn parse(&self) -> Result<Vec<TagEntry>, TagError> {
        parse_tag(&self.0)
    }

    /// Returns the value for `key`, or `None` if the key is absent.
    ///
    /// Scanning stops at the first malformed entry.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.entries()
            .map_while(Result::ok)
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }

    /// Returns the value for `key`, or an empty string if the key is absent.
    #[inline]
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Inserts `option` into the entry for `key`, see [`add_tag_option`].
    #[inline]
    pub fn add_option(&self, key: &str, option: &str) -> Result<Tag, TagError> {
        add_tag_option(&self.0, key, option)
    }
}

impl fmt::Display for Tag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tag {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Tag {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Tag {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<Tag> for String {
    #[inline]
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl FromIterator<TagEntry> for Tag {
    fn from_iter<I: IntoIterator<Item = TagEntry>>(iter: I) -> Self {
        let entries: Vec<TagEntry> = iter.into_iter().collect();
        tag_of(&entries)
    }
}

// -----------------------------------------------------------------------------
// Tests
