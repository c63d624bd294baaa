use alloc::borrow::Cow;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

use retag_utils::hash::HashSet;

// -----------------------------------------------------------------------------
// Capability

/// A named contract a type may satisfy, such as `json.MarshalerV2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    /// Creates a capability from a static name, usable in const context.
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a capability.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for Capability {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Capability {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Capability {
    #[inline]
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

// -----------------------------------------------------------------------------
// Capabilities

/// A set of [`Capability`] values.
///
/// # Examples
///
/// ```
/// use retag_shape::Capabilities;
///
/// let caps: Capabilities = ["json.Marshaler", "fmt.Stringer"].into_iter().collect();
/// assert!(caps.contains("fmt.Stringer"));
/// assert!(!caps.contains("json.Unmarshaler"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(HashSet<Capability>);

impl Capabilities {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self(HashSet::default())
    }

    /// Adds a capability, returns `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, capability: impl Into<Capability>) -> bool {
        self.0.insert(capability.into())
    }

    /// Returns `true` if the set holds the capability called `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the capabilities in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }
}

impl<C: Into<Capability>> FromIterator<C> for Capabilities {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Capability>> Extend<C> for Capabilities {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
