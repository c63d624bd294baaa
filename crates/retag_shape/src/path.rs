use alloc::borrow::Cow;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// The identity of a shape, such as `demo::Nested` or `*demo::Nested`.
///
/// Two shapes with the same path are considered the same type. The last
/// segment (generics included) is the [`name`](TypePath::name).
///
/// # Examples
///
/// ```
/// use retag_shape::TypePath;
///
/// let path = TypePath::new("alloc::vec::Vec<demo::Item>");
/// assert_eq!(path.name(), "Vec<demo::Item>");
/// assert_eq!(path.module_path(), Some("alloc::vec"));
///
/// assert_eq!(TypePath::new("int").module_path(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypePath(Cow<'static, str>);

impl TypePath {
    /// Creates a path from a static string, usable in const context.
    #[inline]
    pub const fn from_static(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Creates a path.
    #[inline]
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    /// Returns the full path.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the type name without the module path.
    pub fn name(&self) -> &str {
        let s = self.as_str();
        match Self::split_at(s) {
            Some(start) => &s[start + 2..],
            None => s,
        }
    }

    /// Returns the module path, if any.
    pub fn module_path(&self) -> Option<&str> {
        let s = self.as_str();
        Self::split_at(s).map(|start| &s[..start])
    }

    // Index of the last `::` before any generic arguments.
    fn split_at(s: &str) -> Option<usize> {
        let end = s.find('<').unwrap_or(s.len());
        s[..end].rfind("::")
    }
}

impl fmt::Display for TypePath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for TypePath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypePath {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TypePath {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for TypePath {
    #[inline]
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
