use alloc::borrow::Cow;

use retag_tag::Tag;

use crate::TypeShape;

// -----------------------------------------------------------------------------
// FieldShape

/// A named struct field: its type, its tag and how it is declared.
///
/// Fields are exported and not embedded unless told otherwise.
///
/// # Examples
///
/// ```
/// use retag_shape::{FieldShape, OpaqueShape};
///
/// let field = FieldShape::new("ID", OpaqueShape::new("int64"))
///     .with_tag(r#"json:"id,string""#);
///
/// assert_eq!(field.name(), "ID");
/// assert_eq!(field.ty().path().as_str(), "int64");
/// assert_eq!(field.tag().get("json"), "id,string");
/// assert!(field.is_exported() && !field.is_embedded());
/// ```
#[derive(Debug, Clone)]
pub struct FieldShape {
    name: Cow<'static, str>,
    ty: TypeShape,
    tag: Tag,
    embedded: bool,
    exported: bool,
}

impl FieldShape {
    /// Creates an exported, non-embedded field with an empty tag.
    pub fn new(name: impl Into<Cow<'static, str>>, ty: impl Into<TypeShape>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tag: Tag::empty(),
            embedded: false,
            exported: true,
        }
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Marks the field as embedded (anonymous).
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Sets the visibility.
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    // Same name, visibility and embedding with a new type and tag.
    pub(crate) fn rebuilt(&self, ty: TypeShape, tag: Tag) -> Self {
        Self {
            name: self.name.clone(),
            ty,
            tag,
            embedded: self.embedded,
            exported: self.exported,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeShape {
        &self.ty
    }

    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[inline]
    pub fn is_exported(&self) -> bool {
        self.exported
    }
}
