use alloc::borrow::Cow;

use retag_tag::{Tag, TagError, add_tag_option};

use crate::{FieldShape, Skipper};

// -----------------------------------------------------------------------------
// TagMutator

/// Computes the new tag of a field.
///
/// The transformer calls [`mutate`](TagMutator::mutate) once per field, with
/// the field as it appears in the source shape. Closures taking a
/// `&FieldShape` implement this trait.
///
/// # Examples
///
/// ```
/// use retag_shape::{FieldShape, OpaqueShape, Tag, TagError, TagMutator};
///
/// let upper = |field: &FieldShape| -> Result<Tag, TagError> {
///     Ok(Tag::new(field.tag().as_str().to_uppercase()))
/// };
///
/// let field = FieldShape::new("A", OpaqueShape::new("int")).with_tag(r#"json:"a""#);
/// assert_eq!(upper.mutate(&field).unwrap().as_str(), r#"JSON:"A""#);
/// ```
pub trait TagMutator {
    fn mutate(&self, field: &FieldShape) -> Result<Tag, TagError>;
}

impl<F> TagMutator for F
where
    F: Fn(&FieldShape) -> Result<Tag, TagError>,
{
    #[inline]
    fn mutate(&self, field: &FieldShape) -> Result<Tag, TagError> {
        self(field)
    }
}

// -----------------------------------------------------------------------------
// ErrorMode

/// How a mutator reacts to a malformed tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Return the error.
    #[default]
    Strict,
    /// Log a warning and keep the original tag.
    BestEffort,
}

// -----------------------------------------------------------------------------
// AddOption

/// Adds an option to one tag key of every field, see
/// [`add_tag_option`](retag_tag::add_tag_option).
///
/// Fields whose type matches `ignore_if` keep their tag.
///
/// # Examples
///
/// ```
/// use retag_shape::{AddOption, FieldShape, OpaqueShape, Skipper, TagMutator};
///
/// let omitzero = AddOption::new("json", ",omitzero")
///     .ignore_if(Skipper::implementor("Undefinedable"));
///
/// let plain = FieldShape::new("A", OpaqueShape::new("string"));
/// assert_eq!(omitzero.mutate(&plain).unwrap().as_str(), r#"json:",omitzero""#);
///
/// let und = FieldShape::new("B", OpaqueShape::new("demo::Und").with_capability("Undefinedable"))
///     .with_tag(r#"json:"b""#);
/// assert_eq!(omitzero.mutate(&und).unwrap().as_str(), r#"json:"b""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddOption {
    key: Cow<'static, str>,
    option: Cow<'static, str>,
    ignore_if: Skipper,
    mode: ErrorMode,
}

impl AddOption {
    /// Creates a strict mutator adding `option` under `key` on every field.
    pub fn new(key: impl Into<Cow<'static, str>>, option: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            option: option.into(),
            ignore_if: Skipper::Never,
            mode: ErrorMode::Strict,
        }
    }

    /// Leaves the tag of fields whose type matches `skipper` unchanged.
    pub fn ignore_if(mut self, skipper: Skipper) -> Self {
        self.ignore_if = skipper;
        self
    }

    /// Sets the [`ErrorMode`].
    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn option(&self) -> &str {
        &self.option
    }

    #[inline]
    pub fn mode(&self) -> ErrorMode {
        self.mode
    }
}

impl TagMutator for AddOption {
    fn mutate(&self, field: &FieldShape) -> Result<Tag, TagError> {
        if self.ignore_if.skip(field.ty()) {
            return Ok(field.tag().clone());
        }
        match add_tag_option(field.tag().as_str(), &self.key, &self.option) {
            Ok(tag) => Ok(tag),
            Err(err) if self.mode == ErrorMode::BestEffort => {
                log::warn!(
                    "keeping the tag of field `{}` unchanged: {err}",
                    field.name()
                );
                Ok(field.tag().clone())
            }
            Err(err) => Err(err),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{AddOption, ErrorMode, TagMutator};
    use crate::{FieldShape, OpaqueShape, PointerShape, Skipper, Tag, TagError};

    fn field(tag: &'static str) -> FieldShape {
        FieldShape::new("F", OpaqueShape::new("string")).with_tag(tag)
    }

    #[test]
    fn adds_to_existing_key() {
        let m = AddOption::new("json", "omitempty");
        assert_eq!(m.mutate(&field(r#"json:"f""#)).unwrap().as_str(), r#"json:"f,omitempty""#);
        assert_eq!(
            m.mutate(&field(r#"json:"f,omitempty""#)).unwrap().as_str(),
            r#"json:"f,omitempty""#
        );
    }

    #[test]
    fn ignore_if_sees_the_field_type() {
        let m = AddOption::new("json", ",omitzero").ignore_if(Skipper::implementor("Undefinedable"));
        let und = OpaqueShape::new("demo::Und").with_pointer_capability("Undefinedable");
        let f = FieldShape::new("U", PointerShape::to(und)).with_tag(r#"json:"u""#);
        assert_eq!(m.mutate(&f).unwrap().as_str(), r#"json:"u""#);
    }

    #[test]
    fn strict_propagates() {
        let m = AddOption::new("json", "omitempty");
        assert_eq!(
            m.mutate(&field(r#"json:"f,""#)),
            Err(TagError::MalformedOption { value: "f,".to_string() })
        );
        assert!(m.mutate(&field("json")).is_err());
    }

    #[test]
    fn best_effort_keeps_original() {
        let m = AddOption::new("json", "omitempty").with_mode(ErrorMode::BestEffort);
        assert_eq!(m.mode(), ErrorMode::BestEffort);
        assert_eq!(m.mutate(&field(r#"json:"f,""#)).unwrap().as_str(), r#"json:"f,""#);
        assert_eq!(m.mutate(&field("json")).unwrap().as_str(), "json");
    }

    #[test]
    fn closures_are_mutators() {
        let clear = |_: &FieldShape| -> Result<Tag, TagError> { Ok(Tag::empty()) };
        assert!(clear.mutate(&field(r#"json:"f""#)).unwrap().is_empty());

        let fail = |_: &FieldShape| -> Result<Tag, TagError> { Err(TagError::UnexpectedEnd) };
        assert_eq!(fail.mutate(&field("")), Err(TagError::UnexpectedEnd));
    }
}
