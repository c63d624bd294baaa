use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::{BitOr, Not};

use crate::{Capability, TypeShape};

// -----------------------------------------------------------------------------
// Skipper

/// A predicate over field types, deciding which ones are left untouched.
///
/// The transformer does not recurse into a field type for which
/// [`skip`](Skipper::skip) returns `true`; [`AddOption`](crate::AddOption)
/// uses the same predicate to leave a field's tag alone.
///
/// Skippers are plain values, so they compare, hash and key a cache.
///
/// # Examples
///
/// ```
/// use retag_shape::{OpaqueShape, PointerShape, Skipper, TypeShape};
///
/// let skip = Skipper::implementor("json.Marshaler") | Skipper::anonymous();
///
/// let time = TypeShape::from(OpaqueShape::new("time.Time").with_capability("json.Marshaler"));
/// assert!(skip.skip(&time));
/// assert!(skip.skip(&PointerShape::to(time).into()));
/// assert!(!skip.skip(&OpaqueShape::new("int").into()));
///
/// assert!((!Skipper::Never).skip(&OpaqueShape::new("int").into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Skipper {
    /// Never skips.
    #[default]
    Never,
    /// Always skips.
    Always,
    /// Skips types satisfying the capability, directly, through the pointee
    /// of a pointer, or through a pointer to the type.
    Implementor(Capability),
    /// Skips structs with at least one embedded field, after dereferencing
    /// one pointer level.
    Anonymous,
    /// Negates the inner predicate.
    Not(Box<Skipper>),
    /// Skips if any inner predicate does, checked left to right.
    Any(Vec<Skipper>),
}

impl Skipper {
    /// See [`Skipper::Implementor`].
    #[inline]
    pub fn implementor(capability: impl Into<Capability>) -> Self {
        Self::Implementor(capability.into())
    }

    /// See [`Skipper::Anonymous`].
    #[inline]
    pub const fn anonymous() -> Self {
        Self::Anonymous
    }

    /// See [`Skipper::Not`].
    #[inline]
    pub fn not(inner: Skipper) -> Self {
        Self::Not(Box::new(inner))
    }

    /// See [`Skipper::Any`]. An empty list never skips.
    #[inline]
    pub fn any(skippers: impl IntoIterator<Item = Skipper>) -> Self {
        Self::Any(skippers.into_iter().collect())
    }

    /// Returns `true` if `ty` should be skipped.
    pub fn skip(&self, ty: &TypeShape) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Implementor(capability) => {
                let name = capability.as_str();
                ty.satisfies(name)
                    || matches!(ty, TypeShape::Pointer(ptr) if ptr.elem().satisfies(name))
                    || ty.satisfies_via_pointer(name)
            }
            Self::Anonymous => {
                let ty = match ty {
                    TypeShape::Pointer(ptr) => ptr.elem(),
                    _ => Cow::Borrowed(ty),
                };
                match ty.as_struct() {
                    Ok(shape) => shape.iter().any(|field| field.is_embedded()),
                    Err(_) => false,
                }
            }
            Self::Not(inner) => !inner.skip(ty),
            Self::Any(skippers) => skippers.iter().any(|skipper| skipper.skip(ty)),
        }
    }
}

impl Not for Skipper {
    type Output = Skipper;

    #[inline]
    fn not(self) -> Self::Output {
        Skipper::Not(Box::new(self))
    }
}

impl BitOr for Skipper {
    type Output = Skipper;

    /// Combines into one [`Skipper::Any`], flattening nested lists.
    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Any(mut left), Self::Any(right)) => {
                left.extend(right);
                Self::Any(left)
            }
            (Self::Any(mut left), right) => {
                left.push(right);
                Self::Any(left)
            }
            (left, right) => Self::Any(vec![left, right]),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::Skipper;
    use crate::{FieldShape, InterfaceShape, OpaqueShape, PointerShape, StructShape, TypeShape};

    fn int() -> TypeShape {
        OpaqueShape::new("int").into()
    }

    fn value_impl() -> TypeShape {
        OpaqueShape::new("demo::Und").with_capability("Undefinedable").into()
    }

    fn pointer_impl() -> TypeShape {
        StructShape::new("demo::Lazy", [FieldShape::new("V", int())])
            .with_pointer_capability("Undefinedable")
            .into()
    }

    fn with_embedded() -> TypeShape {
        StructShape::new("demo::Outer", [
            FieldShape::new("Inner", StructShape::new("demo::Inner", [])).embedded(),
            FieldShape::new("N", int()),
        ])
        .into()
    }

    #[test]
    fn constants() {
        assert!(!Skipper::Never.skip(&int()));
        assert!(Skipper::Always.skip(&int()));
        assert_eq!(Skipper::default(), Skipper::Never);
    }

    #[test]
    fn implementor_checks_three_ways() {
        let skip = Skipper::implementor("Undefinedable");
        assert!(skip.skip(&value_impl()));
        assert!(skip.skip(&PointerShape::to(value_impl()).into()));
        assert!(skip.skip(&pointer_impl()));
        assert!(skip.skip(&PointerShape::to(pointer_impl()).into()));
        assert!(!skip.skip(&int()));
        assert!(!skip.skip(&PointerShape::to(int()).into()));
    }

    #[test]
    fn implementor_on_interfaces() {
        let skip = Skipper::implementor("io.Reader");
        let iface = TypeShape::from(InterfaceShape::new("io.ReadCloser").with_capability("io.Reader"));
        assert!(skip.skip(&iface));
        assert!(!skip.skip(&InterfaceShape::new("any").into()));
    }

    #[test]
    fn anonymous_derefs_one_level() {
        let skip = Skipper::anonymous();
        assert!(skip.skip(&with_embedded()));
        assert!(skip.skip(&PointerShape::to(with_embedded()).into()));
        assert!(!skip.skip(&PointerShape::to(PointerShape::to(with_embedded())).into()));
        assert!(!skip.skip(&pointer_impl()));
        assert!(!skip.skip(&int()));
    }

    #[test]
    fn not_and_any() {
        let ty = value_impl();
        assert!(!Skipper::not(Skipper::implementor("Undefinedable")).skip(&ty));
        assert!(Skipper::not(Skipper::Never).skip(&ty));

        assert!(!Skipper::any([]).skip(&ty));
        assert!(Skipper::any([Skipper::Never, Skipper::Always]).skip(&ty));
        assert!(!Skipper::any([Skipper::Never, Skipper::anonymous()]).skip(&ty));
    }

    #[test]
    fn operators_build_values() {
        let combined = Skipper::Never | Skipper::Always | Skipper::anonymous();
        assert_eq!(
            combined,
            Skipper::Any(vec![Skipper::Never, Skipper::Always, Skipper::Anonymous])
        );
        assert_eq!(!Skipper::Never, Skipper::not(Skipper::Never));
        assert_ne!(Skipper::implementor("a"), Skipper::implementor("b"));
    }
}
