use alloc::borrow::Cow;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::{Capabilities, Capability, FieldShape, TypePath};

// -----------------------------------------------------------------------------
// ShapeKind

/// The kind of a [`TypeShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Struct,
    Pointer,
    Interface,
    Opaque,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::Pointer => f.pad("Pointer"),
            Self::Interface => f.pad("Interface"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a [`TypeShape`] is not the expected [`ShapeKind`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("shape kind mismatch: expected {expected}, received {received}")]
pub struct ShapeKindError {
    pub expected: ShapeKind,
    pub received: ShapeKind,
}

// -----------------------------------------------------------------------------
// TypeShape

/// Describes a type as seen by the tag transformer.
///
/// - [`StructShape`]: named, ordered, tagged fields.
/// - [`PointerShape`]: a reference to another shape.
/// - [`InterfaceShape`]: a capability type, never looked into.
/// - [`OpaqueShape`]: scalars and everything else without fields.
///
/// Shapes are immutable values; struct bodies are shared behind an `Arc`
/// so cloning is cheap.
#[derive(Debug, Clone)]
pub enum TypeShape {
    Struct(StructShape),
    Pointer(PointerShape),
    Interface(InterfaceShape),
    Opaque(OpaqueShape),
}

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $shape:ident) => {
        #[doc = concat!("Returns the inner [`", stringify!($shape), "`], or an error for other kinds.")]
        pub const fn $name(&self) -> Result<&$shape, ShapeKindError> {
            match self {
                Self::$kind(shape) => Ok(shape),
                _ => Err(ShapeKindError {
                    expected: ShapeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

macro_rules! impl_is_method {
    ($name:ident : $kind:ident) => {
        #[inline]
        pub const fn $name(&self) -> bool {
            matches!(self, Self::$kind(..))
        }
    };
}

impl TypeShape {
    impl_cast_method!(as_struct: Struct => StructShape);
    impl_cast_method!(as_pointer: Pointer => PointerShape);
    impl_cast_method!(as_interface: Interface => InterfaceShape);
    impl_cast_method!(as_opaque: Opaque => OpaqueShape);

    impl_is_method!(is_struct: Struct);
    impl_is_method!(is_pointer: Pointer);
    impl_is_method!(is_interface: Interface);
    impl_is_method!(is_opaque: Opaque);

    /// Returns the [`ShapeKind`].
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Struct(_) => ShapeKind::Struct,
            Self::Pointer(_) => ShapeKind::Pointer,
            Self::Interface(_) => ShapeKind::Interface,
            Self::Opaque(_) => ShapeKind::Opaque,
        }
    }

    /// Returns the type path.
    pub const fn path(&self) -> &TypePath {
        match self {
            Self::Struct(shape) => &shape.path,
            Self::Pointer(shape) => &shape.path,
            Self::Interface(shape) => &shape.path,
            Self::Opaque(shape) => &shape.path,
        }
    }

    /// Returns `true` if a value of this type satisfies `capability`.
    ///
    /// A pointer satisfies both the value and the pointer capabilities of
    /// its pointee.
    pub fn satisfies(&self, capability: &str) -> bool {
        match self {
            Self::Struct(shape) => shape.capabilities.contains(capability),
            Self::Opaque(shape) => shape.capabilities.contains(capability),
            Self::Interface(shape) => shape.provides.contains(capability),
            Self::Pointer(shape) => shape.elem().satisfies_via_pointer(capability),
        }
    }

    /// Returns `true` if a pointer to this type would satisfy `capability`.
    ///
    /// Pointers to pointers and pointers to interfaces satisfy nothing.
    pub fn satisfies_via_pointer(&self, capability: &str) -> bool {
        match self {
            Self::Struct(shape) => {
                shape.capabilities.contains(capability) || shape.pointer_capabilities.contains(capability)
            }
            Self::Opaque(shape) => {
                shape.capabilities.contains(capability) || shape.pointer_capabilities.contains(capability)
            }
            Self::Interface(_) | Self::Pointer(_) => false,
        }
    }
}

impl From<StructShape> for TypeShape {
    #[inline]
    fn from(value: StructShape) -> Self {
        Self::Struct(value)
    }
}

impl From<PointerShape> for TypeShape {
    #[inline]
    fn from(value: PointerShape) -> Self {
        Self::Pointer(value)
    }
}

impl From<InterfaceShape> for TypeShape {
    #[inline]
    fn from(value: InterfaceShape) -> Self {
        Self::Interface(value)
    }
}

impl From<OpaqueShape> for TypeShape {
    #[inline]
    fn from(value: OpaqueShape) -> Self {
        Self::Opaque(value)
    }
}

// -----------------------------------------------------------------------------
// StructShape

/// A struct with named fields in declaration order.
///
/// # Examples
///
/// ```
/// use retag_shape::{FieldShape, OpaqueShape, StructShape};
///
/// let shape = StructShape::new("demo::User", [
///     FieldShape::new("Name", OpaqueShape::new("string")).with_tag(r#"json:"name""#),
///     FieldShape::new("Age", OpaqueShape::new("int")),
/// ])
/// .with_capability("fmt.Stringer");
///
/// assert_eq!(shape.name(), "User");
/// assert_eq!(shape.field_len(), 2);
/// assert_eq!(shape.index_of("Age"), Some(1));
/// assert_eq!(shape.field("Name").unwrap().tag().get("json"), "name");
/// ```
#[derive(Debug, Clone)]
pub struct StructShape {
    path: TypePath,
    fields: Arc<[FieldShape]>,
    capabilities: Capabilities,
    pointer_capabilities: Capabilities,
}

impl StructShape {
    /// Creates a struct shape without capabilities.
    pub fn new(path: impl Into<TypePath>, fields: impl IntoIterator<Item = FieldShape>) -> Self {
        Self {
            path: path.into(),
            fields: fields.into_iter().collect(),
            capabilities: Capabilities::new(),
            pointer_capabilities: Capabilities::new(),
        }
    }

    /// Adds a capability satisfied by values of this type.
    pub fn with_capability(mut self, capability: impl Into<Capability>) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Adds a capability satisfied only by pointers to this type.
    pub fn with_pointer_capability(mut self, capability: impl Into<Capability>) -> Self {
        self.pointer_capabilities.insert(capability);
        self
    }

    // Same identity and capabilities, new field list.
    pub(crate) fn with_fields(&self, fields: Vec<FieldShape>) -> Self {
        Self {
            path: self.path.clone(),
            fields: fields.into(),
            capabilities: self.capabilities.clone(),
            pointer_capabilities: self.pointer_capabilities.clone(),
        }
    }

    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// Returns the fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Returns the field called `name`, if present.
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the field at `index`, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldShape> {
        self.fields.get(index)
    }

    /// Returns the index of the field called `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns an iterator over the fields in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, FieldShape> {
        self.fields.iter()
    }

    /// Capabilities satisfied by values of this type.
    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Capabilities satisfied only by pointers to this type.
    #[inline]
    pub fn pointer_capabilities(&self) -> &Capabilities {
        &self.pointer_capabilities
    }
}

impl<'a> IntoIterator for &'a StructShape {
    type Item = &'a FieldShape;
    type IntoIter = core::slice::Iter<'a, FieldShape>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// -----------------------------------------------------------------------------
// PointerShape

#[derive(Debug, Clone)]
enum Pointee {
    Eager(Arc<TypeShape>),
    // The pointee is built on access, so a type may point to itself.
    Deferred { path: TypePath, resolve: fn() -> TypeShape },
}

/// A pointer to another shape.
///
/// The pointee is either stored directly, or resolved on access through a
/// function, which is how self-referential types are described.
///
/// # Examples
///
/// ```
/// use retag_shape::{FieldShape, PointerShape, StructShape, TypeShape};
///
/// fn node() -> TypeShape {
///     StructShape::new("demo::Node", [
///         FieldShape::new("Next", PointerShape::deferred("demo::Node", node)),
///     ])
///     .into()
/// }
///
/// let next = PointerShape::deferred("demo::Node", node);
/// assert_eq!(next.path().as_str(), "*demo::Node");
/// assert!(next.elem().is_struct());
/// ```
#[derive(Debug, Clone)]
pub struct PointerShape {
    path: TypePath,
    pointee: Pointee,
}

impl PointerShape {
    /// Creates a pointer to `elem`.
    pub fn to(elem: impl Into<TypeShape>) -> Self {
        let elem: TypeShape = elem.into();
        Self {
            path: Self::pointer_path(elem.path()),
            pointee: Pointee::Eager(Arc::new(elem)),
        }
    }

    /// Creates a pointer whose pointee, identified by `path`, is built by `resolve`.
    pub fn deferred(path: impl Into<TypePath>, resolve: fn() -> TypeShape) -> Self {
        let path: TypePath = path.into();
        Self {
            path: Self::pointer_path(&path),
            pointee: Pointee::Deferred { path, resolve },
        }
    }

    fn pointer_path(elem: &TypePath) -> TypePath {
        TypePath::from(format!("*{elem}"))
    }

    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    /// Returns the path of the pointee without resolving it.
    pub fn elem_path(&self) -> &TypePath {
        match &self.pointee {
            Pointee::Eager(elem) => elem.path(),
            Pointee::Deferred { path, .. } => path,
        }
    }

    /// Returns the pointee, resolving a deferred one.
    pub fn elem(&self) -> Cow<'_, TypeShape> {
        match &self.pointee {
            Pointee::Eager(elem) => Cow::Borrowed(elem),
            Pointee::Deferred { resolve, .. } => Cow::Owned(resolve()),
        }
    }

    /// Returns `true` if the pointee is resolved on access.
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self.pointee, Pointee::Deferred { .. })
    }
}

// -----------------------------------------------------------------------------
// InterfaceShape

/// A capability type. It is never recursed into.
#[derive(Debug, Clone)]
pub struct InterfaceShape {
    path: TypePath,
    provides: Capabilities,
}

impl InterfaceShape {
    /// Creates an interface shape providing no capability.
    pub fn new(path: impl Into<TypePath>) -> Self {
        Self {
            path: path.into(),
            provides: Capabilities::new(),
        }
    }

    /// Adds a capability provided by every value of this interface.
    pub fn with_capability(mut self, capability: impl Into<Capability>) -> Self {
        self.provides.insert(capability);
        self
    }

    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.provides
    }
}

// -----------------------------------------------------------------------------
// OpaqueShape

/// A type without fields, such as `int`, `string` or a wrapper with custom
/// encoding.
#[derive(Debug, Clone)]
pub struct OpaqueShape {
    path: TypePath,
    capabilities: Capabilities,
    pointer_capabilities: Capabilities,
}

impl OpaqueShape {
    /// Creates an opaque shape without capabilities.
    pub fn new(path: impl Into<TypePath>) -> Self {
        Self {
            path: path.into(),
            capabilities: Capabilities::new(),
            pointer_capabilities: Capabilities::new(),
        }
    }

    /// Adds a capability satisfied by values of this type.
    pub fn with_capability(mut self, capability: impl Into<Capability>) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Adds a capability satisfied only by pointers to this type.
    pub fn with_pointer_capability(mut self, capability: impl Into<Capability>) -> Self {
        self.pointer_capabilities.insert(capability);
        self
    }

    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[inline]
    pub fn pointer_capabilities(&self) -> &Capabilities {
        &self.pointer_capabilities
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{InterfaceShape, OpaqueShape, PointerShape, ShapeKind, StructShape, TypeShape};
    use crate::FieldShape;

    fn marshaler() -> TypeShape {
        StructShape::new("demo::Stamp", [])
            .with_capability("fmt.Stringer")
            .with_pointer_capability("json.Unmarshaler")
            .into()
    }

    #[test]
    fn kind_casts() {
        let shape = TypeShape::from(OpaqueShape::new("int"));
        assert_eq!(shape.kind(), ShapeKind::Opaque);
        assert!(shape.is_opaque());
        assert!(shape.as_opaque().is_ok());

        let err = shape.as_struct().unwrap_err();
        assert_eq!(err.expected, ShapeKind::Struct);
        assert_eq!(err.received, ShapeKind::Opaque);
        assert_eq!(
            err.to_string(),
            "shape kind mismatch: expected Struct, received Opaque"
        );
    }

    #[test]
    fn value_and_pointer_capabilities() {
        let value = marshaler();
        assert!(value.satisfies("fmt.Stringer"));
        assert!(!value.satisfies("json.Unmarshaler"));
        assert!(value.satisfies_via_pointer("json.Unmarshaler"));

        let ptr = TypeShape::from(PointerShape::to(value));
        assert!(ptr.satisfies("fmt.Stringer"));
        assert!(ptr.satisfies("json.Unmarshaler"));
        assert!(!ptr.satisfies_via_pointer("fmt.Stringer"));
    }

    #[test]
    fn interfaces_satisfy_what_they_provide() {
        let iface = TypeShape::from(InterfaceShape::new("io.Reader").with_capability("io.Reader"));
        assert!(iface.satisfies("io.Reader"));
        assert!(!iface.satisfies_via_pointer("io.Reader"));
        assert!(!PointerShape::to(iface).elem().satisfies_via_pointer("io.Reader"));
    }

    #[test]
    fn pointer_paths() {
        let eager = PointerShape::to(marshaler());
        assert_eq!(eager.path().as_str(), "*demo::Stamp");
        assert_eq!(eager.elem_path().as_str(), "demo::Stamp");
        assert!(!eager.is_deferred());

        let deferred = PointerShape::deferred("demo::Stamp", marshaler);
        assert_eq!(deferred.path(), eager.path());
        assert!(deferred.is_deferred());
        assert!(deferred.elem().satisfies("fmt.Stringer"));
    }

    #[test]
    fn struct_field_lookup() {
        let shape = StructShape::new("demo::Pair", [
            FieldShape::new("A", OpaqueShape::new("int")),
            FieldShape::new("B", OpaqueShape::new("string")),
        ]);
        assert_eq!(shape.field_len(), 2);
        assert_eq!(shape.field_at(1).unwrap().name(), "B");
        assert!(shape.field("C").is_none());
        let names: alloc::vec::Vec<_> = shape.iter().map(FieldShape::name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn shapes_are_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<TypeShape>();
        check::<StructShape>();
    }
}
