//! Static shapes for Rust types.
//!
//! [`Shaped`] gives a type a `&'static` [`TypeShape`], built once and stored
//! in a static cell:
//!
//! - [`ShapeCell`] for non generic types, a plain [`OnceLock`].
//! - [`GenericShapeCell`] for generic types. A `static` inside a generic
//!   function is shared by every instantiation, so the cell maps each
//!   [`TypeId`] to its own leaked shape.
//!
//! Primitive types and `String` are opaque. `Box<T>` is a deferred pointer to
//! `T`, which is how a struct refers to itself.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use retag_utils::hash::{FixedHashState, HashMap};

use crate::{OpaqueShape, PointerShape, TypePath, TypeShape};

// -----------------------------------------------------------------------------
// Shaped

/// A static accessor to the shape of a type.
///
/// # Examples
///
/// ```
/// use retag_shape::{FieldShape, Shaped, ShapeCell, StructShape, TypePath, TypeShape};
///
/// struct Node {
///     value: i32,
///     next: Option<Box<Node>>,
/// }
///
/// impl Shaped for Node {
///     fn type_path() -> TypePath {
///         TypePath::from_static("demo::Node")
///     }
///
///     fn shape() -> &'static TypeShape {
///         static CELL: ShapeCell = ShapeCell::new();
///         CELL.get_or_init(|| {
///             StructShape::new(Self::type_path(), [
///                 FieldShape::new("Value", i32::shape().clone()).with_tag(r#"json:"value""#),
///                 FieldShape::new("Next", <Box<Node>>::shape().clone()),
///             ])
///             .into()
///         })
///     }
/// }
///
/// let next = Node::shape().as_struct().unwrap().field("Next").unwrap();
/// assert_eq!(next.ty().path().as_str(), "*demo::Node");
/// ```
pub trait Shaped: 'static {
    /// Returns the identity of the type, without building its shape.
    fn type_path() -> TypePath;

    /// Returns the shape, built on first access.
    fn shape() -> &'static TypeShape;
}

// -----------------------------------------------------------------------------
// ShapeCell

/// Static storage for the shape of a non generic type.
///
/// See [`Shaped`] for an example.
pub struct ShapeCell(OnceLock<TypeShape>);

impl ShapeCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored shape, building it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeShape) -> &TypeShape {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericShapeCell

/// Static storage for the shapes of a generic type, one per instantiation.
///
/// # Examples
///
/// ```
/// use retag_shape::{GenericShapeCell, OpaqueShape, Shaped, TypePath, TypeShape};
///
/// struct Wrapper<T>(T);
///
/// impl<T: Shaped> Shaped for Wrapper<T> {
///     fn type_path() -> TypePath {
///         TypePath::new(format!("demo::Wrapper<{}>", T::type_path()))
///     }
///
///     fn shape() -> &'static TypeShape {
///         static CELL: GenericShapeCell = GenericShapeCell::new();
///         CELL.get_or_insert::<Self>(|| OpaqueShape::new(Self::type_path()).into())
///     }
/// }
///
/// assert_eq!(<Wrapper<u8>>::shape().path().as_str(), "demo::Wrapper<u8>");
/// assert_eq!(<Wrapper<bool>>::shape().path().as_str(), "demo::Wrapper<bool>");
/// ```
pub struct GenericShapeCell(RwLock<HashMap<TypeId, &'static TypeShape>>);

impl GenericShapeCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedHashState)))
    }

    /// Returns the shape stored for `G`, building it with `f` on first access.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeShape) -> &'static TypeShape {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> TypeShape) -> &'static TypeShape {
        match self.get_by_type_id(type_id) {
            Some(shape) => shape,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeShape> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, shape: TypeShape) -> &'static TypeShape {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| &*Box::leak(Box::new(shape)))
    }
}

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_opaque {
    ($($ty:ty => $path:literal),* $(,)?) => {
        $(
            impl Shaped for $ty {
                #[inline]
                fn type_path() -> TypePath {
                    TypePath::from_static($path)
                }

                fn shape() -> &'static TypeShape {
                    static CELL: ShapeCell = ShapeCell::new();
                    CELL.get_or_init(|| OpaqueShape::new($path).into())
                }
            }
        )*
    };
}

impl_opaque!(
    bool => "bool",
    char => "char",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    f32 => "f32",
    f64 => "f64",
    String => "alloc::string::String",
);

fn resolve<T: Shaped>() -> TypeShape {
    T::shape().clone()
}

impl<T: Shaped> Shaped for Box<T> {
    fn type_path() -> TypePath {
        TypePath::from(format!("*{}", T::type_path()))
    }

    fn shape() -> &'static TypeShape {
        static CELL: GenericShapeCell = GenericShapeCell::new();
        CELL.get_or_insert::<Self>(|| PointerShape::deferred(T::type_path(), resolve::<T>).into())
    }
}

// -----------------------------------------------------------------------------
// Tests
