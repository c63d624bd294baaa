use alloc::string::String;
use alloc::vec::Vec;

use retag_utils::hash::HashSet;

use crate::{FieldShape, PointerShape, Skipper, StructShape, TagMutator, TransformError, TypePath, TypeShape};

// -----------------------------------------------------------------------------
// CyclePolicy

/// What the transformer does when a struct is reached again inside itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CyclePolicy {
    /// Return [`TransformError::CyclicType`].
    #[default]
    Fail,
    /// Keep the field's type as it is. Its tag is still rewritten.
    KeepOriginal,
}

// -----------------------------------------------------------------------------
// Transform

/// Configured tag transformer, see [`mutate_tag`].
///
/// # Examples
///
/// ```
/// use retag_shape::{AddOption, CyclePolicy, FieldShape, PointerShape, Skipper, StructShape, Transform, TypeShape};
///
/// fn list() -> TypeShape {
///     StructShape::new("demo::List", [
///         FieldShape::new("Next", PointerShape::deferred("demo::List", list)),
///     ])
///     .into()
/// }
///
/// let shape = list();
/// let shape = shape.as_struct().unwrap();
/// let mutator = AddOption::new("json", ",omitempty");
///
/// assert!(Transform::new().apply(shape, &Skipper::Never, &mutator).is_err());
///
/// let out = Transform::new()
///     .with_cycle_policy(CyclePolicy::KeepOriginal)
///     .apply(shape, &Skipper::Never, &mutator)
///     .unwrap();
/// assert_eq!(out.field_at(0).unwrap().tag().as_str(), r#"json:",omitempty""#);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Transform {
    cycles: CyclePolicy,
}

impl Transform {
    /// Creates a transformer that fails on cyclic types.
    #[inline]
    pub const fn new() -> Self {
        Self {
            cycles: CyclePolicy::Fail,
        }
    }

    /// Sets the [`CyclePolicy`].
    #[inline]
    pub const fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycles = policy;
        self
    }

    #[inline]
    pub const fn cycle_policy(&self) -> CyclePolicy {
        self.cycles
    }

    /// Builds a copy of `ty` with every field tag rewritten by `mutator`.
    ///
    /// Nested structs, and pointers to structs, are rewritten too unless
    /// `skip` matches the field type. Interfaces and opaque types are kept.
    /// The source shape is not modified.
    pub fn apply<M>(&self, ty: &StructShape, skip: &Skipper, mutator: &M) -> Result<StructShape, TransformError>
    where
        M: TagMutator + ?Sized,
    {
        let mut walker = Walker {
            cycles: self.cycles,
            skip,
            mutator,
            active: HashSet::default(),
        };
        walker.visit_struct(ty)
    }
}

/// Builds a copy of `ty` with every field tag rewritten by `mutator`,
/// failing on cyclic types.
///
/// For each field, in order:
///
/// - if `skip` does not match the field type and it is a struct, the struct is
///   rewritten recursively;
/// - if `skip` does not match and it is a pointer to a struct, the pointee is
///   rewritten and a new pointer is built around it;
/// - otherwise the type is kept.
///
/// The new tag is `mutator.mutate(field)`, called with the source field.
/// Names, order, visibility and embedding are preserved.
///
/// # Examples
///
/// ```
/// use retag_shape::{AddOption, FieldShape, OpaqueShape, Skipper, StructShape, mutate_tag};
///
/// let nested = StructShape::new("demo::Nested", [
///     FieldShape::new("Bar", OpaqueShape::new("string")).with_tag(r#"json:"bar""#),
/// ]);
/// let outer = StructShape::new("demo::Outer", [
///     FieldShape::new("Foo", OpaqueShape::new("string")),
///     FieldShape::new("Baz", nested),
/// ]);
///
/// let out = mutate_tag(&outer, &Skipper::Never, &AddOption::new("json", ",omitzero")).unwrap();
///
/// let baz = out.field("Baz").unwrap().ty().as_struct().unwrap();
/// assert_eq!(baz.field("Bar").unwrap().tag().as_str(), r#"json:"bar,omitzero""#);
/// ```
pub fn mutate_tag<M>(ty: &StructShape, skip: &Skipper, mutator: &M) -> Result<StructShape, TransformError>
where
    M: TagMutator + ?Sized,
{
    Transform::new().apply(ty, skip, mutator)
}

// -----------------------------------------------------------------------------
// Walker

struct Walker<'a, M: ?Sized> {
    cycles: CyclePolicy,
    skip: &'a Skipper,
    mutator: &'a M,
    // Struct paths on the current recursion path.
    active: HashSet<TypePath>,
}

impl<M: TagMutator + ?Sized> Walker<'_, M> {
    fn visit_struct(&mut self, ty: &StructShape) -> Result<StructShape, TransformError> {
        self.active.insert(ty.path().clone());
        let fields = ty
            .iter()
            .map(|field| self.visit_field(ty, field))
            .collect::<Result<Vec<_>, _>>();
        self.active.remove(ty.path());
        Ok(ty.with_fields(fields?))
    }

    fn visit_field(&mut self, owner: &StructShape, field: &FieldShape) -> Result<FieldShape, TransformError> {
        log::trace!("rewriting field `{}` of `{}`", field.name(), owner.path());

        let ty = self.visit_type(field.ty())?;
        let tag = self.mutator.mutate(field).map_err(|source| TransformError::Tag {
            ty: owner.path().clone(),
            field: String::from(field.name()),
            source,
        })?;

        Ok(field.rebuilt(ty, tag))
    }

    fn visit_type(&mut self, ty: &TypeShape) -> Result<TypeShape, TransformError> {
        if self.skip.skip(ty) {
            return Ok(ty.clone());
        }
        match ty {
            TypeShape::Struct(inner) => {
                if !self.enter(inner.path())? {
                    return Ok(ty.clone());
                }
                Ok(TypeShape::Struct(self.visit_struct(inner)?))
            }
            TypeShape::Pointer(ptr) => {
                let elem = ptr.elem();
                let TypeShape::Struct(inner) = &*elem else {
                    return Ok(ty.clone());
                };
                if !self.enter(inner.path())? {
                    return Ok(ty.clone());
                }
                let inner = self.visit_struct(inner)?;
                Ok(TypeShape::Pointer(PointerShape::to(inner)))
            }
            TypeShape::Interface(_) | TypeShape::Opaque(_) => Ok(ty.clone()),
        }
    }

    // Returns `false` when the struct is already being rewritten and should be kept.
    fn enter(&self, path: &TypePath) -> Result<bool, TransformError> {
        if !self.active.contains(path) {
            log::debug!("recursing into `{path}`");
            return Ok(true);
        }
        match self.cycles {
            CyclePolicy::Fail => Err(TransformError::CyclicType { path: path.clone() }),
            CyclePolicy::KeepOriginal => {
                log::warn!("`{path}` contains itself, keeping the nested type unchanged");
                Ok(false)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
