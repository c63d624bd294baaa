use core::hash::Hash;
use std::sync::{PoisonError, RwLock};

use retag_utils::hash::{FixedHashState, HashMap};

use crate::{Skipper, StructShape, TagMutator, Transform, TransformError, TypePath};

type CacheKey<M> = (TypePath, Skipper, M);

// -----------------------------------------------------------------------------
// ShapeCache

/// Memoizes [`Transform::apply`] per source type, skipper and mutator.
///
/// Shapes are identified by their [`TypePath`]: the first result computed for
/// a path is returned for every later call with the same skipper and mutator.
/// Use [`clear`](ShapeCache::clear) after redefining a shape.
///
/// Lookups take a read lock; a miss is transformed without holding any lock,
/// then stored once under the write lock.
///
/// # Examples
///
/// ```
/// use retag_shape::{AddOption, FieldShape, OpaqueShape, ShapeCache, Skipper, StructShape};
///
/// static CACHE: ShapeCache<AddOption> = ShapeCache::new();
///
/// let shape = StructShape::new("demo::User", [FieldShape::new("Name", OpaqueShape::new("string"))]);
/// let omitempty = AddOption::new("json", ",omitempty");
///
/// let first = CACHE.get_or_transform(&shape, &Skipper::Never, &omitempty).unwrap();
/// let second = CACHE.get_or_transform(&shape, &Skipper::Never, &omitempty).unwrap();
/// assert_eq!(first.field_at(0).unwrap().tag(), second.field_at(0).unwrap().tag());
/// assert_eq!(CACHE.len(), 1);
/// ```
pub struct ShapeCache<M> {
    transform: Transform,
    map: RwLock<HashMap<CacheKey<M>, StructShape>>,
}

impl<M> ShapeCache<M> {
    /// Creates an empty cache using the default [`Transform`].
    #[inline]
    pub const fn new() -> Self {
        Self::with_transform(Transform::new())
    }

    /// Creates an empty cache using `transform` on misses.
    #[inline]
    pub const fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            map: RwLock::new(HashMap::with_hasher(FixedHashState)),
        }
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the number of cached shapes.
    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached shape.
    pub fn clear(&self) {
        self.map.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<M> ShapeCache<M>
where
    M: TagMutator + Clone + Eq + Hash,
{
    /// Returns the cached transform of `ty`, computing it on first use.
    ///
    /// Errors are not cached.
    pub fn get_or_transform(&self, ty: &StructShape, skip: &Skipper, mutator: &M) -> Result<StructShape, TransformError> {
        let key = (ty.path().clone(), skip.clone(), mutator.clone());

        if let Some(shape) = self.map.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(shape.clone());
        }

        let shape = self.transform.apply(ty, skip, mutator)?;

        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let shape = map.entry(key).or_insert_with(|| {
            log::debug!("caching rewritten shape of `{}`", ty.path());
            shape
        });
        Ok(shape.clone())
    }
}

impl<M> Default for ShapeCache<M> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
