//! A [`hashbrown`] set using [`FixedHashState`] by default.

use crate::hash::FixedHashState;

/// A [`hashbrown::HashSet`] with a fixed hasher.
///
/// # Examples
///
/// ```
/// use retag_utils::hash::HashSet;
///
/// let mut set: HashSet<&str> = HashSet::default();
/// assert!(set.insert("omitzero"));
/// assert!(!set.insert("omitzero"));
/// ```
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;
