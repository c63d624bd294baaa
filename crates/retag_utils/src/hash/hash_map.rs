//! A [`hashbrown`] map using [`FixedHashState`] by default.

use crate::hash::FixedHashState;

/// A [`hashbrown::HashMap`] with a fixed hasher.
///
/// # Examples
///
/// ```
/// use retag_utils::hash::HashMap;
///
/// let mut map: HashMap<&str, u32> = HashMap::default();
/// map.insert("json", 1);
/// assert_eq!(map.get("json"), Some(&1));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;
