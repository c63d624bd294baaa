//! Provide `FixedHasher`.
//!
//! `FixedHasher` is based on the `foldhash` crate and
//! gives stable hash results through a fixed hash seed.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

/// A fixed hasher whose results only depend on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`].
///
/// Which can be created through [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Fixed hash state based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use retag_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("json");
/// let b = FixedHashState.hash_one("json");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}
