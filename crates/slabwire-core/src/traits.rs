//! The free-block registry contract.

use crate::error::RegistryFull;

/// A bounded, thread-safe pool of available block offsets for one size class.
///
/// Implementations must allow `take` and `put` to be called concurrently
/// from different threads, and neither may block: `take` on an empty
/// registry returns `None` immediately. No ordering is guaranteed among
/// several available offsets.
pub trait FreeBlockRegistry: Send + Sync {
    /// Return `offset` to the available set.
    ///
    /// The caller must currently hold `offset`. A registry that is already
    /// full reports [`RegistryFull`].
    fn put(&self, offset: u32) -> Result<(), RegistryFull>;

    /// Remove and return one available offset, or `None` if there is none.
    fn take(&self) -> Option<u32>;

    /// Number of offsets currently available.
    fn len(&self) -> usize;

    /// Maximum number of offsets the registry can hold.
    fn capacity(&self) -> usize;

    /// Whether no offsets are currently available.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
