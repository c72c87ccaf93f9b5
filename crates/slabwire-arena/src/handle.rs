//! Block handles.
//!
//! A [`BlockHandle`] names one block by size class and index. It carries no
//! reference to storage; bytes are reached only through the owning
//! [`Arena`](crate::Arena).

use std::fmt;

use slabwire_core::SizeClass;

/// Location of a block within the arena.
///
/// Handles are plain values. Ownership of the block they name is held by
/// exactly one [`Message`](crate::Message) at a time, never by the handle
/// itself, so copying a handle does not grant access to the bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    /// Size class (and therefore region) of the block.
    pub(crate) class: SizeClass,
    /// Block index within its region.
    pub(crate) index: u32,
}

impl BlockHandle {
    pub(crate) fn new(class: SizeClass, index: u32) -> Self {
        Self { class, index }
    }

    /// The size class this block belongs to.
    pub fn class(&self) -> SizeClass {
        self.class
    }

    /// Index of the block within its region.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHandle({}, #{})", self.class, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trip() {
        let h = BlockHandle::new(SizeClass::Medium, 7);
        assert_eq!(h.class(), SizeClass::Medium);
        assert_eq!(h.index(), 7);
        assert_eq!(h.to_string(), "BlockHandle(medium, #7)");
    }

    #[test]
    fn handles_in_different_classes_differ() {
        let a = BlockHandle::new(SizeClass::Small, 0);
        let b = BlockHandle::new(SizeClass::Large, 0);
        assert_ne!(a, b);
    }
}
