//! Fixed backing storage for one size class.
//!
//! A [`Region`] is a table of `block_count` pre-allocated blocks of
//! `block_capacity` bytes each. Blocks are addressed by index; the byte
//! offset of block `i` is `i * block_capacity`, as if the blocks were laid
//! out back to back. Each block is its own allocation, so an offset is a
//! nominal address used by the free-block registries and
//! [`Message::offset`](crate::Message::offset), never an index into one
//! shared byte buffer. Regions are created once with the arena and never
//! resized.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use slabwire_core::SizeClass;

use crate::config::ClassConfig;

/// Backing storage and ownership flags for every block of one class.
///
/// Each block sits behind its own `Mutex`. Under the single-writer
/// discipline a block is only ever locked by the flow that holds its
/// message, so the locks are uncontended; they exist to let a shared
/// `&Arena` hand out mutable access without `unsafe`.
pub struct Region {
    class: SizeClass,
    block_capacity: usize,
    blocks: Box<[Mutex<Box<[u8]>>]>,
    /// `held[i]` is true while block `i` belongs to a live message.
    held: Box<[AtomicBool]>,
    held_count: AtomicUsize,
}

impl Region {
    /// Allocate every block of the class up front, zero-filled.
    pub fn new(class: SizeClass, config: ClassConfig) -> Self {
        let blocks = (0..config.block_count)
            .map(|_| Mutex::new(vec![0u8; config.block_capacity].into_boxed_slice()))
            .collect();
        let held = (0..config.block_count)
            .map(|_| AtomicBool::new(false))
            .collect();
        Self {
            class,
            block_capacity: config.block_capacity,
            blocks,
            held,
            held_count: AtomicUsize::new(0),
        }
    }

    /// The size class this region serves.
    pub fn class(&self) -> SizeClass {
        self.class
    }

    /// Bytes per block.
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    /// Number of blocks in the region.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.block_capacity * self.blocks.len()
    }

    /// Byte offset of block `index`.
    ///
    /// Config validation guarantees every block offset fits a `u32`.
    pub fn offset_of(&self, index: u32) -> u32 {
        (index as usize * self.block_capacity) as u32
    }

    /// Block index starting at `offset`, if `offset` is a valid block start.
    pub fn index_of(&self, offset: u32) -> Option<u32> {
        let offset = offset as usize;
        if offset % self.block_capacity != 0 {
            return None;
        }
        let index = offset / self.block_capacity;
        (index < self.blocks.len()).then_some(index as u32)
    }

    /// Iterator over every block start offset, in index order.
    pub fn offsets(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        (0..self.blocks.len() as u32).map(|i| self.offset_of(i))
    }

    /// Lock block `index` for reading or writing.
    ///
    /// A poisoned lock is recovered: block contents are plain bytes and a
    /// panicking writer cannot leave them in an invalid state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn lock(&self, index: u32) -> MutexGuard<'_, Box<[u8]>> {
        self.blocks[index as usize]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that block `index` now belongs to a live message.
    ///
    /// Returns `false` if the block was already held, which means the
    /// registry handed out an offset twice.
    pub fn mark_held(&self, index: u32) -> bool {
        let was_held = self.held[index as usize].swap(true, Ordering::AcqRel);
        if !was_held {
            self.held_count.fetch_add(1, Ordering::Relaxed);
        }
        !was_held
    }

    /// Record that block `index` has been returned.
    ///
    /// Returns `false` if the block was not held.
    pub fn mark_free(&self, index: u32) -> bool {
        let was_held = self.held[index as usize].swap(false, Ordering::AcqRel);
        if was_held {
            self.held_count.fetch_sub(1, Ordering::Relaxed);
        }
        was_held
    }

    /// Whether block `index` currently belongs to a live message.
    pub fn is_held(&self, index: u32) -> bool {
        self.held[index as usize].load(Ordering::Acquire)
    }

    /// Number of blocks currently held by live messages.
    pub fn live_blocks(&self) -> usize {
        self.held_count.load(Ordering::Relaxed)
    }
}
