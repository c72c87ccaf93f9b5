//! Channel-backed free-block registry.
//!
//! [`ChannelRegistry`] stores available block offsets in a bounded
//! `crossbeam-channel`. Both ends live inside the registry, so the channel
//! never disconnects; `try_send`/`try_recv` give a lock-free bounded FIFO
//! whose operations never block.

use crossbeam_channel::{bounded, Receiver, Sender};
use slabwire_core::{FreeBlockRegistry, RegistryFull};

/// A bounded FIFO of free block offsets for one size class.
pub struct ChannelRegistry {
    tx: Sender<u32>,
    rx: Receiver<u32>,
    capacity: usize,
}

impl ChannelRegistry {
    /// Create an empty registry able to hold `capacity` offsets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity channel would be a
    /// rendezvous channel that can never hold a free block.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ChannelRegistry capacity must be > 0");
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Create a registry pre-populated with `offsets`.
    ///
    /// The registry's capacity is the number of offsets supplied.
    pub fn with_offsets(offsets: impl ExactSizeIterator<Item = u32>) -> Self {
        let registry = Self::new(offsets.len());
        for offset in offsets {
            let pushed = registry.put(offset);
            debug_assert!(pushed.is_ok(), "iterator yielded more offsets than its length");
        }
        registry
    }
}

// Compile-time assertion: registries are shared across I/O threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ChannelRegistry>();
};

impl FreeBlockRegistry for ChannelRegistry {
    fn put(&self, offset: u32) -> Result<(), RegistryFull> {
        self.tx.try_send(offset).map_err(|e| RegistryFull {
            offset: e.into_inner(),
        })
    }

    fn take(&self) -> Option<u32> {
        self.rx.try_recv().ok()
    }

    fn len(&self) -> usize {
        self.rx.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
