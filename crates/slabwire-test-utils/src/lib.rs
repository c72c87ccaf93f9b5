//! Test utilities and mock types for slabwire development.
//!
//! Provides a mock [`FreeBlockRegistry`] backed by a `Mutex<VecDeque>`,
//! plus fixtures for building small arenas and checking their invariants.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use slabwire_core::{FreeBlockRegistry, RegistryFull};

pub use fixtures::{
    assert_conserved, assert_no_aliasing, pattern, small_config, small_arena, tiny_config,
};

/// Mock implementation of [`FreeBlockRegistry`].
///
/// A plain locked deque with call counters, for checking that the arena
/// drives its registries through the trait and nothing else.
pub struct MockRegistry {
    offsets: Mutex<VecDeque<u32>>,
    capacity: usize,
    puts: AtomicUsize,
    takes: AtomicUsize,
}

impl MockRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            offsets: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            puts: AtomicUsize::new(0),
            takes: AtomicUsize::new(0),
        }
    }

    /// Number of `put` calls, successful or not.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }

    /// Number of `take` calls, successful or not.
    pub fn take_calls(&self) -> usize {
        self.takes.load(Ordering::Relaxed)
    }
}

impl FreeBlockRegistry for MockRegistry {
    fn put(&self, offset: u32) -> Result<(), RegistryFull> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        let mut offsets = self.offsets.lock().unwrap_or_else(PoisonError::into_inner);
        if offsets.len() >= self.capacity {
            return Err(RegistryFull { offset });
        }
        offsets.push_back(offset);
        Ok(())
    }

    fn take(&self) -> Option<u32> {
        self.takes.fetch_add(1, Ordering::Relaxed);
        self.offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn len(&self) -> usize {
        self.offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
