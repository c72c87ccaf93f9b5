//! Occupancy snapshots and cumulative counters for an arena.
//!
//! [`ArenaStats`] is a point-in-time view. Under concurrent use the
//! per-class numbers are read one after another, so a snapshot taken while
//! other threads acquire or release may be briefly inconsistent; snapshots
//! taken while the arena is quiescent are exact.

use std::sync::atomic::{AtomicU64, Ordering};

use slabwire_core::SizeClass;

/// Occupancy of one size class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassStats {
    /// The class described.
    pub class: SizeClass,
    /// Bytes per block.
    pub block_capacity: usize,
    /// Blocks pre-allocated for the class.
    pub total_blocks: usize,
    /// Offsets currently in the class's free-block registry.
    pub free_blocks: usize,
    /// Blocks currently owned by live messages.
    pub live_blocks: usize,
}

impl ClassStats {
    /// Whether every block is accounted for exactly once.
    pub fn is_conserved(&self) -> bool {
        self.free_blocks + self.live_blocks == self.total_blocks
    }
}

/// Snapshot of arena occupancy plus counters accumulated since construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    /// Per-class occupancy, indexed by [`SizeClass::index`].
    pub classes: [ClassStats; 3],
    /// Successful `acquire` calls.
    pub acquired: u64,
    /// `acquire` calls that found the small class exhausted.
    pub acquire_failures: u64,
    /// Successful one-class promotions.
    pub promotions: u64,
    /// Promotions that found the next class exhausted.
    pub promotion_failures: u64,
    /// Growth requests rejected because they exceed the largest class.
    pub too_large_rejections: u64,
    /// Messages released (explicitly or by drop).
    pub released: u64,
}

impl ArenaStats {
    /// Occupancy of a single class.
    pub fn class(&self, class: SizeClass) -> &ClassStats {
        &self.classes[class.index()]
    }

    /// Whether every class is conserved.
    pub fn is_conserved(&self) -> bool {
        self.classes.iter().all(ClassStats::is_conserved)
    }

    /// Number of live messages (each holds exactly one block).
    pub fn live_messages(&self) -> usize {
        self.classes.iter().map(|c| c.live_blocks).sum()
    }
}

#[derive(Default)]
pub(crate) struct ArenaCounters {
    acquired: AtomicU64,
    acquire_failures: AtomicU64,
    promotions: AtomicU64,
    promotion_failures: AtomicU64,
    too_large_rejections: AtomicU64,
    released: AtomicU64,
}

impl ArenaCounters {
    pub(crate) fn record_acquire(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_acquire_failure(&self) {
        self.acquire_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_promotion_failure(&self) {
        self.promotion_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_too_large(&self) {
        self.too_large_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, classes: [ClassStats; 3]) -> ArenaStats {
        ArenaStats {
            classes,
            acquired: self.acquired.load(Ordering::Relaxed),
            acquire_failures: self.acquire_failures.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            promotion_failures: self.promotion_failures.load(Ordering::Relaxed),
            too_large_rejections: self.too_large_rejections.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_stats(class: SizeClass, free: usize, live: usize) -> ClassStats {
        ClassStats {
            class,
            block_capacity: 64,
            total_blocks: 4,
            free_blocks: free,
            live_blocks: live,
        }
    }

    #[test]
    fn conservation_requires_exact_sum() {
        assert!(class_stats(SizeClass::Small, 3, 1).is_conserved());
        assert!(!class_stats(SizeClass::Small, 3, 0).is_conserved());
        assert!(!class_stats(SizeClass::Small, 4, 1).is_conserved());
    }

    #[test]
    fn counters_start_at_zero() {
        let counters = ArenaCounters::default();
        let stats = counters.snapshot(SizeClass::ALL.map(|c| class_stats(c, 4, 0)));
        assert_eq!(stats.acquired, 0);
        assert_eq!(stats.promotions, 0);
        assert_eq!(stats.released, 0);
        assert_eq!(stats.live_messages(), 0);
        assert!(stats.is_conserved());
    }

    #[test]
    fn counters_accumulate() {
        let counters = ArenaCounters::default();
        counters.record_acquire();
        counters.record_acquire();
        counters.record_acquire_failure();
        counters.record_promotion();
        counters.record_promotion_failure();
        counters.record_too_large();
        counters.record_release();
        let stats = counters.snapshot(SizeClass::ALL.map(|c| class_stats(c, 4, 0)));
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.acquire_failures, 1);
        assert_eq!(stats.promotions, 1);
        assert_eq!(stats.promotion_failures, 1);
        assert_eq!(stats.too_large_rejections, 1);
        assert_eq!(stats.released, 1);
    }

    #[test]
    fn class_lookup_uses_index() {
        let stats = ArenaCounters::default().snapshot([
            class_stats(SizeClass::Small, 4, 0),
            class_stats(SizeClass::Medium, 2, 2),
            class_stats(SizeClass::Large, 1, 3),
        ]);
        assert_eq!(stats.class(SizeClass::Medium).live_blocks, 2);
        assert_eq!(stats.live_messages(), 5);
    }
}
