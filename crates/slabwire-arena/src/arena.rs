//! The tiered block arena.
//!
//! [`Arena`] owns one [`Region`] and one free-block registry per size
//! class. It hands out small blocks to new messages, moves messages up one
//! class at a time when they outgrow their block, and takes blocks back
//! when messages are released.
//!
//! For every class, at all times, each block is either in the class's
//! registry or held by exactly one live [`Message`], never both and never
//! neither.

use std::ptr;

use slabwire_core::{FreeBlockRegistry, SizeClass};

use crate::config::ArenaConfig;
use crate::error::{ArenaError, ConfigError};
use crate::handle::BlockHandle;
use crate::message::Message;
use crate::region::Region;
use crate::registry::ChannelRegistry;
use crate::stats::{ArenaCounters, ArenaStats, ClassStats};

/// Fixed-capacity, three-tier byte arena for in-flight messages.
///
/// Construct once at process start and share by reference (or `Arc`) with
/// every thread that produces or consumes messages. All operations are
/// synchronous and never block on another thread: exhaustion is reported
/// immediately and the caller decides how to back off.
pub struct Arena {
    config: ArenaConfig,
    regions: [Region; 3],
    registries: [Box<dyn FreeBlockRegistry>; 3],
    counters: ArenaCounters,
}

// Compile-time assertion: Arena must be shareable across I/O threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Arena>();
};

impl Arena {
    /// Create an arena with channel-backed free-block registries.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        Self::with_registries(config, |_, capacity| {
            Box::new(ChannelRegistry::new(capacity))
        })
    }

    /// Create an arena with caller-supplied free-block registries.
    ///
    /// `make_registry` is called once per class with the class and its
    /// block count, and must return an empty registry able to hold that
    /// many offsets. Every block offset is then put into it.
    pub fn with_registries<F>(config: ArenaConfig, mut make_registry: F) -> Result<Self, ConfigError>
    where
        F: FnMut(SizeClass, usize) -> Box<dyn FreeBlockRegistry>,
    {
        config.validate()?;

        let regions = SizeClass::ALL.map(|class| Region::new(class, config.class(class)));
        let registries =
            SizeClass::ALL.map(|class| make_registry(class, config.class(class).block_count));

        for (region, registry) in regions.iter().zip(registries.iter()) {
            let too_small = ConfigError::RegistryTooSmall {
                class: region.class(),
                required: region.block_count(),
                capacity: registry.capacity(),
            };
            if registry.capacity() < region.block_count() {
                return Err(too_small);
            }
            for offset in region.offsets() {
                registry.put(offset).map_err(|_| too_small.clone())?;
            }
        }

        tracing::debug!(
            small_blocks = config.small.block_count,
            medium_blocks = config.medium.block_count,
            large_blocks = config.large.block_count,
            total_bytes = config.total_bytes(),
            "arena created"
        );

        Ok(Self {
            config,
            regions,
            registries,
            counters: ArenaCounters::default(),
        })
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Bytes per block in `class`.
    pub fn block_capacity(&self, class: SizeClass) -> usize {
        self.region(class).block_capacity()
    }

    /// Largest message this arena can hold.
    pub fn max_message_len(&self) -> usize {
        self.config.max_message_len()
    }

    /// Acquire an empty message backed by a small block.
    ///
    /// Returns `None` when every small block is in use. This is resource
    /// exhaustion, not an error: the caller should stop reading from its
    /// source until messages are released.
    pub fn acquire(&self) -> Option<Message<'_>> {
        match self.take_block(SizeClass::Small) {
            Some(block) => {
                self.counters.record_acquire();
                tracing::trace!(index = block.index, "message acquired");
                Some(Message::new(self, block))
            }
            None => {
                self.counters.record_acquire_failure();
                tracing::debug!(class = %SizeClass::Small, "blocks exhausted, acquire refused");
                None
            }
        }
    }

    /// Move `message` into a block of the next larger class.
    ///
    /// The live bytes are copied into a freshly taken block, the old block
    /// goes back to its registry, and only then does the message switch to
    /// the new block. On error the message is untouched:
    ///
    /// - [`ArenaError::Exhausted`] if the next class has no free block
    ///   (retry after releases);
    /// - [`ArenaError::MessageTooLarge`] if the message is already in the
    ///   largest class (retrying cannot help);
    /// - [`ArenaError::ForeignMessage`] if the message belongs to another arena.
    pub fn promote(&self, message: &mut Message<'_>) -> Result<(), ArenaError> {
        if !message.belongs_to(self) {
            return Err(ArenaError::ForeignMessage);
        }
        let requested = message.capacity() + 1;
        message.block = self.promote_block(message.block, message.len(), requested)?;
        Ok(())
    }

    /// Release `message`, returning its block to the free registry.
    ///
    /// Equivalent to [`Message::release`] or dropping the message; the
    /// block always returns to the arena that issued it.
    pub fn release(&self, message: Message<'_>) {
        debug_assert!(
            message.belongs_to(self),
            "message released through an arena that did not issue it"
        );
        message.release();
    }

    /// Offsets currently available in `class`'s registry.
    pub fn free_blocks(&self, class: SizeClass) -> usize {
        self.registry(class).len()
    }

    /// Blocks of `class` currently held by live messages.
    pub fn live_blocks(&self, class: SizeClass) -> usize {
        self.region(class).live_blocks()
    }

    /// Blocks pre-allocated for `class`.
    pub fn total_blocks(&self, class: SizeClass) -> usize {
        self.region(class).block_count()
    }

    /// Occupancy snapshot and cumulative counters.
    pub fn stats(&self) -> ArenaStats {
        let classes = SizeClass::ALL.map(|class| ClassStats {
            class,
            block_capacity: self.block_capacity(class),
            total_blocks: self.total_blocks(class),
            free_blocks: self.free_blocks(class),
            live_blocks: self.live_blocks(class),
        });
        self.counters.snapshot(classes)
    }

    /// Grow `message` one class at a time until it can hold `needed` bytes.
    ///
    /// Rejects sizes beyond the largest class before moving anything. A
    /// block is reserved in every class on the way up before the first
    /// copy, so the message either reaches a class that fits or stays in
    /// its current block.
    pub(crate) fn promote_to_fit(
        &self,
        message: &mut Message<'_>,
        needed: usize,
    ) -> Result<(), ArenaError> {
        let max = self.max_message_len();
        if needed > max {
            self.counters.record_too_large();
            tracing::warn!(requested = needed, max, "message exceeds largest block");
            return Err(ArenaError::MessageTooLarge {
                requested: needed,
                max,
            });
        }

        let mut reserved: [Option<BlockHandle>; 3] = [None; 3];
        let mut class = message.class();
        while needed > self.block_capacity(class) {
            let Some(next) = class.next() else { break };
            let Some(block) = self.take_block(next) else {
                for block in reserved.into_iter().flatten() {
                    self.return_block(block);
                }
                self.counters.record_promotion_failure();
                tracing::debug!(class = %next, needed, "blocks exhausted, promotion refused");
                return Err(ArenaError::Exhausted { class: next });
            };
            reserved[next.index()] = Some(block);
            class = next;
        }

        let len = message.len();
        for block in reserved.into_iter().flatten() {
            message.block = self.move_block(message.block, block, len);
        }
        Ok(())
    }

    /// Copy the first `len` bytes of `old` into a block of the next class
    /// and free `old`. Returns the new block.
    fn promote_block(
        &self,
        old: BlockHandle,
        len: usize,
        requested: usize,
    ) -> Result<BlockHandle, ArenaError> {
        let Some(next) = old.class.next() else {
            self.counters.record_too_large();
            let max = self.max_message_len();
            tracing::warn!(requested, max, "message exceeds largest block");
            return Err(ArenaError::MessageTooLarge { requested, max });
        };

        let Some(new) = self.take_block(next) else {
            self.counters.record_promotion_failure();
            tracing::debug!(class = %next, len, "blocks exhausted, promotion refused");
            return Err(ArenaError::Exhausted { class: next });
        };

        Ok(self.move_block(old, new, len))
    }

    /// Copy the first `len` bytes of `old` into the already taken `new`,
    /// then free `old`.
    fn move_block(&self, old: BlockHandle, new: BlockHandle, len: usize) -> BlockHandle {
        {
            let src = self.region(old.class).lock(old.index);
            let mut dst = self.region(new.class).lock(new.index);
            dst[..len].copy_from_slice(&src[..len]);
        }
        self.return_block(old);

        self.counters.record_promotion();
        tracing::debug!(from = %old.class, to = %new.class, len, "message promoted");
        new
    }

    /// Return the block of a message that is going away.
    pub(crate) fn release_block(&self, block: BlockHandle) {
        self.return_block(block);
        self.counters.record_release();
        tracing::trace!(class = %block.class, index = block.index, "message released");
    }

    fn take_block(&self, class: SizeClass) -> Option<BlockHandle> {
        let region = self.region(class);
        let offset = self.registry(class).take()?;
        let Some(index) = region.index_of(offset) else {
            tracing::error!(%class, offset, "registry produced an offset that is not a block start");
            debug_assert!(false, "registry produced invalid {class} offset {offset}");
            return None;
        };
        if !region.mark_held(index) {
            tracing::error!(%class, offset, "registry produced an offset that is already held");
            debug_assert!(false, "{class} offset {offset} handed out twice");
            return None;
        }
        Some(BlockHandle::new(class, index))
    }

    fn return_block(&self, block: BlockHandle) {
        let region = self.region(block.class);
        // Clear the held flag before the offset becomes visible to `take`.
        let was_held = region.mark_free(block.index);
        debug_assert!(was_held, "{block} returned while not held");
        let offset = region.offset_of(block.index);
        if let Err(err) = self.registry(block.class).put(offset) {
            tracing::error!(class = %block.class, %err, "block could not be returned");
            debug_assert!(false, "{} registry overflow: {err}", block.class);
        }
    }

    pub(crate) fn region(&self, class: SizeClass) -> &Region {
        &self.regions[class.index()]
    }

    fn registry(&self, class: SizeClass) -> &dyn FreeBlockRegistry {
        self.registries[class.index()].as_ref()
    }

    pub(crate) fn same_as(&self, other: &Arena) -> bool {
        ptr::eq(self, other)
    }
}
