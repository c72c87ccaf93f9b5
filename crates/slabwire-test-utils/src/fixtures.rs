//! Arena fixtures and invariant checks.

use std::collections::HashSet;

use slabwire_arena::{Arena, ArenaConfig, ClassConfig, Message};
use slabwire_core::SizeClass;

/// A deterministic byte pattern of length `len` that does not repeat
/// with any short period.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + i / 251 + 7) % 256) as u8).collect()
}

/// Three classes of 16/64/256 bytes with 4/2/1 blocks.
///
/// Small enough that exhausting every class takes a handful of messages.
pub fn tiny_config() -> ArenaConfig {
    ArenaConfig::new(
        ClassConfig::new(16, 4),
        ClassConfig::new(64, 2),
        ClassConfig::new(256, 1),
    )
}

/// Same tiering ratios as the defaults, scaled down by 64x per block.
pub fn small_config() -> ArenaConfig {
    ArenaConfig::new(
        ClassConfig::new(64, 64),
        ClassConfig::new(2048, 16),
        ClassConfig::new(16_384, 4),
    )
}

/// An arena built from [`small_config`].
pub fn small_arena() -> Arena {
    Arena::new(small_config()).expect("small_config is valid")
}

/// Panic unless every class satisfies `free + live == total`.
pub fn assert_conserved(arena: &Arena) {
    let stats = arena.stats();
    for class in SizeClass::ALL {
        let c = stats.class(class);
        assert!(
            c.is_conserved(),
            "{class}: free {} + live {} != total {}",
            c.free_blocks,
            c.live_blocks,
            c.total_blocks,
        );
    }
}

/// Panic if two messages report the same block.
///
/// Blocks of one class never overlap, so distinct `(class, offset)` pairs
/// mean distinct byte ranges.
pub fn assert_no_aliasing(messages: &[Message<'_>]) {
    let mut seen = HashSet::with_capacity(messages.len());
    for msg in messages {
        assert!(
            seen.insert((msg.class(), msg.offset())),
            "two live messages share {} offset {}",
            msg.class(),
            msg.offset(),
        );
    }
}
