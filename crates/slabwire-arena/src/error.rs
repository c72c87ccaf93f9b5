//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use slabwire_core::SizeClass;

/// Errors that can occur during arena and message operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The registry for `class` has no free block right now.
    ///
    /// Transient: a later release of a block in this class makes the
    /// operation possible again. Callers should apply backpressure.
    Exhausted {
        /// The class whose registry was empty.
        class: SizeClass,
    },
    /// The message would need to grow past the largest block capacity.
    ///
    /// Permanent: no amount of waiting resolves it.
    MessageTooLarge {
        /// Total bytes the message would have needed.
        requested: usize,
        /// Capacity of the largest size class.
        max: usize,
    },
    /// The message belongs to a different arena.
    ForeignMessage,
    /// `offset + length` runs past the end of the source slice.
    SourceOutOfBounds {
        /// Requested start within the source.
        offset: usize,
        /// Requested byte count.
        length: usize,
        /// Actual length of the source.
        source_len: usize,
    },
    /// A split index lies beyond the end of the source message.
    SplitOutOfBounds {
        /// The requested split index.
        split_index: usize,
        /// Current length of the source message.
        length: usize,
    },
    /// The tail to split off does not fit the target's current block.
    SplitTooLarge {
        /// Bytes in the tail.
        tail: usize,
        /// Capacity of the target message.
        capacity: usize,
    },
    /// The split target already holds data.
    SplitTargetNotEmpty {
        /// Current length of the target message.
        length: usize,
    },
}

impl ArenaError {
    /// Whether retrying after other messages are released can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { class } => {
                write!(f, "no free {class} blocks available")
            }
            Self::MessageTooLarge { requested, max } => {
                write!(
                    f,
                    "message too large: needs {requested} bytes, largest block holds {max} bytes"
                )
            }
            Self::ForeignMessage => write!(f, "message belongs to a different arena"),
            Self::SourceOutOfBounds {
                offset,
                length,
                source_len,
            } => {
                write!(
                    f,
                    "source range {offset}..{} out of bounds for {source_len} bytes",
                    offset.saturating_add(*length)
                )
            }
            Self::SplitOutOfBounds {
                split_index,
                length,
            } => {
                write!(
                    f,
                    "split index {split_index} beyond message length {length}"
                )
            }
            Self::SplitTooLarge { tail, capacity } => {
                write!(
                    f,
                    "tail of {tail} bytes does not fit target capacity {capacity}"
                )
            }
            Self::SplitTargetNotEmpty { length } => {
                write!(f, "split target already holds {length} bytes")
            }
        }
    }
}

impl Error for ArenaError {}

/// Errors rejected by [`ArenaConfig::validate`](crate::config::ArenaConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A class was configured with zero-byte blocks.
    ZeroCapacity {
        /// The offending class.
        class: SizeClass,
    },
    /// A class was configured with no blocks.
    ZeroBlocks {
        /// The offending class.
        class: SizeClass,
    },
    /// Block capacity does not strictly increase from one class to the next.
    NotIncreasing {
        /// The smaller class.
        lower: SizeClass,
        /// The class whose capacity is not larger.
        upper: SizeClass,
    },
    /// `block_capacity * block_count` does not fit a `u32` offset.
    RegionTooLarge {
        /// The offending class.
        class: SizeClass,
    },
    /// A supplied registry cannot hold every block of its class.
    RegistryTooSmall {
        /// The offending class.
        class: SizeClass,
        /// Offsets the registry must hold.
        required: usize,
        /// Offsets the registry can hold.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity { class } => write!(f, "{class} block capacity must be non-zero"),
            Self::ZeroBlocks { class } => write!(f, "{class} block count must be non-zero"),
            Self::NotIncreasing { lower, upper } => {
                write!(f, "{upper} block capacity must exceed {lower} block capacity")
            }
            Self::RegionTooLarge { class } => {
                write!(f, "{class} region exceeds the u32 offset range")
            }
            Self::RegistryTooSmall {
                class,
                required,
                capacity,
            } => {
                write!(
                    f,
                    "{class} registry holds {capacity} offsets, needs {required}"
                )
            }
        }
    }
}

impl Error for ConfigError {}
