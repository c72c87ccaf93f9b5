//! Tiered fixed-capacity byte arena for in-flight network messages.
//!
//! Holds message bytes in pre-allocated blocks so that reading a request
//! off a socket never allocates per message. This crate forbids `unsafe`
//! code; shared mutable access to blocks goes through per-block locks.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── Region × 3 (small / medium / large)
//! │   └── blocks[] (fixed-size, allocated once at construction)
//! ├── FreeBlockRegistry × 3 (ChannelRegistry by default)
//! └── ArenaCounters (cumulative acquire / promote / release counts)
//!
//! Message<'arena>
//! └── BlockHandle (class + block index) + length + socket id + metadata
//! ```
//!
//! # Message lifecycle
//!
//! 1. [`Arena::acquire`] takes a small block; `None` means back off.
//! 2. [`Message::append`] writes bytes, promoting small → medium → large
//!    one class at a time when a block fills up.
//! 3. A consumer reads [`Message::bytes`].
//! 4. [`Message::release`] (or drop) puts the block back in its registry.
//!
//! Running out of free blocks ([`ArenaError::Exhausted`]) is transient;
//! outgrowing the large class ([`ArenaError::MessageTooLarge`]) is not.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod message;
pub mod region;
pub mod registry;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::{ArenaConfig, ClassConfig};
pub use error::{ArenaError, ConfigError};
pub use handle::BlockHandle;
pub use message::{Message, MessageBytes};
pub use registry::ChannelRegistry;
pub use stats::{ArenaStats, ClassStats};
