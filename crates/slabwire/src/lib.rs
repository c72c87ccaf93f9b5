//! Slabwire: a tiered fixed-capacity byte arena for in-flight network messages.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! slabwire sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use slabwire::prelude::*;
//!
//! let arena = Arena::new(ArenaConfig::default()).unwrap();
//!
//! // Bytes arrive from a socket in chunks.
//! let mut message = arena.acquire().expect("arena has free small blocks");
//! message.set_socket_id(SocketId(7));
//! message.append_all(b"/image/").unwrap();
//! message.append_all(b"logo.png").unwrap();
//! assert_eq!(message.class(), SizeClass::Small);
//!
//! // The service sees a read-only view; the block is released afterwards.
//! let response = dispatch(message, &MimeService);
//! assert_eq!(response.status(), 200);
//! assert_eq!(arena.live_blocks(SizeClass::Small), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slabwire-core` | Size classes, socket ids, the registry trait |
//! | [`arena`] | `slabwire-arena` | Arena, messages, configuration, statistics |
//! | [`service`] | `slabwire-service` | Service trait, responses, dispatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Size classes, ids, and the free-block registry trait (`slabwire-core`).
pub use slabwire_core as types;

/// Arena, messages, and configuration (`slabwire-arena`).
pub use slabwire_arena as arena;

/// Service-layer glue (`slabwire-service`).
pub use slabwire_service as service;

/// Common imports for typical usage.
///
/// ```rust
/// use slabwire::prelude::*;
/// ```
pub mod prelude {
    pub use slabwire_arena::{
        Arena, ArenaConfig, ArenaError, ArenaStats, ChannelRegistry, ClassConfig, ConfigError,
        Message,
    };
    pub use slabwire_core::{FreeBlockRegistry, RegistryFull, SizeClass, SocketId};
    pub use slabwire_service::{dispatch, MimeService, Request, Response, Service};
}
