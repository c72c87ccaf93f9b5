//! Core types and traits for the slabwire message arena.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the arena and its collaborators: size
//! classes, socket identifiers, and the free-block registry contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod class;
pub mod error;
pub mod id;
pub mod traits;

pub use class::SizeClass;
pub use error::RegistryFull;
pub use id::SocketId;
pub use traits::FreeBlockRegistry;
