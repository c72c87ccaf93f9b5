//! Benchmark profiles for the slabwire message arena.
//!
//! - [`reference_arena`]: the default three-class configuration
//! - [`request_chunks`]: a request body split the way a socket read loop
//!   would deliver it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use slabwire_arena::{Arena, ArenaConfig, ConfigError};

/// An arena with the default configuration.
pub fn reference_arena() -> Result<Arena, ConfigError> {
    Arena::new(ArenaConfig::default())
}

/// `total` bytes of payload cut into reads of at most `chunk` bytes.
pub fn request_chunks(total: usize, chunk: usize) -> Vec<Vec<u8>> {
    let body: Vec<u8> = (0..total).map(|i| (i % 251) as u8).collect();
    body.chunks(chunk.max(1)).map(<[u8]>::to_vec).collect()
}
