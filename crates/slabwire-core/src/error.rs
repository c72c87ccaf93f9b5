//! Error types shared across the workspace.

use std::error::Error;
use std::fmt;

/// A block offset was returned to a registry that is already full.
///
/// Registries are sized to hold every block of their class, so this can
/// only happen when an offset is returned twice. It signals a broken
/// class invariant, not a recoverable runtime state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryFull {
    /// The offset that could not be stored.
    pub offset: u32,
}

impl fmt::Display for RegistryFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "free-block registry full, cannot return offset {}", self.offset)
    }
}

impl Error for RegistryFull {}
