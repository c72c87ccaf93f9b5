//! Strongly-typed identifiers.

use std::fmt;

/// Identifies the socket a message was read from or will be written to.
///
/// The arena never interprets this value; it is carried on each message
/// so the I/O and processing paths can route the finished bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(pub u64);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SocketId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
