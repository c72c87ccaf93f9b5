//! Block size classes.
//!
//! The arena keeps three tiers of fixed-size blocks. A message always
//! starts in [`SizeClass::Small`] and moves up exactly one tier at a time.

use std::fmt;

/// One of the three block tiers managed by the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeClass {
    /// Smallest blocks; every message is acquired here.
    Small,
    /// Intermediate blocks, reached by one promotion.
    Medium,
    /// Largest blocks. Messages that outgrow these cannot grow further.
    Large,
}

impl SizeClass {
    /// All classes in promotion order.
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    /// The class a message moves to when it outgrows this one.
    ///
    /// Returns `None` for [`SizeClass::Large`].
    pub fn next(self) -> Option<SizeClass> {
        match self {
            Self::Small => Some(Self::Medium),
            Self::Medium => Some(Self::Large),
            Self::Large => None,
        }
    }

    /// Dense index in `0..3`, usable for per-class tables.
    pub fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    /// Lower-case name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
