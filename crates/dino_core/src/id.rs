//! Typed identifiers and id generation

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl $name {
            /// Create from a raw value
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw value
            #[inline]
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

typed_id!(
    /// Identifier of a live (or dying) creature agent
    AgentId,
    "agent"
);

typed_id!(
    /// Identifier of a pack of agents
    PackId,
    "pack"
);

typed_id!(
    /// Identifier of a player, assigned by the session layer
    PlayerId,
    "player"
);

/// Thread-safe monotonically increasing id generator
///
/// Ids start at 1 so that 0 never names a real object.
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new id generator
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next raw id
    pub fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Generate the next id of a typed kind
    pub fn next<T: From<u64>>(&self) -> T {
        T::from(self.next_raw())
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdGenerator(next = {})", self.next.load(Ordering::Relaxed))
    }
}
