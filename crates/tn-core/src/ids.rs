//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Intersection ids are chosen by the
//! caller and need not be dense; road ids are arena slots handed out by the
//! network and are only meaningful for the network that issued them.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Caller-chosen identifier of an intersection (graph node).
    pub struct IntersectionId(u32);
}

typed_id! {
    /// Slot of an undirected road in the network's road arena.
    pub struct RoadId(u32);
}

typed_id! {
    /// Pending emergency episode awaiting restoration.
    #[must_use = "an emergency stays in effect until its handle is restored"]
    pub struct EmergencyHandle(u64);
}

impl RoadId {
    /// Cast to `usize` for direct use as an arena index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
