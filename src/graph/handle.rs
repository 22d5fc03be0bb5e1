//! Stable node and value handles
//!
//! Handles are plain `u32` indices issued by a per-kind counter. They are
//! never reused, so a handle keeps identifying the same entity (or nothing,
//! once retired) for the whole lifetime of a [`GraphModule`](super::GraphModule).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel returned in views of unknown or retired entities
            pub const INVALID: Self = Self(u32::MAX);

            /// Wrap a raw index
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Raw index
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Whether this is anything other than the sentinel
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($prefix, "{}"), self.0)
                } else {
                    f.write_str(concat!($prefix, "<invalid>"))
                }
            }
        }
    };
}

define_handle!(
    /// Handle of a node (operation) in the graph
    NodeId,
    "n"
);

define_handle!(
    /// Handle of a value (data edge) in the graph
    ValueId,
    "v"
);
