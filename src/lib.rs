#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A separate-chaining hash table driven by caller-supplied hashes.
///
/// This module provides the raw `HashTable`, its iterators, the diagnostic
/// report and the errors raised by fallible growth.
pub mod hash_table;

/// A multiset that hashes its own values.
///
/// This module provides a `HashBag` that wraps the `HashTable` with a
/// configurable hasher builder.
pub mod hash_bag;

pub use hash_bag::HashBag;
pub use hash_table::CapacityError;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`HashBag::new`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`HashBag::new`].
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    }
}
