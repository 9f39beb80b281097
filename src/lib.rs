#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash map with treeifying buckets.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers, plus a
/// conditional-update family and a detached fail-fast cursor.
pub mod hash_map;

/// A hash set with treeifying buckets.
///
/// This module provides a `HashSet` that wraps the `HashMap` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub mod hash_table;

/// The default hash builder, backed by `foldhash`.
#[cfg(feature = "foldhash")]
pub type DefaultHashBuilder = foldhash::fast::RandomState;

/// Placeholder hash builder used when the `foldhash` feature is disabled.
///
/// This type is uninhabited and implements none of the hashing traits;
/// constructors that rely on a default hasher are unavailable without
/// `foldhash`, and an explicit hash builder must be supplied instead.
#[cfg(not(feature = "foldhash"))]
pub enum DefaultHashBuilder {}

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::ConcurrentModification;
pub use hash_table::HashTable;
