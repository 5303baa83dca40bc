#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Admission checks for keys and values.
///
/// This module provides the [`Argument`] trait, which decides whether a key
/// is absent or a key/value is the disallowed empty sentinel.
pub mod argument;

/// Table sizing parameters.
pub mod config;

/// The crate's error type.
pub mod error;

/// A HashMap implementation using separate chaining.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a checked key-value map interface with configurable hashers.
pub mod hash_map;

/// The raw chained hash table.
///
/// This module provides a `HashTable` addressed by caller-supplied hashes
/// and equality predicates, along with its entry API and iterators.
pub mod hash_table;

pub use argument::Argument;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use hash_map::DefaultHashBuilder;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
