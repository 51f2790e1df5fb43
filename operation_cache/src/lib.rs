// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicating cache for constructed operations.
//!
//! Systems that build many operation instances often build the same one repeatedly: the same type
//! with the same construction arguments. [`OperationCache::lookup_or_insert`] hands back the
//! operation that already exists in that case and releases the duplicate.
//!
//! ## Model
//!
//! - An operation type implements [`Operation`]: a static list of [`ArgumentSpec`]s plus an
//!   accessor for each argument's current [`Value`].
//! - Arguments declared with [`ArgumentSpec::identity`] and actually assigned determine whether two
//!   operations are duplicates. Their hashes fold into a memoized [`fingerprint`].
//! - Operations are shared through [`OperationRef`], a reference-counted handle. The cache holds
//!   only weak entries and forgets an operation when its last handle is dropped.
//!
//! ## Example
//!
//! ```
//! use operation_cache::{ArgumentSpec, Operation, OperationCache, OperationRef, Value, ValueType};
//!
//! #[derive(Debug)]
//! struct Resize {
//!     width: Option<i32>,
//! }
//!
//! static RESIZE_ARGS: [ArgumentSpec; 1] = [ArgumentSpec::identity("width", ValueType::Int)];
//!
//! impl Operation for Resize {
//!     fn arguments(&self) -> &'static [ArgumentSpec] {
//!         &RESIZE_ARGS
//!     }
//!
//!     fn argument(&self, index: usize) -> Option<Value> {
//!         (index == 0).then_some(self.width.map(Value::Int)).flatten()
//!     }
//! }
//!
//! let cache = OperationCache::new();
//! let a = cache.lookup_or_insert(OperationRef::new(Resize { width: Some(100) }));
//! let b = cache.lookup_or_insert(OperationRef::new(Resize { width: Some(100) }));
//! assert!(a.ptr_eq(&b));
//!
//! drop((a, b));
//! assert!(cache.is_empty());
//! ```
//!
//! ## Features
//!
//! - `std`: enables `std` support in `tracing`. The crate is otherwise `no_std + alloc`.
//!
//! Diagnostics are emitted through `tracing`; installing a subscriber is up to the embedder.

#![no_std]

extern crate alloc;

mod argument;
mod cache;
mod compare;
mod config;
mod fingerprint;
mod hash;
mod operation;
mod report;
mod value;

#[cfg(test)]
mod testing;

pub use argument::{Argument, ArgumentSpec, map_arguments};
pub use cache::OperationCache;
pub use compare::values_equal;
pub use config::CacheOptions;
pub use fingerprint::{compute_fingerprint, fingerprint};
pub use hash::{str_hash, value_hash};
pub use operation::{CacheState, Operation, OperationRef};
pub use report::CacheStats;
pub use value::{CustomKind, CustomValue, ObjRef, Value, ValueType};
