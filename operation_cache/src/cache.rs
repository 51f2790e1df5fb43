// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicating operation cache.
//!
//! [`OperationCache`] indexes live operations by `(concrete type, fingerprint)` and confirms every
//! fingerprint match argument by argument before reporting a hit.
//!
//! ## Policy and invariants
//!
//! - **The cache never owns an operation.** Entries are [`Weak`] references: inserting does not
//!   add a strong reference and removing does not release one.
//! - **Entries leave only on last release.** Registering an operation installs a release hook; when
//!   the last [`OperationRef`] is dropped the hook removes exactly that entry. There is no size
//!   bound and no eviction policy.
//! - **Fingerprints are never trusted alone.** Two operations are the same entry only if they have
//!   the same concrete type, the same fingerprint, and pairwise equal assigned identity arguments.
//! - **Lost entries are fatal.** A release hook that cannot find its own entry means the table has
//!   diverged from the live operations; it logs an error and panics.
//!
//! ## Threading
//!
//! The cache is single-threaded. Handles are `Rc`-based and the table lives in a `RefCell`, so
//! neither the cache nor [`OperationRef`] is `Send` or `Sync`. Release hooks run synchronously in
//! whichever code drops the last handle.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::any::TypeId;
use core::cell::{OnceCell, RefCell};
use core::fmt;
use core::hash::BuildHasher;
use core::ops::ControlFlow;
use core::ptr;

use hashbrown::{DefaultHashBuilder, HashTable};

use crate::argument::map_arguments;
use crate::compare::values_equal;
use crate::config::CacheOptions;
use crate::fingerprint::node_fingerprint;
use crate::operation::{CacheState, Operation, OperationNode, OperationRef, ReleaseHook};
use crate::report::CacheStats;

/// Deduplicating cache of constructed operations.
///
/// Create one per process (or per construction context) and pass it by reference to whatever
/// builds operations. The backing table is created on first use.
#[derive(Debug, Default)]
pub struct OperationCache {
    options: CacheOptions,
    table: OnceCell<Rc<RefCell<CacheTable>>>,
}

impl OperationCache {
    /// Creates a cache with default options.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache with the given options.
    #[must_use]
    #[inline]
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            options,
            table: OnceCell::new(),
        }
    }

    /// Returns an existing operation equal to `candidate`, or indexes `candidate`.
    ///
    /// This consumes the caller's handle:
    /// - On a hit, `candidate` is released and a new handle to the existing operation is returned.
    /// - On a miss, `candidate` is indexed and returned unchanged. It stays indexed until its last
    ///   handle is dropped.
    ///
    /// Passing a handle to an operation this cache already indexes returns that same operation,
    /// even if it is not equal to itself. An operation that is already indexed by another cache is
    /// returned unchanged on a miss and is not indexed here.
    pub fn lookup_or_insert(&self, candidate: OperationRef) -> OperationRef {
        let table = self.table();
        let fingerprint = candidate.fingerprint();

        // Bind the result so the table borrow ends before `candidate` can be released.
        let lookup = table.borrow_mut().lookup_or_insert(&candidate, fingerprint);
        match lookup {
            Lookup::Hit(existing) => {
                tracing::trace!(
                    op = existing.name(),
                    fingerprint,
                    "lookup_or_insert: hit"
                );
                drop(candidate);
                existing
            }
            Lookup::Inserted => {
                tracing::trace!(
                    op = candidate.name(),
                    fingerprint,
                    "lookup_or_insert: adding"
                );
                candidate.on_last_release(release_hook(Rc::downgrade(table)));
                candidate
            }
            Lookup::Foreign => {
                tracing::warn!(
                    op = candidate.name(),
                    fingerprint,
                    "lookup_or_insert: operation is indexed by another cache, not adding"
                );
                candidate
            }
        }
    }

    /// Returns the number of indexed operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.get().map_or(0, |t| t.borrow().entries.len())
    }

    /// Returns `true` if no operation is indexed.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cumulative activity counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.table
            .get()
            .map_or_else(CacheStats::default, |t| t.borrow().stats)
    }

    /// Returns the options this cache was created with.
    #[must_use]
    #[inline]
    pub fn options(&self) -> CacheOptions {
        self.options
    }

    fn table(&self) -> &Rc<RefCell<CacheTable>> {
        self.table.get_or_init(|| {
            tracing::debug!(
                initial_capacity = self.options.initial_capacity,
                "operation cache: creating table"
            );
            Rc::new(RefCell::new(CacheTable::with_capacity(
                self.options.initial_capacity,
            )))
        })
    }
}

/// Builds the hook that forgets an operation when its last handle is dropped.
fn release_hook(table: Weak<RefCell<CacheTable>>) -> ReleaseHook {
    Box::new(move |node: &OperationNode| {
        debug_assert_eq!(
            node.state(),
            CacheState::Registered,
            "release hook ran for an operation that is not registered"
        );
        // A dropped cache has nothing left to forget.
        if let Some(table) = table.upgrade() {
            table.borrow_mut().remove(node);
        }
        node.set_state(CacheState::Removed);
    })
}

enum Lookup {
    Hit(OperationRef),
    Inserted,
    Foreign,
}

#[derive(Debug)]
struct Entry {
    /// Table hash of `(type, fingerprint)`, kept for rehashing.
    hash: u64,
    node: Weak<OperationNode>,
}

struct CacheTable {
    entries: HashTable<Entry>,
    hasher: DefaultHashBuilder,
    stats: CacheStats,
}

impl CacheTable {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashTable::with_capacity(capacity),
            hasher: DefaultHashBuilder::default(),
            stats: CacheStats::default(),
        }
    }

    #[inline]
    fn hash_of(&self, op_type: TypeId, fingerprint: u32) -> u64 {
        self.hasher.hash_one((op_type, fingerprint))
    }

    fn lookup_or_insert(&mut self, candidate: &OperationRef, fingerprint: u32) -> Lookup {
        let op_type = candidate.op_type();
        let hash = self.hash_of(op_type, fingerprint);

        let existing = self
            .entries
            .find(hash, |entry| {
                entry.node.upgrade().is_some_and(|node| {
                    same_operation(&node, op_type, fingerprint, candidate.get())
                })
            })
            .and_then(|entry| entry.node.upgrade());

        if let Some(node) = existing {
            self.stats.hits += 1;
            return Lookup::Hit(OperationRef::from_node(node));
        }

        if candidate.cache_state() != CacheState::Unregistered {
            // An operation that is not equal to itself (a `NaN` argument) still finds its own
            // entry by address.
            let target: *const OperationNode = candidate.node();
            if self
                .entries
                .find(hash, |entry| ptr::eq(entry.node.as_ptr(), target))
                .is_some()
            {
                self.stats.hits += 1;
                return Lookup::Hit(candidate.clone());
            }
            self.stats.misses += 1;
            return Lookup::Foreign;
        }

        self.stats.misses += 1;

        let entry = Entry {
            hash,
            node: candidate.downgrade(),
        };
        self.entries.insert_unique(hash, entry, |e| e.hash);
        Lookup::Inserted
    }

    /// Forgets `node`, which is being destroyed.
    fn remove(&mut self, node: &OperationNode) {
        let fingerprint = node_fingerprint(node);
        let hash = self.hash_of(node.op_type(), fingerprint);
        let target: *const OperationNode = node;

        match self
            .entries
            .find_entry(hash, |entry| ptr::eq(entry.node.as_ptr(), target))
        {
            Ok(entry) => {
                let _ = entry.remove();
                self.stats.removals += 1;
                tracing::trace!(op = node.op().name(), fingerprint, "operation cache: removing");
            }
            Err(_) => {
                tracing::error!(
                    op = node.op().name(),
                    fingerprint,
                    "operation cache: released operation has no entry"
                );
                panic!(
                    "operation cache lost track of a registered `{}` (fingerprint {fingerprint:#010x})",
                    node.op().name()
                );
            }
        }
    }
}

impl fmt::Debug for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTable")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn same_operation(
    node: &OperationNode,
    op_type: TypeId,
    fingerprint: u32,
    candidate: &dyn Operation,
) -> bool {
    node.op_type() == op_type
        && node_fingerprint(node) == fingerprint
        && identity_arguments_equal(node.op(), candidate)
}

/// Pairwise equality of identity arguments of two operations of the same type.
///
/// An argument assigned on one side and unassigned on the other is a mismatch.
fn identity_arguments_equal(a: &dyn Operation, b: &dyn Operation) -> bool {
    map_arguments(a, |arg| {
        if !arg.is_identity() {
            return ControlFlow::Continue(());
        }
        let equal = match (&arg.value, b.argument(arg.index)) {
            (None, None) => true,
            (Some(x), Some(y)) => values_equal(x, &y),
            _ => false,
        };
        if equal {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
    .is_continue()
}
