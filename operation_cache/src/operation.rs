// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operations and their reference-counted handles.
//!
//! [`OperationRef`] is the reference-lifecycle provider for the cache:
//! - cloning a handle adds a reference,
//! - dropping a handle releases one,
//! - a crate-internal release hook runs exactly once, when the last handle is dropped.
//!
//! The handle also carries the operation's memoized fingerprint and its cache membership state.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::cell::Cell;
use core::fmt;

use crate::argument::ArgumentSpec;
use crate::value::Value;

/// A constructible operation whose construction arguments identify it.
///
/// Implementations must not change their arguments once the operation has been wrapped in an
/// [`OperationRef`]: the fingerprint is computed at most once.
pub trait Operation: Any + fmt::Debug {
    /// Declared construction arguments, in a fixed order shared by every instance of the type.
    fn arguments(&self) -> &'static [ArgumentSpec];

    /// Current value of the argument at `index` in [`arguments`](Self::arguments), or `None` if it
    /// was not assigned.
    fn argument(&self, index: usize) -> Option<Value>;

    /// Human-readable type name, used in diagnostics.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Cache membership of an operation.
///
/// Transitions are `Unregistered -> Registered -> Removed`; none is skipped or repeated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Not indexed by any cache.
    #[default]
    Unregistered,
    /// Indexed by a cache that will forget it on last release.
    Registered,
    /// Forgotten by its cache after the last reference was released.
    Removed,
}

pub(crate) type ReleaseHook = Box<dyn FnOnce(&OperationNode)>;

/// Shared state behind every [`OperationRef`] to the same operation.
pub(crate) struct OperationNode {
    op: Box<dyn Operation>,
    fingerprint: Cell<Option<u32>>,
    state: Cell<CacheState>,
    on_release: Cell<Option<ReleaseHook>>,
}

impl OperationNode {
    #[inline]
    pub(crate) fn op(&self) -> &dyn Operation {
        &*self.op
    }

    /// Concrete type of the wrapped operation.
    #[inline]
    pub(crate) fn op_type(&self) -> TypeId {
        let op: &dyn Any = &*self.op;
        op.type_id()
    }

    #[inline]
    pub(crate) fn fingerprint_slot(&self) -> &Cell<Option<u32>> {
        &self.fingerprint
    }

    #[inline]
    pub(crate) fn state(&self) -> CacheState {
        self.state.get()
    }

    #[inline]
    pub(crate) fn set_state(&self, state: CacheState) {
        self.state.set(state);
    }
}

impl Drop for OperationNode {
    fn drop(&mut self) {
        if let Some(hook) = self.on_release.get_mut().take() {
            hook(self);
        }
    }
}

impl fmt::Debug for OperationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationNode")
            .field("op", &self.op)
            .field("fingerprint", &self.fingerprint.get())
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

/// Shared handle to a constructed operation.
#[derive(Clone, Debug)]
pub struct OperationRef {
    node: Rc<OperationNode>,
}

impl OperationRef {
    /// Wraps a fully built operation. The returned handle is its only reference.
    pub fn new(op: impl Operation) -> Self {
        Self {
            node: Rc::new(OperationNode {
                op: Box::new(op),
                fingerprint: Cell::new(None),
                state: Cell::new(CacheState::Unregistered),
                on_release: Cell::new(None),
            }),
        }
    }

    /// Returns the wrapped operation.
    #[must_use]
    #[inline]
    pub fn get(&self) -> &dyn Operation {
        self.node.op()
    }

    /// Returns the wrapped operation if it is a `T`.
    #[must_use]
    #[inline]
    pub fn downcast_ref<T: Operation>(&self) -> Option<&T> {
        let op: &dyn Any = self.node.op();
        op.downcast_ref::<T>()
    }

    /// Returns the concrete type of the wrapped operation.
    #[must_use]
    #[inline]
    pub fn op_type(&self) -> TypeId {
        self.node.op_type()
    }

    /// Returns the operation's type name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.node.op().name()
    }

    /// Returns the memoized argument fingerprint, computing it on first use.
    #[must_use]
    #[inline]
    pub fn fingerprint(&self) -> u32 {
        crate::fingerprint::fingerprint(self)
    }

    /// Returns the operation's cache membership.
    #[must_use]
    #[inline]
    pub fn cache_state(&self) -> CacheState {
        self.node.state()
    }

    /// Returns `true` if both handles refer to the same operation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Returns the number of live handles to this operation.
    #[must_use]
    #[inline]
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.node)
    }

    #[inline]
    pub(crate) fn node(&self) -> &OperationNode {
        &self.node
    }

    #[inline]
    pub(crate) fn downgrade(&self) -> alloc::rc::Weak<OperationNode> {
        Rc::downgrade(&self.node)
    }

    #[inline]
    pub(crate) fn from_node(node: Rc<OperationNode>) -> Self {
        Self { node }
    }

    /// Registers `hook` to run when the last handle is dropped.
    ///
    /// The hook receives the node while it is being destroyed; it runs at most once. Only an
    /// unregistered operation can take a hook.
    pub(crate) fn on_last_release(&self, hook: ReleaseHook) {
        debug_assert_eq!(
            self.node.state(),
            CacheState::Unregistered,
            "an operation is registered at most once"
        );
        self.node.on_release.set(Some(hook));
        self.node.set_state(CacheState::Registered);
    }
}
