// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-argument descriptors and enumeration.
//!
//! Each operation type declares its construction arguments once, as a `&'static [ArgumentSpec]`
//! in a fixed order, and exposes their current values through [`Operation::argument`]. The cache
//! only ever looks at an operation through [`map_arguments`].
//!
//! ## Identity and assignment
//!
//! - Only arguments declared with [`ArgumentSpec::identity`] take part in deduplication.
//! - An argument is *assigned* when the accessor returns `Some`. Unassigned arguments (left at
//!   their default) are skipped by both the fingerprint and the equality check.

use core::ops::ControlFlow;

use crate::operation::Operation;
use crate::value::{Value, ValueType};

/// Static declaration of one construction argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Argument name, unique within the operation type.
    pub name: &'static str,
    /// Tag every assigned value of this argument carries.
    pub value_type: ValueType,
    /// Whether the argument participates in deduplication.
    pub identity: bool,
}

impl ArgumentSpec {
    /// Declares a construction-identity argument.
    #[must_use]
    #[inline]
    pub const fn identity(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            identity: true,
        }
    }

    /// Declares an argument that does not affect deduplication.
    #[must_use]
    #[inline]
    pub const fn plain(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            identity: false,
        }
    }
}

/// One argument as seen during enumeration.
#[derive(Clone, Debug)]
pub struct Argument<'a> {
    /// Position in the declaration list.
    pub index: usize,
    /// The argument's declaration.
    pub spec: &'a ArgumentSpec,
    /// Current value, or `None` if the argument was never assigned.
    pub value: Option<Value>,
}

impl Argument<'_> {
    /// Returns the argument name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Returns the declared value type.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.spec.value_type
    }

    /// Returns `true` if the argument participates in deduplication.
    #[must_use]
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.spec.identity
    }

    /// Returns `true` if the argument was assigned at construction time.
    #[must_use]
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the value if this argument is an assigned identity argument.
    #[must_use]
    #[inline]
    pub fn identity_value(&self) -> Option<&Value> {
        if self.spec.identity {
            self.value.as_ref()
        } else {
            None
        }
    }
}

/// Visits every declared argument of `op` in declaration order.
///
/// The visitor can stop early by returning [`ControlFlow::Break`], whose payload is returned.
pub fn map_arguments<B>(
    op: &dyn Operation,
    mut visit: impl FnMut(Argument<'_>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for (index, spec) in op.arguments().iter().enumerate() {
        let value = op.argument(index);
        debug_assert!(
            value
                .as_ref()
                .is_none_or(|v| v.value_type() == spec.value_type),
            "argument `{}` of {} reported a value of the wrong type",
            spec.name,
            op.name(),
        );
        if let ControlFlow::Break(b) = visit(Argument { index, spec, value }) {
            return ControlFlow::Break(b);
        }
    }
    ControlFlow::Continue(())
}
