// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite argument fingerprints.
//!
//! A fingerprint folds the hashes of an operation's assigned construction-identity arguments, in
//! declaration order, with `acc = (acc << 1) ^ hash`. The fold is order-sensitive, so swapping
//! two argument values usually changes the result.
//!
//! The fingerprint does not include the operation's concrete type. Two operations of different
//! types with the same argument values fingerprint alike, and it is up to the cache to compare
//! types before it trusts a fingerprint match.

use core::ops::ControlFlow;

use crate::argument::map_arguments;
use crate::hash::value_hash;
use crate::operation::{Operation, OperationNode, OperationRef};

/// Returns the fingerprint of `op`, computing and memoizing it on first use.
#[must_use]
pub fn fingerprint(op: &OperationRef) -> u32 {
    node_fingerprint(op.node())
}

pub(crate) fn node_fingerprint(node: &OperationNode) -> u32 {
    let slot = node.fingerprint_slot();
    if let Some(fp) = slot.get() {
        return fp;
    }
    let fp = compute_fingerprint(node.op());
    slot.set(Some(fp));
    fp
}

/// Computes the fingerprint of `op` without memoization.
#[must_use]
pub fn compute_fingerprint(op: &dyn Operation) -> u32 {
    let mut acc: u32 = 0;
    let _ = map_arguments(op, |arg| {
        if let Some(value) = arg.identity_value() {
            acc = (acc << 1) ^ value_hash(value);
        }
        ControlFlow::<()>::Continue(())
    });
    acc
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::{CountingOp, Crop, Resize};

    #[test]
    fn folds_assigned_identity_arguments_in_order() {
        let op = Resize::new().width(100).height(50);
        assert_eq!(compute_fingerprint(&op), (100 << 1) ^ 50);

        let swapped = Resize::new().width(50).height(100);
        assert_ne!(compute_fingerprint(&op), compute_fingerprint(&swapped));
    }

    #[test]
    fn ignores_unassigned_and_plain_arguments() {
        let bare = Resize::new().width(100);
        let labelled = Resize::new().width(100).label("thumb");
        assert_eq!(compute_fingerprint(&bare), 100);
        assert_eq!(compute_fingerprint(&bare), compute_fingerprint(&labelled));
        assert_eq!(compute_fingerprint(&Resize::new()), 0);
    }

    #[test]
    fn does_not_encode_the_operation_type() {
        let r = Resize::new().width(7).height(9);
        let c = Crop::new().width(7).height(9);
        assert_eq!(compute_fingerprint(&r), compute_fingerprint(&c));
    }

    #[test]
    fn memoized_after_first_use() {
        let (op, reads) = CountingOp::new(42);
        let op = OperationRef::new(op);

        let first = fingerprint(&op);
        let after_first = reads.get();
        let second = op.fingerprint();

        assert_eq!(first, second);
        assert_eq!(first, 42);
        assert!(after_first > 0, "first call enumerates arguments");
        assert_eq!(reads.get(), after_first, "second call reads the memo");
    }
}
