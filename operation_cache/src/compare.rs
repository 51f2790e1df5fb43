// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-value structural equality, consistent with [`crate::hash::value_hash`].

use alloc::string::String;

use crate::value::{CustomValue, Value};

/// Returns `true` if `a` and `b` have the same tag and equal payloads.
///
/// - Numeric tags compare with `==` (so `NaN` is unequal to itself and `-0.0 == 0.0`).
/// - Strings compare by content.
/// - [`Value::Ref`] compares by identity.
/// - [`Value::Custom`] uses the kind's [`fast_eq`](crate::CustomKind::fast_eq) when it has one,
///   and otherwise compares canonical text, mirroring the hashing fallback.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if a.value_type() != b.value_type() {
        return false;
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::UChar(x), Value::UChar(y)) => x == y,
        (Value::Int(x), Value::Int(y)) | (Value::Enum(x), Value::Enum(y)) => x == y,
        (Value::UInt(x), Value::UInt(y)) | (Value::Flags(x), Value::Flags(y)) => x == y,
        (Value::Long(x), Value::Long(y)) | (Value::I64(x), Value::I64(y)) => x == y,
        (Value::ULong(x), Value::ULong(y)) | (Value::U64(x), Value::U64(y)) => x == y,
        (Value::F32(x), Value::F32(y)) => x == y,
        (Value::F64(x), Value::F64(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Ref(x), Value::Ref(y)) => x.same_object(y),
        (Value::Custom(x), Value::Custom(y)) => custom_equal(x, y),
        // Tags already matched above.
        _ => false,
    }
}

fn custom_equal(a: &CustomValue, b: &CustomValue) -> bool {
    if let Some(eq) = a.get().fast_eq(b.get()) {
        return eq;
    }

    tracing::warn!(
        kind = a.kind(),
        "values_equal: no fast path for value kind, comparing canonical text"
    );
    canonical_text(a) == canonical_text(b)
}

fn canonical_text(value: &CustomValue) -> String {
    let mut text = String::new();
    value.write_canonical(&mut text);
    text
}
