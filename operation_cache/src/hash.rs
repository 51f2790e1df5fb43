// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-value hashing.
//!
//! [`value_hash`] is deterministic and consistent with [`crate::compare::values_equal`]: equal
//! values always hash equal. Every built-in [`Value`] variant has a dedicated fast path.
//!
//! [`Value::Custom`] values whose kind does not provide [`CustomKind::fast_hash`] fall back to
//! hashing their canonical text. That path formats the value on every call, so it is slow, and it
//! logs a warning naming the kind so a fast path can be added.
//!
//! [`CustomKind::fast_hash`]: crate::CustomKind::fast_hash

use core::fmt;

use crate::value::{CustomValue, Value};

const STR_HASH_SEED: u32 = 5381;

/// Hashes a single value.
#[must_use]
pub fn value_hash(value: &Value) -> u32 {
    match value {
        Value::Bool(v) => u32::from(*v),
        Value::Char(v) => i32::from(*v).cast_unsigned(),
        Value::UChar(v) => u32::from(*v),
        Value::Int(v) | Value::Enum(v) => v.cast_unsigned(),
        Value::UInt(v) | Value::Flags(v) => *v,
        Value::Long(v) | Value::I64(v) => fold_u64(v.cast_unsigned()),
        Value::ULong(v) | Value::U64(v) => fold_u64(*v),
        // `-0.0 == 0.0`, so both must hash alike.
        Value::F32(v) => {
            if *v == 0.0 {
                0
            } else {
                v.to_bits()
            }
        }
        Value::F64(v) => {
            if *v == 0.0 {
                0
            } else {
                fold_u64(v.to_bits())
            }
        }
        Value::Str(s) => str_hash(s),
        Value::Ref(r) => fold_u64(r.addr() as u64),
        Value::Custom(c) => custom_hash(c),
    }
}

/// Classic `h * 33 + byte` string hash.
#[must_use]
#[inline]
pub fn str_hash(s: &str) -> u32 {
    let mut h = StrHasher::new();
    h.update(s.as_bytes());
    h.finish()
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "folding keeps the low half after mixing in the high half"
)]
#[inline]
const fn fold_u64(v: u64) -> u32 {
    (v ^ (v >> 32)) as u32
}

fn custom_hash(value: &CustomValue) -> u32 {
    if let Some(h) = value.get().fast_hash() {
        return h;
    }

    tracing::warn!(
        kind = value.kind(),
        "value_hash: no fast path for value kind, hashing canonical text"
    );

    let mut h = StrHasher::new();
    value.write_canonical(&mut h);
    h.finish()
}

/// Incremental form of [`str_hash`], so canonical text can be hashed without allocating.
#[derive(Copy, Clone, Debug)]
struct StrHasher(u32);

impl StrHasher {
    #[inline]
    const fn new() -> Self {
        Self(STR_HASH_SEED)
    }

    #[inline]
    fn update(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(33).wrapping_add(u32::from(b));
        }
    }

    #[inline]
    const fn finish(self) -> u32 {
        self.0
    }
}

impl fmt::Write for StrHasher {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.update(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::value::{CustomKind, ObjRef};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::any::Any;

    #[derive(Debug)]
    struct Blob(Vec<u8>);

    impl fmt::Display for Blob {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for b in &self.0 {
                write!(f, "{b:02x}")?;
            }
            Ok(())
        }
    }

    impl CustomKind for Blob {
        fn kind(&self) -> &'static str {
            "blob"
        }
    }

    #[test]
    fn integer_fast_paths() {
        assert_eq!(value_hash(&Value::Bool(true)), 1);
        assert_eq!(value_hash(&Value::Char(-1)), u32::MAX);
        assert_eq!(value_hash(&Value::UChar(200)), 200);
        assert_eq!(value_hash(&Value::Int(100)), 100);
        assert_eq!(value_hash(&Value::Flags(0b101)), 0b101);
        assert_eq!(value_hash(&Value::U64(7)), 7);
        assert_ne!(
            value_hash(&Value::U64(1)),
            value_hash(&Value::U64(1 << 32 | 1)),
            "high half participates"
        );
    }

    #[test]
    fn float_zero_signs_hash_alike() {
        assert_eq!(value_hash(&Value::F32(0.0)), value_hash(&Value::F32(-0.0)));
        assert_eq!(value_hash(&Value::F64(0.0)), value_hash(&Value::F64(-0.0)));
        assert_ne!(value_hash(&Value::F64(1.0)), value_hash(&Value::F64(2.0)));
    }

    #[test]
    fn string_hash_matches_reference_values() {
        assert_eq!(str_hash(""), 5381);
        // 5381 * 33 + 'a'
        assert_eq!(str_hash("a"), 177_670);
        assert_eq!(value_hash(&Value::str("resize")), str_hash("resize"));
    }

    #[test]
    fn ref_hash_uses_identity_not_content() {
        let a: Rc<dyn Any> = Rc::new(1_u8);
        let r = ObjRef::new(a.clone());
        let same = ObjRef::new(a);
        assert_eq!(value_hash(&Value::Ref(r)), value_hash(&Value::Ref(same)));
    }

    /// Writes a prefix and then reports an error.
    #[derive(Debug)]
    struct Truncated;

    impl fmt::Display for Truncated {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("x")?;
            Err(fmt::Error)
        }
    }

    impl CustomKind for Truncated {
        fn kind(&self) -> &'static str {
            "truncated"
        }
    }

    #[test]
    fn failing_display_hashes_the_partial_text() {
        let v = Value::custom(Truncated);
        assert_eq!(value_hash(&v), str_hash("x"));
    }

    #[test]
    fn custom_fallback_hashes_canonical_text() {
        let blob = Value::custom(Blob(alloc::vec![0xde, 0xad]));
        assert_eq!(value_hash(&blob), str_hash("dead"));
        assert_eq!(value_hash(&blob), value_hash(&blob.clone()));
    }
}
