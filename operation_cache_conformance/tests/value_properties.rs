// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the hash/equality contract.

use std::any::Any;
use std::rc::Rc;

use operation_cache::{ObjRef, Value, value_hash, values_equal};
use operation_cache_conformance::{Blob, Label};
use proptest::prelude::*;

thread_local! {
    static OBJECTS: [Rc<u8>; 3] = [Rc::new(0), Rc::new(0), Rc::new(1)];
}

/// A reference to one of a few shared objects, two of which hold equal content.
fn pooled_ref(index: usize) -> Value {
    OBJECTS.with(|objects| {
        let obj: Rc<dyn Any> = objects[index].clone();
        Value::Ref(ObjRef::new(obj))
    })
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::Char),
        any::<u8>().prop_map(Value::UChar),
        (-4_i32..4).prop_map(Value::Int),
        (0_u32..4).prop_map(Value::UInt),
        any::<i64>().prop_map(Value::Long),
        any::<u64>().prop_map(Value::ULong),
        (0_i32..4).prop_map(Value::Enum),
        (0_u32..4).prop_map(Value::Flags),
        any::<i64>().prop_map(Value::I64),
        any::<u64>().prop_map(Value::U64),
        any::<f32>().prop_map(Value::F32),
        prop_oneof![Just(0.0_f64), Just(-0.0_f64), any::<f64>()].prop_map(Value::F64),
        "[a-c]{0,3}".prop_map(Value::str),
        proptest::collection::vec(any::<u8>(), 0..3).prop_map(|b| Value::custom(Blob(b))),
        (0_usize..3).prop_map(pooled_ref),
        "[aAbB]{0,2}".prop_map(|s| Value::custom(Label(s))),
    ]
}

fn is_nan(v: &Value) -> bool {
    matches!(v, Value::F32(x) if x.is_nan()) || matches!(v, Value::F64(x) if x.is_nan())
}

proptest! {
    #[test]
    fn equal_values_hash_equal(a in any_value(), b in any_value()) {
        if values_equal(&a, &b) {
            prop_assert_eq!(value_hash(&a), value_hash(&b));
        }
    }

    #[test]
    fn hashing_is_deterministic(a in any_value()) {
        prop_assert_eq!(value_hash(&a), value_hash(&a.clone()));
        prop_assert_eq!(values_equal(&a, &a.clone()), !is_nan(&a));
    }

    #[test]
    fn differing_tags_are_never_equal(a in any_value(), b in any_value()) {
        if a.value_type() != b.value_type() {
            prop_assert!(!values_equal(&a, &b));
        }
    }

    #[test]
    fn refs_are_equal_only_to_the_same_object(i in 0_usize..3, j in 0_usize..3) {
        prop_assert_eq!(values_equal(&pooled_ref(i), &pooled_ref(j)), i == j);
    }

    #[test]
    fn same_payload_bits_under_different_tags(x in any::<u32>()) {
        prop_assert!(!values_equal(&Value::UInt(x), &Value::Flags(x)));
        prop_assert!(!values_equal(&Value::Int(x.cast_signed()), &Value::Enum(x.cast_signed())));
        prop_assert!(!values_equal(&Value::U64(u64::from(x)), &Value::ULong(u64::from(x))));
    }
}
