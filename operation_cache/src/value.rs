// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed value model for construction arguments.
//!
//! Every construction argument an operation reports is a [`Value`]. The payload is interpreted
//! strictly per variant: two values with different [`ValueType`] tags are never equal, even when
//! their payloads share a bit pattern (`Int(1)` and `UInt(1)` are distinct).
//!
//! Kinds without a dedicated variant travel as [`Value::Custom`]. Custom kinds may provide their
//! own fast hash and equality through [`CustomKind`]; otherwise they take the slow text fallback in
//! [`crate::hash`] and [`crate::compare`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

/// An opaque reference compared by identity, never by the content it points at.
#[derive(Clone)]
pub struct ObjRef(Rc<dyn Any>);

impl ObjRef {
    /// Wraps a shared object.
    #[inline]
    pub fn new(obj: Rc<dyn Any>) -> Self {
        Self(obj)
    }

    /// Returns the address of the referenced object, which is its identity.
    #[must_use]
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Returns `true` if both references point at the same object.
    #[must_use]
    #[inline]
    pub fn same_object(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// Returns the referenced object.
    #[must_use]
    #[inline]
    pub fn get(&self) -> &dyn Any {
        &*self.0
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef({:#x})", self.addr())
    }
}

/// Extension point for value kinds that have no dedicated [`Value`] variant.
///
/// The [`Display`](fmt::Display) impl is the canonical text form used by the slow fallback, so it
/// must render equal values identically and unequal values differently.
///
/// Implementations that override [`fast_hash`](Self::fast_hash) must also override
/// [`fast_eq`](Self::fast_eq) (and vice versa) so that equal values keep hashing equal.
pub trait CustomKind: Any + fmt::Debug + fmt::Display {
    /// Stable kind name. Values of different kinds are never equal.
    fn kind(&self) -> &'static str;

    /// Dedicated hash for this kind, or `None` to use the text fallback.
    fn fast_hash(&self) -> Option<u32> {
        None
    }

    /// Dedicated equality against another value of the same kind, or `None` to use the text
    /// fallback.
    fn fast_eq(&self, _other: &dyn CustomKind) -> Option<bool> {
        None
    }
}

/// A shared value of a [`CustomKind`].
#[derive(Clone, Debug)]
pub struct CustomValue(Rc<dyn CustomKind>);

impl CustomValue {
    /// Wraps a custom-kind value.
    #[inline]
    pub fn new(value: impl CustomKind) -> Self {
        Self(Rc::new(value))
    }

    /// Returns the kind name.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }

    /// Returns the wrapped value.
    #[must_use]
    #[inline]
    pub fn get(&self) -> &dyn CustomKind {
        &*self.0
    }

    /// Writes the canonical text into `out`.
    ///
    /// A `Display` impl that fails leaves what it wrote before the error. Hashing and comparison
    /// both use that same prefix, so the text fallbacks stay consistent.
    pub(crate) fn write_canonical(&self, out: &mut impl fmt::Write) {
        if fmt::write(out, format_args!("{self}")).is_err() {
            tracing::warn!(
                kind = self.kind(),
                "custom value failed to format, using the partial text"
            );
        }
    }
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// A construction-argument value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    Char(i8),
    /// Unsigned 8-bit integer.
    UChar(u8),
    /// Signed 32-bit integer.
    Int(i32),
    /// Unsigned 32-bit integer.
    UInt(u32),
    /// Signed long integer.
    Long(i64),
    /// Unsigned long integer.
    ULong(u64),
    /// Enumeration value.
    Enum(i32),
    /// Flag set.
    Flags(u32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UTF-8 string.
    Str(Box<str>),
    /// Opaque reference, compared by identity.
    Ref(ObjRef),
    /// A kind without a dedicated variant.
    Custom(CustomValue),
}

/// Payload-free tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Char`].
    Char,
    /// [`Value::UChar`].
    UChar,
    /// [`Value::Int`].
    Int,
    /// [`Value::UInt`].
    UInt,
    /// [`Value::Long`].
    Long,
    /// [`Value::ULong`].
    ULong,
    /// [`Value::Enum`].
    Enum,
    /// [`Value::Flags`].
    Flags,
    /// [`Value::I64`].
    I64,
    /// [`Value::U64`].
    U64,
    /// [`Value::F32`].
    F32,
    /// [`Value::F64`].
    F64,
    /// [`Value::Str`].
    Str,
    /// [`Value::Ref`].
    Ref,
    /// [`Value::Custom`] of the named kind.
    Custom(&'static str),
}

impl Value {
    /// Constructs a [`Value::Str`].
    #[inline]
    pub fn str(s: impl Into<Box<str>>) -> Self {
        Self::Str(s.into())
    }

    /// Constructs a [`Value::Custom`].
    #[inline]
    pub fn custom(value: impl CustomKind) -> Self {
        Self::Custom(CustomValue::new(value))
    }

    /// Returns this value's tag.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Char(_) => ValueType::Char,
            Self::UChar(_) => ValueType::UChar,
            Self::Int(_) => ValueType::Int,
            Self::UInt(_) => ValueType::UInt,
            Self::Long(_) => ValueType::Long,
            Self::ULong(_) => ValueType::ULong,
            Self::Enum(_) => ValueType::Enum,
            Self::Flags(_) => ValueType::Flags,
            Self::I64(_) => ValueType::I64,
            Self::U64(_) => ValueType::U64,
            Self::F32(_) => ValueType::F32,
            Self::F64(_) => ValueType::F64,
            Self::Str(_) => ValueType::Str,
            Self::Ref(_) => ValueType::Ref,
            Self::Custom(c) => ValueType::Custom(c.kind()),
        }
    }
}

/// Tag-aware equality; see [`crate::compare::values_equal`].
impl PartialEq for Value {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        crate::compare::values_equal(self, other)
    }
}

/// Canonical text form.
///
/// Used for diagnostics and by the slow fallback for custom kinds.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::UChar(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::ULong(v) => write!(f, "{v}"),
            Self::Enum(v) => write!(f, "enum {v}"),
            Self::Flags(v) => write!(f, "flags {v:#x}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Ref(r) => write!(f, "ref {:#x}", r.addr()),
            Self::Custom(c) => write!(f, "{}: {c}", c.kind()),
        }
    }
}
