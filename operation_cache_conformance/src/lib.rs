// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance fixtures for `operation_cache`.
//!
//! This crate provides a small set of operation types and custom value kinds used by the
//! conformance tests in `tests/` and by the wind-tunnel benchmarks.

use std::any::Any;
use std::fmt;

use operation_cache::{ArgumentSpec, CustomKind, ObjRef, Operation, Value, ValueType, str_hash};

/// Interpolation kernel used by [`Resize`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kernel {
    /// Nearest neighbour.
    Nearest = 0,
    /// Linear.
    Linear = 1,
    /// Lanczos, three lobes.
    Lanczos3 = 2,
}

static RESIZE_ARGS: [ArgumentSpec; 4] = [
    ArgumentSpec::identity("width", ValueType::Int),
    ArgumentSpec::identity("height", ValueType::Int),
    ArgumentSpec::identity("kernel", ValueType::Enum),
    ArgumentSpec::plain("nickname", ValueType::Str),
];

/// Resize operation. Every argument is optional.
#[derive(Clone, Debug, Default)]
pub struct Resize {
    /// Target width.
    pub width: Option<i32>,
    /// Target height.
    pub height: Option<i32>,
    /// Interpolation kernel.
    pub kernel: Option<Kernel>,
    /// Display name; does not affect identity.
    pub nickname: Option<String>,
}

impl Resize {
    /// Creates a resize with no assigned arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `width`.
    #[must_use]
    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Assigns `height`.
    #[must_use]
    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    /// Assigns `kernel`.
    #[must_use]
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    /// Assigns `nickname`.
    #[must_use]
    pub fn nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

impl Operation for Resize {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &RESIZE_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        match index {
            0 => self.width.map(Value::Int),
            1 => self.height.map(Value::Int),
            2 => self.kernel.map(|k| Value::Enum(k as i32)),
            3 => self.nickname.as_deref().map(Value::str),
            _ => None,
        }
    }
}

static EMBED_ARGS: [ArgumentSpec; 2] = [
    ArgumentSpec::identity("payload", ValueType::Custom(Blob::KIND)),
    ArgumentSpec::identity("scale", ValueType::F64),
];

/// Operation whose identity includes a [`Blob`], which has no fast hash.
#[derive(Clone, Debug)]
pub struct Embed {
    /// Embedded bytes.
    pub payload: Blob,
    /// Scale factor.
    pub scale: f64,
}

impl Operation for Embed {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &EMBED_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::custom(self.payload.clone())),
            1 => Some(Value::F64(self.scale)),
            _ => None,
        }
    }
}

/// Raw structured bytes, rendered as lowercase hex.
///
/// This kind deliberately has no fast hash or equality so it exercises the text fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    /// Kind name.
    pub const KIND: &'static str = "blob";
}

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
        Self::KIND
    }
}

/// Case-insensitive caption with a dedicated hash and equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label(pub String);

impl Label {
    /// Kind name.
    pub const KIND: &'static str = "label";
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl CustomKind for Label {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn fast_hash(&self) -> Option<u32> {
        Some(str_hash(&self.0.to_ascii_lowercase()))
    }

    fn fast_eq(&self, other: &dyn CustomKind) -> Option<bool> {
        let other = (other as &dyn Any).downcast_ref::<Self>()?;
        Some(self.0.eq_ignore_ascii_case(&other.0))
    }
}

static OVERLAY_ARGS: [ArgumentSpec; 3] = [
    ArgumentSpec::identity("base", ValueType::Ref),
    ArgumentSpec::identity("opacity", ValueType::F64),
    ArgumentSpec::identity("title", ValueType::Custom(Label::KIND)),
];

/// Operation whose input is another object, compared by identity.
#[derive(Clone, Debug)]
pub struct Overlay {
    /// Input object.
    pub base: ObjRef,
    /// Blend opacity.
    pub opacity: f64,
    /// Optional caption.
    pub title: Option<Label>,
}

impl Overlay {
    /// Creates an overlay of `base` with no caption.
    #[must_use]
    pub fn new(base: ObjRef, opacity: f64) -> Self {
        Self {
            base,
            opacity,
            title: None,
        }
    }

    /// Assigns `title`.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(Label(title.into()));
        self
    }
}

impl Operation for Overlay {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &OVERLAY_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::Ref(self.base.clone())),
            1 => Some(Value::F64(self.opacity)),
            2 => self.title.clone().map(Value::custom),
            _ => None,
        }
    }
}

/// Operation with sixteen `i64` arguments, the last of which is not part of its identity.
#[derive(Clone, Debug)]
pub struct Wide {
    values: Vec<i64>,
}

static WIDE_ARGS: [ArgumentSpec; 16] = [
    ArgumentSpec::identity("v0", ValueType::I64),
    ArgumentSpec::identity("v1", ValueType::I64),
    ArgumentSpec::identity("v2", ValueType::I64),
    ArgumentSpec::identity("v3", ValueType::I64),
    ArgumentSpec::identity("v4", ValueType::I64),
    ArgumentSpec::identity("v5", ValueType::I64),
    ArgumentSpec::identity("v6", ValueType::I64),
    ArgumentSpec::identity("v7", ValueType::I64),
    ArgumentSpec::identity("v8", ValueType::I64),
    ArgumentSpec::identity("v9", ValueType::I64),
    ArgumentSpec::identity("v10", ValueType::I64),
    ArgumentSpec::identity("v11", ValueType::I64),
    ArgumentSpec::identity("v12", ValueType::I64),
    ArgumentSpec::identity("v13", ValueType::I64),
    ArgumentSpec::identity("v14", ValueType::I64),
    ArgumentSpec::plain("tail", ValueType::I64),
];

impl Wide {
    /// Number of declared arguments.
    pub const ARITY: usize = 16;

    /// Creates an operation from up to [`Self::ARITY`] values; missing ones stay unassigned.
    #[must_use]
    pub fn new(values: &[i64]) -> Self {
        Self {
            values: values.iter().copied().take(Self::ARITY).collect(),
        }
    }
}

impl Operation for Wide {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &WIDE_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        self.values.get(index).copied().map(Value::I64)
    }
}
