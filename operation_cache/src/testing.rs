// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation types shared by unit tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use crate::argument::ArgumentSpec;
use crate::operation::Operation;
use crate::value::{Value, ValueType};

static GEOMETRY_ARGS: [ArgumentSpec; 3] = [
    ArgumentSpec::identity("width", ValueType::Int),
    ArgumentSpec::identity("height", ValueType::Int),
    ArgumentSpec::plain("label", ValueType::Str),
];

macro_rules! geometry_op {
    ($name:ident) => {
        #[derive(Clone, Debug, Default)]
        pub(crate) struct $name {
            pub(crate) width: Option<i32>,
            pub(crate) height: Option<i32>,
            pub(crate) label: Option<Box<str>>,
        }

        impl $name {
            pub(crate) fn new() -> Self {
                Self::default()
            }

            pub(crate) fn width(mut self, width: i32) -> Self {
                self.width = Some(width);
                self
            }

            pub(crate) fn height(mut self, height: i32) -> Self {
                self.height = Some(height);
                self
            }

            pub(crate) fn label(mut self, label: &str) -> Self {
                self.label = Some(label.into());
                self
            }
        }

        impl Operation for $name {
            fn arguments(&self) -> &'static [ArgumentSpec] {
                &GEOMETRY_ARGS
            }

            fn argument(&self, index: usize) -> Option<Value> {
                match index {
                    0 => self.width.map(Value::Int),
                    1 => self.height.map(Value::Int),
                    2 => self.label.clone().map(Value::Str),
                    _ => None,
                }
            }
        }
    };
}

geometry_op!(Resize);
geometry_op!(Crop);

static COUNTING_ARGS: [ArgumentSpec; 1] = [ArgumentSpec::identity("n", ValueType::UInt)];

/// Counts how often its argument is read.
#[derive(Debug)]
pub(crate) struct CountingOp {
    n: u32,
    reads: Rc<Cell<usize>>,
}

impl CountingOp {
    pub(crate) fn new(n: u32) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        (
            Self {
                n,
                reads: reads.clone(),
            },
            reads,
        )
    }
}

impl Operation for CountingOp {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &COUNTING_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        self.reads.set(self.reads.get() + 1);
        (index == 0).then_some(Value::UInt(self.n))
    }
}

static GAIN_ARGS: [ArgumentSpec; 1] = [ArgumentSpec::identity("factor", ValueType::F64)];

/// Single `f64` identity argument, so a `NaN` factor makes the operation unequal to itself.
#[derive(Debug)]
pub(crate) struct Gain {
    factor: f64,
}

impl Gain {
    pub(crate) fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl Operation for Gain {
    fn arguments(&self) -> &'static [ArgumentSpec] {
        &GAIN_ARGS
    }

    fn argument(&self, index: usize) -> Option<Value> {
        (index == 0).then_some(Value::F64(self.factor))
    }
}
