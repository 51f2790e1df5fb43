// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache construction options.

/// Options for an [`OperationCache`](crate::OperationCache).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    /// Number of entries the table is sized for when it is created on first use.
    ///
    /// The table grows past this as needed; there is no upper bound.
    pub initial_capacity: usize,
}

impl CacheOptions {
    /// Returns options with the given initial capacity.
    #[must_use]
    #[inline]
    pub const fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

impl Default for CacheOptions {
    #[inline]
    fn default() -> Self {
        Self {
            initial_capacity: 64,
        }
    }
}
