// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache activity counters.
//!
//! Counters are cheap and always on. Formatting and export are left to embedders.

/// Cumulative counts for one [`OperationCache`](crate::OperationCache).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned an existing operation.
    pub hits: u64,
    /// Lookups that found no equal operation.
    pub misses: u64,
    /// Entries removed after their operation's last reference was released.
    pub removals: u64,
}

impl CacheStats {
    /// Total number of lookups.
    #[must_use]
    #[inline]
    pub const fn lookups(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }
}
