// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifier newtypes.

/// Identifies an input or derived table in a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

/// Identifies a numeric column within a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColId(pub u32);

/// Stable identity of a mark across ticks.
///
/// Renderers use this to match marks between frames, and it is the paint-order tie-break for
/// marks sharing a z-index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives a per-row id from a table id and a stable row key.
    ///
    /// The table id occupies the high 32 bits, so row marks of different tables never collide
    /// as long as row keys fit in 32 bits.
    pub const fn for_row(table: TableId, row_key: u64) -> Self {
        Self(((table.0 as u64) << 32) | (row_key & 0xFFFF_FFFF))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_are_distinct_across_tables() {
        let a = MarkId::for_row(TableId(1), 7);
        let b = MarkId::for_row(TableId(2), 7);
        assert_ne!(a, b);
        assert_eq!(a, MarkId::for_row(TableId(1), 7));
    }
}
