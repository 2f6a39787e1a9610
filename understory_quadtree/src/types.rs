// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point handles and failure categories.

use core::fmt;

/// Generational handle for a point stored in a [`Quadtree`](crate::Quadtree).
///
/// This is a small, copyable handle that stays stable while the point is
/// indexed, across any number of leaf migrations, and becomes invalid when
/// the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `Key` that pointed to that
///   slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `Key`.
///
/// Stale `Key`s never alias a different live point because the generation
/// must match; operations on a stale key report
/// [`ErrorKind::NotIndexed`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Key(pub(crate) u32, pub(crate) u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Failure categories reported by the quadtree.
///
/// Errors are reported, never retried internally.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The point lies outside the root boundary. The host decides whether
    /// to build a larger root or discard the point.
    OutOfBounds,
    /// The key does not refer to a live entry, or an updated point has left
    /// the root boundary entirely (its slot is released).
    NotIndexed,
    /// Placement would subdivide a cell past the fixed depth limit and no
    /// size floor is installed to stop subdivision earlier.
    DepthExhausted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("point outside the root boundary"),
            Self::NotIndexed => f.write_str("point is not indexed"),
            Self::DepthExhausted => f.write_str("tree depth limit exhausted"),
        }
    }
}

impl core::error::Error for ErrorKind {}
