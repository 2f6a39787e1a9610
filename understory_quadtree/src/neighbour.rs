// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compass directions and base-4 location-code arithmetic.
//!
//! Every cell is named by its path from the root: two bits per level, bit 0
//! selecting east/west and bit 1 selecting north/south. The location of the
//! same-level neighbour in any of the eight compass directions is computed
//! purely with bitwise arithmetic: one carry-isolated increment per axis, so
//! a carry on the x digits never leaks into the y digits.

/// The eight compass directions, enumerated counter-clockwise from east.
///
/// The discriminants are part of the adjacency bookkeeping: a direction and
/// its opposite differ by 4, and diagonals are the odd values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Towards positive x.
    East = 0,
    /// Towards positive x and positive y.
    NorthEast = 1,
    /// Towards positive y.
    North = 2,
    /// Towards negative x and positive y.
    NorthWest = 3,
    /// Towards negative x.
    West = 4,
    /// Towards negative x and negative y.
    SouthWest = 5,
    /// Towards negative y.
    South = 6,
    /// Towards positive x and negative y.
    SouthEast = 7,
}

impl Direction {
    /// All eight directions in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    pub(crate) const fn from_index(i: u8) -> Self {
        match i & 7 {
            0 => Self::East,
            1 => Self::NorthEast,
            2 => Self::North,
            3 => Self::NorthWest,
            4 => Self::West,
            5 => Self::SouthWest,
            6 => Self::South,
            _ => Self::SouthEast,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        Self::from_index(self as u8 + 4)
    }

    /// Whether this is one of the four corner directions.
    pub const fn is_diagonal(self) -> bool {
        self as u8 & 1 == 1
    }
}

/// Depth limit: location codes are `u64`, two bits per level.
pub(crate) const MAX_LEVEL: u32 = 32;

/// Same-level neighbour arithmetic over location codes.
///
/// The x/y digit masks grow monotonically with the deepest level ever asked
/// for; each [`Quadtree`](crate::Quadtree) owns one `Neighbour` value, so
/// separate trees never share mask state.
#[derive(Clone, Debug)]
pub struct Neighbour {
    /// Number of base-4 digits currently covered by the masks.
    digits: u32,
    /// Digits all `1`: the backwards x movement (binary `…01 01 01`).
    x_mask: u64,
    /// Digits all `2`: the backwards y movement (binary `…10 10 10`).
    y_mask: u64,
}

impl Neighbour {
    /// Empty mask state; extended on first use.
    pub const fn new() -> Self {
        Self {
            digits: 0,
            x_mask: 0,
            y_mask: 0,
        }
    }

    /// Extend the masks so that queries up to `level` are covered.
    ///
    /// One digit beyond `level` is kept where the code space allows it, so
    /// that a neighbour falling outside the root still yields a distinct
    /// out-of-root code rather than wrapping onto a valid cell. Callers gate
    /// on the per-node adjacency table either way.
    pub(crate) fn ensure_level(&mut self, level: u32) {
        debug_assert!(level <= MAX_LEVEL);
        let want = (level + 1).min(MAX_LEVEL);
        while self.digits < want {
            self.x_mask = (self.x_mask << 2) | 1;
            self.y_mask = (self.y_mask << 2) | 2;
            self.digits += 1;
        }
    }

    /// The movement operand for `dir`, in location-code form.
    fn movement(&self, dir: Direction) -> u64 {
        match dir {
            Direction::East => 1,
            Direction::North => 2,
            Direction::NorthEast => 3,
            Direction::West => self.x_mask,
            Direction::South => self.y_mask,
            Direction::NorthWest => 2 + self.x_mask,
            Direction::SouthWest => self.y_mask + self.x_mask,
            Direction::SouthEast => self.y_mask + 1,
        }
    }

    /// Location of the same-level neighbour of `location` (a cell at
    /// `level`) in direction `dir`, extending the masks as needed.
    ///
    /// The result is the code of the geometric neighbour, or a code outside
    /// the root when the cell sits on the root boundary in that direction;
    /// the tree distinguishes the two with its adjacency table.
    pub fn same_level(&mut self, location: u64, dir: Direction, level: u32) -> u64 {
        self.ensure_level(level);
        self.lookup(location, dir, level)
    }

    /// Non-extending variant for read-only paths. Subdivision pre-extends
    /// the masks, so every live cell's level is already covered.
    pub(crate) fn lookup(&self, location: u64, dir: Direction, level: u32) -> u64 {
        debug_assert!(level <= self.digits || level == 0);
        let tx = self.x_mask;
        let ty = self.y_mask;
        let d = self.movement(dir);
        (((location | ty).wrapping_add(d & tx)) & tx)
            | (((location | tx).wrapping_add(d & ty)) & ty)
    }
}

impl Default for Neighbour {
    fn default() -> Self {
        Self::new()
    }
}
