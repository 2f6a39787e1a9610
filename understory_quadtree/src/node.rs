// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One quadtree cell: boundary, location code, adjacency table, children.

use alloc::vec::Vec;

use crate::boundary::Boundary;
use crate::neighbour::Direction;
use crate::types::Key;

/// Index of a node in the tree arena.
///
/// Nodes are created on subdivision and never freed before the whole tree
/// drops, so the index needs no generation counter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Level relationship with the nearest cell on one side.
///
/// For the four cardinal directions the relation is symmetric: if a cell
/// sees its eastern neighbour as [`Same`](Self::Same), that neighbour sees
/// it as `Same` to the west. For diagonals, a corner-only contact against a
/// grid of different depth cannot always name a reflexive partner;
/// [`DiagonalBroken`](Self::DiagonalBroken) marks that transient state until
/// the next subdivision touching the corner repairs it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Adjacency {
    /// The same-level neighbour exists and is a leaf.
    Same,
    /// The same-level neighbour is subdivided: finer cells abut this side.
    Finer,
    /// No neighbour: this side lies on the root boundary.
    OutOfArea,
    /// Corner-only contact whose reflexive link is pending repair.
    DiagonalBroken,
    /// The nearest neighbour on this side is `n` levels coarser (larger).
    Coarser(u16),
}

impl Adjacency {
    /// Whether a same-level neighbour cell can be resolved on this side.
    pub fn exists(self) -> bool {
        !matches!(self, Self::OutOfArea | Self::DiagonalBroken)
    }

    /// Whether the neighbour is a leaf of the same size or larger. Forward
    /// pair enumeration uses this gate on the east/north half-compass.
    pub fn same_or_coarser(self) -> bool {
        matches!(self, Self::Same | Self::Coarser(_))
    }

    /// Whether the neighbour is strictly larger. Forward pair enumeration
    /// uses this gate on the west/south half-compass.
    pub fn is_coarser(self) -> bool {
        matches!(self, Self::Coarser(_))
    }

    /// The relation one level down: what a child of this cell sees where the
    /// cell itself sees `self`.
    pub(crate) fn one_finer(self) -> Self {
        match self {
            Self::Finer => Self::Same,
            Self::Same => Self::Coarser(1),
            Self::Coarser(n) => Self::Coarser(n + 1),
            other => other,
        }
    }

    /// The relation after the neighbour on this side has subdivided once.
    /// Only relations below [`Finer`](Self::Finer) move.
    pub(crate) fn increment(self) -> Self {
        match self {
            Self::Same => Self::Finer,
            Self::Coarser(1) => Self::Same,
            Self::Coarser(n) => Self::Coarser(n - 1),
            other => other,
        }
    }

    /// Numeric relation for a repaired diagonal, `depth` levels coarser.
    pub(crate) fn from_depth(depth: u16) -> Self {
        if depth == 0 {
            Self::Same
        } else {
            Self::Coarser(depth)
        }
    }

    /// Child seeding for the slot pointing out of the parent diagonally.
    fn for_child_diagonal(self) -> Self {
        match self {
            Self::OutOfArea | Self::DiagonalBroken => self,
            numeric => numeric.one_finer(),
        }
    }

    /// Child seeding for the two cardinal slots pointing out of the parent.
    fn for_child_cardinal(self) -> Self {
        match self {
            Self::OutOfArea => self,
            numeric => numeric.one_finer(),
        }
    }
}

/// Directions pointing out of the parent for each child position, in the
/// canonical child order SW = 0, SE = 1, NW = 2, NE = 3.
const DIAGS: [Direction; 4] = [
    Direction::SouthWest,
    Direction::SouthEast,
    Direction::NorthWest,
    Direction::NorthEast,
];

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) boundary: Boundary,
    pub(crate) location: u64,
    pub(crate) level: u32,
    pub(crate) delta: [Adjacency; 8],
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) points: Vec<Key>,
    /// Cached size-floor verdict for `boundary`.
    pub(crate) floored: bool,
}

impl Node {
    pub(crate) fn root(boundary: Boundary) -> Self {
        Self {
            boundary,
            location: 0,
            level: 0,
            delta: [Adjacency::OutOfArea; 8],
            children: None,
            points: Vec::new(),
            floored: false,
        }
    }

    /// The `s`th child of `parent`, with its adjacency table seeded from the
    /// parent's, rotated around the child's outward diagonal:
    /// the outward slots inherit (one level finer), the three slots facing
    /// siblings are [`Same`](Adjacency::Same), and the two remaining corners
    /// start [`DiagonalBroken`](Adjacency::DiagonalBroken).
    pub(crate) fn child(parent: &Node, s: usize) -> Self {
        let diag = DIAGS[s].index();
        let pd = &parent.delta;
        let mut delta = [Adjacency::Same; 8];
        delta[diag] = pd[diag].for_child_diagonal();
        delta[(diag + 1) & 7] = pd[(diag + 1) & 7].for_child_cardinal();
        delta[(diag + 2) & 7] = Adjacency::DiagonalBroken;
        delta[(diag + 6) & 7] = Adjacency::DiagonalBroken;
        delta[(diag + 7) & 7] = pd[(diag + 7) & 7].for_child_cardinal();
        Self {
            boundary: parent.boundary.quadrant(s),
            location: (parent.location << 2) | s as u64,
            level: parent.level + 1,
            delta,
            children: None,
            points: Vec::new(),
            floored: false,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
