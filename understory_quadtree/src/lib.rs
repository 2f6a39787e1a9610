// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: an adaptive quadtree for moving planar points.
//!
//! Understory Quadtree is a reusable building block for proximity queries
//! over point sets that change continuously: points move, appear, and
//! disappear between queries.
//!
//! - Insert, update, and remove points with user payloads; every live point
//!   keeps a stable [`Key`] and a locator to its owning leaf, so re-homing a
//!   moved point is cheap.
//! - Walk the points leaf by leaf, read-only ([`Quadtree::iter`]) or while
//!   moving them ([`Quadtree::iter_mut`], which re-homes points mid-walk and
//!   still visits each one exactly once).
//! - Enumerate each unordered pair of spatially close points exactly once
//!   ([`Quadtree::pairs`]), the primitive for conflict and collision scans.
//! - Restrict any walk to an arbitrary, possibly non-convex polygon
//!   ([`Quadtree::masked`], [`Quadtree::masked_mut`]).
//!
//! Cells are named by base-4 location codes, and every cell tracks the
//! level difference to its nearest neighbour in all eight compass
//! directions, so same-level neighbour lookup is pure bit arithmetic plus
//! one descent from the root, with no parent walks.
//!
//! It is `no_std` (with `alloc`) and Kurbo-native at the seams: polygon
//! vertices are [`kurbo::Point`] and cell rectangles convert to and from
//! [`kurbo::Rect`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_quadtree::Quadtree;
//!
//! // A 8×8 region centered at the origin, at most 4 points per leaf.
//! let mut tree: Quadtree<Point> = Quadtree::new(0.0, 0.0, 4.0, 4.0, 4);
//!
//! let a = tree.insert(Point::new(1.0, 1.0)).unwrap();
//! let b = tree.insert(Point::new(1.2, 1.3)).unwrap();
//! let _c = tree.insert(Point::new(-2.0, 1.0)).unwrap();
//!
//! // Close pairs: points in the same or an adjacent cell.
//! let candidates = tree.pairs().count();
//! assert!(candidates >= 1);
//!
//! // Move a point and tell the tree.
//! if let Some(p) = tree.get_mut(a) {
//!     *p = Point::new(-1.5, -0.5);
//! }
//! let crossed = tree.update(a).unwrap();
//! // Three points have not split the root yet, so the move stays in-leaf.
//! assert!(!crossed);
//!
//! tree.remove(b).unwrap();
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! ## Masked traversal
//!
//! ```rust
//! use kurbo::Point;
//! use understory_quadtree::{PolygonMask, Quadtree};
//!
//! let mut tree: Quadtree<Point> = Quadtree::new(0.0, 0.0, 4.0, 4.0, 4);
//! for i in 0..8 {
//!     let x = f64::from(i) - 3.5;
//!     tree.insert(Point::new(x, 0.5)).unwrap();
//! }
//!
//! // Only the eastern half.
//! let mask = PolygonMask::new(vec![
//!     Point::new(0.0, -4.0),
//!     Point::new(4.0, -4.0),
//!     Point::new(4.0, 4.0),
//!     Point::new(0.0, 4.0),
//! ]);
//! let inside = tree.masked(&mask).iter().count();
//! assert_eq!(inside, 4);
//! ```
//!
//! ## Capacity, size floor, and depth
//!
//! A leaf that grows past the tree's capacity subdivides, unless the host
//! installed a size floor ([`Quadtree::set_size_floor`]) that accepts the
//! leaf's boundary; such leaves grow beyond capacity instead. The floor is
//! the supported way to bound tree depth for pathological distributions:
//! without one, coincident points eventually exhaust the fixed depth limit
//! and inserts report [`ErrorKind::DepthExhausted`].
//!
//! Cells are only ever split, never merged; an emptied region keeps its
//! subdivision until the tree is dropped.
//!
//! ## Threading
//!
//! A `Quadtree` is single-threaded by construction: mutation requires
//! `&mut`, and the location-code mask state is owned per tree, so separate
//! trees never share anything.
//!
//! ## Float semantics
//!
//! Coordinates are `f64` and assumed finite (no NaNs). Containment tests
//! carry a tiny outward tolerance so points on a cell seam land in exactly
//! one of the abutting cells deterministically.

#![no_std]

extern crate alloc;

pub mod boundary;
pub mod iter;
pub mod neighbour;
pub mod node;
pub mod polygon;
pub mod tree;
pub mod types;

pub use boundary::Boundary;
pub use iter::{CursorMut, Iter, Masked, MaskedMut, Pairs};
pub use neighbour::{Direction, Neighbour};
pub use node::Adjacency;
pub use polygon::PolygonMask;
pub use tree::{Coord2D, Quadrant, Quadtree, SizeFloor};
pub use types::{ErrorKind, Key};
