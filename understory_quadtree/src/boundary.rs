// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned cell geometry: containment, clip-edge predicates, corner
//! coverage.

use kurbo::{Point, Rect};

use crate::polygon::PolygonMask;

/// Rectangle given by its center and half-extents.
///
/// Containment carries a tiny outward tolerance, so a point sitting exactly
/// on the seam between two cells tests inside both; placement order decides
/// which cell takes it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boundary {
    /// X coordinate of the center.
    pub center_x: f64,
    /// Y coordinate of the center.
    pub center_y: f64,
    /// Distance from the center to the east/west edges.
    pub half_x: f64,
    /// Distance from the center to the north/south edges.
    pub half_y: f64,
}

impl Boundary {
    /// A boundary from its center and half-extents.
    pub const fn new(center_x: f64, center_y: f64, half_x: f64, half_y: f64) -> Self {
        Self {
            center_x,
            center_y,
            half_x,
            half_y,
        }
    }

    /// A boundary covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let c = rect.center();
        Self::new(c.x, c.y, rect.width() / 2.0, rect.height() / 2.0)
    }

    /// The same region as a [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.center_x - self.half_x,
            self.center_y - self.half_y,
            self.center_x + self.half_x,
            self.center_y + self.half_y,
        )
    }

    /// The center point.
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Whether the point is inside, with the outward tolerance.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x < self.center_x + self.half_x * 1.00001
            && x > self.center_x - self.half_x * 1.00001
            && y < self.center_y + self.half_y * 1.00001
            && y > self.center_y - self.half_y * 1.00001
    }

    /// Half the perimeter's reach: `half_x + half_y`.
    pub fn norm_l1(&self) -> f64 {
        self.half_x + self.half_y
    }

    /// The smaller half-extent. Size-floor predicates usually test this.
    pub fn norm_infty(&self) -> f64 {
        self.half_x.min(self.half_y)
    }

    /// Whether `p` lies strictly west of the box (clip outside test).
    pub fn left_of(&self, p: Point) -> bool {
        p.x < self.center_x - self.half_x - 1e-4
    }

    /// Whether `p` lies strictly east of the box (clip outside test).
    pub fn right_of(&self, p: Point) -> bool {
        p.x > self.center_x + self.half_x + 1e-4
    }

    /// Whether `p` lies strictly south of the box (clip outside test).
    pub fn bottom_of(&self, p: Point) -> bool {
        p.y < self.center_y - self.half_y - 1e-4
    }

    /// Whether `p` lies strictly north of the box (clip outside test).
    pub fn up_of(&self, p: Point) -> bool {
        p.y > self.center_y + self.half_y + 1e-4
    }

    /// Intersection of the directed segment `from → to` with the west edge.
    pub fn intersect_left(&self, from: Point, to: Point) -> Point {
        let x = self.center_x - self.half_x;
        Point::new(x, from.y + (x - from.x) / (to.x - from.x) * (to.y - from.y))
    }

    /// Intersection of the directed segment `from → to` with the east edge.
    pub fn intersect_right(&self, from: Point, to: Point) -> Point {
        let x = self.center_x + self.half_x;
        Point::new(x, from.y + (x - from.x) / (to.x - from.x) * (to.y - from.y))
    }

    /// Intersection of the directed segment `from → to` with the south edge.
    pub fn intersect_bottom(&self, from: Point, to: Point) -> Point {
        let y = self.center_y - self.half_y;
        Point::new(from.x + (y - from.y) / (to.y - from.y) * (to.x - from.x), y)
    }

    /// Intersection of the directed segment `from → to` with the north edge.
    pub fn intersect_up(&self, from: Point, to: Point) -> Point {
        let y = self.center_y + self.half_y;
        Point::new(from.x + (y - from.y) / (to.y - from.y) * (to.x - from.x), y)
    }

    /// How many of the four corners lie inside `mask`, in `0..=4`.
    ///
    /// `4` means the whole box is inside the polygon, which lets traversal
    /// skip per-point filtering for this cell.
    pub fn covered_by_polygon(&self, mask: &PolygonMask) -> u8 {
        let mut nb = 0;
        for (sx, sy) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
            if mask.contains(Point::new(
                self.center_x + sx * self.half_x,
                self.center_y + sy * self.half_y,
            )) {
                nb += 1;
            }
        }
        nb
    }

    /// The `s`th quad-bisection, in the canonical child order
    /// SW = 0, SE = 1, NW = 2, NE = 3.
    pub fn quadrant(&self, s: usize) -> Boundary {
        debug_assert!(s < 4);
        let half_x = self.half_x / 2.0;
        let half_y = self.half_y / 2.0;
        let center_x = if s & 1 == 0 {
            self.center_x - half_x
        } else {
            self.center_x + half_x
        };
        let center_y = if s > 1 {
            self.center_y + half_y
        } else {
            self.center_y - half_y
        };
        Boundary::new(center_x, center_y, half_x, half_y)
    }
}
