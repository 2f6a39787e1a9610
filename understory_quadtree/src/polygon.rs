// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon masks: point-in-polygon testing and Sutherland–Hodgman clipping.

use alloc::vec::Vec;

use kurbo::Point;

use crate::boundary::Boundary;

/// An arbitrary (possibly non-convex) polygon restricting traversal to the
/// points inside it.
///
/// Construction precomputes one `constant`/`multiple` pair per edge, which
/// makes the ray-parity containment test branch-light
/// (see <http://alienryderflex.com/polygon/>).
#[derive(Clone, Debug)]
pub struct PolygonMask {
    vertices: Vec<Point>,
    constant: Vec<f64>,
    multiple: Vec<f64>,
}

impl PolygonMask {
    /// A mask over the given vertex ring.
    pub fn new(vertices: Vec<Point>) -> Self {
        let mut mask = Self {
            vertices,
            constant: Vec::new(),
            multiple: Vec::new(),
        };
        mask.precompute();
        mask
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the mask has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex ring.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn precompute(&mut self) {
        let n = self.vertices.len();
        self.constant.clear();
        self.constant.resize(n, 0.0);
        self.multiple.clear();
        self.multiple.resize(n, 0.0);
        if n == 0 {
            return;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.vertices[i], self.vertices[j]);
            if pj.y == pi.y {
                self.constant[i] = pi.x;
                self.multiple[i] = 0.0;
            } else {
                self.constant[i] = pi.x - (pi.y * pj.x) / (pj.y - pi.y)
                    + (pi.y * pi.x) / (pj.y - pi.y);
                self.multiple[i] = (pj.x - pi.x) / (pj.y - pi.y);
            }
            j = i;
        }
    }

    /// Whether `p` is inside the polygon (horizontal-ray parity test).
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n == 0 {
            return false;
        }
        let mut j = n - 1;
        let mut odd = false;
        for i in 0..n {
            let (yi, yj) = (self.vertices[i].y, self.vertices[j].y);
            if (yi < p.y && yj >= p.y) || (yj < p.y && yi >= p.y) {
                odd ^= p.y * self.multiple[i] + self.constant[i] < p.x;
            }
            j = i;
        }
        odd
    }

    /// This polygon clipped by the four half-planes of `boundary`
    /// (Sutherland–Hodgman, one pass per edge).
    ///
    /// A result with fewer than three vertices means the intersection is
    /// empty. Intersections numerically equal to the vertex about to be
    /// emitted are suppressed, so polygons tangent to the box do not grow
    /// zero-length edges.
    pub fn clip(&self, boundary: &Boundary) -> PolygonMask {
        type Outside = fn(&Boundary, Point) -> bool;
        type Intersect = fn(&Boundary, Point, Point) -> Point;
        let passes: [(Outside, Intersect); 4] = [
            (Boundary::left_of, Boundary::intersect_left),
            (Boundary::right_of, Boundary::intersect_right),
            (Boundary::bottom_of, Boundary::intersect_bottom),
            (Boundary::up_of, Boundary::intersect_up),
        ];

        let mut out = self.vertices.clone();
        for (outside, intersect) in passes {
            let input = core::mem::take(&mut out);
            let Some(&last) = input.last() else { break };
            let mut from = last;
            for &to in &input {
                if !outside(boundary, to) {
                    if outside(boundary, from) {
                        let inter = intersect(boundary, from, to);
                        if inter != to {
                            out.push(inter);
                        }
                    }
                    out.push(to);
                } else if !outside(boundary, from) {
                    let inter = intersect(boundary, from, to);
                    if inter != from {
                        out.push(inter);
                    }
                }
                from = to;
            }
        }
        PolygonMask::new(out)
    }
}
