// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf-ordered traversal: read-only iteration, close-pair enumeration, and
//! the mutating cursor that re-homes moved points mid-walk.

use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::Point;

use crate::neighbour::{Direction, MAX_LEVEL};
use crate::node::NodeId;
use crate::polygon::PolygonMask;
use crate::tree::{Coord2D, Quadtree};
use crate::types::Key;

/// Frontier ordering key: location codes normalised to a common depth, so
/// cells of different levels compare in traversal order.
fn frontier_key(location: u64, level: u32) -> u64 {
    if level == 0 {
        0
    } else {
        location << (2 * (MAX_LEVEL - level))
    }
}

fn point_of<T: Coord2D>(value: &T) -> Point {
    Point::new(value.x(), value.y())
}

/// Read-only traversal over `(Key, &T)` in leaf order, optionally clipped
/// by a polygon mask.
///
/// With a mask, each leaf's boundary first clips the polygon: leaves whose
/// clip degenerates (fewer than three vertices) are skipped wholesale, and
/// leaves wholly inside the polygon (all four corners covered) skip the
/// per-point containment test.
pub struct Iter<'a, T> {
    tree: &'a Quadtree<T>,
    mask: Option<&'a PolygonMask>,
    leaf_pos: usize,
    point_pos: usize,
    /// Corner coverage of the current leaf; 4 when unmasked.
    aux: u8,
}

impl<'a, T: Coord2D> Iter<'a, T> {
    pub(crate) fn new(tree: &'a Quadtree<T>, mask: Option<&'a PolygonMask>) -> Self {
        let mut it = Self {
            tree,
            mask,
            leaf_pos: 0,
            point_pos: 0,
            aux: 4,
        };
        it.enter_leaf();
        it
    }

    /// Position on the next leaf the mask admits.
    fn enter_leaf(&mut self) {
        self.point_pos = 0;
        while self.leaf_pos < self.tree.leaves.len() {
            let node = self.tree.node(self.tree.leaves[self.leaf_pos]);
            self.aux = 4;
            if let Some(mask) = self.mask {
                let clip = mask.clip(&node.boundary);
                if clip.len() < 3 {
                    self.leaf_pos += 1;
                    continue;
                }
                self.aux = node.boundary.covered_by_polygon(&clip);
            }
            return;
        }
    }
}

impl<'a, T: Coord2D> Iterator for Iter<'a, T> {
    type Item = (Key, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.leaf_pos >= self.tree.leaves.len() {
                return None;
            }
            let node = self.tree.node(self.tree.leaves[self.leaf_pos]);
            if self.point_pos >= node.points.len() {
                self.leaf_pos += 1;
                self.enter_leaf();
                continue;
            }
            let key = node.points[self.point_pos];
            self.point_pos += 1;
            let value = self.tree.value(key);
            if self.aux < 4
                && let Some(mask) = self.mask
                && !mask.contains(point_of(value))
            {
                continue;
            }
            return Some((key, value));
        }
    }
}

/// Enumeration of each unordered pair of close points exactly once.
///
/// For every point, the partners are the points after it in its own leaf
/// plus all points of the forward neighbourhood: same-level-or-coarser
/// leaves across east, north-east, north and north-west, and strictly
/// coarser leaves across west, south-west, south and south-east. Those
/// gates make exactly one endpoint of every adjacent-leaf pair produce it.
pub struct Pairs<'a, T> {
    tree: &'a Quadtree<T>,
    mask: Option<&'a PolygonMask>,
    leaf_pos: usize,
    /// Points of the current leaf admitted by the mask.
    own: Vec<Key>,
    /// Forward-neighbourhood candidates, cached while the leaf is current.
    nbs: Vec<Key>,
    i: usize,
    j: usize,
}

impl<'a, T: Coord2D> Pairs<'a, T> {
    pub(crate) fn new(tree: &'a Quadtree<T>, mask: Option<&'a PolygonMask>) -> Self {
        let mut pairs = Self {
            tree,
            mask,
            leaf_pos: 0,
            own: Vec::new(),
            nbs: Vec::new(),
            i: 0,
            j: 0,
        };
        pairs.load_leaf();
        pairs
    }

    /// Load the next leaf with at least one admitted point, caching its
    /// forward-neighbourhood candidates.
    fn load_leaf(&mut self) {
        while self.leaf_pos < self.tree.leaves.len() {
            let id = self.tree.leaves[self.leaf_pos];
            let node = self.tree.node(id);
            self.own.clear();
            self.nbs.clear();
            self.i = 0;
            self.j = 0;

            let mut aux = 4u8;
            if let Some(mask) = self.mask {
                let clip = mask.clip(&node.boundary);
                if clip.len() < 3 {
                    self.leaf_pos += 1;
                    continue;
                }
                aux = node.boundary.covered_by_polygon(&clip);
            }
            for &key in &node.points {
                if aux < 4
                    && let Some(mask) = self.mask
                    && !mask.contains(point_of(self.tree.value(key)))
                {
                    continue;
                }
                self.own.push(key);
            }
            if self.own.is_empty() {
                self.leaf_pos += 1;
                continue;
            }
            self.collect_neighbours(id);
            return;
        }
    }

    fn collect_neighbours(&mut self, id: NodeId) {
        let node = self.tree.node(id);
        let mut cells: Vec<NodeId> = Vec::new();
        for dir in [
            Direction::East,
            Direction::NorthEast,
            Direction::North,
            Direction::NorthWest,
        ] {
            if node.delta[dir.index()].same_or_coarser() {
                let nb = self.tree.resolve_same_level(id, dir);
                if !cells.contains(&nb) {
                    cells.push(nb);
                }
            }
        }
        for dir in [
            Direction::West,
            Direction::SouthWest,
            Direction::South,
            Direction::SouthEast,
        ] {
            if node.delta[dir.index()].is_coarser() {
                let nb = self.tree.resolve_same_level(id, dir);
                if !cells.contains(&nb) {
                    cells.push(nb);
                }
            }
        }
        for nb in cells {
            let nb_node = self.tree.node(nb);
            if let Some(mask) = self.mask {
                let clip = mask.clip(&nb_node.boundary);
                if clip.len() < 3 {
                    continue;
                }
                if nb_node.boundary.covered_by_polygon(&clip) == 4 {
                    self.nbs.extend(nb_node.points.iter().copied());
                } else {
                    for &key in &nb_node.points {
                        if mask.contains(point_of(self.tree.value(key))) {
                            self.nbs.push(key);
                        }
                    }
                }
            } else {
                self.nbs.extend(nb_node.points.iter().copied());
            }
        }
    }
}

impl<'a, T: Coord2D> Iterator for Pairs<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.leaf_pos >= self.tree.leaves.len() {
                return None;
            }
            if self.i >= self.own.len() {
                self.leaf_pos += 1;
                self.load_leaf();
                continue;
            }
            let rest = self.own.len() - self.i - 1;
            if self.j >= rest + self.nbs.len() {
                self.i += 1;
                self.j = 0;
                continue;
            }
            let a = self.own[self.i];
            let b = if self.j < rest {
                self.own[self.i + 1 + self.j]
            } else {
                self.nbs[self.j - rest]
            };
            self.j += 1;
            return Some((self.tree.value(a), self.tree.value(b)));
        }
    }
}

struct Pending {
    key: Key,
    point_pos: usize,
}

/// Mutating cursor over the points, in leaf order.
///
/// The cursor lends `&mut T` one point at a time; before advancing it
/// checks whether the point it just lent still lies in its leaf, and if not
/// re-homes it from the root. A point that migrates to a later leaf is
/// remembered and skipped when the walk reaches it, so every live point is
/// visited exactly once per walk regardless of how far it moves. A point
/// moved outside the root boundary is released from the index.
pub struct CursorMut<'a, T: Coord2D> {
    tree: &'a mut Quadtree<T>,
    mask: Option<&'a PolygonMask>,
    /// The current leaf; `leaf_pos` is re-synchronised against it after a
    /// relocation splices the frontier.
    leaf: NodeId,
    leaf_pos: usize,
    point_pos: usize,
    aux: u8,
    already: HashSet<Key>,
    pending: Option<Pending>,
    done: bool,
}

impl<'a, T: Coord2D> CursorMut<'a, T> {
    pub(crate) fn new(tree: &'a mut Quadtree<T>, mask: Option<&'a PolygonMask>) -> Self {
        let mut cursor = Self {
            leaf: NodeId::ROOT,
            tree,
            mask,
            leaf_pos: 0,
            point_pos: 0,
            aux: 4,
            already: HashSet::new(),
            pending: None,
            done: false,
        };
        cursor.enter_leaf();
        cursor
    }

    /// The next point, after settling the previous one.
    #[allow(
        clippy::should_implement_trait,
        reason = "Lending cursor: the item borrows the cursor, so this cannot be Iterator::next."
    )]
    pub fn next(&mut self) -> Option<&mut T> {
        self.settle();
        loop {
            if self.done {
                return None;
            }
            let node = self.tree.node(self.leaf);
            if self.point_pos >= node.points.len() {
                self.leaf_pos += 1;
                self.enter_leaf();
                continue;
            }
            let key = node.points[self.point_pos];
            self.point_pos += 1;
            if self.already.contains(&key) {
                continue;
            }
            if self.aux < 4
                && let Some(mask) = self.mask
                && !mask.contains(point_of(self.tree.value(key)))
            {
                continue;
            }
            self.pending = Some(Pending {
                key,
                point_pos: self.point_pos - 1,
            });
            return Some(self.tree.value_mut(key));
        }
    }

    fn enter_leaf(&mut self) {
        self.point_pos = 0;
        while self.leaf_pos < self.tree.leaves.len() {
            let id = self.tree.leaves[self.leaf_pos];
            let node = self.tree.node(id);
            self.aux = 4;
            if let Some(mask) = self.mask {
                let clip = mask.clip(&node.boundary);
                if clip.len() < 3 {
                    self.leaf_pos += 1;
                    continue;
                }
                self.aux = node.boundary.covered_by_polygon(&clip);
            }
            self.leaf = id;
            return;
        }
        self.done = true;
    }

    /// Re-home the previously lent point if its move left the leaf.
    fn settle(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let node = self.tree.node(self.leaf);
        let value = self.tree.value(pending.key);
        if node.boundary.contains(value.x(), value.y()) {
            return;
        }
        let old_order = frontier_key(node.location, node.level);
        debug_assert_eq!(self.point_pos, pending.point_pos + 1);
        self.tree.nodes[self.leaf.idx()].points.remove(pending.point_pos);
        self.point_pos = pending.point_pos;

        if let Some(new_leaf) = self.tree.rehome(pending.key) {
            let new_node = self.tree.node(new_leaf);
            if frontier_key(new_node.location, new_node.level) > old_order {
                self.already.insert(pending.key);
            }
        }

        // Relocation may have subdivided and spliced the frontier.
        if self.tree.leaves.get(self.leaf_pos) != Some(&self.leaf)
            && let Some(pos) = self.tree.leaves.iter().position(|&l| l == self.leaf)
        {
            self.leaf_pos = pos;
        }
    }
}

impl<'a, T: Coord2D> Drop for CursorMut<'a, T> {
    fn drop(&mut self) {
        self.settle();
    }
}

/// Read-only view of a tree restricted to one polygon mask.
pub struct Masked<'a, T> {
    tree: &'a Quadtree<T>,
    mask: &'a PolygonMask,
}

impl<'a, T> Clone for Masked<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Masked<'a, T> {}

impl<'a, T: Coord2D> Masked<'a, T> {
    pub(crate) fn new(tree: &'a Quadtree<T>, mask: &'a PolygonMask) -> Self {
        Self { tree, mask }
    }

    /// Traversal over the points inside the mask.
    pub fn iter(self) -> Iter<'a, T> {
        Iter::new(self.tree, Some(self.mask))
    }

    /// Close-pair enumeration restricted to points inside the mask.
    pub fn pairs(self) -> Pairs<'a, T> {
        Pairs::new(self.tree, Some(self.mask))
    }
}

/// Mutating view of a tree restricted to one polygon mask.
pub struct MaskedMut<'a, T> {
    tree: &'a mut Quadtree<T>,
    mask: &'a PolygonMask,
}

impl<'a, T: Coord2D> MaskedMut<'a, T> {
    pub(crate) fn new(tree: &'a mut Quadtree<T>, mask: &'a PolygonMask) -> Self {
        Self { tree, mask }
    }

    /// Mutating cursor over the points inside the mask.
    pub fn iter_mut(self) -> CursorMut<'a, T> {
        CursorMut::new(self.tree, Some(self.mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn tree_with(points: &[(f64, f64)], capacity: usize) -> Quadtree<(f64, f64)> {
        let mut q = Quadtree::new(0.0, 0.0, 4.0, 4.0, capacity);
        for &p in points {
            q.insert(p).unwrap();
        }
        q
    }

    #[test]
    fn iter_visits_every_point_once() {
        let pts = [
            (1.0, 1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
            (-1.0, -1.0),
            (2.5, 2.5),
            (0.2, 0.1),
        ];
        let q = tree_with(&pts, 2);
        let mut seen: Vec<(f64, f64)> = q.iter().map(|(_, &p)| p).collect();
        assert_eq!(seen.len(), pts.len());
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut want = pts.to_vec();
        want.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, want);
    }

    #[test]
    fn iter_keys_match_get() {
        let q = tree_with(&[(1.0, 2.0), (-3.0, 0.5)], 4);
        for (key, value) in q.iter() {
            assert_eq!(q.get(key), Some(value));
        }
    }

    #[test]
    fn masked_iter_filters_points() {
        let q = tree_with(&[(1.0, 1.0), (3.0, 3.0), (-2.0, -2.0), (0.5, 1.5)], 2);
        // A triangle over the north-east area.
        let mask = PolygonMask::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let mut inside: Vec<(f64, f64)> = q.masked(&mask).iter().map(|(_, &p)| p).collect();
        inside.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(inside, vec![(0.5, 1.5), (1.0, 1.0), (3.0, 3.0)]);
    }

    #[test]
    fn masked_iter_with_covering_mask_sees_everything() {
        let pts = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-2.5, -2.5)];
        let q = tree_with(&pts, 2);
        let mask = PolygonMask::new(vec![
            Point::new(-10.0, -10.0),
            Point::new(10.0, -10.0),
            Point::new(10.0, 10.0),
            Point::new(-10.0, 10.0),
        ]);
        assert_eq!(q.masked(&mask).iter().count(), pts.len());
    }

    #[test]
    fn masked_iter_with_disjoint_mask_is_empty() {
        let q = tree_with(&[(1.0, 1.0), (-1.0, -1.0)], 4);
        let mask = PolygonMask::new(vec![
            Point::new(20.0, 20.0),
            Point::new(21.0, 20.0),
            Point::new(21.0, 21.0),
        ]);
        assert_eq!(q.masked(&mask).iter().count(), 0);
    }

    #[test]
    fn pairs_within_a_single_leaf() {
        let q = tree_with(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], 4);
        let pairs: Vec<_> = q.pairs().collect();
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn pairs_are_unique_across_leaves() {
        let pts = [
            (1.0, 1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
            (-1.0, -1.0),
            (0.6, 0.6),
            (2.5, 2.5),
            (-2.5, 2.5),
            (3.5, 0.5),
        ];
        let q = tree_with(&pts, 2);
        let mut seen: Vec<((f64, f64), (f64, f64))> = Vec::new();
        for (&a, &b) in q.pairs() {
            let pair = if a <= b { (a, b) } else { (b, a) };
            assert!(!seen.contains(&pair), "pair {pair:?} enumerated twice");
            assert_ne!(a, b);
            seen.push(pair);
        }
    }

    #[test]
    fn cursor_visits_points_without_moves() {
        let pts = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];
        let mut q = tree_with(&pts, 2);
        let mut visited = 0;
        let mut cursor = q.iter_mut();
        while cursor.next().is_some() {
            visited += 1;
        }
        drop(cursor);
        assert_eq!(visited, pts.len());
    }

    #[test]
    fn cursor_rehomes_moved_points() {
        let mut q = tree_with(&[(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)], 2);
        let mut cursor = q.iter_mut();
        while let Some(p) = cursor.next() {
            if *p == (1.0, 1.0) {
                *p = (-2.5, -2.5);
            }
        }
        drop(cursor);
        assert_eq!(q.len(), 4);
        for leaf in q.leaves() {
            for (_, p) in leaf.points() {
                assert!(leaf.boundary().contains(p.x(), p.y()));
            }
        }
    }

    #[test]
    fn cursor_visits_forward_migrants_once() {
        // Move every visited point to the far north-east corner cell; the
        // `already` set must keep the walk from seeing it again there.
        let pts = [
            (-3.0, -3.0),
            (-1.0, -1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
            (1.0, 1.0),
        ];
        let mut q = tree_with(&pts, 2);
        let mut visits = 0u32;
        let mut cursor = q.iter_mut();
        while let Some(p) = cursor.next() {
            visits += 1;
            *p = (2.0 + 0.3 * f64::from(visits), 3.5);
        }
        drop(cursor);
        assert_eq!(visits as usize, pts.len());
        assert_eq!(q.len(), pts.len());
    }

    #[test]
    fn cursor_releases_points_leaving_the_root() {
        let mut q = tree_with(&[(1.0, 1.0), (-1.0, -1.0)], 4);
        let mut cursor = q.iter_mut();
        while let Some(p) = cursor.next() {
            if *p == (1.0, 1.0) {
                *p = (50.0, 50.0);
            }
        }
        drop(cursor);
        assert_eq!(q.len(), 1);
        assert_eq!(q.iter().count(), 1);
    }

    #[test]
    fn cursor_settles_on_drop() {
        let mut q = tree_with(&[(1.0, 1.0), (-1.0, -1.0)], 4);
        let mut cursor = q.iter_mut();
        if let Some(p) = cursor.next() {
            *p = (-2.0, -2.0);
        }
        drop(cursor);
        for leaf in q.leaves() {
            for (_, p) in leaf.points() {
                assert!(leaf.boundary().contains(p.x(), p.y()));
            }
        }
    }

    #[test]
    fn masked_cursor_only_lends_points_inside() {
        let mut q = tree_with(&[(1.0, 1.0), (-1.0, -1.0), (3.0, 3.0)], 2);
        let mask = PolygonMask::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let mut lent: Vec<(f64, f64)> = Vec::new();
        let mut cursor = q.masked_mut(&mask).iter_mut();
        while let Some(p) = cursor.next() {
            lent.push(*p);
        }
        drop(cursor);
        lent.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(lent, vec![(1.0, 1.0), (3.0, 3.0)]);
    }

    #[test]
    fn frontier_key_orders_mixed_levels() {
        // A leaf's children order between the leaf's predecessor and
        // successor; deeper cells inherit their ancestor's position.
        assert!(frontier_key(0x0, 1) < frontier_key(0x1, 1));
        assert!(frontier_key(0x1, 1) < frontier_key(0x2, 1));
        // 0xc..0xf are the children of 0x3.
        assert!(frontier_key(0x2, 1) < frontier_key(0xc, 2));
        assert!(frontier_key(0xc, 2) < frontier_key(0xf, 2));
        assert_eq!(frontier_key(0xc, 2), frontier_key(0x3, 1));
        assert!(frontier_key(0x30, 3) < frontier_key(0xd, 2));
    }
}
