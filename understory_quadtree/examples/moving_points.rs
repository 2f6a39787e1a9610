// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving points under a quadtree: drift, re-home, count close pairs.
//!
//! Run:
//! - `cargo run -p understory_quadtree --example moving_points`

use kurbo::Point;
use understory_quadtree::{Coord2D, PolygonMask, Quadtree};

#[derive(Clone, Copy)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Coord2D for Body {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

fn main() {
    let half = 400.0;
    let mut tree: Quadtree<Body> = Quadtree::new(0.0, 0.0, half, half, 12);
    tree.set_size_floor(Some(Box::new(|b| b.norm_infty() < 8.0)));

    // A deterministic scatter with per-point velocities.
    let mut seed = 0x2545_F491_4F6C_DD1Du64;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };
    for _ in 0..4000 {
        let body = Body {
            x: next() * half,
            y: next() * half,
            vx: next() * 2.0,
            vy: next() * 2.0,
        };
        tree.insert(body).unwrap();
    }
    println!("built: {tree:?}");

    for tick in 0..10 {
        // Drift every body; the cursor re-homes the ones that cross a leaf.
        let mut cursor = tree.iter_mut();
        while let Some(b) = cursor.next() {
            b.x += b.vx;
            b.y += b.vy;
            if b.x.abs() > half - 1.0 {
                b.vx = -b.vx;
            }
            if b.y.abs() > half - 1.0 {
                b.vy = -b.vy;
            }
        }
        drop(cursor);

        // Conflict scan: every close pair shows up exactly once.
        let radius = 8.0;
        let conflicts = tree
            .pairs()
            .filter(|(a, b)| {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                dx * dx + dy * dy < radius * radius
            })
            .count();
        println!(
            "tick {tick}: depth {}, fullest leaf {}, conflicts {conflicts}",
            tree.depth(),
            tree.max_leaf_size()
        );
    }

    // Region query: how many bodies sit inside a triangular sector?
    let sector = PolygonMask::new(vec![
        Point::new(0.0, 0.0),
        Point::new(half, -half),
        Point::new(half, half),
    ]);
    let in_sector = tree.masked(&sector).iter().count();
    println!("bodies in the eastern sector: {in_sector}");
}
