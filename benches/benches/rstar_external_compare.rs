// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_quadtree::{PolygonMask, Quadtree};

use rstar::{AABB, RTree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_points(count: usize, half: f64) -> Vec<[f64; 2]> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            [
                (rng.next_f64() * 2.0 - 1.0) * half,
                (rng.next_f64() * 2.0 - 1.0) * half,
            ]
        })
        .collect()
}

fn rect_mask(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonMask {
    PolygonMask::new(vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ])
}

fn bench_region_query_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_query_compare");
    for &n in &[10_000usize, 100_000] {
        let points = gen_points(n, 512.0);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("quadtree_build_query_n{}", n), |b| {
            let mask = rect_mask(-100.0, -100.0, 300.0, 300.0);
            b.iter_batched(
                || {
                    let mut q: Quadtree<Point> = Quadtree::new(0.0, 0.0, 512.0, 512.0, 16);
                    q.set_size_floor(Some(Box::new(|bb| bb.norm_infty() < 1.0)));
                    for p in &points {
                        let _ = q.insert(Point::new(p[0], p[1]));
                    }
                    q
                },
                |q| {
                    let hits = q.masked(&mask).iter().count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            let envelope = AABB::from_corners([-100.0, -100.0], [300.0, 300.0]);
            b.iter_batched(
                || RTree::bulk_load(points.clone()),
                |tree| {
                    let hits = tree.locate_in_envelope(&envelope).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_region_query_compare);
criterion_main!(benches);
