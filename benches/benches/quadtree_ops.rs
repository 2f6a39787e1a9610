// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_quadtree::{Coord2D, Quadtree};

#[derive(Clone, Copy)]
struct Pt {
    x: f64,
    y: f64,
}

impl Coord2D for Pt {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

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

fn gen_points(count: usize, half: f64) -> Vec<Pt> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Pt {
            x: (rng.next_f64() * 2.0 - 1.0) * half,
            y: (rng.next_f64() * 2.0 - 1.0) * half,
        })
        .collect()
}

fn build_tree(points: &[Pt], half: f64, capacity: usize) -> Quadtree<Pt> {
    let mut q = Quadtree::new(0.0, 0.0, half, half, capacity);
    q.set_size_floor(Some(Box::new(|b| b.norm_infty() < 1.0)));
    for &p in points {
        let _ = q.insert(p);
    }
    q
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_build");
    for &n in &[1_000usize, 10_000] {
        let points = gen_points(n, 512.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_n{}", n), |b| {
            b.iter(|| {
                let q = build_tree(&points, 512.0, 12);
                black_box(q.depth());
            })
        });
    }
    group.finish();
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_pairs");
    for &n in &[1_000usize, 10_000] {
        let points = gen_points(n, 512.0);
        let q = build_tree(&points, 512.0, 12);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("forward_pairs_n{}", n), |b| {
            b.iter(|| {
                let close = q
                    .pairs()
                    .filter(|(a, b)| {
                        let (dx, dy) = (a.x - b.x, a.y - b.y);
                        dx * dx + dy * dy < 4.0
                    })
                    .count();
                black_box(close);
            })
        });
    }
    group.finish();
}

fn bench_mutating_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_mutating_walk");
    for &n in &[1_000usize, 10_000] {
        let points = gen_points(n, 512.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("drift_n{}", n), |b| {
            b.iter_batched(
                || build_tree(&points, 512.0, 12),
                |mut q| {
                    let mut cursor = q.iter_mut();
                    while let Some(p) = cursor.next() {
                        p.x += 0.8;
                        p.y -= 0.3;
                    }
                    drop(cursor);
                    black_box(q.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_pairs, bench_mutating_walk);
criterion_main!(benches);
