// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use waypoint_index::{RankedPoint, Rect, SearchIndex};

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

type RankedGeom = GeomWithData<[f32; 2], i32>;

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
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

fn gen_uniform_points(count: usize, extent: f32, seed: u64) -> Vec<RankedPoint> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| RankedPoint {
            id: (i % 128) as i8,
            rank: i as i32,
            x: rng.next_f32() * extent - extent / 2.0,
            y: rng.next_f32() * extent - extent / 2.0,
        })
        .collect()
}

fn to_rstar_points(points: &[RankedPoint]) -> Vec<RankedGeom> {
    points
        .iter()
        .map(|p| GeomWithData::new([p.x, p.y], p.rank))
        .collect()
}

/// rstar has no rank pruning; the fair baseline collects everything in the
/// envelope, sorts by rank, and truncates to K.
fn rstar_top_k(tree: &RTree<RankedGeom>, region: &Rect, k: usize) -> Vec<i32> {
    let envelope = AABB::from_corners([region.lx, region.ly], [region.hx, region.hy]);
    let mut ranks: Vec<i32> = tree
        .locate_in_envelope_intersecting(&envelope)
        .map(|g| g.data)
        .collect();
    ranks.sort_unstable();
    ranks.truncate(k);
    ranks
}

fn bench_top_k_vs_rstar(c: &mut Criterion) {
    for &n in &[100_000usize, 1_000_000] {
        let points = gen_uniform_points(n, 2000.0, 0xCAFE_F00D_DEAD_BEEF);
        let index = SearchIndex::build(points.clone());
        let rstar_tree = RTree::bulk_load(to_rstar_points(&points));

        let dense = Rect::new(-400.0, -400.0, 400.0, 400.0);
        let sparse = Rect::new(700.0, 700.0, 720.0, 720.0);

        // The two engines must agree before the numbers mean anything.
        let ours: Vec<i32> = index.search(&dense, 20).iter().map(|p| p.rank).collect();
        assert_eq!(ours, rstar_top_k(&rstar_tree, &dense, 20));

        let mut group = c.benchmark_group(format!("top_k_vs_rstar_n{}", n));
        group.throughput(Throughput::Elements(1));

        group.bench_function("waypoint_dense", |b| {
            b.iter(|| black_box(index.search(black_box(&dense), 20)))
        });
        group.bench_function("rstar_dense", |b| {
            b.iter(|| black_box(rstar_top_k(&rstar_tree, black_box(&dense), 20)))
        });
        group.bench_function("waypoint_sparse", |b| {
            b.iter(|| black_box(index.search(black_box(&sparse), 20)))
        });
        group.bench_function("rstar_sparse", |b| {
            b.iter(|| black_box(rstar_top_k(&rstar_tree, black_box(&sparse), 20)))
        });
        group.finish();
    }
}

criterion_group!(benches, bench_top_k_vs_rstar);
criterion_main!(benches);
