// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use waypoint_index::{IndexParams, RankedPoint, Rect, SearchIndex};

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
    let mut points: Vec<RankedPoint> = (0..count)
        .map(|i| RankedPoint {
            id: (i % 128) as i8,
            rank: i as i32,
            x: rng.next_f32() * extent - extent / 2.0,
            y: rng.next_f32() * extent - extent / 2.0,
        })
        .collect();
    for i in (1..points.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        points.swap(i, j);
    }
    points
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[100_000usize, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("uniform_n{}", n), |b| {
            b.iter_batched(
                || gen_uniform_points(n, 2000.0, 0xCAFE_F00D_DEAD_BEEF),
                |points| {
                    let index = SearchIndex::build(points);
                    black_box(index.len());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_query_strategies(c: &mut Criterion) {
    let points = gen_uniform_points(1_000_000, 2000.0, 0x5EED_5EED_5EED_5EED);
    let params = IndexParams::default();
    let index = SearchIndex::build_with(points, params);

    // Dense window over the center: the tree walk with fast rank pruning.
    let dense = Rect::new(-500.0, -500.0, 500.0, 500.0);
    // Sparse window near the corner: few expected hits, the linear scan.
    let sparse = Rect::new(-999.9, -999.9, -995.0, -995.0);
    // Thin slab: nearly zero width, worst case for any tree.
    let slab = Rect::new(0.1, -1000.0, 0.1 + 5.0e-5, 1000.0);

    let mut group = c.benchmark_group("query_1m");
    group.bench_function("dense_window_k20", |b| {
        b.iter(|| black_box(index.search(black_box(&dense), 20)))
    });
    group.bench_function("sparse_window_k20", |b| {
        b.iter(|| black_box(index.search(black_box(&sparse), 20)))
    });
    group.bench_function("thin_slab_k20", |b| {
        b.iter(|| black_box(index.search(black_box(&slab), 20)))
    });
    group.finish();
}

fn bench_band_sizes(c: &mut Criterion) {
    let points = gen_uniform_points(500_000, 2000.0, 0xBADC_0FFE_E0DD_F00D);
    let dense = Rect::new(-250.0, -250.0, 250.0, 250.0);

    let mut group = c.benchmark_group("band_size_500k");
    for &band in &[50_000usize, 200_000, 315_000] {
        let params = IndexParams {
            partition_size: band,
            ..IndexParams::default()
        };
        let index = SearchIndex::build_with(points.clone(), params);
        group.bench_function(format!("dense_band{}", band), |b| {
            b.iter(|| black_box(index.search(black_box(&dense), 20)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_query_strategies,
    bench_band_sizes
);
criterion_main!(benches);
