// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thin slab queries.
//!
//! Rectangles with a nearly-zero-width projection are the worst case for a
//! tree walk: they graze many node rectangles while containing almost
//! nothing. The index answers them from the axis-sorted arrays instead.
//! This demo builds a random set, queries a hair-thin vertical slab, and
//! verifies the result against a brute-force filter.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example thin_slab`

use waypoint_index::{RankedPoint, Rect, SearchIndex};

struct Rng(u64);

impl Rng {
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

fn main() {
    let mut rng = Rng(0x5EED_CAFE);
    let points: Vec<RankedPoint> = (0..1000)
        .map(|i| RankedPoint {
            id: (i % 128) as i8,
            rank: i as i32,
            x: rng.next_f32() * 200.0 - 100.0,
            y: rng.next_f32() * 200.0 - 100.0,
        })
        .collect();

    let index = SearchIndex::build(points.clone());

    // A slab 1e-4 wide centered on an actual point, spanning all of y.
    let x0 = points[500].x;
    let slab = Rect::new(x0 - 5.0e-5, -1.0e9, x0 + 5.0e-5, 1.0e9);
    let hits = index.search(&slab, 20);
    println!("slab around x = {x0}: {} hits", hits.len());
    for p in &hits {
        println!("  rank {:4}  at ({}, {})", p.rank, p.x, p.y);
    }

    // Brute force over the raw set must agree exactly.
    let mut expected: Vec<i32> = points
        .iter()
        .filter(|p| slab.contains_point(p.x, p.y))
        .map(|p| p.rank)
        .collect();
    expected.sort_unstable();
    expected.truncate(20);
    let got: Vec<i32> = hits.iter().map(|p| p.rank).collect();
    assert_eq!(got, expected);
    println!("brute force agrees");
}
