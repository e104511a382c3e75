// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search basics.
//!
//! Build a small index, run a few rectangle queries, and cross-check one of
//! them against the linear reference engine.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example search_basics`

use waypoint_index::{RankedPoint, Rect, SearchIndex, TopK, scan_all};

fn main() {
    // A 10x10 grid; rank grows row by row, so low ranks sit near the bottom.
    let points: Vec<RankedPoint> = (0..100)
        .map(|i| RankedPoint {
            id: (i % 100) as i8,
            rank: i,
            x: (i % 10) as f32,
            y: (i / 10) as f32,
        })
        .collect();

    let index = SearchIndex::build(points.clone());
    println!("index: {index:?}");

    // The five most important points in the lower-left quadrant.
    let quadrant = Rect::new(-0.5, -0.5, 4.5, 4.5);
    let hits = index.search(&quadrant, 5);
    println!("lower-left top 5:");
    for p in &hits {
        println!("  rank {:4}  at ({}, {})", p.rank, p.x, p.y);
    }

    // Cross-check against the rank-ordered reference scan.
    let mut sorted = points;
    sorted.sort_unstable_by_key(|p| p.rank);
    let mut reference = TopK::new(5);
    scan_all(&sorted, &quadrant, &mut reference);
    assert_eq!(hits, reference.drain_sorted());
    println!("reference scan agrees");

    // A rectangle that misses everything.
    let missed = index.search(&Rect::new(50.0, 50.0, 60.0, 60.0), 5);
    println!("far away: {} hits", missed.len());
}
