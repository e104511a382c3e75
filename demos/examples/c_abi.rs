// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The C ABI, driven from Rust.
//!
//! Exercises the packed-record facade the way a dynamic loader would:
//! create from a raw `[begin, end)` range, search into a caller-owned
//! buffer, destroy the handle.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example c_abi`

use waypoint_ffi::{Point, Rect, create, destroy, search};

fn main() {
    let points: Vec<Point> = (0..1000)
        .map(|i| Point {
            id: (i % 128) as i8,
            rank: i,
            x: (i % 37) as f32,
            y: (i % 29) as f32,
        })
        .collect();

    let begin = points.as_ptr();
    let end = unsafe { begin.add(points.len()) };
    let sc = unsafe { create(begin, end) };
    assert!(!sc.is_null());

    let rect = Rect {
        lx: 5.0,
        ly: 5.0,
        hx: 15.0,
        hy: 15.0,
    };
    let mut out = [Point {
        id: 0,
        rank: 0,
        x: 0.0,
        y: 0.0,
    }; 20];
    let n = unsafe { search(sc, rect, out.len() as i32, out.as_mut_ptr()) };

    println!("{} hits in {:?}:", n, rect);
    for p in &out[..n as usize] {
        let (rank, x, y) = (p.rank, p.x, p.y);
        println!("  rank {rank:4}  at ({x}, {y})");
    }

    let released = unsafe { destroy(sc) };
    assert!(released.is_null());
    println!("context released");
}
