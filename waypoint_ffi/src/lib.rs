// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint FFI: the three-function C ABI over [`waypoint_index`].
//!
//! The surface is an opaque handle and three entry points:
//!
//! - [`create`]: copy a `[begin, end)` range of packed [`Point`]s (valid only
//!   for the duration of the call) and build an index.
//! - [`search`]: write up to `count` points inside a [`Rect`] into a
//!   caller-owned buffer, lowest rank first, and return how many were
//!   written.
//! - [`destroy`]: release the handle; returns null on success, the input
//!   handle on failure.
//!
//! The record layout is bit-exact and packed: [`Point`] is 13 bytes
//! (`i8` id, little-endian `i32` rank, `f32` x, `f32` y), [`Rect`] is four
//! contiguous `f32`s. Both are checked at compile time.
//!
//! Errors never cross the boundary as unwinds: internal panics are caught
//! and reported as a null handle (`create`) or a zero count (`search`).
//! Invalid input degrades the same way: a null or reversed range builds an
//! empty index, a null handle searches as empty, an inverted rectangle
//! matches nothing. Points with non-finite coordinates or `|x| > 1e9` /
//! `|y| > 1e9` are dropped during `create`.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::slice;

use waypoint_index::{RankedPoint, SearchIndex};

/// Packed point record as it crosses the ABI: 13 bytes, no padding.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug)]
pub struct Point {
    /// Caller-assigned identifier; carried through untouched.
    pub id: i8,
    /// Unique importance rank; lower is more important.
    pub rank: i32,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

/// Query rectangle as it crosses the ABI: four contiguous `f32`s, closed on
/// all sides.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Rect {
    /// Low x edge.
    pub lx: f32,
    /// Low y edge.
    pub ly: f32,
    /// High x edge.
    pub hx: f32,
    /// High y edge.
    pub hy: f32,
}

const _: () = assert!(size_of::<Point>() == 13, "Point must pack to 13 bytes");
const _: () = assert!(size_of::<Rect>() == 16, "Rect must be 16 bytes");

/// Opaque search handle returned by [`create`] and consumed by [`search`]
/// and [`destroy`].
pub struct SearchContext {
    index: SearchIndex,
}

impl From<Point> for RankedPoint {
    #[inline]
    fn from(p: Point) -> Self {
        RankedPoint {
            id: p.id,
            rank: p.rank,
            x: p.x,
            y: p.y,
        }
    }
}

impl From<RankedPoint> for Point {
    #[inline]
    fn from(p: RankedPoint) -> Self {
        Point {
            id: p.id,
            rank: p.rank,
            x: p.x,
            y: p.y,
        }
    }
}

/// Build a search context from the points in `[points_begin, points_end)`.
///
/// The input is copied; it only needs to stay valid for this call. A null or
/// reversed range yields a valid, empty context. Returns null only if the
/// build itself fails.
///
/// # Safety
///
/// If non-null, `points_begin` and `points_end` must delimit a single
/// readable allocation of consecutive [`Point`] records.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn create(
    points_begin: *const Point,
    points_end: *const Point,
) -> *mut SearchContext {
    let points: Vec<RankedPoint> =
        if points_begin.is_null() || points_end.is_null() || points_end <= points_begin {
            Vec::new()
        } else {
            // Packed records have alignment 1, so any non-null pointer is
            // sufficiently aligned.
            let count = unsafe { points_end.offset_from(points_begin) } as usize;
            let raw = unsafe { slice::from_raw_parts(points_begin, count) };
            raw.iter().copied().map(RankedPoint::from).collect()
        };

    match catch_unwind(AssertUnwindSafe(|| SearchIndex::build(points))) {
        Ok(index) => Box::into_raw(Box::new(SearchContext { index })),
        Err(_) => ptr::null_mut(),
    }
}

/// Write up to `count` points inside `rect` into `out_points`, ordered by
/// ascending rank, and return the number written.
///
/// Returns 0 for a null handle, a null buffer, a non-positive `count`, or a
/// rectangle containing no indexed points. Never writes past `count`
/// entries.
///
/// # Safety
///
/// If non-null, `sc` must be a live handle from [`create`], and
/// `out_points` must point to writable space for at least `count` records.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn search(
    sc: *mut SearchContext,
    rect: Rect,
    count: i32,
    out_points: *mut Point,
) -> i32 {
    if sc.is_null() || out_points.is_null() || count <= 0 {
        return 0;
    }
    let context = unsafe { &*sc };
    let region = waypoint_index::Rect::new(rect.lx, rect.ly, rect.hx, rect.hy);

    let hits = match catch_unwind(AssertUnwindSafe(|| {
        context.index.search(&region, count as usize)
    })) {
        Ok(hits) => hits,
        Err(_) => return 0,
    };

    let out = unsafe { slice::from_raw_parts_mut(out_points, count as usize) };
    for (slot, hit) in out.iter_mut().zip(&hits) {
        *slot = Point::from(*hit);
    }
    hits.len() as i32
}

/// Release a context. Returns null on success; a null input is reported
/// back unchanged as failure.
///
/// # Safety
///
/// If non-null, `sc` must be a live handle from [`create`] and must not be
/// used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn destroy(sc: *mut SearchContext) -> *mut SearchContext {
    if sc.is_null() {
        return sc;
    }
    drop(unsafe { Box::from_raw(sc) });
    ptr::null_mut()
}
