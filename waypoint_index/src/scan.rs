// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-sorted point arrays and the bounded linear scans over them.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::collector::TopK;
use crate::types::{Axis, RankedPoint, Rect};

/// Two copies of the point set, one sorted by x and one by y.
///
/// Backs the linear-scan query path: for a rectangle whose projection on one
/// axis is very selective, a binary-searched walk over that axis costs
/// O(points in the projection), beating a tree walk whose node rectangles
/// the region grazes without containing. Admission order does not matter;
/// the collector keeps the best K.
pub struct SortedAxes {
    xs: Vec<RankedPoint>,
    ys: Vec<RankedPoint>,
}

impl SortedAxes {
    /// Copy and sort the point set along both axes.
    pub fn build(points: &[RankedPoint]) -> Self {
        let mut xs = points.to_vec();
        xs.sort_unstable_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        let mut ys = points.to_vec();
        ys.sort_unstable_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal));
        Self { xs, ys }
    }

    /// Scan the `axis`-sorted array across the region's projection,
    /// admitting points whose other coordinate also falls inside.
    pub fn scan(&self, axis: Axis, region: &Rect, out: &mut TopK) {
        let points = match axis {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        };
        let lo = axis.lo(region);
        let hi = axis.hi(region);
        let start = points.partition_point(|p| axis.coord(p) < lo);

        let cross = axis.other();
        for p in &points[start..] {
            if axis.coord(p) > hi {
                break;
            }
            let c = cross.coord(p);
            if c >= cross.lo(region) && c <= cross.hi(region) {
                out.try_add(*p);
            }
        }
    }
}

impl Debug for SortedAxes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SortedAxes")
            .field("len", &self.xs.len())
            .finish_non_exhaustive()
    }
}

/// Reference engine: scan a rank-sorted slice front to back and stop at the
/// first K hits, which are by construction the K most important.
///
/// Linear over the whole set, but exactly right; used as the differential
/// oracle and wherever simplicity beats the index.
pub fn scan_all(points_by_rank: &[RankedPoint], region: &Rect, out: &mut TopK) {
    debug_assert!(points_by_rank.windows(2).all(|w| w[0].rank < w[1].rank));
    for p in points_by_rank {
        if out.is_full() {
            break;
        }
        if region.contains_point(p.x, p.y) {
            out.try_add(*p);
        }
    }
}
