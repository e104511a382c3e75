// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `SearchIndex` build pipeline and per-query strategy selection.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::collector::TopK;
use crate::partition::PartitionedIndex;
use crate::rtree::TreeParams;
use crate::scan::SortedAxes;
use crate::stats::{Accumulator, Distribution};
use crate::types::{Axis, RankedPoint, Rect};

/// Coordinates beyond this magnitude are treated as invalid and dropped at
/// build time, along with non-finite values.
pub const COORD_LIMIT: f32 = 1.0e9;

/// Query edges narrower than this are handled by the axis-sorted scan
/// unconditionally; such slabs graze many node rectangles while containing
/// almost nothing, the tree's worst case.
const THIN_EDGE: f32 = 1.0e-4;

/// Build and query tuning knobs.
#[derive(Copy, Clone, Debug)]
pub struct IndexParams {
    /// Points per rank band; one tree is built per band.
    pub partition_size: usize,
    /// Estimated-hit ceiling below which a query uses the axis-sorted
    /// linear scan instead of the tree walk.
    pub linear_scan_threshold: usize,
    /// Fan-out of the per-band trees.
    pub tree: TreeParams,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            partition_size: 200_000,
            linear_scan_threshold: 800,
            tree: TreeParams::default(),
        }
    }
}

/// Immutable top-K-by-rank search index over a static 2D point set.
///
/// Built once from an owned point vector; queries are `&self`, allocate only
/// a collector and a traversal stack, and may run concurrently.
///
/// Each query picks its execution strategy from the rectangle's estimated
/// selectivity: rectangles expected to contain many points go to the
/// rank-pruned tree walk (pruning pays off quickly), rectangles expected to
/// contain few go to a binary-searched scan of the more selective
/// axis-sorted array (predictable cost where the tree walk degenerates).
pub struct SearchIndex {
    len: usize,
    bounds: Rect,
    dist: Distribution,
    axes: SortedAxes,
    partitions: PartitionedIndex,
    params: IndexParams,
}

impl SearchIndex {
    /// Build with default parameters. See [`SearchIndex::build_with`].
    pub fn build(points: Vec<RankedPoint>) -> Self {
        Self::build_with(points, IndexParams::default())
    }

    /// Build the index: sanitize, sort by rank, compute bounds and
    /// statistics, lay out the axis-sorted arrays, and pack one tree per
    /// rank band.
    ///
    /// Points with non-finite coordinates or `|x| > 1e9` / `|y| > 1e9` are
    /// dropped. The input vector is consumed as build scratch.
    pub fn build_with(mut points: Vec<RankedPoint>, params: IndexParams) -> Self {
        points.retain(|p| {
            p.x.is_finite()
                && p.y.is_finite()
                && libm::fabsf(p.x) <= COORD_LIMIT
                && libm::fabsf(p.y) <= COORD_LIMIT
        });
        points.sort_unstable_by_key(|p| p.rank);

        let mut bounds = Rect::EMPTY;
        let mut acc = Accumulator::default();
        for p in &points {
            bounds.extend_point(p);
            acc.apply(p);
        }

        let axes = SortedAxes::build(&points);
        let len = points.len();
        let partitions = PartitionedIndex::build(&mut points, params.partition_size, &params.tree);

        Self {
            len,
            bounds,
            dist: acc.finish(),
            axes,
            partitions,
            params,
        }
    }

    /// Number of indexed points (after sanitization).
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing survived sanitization.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tight bounds of the indexed points; [`Rect::EMPTY`] when empty.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The `k` most important points inside `region`, ascending by rank.
    pub fn search(&self, region: &Rect, k: usize) -> Vec<RankedPoint> {
        let mut out = TopK::new(k);
        self.search_into(region, &mut out);
        out.drain_sorted()
    }

    /// Run a search into a caller-owned collector, which may be reused
    /// across queries (clear it between searches).
    pub fn search_into(&self, region: &Rect, out: &mut TopK) {
        if self.len == 0 || out.capacity() == 0 {
            return;
        }
        // A back-to-front rectangle describes no area; report nothing
        // rather than guessing at a normalization.
        if region.lx > region.hx || region.ly > region.hy {
            return;
        }
        if !region.intersects(&self.bounds) {
            return;
        }

        if region.hx - region.lx < THIN_EDGE {
            self.axes.scan(Axis::X, region, out);
            return;
        }
        if region.hy - region.ly < THIN_EDGE {
            self.axes.scan(Axis::Y, region, out);
            return;
        }

        let frac_x = self.dist.contained_fraction(Axis::X, region.lx, region.hx);
        let frac_y = self.dist.contained_fraction(Axis::Y, region.ly, region.hy);
        let (axis, frac) = if frac_x < frac_y {
            (Axis::X, frac_x)
        } else {
            (Axis::Y, frac_y)
        };

        // NaN from a degenerate axis (zero spread) casts to zero expected
        // hits, which lands on the scan: correct for a collapsed axis.
        let expected = (frac * self.len as f64) as usize;
        if expected <= self.params.linear_scan_threshold {
            self.axes.scan(axis, region, out);
        } else {
            self.partitions.query(region, out);
        }
    }
}

impl Debug for SearchIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("len", &self.len)
            .field("bounds", &self.bounds)
            .field("partitions", &self.partitions.partitions())
            .field("partition_size", &self.params.partition_size)
            .field("linear_scan_threshold", &self.params.linear_scan_threshold)
            .finish_non_exhaustive()
    }
}
