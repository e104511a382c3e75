// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rank-banded forest: one bulk-loaded tree per contiguous rank band.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::collector::TopK;
use crate::rtree::{RankTree, TreeParams};
use crate::types::{RankedPoint, Rect};

/// An ordered sequence of [`RankTree`]s over contiguous bands of the
/// rank-sorted input.
///
/// Every point in band `i` outranks (is more important than) every point in
/// band `i + 1`, so a query can stop consulting further bands as soon as the
/// collector is full: nothing later can beat what is already held.
///
/// Band size trades build cost against pruning quality. Smaller bands build
/// faster per tree and raise the chance a query terminates after one band;
/// larger bands prune better inside each tree.
pub struct PartitionedIndex {
    trees: Vec<RankTree>,
    len: usize,
}

impl PartitionedIndex {
    /// Build one tree per band of `partition_size` points.
    ///
    /// `points` must already be sorted by ascending rank; the slice is
    /// permuted band-by-band during packing.
    pub fn build(points: &mut [RankedPoint], partition_size: usize, params: &TreeParams) -> Self {
        debug_assert!(partition_size > 0);
        debug_assert!(
            points.windows(2).all(|w| w[0].rank < w[1].rank),
            "input must be rank-sorted"
        );

        let len = points.len();
        let mut trees = Vec::with_capacity(len / partition_size + 1);
        for band in points.chunks_mut(partition_size) {
            trees.push(RankTree::build(band, params));
        }
        Self { trees, len }
    }

    /// Total number of points across all bands.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no points are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bands.
    pub fn partitions(&self) -> usize {
        self.trees.len()
    }

    /// Query bands in rank order, stopping once the collector fills.
    pub fn query(&self, region: &Rect, out: &mut TopK) {
        for tree in &self.trees {
            if out.is_full() {
                break;
            }
            tree.query(region, out);
        }
    }
}

impl Debug for PartitionedIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartitionedIndex")
            .field("len", &self.len)
            .field("partitions", &self.trees.len())
            .finish_non_exhaustive()
    }
}
