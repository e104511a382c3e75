// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk-loaded R-tree over one rank band, with rank-pruned range queries.
//!
//! The tree is packed top-down by recursive median partitioning along the
//! longest axis of each node's bounding rectangle, then post-processed so
//! that every internal node's children are ordered by ascending min-rank and
//! every leaf's points by ascending rank. That ordering turns rank pruning
//! into an early break: once a child's min-rank reaches the collector's
//! ceiling, no later sibling can contribute either.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::collector::TopK;
use crate::types::{Axis, RankedPoint, Rect};

/// Fan-out parameters for tree construction.
#[derive(Copy, Clone, Debug)]
pub struct TreeParams {
    /// Maximum children of an internal node, and maximum points in a leaf.
    pub max_elements: usize,
    /// Minimum children of an internal node (one node per level may fall
    /// short). Derived as `max(1, max_elements * 4 / 10)`.
    pub min_elements: usize,
}

impl TreeParams {
    /// Parameters with the standard minimum fill of 40%.
    pub fn new(max_elements: usize) -> Self {
        debug_assert!(max_elements >= 2, "fan-out below 2 cannot branch");
        Self {
            max_elements,
            min_elements: 1.max(max_elements * 4 / 10),
        }
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new(16)
    }
}

struct Node {
    mbr: Rect,
    min_rank: i32,
    kind: NodeKind,
}

enum NodeKind {
    Internal(Vec<Node>),
    Leaf(Vec<RankedPoint>),
}

impl Node {
    fn new_internal(child_capacity: usize) -> Self {
        Self {
            mbr: Rect::EMPTY,
            min_rank: i32::MAX,
            kind: NodeKind::Internal(Vec::with_capacity(child_capacity)),
        }
    }

    fn new_leaf(points: &[RankedPoint]) -> Self {
        let mut mbr = Rect::EMPTY;
        let mut min_rank = i32::MAX;
        for p in points {
            mbr.extend_point(p);
            if min_rank > p.rank {
                min_rank = p.rank;
            }
        }
        Self {
            mbr,
            min_rank,
            kind: NodeKind::Leaf(points.to_vec()),
        }
    }

    fn push_child(&mut self, child: Node) {
        self.mbr.extend_rect(&child.mbr);
        if self.min_rank > child.min_rank {
            self.min_rank = child.min_rank;
        }
        match &mut self.kind {
            NodeKind::Internal(children) => children.push(child),
            NodeKind::Leaf(_) => unreachable!("leaf cannot take children"),
        }
    }
}

/// Per-level packing capacities: how many elements one subtree at the
/// current level may hold, and the minimum it must receive.
#[derive(Copy, Clone)]
struct SubtreeCounts {
    max_count: usize,
    min_count: usize,
}

impl SubtreeCounts {
    /// Capacities for the root's immediate children, plus the tree height.
    fn for_len(len: usize, params: &TreeParams) -> (Self, usize) {
        let mut counts = SubtreeCounts {
            max_count: 1,
            min_count: 1,
        };
        let mut height = 0;
        let mut smax = params.max_elements;
        while smax < len {
            counts.max_count = smax;
            smax *= params.max_elements;
            height += 1;
        }
        counts.min_count = params.min_elements * (counts.max_count / params.max_elements);
        (counts, height)
    }

    fn next_level(self, params: &TreeParams) -> Self {
        Self {
            max_count: self.max_count / params.max_elements,
            min_count: self.min_count / params.max_elements,
        }
    }
}

/// Bulk-loaded R-tree over a contiguous rank band.
///
/// Built once from a mutable slice (the slice is permuted by the median
/// partitioning); immutable afterwards. Queries are `&self` and carry all
/// their state in the caller's collector and a local stack, so concurrent
/// queries need no synchronization.
pub struct RankTree {
    root: Node,
    len: usize,
    height: usize,
    fanout: usize,
}

impl RankTree {
    /// Pack a tree over `points`. The slice is reordered during the build;
    /// the tree keeps its own copies in the leaves.
    pub fn build(points: &mut [RankedPoint], params: &TreeParams) -> Self {
        let len = points.len();
        if len == 0 {
            return Self {
                root: Node::new_leaf(&[]),
                len: 0,
                height: 0,
                fanout: params.max_elements,
            };
        }

        let mut outer_mbr = Rect::EMPTY;
        for p in points.iter() {
            outer_mbr.extend_point(p);
        }

        let (counts, height) = SubtreeCounts::for_len(len, params);
        let mut root = generate_subtree(points, outer_mbr, counts, params);
        sort_by_rank(&mut root);

        Self {
            root,
            len,
            height,
            fanout: params.max_elements,
        }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest rank in the tree, `i32::MAX` when empty.
    pub fn min_rank(&self) -> i32 {
        self.root.min_rank
    }

    /// Tight bounds of all points.
    pub fn bounds(&self) -> Rect {
        self.root.mbr
    }

    /// Collect into `out` the points inside `region`, pruned by the
    /// collector's current max-rank ceiling.
    ///
    /// The walk is iterative with an explicit stack; recursive descent over
    /// a multi-million point index both overflows practical stacks and
    /// measures slower on the hot path.
    pub fn query(&self, region: &Rect, out: &mut TopK) {
        if self.len == 0 || !region.intersects(&self.root.mbr) {
            return;
        }

        let mut stack: Vec<&Node> = Vec::with_capacity((self.height + 1) * self.fanout);
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            let children = match &node.kind {
                NodeKind::Internal(children) => children,
                NodeKind::Leaf(points) => {
                    // Only the root can be popped as a leaf; child leaves
                    // are scanned inline below.
                    scan_leaf(points, region, out);
                    continue;
                }
            };

            for child in children {
                if child.min_rank >= out.max_rank() {
                    break;
                }
                if !region.intersects(&child.mbr) {
                    continue;
                }
                if region.contains_rect(&child.mbr) {
                    drain(child, out, &mut stack);
                } else {
                    match &child.kind {
                        NodeKind::Leaf(points) => scan_leaf(points, region, out),
                        NodeKind::Internal(_) => stack.push(child),
                    }
                }
            }
        }
    }
}

impl Debug for RankTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RankTree")
            .field("len", &self.len)
            .field("height", &self.height)
            .field("fanout", &self.fanout)
            .field("min_rank", &self.root.min_rank)
            .finish_non_exhaustive()
    }
}

/// Leaf scan for a partially covered leaf: points are rank-ascending, so the
/// first point at or above the ceiling ends the leaf.
#[inline]
fn scan_leaf(points: &[RankedPoint], region: &Rect, out: &mut TopK) {
    for p in points {
        if p.rank >= out.max_rank() {
            break;
        }
        if region.contains_point(p.x, p.y) {
            out.try_add(*p);
        }
    }
}

/// Drain walk for a subtree whose bounds lie entirely inside the query
/// region: no geometric tests, only the rank break. Reuses the caller's
/// stack above a watermark.
fn drain<'t>(top: &'t Node, out: &mut TopK, stack: &mut Vec<&'t Node>) {
    let mark = stack.len();
    stack.push(top);
    while stack.len() > mark {
        let Some(node) = stack.pop() else {
            break;
        };
        match &node.kind {
            NodeKind::Leaf(points) => {
                for p in points {
                    if p.rank >= out.max_rank() {
                        break;
                    }
                    out.try_add(*p);
                }
            }
            NodeKind::Internal(children) => {
                for child in children {
                    if child.min_rank >= out.max_rank() {
                        break;
                    }
                    stack.push(child);
                }
            }
        }
    }
}

/// Build the subtree for `points` within the per-level capacities `counts`.
/// `super_mbr` is the region the points were partitioned out of; it guides
/// axis selection only, node bounds are computed tight from below.
fn generate_subtree(
    points: &mut [RankedPoint],
    super_mbr: Rect,
    counts: SubtreeCounts,
    params: &TreeParams,
) -> Node {
    if counts.max_count <= 1 {
        debug_assert!(points.len() <= params.max_elements);
        return Node::new_leaf(points);
    }

    let next_counts = counts.next_level(params);
    let mut node = Node::new_internal(nodes_count(points.len(), counts));
    partition_subtree(points, super_mbr, counts, next_counts, &mut node, params);
    node
}

/// Recursively halve `points` by median until a group fits one child, then
/// descend a level.
fn partition_subtree(
    points: &mut [RankedPoint],
    super_mbr: Rect,
    counts: SubtreeCounts,
    next_counts: SubtreeCounts,
    parent: &mut Node,
    params: &TreeParams,
) {
    debug_assert!(!points.is_empty());
    debug_assert!(counts.min_count <= points.len());

    if points.len() <= counts.max_count {
        let child = generate_subtree(points, super_mbr, next_counts, params);
        parent.push_child(child);
        return;
    }

    let median = median_count(points.len(), counts);
    let axis = super_mbr.longest_axis();

    points.select_nth_unstable_by(median, |a, b| {
        axis.coord(a)
            .partial_cmp(&axis.coord(b))
            .unwrap_or(Ordering::Equal)
    });

    // Both halves share the split plane.
    let split = axis.coord(&points[median]);
    let mut lo_mbr = super_mbr;
    let mut hi_mbr = super_mbr;
    match axis {
        Axis::X => {
            lo_mbr.hx = split;
            hi_mbr.lx = split;
        }
        Axis::Y => {
            lo_mbr.hy = split;
            hi_mbr.ly = split;
        }
    }

    let (lo, hi) = points.split_at_mut(median);
    partition_subtree(lo, lo_mbr, counts, next_counts, parent, params);
    partition_subtree(hi, hi_mbr, counts, next_counts, parent, params);
}

/// How many children `count` elements produce at a level where each child
/// holds at most `max_count` and, except possibly the last, at least
/// `min_count`. Used to size child vectors.
fn nodes_count(count: usize, counts: SubtreeCounts) -> usize {
    let mut n = count / counts.max_count;
    let mut r = count % counts.max_count;

    if 0 < r && r < counts.min_count {
        let rem = count - counts.min_count;
        n = rem / counts.max_count;
        r = rem % counts.max_count;
        n += 1;
    }

    if 0 < r {
        n += 1;
    }

    n
}

/// The split position: a multiple of the subtree capacity chosen so both
/// halves can satisfy the minimum fill, stealing a short tail's minimum from
/// the right half when necessary. An undersized terminal node prunes badly,
/// so the tail never falls below `min_count`.
fn median_count(count: usize, counts: SubtreeCounts) -> usize {
    let n = count / counts.max_count;
    let r = count % counts.max_count;
    let mut median = (n / 2) * counts.max_count;

    if r != 0 {
        if counts.min_count <= r {
            median = ((n + 1) / 2) * counts.max_count;
        } else {
            let rem = count - counts.min_count;
            let n = rem / counts.max_count;
            let r = rem % counts.max_count;
            if r == 0 {
                median = ((n + 1) / 2) * counts.max_count;
            } else if n == 0 {
                median = r;
            } else {
                median = ((n + 2) / 2) * counts.max_count;
            }
        }
    }

    median
}

/// Post-build ordering pass: children by ascending min-rank, leaf points by
/// ascending rank. This is what makes the query's early break sound.
fn sort_by_rank(node: &mut Node) {
    match &mut node.kind {
        NodeKind::Internal(children) => {
            children.sort_unstable_by_key(|n| n.min_rank);
            for child in children {
                sort_by_rank(child);
            }
        }
        NodeKind::Leaf(points) => points.sort_unstable_by_key(|p| p.rank),
    }
}
