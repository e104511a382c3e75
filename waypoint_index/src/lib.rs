// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint Index: rank-aware top-K search over a static 2D point set.
//!
//! Waypoint Index answers one question fast: *given an axis-aligned
//! rectangle, which K points inside it have the lowest rank?* It is built
//! once from an immutable input of up to ~10 million uniquely-ranked points
//! and then queried many times; build cost is amortized, query latency is
//! the target.
//!
//! - Build once with [`SearchIndex::build`]; query with
//!   [`SearchIndex::search`] or a reusable [`TopK`] collector via
//!   [`SearchIndex::search_into`].
//! - Results are always sorted by ascending rank (lower rank = more
//!   important); ranks are unique, so results are deterministic.
//! - Queries are `&self` and freely concurrent; all traversal state lives in
//!   the call.
//!
//! # How it works
//!
//! The rank-sorted input is split into fixed-size bands and each band is
//! packed into a bulk-loaded R-tree whose nodes carry a min-rank summary;
//! children are ordered by min-rank so pruning against the collector's
//! current worst rank is an early break, and bands are consulted in rank
//! order so a query stops as soon as K results exist. Rectangles estimated
//! (via per-axis normal statistics) to contain few points skip the trees
//! entirely in favor of a binary-searched walk of an axis-sorted array,
//! which also defeats pathologically thin slab rectangles.
//!
//! # Example
//!
//! ```rust
//! use waypoint_index::{RankedPoint, Rect, SearchIndex};
//!
//! let points = vec![
//!     RankedPoint { id: 0, rank: 0, x: 0.0, y: 0.0 },
//!     RankedPoint { id: 1, rank: 1, x: 10.0, y: 10.0 },
//!     RankedPoint { id: 2, rank: 2, x: 5.0, y: 5.0 },
//! ];
//! let index = SearchIndex::build(points);
//!
//! let hits = index.search(&Rect::new(-1.0, -1.0, 6.0, 6.0), 20);
//! let ranks: Vec<i32> = hits.iter().map(|p| p.rank).collect();
//! assert_eq!(ranks, [0, 2]);
//! ```
//!
//! # Choosing parameters
//!
//! [`IndexParams`] exposes the band size (smaller bands terminate more
//! queries after one tree, larger bands prune better within a tree), the
//! tree fan-out, and the estimated-hit threshold below which the linear
//! scan wins. The defaults are tuned for ~10M uniformly-ish distributed
//! points and K ≈ 20.
//!
//! A collector can be owned by the caller and reused across searches:
//!
//! ```rust
//! use waypoint_index::{IndexParams, RankedPoint, Rect, SearchIndex, TopK};
//!
//! let points: Vec<RankedPoint> = (0..10_000)
//!     .map(|i| RankedPoint { id: 0, rank: i, x: (i % 100) as f32, y: (i / 100) as f32 })
//!     .collect();
//! let params = IndexParams { partition_size: 2_048, ..IndexParams::default() };
//! let index = SearchIndex::build_with(points, params);
//!
//! let mut best = TopK::new(5);
//! index.search_into(&Rect::new(0.0, 0.0, 9.0, 9.0), &mut best);
//! let hits = best.drain_sorted();
//! assert_eq!(hits.len(), 5);
//! assert!(hits.windows(2).all(|w| w[0].rank < w[1].rank));
//! ```
//!
//! # Float semantics
//!
//! Coordinates are `f32`. Points with non-finite coordinates or a magnitude
//! above 1e9 are dropped at build time, so query paths assume NaN-free
//! data. Rectangles are closed on all four sides; an inverted rectangle
//! (`lx > hx` or `ly > hy`) reads as empty.

#![no_std]

extern crate alloc;

pub mod collector;
pub mod index;
pub mod partition;
pub mod rtree;
pub mod scan;
pub mod stats;
pub mod types;

pub use collector::TopK;
pub use index::{IndexParams, SearchIndex};
pub use partition::PartitionedIndex;
pub use rtree::{RankTree, TreeParams};
pub use scan::{SortedAxes, scan_all};
pub use stats::{Accumulator, Distribution};
pub use types::{Axis, RankedPoint, Rect};
