//! **graphless** is a library for analysing directed graphs that are not
//! stored anywhere: the caller describes a graph by a *successor function*
//! that, given a vertex, yields its outgoing edges. Graphs may be
//! computed on the fly and may be infinite.
//!
//! The library provides a family of lazy traversal strategies over such
//! graphs ([`Bfs`], [`Dfs`], [`NeighborsThenDepth`], [`TopologicalSort`],
//! [`Dijkstra`], [`AStar`], [`MinSpanningTree`],
//! [`InfBranchingDijkstra`]), plus the bidirectional searches
//! [`BidirectionalBfs`] and [`BidirectionalDijkstra`]. A strategy is an
//! iterator: pulling the next vertex advances the search by exactly one
//! reported vertex, and between pulls the strategy's public `state` field
//! holds the search state (depth, distance, paths, visited set, and so
//! on) belonging to the last report. The successor function receives the same
//! state as its second argument.
//!
//! ```
//! use graphless::Dijkstra;
//!
//! // the graph is just a function
//! let mut traversal = Dijkstra::new(|&i: &u64, _| [(i + 3, 2u64), (i + 7, 1)]);
//! let six = traversal
//!     .start_from(0)
//!     .find(|v| *v == Ok(6))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(six, 6);
//! assert_eq!(traversal.state.distance, 4);
//! ```
//!
//! Bookkeeping containers are chosen by a pluggable [`gear`](crate::gear):
//! the default [`HashGear`](crate::gear::HashGear) keys everything by
//! hashable vertex ids, while [`IntIdGear`](crate::gear::IntIdGear) packs
//! the bookkeeping of dense integer ids into growable sequences and a
//! bit-packed visited set. The `with_gear` constructor of each strategy
//! additionally takes a `vertex_to_id` function, so vertices themselves
//! need not be hashable.

pub mod edge;
pub mod error;
pub mod gear;
pub mod paths;
mod scored;
pub mod traversal;
pub mod weight;

pub use crate::edge::{Edge, IntoOutEdge, IntoWeightedOutEdge};
pub use crate::error::Error;
pub use crate::paths::Paths;
pub use crate::traversal::astar::{AStar, AStarState};
pub use crate::traversal::bidirectional::{
    BidirectionalBfs, BidirectionalBfsState, BidirectionalDijkstra, BidirectionalDijkstraState,
};
pub use crate::traversal::breadth_first::{Bfs, BfsState};
pub use crate::traversal::depth_first::{Dfs, DfsEvent, DfsMode, DfsState};
pub use crate::traversal::dijkstra::{Dijkstra, DijkstraState};
pub use crate::traversal::inf_branching::{InfBranchingDijkstra, InfBranchingDijkstraState};
pub use crate::traversal::min_spanning_tree::{MinSpanningTree, MinSpanningTreeState};
pub use crate::traversal::neighbors_then_depth::{NeighborsThenDepth, NeighborsThenDepthState};
pub use crate::traversal::topological_sort::{TopologicalSort, TopologicalSortState};
pub use crate::traversal::{GoForVerticesIn, Strategy};
pub use crate::weight::Weight;

/// The identity vertex-to-id function used by the plain strategy
/// constructors: each vertex is its own id.
pub fn vertex_as_id<V: Clone>(vertex: &V) -> V {
    vertex.clone()
}
