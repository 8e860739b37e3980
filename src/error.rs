//! Errors reported by traversal strategies and the path container.

use core::fmt;

/// An error surfaced by a traversal step, a cursor method or a path query.
///
/// Strategies yield `Result` items, so an error interrupts the stream at
/// the offending step and is never recovered internally.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The calculation limit given to the strategy has been reached.
    CalculationLimitExceeded,
    /// A computed distance reached the gear's infinity value.
    DistanceOverflow,
    /// The graph contains a cycle that the topological sort ran into.
    /// The cyclic path is available in
    /// [`state.cycle_from_start`](crate::TopologicalSortState::cycle_from_start).
    CycleDetected,
    /// The stream was exhausted without reporting the requested vertex,
    /// or a bidirectional search was exhausted without connecting the
    /// start and goal vertices.
    VertexNotFound,
    /// A path was queried for a vertex that has not been reached.
    NoPath,
    /// Labeled edges were requested from a path built over unlabeled edges.
    NoLabels,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CalculationLimitExceeded => {
                f.write_str("number of read vertices reached the calculation limit")
            }
            Error::DistanceOverflow => {
                f.write_str("computed distance reached the infinity value of the gear")
            }
            Error::CycleDetected => f.write_str("graph contains a cycle"),
            Error::VertexNotFound => f.write_str("vertex not found, graph exhausted"),
            Error::NoPath => f.write_str("no path for given vertex"),
            Error::NoLabels => f.write_str("labeled edges needed, but edges are unlabeled"),
        }
    }
}

impl std::error::Error for Error {}
