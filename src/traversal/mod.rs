//! The traversal strategies and their shared machinery.
//!
//! Every strategy follows the same lifecycle: construct it with a successor
//! function (and, for the `with_gear` form, an id function and a gear),
//! configure options, call `start_from` / `start_from_vertices`, then pull
//! reported vertices from it: each strategy is an iterator over
//! `Result<V, Error>`. Between two pulls, the strategy's public `state`
//! field holds the search state belonging to the last reported vertex, and
//! the successor function receives a reference to the same state.

pub mod astar;
pub mod bidirectional;
pub mod breadth_first;
pub mod depth_first;
pub mod dijkstra;
pub mod inf_branching;
pub mod min_spanning_tree;
pub mod neighbors_then_depth;
pub mod topological_sort;

use crate::error::Error;
use crate::gear::Gear;
use crate::paths::Paths;

/// Construct the path container of a run, or `None` when no paths are to
/// be built. `labeled` reflects whether the successor function yields
/// labeled edges.
pub(crate) fn make_paths<V, L, G, TI>(
    build_paths: bool,
    labeled: bool,
    gear: &G,
    vertex_to_id: &TI,
) -> Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
{
    if !build_paths {
        return None;
    }
    Some(if labeled {
        Paths::labeled(
            gear.predecessor_map(),
            gear.label_map::<L>(),
            vertex_to_id.clone(),
        )
    } else {
        Paths::unlabeled(gear.predecessor_map(), vertex_to_id.clone())
    })
}

/// The operations every started traversal strategy offers on top of plain
/// iteration.
pub trait Strategy {
    /// The vertex type reported by this strategy.
    type Vertex;

    /// The id type the strategy keys its bookkeeping by.
    type VertexId: Clone + Eq;

    /// Advance to the next reported vertex.
    ///
    /// This is the one fundamental stepping operation; the `Iterator`
    /// implementations delegate to it.
    fn next_reported(&mut self) -> Option<Result<Self::Vertex, Error>>;

    /// The id of `vertex` under this strategy's id function.
    fn id_of(&self, vertex: &Self::Vertex) -> Self::VertexId;

    /// Consume reported vertices until `vertex` is reported, and return it.
    ///
    /// Fails with [`Error::VertexNotFound`] if the traversal ends first.
    /// The strategy's state then describes the moment `vertex` was
    /// reported.
    fn go_to(&mut self, vertex: &Self::Vertex) -> Result<Self::Vertex, Error> {
        let target = self.id_of(vertex);
        while let Some(reported) = self.next_reported() {
            let v = reported?;
            if self.id_of(&v) == target {
                return Ok(v);
            }
        }
        Err(Error::VertexNotFound)
    }

    /// Filter the stream down to the given vertices, ending as soon as all
    /// of them have been reported.
    ///
    /// If the traversal ends while some of the vertices are still missing,
    /// the returned iterator yields [`Error::VertexNotFound`] as its last
    /// item.
    fn go_for_vertices_in(&mut self, vertices: &[Self::Vertex]) -> GoForVerticesIn<'_, Self>
    where
        Self: Sized,
    {
        let mut targets: Vec<Self::VertexId> = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            let id = self.id_of(vertex);
            if !targets.contains(&id) {
                targets.push(id);
            }
        }
        GoForVerticesIn {
            strategy: self,
            targets,
        }
    }
}

/// Iterator returned by [`Strategy::go_for_vertices_in`].
pub struct GoForVerticesIn<'a, S: Strategy> {
    strategy: &'a mut S,
    targets: Vec<S::VertexId>,
}

impl<S: Strategy> Iterator for GoForVerticesIn<'_, S> {
    type Item = Result<S::Vertex, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.targets.is_empty() {
            match self.strategy.next_reported() {
                Some(Ok(v)) => {
                    let id = self.strategy.id_of(&v);
                    if let Some(pos) = self.targets.iter().position(|t| *t == id) {
                        self.targets.swap_remove(pos);
                        return Some(Ok(v));
                    }
                }
                Some(Err(e)) => {
                    self.targets.clear();
                    return Some(Err(e));
                }
                None => {
                    self.targets.clear();
                    return Some(Err(Error::VertexNotFound));
                }
            }
        }
        None
    }
}

/// Countdown for the `calculation_limit` option. One step is taken per
/// vertex read from the graph; the unit is documented per strategy.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CalcLimit(pub Option<usize>);

impl CalcLimit {
    #[inline]
    pub fn step(&mut self) -> Result<(), Error> {
        match &mut self.0 {
            None => Ok(()),
            Some(0) => Err(Error::CalculationLimitExceeded),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}
