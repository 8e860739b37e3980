//! A depth-oriented traversal that reports all successors of a vertex
//! before descending.

use core::hash::Hash;
use core::marker::PhantomData;

use crate::edge::IntoOutEdge;
use crate::error::Error;
use crate::gear::collections::VertexIdSet;
use crate::gear::{Gear, HashGear};
use crate::paths::Paths;
use crate::traversal::{make_paths, CalcLimit, Strategy};
use crate::vertex_as_id;

/// The search state of a [`NeighborsThenDepth`] traversal.
pub struct NeighborsThenDepthState<V, L, G: Gear<V>, TI> {
    /// Depth of the last reported vertex, if depth computation was
    /// requested.
    pub depth: Option<usize>,
    /// Ids of the vertices seen so far, including the start vertices.
    pub visited: G::VisitedSet,
    /// The paths built so far, if `build_paths` was requested.
    pub paths: Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>,
}

struct NtdRun<V, EI> {
    to_expand: Vec<V>,
    leave_markers: Vec<bool>,
    depth: isize,
    current: Option<(V, EI)>,
    done: bool,
}

/// A variant of Depth First Search that reports all successors of the
/// current vertex, in the order the successor function yields them, and
/// only then goes deeper.
///
/// A vertex is reported (and counts as visited) when it is first seen,
/// not when it is expanded, so the reported order is not DFS pre-order.
/// Start vertices count as visited and are not reported. Depth tracking is
/// off by default; request it with
/// [`compute_depth`](NeighborsThenDepth::compute_depth).
///
/// One unit of the calculation limit is consumed per expanded vertex.
pub struct NeighborsThenDepth<V, L, G: Gear<V>, TI, F, I: IntoIterator> {
    next: F,
    vertex_to_id: TI,
    gear: G,
    is_tree: bool,
    build_paths: bool,
    compute_depth: bool,
    limit: Option<usize>,
    seed_visited: Option<G::VisitedSet>,
    calc: CalcLimit,
    /// The public search state, also passed to the successor function.
    pub state: NeighborsThenDepthState<V, L, G, TI>,
    run: Option<NtdRun<V, I::IntoIter>>,
    _marker: PhantomData<L>,
}

impl<V, L, F, I> NeighborsThenDepth<V, L, HashGear<V>, fn(&V) -> V, F, I>
where
    V: Clone + Eq + Hash,
    L: Clone,
    F: FnMut(&V, &NeighborsThenDepthState<V, L, HashGear<V>, fn(&V) -> V>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal over the graph defined by `next`, with vertices serving
    /// as their own ids and hash-based bookkeeping.
    pub fn new(next: F) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next)
    }
}

impl<V, L, G, TI, F, I> NeighborsThenDepth<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &NeighborsThenDepthState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next: F) -> Self {
        let state = NeighborsThenDepthState {
            depth: None,
            visited: gear.visited_set(),
            paths: None,
        };
        NeighborsThenDepth {
            next,
            vertex_to_id,
            gear,
            is_tree: false,
            build_paths: false,
            compute_depth: false,
            limit: None,
            seed_visited: None,
            calc: CalcLimit(None),
            state,
            run: None,
            _marker: PhantomData,
        }
    }

    /// Promise that each vertex is reachable only once. The visited set is
    /// then neither maintained nor consulted.
    pub fn is_tree(&mut self, yes: bool) -> &mut Self {
        self.is_tree = yes;
        self
    }

    /// Build a path to each reported vertex, available in `state.paths`.
    pub fn build_paths(&mut self, yes: bool) -> &mut Self {
        self.build_paths = yes;
        self
    }

    /// Maintain `state.depth` during the traversal.
    pub fn compute_depth(&mut self, yes: bool) -> &mut Self {
        self.compute_depth = yes;
        self
    }

    /// Fail after this many vertices have been expanded.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Use `visited` as the visited set of the next run.
    pub fn already_visited(&mut self, visited: G::VisitedSet) -> &mut Self {
        self.seed_visited = Some(visited);
        self
    }

    /// Start the traversal at a single vertex.
    pub fn start_from(&mut self, start: V) -> &mut Self {
        self.start_from_vertices([start])
    }

    /// Start the traversal at several vertices at once.
    pub fn start_from_vertices<S: IntoIterator<Item = V>>(&mut self, starts: S) -> &mut Self {
        let starts: Vec<V> = starts.into_iter().collect();
        let mut visited = self
            .seed_visited
            .take()
            .unwrap_or_else(|| self.gear.visited_set());
        if !self.is_tree {
            visited.visit_all(starts.iter().map(|v| (self.vertex_to_id)(v)));
        }
        let mut paths = make_paths::<V, L, G, TI>(
            self.build_paths,
            <I::Item as IntoOutEdge<V, L>>::LABELED,
            &self.gear,
            &self.vertex_to_id,
        );
        if let Some(p) = paths.as_mut() {
            for v in &starts {
                p.record_root(v);
            }
        }
        self.state = NeighborsThenDepthState {
            depth: if self.compute_depth { Some(0) } else { None },
            visited,
            paths,
        };
        self.calc = CalcLimit(self.limit);
        let leave_markers = if self.compute_depth {
            vec![false; starts.len()]
        } else {
            Vec::new()
        };
        self.run = Some(NtdRun {
            to_expand: starts,
            leave_markers,
            depth: -1,
            current: None,
            done: false,
        });
        self
    }
}

impl<V, L, G, TI, F, I> Strategy for NeighborsThenDepth<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &NeighborsThenDepthState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Vertex = V;
    type VertexId = G::VertexId;

    fn id_of(&self, vertex: &V) -> G::VertexId {
        (self.vertex_to_id)(vertex)
    }

    fn next_reported(&mut self) -> Option<Result<V, Error>> {
        let run = match self.run.as_mut() {
            Some(run) => run,
            None => panic!("traversal not started, iteration not possible"),
        };
        if run.done {
            return None;
        }
        loop {
            if let Some((vertex, edges)) = run.current.as_mut() {
                for item in edges.by_ref() {
                    let (neighbor, label) = item.into_out_edge();
                    if !self.is_tree || self.state.paths.is_some() {
                        let n_id = (self.vertex_to_id)(&neighbor);
                        if !self.is_tree && !self.state.visited.visit(n_id.clone()) {
                            continue;
                        }
                        if let Some(p) = self.state.paths.as_mut() {
                            p.record_edge(vertex, n_id, label);
                        }
                    }
                    run.to_expand.push(neighbor.clone());
                    if self.compute_depth {
                        run.leave_markers.push(false);
                        self.state.depth = Some((run.depth + 1) as usize);
                    }
                    return Some(Ok(neighbor));
                }
                run.current = None;
            }

            let vertex = match run.to_expand.pop() {
                Some(v) => v,
                None => return None,
            };
            if self.compute_depth {
                run.depth += 1;
                while let Some(true) = run.leave_markers.pop() {
                    run.depth -= 1;
                }
                run.leave_markers.push(true);
                // the successor function sees the depth of the expanded
                // vertex
                self.state.depth = Some(run.depth.max(0) as usize);
            }
            if let Err(e) = self.calc.step() {
                run.done = true;
                return Some(Err(e));
            }
            let edges = (self.next)(&vertex, &self.state).into_iter();
            run.current = Some((vertex, edges));
        }
    }
}

impl<V, L, G, TI, F, I> Iterator for NeighborsThenDepth<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &NeighborsThenDepthState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reported()
    }
}
