//! Topological sorting of callback-defined graphs.

use core::hash::Hash;
use core::marker::PhantomData;

use crate::edge::IntoOutEdge;
use crate::error::Error;
use crate::gear::collections::VertexIdSet;
use crate::gear::{Gear, HashGear};
use crate::paths::Paths;
use crate::traversal::{make_paths, CalcLimit, Strategy};
use crate::vertex_as_id;

/// The search state of a [`TopologicalSort`].
pub struct TopologicalSortState<V, L, G: Gear<V>, TI> {
    /// Search depth the last reported vertex was found at.
    pub depth: usize,
    /// Ids of the vertices visited so far, including the start vertices.
    pub visited: G::VisitedSet,
    /// The paths built so far, if `build_paths` was requested.
    pub paths: Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>,
    /// When the sort failed with [`Error::CycleDetected`]: a path from a
    /// start vertex into the detected cycle, ending with the vertex that
    /// closed it.
    pub cycle_from_start: Vec<V>,
}

struct TopoRun<V> {
    stack: Vec<V>,
    /// Tree engine only: `true` marks a vertex that is expanded and waits
    /// to be left.
    leave_markers: Vec<bool>,
    done: bool,
}

/// Topological sort: reports vertices in an order such that for every
/// followed edge `u -> v` ("u depends on v"), `v` is reported before `u`.
///
/// Vertices are expanded depth-first and reported when they are left while
/// backtracking. If an expansion finds an edge back into the current
/// trace, the reachable subgraph has a cycle: the traversal fails with
/// [`Error::CycleDetected`] and surfaces a path from a start vertex into
/// the cycle in `state.cycle_from_start`. With
/// [`is_tree`](TopologicalSort::is_tree), a leaner engine without cycle
/// detection is used.
///
/// One unit of the calculation limit is consumed per expanded vertex.
///
/// # Example
/// ```
/// use graphless::TopologicalSort;
///
/// // "drink" depends on "brew", "brew" on "water" and "grind"
/// let mut t = TopologicalSort::new(|v: &&str, _| match *v {
///     "drink" => vec!["brew"],
///     "brew" => vec!["water", "grind"],
///     _ => vec![],
/// });
/// let order: Result<Vec<_>, _> = t.start_from("drink").collect();
/// assert_eq!(order.unwrap(), vec!["grind", "water", "brew", "drink"]);
/// ```
pub struct TopologicalSort<V, L, G: Gear<V>, TI, F, I: IntoIterator> {
    next: F,
    vertex_to_id: TI,
    gear: G,
    is_tree: bool,
    build_paths: bool,
    limit: Option<usize>,
    seed_visited: Option<G::VisitedSet>,
    calc: CalcLimit,
    /// Ids of the vertices on the current trace (cycle detection).
    trace_set: Option<G::VisitedSet>,
    /// The public search state, also passed to the successor function.
    pub state: TopologicalSortState<V, L, G, TI>,
    run: Option<TopoRun<V>>,
    _marker: PhantomData<(L, I)>,
}

impl<V, L, F, I> TopologicalSort<V, L, HashGear<V>, fn(&V) -> V, F, I>
where
    V: Clone + Eq + Hash,
    L: Clone,
    F: FnMut(&V, &TopologicalSortState<V, L, HashGear<V>, fn(&V) -> V>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal over the graph defined by `next`, with vertices serving
    /// as their own ids and hash-based bookkeeping.
    pub fn new(next: F) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next)
    }
}

impl<V, L, G, TI, F, I> TopologicalSort<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &TopologicalSortState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next: F) -> Self {
        let state = TopologicalSortState {
            depth: 0,
            visited: gear.visited_set(),
            paths: None,
            cycle_from_start: Vec::new(),
        };
        TopologicalSort {
            next,
            vertex_to_id,
            gear,
            is_tree: false,
            build_paths: false,
            limit: None,
            seed_visited: None,
            calc: CalcLimit(None),
            trace_set: None,
            state,
            run: None,
            _marker: PhantomData,
        }
    }

    /// Promise that each vertex is reachable only once. Uses a leaner
    /// engine without visited bookkeeping and without cycle detection.
    pub fn is_tree(&mut self, yes: bool) -> &mut Self {
        self.is_tree = yes;
        self
    }

    /// Build a path to each visited vertex, available in `state.paths`.
    pub fn build_paths(&mut self, yes: bool) -> &mut Self {
        self.build_paths = yes;
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

    /// Start the sort at a single vertex.
    pub fn start_from(&mut self, start: V) -> &mut Self {
        self.start_from_vertices([start])
    }

    /// Start the sort at several vertices at once.
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
        self.state = TopologicalSortState {
            depth: 0,
            visited,
            paths,
            cycle_from_start: Vec::new(),
        };
        self.calc = CalcLimit(self.limit);
        self.trace_set = Some(self.gear.visited_set());
        let leave_markers = if self.is_tree {
            vec![false; starts.len()]
        } else {
            Vec::new()
        };
        self.run = Some(TopoRun {
            stack: starts,
            leave_markers,
            done: false,
        });
        self
    }

    fn expand_tree(&mut self, run: &mut TopoRun<V>) -> Result<(), Error> {
        self.calc.step()?;
        let vertex = match run.stack.last() {
            Some(v) => v.clone(),
            None => return Ok(()),
        };
        let edges = (self.next)(&vertex, &self.state).into_iter();
        for item in edges {
            let (neighbor, label) = item.into_out_edge();
            if let Some(p) = self.state.paths.as_mut() {
                let n_id = (self.vertex_to_id)(&neighbor);
                p.record_edge(&vertex, n_id, label);
            }
            run.stack.push(neighbor);
            run.leave_markers.push(false);
        }
        self.state.depth += 1;
        Ok(())
    }

    fn step_tree(&mut self, run: &mut TopoRun<V>) -> Option<Result<V, Error>> {
        loop {
            if run.stack.is_empty() {
                return None;
            }
            if run.leave_markers.last() == Some(&true) {
                run.leave_markers.pop();
                let vertex = run.stack.pop()?;
                self.state.depth -= 1;
                return Some(Ok(vertex));
            }
            // expand the vertex, but keep it on the stack to leave later
            if let Some(marker) = run.leave_markers.last_mut() {
                *marker = true;
            }
            if let Err(e) = self.expand_tree(run) {
                run.done = true;
                return Some(Err(e));
            }
        }
    }

    fn step_general(&mut self, run: &mut TopoRun<V>) -> Option<Result<V, Error>> {
        loop {
            let vertex = match run.stack.last() {
                Some(v) => v.clone(),
                None => return None,
            };
            let v_id = (self.vertex_to_id)(&vertex);
            let trace_set = self.trace_set.as_mut()?;

            if trace_set.is_visited(&v_id) {
                // back at an expanded vertex: leave and report it
                self.state.depth -= 1;
                run.stack.pop();
                trace_set.unvisit(&v_id);
                return Some(Ok(vertex));
            }
            if self.state.depth > 0 {
                // skip vertices that were already sorted elsewhere
                if !self.state.visited.visit(v_id.clone()) {
                    run.stack.pop();
                    continue;
                }
            }
            trace_set.visit(v_id);

            if let Err(e) = self.calc.step() {
                run.done = true;
                return Some(Err(e));
            }
            let edges = (self.next)(&vertex, &self.state).into_iter();
            for item in edges {
                let (neighbor, label) = item.into_out_edge();
                let n_id = (self.vertex_to_id)(&neighbor);
                let trace_set = match self.trace_set.as_ref() {
                    Some(t) => t,
                    None => return None,
                };
                if self.state.visited.is_visited(&n_id) {
                    if trace_set.is_visited(&n_id) {
                        // a dependency back into the trace: the graph has
                        // a cycle; surface the path leading into it
                        let mut trace: Vec<V> = run
                            .stack
                            .iter()
                            .filter(|v| trace_set.is_visited(&(self.vertex_to_id)(v)))
                            .cloned()
                            .collect();
                        trace.push(neighbor);
                        self.state.cycle_from_start = trace;
                        run.done = true;
                        return Some(Err(Error::CycleDetected));
                    }
                    continue;
                }
                if let Some(p) = self.state.paths.as_mut() {
                    p.record_edge(&vertex, n_id, label);
                }
                run.stack.push(neighbor);
            }
            self.state.depth += 1;
        }
    }
}

impl<V, L, G, TI, F, I> Strategy for TopologicalSort<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &TopologicalSortState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Vertex = V;
    type VertexId = G::VertexId;

    fn id_of(&self, vertex: &V) -> G::VertexId {
        (self.vertex_to_id)(vertex)
    }

    fn next_reported(&mut self) -> Option<Result<V, Error>> {
        let mut run = match self.run.take() {
            Some(run) => run,
            None => panic!("traversal not started, iteration not possible"),
        };
        let out = if run.done {
            None
        } else if self.is_tree {
            self.step_tree(&mut run)
        } else {
            self.step_general(&mut run)
        };
        self.run = Some(run);
        out
    }
}

impl<V, L, G, TI, F, I> Iterator for TopologicalSort<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &TopologicalSortState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reported()
    }
}
