//! Minimum spanning tree computation over a successor function.

use core::hash::Hash;
use core::marker::PhantomData;
use std::collections::BinaryHeap;

use crate::edge::{Edge, IntoWeightedOutEdge};
use crate::error::Error;
use crate::gear::collections::VertexIdSet;
use crate::gear::{HashGear, WeightedGear};
use crate::paths::Paths;
use crate::scored::MinScored;
use crate::traversal::{make_paths, CalcLimit, Strategy};
use crate::vertex_as_id;
use crate::weight::Weight;

/// The search state of a [`MinSpanningTree`] traversal.
pub struct MinSpanningTreeState<V, W, L, G, TI>
where
    W: Weight,
    G: WeightedGear<V, W>,
{
    /// The tree edge whose head vertex was reported last.
    pub edge: Option<Edge<V, W, L>>,
    /// Paths within the spanning tree from a start vertex to each vertex
    /// reported so far, if `build_paths` was requested.
    pub paths: Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>,
}

struct MstRun<V, W, L> {
    heap: BinaryHeap<MinScored<W, (V, V, Option<L>)>>,
    pending: Option<V>,
    started: bool,
    charge_failed: bool,
    done: bool,
}

/// Minimum spanning tree by the algorithm of Jarnik, Prim and Dijkstra.
///
/// The graph is interpreted as undirected: the successor function must
/// yield each edge in both directions with the same weight. Starting from
/// the start vertices, the cheapest edge leading out of the already
/// connected set is chosen repeatedly; each chosen edge is exposed in
/// `state.edge` and its head vertex is reported. With several start
/// vertices the result is a spanning forest.
///
/// Ties between equal-weight edges prefer the edge found earlier.
///
/// One unit of the calculation limit is consumed per expanded vertex,
/// including the start vertices.
///
/// # Example
/// ```
/// use graphless::MinSpanningTree;
///
/// // undirected diamond: 0-1 (2), 0-2 (1), 1-3 (3), 2-3 (3)
/// let edges = [
///     vec![(1u32, 2u32), (2, 1)],
///     vec![(0, 2), (3, 3)],
///     vec![(0, 1), (3, 3)],
///     vec![(1, 3), (2, 3)],
/// ];
/// let mut t = MinSpanningTree::new(move |v: &u32, _| edges[*v as usize].clone());
/// let tree: Result<Vec<u32>, _> = t.start_from(0).collect();
/// assert_eq!(tree.unwrap(), vec![2, 1, 3]);
/// ```
pub struct MinSpanningTree<V, W, L, G, TI, F, I>
where
    W: Weight,
    G: WeightedGear<V, W>,
    I: IntoIterator,
{
    next: F,
    vertex_to_id: TI,
    gear: G,
    build_paths: bool,
    limit: Option<usize>,
    calc: CalcLimit,
    tie: u64,
    visited: G::VisitedSet,
    starts: Vec<V>,
    /// The public search state, also passed to the successor function.
    pub state: MinSpanningTreeState<V, W, L, G, TI>,
    run: Option<MstRun<V, W, L>>,
    _marker: PhantomData<I>,
}

impl<V, W, L, F, I> MinSpanningTree<V, W, L, HashGear<V, W>, fn(&V) -> V, F, I>
where
    V: Clone + Eq + Hash,
    W: Weight,
    L: Clone,
    F: FnMut(&V, &MinSpanningTreeState<V, W, L, HashGear<V, W>, fn(&V) -> V>) -> I,
    I: IntoIterator,
    I::Item: IntoWeightedOutEdge<V, W, L>,
{
    /// A traversal over the graph defined by `next`, with vertices serving
    /// as their own ids and hash-based bookkeeping.
    pub fn new(next: F) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next)
    }
}

impl<V, W, L, G, TI, F, I> MinSpanningTree<V, W, L, G, TI, F, I>
where
    V: Clone,
    W: Weight,
    L: Clone,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &MinSpanningTreeState<V, W, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoWeightedOutEdge<V, W, L>,
{
    /// A traversal with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next: F) -> Self {
        let state = MinSpanningTreeState {
            edge: None,
            paths: None,
        };
        let visited = gear.visited_set();
        MinSpanningTree {
            next,
            vertex_to_id,
            gear,
            build_paths: false,
            limit: None,
            calc: CalcLimit(None),
            tie: 0,
            visited,
            starts: Vec::new(),
            state,
            run: None,
            _marker: PhantomData,
        }
    }

    /// Build a tree path to each reported vertex, available in
    /// `state.paths`.
    pub fn build_paths(&mut self, yes: bool) -> &mut Self {
        self.build_paths = yes;
        self
    }

    /// Fail after this many vertices have been expanded.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Start the traversal at a single vertex.
    pub fn start_from(&mut self, start: V) -> &mut Self {
        self.start_from_vertices([start])
    }

    /// Start the traversal at several vertices at once, e.g. one per
    /// component of an unconnected graph.
    pub fn start_from_vertices<S: IntoIterator<Item = V>>(&mut self, starts: S) -> &mut Self {
        let starts: Vec<V> = starts.into_iter().collect();
        let mut visited = self.gear.visited_set();
        visited.visit_all(starts.iter().map(|v| (self.vertex_to_id)(v)));
        let mut paths = make_paths::<V, L, G, TI>(
            self.build_paths,
            <I::Item as IntoWeightedOutEdge<V, W, L>>::LABELED,
            &self.gear,
            &self.vertex_to_id,
        );
        if let Some(p) = paths.as_mut() {
            for v in &starts {
                p.record_root(v);
            }
        }
        self.state = MinSpanningTreeState { edge: None, paths };
        // expanding the start vertices is charged up front
        self.calc = CalcLimit(self.limit.map(|l| l.saturating_sub(starts.len())));
        let charge_failed = matches!(self.limit, Some(l) if l < starts.len());
        self.tie = 0;
        self.visited = visited;
        self.starts = starts;
        self.run = Some(MstRun {
            heap: BinaryHeap::new(),
            pending: None,
            started: false,
            charge_failed,
            done: false,
        });
        self
    }

    fn next_tie(&mut self) -> u64 {
        // counting up makes equal-weight edges pop in FIFO order
        let tie = self.tie;
        self.tie += 1;
        tie
    }

    fn push_edges_of(&mut self, run: &mut MstRun<V, W, L>, vertex: &V) {
        let edges = (self.next)(vertex, &self.state).into_iter();
        for item in edges {
            let (to, weight, label) = item.into_weighted_out_edge();
            if !self.visited.is_visited(&(self.vertex_to_id)(&to)) {
                let tie = self.next_tie();
                run.heap.push(MinScored {
                    score: weight,
                    tie,
                    value: (vertex.clone(), to, label),
                });
            }
        }
    }

    fn step(&mut self, run: &mut MstRun<V, W, L>) -> Option<Result<V, Error>> {
        if run.done {
            return None;
        }
        if run.charge_failed {
            run.charge_failed = false;
            run.done = true;
            return Some(Err(Error::CalculationLimitExceeded));
        }
        if !run.started {
            run.started = true;
            let starts = core::mem::take(&mut self.starts);
            for vertex in &starts {
                self.push_edges_of(run, vertex);
            }
            self.starts = starts;
        }
        if let Some(vertex) = run.pending.take() {
            if let Err(e) = self.calc.step() {
                run.done = true;
                return Some(Err(e));
            }
            self.push_edges_of(run, &vertex);
        }
        loop {
            let MinScored {
                score: weight,
                value: (from, to, label),
                ..
            } = run.heap.pop()?;

            // an edge is a tree edge iff its head is still unvisited when
            // the edge leaves the heap
            let to_id = (self.vertex_to_id)(&to);
            if !self.visited.visit(to_id.clone()) {
                continue;
            }
            if let Some(p) = self.state.paths.as_mut() {
                p.record_edge(&from, to_id, label.clone());
            }
            self.state.edge = Some(Edge {
                from,
                to: to.clone(),
                weight,
                label,
            });
            run.pending = Some(to.clone());
            return Some(Ok(to));
        }
    }
}

impl<V, W, L, G, TI, F, I> Strategy for MinSpanningTree<V, W, L, G, TI, F, I>
where
    V: Clone,
    W: Weight,
    L: Clone,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &MinSpanningTreeState<V, W, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoWeightedOutEdge<V, W, L>,
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
        let out = self.step(&mut run);
        self.run = Some(run);
        out
    }
}

impl<V, W, L, G, TI, F, I> Iterator for MinSpanningTree<V, W, L, G, TI, F, I>
where
    V: Clone,
    W: Weight,
    L: Clone,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &MinSpanningTreeState<V, W, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoWeightedOutEdge<V, W, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reported()
    }
}
