//! Breadth First Search.

use core::hash::Hash;
use core::marker::PhantomData;
use core::mem;

use crate::edge::IntoOutEdge;
use crate::error::Error;
use crate::gear::collections::VertexIdSet;
use crate::gear::{Gear, HashGear};
use crate::paths::Paths;
use crate::traversal::{make_paths, CalcLimit, Strategy};
use crate::vertex_as_id;

/// The search state of a [`Bfs`], visible to the caller between reports
/// and to the successor function while a vertex is expanded.
pub struct BfsState<V, L, G: Gear<V>, TI> {
    /// Search depth of the last reported vertex: the edge count of the
    /// path with the fewest edges from a start vertex. While a vertex is
    /// being expanded, this is the depth of the expanded vertex. After the
    /// traversal is exhausted, it is the largest depth that was reached.
    pub depth: usize,
    /// Ids of the vertices seen so far, including the start vertices.
    pub visited: G::VisitedSet,
    /// The shortest paths (by edge count) found so far, if `build_paths`
    /// was requested.
    pub paths: Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>,
}

struct BfsRun<V, EI> {
    to_expand: Vec<V>,
    next_to_expand: Vec<V>,
    expand_ix: usize,
    /// Depth of the vertices in `to_expand`.
    depth: usize,
    current: Option<(V, EI)>,
    done: bool,
}

/// Breadth First Search: visits and reports vertices in ascending depth.
///
/// The traversal owns a successor function; the graph itself is never
/// stored. Start vertices are marked visited but not reported. Each other
/// reachable vertex is reported exactly once, at the depth of the shortest
/// edge path from a start vertex, in the order the successor function
/// emits neighbors within one depth level.
///
/// One unit of the calculation limit is consumed per expanded vertex.
///
/// # Example
/// ```
/// use graphless::Bfs;
///
/// // diamond: 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
/// let mut t = Bfs::new(|v: &u32, _| match v {
///     0 => vec![1, 2],
///     1 | 2 => vec![3],
///     _ => vec![],
/// });
/// let reported: Result<Vec<u32>, _> = t.start_from(0).collect();
/// assert_eq!(reported.unwrap(), vec![1, 2, 3]);
/// assert_eq!(t.state.depth, 2);
/// ```
pub struct Bfs<V, L, G: Gear<V>, TI, F, I: IntoIterator> {
    next: F,
    vertex_to_id: TI,
    gear: G,
    is_tree: bool,
    build_paths: bool,
    limit: Option<usize>,
    seed_visited: Option<G::VisitedSet>,
    calc: CalcLimit,
    /// The public search state, also passed to the successor function.
    pub state: BfsState<V, L, G, TI>,
    run: Option<BfsRun<V, I::IntoIter>>,
    _marker: PhantomData<L>,
}

impl<V, L, F, I> Bfs<V, L, HashGear<V>, fn(&V) -> V, F, I>
where
    V: Clone + Eq + Hash,
    L: Clone,
    F: FnMut(&V, &BfsState<V, L, HashGear<V>, fn(&V) -> V>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal over the graph defined by `next`, with vertices serving
    /// as their own ids and hash-based bookkeeping.
    pub fn new(next: F) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next)
    }
}

impl<V, L, G, TI, F, I> Bfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BfsState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next: F) -> Self {
        let state = BfsState {
            depth: 0,
            visited: gear.visited_set(),
            paths: None,
        };
        Bfs {
            next,
            vertex_to_id,
            gear,
            is_tree: false,
            build_paths: false,
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

    /// Fail after this many vertices have been expanded.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Use `visited` as the visited set of the next run, e.g. to pre-load
    /// vertices that must not be entered, or to share one set between
    /// runs. Consumed by the next `start_from`; afterwards the set lives
    /// in `state.visited`.
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
        self.state = BfsState {
            depth: 0,
            visited,
            paths,
        };
        self.calc = CalcLimit(self.limit);
        self.run = Some(BfsRun {
            to_expand: starts,
            next_to_expand: Vec::new(),
            expand_ix: 0,
            depth: 0,
            current: None,
            done: false,
        });
        self
    }

    /// Skip reported vertices while their depth is below `start`, then
    /// report vertices while their depth is below `stop`.
    ///
    /// The first vertex at depth `stop` or beyond is consumed from the
    /// traversal but not reported.
    pub fn go_for_depth_range(
        &mut self,
        start: usize,
        stop: usize,
    ) -> GoForDepthRange<'_, V, L, G, TI, F, I> {
        GoForDepthRange {
            traversal: self,
            start,
            stop,
            done: false,
        }
    }
}

impl<V, L, G, TI, F, I> Strategy for Bfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BfsState<V, L, G, TI>) -> I,
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
            // report from the successor iterator of the expanded vertex
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
                    run.next_to_expand.push(neighbor.clone());
                    self.state.depth = run.depth + 1;
                    return Some(Ok(neighbor));
                }
                run.current = None;
            }

            // next vertex of this level, or swap to the next level
            if run.expand_ix == run.to_expand.len() {
                if run.next_to_expand.is_empty() {
                    // state.depth keeps the maximum reached depth
                    return None;
                }
                mem::swap(&mut run.to_expand, &mut run.next_to_expand);
                run.next_to_expand.clear();
                run.expand_ix = 0;
                run.depth += 1;
            }
            let vertex = run.to_expand[run.expand_ix].clone();
            run.expand_ix += 1;
            if let Err(e) = self.calc.step() {
                run.done = true;
                return Some(Err(e));
            }
            // the successor function sees the depth of the expanded vertex
            self.state.depth = run.depth;
            let edges = (self.next)(&vertex, &self.state).into_iter();
            run.current = Some((vertex, edges));
        }
    }
}

impl<V, L, G, TI, F, I> Iterator for Bfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BfsState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reported()
    }
}

/// Iterator returned by [`Bfs::go_for_depth_range`].
pub struct GoForDepthRange<'a, V, L, G: Gear<V>, TI, F, I: IntoIterator> {
    traversal: &'a mut Bfs<V, L, G, TI, F, I>,
    start: usize,
    stop: usize,
    done: bool,
}

impl<V, L, G, TI, F, I> Iterator for GoForDepthRange<'_, V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BfsState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let vertex = match self.traversal.next_reported() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(v)) => v,
            };
            let depth = self.traversal.state.depth;
            if depth >= self.stop {
                self.done = true;
                return None;
            }
            if depth >= self.start {
                return Some(Ok(vertex));
            }
        }
    }
}
