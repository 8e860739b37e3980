//! Bidirectional search: a forward search from the start vertices and a
//! backward search from the goal vertices, meeting in the middle.
//!
//! Both searches need a successor function for the forward direction and
//! one for the backward direction (incoming edges). They do not iterate;
//! `start_from` runs to completion and returns the path length together
//! with the found path.

use core::hash::Hash;
use core::marker::PhantomData;
use std::collections::BinaryHeap;

use crate::edge::{IntoOutEdge, IntoWeightedOutEdge};
use crate::error::Error;
use crate::gear::collections::{VertexIdMap, VertexIdSet};
use crate::gear::{Gear, HashGear, WeightedGear};
use crate::paths::Paths;
use crate::scored::MinScored;
use crate::traversal::CalcLimit;
use crate::vertex_as_id;
use crate::weight::Weight;

type SidePaths<V, G, TI> = Paths<
    V,
    <G as Gear<V>>::VertexId,
    (),
    <G as Gear<V>>::PredecessorMap,
    <G as Gear<V>>::LabelMap<()>,
    TI,
>;

/// The state a [`BidirectionalBfs`] passes to its successor functions.
pub struct BidirectionalBfsState {
    /// Depth of the vertex being expanded, on its own side of the search.
    pub depth: usize,
}

struct BfsSide<V, G: Gear<V>, TI> {
    frontier: Vec<V>,
    visited: G::VisitedSet,
    /// Depth of each visited vertex, stored plus one so that depth zero
    /// is distinguishable from "absent".
    depths: G::IndexMap,
    paths: SidePaths<V, G, TI>,
    /// Number of completed expansion levels.
    depth_done: usize,
}

impl<V, G, TI> BfsSide<V, G, TI>
where
    V: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
{
    fn start(gear: &G, vertex_to_id: &TI, roots: &[V]) -> Self {
        let mut side = BfsSide {
            frontier: Vec::new(),
            visited: gear.visited_set(),
            depths: gear.index_map(),
            paths: Paths::unlabeled(gear.predecessor_map(), vertex_to_id.clone()),
            depth_done: 0,
        };
        for root in roots {
            let id: G::VertexId = vertex_to_id(root);
            if VertexIdSet::<G::VertexId>::visit(&mut side.visited, id.clone()) {
                VertexIdMap::<G::VertexId, usize>::insert(&mut side.depths, id, 1);
                side.paths.record_root(root);
                side.frontier.push(root.clone());
            }
        }
        side
    }

    fn depth_of(&self, id: &G::VertexId) -> usize {
        self.depths.get(id).copied().unwrap_or(1) - 1
    }
}

/// Bidirectional Breadth First Search: finds a path with the minimum edge
/// count between a set of start vertices and a set of goal vertices.
///
/// Two successor functions are required: `next_out` yields the outgoing
/// edges of a vertex, `next_in` its incoming edges (as the vertices they
/// come from). The two frontiers are expanded alternately by one depth
/// level; when the searches meet, the shortest connection found is
/// returned as `(edge_count, path)` with the path running from a start
/// vertex to a goal vertex.
///
/// If start and goal sets intersect, the result is `(0, vec![v])` for a
/// common vertex `v`. If no path exists, [`Error::VertexNotFound`] is
/// returned.
/// One unit of the calculation limit is consumed per expanded vertex, on
/// both sides together.
///
/// # Example
/// ```
/// use graphless::BidirectionalBfs;
///
/// // cycle of 6 vertices: i -> (i + 1) % 6
/// let mut search = BidirectionalBfs::new(
///     |v: &u32, _| vec![(v + 1) % 6],
///     |v: &u32, _| vec![(v + 5) % 6],
/// );
/// let (length, path) = search.start_from([0], [4]).unwrap();
/// assert_eq!(length, 4);
/// assert_eq!(path, vec![0, 1, 2, 3, 4]);
/// ```
pub struct BidirectionalBfs<V, G, TI, FF, FB, IF, IB>
where
    G: Gear<V>,
{
    next_out: FF,
    next_in: FB,
    vertex_to_id: TI,
    gear: G,
    limit: Option<usize>,
    calc: CalcLimit,
    _marker: PhantomData<(V, IF, IB)>,
}

impl<V, FF, FB, IF, IB> BidirectionalBfs<V, HashGear<V>, fn(&V) -> V, FF, FB, IF, IB>
where
    V: Clone + Eq + Hash,
    FF: FnMut(&V, &BidirectionalBfsState) -> IF,
    FB: FnMut(&V, &BidirectionalBfsState) -> IB,
    IF: IntoIterator,
    IF::Item: IntoOutEdge<V, ()>,
    IB: IntoIterator,
    IB::Item: IntoOutEdge<V, ()>,
{
    /// A search over the graph defined by `next_out` / `next_in`, with
    /// vertices serving as their own ids and hash-based bookkeeping.
    pub fn new(next_out: FF, next_in: FB) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next_out, next_in)
    }
}

impl<V, G, TI, FF, FB, IF, IB> BidirectionalBfs<V, G, TI, FF, FB, IF, IB>
where
    V: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    FF: FnMut(&V, &BidirectionalBfsState) -> IF,
    FB: FnMut(&V, &BidirectionalBfsState) -> IB,
    IF: IntoIterator,
    IF::Item: IntoOutEdge<V, ()>,
    IB: IntoIterator,
    IB::Item: IntoOutEdge<V, ()>,
{
    /// A search with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next_out: FF, next_in: FB) -> Self {
        BidirectionalBfs {
            next_out,
            next_in,
            vertex_to_id,
            gear,
            limit: None,
            calc: CalcLimit(None),
            _marker: PhantomData,
        }
    }

    /// Fail after this many vertices have been expanded, counted over
    /// both search directions together.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Search a path from one of `starts` to one of `goals` and return
    /// its edge count and its vertices.
    pub fn start_from<S, D>(&mut self, starts: S, goals: D) -> Result<(usize, Vec<V>), Error>
    where
        S: IntoIterator<Item = V>,
        D: IntoIterator<Item = V>,
    {
        let starts: Vec<V> = starts.into_iter().collect();
        let goals: Vec<V> = goals.into_iter().collect();
        self.calc = CalcLimit(self.limit);
        let mut forward = BfsSide::start(&self.gear, &self.vertex_to_id, &starts);
        let mut backward = BfsSide::start(&self.gear, &self.vertex_to_id, &goals);

        // a goal among the start vertices is a zero-length path
        for start in &starts {
            if backward.visited.is_visited(&(self.vertex_to_id)(start)) {
                return Ok((0, vec![start.clone()]));
            }
        }

        let mut best: Option<(usize, V)> = None;
        let mut expand_forward = true;
        loop {
            if let Some((length, _)) = best.as_ref() {
                // an undetected path would need at least one edge beyond
                // both completed radii
                if *length <= forward.depth_done + backward.depth_done + 1 {
                    break;
                }
            }
            let side_empty = if expand_forward {
                forward.frontier.is_empty()
            } else {
                backward.frontier.is_empty()
            };
            if side_empty {
                break;
            }
            let found = if expand_forward {
                expand_bfs_level(
                    &mut forward,
                    &backward,
                    &mut self.next_out,
                    &self.vertex_to_id,
                    &mut self.calc,
                )?
            } else {
                expand_bfs_level(
                    &mut backward,
                    &forward,
                    &mut self.next_in,
                    &self.vertex_to_id,
                    &mut self.calc,
                )?
            };
            if let Some((length, meeting)) = found {
                let better = match best.as_ref() {
                    Some((best_len, _)) => length < *best_len,
                    None => true,
                };
                if better {
                    best = Some((length, meeting));
                }
            }
            expand_forward = !expand_forward;
        }

        match best {
            Some((length, meeting)) => {
                let path = join_paths(&forward, &backward, &meeting)?;
                Ok((length, path))
            }
            None => Err(Error::VertexNotFound),
        }
    }
}

/// Expand one depth level of `side`. Returns the best meeting with the
/// other side found within the level, as `(total edge count, vertex)`.
fn expand_bfs_level<V, G, TI, F, I>(
    side: &mut BfsSide<V, G, TI>,
    other: &BfsSide<V, G, TI>,
    next: &mut F,
    vertex_to_id: &TI,
    calc: &mut CalcLimit,
) -> Result<Option<(usize, V)>, Error>
where
    V: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BidirectionalBfsState) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, ()>,
{
    let mut best: Option<(usize, V)> = None;
    let frontier = core::mem::take(&mut side.frontier);
    for vertex in &frontier {
        calc.step()?;
        let depth = side.depth_of(&vertex_to_id(vertex));
        let state = BidirectionalBfsState { depth };
        for item in next(vertex, &state) {
            let (neighbor, _) = item.into_out_edge();
            let n_id = vertex_to_id(&neighbor);
            if !side.visited.visit(n_id.clone()) {
                continue;
            }
            side.depths.insert(n_id.clone(), depth + 2);
            side.paths.record_edge(vertex, n_id.clone(), None);
            if other.visited.is_visited(&n_id) {
                let total = depth + 1 + other.depth_of(&n_id);
                let better = match best.as_ref() {
                    Some((best_len, _)) => total < *best_len,
                    None => true,
                };
                if better {
                    best = Some((total, neighbor.clone()));
                }
            }
            side.frontier.push(neighbor);
        }
    }
    side.depth_done += 1;
    Ok(best)
}

/// Concatenate the forward path to `meeting` and the backward path from
/// `meeting` into one start-to-goal vertex sequence.
fn join_paths<V, G, TI>(
    forward: &BfsSide<V, G, TI>,
    backward: &BfsSide<V, G, TI>,
    meeting: &V,
) -> Result<Vec<V>, Error>
where
    V: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
{
    let mut path: Vec<V> = forward.paths.iter_vertices_from_start(meeting)?.collect();
    // the backward side's "start" is a goal vertex
    path.extend(backward.paths.iter_vertices_to_start(meeting)?.skip(1));
    Ok(path)
}

/// The state a [`BidirectionalDijkstra`] passes to its successor
/// functions.
pub struct BidirectionalDijkstraState<W> {
    /// Distance of the vertex being expanded, on its own side of the
    /// search.
    pub distance: W,
}

struct DijkstraSide<V, W, G, TI>
where
    W: Weight,
    G: WeightedGear<V, W>,
{
    heap: BinaryHeap<MinScored<W, V>>,
    distances: G::DistanceMap,
    finalized: G::VisitedSet,
    paths: SidePaths<V, G, TI>,
    tie: u64,
}

impl<V, W, G, TI> DijkstraSide<V, W, G, TI>
where
    V: Clone,
    W: Weight,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
{
    fn start(gear: &G, vertex_to_id: &TI, roots: &[V]) -> Self {
        let mut side = DijkstraSide {
            heap: BinaryHeap::new(),
            distances: gear.distance_map(),
            finalized: gear.visited_set(),
            paths: Paths::unlabeled(gear.predecessor_map(), vertex_to_id.clone()),
            tie: u64::MAX,
        };
        for root in roots {
            let id: G::VertexId = vertex_to_id(root);
            VertexIdMap::<G::VertexId, W>::insert(&mut side.distances, id, gear.zero());
            side.paths.record_root(root);
            let tie = side.next_tie();
            side.heap.push(MinScored {
                score: gear.zero(),
                tie,
                value: root.clone(),
            });
        }
        side
    }

    fn next_tie(&mut self) -> u64 {
        let tie = self.tie;
        self.tie = self.tie.wrapping_sub(1);
        tie
    }

    fn top(&self) -> Option<W> {
        self.heap.peek().map(|entry| entry.score.clone())
    }
}

/// Bidirectional shortest path search: a Dijkstra search from the start
/// vertices and one from the goal vertices (over incoming edges), each
/// advanced where the smaller tentative distance waits.
///
/// Whenever the searches touch, the combined distance is a candidate
/// result; the search ends once the sum of the two frontier minima proves
/// that no better candidate can appear, and returns `(distance, path)`.
///
/// If start and goal sets intersect, the result is a zero distance and a
/// single-vertex path. If no path exists, [`Error::VertexNotFound`] is
/// returned.
/// One unit of the calculation limit is consumed per expanded vertex, on
/// both sides together.
///
/// # Example
/// ```
/// use graphless::BidirectionalDijkstra;
///
/// // 0 -50-> 1 -50-> 4,  0 -30-> 2 -30-> 3 -30-> 4
/// let out = [vec![(1u32, 50u32), (2, 30)], vec![(4, 50)], vec![(3, 30)], vec![(4, 30)], vec![]];
/// let inc = [vec![], vec![(0u32, 50u32)], vec![(0, 30)], vec![(2, 30)], vec![(1, 50), (3, 30)]];
/// let mut search = BidirectionalDijkstra::new(
///     move |v: &usize, _| out[*v].iter().map(|&(n, w)| (n as usize, w)).collect::<Vec<_>>(),
///     move |v: &usize, _| inc[*v].iter().map(|&(n, w)| (n as usize, w)).collect::<Vec<_>>(),
/// );
/// let (distance, path) = search.start_from([0], [4]).unwrap();
/// assert_eq!(distance, 90);
/// assert_eq!(path, vec![0, 2, 3, 4]);
/// ```
pub struct BidirectionalDijkstra<V, W, G, TI, FF, FB, IF, IB>
where
    W: Weight,
    G: WeightedGear<V, W>,
{
    next_out: FF,
    next_in: FB,
    vertex_to_id: TI,
    gear: G,
    limit: Option<usize>,
    calc: CalcLimit,
    _marker: PhantomData<(V, W, IF, IB)>,
}

impl<V, W, FF, FB, IF, IB> BidirectionalDijkstra<V, W, HashGear<V, W>, fn(&V) -> V, FF, FB, IF, IB>
where
    V: Clone + Eq + Hash,
    W: Weight,
    FF: FnMut(&V, &BidirectionalDijkstraState<W>) -> IF,
    FB: FnMut(&V, &BidirectionalDijkstraState<W>) -> IB,
    IF: IntoIterator,
    IF::Item: IntoWeightedOutEdge<V, W, ()>,
    IB: IntoIterator,
    IB::Item: IntoWeightedOutEdge<V, W, ()>,
{
    /// A search over the graph defined by `next_out` / `next_in`, with
    /// vertices serving as their own ids and hash-based bookkeeping.
    pub fn new(next_out: FF, next_in: FB) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next_out, next_in)
    }
}

impl<V, W, G, TI, FF, FB, IF, IB> BidirectionalDijkstra<V, W, G, TI, FF, FB, IF, IB>
where
    V: Clone,
    W: Weight,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
    FF: FnMut(&V, &BidirectionalDijkstraState<W>) -> IF,
    FB: FnMut(&V, &BidirectionalDijkstraState<W>) -> IB,
    IF: IntoIterator,
    IF::Item: IntoWeightedOutEdge<V, W, ()>,
    IB: IntoIterator,
    IB::Item: IntoWeightedOutEdge<V, W, ()>,
{
    /// A search with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next_out: FF, next_in: FB) -> Self {
        BidirectionalDijkstra {
            next_out,
            next_in,
            vertex_to_id,
            gear,
            limit: None,
            calc: CalcLimit(None),
            _marker: PhantomData,
        }
    }

    /// Fail after this many vertices have been expanded, counted over
    /// both search directions together.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Search a shortest path from one of `starts` to one of `goals` and
    /// return its length and its vertices.
    pub fn start_from<S, D>(&mut self, starts: S, goals: D) -> Result<(W, Vec<V>), Error>
    where
        S: IntoIterator<Item = V>,
        D: IntoIterator<Item = V>,
    {
        let starts: Vec<V> = starts.into_iter().collect();
        let goals: Vec<V> = goals.into_iter().collect();
        self.calc = CalcLimit(self.limit);
        let mut forward: DijkstraSide<V, W, G, TI> =
            DijkstraSide::start(&self.gear, &self.vertex_to_id, &starts);
        let mut backward: DijkstraSide<V, W, G, TI> =
            DijkstraSide::start(&self.gear, &self.vertex_to_id, &goals);

        for start in &starts {
            let id = (self.vertex_to_id)(start);
            for goal in &goals {
                if (self.vertex_to_id)(goal) == id {
                    return Ok((self.gear.zero(), vec![start.clone()]));
                }
            }
        }

        let mut best: Option<(W, V)> = None;
        loop {
            let (top_f, top_b) = (forward.top(), backward.top());
            if let Some((mu, _)) = best.as_ref() {
                // once the frontiers have moved past the best candidate,
                // no shorter connection can appear; with one search
                // exhausted, the other frontier minimum alone bounds every
                // further candidate
                let better_possible = match (&top_f, &top_b) {
                    (Some(tf), Some(tb)) => {
                        let bound = tf.clone() + tb.clone();
                        self.gear.check_overflow(&bound).is_ok() && bound < *mu
                    }
                    (Some(tf), None) => tf < mu,
                    (None, Some(tb)) => tb < mu,
                    (None, None) => false,
                };
                if !better_possible {
                    break;
                }
            }
            let take_forward = match (&top_f, &top_b) {
                (Some(tf), Some(tb)) => tf <= tb,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let found = if take_forward {
                settle_one(
                    &mut forward,
                    &backward,
                    &mut self.next_out,
                    &self.vertex_to_id,
                    &self.gear,
                    &mut self.calc,
                )?
            } else {
                settle_one(
                    &mut backward,
                    &forward,
                    &mut self.next_in,
                    &self.vertex_to_id,
                    &self.gear,
                    &mut self.calc,
                )?
            };
            if let Some((length, meeting)) = found {
                let better = match best.as_ref() {
                    Some((mu, _)) => length < *mu,
                    None => true,
                };
                if better {
                    best = Some((length, meeting));
                }
            }
        }

        match best {
            Some((length, meeting)) => {
                let mut path: Vec<V> = forward.paths.iter_vertices_from_start(&meeting)?.collect();
                path.extend(backward.paths.iter_vertices_to_start(&meeting)?.skip(1));
                Ok((length, path))
            }
            None => Err(Error::VertexNotFound),
        }
    }
}

/// Pop and settle one vertex of `side`, expanding it and collecting the
/// best meeting candidate produced.
fn settle_one<V, W, G, TI, F, I>(
    side: &mut DijkstraSide<V, W, G, TI>,
    other: &DijkstraSide<V, W, G, TI>,
    next: &mut F,
    vertex_to_id: &TI,
    gear: &G,
    calc: &mut CalcLimit,
) -> Result<Option<(W, V)>, Error>
where
    V: Clone,
    W: Weight,
    G: WeightedGear<V, W>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &BidirectionalDijkstraState<W>) -> I,
    I: IntoIterator,
    I::Item: IntoWeightedOutEdge<V, W, ()>,
{
    let mut best: Option<(W, V)> = None;
    while let Some(MinScored {
        score: distance,
        value: vertex,
        ..
    }) = side.heap.pop()
    {
        let v_id = vertex_to_id(&vertex);
        if let Some(stored) = side.distances.get(&v_id) {
            if distance > *stored {
                continue;
            }
        }
        if !side.finalized.visit(v_id.clone()) {
            continue;
        }
        if let Some(other_distance) = other.distances.get(&v_id) {
            let total = distance.clone() + other_distance.clone();
            gear.check_overflow(&total)?;
            best = Some((total, vertex.clone()));
        }
        calc.step()?;
        let state = BidirectionalDijkstraState {
            distance: distance.clone(),
        };
        for item in next(&vertex, &state) {
            let (neighbor, weight, _) = item.into_weighted_out_edge();
            let n_weight = distance.clone() + weight;
            gear.check_overflow(&n_weight)?;
            let n_id = vertex_to_id(&neighbor);
            if let Some(stored) = side.distances.get(&n_id) {
                if *stored <= n_weight {
                    continue;
                }
            }
            side.distances.insert(n_id.clone(), n_weight.clone());
            side.paths.record_edge(&vertex, n_id.clone(), None);
            if let Some(other_distance) = other.distances.get(&n_id) {
                let total = n_weight.clone() + other_distance.clone();
                gear.check_overflow(&total)?;
                let better = match best.as_ref() {
                    Some((mu, _)) => total < *mu,
                    None => true,
                };
                if better {
                    best = Some((total, neighbor.clone()));
                }
            }
            let tie = side.next_tie();
            side.heap.push(MinScored {
                score: n_weight,
                tie,
                value: neighbor,
            });
        }
        break;
    }
    Ok(best)
}
