//! Depth First Search with reportable events and traversal modes.

use core::hash::Hash;
use core::marker::PhantomData;
use core::ops::BitOr;

use crate::edge::IntoOutEdge;
use crate::error::Error;
use crate::gear::collections::{VertexIdMap, VertexIdSet};
use crate::gear::{Gear, HashGear};
use crate::paths::Paths;
use crate::traversal::{make_paths, CalcLimit, Strategy};
use crate::vertex_as_id;

/// The events that can trigger the report of a vertex by [`Dfs`], and
/// groups thereof.
///
/// Combine events with `|`. The group events [`SOME_NON_TREE_EDGE`] and
/// [`FORWARD_OR_CROSS_EDGE`] are reported *instead of* their members and
/// cannot be combined with them.
///
/// [`SOME_NON_TREE_EDGE`]: DfsEvent::SOME_NON_TREE_EDGE
/// [`FORWARD_OR_CROSS_EDGE`]: DfsEvent::FORWARD_OR_CROSS_EDGE
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DfsEvent(u16);

impl DfsEvent {
    /// No event. The initial value of `state.event`.
    pub const NONE: DfsEvent = DfsEvent(0);
    /// A start vertex has been entered; the traversal starts there.
    pub const ENTERING_START: DfsEvent = DfsEvent(1 << 0);
    /// A start vertex has been left; the traversal may continue with the
    /// next one.
    pub const LEAVING_START: DfsEvent = DfsEvent(1 << 1);
    /// A vertex has been entered by following an edge to it.
    pub const ENTERING_SUCCESSOR: DfsEvent = DfsEvent(1 << 2);
    /// A vertex is left again; the edge it was entered by is followed
    /// backwards while backtracking.
    pub const LEAVING_SUCCESSOR: DfsEvent = DfsEvent(1 << 3);
    /// A start vertex was about to be entered, but has already been
    /// visited as descendant of an earlier start vertex.
    pub const SKIPPING_START: DfsEvent = DfsEvent(1 << 4);
    /// An edge `(u, v)` was found where `v` is still on the trace.
    pub const BACK_EDGE: DfsEvent = DfsEvent(1 << 5);
    /// An edge `(u, v)` was found where `v` has already been left and was
    /// entered after `u`.
    pub const FORWARD_EDGE: DfsEvent = DfsEvent(1 << 6);
    /// An edge `(u, v)` was found where `v` has already been left and was
    /// entered before `u`.
    pub const CROSS_EDGE: DfsEvent = DfsEvent(1 << 7);
    /// One of [`BACK_EDGE`](Self::BACK_EDGE),
    /// [`FORWARD_EDGE`](Self::FORWARD_EDGE) or
    /// [`CROSS_EDGE`](Self::CROSS_EDGE) occurred, without determining
    /// which one.
    pub const SOME_NON_TREE_EDGE: DfsEvent = DfsEvent(1 << 8);
    /// A [`FORWARD_EDGE`](Self::FORWARD_EDGE) or a
    /// [`CROSS_EDGE`](Self::CROSS_EDGE) occurred, without determining
    /// which one.
    pub const FORWARD_OR_CROSS_EDGE: DfsEvent = DfsEvent(1 << 9);

    /// Both entering events.
    pub const ENTERING: DfsEvent = DfsEvent(Self::ENTERING_START.0 | Self::ENTERING_SUCCESSOR.0);
    /// Both leaving events.
    pub const LEAVING: DfsEvent = DfsEvent(Self::LEAVING_START.0 | Self::LEAVING_SUCCESSOR.0);
    /// Entering and leaving of start vertices.
    pub const IN_OUT_START: DfsEvent = DfsEvent(Self::ENTERING_START.0 | Self::LEAVING_START.0);
    /// Entering and leaving of non-start vertices.
    pub const IN_OUT_SUCCESSOR: DfsEvent =
        DfsEvent(Self::ENTERING_SUCCESSOR.0 | Self::LEAVING_SUCCESSOR.0);
    /// All entering and leaving events.
    pub const IN_OUT: DfsEvent = DfsEvent(Self::IN_OUT_START.0 | Self::IN_OUT_SUCCESSOR.0);
    /// The three concrete non-tree edge events.
    pub const NON_TREE_EDGES: DfsEvent =
        DfsEvent(Self::BACK_EDGE.0 | Self::FORWARD_EDGE.0 | Self::CROSS_EDGE.0);
    /// All events that report an edge.
    pub const EDGES: DfsEvent = DfsEvent(Self::ENTERING_SUCCESSOR.0 | Self::NON_TREE_EDGES.0);
    /// Every concrete event.
    pub const ALL: DfsEvent =
        DfsEvent(Self::IN_OUT.0 | Self::SKIPPING_START.0 | Self::NON_TREE_EDGES.0);

    /// Whether all events of `other` are contained in `self`.
    pub fn contains(self, other: DfsEvent) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether `self` and `other` share an event.
    pub fn intersects(self, other: DfsEvent) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for DfsEvent {
    type Output = DfsEvent;

    fn bitor(self, rhs: DfsEvent) -> DfsEvent {
        DfsEvent(self.0 | rhs.0)
    }
}

/// The mode a [`Dfs`] operates in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DfsMode {
    /// Follow only edges of the DFS tree: each vertex is visited at most
    /// once. Non-tree edges can be reported, but are not followed.
    DfsTree,
    /// Follow every edge whose head is not on the current trace. The
    /// traversal then walks all simple paths; edges back into the trace
    /// are back edges.
    AllPaths,
    /// Follow every edge unconditionally, without visited bookkeeping.
    /// Incompatible with non-tree edge events and with path building.
    AllWalks,
}

/// The search state of a [`Dfs`].
pub struct DfsState<V, L, G: Gear<V>, TI> {
    /// Depth of the last reported vertex within the DFS tree, if depth
    /// computation was requested. `None` otherwise, and after the
    /// traversal left its last start vertex.
    pub depth: Option<usize>,
    /// The event that triggered the last report.
    pub event: DfsEvent,
    /// Ids of the vertices entered so far. Not maintained when `is_tree`
    /// is set, or in modes [`DfsMode::AllPaths`] and
    /// [`DfsMode::AllWalks`].
    pub visited: G::VisitedSet,
    /// The paths built so far, if `build_paths` was requested.
    pub paths: Option<Paths<V, G::VertexId, L, G::PredecessorMap, G::LabelMap<L>, TI>>,
    /// The vertices on the current path from a start vertex to the
    /// current vertex, if trace computation is active. When a non-tree
    /// edge is reported, its head is temporarily appended.
    pub trace: Vec<V>,
    /// The labels of the edges along `trace` (one less than the trace
    /// vertices), if edges are labeled and trace computation is active.
    pub trace_labels: Vec<L>,
    /// Ids of the vertices on `trace`, if on-trace computation is active.
    /// Heads of reported forward and cross edges are not added.
    pub on_trace: G::VisitedSet,
    /// Pre-order numbering of the entered vertices, starting at 1, if
    /// index computation is active.
    pub index: G::IndexMap,
}

struct Frame<V, L> {
    vertex: V,
    label: Option<L>,
    from_start: bool,
}

enum RichPhase<V> {
    Scan,
    /// A leaving event was reported for `trace.last()`; finish the leave.
    LeaveReported { pop_label: bool },
    /// A non-tree edge or skipped start was reported with its head
    /// temporarily on the trace; remove it again.
    EdgeReported { pop_label: bool },
    /// An entering event was reported; expand the vertex, unless the
    /// caller asks to skip.
    EnterPending { vertex: V },
}

impl<V> RichPhase<V> {
    fn is_enter_pending(&self) -> bool {
        matches!(self, RichPhase::EnterPending { .. })
    }
}

struct RichRun<V, L> {
    starts: std::vec::IntoIter<V>,
    frames: Vec<Frame<V, L>>,
    leave_markers: Vec<bool>,
    depth: isize,
    time: usize,
    phase: RichPhase<V>,
    done: bool,
}

struct FastRun<V> {
    starts: std::vec::IntoIter<V>,
    to_visit: Vec<V>,
    leave_markers: Vec<bool>,
    depth: isize,
    start_pending: bool,
    pending_expand: Option<V>,
    done: bool,
}

enum DfsRun<V, L> {
    Fast(FastRun<V>),
    Rich(RichRun<V, L>),
}

#[derive(Copy, Clone, Default)]
struct ActiveOptions {
    depth: bool,
    trace: bool,
    on_trace: bool,
    index: bool,
}

/// Depth First Search: follows edges to unvisited vertices as long as
/// possible, backtracking when necessary.
///
/// By default, a vertex is reported when it is entered as a successor
/// ([`DfsEvent::ENTERING_SUCCESSOR`]); the [`report`](Dfs::report) option
/// selects other events, including leaving events and the classification
/// of non-tree edges into back, forward and cross edges. The
/// [`mode`](Dfs::mode) option switches from the DFS tree to traversals of
/// all simple paths or all walks.
///
/// Start vertices are processed one after the other; a start vertex that
/// was already visited from an earlier one is skipped (reportable as
/// [`DfsEvent::SKIPPING_START`]).
///
/// While a vertex stands reported with an entering event, calling
/// [`skip_expanding_entered_vertex`](Dfs::skip_expanding_entered_vertex)
/// suppresses its expansion; the vertex is reported once more as
/// acknowledgement and the traversal backtracks.
///
/// One unit of the calculation limit is consumed per expanded vertex.
///
/// # Example
/// ```
/// use graphless::{Dfs, DfsEvent};
///
/// // 0 -> 1 -> 2, 0 -> 2
/// let mut t = Dfs::new(|v: &u32, _| match v {
///     0 => vec![1, 2],
///     1 => vec![2],
///     _ => vec![],
/// });
/// let entered: Result<Vec<u32>, _> = t.start_from(0).collect();
/// // edge 0 -> 2 is tried first (stack order), so 2 is entered before 1
/// assert_eq!(entered.unwrap(), vec![2, 1]);
/// assert_eq!(t.state.event, DfsEvent::ENTERING_SUCCESSOR);
/// ```
pub struct Dfs<V, L, G: Gear<V>, TI, F, I: IntoIterator> {
    next: F,
    vertex_to_id: TI,
    gear: G,
    is_tree: bool,
    build_paths: bool,
    limit: Option<usize>,
    seed_visited: Option<G::VisitedSet>,
    report: DfsEvent,
    mode: DfsMode,
    compute_depth: bool,
    compute_trace: bool,
    compute_on_trace: bool,
    compute_index: bool,
    active: ActiveOptions,
    calc: CalcLimit,
    skip_requested: bool,
    /// The public search state, also passed to the successor function.
    pub state: DfsState<V, L, G, TI>,
    run: Option<DfsRun<V, L>>,
    _marker: PhantomData<I>,
}

impl<V, L, F, I> Dfs<V, L, HashGear<V>, fn(&V) -> V, F, I>
where
    V: Clone + Eq + Hash,
    L: Clone,
    F: FnMut(&V, &DfsState<V, L, HashGear<V>, fn(&V) -> V>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal over the graph defined by `next`, with vertices serving
    /// as their own ids and hash-based bookkeeping.
    pub fn new(next: F) -> Self {
        Self::with_gear(vertex_as_id::<V> as fn(&V) -> V, HashGear::new(), next)
    }
}

impl<V, L, G, TI, F, I> Dfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &DfsState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    /// A traversal with an explicit vertex id function and gear.
    pub fn with_gear(vertex_to_id: TI, gear: G, next: F) -> Self {
        let state = DfsState {
            depth: None,
            event: DfsEvent::NONE,
            visited: gear.visited_set(),
            paths: None,
            trace: Vec::new(),
            trace_labels: Vec::new(),
            on_trace: gear.visited_set(),
            index: gear.index_map(),
        };
        Dfs {
            next,
            vertex_to_id,
            gear,
            is_tree: false,
            build_paths: false,
            limit: None,
            seed_visited: None,
            report: DfsEvent::ENTERING_SUCCESSOR,
            mode: DfsMode::DfsTree,
            compute_depth: false,
            compute_trace: false,
            compute_on_trace: false,
            compute_index: false,
            active: ActiveOptions::default(),
            calc: CalcLimit(None),
            skip_requested: false,
            state,
            run: None,
            _marker: PhantomData,
        }
    }

    /// Promise that each vertex is reachable only once. The visited set is
    /// then neither maintained nor consulted, and non-tree edge events are
    /// unavailable.
    pub fn is_tree(&mut self, yes: bool) -> &mut Self {
        self.is_tree = yes;
        self
    }

    /// Build a path to each entered vertex, available in `state.paths`.
    pub fn build_paths(&mut self, yes: bool) -> &mut Self {
        self.build_paths = yes;
        self
    }

    /// Fail after this many vertices have been expanded.
    pub fn calculation_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Use `visited` as the visited set of the next run. Incompatible
    /// with [`compute_index`](Dfs::compute_index).
    pub fn already_visited(&mut self, visited: G::VisitedSet) -> &mut Self {
        self.seed_visited = Some(visited);
        self
    }

    /// Select the events that report a vertex. Defaults to
    /// [`DfsEvent::ENTERING_SUCCESSOR`].
    pub fn report(&mut self, report: DfsEvent) -> &mut Self {
        self.report = report;
        self
    }

    /// Select the traversal mode. Defaults to [`DfsMode::DfsTree`].
    pub fn mode(&mut self, mode: DfsMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Maintain `state.depth` during the traversal.
    pub fn compute_depth(&mut self, yes: bool) -> &mut Self {
        self.compute_depth = yes;
        self
    }

    /// Maintain `state.trace` (and `state.trace_labels` for labeled
    /// edges). Implied by every option and event that needs the trace.
    pub fn compute_trace(&mut self, yes: bool) -> &mut Self {
        self.compute_trace = yes;
        self
    }

    /// Maintain `state.on_trace`. Implies trace computation.
    pub fn compute_on_trace(&mut self, yes: bool) -> &mut Self {
        self.compute_on_trace = yes;
        self
    }

    /// Maintain `state.index`. Implies trace computation.
    pub fn compute_index(&mut self, yes: bool) -> &mut Self {
        self.compute_index = yes;
        self
    }

    /// Start the traversal at a single vertex.
    pub fn start_from(&mut self, start: V) -> &mut Self {
        self.start_from_vertices([start])
    }

    /// Start the traversal at several vertices, processed one after the
    /// other.
    ///
    /// # Panics
    /// Panics on incompatible option combinations: non-tree edge events or
    /// on-trace computation for trees or in mode `AllWalks`, forward/cross
    /// edge events in mode `AllPaths`, path building in mode `AllWalks`,
    /// index computation combined with `already_visited`, or a group event
    /// combined with one of its members.
    pub fn start_from_vertices<S: IntoIterator<Item = V>>(&mut self, starts: S) -> &mut Self {
        let report = self.report;
        let mode = self.mode;
        if report.contains(DfsEvent::SOME_NON_TREE_EDGE)
            && report.intersects(DfsEvent::NON_TREE_EDGES)
        {
            panic!("SOME_NON_TREE_EDGE cannot be combined with individual non-tree edge events");
        }
        if report.contains(DfsEvent::FORWARD_OR_CROSS_EDGE)
            && report.intersects(DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE)
        {
            panic!("FORWARD_OR_CROSS_EDGE cannot be combined with FORWARD_EDGE or CROSS_EDGE");
        }

        // derive implied options
        let mut active = ActiveOptions {
            depth: self.compute_depth,
            trace: self.compute_trace,
            on_trace: self.compute_on_trace,
            index: self.compute_index,
        };
        if !self.is_tree {
            if report.intersects(DfsEvent::NON_TREE_EDGES | DfsEvent::FORWARD_OR_CROSS_EDGE)
                || mode == DfsMode::AllPaths
            {
                active.on_trace = true;
            }
            if report.intersects(DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE) {
                active.index = true;
            }
        }
        if !only_entering(report) || active.index || active.on_trace {
            active.trace = true;
        }

        // forbidden combinations
        let non_tree_any =
            DfsEvent::NON_TREE_EDGES | DfsEvent::SOME_NON_TREE_EDGE | DfsEvent::FORWARD_OR_CROSS_EDGE;
        if report.intersects(non_tree_any) && (self.is_tree || mode == DfsMode::AllWalks) {
            panic!("non-tree edge events cannot be computed for trees or in mode AllWalks");
        }
        if active.on_trace && (self.is_tree || mode == DfsMode::AllWalks) {
            panic!("on-trace computation is not allowed for trees or in mode AllWalks");
        }
        if report.intersects(
            DfsEvent::FORWARD_EDGE
                | DfsEvent::CROSS_EDGE
                | DfsEvent::SOME_NON_TREE_EDGE
                | DfsEvent::FORWARD_OR_CROSS_EDGE,
        ) && mode == DfsMode::AllPaths
        {
            panic!("forward and cross edge events cannot be computed in mode AllPaths");
        }
        if self.build_paths && mode == DfsMode::AllWalks {
            panic!("paths cannot be built in mode AllWalks, walks can be cyclic");
        }
        if active.index && self.seed_visited.is_some() {
            panic!("already_visited cannot be combined with index computation");
        }
        self.active = active;

        let starts: Vec<V> = starts.into_iter().collect();
        let visited = self
            .seed_visited
            .take()
            .unwrap_or_else(|| self.gear.visited_set());
        self.state = DfsState {
            depth: if active.depth { Some(0) } else { None },
            event: DfsEvent::NONE,
            visited,
            paths: make_paths::<V, L, G, TI>(
                self.build_paths,
                <I::Item as IntoOutEdge<V, L>>::LABELED,
                &self.gear,
                &self.vertex_to_id,
            ),
            trace: Vec::new(),
            trace_labels: Vec::new(),
            on_trace: self.gear.visited_set(),
            index: self.gear.index_map(),
        };
        self.calc = CalcLimit(self.limit);
        self.skip_requested = false;

        self.run = Some(if active.trace || mode != DfsMode::DfsTree {
            DfsRun::Rich(RichRun {
                starts: starts.into_iter(),
                frames: Vec::new(),
                leave_markers: Vec::new(),
                depth: -1,
                time: 1,
                phase: RichPhase::Scan,
                done: false,
            })
        } else {
            DfsRun::Fast(FastRun {
                starts: starts.into_iter(),
                to_visit: Vec::new(),
                leave_markers: Vec::new(),
                depth: -1,
                start_pending: false,
                pending_expand: None,
                done: false,
            })
        });
        self
    }

    /// Suppress the expansion of the vertex that was just reported with an
    /// entering event. The next pull reports the vertex once more as
    /// acknowledgement, then the traversal backtracks.
    ///
    /// # Panics
    /// Panics when the last report was not an entering event.
    pub fn skip_expanding_entered_vertex(&mut self) {
        let pending = match &self.run {
            Some(DfsRun::Fast(run)) => run.pending_expand.is_some(),
            Some(DfsRun::Rich(run)) => run.phase.is_enter_pending(),
            None => false,
        };
        if !pending || !DfsEvent::ENTERING.contains(self.state.event) {
            panic!(
                "skip_expanding_entered_vertex may only be called right after \
                 a vertex was reported with an entering event"
            );
        }
        self.skip_requested = true;
    }

    fn set_depth(&mut self, depth: isize) {
        if self.active.depth {
            self.state.depth = if depth >= 0 { Some(depth as usize) } else { None };
        }
    }

    fn record_path_step(&mut self, vertex: &V, v_id: G::VertexId, label: &Option<L>) {
        let DfsState { trace, paths, .. } = &mut self.state;
        if let Some(p) = paths.as_mut() {
            match trace.last() {
                Some(from) => p.record_edge(from, v_id, label.clone()),
                None => p.record_root(vertex),
            }
        }
    }

    fn fast_expand(&mut self, run: &mut FastRun<V>, vertex: &V) -> Result<(), Error> {
        self.calc.step()?;
        let edges = (self.next)(vertex, &self.state).into_iter();
        for item in edges {
            let (neighbor, label) = item.into_out_edge();
            if !self.is_tree || self.build_paths {
                let n_id = (self.vertex_to_id)(&neighbor);
                if !self.is_tree && self.state.visited.is_visited(&n_id) {
                    continue;
                }
                if let Some(p) = self.state.paths.as_mut() {
                    p.record_edge(vertex, n_id, label);
                }
            }
            run.to_visit.push(neighbor);
            if self.active.depth {
                run.leave_markers.push(false);
            }
        }
        Ok(())
    }

    fn fast_step(&mut self, run: &mut FastRun<V>) -> Option<Result<V, Error>> {
        if run.done {
            return None;
        }
        // expansion left pending by a reported entering event
        if let Some(vertex) = run.pending_expand.take() {
            if self.skip_requested {
                self.skip_requested = false;
                // acknowledge the skip by reporting the vertex once more
                return Some(Ok(vertex));
            }
            if let Err(e) = self.fast_expand(run, &vertex) {
                run.done = true;
                return Some(Err(e));
            }
        }
        loop {
            if self.active.depth {
                while let Some(marker) = run.leave_markers.pop() {
                    if marker {
                        run.depth -= 1;
                    } else {
                        break;
                    }
                }
            }
            if run.to_visit.is_empty() {
                // current start vertex exhausted, move to the next one
                match run.starts.next() {
                    Some(start) => {
                        if let Some(p) = self.state.paths.as_mut() {
                            p.record_root(&start);
                        }
                        run.to_visit.push(start);
                        if self.active.depth {
                            run.leave_markers.push(false);
                        }
                        run.start_pending = true;
                        continue;
                    }
                    None => {
                        self.state.depth = None;
                        return None;
                    }
                }
            }
            let vertex = match run.to_visit.pop() {
                Some(v) => v,
                None => continue,
            };
            if !self.is_tree {
                let v_id = (self.vertex_to_id)(&vertex);
                if !self.state.visited.visit(v_id) {
                    continue;
                }
            }
            run.depth += 1;
            self.set_depth(run.depth);
            if self.active.depth {
                run.leave_markers.push(true);
            }
            let event = if run.start_pending {
                run.start_pending = false;
                DfsEvent::ENTERING_START
            } else {
                DfsEvent::ENTERING_SUCCESSOR
            };
            self.state.event = event;
            if self.report.intersects(event) {
                run.pending_expand = Some(vertex.clone());
                return Some(Ok(vertex));
            }
            if let Err(e) = self.fast_expand(run, &vertex) {
                run.done = true;
                return Some(Err(e));
            }
        }
    }

    fn rich_expand(&mut self, run: &mut RichRun<V, L>, vertex: &V) -> Result<(), Error> {
        self.calc.step()?;
        let edges = (self.next)(vertex, &self.state).into_iter();
        for item in edges {
            let (neighbor, label) = item.into_out_edge();
            run.frames.push(Frame {
                vertex: neighbor,
                label,
                from_start: false,
            });
            run.leave_markers.push(false);
        }
        Ok(())
    }

    fn finish_leave(&mut self, run: &mut RichRun<V, L>, pop_label: bool) {
        if let Some(left) = self.state.trace.pop() {
            if pop_label {
                self.state.trace_labels.pop();
            }
            if self.active.on_trace {
                let l_id = (self.vertex_to_id)(&left);
                self.state.on_trace.unvisit(&l_id);
            }
        }
        run.depth -= 1;
        self.set_depth(run.depth);
    }

    fn rich_step(&mut self, run: &mut RichRun<V, L>) -> Option<Result<V, Error>> {
        if run.done {
            return None;
        }
        loop {
            match core::mem::replace(&mut run.phase, RichPhase::Scan) {
                RichPhase::LeaveReported { pop_label } => {
                    self.finish_leave(run, pop_label);
                }
                RichPhase::EdgeReported { pop_label } => {
                    self.state.trace.pop();
                    if pop_label {
                        self.state.trace_labels.pop();
                    }
                }
                RichPhase::EnterPending { vertex } => {
                    if self.skip_requested {
                        self.skip_requested = false;
                        // acknowledge the skip; the leave marker is already
                        // in place, so backtracking happens by itself
                        return Some(Ok(vertex));
                    }
                    if let Err(e) = self.rich_expand(run, &vertex) {
                        run.done = true;
                        return Some(Err(e));
                    }
                }
                RichPhase::Scan => {
                    match run.leave_markers.pop() {
                        None => {
                            // round over, move to the next start vertex
                            match run.starts.next() {
                                Some(start) => {
                                    run.frames.push(Frame {
                                        vertex: start,
                                        label: None,
                                        from_start: true,
                                    });
                                    run.leave_markers.push(false);
                                    continue;
                                }
                                None => {
                                    self.state.depth = None;
                                    return None;
                                }
                            }
                        }
                        Some(true) => {
                            // leave the vertex on top of the trace
                            let vertex = match self.state.trace.last() {
                                Some(v) => v.clone(),
                                None => continue,
                            };
                            let leaving_start = run.leave_markers.is_empty();
                            let event = if leaving_start {
                                DfsEvent::LEAVING_START
                            } else {
                                DfsEvent::LEAVING_SUCCESSOR
                            };
                            let pop_label =
                                <I::Item as IntoOutEdge<V, L>>::LABELED && !leaving_start;
                            if self.report.intersects(event) {
                                self.state.event = event;
                                run.phase = RichPhase::LeaveReported { pop_label };
                                return Some(Ok(vertex));
                            }
                            self.finish_leave(run, pop_label);
                        }
                        Some(false) => {
                            if let Some(result) = self.rich_enter(run) {
                                return Some(result);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Enter the next frame. Returns a vertex to report, or `None` when
    /// the scan simply continues.
    fn rich_enter(&mut self, run: &mut RichRun<V, L>) -> Option<Result<V, Error>> {
        let Frame {
            vertex,
            label,
            from_start,
        } = run.frames.pop()?;
        let labeled = <I::Item as IntoOutEdge<V, L>>::LABELED;
        let v_id = (self.vertex_to_id)(&vertex);

        if !self.is_tree && self.mode != DfsMode::AllWalks {
            let re_visit;
            let mut event = DfsEvent::NONE;
            if self.mode == DfsMode::DfsTree {
                re_visit = !self.state.visited.visit(v_id.clone());
                if re_visit && self.state.trace.is_empty() {
                    // a start vertex that was already visited
                    if self.report.intersects(DfsEvent::SKIPPING_START) {
                        self.state.event = DfsEvent::SKIPPING_START;
                        self.state.trace.push(vertex.clone());
                        run.phase = RichPhase::EdgeReported { pop_label: false };
                        return Some(Ok(vertex));
                    }
                    return None;
                }
            } else {
                // AllPaths: only edges back into the trace are ignored
                re_visit = self.state.on_trace.is_visited(&v_id);
                if re_visit {
                    event = DfsEvent::BACK_EDGE;
                }
            }
            if re_visit {
                if self.report.contains(DfsEvent::SOME_NON_TREE_EDGE) {
                    event = DfsEvent::SOME_NON_TREE_EDGE;
                } else if event == DfsEvent::NONE {
                    if self.state.on_trace.is_visited(&v_id) {
                        event = DfsEvent::BACK_EDGE;
                    } else if self.report.contains(DfsEvent::FORWARD_OR_CROSS_EDGE) {
                        event = DfsEvent::FORWARD_OR_CROSS_EDGE;
                    } else if self
                        .report
                        .intersects(DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE)
                    {
                        let parent_index = match self.state.trace.last() {
                            Some(parent) => {
                                let p_id = (self.vertex_to_id)(parent);
                                self.state.index.get(&p_id).copied().unwrap_or(0)
                            }
                            None => 0,
                        };
                        let vertex_index = self.state.index.get(&v_id).copied().unwrap_or(0);
                        event = if parent_index < vertex_index {
                            DfsEvent::FORWARD_EDGE
                        } else {
                            DfsEvent::CROSS_EDGE
                        };
                    }
                }
                if event != DfsEvent::NONE && self.report.contains(event) {
                    // report the edge with its head temporarily on the trace
                    self.state.event = event;
                    let pop_label = labeled && label.is_some();
                    if let Some(l) = label {
                        if pop_label {
                            self.state.trace_labels.push(l);
                        }
                    }
                    self.state.trace.push(vertex.clone());
                    run.phase = RichPhase::EdgeReported { pop_label };
                    return Some(Ok(vertex));
                }
                return None;
            }
            if self.active.on_trace {
                self.state.on_trace.visit(v_id.clone());
            }
        }

        // the vertex is entered now
        if self.active.index {
            self.state.index.insert(v_id.clone(), run.time);
            run.time += 1;
        }
        if self.build_paths {
            self.record_path_step(&vertex, v_id, &label);
        }
        run.leave_markers.push(true);
        run.depth += 1;
        self.set_depth(run.depth);
        let event = if from_start {
            DfsEvent::ENTERING_START
        } else {
            DfsEvent::ENTERING_SUCCESSOR
        };
        if labeled && !self.state.trace.is_empty() {
            if let Some(l) = label.clone() {
                self.state.trace_labels.push(l);
            }
        }
        self.state.trace.push(vertex.clone());
        self.state.event = event;
        if self.report.intersects(event) {
            run.phase = RichPhase::EnterPending {
                vertex: vertex.clone(),
            };
            return Some(Ok(vertex));
        }
        if let Err(e) = self.rich_expand(run, &vertex) {
            run.done = true;
            return Some(Err(e));
        }
        None
    }
}

// `report` consists of entering events only
fn only_entering(report: DfsEvent) -> bool {
    DfsEvent::ENTERING.contains(report) || report == DfsEvent::NONE
}

impl<V, L, G, TI, F, I> Strategy for Dfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &DfsState<V, L, G, TI>) -> I,
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
        let out = match &mut run {
            DfsRun::Fast(fast) => self.fast_step(fast),
            DfsRun::Rich(rich) => self.rich_step(rich),
        };
        self.run = Some(run);
        out
    }
}

impl<V, L, G, TI, F, I> Iterator for Dfs<V, L, G, TI, F, I>
where
    V: Clone,
    L: Clone,
    G: Gear<V>,
    TI: Fn(&V) -> G::VertexId + Clone,
    F: FnMut(&V, &DfsState<V, L, G, TI>) -> I,
    I: IntoIterator,
    I::Item: IntoOutEdge<V, L>,
{
    type Item = Result<V, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reported()
    }
}
