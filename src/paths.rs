//! Container for the paths a traversal builds while it runs.
//!
//! A [`Paths`] object holds references from each reached vertex to its
//! predecessor (and, for labeled edges, to the label of the edge it was
//! reached by). Paths are never materialised during the traversal;
//! reconstruction walks the predecessor chain on demand, so constructing a
//! view is O(1) and iterating it is proportional to the path length.
//!
//! Start vertices are their own predecessors; this self-reference marks the
//! root of a path.

use core::marker::PhantomData;

use crate::error::Error;
use crate::gear::collections::VertexIdMap;

/// The paths from the start vertices to every vertex reached so far.
///
/// Available as `state.paths` on a strategy started with
/// `build_paths(true)`.
///
/// # Example
/// ```
/// use graphless::Bfs;
///
/// let mut t = Bfs::new(|v: &u32, _| if *v < 3 { vec![v + 1] } else { vec![] });
/// t.build_paths(true).start_from(0).for_each(drop);
/// let paths = t.state.paths.as_ref().unwrap();
/// let p: Vec<u32> = paths.iter_vertices_from_start(&3).unwrap().collect();
/// assert_eq!(p, vec![0, 1, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Paths<V, VId, L, PM, LM, TI> {
    predecessors: PM,
    labels: Option<LM>,
    vertex_to_id: TI,
    _marker: PhantomData<(V, VId, L)>,
}

impl<V, VId, L, PM, LM, TI> Paths<V, VId, L, PM, LM, TI>
where
    V: Clone,
    VId: Clone + Eq,
    L: Clone,
    PM: VertexIdMap<VId, V>,
    LM: VertexIdMap<VId, L>,
    TI: Fn(&V) -> VId,
{
    pub(crate) fn unlabeled(predecessors: PM, vertex_to_id: TI) -> Self {
        Paths {
            predecessors,
            labels: None,
            vertex_to_id,
            _marker: PhantomData,
        }
    }

    pub(crate) fn labeled(predecessors: PM, labels: LM, vertex_to_id: TI) -> Self {
        Paths {
            predecessors,
            labels: Some(labels),
            vertex_to_id,
            _marker: PhantomData,
        }
    }

    /// Record `vertex` as a path root unless it already has a path.
    pub(crate) fn record_root(&mut self, vertex: &V) {
        let id = (self.vertex_to_id)(vertex);
        self.predecessors.insert_if_absent(id, vertex.clone());
    }

    /// Record that the path to the vertex with id `to_id` ends with an edge
    /// from `from`, carrying `label` if edges are labeled.
    pub(crate) fn record_edge(&mut self, from: &V, to_id: VId, label: Option<L>) {
        if let (Some(labels), Some(label)) = (self.labels.as_mut(), label) {
            labels.insert(to_id.clone(), label);
        }
        self.predecessors.insert(to_id, from.clone());
    }

    /// Whether a path to `vertex` has been found so far.
    pub fn contains(&self, vertex: &V) -> bool {
        self.predecessors.contains(&(self.vertex_to_id)(vertex))
    }

    /// The predecessor of `vertex` on its path. `Ok(None)` for a path
    /// root, [`Error::NoPath`] if `vertex` has not been reached.
    pub fn predecessor(&self, vertex: &V) -> Result<Option<&V>, Error> {
        let id = (self.vertex_to_id)(vertex);
        let pred = self.predecessors.get(&id).ok_or(Error::NoPath)?;
        if (self.vertex_to_id)(pred) == id {
            Ok(None)
        } else {
            Ok(Some(pred))
        }
    }

    /// Iterate the path to `vertex`, beginning at `vertex` and ending at
    /// the start vertex.
    pub fn iter_vertices_to_start(
        &self,
        vertex: &V,
    ) -> Result<VerticesToStart<'_, V, VId, L, PM, LM, TI>, Error> {
        if !self.contains(vertex) {
            return Err(Error::NoPath);
        }
        Ok(VerticesToStart {
            paths: self,
            current: Some(vertex.clone()),
        })
    }

    /// Iterate the path to `vertex`, beginning at the start vertex.
    pub fn iter_vertices_from_start(
        &self,
        vertex: &V,
    ) -> Result<std::vec::IntoIter<V>, Error> {
        let mut vertices: Vec<V> = self.iter_vertices_to_start(vertex)?.collect();
        vertices.reverse();
        Ok(vertices.into_iter())
    }

    /// Iterate the edges of the path to `vertex` as `(from, to)` pairs,
    /// beginning with the edge into `vertex`.
    pub fn iter_edges_to_start(
        &self,
        vertex: &V,
    ) -> Result<EdgesToStart<'_, V, VId, L, PM, LM, TI>, Error> {
        Ok(EdgesToStart {
            inner: self.iter_vertices_to_start(vertex)?,
            head: None,
        })
    }

    /// Iterate the edges of the path to `vertex` as `(from, to)` pairs,
    /// beginning at the start vertex.
    pub fn iter_edges_from_start(
        &self,
        vertex: &V,
    ) -> Result<std::vec::IntoIter<(V, V)>, Error> {
        let mut edges: Vec<(V, V)> = self.iter_edges_to_start(vertex)?.collect();
        edges.reverse();
        Ok(edges.into_iter())
    }

    /// Iterate the edges of the path to `vertex` as `(from, to, label)`
    /// triples, beginning with the edge into `vertex`.
    ///
    /// Fails with [`Error::NoLabels`] if the traversal was built over
    /// unlabeled edges.
    pub fn iter_labeled_edges_to_start(
        &self,
        vertex: &V,
    ) -> Result<LabeledEdgesToStart<'_, V, VId, L, PM, LM, TI>, Error> {
        if self.labels.is_none() {
            return Err(Error::NoLabels);
        }
        Ok(LabeledEdgesToStart {
            inner: self.iter_vertices_to_start(vertex)?,
            head: None,
        })
    }

    /// Iterate the edges of the path to `vertex` as `(from, to, label)`
    /// triples, beginning at the start vertex.
    pub fn iter_labeled_edges_from_start(
        &self,
        vertex: &V,
    ) -> Result<std::vec::IntoIter<(V, V, L)>, Error> {
        let mut edges: Vec<(V, V, L)> = self.iter_labeled_edges_to_start(vertex)?.collect();
        edges.reverse();
        Ok(edges.into_iter())
    }

    fn label_of(&self, id: &VId) -> Option<L> {
        self.labels.as_ref().and_then(|m| m.get(id).cloned())
    }

    /// Predecessor of the vertex with `id`, or `None` when `id` is a root.
    fn step_back(&self, id: &VId) -> Option<V> {
        let pred = self.predecessors.get(id)?;
        if (self.vertex_to_id)(pred) == *id {
            None
        } else {
            Some(pred.clone())
        }
    }
}

/// Iterator over the vertices of one path, walking towards the start
/// vertex. See [`Paths::iter_vertices_to_start`].
pub struct VerticesToStart<'a, V, VId, L, PM, LM, TI> {
    paths: &'a Paths<V, VId, L, PM, LM, TI>,
    current: Option<V>,
}

impl<V, VId, L, PM, LM, TI> Iterator for VerticesToStart<'_, V, VId, L, PM, LM, TI>
where
    V: Clone,
    VId: Clone + Eq,
    L: Clone,
    PM: VertexIdMap<VId, V>,
    LM: VertexIdMap<VId, L>,
    TI: Fn(&V) -> VId,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let vertex = self.current.take()?;
        let id = (self.paths.vertex_to_id)(&vertex);
        self.current = self.paths.step_back(&id);
        Some(vertex)
    }
}

/// Iterator over the edges of one path, walking towards the start vertex.
/// See [`Paths::iter_edges_to_start`].
pub struct EdgesToStart<'a, V, VId, L, PM, LM, TI> {
    inner: VerticesToStart<'a, V, VId, L, PM, LM, TI>,
    head: Option<V>,
}

impl<V, VId, L, PM, LM, TI> Iterator for EdgesToStart<'_, V, VId, L, PM, LM, TI>
where
    V: Clone,
    VId: Clone + Eq,
    L: Clone,
    PM: VertexIdMap<VId, V>,
    LM: VertexIdMap<VId, L>,
    TI: Fn(&V) -> VId,
{
    type Item = (V, V);

    fn next(&mut self) -> Option<(V, V)> {
        let to = match self.head.take() {
            Some(v) => v,
            None => self.inner.next()?,
        };
        let from = self.inner.next()?;
        self.head = Some(from.clone());
        Some((from, to))
    }
}

/// Iterator over the labeled edges of one path, walking towards the start
/// vertex. See [`Paths::iter_labeled_edges_to_start`].
pub struct LabeledEdgesToStart<'a, V, VId, L, PM, LM, TI> {
    inner: VerticesToStart<'a, V, VId, L, PM, LM, TI>,
    head: Option<V>,
}

impl<V, VId, L, PM, LM, TI> Iterator for LabeledEdgesToStart<'_, V, VId, L, PM, LM, TI>
where
    V: Clone,
    VId: Clone + Eq,
    L: Clone,
    PM: VertexIdMap<VId, V>,
    LM: VertexIdMap<VId, L>,
    TI: Fn(&V) -> VId,
{
    type Item = (V, V, L);

    fn next(&mut self) -> Option<(V, V, L)> {
        let to = match self.head.take() {
            Some(v) => v,
            None => self.inner.next()?,
        };
        let from = self.inner.next()?;
        self.head = Some(from.clone());
        let label = self
            .inner
            .paths
            .label_of(&(self.inner.paths.vertex_to_id)(&to))?;
        Some((from, to, label))
    }
}
