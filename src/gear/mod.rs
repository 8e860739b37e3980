//! Gears: policy objects that choose the container implementations and the
//! weight primitives a traversal strategy works with.
//!
//! Every strategy is generic over a gear. The gear decides how the visited
//! set, the predecessor / label / index / distance maps are represented,
//! and, for the weighted strategies, what the `zero` and `infinity`
//! weight values are. One strategy implementation thereby serves hash-based
//! bookkeeping for arbitrary vertex ids as well as sequence-based
//! bookkeeping for dense integer ids, with or without bit packing.
//!
//! [`HashGear`] is the default used by the plain strategy constructors.
//! [`IntIdGear`] trades generality for compact, index-addressed storage.

pub mod collections;

use core::hash::Hash;
use core::marker::PhantomData;

use hashbrown::{HashMap, HashSet};

use crate::error::Error;
use crate::weight::Weight;

use self::collections::{
    BitVertexSet, BoolVertexSet, DefaultedSequenceMap, DenseVertexSet, SequenceVertexMap,
    VertexIdMap, VertexIdSet, DEFAULT_EXTEND_SIZE,
};

/// Factory for the containers an unweighted traversal strategy needs.
pub trait Gear<V> {
    /// The hashable or index-like vertex id the containers are keyed by.
    type VertexId: Clone + Eq;

    /// Set of visited vertex ids.
    type VisitedSet: VertexIdSet<Self::VertexId>;

    /// Map from a vertex id to the predecessor vertex on the found path.
    type PredecessorMap: VertexIdMap<Self::VertexId, V>;

    /// Map from a vertex id to the label of the edge it was reached by.
    type LabelMap<L>: VertexIdMap<Self::VertexId, L>;

    /// Map from a vertex id to its pre-order discovery number (DFS).
    type IndexMap: VertexIdMap<Self::VertexId, usize>;

    /// A new, empty visited set.
    fn visited_set(&self) -> Self::VisitedSet;

    /// A new, empty predecessor map.
    fn predecessor_map(&self) -> Self::PredecessorMap;

    /// A new, empty edge label map.
    fn label_map<L>(&self) -> Self::LabelMap<L>;

    /// A new, empty discovery number map.
    fn index_map(&self) -> Self::IndexMap;
}

/// Factory extension for the weighted strategies: distance storage and the
/// weight policy.
///
/// The gear is the sole source of `zero` and `infinity`. A gear may use the
/// weight type's own infinity, or a smaller guard value (e.g. `u32::MAX`
/// for 32-bit distances); any computed distance reaching the guard is an
/// overflow.
pub trait WeightedGear<V, W: Weight>: Gear<V> {
    /// Map from a vertex id to its (tentative or final) distance.
    /// Ids without an entry are at distance infinity.
    type DistanceMap: VertexIdMap<Self::VertexId, W>;

    /// A new, empty distance map.
    fn distance_map(&self) -> Self::DistanceMap;

    /// The zero distance.
    fn zero(&self) -> W;

    /// The infinity guard value of this gear.
    fn infinity(&self) -> W;

    /// Fail if `distance` reached the infinity guard.
    fn check_overflow(&self, distance: &W) -> Result<(), Error> {
        if *distance >= self.infinity() {
            Err(Error::DistanceOverflow)
        } else {
            Ok(())
        }
    }
}

/// The default gear: hash-based containers for any `Eq + Hash` vertex id.
///
/// `W` only matters when the gear is used with a weighted strategy and
/// defaults to `f64`.
///
/// # Example
/// ```
/// use graphless::gear::HashGear;
/// use graphless::{vertex_as_id, Dijkstra};
///
/// let mut t = Dijkstra::with_gear(
///     vertex_as_id,
///     HashGear::<&str, u32>::new(),
///     |v: &&str, _| if *v == "a" { vec![("b", 2u32)] } else { vec![] },
/// );
/// let reached: Result<Vec<_>, _> = t.start_from("a").collect();
/// assert_eq!(reached.unwrap(), vec!["b"]);
/// ```
#[derive(Clone, Debug)]
pub struct HashGear<VId, W = f64> {
    zero: W,
    infinity: W,
    _marker: PhantomData<VId>,
}

impl<VId, W: Weight> HashGear<VId, W> {
    /// A gear with the weight type's own zero and infinity.
    pub fn new() -> Self {
        HashGear {
            zero: W::zero(),
            infinity: W::infinity(),
            _marker: PhantomData,
        }
    }

    /// A gear that guards distances with the given infinity value instead
    /// of the weight type's own.
    pub fn with_infinity(infinity: W) -> Self {
        HashGear {
            zero: W::zero(),
            infinity,
            _marker: PhantomData,
        }
    }
}

impl<VId, W: Weight> Default for HashGear<VId, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, VId, W> Gear<V> for HashGear<VId, W>
where
    VId: Clone + Eq + Hash,
{
    type VertexId = VId;
    type VisitedSet = HashSet<VId>;
    type PredecessorMap = HashMap<VId, V>;
    type LabelMap<L> = HashMap<VId, L>;
    type IndexMap = HashMap<VId, usize>;

    fn visited_set(&self) -> Self::VisitedSet {
        HashSet::new()
    }

    fn predecessor_map(&self) -> Self::PredecessorMap {
        HashMap::new()
    }

    fn label_map<L>(&self) -> Self::LabelMap<L> {
        HashMap::new()
    }

    fn index_map(&self) -> Self::IndexMap {
        HashMap::new()
    }
}

impl<V, VId, W> WeightedGear<V, W> for HashGear<VId, W>
where
    VId: Clone + Eq + Hash,
    W: Weight,
{
    type DistanceMap = HashMap<VId, W>;

    fn distance_map(&self) -> Self::DistanceMap {
        HashMap::new()
    }

    fn zero(&self) -> W {
        self.zero.clone()
    }

    fn infinity(&self) -> W {
        self.infinity.clone()
    }
}

/// A gear for vertex ids that are dense non-negative integers (`usize`).
///
/// All bookkeeping lives in growable sequences indexed by the id: the
/// visited set is bit-packed (one bit per id; choose
/// [`IntIdBoolGear`] for one boolean per id instead), predecessor and
/// label maps use optional slots, distances use an infinity-defaulted
/// sequence without per-slot overhead.
#[derive(Clone, Debug)]
pub struct IntIdGear<W = f64, S = BitVertexSet<usize>> {
    zero: W,
    infinity: W,
    extend_size: usize,
    _marker: PhantomData<S>,
}

/// [`IntIdGear`] with a boolean-per-id visited set instead of bit packing.
pub type IntIdBoolGear<W = f64> = IntIdGear<W, BoolVertexSet<usize>>;

impl<W: Weight, S> IntIdGear<W, S> {
    /// A gear with the weight type's own zero and infinity.
    pub fn new() -> Self {
        Self::with_infinity(W::infinity())
    }

    /// A gear that guards distances with the given infinity value instead
    /// of the weight type's own.
    pub fn with_infinity(infinity: W) -> Self {
        IntIdGear {
            zero: W::zero(),
            infinity,
            extend_size: DEFAULT_EXTEND_SIZE,
            _marker: PhantomData,
        }
    }

    /// Change how many slots the sequence containers over-allocate when
    /// they grow.
    pub fn extend_size(mut self, extend_size: usize) -> Self {
        self.extend_size = extend_size;
        self
    }
}

impl<W: Weight, S> Default for IntIdGear<W, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, W, S> Gear<V> for IntIdGear<W, S>
where
    S: DenseVertexSet<usize>,
{
    type VertexId = usize;
    type VisitedSet = S;
    type PredecessorMap = SequenceVertexMap<usize, V>;
    type LabelMap<L> = SequenceVertexMap<usize, L>;
    type IndexMap = DefaultedSequenceMap<usize, usize>;

    fn visited_set(&self) -> Self::VisitedSet {
        S::with_extend_size(self.extend_size)
    }

    fn predecessor_map(&self) -> Self::PredecessorMap {
        SequenceVertexMap::with_extend_size(self.extend_size)
    }

    fn label_map<L>(&self) -> Self::LabelMap<L> {
        SequenceVertexMap::with_extend_size(self.extend_size)
    }

    fn index_map(&self) -> Self::IndexMap {
        // index 0 means "not numbered"; DFS numbering starts at 1
        DefaultedSequenceMap::with_extend_size(0, self.extend_size)
    }
}

impl<V, W, S> WeightedGear<V, W> for IntIdGear<W, S>
where
    W: Weight,
    S: DenseVertexSet<usize>,
{
    type DistanceMap = DefaultedSequenceMap<usize, W>;

    fn distance_map(&self) -> Self::DistanceMap {
        DefaultedSequenceMap::with_extend_size(self.infinity.clone(), self.extend_size)
    }

    fn zero(&self) -> W {
        self.zero.clone()
    }

    fn infinity(&self) -> W {
        self.infinity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::collections::{VertexIdMap, VertexIdSet};
    use super::*;

    #[test]
    fn hash_gear_factories() {
        let gear: HashGear<&str, u32> = HashGear::new();
        let mut visited = Gear::<u8>::visited_set(&gear);
        assert!(visited.visit("x"));
        let mut distances = WeightedGear::<u8, u32>::distance_map(&gear);
        distances.insert("x", 3);
        assert_eq!(distances.get(&"x"), Some(&3));
        assert_eq!(WeightedGear::<u8, u32>::infinity(&gear), u32::MAX);
    }

    #[test]
    fn int_id_gear_custom_infinity_guards_overflow() {
        let gear: IntIdGear<u32> = IntIdGear::with_infinity(1_000);
        assert!(WeightedGear::<usize, u32>::check_overflow(&gear, &999).is_ok());
        assert_eq!(
            WeightedGear::<usize, u32>::check_overflow(&gear, &1_000),
            Err(Error::DistanceOverflow)
        );
    }

    #[test]
    fn int_id_gear_distance_map_defaults_to_infinity() {
        let gear: IntIdGear<f64> = IntIdGear::new();
        let mut distances = WeightedGear::<usize, f64>::distance_map(&gear);
        assert_eq!(distances.get(&7), None);
        distances.insert(7usize, 1.5);
        assert_eq!(distances.get(&7), Some(&1.5));
    }

    #[test]
    fn bool_gear_visited_set() {
        let gear: IntIdBoolGear<f64> = IntIdGear::new().extend_size(4);
        let mut visited = Gear::<usize>::visited_set(&gear);
        assert!(visited.visit(9usize));
        assert!(!visited.visit(9usize));
    }
}
