//! Heap entries for the weighted strategies.

use core::cmp::Ordering;

/// A score, a tie-breaker and a carried value, ordered in reverse by
/// `(score, tie)` so that a `BinaryHeap` pops the entry with the least
/// score first.
///
/// The tie-breaker makes entries with equal scores pop in a defined order
/// without ever comparing the carried values (vertices need not be
/// comparable): a strategy that counts the tie-breaker down gets LIFO
/// behavior among ties, one that counts up gets FIFO behavior.
///
/// The ordering is total even for float scores; entries with a NaN score
/// sort behind all regular entries.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MinScored<K, T> {
    pub score: K,
    pub tie: u64,
    pub value: T,
}

impl<K: PartialOrd, T> PartialEq for MinScored<K, T> {
    #[inline]
    fn eq(&self, other: &MinScored<K, T>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd, T> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for MinScored<K, T> {
    #[inline]
    fn partial_cmp(&self, other: &MinScored<K, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for MinScored<K, T> {
    #[inline]
    fn cmp(&self, other: &MinScored<K, T>) -> Ordering {
        let a = &self.score;
        let b = &other.score;
        let by_score = if a == b {
            Ordering::Equal
        } else if a < b {
            Ordering::Greater
        } else if a > b {
            Ordering::Less
        } else if a != a && b != b {
            // two NaN scores
            Ordering::Equal
        } else if a != a {
            // NaN sorts behind every regular score
            Ordering::Less
        } else {
            Ordering::Greater
        };
        // lower tie-breaker pops first
        by_score.then_with(|| other.tie.cmp(&self.tie))
    }
}
