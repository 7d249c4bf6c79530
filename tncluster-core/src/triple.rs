//! Pairwise distance records and the sorted list the tree builder consumes.

#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

/// One pairwise distance between two entities.
///
/// # Examples
/// ```
/// use tncluster_core::DistanceTriple;
///
/// let triple = DistanceTriple::new(0.5, "A", "B");
/// assert_eq!(triple.distance(), 0.5);
/// assert_eq!(triple.source(), &"A");
/// assert_eq!(triple.target(), &"B");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceTriple<K> {
    distance: f64,
    source: K,
    target: K,
}

impl<K> DistanceTriple<K> {
    /// Creates a triple joining `source` and `target` at `distance`.
    #[must_use]
    pub const fn new(distance: f64, source: K, target: K) -> Self {
        Self {
            distance,
            source,
            target,
        }
    }

    /// Returns the distance between the two entities.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the first entity.
    #[must_use]
    pub const fn source(&self) -> &K {
        &self.source
    }

    /// Returns the second entity.
    #[must_use]
    pub const fn target(&self) -> &K {
        &self.target
    }
}

/// Distance triples sorted ascending by distance.
///
/// Sorting is stable, so triples with equal distances keep their input order
/// and tree construction stays deterministic.
///
/// # Examples
/// ```
/// use tncluster_core::{DistanceList, DistanceTriple};
///
/// let list = DistanceList::from_unsorted(vec![
///     DistanceTriple::new(3.0, "C", "D"),
///     DistanceTriple::new(1.0, "A", "B"),
///     DistanceTriple::new(1.0, "B", "C"),
/// ]);
/// let sources: Vec<_> = list.iter().map(|triple| *triple.source()).collect();
/// assert_eq!(sources, ["A", "B", "C"]);
/// assert_eq!(list.max_distance(), Some(3.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceList<K> {
    triples: Vec<DistanceTriple<K>>,
}

impl<K> Default for DistanceList<K> {
    fn default() -> Self {
        Self {
            triples: Vec::new(),
        }
    }
}

impl<K: Send> DistanceList<K> {
    /// Sorts `triples` ascending by distance.
    ///
    /// Distances are ordered with [`f64::total_cmp`]; NaN and negative values
    /// are kept and left for the tree builder to reject.
    #[must_use]
    pub fn from_unsorted(mut triples: Vec<DistanceTriple<K>>) -> Self {
        sort_triples(&mut triples);
        Self { triples }
    }
}

impl<K> DistanceList<K> {
    /// Returns the number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns `true` when the list holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns the largest distance, or `None` for an empty list.
    #[must_use]
    pub fn max_distance(&self) -> Option<f64> {
        self.triples.last().map(DistanceTriple::distance)
    }

    /// Iterates over the triples in ascending distance order.
    pub fn iter(&self) -> std::slice::Iter<'_, DistanceTriple<K>> {
        self.triples.iter()
    }

    /// Returns the sorted triples as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[DistanceTriple<K>] {
        &self.triples
    }

    /// Consumes the list, returning the sorted triples.
    #[must_use]
    pub fn into_inner(self) -> Vec<DistanceTriple<K>> {
        self.triples
    }
}

impl<'a, K> IntoIterator for &'a DistanceList<K> {
    type Item = &'a DistanceTriple<K>;
    type IntoIter = std::slice::Iter<'a, DistanceTriple<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(feature = "parallel")]
fn sort_triples<K: Send>(triples: &mut [DistanceTriple<K>]) {
    triples.par_sort_by(|left, right| left.distance.total_cmp(&right.distance));
}

#[cfg(not(feature = "parallel"))]
fn sort_triples<K>(triples: &mut [DistanceTriple<K>]) {
    triples.sort_by(|left, right| left.distance.total_cmp(&right.distance));
}
