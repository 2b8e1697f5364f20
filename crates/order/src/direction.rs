//! Direction collections: the sort key of a data stream.

use crate::comparator::Order;
use alloc::vec::Vec;

/// An ordered mapping from column ordinal to sort direction.
///
/// A `DirectionCollection` describes the ordering a data stream is sorted by:
/// first by the first entry's column, then the second, and so on. Equality
/// and prefix comparisons between collections drive the ordering corrector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionCollection {
    items: Vec<(usize, Order)>,
}

impl DirectionCollection {
    /// Creates an empty collection (no ordering).
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a collection from (column ordinal, order) pairs.
    pub fn from_pairs(items: Vec<(usize, Order)>) -> Self {
        Self { items }
    }

    /// Creates a single-column ascending ordering.
    pub fn asc(column: usize) -> Self {
        Self::from_pairs(alloc::vec![(column, Order::Asc)])
    }

    /// Creates a single-column descending ordering.
    pub fn desc(column: usize) -> Self {
        Self::from_pairs(alloc::vec![(column, Order::Desc)])
    }

    /// Appends a column to the sort key.
    pub fn push(&mut self, column: usize, order: Order) {
        self.items.push((column, order));
    }

    /// Returns the number of sort columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection defines no ordering.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the (column, order) pairs in sort-key order.
    #[inline]
    pub fn pairs(&self) -> &[(usize, Order)] {
        &self.items
    }

    /// Iterates over the (column, order) pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(usize, Order)> {
        self.items.iter()
    }

    /// Returns true if this collection is a (weak) prefix of `other`:
    /// a stream ordered by `other` is also ordered by `self`.
    pub fn is_prefix_of(&self, other: &DirectionCollection) -> bool {
        self.items.len() <= other.items.len()
            && self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }

    /// Returns true if every sort column is contained in `columns`.
    pub fn covered_by(&self, columns: &[usize]) -> bool {
        self.items.iter().all(|(col, _)| columns.contains(col))
    }

    /// Rewrites column ordinals through a projection: sort column `c`
    /// becomes the position of `c` within `columns`. Columns not projected
    /// are dropped, along with everything after them (the ordering is only
    /// meaningful up to the first missing column).
    pub fn project(&self, columns: &[usize]) -> DirectionCollection {
        let mut projected = DirectionCollection::new();
        for &(col, order) in &self.items {
            match columns.iter().position(|&c| c == col) {
                Some(new_ordinal) => projected.push(new_ordinal, order),
                None => break,
            }
        }
        projected
    }
}
