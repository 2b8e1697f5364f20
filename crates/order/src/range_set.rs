//! Disjoint interval sets with set algebra.

use crate::comparator::{AdvancedComparator, ValueComparator};
use crate::entire::Entire;
use crate::range::{endpoint_predecessor, endpoint_successor, Range};
use alloc::vec::Vec;
use core::cmp::Ordering;
use tessera_core::Value;

/// A `RangeSet` over `Value` under the standard comparator.
pub type ValueRangeSet = RangeSet<Value, ValueComparator>;

/// An ordered, non-overlapping, non-adjacent collection of closed ranges,
/// paired with the comparator defining the value order.
///
/// Every algebraic operation (intersect, unite, invert) re-normalizes, so
/// structural equality of two range sets is semantic equality.
#[derive(Clone, Debug)]
pub struct RangeSet<T, C> {
    ranges: Vec<Range<T>>,
    comparator: C,
}

impl<T: Clone, C: AdvancedComparator<T> + Clone> RangeSet<T, C> {
    /// Creates an empty set.
    pub fn empty(comparator: C) -> Self {
        Self {
            ranges: Vec::new(),
            comparator,
        }
    }

    /// Creates the full set covering (−∞, +∞).
    pub fn full(comparator: C) -> Self {
        Self {
            ranges: alloc::vec![Range::full()],
            comparator,
        }
    }

    /// Collapses a statically-known predicate to the full or empty set.
    pub fn full_or_empty(condition: bool, comparator: C) -> Self {
        if condition {
            Self::full(comparator)
        } else {
            Self::empty(comparator)
        }
    }

    /// Creates a set from a single range.
    pub fn from_range(range: Range<T>, comparator: C) -> Self {
        let mut set = Self::empty(comparator);
        if !range.is_empty(&set.comparator) {
            set.ranges.push(range);
        }
        set
    }

    /// Creates a set from arbitrary ranges, normalizing them.
    pub fn from_ranges(ranges: Vec<Range<T>>, comparator: C) -> Self {
        let ranges = normalize(ranges, &comparator);
        Self { ranges, comparator }
    }

    /// Returns the normalized ranges in ascending order.
    #[inline]
    pub fn ranges(&self) -> &[Range<T>] {
        &self.ranges
    }

    /// Returns the comparator defining the value order.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns true if the set contains no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true if the set covers (−∞, +∞).
    pub fn is_full(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_full()
    }

    /// Returns true if the value lies in some range of the set.
    pub fn contains(&self, value: &T) -> bool {
        self.ranges
            .iter()
            .any(|r| r.contains(value, &self.comparator))
    }

    /// Produces the union of two sets.
    pub fn unite(&self, other: &RangeSet<T, C>) -> RangeSet<T, C> {
        let mut ranges = self.ranges.clone();
        ranges.extend_from_slice(&other.ranges);
        RangeSet {
            ranges: normalize(ranges, &self.comparator),
            comparator: self.comparator.clone(),
        }
    }

    /// Produces the intersection of two sets by merge-walking the two
    /// sorted range lists.
    pub fn intersect(&self, other: &RangeSet<T, C>) -> RangeSet<T, C> {
        let cmp = &self.comparator;
        let mut result = Vec::new();
        let mut i = 0;
        let mut j = 0;
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = &self.ranges[i];
            let b = &other.ranges[j];
            if let Some(overlap) = a.intersect(b, cmp) {
                result.push(overlap);
            }
            // Advance whichever range ends first
            if a.max().compare_with(b.max(), cmp) == Ordering::Greater {
                j += 1;
            } else {
                i += 1;
            }
        }
        RangeSet {
            ranges: result,
            comparator: self.comparator.clone(),
        }
    }

    /// Produces the complement relative to (−∞, +∞).
    pub fn invert(&self) -> RangeSet<T, C> {
        let cmp = &self.comparator;
        let mut result = Vec::new();
        let mut cursor = Entire::NegativeInfinity;
        let mut cursor_open = true;

        for range in &self.ranges {
            // The gap before this range ends just below its min. A missing
            // predecessor means min is the domain minimum and the gap is empty.
            if cursor_open {
                if let Some(gap_end) = endpoint_predecessor(range.min(), cmp) {
                    let gap = Range::new(cursor.clone(), gap_end);
                    if !gap.is_empty(cmp) {
                        result.push(gap);
                    }
                }
            }
            match endpoint_successor(range.max(), cmp) {
                Some(next) => {
                    cursor = next;
                    cursor_open = true;
                }
                None => {
                    // max is +∞ or the domain maximum: nothing lies above
                    cursor_open = false;
                }
            }
        }

        if cursor_open {
            result.push(Range::new(cursor, Entire::PositiveInfinity));
        }

        RangeSet {
            ranges: normalize(result, cmp),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T, C> PartialEq for RangeSet<T, C>
where
    T: Clone + PartialEq,
    C: AdvancedComparator<T> + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

/// Sorts ranges by lower endpoint, drops empty ones and coalesces
/// overlapping or adjacent neighbors.
fn normalize<T: Clone, C: AdvancedComparator<T>>(ranges: Vec<Range<T>>, cmp: &C) -> Vec<Range<T>> {
    let mut ranges: Vec<Range<T>> = ranges.into_iter().filter(|r| !r.is_empty(cmp)).collect();
    ranges.sort_by(|a, b| a.min().compare_with(b.min(), cmp));

    let mut result: Vec<Range<T>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match result.last_mut() {
            Some(last)
                if last.max().compare_with(range.min(), cmp) != Ordering::Less
                    || last.touches(&range, cmp) =>
            {
                if last.max().compare_with(range.max(), cmp) == Ordering::Less {
                    *last = Range::new(last.min().clone(), range.max().clone());
                }
            }
            _ => result.push(range),
        }
    }
    result
}
