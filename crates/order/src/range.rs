//! Closed intervals over ordered values.

use crate::comparator::{AdvancedComparator, Comparator, Direction};
use crate::entire::Entire;
use core::cmp::Ordering;

/// A closed interval `[min, max]` of infinity-extended endpoints.
///
/// Open endpoints do not exist at this level: inequality predicates are
/// converted to closed endpoints at construction by shifting the boundary
/// value through `AdvancedComparator::nearest`. A range whose min exceeds
/// its max denotes the empty interval.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range<T> {
    min: Entire<T>,
    max: Entire<T>,
}

impl<T: Clone> Range<T> {
    /// Creates a range from explicit endpoints.
    pub fn new(min: Entire<T>, max: Entire<T>) -> Self {
        Self { min, max }
    }

    /// Creates the full range (−∞, +∞).
    pub fn full() -> Self {
        Self {
            min: Entire::NegativeInfinity,
            max: Entire::PositiveInfinity,
        }
    }

    /// Creates a single-point range [v, v].
    pub fn point(value: T) -> Self {
        Self {
            min: Entire::Value(value.clone()),
            max: Entire::Value(value),
        }
    }

    /// Returns the lower endpoint.
    #[inline]
    pub fn min(&self) -> &Entire<T> {
        &self.min
    }

    /// Returns the upper endpoint.
    #[inline]
    pub fn max(&self) -> &Entire<T> {
        &self.max
    }

    /// Returns true if the interval contains no value.
    pub fn is_empty<C: Comparator<T>>(&self, cmp: &C) -> bool {
        self.min.compare_with(&self.max, cmp) == Ordering::Greater
    }

    /// Returns true if the interval covers (−∞, +∞).
    pub fn is_full(&self) -> bool {
        matches!(self.min, Entire::NegativeInfinity) && matches!(self.max, Entire::PositiveInfinity)
    }

    /// Returns true if the value lies inside the interval.
    pub fn contains<C: Comparator<T>>(&self, value: &T, cmp: &C) -> bool {
        let v = Entire::Value(value.clone());
        self.min.compare_with(&v, cmp) != Ordering::Greater
            && v.compare_with(&self.max, cmp) != Ordering::Greater
    }

    /// Returns true if the two intervals share at least one value.
    pub fn intersects<C: Comparator<T>>(&self, other: &Range<T>, cmp: &C) -> bool {
        !self.is_empty(cmp)
            && !other.is_empty(cmp)
            && self.min.compare_with(&other.max, cmp) != Ordering::Greater
            && other.min.compare_with(&self.max, cmp) != Ordering::Greater
    }

    /// Intersects two intervals; None when they do not overlap.
    pub fn intersect<C: Comparator<T>>(&self, other: &Range<T>, cmp: &C) -> Option<Range<T>> {
        let min = if self.min.compare_with(&other.min, cmp) == Ordering::Less {
            other.min.clone()
        } else {
            self.min.clone()
        };
        let max = if self.max.compare_with(&other.max, cmp) == Ordering::Greater {
            other.max.clone()
        } else {
            self.max.clone()
        };
        let range = Range::new(min, max);
        if range.is_empty(cmp) {
            None
        } else {
            Some(range)
        }
    }

    /// Returns true if `other` starts exactly where this interval ends,
    /// with no representable value between them.
    pub fn touches<C: AdvancedComparator<T>>(&self, other: &Range<T>, cmp: &C) -> bool {
        match endpoint_successor(&self.max, cmp) {
            Some(succ) => succ.compare_with(&other.min, cmp) == Ordering::Equal,
            None => false,
        }
    }
}

/// The immediate successor of an endpoint, if one exists.
pub(crate) fn endpoint_successor<T, C: AdvancedComparator<T>>(
    endpoint: &Entire<T>,
    cmp: &C,
) -> Option<Entire<T>> {
    match endpoint {
        Entire::Value(v) => cmp.nearest(v, Direction::Positive).map(Entire::Value),
        _ => None,
    }
}

/// The immediate predecessor of an endpoint, if one exists.
pub(crate) fn endpoint_predecessor<T, C: AdvancedComparator<T>>(
    endpoint: &Entire<T>,
    cmp: &C,
) -> Option<Entire<T>> {
    match endpoint {
        Entire::Value(v) => cmp.nearest(v, Direction::Negative).map(Entire::Value),
        _ => None,
    }
}
