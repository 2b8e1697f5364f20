//! Infinity-extended values for range endpoints.

use crate::comparator::Comparator;
use core::cmp::Ordering;

/// A value extended with infinity sentinels, used as a range endpoint.
///
/// Infinities compare outside all finite values; two `Entire` values compare
/// by sentinel kind first, then by wrapped value under the supplied
/// comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entire<T> {
    /// Below every finite value.
    NegativeInfinity,
    /// A finite value.
    Value(T),
    /// Above every finite value.
    PositiveInfinity,
}

impl<T> Entire<T> {
    /// Returns true if this endpoint wraps a finite value.
    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, Entire::Value(_))
    }

    /// Returns the wrapped value, if finite.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Entire::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two endpoints under the given comparator.
    pub fn compare_with<C: Comparator<T>>(&self, other: &Entire<T>, cmp: &C) -> Ordering {
        match (self, other) {
            (Entire::NegativeInfinity, Entire::NegativeInfinity) => Ordering::Equal,
            (Entire::PositiveInfinity, Entire::PositiveInfinity) => Ordering::Equal,
            (Entire::NegativeInfinity, _) => Ordering::Less,
            (_, Entire::NegativeInfinity) => Ordering::Greater,
            (Entire::PositiveInfinity, _) => Ordering::Greater,
            (_, Entire::PositiveInfinity) => Ordering::Less,
            (Entire::Value(a), Entire::Value(b)) => cmp.compare(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::ValueComparator;
    use tessera_core::Value;

    #[test]
    fn test_entire_ordering() {
        let cmp = ValueComparator::new();
        let neg: Entire<Value> = Entire::NegativeInfinity;
        let pos: Entire<Value> = Entire::PositiveInfinity;
        let five = Entire::Value(Value::Int64(5));
        let six = Entire::Value(Value::Int64(6));

        assert_eq!(neg.compare_with(&five, &cmp), Ordering::Less);
        assert_eq!(pos.compare_with(&five, &cmp), Ordering::Greater);
        assert_eq!(neg.compare_with(&pos, &cmp), Ordering::Less);
        assert_eq!(five.compare_with(&six, &cmp), Ordering::Less);
        assert_eq!(five.compare_with(&five, &cmp), Ordering::Equal);
    }

    #[test]
    fn test_entire_accessors() {
        let five = Entire::Value(Value::Int64(5));
        assert!(five.is_finite());
        assert_eq!(five.as_value(), Some(&Value::Int64(5)));
        assert!(!Entire::<Value>::PositiveInfinity.is_finite());
        assert_eq!(Entire::<Value>::NegativeInfinity.as_value(), None);
    }
}
