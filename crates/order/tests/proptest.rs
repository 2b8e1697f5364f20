//! Property-based tests for tessera-order using proptest.

use proptest::prelude::*;
use tessera_core::Value;
use tessera_order::{
    AdvancedComparator, Comparator, Direction, Entire, Range, RangeSet, ValueComparator,
    ValueRangeSet,
};

fn int_range() -> impl Strategy<Value = Range<Value>> {
    (-1000i64..1000, 0i64..50).prop_map(|(min, span)| {
        Range::new(
            Entire::Value(Value::Int64(min)),
            Entire::Value(Value::Int64(min + span)),
        )
    })
}

fn int_range_set() -> impl Strategy<Value = ValueRangeSet> {
    prop::collection::vec(int_range(), 0..8)
        .prop_map(|ranges| RangeSet::from_ranges(ranges, ValueComparator::new()))
}

proptest! {
    /// Normalized sets are sorted, disjoint and non-adjacent.
    #[test]
    fn range_set_is_normalized(set in int_range_set()) {
        let cmp = ValueComparator::new();
        let ranges = set.ranges();
        for window in ranges.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            prop_assert!(!a.intersects(b, &cmp), "ranges must be disjoint");
            prop_assert!(!a.touches(b, &cmp), "ranges must not be adjacent");
            prop_assert_eq!(
                a.max().compare_with(b.min(), &cmp),
                std::cmp::Ordering::Less,
                "ranges must be sorted"
            );
        }
        for r in ranges {
            prop_assert!(!r.is_empty(&cmp), "empty ranges must be dropped");
        }
    }

    /// Double inversion returns the original set.
    #[test]
    fn invert_is_involutive(set in int_range_set()) {
        prop_assert_eq!(set.invert().invert(), set);
    }

    /// A set and its complement partition the full domain.
    #[test]
    fn invert_partitions_domain(set in int_range_set(), probe in -1100i64..1100) {
        let inv = set.invert();
        prop_assert!(set.intersect(&inv).is_empty());
        prop_assert!(set.unite(&inv).is_full());

        let v = Value::Int64(probe);
        prop_assert_ne!(set.contains(&v), inv.contains(&v));
    }

    /// Intersection is commutative.
    #[test]
    fn intersect_is_commutative(a in int_range_set(), b in int_range_set()) {
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    /// Union is commutative.
    #[test]
    fn unite_is_commutative(a in int_range_set(), b in int_range_set()) {
        prop_assert_eq!(a.unite(&b), b.unite(&a));
    }

    /// Membership distributes over intersection and union.
    #[test]
    fn membership_distributes(
        a in int_range_set(),
        b in int_range_set(),
        probe in -1100i64..1100
    ) {
        let v = Value::Int64(probe);
        let in_a = a.contains(&v);
        let in_b = b.contains(&v);
        prop_assert_eq!(a.intersect(&b).contains(&v), in_a && in_b);
        prop_assert_eq!(a.unite(&b).contains(&v), in_a || in_b);
    }

    /// Intersecting with the full set is the identity; with the empty set,
    /// the annihilator.
    #[test]
    fn intersect_identities(set in int_range_set()) {
        let cmp = ValueComparator::new();
        prop_assert_eq!(set.intersect(&RangeSet::full(cmp)), set.clone());
        prop_assert!(set.intersect(&RangeSet::empty(cmp)).is_empty());
    }

    /// Nearest-value queries return the immediate neighbor: strictly on the
    /// requested side, with the original value recoverable by stepping back.
    #[test]
    fn integer_nearest_is_adjacent(v in -10000i64..10000) {
        let cmp = ValueComparator::new();
        let value = Value::Int64(v);

        let succ = cmp.nearest(&value, Direction::Positive).unwrap();
        prop_assert!(cmp.is_less(&value, &succ));
        prop_assert_eq!(cmp.nearest(&succ, Direction::Negative), Some(value.clone()));

        let pred = cmp.nearest(&value, Direction::Negative).unwrap();
        prop_assert!(cmp.is_greater(&value, &pred));
        prop_assert_eq!(cmp.nearest(&pred, Direction::Positive), Some(value));
    }

    /// The string successor sorts strictly after the value and at or before
    /// any other string that sorts after it.
    #[test]
    fn string_successor_is_tight(s in "[a-z]{0,8}", other in "[a-z]{0,8}") {
        let cmp = ValueComparator::new();
        let value = Value::String(s);
        let other = Value::String(other);
        let succ = cmp.nearest(&value, Direction::Positive).unwrap();

        prop_assert!(cmp.is_less(&value, &succ));
        if cmp.is_less(&value, &other) {
            prop_assert!(cmp.is_less_or_equal(&succ, &other));
        }
    }

    /// Every string sharing the prefix falls inside [prefix, upper bound].
    #[test]
    fn prefix_bound_covers_extensions(prefix in "[a-z]{1,4}", suffix in "[a-z]{0,6}") {
        let cmp = ValueComparator::new();
        let base = Value::String(prefix.clone());
        let upper = cmp.prefix_upper_bound(&base).unwrap();
        let extended = Value::String(prefix + &suffix);

        prop_assert!(cmp.is_less_or_equal(&base, &extended));
        prop_assert!(cmp.is_less_or_equal(&extended, &upper));
    }
}
