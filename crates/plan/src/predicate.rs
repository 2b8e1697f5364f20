//! Range-set predicate builder.
//!
//! Translates column predicates against an index key schema into range sets
//! the index layer can scan, converting inequalities into closed endpoints
//! through nearest-value queries. Composite keys combine a boundary range
//! fixing the leading columns with a tight range bounding the last one.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use hashbrown::HashMap;
use tessera_core::{DataType, Error, Result, TupleDescriptor, Value};
use tessera_order::{
    AdvancedComparator, Comparator, Direction, Entire, Range, RangeSet, ValueComparator,
    ValueRangeSet,
};

/// Comparison operator of a column predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// String/bytes prefix match.
    LikeStartsWith,
    NotLikeStartsWith,
    /// String/bytes suffix match. No contiguous key range exists for this,
    /// so it always degrades to the full range; a downstream row filter
    /// restores exactness.
    LikeEndsWith,
}

/// One predicate over a key column: `column OP value`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPredicate {
    pub column: usize,
    pub op: CompareOp,
    pub value: Value,
}

impl ColumnPredicate {
    pub fn new(column: usize, op: CompareOp, value: Value) -> Self {
        Self { column, op, value }
    }
}

/// A composite key as used in range endpoints: one infinity-extended slot
/// per key column, so a partially-constrained endpoint pads the open tail
/// with a per-component infinity instead of truncating.
pub type CompositeKey = Vec<Entire<Value>>;

/// Lifts concrete key values into a fully finite [`CompositeKey`].
pub fn composite_key(values: &[Value]) -> CompositeKey {
    values.iter().cloned().map(Entire::Value).collect()
}

/// A range set over composite keys.
pub type CompositeRangeSet = RangeSet<CompositeKey, CompositeComparator>;

/// Lexicographic comparator over composite keys.
///
/// Composition is field-by-field with early exit on the first unequal
/// component; per-component infinities compare outside all finite values,
/// which is how a boundary endpoint like `(5, -inf)` sorts below every real
/// key starting with 5.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeComparator {
    inner: ValueComparator,
}

impl CompositeComparator {
    pub fn new() -> Self {
        Self {
            inner: ValueComparator::new(),
        }
    }
}

impl Comparator<CompositeKey> for CompositeComparator {
    fn compare(&self, a: &CompositeKey, b: &CompositeKey) -> Ordering {
        for (x, y) in a.iter().zip(b.iter()) {
            match x.compare_with(y, &self.inner) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl AdvancedComparator<CompositeKey> for CompositeComparator {
    fn nearest(&self, value: &CompositeKey, direction: Direction) -> Option<CompositeKey> {
        // Stepping the last component steps the whole key. Infinite or
        // domain-edge components have no representable neighbor here.
        let (last, head) = value.split_last()?;
        let stepped = match last {
            Entire::Value(v) => self.inner.nearest(v, direction)?,
            _ => return None,
        };
        let mut next = head.to_vec();
        next.push(Entire::Value(stepped));
        Some(next)
    }
}

/// Builds range sets from column predicates against one index key schema.
///
/// Endpoint values are captured once per build into a per-ordinal cache, so
/// a sub-expression feeding several endpoints is evaluated a single time.
pub struct RangeSetBuilder {
    key: Arc<TupleDescriptor>,
    comparator: ValueComparator,
    captured: HashMap<usize, Value>,
}

impl RangeSetBuilder {
    /// Creates a builder over the index key schema.
    pub fn new(key: Arc<TupleDescriptor>) -> Self {
        Self {
            key,
            comparator: ValueComparator::new(),
            captured: HashMap::new(),
        }
    }

    /// Builds the range set selecting the keys a single-column predicate
    /// matches.
    pub fn build(&mut self, predicate: &ColumnPredicate) -> Result<ValueRangeSet> {
        self.captured.clear();
        self.validate(predicate)?;
        let value = self.capture(predicate.column, &predicate.value);
        let cmp = self.comparator;

        let set = match predicate.op {
            CompareOp::Eq => RangeSet::from_range(Range::point(value), cmp),
            CompareOp::NotEq => RangeSet::from_range(Range::point(value), cmp).invert(),
            CompareOp::Lt => match cmp.nearest(&value, Direction::Negative) {
                Some(upper) => RangeSet::from_range(
                    Range::new(Entire::NegativeInfinity, Entire::Value(upper)),
                    cmp,
                ),
                // Nothing sorts below the domain minimum
                None => RangeSet::empty(cmp),
            },
            CompareOp::LtEq => RangeSet::from_range(
                Range::new(Entire::NegativeInfinity, Entire::Value(value)),
                cmp,
            ),
            CompareOp::Gt => match cmp.nearest(&value, Direction::Positive) {
                Some(lower) => RangeSet::from_range(
                    Range::new(Entire::Value(lower), Entire::PositiveInfinity),
                    cmp,
                ),
                None => RangeSet::empty(cmp),
            },
            CompareOp::GtEq => RangeSet::from_range(
                Range::new(Entire::Value(value), Entire::PositiveInfinity),
                cmp,
            ),
            CompareOp::LikeStartsWith => self.prefix_range(value)?,
            CompareOp::NotLikeStartsWith => self.prefix_range(value)?.invert(),
            CompareOp::LikeEndsWith => RangeSet::full(cmp),
        };
        Ok(set)
    }

    /// Builds the range set for a composite key: all columns but the last
    /// fixed by equality, the last bounded by an arbitrary operator.
    ///
    /// The result is the intersection of a boundary range holding the
    /// equality prefix and a tight range bounding the last column, which
    /// captures "first N-1 columns equal, last column satisfies OP" without
    /// over- or under-matching.
    pub fn build_composite(
        &mut self,
        predicates: &[ColumnPredicate],
    ) -> Result<CompositeRangeSet> {
        self.captured.clear();
        let (last, leading) = match predicates.split_last() {
            Some(split) if predicates.len() >= 2 => split,
            _ => return Err(Error::malformed_composite_key(predicates.len())),
        };
        for predicate in leading {
            if predicate.op != CompareOp::Eq {
                return Err(Error::invalid_operation(
                    "composite key predicates must fix the leading columns by equality",
                ));
            }
            self.validate(predicate)?;
        }
        self.validate(last)?;

        let cmp = CompositeComparator::new();
        let prefix: Vec<Value> = leading
            .iter()
            .map(|p| self.capture(p.column, &p.value))
            .collect();

        // Every key starting with the equality prefix, whatever its tail
        let boundary = RangeSet::from_range(
            Range::new(
                Entire::Value(extend(&prefix, Entire::NegativeInfinity)),
                Entire::Value(extend(&prefix, Entire::PositiveInfinity)),
            ),
            cmp,
        );
        let tight = self.composite_tail_range(&prefix, last, cmp)?;
        Ok(boundary.intersect(&tight))
    }

    /// The tight range over full keys implied by the last-column predicate.
    fn composite_tail_range(
        &mut self,
        prefix: &[Value],
        predicate: &ColumnPredicate,
        cmp: CompositeComparator,
    ) -> Result<CompositeRangeSet> {
        let value = self.capture(predicate.column, &predicate.value);

        let set = match predicate.op {
            CompareOp::Eq => {
                RangeSet::from_range(Range::point(extend_value(prefix, value)), cmp)
            }
            CompareOp::NotEq => {
                RangeSet::from_range(Range::point(extend_value(prefix, value)), cmp).invert()
            }
            CompareOp::Lt => match self.comparator.nearest(&value, Direction::Negative) {
                Some(upper) => RangeSet::from_range(
                    Range::new(
                        Entire::NegativeInfinity,
                        Entire::Value(extend_value(prefix, upper)),
                    ),
                    cmp,
                ),
                None => RangeSet::empty(cmp),
            },
            CompareOp::LtEq => RangeSet::from_range(
                Range::new(
                    Entire::NegativeInfinity,
                    Entire::Value(extend_value(prefix, value)),
                ),
                cmp,
            ),
            CompareOp::Gt => match self.comparator.nearest(&value, Direction::Positive) {
                Some(lower) => RangeSet::from_range(
                    Range::new(
                        Entire::Value(extend_value(prefix, lower)),
                        Entire::PositiveInfinity,
                    ),
                    cmp,
                ),
                None => RangeSet::empty(cmp),
            },
            CompareOp::GtEq => RangeSet::from_range(
                Range::new(
                    Entire::Value(extend_value(prefix, value)),
                    Entire::PositiveInfinity,
                ),
                cmp,
            ),
            CompareOp::LikeStartsWith => {
                let upper = self.prefix_upper(&value)?;
                RangeSet::from_range(
                    Range::new(
                        Entire::Value(extend_value(prefix, value)),
                        Entire::Value(extend_value(prefix, upper)),
                    ),
                    cmp,
                )
            }
            CompareOp::NotLikeStartsWith => {
                let upper = self.prefix_upper(&value)?;
                RangeSet::from_range(
                    Range::new(
                        Entire::Value(extend_value(prefix, value)),
                        Entire::Value(extend_value(prefix, upper)),
                    ),
                    cmp,
                )
                .invert()
            }
            CompareOp::LikeEndsWith => RangeSet::full(cmp),
        };
        Ok(set)
    }

    fn prefix_range(&self, value: Value) -> Result<ValueRangeSet> {
        let upper = self.prefix_upper(&value)?;
        Ok(RangeSet::from_range(
            Range::new(Entire::Value(value), Entire::Value(upper)),
            self.comparator,
        ))
    }

    fn prefix_upper(&self, value: &Value) -> Result<Value> {
        self.comparator
            .prefix_upper_bound(value)
            .ok_or_else(|| Error::type_mismatch(DataType::String, value.data_type()))
    }

    /// Checks the predicate against the key schema: the column must exist,
    /// the value kind must match the column kind, and inequality over null
    /// has no order to appeal to.
    fn validate(&self, predicate: &ColumnPredicate) -> Result<()> {
        let field = self.key.field_type(predicate.column)?;
        self.comparator
            .try_compare(&Value::default_for_type(field), &predicate.value)?;
        if predicate.value.is_null()
            && !matches!(predicate.op, CompareOp::Eq | CompareOp::NotEq)
        {
            return Err(Error::unsupported_comparison(None, Some(field)));
        }
        Ok(())
    }

    /// Captures an endpoint value through the single-use per-ordinal cache.
    fn capture(&mut self, column: usize, value: &Value) -> Value {
        self.captured
            .entry(column)
            .or_insert_with(|| value.clone())
            .clone()
    }
}

fn extend(prefix: &[Value], tail: Entire<Value>) -> CompositeKey {
    let mut key = composite_key(prefix);
    key.push(tail);
    key
}

fn extend_value(prefix: &[Value], tail: Value) -> CompositeKey {
    extend(prefix, Entire::Value(tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn int_key() -> Arc<TupleDescriptor> {
        Arc::new(TupleDescriptor::new(vec![DataType::Int64]))
    }

    fn pair_key() -> Arc<TupleDescriptor> {
        Arc::new(TupleDescriptor::new(vec![
            DataType::Int64,
            DataType::Int64,
        ]))
    }

    fn build(op: CompareOp, value: Value) -> ValueRangeSet {
        RangeSetBuilder::new(int_key())
            .build(&ColumnPredicate::new(0, op, value))
            .unwrap()
    }

    fn key2(a: i64, b: i64) -> CompositeKey {
        composite_key(&[Value::Int64(a), Value::Int64(b)])
    }

    #[test]
    fn test_eq_is_point_range() {
        let set = build(CompareOp::Eq, Value::Int64(5));
        assert_eq!(set.ranges(), &[Range::point(Value::Int64(5))]);
    }

    #[test]
    fn test_noteq_is_inverted_point() {
        let set = build(CompareOp::NotEq, Value::Int64(5));
        let expected =
            RangeSet::from_range(Range::point(Value::Int64(5)), ValueComparator::new()).invert();
        assert_eq!(set, expected);
        assert_eq!(set.ranges().len(), 2);
        assert!(!set.contains(&Value::Int64(5)));
        assert!(set.contains(&Value::Int64(4)));
        assert!(set.contains(&Value::Int64(6)));
    }

    #[test]
    fn test_inequalities_shift_open_endpoints() {
        let lt = build(CompareOp::Lt, Value::Int64(10));
        assert!(lt.contains(&Value::Int64(9)));
        assert!(!lt.contains(&Value::Int64(10)));

        let lteq = build(CompareOp::LtEq, Value::Int64(10));
        assert!(lteq.contains(&Value::Int64(10)));
        assert!(!lteq.contains(&Value::Int64(11)));

        let gt = build(CompareOp::Gt, Value::Int64(10));
        assert!(!gt.contains(&Value::Int64(10)));
        assert!(gt.contains(&Value::Int64(11)));

        let gteq = build(CompareOp::GtEq, Value::Int64(10));
        assert!(gteq.contains(&Value::Int64(10)));
        assert!(!gteq.contains(&Value::Int64(9)));
    }

    #[test]
    fn test_gt_domain_maximum_is_empty() {
        let set = build(CompareOp::Gt, Value::Int64(i64::MAX));
        assert!(set.is_empty());
    }

    #[test]
    fn test_prefix_match() {
        let key = Arc::new(TupleDescriptor::new(vec![DataType::String]));
        let mut builder = RangeSetBuilder::new(key);

        let set = builder
            .build(&ColumnPredicate::new(
                0,
                CompareOp::LikeStartsWith,
                Value::String("ab".into()),
            ))
            .unwrap();
        assert!(set.contains(&Value::String("ab".into())));
        assert!(set.contains(&Value::String("abzzz".into())));
        assert!(!set.contains(&Value::String("ac".into())));
        assert!(!set.contains(&Value::String("aa".into())));

        let inverted = builder
            .build(&ColumnPredicate::new(
                0,
                CompareOp::NotLikeStartsWith,
                Value::String("ab".into()),
            ))
            .unwrap();
        assert!(!inverted.contains(&Value::String("abzzz".into())));
        assert!(inverted.contains(&Value::String("ac".into())));
    }

    #[test]
    fn test_prefix_match_requires_string_key() {
        let mut builder = RangeSetBuilder::new(int_key());
        let err = builder
            .build(&ColumnPredicate::new(
                0,
                CompareOp::LikeStartsWith,
                Value::Int64(5),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_ends_with_degrades_to_full_range() {
        let key = Arc::new(TupleDescriptor::new(vec![DataType::String]));
        let set = RangeSetBuilder::new(key)
            .build(&ColumnPredicate::new(
                0,
                CompareOp::LikeEndsWith,
                Value::String("suffix".into()),
            ))
            .unwrap();
        assert!(set.is_full());
    }

    #[test]
    fn test_mixed_kind_value_rejected() {
        let mut builder = RangeSetBuilder::new(int_key());
        let err = builder
            .build(&ColumnPredicate::new(
                0,
                CompareOp::Eq,
                Value::String("5".into()),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedComparison { .. }));
    }

    #[test]
    fn test_null_inequality_rejected() {
        let mut builder = RangeSetBuilder::new(int_key());
        let err = builder
            .build(&ColumnPredicate::new(0, CompareOp::Lt, Value::Null))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedComparison { .. }));

        // Equality against null is a legitimate point lookup
        assert!(builder
            .build(&ColumnPredicate::new(0, CompareOp::Eq, Value::Null))
            .is_ok());
    }

    #[test]
    fn test_composite_requires_two_columns() {
        let mut builder = RangeSetBuilder::new(pair_key());
        let err = builder
            .build_composite(&[ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(5))])
            .unwrap_err();
        assert_eq!(err, Error::malformed_composite_key(1));

        let err = builder.build_composite(&[]).unwrap_err();
        assert_eq!(err, Error::malformed_composite_key(0));
    }

    #[test]
    fn test_composite_leading_columns_must_be_equality() {
        let mut builder = RangeSetBuilder::new(pair_key());
        let err = builder
            .build_composite(&[
                ColumnPredicate::new(0, CompareOp::Gt, Value::Int64(5)),
                ColumnPredicate::new(1, CompareOp::Eq, Value::Int64(1)),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation { .. }));
    }

    #[test]
    fn test_composite_equality_and_inequality() {
        // A = 5 AND B > 10
        let mut builder = RangeSetBuilder::new(pair_key());
        let set = builder
            .build_composite(&[
                ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(5)),
                ColumnPredicate::new(1, CompareOp::Gt, Value::Int64(10)),
            ])
            .unwrap();

        assert!(set.contains(&key2(5, 11)));
        assert!(set.contains(&key2(5, 1000)));
        assert!(!set.contains(&key2(5, 10)));
        assert!(!set.contains(&key2(5, 9)));
        assert!(!set.contains(&key2(4, 11)));
        assert!(!set.contains(&key2(6, 11)));
    }

    #[test]
    fn test_composite_matches_hand_built_intersection() {
        // The composite build must equal boundary ∩ tight built by hand
        let cmp = CompositeComparator::new();
        let boundary = RangeSet::from_range(
            Range::new(
                Entire::Value(vec![
                    Entire::Value(Value::Int64(5)),
                    Entire::NegativeInfinity,
                ]),
                Entire::Value(vec![
                    Entire::Value(Value::Int64(5)),
                    Entire::PositiveInfinity,
                ]),
            ),
            cmp,
        );
        let tight = RangeSet::from_range(
            Range::new(Entire::Value(key2(5, 11)), Entire::PositiveInfinity),
            cmp,
        );
        let expected = boundary.intersect(&tight);

        let mut builder = RangeSetBuilder::new(pair_key());
        let set = builder
            .build_composite(&[
                ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(5)),
                ColumnPredicate::new(1, CompareOp::Gt, Value::Int64(10)),
            ])
            .unwrap();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_composite_noteq_excludes_single_key() {
        // A = 5 AND B != 10
        let mut builder = RangeSetBuilder::new(pair_key());
        let set = builder
            .build_composite(&[
                ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(5)),
                ColumnPredicate::new(1, CompareOp::NotEq, Value::Int64(10)),
            ])
            .unwrap();

        assert!(!set.contains(&key2(5, 10)));
        assert!(set.contains(&key2(5, 9)));
        assert!(set.contains(&key2(5, 11)));
        assert!(!set.contains(&key2(4, 9)));
        assert!(!set.contains(&key2(6, 11)));
    }

    #[test]
    fn test_composite_three_columns() {
        // A = 1 AND B = 2 AND C <= 30
        let key = Arc::new(TupleDescriptor::new(vec![
            DataType::Int64,
            DataType::Int64,
            DataType::Int64,
        ]));
        let mut builder = RangeSetBuilder::new(key);
        let set = builder
            .build_composite(&[
                ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(1)),
                ColumnPredicate::new(1, CompareOp::Eq, Value::Int64(2)),
                ColumnPredicate::new(2, CompareOp::LtEq, Value::Int64(30)),
            ])
            .unwrap();

        let key3 = |a, b, c| composite_key(&[Value::Int64(a), Value::Int64(b), Value::Int64(c)]);
        assert!(set.contains(&key3(1, 2, 30)));
        assert!(set.contains(&key3(1, 2, -100)));
        assert!(!set.contains(&key3(1, 2, 31)));
        assert!(!set.contains(&key3(1, 3, 0)));
        assert!(!set.contains(&key3(0, 2, 0)));
    }

    #[test]
    fn test_capture_is_single_use_per_build() {
        let mut builder = RangeSetBuilder::new(int_key());
        // First build caches column 0's value; a second build must not see it
        let first = builder
            .build(&ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(1)))
            .unwrap();
        let second = builder
            .build(&ColumnPredicate::new(0, CompareOp::Eq, Value::Int64(2)))
            .unwrap();
        assert!(first.contains(&Value::Int64(1)));
        assert!(second.contains(&Value::Int64(2)));
        assert!(!second.contains(&Value::Int64(1)));
    }

    #[test]
    fn test_composite_comparator_ordering() {
        let cmp = CompositeComparator::new();
        let low = extend(&[Value::Int64(5)], Entire::NegativeInfinity);
        let mid = key2(5, 10);
        let high = extend(&[Value::Int64(5)], Entire::PositiveInfinity);
        let other = key2(6, 0);

        assert!(cmp.is_less(&low, &mid));
        assert!(cmp.is_less(&mid, &high));
        assert!(cmp.is_less(&high, &other));
        assert_eq!(cmp.compare(&mid, &mid), Ordering::Equal);
    }
}
