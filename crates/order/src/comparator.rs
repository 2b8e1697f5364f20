//! Comparator implementations for ordered values.
//!
//! This module provides the comparison machinery used by ranges, range sets
//! and the ordering corrector: plain comparison plus nearest-value queries
//! (immediate successor or predecessor in the total order), which is how
//! open interval endpoints are converted to closed ones.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use tessera_core::{DataType, Error, Result, Value};

/// Sort order for a column or key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Ascending order (smallest first)
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl Order {
    /// Applies this order to a comparison result.
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Order::Asc => ord,
            Order::Desc => ord.reverse(),
        }
    }

    /// Returns the opposite order.
    #[inline]
    pub fn reversed(&self) -> Order {
        match self {
            Order::Asc => Order::Desc,
            Order::Desc => Order::Asc,
        }
    }
}

/// Direction of a nearest-value query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The immediate successor.
    Positive,
    /// The immediate predecessor.
    Negative,
}

/// Trait for comparing ordered values.
pub trait Comparator<K> {
    /// Compares two values according to the comparator's ordering.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns true if a < b according to this comparator.
    fn is_less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns true if a <= b according to this comparator.
    fn is_less_or_equal(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) != Ordering::Greater
    }

    /// Returns true if a > b according to this comparator.
    fn is_greater(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Returns true if a >= b according to this comparator.
    fn is_greater_or_equal(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    /// Returns true if a == b according to this comparator.
    fn is_equal(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

/// A comparator that can step to the immediate neighbor of a value.
pub trait AdvancedComparator<K>: Comparator<K> {
    /// Returns the immediate successor (`Positive`) or predecessor
    /// (`Negative`) of the value in the total order, or None when no such
    /// value exists (the value sits at the edge of its domain).
    fn nearest(&self, value: &K, direction: Direction) -> Option<K>;
}

/// The standard comparator over `Value`.
///
/// Within a kind, values follow their natural order; `Null` sorts before
/// everything else. Across kinds `compare` falls back to a stable kind rank
/// so that heterogeneous collections still sort deterministically, while
/// `try_compare` rejects mixed-kind comparisons outright — that is the
/// validation boundary predicate building runs through.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueComparator;

impl ValueComparator {
    /// Creates the standard value comparator.
    pub fn new() -> Self {
        Self
    }

    /// Compares two values, failing on kinds with no common total order.
    pub fn try_compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        match (a.data_type(), b.data_type()) {
            (None, _) | (_, None) => Ok(self.compare(a, b)),
            (Some(x), Some(y)) if x == y => Ok(self.compare(a, b)),
            (left, right) => Err(Error::unsupported_comparison(left, right)),
        }
    }

    /// Appends the maximal code unit to a string or bytes value, producing
    /// the upper endpoint of a prefix-match range. None for other kinds.
    pub fn prefix_upper_bound(&self, value: &Value) -> Option<Value> {
        match value {
            Value::String(s) => {
                let mut upper = s.clone();
                upper.push(char::MAX);
                Some(Value::String(upper))
            }
            Value::Bytes(b) => {
                let mut upper = b.clone();
                upper.push(u8::MAX);
                Some(Value::Bytes(upper))
            }
            _ => None,
        }
    }

    fn kind_rank(value: &Value) -> u8 {
        match value.data_type() {
            None => 0,
            Some(DataType::Boolean) => 1,
            Some(DataType::Int32) => 2,
            Some(DataType::Int64) => 3,
            Some(DataType::Float64) => 4,
            Some(DataType::String) => 5,
            Some(DataType::DateTime) => 6,
            Some(DataType::Bytes) => 7,
        }
    }

    fn compare_floats(a: f64, b: f64) -> Ordering {
        // Consistent with Value equality: NaN == NaN, NaN sorts last
        if a.is_nan() && b.is_nan() {
            Ordering::Equal
        } else if a.is_nan() {
            Ordering::Greater
        } else if b.is_nan() {
            Ordering::Less
        } else {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

impl Comparator<Value> for ValueComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
            (Value::Int32(x), Value::Int32(y)) => x.cmp(y),
            (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
            (Value::Float64(x), Value::Float64(y)) => Self::compare_floats(*x, *y),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
            (Value::Bytes(x), Value::Bytes(y)) => x.cmp(y),
            _ => Self::kind_rank(a).cmp(&Self::kind_rank(b)),
        }
    }
}

impl AdvancedComparator<Value> for ValueComparator {
    fn nearest(&self, value: &Value, direction: Direction) -> Option<Value> {
        match (value, direction) {
            (Value::Null, _) => None,

            (Value::Boolean(false), Direction::Positive) => Some(Value::Boolean(true)),
            (Value::Boolean(true), Direction::Negative) => Some(Value::Boolean(false)),
            (Value::Boolean(_), _) => None,

            (Value::Int32(v), Direction::Positive) => v.checked_add(1).map(Value::Int32),
            (Value::Int32(v), Direction::Negative) => v.checked_sub(1).map(Value::Int32),
            (Value::Int64(v), Direction::Positive) => v.checked_add(1).map(Value::Int64),
            (Value::Int64(v), Direction::Negative) => v.checked_sub(1).map(Value::Int64),
            (Value::DateTime(v), Direction::Positive) => v.checked_add(1).map(Value::DateTime),
            (Value::DateTime(v), Direction::Negative) => v.checked_sub(1).map(Value::DateTime),

            (Value::Float64(v), direction) => next_float(*v, direction).map(Value::Float64),

            (Value::String(s), Direction::Positive) => {
                // The next string after S is S with the minimal code unit
                // appended; nothing can sort between them.
                let mut next = s.clone();
                next.push('\0');
                Some(Value::String(next))
            }
            (Value::String(s), Direction::Negative) => previous_string(s).map(Value::String),

            (Value::Bytes(b), Direction::Positive) => {
                let mut next = b.clone();
                next.push(0);
                Some(Value::Bytes(next))
            }
            (Value::Bytes(b), Direction::Negative) => previous_bytes(b).map(Value::Bytes),
        }
    }
}

/// Steps a float to its immediate neighbor by bit pattern.
fn next_float(v: f64, direction: Direction) -> Option<f64> {
    if v.is_nan() {
        return None;
    }
    match direction {
        Direction::Positive => {
            if v == f64::INFINITY {
                None
            } else if v == 0.0 {
                Some(f64::from_bits(1))
            } else if v > 0.0 {
                Some(f64::from_bits(v.to_bits() + 1))
            } else {
                Some(f64::from_bits(v.to_bits() - 1))
            }
        }
        Direction::Negative => {
            if v == f64::NEG_INFINITY {
                None
            } else if v == 0.0 {
                Some(-f64::from_bits(1))
            } else if v < 0.0 {
                Some(f64::from_bits(v.to_bits() + 1))
            } else {
                Some(f64::from_bits(v.to_bits() - 1))
            }
        }
    }
}

/// The immediate predecessor of a string in lexicographic order.
///
/// A trailing minimal code unit is stripped exactly; otherwise the final
/// code unit is decremented and the maximal code unit appended, which is the
/// closest representable predecessor. The asymmetry with the successor
/// (append on increment, truncate on decrement) is what lets half-open
/// string intervals convert to closed ones without gaps.
fn previous_string(s: &str) -> Option<String> {
    let mut chars: Vec<char> = s.chars().collect();
    let last = chars.pop()?;
    if last == '\0' {
        return Some(chars.into_iter().collect());
    }
    chars.push(previous_char(last));
    chars.push(char::MAX);
    Some(chars.into_iter().collect())
}

/// The previous valid char, skipping the surrogate gap.
fn previous_char(c: char) -> char {
    if c == '\u{E000}' {
        '\u{D7FF}'
    } else {
        // c > '\0' here; every other predecessor code point is valid
        char::from_u32(c as u32 - 1).unwrap_or('\0')
    }
}

/// The immediate predecessor of a byte string in lexicographic order.
fn previous_bytes(b: &[u8]) -> Option<Vec<u8>> {
    let (&last, head) = b.split_last()?;
    let mut prev = head.to_vec();
    if last == 0 {
        return Some(prev);
    }
    prev.push(last - 1);
    prev.push(u8::MAX);
    Some(prev)
}
