//! Value type definitions for Tessera tuples.
//!
//! This module defines the `Value` enum which represents any value that can be
//! stored in a tuple field.

use crate::types::DataType;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

/// A value stored in a tuple field.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// DateTime stored as Unix timestamp in milliseconds
    DateTime(i64),
    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the data type of this value, or None if it's Null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::String),
            Value::DateTime(_) => Some(DataType::DateTime),
            Value::Bytes(_) => Some(DataType::Bytes),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i32 value if this is an Int32, None otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i64 value if this is an Int64, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the f64 value if this is a Float64, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the datetime timestamp if this is a DateTime, None otherwise.
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the bytes if this is Bytes, None otherwise.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Creates a default value for the given data type.
    pub fn default_for_type(dt: DataType) -> Self {
        match dt {
            DataType::Boolean => Value::Boolean(false),
            DataType::Int32 => Value::Int32(0),
            DataType::Int64 => Value::Int64(0),
            DataType::Float64 => Value::Float64(0.0),
            DataType::String => Value::String(String::new()),
            DataType::DateTime => Value::DateTime(0),
            DataType::Bytes => Value::Bytes(Vec::new()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Boolean(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Int32(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            Value::Int64(v) => {
                3u8.hash(state);
                v.hash(state);
            }
            Value::Float64(v) => {
                // Hash by bit pattern so that equal values hash equally;
                // all NaN payloads collapse to one bucket.
                4u8.hash(state);
                if v.is_nan() {
                    f64::NAN.to_bits().hash(state);
                } else {
                    v.to_bits().hash(state);
                }
            }
            Value::String(v) => {
                5u8.hash(state);
                v.hash(state);
            }
            Value::DateTime(v) => {
                6u8.hash(state);
                v.hash(state);
            }
            Value::Bytes(v) => {
                7u8.hash(state);
                v.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Int32(1).data_type(), Some(DataType::Int32));
        assert_eq!(
            Value::String("x".to_string()).data_type(),
            Some(DataType::String)
        );
        assert_eq!(Value::Bytes(vec![1, 2]).data_type(), Some(DataType::Bytes));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Int32(7).as_i32(), Some(7));
        assert_eq!(Value::Int64(7).as_i64(), Some(7));
        assert_eq!(Value::Float64(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::String("a".to_string()).as_str(), Some("a"));
        assert_eq!(Value::DateTime(99).as_datetime(), Some(99));
        assert_eq!(Value::Int32(7).as_i64(), None);
    }

    #[test]
    fn test_value_nan_equality() {
        assert_eq!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
        assert_ne!(Value::Float64(f64::NAN), Value::Float64(1.0));
    }

    #[test]
    fn test_default_for_type() {
        assert_eq!(Value::default_for_type(DataType::Int64), Value::Int64(0));
        assert_eq!(
            Value::default_for_type(DataType::String),
            Value::String(String::new())
        );
        assert_eq!(
            Value::default_for_type(DataType::Boolean),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_value_hash_consistency() {
        use core::hash::{Hash, Hasher};

        fn hash_of(v: &Value) -> u64 {
            // FNV-1a, enough for a stable test hash
            struct Fnv(u64);
            impl Hasher for Fnv {
                fn finish(&self) -> u64 {
                    self.0
                }
                fn write(&mut self, bytes: &[u8]) {
                    for b in bytes {
                        self.0 ^= *b as u64;
                        self.0 = self.0.wrapping_mul(0x100000001b3);
                    }
                }
            }
            let mut h = Fnv(0xcbf29ce484222325);
            v.hash(&mut h);
            h.finish()
        }

        assert_eq!(hash_of(&Value::Int32(5)), hash_of(&Value::Int32(5)));
        assert_eq!(
            hash_of(&Value::Float64(f64::NAN)),
            hash_of(&Value::Float64(f64::NAN))
        );
    }
}
