//! Data type definitions for Tessera tuples.

use core::fmt;

/// Semantic type of a tuple field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean
    Boolean,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// DateTime stored as Unix timestamp in milliseconds
    DateTime,
    /// Binary data
    Bytes,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "Boolean",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::String => "String",
            DataType::DateTime => "DateTime",
            DataType::Bytes => "Bytes",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Int32.to_string(), "Int32");
        assert_eq!(DataType::String.to_string(), "String");
        assert_eq!(DataType::DateTime.to_string(), "DateTime");
    }

    #[test]
    fn test_data_type_equality() {
        assert_eq!(DataType::Int64, DataType::Int64);
        assert_ne!(DataType::Int64, DataType::Int32);
    }
}
