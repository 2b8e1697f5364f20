//! Error types for the Tessera workspace.

use crate::types::DataType;
use alloc::string::String;
use core::fmt;

/// Result type alias for Tessera operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Tessera operations.
///
/// All of these are deterministic validation failures surfaced synchronously
/// to the caller; none are retryable, since compilation over the same input
/// fails the same way again.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Value kind does not match the descriptor field type.
    TypeMismatch {
        expected: DataType,
        got: Option<DataType>,
    },
    /// Field index outside the tuple descriptor.
    FieldOutOfBounds {
        index: usize,
        arity: usize,
    },
    /// Write attempted through a read-only tuple view.
    ReadOnlyTuple,
    /// Total-order comparison requested between values with no common order.
    UnsupportedComparison {
        left: Option<DataType>,
        right: Option<DataType>,
    },
    /// Plan cannot be corrected into a valid ordered execution.
    InvalidPlan {
        message: String,
    },
    /// Composite index range built over fewer than two key columns.
    MalformedCompositeKey {
        columns: usize,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { expected, got } => match got {
                Some(got) => write!(f, "Type mismatch: expected {}, got {}", expected, got),
                None => write!(f, "Type mismatch: expected {}, got Null", expected),
            },
            Error::FieldOutOfBounds { index, arity } => {
                write!(f, "Field index {} out of bounds for arity {}", index, arity)
            }
            Error::ReadOnlyTuple => {
                write!(f, "Write attempted through a read-only tuple")
            }
            Error::UnsupportedComparison { left, right } => {
                write!(f, "No total order between {:?} and {:?}", left, right)
            }
            Error::InvalidPlan { message } => {
                write!(f, "Invalid plan: {}", message)
            }
            Error::MalformedCompositeKey { columns } => {
                write!(
                    f,
                    "Composite key range requires at least 2 columns, got {}",
                    columns
                )
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: DataType, got: Option<DataType>) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates a field out-of-bounds error.
    pub fn field_out_of_bounds(index: usize, arity: usize) -> Self {
        Error::FieldOutOfBounds { index, arity }
    }

    /// Creates a read-only violation error.
    pub fn read_only() -> Self {
        Error::ReadOnlyTuple
    }

    /// Creates an unsupported comparison error.
    pub fn unsupported_comparison(left: Option<DataType>, right: Option<DataType>) -> Self {
        Error::UnsupportedComparison { left, right }
    }

    /// Creates an invalid plan error.
    pub fn invalid_plan(message: impl Into<String>) -> Self {
        Error::InvalidPlan {
            message: message.into(),
        }
    }

    /// Creates a malformed composite key error.
    pub fn malformed_composite_key(columns: usize) -> Self {
        Error::MalformedCompositeKey { columns }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }
}
