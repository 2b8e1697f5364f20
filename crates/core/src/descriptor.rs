//! Tuple descriptor definitions.
//!
//! A `TupleDescriptor` is the immutable field schema shared by every tuple
//! and tuple view that carries the same shape. Descriptors are shared by
//! `Arc` reference; interning by content is left to callers.

use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Immutable ordered list of field types defining a tuple's shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleDescriptor {
    fields: Vec<DataType>,
}

impl TupleDescriptor {
    /// Creates a descriptor from an ordered list of field types.
    pub fn new(fields: Vec<DataType>) -> Self {
        Self { fields }
    }

    /// Returns the number of fields.
    #[inline]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the descriptor has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the field types in order.
    #[inline]
    pub fn fields(&self) -> &[DataType] {
        &self.fields
    }

    /// Returns the type of the field at the given index.
    pub fn field_type(&self, index: usize) -> Result<DataType> {
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| Error::field_out_of_bounds(index, self.fields.len()))
    }

    /// Returns the default value for the field at the given index.
    pub fn default_value(&self, index: usize) -> Result<Value> {
        Ok(Value::default_for_type(self.field_type(index)?))
    }

    /// Builds the descriptor of two descriptors appended in sequence.
    pub fn concat(first: &TupleDescriptor, second: &TupleDescriptor) -> Arc<TupleDescriptor> {
        let mut fields = Vec::with_capacity(first.arity() + second.arity());
        fields.extend_from_slice(first.fields());
        fields.extend_from_slice(second.fields());
        Arc::new(TupleDescriptor::new(fields))
    }

    /// Builds the descriptor of a contiguous segment of this descriptor.
    ///
    /// Segments may extend past the end of the source; the out-of-range tail
    /// keeps the requested length and is typed by the supplied filler.
    pub fn segment(&self, offset: usize, len: usize, filler: DataType) -> Arc<TupleDescriptor> {
        let fields = (offset..offset + len)
            .map(|i| self.fields.get(i).copied().unwrap_or(filler))
            .collect();
        Arc::new(TupleDescriptor::new(fields))
    }
}
