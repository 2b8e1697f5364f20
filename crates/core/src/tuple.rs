//! Tuple trait and owning tuple implementation.
//!
//! A tuple is a fixed-arity container of typed field slots bound to a
//! `TupleDescriptor`. Each field carries a tri-state availability flag in
//! addition to its value; the value and the state are always read together.

use crate::descriptor::TupleDescriptor;
use crate::error::{Error, Result};
use crate::value::Value;
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::{Hash, Hasher};

/// Availability state of a single tuple field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// The field holds a real value.
    Available,
    /// The field was never set; the descriptor default applies.
    Default,
    /// The field holds an explicit null.
    Null,
}

/// A source tuple shared between views.
///
/// Views hold shared ownership of their sources and route reads and writes
/// through them; a view never outlives the tuples it projects.
pub type SharedTuple = Rc<RefCell<dyn Tuple>>;

/// Common contract of owning tuples and tuple views.
///
/// `get`, `set`, `state` and `set_state` validate the field index against the
/// descriptor and fail with `Error::FieldOutOfBounds` outside it. Writes
/// through a read-only implementation fail with `Error::ReadOnlyTuple` and
/// leave the underlying storage untouched.
pub trait Tuple {
    /// Returns the descriptor defining this tuple's shape.
    fn descriptor(&self) -> &Arc<TupleDescriptor>;

    /// Reads the value and state of the field at the given index.
    fn get(&self, index: usize) -> Result<(Value, FieldState)>;

    /// Writes a value to the field at the given index.
    ///
    /// The field state becomes `Available`, or `Null` when the value is
    /// `Value::Null`.
    fn set(&mut self, index: usize, value: Value) -> Result<()>;

    /// Reads the state of the field at the given index.
    fn state(&self, index: usize) -> Result<FieldState>;

    /// Writes the state of the field at the given index.
    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()>;

    /// Returns true if writes through this tuple are rejected.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Returns the number of fields.
    fn arity(&self) -> usize {
        self.descriptor().arity()
    }

    /// Builds an independent eager copy of this tuple.
    ///
    /// The copy observes exactly the same values and states as the original
    /// at the time of the call and shares no storage with it.
    fn materialize(&self) -> Result<ValueTuple> {
        let descriptor = self.descriptor().clone();
        let mut fields = Vec::with_capacity(descriptor.arity());
        for index in 0..descriptor.arity() {
            fields.push(self.get(index)?);
        }
        ValueTuple::from_fields(descriptor, fields)
    }

    /// Compares this tuple field-by-field with another.
    ///
    /// Tuples are equal when their descriptors are structurally equal and
    /// every field agrees on both value and state.
    fn tuple_eq(&self, other: &dyn Tuple) -> bool {
        if self.descriptor() != other.descriptor() {
            return false;
        }
        for index in 0..self.arity() {
            match (self.get(index), other.get(index)) {
                (Ok(a), Ok(b)) if a == b => {}
                _ => return false,
            }
        }
        true
    }

    /// Computes a content hash consistent with `tuple_eq`.
    fn tuple_hash(&self) -> u64 {
        let mut hasher = FnvHasher::new();
        for index in 0..self.arity() {
            if let Ok((value, state)) = self.get(index) {
                state.hash(&mut hasher);
                value.hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// A simple hasher for computing tuple content hashes.
/// Uses FNV-1a which is fast and has good distribution.
pub(crate) struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub(crate) fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET,
        }
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= *byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

/// An owning tuple storing one value and one state per field.
#[derive(Clone, Debug)]
pub struct ValueTuple {
    descriptor: Arc<TupleDescriptor>,
    values: Vec<Value>,
    states: Vec<FieldState>,
}

impl ValueTuple {
    /// Creates a tuple with every field in the `Default` state.
    pub fn create(descriptor: Arc<TupleDescriptor>) -> Self {
        let arity = descriptor.arity();
        let values = (0..arity)
            .map(|i| descriptor.default_value(i).unwrap_or(Value::Null))
            .collect();
        Self {
            descriptor,
            values,
            states: alloc::vec![FieldState::Default; arity],
        }
    }

    /// Creates a tuple from a list of values, validating each against the
    /// descriptor. Null values get the `Null` state, all others `Available`.
    pub fn from_values(descriptor: Arc<TupleDescriptor>, values: Vec<Value>) -> Result<Self> {
        if values.len() != descriptor.arity() {
            return Err(Error::invalid_operation(
                "value count does not match descriptor arity",
            ));
        }
        let mut tuple = Self::create(descriptor);
        for (index, value) in values.into_iter().enumerate() {
            tuple.set(index, value)?;
        }
        Ok(tuple)
    }

    /// Creates a tuple from explicit (value, state) pairs.
    pub fn from_fields(
        descriptor: Arc<TupleDescriptor>,
        fields: Vec<(Value, FieldState)>,
    ) -> Result<Self> {
        if fields.len() != descriptor.arity() {
            return Err(Error::invalid_operation(
                "field count does not match descriptor arity",
            ));
        }
        let mut values = Vec::with_capacity(fields.len());
        let mut states = Vec::with_capacity(fields.len());
        for (value, state) in fields {
            values.push(value);
            states.push(state);
        }
        Ok(Self {
            descriptor,
            values,
            states,
        })
    }

    /// Wraps this tuple for sharing between views.
    pub fn into_shared(self) -> SharedTuple {
        Rc::new(RefCell::new(self))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.descriptor.arity() {
            Ok(())
        } else {
            Err(Error::field_out_of_bounds(index, self.descriptor.arity()))
        }
    }
}

impl Tuple for ValueTuple {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        self.check_index(index)?;
        let state = self.states[index];
        let value = match state {
            FieldState::Available => self.values[index].clone(),
            FieldState::Default => self.descriptor.default_value(index)?,
            FieldState::Null => Value::Null,
        };
        Ok((value, state))
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        self.check_index(index)?;
        if value.is_null() {
            self.values[index] = Value::Null;
            self.states[index] = FieldState::Null;
            return Ok(());
        }
        let expected = self.descriptor.field_type(index)?;
        if value.data_type() != Some(expected) {
            return Err(Error::type_mismatch(expected, value.data_type()));
        }
        self.values[index] = value;
        self.states[index] = FieldState::Available;
        Ok(())
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        self.check_index(index)?;
        Ok(self.states[index])
    }

    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()> {
        self.check_index(index)?;
        self.states[index] = state;
        Ok(())
    }
}

impl PartialEq for ValueTuple {
    fn eq(&self, other: &Self) -> bool {
        self.tuple_eq(other)
    }
}
