//! Tessera Core - value, tuple and tuple-view types for the Tessera query compiler.
//!
//! This crate provides the foundational types shared by the rest of the workspace:
//!
//! - `DataType`: supported field types (Boolean, Int32, Int64, Float64, String, DateTime, Bytes)
//! - `Value`: runtime values stored in tuple fields
//! - `TupleDescriptor`: immutable, `Arc`-shared field schema of a tuple
//! - `Tuple` / `ValueTuple`: tri-state field container bound to a descriptor
//! - `views`: allocation-light map/segment/concat/combine/read-only projections
//!   over one or more source tuples
//! - `Error`: error types for the whole workspace
//!
//! # Example
//!
//! ```rust
//! use tessera_core::{DataType, FieldState, Tuple, TupleDescriptor, Value, ValueTuple};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(TupleDescriptor::new(vec![
//!     DataType::Int64,
//!     DataType::String,
//! ]));
//!
//! let mut tuple = ValueTuple::create(descriptor);
//! assert_eq!(tuple.state(0).unwrap(), FieldState::Default);
//!
//! tuple.set(0, Value::Int64(42)).unwrap();
//! assert_eq!(tuple.get(0).unwrap(), (Value::Int64(42), FieldState::Available));
//! ```

#![no_std]

extern crate alloc;

mod descriptor;
mod error;
mod tuple;
mod types;
mod value;
pub mod views;

pub use descriptor::TupleDescriptor;
pub use error::{Error, Result};
pub use tuple::{FieldState, SharedTuple, Tuple, ValueTuple};
pub use types::DataType;
pub use value::Value;
