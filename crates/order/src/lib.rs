//! Tessera Order - ordered-value algebra for the Tessera query compiler.
//!
//! This crate provides the ordering machinery the plan compiler is built on:
//!
//! - `Order` / `Direction`: sort direction and successor/predecessor direction
//! - `Comparator` / `AdvancedComparator`: comparison with nearest-value queries
//! - `ValueComparator`: the standard comparator over `tessera_core::Value`
//! - `DirectionCollection`: the sort key of a data stream (column, order) list
//! - `Entire`: a value wrapped with infinity sentinels for range endpoints
//! - `Range` / `RangeSet`: closed intervals and disjoint interval sets with
//!   intersect / unite / invert algebra
//!
//! Ranges are stored closed on both ends; open endpoints are converted at
//! construction time by shifting through `AdvancedComparator::nearest`.

#![no_std]

extern crate alloc;

mod comparator;
mod direction;
mod entire;
mod range;
mod range_set;

pub use comparator::{AdvancedComparator, Comparator, Direction, Order, ValueComparator};
pub use direction::DirectionCollection;
pub use entire::Entire;
pub use range::Range;
pub use range_set::{RangeSet, ValueRangeSet};
