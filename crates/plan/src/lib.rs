//! Tessera Plan - plan compilation for the Tessera query engine.
//!
//! The crate owns the declarative plan tree and the two compilation passes
//! that run over it:
//!
//! - `PlanNode` / `PlanKind`: an immutable tree of relational operators, each
//!   carrying the ordering it was constructed to expect and, after
//!   correction, the ordering it actually produces
//! - `NodeCatalog` / `OrderingDescriptor`: per-operator-kind ordering
//!   behavior, supplied by the caller ([`DefaultCatalog`] covers the standard
//!   relational semantics)
//! - `OrderingCorrector`: the bottom-up rewrite pass that removes dead sorts
//!   and inserts required ones so every order-sensitive operator receives
//!   ordered input
//! - `RangeSetBuilder`: translates column predicates into range sets for
//!   index range scans, including composite-key construction
//!
//! Compilation is synchronous, single-threaded and side-effect-free: passes
//! consume a tree and produce a new one.

#![no_std]

extern crate alloc;

mod catalog;
mod corrector;
mod node;
mod predicate;

pub use catalog::{DefaultCatalog, NodeCatalog, OrderingDescriptor};
pub use corrector::OrderingCorrector;
pub use node::{JoinKind, PlanKind, PlanNode};
pub use predicate::{
    composite_key, ColumnPredicate, CompareOp, CompositeComparator, CompositeKey,
    CompositeRangeSet, RangeSetBuilder,
};
