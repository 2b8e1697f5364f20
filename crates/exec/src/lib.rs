//! Tessera Exec - execution-side adapters for the Tessera query compiler.
//!
//! This crate holds the pieces a physical executor builds from a corrected
//! plan:
//!
//! - `OrderedSource`: the contract of an ordered, seekable row source, with
//!   `MemoryIndex` as the in-memory implementation
//! - `FilterWrapper` / `TagWrapper` / `NarrowWrapper`: decorators that
//!   transform yielded rows through tuple views while preserving the
//!   source's ordering, seek and count contracts
//! - `PageCache`: the shared LRU cache lower-level storage wrappers sit
//!   behind, where lock contention degrades to a cache miss instead of
//!   failing the read
//!
//! Enumeration is pull-based and single-consumer: an iterator materializes
//! at most one row ahead and is not safe to drive from multiple threads.

mod cache;
mod source;
mod wrappers;

pub use cache::{fingerprint, PageCache};
pub use source::{MemoryIndex, OrderedSource, Seek};
pub use wrappers::{FilterWrapper, NarrowWrapper, TagWrapper};
