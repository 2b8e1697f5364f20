//! Tuple views: allocation-light projections over source tuples.
//!
//! A view implements `Tuple` but owns no field storage; every read and write
//! is routed through an index mapping to one or more shared source tuples.
//! Views are created per query-row materialization and share ownership of
//! their sources for exactly that long.
//!
//! The correctness contract for every view type is observational equivalence
//! with its `materialize()` copy: `get`, `state`, `tuple_eq` and `tuple_hash`
//! must agree between the view and the eager copy.

use crate::descriptor::TupleDescriptor;
use crate::error::{Error, Result};
use crate::tuple::{FieldState, SharedTuple, Tuple};
use crate::value::Value;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Sentinel source ordinal marking a virtual field with no backing source
/// field. Such fields read as the descriptor default and reject writes.
pub const NO_MAPPING: usize = usize::MAX;

/// A view with an arbitrary field mapping table.
///
/// Each virtual field index maps to a `(source ordinal, source field index)`
/// pair, or to `NO_MAPPING` for an unbacked field.
pub struct MapView {
    descriptor: Arc<TupleDescriptor>,
    sources: Vec<SharedTuple>,
    map: Vec<(usize, usize)>,
}

impl MapView {
    /// Creates a map view over any number of sources.
    pub fn new(
        descriptor: Arc<TupleDescriptor>,
        sources: Vec<SharedTuple>,
        map: Vec<(usize, usize)>,
    ) -> Result<Self> {
        if map.len() != descriptor.arity() {
            return Err(Error::invalid_operation(
                "mapping table length does not match descriptor arity",
            ));
        }
        for &(source, field) in &map {
            if source == NO_MAPPING {
                continue;
            }
            let src = sources.get(source).ok_or_else(|| {
                Error::invalid_operation("mapping references a missing source ordinal")
            })?;
            let arity = src.borrow().arity();
            if field >= arity {
                return Err(Error::field_out_of_bounds(field, arity));
            }
        }
        Ok(Self {
            descriptor,
            sources,
            map,
        })
    }

    /// Creates a map view over a single source.
    ///
    /// `fields[i]` is the source field backing virtual field `i`, or
    /// `NO_MAPPING` for an unbacked field.
    pub fn single(
        descriptor: Arc<TupleDescriptor>,
        source: SharedTuple,
        fields: Vec<usize>,
    ) -> Result<Self> {
        let map = fields
            .into_iter()
            .map(|f| if f == NO_MAPPING { (NO_MAPPING, 0) } else { (0, f) })
            .collect();
        Self::new(descriptor, alloc::vec![source], map)
    }

    /// Creates a map view over two sources.
    pub fn pair(
        descriptor: Arc<TupleDescriptor>,
        first: SharedTuple,
        second: SharedTuple,
        map: Vec<(usize, usize)>,
    ) -> Result<Self> {
        Self::new(descriptor, alloc::vec![first, second], map)
    }

    /// Creates a map view over three sources.
    pub fn triple(
        descriptor: Arc<TupleDescriptor>,
        first: SharedTuple,
        second: SharedTuple,
        third: SharedTuple,
        map: Vec<(usize, usize)>,
    ) -> Result<Self> {
        Self::new(descriptor, alloc::vec![first, second, third], map)
    }

    fn resolve(&self, index: usize) -> Result<Option<(usize, usize)>> {
        let entry = self
            .map
            .get(index)
            .copied()
            .ok_or_else(|| Error::field_out_of_bounds(index, self.map.len()))?;
        if entry.0 == NO_MAPPING {
            Ok(None)
        } else {
            Ok(Some(entry))
        }
    }
}

impl Tuple for MapView {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        match self.resolve(index)? {
            Some((source, field)) => self.sources[source].borrow().get(field),
            None => Ok((self.descriptor.default_value(index)?, FieldState::Default)),
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        match self.resolve(index)? {
            Some((source, field)) => self.sources[source].borrow_mut().set(field, value),
            None => Err(Error::invalid_operation(
                "write to a virtual field with no backing source",
            )),
        }
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        match self.resolve(index)? {
            Some((source, field)) => self.sources[source].borrow().state(field),
            None => Ok(FieldState::Default),
        }
    }

    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()> {
        match self.resolve(index)? {
            Some((source, field)) => self.sources[source].borrow_mut().set_state(field, state),
            None => Err(Error::invalid_operation(
                "write to a virtual field with no backing source",
            )),
        }
    }
}

/// A view exposing a contiguous window of one source tuple.
///
/// Virtual field `i` maps to source field `offset + i`. Mapped indices past
/// the end of the source resolve like `NO_MAPPING`: reads produce the view
/// descriptor's default, writes are rejected.
pub struct SegmentView {
    descriptor: Arc<TupleDescriptor>,
    source: SharedTuple,
    offset: usize,
}

impl SegmentView {
    /// Creates a segment view with an explicit descriptor.
    pub fn new(descriptor: Arc<TupleDescriptor>, source: SharedTuple, offset: usize) -> Self {
        Self {
            descriptor,
            source,
            offset,
        }
    }

    /// Creates a segment view whose descriptor is cut from the source's.
    /// The whole window must lie inside the source.
    pub fn covering(source: SharedTuple, offset: usize, len: usize) -> Result<Self> {
        let descriptor = {
            let src = source.borrow();
            let arity = src.arity();
            if offset + len > arity {
                return Err(Error::field_out_of_bounds(offset + len, arity));
            }
            let filler = src.descriptor().field_type(offset)?;
            src.descriptor().segment(offset, len, filler)
        };
        Ok(Self::new(descriptor, source, offset))
    }

    fn source_index(&self, index: usize) -> Result<Option<usize>> {
        if index >= self.descriptor.arity() {
            return Err(Error::field_out_of_bounds(index, self.descriptor.arity()));
        }
        let mapped = self.offset + index;
        if mapped < self.source.borrow().arity() {
            Ok(Some(mapped))
        } else {
            Ok(None)
        }
    }
}

impl Tuple for SegmentView {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        match self.source_index(index)? {
            Some(mapped) => self.source.borrow().get(mapped),
            None => Ok((self.descriptor.default_value(index)?, FieldState::Default)),
        }
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        match self.source_index(index)? {
            Some(mapped) => self.source.borrow_mut().set(mapped, value),
            None => Err(Error::invalid_operation(
                "write to a segment field outside the source",
            )),
        }
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        match self.source_index(index)? {
            Some(mapped) => self.source.borrow().state(mapped),
            None => Ok(FieldState::Default),
        }
    }

    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()> {
        match self.source_index(index)? {
            Some(mapped) => self.source.borrow_mut().set_state(mapped, state),
            None => Err(Error::invalid_operation(
                "write to a segment field outside the source",
            )),
        }
    }
}

/// A view of two sources logically appended.
pub struct ConcatView {
    descriptor: Arc<TupleDescriptor>,
    first: SharedTuple,
    second: SharedTuple,
    first_arity: usize,
}

impl ConcatView {
    /// Creates a concat view; the descriptor is the two source descriptors
    /// appended in sequence.
    pub fn new(first: SharedTuple, second: SharedTuple) -> Self {
        let (descriptor, first_arity) = {
            let a = first.borrow();
            let b = second.borrow();
            (
                TupleDescriptor::concat(a.descriptor(), b.descriptor()),
                a.arity(),
            )
        };
        Self {
            descriptor,
            first,
            second,
            first_arity,
        }
    }

    fn route(&self, index: usize) -> Result<(&SharedTuple, usize)> {
        if index >= self.descriptor.arity() {
            return Err(Error::field_out_of_bounds(index, self.descriptor.arity()));
        }
        if index < self.first_arity {
            Ok((&self.first, index))
        } else {
            Ok((&self.second, index - self.first_arity))
        }
    }
}

impl Tuple for ConcatView {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        let (source, mapped) = self.route(index)?;
        source.borrow().get(mapped)
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let (source, mapped) = self.route(index)?;
        source.borrow_mut().set(mapped, value)
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        let (source, mapped) = self.route(index)?;
        source.borrow().state(mapped)
    }

    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()> {
        let (source, mapped) = self.route(index)?;
        source.borrow_mut().set_state(mapped, state)
    }
}

/// A writable union of any number of sources' fields in sequence.
///
/// Used to assemble join output without copying: each source contributes its
/// fields in order, and writes route back to the owning source.
pub struct CombineView {
    descriptor: Arc<TupleDescriptor>,
    sources: Vec<SharedTuple>,
    /// Exclusive running upper bound of each source's field window.
    bounds: Vec<usize>,
}

impl CombineView {
    /// Creates a combine view over the given sources.
    pub fn new(sources: Vec<SharedTuple>) -> Self {
        let mut fields = Vec::new();
        let mut bounds = Vec::with_capacity(sources.len());
        let mut total = 0;
        for source in &sources {
            let src = source.borrow();
            fields.extend_from_slice(src.descriptor().fields());
            total += src.arity();
            bounds.push(total);
        }
        Self {
            descriptor: Arc::new(TupleDescriptor::new(fields)),
            sources,
            bounds,
        }
    }

    fn route(&self, index: usize) -> Result<(&SharedTuple, usize)> {
        if index >= self.descriptor.arity() {
            return Err(Error::field_out_of_bounds(index, self.descriptor.arity()));
        }
        let mut start = 0;
        for (ordinal, &bound) in self.bounds.iter().enumerate() {
            if index < bound {
                return Ok((&self.sources[ordinal], index - start));
            }
            start = bound;
        }
        Err(Error::field_out_of_bounds(index, self.descriptor.arity()))
    }
}

impl Tuple for CombineView {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        let (source, mapped) = self.route(index)?;
        source.borrow().get(mapped)
    }

    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let (source, mapped) = self.route(index)?;
        source.borrow_mut().set(mapped, value)
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        let (source, mapped) = self.route(index)?;
        source.borrow().state(mapped)
    }

    fn set_state(&mut self, index: usize, state: FieldState) -> Result<()> {
        let (source, mapped) = self.route(index)?;
        source.borrow_mut().set_state(mapped, state)
    }
}

/// A view delegating all reads and rejecting all writes.
pub struct ReadOnlyView {
    descriptor: Arc<TupleDescriptor>,
    source: SharedTuple,
}

impl ReadOnlyView {
    /// Wraps a source tuple read-only.
    pub fn new(source: SharedTuple) -> Self {
        let descriptor = source.borrow().descriptor().clone();
        Self { descriptor, source }
    }
}

impl Tuple for ReadOnlyView {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn get(&self, index: usize) -> Result<(Value, FieldState)> {
        self.source.borrow().get(index)
    }

    fn set(&mut self, _index: usize, _value: Value) -> Result<()> {
        Err(Error::read_only())
    }

    fn state(&self, index: usize) -> Result<FieldState> {
        self.source.borrow().state(index)
    }

    fn set_state(&mut self, _index: usize, _state: FieldState) -> Result<()> {
        Err(Error::read_only())
    }

    fn is_read_only(&self) -> bool {
        true
    }
}
