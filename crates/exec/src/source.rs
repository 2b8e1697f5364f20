//! Ordered row sources.
//!
//! An `OrderedSource` is what a corrected plan's scan nodes bind to at
//! execution time: rows come out in the source's key order, positions are
//! stable for the lifetime of the source, and `seek` locates a key in the
//! position space. `MemoryIndex` is the in-memory implementation; the
//! wrappers in [`crate::wrappers`] decorate any source while keeping the
//! same contract.

use std::sync::Arc;

use tessera_core::{Error, Result, SharedTuple, Tuple, TupleDescriptor, Value, ValueTuple};
use tessera_order::{
    Comparator, DirectionCollection, Range, ValueComparator, ValueRangeSet,
};

/// Result of locating a key in a source's position space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seek {
    /// The key is present at this position.
    Exact(usize),
    /// The key is absent; this is the first position holding a greater key.
    Nearest(usize),
    /// Every row's key is below the requested key.
    None,
}

/// An ordered, seekable stream of shared tuples.
///
/// Rows enumerate in `key_order`; `row_at` addresses the same sequence by
/// position. Positions are only valid against an unmodified source.
pub trait OrderedSource {
    /// The shape of the rows this source yields.
    fn descriptor(&self) -> &Arc<TupleDescriptor>;

    /// The ordering every enumeration of this source follows.
    fn key_order(&self) -> &DirectionCollection;

    /// Locates `key` in the position space.
    fn seek(&self, key: &Value) -> Seek;

    /// Reads the row at a position, if the position is in range.
    fn row_at(&self, position: usize) -> Option<SharedTuple>;

    /// Enumerates the rows whose key falls inside `range`, in key order.
    fn items<'a>(&'a self, range: &'a Range<Value>)
        -> Box<dyn Iterator<Item = SharedTuple> + 'a>;

    /// Enumerates the rows whose key falls inside any range of `set`,
    /// in key order and without duplicates.
    fn items_in<'a>(&'a self, set: &'a ValueRangeSet)
        -> Box<dyn Iterator<Item = SharedTuple> + 'a>;

    /// Returns the number of rows this source yields.
    fn count(&self) -> usize;

    /// Extracts the key of a row yielded by this source: the value of the
    /// leading `key_order` column.
    fn key_of(&self, row: &SharedTuple) -> Result<Value> {
        let &(column, _) = self
            .key_order()
            .pairs()
            .first()
            .ok_or_else(|| Error::invalid_operation("source declares no key order"))?;
        let (value, _) = row.borrow().get(column)?;
        Ok(value)
    }
}

fn row_key(row: &SharedTuple, column: usize) -> Option<Value> {
    row.borrow().get(column).ok().map(|(value, _)| value)
}

/// A sorted in-memory row store keyed on a single ascending column.
pub struct MemoryIndex {
    descriptor: Arc<TupleDescriptor>,
    key_column: usize,
    key_order: DirectionCollection,
    comparator: ValueComparator,
    rows: Vec<SharedTuple>,
}

impl MemoryIndex {
    /// Creates an empty index over `descriptor`, keyed on `key_column`.
    pub fn new(descriptor: Arc<TupleDescriptor>, key_column: usize) -> Result<Self> {
        descriptor.field_type(key_column)?;
        Ok(Self {
            descriptor,
            key_column,
            key_order: DirectionCollection::asc(key_column),
            comparator: ValueComparator::new(),
            rows: Vec::new(),
        })
    }

    /// Inserts a row at its sorted position. Duplicate keys are kept in
    /// insertion order.
    pub fn insert(&mut self, row: ValueTuple) -> Result<()> {
        if row.descriptor().as_ref() != self.descriptor.as_ref() {
            return Err(Error::invalid_operation(
                "row descriptor does not match the index schema",
            ));
        }
        let (key, _) = row.get(self.key_column)?;
        let cmp = self.comparator;
        let column = self.key_column;
        let position = self.rows.partition_point(|existing| match row_key(existing, column) {
            Some(existing_key) => cmp.is_less_or_equal(&existing_key, &key),
            None => true,
        });
        self.rows.insert(position, row.into_shared());
        Ok(())
    }
}

impl OrderedSource for MemoryIndex {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn key_order(&self) -> &DirectionCollection {
        &self.key_order
    }

    fn seek(&self, key: &Value) -> Seek {
        let cmp = self.comparator;
        let column = self.key_column;
        let start = self.rows.partition_point(|existing| match row_key(existing, column) {
            Some(existing_key) => cmp.is_less(&existing_key, key),
            None => true,
        });
        match self.rows.get(start).and_then(|row| row_key(row, column)) {
            Some(found) if cmp.is_equal(&found, key) => Seek::Exact(start),
            Some(_) => Seek::Nearest(start),
            None => Seek::None,
        }
    }

    fn row_at(&self, position: usize) -> Option<SharedTuple> {
        self.rows.get(position).cloned()
    }

    fn items<'a>(
        &'a self,
        range: &'a Range<Value>,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        let cmp = self.comparator;
        let column = self.key_column;
        Box::new(
            self.rows
                .iter()
                .filter(move |row| match row_key(row, column) {
                    Some(key) => range.contains(&key, &cmp),
                    None => false,
                })
                .cloned(),
        )
    }

    fn items_in<'a>(
        &'a self,
        set: &'a ValueRangeSet,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        let column = self.key_column;
        Box::new(
            self.rows
                .iter()
                .filter(move |row| match row_key(row, column) {
                    Some(key) => set.contains(&key),
                    None => false,
                })
                .cloned(),
        )
    }

    fn count(&self) -> usize {
        self.rows.len()
    }
}
