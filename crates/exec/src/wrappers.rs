//! Virtual-index wrappers.
//!
//! Each wrapper decorates an [`OrderedSource`] and presents the decorated
//! stream as another `OrderedSource`, so wrappers stack freely. Rows are
//! reshaped lazily through tuple views; the underlying tuples are shared,
//! never copied.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use hashbrown::HashSet;
use tessera_core::views::{ConcatView, MapView};
use tessera_core::{Error, Result, SharedTuple, Tuple, TupleDescriptor, Value, ValueTuple};
use tessera_order::{DirectionCollection, Range, ValueRangeSet};

use crate::source::{OrderedSource, Seek};

/// Restricts a source to the rows whose filter column holds an admitted
/// value. Ordering and positions are inherited from the source.
pub struct FilterWrapper {
    source: Box<dyn OrderedSource>,
    column: usize,
    admitted: HashSet<Value>,
}

impl FilterWrapper {
    /// Wraps `source`, admitting only rows whose `column` value is in
    /// `admitted`.
    pub fn new(
        source: Box<dyn OrderedSource>,
        column: usize,
        admitted: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        source.descriptor().field_type(column)?;
        Ok(Self {
            source,
            column,
            admitted: admitted.into_iter().collect(),
        })
    }

    fn admits(&self, row: &SharedTuple) -> bool {
        match row.borrow().get(self.column) {
            Ok((value, _)) => self.admitted.contains(&value),
            Err(_) => false,
        }
    }
}

impl OrderedSource for FilterWrapper {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        self.source.descriptor()
    }

    fn key_order(&self) -> &DirectionCollection {
        self.source.key_order()
    }

    /// A key that lands on a rejected row is a near miss, not a hit: the
    /// exact result degrades to `Nearest` at the same position.
    fn seek(&self, key: &Value) -> Seek {
        match self.source.seek(key) {
            Seek::Exact(position) => match self.source.row_at(position) {
                Some(row) if self.admits(&row) => Seek::Exact(position),
                Some(_) => Seek::Nearest(position),
                None => Seek::None,
            },
            other => other,
        }
    }

    fn row_at(&self, position: usize) -> Option<SharedTuple> {
        self.source.row_at(position)
    }

    fn items<'a>(
        &'a self,
        range: &'a Range<Value>,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(self.source.items(range).filter(move |row| self.admits(row)))
    }

    fn items_in<'a>(
        &'a self,
        set: &'a ValueRangeSet,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(self.source.items_in(set).filter(move |row| self.admits(row)))
    }

    fn count(&self) -> usize {
        (0..self.source.count())
            .filter_map(|position| self.source.row_at(position))
            .filter(|row| self.admits(row))
            .count()
    }
}

/// Appends a constant discriminator column to every row of a source.
///
/// The tag lets rows from differently-tagged sources be told apart after a
/// union; ordering, positions and counts pass through unchanged because the
/// appended column is constant.
pub struct TagWrapper {
    source: Box<dyn OrderedSource>,
    descriptor: Arc<TupleDescriptor>,
    tag_descriptor: Arc<TupleDescriptor>,
    tag: Value,
}

impl TagWrapper {
    /// Wraps `source`, appending `tag` as the new last column.
    pub fn new(source: Box<dyn OrderedSource>, tag: Value) -> Result<Self> {
        let tag_type = tag
            .data_type()
            .ok_or_else(|| Error::invalid_operation("discriminator tag must be non-null"))?;
        let tag_descriptor = Arc::new(TupleDescriptor::new(vec![tag_type]));
        let descriptor = TupleDescriptor::concat(source.descriptor(), &tag_descriptor);
        Ok(Self {
            source,
            descriptor,
            tag_descriptor,
            tag,
        })
    }

    fn tag_row(&self, row: SharedTuple) -> Option<SharedTuple> {
        let tag = ValueTuple::from_values(self.tag_descriptor.clone(), vec![self.tag.clone()])
            .ok()?
            .into_shared();
        let view: Rc<RefCell<dyn Tuple>> = Rc::new(RefCell::new(ConcatView::new(row, tag)));
        Some(view)
    }
}

impl OrderedSource for TagWrapper {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn key_order(&self) -> &DirectionCollection {
        self.source.key_order()
    }

    fn seek(&self, key: &Value) -> Seek {
        self.source.seek(key)
    }

    fn row_at(&self, position: usize) -> Option<SharedTuple> {
        let row = self.source.row_at(position)?;
        self.tag_row(row)
    }

    fn items<'a>(
        &'a self,
        range: &'a Range<Value>,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(
            self.source
                .items(range)
                .filter_map(move |row| self.tag_row(row)),
        )
    }

    fn items_in<'a>(
        &'a self,
        set: &'a ValueRangeSet,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(
            self.source
                .items_in(set)
                .filter_map(move |row| self.tag_row(row)),
        )
    }

    fn count(&self) -> usize {
        self.source.count()
    }
}

/// Projects a source down to a subset of its columns, in a chosen order.
///
/// The visible key order is the source order rewritten through the
/// projection; it goes empty when the leading key column is dropped.
/// Counts and positions pass through because projection drops no rows.
pub struct NarrowWrapper {
    source: Box<dyn OrderedSource>,
    columns: Vec<usize>,
    descriptor: Arc<TupleDescriptor>,
    key_order: DirectionCollection,
}

impl NarrowWrapper {
    /// Wraps `source`, exposing only `columns`, in the order given.
    pub fn new(source: Box<dyn OrderedSource>, columns: Vec<usize>) -> Result<Self> {
        let mut fields = Vec::with_capacity(columns.len());
        for &column in &columns {
            fields.push(source.descriptor().field_type(column)?);
        }
        let descriptor = Arc::new(TupleDescriptor::new(fields));
        let key_order = source.key_order().project(&columns);
        Ok(Self {
            source,
            columns,
            descriptor,
            key_order,
        })
    }

    fn narrow_row(&self, row: SharedTuple) -> Option<SharedTuple> {
        let view = MapView::single(self.descriptor.clone(), row, self.columns.clone()).ok()?;
        let shared: Rc<RefCell<dyn Tuple>> = Rc::new(RefCell::new(view));
        Some(shared)
    }
}

impl OrderedSource for NarrowWrapper {
    fn descriptor(&self) -> &Arc<TupleDescriptor> {
        &self.descriptor
    }

    fn key_order(&self) -> &DirectionCollection {
        &self.key_order
    }

    /// Seeks by the underlying source key; the position space is shared
    /// with the source even when the key column is not projected.
    fn seek(&self, key: &Value) -> Seek {
        self.source.seek(key)
    }

    fn row_at(&self, position: usize) -> Option<SharedTuple> {
        let row = self.source.row_at(position)?;
        self.narrow_row(row)
    }

    fn items<'a>(
        &'a self,
        range: &'a Range<Value>,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(
            self.source
                .items(range)
                .filter_map(move |row| self.narrow_row(row)),
        )
    }

    fn items_in<'a>(
        &'a self,
        set: &'a ValueRangeSet,
    ) -> Box<dyn Iterator<Item = SharedTuple> + 'a> {
        Box::new(
            self.source
                .items_in(set)
                .filter_map(move |row| self.narrow_row(row)),
        )
    }

    fn count(&self) -> usize {
        self.source.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryIndex;
    use tessera_core::DataType;

    fn schema() -> Arc<TupleDescriptor> {
        Arc::new(TupleDescriptor::new(vec![
            DataType::Int64,
            DataType::String,
            DataType::Boolean,
        ]))
    }

    fn index_with(rows: &[(i64, &str, bool)]) -> MemoryIndex {
        let mut index = MemoryIndex::new(schema(), 0).unwrap();
        for &(id, name, flag) in rows {
            let row = ValueTuple::from_values(
                schema(),
                vec![
                    Value::Int64(id),
                    Value::String(name.into()),
                    Value::Boolean(flag),
                ],
            )
            .unwrap();
            index.insert(row).unwrap();
        }
        index
    }

    fn ids_of<'a>(rows: impl Iterator<Item = SharedTuple> + 'a) -> Vec<i64> {
        rows.map(|row| match row.borrow().get(0).unwrap() {
            (Value::Int64(id), _) => id,
            other => panic!("unexpected id {:?}", other),
        })
        .collect()
    }

    #[test]
    fn test_filter_admits_only_listed_values() {
        let index = index_with(&[(1, "a", true), (2, "b", false), (3, "a", true)]);
        let filter = FilterWrapper::new(
            Box::new(index),
            1,
            vec![Value::String("a".into())],
        )
        .unwrap();

        let full = Range::full();
        assert_eq!(ids_of(filter.items(&full)), vec![1, 3]);
        assert_eq!(filter.count(), 2);
    }

    #[test]
    fn test_filter_degrades_exact_seek_on_rejected_row() {
        let index = index_with(&[(1, "a", true), (2, "b", false), (3, "a", true)]);
        let filter = FilterWrapper::new(
            Box::new(index),
            1,
            vec![Value::String("a".into())],
        )
        .unwrap();

        assert_eq!(filter.seek(&Value::Int64(1)), Seek::Exact(0));
        // Row 2 exists in the source but is filtered out
        assert_eq!(filter.seek(&Value::Int64(2)), Seek::Nearest(1));
        assert_eq!(filter.seek(&Value::Int64(9)), Seek::None);
    }

    #[test]
    fn test_filter_rejects_unknown_column() {
        let index = index_with(&[]);
        assert!(FilterWrapper::new(Box::new(index), 7, Vec::new()).is_err());
    }

    #[test]
    fn test_tag_appends_constant_column() {
        let index = index_with(&[(1, "a", true), (2, "b", false)]);
        let tagged = TagWrapper::new(Box::new(index), Value::Int64(42)).unwrap();

        assert_eq!(tagged.descriptor().arity(), 4);
        assert_eq!(tagged.count(), 2);

        let full = Range::full();
        for row in tagged.items(&full) {
            let (tag, _) = row.borrow().get(3).unwrap();
            assert_eq!(tag, Value::Int64(42));
        }
        // Source columns are visible unchanged through the view
        let row = tagged.row_at(1).unwrap();
        assert_eq!(row.borrow().get(0).unwrap().0, Value::Int64(2));
    }

    #[test]
    fn test_tag_rejects_null_tag() {
        let index = index_with(&[]);
        assert!(TagWrapper::new(Box::new(index), Value::Null).is_err());
    }

    #[test]
    fn test_narrow_projects_and_reorders_columns() {
        let index = index_with(&[(1, "a", true)]);
        let narrow = NarrowWrapper::new(Box::new(index), vec![2, 0]).unwrap();

        assert_eq!(narrow.descriptor().arity(), 2);
        assert_eq!(narrow.descriptor().field_type(0).unwrap(), DataType::Boolean);
        assert_eq!(narrow.descriptor().field_type(1).unwrap(), DataType::Int64);

        let row = narrow.row_at(0).unwrap();
        assert_eq!(row.borrow().get(0).unwrap().0, Value::Boolean(true));
        assert_eq!(row.borrow().get(1).unwrap().0, Value::Int64(1));
    }

    #[test]
    fn test_narrow_key_order_follows_projection() {
        let index = index_with(&[(1, "a", true)]);

        // Key column kept: order survives at its new ordinal
        let narrow = NarrowWrapper::new(Box::new(index), vec![1, 0]).unwrap();
        assert_eq!(narrow.key_order(), &DirectionCollection::asc(1));

        // Key column dropped: no visible order remains
        let index = index_with(&[(1, "a", true)]);
        let narrow = NarrowWrapper::new(Box::new(index), vec![1, 2]).unwrap();
        assert!(narrow.key_order().is_empty());
    }

    #[test]
    fn test_narrow_count_passes_through() {
        let index = index_with(&[(1, "a", true), (2, "b", false), (3, "c", true)]);
        let narrow = NarrowWrapper::new(Box::new(index), vec![1]).unwrap();
        assert_eq!(narrow.count(), 3);
    }

    #[test]
    fn test_wrappers_stack() {
        let index = index_with(&[(1, "a", true), (2, "b", false), (3, "a", true)]);
        let filter = FilterWrapper::new(
            Box::new(index),
            1,
            vec![Value::String("a".into())],
        )
        .unwrap();
        let tagged = TagWrapper::new(Box::new(filter), Value::Boolean(true)).unwrap();
        let narrow = NarrowWrapper::new(Box::new(tagged), vec![0, 3]).unwrap();

        assert_eq!(narrow.descriptor().arity(), 2);
        assert_eq!(narrow.key_order(), &DirectionCollection::asc(0));

        let full = Range::full();
        let ids = ids_of(narrow.items(&full));
        assert_eq!(ids, vec![1, 3]);
    }
}
