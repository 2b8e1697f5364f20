//! Ordering corrector pass.
//!
//! Walks the plan tree bottom-up, tracking which ordering the current stream
//! carries and whether some operator has invalidated it, then removes sorts
//! nobody consumes and inserts sorts where an order-sensitive operator would
//! otherwise receive corrupted input.
//!
//! Example:
//! ```text
//! Aggregate                      Aggregate
//!     |                              |
//! Filter            =>           Filter
//!     |                              |
//! Sort(col1 ASC)              Sort(col1 ASC)     (kept: Aggregate needs it)
//!     |                              |
//! TableScan                    TableScan
//! ```
//!
//! The pass is pure: it consumes a tree and produces a new one, annotating
//! every node's `actual_order` along the way. Running it on an already
//! corrected tree changes nothing.

use crate::catalog::{NodeCatalog, OrderingDescriptor};
use crate::node::{PlanKind, PlanNode};
use alloc::boxed::Box;
use tessera_core::{Error, Result};
use tessera_order::DirectionCollection;

/// Ordering knowledge accumulated along one path from a leaf.
#[derive(Clone, Debug, Default)]
struct ChainState {
    /// The last ordering believed valid, kept across corruption so an
    /// inserted sort can re-establish it.
    sort_order: DirectionCollection,
    /// Some operator invalidated the ordering since the last enforced sort.
    is_order_corrupted: bool,
    /// The ordering is supplied by a physical scan rather than an explicit
    /// sort, which survives column narrowing.
    is_order_of_index: bool,
}

/// The ordering corrector rewrite pass.
pub struct OrderingCorrector<'a> {
    catalog: &'a dyn NodeCatalog,
}

impl<'a> OrderingCorrector<'a> {
    /// Creates a corrector over the given node-kind catalog.
    pub fn new(catalog: &'a dyn NodeCatalog) -> Self {
        Self { catalog }
    }

    /// Corrects the tree: eliminates dead sorts, inserts required ones and
    /// writes every node's `actual_order`.
    ///
    /// Fails with [`Error::InvalidPlan`] when a projection drops columns an
    /// order-sensitive consumer relies on and the order is not index-native.
    pub fn correct(&self, root: PlanNode) -> Result<PlanNode> {
        // A top-level projection is corrected through its source and only
        // re-wrapped afterwards, so no sort is pushed through the narrowing.
        let consumer = if matches!(root.kind, PlanKind::Select { .. }) {
            OrderingDescriptor::passthrough()
        } else {
            OrderingDescriptor::ordered_consumer()
        };
        let expected = root.expected_order.clone();
        let (node, state) = self.visit(root, &consumer)?;

        if !expected.is_empty()
            && (state.is_order_corrupted || !expected.is_prefix_of(&state.sort_order))
        {
            return Ok(make_sort(node, expected));
        }
        Ok(node)
    }

    fn visit(
        &self,
        node: PlanNode,
        consumer: &OrderingDescriptor,
    ) -> Result<(PlanNode, ChainState)> {
        let descriptor = self.catalog.descriptor(&node.kind);
        let PlanNode {
            kind,
            expected_order,
            ..
        } = node;

        let (kind, mut state) = match kind {
            PlanKind::IndexScan { index, order, range } => {
                let state = ChainState {
                    sort_order: order.clone(),
                    is_order_corrupted: false,
                    is_order_of_index: true,
                };
                (PlanKind::IndexScan { index, order, range }, state)
            }
            PlanKind::TableScan { table } => {
                (PlanKind::TableScan { table }, ChainState::default())
            }
            PlanKind::Sort { source, order } => {
                return self.visit_sort(*source, order, expected_order, consumer);
            }
            PlanKind::Filter { source } => {
                let (source, state) = self.visit_input(*source, &descriptor)?;
                (PlanKind::Filter { source }, state)
            }
            PlanKind::Aggregate { source } => {
                let (source, state) = self.visit_input(*source, &descriptor)?;
                (PlanKind::Aggregate { source }, state)
            }
            PlanKind::Select { source, columns } => {
                let (source, state) = self.visit_input(*source, &descriptor)?;
                let state = self.narrow(state, &columns, consumer)?;
                (PlanKind::Select { source, columns }, state)
            }
            PlanKind::Join { left, right, kind } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Join { left, right, kind }, state)
            }
            PlanKind::PredicateJoin { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::PredicateJoin { left, right }, state)
            }
            PlanKind::Union { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Union { left, right }, state)
            }
            PlanKind::Intersect { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Intersect { left, right }, state)
            }
            PlanKind::Except { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Except { left, right }, state)
            }
            PlanKind::Concat { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Concat { left, right }, state)
            }
            PlanKind::Apply { left, right } => {
                let (left, right, state) = self.visit_pair(*left, *right, &descriptor)?;
                (PlanKind::Apply { left, right }, state)
            }
        };

        if descriptor.breaks_order {
            state.is_order_corrupted = true;
            state.is_order_of_index = false;
            state.sort_order = DirectionCollection::new();
        } else if !descriptor.preserves_order {
            state.is_order_corrupted = true;
            state.is_order_of_index = false;
        }

        let actual_order = if state.is_order_corrupted {
            DirectionCollection::new()
        } else {
            state.sort_order.clone()
        };
        Ok((
            PlanNode {
                kind,
                expected_order,
                actual_order: Some(actual_order),
            },
            state,
        ))
    }

    /// Visits an explicit sort. Three outcomes: the sort is redundant atop an
    /// index-ordered stream and vanishes; nobody above is order-sensitive and
    /// it is eliminated (its order remembered for later re-insertion); or it
    /// is kept and re-establishes the ordering.
    fn visit_sort(
        &self,
        source: PlanNode,
        order: DirectionCollection,
        expected_order: DirectionCollection,
        consumer: &OrderingDescriptor,
    ) -> Result<(PlanNode, ChainState)> {
        let sorter = OrderingDescriptor::sorter();
        let (source, source_state) = self.visit(source, &sorter)?;

        if !source_state.is_order_corrupted
            && source_state.is_order_of_index
            && order.is_prefix_of(&source_state.sort_order)
        {
            // The physical scan already yields this order
            return Ok((source, source_state));
        }

        if !consumer.is_order_sensitive {
            let state = ChainState {
                sort_order: order,
                is_order_corrupted: true,
                is_order_of_index: false,
            };
            return Ok((source, state));
        }

        let state = ChainState {
            sort_order: order.clone(),
            is_order_corrupted: false,
            is_order_of_index: false,
        };
        let node = PlanNode {
            kind: PlanKind::Sort {
                source: Box::new(source),
                order,
            },
            expected_order,
            actual_order: Some(state.sort_order.clone()),
        };
        Ok((node, state))
    }

    /// Visits one input of a unary or binary node, inserting a sort in front
    /// of an order-sensitive consumer whose incoming order is corrupted.
    fn visit_input(
        &self,
        child: PlanNode,
        consumer: &OrderingDescriptor,
    ) -> Result<(Box<PlanNode>, ChainState)> {
        let (child, state) = self.visit(child, consumer)?;
        if consumer.is_order_sensitive && state.is_order_corrupted {
            let required = if state.sort_order.is_empty() {
                child.expected_order.clone()
            } else {
                state.sort_order.clone()
            };
            if !required.is_empty() {
                let state = ChainState {
                    sort_order: required.clone(),
                    is_order_corrupted: false,
                    is_order_of_index: false,
                };
                return Ok((Box::new(make_sort(child, required)), state));
            }
        }
        Ok((Box::new(child), state))
    }

    fn visit_pair(
        &self,
        left: PlanNode,
        right: PlanNode,
        own: &OrderingDescriptor,
    ) -> Result<(Box<PlanNode>, Box<PlanNode>, ChainState)> {
        let (left, left_state) = self.visit_input(left, own)?;
        let (right, right_state) = self.visit_input(right, own)?;
        // The combined order counts as index-native only when both sides are
        let state = ChainState {
            sort_order: left_state.sort_order,
            is_order_corrupted: left_state.is_order_corrupted || right_state.is_order_corrupted,
            is_order_of_index: left_state.is_order_of_index && right_state.is_order_of_index,
        };
        Ok((left, right, state))
    }

    /// Applies a projection to the ordering state. Dropping columns of a
    /// live ordering is permitted when the order is index-native (the scan
    /// keeps yielding rows in order regardless of projected columns), fatal
    /// when the consumer is order-sensitive, and plain corruption otherwise.
    fn narrow(
        &self,
        mut state: ChainState,
        columns: &[usize],
        consumer: &OrderingDescriptor,
    ) -> Result<ChainState> {
        let projected = state.sort_order.project(columns);
        if projected.len() < state.sort_order.len() {
            if state.is_order_of_index {
                // Narrowing is safe; the visible ordering shrinks
            } else if consumer.is_order_sensitive {
                // Whether the order is live or merely remembered for
                // re-insertion, its columns are gone past this projection.
                return Err(Error::invalid_plan(
                    "projection drops columns required by the active ordering",
                ));
            } else {
                state.is_order_corrupted = true;
            }
        }
        state.sort_order = projected;
        Ok(state)
    }
}

fn make_sort(source: PlanNode, order: DirectionCollection) -> PlanNode {
    PlanNode {
        kind: PlanKind::Sort {
            source: Box::new(source),
            order: order.clone(),
        },
        expected_order: order.clone(),
        actual_order: Some(order),
    }
}
