//! The plan node tree.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use tessera_order::{DirectionCollection, ValueRangeSet};

/// Join flavor carried by a [`PlanKind::Join`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// One relational operator in a declarative query plan.
///
/// The set of kinds is closed: every tree walk matches exhaustively, so
/// adding a kind is a compile-time-checked, single-point change. Binary
/// kinds are always visited left then right.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanKind {
    /// Physical scan over an ordered index, optionally constrained to a
    /// range set over the key.
    IndexScan {
        index: String,
        order: DirectionCollection,
        range: Option<ValueRangeSet>,
    },
    /// Physical scan over an unordered table.
    TableScan { table: String },
    /// Row filter; ordering flows through untouched.
    Filter { source: Box<PlanNode> },
    /// Projection to the listed column ordinals, in the listed order.
    Select {
        source: Box<PlanNode>,
        columns: Vec<usize>,
    },
    Join {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        kind: JoinKind,
    },
    /// Join on an arbitrary row predicate instead of a key equality.
    PredicateJoin {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Aggregate { source: Box<PlanNode> },
    /// Explicit sort imposing the given ordering on its source.
    Sort {
        source: Box<PlanNode>,
        order: DirectionCollection,
    },
    Union {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Intersect {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Except {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Concat {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    /// Correlated evaluation of the right side once per left row.
    Apply {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
}

/// A plan tree node: an operator plus its ordering annotations.
///
/// `expected_order` is the ordering the construction context requires of this
/// node's output; `actual_order` is the ordering the node produces, written
/// by the ordering corrector during the rewrite pass and never mutated
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanNode {
    pub kind: PlanKind,
    pub expected_order: DirectionCollection,
    pub actual_order: Option<DirectionCollection>,
}

impl PlanNode {
    /// Creates an uncorrected node with no expected ordering.
    pub fn new(kind: PlanKind) -> Self {
        Self {
            kind,
            expected_order: DirectionCollection::new(),
            actual_order: None,
        }
    }

    /// Sets the ordering this node's consumer expects.
    pub fn with_expected_order(mut self, order: DirectionCollection) -> Self {
        self.expected_order = order;
        self
    }

    /// Creates an index scan node declaring the index's native order.
    pub fn index_scan(
        index: impl Into<String>,
        order: DirectionCollection,
        range: Option<ValueRangeSet>,
    ) -> Self {
        Self::new(PlanKind::IndexScan {
            index: index.into(),
            order,
            range,
        })
    }

    /// Creates an unordered table scan node.
    pub fn table_scan(table: impl Into<String>) -> Self {
        Self::new(PlanKind::TableScan {
            table: table.into(),
        })
    }

    pub fn filter(source: PlanNode) -> Self {
        Self::new(PlanKind::Filter {
            source: Box::new(source),
        })
    }

    pub fn select(source: PlanNode, columns: Vec<usize>) -> Self {
        Self::new(PlanKind::Select {
            source: Box::new(source),
            columns,
        })
    }

    pub fn join(left: PlanNode, right: PlanNode, kind: JoinKind) -> Self {
        Self::new(PlanKind::Join {
            left: Box::new(left),
            right: Box::new(right),
            kind,
        })
    }

    pub fn predicate_join(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::PredicateJoin {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn aggregate(source: PlanNode) -> Self {
        Self::new(PlanKind::Aggregate {
            source: Box::new(source),
        })
    }

    pub fn sort(source: PlanNode, order: DirectionCollection) -> Self {
        Self::new(PlanKind::Sort {
            source: Box::new(source),
            order,
        })
    }

    pub fn union(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::Union {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn intersect(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::Intersect {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn except(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::Except {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn concat(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::Concat {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn apply(left: PlanNode, right: PlanNode) -> Self {
        Self::new(PlanKind::Apply {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Returns this node's inputs, left before right for binary kinds.
    pub fn inputs(&self) -> Vec<&PlanNode> {
        match &self.kind {
            PlanKind::IndexScan { .. } | PlanKind::TableScan { .. } => Vec::new(),
            PlanKind::Filter { source }
            | PlanKind::Select { source, .. }
            | PlanKind::Aggregate { source }
            | PlanKind::Sort { source, .. } => alloc::vec![source.as_ref()],
            PlanKind::Join { left, right, .. }
            | PlanKind::PredicateJoin { left, right }
            | PlanKind::Union { left, right }
            | PlanKind::Intersect { left, right }
            | PlanKind::Except { left, right }
            | PlanKind::Concat { left, right }
            | PlanKind::Apply { left, right } => alloc::vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Counts the nodes of the subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.inputs().iter().map(|n| n.node_count()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_order::Order;

    #[test]
    fn test_constructors_leave_actual_order_unset() {
        let scan = PlanNode::index_scan("idx_id", DirectionCollection::asc(0), None);
        assert!(scan.actual_order.is_none());
        assert!(scan.expected_order.is_empty());

        let node = PlanNode::filter(scan).with_expected_order(DirectionCollection::asc(0));
        assert_eq!(node.expected_order.pairs(), &[(0, Order::Asc)]);
        assert!(node.actual_order.is_none());
    }

    #[test]
    fn test_inputs_left_then_right() {
        let left = PlanNode::table_scan("a");
        let right = PlanNode::table_scan("b");
        let join = PlanNode::join(left, right, JoinKind::Inner);

        let inputs = join.inputs();
        assert_eq!(inputs.len(), 2);
        assert!(matches!(&inputs[0].kind, PlanKind::TableScan { table } if table == "a"));
        assert!(matches!(&inputs[1].kind, PlanKind::TableScan { table } if table == "b"));
    }

    #[test]
    fn test_node_count() {
        let plan = PlanNode::select(
            PlanNode::filter(PlanNode::table_scan("t")),
            alloc::vec![0, 1],
        );
        assert_eq!(plan.node_count(), 3);

        let plan = PlanNode::union(plan, PlanNode::table_scan("u"));
        assert_eq!(plan.node_count(), 5);
    }
}
