//! Per-node-kind ordering behavior.
//!
//! The catalog is a collaborator input to the ordering corrector: it maps a
//! plan node kind to its ordering descriptor as a pure function. The tree
//! itself does not own this metadata, so callers with non-standard operator
//! semantics can substitute their own catalog.

use crate::node::PlanKind;

/// Ordering behavior of one plan node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderingDescriptor {
    /// The node emits rows in the order it received them.
    pub preserves_order: bool,
    /// The node unconditionally destroys any incoming order.
    pub breaks_order: bool,
    /// The node requires its input to arrive ordered.
    pub is_order_sensitive: bool,
    /// The node itself imposes an order (explicit sort or ordered scan).
    pub is_sorter: bool,
}

impl OrderingDescriptor {
    /// Order flows through untouched; the node neither needs nor makes one.
    pub const fn passthrough() -> Self {
        Self {
            preserves_order: true,
            breaks_order: false,
            is_order_sensitive: false,
            is_sorter: false,
        }
    }

    /// The node establishes its own order.
    pub const fn sorter() -> Self {
        Self {
            preserves_order: true,
            breaks_order: false,
            is_order_sensitive: false,
            is_sorter: true,
        }
    }

    /// The node destroys any incoming order.
    pub const fn breaker() -> Self {
        Self {
            preserves_order: false,
            breaks_order: true,
            is_order_sensitive: false,
            is_sorter: false,
        }
    }

    /// The node requires ordered input and passes the order through.
    pub const fn ordered_consumer() -> Self {
        Self {
            preserves_order: true,
            breaks_order: false,
            is_order_sensitive: true,
            is_sorter: false,
        }
    }
}

/// Maps plan node kinds to their ordering descriptors.
pub trait NodeCatalog {
    fn descriptor(&self, kind: &PlanKind) -> OrderingDescriptor;
}

/// The standard relational catalog.
///
/// Scans and sorts establish order; merge-style joins and set operators need
/// ordered input and keep it; aggregation consumes ordered groups and emits
/// unordered results; concatenation destroys order outright.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCatalog;

impl DefaultCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl NodeCatalog for DefaultCatalog {
    fn descriptor(&self, kind: &PlanKind) -> OrderingDescriptor {
        match kind {
            PlanKind::IndexScan { .. } | PlanKind::Sort { .. } => OrderingDescriptor::sorter(),
            PlanKind::TableScan { .. }
            | PlanKind::Filter { .. }
            | PlanKind::Select { .. }
            | PlanKind::Apply { .. } => OrderingDescriptor::passthrough(),
            PlanKind::Join { .. }
            | PlanKind::PredicateJoin { .. }
            | PlanKind::Union { .. }
            | PlanKind::Intersect { .. }
            | PlanKind::Except { .. } => OrderingDescriptor::ordered_consumer(),
            PlanKind::Aggregate { .. } => OrderingDescriptor {
                preserves_order: false,
                breaks_order: true,
                is_order_sensitive: true,
                is_sorter: false,
            },
            PlanKind::Concat { .. } => OrderingDescriptor::breaker(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PlanNode;
    use tessera_order::DirectionCollection;

    #[test]
    fn test_default_catalog_scan_and_sort_are_sorters() {
        let catalog = DefaultCatalog::new();
        let scan = PlanNode::index_scan("idx", DirectionCollection::asc(0), None);
        let sort = PlanNode::sort(PlanNode::table_scan("t"), DirectionCollection::asc(0));

        assert!(catalog.descriptor(&scan.kind).is_sorter);
        assert!(catalog.descriptor(&sort.kind).is_sorter);
        assert!(!catalog.descriptor(&scan.kind).breaks_order);
    }

    #[test]
    fn test_default_catalog_aggregate_breaks_order() {
        let catalog = DefaultCatalog::new();
        let agg = PlanNode::aggregate(PlanNode::table_scan("t"));
        let descriptor = catalog.descriptor(&agg.kind);

        assert!(descriptor.breaks_order);
        assert!(descriptor.is_order_sensitive);
        assert!(!descriptor.is_sorter);
    }

    #[test]
    fn test_default_catalog_merge_operators_need_order() {
        let catalog = DefaultCatalog::new();
        let a = || PlanNode::table_scan("a");
        let b = || PlanNode::table_scan("b");

        for node in [
            PlanNode::join(a(), b(), crate::node::JoinKind::Inner),
            PlanNode::union(a(), b()),
            PlanNode::intersect(a(), b()),
            PlanNode::except(a(), b()),
        ] {
            let descriptor = catalog.descriptor(&node.kind);
            assert!(descriptor.is_order_sensitive);
            assert!(descriptor.preserves_order);
        }

        // Concatenation interleaves two streams; nothing survives
        let concat = PlanNode::concat(a(), b());
        assert!(catalog.descriptor(&concat.kind).breaks_order);
    }
}
