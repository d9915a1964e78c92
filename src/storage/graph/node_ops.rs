use tracing::trace;

use super::{Graph, CATEGORIES};
use crate::storage::observer::CapacityObserver;
use crate::types::{ElementType, LinkCategory, LinkEnd, NodeId};

impl<O: CapacityObserver> Graph<O> {
    /// Adds a node and returns its id.
    pub fn add_node(&mut self) -> NodeId {
        let node = NodeId(self.allocate(ElementType::Node));
        trace!(node = node.0, "graph.add_node");
        node
    }

    /// Deletes `node` if it exists and no link end is attached to it in any
    /// category bucket.
    pub fn delete_node(&mut self, node: NodeId) -> bool {
        if !self.element_exists(ElementType::Node, node.0) {
            return false;
        }
        if self.node_link_end_total(node) != 0 {
            trace!(node = node.0, "graph.delete_node.rejected");
            return false;
        }
        self.release(ElementType::Node, node.0);
        trace!(node = node.0, "graph.delete_node");
        true
    }

    /// Number of link ends attached to `node` whose link currently has
    /// exactly `category`.
    ///
    /// A loop link contributes both of its ends.
    pub fn node_link_count(&self, node: NodeId, category: LinkCategory) -> usize {
        self.topology
            .node_links
            .child_count(bucket(node, category))
    }

    /// Number of link ends attached to `node` across all categories.
    pub fn node_link_end_total(&self, node: NodeId) -> usize {
        LinkCategory::all()
            .map(|category| self.node_link_count(node, category))
            .sum()
    }

    /// Most recently attached link end in `node`'s `category` bucket.
    ///
    /// Continue with [`Graph::next_link_end`]; iteration runs newest first.
    pub fn first_link_end(&self, node: NodeId, category: LinkCategory) -> Option<LinkEnd> {
        self.topology
            .node_links
            .first_child(bucket(node, category))
            .map(LinkEnd)
    }
}

/// Adjacency parent key of `node`'s `category` bucket.
#[inline]
pub(super) fn bucket(node: NodeId, category: LinkCategory) -> u32 {
    node.0 * CATEGORIES + category.bits() as u32
}
