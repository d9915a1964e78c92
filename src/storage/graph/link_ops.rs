use tracing::trace;

use super::node_ops::bucket;
use super::{Graph, NONE, SLOTS};
use crate::error::{GraphError, Result};
use crate::storage::observer::CapacityObserver;
use crate::types::{Direction, EdgeId, ElementType, LinkCategory, LinkEnd, LinkId, NodeId};

impl<O: CapacityObserver> Graph<O> {
    /// Returns the link joining `a` and `b` in either order, if there is one.
    pub fn get_link(&self, a: NodeId, b: NodeId) -> Option<LinkId> {
        let (low, high) = canonical(a, b);
        self.topology
            .link_index
            .get_value(low.0, high.0, &self.topology.link_nodes)
            .map(LinkId)
    }

    /// Links `a` and `b`, returning the existing link if the pair is already
    /// joined. Returns `None` if either node does not exist.
    ///
    /// `a == b` creates a loop link whose two ends both attach to `a`.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> Option<LinkId> {
        if !self.element_exists(ElementType::Node, a.0)
            || !self.element_exists(ElementType::Node, b.0)
        {
            return None;
        }
        if let Some(link) = self.get_link(a, b) {
            return Some(link);
        }
        let (low, high) = canonical(a, b);
        let link = LinkId(self.allocate(ElementType::Link));
        let topology = &mut self.topology;
        topology.link_nodes.low[link.index()] = low.0;
        topology.link_nodes.high[link.index()] = high.0;
        topology
            .link_index
            .add_value(link.0, &topology.link_nodes);
        topology
            .node_links
            .add_child(bucket(low, LinkCategory::NONE), LinkEnd::low(link).0);
        topology
            .node_links
            .add_child(bucket(high, LinkCategory::NONE), LinkEnd::high(link).0);
        trace!(link = link.0, low = low.0, high = high.0, "graph.add_link");
        Some(link)
    }

    /// Like [`Graph::add_link`], but reports a missing node as an error.
    pub fn try_add_link(&mut self, a: NodeId, b: NodeId) -> Result<LinkId> {
        self.add_link(a, b).ok_or(GraphError::NotFound("node"))
    }

    /// Deletes `link` if it exists and carries no edges.
    pub fn delete_link(&mut self, link: LinkId) -> bool {
        if !self.element_exists(ElementType::Link, link.0) {
            return false;
        }
        if self.link_category(link) != LinkCategory::NONE {
            trace!(link = link.0, "graph.delete_link.rejected");
            return false;
        }
        let low = self.link_low_node(link);
        let high = self.link_high_node(link);
        let topology = &mut self.topology;
        topology.link_index.delete_value(link.0);
        topology
            .node_links
            .delete_child(bucket(low, LinkCategory::NONE), LinkEnd::low(link).0);
        topology
            .node_links
            .delete_child(bucket(high, LinkCategory::NONE), LinkEnd::high(link).0);
        self.release(ElementType::Link, link.0);
        trace!(link = link.0, "graph.delete_link");
        true
    }

    /// The smaller node id of `link`.
    pub fn link_low_node(&self, link: LinkId) -> NodeId {
        NodeId(self.topology.link_nodes.low[link.index()])
    }

    /// The larger node id of `link`.
    pub fn link_high_node(&self, link: LinkId) -> NodeId {
        NodeId(self.topology.link_nodes.high[link.index()])
    }

    /// The edge occupying `link`'s `direction` slot, if any.
    pub fn link_edge(&self, link: LinkId, direction: Direction) -> Option<EdgeId> {
        let edge = self.topology.link_edges[slot(link, direction)];
        (edge != NONE).then_some(EdgeId(edge))
    }

    /// Category of `link` seen from its low end: one bit per occupied
    /// direction slot.
    pub fn link_category(&self, link: LinkId) -> LinkCategory {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.topology.link_edges[slot(link, direction)] != NONE)
            .fold(LinkCategory::NONE, |category, direction| {
                category | LinkCategory::from_bits(direction.category_bit())
            })
    }
}

/// Orders a node pair as `(low, high)`.
#[inline]
fn canonical(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Index of `link`'s `direction` slot in the flat edge table.
#[inline]
pub(super) fn slot(link: LinkId, direction: Direction) -> usize {
    link.index() * SLOTS as usize + direction.index()
}
