use tracing::trace;

use super::link_ops::slot;
use super::node_ops::bucket;
use super::{Graph, NONE};
use crate::error::{GraphError, Result};
use crate::storage::observer::CapacityObserver;
use crate::types::{
    Direction, EdgeId, ElementType, LinkCategory, LinkEnd, LinkId, NodeId, TransactionId,
};

const DIRECTION_MASK: u32 = 0b11;

impl<O: CapacityObserver> Graph<O> {
    /// Adds an edge in `link`'s `direction` slot, returning the edge already
    /// there if the slot is occupied. Returns `None` if `link` does not exist.
    ///
    /// Both link ends move to the bucket of the link's new category.
    pub fn add_edge(&mut self, link: LinkId, direction: Direction) -> Option<EdgeId> {
        if !self.element_exists(ElementType::Link, link.0) {
            return None;
        }
        if let Some(edge) = self.link_edge(link, direction) {
            return Some(edge);
        }
        let old = self.link_category(link);
        let new = old | LinkCategory::from_bits(direction.category_bit());
        self.recategorize(link, old, new);

        let edge = EdgeId(self.allocate(ElementType::Edge));
        self.topology.link_edges[slot(link, direction)] = edge.0;
        self.topology.edge_links[edge.index()] = (link.0 << 2) | direction.index() as u32;
        trace!(edge = edge.0, link = link.0, ?direction, "graph.add_edge");
        Some(edge)
    }

    /// Like [`Graph::add_edge`], but reports a missing link as an error.
    pub fn try_add_edge(&mut self, link: LinkId, direction: Direction) -> Result<EdgeId> {
        self.add_edge(link, direction)
            .ok_or(GraphError::NotFound("link"))
    }

    /// Deletes `edge` if it exists and carries no transactions.
    pub fn delete_edge(&mut self, edge: EdgeId) -> bool {
        if !self.element_exists(ElementType::Edge, edge.0) {
            return false;
        }
        if self.edge_transaction_count(edge) != 0 {
            trace!(edge = edge.0, "graph.delete_edge.rejected");
            return false;
        }
        let link = self.edge_link(edge);
        let direction = self.edge_direction(edge);
        let old = self.link_category(link);
        let new = LinkCategory::from_bits(old.bits() ^ direction.category_bit());
        self.recategorize(link, old, new);

        self.topology.link_edges[slot(link, direction)] = NONE;
        self.release(ElementType::Edge, edge.0);
        trace!(edge = edge.0, link = link.0, "graph.delete_edge");
        true
    }

    /// Adds a transaction to `edge`. Returns `None` if `edge` does not exist.
    pub fn add_transaction(&mut self, edge: EdgeId) -> Option<TransactionId> {
        if !self.element_exists(ElementType::Edge, edge.0) {
            return None;
        }
        let transaction = TransactionId(self.allocate(ElementType::Transaction));
        self.topology.transaction_edges[transaction.index()] = edge.0;
        self.topology
            .edge_transactions
            .add_child(edge.0, transaction.0);
        trace!(transaction = transaction.0, edge = edge.0, "graph.add_transaction");
        Some(transaction)
    }

    /// Like [`Graph::add_transaction`], but reports a missing edge as an
    /// error.
    pub fn try_add_transaction(&mut self, edge: EdgeId) -> Result<TransactionId> {
        self.add_transaction(edge)
            .ok_or(GraphError::NotFound("edge"))
    }

    /// Deletes `transaction` if it exists.
    pub fn delete_transaction(&mut self, transaction: TransactionId) -> bool {
        if !self.element_exists(ElementType::Transaction, transaction.0) {
            return false;
        }
        let edge = self.transaction_edge(transaction);
        self.topology
            .edge_transactions
            .delete_child(edge.0, transaction.0);
        self.release(ElementType::Transaction, transaction.0);
        trace!(transaction = transaction.0, "graph.delete_transaction");
        true
    }

    /// The link `edge` belongs to.
    pub fn edge_link(&self, edge: EdgeId) -> LinkId {
        LinkId(self.topology.edge_links[edge.index()] >> 2)
    }

    /// The direction slot `edge` occupies.
    pub fn edge_direction(&self, edge: EdgeId) -> Direction {
        match self.topology.edge_links[edge.index()] & DIRECTION_MASK {
            0 => Direction::Uphill,
            1 => Direction::Downhill,
            _ => Direction::Flat,
        }
    }

    /// Source node of `edge`: the high node for downhill edges, otherwise
    /// the low node.
    pub fn edge_source(&self, edge: EdgeId) -> NodeId {
        let link = self.edge_link(edge);
        match self.edge_direction(edge) {
            Direction::Downhill => self.link_high_node(link),
            Direction::Uphill | Direction::Flat => self.link_low_node(link),
        }
    }

    /// Destination node of `edge`: the low node for downhill edges,
    /// otherwise the high node.
    pub fn edge_destination(&self, edge: EdgeId) -> NodeId {
        let link = self.edge_link(edge);
        match self.edge_direction(edge) {
            Direction::Downhill => self.link_low_node(link),
            Direction::Uphill | Direction::Flat => self.link_high_node(link),
        }
    }

    /// Number of transactions on `edge`.
    pub fn edge_transaction_count(&self, edge: EdgeId) -> usize {
        self.topology.edge_transactions.child_count(edge.0)
    }

    /// Most recently added transaction on `edge`.
    pub fn first_edge_transaction(&self, edge: EdgeId) -> Option<TransactionId> {
        self.topology
            .edge_transactions
            .first_child(edge.0)
            .map(TransactionId)
    }

    /// The transaction added to the same edge just before `transaction`.
    pub fn next_edge_transaction(&self, transaction: TransactionId) -> Option<TransactionId> {
        self.topology
            .edge_transactions
            .next_child(transaction.0)
            .map(TransactionId)
    }

    /// Transactions on `edge`, newest first.
    pub fn edge_transactions(&self, edge: EdgeId) -> impl Iterator<Item = TransactionId> + '_ {
        self.topology
            .edge_transactions
            .children(edge.0)
            .map(TransactionId)
    }

    /// The edge `transaction` belongs to.
    pub fn transaction_edge(&self, transaction: TransactionId) -> EdgeId {
        EdgeId(self.topology.transaction_edges[transaction.index()])
    }

    /// Moves both ends of `link` from the buckets of category `old` to those
    /// of `new`. The high end sees the category with its directions swapped.
    fn recategorize(&mut self, link: LinkId, old: LinkCategory, new: LinkCategory) {
        let low = self.link_low_node(link);
        let high = self.link_high_node(link);
        let (low_end, high_end) = (LinkEnd::low(link).0, LinkEnd::high(link).0);
        let node_links = &mut self.topology.node_links;
        node_links.delete_child(bucket(low, old), low_end);
        node_links.delete_child(bucket(high, old.swapped()), high_end);
        node_links.add_child(bucket(low, new), low_end);
        node_links.add_child(bucket(high, new.swapped()), high_end);
    }
}
