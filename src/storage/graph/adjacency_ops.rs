use super::Graph;
use crate::storage::cursor::LinkEndCursor;
use crate::storage::observer::CapacityObserver;
use crate::types::{Direction, EdgeId, LinkCategory, LinkEnd, LinkId, NodeId};

impl<O: CapacityObserver> Graph<O> {
    /// The link end attached to the same node and category bucket just
    /// before `end`.
    pub fn next_link_end(&self, end: LinkEnd) -> Option<LinkEnd> {
        self.topology.node_links.next_child(end.0).map(LinkEnd)
    }

    /// The link `end` belongs to.
    #[inline]
    pub fn link_end_link(&self, end: LinkEnd) -> LinkId {
        end.link()
    }

    /// The node `end` is attached to.
    pub fn link_end_node(&self, end: LinkEnd) -> NodeId {
        if end.is_low() {
            self.link_low_node(end.link())
        } else {
            self.link_high_node(end.link())
        }
    }

    /// The node at the far end of `end`'s link.
    pub fn link_end_other_node(&self, end: LinkEnd) -> NodeId {
        self.link_end_node(end.opposite())
    }

    /// True if `end` is attached to its link's low node.
    #[inline]
    pub fn is_link_end_low(&self, end: LinkEnd) -> bool {
        end.is_low()
    }

    /// True if `end` is attached to its link's high node.
    #[inline]
    pub fn is_link_end_high(&self, end: LinkEnd) -> bool {
        end.is_high()
    }

    /// The edge leaving `end` in `direction`, seen from `end`'s node.
    ///
    /// For the high end, uphill and downhill swap: the link's downhill edge
    /// is the one going uphill away from the high node.
    pub fn link_end_edge(&self, end: LinkEnd, direction: Direction) -> Option<EdgeId> {
        let direction = if end.is_low() {
            direction
        } else {
            direction.reversed()
        };
        self.link_edge(end.link(), direction)
    }

    /// Category of `end`'s link as seen from `end`'s node.
    pub fn link_end_category(&self, end: LinkEnd) -> LinkCategory {
        let category = self.link_category(end.link());
        if end.is_low() {
            category
        } else {
            category.swapped()
        }
    }

    /// Link ends in `node`'s `category` bucket, newest first.
    pub fn link_ends(
        &self,
        node: NodeId,
        category: LinkCategory,
    ) -> LinkEndCursor<'_, O> {
        LinkEndCursor::new(self, node, category)
    }
}
