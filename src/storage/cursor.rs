//! Link end traversal helpers layered over the category buckets.
//!
//! The graph only exposes one bucket at a time. These helpers union buckets
//! for the common "all outgoing" or "every link" style queries.

use super::graph::Graph;
use super::observer::CapacityObserver;
use crate::types::{LinkCategory, LinkEnd, NodeId};

/// Which link ends of a node a traversal should visit, judged by the link's
/// category as seen from that node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkFilter {
    /// Every attached link end, with or without edges.
    All,
    /// Links carrying an edge that leaves the node.
    Outgoing,
    /// Links carrying an edge that arrives at the node.
    Incoming,
    /// Links carrying a flat edge.
    Undirected,
    /// Links carrying an edge in either direction.
    Directed,
    /// Links with at least one edge of any kind.
    Connected,
}

impl LinkFilter {
    /// True if a link end in the `category` bucket passes this filter.
    pub fn matches(self, category: LinkCategory) -> bool {
        match self {
            LinkFilter::All => true,
            LinkFilter::Outgoing => category.contains(LinkCategory::OUTGOING),
            LinkFilter::Incoming => category.contains(LinkCategory::INCOMING),
            LinkFilter::Undirected => category.contains(LinkCategory::UNDIRECTED),
            LinkFilter::Directed => {
                category.contains(LinkCategory::OUTGOING)
                    || category.contains(LinkCategory::INCOMING)
            }
            LinkFilter::Connected => category != LinkCategory::NONE,
        }
    }

    /// The category buckets this filter selects.
    pub fn categories(self) -> impl Iterator<Item = LinkCategory> {
        LinkCategory::all().filter(move |&category| self.matches(category))
    }
}

/// Walks one category bucket of a node, newest link end first.
pub struct LinkEndCursor<'a, O: CapacityObserver> {
    graph: &'a Graph<O>,
    next: Option<LinkEnd>,
}

impl<'a, O: CapacityObserver> LinkEndCursor<'a, O> {
    /// Positions a cursor at the head of `node`'s `category` bucket.
    pub fn new(graph: &'a Graph<O>, node: NodeId, category: LinkCategory) -> Self {
        Self {
            graph,
            next: graph.first_link_end(node, category),
        }
    }

    /// The link end the next call to `next` will return.
    pub fn peek(&self) -> Option<LinkEnd> {
        self.next
    }
}

impl<O: CapacityObserver> Iterator for LinkEndCursor<'_, O> {
    type Item = LinkEnd;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.graph.next_link_end(current);
        Some(current)
    }
}

/// Link ends of `node` in every bucket whose category satisfies `predicate`,
/// buckets in ascending category order and each bucket newest first.
pub fn link_ends_matching<'a, O, F>(
    graph: &'a Graph<O>,
    node: NodeId,
    mut predicate: F,
) -> impl Iterator<Item = LinkEnd> + 'a
where
    O: CapacityObserver + 'a,
    F: FnMut(LinkCategory) -> bool + 'a,
{
    LinkCategory::all()
        .filter(move |&category| predicate(category))
        .flat_map(move |category| LinkEndCursor::new(graph, node, category))
}

/// Link ends of `node` selected by `filter`.
pub fn filtered_link_ends<'a, O: CapacityObserver + 'a>(
    graph: &'a Graph<O>,
    node: NodeId,
    filter: LinkFilter,
) -> impl Iterator<Item = LinkEnd> + 'a {
    link_ends_matching(graph, node, move |category| filter.matches(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn star() -> (Graph, NodeId, Vec<LinkEnd>) {
        let mut graph = Graph::new(8, 8, 8, 8);
        let hub = graph.add_node();
        let mut ends = Vec::new();
        for direction in [None, Some(Direction::Uphill), Some(Direction::Downhill), Some(Direction::Flat)] {
            let spoke = graph.add_node();
            let link = graph.add_link(hub, spoke).unwrap();
            if let Some(direction) = direction {
                graph.add_edge(link, direction).unwrap();
            }
            ends.push(LinkEnd::low(link));
        }
        (graph, hub, ends)
    }

    #[test]
    fn filters_select_expected_buckets() {
        let outgoing: Vec<u8> = LinkFilter::Outgoing.categories().map(LinkCategory::bits).collect();
        assert_eq!(outgoing, vec![1, 3, 5, 7]);
        assert_eq!(LinkFilter::All.categories().count(), 8);
        assert_eq!(LinkFilter::Connected.categories().count(), 7);
        assert_eq!(LinkFilter::Directed.categories().count(), 6);
    }

    #[test]
    fn union_over_buckets() {
        let (graph, hub, ends) = star();
        let all: Vec<LinkEnd> = filtered_link_ends(&graph, hub, LinkFilter::All).collect();
        assert_eq!(all, ends);
        let outgoing: Vec<LinkEnd> = filtered_link_ends(&graph, hub, LinkFilter::Outgoing).collect();
        assert_eq!(outgoing, vec![ends[1]]);
        let directed: Vec<LinkEnd> = filtered_link_ends(&graph, hub, LinkFilter::Directed).collect();
        assert_eq!(directed, vec![ends[1], ends[2]]);
        let none: Vec<LinkEnd> =
            link_ends_matching(&graph, hub, |category| category == LinkCategory::NONE).collect();
        assert_eq!(none, vec![ends[0]]);
    }

    #[test]
    fn cursor_peeks_without_advancing() {
        let (graph, hub, ends) = star();
        let mut cursor = LinkEndCursor::new(&graph, hub, LinkCategory::UNDIRECTED);
        assert_eq!(cursor.peek(), Some(ends[3]));
        assert_eq!(cursor.next(), Some(ends[3]));
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
    }
}
