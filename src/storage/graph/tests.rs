#![cfg(test)]

use std::collections::BTreeSet;
use std::sync::Arc;

use super::*;
use crate::storage::metrics::CounterMetrics;
use crate::types::{Direction, EdgeId, LinkEnd, LinkId, NodeId, TransactionId};

const NONE_CATEGORY: LinkCategory = LinkCategory::NONE;
const OUT: LinkCategory = LinkCategory::OUTGOING;
const IN: LinkCategory = LinkCategory::INCOMING;
const FLAT: LinkCategory = LinkCategory::UNDIRECTED;

fn two_nodes() -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::new(16, 16, 16, 16);
    let n0 = graph.add_node();
    let n1 = graph.add_node();
    assert_eq!((n0, n1), (NodeId(0), NodeId(1)));
    (graph, n0, n1)
}

fn counts(graph: &Graph, node: NodeId) -> [usize; 4] {
    [NONE_CATEGORY, OUT, IN, FLAT].map(|category| graph.node_link_count(node, category))
}

fn ends(graph: &Graph, node: NodeId, category: LinkCategory) -> Vec<LinkEnd> {
    graph.link_ends(node, category).collect()
}

mod links {
    use super::*;

    #[test]
    fn uphill_and_downhill_links_land_in_the_none_bucket() {
        for (a, b) in [(0, 1), (1, 0)] {
            let (mut graph, n0, n1) = two_nodes();
            let link = graph.add_link(NodeId(a), NodeId(b)).unwrap();
            assert_eq!(link, LinkId(0));
            assert_eq!(counts(&graph, n0), [1, 0, 0, 0]);
            assert_eq!(counts(&graph, n1), [1, 0, 0, 0]);
            assert_eq!(graph.link_low_node(link), n0);
            assert_eq!(graph.link_high_node(link), n1);
        }
    }

    #[test]
    fn loop_link_attaches_both_ends_to_one_node() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n0).unwrap();
        assert_eq!(counts(&graph, n0), [2, 0, 0, 0]);
        assert_eq!(counts(&graph, n1), [0, 0, 0, 0]);
        assert_eq!(
            ends(&graph, n0, NONE_CATEGORY),
            vec![LinkEnd::high(link), LinkEnd::low(link)]
        );
        assert_eq!(graph.link_end_other_node(LinkEnd::low(link)), n0);
    }

    #[test]
    fn add_link_is_idempotent_in_either_order() {
        let (mut graph, n0, n1) = two_nodes();
        let first = graph.add_link(n0, n1).unwrap();
        let again = graph.add_link(n1, n0).unwrap();
        assert_eq!(first, again);
        assert_eq!(graph.element_count(ElementType::Link), 1);
        assert_eq!(graph.get_link(n1, n0), Some(first));
        assert_eq!(graph.get_link(n0, n0), None);
    }

    #[test]
    fn add_link_requires_both_nodes() {
        let (mut graph, n0, _) = two_nodes();
        assert_eq!(graph.add_link(n0, NodeId(7)), None);
        assert_eq!(graph.add_link(NodeId(999), n0), None);
        assert!(matches!(
            graph.try_add_link(n0, NodeId(7)),
            Err(crate::GraphError::NotFound("node"))
        ));
        assert_eq!(graph.element_count(ElementType::Link), 0);
    }

    #[test]
    fn link_end_accessors() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n1, n0).unwrap();
        let low = graph.first_link_end(n0, NONE_CATEGORY).unwrap();
        let high = graph.first_link_end(n1, NONE_CATEGORY).unwrap();
        assert_eq!(low, LinkEnd::low(link));
        assert_eq!(high, LinkEnd::high(link));
        assert!(graph.is_link_end_low(low));
        assert!(graph.is_link_end_high(high));
        assert_eq!(graph.link_end_link(high), link);
        assert_eq!(graph.link_end_node(low), n0);
        assert_eq!(graph.link_end_node(high), n1);
        assert_eq!(graph.link_end_other_node(high), n0);
        assert_eq!(graph.next_link_end(low), None);
    }
}

mod edges {
    use super::*;

    #[test]
    fn single_edges_move_link_ends_between_buckets() {
        let cases = [
            (Direction::Uphill, [0, 1, 0, 0], [0, 0, 1, 0]),
            (Direction::Downhill, [0, 0, 1, 0], [0, 1, 0, 0]),
            (Direction::Flat, [0, 0, 0, 1], [0, 0, 0, 1]),
        ];
        for (direction, low_counts, high_counts) in cases {
            let (mut graph, n0, n1) = two_nodes();
            let link = graph.add_link(n0, n1).unwrap();
            let edge = graph.add_edge(link, direction).unwrap();
            assert_eq!(edge, EdgeId(0));
            assert_eq!(counts(&graph, n0), low_counts, "{direction:?}");
            assert_eq!(counts(&graph, n1), high_counts, "{direction:?}");
            assert_eq!(graph.link_edge(link, direction), Some(edge));
            assert_eq!(graph.edge_direction(edge), direction);
        }
    }

    #[test]
    fn loop_edges_count_both_ends() {
        for (direction, expected) in [
            (Direction::Flat, [0, 0, 0, 2]),
            (Direction::Uphill, [0, 1, 1, 0]),
            (Direction::Downhill, [0, 1, 1, 0]),
        ] {
            let (mut graph, n0, n1) = two_nodes();
            let link = graph.add_link(n0, n0).unwrap();
            graph.add_edge(link, direction).unwrap();
            assert_eq!(counts(&graph, n0), expected, "{direction:?}");
            assert_eq!(counts(&graph, n1), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn add_edge_is_idempotent_per_slot() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        let edge = graph.add_edge(link, Direction::Uphill).unwrap();
        assert_eq!(graph.add_edge(link, Direction::Uphill), Some(edge));
        assert_eq!(graph.element_count(ElementType::Edge), 1);
        assert_eq!(graph.add_edge(LinkId(5), Direction::Flat), None);
        assert!(graph.try_add_edge(LinkId(5), Direction::Flat).is_err());
    }

    #[test]
    fn link_end_edge_reverses_for_the_high_end() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        let up = graph.add_edge(link, Direction::Uphill).unwrap();
        let low = LinkEnd::low(link);
        let high = LinkEnd::high(link);
        assert_eq!(graph.link_end_edge(low, Direction::Uphill), Some(up));
        assert_eq!(graph.link_end_edge(high, Direction::Downhill), Some(up));
        assert_eq!(graph.link_end_edge(high, Direction::Uphill), None);
        assert_eq!(graph.link_end_category(low), OUT);
        assert_eq!(graph.link_end_category(high), IN);
    }

    #[test]
    fn delete_edge_restores_previous_category() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        let up = graph.add_edge(link, Direction::Uphill).unwrap();
        let down = graph.add_edge(link, Direction::Downhill).unwrap();
        assert_eq!(graph.node_link_count(n0, OUT | IN), 1);
        assert!(graph.delete_edge(down));
        assert_eq!(counts(&graph, n0), [0, 1, 0, 0]);
        assert_eq!(counts(&graph, n1), [0, 0, 1, 0]);
        assert!(graph.delete_edge(up));
        assert_eq!(counts(&graph, n0), [1, 0, 0, 0]);
        assert_eq!(graph.link_category(link), NONE_CATEGORY);
        assert!(!graph.delete_edge(up));
    }
}

mod transactions {
    use super::*;

    #[test]
    fn directed_transactions_report_source_and_destination() {
        for (direction, source, destination) in [
            (Direction::Uphill, 0, 1),
            (Direction::Downhill, 1, 0),
            (Direction::Flat, 0, 1),
        ] {
            let (mut graph, n0, n1) = two_nodes();
            let link = graph.add_link(n0, n1).unwrap();
            let edge = graph.add_edge(link, direction).unwrap();
            let transaction = graph.add_transaction(edge).unwrap();
            assert_eq!(transaction, TransactionId(0));
            assert_eq!(graph.transaction_edge(transaction), edge);
            assert_eq!(graph.edge_link(edge), link);
            assert_eq!(graph.edge_source(edge), NodeId(source));
            assert_eq!(graph.edge_destination(edge), NodeId(destination));
        }
    }

    #[test]
    fn loop_transactions_in_both_directions() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n0).unwrap();
        let e0 = graph.add_edge(link, Direction::Uphill).unwrap();
        let t0 = graph.add_transaction(e0).unwrap();
        let e1 = graph.add_edge(link, Direction::Downhill).unwrap();
        let t1 = graph.add_transaction(e1).unwrap();
        assert_eq!((t0, t1), (TransactionId(0), TransactionId(1)));
        for edge in [e0, e1] {
            assert_eq!(graph.edge_link(edge), link);
            assert_eq!(graph.edge_source(edge), n0);
            assert_eq!(graph.edge_destination(edge), n0);
        }
        assert_eq!(counts(&graph, n0), [0, 0, 0, 0]);
        assert_eq!(graph.node_link_count(n0, OUT | IN), 2);
        assert_eq!(counts(&graph, n1), [0, 0, 0, 0]);
    }

    #[test]
    fn transactions_are_not_deduplicated() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        let e0 = graph.add_edge(link, Direction::Uphill).unwrap();
        let e1 = graph.add_edge(link, Direction::Downhill).unwrap();
        let t0 = graph.add_transaction(e0).unwrap();
        let t1 = graph.add_transaction(e1).unwrap();
        let t2 = graph.add_transaction(e1).unwrap();
        assert_eq!(graph.transaction_edge(t0), e0);
        assert_eq!(graph.transaction_edge(t1), e1);
        assert_eq!(graph.transaction_edge(t2), e1);
        assert_eq!(graph.edge_transaction_count(e1), 2);
        assert_eq!(graph.edge_transactions(e1).collect::<Vec<_>>(), vec![t2, t1]);
        assert_eq!(graph.first_edge_transaction(e1), Some(t2));
        assert_eq!(graph.next_edge_transaction(t2), Some(t1));
        assert_eq!(graph.next_edge_transaction(t1), None);
        assert_eq!(graph.node_link_count(n0, OUT | IN), 1);
        assert_eq!(graph.node_link_count(n1, OUT | IN), 1);
    }

    #[test]
    fn add_transaction_requires_edge() {
        let (mut graph, _, _) = two_nodes();
        assert_eq!(graph.add_transaction(EdgeId(0)), None);
        assert!(matches!(
            graph.try_add_transaction(EdgeId(0)),
            Err(crate::GraphError::NotFound("edge"))
        ));
    }
}

mod deletion {
    use super::*;

    #[test]
    fn elements_are_deleted_top_down() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        let edge = graph.add_edge(link, Direction::Flat).unwrap();
        let transaction = graph.add_transaction(edge).unwrap();

        assert!(!graph.delete_node(n0));
        assert!(!graph.delete_link(link));
        assert!(!graph.delete_edge(edge));

        assert!(graph.delete_transaction(transaction));
        assert!(!graph.delete_transaction(transaction));
        assert!(!graph.delete_link(link));
        assert!(graph.delete_edge(edge));
        assert!(!graph.delete_node(n1));
        assert!(graph.delete_link(link));
        assert_eq!(graph.get_link(n0, n1), None);
        assert!(graph.delete_node(n0));
        assert!(graph.delete_node(n1));
        assert!(!graph.delete_node(n1));
        for element_type in ElementType::GRAPH {
            assert_eq!(graph.element_count(element_type), 0);
        }
    }

    #[test]
    fn deleted_ids_are_recycled_newest_first() {
        let mut graph = Graph::new(4, 4, 4, 4);
        let nodes: Vec<NodeId> = (0..3).map(|_| graph.add_node()).collect();
        assert!(graph.delete_node(nodes[0]));
        assert!(graph.delete_node(nodes[2]));
        assert!(!graph.element_exists(ElementType::Node, 0));
        assert_eq!(graph.add_node(), nodes[2]);
        assert_eq!(graph.add_node(), nodes[0]);
        assert_eq!(graph.add_node(), NodeId(3));
    }

    #[test]
    fn deleted_link_pair_can_be_relinked() {
        let (mut graph, n0, n1) = two_nodes();
        let link = graph.add_link(n0, n1).unwrap();
        assert!(graph.delete_link(link));
        assert_eq!(graph.add_link(n1, n0), Some(link));
        assert_eq!(graph.node_link_count(n0, NONE_CATEGORY), 1);
    }
}

mod capacity {
    use super::*;

    fn observed(capacity: usize) -> Graph<Vec<CapacityEvent>> {
        let options = GraphOptions::new().uniform_capacity(capacity);
        Graph::with_observer(&options, Vec::new()).unwrap()
    }

    #[test]
    fn growth_is_pushed_once_per_doubling() {
        let mut graph = observed(1);
        for _ in 0..5 {
            graph.add_node();
        }
        let events: Vec<usize> = graph
            .observer()
            .iter()
            .filter(|event| event.element_type == ElementType::Node)
            .map(|event| event.capacity)
            .collect();
        assert_eq!(events, vec![2, 4, 8]);
        assert_eq!(graph.element_capacity(ElementType::Node), 8);
    }

    #[test]
    fn zero_capacity_grows_on_first_add() {
        let mut graph = observed(0);
        let n0 = graph.add_node();
        let link = graph.add_link(n0, n0).unwrap();
        let edge = graph.add_edge(link, Direction::Uphill).unwrap();
        graph.add_transaction(edge).unwrap();
        let kinds: Vec<ElementType> = graph
            .observer()
            .iter()
            .map(|event| event.element_type)
            .collect();
        assert_eq!(kinds, ElementType::GRAPH.to_vec());
        assert!(graph.observer().iter().all(|event| event.capacity == 1));
    }

    #[test]
    fn link_lookup_survives_pair_index_growth() {
        let mut graph = Graph::new(1, 1, 1, 1);
        let nodes: Vec<NodeId> = (0..40).map(|_| graph.add_node()).collect();
        let mut links = Vec::new();
        for window in nodes.windows(2) {
            links.push(graph.add_link(window[1], window[0]).unwrap());
        }
        assert_eq!(graph.element_capacity(ElementType::Link), 64);
        for (window, &link) in nodes.windows(2).zip(&links) {
            assert_eq!(graph.get_link(window[0], window[1]), Some(link));
            assert_eq!(graph.link_low_node(link), window[0]);
        }
        assert_eq!(graph.add_link(nodes[0], nodes[1]), Some(links[0]));
    }

    #[test]
    fn growth_keeps_existing_structure() {
        let mut graph = Graph::new(2, 1, 1, 1);
        let n0 = graph.add_node();
        let n1 = graph.add_node();
        let link = graph.add_link(n0, n1).unwrap();
        let edge = graph.add_edge(link, Direction::Uphill).unwrap();
        let transaction = graph.add_transaction(edge).unwrap();
        for _ in 0..10 {
            let node = graph.add_node();
            let other = graph.add_link(node, n0).unwrap();
            let extra = graph.add_edge(other, Direction::Flat).unwrap();
            graph.add_transaction(extra).unwrap();
        }
        assert_eq!(graph.edge_source(edge), n0);
        assert_eq!(graph.transaction_edge(transaction), edge);
        assert_eq!(graph.node_link_count(n0, OUT), 1);
        assert_eq!(graph.node_link_count(n0, FLAT), 10);
        assert_eq!(graph.node_link_count(n1, IN), 1);
    }

    #[test]
    fn reserve_grows_without_adding() {
        let mut graph = observed(2);
        assert!(graph.reserve(ElementType::Edge, 10));
        assert!(!graph.reserve(ElementType::Edge, 4));
        assert!(!graph.reserve(ElementType::Attribute, 4));
        assert_eq!(graph.element_capacity(ElementType::Edge), 10);
        assert_eq!(graph.element_count(ElementType::Edge), 0);
        assert_eq!(
            graph.observer().as_slice(),
            &[CapacityEvent {
                element_type: ElementType::Edge,
                capacity: 10
            }]
        );
    }

    #[test]
    fn attribute_type_is_not_stored_by_the_base_graph() {
        let graph = Graph::new(1, 1, 1, 1);
        assert_eq!(graph.element_capacity(ElementType::Attribute), 0);
        assert_eq!(graph.element_count(ElementType::Attribute), 0);
        assert!(!graph.element_exists(ElementType::Attribute, 0));
        assert!(graph.element_ids(ElementType::Attribute).is_empty());
    }

    #[test]
    fn with_options_rejects_oversized_capacity() {
        let options = GraphOptions::new().node_capacity(crate::storage::options::MAX_CAPACITY + 1);
        assert!(Graph::with_options(&options).is_err());
    }
}

#[test]
fn metrics_see_structural_changes() {
    let metrics = Arc::new(CounterMetrics::default());
    let options = GraphOptions::new().uniform_capacity(1).metrics(metrics.clone());
    let mut graph = Graph::with_options(&options).unwrap();
    let n0 = graph.add_node();
    let n1 = graph.add_node();
    let link = graph.add_link(n0, n1).unwrap();
    assert!(graph.delete_link(link));
    assert!(!graph.delete_link(link));
    assert_eq!(metrics.added(ElementType::Node), 2);
    assert_eq!(metrics.added(ElementType::Link), 1);
    assert_eq!(metrics.deleted(ElementType::Link), 1);
    assert_eq!(metrics.growths(ElementType::Node), 1);
    assert_eq!(metrics.capacity(ElementType::Node), 2);
}

#[test]
fn element_ids_follow_positions() {
    let mut graph = Graph::new(4, 4, 4, 4);
    let nodes: Vec<NodeId> = (0..4).map(|_| graph.add_node()).collect();
    assert!(graph.delete_node(nodes[1]));
    let live: BTreeSet<u32> = graph.element_ids(ElementType::Node).iter().copied().collect();
    assert_eq!(live, BTreeSet::from([0, 2, 3]));
    for (position, &id) in graph.element_ids(ElementType::Node).iter().enumerate() {
        assert_eq!(graph.element_position(ElementType::Node, id), position);
        assert_eq!(graph.element_id(ElementType::Node, position), id);
    }
}

#[test]
fn attribute_queries_on_base_graph() {
    let graph = Graph::new(1, 1, 1, 1);
    assert_eq!(graph.element_capacity(ElementType::Attribute), 0);
    assert_eq!(graph.element_count(ElementType::Attribute), 0);
    assert!(!graph.element_exists(ElementType::Attribute, 0));
    assert!(graph.element_ids(ElementType::Attribute).is_empty());
}

#[test]
#[should_panic(expected = "attribute elements are not stored by the base graph")]
fn attribute_position_lookup_panics_on_base_graph() {
    let graph = Graph::new(1, 1, 1, 1);
    graph.element_position(ElementType::Attribute, 0);
}

#[test]
#[should_panic(expected = "attribute elements are not stored by the base graph")]
fn attribute_id_lookup_panics_on_base_graph() {
    let graph = Graph::new(1, 1, 1, 1);
    graph.element_id(ElementType::Attribute, 0);
}

#[test]
fn debug_lists_count_and_capacity() {
    let mut graph = Graph::new(2, 2, 2, 2);
    graph.add_node();
    let rendered = format!("{graph:?}");
    assert!(rendered.contains("node: (1, 2)"), "{rendered}");
    assert!(rendered.contains("transaction: (0, 2)"), "{rendered}");
}
