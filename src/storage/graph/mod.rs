use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::primitives::{ElementList, ElementMap, ElementPairMap, PairKeys};
use crate::types::{ElementType, LinkCategory};

use super::metrics::{default_metrics, GraphMetrics};
use super::observer::{CapacityEvent, CapacityObserver};
use super::options::GraphOptions;

mod adjacency_ops;
mod edge_ops;
mod link_ops;
mod node_ops;
mod tests;

/// Empty slot marker in the flat id arrays.
pub(crate) const NONE: u32 = u32::MAX;

/// Adjacency buckets per node, one per [`LinkCategory`].
const CATEGORIES: u32 = LinkCategory::COUNT;

/// Edge slots per link, one per direction.
const SLOTS: u32 = 3;

/// Low and high node of every link, indexed by link id.
///
/// These arrays are the keys of the link pair index.
#[derive(Clone, Debug, Default)]
pub(crate) struct LinkNodes {
    pub(crate) low: Vec<u32>,
    pub(crate) high: Vec<u32>,
}

impl PairKeys for LinkNodes {
    #[inline]
    fn pair(&self, id: u32) -> (u32, u32) {
        (self.low[id as usize], self.high[id as usize])
    }
}

/// Everything whose size follows the element capacities.
#[derive(Clone, Debug)]
pub(crate) struct Topology {
    /// Parent `node * 8 + category`, child link end.
    pub(crate) node_links: ElementMap,
    /// `link * 3 + direction` to edge id, or [`NONE`].
    pub(crate) link_edges: Vec<u32>,
    pub(crate) link_nodes: LinkNodes,
    /// `(low, high)` to link id.
    pub(crate) link_index: ElementPairMap,
    /// Packed `(link << 2) | direction` per edge.
    pub(crate) edge_links: Vec<u32>,
    /// Parent edge, child transaction.
    pub(crate) edge_transactions: ElementMap,
    pub(crate) transaction_edges: Vec<u32>,
}

impl Topology {
    fn new(options: &GraphOptions) -> Self {
        let nodes = options.node_capacity;
        let links = options.link_capacity;
        let edges = options.edge_capacity;
        let transactions = options.transaction_capacity;
        Self {
            node_links: ElementMap::new(nodes * CATEGORIES as usize, links * 2),
            link_edges: vec![NONE; links * SLOTS as usize],
            link_nodes: LinkNodes {
                low: vec![0; links],
                high: vec![0; links],
            },
            link_index: ElementPairMap::new(links, links),
            edge_links: vec![0; edges],
            edge_transactions: ElementMap::new(edges, transactions),
            transaction_edges: vec![0; transactions],
        }
    }

    /// Resizes the structures that depend on `element_type`'s capacity.
    fn resize(&mut self, element_type: ElementType, capacity: usize) {
        match element_type {
            ElementType::Node => {
                self.node_links
                    .set_parent_capacity(capacity * CATEGORIES as usize);
            }
            ElementType::Link => {
                self.node_links.set_child_capacity(capacity * 2);
                self.link_edges.resize(capacity * SLOTS as usize, NONE);
                self.link_nodes.low.resize(capacity, 0);
                self.link_nodes.high.resize(capacity, 0);
                self.link_index.set_id_capacity(capacity);
                self.link_index
                    .set_bucket_count(capacity, &self.link_nodes);
            }
            ElementType::Edge => {
                self.edge_transactions.set_parent_capacity(capacity);
                self.edge_links.resize(capacity, 0);
            }
            ElementType::Transaction => {
                self.edge_transactions.set_child_capacity(capacity);
                self.transaction_edges.resize(capacity, 0);
            }
            ElementType::Attribute => {}
        }
    }
}

/// Packed multi-relational graph: nodes, links, edges and transactions.
///
/// Every element type is an [`ElementList`], so ids are recycled after
/// deletion and positions `[0, count)` enumerate the live elements. Links
/// join an unordered node pair (at most one per pair), edges occupy one of a
/// link's three direction slots and transactions hang off edges without
/// deduplication. Elements are deleted top-down: a transaction before its
/// edge, an edge before its link, a link before its nodes.
///
/// Accessors that take an id (`link_low_node`, `edge_source`, ...) index flat
/// arrays directly. Passing an id that is not live returns stale data and an
/// id beyond the capacity panics; check [`Graph::element_exists`] first when
/// the id comes from outside.
///
/// Capacity growth of any element type is pushed to the graph's
/// [`CapacityObserver`] after the graph has resized its own arrays.
pub struct Graph<O: CapacityObserver = ()> {
    lists: [ElementList; 4],
    topology: Topology,
    observer: O,
    metrics: Arc<dyn GraphMetrics>,
}

impl Graph<()> {
    /// Creates a graph with the given initial capacities and no observer.
    ///
    /// The capacities are not validated; each must be at most
    /// [`MAX_CAPACITY`](super::MAX_CAPACITY). Use [`Graph::with_options`] for
    /// untrusted input.
    pub fn new(
        node_capacity: usize,
        link_capacity: usize,
        edge_capacity: usize,
        transaction_capacity: usize,
    ) -> Self {
        let options = GraphOptions::new()
            .node_capacity(node_capacity)
            .link_capacity(link_capacity)
            .edge_capacity(edge_capacity)
            .transaction_capacity(transaction_capacity);
        Self::build(&options, ())
    }

    /// Creates a graph from validated options.
    pub fn with_options(options: &GraphOptions) -> Result<Self> {
        Self::with_observer(options, ())
    }
}

impl<O: CapacityObserver> Graph<O> {
    /// Creates a graph that reports capacity growth to `observer`.
    pub fn with_observer(options: &GraphOptions, observer: O) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options, observer))
    }

    pub(crate) fn build(options: &GraphOptions, observer: O) -> Self {
        let lists = [
            ElementList::new(options.node_capacity),
            ElementList::new(options.link_capacity),
            ElementList::new(options.edge_capacity),
            ElementList::new(options.transaction_capacity),
        ];
        Self {
            lists,
            topology: Topology::new(options),
            observer,
            metrics: options.metrics.clone().unwrap_or_else(default_metrics),
        }
    }

    /// The capacity observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the capacity observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Current capacity of `element_type`'s store. Grows automatically as
    /// elements are added; never shrinks. Always 0 for
    /// [`ElementType::Attribute`], which the base graph does not store.
    pub fn element_capacity(&self, element_type: ElementType) -> usize {
        self.list(element_type).map_or(0, ElementList::capacity)
    }

    /// Number of live elements of `element_type`.
    pub fn element_count(&self, element_type: ElementType) -> usize {
        self.list(element_type).map_or(0, ElementList::count)
    }

    /// True if an element of `element_type` with raw id `id` is live.
    pub fn element_exists(&self, element_type: ElementType, id: u32) -> bool {
        self.list(element_type).map_or(false, |list| list.exists(id))
    }

    /// Raw ids of the live elements of `element_type`, in position order.
    pub fn element_ids(&self, element_type: ElementType) -> &[u32] {
        self.list(element_type)
            .map(ElementList::ids)
            .unwrap_or(&[])
    }

    /// Raw id at dense `position` of `element_type`'s store.
    ///
    /// Panics if `position` is beyond the capacity, or for
    /// [`ElementType::Attribute`], which has no store here.
    pub fn element_id(&self, element_type: ElementType, position: usize) -> u32 {
        self.stored_list(element_type).id(position)
    }

    /// Dense position of raw id `id` in `element_type`'s store.
    ///
    /// Panics if `id` is beyond the capacity, or for
    /// [`ElementType::Attribute`], which has no store here.
    pub fn element_position(&self, element_type: ElementType, id: u32) -> usize {
        self.stored_list(element_type).position(id)
    }

    /// Grows `element_type`'s store to at least `capacity`, cascading to the
    /// dependent arrays and the observer. Returns false if no growth was
    /// needed.
    pub fn reserve(&mut self, element_type: ElementType, capacity: usize) -> bool {
        if element_type == ElementType::Attribute {
            return false;
        }
        let Self {
            lists,
            topology,
            observer,
            metrics,
        } = self;
        let metrics: &dyn GraphMetrics = &**metrics;
        lists[element_type.index()].set_capacity_with(capacity, |capacity| {
            grown(topology, observer, metrics, element_type, capacity)
        })
    }

    fn list(&self, element_type: ElementType) -> Option<&ElementList> {
        self.lists.get(element_type.index())
    }

    fn stored_list(&self, element_type: ElementType) -> &ElementList {
        match self.list(element_type) {
            Some(list) => list,
            None => panic!("{element_type} elements are not stored by the base graph"),
        }
    }

    /// Allocates an id of `element_type`, cascading any capacity growth.
    fn allocate(&mut self, element_type: ElementType) -> u32 {
        let Self {
            lists,
            topology,
            observer,
            metrics,
        } = self;
        let metrics: &dyn GraphMetrics = &**metrics;
        let id = lists[element_type.index()].add_with(|capacity| {
            grown(topology, observer, metrics, element_type, capacity)
        });
        metrics.element_added(element_type);
        id
    }

    /// Releases `id` of `element_type`; false if it was not live.
    fn release(&mut self, element_type: ElementType, id: u32) -> bool {
        let deleted = self.lists[element_type.index()].delete(id);
        if deleted {
            self.metrics.element_deleted(element_type);
        }
        deleted
    }
}

/// Capacity cascade: the graph's own arrays first, then the observer.
fn grown<O: CapacityObserver>(
    topology: &mut Topology,
    observer: &mut O,
    metrics: &dyn GraphMetrics,
    element_type: ElementType,
    capacity: usize,
) {
    debug!(element = %element_type, capacity, "graph.capacity_grown");
    topology.resize(element_type, capacity);
    metrics.capacity_grown(element_type, capacity);
    observer.capacity_changed(CapacityEvent {
        element_type,
        capacity,
    });
}

impl<O: CapacityObserver> fmt::Debug for Graph<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Graph");
        for element_type in ElementType::GRAPH {
            let list = &self.lists[element_type.index()];
            s.field(element_type.as_str(), &(list.count(), list.capacity()));
        }
        s.finish()
    }
}
