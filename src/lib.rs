//! Compact, capacity-managed, multi-relational graph engine.
//!
//! Nodes are joined by links (one per unordered node pair), links carry up to
//! three directed edges and edges carry any number of transactions. Every
//! element type lives in a packed id/position list that grows by doubling,
//! and dependent stores (adjacency maps, the link pair index and attribute
//! columns) follow those capacities through explicit capacity events.

pub mod error;
pub mod logging;
pub mod primitives;
pub mod shared;
pub mod storage;
pub mod types;

pub use error::{GraphError, Result};
pub use shared::SharedGraph;
pub use storage::{
    AttributeValue, AttributedGraph, CapacityEvent, CapacityObserver, Graph, GraphOptions,
};
pub use types::{
    AttributeId, Direction, EdgeId, ElementType, LinkCategory, LinkEnd, LinkId, NodeId,
    TransactionId,
};
