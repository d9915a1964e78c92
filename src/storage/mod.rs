//! Graph storage: the packed graph, its attribute layer and their ambient
//! configuration.
//!
//! [`Graph`] owns the node, link, edge and transaction stores and keeps the
//! adjacency structures in step with their capacities. [`AttributedGraph`]
//! layers named value columns on top by acting as the graph's
//! [`CapacityObserver`].

/// Named per-element value columns.
///
/// Attribute values are a tagged [`AttributeValue`]; empty slots are `None`.
pub mod attributes;

/// Link end traversal helpers that union category buckets.
pub mod cursor;

mod graph;
mod metrics;
mod observer;
mod options;

pub use attributes::{AttributeTable, AttributeValue, AttributedGraph};
pub use cursor::{filtered_link_ends, link_ends_matching, LinkEndCursor, LinkFilter};
pub use graph::Graph;

/// Metrics collection.
pub use metrics::{default_metrics, CounterMetrics, GraphMetrics, NoopMetrics};

/// Capacity growth notification.
pub use observer::{CapacityEvent, CapacityObserver};

/// Graph configuration options.
pub use options::{GraphOptions, DEFAULT_CAPACITY, MAX_CAPACITY};
