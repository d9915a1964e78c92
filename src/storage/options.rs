use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{GraphError, Result};
use crate::types::ElementType;

use super::metrics::GraphMetrics;

/// Largest initial capacity accepted for any element type.
///
/// Ids are `u32`, and the node adjacency buckets need eight slots per node.
pub const MAX_CAPACITY: usize = (u32::MAX / 8) as usize;

/// Default initial capacity for every element type.
pub const DEFAULT_CAPACITY: usize = 16;

/// Configuration options supplied when constructing a [`super::Graph`] or
/// [`super::AttributedGraph`].
///
/// Capacities are only starting points: every store doubles on demand. A
/// capacity of zero is legal and grows on the first add.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphOptions {
    /// Initial node capacity.
    pub node_capacity: usize,
    /// Initial link capacity.
    pub link_capacity: usize,
    /// Initial edge capacity.
    pub edge_capacity: usize,
    /// Initial transaction capacity.
    pub transaction_capacity: usize,
    /// Initial attribute capacity (attributed graphs only).
    pub attribute_capacity: usize,
    /// Optional metrics collection implementation
    #[serde(skip)]
    pub metrics: Option<Arc<dyn GraphMetrics>>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            node_capacity: DEFAULT_CAPACITY,
            link_capacity: DEFAULT_CAPACITY,
            edge_capacity: DEFAULT_CAPACITY,
            transaction_capacity: DEFAULT_CAPACITY,
            attribute_capacity: DEFAULT_CAPACITY,
            metrics: None,
        }
    }
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("node_capacity", &self.node_capacity)
            .field("link_capacity", &self.link_capacity)
            .field("edge_capacity", &self.edge_capacity)
            .field("transaction_capacity", &self.transaction_capacity)
            .field("attribute_capacity", &self.attribute_capacity)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl GraphOptions {
    /// Creates options with the default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a flat TOML table, e.g.
    ///
    /// ```toml
    /// node_capacity = 1024
    /// link_capacity = 4096
    /// ```
    ///
    /// Missing keys keep their defaults; unknown keys are rejected.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: GraphOptions = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that every capacity can be addressed with `u32` ids.
    pub fn validate(&self) -> Result<()> {
        for element_type in [
            ElementType::Node,
            ElementType::Link,
            ElementType::Edge,
            ElementType::Transaction,
            ElementType::Attribute,
        ] {
            let capacity = self.capacity(element_type);
            if capacity > MAX_CAPACITY {
                return Err(GraphError::Config(format!(
                    "{element_type}_capacity {capacity} exceeds {MAX_CAPACITY}"
                )));
            }
        }
        Ok(())
    }

    /// Initial capacity configured for `element_type`.
    pub fn capacity(&self, element_type: ElementType) -> usize {
        match element_type {
            ElementType::Node => self.node_capacity,
            ElementType::Link => self.link_capacity,
            ElementType::Edge => self.edge_capacity,
            ElementType::Transaction => self.transaction_capacity,
            ElementType::Attribute => self.attribute_capacity,
        }
    }

    /// Sets the same initial capacity for every element type.
    pub fn uniform_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self.link_capacity = capacity;
        self.edge_capacity = capacity;
        self.transaction_capacity = capacity;
        self.attribute_capacity = capacity;
        self
    }

    /// Sets the initial node capacity.
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Sets the initial link capacity.
    pub fn link_capacity(mut self, capacity: usize) -> Self {
        self.link_capacity = capacity;
        self
    }

    /// Sets the initial edge capacity.
    pub fn edge_capacity(mut self, capacity: usize) -> Self {
        self.edge_capacity = capacity;
        self
    }

    /// Sets the initial transaction capacity.
    pub fn transaction_capacity(mut self, capacity: usize) -> Self {
        self.transaction_capacity = capacity;
        self
    }

    /// Sets the initial attribute capacity.
    pub fn attribute_capacity(mut self, capacity: usize) -> Self {
        self.attribute_capacity = capacity;
        self
    }

    /// Sets the metrics collection implementation.
    pub fn metrics(mut self, metrics: Arc<dyn GraphMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}
