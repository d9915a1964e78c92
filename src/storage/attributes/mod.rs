#![forbid(unsafe_code)]

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::{GraphError, Result};
use crate::storage::graph::Graph;
use crate::storage::observer::CapacityObserver;
use crate::storage::options::GraphOptions;
use crate::types::{AttributeId, ElementType};

mod table;
mod value;

pub use table::AttributeTable;
pub use value::AttributeValue;

/// A [`Graph`] with named value columns per element type.
///
/// All structural operations of the base graph are reachable through
/// `Deref`. The element queries below additionally understand
/// [`ElementType::Attribute`]. Capacity events from the graph, and the
/// attribute store's own growth, reach the observer `O` after the columns
/// have been resized.
pub struct AttributedGraph<O: CapacityObserver = ()> {
    graph: Graph<AttributeTable<O>>,
}

impl AttributedGraph<()> {
    /// Creates an attributed graph with the given initial capacities.
    ///
    /// The capacities are not validated; each must be at most
    /// [`MAX_CAPACITY`](crate::storage::MAX_CAPACITY). Use
    /// [`AttributedGraph::with_options`] for untrusted input.
    pub fn new(
        node_capacity: usize,
        link_capacity: usize,
        edge_capacity: usize,
        transaction_capacity: usize,
        attribute_capacity: usize,
    ) -> Self {
        let options = GraphOptions::new()
            .node_capacity(node_capacity)
            .link_capacity(link_capacity)
            .edge_capacity(edge_capacity)
            .transaction_capacity(transaction_capacity)
            .attribute_capacity(attribute_capacity);
        let table = AttributeTable::new(&options, ());
        Self {
            graph: Graph::build(&options, table),
        }
    }

    /// Creates an attributed graph from validated options.
    pub fn with_options(options: &GraphOptions) -> Result<Self> {
        Self::with_observer(options, ())
    }
}

impl<O: CapacityObserver> AttributedGraph<O> {
    /// Creates an attributed graph that forwards capacity growth, including
    /// attribute growth, to `observer`.
    pub fn with_observer(options: &GraphOptions, observer: O) -> Result<Self> {
        options.validate()?;
        let table = AttributeTable::new(options, observer);
        Ok(Self {
            graph: Graph::with_observer(options, table)?,
        })
    }

    /// The attribute table.
    pub fn attributes(&self) -> &AttributeTable<O> {
        self.graph.observer()
    }

    fn table_mut(&mut self) -> &mut AttributeTable<O> {
        self.graph.observer_mut()
    }

    /// The forwarded capacity observer.
    pub fn observer(&self) -> &O {
        self.attributes().observer()
    }

    /// Mutable access to the forwarded capacity observer.
    pub fn observer_mut(&mut self) -> &mut O {
        self.table_mut().observer_mut()
    }

    /// Current capacity of `element_type`'s store, attributes included.
    pub fn element_capacity(&self, element_type: ElementType) -> usize {
        match element_type {
            ElementType::Attribute => self.attributes().capacity(),
            _ => self.graph.element_capacity(element_type),
        }
    }

    /// Number of live elements of `element_type`, attributes included.
    pub fn element_count(&self, element_type: ElementType) -> usize {
        match element_type {
            ElementType::Attribute => self.attributes().count(),
            _ => self.graph.element_count(element_type),
        }
    }

    /// True if an element of `element_type` with raw id `id` is live.
    pub fn element_exists(&self, element_type: ElementType, id: u32) -> bool {
        match element_type {
            ElementType::Attribute => self.attributes().exists(id),
            _ => self.graph.element_exists(element_type, id),
        }
    }

    /// Raw ids of the live elements of `element_type`, in position order.
    pub fn element_ids(&self, element_type: ElementType) -> &[u32] {
        match element_type {
            ElementType::Attribute => self.attributes().ids(),
            _ => self.graph.element_ids(element_type),
        }
    }

    /// Raw id at dense `position` of `element_type`'s store.
    pub fn element_id(&self, element_type: ElementType, position: usize) -> u32 {
        match element_type {
            ElementType::Attribute => self.attributes().list().id(position),
            _ => self.graph.element_id(element_type, position),
        }
    }

    /// Dense position of raw id `id` in `element_type`'s store.
    pub fn element_position(&self, element_type: ElementType, id: u32) -> usize {
        match element_type {
            ElementType::Attribute => self.attributes().list().position(id),
            _ => self.graph.element_position(element_type, id),
        }
    }

    /// Grows `element_type`'s store to at least `capacity`, attributes
    /// included. Returns false if no growth was needed.
    pub fn reserve(&mut self, element_type: ElementType, capacity: usize) -> bool {
        match element_type {
            ElementType::Attribute => self.table_mut().reserve(capacity),
            _ => self.graph.reserve(element_type, capacity),
        }
    }

    /// Registers an attribute called `name` for `element_type`.
    ///
    /// Returns `None` if `name` is empty, is already used by another
    /// attribute of the same element type, or `element_type` is
    /// [`ElementType::Attribute`]. The new column starts empty and spans the
    /// current element capacity.
    pub fn add_attribute(&mut self, element_type: ElementType, name: &str) -> Option<AttributeId> {
        self.table_mut().add(element_type, name)
    }

    /// Like [`AttributedGraph::add_attribute`], but explains a rejection.
    pub fn try_add_attribute(&mut self, element_type: ElementType, name: &str) -> Result<AttributeId> {
        if element_type == ElementType::Attribute {
            return Err(GraphError::InvalidArgument(
                "attributes cannot be attached to attributes".to_owned(),
            ));
        }
        if name.is_empty() {
            return Err(GraphError::InvalidArgument("empty attribute name".to_owned()));
        }
        self.add_attribute(element_type, name).ok_or_else(|| {
            GraphError::InvalidArgument(format!("duplicate {element_type} attribute {name:?}"))
        })
    }

    /// Deletes `attribute`, dropping its name and every stored value.
    pub fn delete_attribute(&mut self, attribute: AttributeId) -> bool {
        self.table_mut().delete(attribute)
    }

    /// The attribute named `name` on `element_type`, if registered.
    pub fn attribute_by_name(&self, element_type: ElementType, name: &str) -> Option<AttributeId> {
        self.attributes().by_name(element_type, name)
    }

    /// The element type `attribute` stores values for.
    pub fn attribute_element_type(&self, attribute: AttributeId) -> ElementType {
        self.attributes().element_type(attribute)
    }

    /// Name of `attribute`.
    pub fn attribute_name(&self, attribute: AttributeId) -> &str {
        self.attributes().name(attribute)
    }

    /// Number of attributes registered for `element_type`.
    pub fn element_type_attribute_count(&self, element_type: ElementType) -> usize {
        self.attributes().type_count(element_type)
    }

    /// Most recently added attribute of `element_type`.
    pub fn first_element_type_attribute(&self, element_type: ElementType) -> Option<AttributeId> {
        self.attributes().first_of_type(element_type)
    }

    /// The attribute of the same element type added just before `attribute`.
    pub fn next_element_type_attribute(&self, attribute: AttributeId) -> Option<AttributeId> {
        self.attributes().next_of_type(attribute)
    }

    /// Attributes of `element_type`, newest first.
    pub fn element_type_attributes(
        &self,
        element_type: ElementType,
    ) -> impl Iterator<Item = AttributeId> + '_ {
        let mut next = self.first_element_type_attribute(element_type);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_element_type_attribute(current);
            Some(current)
        })
    }

    /// Value of `attribute` for element `element`, if set.
    pub fn attribute_value(&self, attribute: AttributeId, element: u32) -> Option<&AttributeValue> {
        self.attributes().value(attribute, element)
    }

    /// Every slot of `attribute`'s column, indexed by element id.
    pub fn attribute_values(&self, attribute: AttributeId) -> &[Option<AttributeValue>] {
        self.attributes().column(attribute)
    }

    /// Stores `value` for element `element`, returning the previous value.
    ///
    /// The element itself need not be live. Panics if `attribute` is not
    /// live or `element` is beyond the capacity of the attribute's element
    /// type.
    pub fn set_attribute_value(
        &mut self,
        attribute: AttributeId,
        element: u32,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.table_mut().set(attribute, element, Some(value.into()))
    }

    /// Empties the slot of element `element`, returning the previous value.
    pub fn clear_attribute_value(&mut self, attribute: AttributeId, element: u32) -> Option<AttributeValue> {
        self.table_mut().set(attribute, element, None)
    }

    /// Stores one loader cell. `null` clears the slot; arrays and objects
    /// are rejected without touching the slot.
    pub fn set_attribute_json(
        &mut self,
        attribute: AttributeId,
        element: u32,
        value: serde_json::Value,
    ) -> Result<Option<AttributeValue>> {
        if !self.attributes().exists(attribute.0) {
            return Err(GraphError::NotFound("attribute"));
        }
        let element_type = self.attribute_element_type(attribute);
        if element as usize >= self.element_capacity(element_type) {
            return Err(GraphError::InvalidArgument(format!(
                "{element_type} {element} is beyond capacity"
            )));
        }
        let value = AttributeValue::from_json(value)?;
        Ok(self.table_mut().set(attribute, element, value))
    }
}

impl<O: CapacityObserver> Deref for AttributedGraph<O> {
    type Target = Graph<AttributeTable<O>>;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

impl<O: CapacityObserver> DerefMut for AttributedGraph<O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graph
    }
}

impl<O: CapacityObserver> fmt::Debug for AttributedGraph<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributedGraph")
            .field("graph", &self.graph)
            .field("attributes", self.attributes())
            .finish()
    }
}
