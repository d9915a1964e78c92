use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::value::AttributeValue;
use crate::primitives::{ElementList, ElementMap};
use crate::storage::metrics::{default_metrics, GraphMetrics};
use crate::storage::observer::{CapacityEvent, CapacityObserver};
use crate::storage::options::GraphOptions;
use crate::types::{AttributeId, ElementType};

const GRAPH_TYPES: usize = ElementType::GRAPH.len();

/// Named value columns over the elements of a graph.
///
/// Each attribute belongs to one element type and owns one slot per id of
/// that type, so its column is always as long as the element capacity. The
/// table is the capacity observer of the graph it decorates: element growth
/// extends every column of the grown type before the event is passed on to
/// the table's own observer `O`.
pub struct AttributeTable<O: CapacityObserver = ()> {
    attributes: ElementList,
    /// Parent element type index, child attribute id.
    element_attributes: ElementMap,
    element_types: Vec<ElementType>,
    names: Vec<String>,
    by_name: [FxHashMap<String, u32>; GRAPH_TYPES],
    values: Vec<Vec<Option<AttributeValue>>>,
    element_capacities: [usize; GRAPH_TYPES],
    observer: O,
    metrics: Arc<dyn GraphMetrics>,
}

impl<O: CapacityObserver> AttributeTable<O> {
    pub(crate) fn new(options: &GraphOptions, observer: O) -> Self {
        let capacity = options.attribute_capacity;
        Self {
            attributes: ElementList::new(capacity),
            element_attributes: ElementMap::new(GRAPH_TYPES, capacity),
            element_types: vec![ElementType::Node; capacity],
            names: vec![String::new(); capacity],
            by_name: Default::default(),
            values: vec![Vec::new(); capacity],
            element_capacities: ElementType::GRAPH.map(|element_type| options.capacity(element_type)),
            observer,
            metrics: options.metrics.clone().unwrap_or_else(default_metrics),
        }
    }

    /// The observer that receives every forwarded capacity event.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the forwarded observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Current attribute capacity.
    pub fn capacity(&self) -> usize {
        self.attributes.capacity()
    }

    /// Number of live attributes.
    pub fn count(&self) -> usize {
        self.attributes.count()
    }

    /// True if `id` is a live attribute.
    pub fn exists(&self, id: u32) -> bool {
        self.attributes.exists(id)
    }

    /// Raw ids of the live attributes, in position order.
    pub fn ids(&self) -> &[u32] {
        self.attributes.ids()
    }

    pub(crate) fn list(&self) -> &ElementList {
        &self.attributes
    }

    pub(crate) fn add(&mut self, element_type: ElementType, name: &str) -> Option<AttributeId> {
        let index = element_type.index();
        if name.is_empty() || index >= GRAPH_TYPES || self.by_name[index].contains_key(name) {
            return None;
        }
        let Self {
            attributes,
            element_attributes,
            element_types,
            names,
            values,
            observer,
            metrics,
            ..
        } = self;
        let metrics: &dyn GraphMetrics = &**metrics;
        let id = attributes.add_with(|capacity| {
            let columns = Columns {
                element_attributes,
                element_types,
                names,
                values,
            };
            grown(columns, observer, metrics, capacity)
        });
        metrics.element_added(ElementType::Attribute);

        let slot = id as usize;
        self.by_name[index].insert(name.to_owned(), id);
        self.element_attributes.add_child(index as u32, id);
        self.element_types[slot] = element_type;
        self.names[slot] = name.to_owned();
        self.values[slot] = vec![None; self.element_capacities[index]];
        trace!(attribute = id, element = %element_type, name, "graph.add_attribute");
        Some(AttributeId(id))
    }

    /// Grows the attribute store to at least `capacity`. Returns false if no
    /// growth was needed.
    pub(crate) fn reserve(&mut self, capacity: usize) -> bool {
        let Self {
            attributes,
            element_attributes,
            element_types,
            names,
            values,
            observer,
            metrics,
            ..
        } = self;
        let metrics: &dyn GraphMetrics = &**metrics;
        attributes.set_capacity_with(capacity, |capacity| {
            let columns = Columns {
                element_attributes,
                element_types,
                names,
                values,
            };
            grown(columns, observer, metrics, capacity)
        })
    }

    pub(crate) fn delete(&mut self, attribute: AttributeId) -> bool {
        if !self.attributes.delete(attribute.0) {
            return false;
        }
        let slot = attribute.index();
        let element_type = self.element_types[slot];
        let name = std::mem::take(&mut self.names[slot]);
        self.by_name[element_type.index()].remove(&name);
        self.element_attributes
            .delete_child(element_type.index() as u32, attribute.0);
        self.values[slot] = Vec::new();
        self.metrics.element_deleted(ElementType::Attribute);
        trace!(attribute = attribute.0, name = %name, "graph.delete_attribute");
        true
    }

    /// The attribute named `name` on `element_type`, if registered.
    pub fn by_name(&self, element_type: ElementType, name: &str) -> Option<AttributeId> {
        self.by_name
            .get(element_type.index())?
            .get(name)
            .copied()
            .map(AttributeId)
    }

    /// The element type `attribute` stores values for.
    pub fn element_type(&self, attribute: AttributeId) -> ElementType {
        self.element_types[attribute.index()]
    }

    /// Name of `attribute`; empty once it has been deleted.
    pub fn name(&self, attribute: AttributeId) -> &str {
        &self.names[attribute.index()]
    }

    /// Number of attributes on `element_type`.
    pub fn type_count(&self, element_type: ElementType) -> usize {
        match element_type.index() {
            index if index < GRAPH_TYPES => self.element_attributes.child_count(index as u32),
            _ => 0,
        }
    }

    /// Most recently added attribute on `element_type`.
    pub fn first_of_type(&self, element_type: ElementType) -> Option<AttributeId> {
        match element_type.index() {
            index if index < GRAPH_TYPES => self
                .element_attributes
                .first_child(index as u32)
                .map(AttributeId),
            _ => None,
        }
    }

    /// The attribute added to the same element type just before `attribute`.
    pub fn next_of_type(&self, attribute: AttributeId) -> Option<AttributeId> {
        self.element_attributes
            .next_child(attribute.0)
            .map(AttributeId)
    }

    /// Value of `attribute` for `element`, if one has been set.
    ///
    /// Returns `None` for a deleted attribute or an element beyond the
    /// column.
    pub fn value(&self, attribute: AttributeId, element: u32) -> Option<&AttributeValue> {
        self.values
            .get(attribute.index())?
            .get(element as usize)?
            .as_ref()
    }

    /// The whole column of `attribute`, one slot per element id.
    pub fn column(&self, attribute: AttributeId) -> &[Option<AttributeValue>] {
        &self.values[attribute.index()]
    }

    /// Replaces the slot of `element` in `attribute`'s column, returning the
    /// previous value.
    ///
    /// Panics if `attribute` is not live or `element` is beyond the element
    /// capacity.
    pub(crate) fn set(
        &mut self,
        attribute: AttributeId,
        element: u32,
        value: Option<AttributeValue>,
    ) -> Option<AttributeValue> {
        std::mem::replace(&mut self.values[attribute.index()][element as usize], value)
    }
}

/// Per-attribute arrays sized by the attribute capacity.
struct Columns<'a> {
    element_attributes: &'a mut ElementMap,
    element_types: &'a mut Vec<ElementType>,
    names: &'a mut Vec<String>,
    values: &'a mut Vec<Vec<Option<AttributeValue>>>,
}

fn grown<O: CapacityObserver>(
    columns: Columns<'_>,
    observer: &mut O,
    metrics: &dyn GraphMetrics,
    capacity: usize,
) {
    debug!(element = %ElementType::Attribute, capacity, "graph.capacity_grown");
    columns.element_attributes.set_child_capacity(capacity);
    columns.element_types.resize(capacity, ElementType::Node);
    columns.names.resize(capacity, String::new());
    columns.values.resize_with(capacity, Vec::new);
    metrics.capacity_grown(ElementType::Attribute, capacity);
    observer.capacity_changed(CapacityEvent {
        element_type: ElementType::Attribute,
        capacity,
    });
}

impl<O: CapacityObserver> CapacityObserver for AttributeTable<O> {
    fn capacity_changed(&mut self, event: CapacityEvent) {
        let index = event.element_type.index();
        if let Some(capacity) = self.element_capacities.get_mut(index) {
            *capacity = event.capacity;
            for attribute in self.element_attributes.children(index as u32) {
                self.values[attribute as usize].resize(event.capacity, None);
            }
        }
        self.observer.capacity_changed(event);
    }
}

impl<O: CapacityObserver> fmt::Debug for AttributeTable<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_map();
        for &id in self.attributes.ids() {
            let slot = id as usize;
            list.entry(&id, &(self.element_types[slot], &self.names[slot]));
        }
        list.finish()
    }
}
