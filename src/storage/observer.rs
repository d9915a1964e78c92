use crate::types::ElementType;

/// Notification that the store for one element type has grown.
///
/// Delivered synchronously, after the graph has resized everything it owns
/// for the new capacity, so observers may query the graph's capacity and see
/// `capacity` already committed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CapacityEvent {
    /// The element type whose store grew.
    pub element_type: ElementType,
    /// The new capacity; ids below it are addressable.
    pub capacity: usize,
}

/// Dependent store that must track element capacities.
///
/// A graph owns exactly one observer and pushes one event per growth, never
/// per add. Capacities only grow.
pub trait CapacityObserver {
    /// Called once for each capacity growth.
    fn capacity_changed(&mut self, event: CapacityEvent);
}

impl CapacityObserver for () {
    #[inline]
    fn capacity_changed(&mut self, _event: CapacityEvent) {}
}

/// Records every event it receives, oldest first.
impl CapacityObserver for Vec<CapacityEvent> {
    fn capacity_changed(&mut self, event: CapacityEvent) {
        self.push(event);
    }
}
