use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::ElementType;

/// Trait for tracking structural changes in a graph.
///
/// The graph reports every successful add, delete and capacity growth. A rejected
/// operation (missing parent, remaining dependents) is not reported.
pub trait GraphMetrics: Send + Sync {
    /// Records that a new element of `element_type` became live.
    fn element_added(&self, element_type: ElementType);

    /// Records that an element of `element_type` was deleted.
    fn element_deleted(&self, element_type: ElementType);

    /// Records that the store for `element_type` grew to `capacity`.
    fn capacity_grown(&self, element_type: ElementType, capacity: usize);
}

/// A no-op implementation of [`GraphMetrics`] that discards all recorded metrics.
#[derive(Default)]
pub struct NoopMetrics;

impl GraphMetrics for NoopMetrics {
    fn element_added(&self, _element_type: ElementType) {}
    fn element_deleted(&self, _element_type: ElementType) {}
    fn capacity_grown(&self, _element_type: ElementType, _capacity: usize) {}
}

const TYPES: usize = 5;

/// A thread-safe counter-based implementation of [`GraphMetrics`].
///
/// Counters are indexed by [`ElementType::index`].
#[derive(Default)]
pub struct CounterMetrics {
    /// Elements added, per element type.
    pub added: [AtomicU64; TYPES],

    /// Elements deleted, per element type.
    pub deleted: [AtomicU64; TYPES],

    /// Capacity growth events, per element type.
    pub growths: [AtomicU64; TYPES],

    /// Most recent capacity reported, per element type.
    pub capacity: [AtomicU64; TYPES],
}

impl CounterMetrics {
    /// Elements of `element_type` added so far.
    pub fn added(&self, element_type: ElementType) -> u64 {
        self.added[element_type.index()].load(Ordering::Relaxed)
    }

    /// Elements of `element_type` deleted so far.
    pub fn deleted(&self, element_type: ElementType) -> u64 {
        self.deleted[element_type.index()].load(Ordering::Relaxed)
    }

    /// Growth events seen for `element_type`.
    pub fn growths(&self, element_type: ElementType) -> u64 {
        self.growths[element_type.index()].load(Ordering::Relaxed)
    }

    /// Last capacity reported for `element_type`.
    pub fn capacity(&self, element_type: ElementType) -> u64 {
        self.capacity[element_type.index()].load(Ordering::Relaxed)
    }
}

impl GraphMetrics for CounterMetrics {
    fn element_added(&self, element_type: ElementType) {
        self.added[element_type.index()].fetch_add(1, Ordering::Relaxed);
    }

    fn element_deleted(&self, element_type: ElementType) {
        self.deleted[element_type.index()].fetch_add(1, Ordering::Relaxed);
    }

    fn capacity_grown(&self, element_type: ElementType, capacity: usize) {
        self.growths[element_type.index()].fetch_add(1, Ordering::Relaxed);
        self.capacity[element_type.index()].store(capacity as u64, Ordering::Relaxed);
    }
}

/// Returns the default metrics implementation wrapped in an [`Arc`].
///
/// The default implementation is [`NoopMetrics`].
pub fn default_metrics() -> Arc<dyn GraphMetrics> {
    Arc::new(NoopMetrics)
}
