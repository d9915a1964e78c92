//! Coarse-locked handle for using one graph from several threads.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::{AttributedGraph, CapacityObserver, GraphOptions};

/// Cloneable handle to an [`AttributedGraph`] behind a single mutex.
///
/// Every graph operation is short and non-blocking, so one lock around the
/// whole graph is enough. Closures passed to [`SharedGraph::read`] and
/// [`SharedGraph::write`] run with the lock held and must not call back into
/// the same handle.
pub struct SharedGraph<O: CapacityObserver = ()> {
    inner: Arc<Mutex<AttributedGraph<O>>>,
}

impl SharedGraph<()> {
    /// Wraps a new attributed graph built from `options`.
    pub fn with_options(options: &GraphOptions) -> Result<Self> {
        Ok(Self::new(AttributedGraph::with_options(options)?))
    }
}

impl<O: CapacityObserver> SharedGraph<O> {
    /// Takes ownership of `graph`.
    pub fn new(graph: AttributedGraph<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Runs `f` with shared access to the graph.
    pub fn read<R>(&self, f: impl FnOnce(&AttributedGraph<O>) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// Runs `f` with exclusive access to the graph.
    pub fn write<R>(&self, f: impl FnOnce(&mut AttributedGraph<O>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Number of handles sharing this graph.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns the graph if this is the last handle, otherwise gives the
    /// handle back.
    pub fn try_unwrap(self) -> std::result::Result<AttributedGraph<O>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<O: CapacityObserver> Clone for SharedGraph<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementType;

    #[test]
    fn handles_share_one_graph() {
        let shared = SharedGraph::with_options(&GraphOptions::new().uniform_capacity(2)).unwrap();
        let other = shared.clone();
        assert_eq!(shared.handle_count(), 2);
        let node = other.write(|graph| graph.add_node());
        assert!(shared.read(|graph| graph.element_exists(ElementType::Node, node.0)));
        drop(other);
        let Ok(graph) = shared.try_unwrap() else {
            panic!("handle still shared");
        };
        assert_eq!(graph.element_count(ElementType::Node), 1);
    }
}
