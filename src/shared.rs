//! Thread-safe handle over a timegraph.
//!
//! Any number of readers may query concurrently; insertions take the write
//! lock and therefore see, and leave behind, a consistent graph. Readers
//! share the query cache, which takes its own write lock only to record a
//! newly found answer.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::TimegraphConfig;
use crate::error::Result;
use crate::graph::{Timegraph, TimegraphStats};
use crate::snapshot::GraphSnapshot;
use crate::types::{Event, PointId, Relation};

/// Cloneable handle to a timegraph behind a readers-writer lock.
#[derive(Debug, Clone, Default)]
pub struct SharedTimegraph {
    inner: Arc<RwLock<Timegraph>>,
}

impl SharedTimegraph {
    /// Wrap an existing graph.
    pub fn new(graph: Timegraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Create an empty shared graph with a validated configuration.
    pub fn with_config(config: TimegraphConfig) -> Result<Self> {
        Timegraph::with_config(config).map(Self::new)
    }

    /// Create a new point.
    pub fn create_point(&self) -> PointId {
        self.inner.write().create_point()
    }

    /// Create an event over two fresh points.
    pub fn create_event(&self) -> Event {
        self.inner.write().create_event()
    }

    /// Assert `from <= to`.
    pub fn add_relation(&self, from: PointId, to: PointId) -> Result<()> {
        self.inner.write().add_relation(from, to)
    }

    /// Order of `p` relative to `q`.
    pub fn query(&self, p: PointId, q: PointId) -> Result<Relation> {
        self.inner.read().query(p, q)
    }

    /// Current counters.
    pub fn stats(&self) -> TimegraphStats {
        self.inner.read().stats()
    }

    /// Dump the graph under the read lock.
    pub fn snapshot(&self) -> Result<GraphSnapshot> {
        self.inner.read().snapshot()
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Timegraph) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access.
    ///
    /// Several insertions made inside one closure are observed atomically
    /// by readers.
    pub fn write<R>(&self, f: impl FnOnce(&mut Timegraph) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<Timegraph> for SharedTimegraph {
    fn from(graph: Timegraph) -> Self {
        Self::new(graph)
    }
}
