//! The timegraph: points, chains, edges and events behind one owner.
//!
//! Insertions take `&mut self` and run validation before touching any store,
//! so a failed call leaves the graph exactly as it was. Queries take `&self`.

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainManager, Linkage};
use crate::config::TimegraphConfig;
use crate::error::{Result, TimegraphError};
use crate::event::EventStore;
use crate::query::{CacheStats, GraphView, QueryCache};
use crate::store::{EdgeStore, PointStore};
use crate::types::{ChainId, Edge, PointId, Relation, TimePoint};

/// Counters describing the current graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimegraphStats {
    /// All points.
    pub points: usize,
    /// Points that sit on a chain.
    pub placed_points: usize,
    /// Chains with at least one member.
    pub chains: usize,
    /// Chains emptied by re-chaining.
    pub retired_chains: usize,
    /// All edges.
    pub edges: usize,
    /// Edges whose endpoints lie on different chains.
    pub cross_edges: usize,
    /// Events.
    pub events: usize,
    /// Pseudotime rewrites caused by renumbering, cumulative.
    pub renumbered_points: u64,
}

/// Incremental before-or-at graph over time points.
///
/// ## Example
///
/// ```
/// use timegraph::{Relation, Timegraph};
///
/// let mut graph = Timegraph::new();
/// let a = graph.create_point();
/// let b = graph.create_point();
/// let c = graph.create_point();
///
/// graph.add_relation(a, b)?;
/// graph.add_relation(b, c)?;
///
/// assert_eq!(graph.query(a, c)?, Relation::Before);
/// assert!(graph.add_relation(c, a).is_err());
/// # Ok::<(), timegraph::TimegraphError>(())
/// ```
#[derive(Debug)]
pub struct Timegraph {
    config: TimegraphConfig,
    pub(crate) points: PointStore,
    pub(crate) chains: ChainManager,
    pub(crate) edges: EdgeStore,
    pub(crate) events: EventStore,
    cache: QueryCache,
}

impl Default for Timegraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Timegraph {
    /// Create an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::build(TimegraphConfig::default())
    }

    /// Create an empty graph with a validated configuration.
    pub fn with_config(config: TimegraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TimegraphConfig) -> Self {
        Self {
            chains: ChainManager::new(&config),
            cache: QueryCache::new(&config.cache),
            points: PointStore::new(),
            edges: EdgeStore::new(),
            events: EventStore::new(),
            config,
        }
    }

    fn view(&self) -> GraphView<'_> {
        GraphView {
            points: &self.points,
            chains: &self.chains,
            edges: &self.edges,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &TimegraphConfig {
        &self.config
    }

    /// Create a new, unrelated point.
    pub fn create_point(&mut self) -> PointId {
        self.points.create_point()
    }

    /// Create a new point bound to `name`.
    pub fn create_named_point(&mut self, name: &str) -> Result<PointId> {
        if self.points.point_named(name).is_some() {
            return Err(TimegraphError::DuplicateName(name.to_string()));
        }
        let id = self.points.create_point();
        self.points.name_point(id, name)?;
        Ok(id)
    }

    /// Bind an additional name to an existing point.
    pub fn name_point(&mut self, id: PointId, name: &str) -> Result<()> {
        self.points.name_point(id, name)
    }

    /// Point bound to `name`, if any.
    pub fn point_named(&self, name: &str) -> Option<PointId> {
        self.points.point_named(name)
    }

    /// Fetch a point record.
    pub fn point(&self, id: PointId) -> Result<&TimePoint> {
        self.points.lookup(id)
    }

    /// All points in id order.
    pub fn points(&self) -> impl Iterator<Item = &TimePoint> {
        self.points.iter()
    }

    /// Assert `from <= to`.
    ///
    /// Fails with `Cycle` if `to` already reaches `from` (including
    /// `from == to`); the graph is unchanged in that case. Asserting an edge
    /// that is already stored is a no-op.
    pub fn add_relation(&mut self, from: PointId, to: PointId) -> Result<()> {
        self.points.lookup(from)?;
        self.points.lookup(to)?;

        if self.view().would_cycle(from, to, &self.cache) {
            tracing::debug!(from = %from, to = %to, "relation rejected: cycle");
            return Err(TimegraphError::Cycle { from, to });
        }
        if self.edges.contains(from, to) {
            tracing::trace!(from = %from, to = %to, "relation already stored");
            return Ok(());
        }
        self.commit(from, to);
        Ok(())
    }

    /// Store an edge that is known not to close a cycle.
    pub(crate) fn commit(&mut self, from: PointId, to: PointId) {
        let linkage = self.chains.merge_or_link(&mut self.points, &self.edges, from, to);
        let kind = linkage.edge_kind();
        self.edges.add_edge(from, to, kind);
        if let Linkage::Rechained { moved } = linkage {
            self.edges.reclassify(moved, &self.points);
        }
        tracing::debug!(from = %from, to = %to, kind = %kind, linkage = ?linkage, "relation committed");
    }

    /// Order of `p` relative to `q`, within the configured search budget.
    pub fn query(&self, p: PointId, q: PointId) -> Result<Relation> {
        self.view().relation(p, q, self.config.search_budget, &self.cache)
    }

    /// Order of `p` relative to `q` with an explicit budget (`None` = unbounded).
    pub fn query_with_budget(&self, p: PointId, q: PointId, budget: Option<usize>) -> Result<Relation> {
        self.view().relation(p, q, budget, &self.cache)
    }

    /// Fetch a chain.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.chain(id)
    }

    /// Chains that still have members.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.live_chains()
    }

    /// Direct successors of a point.
    pub fn forward_neighbors(&self, id: PointId) -> Result<Vec<PointId>> {
        self.points.lookup(id)?;
        Ok(self.edges.forward_neighbors(id).collect())
    }

    /// Direct predecessors of a point.
    pub fn backward_neighbors(&self, id: PointId) -> Result<Vec<PointId>> {
        self.points.lookup(id)?;
        Ok(self.edges.backward_neighbors(id).collect())
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges.edges()
    }

    /// Current counters.
    pub fn stats(&self) -> TimegraphStats {
        TimegraphStats {
            points: self.points.len(),
            placed_points: self.points.iter().filter(|p| p.placement().is_some()).count(),
            chains: self.chains.live_count(),
            retired_chains: self.chains.retired_count(),
            edges: self.edges.len(),
            cross_edges: self.edges.cross_len(),
            events: self.events.len(),
            renumbered_points: self.chains.renumbered_count(),
        }
    }

    /// Query cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
