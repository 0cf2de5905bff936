//! # timegraph
//!
//! Incremental temporal reasoning over time points.
//!
//! A timegraph stores assertions of the form `p <= q` ("p is before or at
//! q") and answers, for any two points, whether one is known to precede the
//! other.
//!
//! ## Core Contract
//!
//! 1. Every accepted relation keeps the graph acyclic; a relation that would
//!    close a cycle is rejected and the graph is left untouched
//! 2. `Before`/`After` answers are always backed by a real path of edges
//! 3. Points linked along a chain compare in constant time by pseudotime
//!
//! ## Architecture
//!
//! ```text
//! add_relation → cycle check → ChainManager (chain / cross edge) → EdgeStore
//!                                     ↓
//! query → same chain? → cache → chain-level bound → bounded search
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same insertion sequence + same config → identical chains and pseudotimes
//! - Snapshots list edges in insertion order and replay to the same graph

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod chain;
pub mod query;
pub mod graph;
pub mod event;
pub mod snapshot;
pub mod shared;
pub mod config;
pub mod error;
pub mod canonical;

// Re-exports
pub use types::{PointId, ChainId, Placement, Pseudotime, TimePoint, Edge, EdgeKind, Relation, Event, EventId};
pub use graph::{Timegraph, TimegraphStats};
pub use shared::SharedTimegraph;
pub use chain::Chain;
pub use query::CacheStats;
pub use snapshot::{GraphSnapshot, PointRecord};
pub use config::{TimegraphConfig, CacheConfig, DEFAULT_SEARCH_BUDGET, MAX_PSEUDO_INIT, MAX_PSEUDO_INCREMENT};
pub use error::{TimegraphError, Result};
pub use canonical::{to_canonical_bytes, fingerprint};

/// Schema version for snapshot records.
/// Increment on breaking changes to any snapshot type.
pub const TIMEGRAPH_SCHEMA_VERSION: &str = "1.0.0";

/// Pseudotime of the first point on a new chain.
pub const PSEUDO_INIT: Pseudotime = 1;

/// Default gap between neighbouring pseudotimes.
pub const PSEUDO_INCREMENT: Pseudotime = 1000;
