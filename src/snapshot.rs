//! Graph snapshots.
//!
//! A `GraphSnapshot` lists every point (with its names and current
//! placement), every edge in insertion order and every event, plus an xxh64
//! fingerprint over all of it. Encoding the snapshot is left to the caller;
//! the type derives serde.
//!
//! Restoring replays the edge log through the normal insertion path, so the
//! rebuilt graph satisfies every invariant regardless of what the recorded
//! placements say. With the same configuration the replay reproduces the
//! recorded chains and pseudotimes exactly.

use serde::{Deserialize, Serialize};

use crate::canonical::fingerprint;
use crate::config::TimegraphConfig;
use crate::error::{Result, TimegraphError};
use crate::graph::Timegraph;
use crate::types::{ChainId, Edge, Event, PointId, Pseudotime};
use crate::TIMEGRAPH_SCHEMA_VERSION;

/// One point of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Point identifier.
    pub id: PointId,
    /// Names bound to the point.
    pub names: Vec<String>,
    /// Chain at snapshot time.
    pub chain: Option<ChainId>,
    /// Pseudotime at snapshot time.
    pub pseudotime: Option<Pseudotime>,
}

/// Complete, fingerprinted dump of a timegraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Schema version of the record types.
    pub schema_version: String,
    /// Points in id order.
    pub points: Vec<PointRecord>,
    /// Edges in insertion order.
    pub edges: Vec<Edge>,
    /// Events in id order.
    pub events: Vec<Event>,
    /// xxh64 over all other fields.
    pub fingerprint: String,
}

/// Fields covered by the fingerprint.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    schema_version: &'a str,
    points: &'a [PointRecord],
    edges: &'a [Edge],
    events: &'a [Event],
}

fn corrupt(reason: impl Into<String>) -> TimegraphError {
    TimegraphError::CorruptSnapshot(reason.into())
}

impl GraphSnapshot {
    /// Recompute the fingerprint from the record fields.
    pub fn compute_fingerprint(&self) -> Result<String> {
        fingerprint(&FingerprintInput {
            schema_version: &self.schema_version,
            points: &self.points,
            edges: &self.edges,
            events: &self.events,
        })
        .map_err(|e| corrupt(e.to_string()))
    }

    /// Whether the stored fingerprint matches the records.
    pub fn verify(&self) -> bool {
        self.compute_fingerprint()
            .map(|f| f == self.fingerprint)
            .unwrap_or(false)
    }
}

impl Timegraph {
    /// Dump the whole graph.
    pub fn snapshot(&self) -> Result<GraphSnapshot> {
        let points = self
            .points()
            .map(|p| PointRecord {
                id: p.id(),
                names: p.names().to_vec(),
                chain: p.chain(),
                pseudotime: p.pseudotime(),
            })
            .collect();
        let mut snapshot = GraphSnapshot {
            schema_version: TIMEGRAPH_SCHEMA_VERSION.to_string(),
            points,
            edges: self.edges(),
            events: self.events().to_vec(),
            fingerprint: String::new(),
        };
        snapshot.fingerprint = snapshot.compute_fingerprint()?;
        Ok(snapshot)
    }

    /// Rebuild a graph from a snapshot.
    pub fn restore(snapshot: &GraphSnapshot, config: TimegraphConfig) -> Result<Self> {
        if snapshot.schema_version != TIMEGRAPH_SCHEMA_VERSION {
            return Err(corrupt(format!(
                "schema version {} (expected {})",
                snapshot.schema_version, TIMEGRAPH_SCHEMA_VERSION
            )));
        }
        if !snapshot.verify() {
            return Err(corrupt("fingerprint mismatch"));
        }

        let mut graph = Timegraph::with_config(config)?;

        for (index, record) in snapshot.points.iter().enumerate() {
            if record.id.index() != index {
                return Err(corrupt(format!("point {} recorded at position {index}", record.id)));
            }
            let id = graph.create_point();
            for name in &record.names {
                graph.name_point(id, name).map_err(|e| corrupt(e.to_string()))?;
            }
        }

        for edge in &snapshot.edges {
            graph
                .add_relation(edge.from, edge.to)
                .map_err(|e| corrupt(format!("edge {} -> {}: {e}", edge.from, edge.to)))?;
        }

        for (index, event) in snapshot.events.iter().enumerate() {
            if event.id.index() != index {
                return Err(corrupt(format!("event {} recorded at position {index}", event.id)));
            }
            graph.point(event.start).map_err(|e| corrupt(e.to_string()))?;
            graph.point(event.end).map_err(|e| corrupt(e.to_string()))?;
            if event.start != event.end && !graph.edges.contains(event.start, event.end) {
                return Err(corrupt(format!("event {} has no start -> end edge", event.id)));
            }
            match event.name.as_deref() {
                Some(name) => {
                    graph
                        .events
                        .register_named(name, event.start, event.end)
                        .map_err(|e| corrupt(e.to_string()))?;
                }
                None => {
                    graph.events.register(event.start, event.end);
                }
            }
        }

        let relocated = snapshot
            .points
            .iter()
            .filter(|r| {
                let now = graph.points.placement(r.id).map(|p| (p.chain, p.pseudotime));
                now != r.chain.zip(r.pseudotime)
            })
            .count();
        tracing::debug!(
            points = snapshot.points.len(),
            edges = snapshot.edges.len(),
            events = snapshot.events.len(),
            relocated,
            "timegraph restored"
        );
        Ok(graph)
    }
}
