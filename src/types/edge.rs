//! Edge types for the timegraph.

use serde::{Deserialize, Serialize};
use super::point::PointId;

/// Kind of a before-or-at edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Both endpoints lie on the same chain.
    Chain,
    /// Endpoints lie on different chains.
    Cross,
}

impl EdgeKind {
    /// Parse edge kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chain" => Some(Self::Chain),
            "cross" => Some(Self::Cross),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chain => write!(f, "chain"),
            Self::Cross => write!(f, "cross"),
        }
    }
}

/// Directed before-or-at edge: `from <= to`.
///
/// Implements `Ord` for deterministic ordering: (from, to, kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Earlier point (source).
    pub from: PointId,
    /// Later point (target).
    pub to: PointId,
    /// Kind of edge.
    pub kind: EdgeKind,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: PointId, to: PointId, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }
}
