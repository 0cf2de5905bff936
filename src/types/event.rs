//! Event types: episodes spanning a start and an end point.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::PointId;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    /// Create an event identifier from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of this event in the event table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Temporal extent of an episode.
///
/// `start <= end` holds for every event the graph hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Optional symbol naming the event.
    pub name: Option<String>,
    /// Start point.
    pub start: PointId,
    /// End point.
    pub end: PointId,
}

impl Event {
    /// Whether start and end are the same point.
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}
