//! Error type for timegraph operations.

use crate::types::{EventId, PointId};

/// Errors surfaced by the timegraph.
///
/// All of these are logical errors: retrying the same call gives the same
/// result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimegraphError {
    /// The id does not name a point in this graph.
    #[error("Unknown point: {0}")]
    UnknownPoint(PointId),

    /// Asserting `from <= to` would close a cycle.
    #[error("Relation {from} <= {to} would close a cycle")]
    Cycle {
        /// Proposed earlier point.
        from: PointId,
        /// Proposed later point.
        to: PointId,
    },

    /// An event cannot span these points because `end` already precedes `start`.
    #[error("Invalid event: {end} already precedes {start}")]
    InvalidEvent {
        /// Requested start point.
        start: PointId,
        /// Requested end point.
        end: PointId,
    },

    /// The id does not name an event in this graph.
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    /// The name is already bound to something else.
    #[error("Name already bound: {0}")]
    DuplicateName(String),

    /// Configuration values are out of range or unparsable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A snapshot failed integrity or consistency checks.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

impl TimegraphError {
    /// Whether this error reports a rejected ordering (cycle or impossible event).
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. } | Self::InvalidEvent { .. })
    }
}

/// Result alias for timegraph operations.
pub type Result<T> = std::result::Result<T, TimegraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_classification() {
        let a = PointId::new(0);
        let b = PointId::new(1);
        assert!(TimegraphError::Cycle { from: a, to: b }.is_cycle());
        assert!(TimegraphError::InvalidEvent { start: a, end: b }.is_cycle());
        assert!(!TimegraphError::UnknownPoint(a).is_cycle());
    }

    #[test]
    fn test_messages() {
        let err = TimegraphError::Cycle { from: PointId::new(2), to: PointId::new(0) };
        assert_eq!(err.to_string(), "Relation p2 <= p0 would close a cycle");
        assert_eq!(
            TimegraphError::UnknownPoint(PointId::new(9)).to_string(),
            "Unknown point: p9"
        );
    }
}
