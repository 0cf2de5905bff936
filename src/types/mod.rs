//! Core types for the timegraph.

pub mod point;
pub mod edge;
pub mod relation;
pub mod event;

pub use point::{PointId, ChainId, Placement, Pseudotime, TimePoint};
pub use edge::{Edge, EdgeKind};
pub use relation::Relation;
pub use event::{Event, EventId};
