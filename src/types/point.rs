//! Point types for the timegraph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer rank of a point within its chain.
///
/// Strictly increasing along a chain. Gaps are left between neighbours so
/// that most insertions do not touch the rest of the chain.
pub type Pseudotime = i64;

/// Unique identifier for a time point.
///
/// Points live in an arena; the identifier is their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(u32);

impl PointId {
    /// Create a point identifier from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index of this point.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Unique identifier for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u32);

impl ChainId {
    /// Create a chain identifier from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of this chain in the chain table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Where a point sits: its chain and its rank on that chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Chain the point belongs to.
    pub chain: ChainId,
    /// Rank of the point on the chain.
    pub pseudotime: Pseudotime,
}

/// A time point record.
///
/// A point is unplaced until it takes part in its first relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePoint {
    id: PointId,
    placement: Option<Placement>,
    names: Vec<String>,
}

impl TimePoint {
    pub(crate) fn new(id: PointId) -> Self {
        Self {
            id,
            placement: None,
            names: Vec::new(),
        }
    }

    /// Identifier of this point.
    pub fn id(&self) -> PointId {
        self.id
    }

    /// Chain and pseudotime, if the point has been placed on a chain.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Chain this point belongs to.
    pub fn chain(&self) -> Option<ChainId> {
        self.placement.map(|p| p.chain)
    }

    /// Pseudotime of this point on its chain.
    pub fn pseudotime(&self) -> Option<Pseudotime> {
        self.placement.map(|p| p.pseudotime)
    }

    /// Names bound to this point, primary name first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }

    pub(crate) fn set_pseudotime(&mut self, pseudotime: Pseudotime) {
        if let Some(placement) = self.placement.as_mut() {
            placement.pseudotime = pseudotime;
        }
    }

    pub(crate) fn add_name(&mut self, name: String) {
        self.names.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_point_is_unplaced() {
        let point = TimePoint::new(PointId::new(7));
        assert_eq!(point.id().index(), 7);
        assert!(point.placement().is_none());
        assert!(point.chain().is_none());
        assert!(point.names().is_empty());
    }

    #[test]
    fn test_set_pseudotime_requires_placement() {
        let mut point = TimePoint::new(PointId::new(0));
        point.set_pseudotime(5);
        assert!(point.pseudotime().is_none());

        point.set_placement(Placement { chain: ChainId::new(2), pseudotime: 1 });
        point.set_pseudotime(5);
        assert_eq!(point.pseudotime(), Some(5));
        assert_eq!(point.chain(), Some(ChainId::new(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(PointId::new(3).to_string(), "p3");
        assert_eq!(ChainId::new(4).to_string(), "c4");
    }
}
