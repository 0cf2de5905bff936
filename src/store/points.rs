//! Point store: the arena that owns every time point.

use std::collections::HashMap;

use crate::error::{Result, TimegraphError};
use crate::types::{Placement, PointId, Pseudotime, TimePoint};

/// Arena of time points indexed by `PointId`.
///
/// Points are never removed, so an id stays valid for the lifetime of the
/// store.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<TimePoint>,
    /// Name -> point. A point may carry several names.
    names: HashMap<String, PointId>,
}

impl PointStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, unplaced point.
    pub fn create_point(&mut self) -> PointId {
        let id = PointId::new(self.points.len() as u32);
        self.points.push(TimePoint::new(id));
        id
    }

    /// Fetch a point record.
    pub fn lookup(&self, id: PointId) -> Result<&TimePoint> {
        self.points.get(id.index()).ok_or(TimegraphError::UnknownPoint(id))
    }

    pub(crate) fn lookup_mut(&mut self, id: PointId) -> Result<&mut TimePoint> {
        self.points.get_mut(id.index()).ok_or(TimegraphError::UnknownPoint(id))
    }

    /// Whether `id` names a point of this store.
    pub fn contains(&self, id: PointId) -> bool {
        id.index() < self.points.len()
    }

    /// Bind `name` to a point. The first name bound becomes its primary name.
    ///
    /// Rebinding a name to the point it already names is a no-op.
    pub fn name_point(&mut self, id: PointId, name: &str) -> Result<()> {
        match self.names.get(name) {
            Some(existing) if *existing == id => return Ok(()),
            Some(_) => return Err(TimegraphError::DuplicateName(name.to_string())),
            None => {}
        }
        self.lookup_mut(id)?.add_name(name.to_string());
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    /// Point bound to `name`, if any.
    pub fn point_named(&self, name: &str) -> Option<PointId> {
        self.names.get(name).copied()
    }

    /// Placement of a point; `None` when unplaced or unknown.
    pub fn placement(&self, id: PointId) -> Option<Placement> {
        self.points.get(id.index()).and_then(TimePoint::placement)
    }

    /// Pseudotime of a point that is known to sit on a chain.
    pub(crate) fn rank(&self, id: PointId) -> Pseudotime {
        let rank = self.placement(id).map(|p| p.pseudotime);
        debug_assert!(rank.is_some(), "chain member {id} has no placement");
        rank.unwrap_or(Pseudotime::MIN)
    }

    pub(crate) fn place(&mut self, id: PointId, placement: Placement) {
        if let Some(point) = self.points.get_mut(id.index()) {
            point.set_placement(placement);
        }
    }

    pub(crate) fn set_rank(&mut self, id: PointId, pseudotime: Pseudotime) {
        if let Some(point) = self.points.get_mut(id.index()) {
            point.set_pseudotime(pseudotime);
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TimePoint> {
        self.points.iter()
    }
}
