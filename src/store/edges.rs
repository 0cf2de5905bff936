//! Edge store: explicit before-or-at edges with forward and backward adjacency.

use crate::store::points::PointStore;
use crate::types::{Edge, EdgeKind, PointId};

/// One adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    point: PointId,
    kind: EdgeKind,
}

/// Adjacency lists indexed by point id, plus the insertion-ordered edge log.
///
/// The store does not check for cycles; the insertion path does that before
/// calling `add_edge`.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    forward: Vec<Vec<Link>>,
    backward: Vec<Vec<Link>>,
    /// (from, to) in insertion order.
    log: Vec<(PointId, PointId)>,
    cross_edges: usize,
}

impl EdgeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, id: PointId) {
        let needed = id.index() + 1;
        if self.forward.len() < needed {
            self.forward.resize_with(needed, Vec::new);
            self.backward.resize_with(needed, Vec::new);
        }
    }

    /// Record `from <= to`.
    pub fn add_edge(&mut self, from: PointId, to: PointId, kind: EdgeKind) {
        self.ensure(from);
        self.ensure(to);
        self.forward[from.index()].push(Link { point: to, kind });
        self.backward[to.index()].push(Link { point: from, kind });
        self.log.push((from, to));
        if kind == EdgeKind::Cross {
            self.cross_edges += 1;
        }
    }

    /// Whether the edge `from -> to` is stored.
    pub fn contains(&self, from: PointId, to: PointId) -> bool {
        self.forward
            .get(from.index())
            .is_some_and(|links| links.iter().any(|l| l.point == to))
    }

    /// Direct successors of `id`, in insertion order.
    pub fn forward_neighbors(&self, id: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.forward
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|l| l.point)
    }

    /// Direct predecessors of `id`, in insertion order.
    pub fn backward_neighbors(&self, id: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.backward
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|l| l.point)
    }

    /// Kind of the stored edge `from -> to`.
    pub fn kind(&self, from: PointId, to: PointId) -> Option<EdgeKind> {
        self.forward
            .get(from.index())?
            .iter()
            .find(|l| l.point == to)
            .map(|l| l.kind)
    }

    /// Recompute the kind of every edge touching `id` from current chain
    /// membership. Called after `id` moved to another chain.
    pub fn reclassify(&mut self, id: PointId, points: &PointStore) {
        let own_chain = points.placement(id).map(|p| p.chain);
        let classify = |other: PointId| {
            let other_chain = points.placement(other).map(|p| p.chain);
            if own_chain.is_some() && own_chain == other_chain {
                EdgeKind::Chain
            } else {
                EdgeKind::Cross
            }
        };

        let Some(outgoing) = self.forward.get(id.index()).cloned() else {
            return;
        };
        for link in outgoing {
            let kind = classify(link.point);
            self.set_kind(id, link.point, kind);
        }
        let incoming = self.backward[id.index()].clone();
        for link in incoming {
            let kind = classify(link.point);
            self.set_kind(link.point, id, kind);
        }
    }

    fn set_kind(&mut self, from: PointId, to: PointId, kind: EdgeKind) {
        let mut previous = None;
        if let Some(link) = self.forward[from.index()].iter_mut().find(|l| l.point == to) {
            previous = Some(link.kind);
            link.kind = kind;
        }
        if let Some(link) = self.backward[to.index()].iter_mut().find(|l| l.point == from) {
            link.kind = kind;
        }
        match (previous, kind) {
            (Some(EdgeKind::Cross), EdgeKind::Chain) => self.cross_edges -= 1,
            (Some(EdgeKind::Chain), EdgeKind::Cross) => self.cross_edges += 1,
            _ => {}
        }
    }

    /// All edges in insertion order, with their current kind.
    pub fn edges(&self) -> Vec<Edge> {
        self.log
            .iter()
            .filter_map(|&(from, to)| self.kind(from, to).map(|kind| Edge::new(from, to, kind)))
            .collect()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether no edge has been stored.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of edges whose endpoints lie on different chains.
    pub fn cross_len(&self) -> usize {
        self.cross_edges
    }
}
