//! Chain manager.
//!
//! Partitions placed points into chains: totally ordered runs in which every
//! pair of neighbours is joined by a direct edge. Each member carries a
//! pseudotime, so two points on one chain compare in O(1).
//!
//! ## Linking
//!
//! A new edge `p -> q` is absorbed into the chains when that is cheap and
//! sound:
//!
//! | p          | q          | result                                        |
//! |------------|------------|-----------------------------------------------|
//! | unplaced   | unplaced   | new chain `[p, q]`                            |
//! | chain tail | unplaced   | `q` appended                                  |
//! | unplaced   | chain head | `p` prepended                                 |
//! | placed     | alone      | `q` moved after `p` if it precedes `p`'s successor |
//! | alone      | placed     | `p` moved before `q` if it follows `q`'s predecessor |
//! | otherwise  |            | cross edge, chains kept apart                 |
//!
//! Chains are never merged wholesale: that would renumber whole chains.
//!
//! ## Cross summaries
//!
//! For every ordered chain pair `(A, B)` joined by a cross edge the manager
//! caches the latest source on A and the earliest target on B. They are
//! stored as point ids, so renumbering keeps them valid, and they are only
//! used to prove that one point cannot reach another.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::config::{TimegraphConfig, MAX_PSEUDO_INCREMENT, MAX_PSEUDO_INIT};
use crate::store::{EdgeStore, PointStore};
use crate::types::{ChainId, EdgeKind, Placement, PointId, Pseudotime};

/// Largest pseudotime magnitude a chain may reach; a chain whose next
/// insertion could pass it is respaced first.
const RANK_LIMIT: Pseudotime = 1 << 62;

fn within_limit(rank: Option<Pseudotime>) -> bool {
    rank.is_some_and(|r| (-RANK_LIMIT..=RANK_LIMIT).contains(&r))
}

/// A totally ordered run of points, sorted by pseudotime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    id: ChainId,
    members: Vec<PointId>,
}

impl Chain {
    /// Chain identifier.
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Members in pseudotime order.
    pub fn members(&self) -> &[PointId] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the chain has been retired.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Earliest member.
    pub fn head(&self) -> Option<PointId> {
        self.members.first().copied()
    }

    /// Latest member.
    pub fn tail(&self) -> Option<PointId> {
        self.members.last().copied()
    }
}

/// Cached bound for cross edges from one chain into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossSummary {
    /// Source with the greatest pseudotime among edges of the pair.
    pub latest_source: PointId,
    /// Target with the least pseudotime among edges of the pair.
    pub earliest_target: PointId,
}

/// How a new edge was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Both points were unplaced and now form a new chain.
    NewChain(ChainId),
    /// The target was appended to the source's chain.
    Appended,
    /// The source was prepended to the target's chain.
    Prepended,
    /// A point that was alone on its chain moved onto the other point's chain.
    Rechained {
        /// The point that moved.
        moved: PointId,
    },
    /// Both points already share a chain.
    SameChain,
    /// The edge joins two different chains.
    Cross,
}

impl Linkage {
    /// Edge kind the new edge receives.
    pub fn edge_kind(&self) -> EdgeKind {
        match self {
            Self::Cross => EdgeKind::Cross,
            _ => EdgeKind::Chain,
        }
    }
}

/// Owner of the chain partition, pseudotimes and the chain metagraph.
#[derive(Debug, Clone)]
pub struct ChainManager {
    chains: Vec<Chain>,
    /// Chain-level adjacency, indexed by chain.
    successors: Vec<BTreeSet<ChainId>>,
    predecessors: Vec<BTreeSet<ChainId>>,
    summaries: HashMap<(ChainId, ChainId), CrossSummary>,
    pseudo_init: Pseudotime,
    pseudo_increment: Pseudotime,
    retired: usize,
    renumbered: u64,
}

impl ChainManager {
    /// Create an empty manager with the spacing from `config`, clamped to
    /// the range `TimegraphConfig::validate` accepts.
    pub fn new(config: &TimegraphConfig) -> Self {
        Self {
            chains: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            summaries: HashMap::new(),
            pseudo_init: config.pseudo_init.clamp(-MAX_PSEUDO_INIT, MAX_PSEUDO_INIT),
            pseudo_increment: config.pseudo_increment.clamp(2, MAX_PSEUDO_INCREMENT),
            retired: 0,
            renumbered: 0,
        }
    }

    /// Fetch a chain.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id.index())
    }

    /// Chains that still have members.
    pub fn live_chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.iter().filter(|c| !c.is_empty())
    }

    /// Number of chains that still have members.
    pub fn live_count(&self) -> usize {
        self.chains.len() - self.retired
    }

    /// Number of chains emptied by re-chaining.
    pub fn retired_count(&self) -> usize {
        self.retired
    }

    /// Total number of points whose pseudotime was rewritten by renumbering.
    pub fn renumbered_count(&self) -> u64 {
        self.renumbered
    }

    /// Cached bound for the chain pair, if any cross edge joins them.
    pub fn summary(&self, from: ChainId, to: ChainId) -> Option<CrossSummary> {
        self.summaries.get(&(from, to)).copied()
    }

    /// Chain and index of a placed point.
    pub fn position(&self, points: &PointStore, point: PointId) -> Option<(ChainId, usize)> {
        let placement = points.placement(point)?;
        let chain = self.chains.get(placement.chain.index())?;
        chain
            .members
            .binary_search_by_key(&placement.pseudotime, |m| points.rank(*m))
            .ok()
            .map(|idx| (placement.chain, idx))
    }

    /// Next member after `point` on its chain.
    pub fn successor(&self, points: &PointStore, point: PointId) -> Option<PointId> {
        let (chain, idx) = self.position(points, point)?;
        self.chains[chain.index()].members.get(idx + 1).copied()
    }

    /// Previous member before `point` on its chain.
    pub fn predecessor(&self, points: &PointStore, point: PointId) -> Option<PointId> {
        let (chain, idx) = self.position(points, point)?;
        let prev = idx.checked_sub(1)?;
        self.chains[chain.index()].members.get(prev).copied()
    }

    fn new_chain(&mut self) -> ChainId {
        let id = ChainId::new(self.chains.len() as u32);
        self.chains.push(Chain { id, members: Vec::new() });
        self.successors.push(BTreeSet::new());
        self.predecessors.push(BTreeSet::new());
        tracing::debug!(chain = %id, "chain created");
        id
    }

    fn is_alone(&self, chain: ChainId) -> bool {
        self.chains[chain.index()].members.len() == 1
    }

    /// Attach `point` to `chain` at `pseudotime`, keeping members sorted.
    pub(crate) fn assign_to_chain(
        &mut self,
        points: &mut PointStore,
        point: PointId,
        chain: ChainId,
        pseudotime: Pseudotime,
    ) {
        let idx = match self.chains[chain.index()]
            .members
            .binary_search_by_key(&pseudotime, |m| points.rank(*m))
        {
            Ok(idx) => {
                debug_assert!(false, "pseudotime {pseudotime} already taken on {chain}");
                idx
            }
            Err(idx) => idx,
        };
        points.place(point, Placement { chain, pseudotime });
        self.chains[chain.index()].members.insert(idx, point);
    }

    /// Place `new_point` immediately after `anchor` on the anchor's chain.
    ///
    /// Takes the integer midpoint of the gap to the next member. When no gap
    /// is left, the members after the insertion point are pushed up until one
    /// of them already clears its predecessor.
    pub(crate) fn extend_chain_after(
        &mut self,
        points: &mut PointStore,
        anchor: PointId,
        new_point: PointId,
    ) {
        let Some((chain, idx)) = self.position(points, anchor) else {
            debug_assert!(false, "anchor {anchor} is not on a chain");
            return;
        };
        self.ensure_headroom(points, chain);
        // Respacing keeps member order, so `idx` is still the anchor's slot.
        let anchor_rank = points.rank(anchor);
        let next = self.chains[chain.index()].members.get(idx + 1).copied();

        let rank = match next {
            None => anchor_rank + self.pseudo_increment,
            Some(next) => {
                let next_rank = points.rank(next);
                if next_rank - anchor_rank >= 2 {
                    anchor_rank + (next_rank - anchor_rank) / 2
                } else {
                    let rank = anchor_rank + self.pseudo_increment;
                    self.renumber_suffix(points, chain, idx + 1, rank);
                    rank
                }
            }
        };

        points.place(new_point, Placement { chain, pseudotime: rank });
        self.chains[chain.index()].members.insert(idx + 1, new_point);
    }

    /// Place `new_point` immediately before `anchor` on the anchor's chain.
    pub(crate) fn extend_chain_before(
        &mut self,
        points: &mut PointStore,
        anchor: PointId,
        new_point: PointId,
    ) {
        match self.predecessor(points, anchor) {
            Some(prev) => self.extend_chain_after(points, prev, new_point),
            None => {
                let Some((chain, _)) = self.position(points, anchor) else {
                    debug_assert!(false, "anchor {anchor} is not on a chain");
                    return;
                };
                self.ensure_headroom(points, chain);
                let rank = points.rank(anchor) - self.pseudo_increment;
                points.place(new_point, Placement { chain, pseudotime: rank });
                self.chains[chain.index()].members.insert(0, new_point);
            }
        }
    }

    /// Whether one more insertion, including a renumbered suffix, keeps every
    /// pseudotime of `chain` within `RANK_LIMIT`.
    fn has_headroom(&self, points: &PointStore, chain: ChainId) -> bool {
        let members = &self.chains[chain.index()].members;
        let (Some(&head), Some(&tail)) = (members.first(), members.last()) else {
            return true;
        };
        // A renumbered suffix ends at most `len + 1` increments above the tail.
        let span = (members.len() as Pseudotime + 1).checked_mul(self.pseudo_increment);
        let low = points.rank(head).checked_sub(self.pseudo_increment);
        let high = span.and_then(|span| points.rank(tail).checked_add(span));
        within_limit(low) && within_limit(high)
    }

    /// Respace `chain` from `pseudo_init` if it is close to the limit.
    fn ensure_headroom(&mut self, points: &mut PointStore, chain: ChainId) {
        if self.has_headroom(points, chain) {
            return;
        }
        let len = self.chains[chain.index()].members.len();
        let mut rank = self.pseudo_init;
        for &member in &self.chains[chain.index()].members {
            points.set_rank(member, rank);
            rank += self.pseudo_increment;
        }
        self.renumbered += len as u64;
        tracing::warn!(chain = %chain, members = len, "chain respaced near the pseudotime limit");
    }

    /// Push members from `start` onwards above `floor`, stopping at the first
    /// member that already clears its predecessor.
    fn renumber_suffix(
        &mut self,
        points: &mut PointStore,
        chain: ChainId,
        start: usize,
        floor: Pseudotime,
    ) {
        let mut previous = floor;
        let mut moved = 0u64;
        for &member in &self.chains[chain.index()].members[start..] {
            if points.rank(member) > previous {
                break;
            }
            previous += self.pseudo_increment;
            points.set_rank(member, previous);
            moved += 1;
        }
        self.renumbered += moved;
        tracing::debug!(chain = %chain, moved, "chain suffix renumbered");
    }

    fn start_chain(&mut self, points: &mut PointStore, point: PointId) -> ChainId {
        let chain = self.new_chain();
        self.assign_to_chain(points, point, chain, self.pseudo_init);
        chain
    }

    /// Absorb the new edge `p -> q` into the chain partition.
    ///
    /// The caller has already ruled out cycles; the edge itself is added to the
    /// edge store afterwards.
    pub(crate) fn merge_or_link(
        &mut self,
        points: &mut PointStore,
        edges: &EdgeStore,
        p: PointId,
        q: PointId,
    ) -> Linkage {
        match (points.placement(p), points.placement(q)) {
            (None, None) => {
                let chain = self.start_chain(points, p);
                self.extend_chain_after(points, p, q);
                Linkage::NewChain(chain)
            }
            (Some(_), None) => {
                if self.successor(points, p).is_none() {
                    self.extend_chain_after(points, p, q);
                    Linkage::Appended
                } else {
                    self.start_chain(points, q);
                    self.record_cross(points, p, q);
                    Linkage::Cross
                }
            }
            (None, Some(_)) => {
                if self.predecessor(points, q).is_none() {
                    self.extend_chain_before(points, q, p);
                    Linkage::Prepended
                } else {
                    self.start_chain(points, p);
                    self.record_cross(points, p, q);
                    Linkage::Cross
                }
            }
            (Some(a), Some(b)) if a.chain == b.chain => Linkage::SameChain,
            (Some(a), Some(b)) => {
                if self.is_alone(b.chain)
                    && self.successor(points, p).map_or(true, |s| edges.contains(q, s))
                {
                    self.rehome(points, edges, q, p, true);
                    return Linkage::Rechained { moved: q };
                }
                if self.is_alone(a.chain)
                    && self.predecessor(points, q).map_or(true, |r| edges.contains(r, p))
                {
                    self.rehome(points, edges, p, q, false);
                    return Linkage::Rechained { moved: p };
                }
                self.record_cross(points, p, q);
                Linkage::Cross
            }
        }
    }

    /// Move a point that is alone on its chain next to `anchor`.
    fn rehome(
        &mut self,
        points: &mut PointStore,
        edges: &EdgeStore,
        moved: PointId,
        anchor: PointId,
        after: bool,
    ) {
        let Some(old) = points.placement(moved).map(|p| p.chain) else {
            return;
        };
        self.retire(old);
        if after {
            self.extend_chain_after(points, anchor, moved);
        } else {
            self.extend_chain_before(points, anchor, moved);
        }

        // Every cross edge of the retired chain touched `moved`.
        let targets: Vec<PointId> = edges.forward_neighbors(moved).collect();
        for target in targets {
            self.record_cross(points, moved, target);
        }
        let sources: Vec<PointId> = edges.backward_neighbors(moved).collect();
        for source in sources {
            self.record_cross(points, source, moved);
        }
        tracing::debug!(point = %moved, from_chain = %old, anchor = %anchor, "point re-chained");
    }

    fn retire(&mut self, chain: ChainId) {
        self.chains[chain.index()].members.clear();
        for next in std::mem::take(&mut self.successors[chain.index()]) {
            self.predecessors[next.index()].remove(&chain);
            self.summaries.remove(&(chain, next));
        }
        for prev in std::mem::take(&mut self.predecessors[chain.index()]) {
            self.successors[prev.index()].remove(&chain);
            self.summaries.remove(&(prev, chain));
        }
        self.retired += 1;
    }

    /// Fold the edge `from -> to` into the chain metagraph. Edges within one
    /// chain are ignored.
    pub(crate) fn record_cross(&mut self, points: &PointStore, from: PointId, to: PointId) {
        let (Some(a), Some(b)) = (points.placement(from), points.placement(to)) else {
            return;
        };
        if a.chain == b.chain {
            return;
        }
        self.successors[a.chain.index()].insert(b.chain);
        self.predecessors[b.chain.index()].insert(a.chain);
        self.summaries
            .entry((a.chain, b.chain))
            .and_modify(|s| {
                if a.pseudotime > points.rank(s.latest_source) {
                    s.latest_source = from;
                }
                if b.pseudotime < points.rank(s.earliest_target) {
                    s.earliest_target = to;
                }
            })
            .or_insert(CrossSummary {
                latest_source: from,
                earliest_target: to,
            });
    }

    /// Conservative reachability test from the cached summaries.
    ///
    /// Returns `false` only when `p` certainly cannot reach `q`: no
    /// chain-level path leaves `p`'s chain at or after `p` and enters `q`'s
    /// chain at or before `q`. A `true` answer proves nothing.
    pub fn may_reach(&self, points: &PointStore, p: PointId, q: PointId) -> bool {
        let (Some(a), Some(b)) = (points.placement(p), points.placement(q)) else {
            return false;
        };
        if a.chain == b.chain {
            return a.pseudotime <= b.pseudotime;
        }

        let leaves = |s: &CrossSummary| points.rank(s.latest_source) >= a.pseudotime;
        let enters = |s: &CrossSummary| points.rank(s.earliest_target) <= b.pseudotime;

        if let Some(direct) = self.summaries.get(&(a.chain, b.chain)) {
            if leaves(direct) && enters(direct) {
                return true;
            }
        }

        let entries: HashSet<ChainId> = self.predecessors[b.chain.index()]
            .iter()
            .copied()
            .filter(|y| self.summaries.get(&(*y, b.chain)).is_some_and(enters))
            .collect();
        if entries.is_empty() {
            return false;
        }

        let mut visited: HashSet<ChainId> = HashSet::new();
        let mut queue: VecDeque<ChainId> = self.successors[a.chain.index()]
            .iter()
            .copied()
            .filter(|x| self.summaries.get(&(a.chain, *x)).is_some_and(leaves))
            .collect();
        visited.extend(queue.iter().copied());

        while let Some(chain) = queue.pop_front() {
            if entries.contains(&chain) {
                return true;
            }
            for &next in &self.successors[chain.index()] {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (ChainManager, PointStore, EdgeStore, Vec<PointId>) {
        let mut points = PointStore::new();
        let ids = (0..n).map(|_| points.create_point()).collect();
        (ChainManager::new(&TimegraphConfig::default()), points, EdgeStore::new(), ids)
    }

    fn link(
        chains: &mut ChainManager,
        points: &mut PointStore,
        edges: &mut EdgeStore,
        p: PointId,
        q: PointId,
    ) -> Linkage {
        let linkage = chains.merge_or_link(points, edges, p, q);
        edges.add_edge(p, q, linkage.edge_kind());
        if let Linkage::Rechained { moved } = linkage {
            edges.reclassify(moved, points);
        }
        linkage
    }

    #[test]
    fn test_new_chain_spacing() {
        let (mut chains, mut points, mut edges, p) = setup(3);
        let linkage = link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        assert_eq!(linkage, Linkage::NewChain(ChainId::new(0)));
        assert_eq!(points.rank(p[0]), 1);
        assert_eq!(points.rank(p[1]), 1001);

        assert_eq!(link(&mut chains, &mut points, &mut edges, p[1], p[2]), Linkage::Appended);
        assert_eq!(points.rank(p[2]), 2001);
        assert_eq!(chains.chain(ChainId::new(0)).unwrap().members(), &p[..]);
    }

    #[test]
    fn test_prepend_goes_below_head() {
        let (mut chains, mut points, mut edges, p) = setup(3);
        link(&mut chains, &mut points, &mut edges, p[1], p[2]);
        assert_eq!(link(&mut chains, &mut points, &mut edges, p[0], p[1]), Linkage::Prepended);
        assert_eq!(points.rank(p[0]), 1 - 1000);
        assert_eq!(chains.chain(ChainId::new(0)).unwrap().head(), Some(p[0]));
    }

    #[test]
    fn test_branch_becomes_cross_edge() {
        let (mut chains, mut points, mut edges, p) = setup(3);
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        let linkage = link(&mut chains, &mut points, &mut edges, p[0], p[2]);

        assert_eq!(linkage, Linkage::Cross);
        let c0 = points.placement(p[0]).unwrap().chain;
        let c2 = points.placement(p[2]).unwrap().chain;
        assert_ne!(c0, c2);
        assert_eq!(
            chains.summary(c0, c2),
            Some(CrossSummary { latest_source: p[0], earliest_target: p[2] })
        );
        assert_eq!(edges.cross_len(), 1);
    }

    #[test]
    fn test_midpoint_and_renumber() {
        let config = TimegraphConfig { pseudo_increment: 4, ..TimegraphConfig::default() };
        let mut chains = ChainManager::new(&config);
        let mut points = PointStore::new();
        let a = points.create_point();
        let b = points.create_point();
        let chain = chains.start_chain(&mut points, a);
        chains.extend_chain_after(&mut points, a, b);
        assert_eq!((points.rank(a), points.rank(b)), (1, 5));

        let x = points.create_point();
        chains.extend_chain_after(&mut points, a, x);
        assert_eq!(points.rank(x), 3);

        let y = points.create_point();
        chains.extend_chain_after(&mut points, a, y);
        assert_eq!(points.rank(y), 2);

        // No gap between a (1) and y (2): the suffix is pushed up.
        let z = points.create_point();
        chains.extend_chain_after(&mut points, a, z);
        assert_eq!(chains.chain(chain).unwrap().members(), &[a, z, y, x, b]);
        let ranks: Vec<_> = [a, z, y, x, b].iter().map(|m| points.rank(*m)).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]), "ranks not increasing: {ranks:?}");
        assert!(chains.renumbered_count() > 0);
    }

    #[test]
    fn test_respace_near_rank_limit() {
        let (mut chains, mut points, _, p) = setup(3);
        let chain = chains.start_chain(&mut points, p[0]);
        points.set_rank(p[0], RANK_LIMIT - 5);

        chains.extend_chain_after(&mut points, p[0], p[1]);
        assert_eq!((points.rank(p[0]), points.rank(p[1])), (1, 1001));

        points.set_rank(p[0], -RANK_LIMIT + 5);
        points.set_rank(p[1], -RANK_LIMIT + 9);
        chains.extend_chain_before(&mut points, p[0], p[2]);
        assert_eq!(chains.chain(chain).unwrap().members(), &[p[2], p[0], p[1]]);
        let ranks: Vec<_> = [p[2], p[0], p[1]].iter().map(|m| points.rank(*m)).collect();
        assert_eq!(ranks, vec![-999, 1, 1001]);
        assert_eq!(chains.renumbered_count(), 3);
    }

    #[test]
    fn test_clamps_unvalidated_spacing() {
        let config = TimegraphConfig {
            pseudo_init: Pseudotime::MAX - 10,
            pseudo_increment: Pseudotime::MAX,
            ..TimegraphConfig::default()
        };
        let mut chains = ChainManager::new(&config);
        let mut points = PointStore::new();
        let a = points.create_point();
        let b = points.create_point();
        chains.start_chain(&mut points, a);
        chains.extend_chain_after(&mut points, a, b);
        assert_eq!(points.rank(a), MAX_PSEUDO_INIT);
        assert_eq!(points.rank(b), MAX_PSEUDO_INIT + MAX_PSEUDO_INCREMENT);
    }

    #[test]
    fn test_rechain_between_neighbors() {
        let (mut chains, mut points, mut edges, p) = setup(3);
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        // p2 branches off p0 onto its own chain.
        assert_eq!(link(&mut chains, &mut points, &mut edges, p[0], p[2]), Linkage::Cross);
        let main = points.placement(p[0]).unwrap().chain;

        // p2 -> p1 with p0 -> p2 already known: p2 slots in between.
        let linkage = link(&mut chains, &mut points, &mut edges, p[2], p[1]);
        assert_eq!(linkage, Linkage::Rechained { moved: p[2] });
        assert_eq!(chains.chain(main).unwrap().members(), &[p[0], p[2], p[1]]);
        assert_eq!(points.rank(p[2]), 501);
        assert_eq!(edges.kind(p[0], p[2]), Some(EdgeKind::Chain));
        assert_eq!(edges.cross_len(), 0);
    }

    #[test]
    fn test_two_point_chains_stay_apart() {
        let (mut chains, mut points, mut edges, p) = setup(4);
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        link(&mut chains, &mut points, &mut edges, p[2], p[3]);
        assert_eq!(link(&mut chains, &mut points, &mut edges, p[1], p[2]), Linkage::Cross);
        assert_eq!(chains.live_count(), 2);
        assert_eq!(chains.retired_count(), 0);
    }

    #[test]
    fn test_rechain_retires_chain() {
        let (mut chains, mut points, mut edges, p) = setup(3);
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        link(&mut chains, &mut points, &mut edges, p[0], p[2]);
        let lone = points.placement(p[2]).unwrap().chain;
        let main = points.placement(p[0]).unwrap().chain;

        // p1 is the tail of the main chain, p2 is alone: p2 moves after p1.
        let linkage = link(&mut chains, &mut points, &mut edges, p[1], p[2]);
        assert_eq!(linkage, Linkage::Rechained { moved: p[2] });
        assert_eq!(points.placement(p[2]).unwrap().chain, main);
        assert!(chains.chain(lone).unwrap().is_empty());
        assert_eq!(chains.retired_count(), 1);
        assert_eq!(chains.live_count(), 1);
        assert!(chains.summary(main, lone).is_none());
        assert_eq!(edges.kind(p[0], p[2]), Some(EdgeKind::Chain));
        assert_eq!(edges.cross_len(), 0);
    }

    #[test]
    fn test_may_reach_prunes() {
        let (mut chains, mut points, mut edges, p) = setup(4);
        // Chain A: p0 -> p1. Chain B: p2 -> p3. Cross edge p0 -> p3.
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        link(&mut chains, &mut points, &mut edges, p[2], p[3]);
        assert_eq!(link(&mut chains, &mut points, &mut edges, p[0], p[3]), Linkage::Cross);

        assert!(chains.may_reach(&points, p[0], p[3]));
        // p1 lies after the only exit from chain A.
        assert!(!chains.may_reach(&points, p[1], p[3]));
        // p2 lies before the only entry into chain B.
        assert!(!chains.may_reach(&points, p[0], p[2]));
        // Nothing leaves chain B.
        assert!(!chains.may_reach(&points, p[3], p[0]));
    }

    #[test]
    fn test_may_reach_through_intermediate_chain() {
        let (mut chains, mut points, mut edges, p) = setup(6);
        link(&mut chains, &mut points, &mut edges, p[0], p[1]);
        link(&mut chains, &mut points, &mut edges, p[2], p[3]);
        link(&mut chains, &mut points, &mut edges, p[4], p[5]);
        link(&mut chains, &mut points, &mut edges, p[0], p[3]);
        link(&mut chains, &mut points, &mut edges, p[3], p[4]);

        assert!(chains.may_reach(&points, p[0], p[5]));
        assert!(!chains.may_reach(&points, p[1], p[5]));
        assert!(!chains.may_reach(&points, p[5], p[0]));
    }
}
