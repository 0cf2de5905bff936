//! Relation query engine.
//!
//! Answers `query(p, q)` in order of increasing cost:
//!
//! 1. identical points, unplaced points and same-chain pairs are decided
//!    from placements alone;
//! 2. definite answers come from the LRU cache (edges are never removed, so
//!    a `Before`/`After` answer stays true);
//! 3. the chain manager's cross summaries rule out impossible directions;
//! 4. a budgeted search walks the remaining direction(s).
//!
//! ## Search
//!
//! The search keeps an explicit work-list. Expanding a point scans the rest
//! of its chain segment (every later member in a forward search, every
//! earlier one in a backward search) and queues the cross neighbours of each
//! scanned member. A per-chain water mark remembers how far a chain has been
//! scanned so no member is scanned twice. Once the walk lands on the target's
//! chain the pseudotimes decide.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::chain::ChainManager;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::store::{EdgeStore, PointStore};
use crate::types::{ChainId, PointId, Pseudotime, Relation};

/// Direction of a reachability search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Follow edges from earlier to later points.
    Forward,
    /// Follow edges from later to earlier points.
    Backward,
}

/// Outcome of a single reachability search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    /// The target was reached.
    Found,
    /// The search finished without reaching the target.
    NotFound,
    /// The visit budget ran out first.
    Exhausted,
}

/// Number of points a query may still scan.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    remaining: Option<usize>,
}

impl Budget {
    /// Budget of `limit` scanned points; `None` is unbounded.
    pub fn new(limit: Option<usize>) -> Self {
        Self { remaining: limit }
    }

    /// Budget that never runs out.
    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    fn spend(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to the search.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
}

struct CacheState {
    answers: RwLock<LruCache<(PointId, PointId), Relation>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// LRU cache of definite cross-chain answers.
///
/// Only `Before` and `After` are stored: they cannot be invalidated by later
/// insertions, while `Unknown` can. Lookups take the read lock and `peek`, so
/// concurrent queries only contend when a new answer is written; a hit does
/// not refresh an entry's recency.
pub struct QueryCache {
    state: Option<CacheState>,
}

impl QueryCache {
    /// Build a cache from its configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let state = NonZeroUsize::new(config.max_entries)
            .filter(|_| config.enabled)
            .map(|size| CacheState {
                answers: RwLock::new(LruCache::new(size)),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            });
        Self { state }
    }

    /// Cached answer for `(p, q)`, counted as a query lookup.
    pub fn get(&self, p: PointId, q: PointId) -> Option<Relation> {
        let state = self.state.as_ref()?;
        let answer = state.answers.read().peek(&(p, q)).copied();
        let counter = if answer.is_some() { &state.hits } else { &state.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        answer
    }

    /// Cached answer for `(p, q)` without touching the counters.
    pub fn peek(&self, p: PointId, q: PointId) -> Option<Relation> {
        self.state.as_ref()?.answers.read().peek(&(p, q)).copied()
    }

    /// Remember a definite answer for `(p, q)` and its inverse for `(q, p)`.
    pub fn insert(&self, p: PointId, q: PointId, relation: Relation) {
        if !matches!(relation, Relation::Before | Relation::After) {
            return;
        }
        if let Some(state) = self.state.as_ref() {
            let mut answers = state.answers.write();
            answers.put((p, q), relation);
            answers.put((q, p), relation.inverse());
        }
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        match self.state.as_ref() {
            Some(state) => CacheStats {
                hits: state.hits.load(Ordering::Relaxed),
                misses: state.misses.load(Ordering::Relaxed),
                entries: state.answers.read().len(),
            },
            None => CacheStats::default(),
        }
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("enabled", &self.state.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Read-only view over the stores that queries run against.
#[derive(Clone, Copy)]
pub(crate) struct GraphView<'a> {
    pub points: &'a PointStore,
    pub chains: &'a ChainManager,
    pub edges: &'a EdgeStore,
}

impl<'a> GraphView<'a> {
    /// Order of `p` relative to `q`.
    pub fn relation(
        &self,
        p: PointId,
        q: PointId,
        limit: Option<usize>,
        cache: &QueryCache,
    ) -> Result<Relation> {
        self.points.lookup(p)?;
        self.points.lookup(q)?;

        if p == q {
            return Ok(Relation::Same);
        }
        let (Some(a), Some(b)) = (self.points.placement(p), self.points.placement(q)) else {
            return Ok(Relation::Unknown);
        };
        if a.chain == b.chain {
            return Ok(Relation::from_ordering(a.pseudotime.cmp(&b.pseudotime)));
        }
        if let Some(answer) = cache.get(p, q) {
            return Ok(answer);
        }

        let may_before = self.chains.may_reach(self.points, p, q);
        let may_after = self.chains.may_reach(self.points, q, p);
        if !may_before && !may_after {
            tracing::trace!(p = %p, q = %q, "cross summaries rule out both directions");
            return Ok(Relation::Unknown);
        }

        let mut budget = Budget::new(limit);
        let mut exhausted = false;
        let directions = [
            (may_before, Direction::Forward, Relation::Before),
            (may_after, Direction::Backward, Relation::After),
        ];
        for (possible, direction, answer) in directions {
            if !possible {
                continue;
            }
            match self.reaches(p, q, direction, &mut budget) {
                Reach::Found => {
                    cache.insert(p, q, answer);
                    return Ok(answer);
                }
                Reach::Exhausted => exhausted = true,
                Reach::NotFound => {}
            }
        }

        if exhausted {
            tracing::warn!(p = %p, q = %q, budget = ?limit, "search budget exhausted, answering unknown");
        }
        Ok(Relation::Unknown)
    }

    /// Whether asserting `from <= to` would close a cycle, i.e. `to` already
    /// reaches `from`. Always searches to completion.
    pub fn would_cycle(&self, from: PointId, to: PointId, cache: &QueryCache) -> bool {
        if from == to {
            return true;
        }
        let (Some(a), Some(b)) = (self.points.placement(from), self.points.placement(to)) else {
            return false;
        };
        if a.chain == b.chain {
            return b.pseudotime < a.pseudotime;
        }
        match cache.peek(from, to) {
            Some(Relation::After) => return true,
            Some(Relation::Before) => return false,
            _ => {}
        }
        if !self.chains.may_reach(self.points, to, from) {
            return false;
        }
        let found = self.reaches(to, from, Direction::Forward, &mut Budget::unlimited()) == Reach::Found;
        if found {
            cache.insert(to, from, Relation::Before);
        }
        found
    }

    /// Whether `to` can be reached from `from` in `direction`.
    pub fn reaches(
        &self,
        from: PointId,
        to: PointId,
        direction: Direction,
        budget: &mut Budget,
    ) -> Reach {
        let Some(target) = self.points.placement(to) else {
            return Reach::NotFound;
        };

        let mut stack = vec![from];
        let mut visited: HashSet<PointId> = HashSet::from([from]);
        // Rank from which each chain has already been scanned onwards
        // (forward) or downwards (backward).
        let mut marks: HashMap<ChainId, Pseudotime> = HashMap::new();

        while let Some(point) = stack.pop() {
            let Some(at) = self.points.placement(point) else {
                continue;
            };

            if at.chain == target.chain {
                let hit = match direction {
                    Direction::Forward => at.pseudotime <= target.pseudotime,
                    Direction::Backward => at.pseudotime >= target.pseudotime,
                };
                if hit {
                    return Reach::Found;
                }
                // Past the target on its own chain: going on would need a cycle.
                continue;
            }

            let mark = marks.get(&at.chain).copied();
            if mark.is_some_and(|m| covers(direction, m, at.pseudotime)) {
                continue;
            }
            marks.insert(at.chain, at.pseudotime);

            let Some(chain) = self.chains.chain(at.chain) else {
                continue;
            };
            let members = chain.members();
            let Ok(idx) = members.binary_search_by_key(&at.pseudotime, |m| self.points.rank(*m))
            else {
                continue;
            };

            let mut ahead;
            let mut behind;
            let segment: &mut dyn Iterator<Item = &PointId> = match direction {
                Direction::Forward => {
                    ahead = members[idx..].iter();
                    &mut ahead
                }
                Direction::Backward => {
                    behind = members[..=idx].iter().rev();
                    &mut behind
                }
            };

            for &member in segment {
                if mark.is_some_and(|m| covers(direction, m, self.points.rank(member))) {
                    break;
                }
                if !budget.spend() {
                    return Reach::Exhausted;
                }
                for next in self.links(member, direction) {
                    let crosses = self.points.placement(next).is_some_and(|p| p.chain != at.chain);
                    if crosses && visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
        Reach::NotFound
    }

    fn links(&self, point: PointId, direction: Direction) -> Vec<PointId> {
        match direction {
            Direction::Forward => self.edges.forward_neighbors(point).collect(),
            Direction::Backward => self.edges.backward_neighbors(point).collect(),
        }
    }
}

/// Whether a chain already scanned from `mark` covers the member at `rank`.
fn covers(direction: Direction, mark: Pseudotime, rank: Pseudotime) -> bool {
    match direction {
        Direction::Forward => mark <= rank,
        Direction::Backward => mark >= rank,
    }
}
