//! Golden tests for the timegraph.
//!
//! These tests pin down the observable answers of the engine on small,
//! hand-checked graphs.

use timegraph::{
    EdgeKind, PointId, Relation, SharedTimegraph, Timegraph, TimegraphConfig, TimegraphError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn points(graph: &mut Timegraph, n: usize) -> Vec<PointId> {
    (0..n).map(|_| graph.create_point()).collect()
}

/// Every ordered pair's answer, for before/after comparisons.
fn answers(graph: &Timegraph, ids: &[PointId]) -> Vec<Relation> {
    ids.iter()
        .flat_map(|&p| ids.iter().map(move |&q| (p, q)))
        .map(|(p, q)| graph.query(p, q).unwrap())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_abcd_scenario() {
    init_tracing();
    let mut graph = Timegraph::new();
    let a = graph.create_point();
    let b = graph.create_point();
    let c = graph.create_point();

    graph.add_relation(a, b).unwrap();
    graph.add_relation(b, c).unwrap();

    assert_eq!(graph.query(a, c), Ok(Relation::Before));
    assert_eq!(graph.query(c, a), Ok(Relation::After));
    assert_eq!(graph.query(a, a), Ok(Relation::Same));

    let d = graph.create_point();
    assert_eq!(graph.query(a, d), Ok(Relation::Unknown));
    assert_eq!(graph.query(d, c), Ok(Relation::Unknown));
}

#[test]
fn test_cycle_rejection_leaves_answers() {
    init_tracing();
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 3);
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    graph.add_relation(a, b).unwrap();
    graph.add_relation(b, c).unwrap();

    let before = answers(&graph, &ids);
    let stats = graph.stats();

    assert_eq!(graph.add_relation(c, a), Err(TimegraphError::Cycle { from: c, to: a }));

    assert_eq!(answers(&graph, &ids), before);
    assert_eq!(graph.stats(), stats);
    assert_eq!(graph.query(a, b), Ok(Relation::Before));
    assert_eq!(graph.query(b, c), Ok(Relation::Before));
    assert_eq!(graph.query(a, c), Ok(Relation::Before));
}

#[test]
fn test_cross_chain_cycle_is_rejected() {
    init_tracing();
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 6);
    // Three two-point chains joined by cross edges.
    graph.add_relation(ids[0], ids[1]).unwrap();
    graph.add_relation(ids[2], ids[3]).unwrap();
    graph.add_relation(ids[4], ids[5]).unwrap();
    graph.add_relation(ids[1], ids[2]).unwrap();
    graph.add_relation(ids[3], ids[4]).unwrap();

    assert_eq!(graph.query(ids[0], ids[5]), Ok(Relation::Before));
    assert!(graph.add_relation(ids[5], ids[0]).unwrap_err().is_cycle());
    assert!(graph.add_relation(ids[4], ids[1]).unwrap_err().is_cycle());
    assert_eq!(graph.query(ids[5], ids[0]), Ok(Relation::After));
}

#[test]
fn test_branches_are_unordered() {
    init_tracing();
    //        root
    //       /    \
    //    left    right
    //       \    /
    //        join
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 4);
    let (root, left, right, join) = (ids[0], ids[1], ids[2], ids[3]);
    graph.add_relation(root, left).unwrap();
    graph.add_relation(root, right).unwrap();
    graph.add_relation(left, join).unwrap();
    graph.add_relation(right, join).unwrap();

    assert_eq!(graph.query(left, right), Ok(Relation::Unknown));
    assert_eq!(graph.query(right, left), Ok(Relation::Unknown));
    assert_eq!(graph.query(root, join), Ok(Relation::Before));
    assert_eq!(graph.query(join, right), Ok(Relation::After));

    let kinds: Vec<_> = graph.edges().iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EdgeKind::Cross));
}

#[test]
fn test_event_invariant() {
    init_tracing();
    let mut graph = Timegraph::new();
    let events: Vec<_> = (0..10).map(|_| graph.create_event()).collect();
    for pair in events.windows(2) {
        graph.add_relation(pair[0].end, pair[1].start).unwrap();
    }
    let from = graph.create_point();
    let event = graph.create_event_from(events[9].end, from).unwrap();

    for event in events.iter().chain(std::iter::once(&event)) {
        let relation = graph.query(event.start, event.end).unwrap();
        assert!(matches!(relation, Relation::Before | Relation::Same), "{relation}");
    }
    assert_eq!(graph.query(events[0].start, from), Ok(Relation::Before));
}

#[test]
fn test_chain_fast_path_agrees_with_pseudotime() {
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 20);
    for pair in ids.windows(2) {
        graph.add_relation(pair[0], pair[1]).unwrap();
    }
    // Squeeze extra points between existing neighbours.
    for i in 0..10 {
        let mid = graph.create_point();
        graph.add_relation(ids[i], mid).unwrap();
        graph.add_relation(mid, ids[i + 1]).unwrap();
    }

    let all: Vec<_> = graph.points().map(|p| p.id()).collect();
    for &p in &all {
        for &q in &all {
            let (pp, qp) = match (graph.point(p).unwrap().placement(), graph.point(q).unwrap().placement()) {
                (Some(pp), Some(qp)) if pp.chain == qp.chain => (pp, qp),
                _ => continue,
            };
            let expected = Relation::from_ordering(pp.pseudotime.cmp(&qp.pseudotime));
            assert_eq!(graph.query(p, q), Ok(expected));
        }
    }
}

#[test]
fn test_exhausted_budget_answers_unknown() {
    init_tracing();
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 40);
    // A zig-zag across many two-point chains.
    for pair in ids.chunks(2) {
        graph.add_relation(pair[0], pair[1]).unwrap();
    }
    for i in (1..38).step_by(2) {
        graph.add_relation(ids[i], ids[i + 1]).unwrap();
    }

    assert_eq!(graph.query_with_budget(ids[0], ids[39], Some(1)), Ok(Relation::Unknown));
    assert_eq!(graph.query_with_budget(ids[0], ids[39], None), Ok(Relation::Before));
    // Definite answers are cached, so a tiny budget no longer matters.
    assert_eq!(graph.query_with_budget(ids[39], ids[0], Some(1)), Ok(Relation::After));
}

#[test]
fn test_config_from_json() {
    let config = TimegraphConfig::from_json(r#"{"pseudo_increment": 16}"#).unwrap();
    let mut graph = Timegraph::with_config(config).unwrap();
    let ids = points(&mut graph, 2);
    graph.add_relation(ids[0], ids[1]).unwrap();
    assert_eq!(graph.point(ids[1]).unwrap().pseudotime(), Some(17));
}

#[test]
fn test_snapshot_replays_to_same_answers() {
    init_tracing();
    let mut graph = Timegraph::new();
    let ids = points(&mut graph, 8);
    for &(p, q) in &[(0, 1), (1, 2), (0, 3), (3, 4), (4, 2), (5, 6), (2, 7), (6, 7)] {
        graph.add_relation(ids[p], ids[q]).unwrap();
    }
    graph.create_event();

    let snapshot = graph.snapshot().unwrap();
    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    let restored = Timegraph::restore(&serde_json::from_str(&json).unwrap(), TimegraphConfig::default()).unwrap();

    assert_eq!(answers(&restored, &ids), answers(&graph, &ids));
    assert_eq!(restored.events(), graph.events());
}

#[test]
fn test_shared_handle_scenario() {
    let shared = SharedTimegraph::default();
    let a = shared.create_point();
    let b = shared.create_point();
    shared.add_relation(a, b).unwrap();

    let reader = {
        let shared = shared.clone();
        std::thread::spawn(move || shared.query(b, a))
    };
    assert_eq!(reader.join().unwrap(), Ok(Relation::After));
    assert!(shared.add_relation(b, a).is_err());
}
