//! However search work is sliced across calls, the outcome is the same.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use waygraph_core::{Edge, Graph, GraphBuilder, NodeId, Point};
use waygraph_paths::{
    BudgetConfig, Euclidean, Scheduler, Search, SearchError, SearchStatus, Target,
};

/// Random directed graph with integer-valued costs so sums are exact.
fn random_graph(rng: &mut StdRng, nodes: usize, density: f64) -> Graph {
    let mut b = GraphBuilder::new();
    let ids: Vec<NodeId> = (0..nodes)
        .map(|_| {
            b.add_node(Point::new(
                rng.random_range(0.0..50.0),
                rng.random_range(0.0..50.0),
            ))
        })
        .collect();
    for &a in &ids {
        for &c in &ids {
            if a != c && rng.random_bool(density) {
                b.add_edge(a, c, rng.random_range(0..10) as f64).unwrap();
            }
        }
    }
    b.build().unwrap()
}

#[derive(Debug, PartialEq)]
struct Outcome {
    status: SearchStatus,
    cost: Option<f64>,
    solution: Option<Vec<Edge>>,
    cycles: usize,
}

fn outcome<'g, S: Scheduler<'g>>(s: &S) -> Outcome {
    Outcome {
        status: s.status(),
        cost: s.cost(),
        solution: s.solution().map(<[Edge]>::to_vec),
        cycles: s.total_cycles(),
    }
}

fn run_all_ways(g: &Graph, src: NodeId, dst: NodeId) {
    let mut full = Search::dijkstra(g, src, Target(dst))
        .unwrap()
        .run_to_completion();
    let p = full.do_search().unwrap();
    assert!(p.status.is_finished());
    assert_eq!(p.cycles, full.total_cycles());
    let expected = outcome(&full);

    let mut one = Search::dijkstra(g, src, Target(dst))
        .unwrap()
        .one_cycle_per_call();
    let mut calls = 0;
    while one.do_search().unwrap() == SearchStatus::Running {
        calls += 1;
        assert!(calls <= expected.cycles, "one-cycle scheduler ran long");
    }
    assert_eq!(outcome(&one), expected);

    for budget in [1, 2, 3, 7, 1000] {
        let mut b = Search::dijkstra(g, src, Target(dst))
            .unwrap()
            .budgeted(BudgetConfig {
                cycles_per_call: budget,
            });
        let mut summed = 0;
        loop {
            let p = b.tick().unwrap();
            assert!(p.cycles <= budget);
            summed += p.cycles;
            if p.status.is_finished() {
                break;
            }
            assert_eq!(p.cycles, budget, "running call must use its whole budget");
        }
        assert_eq!(summed, expected.cycles, "budget {budget}");
        assert_eq!(outcome(&b), expected, "budget {budget}");
    }
}

#[test]
fn scenario_three_nodes_all_schedulers() {
    let g = Graph::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]).unwrap();
    run_all_ways(&g, NodeId::new(0), NodeId::new(2));
    run_all_ways(&g, NodeId::new(0), NodeId::new(3));
}

#[test]
fn random_graphs_agree_across_schedulers() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..40 {
        let nodes = 2 + round % 9;
        let g = random_graph(&mut rng, nodes, 0.3);
        for src in g.nodes() {
            for dst in g.nodes() {
                run_all_ways(&g, src, dst);
            }
        }
    }
}

#[test]
fn astar_agrees_across_schedulers() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut b = GraphBuilder::new();
    let ids: Vec<_> = (0..30)
        .map(|_| {
            b.add_node(Point::new(
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
            ))
        })
        .collect();
    for &a in &ids {
        for &c in &ids {
            if a != c && rng.random_bool(0.15) {
                b.connect(a, c).unwrap();
            }
        }
    }
    let g = b.build().unwrap();
    let (src, dst) = (ids[0], ids[29]);
    let h = Euclidean::towards(&g, dst).unwrap();

    let mut full = Search::astar(&g, src, Target(dst), h)
        .unwrap()
        .run_to_completion();
    full.do_search().unwrap();
    let expected = outcome(&full);

    let mut b = Search::astar(&g, src, Target(dst), h)
        .unwrap()
        .budgeted(BudgetConfig { cycles_per_call: 2 });
    while !b.tick().unwrap().status.is_finished() {}
    assert_eq!(outcome(&b), expected);

    let mut one = Search::astar(&g, src, Target(dst), h)
        .unwrap()
        .one_cycle_per_call();
    while one.do_search().unwrap() == SearchStatus::Running {}
    assert_eq!(outcome(&one), expected);
}

#[test]
fn terminal_sessions_reject_more_work() {
    let g = Graph::from_edges(2, &[(0, 1, 1.0)]).unwrap();
    let (a, c) = (NodeId::new(0), NodeId::new(1));

    let mut full = Search::dijkstra(&g, a, Target(c))
        .unwrap()
        .run_to_completion();
    full.do_search().unwrap();
    assert!(matches!(full.do_search(), Err(SearchError::Finished { .. })));

    let mut one = Search::dijkstra(&g, c, Target(a))
        .unwrap()
        .one_cycle_per_call();
    assert_eq!(one.do_search(), Ok(SearchStatus::Running));
    assert_eq!(one.do_search(), Ok(SearchStatus::Failure));
    assert!(matches!(one.do_search(), Err(SearchError::Finished { .. })));
    assert_eq!(one.total_cycles(), 2);

    let mut b = Search::dijkstra(&g, a, Target(c))
        .unwrap()
        .budgeted(BudgetConfig::default());
    b.tick().unwrap();
    assert!(b.tick().is_err());
    assert_eq!(b.status(), SearchStatus::Success);
}
