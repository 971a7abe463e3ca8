#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::mutate_randomly;
use helpers::random_model;
use helpers::snapshot;
use quince_core::algorithms::AlgorithmKind;
use quince_core::arcs::AlgorithmStrength;
use quince_core::arcs::EqualArc;
use quince_core::constraints::AllDifferent;
use quince_core::constraints::LessOrEqual;
use quince_core::constraints::LinearSum;
use quince_core::domains::IntervalDomain;
use quince_core::engine::EngineOptions;
use quince_core::engine::PropagationEngine;
use quince_core::ConstraintOperationError;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn options(algorithm: AlgorithmKind, use_domain_deltas: bool) -> EngineOptions {
    EngineOptions {
        algorithm,
        use_domain_deltas,
        ..EngineOptions::default()
    }
}

#[test]
fn chain_of_inequalities_is_tightened() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(0, 10));
    let y = engine.add_node(IntervalDomain::new(0, 5));

    engine.post(LessOrEqual::new(x, y, 2)).expect("attached");
    engine.propagate().expect("satisfiable");
    assert_eq!(3, engine.domain(x).max());
    assert_eq!(2, engine.domain(y).min());

    engine.push();
    engine.set_min(y, 5).expect("not empty");
    engine.propagate().expect("satisfiable");
    assert_eq!(3, engine.domain(x).max());

    assert!(engine.pop());
    assert_eq!(2, engine.domain(y).min());
}

#[test]
fn linear_sum_narrows_the_bounds() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(0, 10));
    let y = engine.add_node(IntervalDomain::new(0, 10));
    let z = engine.add_node(IntervalDomain::new(7, 9));

    engine.post(LinearSum::new([x, y, z], 10)).expect("attached");
    engine.propagate().expect("satisfiable");
    assert_eq!(3, engine.domain(x).max());
    assert_eq!(3, engine.domain(y).max());

    engine.bind(x, 3).expect("not empty");
    engine.propagate().expect("satisfiable");
    assert_eq!(Some(0), engine.domain(y).value());
    assert_eq!(Some(7), engine.domain(z).value());
}

#[test]
fn all_different_detects_pigeonholes() {
    for algorithm in [AlgorithmKind::ArcQueue, AlgorithmKind::NodeQueue] {
        let mut engine = PropagationEngine::new(options(algorithm, false));
        let nodes: Vec<_> = (0..3)
            .map(|_| engine.add_node(IntervalDomain::new(1, 2)))
            .collect();
        engine.post(AllDifferent::new(nodes.clone())).expect("attached");
        engine.propagate().expect("pairwise reasoning does not see the conflict");

        engine.push();
        engine.bind(nodes[0], 1).expect("not empty");
        let failure = engine.propagate().expect_err("two nodes are left for one value");
        assert!(nodes.contains(&failure.node));
        assert!(failure.arc.is_some());

        assert!(engine.pop());
        assert!(engine.algorithm().is_idle());
    }
}

#[test]
fn strength_decides_whether_holes_are_copied() {
    for (strength, expected) in [
        (AlgorithmStrength::Bounds, vec![0, 1, 2, 3, 4, 5]),
        (AlgorithmStrength::Domain, vec![0, 1, 3, 5]),
    ] {
        let mut engine = PropagationEngine::new(EngineOptions {
            strength,
            ..EngineOptions::default()
        });
        let x = engine.add_node(IntervalDomain::from_values([0, 1, 3, 5]));
        let y = engine.add_node(IntervalDomain::new(-5, 10));
        let _ = engine.add_arc(Box::new(EqualArc::new(x, y))).expect("attached");

        engine.propagate().expect("satisfiable");

        assert_eq!(expected, engine.domain(y).values().collect::<Vec<_>>());
    }
}

#[test]
fn invalid_arcs_are_rejected() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(0, 5));
    let y = engine.add_node(IntervalDomain::new(0, 5));
    engine.post(LessOrEqual::new(x, y, 0)).expect("attached");

    engine.remove_node(y).expect("y is attached");
    assert_eq!(0, engine.graph().num_arcs());
    assert_eq!(
        Err(ConstraintOperationError::DetachedNode(y)),
        engine.post(LessOrEqual::new(x, y, 0))
    );
}

#[test]
fn algorithms_agree_on_the_fixpoint() {
    for seed in 0..20 {
        let configurations = [
            options(AlgorithmKind::ArcQueue, false),
            options(AlgorithmKind::NodeQueue, false),
            options(AlgorithmKind::NodeQueue, true),
        ];

        let outcomes: Vec<_> = configurations
            .into_iter()
            .map(|options| {
                let mut rng = SmallRng::seed_from_u64(seed);
                let (mut engine, nodes) = random_model(options, &mut rng);
                // The domains after a failure depend on the order of propagation.
                let outcome = |engine: &PropagationEngine, succeeded: bool| {
                    succeeded.then(|| snapshot(engine, &nodes))
                };

                let mut outcomes = vec![];
                let status = engine.propagate();
                outcomes.push(outcome(&engine, status.is_ok()));
                if status.is_err() {
                    return outcomes;
                }

                for _ in 0..10 {
                    engine.push();
                    let status = mutate_randomly(&mut engine, &nodes, &mut rng, 2)
                        .and_then(|_| engine.propagate());
                    outcomes.push(outcome(&engine, status.is_ok()));
                    if status.is_err() {
                        assert!(engine.pop());
                    }
                }
                outcomes
            })
            .collect();

        assert_eq!(outcomes[0], outcomes[1], "seed {seed}");
        assert_eq!(outcomes[1], outcomes[2], "seed {seed}");
    }
}

#[test]
fn switching_algorithms_between_frames() {
    let mut rng = SmallRng::seed_from_u64(7);
    let (mut engine, nodes) = random_model(options(AlgorithmKind::ArcQueue, false), &mut rng);
    if engine.propagate().is_err() {
        return;
    }
    let root = snapshot(&engine, &nodes);

    engine.push();
    engine.set_algorithm(AlgorithmKind::NodeQueue);
    engine.propagate().expect("the root state was a fixpoint");
    assert_eq!(root, snapshot(&engine, &nodes));
    assert!(engine.pop());

    let statistics = engine.statistics();
    assert_eq!(2, statistics.num_propagations);
    assert_eq!(1, statistics.num_pushes);
    assert_eq!(1, statistics.num_pops);
}
