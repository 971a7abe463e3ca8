#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::mutate_randomly;
use helpers::random_model;
use helpers::snapshot;
use quince_core::algorithms::AlgorithmKind;
use quince_core::domains::IntervalDomain;
use quince_core::engine::EngineOptions;
use quince_core::engine::PropagationEngine;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

#[test]
fn removals_in_a_frame_are_reverted_on_pop() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(1, 10));

    engine.push();
    for value in [2, 5, 6, 9] {
        engine.remove_value(x, value).expect("not empty");
    }
    engine.set_max(x, 7).expect("not empty");
    assert_eq!(vec![1, 3, 4, 7], engine.domain(x).values().collect::<Vec<_>>());

    assert!(engine.pop());
    assert_eq!(
        (1..=10).collect::<Vec<_>>(),
        engine.domain(x).values().collect::<Vec<_>>()
    );
}

#[test]
fn nested_frames_are_reverted_one_at_a_time() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(0, 20));

    let mut maxima = vec![];
    for max in [15, 10, 5] {
        maxima.push(engine.domain(x).max());
        engine.push();
        engine.set_max(x, max).expect("not empty");
    }

    while let Some(expected) = maxima.pop() {
        assert!(engine.pop());
        assert_eq!(expected, engine.domain(x).max());
    }
    assert_eq!(0, engine.depth());
}

#[test]
fn changes_at_the_root_are_kept() {
    let mut engine = PropagationEngine::default();
    let x = engine.add_node(IntervalDomain::new(0, 20));
    engine.set_min(x, 4).expect("not empty");

    engine.push();
    engine.set_min(x, 8).expect("not empty");
    engine.reset();

    assert_eq!(4, engine.domain(x).min());
}

#[test]
fn nodes_added_in_a_frame_survive_the_frame() {
    let mut engine = PropagationEngine::default();
    engine.push();
    let x = engine.add_node(IntervalDomain::new(0, 9));
    engine.set_max(x, 3).expect("not empty");

    assert!(engine.pop());

    assert!(engine.graph().is_attached(x));
    assert_eq!(9, engine.domain(x).max());
}

#[test]
fn replayed_deltas_restore_the_propagated_state() {
    for algorithm in [AlgorithmKind::ArcQueue, AlgorithmKind::NodeQueue] {
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let options = EngineOptions {
                algorithm,
                use_domain_deltas: algorithm == AlgorithmKind::NodeQueue,
                ..EngineOptions::default()
            };
            let (mut engine, nodes) = random_model(options, &mut rng);
            if engine.propagate().is_err() {
                continue;
            }
            let root = snapshot(&engine, &nodes);

            for _ in 0..30 {
                let before = snapshot(&engine, &nodes);
                engine.push();

                let num_mutations = rng.gen_range(1..4);
                let status = mutate_randomly(&mut engine, &nodes, &mut rng, num_mutations)
                    .and_then(|_| engine.propagate());
                if status.is_err() {
                    assert!(engine.pop());
                    assert_eq!(before, snapshot(&engine, &nodes));
                    continue;
                }

                let after = snapshot(&engine, &nodes);
                let delta = engine.pop_delta().expect("a frame is open");
                assert_eq!(before, snapshot(&engine, &nodes));

                engine.push_delta(delta);
                assert_eq!(after, snapshot(&engine, &nodes));

                if rng.gen_bool(0.5) {
                    assert!(engine.pop());
                    assert_eq!(before, snapshot(&engine, &nodes));
                }
            }

            engine.reset();
            assert_eq!(root, snapshot(&engine, &nodes));
            assert_eq!(0, engine.depth());
        }
    }
}
