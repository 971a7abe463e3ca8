use quince_core::arcs::EqualArc;
use quince_core::constraints::AllDifferent;
use quince_core::constraints::LessOrEqual;
use quince_core::constraints::LinearSum;
use quince_core::constraints::NotEqual;
use quince_core::domains::IntervalDomain;
use quince_core::engine::EngineOptions;
use quince_core::engine::PropagationEngine;
use quince_core::graph::NodeId;
use rand::rngs::SmallRng;
use rand::Rng;

/// The values of every node, in order.
pub(crate) fn snapshot(engine: &PropagationEngine, nodes: &[NodeId]) -> Vec<Vec<i32>> {
    nodes
        .iter()
        .map(|&node| engine.domain(node).values().collect())
        .collect()
}

/// Builds a small random model which mixes every arc type with a hole-sensitive equality.
pub(crate) fn random_model(
    options: EngineOptions,
    rng: &mut SmallRng,
) -> (PropagationEngine, Vec<NodeId>) {
    let mut engine = PropagationEngine::new(options);
    let nodes: Vec<NodeId> = (0..6)
        .map(|_| {
            let min = rng.gen_range(0..5);
            let max = rng.gen_range(10..20);
            engine.add_node(IntervalDomain::new(min, max))
        })
        .collect();

    engine
        .post(LessOrEqual::new(nodes[0], nodes[1], rng.gen_range(0..4)))
        .expect("nodes are attached");
    engine
        .post(NotEqual::new(nodes[1], nodes[2]))
        .expect("nodes are attached");
    engine
        .post(AllDifferent::new([nodes[2], nodes[3], nodes[4]]))
        .expect("nodes are attached");
    engine
        .post(LinearSum::new([nodes[0], nodes[3], nodes[5]], rng.gen_range(15..30)))
        .expect("nodes are attached");
    let _ = engine
        .add_arc(Box::new(EqualArc::new(nodes[4], nodes[5])))
        .expect("nodes are attached");

    (engine, nodes)
}

/// Applies up to `num_mutations` random narrowings, stopping at the first failure.
pub(crate) fn mutate_randomly(
    engine: &mut PropagationEngine,
    nodes: &[NodeId],
    rng: &mut SmallRng,
    num_mutations: usize,
) -> Result<(), quince_core::PropagationFailure> {
    for _ in 0..num_mutations {
        let node = nodes[rng.gen_range(0..nodes.len())];
        let domain = engine.domain(node);
        if domain.is_empty() {
            continue;
        }

        let value = rng.gen_range(domain.min()..=domain.max());
        match rng.gen_range(0..3) {
            0 => engine.remove_value(node, value)?,
            1 => engine.set_min(node, value)?,
            _ => engine.set_max(node, value)?,
        }
    }

    Ok(())
}
