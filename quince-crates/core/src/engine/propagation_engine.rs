use log::debug;
use log::trace;
use log::warn;

use super::EngineOptions;
use crate::algorithms::AlgorithmKind;
use crate::algorithms::ConsistencyAlgorithm;
use crate::algorithms::PropagationStatistics;
use crate::arcs::Arc;
use crate::arcs::ArcId;
use crate::arcs::ArcPoster;
use crate::arcs::ArcType;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::choice_points::ChoicePointDataSource;
use crate::choice_points::ChoicePointDelta;
use crate::choice_points::ChoicePointStack;
use crate::choice_points::ReversibleInteger;
use crate::constraints::GraphConstraint;
use crate::create_statistics_struct;
use crate::domains::IntervalDomain;
use crate::graph::NodeArcGraph;
use crate::graph::NodeId;
use crate::quince_asserts::quince_assert_advanced;
use crate::quince_asserts::quince_assert_simple;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters of the calls made to a [`PropagationEngine`].
    EngineStatistics {
        /// The number of calls to [`PropagationEngine::propagate`].
        num_propagations: u64,
        /// The number of opened frames, including replayed ones.
        num_pushes: u64,
        /// The number of closed frames, including those closed with
        /// [`PropagationEngine::pop_delta`].
        num_pops: u64,
        /// The number of frames opened with [`PropagationEngine::push_delta`].
        num_delta_replays: u64,
        /// The number of calls to [`PropagationEngine::reset`].
        num_resets: u64,
});

/// A propagation graph together with its consistency algorithm and a choice-point stack on which
/// every domain is registered.
///
/// Changes to the structure of the graph (nodes and arcs) are not reversible; changes to the
/// domains and to the reversible integers are. Whenever a frame is closed, the pending work of the
/// algorithm is dropped, and the arcs which might not be at their fixpoint in the restored state
/// (those added since the frame was opened, or since the last successful
/// [`PropagationEngine::propagate`]) are queued again.
#[derive(Debug)]
pub struct PropagationEngine {
    graph: NodeArcGraph,
    algorithm: ConsistencyAlgorithm,
    choice_points: ChoicePointStack,
    options: EngineOptions,
    statistics: EngineStatistics,
    /// The work done by algorithms which have been replaced with
    /// [`PropagationEngine::set_algorithm`].
    retired_propagation_statistics: PropagationStatistics,
    /// For every open frame, the id of the first arc added in it.
    frame_arc_marks: Vec<ArcId>,
    /// Arcs with an id from this one on have not yet taken part in a successful propagation.
    unpropagated_arcs_from: ArcId,
    /// The failure which left a domain empty, with the depth at which it happened. It stands until
    /// that frame is closed.
    failure: Option<(usize, PropagationFailure)>,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        PropagationEngine::new(EngineOptions::default())
    }
}

impl PropagationEngine {
    pub fn new(options: EngineOptions) -> Self {
        if options.algorithm == AlgorithmKind::ArcQueue && options.use_domain_deltas {
            warn!("domain deltas are requested, but the arc-queue algorithm does not use them");
        }

        let mut graph = NodeArcGraph::default();
        let mut choice_points = ChoicePointStack::default();
        graph.attach_values_to_stack(choice_points.register_data_source());

        let mut algorithm = ConsistencyAlgorithm::new(
            options.algorithm,
            options.use_domain_deltas,
            options.arc_queue_pool_capacity,
        );
        algorithm.install(&mut graph, options.strength);

        PropagationEngine {
            unpropagated_arcs_from: graph.next_arc_id(),
            graph,
            algorithm,
            choice_points,
            options,
            statistics: EngineStatistics::default(),
            retired_propagation_statistics: PropagationStatistics::default(),
            frame_arc_marks: Vec::new(),
            failure: None,
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn graph(&self) -> &NodeArcGraph {
        &self.graph
    }

    pub fn algorithm(&self) -> &ConsistencyAlgorithm {
        &self.algorithm
    }

    /// The number of open frames; `0` is the root.
    pub fn depth(&self) -> usize {
        self.choice_points.depth()
    }

    /// The failure which currently leaves a domain empty, if any.
    pub fn failure(&self) -> Option<PropagationFailure> {
        self.failure.map(|(_, failure)| failure)
    }

    /// Adds a node with the given domain and registers the domain with the choice-point stack.
    ///
    /// A node added inside a frame stays in the graph when the frame is closed; changes made to
    /// its domain in that frame are reverted.
    pub fn add_node(&mut self, mut domain: IntervalDomain) -> NodeId {
        quince_assert_simple!(
            domain.registration().is_none(),
            "the domain of a new node is already registered with a choice-point stack"
        );
        domain.attach_to_stack(self.choice_points.register_data_source());
        self.graph.add_node(domain)
    }

    /// Removes `node` together with every arc which references it.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), ConstraintOperationError> {
        let result = self.graph.remove_node(node);
        self.graph.dispatch_events(&mut self.algorithm);
        result
    }

    /// Adds a single arc; it is propagated on the next call to [`PropagationEngine::propagate`].
    pub fn add_arc(&mut self, arc: Box<dyn Arc>) -> Result<ArcId, ConstraintOperationError> {
        let arc = self.graph.add_arc(arc)?;
        self.graph.dispatch_events(&mut self.algorithm);
        Ok(arc)
    }

    /// Posts the arcs of `constraint`. Arcs posted before an error occurred stay in the graph.
    pub fn post(
        &mut self,
        constraint: impl GraphConstraint,
    ) -> Result<(), ConstraintOperationError> {
        trace!("posting constraint {}", constraint.name());
        let result = constraint.post_to_graph(&mut self.graph);
        self.graph.dispatch_events(&mut self.algorithm);
        result
    }

    pub fn remove_arc(&mut self, arc: ArcId) -> Result<Box<dyn Arc>, ConstraintOperationError> {
        let arc = self.graph.remove_arc(arc)?;
        self.graph.dispatch_events(&mut self.algorithm);
        Ok(arc)
    }

    pub fn domain(&self, node: NodeId) -> &IntervalDomain {
        self.graph.domain(node)
    }

    pub fn remove_value(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        let result = self.graph.remove_value(node, value);
        self.settle_mutation(result)
    }

    pub fn remove_range(&mut self, node: NodeId, lo: i32, hi: i32) -> PropagationStatus {
        let result = self.graph.remove_range(node, lo, hi);
        self.settle_mutation(result)
    }

    pub fn set_min(&mut self, node: NodeId, min: i32) -> PropagationStatus {
        let result = self.graph.set_min(node, min);
        self.settle_mutation(result)
    }

    pub fn set_max(&mut self, node: NodeId, max: i32) -> PropagationStatus {
        let result = self.graph.set_max(node, max);
        self.settle_mutation(result)
    }

    pub fn bind(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        let result = self.graph.bind(node, value);
        self.settle_mutation(result)
    }

    /// Allocates a reversible integer which arcs can read and assign through their propagation
    /// context.
    pub fn new_reversible_integer(&mut self, initial_value: i64) -> ReversibleInteger {
        self.graph.new_reversible_integer(initial_value)
    }

    pub fn read_reversible(&self, value: ReversibleInteger) -> i64 {
        self.graph.read_value(value)
    }

    /// Propagates the pending work to a fixpoint.
    ///
    /// On failure the domains are left as they are; the pending work is dropped, and the state
    /// should be restored by closing the frame opened before the failing operation.
    ///
    /// Once a domain has become empty, every call fails with the same [`PropagationFailure`] until
    /// the frame in which it happened is closed.
    pub fn propagate(&mut self) -> PropagationStatus {
        self.statistics.num_propagations += 1;
        if let Some((_, failure)) = self.failure {
            return Err(failure);
        }

        match self.algorithm.propagate(&mut self.graph) {
            Ok(()) => {
                self.unpropagated_arcs_from = self.graph.next_arc_id();
                quince_assert_advanced!(
                    self.is_at_fixpoint(),
                    "the {} algorithm stopped before reaching a fixpoint",
                    self.algorithm.kind()
                );
                Ok(())
            }
            Err(failure) => {
                debug!("{failure} at depth {}", self.depth());
                self.failure = Some((self.depth(), failure));
                self.discard_pending_work(None);
                Err(failure)
            }
        }
    }

    /// Opens a new frame. Should only be called at a fixpoint, i.e. after a successful
    /// [`PropagationEngine::propagate`]; work which is pending when the frame is opened is lost
    /// when it is closed.
    pub fn push(&mut self) {
        self.warn_about_pending_work();
        self.frame_arc_marks.push(self.graph.next_arc_id());
        self.choice_points.push(&mut self.graph);
        self.statistics.num_pushes += 1;
    }

    /// Closes the innermost frame, reverting every domain change made in it.
    ///
    /// Returns `false` if no frame is open.
    pub fn pop(&mut self) -> bool {
        if !self.choice_points.pop(&mut self.graph) {
            return false;
        }

        self.statistics.num_pops += 1;
        let frame_arc_mark = self.frame_arc_marks.pop();
        self.discard_pending_work(frame_arc_mark);
        true
    }

    /// Closes the innermost frame like [`PropagationEngine::pop`], returning its changes so that
    /// they can be replayed with [`PropagationEngine::push_delta`].
    pub fn pop_delta(&mut self) -> Option<ChoicePointDelta> {
        let delta = self.choice_points.pop_delta(&mut self.graph)?;

        self.statistics.num_pops += 1;
        let frame_arc_mark = self.frame_arc_marks.pop();
        self.discard_pending_work(frame_arc_mark);
        Some(delta)
    }

    /// Opens a new frame and replays `delta` in it, restoring the domains to their state at the
    /// time the delta was captured.
    ///
    /// # Panics
    /// If `delta` was captured at another depth than the one of the new frame.
    pub fn push_delta(&mut self, delta: ChoicePointDelta) {
        self.warn_about_pending_work();
        self.frame_arc_marks.push(self.graph.next_arc_id());
        self.choice_points.push_delta(&mut self.graph, delta);
        self.statistics.num_pushes += 1;
        self.statistics.num_delta_replays += 1;
    }

    /// Closes every frame and returns all domains to their root state.
    pub fn reset(&mut self) {
        self.choice_points.reset(&mut self.graph);
        self.statistics.num_resets += 1;

        let first_frame_arc_mark = self.frame_arc_marks.first().copied();
        self.frame_arc_marks.clear();
        self.discard_pending_work(first_frame_arc_mark);
    }

    /// Replaces the consistency algorithm. Every live arc is queued for the new algorithm.
    pub fn set_algorithm(&mut self, kind: AlgorithmKind) {
        debug!("switching from the {} to the {kind} algorithm", self.algorithm.kind());

        self.retired_propagation_statistics
            .accumulate(self.algorithm.statistics());
        self.options.algorithm = kind;
        self.algorithm = ConsistencyAlgorithm::new(
            kind,
            self.options.use_domain_deltas,
            self.options.arc_queue_pool_capacity,
        );
        self.graph.clear_deltas();
        self.algorithm.install(&mut self.graph, self.options.strength);
    }

    pub fn statistics(&self) -> EngineStatistics {
        self.statistics
    }

    /// The work done by every algorithm this engine has used.
    pub fn propagation_statistics(&self) -> PropagationStatistics {
        let mut statistics = self.retired_propagation_statistics;
        statistics.accumulate(self.algorithm.statistics());
        statistics
    }

    /// Logs the engine and propagation statistics if statistic logging has been configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        self.statistics.log(StatisticLogger::new(["engine"]));
        self.propagation_statistics()
            .log(StatisticLogger::new(["engine", "propagation"]));
        log_statistic_postfix();
    }

    fn settle_mutation(&mut self, result: PropagationStatus) -> PropagationStatus {
        self.graph.dispatch_events(&mut self.algorithm);
        if let Err(failure) = result {
            let depth = self.depth();
            let _ = self.failure.get_or_insert((depth, failure));
        }
        result
    }

    /// Drops the pending work of the algorithm and every node delta, and queues the arcs which may
    /// not be at their fixpoint anymore: those from `frame_arc_mark` on and those which have not
    /// been propagated successfully yet. A failure is forgotten once its frame is closed.
    fn discard_pending_work(&mut self, frame_arc_mark: Option<ArcId>) {
        if self
            .failure
            .is_some_and(|(failed_at, _)| failed_at > self.depth())
        {
            self.failure = None;
        }

        self.algorithm.clear();
        self.graph.discard_events();
        self.graph.clear_deltas();

        let first = frame_arc_mark
            .map(|mark| mark.min(self.unpropagated_arcs_from))
            .unwrap_or(self.unpropagated_arcs_from);
        self.unpropagated_arcs_from = first;
        self.graph.announce_arcs_from(first);
        self.graph.dispatch_events(&mut self.algorithm);
    }

    fn warn_about_pending_work(&self) {
        if !self.algorithm.is_idle() {
            warn!(
                "opening frame {} with pending propagation work; the work is lost when the frame \
                 is closed",
                self.depth() + 1
            );
        }
    }

    /// Propagates every non-generic arc on the full domains and checks that none of them filters
    /// anything.
    fn is_at_fixpoint(&mut self) -> bool {
        let arcs: Vec<ArcId> = self
            .graph
            .arc_ids()
            .filter(|&arc| {
                self.graph
                    .arc_type(arc)
                    .is_some_and(|arc_type| arc_type < ArcType::Generic)
            })
            .collect();

        arcs.into_iter().all(|arc| {
            let result = self.graph.propagate_arc(arc, None);
            let unchanged = !self.graph.has_pending_events();
            self.graph.dispatch_events(&mut self.algorithm);
            if result.is_err() || !unchanged {
                warn!("{arc} is not at its fixpoint");
            }
            result.is_ok() && unchanged
        })
    }
}

impl ArcPoster for PropagationEngine {
    fn post_arc(&mut self, arc: Box<dyn Arc>) -> Result<(), ConstraintOperationError> {
        self.add_arc(arc).map(|_| ())
    }
}
