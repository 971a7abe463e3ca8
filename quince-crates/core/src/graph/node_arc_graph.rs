use enum_map::EnumMap;
use log::trace;

use super::GraphEvent;
use super::GraphListener;
use super::NodeEvent;
use super::NodeId;
use super::NodeStore;
use crate::arcs::AlgorithmStrength;
use crate::arcs::Arc;
use crate::arcs::ArcId;
use crate::arcs::ArcPoster;
use crate::arcs::ArcType;
use crate::arcs::PropagationContext;
use crate::arcs::Trigger;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::choice_points::ChoicePointDataSource;
use crate::choice_points::DataSourceRegistration;
use crate::choice_points::DataSources;
use crate::choice_points::ReversibleInteger;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::domains::Interval;
use crate::domains::IntervalDomain;

#[derive(Debug)]
struct ArcEntry {
    arc: Box<dyn Arc>,
    arc_type: ArcType,
    /// Every node the arc references, without duplicates.
    nodes: Box<[NodeId]>,
}

/// The propagation graph: owns the nodes and the arcs, and indexes for every node the arcs which
/// react to changes of its domain.
///
/// The index has one level per [`NodeEvent`]. An arc is registered at the level returned by
/// [`Arc::trigger_event`] for each of its sources; since a more specific event implies the less
/// specific ones, [`NodeArcGraph::source_arcs`] cascades from the requested level down to
/// [`NodeEvent::Domain`].
///
/// [`ArcType::Node`] arcs are not indexed; they only need a single propagation and are announced
/// once through [`GraphEvent::ArcAdded`].
#[derive(Debug, Default)]
pub struct NodeArcGraph {
    store: NodeStore,
    arcs: KeyedVec<ArcId, Option<ArcEntry>>,
    index: KeyedVec<NodeId, EnumMap<NodeEvent, Vec<ArcId>>>,
    /// For every node, the arcs referencing it as a source or a target.
    references: KeyedVec<NodeId, Vec<ArcId>>,
    strength: AlgorithmStrength,
    use_domain_deltas: bool,
    num_live_arcs: usize,
    /// Arcs posted by the arc which is currently propagating.
    posted: Vec<Box<dyn Arc>>,
}

impl NodeArcGraph {
    pub fn add_node(&mut self, domain: IntervalDomain) -> NodeId {
        let node = self.store.push_node(domain);
        let _ = self.index.push(EnumMap::default());
        let _ = self.references.push(Vec::new());
        node
    }

    /// Detaches `node` together with every arc referencing it.
    ///
    /// Each removed arc is reported through [`GraphEvent::ArcRemoved`], followed by a single
    /// [`GraphEvent::NodeRemoved`]. The domain of a detached node can still be inspected.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), ConstraintOperationError> {
        self.store.validate_arc(&[node], &[])?;

        let referencing = std::mem::take(&mut self.references[node]);
        for arc in referencing {
            let _ = self.remove_arc(arc)?;
        }

        self.store.detach(node);
        self.store.events.push(GraphEvent::NodeRemoved(node));
        trace!("removed {node}");

        Ok(())
    }

    /// Adds `arc` to the graph, after checking that it references at least one node and that all
    /// referenced nodes are attached.
    pub fn add_arc(&mut self, arc: Box<dyn Arc>) -> Result<ArcId, ConstraintOperationError> {
        self.store.validate_arc(arc.sources(), arc.targets())?;
        Ok(self.insert_arc(arc))
    }

    /// Removes `arc` from the graph and hands it back.
    pub fn remove_arc(&mut self, arc: ArcId) -> Result<Box<dyn Arc>, ConstraintOperationError> {
        let entry = self
            .arcs
            .get_mut(arc)
            .and_then(Option::take)
            .ok_or(ConstraintOperationError::UnknownArc(arc))?;

        for &source in entry.arc.sources() {
            self.index[source]
                .values_mut()
                .for_each(|arcs| arcs.retain(|&other| other != arc));
        }
        for &node in entry.nodes.iter() {
            self.references[node].retain(|&other| other != arc);
        }

        self.num_live_arcs -= 1;
        self.store.events.push(GraphEvent::ArcRemoved(arc));
        trace!("removed {arc} ({})", entry.arc.name());

        Ok(entry.arc)
    }

    fn insert_arc(&mut self, mut arc: Box<dyn Arc>) -> ArcId {
        arc.set_algorithm_strength(self.strength);
        arc.set_use_domain_deltas(self.use_domain_deltas);

        let arc_type = arc.arc_type();
        let mut nodes: Vec<NodeId> = arc.sources().iter().chain(arc.targets()).copied().collect();
        nodes.sort_unstable();
        nodes.dedup();

        let id = self.arcs.next_key();

        if arc_type != ArcType::Node {
            for &source in arc.sources() {
                let arcs = &mut self.index[source][arc.trigger_event(source)];
                if !arcs.contains(&id) {
                    arcs.push(id);
                }
            }
        }
        for &node in nodes.iter() {
            self.references[node].push(id);
        }

        trace!("added {id} ({}, {arc_type})", arc.name());
        let _ = self.arcs.push(Some(ArcEntry {
            arc,
            arc_type,
            nodes: nodes.into(),
        }));
        self.num_live_arcs += 1;
        self.store.events.push(GraphEvent::ArcAdded(id));

        id
    }

    pub fn arc(&self, arc: ArcId) -> Option<&dyn Arc> {
        self.entry(arc).map(|entry| entry.arc.as_ref())
    }

    /// Recovers the concrete type of an arc.
    pub fn arc_as<ConcreteArc: Arc>(&self, arc: ArcId) -> Option<&ConcreteArc> {
        self.entry(arc)
            .and_then(|entry| entry.arc.downcast_ref::<ConcreteArc>())
    }

    pub fn arc_type(&self, arc: ArcId) -> Option<ArcType> {
        self.entry(arc).map(|entry| entry.arc_type)
    }

    pub fn contains_arc(&self, arc: ArcId) -> bool {
        self.entry(arc).is_some()
    }

    pub fn num_arcs(&self) -> usize {
        self.num_live_arcs
    }

    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.arcs
            .iter_with_keys()
            .filter(|(_, entry)| entry.is_some())
            .map(|(arc, _)| arc)
    }

    fn entry(&self, arc: ArcId) -> Option<&ArcEntry> {
        self.arcs.get(arc).and_then(Option::as_ref)
    }

    /// The arcs which react only once `node` is bound.
    pub fn value_source_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.index[node][NodeEvent::Value]
    }

    /// The arcs which react to changes of the bounds of `node`.
    pub fn range_source_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.index[node][NodeEvent::Range]
    }

    /// The arcs which react to any change of the domain of `node`.
    pub fn domain_source_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.index[node][NodeEvent::Domain]
    }

    /// All arcs which have to react to `event` on `node`, most specific level first: a
    /// [`NodeEvent::Value`] event yields the value arcs, then the range arcs, then the domain arcs.
    pub fn source_arcs(&self, node: NodeId, event: NodeEvent) -> impl Iterator<Item = ArcId> + '_ {
        [NodeEvent::Value, NodeEvent::Range, NodeEvent::Domain]
            .into_iter()
            .filter(move |level| event.implied_events().contains(*level))
            .flat_map(move |level| self.index[node][level].iter().copied())
    }

    /// Propagates `arc`; with a `trigger` the arc may restrict itself to the change of the
    /// triggering node.
    ///
    /// Arcs posted during the propagation are added to the graph afterwards, also when the
    /// propagation failed.
    pub fn propagate_arc(&mut self, arc: ArcId, trigger: Option<Trigger<'_>>) -> PropagationStatus {
        let Some(entry) = self.arcs.get_mut(arc).and_then(Option::as_mut) else {
            trace!("skipping removed {arc}");
            return Ok(());
        };

        let mut posted = std::mem::take(&mut self.posted);
        let trigger_node = trigger.map(|trigger| trigger.node);
        let context = PropagationContext::new(&mut self.store, &mut posted, arc, trigger);
        let result = match trigger_node {
            Some(node) => entry.arc.propagate_from(context, node),
            None => entry.arc.propagate(context),
        };

        for new_arc in posted.drain(..) {
            let _ = self.insert_arc(new_arc);
        }
        self.posted = posted;

        result
    }

    /// Hands every buffered [`GraphEvent`] to `listener`, in the order in which they occurred.
    pub fn dispatch_events<Listener: GraphListener + ?Sized>(&mut self, listener: &mut Listener) {
        let mut events = std::mem::take(&mut self.store.events);
        for event in events.drain(..) {
            match event {
                GraphEvent::ArcAdded(arc) => listener.arc_added(self, arc),
                GraphEvent::ArcRemoved(arc) => listener.arc_removed(self, arc),
                GraphEvent::NodeChanged { node, event } => listener.node_changed(self, node, event),
                GraphEvent::NodeRemoved(node) => listener.node_removed(self, node),
            }
        }
        // The listener only has read access, so no events were buffered in the meantime.
        self.store.events = events;
    }

    pub fn has_pending_events(&self) -> bool {
        !self.store.events.is_empty()
    }

    pub(crate) fn discard_events(&mut self) {
        self.store.events.clear();
    }

    /// Buffers a [`GraphEvent::ArcAdded`] for every live arc, so that a newly installed listener
    /// learns about all of them.
    pub fn announce_arcs(&mut self) {
        self.announce_arcs_from(ArcId::create_from_index(0));
    }

    /// Buffers a [`GraphEvent::ArcAdded`] for every live arc which was added at or after `first`.
    pub fn announce_arcs_from(&mut self, first: ArcId) {
        let arcs: Vec<ArcId> = self.arc_ids().filter(|&arc| arc >= first).collect();
        self.store
            .events
            .extend(arcs.into_iter().map(GraphEvent::ArcAdded));
    }

    /// The id which the next added arc will receive. Ids are handed out in increasing order.
    pub fn next_arc_id(&self) -> ArcId {
        self.arcs.next_key()
    }

    /// Sets the filtering strength and the use of deltas for all current and future arcs.
    pub fn configure_arcs(&mut self, strength: AlgorithmStrength, use_domain_deltas: bool) {
        self.strength = strength;
        self.use_domain_deltas = use_domain_deltas;
        for entry in self.arcs.iter_mut().flatten() {
            entry.arc.set_algorithm_strength(strength);
            entry.arc.set_use_domain_deltas(use_domain_deltas);
        }
    }

    pub fn strength(&self) -> AlgorithmStrength {
        self.strength
    }

    pub fn uses_domain_deltas(&self) -> bool {
        self.use_domain_deltas
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn num_nodes(&self) -> usize {
        self.store.num_nodes()
    }

    pub fn domain(&self, node: NodeId) -> &IntervalDomain {
        self.store.domain(node)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.store.is_attached(node)
    }

    /// Makes the store collect the values removed from each node.
    pub(crate) fn set_record_deltas(&mut self, record_deltas: bool) {
        self.store.set_record_deltas(record_deltas);
    }

    pub(crate) fn take_delta(&mut self, node: NodeId) -> Vec<Interval> {
        self.store.take_delta(node)
    }

    pub(crate) fn clear_deltas(&mut self) {
        self.store.clear_deltas();
    }

    pub fn new_reversible_integer(&mut self, initial_value: i64) -> ReversibleInteger {
        self.store.values.grow(initial_value)
    }

    pub fn read_value(&self, value: ReversibleInteger) -> i64 {
        self.store.read_value(value)
    }

    pub(crate) fn attach_values_to_stack(&mut self, registration: DataSourceRegistration) {
        self.store.values.attach_to_stack(registration);
    }

    pub fn remove_value(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        self.store.remove_value(node, value, None)
    }

    pub fn remove_range(&mut self, node: NodeId, lo: i32, hi: i32) -> PropagationStatus {
        self.store.remove_range(node, lo, hi, None)
    }

    pub fn set_min(&mut self, node: NodeId, min: i32) -> PropagationStatus {
        self.store.set_min(node, min, None)
    }

    pub fn set_max(&mut self, node: NodeId, max: i32) -> PropagationStatus {
        self.store.set_max(node, max, None)
    }

    pub fn bind(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        self.store.bind(node, value, None)
    }
}

impl ArcPoster for NodeArcGraph {
    fn post_arc(&mut self, arc: Box<dyn Arc>) -> Result<(), ConstraintOperationError> {
        self.add_arc(arc).map(|_| ())
    }
}

/// The domains of all nodes, followed by the reversible values.
impl DataSources for NodeArcGraph {
    fn for_each_source(&mut self, action: &mut dyn FnMut(&mut dyn ChoicePointDataSource)) {
        self.store
            .domains_mut()
            .for_each(|domain| action(domain));
        action(&mut self.store.values);
    }
}
