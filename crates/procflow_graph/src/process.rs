// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataflow graph of process steps and its recompute engine.
//!
//! Edges carry a [`PortLink`] naming the source output and destination
//! input. Evaluation is demand driven: a step is computed only when
//! something downstream asks for it, after its predecessors. The presence
//! of values in a step's output ports is the cache for the current pass;
//! every pass starts by clearing all ports.
//!
//! Cycles are not detected. Connecting steps into a cycle and then
//! evaluating recurses without bound; keeping the graph acyclic is the
//! caller's job.

use crate::error::ConnectionError;
use crate::graph::{Graph, NodeId};
use crate::port::PortDirection;
use crate::step::ProcessStep;
use std::any::Any;

/// Output → input mapping carried by every process graph edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortLink {
    /// Output port name on the start step
    pub from_port: String,
    /// Input port name on the end step
    pub to_port: String,
}

impl PortLink {
    /// Create a link
    pub fn new(from_port: impl Into<String>, to_port: impl Into<String>) -> Self {
        Self {
            from_port: from_port.into(),
            to_port: to_port.into(),
        }
    }
}

/// Steps computed during one evaluation pass, in computation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    order: Vec<NodeId>,
}

impl Evaluation {
    /// Computation order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// How many times `node_id` was computed
    pub fn count(&self, node_id: NodeId) -> usize {
        self.order.iter().filter(|id| **id == node_id).count()
    }

    /// Whether `node_id` was computed
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.order.contains(&node_id)
    }

    /// Number of computations
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was computed
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A graph of process steps wired port to port
#[derive(Debug, Default)]
pub struct ProcessGraph {
    graph: Graph<Box<dyn ProcessStep>, PortLink>,
}

impl ProcessGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying adjacency store
    pub fn graph(&self) -> &Graph<Box<dyn ProcessStep>, PortLink> {
        &self.graph
    }

    /// Add a step
    pub fn add_step(&mut self, step: impl ProcessStep) -> NodeId {
        self.add_boxed(Box::new(step))
    }

    /// Add an already boxed step, such as one produced by a registry
    pub fn add_boxed(&mut self, step: Box<dyn ProcessStep>) -> NodeId {
        self.graph.add_node(step)
    }

    /// Remove a step and every edge touching it
    pub fn remove_step(&mut self, node_id: NodeId) -> Option<Box<dyn ProcessStep>> {
        self.graph.remove_node(node_id)
    }

    /// Get a step by ID
    pub fn step(&self, node_id: NodeId) -> Option<&(dyn ProcessStep + 'static)> {
        self.graph.node(node_id).map(|step| &**step)
    }

    /// Get a mutable step by ID
    pub fn step_mut(&mut self, node_id: NodeId) -> Option<&mut (dyn ProcessStep + 'static)> {
        self.graph.node_mut(node_id).map(|step| &mut **step)
    }

    /// Get a step by ID if its concrete type is `T`
    pub fn step_as<T: ProcessStep>(&self, node_id: NodeId) -> Option<&T> {
        self.graph.node_of_type(node_id)
    }

    /// Get a mutable step by ID if its concrete type is `T`
    pub fn step_as_mut<T: ProcessStep>(&mut self, node_id: NodeId) -> Option<&mut T> {
        self.graph.node_of_type_mut(node_id)
    }

    /// All steps in insertion order
    pub fn steps(&self) -> impl Iterator<Item = (NodeId, &(dyn ProcessStep + 'static))> {
        self.graph.nodes().map(|(id, step)| (id, &**step))
    }

    /// Steps whose concrete type is `T`
    pub fn steps_of_type<T: ProcessStep>(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.graph.nodes_of_type::<T>()
    }

    /// Sink steps: no output collection, or an empty one
    pub fn outputs(&self) -> impl Iterator<Item = (NodeId, &(dyn ProcessStep + 'static))> {
        self.steps().filter(|(_, step)| step.is_sink())
    }

    /// Sink steps whose concrete type is `T`
    pub fn outputs_of_type<T: ProcessStep>(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.steps_of_type::<T>().filter(|(_, step)| step.is_sink())
    }

    /// Get the number of steps
    pub fn step_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connect output `output` of `start` to input `input` of `end`.
    ///
    /// See [`ProcessGraph::connect_link`].
    pub fn connect(
        &mut self,
        start: NodeId,
        output: &str,
        end: NodeId,
        input: &str,
    ) -> Result<bool, ConnectionError> {
        self.connect_link(start, end, Some(PortLink::new(output, input)))
    }

    /// Add an edge carrying `link` from `start` to `end`.
    ///
    /// The link is validated before anything changes. On success any edge
    /// already feeding the same input of `end` is removed, so every input
    /// has a single producer. Returns `Ok(false)` if either step is not in
    /// the graph.
    pub fn connect_link(
        &mut self,
        start: NodeId,
        end: NodeId,
        link: Option<PortLink>,
    ) -> Result<bool, ConnectionError> {
        let link = link.ok_or(ConnectionError::MissingPortReference)?;
        if link.from_port.is_empty() {
            return Err(ConnectionError::EmptyPortName(PortDirection::Output));
        }
        if link.to_port.is_empty() {
            return Err(ConnectionError::EmptyPortName(PortDirection::Input));
        }

        let (Some(source), Some(target)) = (self.graph.node(start), self.graph.node(end)) else {
            return Ok(false);
        };
        let output = source
            .outputs()
            .and_then(|ports| ports.get(&link.from_port))
            .ok_or_else(|| ConnectionError::UnknownOutputPort(link.from_port.clone()))?;
        let input = target
            .inputs()
            .and_then(|ports| ports.get(&link.to_port))
            .ok_or_else(|| ConnectionError::UnknownInputPort(link.to_port.clone()))?;
        if !input.can_store(&output.port_type()) {
            return Err(ConnectionError::TypeMismatch {
                output: output.port_type(),
                input: input.port_type(),
            });
        }

        let superseded = self.graph.disconnect_all(|_, link_end, existing| {
            link_end == end && existing.is_some_and(|e| e.to_port == link.to_port)
        });
        if superseded > 0 {
            tracing::debug!(
                node = ?end,
                input = %link.to_port,
                superseded,
                "replaced existing connection"
            );
        }

        Ok(self.graph.connect(start, end, Some(link)))
    }

    /// Remove every edge from `start` to `end`
    pub fn disconnect(&mut self, start: NodeId, end: NodeId) -> bool {
        self.graph.disconnect(start, end)
    }

    /// Clear every port of every step
    pub fn reset_all(&mut self) {
        for (_, step) in self.graph.nodes_mut() {
            step.reset();
        }
    }

    /// Recompute `node_id` and everything it depends on
    pub fn recalculate(&mut self, node_id: NodeId) -> Evaluation {
        self.reset_all();
        let mut evaluation = Evaluation::default();
        self.ensure_computed(node_id, &mut evaluation);
        evaluation
    }

    /// Recompute the whole graph by pulling on every sink
    pub fn recalculate_all(&mut self) -> Evaluation {
        self.reset_all();
        let sinks: Vec<NodeId> = self.outputs().map(|(id, _)| id).collect();
        let mut evaluation = Evaluation::default();
        for sink in sinks {
            self.ensure_computed(sink, &mut evaluation);
        }
        tracing::debug!(computed = evaluation.len(), "recalculated graph");
        evaluation
    }

    fn ensure_computed(&mut self, node_id: NodeId, evaluation: &mut Evaluation) {
        let Some(step) = self.graph.node(node_id) else {
            return;
        };
        if step.has_cached_output() {
            return;
        }

        let incoming: Vec<(NodeId, PortLink)> = self
            .graph
            .incoming_edges(node_id)
            .filter_map(|(start, link)| link.map(|link| (start, link.clone())))
            .collect();

        for (start, _) in &incoming {
            self.ensure_computed(*start, evaluation);
        }

        for (start, link) in &incoming {
            let value = self
                .graph
                .node(*start)
                .and_then(|source| source.outputs())
                .and_then(|ports| ports.get(&link.from_port))
                .and_then(|port| port.fetch())
                .cloned();
            let Some(value) = value else {
                continue;
            };
            if let Some(port) = self
                .graph
                .node_mut(node_id)
                .and_then(|target| target.inputs_mut())
                .and_then(|ports| ports.get_mut(&link.to_port))
            {
                port.store(value);
            }
        }

        if let Some(step) = self.graph.node_mut(node_id) {
            tracing::trace!(node = ?node_id, name = %step.info().name, "computing step");
            step.recalculate();
            evaluation.order.push(node_id);
        }
    }

    /// Parameters of the step `node_id`, for property editors
    pub fn parameters(&self, node_id: NodeId) -> Option<&dyn Any> {
        self.step(node_id)?.parameters()
    }
}
