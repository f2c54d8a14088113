// SPDX-License-Identifier: MIT OR Apache-2.0
//! `procflow` demo
//!
//! Builds a small arithmetic graph from the built-in step registry,
//! evaluates it and prints the result through the property drawer bound to
//! the output step's `result` field, the way an editor panel would.

use procflow_graph::steps::{create_arithmetic_registry, InputStep, OutputParameters, OutputStep};
use procflow_graph::{
    ConnectionError, DrawResult, DrawerRegistry, NodeId, ProcessGraph, PropertyDrawer,
};
use std::any::Any;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Read-only drawer that reports the result instead of rendering a widget
#[derive(Default)]
struct ResultLabel;

impl PropertyDrawer for ResultLabel {
    fn draw(&mut self, instance: &mut dyn Any, field: &str) -> DrawResult {
        if let Some(params) = instance.downcast_ref::<OutputParameters>() {
            tracing::info!(field, value = params.result, "result");
        }
        DrawResult::Unchanged
    }
}

/// Errors while assembling the demo graph
#[derive(Debug, thiserror::Error)]
enum BuildError {
    /// Step type missing from the registry
    #[error("Unknown step type: {0}")]
    UnknownStep(String),

    /// Connection rejected by the graph
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Wire `(first + second) + third` into a single output step
fn build(graph: &mut ProcessGraph, values: [f32; 3]) -> Result<NodeId, BuildError> {
    let registry = create_arithmetic_registry();
    let mut spawn = |name: &str| {
        registry
            .generate(name)
            .map(|step| graph.add_boxed(step))
            .ok_or_else(|| BuildError::UnknownStep(name.to_string()))
    };

    let inputs = [spawn("Input")?, spawn("Input")?, spawn("Input")?];
    let inner = spawn("Addition")?;
    let outer = spawn("Addition")?;
    let output = spawn("Output")?;

    for (node_id, value) in inputs.into_iter().zip(values) {
        if let Some(input) = graph.step_as_mut::<InputStep>(node_id) {
            input.parameters.value = value;
        }
    }

    let [first, second, third] = inputs;
    graph.connect(first, "value", inner, "first")?;
    graph.connect(second, "value", inner, "second")?;
    graph.connect(inner, "value", outer, "first")?;
    graph.connect(third, "value", outer, "second")?;
    graph.connect(outer, "value", output, "value")?;
    Ok(output)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("procflow_demo=info,procflow_graph=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut drawers = DrawerRegistry::new();
    drawers.associate::<OutputParameters, ResultLabel>("result");

    let mut graph = ProcessGraph::new();
    let output = match build(&mut graph, [3.0, 4.0, 0.5]) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("Failed to build graph: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let evaluation = graph.recalculate_all();
    tracing::info!(
        steps = graph.step_count(),
        edges = graph.edge_count(),
        computed = evaluation.len(),
        "evaluated graph"
    );

    let Some(step) = graph.step_as_mut::<OutputStep>(output) else {
        tracing::error!("Output step missing after evaluation");
        return ExitCode::FAILURE;
    };
    match drawers.binding::<OutputParameters>("result") {
        Some(binding) => {
            binding.instantiate().draw(&mut step.parameters, "result");
        }
        None => tracing::info!(result = step.result(), "result"),
    }

    ExitCode::SUCCESS
}
