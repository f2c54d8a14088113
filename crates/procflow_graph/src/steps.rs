// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in arithmetic steps.
//!
//! A minimal palette: constant inputs, addition and a result sink. Enough to
//! drive a graph end to end and to seed an editor's node menu.

use crate::collection::PortCollection;
use crate::port::{Port, PortType};
use crate::registry::StepRegistry;
use crate::step::{ProcessStep, StepInfo};
use std::any::Any;

/// Parameters of an [`InputStep`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputParameters {
    /// Value pushed to the `value` output
    pub value: f32,
}

/// Source step that outputs a constant float
#[derive(Debug, Clone)]
pub struct InputStep {
    info: StepInfo,
    outputs: PortCollection,
    /// Editable parameters
    pub parameters: InputParameters,
}

impl InputStep {
    /// Create an input step pushing `value`
    pub fn new(value: f32) -> Self {
        Self {
            info: StepInfo::new("Input").with_description("Constant float value"),
            outputs: PortCollection::new(vec![Port::new("value", PortType::Float)]),
            parameters: InputParameters { value },
        }
    }
}

impl Default for InputStep {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ProcessStep for InputStep {
    fn info(&self) -> &StepInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut StepInfo {
        &mut self.info
    }

    fn outputs(&self) -> Option<&PortCollection> {
        Some(&self.outputs)
    }

    fn outputs_mut(&mut self) -> Option<&mut PortCollection> {
        Some(&mut self.outputs)
    }

    fn parameters(&self) -> Option<&dyn Any> {
        Some(&self.parameters)
    }

    fn parameters_mut(&mut self) -> Option<&mut dyn Any> {
        Some(&mut self.parameters)
    }

    fn recalculate(&mut self) {
        if let Some(port) = self.outputs.get_mut("value") {
            port.store(self.parameters.value);
        }
        tracing::debug!(value = self.parameters.value, "pushing input");
    }
}

/// Adds its `first` and `second` inputs
#[derive(Debug, Clone)]
pub struct AddStep {
    info: StepInfo,
    inputs: PortCollection,
    outputs: PortCollection,
}

impl AddStep {
    /// Create an addition step
    pub fn new() -> Self {
        Self {
            info: StepInfo::new("Addition").with_description("Sum of two floats"),
            inputs: PortCollection::new(vec![
                Port::new("first", PortType::Float),
                Port::new("second", PortType::Float),
            ]),
            outputs: PortCollection::new(vec![Port::new("value", PortType::Float)]),
        }
    }
}

impl Default for AddStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for AddStep {
    fn info(&self) -> &StepInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut StepInfo {
        &mut self.info
    }

    fn inputs(&self) -> Option<&PortCollection> {
        Some(&self.inputs)
    }

    fn inputs_mut(&mut self) -> Option<&mut PortCollection> {
        Some(&mut self.inputs)
    }

    fn outputs(&self) -> Option<&PortCollection> {
        Some(&self.outputs)
    }

    fn outputs_mut(&mut self) -> Option<&mut PortCollection> {
        Some(&mut self.outputs)
    }

    fn recalculate(&mut self) {
        let read = |name: &str| {
            self.inputs
                .get(name)
                .map_or(0.0, Port::fetch_or_default::<f32>)
        };
        let (first, second) = (read("first"), read("second"));

        if let Some(port) = self.outputs.get_mut("value") {
            port.store(first + second);
        }
        tracing::debug!(first, second, "adding");
    }
}

/// Parameters of an [`OutputStep`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputParameters {
    /// Last value received on the `value` input
    pub result: f32,
}

/// Sink step that records the float arriving on its `value` input
#[derive(Debug, Clone)]
pub struct OutputStep {
    info: StepInfo,
    inputs: PortCollection,
    /// Editable parameters
    pub parameters: OutputParameters,
}

impl OutputStep {
    /// Create an output step
    pub fn new() -> Self {
        Self {
            info: StepInfo::new("Output").with_description("Final result"),
            inputs: PortCollection::new(vec![Port::any("value")]),
            parameters: OutputParameters::default(),
        }
    }

    /// The last computed result
    pub fn result(&self) -> f32 {
        self.parameters.result
    }
}

impl Default for OutputStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for OutputStep {
    fn info(&self) -> &StepInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut StepInfo {
        &mut self.info
    }

    fn inputs(&self) -> Option<&PortCollection> {
        Some(&self.inputs)
    }

    fn inputs_mut(&mut self) -> Option<&mut PortCollection> {
        Some(&mut self.inputs)
    }

    fn parameters(&self) -> Option<&dyn Any> {
        Some(&self.parameters)
    }

    fn parameters_mut(&mut self) -> Option<&mut dyn Any> {
        Some(&mut self.parameters)
    }

    fn recalculate(&mut self) {
        self.parameters.result = self
            .inputs
            .get("value")
            .map_or(0.0, Port::fetch_or_default::<f32>);
        tracing::debug!(result = self.parameters.result, "computed result");
    }
}

/// Create the registry of built-in arithmetic steps
pub fn create_arithmetic_registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry.register("Input", || Box::new(InputStep::default()));
    registry.register("Addition", || Box::new(AddStep::new()));
    registry.register("Output", || Box::new(OutputStep::new()));
    registry
}
