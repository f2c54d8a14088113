// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process step definitions for the dataflow graph.

use crate::collection::PortCollection;
use crate::graph::NodeAny;
use std::any::Any;
use std::fmt::Debug;

/// Display metadata carried by every step.
///
/// None of these fields take part in evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Display name
    pub name: String,
    /// Description shown in the editor
    pub description: String,
    /// Whether the step is collapsed in the UI
    pub collapsed: bool,
    /// Position in the graph UI
    pub position: [f32; 2],
}

impl StepInfo {
    /// Create metadata with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            collapsed: false,
            position: [0.0, 0.0],
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }
}

/// Upcast helper so that `dyn ProcessStep` can be downcast to its concrete type
pub trait AsAny: Any {
    /// Self as [`Any`]
    fn as_any(&self) -> &dyn Any;
    /// Self as mutable [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A node of a [`ProcessGraph`](crate::ProcessGraph).
///
/// A step owns at most one input and at most one output collection. A step
/// without inputs is a source; a step without outputs (or with an empty
/// output collection) is a sink.
pub trait ProcessStep: AsAny + Debug {
    /// Display metadata
    fn info(&self) -> &StepInfo;

    /// Mutable display metadata
    fn info_mut(&mut self) -> &mut StepInfo;

    /// Input ports, if any
    fn inputs(&self) -> Option<&PortCollection> {
        None
    }

    /// Mutable input ports, if any
    fn inputs_mut(&mut self) -> Option<&mut PortCollection> {
        None
    }

    /// Output ports, if any
    fn outputs(&self) -> Option<&PortCollection> {
        None
    }

    /// Mutable output ports, if any
    fn outputs_mut(&mut self) -> Option<&mut PortCollection> {
        None
    }

    /// Read the inputs and populate the outputs
    fn recalculate(&mut self);

    /// User-editable parameters exposed to the property editor
    fn parameters(&self) -> Option<&dyn Any> {
        None
    }

    /// Mutable user-editable parameters
    fn parameters_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }

    /// Whether the outputs already hold values for the current pass.
    ///
    /// Steps without output ports never count as cached.
    fn has_cached_output(&self) -> bool {
        self.outputs()
            .is_some_and(|outputs| !outputs.is_empty() && outputs.all_present())
    }

    /// Whether this step has no output ports
    fn is_sink(&self) -> bool {
        self.outputs().map_or(true, PortCollection::is_empty)
    }

    /// Clear every input and output value
    fn reset(&mut self) {
        if let Some(inputs) = self.inputs_mut() {
            inputs.clear_values();
        }
        if let Some(outputs) = self.outputs_mut() {
            outputs.clear_values();
        }
    }
}

impl NodeAny for Box<dyn ProcessStep> {
    fn node_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn node_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Port, PortType};

    #[derive(Debug)]
    struct Probe {
        info: StepInfo,
        outputs: Option<PortCollection>,
    }

    impl ProcessStep for Probe {
        fn info(&self) -> &StepInfo {
            &self.info
        }

        fn info_mut(&mut self) -> &mut StepInfo {
            &mut self.info
        }

        fn outputs(&self) -> Option<&PortCollection> {
            self.outputs.as_ref()
        }

        fn outputs_mut(&mut self) -> Option<&mut PortCollection> {
            self.outputs.as_mut()
        }

        fn recalculate(&mut self) {
            if let Some(port) = self.outputs.as_mut().and_then(|o| o.get_mut("out")) {
                port.store(1_i32);
            }
        }
    }

    fn probe(outputs: Option<PortCollection>) -> Probe {
        Probe {
            info: StepInfo::new("Probe").with_position(4.0, 2.0),
            outputs,
        }
    }

    #[test]
    fn test_cached_output() {
        let mut step = probe(Some(PortCollection::new(vec![Port::new("out", PortType::Int)])));
        assert!(!step.has_cached_output());
        assert!(!step.is_sink());

        step.recalculate();
        assert!(step.has_cached_output());

        step.reset();
        assert!(!step.has_cached_output());
    }

    #[test]
    fn test_sinks_are_never_cached() {
        let absent = probe(None);
        let empty = probe(Some(PortCollection::default()));
        for step in [absent, empty] {
            assert!(step.is_sink());
            assert!(!step.has_cached_output());
        }
    }

    #[test]
    fn test_downcast_boxed_step() {
        let mut boxed: Box<dyn ProcessStep> = Box::new(probe(None));
        assert!(boxed.node_any().downcast_ref::<Probe>().is_some());
        if let Some(step) = boxed.node_any_mut().downcast_mut::<Probe>() {
            step.info.name = "Renamed".to_string();
        }
        assert_eq!(boxed.info().name, "Renamed");
        assert_eq!(boxed.info().position, [4.0, 2.0]);
    }
}
