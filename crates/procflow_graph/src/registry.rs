// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of step types an editor can instantiate by name.

use crate::step::ProcessStep;
use indexmap::IndexMap;
use std::fmt;

/// Produces fresh nodes of one kind
pub trait NodeGenerator<N> {
    /// Display name of the generated node kind
    fn generator_name(&self) -> &str;
    /// Create a new node
    fn generate(&self) -> N;
}

/// A generator backed by a name and a zero-argument factory
pub struct SimpleNodeGenerator<N> {
    name: String,
    constructor: Box<dyn Fn() -> N>,
}

impl<N> SimpleNodeGenerator<N> {
    /// Create a generator
    pub fn new(name: impl Into<String>, constructor: impl Fn() -> N + 'static) -> Self {
        Self {
            name: name.into(),
            constructor: Box::new(constructor),
        }
    }
}

impl<N> NodeGenerator<N> for SimpleNodeGenerator<N> {
    fn generator_name(&self) -> &str {
        &self.name
    }

    fn generate(&self) -> N {
        (self.constructor)()
    }
}

impl<N> fmt::Debug for SimpleNodeGenerator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNodeGenerator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Boxed generator of process steps
pub type StepGenerator = Box<dyn NodeGenerator<Box<dyn ProcessStep>>>;

/// Registry of available step types, in registration order
#[derive(Default)]
pub struct StepRegistry {
    generators: IndexMap<String, StepGenerator>,
}

impl StepRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step type under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ProcessStep> + 'static,
    {
        self.register_generator(SimpleNodeGenerator::new(name, factory));
    }

    /// Register a generator under its own name, replacing any previous one
    pub fn register_generator<G>(&mut self, generator: G)
    where
        G: NodeGenerator<Box<dyn ProcessStep>> + 'static,
    {
        let name = generator.generator_name().to_string();
        if self.generators.insert(name.clone(), Box::new(generator)).is_some() {
            tracing::debug!(%name, "replaced step generator");
        }
    }

    /// Get a generator by name
    pub fn get(&self, name: &str) -> Option<&dyn NodeGenerator<Box<dyn ProcessStep>>> {
        self.generators.get(name).map(|g| &**g)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Create a step from a registered name
    pub fn generate(&self, name: &str) -> Option<Box<dyn ProcessStep>> {
        self.get(name).map(|g| g.generate())
    }

    /// Number of registered step types
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.generators.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeAny;
    use crate::steps::{AddStep, InputStep};

    struct Seeded(f32);

    impl NodeGenerator<Box<dyn ProcessStep>> for Seeded {
        fn generator_name(&self) -> &str {
            "Seeded Input"
        }

        fn generate(&self) -> Box<dyn ProcessStep> {
            Box::new(InputStep::new(self.0))
        }
    }

    #[test]
    fn test_simple_generator() {
        let generator = SimpleNodeGenerator::new("Answer", || 42);
        assert_eq!(generator.generator_name(), "Answer");
        assert_eq!(generator.generate(), 42);
    }

    #[test]
    fn test_register_and_generate() {
        let mut registry = StepRegistry::new();
        assert!(registry.is_empty());

        registry.register("Addition", || Box::new(AddStep::new()));
        registry.register_generator(Seeded(3.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["Addition", "Seeded Input"]);

        let step = registry.generate("Seeded Input");
        let value = step
            .as_ref()
            .and_then(|s| s.node_any().downcast_ref::<InputStep>())
            .map(|input| input.parameters.value);
        assert_eq!(value, Some(3.0));
        assert!(registry.generate("Missing").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = StepRegistry::new();
        registry.register("Step", || Box::new(AddStep::new()));
        registry.register("Step", || Box::new(InputStep::new(1.0)));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("Step").map(|g| g.generate().info().name.clone()),
            Some("Input".to_string())
        );
    }
}
