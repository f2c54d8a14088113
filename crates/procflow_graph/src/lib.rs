// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed dataflow graph for `procflow`.
//!
//! Steps expose named, typed input and output ports. Edges map one output
//! port to one input port and are type-checked when they are made. A graph
//! is evaluated on demand: asking for a step computes everything it depends
//! on first, and each step runs at most once per pass.
//!
//! ## Architecture
//!
//! - [`Graph`]: generic directed multigraph with opaque node/edge payloads
//! - [`Port`] and [`PortCollection`]: typed value cells owned by a step
//! - [`ProcessGraph`]: steps wired port to port, connection validation and
//!   the recompute engine
//! - [`StepRegistry`] and [`DrawerRegistry`]: UI-free tables an editor layer
//!   builds its node palette and property panel on
//!
//! ```
//! use procflow_graph::steps::{AddStep, InputStep};
//! use procflow_graph::ProcessGraph;
//!
//! let mut graph = ProcessGraph::new();
//! let a = graph.add_step(InputStep::new(3.0));
//! let b = graph.add_step(InputStep::new(4.0));
//! let add = graph.add_step(AddStep::new());
//! graph.connect(a, "value", add, "first").unwrap();
//! graph.connect(b, "value", add, "second").unwrap();
//!
//! graph.recalculate(add);
//! let sum = graph
//!     .step(add)
//!     .and_then(|step| step.outputs())
//!     .and_then(|outputs| outputs.get("value"))
//!     .and_then(|port| port.fetch_as::<f32>());
//! assert_eq!(sum, Some(7.0));
//! ```

pub mod collection;
pub mod drawer;
pub mod error;
pub mod graph;
pub mod port;
pub mod process;
pub mod registry;
pub mod step;
pub mod steps;

pub use collection::PortCollection;
pub use drawer::{DrawResult, DrawerBinding, DrawerRegistry, PropertyDrawer};
pub use error::ConnectionError;
pub use graph::{Graph, NodeAny, NodeId};
pub use port::{FromPortValue, Port, PortDirection, PortType, PortValue};
pub use process::{Evaluation, PortLink, ProcessGraph};
pub use registry::{NodeGenerator, SimpleNodeGenerator, StepRegistry};
pub use step::{AsAny, ProcessStep, StepInfo};
