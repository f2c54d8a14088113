// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while wiring a process graph.

use crate::port::{PortDirection, PortType};

/// Error when creating a connection
///
/// Every variant is raised before the graph is touched, so a failed
/// connection never leaves a partial edge behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// No port mapping was supplied
    #[error("Missing port connection reference")]
    MissingPortReference,

    /// The port mapping names an empty port
    #[error("Missing {0} port name")]
    EmptyPortName(PortDirection),

    /// The start step has no output with this name
    #[error("Start step has no output port named '{0}'")]
    UnknownOutputPort(String),

    /// The end step has no input with this name
    #[error("End step has no input port named '{0}'")]
    UnknownInputPort(String),

    /// The input cannot hold values of the output's declared type
    #[error("Cannot connect output of type {output} to an input accepting {input}")]
    TypeMismatch {
        /// Declared type of the output port
        output: PortType,
        /// Declared type of the input port
        input: PortType,
    },
}
