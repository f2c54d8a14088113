// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered, name-addressable port collections.

use crate::port::Port;
use std::ops::Index;

/// The input or output ports of one step, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortCollection {
    ports: Vec<Port>,
}

impl PortCollection {
    /// Create a collection from ports
    pub fn new(ports: Vec<Port>) -> Self {
        Self { ports }
    }

    /// Number of ports
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether the collection has no ports
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// First port named `name`
    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    /// First port named `name`, mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.name() == name)
    }

    /// Port at `index`
    pub fn at(&self, index: usize) -> Option<&Port> {
        self.ports.get(index)
    }

    /// Port at `index`, mutably
    pub fn at_mut(&mut self, index: usize) -> Option<&mut Port> {
        self.ports.get_mut(index)
    }

    /// Index of the first port named `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.ports.iter().position(|p| p.name() == name)
    }

    /// All ports in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Port> {
        self.ports.iter()
    }

    /// All ports in insertion order, mutably
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Port> {
        self.ports.iter_mut()
    }

    /// Whether every port holds a value
    pub fn all_present(&self) -> bool {
        self.ports.iter().all(Port::has_value)
    }

    /// Clear the value of every port
    pub fn clear_values(&mut self) {
        for port in &mut self.ports {
            port.clear();
        }
    }
}

impl Index<usize> for PortCollection {
    type Output = Port;

    fn index(&self, index: usize) -> &Port {
        &self.ports[index]
    }
}

impl FromIterator<Port> for PortCollection {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PortCollection {
    type Item = &'a Port;
    type IntoIter = std::slice::Iter<'a, Port>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn sample() -> PortCollection {
        PortCollection::new(vec![
            Port::new("first", PortType::Float),
            Port::new("second", PortType::Float),
            Port::new("first", PortType::Int),
        ])
    }

    #[test]
    fn test_lookup_by_name_returns_first_match() {
        let ports = sample();
        assert_eq!(ports.len(), 3);
        assert_eq!(ports.get("first").map(Port::port_type), Some(PortType::Float));
        assert_eq!(ports.index_of("first"), Some(0));
        assert_eq!(ports.index_of("second"), Some(1));
        assert!(ports.get("third").is_none());
        assert_eq!(ports.index_of("third"), None);
    }

    #[test]
    fn test_lookup_by_index() {
        let ports = sample();
        assert_eq!(ports[2].port_type(), PortType::Int);
        assert_eq!(ports.at(1).map(Port::name), Some("second"));
        assert!(ports.at(3).is_none());
    }

    #[test]
    fn test_enumerate_in_order() {
        let ports = sample();
        let names: Vec<_> = ports.iter().map(Port::name).collect();
        assert_eq!(names, ["first", "second", "first"]);
    }

    #[test]
    fn test_clear_values() {
        let mut ports = sample();
        assert!(!ports.all_present());
        for port in ports.iter_mut() {
            port.store(1.0_f32);
        }
        // The int-typed duplicate rejects the float.
        assert!(!ports.all_present());
        if let Some(port) = ports.get_mut("second") {
            port.clear();
        }
        assert!(!ports[1].has_value());
        ports.clear_values();
        assert!(ports.iter().all(|p| !p.has_value()));
    }

    #[test]
    fn test_empty_collection() {
        let ports: PortCollection = std::iter::empty().collect();
        assert!(ports.is_empty());
        assert!(ports.all_present());
    }
}
