// SPDX-License-Identifier: MIT OR Apache-2.0
//! Generic directed multigraph over opaque node and edge payloads.
//!
//! Nodes live in an insertion-ordered map keyed by [`NodeId`]. A node's
//! ordinal in that map is its *position*; outgoing edges are stored on the
//! source node's slot as `(target position, payload)` links. Positions never
//! leave this module: removing a node compacts the map and renumbers every
//! remaining link so that each edge keeps pointing at the same node.
//!
//! Incoming-edge queries scan every outgoing list (there is no reverse
//! index). Graphs are expected to be editor-sized, so O(V + E) is fine.

use indexmap::IndexMap;
use std::any::Any;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime type inspection for node payloads.
///
/// Implemented by node types that should be filterable with
/// [`Graph::nodes_of_type`].
pub trait NodeAny {
    /// The concrete node as [`Any`]
    fn node_any(&self) -> &dyn Any;
    /// The concrete node as mutable [`Any`]
    fn node_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug, Clone)]
struct EdgeLink<E> {
    target: usize,
    data: Option<E>,
}

#[derive(Debug, Clone)]
struct NodeSlot<N, E> {
    node: N,
    outgoing: Vec<EdgeLink<E>>,
}

/// A directed multigraph with optional payloads on every edge
#[derive(Debug, Clone)]
pub struct Graph<N, E = ()> {
    nodes: IndexMap<NodeId, NodeSlot<N, E>>,
}

impl<N, E> Graph<N, E> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Remove every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Add a node with no edges
    pub fn add_node(&mut self, node: N) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            NodeSlot {
                node,
                outgoing: Vec::new(),
            },
        );
        id
    }

    /// Remove a node together with every edge into or out of it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<N> {
        let (index, _, slot) = self.nodes.shift_remove_full(&node_id)?;

        // Drop links into the removed node and shift the ones above it down
        let mut dropped = slot.outgoing.len();
        for other in self.nodes.values_mut() {
            let before = other.outgoing.len();
            other.outgoing.retain(|link| link.target != index);
            dropped += before - other.outgoing.len();
            for link in &mut other.outgoing {
                if link.target > index {
                    link.target -= 1;
                }
            }
        }

        tracing::debug!(node = ?node_id, position = index, edges = dropped, "removed node");
        Some(slot.node)
    }

    /// Whether the graph contains `node_id`
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&N> {
        self.nodes.get(&node_id).map(|slot| &slot.node)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(&node_id).map(|slot| &mut slot.node)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().map(|(id, slot)| (*id, &slot.node))
    }

    /// All nodes in insertion order, mutably
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut N)> {
        self.nodes.iter_mut().map(|(id, slot)| (*id, &mut slot.node))
    }

    /// All node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Nodes satisfying `predicate`, in insertion order
    pub fn nodes_where<'a, P>(
        &'a self,
        mut predicate: P,
    ) -> impl Iterator<Item = (NodeId, &'a N)> + 'a
    where
        P: FnMut(&N) -> bool + 'a,
    {
        self.nodes().filter(move |&(_, node)| predicate(node))
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|slot| slot.outgoing.len()).sum()
    }

    /// Every edge as `(start, end, payload)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Option<&E>)> {
        self.nodes.iter().flat_map(move |(start, slot)| {
            slot.outgoing.iter().filter_map(move |link| {
                self.id_at(link.target)
                    .map(|end| (*start, end, link.data.as_ref()))
            })
        })
    }

    /// Nodes reached by the outgoing edges of `node_id`, one entry per edge
    pub fn outgoing_neighbors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing_edges(node_id).map(|(end, _)| end)
    }

    /// Nodes with an edge into `node_id`, one entry per edge
    pub fn incoming_neighbors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming_edges(node_id).map(|(start, _)| start)
    }

    /// Outgoing edges of `node_id` as `(end, payload)`
    pub fn outgoing_edges(&self, node_id: NodeId) -> impl Iterator<Item = (NodeId, Option<&E>)> {
        self.nodes
            .get(&node_id)
            .into_iter()
            .flat_map(|slot| slot.outgoing.iter())
            .filter_map(move |link| self.id_at(link.target).map(|end| (end, link.data.as_ref())))
    }

    /// Incoming edges of `node_id` as `(start, payload)`
    pub fn incoming_edges(&self, node_id: NodeId) -> impl Iterator<Item = (NodeId, Option<&E>)> {
        let index = self.nodes.get_index_of(&node_id);
        self.nodes.iter().flat_map(move |(start, slot)| {
            slot.outgoing
                .iter()
                .filter(move |link| Some(link.target) == index)
                .map(move |link| (*start, link.data.as_ref()))
        })
    }

    /// Add an edge from `start` to `end`.
    ///
    /// Returns `false` without changing anything if either node is unknown.
    /// Parallel edges are allowed.
    pub fn connect(&mut self, start: NodeId, end: NodeId, data: Option<E>) -> bool {
        let Some(target) = self.nodes.get_index_of(&end) else {
            return false;
        };
        let Some(slot) = self.nodes.get_mut(&start) else {
            return false;
        };
        slot.outgoing.push(EdgeLink { target, data });
        true
    }

    /// Remove every edge from `start` to `end`
    pub fn disconnect(&mut self, start: NodeId, end: NodeId) -> bool {
        let Some(target) = self.nodes.get_index_of(&end) else {
            return false;
        };
        let Some(slot) = self.nodes.get_mut(&start) else {
            return false;
        };
        let before = slot.outgoing.len();
        slot.outgoing.retain(|link| link.target != target);
        slot.outgoing.len() < before
    }

    /// Remove every edge for which `matcher(start, end, payload)` holds.
    ///
    /// Returns the number of removed edges.
    pub fn disconnect_all<F>(&mut self, mut matcher: F) -> usize
    where
        F: FnMut(NodeId, NodeId, Option<&E>) -> bool,
    {
        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        let mut removed = 0;
        for (start, slot) in &mut self.nodes {
            let before = slot.outgoing.len();
            slot.outgoing
                .retain(|link| !matcher(*start, ids[link.target], link.data.as_ref()));
            removed += before - slot.outgoing.len();
        }
        if removed > 0 {
            tracing::debug!(edges = removed, "disconnected matching edges");
        }
        removed
    }

    /// Payload of the first edge from `start` to `end`
    pub fn edge_data(&self, start: NodeId, end: NodeId) -> Option<&E> {
        self.all_edge_data(start, end).next().flatten()
    }

    /// Payloads of every edge from `start` to `end`
    pub fn all_edge_data(&self, start: NodeId, end: NodeId) -> impl Iterator<Item = Option<&E>> {
        let target = self.nodes.get_index_of(&end);
        self.nodes
            .get(&start)
            .into_iter()
            .flat_map(|slot| slot.outgoing.iter())
            .filter(move |link| Some(link.target) == target)
            .map(|link| link.data.as_ref())
    }

    fn id_at(&self, position: usize) -> Option<NodeId> {
        self.nodes.get_index(position).map(|(id, _)| *id)
    }
}

impl<N: NodeAny, E> Graph<N, E> {
    /// Nodes whose concrete type is `T`, in insertion order
    pub fn nodes_of_type<T: Any>(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.nodes()
            .filter_map(|(id, node)| node.node_any().downcast_ref::<T>().map(|t| (id, t)))
    }

    /// Get a node by ID if its concrete type is `T`
    pub fn node_of_type<T: Any>(&self, node_id: NodeId) -> Option<&T> {
        self.node(node_id)?.node_any().downcast_ref()
    }

    /// Get a mutable node by ID if its concrete type is `T`
    pub fn node_of_type_mut<T: Any>(&mut self, node_id: NodeId) -> Option<&mut T> {
        self.node_mut(node_id)?.node_any_mut().downcast_mut()
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chain() -> (Graph<&'static str, &'static str>, [NodeId; 3]) {
        let mut graph = Graph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        assert!(graph.connect(a, b, Some("a->b")));
        assert!(graph.connect(b, c, Some("b->c")));
        (graph, [a, b, c])
    }

    #[test]
    fn test_add_and_lookup() {
        let (graph, [a, b, c]) = chain();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node(b), Some(&"b"));
        let order: Vec<_> = graph.node_ids().collect();
        assert_eq!(order, [a, b, c]);
    }

    #[test]
    fn test_neighbors() {
        let (mut graph, [a, b, c]) = chain();
        graph.connect(a, c, None);

        assert_eq!(graph.outgoing_neighbors(a).collect::<Vec<_>>(), [b, c]);
        assert_eq!(graph.incoming_neighbors(c).collect::<Vec<_>>(), [a, b]);
        assert_eq!(graph.incoming_neighbors(a).count(), 0);
        assert_eq!(graph.outgoing_neighbors(c).count(), 0);
    }

    #[test]
    fn test_unknown_node_is_noop() {
        let (mut graph, [a, _, _]) = chain();
        let ghost = NodeId::new();

        assert!(!graph.connect(a, ghost, None));
        assert!(!graph.connect(ghost, a, None));
        assert!(!graph.disconnect(a, ghost));
        assert!(graph.remove_node(ghost).is_none());
        assert_eq!(graph.outgoing_neighbors(ghost).count(), 0);
        assert_eq!(graph.incoming_neighbors(ghost).count(), 0);
        assert_eq!(graph.edge_data(ghost, a), None);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_parallel_edges_and_edge_data() {
        let (mut graph, [a, b, _]) = chain();
        graph.connect(a, b, None);
        graph.connect(a, b, Some("second"));

        assert_eq!(graph.edge_data(a, b), Some(&"a->b"));
        let all: Vec<_> = graph.all_edge_data(a, b).collect();
        assert_eq!(all, [Some(&"a->b"), None, Some(&"second")]);
        assert_eq!(graph.incoming_neighbors(b).count(), 3);

        assert!(graph.disconnect(a, b));
        assert!(!graph.disconnect(a, b));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_disconnect_all() {
        let (mut graph, [a, b, c]) = chain();
        graph.connect(a, c, Some("a->c"));

        let removed = graph.disconnect_all(|_, end, _| end == c);
        assert_eq!(removed, 2);
        assert_eq!(graph.edges().count(), 1);
        assert_eq!(graph.edge_data(a, b), Some(&"a->b"));
    }

    #[test]
    fn test_remove_middle_node_renumbers() {
        let (mut graph, [a, b, c]) = chain();
        let d = graph.add_node("d");
        graph.connect(a, d, Some("a->d"));
        graph.connect(c, d, Some("c->d"));

        assert_eq!(graph.remove_node(b), Some("b"));
        assert!(!graph.contains(b));

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, [(a, d, Some(&"a->d")), (c, d, Some(&"c->d"))]);
        assert_eq!(graph.incoming_neighbors(d).collect::<Vec<_>>(), [a, c]);
    }

    #[test]
    fn test_nodes_where() {
        let (graph, [a, _, c]) = chain();
        let picked: Vec<_> = graph.nodes_where(|n| *n != "b").map(|(id, _)| id).collect();
        assert_eq!(picked, [a, c]);
    }

    #[derive(Debug, PartialEq)]
    struct Circle(u32);

    impl NodeAny for Box<dyn Any> {
        fn node_any(&self) -> &dyn Any {
            &**self
        }

        fn node_any_mut(&mut self) -> &mut dyn Any {
            &mut **self
        }
    }

    #[test]
    fn test_nodes_of_type() {
        let mut graph: Graph<Box<dyn Any>> = Graph::new();
        let first = graph.add_node(Box::new(Circle(1)));
        graph.add_node(Box::new("square"));
        let third = graph.add_node(Box::new(Circle(3)));

        let circles: Vec<_> = graph.nodes_of_type::<Circle>().collect();
        assert_eq!(circles, [(first, &Circle(1)), (third, &Circle(3))]);

        if let Some(circle) = graph.node_of_type_mut::<Circle>(third) {
            circle.0 = 30;
        }
        assert_eq!(graph.node_of_type::<Circle>(third), Some(&Circle(30)));
    }

    proptest! {
        #[test]
        fn test_removal_preserves_surviving_edges(
            node_count in 2..10usize,
            raw_edges in proptest::collection::vec((0..10usize, 0..10usize), 0..30),
            removals in proptest::collection::vec(0..10usize, 1..6),
        ) {
            let mut graph: Graph<usize, usize> = Graph::new();
            let ids: Vec<NodeId> = (0..node_count).map(|i| graph.add_node(i)).collect();

            let mut expected = Vec::new();
            for (tag, (from, to)) in raw_edges.into_iter().enumerate() {
                let (start, end) = (ids[from % node_count], ids[to % node_count]);
                prop_assert!(graph.connect(start, end, Some(tag)));
                expected.push((start, end, tag));
            }

            for pick in removals {
                let victim = ids[pick % node_count];
                graph.remove_node(victim);
                expected.retain(|&(start, end, _)| start != victim && end != victim);

                let mut actual: Vec<_> = graph
                    .edges()
                    .filter_map(|(start, end, tag)| tag.map(|t| (start, end, *t)))
                    .collect();
                actual.sort_by_key(|&(_, _, tag)| tag);
                prop_assert_eq!(&actual, &expected);
            }
        }
    }
}
