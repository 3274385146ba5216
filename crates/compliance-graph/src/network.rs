//! Neighborhood queries over a node/edge set.
//!
//! Edges are treated as undirected here. Both search highlighting and spotlight
//! reduce to the same question: which nodes touch a set of centers, and which
//! edges run among that closed set.

use crate::graph::{GraphEdge, GraphNode};
use compliance_core::{EdgeId, NodeId};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    pub center_nodes: BTreeSet<NodeId>,
    /// One-hop neighbors of any center. May overlap `center_nodes` when two
    /// centers are linked to each other.
    pub connected_nodes: BTreeSet<NodeId>,
    pub relevant_edges: BTreeSet<EdgeId>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.center_nodes.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.center_nodes.contains(id) || self.connected_nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.relevant_edges.contains(id)
    }
}

/// Every node joined to `node_id` by one edge, in either direction.
///
/// Self-loops do not make a node its own neighbor.
pub fn direct_connections(node_id: &NodeId, edges: &[GraphEdge]) -> BTreeSet<NodeId> {
    let mut connected = BTreeSet::new();
    for edge in edges {
        if edge.source == edge.target {
            continue;
        }
        if &edge.source == node_id {
            connected.insert(edge.target.clone());
        } else if &edge.target == node_id {
            connected.insert(edge.source.clone());
        }
    }
    connected
}

/// Centers, their direct neighbors, and the edges whose endpoints both lie in
/// that closed set.
///
/// Center ids absent from `nodes` are ignored. Runs in two linear passes over
/// `edges` regardless of how many centers there are.
pub fn neighborhood<'a, I>(center_ids: I, nodes: &[GraphNode], edges: &[GraphEdge]) -> Neighborhood
where
    I: IntoIterator<Item = &'a NodeId>,
{
    let known: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
    let center_nodes: BTreeSet<NodeId> = center_ids
        .into_iter()
        .filter(|id| known.contains(id))
        .cloned()
        .collect();
    if center_nodes.is_empty() {
        return Neighborhood::default();
    }

    let mut connected_nodes = BTreeSet::new();
    for edge in edges {
        if edge.source == edge.target {
            continue;
        }
        if center_nodes.contains(&edge.source) {
            connected_nodes.insert(edge.target.clone());
        }
        if center_nodes.contains(&edge.target) {
            connected_nodes.insert(edge.source.clone());
        }
    }

    let relevant_edges = edges
        .iter()
        .filter(|edge| {
            let inside = |id: &NodeId| center_nodes.contains(id) || connected_nodes.contains(id);
            inside(&edge.source) && inside(&edge.target)
        })
        .map(|edge| edge.id.clone())
        .collect();

    Neighborhood {
        center_nodes,
        connected_nodes,
        relevant_edges,
    }
}

/// Nodes whose label contains `term`, ignoring case. A blank term matches nothing.
pub fn label_matches(term: &str, nodes: &[GraphNode]) -> Vec<NodeId> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    nodes
        .iter()
        .filter(|node| node.label.to_lowercase().contains(&needle))
        .map(|node| node.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_core::{Document, Entity, EntityId, LinkKind, UseCase};
    use proptest::prelude::*;

    fn doc_node(id: &str, name: &str) -> GraphNode {
        GraphNode::from_entity(Entity::Document(Document {
            id: EntityId::new(id),
            name: name.to_string(),
            ..Default::default()
        }))
    }

    fn uc_node(id: &str, name: &str) -> GraphNode {
        GraphNode::from_entity(Entity::UseCase(UseCase {
            id: EntityId::new(id),
            name: name.to_string(),
            ..Default::default()
        }))
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge::new(LinkKind::DocumentUseCase, source.into(), target.into())
    }

    fn ids(values: &[&str]) -> BTreeSet<NodeId> {
        values.iter().map(|v| NodeId::from(*v)).collect()
    }

    fn sample() -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let nodes = vec![
            doc_node("1", "GDPR"),
            doc_node("2", "AI Act"),
            doc_node("3", "DORA"),
            uc_node("1", "Credit scoring"),
            uc_node("2", "Fraud detection"),
        ];
        let edges = vec![
            edge("doc-1", "uc-1"),
            edge("doc-2", "uc-1"),
            edge("doc-3", "uc-2"),
        ];
        (nodes, edges)
    }

    #[test]
    fn test_direct_connections_ignore_direction() {
        let (_, edges) = sample();
        assert_eq!(
            direct_connections(&"uc-1".into(), &edges),
            ids(&["doc-1", "doc-2"])
        );
        assert_eq!(direct_connections(&"doc-3".into(), &edges), ids(&["uc-2"]));
        assert!(direct_connections(&"uc-9".into(), &edges).is_empty());
    }

    #[test]
    fn test_self_loop_is_not_a_connection() {
        let edges = vec![edge("doc-1", "doc-1"), edge("doc-1", "uc-1")];
        assert_eq!(direct_connections(&"doc-1".into(), &edges), ids(&["uc-1"]));
    }

    #[test]
    fn test_neighborhood_of_single_center() {
        let (nodes, edges) = sample();
        let center = NodeId::from("uc-1");
        let hood = neighborhood([&center], &nodes, &edges);

        assert_eq!(hood.center_nodes, ids(&["uc-1"]));
        assert_eq!(hood.connected_nodes, ids(&["doc-1", "doc-2"]));
        let expected: BTreeSet<EdgeId> = [edges[0].id.clone(), edges[1].id.clone()].into();
        assert_eq!(hood.relevant_edges, expected);
    }

    #[test]
    fn test_linked_centers_appear_as_connected_too() {
        let (nodes, edges) = sample();
        let centers = [NodeId::from("doc-1"), NodeId::from("uc-1")];
        let hood = neighborhood(&centers, &nodes, &edges);

        assert_eq!(hood.connected_nodes, ids(&["doc-1", "doc-2", "uc-1"]));
        assert!(hood.contains_node(&"doc-2".into()));
        assert!(!hood.contains_node(&"doc-3".into()));
    }

    #[test]
    fn test_empty_centers_give_empty_neighborhood() {
        let (nodes, edges) = sample();
        let hood = neighborhood(std::iter::empty::<&NodeId>(), &nodes, &edges);
        assert_eq!(hood, Neighborhood::default());
        assert!(hood.is_empty());
    }

    #[test]
    fn test_unknown_centers_are_ignored() {
        let (nodes, edges) = sample();
        let missing = NodeId::from("risk-1");
        assert!(neighborhood([&missing], &nodes, &edges).is_empty());
    }

    #[test]
    fn test_label_matches_is_case_insensitive() {
        let (nodes, _) = sample();
        assert_eq!(label_matches("SCOR", &nodes), vec![NodeId::from("uc-1")]);
        assert_eq!(label_matches("  act ", &nodes), vec![NodeId::from("doc-2")]);
        assert!(label_matches("   ", &nodes).is_empty());
        assert!(label_matches("", &nodes).is_empty());
    }

    fn edge_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..6, 0u8..6), 0..24)
    }

    proptest! {
        #[test]
        fn prop_relevant_edges_stay_inside_closed_set(
            pairs in edge_strategy(),
            centers in prop::collection::vec(0u8..6, 0..4),
        ) {
            let nodes: Vec<GraphNode> = (0..6)
                .map(|i| doc_node(&i.to_string(), &format!("Node {i}")))
                .collect();
            let edges: Vec<GraphEdge> = pairs
                .iter()
                .map(|(s, t)| edge(&format!("doc-{s}"), &format!("doc-{t}")))
                .collect();
            let center_ids: Vec<NodeId> = centers.iter().map(|c| NodeId(format!("doc-{c}"))).collect();

            let hood = neighborhood(&center_ids, &nodes, &edges);

            for edge in edges.iter().filter(|e| hood.contains_edge(&e.id)) {
                prop_assert!(hood.contains_node(&edge.source));
                prop_assert!(hood.contains_node(&edge.target));
            }
            for id in &hood.connected_nodes {
                let linked = hood
                    .center_nodes
                    .iter()
                    .any(|c| direct_connections(c, &edges).contains(id));
                prop_assert!(linked);
            }
            if center_ids.is_empty() {
                prop_assert_eq!(hood, Neighborhood::default());
            }
        }
    }
}
