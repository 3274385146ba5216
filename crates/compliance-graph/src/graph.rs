use crate::geometry::HandleSpec;
use crate::layout::{Layouter, apply_layout};
use crate::style::Emphasis;
use compliance_core::{
    EdgeId, Entity, EntityKind, GraphStats, LinkKind, NodeId, RecordSnapshot,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub position: Vec2,
    pub payload: Entity,
    pub label: String,
    /// One handle per incident edge, in edge order.
    pub dynamic_handles: Vec<HandleSpec>,
    pub emphasis: Emphasis,
}

impl GraphNode {
    pub fn from_entity(entity: Entity) -> Self {
        Self {
            id: entity.node_id(),
            kind: entity.kind(),
            position: Vec2::default(),
            label: entity.name().to_string(),
            payload: entity,
            dynamic_handles: Vec::new(),
            emphasis: Emphasis::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: EdgeId,
    pub kind: LinkKind,
    pub source: NodeId,
    pub target: NodeId,
    /// Empty until a layout pass has aimed the endpoints.
    pub source_handle: String,
    pub target_handle: String,
    pub emphasis: Emphasis,
}

impl GraphEdge {
    pub fn new(kind: LinkKind, source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::between(&source, &target),
            kind,
            source,
            target,
            source_handle: String::new(),
            target_handle: String::new(),
            emphasis: Emphasis::Normal,
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            entity_count: self.nodes.len(),
            connection_count: self.edges.len(),
        }
    }
}

/// One node per entity, in fetch order: documents, use cases, risks, features.
///
/// Records with a blank id are skipped; a repeated id keeps its first record.
pub fn build_nodes(snapshot: &RecordSnapshot) -> Vec<GraphNode> {
    let entities = snapshot
        .documents
        .iter()
        .cloned()
        .map(Entity::Document)
        .chain(snapshot.use_cases.iter().cloned().map(Entity::UseCase))
        .chain(
            snapshot
                .risk_indicators
                .iter()
                .cloned()
                .map(Entity::RiskIndicator),
        )
        .chain(snapshot.features.iter().cloned().map(Entity::Feature));

    let mut seen = HashSet::with_capacity(snapshot.entity_count());
    let mut nodes = Vec::with_capacity(snapshot.entity_count());
    for entity in entities {
        if !entity.id().is_valid() {
            tracing::debug!("Skipping {} record with a blank id", entity.kind());
            continue;
        }
        let node = GraphNode::from_entity(entity);
        if !seen.insert(node.id.clone()) {
            tracing::debug!("Skipping duplicate record for node {}", node.id);
            continue;
        }
        nodes.push(node);
    }
    nodes
}

/// One edge per link row whose endpoints both exist in `nodes`.
///
/// Dangling links are dropped, never patched with placeholder nodes. Repeated
/// rows for the same endpoint pair collapse into one edge.
pub fn build_edges(snapshot: &RecordSnapshot, nodes: &[GraphNode]) -> Vec<GraphEdge> {
    let node_ids: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut edges = Vec::with_capacity(snapshot.link_count());

    for kind in LinkKind::ALL {
        let (from_kind, to_kind) = kind.endpoints();
        for link in snapshot.links(kind) {
            if !link.is_valid() {
                tracing::debug!("Skipping {} link with a blank id", kind);
                continue;
            }
            let source = NodeId::for_entity(from_kind, &link.from_id);
            let target = NodeId::for_entity(to_kind, &link.to_id);

            if !node_ids.contains(&source) {
                tracing::warn!(
                    "Dropping {} link because source node {} is missing from the graph",
                    kind,
                    source
                );
                continue;
            }
            if !node_ids.contains(&target) {
                tracing::warn!(
                    "Dropping {} link because target node {} is missing from the graph",
                    kind,
                    target
                );
                continue;
            }

            if !seen.insert((source.clone(), target.clone())) {
                tracing::debug!("Skipping repeated {} link {} -> {}", kind, source, target);
                continue;
            }
            edges.push(GraphEdge::new(kind, source, target));
        }
    }
    edges
}

/// Build the full graph for a snapshot: nodes, edges, positions and handles.
pub fn compute_graph<L: Layouter + ?Sized>(snapshot: &RecordSnapshot, layouter: &L) -> GraphData {
    let nodes = build_nodes(snapshot);
    let edges = build_edges(snapshot, &nodes);
    let (nodes, edges) = apply_layout(layouter, &nodes, &edges);
    tracing::debug!(
        "Built graph with {} nodes and {} edges",
        nodes.len(),
        edges.len()
    );
    GraphData { nodes, edges }
}
