use crate::geometry::{HandleRole, compute_handle};
use crate::graph::{GraphEdge, GraphNode, Vec2};
use compliance_core::{EntityKind, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;

pub trait Layouter {
    /// Position of the `index`-th of `count` nodes of `kind`, or `None` when the
    /// slot does not exist (`count == 0` or `index >= count`).
    fn assign_position(&self, index: usize, count: usize, kind: EntityKind) -> Option<Vec2>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialLayoutConfig {
    /// Shared center of all rings
    pub center: Vec2,
    /// Ring radius per kind, innermost (documents) first
    pub ring_radii: [f32; 4],
    /// Extra rotation per ring step, in radians
    pub ring_offset: f32,
}

impl RadialLayoutConfig {
    pub const DEFAULT_CENTER: Vec2 = Vec2 { x: 800.0, y: 600.0 };
    pub const DEFAULT_RING_RADII: [f32; 4] = [200.0, 400.0, 600.0, 800.0];
    pub const DEFAULT_RING_OFFSET: f32 = 0.2;
}

impl Default for RadialLayoutConfig {
    fn default() -> Self {
        Self {
            center: Self::DEFAULT_CENTER,
            ring_radii: Self::DEFAULT_RING_RADII,
            ring_offset: Self::DEFAULT_RING_OFFSET,
        }
    }
}

/// Concentric-ring layout: one ring per entity kind, nodes spread evenly by angle.
///
/// Each ring is rotated a little further than the one inside it so that nodes at
/// the same index of neighbouring rings do not line up radially.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialLayouter {
    pub config: RadialLayoutConfig,
}

impl RadialLayouter {
    pub fn new(config: RadialLayoutConfig) -> Self {
        Self { config }
    }

    pub fn radius(&self, kind: EntityKind) -> f32 {
        self.config.ring_radii[kind.ring_index() - 1]
    }

    pub fn ring_rotation(&self, kind: EntityKind) -> f32 {
        self.config.ring_offset * (kind.ring_index() - 1) as f32
    }
}

impl Layouter for RadialLayouter {
    fn assign_position(&self, index: usize, count: usize, kind: EntityKind) -> Option<Vec2> {
        if count == 0 || index >= count {
            return None;
        }
        let angle = (index as f32 / count as f32) * TAU + self.ring_rotation(kind);
        let radius = self.radius(kind);
        Some(Vec2::new(
            self.config.center.x + radius * angle.cos(),
            self.config.center.y + radius * angle.sin(),
        ))
    }
}

/// Re-derive positions and per-edge handles for a node/edge set.
///
/// Positions are assigned per kind in slice order. Handles depend on both
/// endpoint positions, so they are computed only once every node is placed.
/// Edges whose endpoints are not in `nodes` are dropped.
pub fn apply_layout<L: Layouter + ?Sized>(
    layouter: &L,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut counts: HashMap<EntityKind, usize> = HashMap::new();
    for node in nodes {
        *counts.entry(node.kind).or_default() += 1;
    }

    let mut next_index: HashMap<EntityKind, usize> = HashMap::new();
    let mut laid_out: Vec<GraphNode> = Vec::with_capacity(nodes.len());
    let mut node_slots: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let count = counts.get(&node.kind).copied().unwrap_or(0);
        let index = next_index.entry(node.kind).or_default();
        let position = layouter
            .assign_position(*index, count, node.kind)
            .unwrap_or(node.position);
        *index += 1;

        let mut placed = node.clone();
        placed.position = position;
        placed.dynamic_handles = Vec::new();
        node_slots.insert(placed.id.clone(), laid_out.len());
        laid_out.push(placed);
    }

    let mut routed = Vec::with_capacity(edges.len());
    for edge in edges {
        let (Some(&source_slot), Some(&target_slot)) =
            (node_slots.get(&edge.source), node_slots.get(&edge.target))
        else {
            tracing::debug!("Skipping handles for edge {} with a missing endpoint", edge.id);
            continue;
        };

        let source_pos = laid_out[source_slot].position;
        let target_pos = laid_out[target_slot].position;
        let source_handle = compute_handle(source_pos, target_pos, HandleRole::Source);
        let target_handle = compute_handle(target_pos, source_pos, HandleRole::Target);

        let mut edge = edge.clone();
        edge.source_handle = source_handle.id.clone();
        edge.target_handle = target_handle.id.clone();
        laid_out[source_slot].dynamic_handles.push(source_handle);
        laid_out[target_slot].dynamic_handles.push(target_handle);
        routed.push(edge);
    }

    (laid_out, routed)
}
