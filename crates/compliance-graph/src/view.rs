//! Pure derivation of the rendered graph from the full graph and the current
//! interaction state.
//!
//! Every call builds fresh collections: filter by kind visibility, annotate the
//! highlight, then lay out what is left.

use crate::graph::{GraphData, GraphEdge, GraphNode};
use crate::layout::{Layouter, apply_layout};
use crate::network::{Neighborhood, label_matches, neighborhood};
use crate::style::Emphasis;
use compliance_core::{EntityKind, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which record kinds are drawn. All kinds are visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeVisibility {
    pub document: bool,
    pub use_case: bool,
    pub risk_indicator: bool,
    pub feature: bool,
}

impl Default for TypeVisibility {
    fn default() -> Self {
        Self {
            document: true,
            use_case: true,
            risk_indicator: true,
            feature: true,
        }
    }
}

impl TypeVisibility {
    fn flag_mut(&mut self, kind: EntityKind) -> &mut bool {
        match kind {
            EntityKind::Document => &mut self.document,
            EntityKind::UseCase => &mut self.use_case,
            EntityKind::RiskIndicator => &mut self.risk_indicator,
            EntityKind::Feature => &mut self.feature,
        }
    }

    pub fn is_visible(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Document => self.document,
            EntityKind::UseCase => self.use_case,
            EntityKind::RiskIndicator => self.risk_indicator,
            EntityKind::Feature => self.feature,
        }
    }

    pub fn set(&mut self, kind: EntityKind, visible: bool) {
        *self.flag_mut(kind) = visible;
    }

    /// Flip one kind and return its new visibility.
    pub fn toggle(&mut self, kind: EntityKind) -> bool {
        let flag = self.flag_mut(kind);
        *flag = !*flag;
        *flag
    }

    pub fn visible_kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.is_visible(*kind))
            .collect()
    }
}

/// The active highlight. Search and spotlight share one slot, so setting one
/// replaces the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum HighlightMode {
    #[default]
    None,
    Search(String),
    Spotlight(NodeId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub visibility: TypeVisibility,
    pub highlight: HighlightMode,
}

impl ViewState {
    pub fn with_visibility(visibility: TypeVisibility) -> Self {
        Self {
            visibility,
            highlight: HighlightMode::None,
        }
    }

    /// Replace the highlight with a search. A blank term clears the highlight
    /// entirely, spotlight included.
    pub fn set_search(&mut self, term: &str) {
        self.highlight = if term.trim().is_empty() {
            HighlightMode::None
        } else {
            HighlightMode::Search(term.to_string())
        };
    }

    pub fn set_spotlight(&mut self, id: NodeId) {
        self.highlight = HighlightMode::Spotlight(id);
    }

    /// Drop a spotlight; an active search is left alone.
    pub fn clear_spotlight(&mut self) {
        if matches!(self.highlight, HighlightMode::Spotlight(_)) {
            self.highlight = HighlightMode::None;
        }
    }

    pub fn search_term(&self) -> &str {
        match &self.highlight {
            HighlightMode::Search(term) => term,
            _ => "",
        }
    }

    pub fn spotlight(&self) -> Option<&NodeId> {
        match &self.highlight {
            HighlightMode::Spotlight(id) => Some(id),
            _ => None,
        }
    }
}

/// The rendered graph for `state`. See [`derive_view_with_neighborhood`].
pub fn derive_view<L: Layouter + ?Sized>(
    full: &GraphData,
    state: &ViewState,
    layouter: &L,
) -> GraphData {
    derive_view_with_neighborhood(full, state, layouter).0
}

/// The rendered graph for `state`, plus the neighborhood behind its highlight
/// when one is active.
///
/// A search whose term is blank counts as no highlight. A search that matches
/// nothing, or a spotlight on a node that is filtered out, still applies its
/// highlight and so fades every node.
pub fn derive_view_with_neighborhood<L: Layouter + ?Sized>(
    full: &GraphData,
    state: &ViewState,
    layouter: &L,
) -> (GraphData, Option<Neighborhood>) {
    let (mut nodes, mut edges) = filter_visible(full, &state.visibility);

    let highlight = match &state.highlight {
        HighlightMode::None => None,
        HighlightMode::Search(term) if term.trim().is_empty() => None,
        HighlightMode::Search(term) => {
            let centers = label_matches(term, &nodes);
            let hood = neighborhood(&centers, &nodes, &edges);
            Some((hood, Emphasis::Highlighted, Emphasis::Dimmed))
        }
        HighlightMode::Spotlight(id) => {
            let hood = neighborhood([id], &nodes, &edges);
            Some((hood, Emphasis::Spotlit, Emphasis::Obscured))
        }
    };

    let hood = match highlight {
        Some((hood, inside, outside)) => {
            for node in &mut nodes {
                node.emphasis = if hood.contains_node(&node.id) { inside } else { outside };
            }
            for edge in &mut edges {
                edge.emphasis = if hood.contains_edge(&edge.id) { inside } else { outside };
            }
            Some(hood)
        }
        None => {
            for node in &mut nodes {
                node.emphasis = Emphasis::Normal;
            }
            for edge in &mut edges {
                edge.emphasis = Emphasis::Normal;
            }
            None
        }
    };

    let (nodes, edges) = apply_layout(layouter, &nodes, &edges);
    tracing::debug!(
        "Derived view with {} of {} nodes and {} of {} edges",
        nodes.len(),
        full.nodes.len(),
        edges.len(),
        full.edges.len()
    );
    (GraphData { nodes, edges }, hood)
}

fn filter_visible(full: &GraphData, visibility: &TypeVisibility) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let nodes: Vec<GraphNode> = full
        .nodes
        .iter()
        .filter(|node| visibility.is_visible(node.kind))
        .cloned()
        .collect();
    let visible: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
    let edges = full
        .edges
        .iter()
        .filter(|edge| visible.contains(&edge.source) && visible.contains(&edge.target))
        .cloned()
        .collect();
    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::compute_graph;
    use crate::layout::RadialLayouter;
    use compliance_core::{Document, EntityId, Link, RecordSnapshot, UseCase};

    fn scenario() -> GraphData {
        let doc = |id: &str, name: &str| Document {
            id: EntityId::new(id),
            name: name.to_string(),
            ..Default::default()
        };
        let uc = |id: &str, name: &str| UseCase {
            id: EntityId::new(id),
            name: name.to_string(),
            ..Default::default()
        };
        let snapshot = RecordSnapshot {
            documents: vec![doc("1", "GDPR"), doc("2", "AI Act"), doc("3", "DORA")],
            use_cases: vec![uc("1", "Credit scoring"), uc("2", "Fraud detection")],
            document_use_case_links: vec![
                Link::new("1", "1"),
                Link::new("2", "1"),
                Link::new("3", "2"),
            ],
            ..Default::default()
        };
        compute_graph(&snapshot, &RadialLayouter::default())
    }

    fn emphasis_of(graph: &GraphData, id: &str) -> Emphasis {
        graph
            .node(&NodeId::from(id))
            .map(|node| node.emphasis)
            .unwrap_or_default()
    }

    #[test]
    fn test_default_state_keeps_everything_normal() {
        let full = scenario();
        let view = derive_view(&full, &ViewState::default(), &RadialLayouter::default());
        assert_eq!(view, full);
    }

    #[test]
    fn test_hiding_documents_drops_their_edges() {
        let full = scenario();
        let mut state = ViewState::default();
        assert!(!state.visibility.toggle(EntityKind::Document));

        let view = derive_view(&full, &state, &RadialLayouter::default());
        let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["uc-1", "uc-2"]);
        assert!(view.edges.is_empty());
        assert!(view.nodes.iter().all(|n| n.dynamic_handles.is_empty()));
    }

    #[test]
    fn test_filtered_nodes_are_relaid_out() {
        let full = scenario();
        let mut state = ViewState::default();
        state.visibility.set(EntityKind::UseCase, false);
        state.visibility.set(EntityKind::Document, true);

        let view = derive_view(&full, &state, &RadialLayouter::default());
        assert_eq!(view.node_count(), 3);
        assert!(view.edges.is_empty());
        // Positions of the remaining ring do not depend on hidden kinds.
        assert_eq!(view.nodes[0].position, full.nodes[0].position);
    }

    #[test]
    fn test_search_highlights_neighborhood_softly() {
        let full = scenario();
        let mut state = ViewState::default();
        state.set_search("scoring");

        let (view, hood) =
            derive_view_with_neighborhood(&full, &state, &RadialLayouter::default());
        let hood = hood.unwrap();
        assert_eq!(hood.center_nodes.len(), 1);
        assert_eq!(hood.relevant_edges.len(), 2);

        assert_eq!(emphasis_of(&view, "uc-1"), Emphasis::Highlighted);
        assert_eq!(emphasis_of(&view, "doc-1"), Emphasis::Highlighted);
        assert_eq!(emphasis_of(&view, "doc-3"), Emphasis::Dimmed);
        assert_eq!(emphasis_of(&view, "uc-2"), Emphasis::Dimmed);
        let dimmed_edges = view
            .edges
            .iter()
            .filter(|e| e.emphasis == Emphasis::Dimmed)
            .count();
        assert_eq!(dimmed_edges, 1);
    }

    #[test]
    fn test_spotlight_obscures_everything_else() {
        let full = scenario();
        let mut state = ViewState::default();
        state.set_spotlight(NodeId::from("doc-3"));

        let view = derive_view(&full, &state, &RadialLayouter::default());
        assert_eq!(emphasis_of(&view, "doc-3"), Emphasis::Spotlit);
        assert_eq!(emphasis_of(&view, "uc-2"), Emphasis::Spotlit);
        assert_eq!(emphasis_of(&view, "uc-1"), Emphasis::Obscured);
        assert_eq!(emphasis_of(&view, "doc-1"), Emphasis::Obscured);
    }

    #[test]
    fn test_search_without_matches_dims_all() {
        let full = scenario();
        let mut state = ViewState::default();
        state.set_search("nothing like this");

        let view = derive_view(&full, &state, &RadialLayouter::default());
        assert!(view.nodes.iter().all(|n| n.emphasis == Emphasis::Dimmed));
    }

    #[test]
    fn test_blank_search_is_no_highlight() {
        let full = scenario();
        let mut state = ViewState::default();
        state.set_search("   ");

        assert_eq!(state.highlight, HighlightMode::None);
        assert_eq!(state.search_term(), "");

        let (view, hood) =
            derive_view_with_neighborhood(&full, &state, &RadialLayouter::default());
        assert!(hood.is_none());
        assert!(view.nodes.iter().all(|n| n.emphasis == Emphasis::Normal));
    }

    #[test]
    fn test_blank_search_clears_spotlight() {
        let mut state = ViewState::default();
        state.set_spotlight(NodeId::from("uc-1"));
        state.set_search(" \t ");
        assert_eq!(state.highlight, HighlightMode::None);
        assert_eq!(state.spotlight(), None);
    }

    #[test]
    fn test_highlight_modes_replace_each_other() {
        let mut state = ViewState::default();
        state.set_search("gdpr");
        state.set_spotlight(NodeId::from("uc-1"));
        assert_eq!(state.search_term(), "");
        assert_eq!(state.spotlight(), Some(&NodeId::from("uc-1")));

        state.set_search("act");
        assert_eq!(state.spotlight(), None);
        assert_eq!(state.search_term(), "act");

        state.clear_spotlight();
        assert_eq!(state.search_term(), "act");

        state.set_spotlight(NodeId::from("doc-1"));
        state.clear_spotlight();
        assert_eq!(state.highlight, HighlightMode::None);
    }

    #[test]
    fn test_visibility_deserializes_partially() {
        let visibility: TypeVisibility = serde_json::from_str(r#"{"feature": false}"#).unwrap();
        assert!(visibility.document);
        assert!(!visibility.feature);
        assert_eq!(
            visibility.visible_kinds(),
            vec![EntityKind::Document, EntityKind::UseCase, EntityKind::RiskIndicator]
        );
    }
}
