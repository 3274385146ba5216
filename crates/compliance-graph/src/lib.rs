pub mod geometry;
pub mod graph;
pub mod layout;
pub mod network;
pub mod style;
pub mod view;

pub use geometry::{
    AnchorSide, CompassDirection, CssLength, HandleOffset, HandleRole, HandleSpec, compute_handle,
};
pub use graph::{GraphData, GraphEdge, GraphNode, Vec2, build_edges, build_nodes, compute_graph};
pub use layout::{Layouter, RadialLayoutConfig, RadialLayouter, apply_layout};
pub use network::{Neighborhood, direct_connections, label_matches, neighborhood};
pub use style::{
    Color, EdgeStyle, Emphasis, NodeColors, edge_style, emphasized_node_colors, kind_label,
    link_label, node_colors,
};
pub use view::{
    HighlightMode, TypeVisibility, ViewState, derive_view, derive_view_with_neighborhood,
};
