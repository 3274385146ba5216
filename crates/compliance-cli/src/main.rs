use anyhow::{Context, Result};
use clap::Parser;
use compliance_app::{GraphViewController, ViewSettings};
use compliance_core::{EntityKind, LinkKind, NodeId};
use compliance_graph::{
    Emphasis, edge_style, emphasized_node_colors, kind_label, link_label, node_colors,
};
use compliance_storage::Storage;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod seed;

/// Build the compliance relationship graph and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "compliance-map", author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database (in-memory when omitted)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// JSON view settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Insert the demo data set before loading
    #[arg(long)]
    seed: bool,

    /// Highlight nodes whose label contains this term, plus their neighbors
    #[arg(long, conflicts_with = "spotlight")]
    search: Option<String>,

    /// Spotlight one node (e.g. `uc-credit-scoring`) and its neighbors
    #[arg(long)]
    spotlight: Option<String>,

    /// Hide a record kind: document, use-case, risk, feature (repeatable)
    #[arg(long = "hide", value_name = "KIND")]
    hide: Vec<EntityKind>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => ViewSettings::load(path)?,
        None => ViewSettings::default(),
    };

    let storage = match &args.db {
        Some(path) => Storage::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?,
        None => Storage::new_in_memory().context("Failed to open in-memory database")?,
    };

    if args.seed {
        let demo = seed::demo_snapshot();
        storage
            .insert_snapshot(&demo)
            .context("Failed to insert demo data")?;
        tracing::info!(
            "Seeded {} records and {} links",
            demo.entity_count(),
            demo.link_count()
        );
    }

    let mut controller = GraphViewController::new(settings);
    controller
        .load(&storage)
        .context("Failed to load the relationship graph")?;

    for kind in &args.hide {
        if controller.view_state().visibility.is_visible(*kind) {
            controller.on_type_toggle(*kind);
        }
    }
    if let Some(term) = &args.search {
        controller.on_search_change(term);
    }
    if let Some(id) = args.spotlight {
        let id = NodeId(id);
        if controller.graph_data().node(&id).is_none() {
            tracing::warn!("Spotlight node {id} is not in the visible graph");
        }
        controller.on_node_select(id);
    }

    let output = render(&controller);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

/// Everything a renderer needs: totals, legends, the published graph, and the
/// resolved colors for each node and edge under the current emphasis.
fn render(controller: &GraphViewController) -> Value {
    let legend: Vec<Value> = EntityKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "kind": kind,
                "label": kind_label(kind),
                "visible": controller.view_state().visibility.is_visible(kind),
                "colors": node_colors(kind),
            })
        })
        .collect();

    let link_legend: Vec<Value> = LinkKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "kind": kind,
                "label": link_label(kind),
                "style": edge_style(Emphasis::Normal),
            })
        })
        .collect();

    let graph = controller.graph_data();
    let node_styles: BTreeMap<&str, Value> = graph
        .nodes
        .iter()
        .map(|node| {
            (
                node.id.as_str(),
                json!(emphasized_node_colors(node.kind, node.emphasis)),
            )
        })
        .collect();
    let edge_styles: BTreeMap<&str, Value> = graph
        .edges
        .iter()
        .map(|edge| {
            (
                edge.id.as_str(),
                json!({
                    "label": link_label(edge.kind),
                    "style": edge_style(edge.emphasis),
                }),
            )
        })
        .collect();

    json!({
        "stats": controller.stats(),
        "legend": legend,
        "linkLegend": link_legend,
        "graph": graph,
        "nodeStyles": node_styles,
        "edgeStyles": edge_styles,
        "neighborhood": controller.neighborhood(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_core::EdgeId;

    fn seeded_controller() -> GraphViewController {
        let storage = Storage::new_in_memory().unwrap();
        storage.insert_snapshot(&seed::demo_snapshot()).unwrap();
        let mut controller = GraphViewController::default();
        controller.load(&storage).unwrap();
        controller
    }

    #[test]
    fn test_render_styles_every_published_edge() {
        let controller = seeded_controller();
        let output = render(&controller);

        let edge_count = controller.graph_data().edge_count();
        assert!(edge_count > 0);
        assert_eq!(output["edgeStyles"].as_object().unwrap().len(), edge_count);
        assert_eq!(
            output["nodeStyles"].as_object().unwrap().len(),
            controller.graph_data().node_count()
        );
        assert_eq!(output["linkLegend"].as_array().unwrap().len(), 3);
        assert_eq!(output["linkLegend"][2]["label"], "mitigated by");
    }

    #[test]
    fn test_render_reflects_spotlight_emphasis() {
        let mut controller = seeded_controller();
        controller.on_node_select(NodeId::from("risk-outage"));
        let output = render(&controller);

        let edge = EdgeId::between(
            &NodeId::from("risk-outage"),
            &NodeId::from("feature-failover"),
        );
        let spotlit = &output["edgeStyles"][edge.as_str()];
        assert_eq!(spotlit["label"], "mitigated by");
        assert_eq!(spotlit["style"]["animated"], true);

        // Obscured nodes keep their hue and carry the faded alpha.
        assert_eq!(output["nodeStyles"]["doc-gdpr"]["fill"], "#dbeafe1a");
        assert_eq!(output["nodeStyles"]["risk-outage"]["fill"], "#fee2e2");
    }
}
