use compliance_core::{EntityKind, GraphStats, NodeId, RecordSnapshot};
use compliance_events::{Event, EventBus, EventListener};
use compliance_graph::{
    GraphData, Neighborhood, RadialLayouter, ViewState, compute_graph,
    derive_view_with_neighborhood,
};
use compliance_storage::{RecordStore, StorageError};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

mod fetch;
mod settings;

pub use fetch::fetch_snapshot;
pub use settings::ViewSettings;

/// A list query that failed while loading the graph.
#[derive(Error, Debug)]
#[error("{query} failed: {source}")]
pub struct LoadError {
    pub query: &'static str,
    #[source]
    pub source: StorageError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Error(String),
    Ready,
}

struct LoadOutcome {
    generation: u64,
    result: Result<RecordSnapshot, LoadError>,
}

/// Owns the graph view: the full graph built from the last load, the
/// interaction state, and the derived graph handed to the renderer.
///
/// Every interaction re-derives the published graph from the full graph.
/// Interactions that arrive before the first successful load only update the
/// interaction state; they publish nothing until the graph is ready.
pub struct GraphViewController {
    settings: ViewSettings,
    layouter: RadialLayouter,
    phase: ViewPhase,
    full: GraphData,
    published: GraphData,
    neighborhood: Option<Neighborhood>,
    view_state: ViewState,
    generation: u64,
    results_tx: Sender<LoadOutcome>,
    results_rx: Receiver<LoadOutcome>,
    events: Option<EventBus>,
}

impl Default for GraphViewController {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

impl GraphViewController {
    pub fn new(settings: ViewSettings) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            layouter: RadialLayouter::new(settings.layout),
            view_state: ViewState::with_visibility(settings.initial_visibility),
            settings,
            phase: ViewPhase::Loading,
            full: GraphData::default(),
            published: GraphData::default(),
            neighborhood: None,
            generation: 0,
            results_tx,
            results_rx,
            events: None,
        }
    }

    /// Report load results and published graphs on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    /// Fetch everything from `store` on the calling thread (the queries
    /// themselves run in parallel) and rebuild the graph.
    ///
    /// Supersedes any background load still in flight.
    pub fn load(&mut self, store: &dyn RecordStore) -> Result<(), LoadError> {
        self.generation += 1;
        self.phase = ViewPhase::Loading;
        let result = fetch_snapshot(store);
        self.apply_load(result)
    }

    /// Start a load on a background thread. Call [`poll`](Self::poll) to apply
    /// the result once it arrives.
    pub fn spawn_load(&mut self, store: Arc<dyn RecordStore>) -> JoinHandle<()> {
        self.generation += 1;
        self.phase = ViewPhase::Loading;
        let generation = self.generation;
        let tx = self.results_tx.clone();
        std::thread::spawn(move || {
            let result = fetch_snapshot(store.as_ref());
            let _ = tx.send(LoadOutcome { generation, result });
        })
    }

    /// Apply any finished background load. Returns whether the phase changed.
    ///
    /// Results from superseded loads, or that arrive after
    /// [`teardown`](Self::teardown), are dropped.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(outcome) = self.results_rx.try_recv() {
            if outcome.generation != self.generation {
                tracing::debug!(
                    "Discarding load result from generation {} (current {})",
                    outcome.generation,
                    self.generation
                );
                continue;
            }
            if let Err(err) = self.apply_load(outcome.result) {
                tracing::debug!("Background load for {} ended in error", err.query);
            }
            applied = true;
        }
        applied
    }

    /// Detach from any load still in flight.
    pub fn teardown(&mut self) {
        self.generation += 1;
        tracing::debug!("Graph view torn down at generation {}", self.generation);
    }

    fn apply_load(&mut self, result: Result<RecordSnapshot, LoadError>) -> Result<(), LoadError> {
        match result {
            Ok(snapshot) => {
                self.full = compute_graph(&snapshot, &self.layouter);
                self.phase = ViewPhase::Ready;
                let stats = self.full.stats();
                tracing::info!(
                    "Graph loaded: {} entities, {} connections",
                    stats.entity_count,
                    stats.connection_count
                );
                self.emit(Event::DataLoaded {
                    entity_count: stats.entity_count,
                    connection_count: stats.connection_count,
                });
                self.recompute();
                Ok(())
            }
            Err(err) => {
                tracing::error!("Graph load failed: {err}");
                self.full = GraphData::default();
                self.published = GraphData::default();
                self.neighborhood = None;
                self.phase = ViewPhase::Error(err.to_string());
                self.emit(Event::LoadFailed {
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn recompute(&mut self) {
        if self.phase != ViewPhase::Ready {
            return;
        }
        let (graph, neighborhood) =
            derive_view_with_neighborhood(&self.full, &self.view_state, &self.layouter);
        self.published = graph;
        self.neighborhood = neighborhood;
        self.emit(Event::GraphPublished {
            node_count: self.published.node_count(),
            edge_count: self.published.edge_count(),
        });
    }

    // ========================================================================
    // Event sinks
    // ========================================================================

    pub fn on_type_toggle(&mut self, kind: EntityKind) {
        let visible = self.view_state.visibility.toggle(kind);
        tracing::debug!("{kind} visibility set to {visible}");
        self.recompute();
    }

    /// Replaces any spotlight with a search for `term`.
    pub fn on_search_change(&mut self, term: &str) {
        self.view_state.set_search(term);
        self.recompute();
    }

    /// Spotlights `id`, clearing any search.
    pub fn on_node_select(&mut self, id: NodeId) {
        self.view_state.set_spotlight(id);
        self.recompute();
    }

    /// Clears the spotlight; a search stays active.
    pub fn on_canvas_clear(&mut self) {
        self.view_state.clear_spotlight();
        self.recompute();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == ViewPhase::Ready
    }

    /// The filtered, laid-out, highlight-annotated graph.
    pub fn graph_data(&self) -> &GraphData {
        &self.published
    }

    /// Totals over the full graph, regardless of filters.
    pub fn stats(&self) -> GraphStats {
        self.full.stats()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn search_term(&self) -> &str {
        self.view_state.search_term()
    }

    pub fn spotlight(&self) -> Option<&NodeId> {
        self.view_state.spotlight()
    }

    /// The neighborhood behind the current highlight, if one is active.
    pub fn neighborhood(&self) -> Option<&Neighborhood> {
        self.neighborhood.as_ref()
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }
}

impl EventListener for GraphViewController {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::TypeToggled { kind } => self.on_type_toggle(*kind),
            Event::SearchChanged { term } => self.on_search_change(term),
            Event::NodeSelected { id } => self.on_node_select(id.clone()),
            Event::CanvasCleared => self.on_canvas_clear(),
            Event::DataLoaded { .. } | Event::LoadFailed { .. } | Event::GraphPublished { .. } => {}
        }
    }
}
