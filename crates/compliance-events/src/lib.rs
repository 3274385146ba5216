use compliance_core::{EntityKind, NodeId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Interaction
    TypeToggled {
        kind: EntityKind,
    },
    SearchChanged {
        term: String,
    },
    NodeSelected {
        id: NodeId,
    },
    CanvasCleared,

    // Data
    DataLoaded {
        entity_count: usize,
        connection_count: usize,
    },
    LoadFailed {
        error: String,
    },

    // Rendering
    GraphPublished {
        node_count: usize,
        edge_count: usize,
    },
}

impl Event {
    /// Events raised by the user, as opposed to ones the controller reports.
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            Event::TypeToggled { .. }
                | Event::SearchChanged { .. }
                | Event::NodeSelected { .. }
                | Event::CanvasCleared
        )
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Drain every pending event into `listener`, in publish order.
    pub fn dispatch_to<L: EventListener + ?Sized>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
