use crate::page::document::NodeId;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Change,
    Click,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change => write!(f, "change"),
            Self::Click => write!(f, "click"),
        }
    }
}

/// Handler bound to a node. Two listeners are the same listener when they are
/// equal, so removal always finds what was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    SelectChange,
    ToggleComments { post_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
}

impl Event {
    pub fn change(target: NodeId) -> Self {
        Self {
            kind: EventKind::Change,
            target,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventListeners {
    table: HashMap<NodeId, Vec<(EventKind, Listener)>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the same listener is already bound for this event.
    pub fn add(&mut self, node: NodeId, kind: EventKind, listener: Listener) -> bool {
        let bound = self.table.entry(node).or_default();
        if bound.iter().any(|(k, l)| *k == kind && *l == listener) {
            return false;
        }
        bound.push((kind, listener));
        true
    }

    pub fn remove(&mut self, node: NodeId, kind: EventKind, listener: &Listener) -> bool {
        let Some(bound) = self.table.get_mut(&node) else {
            return false;
        };
        let before = bound.len();
        bound.retain(|(k, l)| !(*k == kind && l == listener));
        let removed = bound.len() < before;
        if bound.is_empty() {
            self.table.remove(&node);
        }
        removed
    }

    /// Drops every listener bound on `node`.
    pub fn clear(&mut self, node: NodeId) -> usize {
        self.table.remove(&node).map_or(0, |bound| bound.len())
    }

    pub fn get(&self, node: NodeId, kind: EventKind) -> Vec<Listener> {
        self.table
            .get(&node)
            .map(|bound| {
                bound
                    .iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, l)| l.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count(&self, node: NodeId) -> usize {
        self.table.get(&node).map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }
}
