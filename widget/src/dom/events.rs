use std::sync::{Arc, Weak};

use super::node::{Element, NodeInner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
}

pub(super) type Handler = Arc<dyn Fn() + Send + Sync>;

/// Keeps one event listener registered. Dropping it removes the listener.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    node: Weak<NodeInner>,
    id: u64,
}

impl Subscription {
    pub(super) fn new(node: Weak<NodeInner>, id: u64) -> Self {
        Self { node, id }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(node) = self.node.upgrade() {
            Element::remove_listener(&node, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish()
    }
}
