use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Lifecycle of one mounted widget: `Loading` then exactly one terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Loading,
    Success,
    Error(String),
    /// The mount point left the document before the load finished.
    Discarded,
}

impl InstanceState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone)]
pub struct InstanceStatus {
    pub state: InstanceState,
    /// When the mount point was picked up.
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstanceStatus {
    /// Time from pickup to the latest state change.
    pub fn elapsed(&self) -> TimeDelta {
        self.updated_at - self.started_at
    }
}

/// Per-mount status for one initialization call, keyed by the mount node id.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    instances: DashMap<Uuid, InstanceStatus>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` for `mount`. The first call starts the clock.
    pub fn set(&self, mount: Uuid, state: InstanceState) {
        let now = Utc::now();
        self.instances
            .entry(mount)
            .and_modify(|status| {
                status.state = state.clone();
                status.updated_at = now;
            })
            .or_insert_with(|| InstanceStatus {
                state,
                started_at: now,
                updated_at: now,
            });
    }

    pub fn state(&self, mount: Uuid) -> Option<InstanceState> {
        self.instances.get(&mount).map(|s| s.state.clone())
    }

    /// Every instance with its status, oldest pickup first.
    pub fn statuses(&self) -> Vec<(Uuid, InstanceStatus)> {
        let mut all: Vec<_> = self
            .instances
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(_, status)| status.started_at);
        all
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// How many instances are currently in `state`.
    pub fn count(&self, state: &InstanceState) -> usize {
        self.instances
            .iter()
            .filter(|entry| entry.state == *state)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.instances
            .iter()
            .filter(|entry| matches!(entry.state, InstanceState::Error(_)))
            .count()
    }
}
