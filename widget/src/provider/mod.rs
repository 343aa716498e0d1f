pub mod http;
pub mod model;

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, WidgetError};

pub use http::HttpProvider;
pub use model::{Channel, ChannelKind, Member, PresenceStatus, RemoteSnapshot};

/// Source of server embed snapshots. One call per widget instance.
pub trait SnapshotProvider: Send + Sync + 'static {
    fn fetch(&self, server_id: &str) -> impl Future<Output = Result<RemoteSnapshot>> + Send;
}

/// Serves a fixed snapshot (or a fixed failure status) without touching the
/// network. Used for offline previews and tests.
pub struct StaticProvider {
    outcome: Outcome,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

enum Outcome {
    Snapshot(RemoteSnapshot),
    Status(u16),
}

impl StaticProvider {
    pub fn new(snapshot: RemoteSnapshot) -> Self {
        Self::with_outcome(Outcome::Snapshot(snapshot))
    }

    /// Every fetch fails as if the API answered with this HTTP status.
    pub fn failing(status: u16) -> Self {
        Self::with_outcome(Outcome::Status(status))
    }

    /// Parse a snapshot from raw JSON, e.g. a saved `embed.json`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Server ids requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl SnapshotProvider for StaticProvider {
    async fn fetch(&self, server_id: &str) -> Result<RemoteSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(server_id.to_string());
        match &self.outcome {
            Outcome::Snapshot(snapshot) => Ok(snapshot.clone()),
            Outcome::Status(status) => Err(WidgetError::FetchFailed { status: *status }),
        }
    }
}
