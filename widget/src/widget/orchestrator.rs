use std::sync::Arc;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::collapse::CollapseController;
use super::registry::{InstanceState, WidgetRegistry};
use crate::config::{WidgetConfig, WidgetOptions};
use crate::dom::{Document, Element, Selector};
use crate::engine::shaper::Shaper;
use crate::error::WidgetError;
use crate::provider::{RemoteSnapshot, SnapshotProvider};
use crate::render::stats::{OFFLINE_CLASS, ONLINE_CLASS, presence_label};
use crate::render::{LOADING_TEXT, NO_SERVER_ID, error_fragment, render_widget};

/// Pipelines started by one initialization call.
///
/// Dropping this does not cancel anything; the spawned loads keep running.
pub struct WidgetLoad {
    handles: Vec<JoinHandle<()>>,
    registry: Arc<WidgetRegistry>,
}

impl WidgetLoad {
    fn empty() -> Self {
        Self {
            handles: Vec::new(),
            registry: Arc::new(WidgetRegistry::new()),
        }
    }

    /// Status of every mount point this call picked up.
    pub fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.registry
    }

    /// Number of pipelines that went to the network.
    pub fn pending(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every spawned pipeline to reach a terminal state. A pipeline
    /// whose task died before finishing is recorded as an error.
    pub async fn finished(self) -> Arc<WidgetRegistry> {
        for result in join_all(self.handles).await {
            if let Err(e) = result {
                warn!(error = %e, "widget pipeline task failed");
            }
        }
        for (mount, status) in self.registry.statuses() {
            if !status.state.is_terminal() {
                self.registry.set(mount, InstanceState::Error("pipeline task failed".into()));
            }
        }
        self.registry
    }
}

/// Find every mount point in `document` and start loading a widget into each.
///
/// Must be called from within a tokio runtime. Returns immediately; each
/// instance runs independently and reports failures inline in its own
/// content element. Mount points added later need another call.
pub fn init_widgets<P: SnapshotProvider>(
    document: &Document,
    options: WidgetOptions,
    provider: Arc<P>,
) -> WidgetLoad {
    init_with_config(document, Arc::new(WidgetConfig::resolve(options)), provider)
}

/// [`init_widgets`] with an already resolved configuration.
pub fn init_with_config<P: SnapshotProvider>(
    document: &Document,
    config: Arc<WidgetConfig>,
    provider: Arc<P>,
) -> WidgetLoad {
    let mut load = WidgetLoad::empty();

    let (mount_selector, content_selector) = match (
        Selector::parse(&config.selector),
        Selector::parse(&config.content_selector),
    ) {
        (Ok(mount), Ok(content)) => (mount, content),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "invalid widget selector, nothing to initialize");
            return load;
        }
    };

    let mounts = document.select_all(&mount_selector);
    info!(
        mounts = mounts.len(),
        server_id = %config.server_id,
        "initializing widgets"
    );

    for mount in mounts {
        let Some(content) = mount.select(&content_selector) else {
            debug!(mount = %mount.node_id(), "mount point has no content element, skipping");
            continue;
        };

        load.registry.set(mount.node_id(), InstanceState::Loading);
        content.set_text_content(LOADING_TEXT);

        if config.server_id.is_empty() {
            content.set_inner_html(NO_SERVER_ID);
            load.registry.set(
                mount.node_id(),
                InstanceState::Error(WidgetError::MissingServerId.to_string()),
            );
            continue;
        }

        let instance = Instance {
            document: document.clone(),
            mount,
            content,
            config: config.clone(),
            registry: load.registry.clone(),
        };
        let provider = provider.clone();
        load.handles.push(tokio::spawn(async move { instance.run(&*provider).await }));
    }

    load
}

/// Everything one mount point's pipeline needs; nothing here is shared with
/// other instances except the read-only configuration.
struct Instance {
    document: Document,
    mount: Element,
    content: Element,
    config: Arc<WidgetConfig>,
    registry: Arc<WidgetRegistry>,
}

impl Instance {
    async fn run<P: SnapshotProvider>(self, provider: &P) {
        let result = provider.fetch(&self.config.server_id).await;

        if !self.content.is_connected() {
            debug!(
                mount = %self.mount.node_id(),
                "mount point removed before load finished, discarding"
            );
            self.registry.set(self.mount.node_id(), InstanceState::Discarded);
            return;
        }

        match result {
            Ok(snapshot) => {
                self.render(&snapshot);
                self.registry.set(self.mount.node_id(), InstanceState::Success);
            }
            Err(e) => {
                warn!(server_id = %self.config.server_id, error = %e, "failed to load widget");
                self.content.set_inner_html(&error_fragment(&e.to_string()));
                self.registry.set(self.mount.node_id(), InstanceState::Error(e.to_string()));
            }
        }
    }

    fn render(&self, snapshot: &RemoteSnapshot) {
        let view = Shaper::new(&self.config).shape(snapshot);

        if self.config.show_presence_count_outside {
            self.update_presence_counter(view.presence_count);
        }

        self.content.set_inner_html(&render_widget(&view, &self.config));

        // Last initialization wins: rebinding drops listeners from earlier calls.
        let subscriptions = match CollapseController::attach(&self.mount, &self.config) {
            Some((controller, subscription)) => {
                debug!(
                    mount = %self.mount.node_id(),
                    expanded = controller.is_expanded(),
                    "member list collapse wired"
                );
                vec![subscription]
            }
            None => Vec::new(),
        };
        self.mount.bind_subscriptions(subscriptions);
    }

    fn update_presence_counter(&self, presence_count: u64) {
        let Some(counter) = self
            .document
            .query_selector(&self.config.presence_counter_selector)
        else {
            return;
        };
        counter.set_inner_html(&presence_label(presence_count));
        let online = presence_count > 0;
        counter.toggle_class(ONLINE_CLASS, online);
        counter.toggle_class(OFFLINE_CLASS, !online);
    }
}
