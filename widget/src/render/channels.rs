use std::fmt::Write;

use super::escape::escape_html;
use crate::config::WidgetConfig;
use crate::provider::model::{Channel, ChannelKind};

pub const NO_CHANNELS: &str = r#"<span class="discord-empty">No channels found.</span>"#;

fn channel_icon(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Voice => r#"<span aria-label="voice" title="Voice Channel">🔊</span>"#,
        ChannelKind::Text | ChannelKind::Other => {
            r#"<span aria-label="text" title="Text Channel">#</span>"#
        }
    }
}

/// Channel list section, or nothing when channels are disabled or hidden.
pub fn render_channels(channels: &[Channel], config: &WidgetConfig) -> String {
    if config.hide_all_channels || !config.show_channels {
        return String::new();
    }

    let mut rows = String::new();
    if channels.is_empty() {
        rows.push_str(NO_CHANNELS);
    }
    for ch in channels {
        let name = escape_html(&ch.name);
        let _ = write!(
            rows,
            r#"<div class="discord-channel" title="{name}">{icon}<span class="discord-channel-name">{name}</span></div>"#,
            icon = channel_icon(ch.kind),
        );
    }

    format!(
        r#"<div class="discord-section"><div class="discord-section-title">Channels</div><div class="discord-channels-list">{rows}</div></div>"#
    )
}
