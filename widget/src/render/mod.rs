//! Markup assembly. Every function here is a pure function of shaped data and
//! configuration; untrusted text goes through [`escape::escape_html`].

pub mod channels;
pub mod escape;
pub mod invite;
pub mod members;
pub mod stats;

use crate::config::WidgetConfig;
use crate::engine::shaper::ShapedView;

pub use escape::escape_html;

pub const LOADING_TEXT: &str = "Loading server info...";

pub const NO_SERVER_ID: &str = r#"<div class="discord-error">No server ID provided.</div>"#;

/// Inline error shown in place of the widget body.
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class="discord-error">Could not load server info.<br>{}</div>"#,
        escape_html(message)
    )
}

/// Full widget body: channels, members, stats, invite, in that order.
pub fn render_widget(view: &ShapedView, config: &WidgetConfig) -> String {
    let mut html = channels::render_channels(&view.channels, config);
    html.push_str(&members::render_members(view, config));
    html.push_str(&stats::render_stats(view, config));
    html.push_str(&invite::render_invite(view.invite_url.as_deref(), config));
    html
}
