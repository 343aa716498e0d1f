use crate::config::WidgetConfig;
use crate::engine::shaper::ShapedView;

pub const ONLINE_CLASS: &str = "discord-online";
pub const OFFLINE_CLASS: &str = "discord-offline";

/// Green dot followed by "N online"; shared with the external counter.
pub fn presence_label(presence_count: u64) -> String {
    format!(r#"<span style="color:limegreen;">●</span> {presence_count} online"#)
}

/// Stats line. Empty when the count is shown outside the widget instead.
pub fn render_stats(view: &ShapedView, config: &WidgetConfig) -> String {
    if config.show_presence_count_outside {
        return String::new();
    }
    let state = if view.online_count > 0 {
        ONLINE_CLASS
    } else {
        OFFLINE_CLASS
    };
    format!(
        r#"<div class="discord-stats-section"><div class="discord-stats"><span title="Online members" class="{state}">{label}</span></div></div>"#,
        label = presence_label(view.presence_count),
    )
}
