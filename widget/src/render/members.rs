use std::fmt::Write;

use super::escape::{escape_html, group_thousands, safe_url};
use crate::config::WidgetConfig;
use crate::engine::shaper::ShapedView;
use crate::provider::model::Member;

pub const NO_MEMBERS: &str = r#"<span class="discord-empty">No members online.</span>"#;

/// Toggle glyph while the list is collapsed (▶).
pub const COLLAPSED_GLYPH: &str = "&#9654;";
/// Toggle glyph while the list is expanded (▼).
pub const EXPANDED_GLYPH: &str = "&#9660;";

pub const HEADER_CLASS: &str = "collapsible-header";
pub const LIST_CLASS: &str = "discord-members-list";
pub const TOGGLE_CLASS: &str = "discord-members-toggle";

fn member_row(out: &mut String, member: &Member) {
    let name = escape_html(&member.username);
    let avatar = member
        .avatar_url
        .as_deref()
        .and_then(safe_url)
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<div class="discord-member" title="{name}"><img class="discord-member-avatar" src="{avatar}" alt="{name}" /><span class="discord-member-name">{name}</span></div>"#
    );
}

/// "+K more..." notice, empty unless the display cap hid someone.
pub fn overflow_notice(view: &ShapedView, config: &WidgetConfig) -> String {
    if !config.show_online_more
        || !config.show_members
        || config.max_displayed_members == 0
        || view.overflow_count == 0
    {
        return String::new();
    }
    format!(
        r#"<span class="discord-more-members" style="margin-left:5px;">+{} more...</span>"#,
        group_thousands(view.overflow_count)
    )
}

/// Online member section. Suppressed when members are disabled or the
/// display cap is zero.
pub fn render_members(view: &ShapedView, config: &WidgetConfig) -> String {
    if !config.show_members || config.max_displayed_members == 0 {
        return String::new();
    }

    let mut list_class = String::from(LIST_CLASS);
    if config.members_list_always_scrollable {
        list_class.push_str(" discord-members-list-scroll");
    }

    let mut rows = String::new();
    if view.members.is_empty() {
        rows.push_str(NO_MEMBERS);
    }
    for member in &view.members {
        member_row(&mut rows, member);
    }
    rows.push_str(&overflow_notice(view, config));

    if config.members_collapsible {
        let collapsed = config.members_collapsed_by_default;
        let (state, glyph) = if collapsed {
            ("collapsed", COLLAPSED_GLYPH)
        } else {
            ("expanded", EXPANDED_GLYPH)
        };
        let toggle_class = if collapsed {
            format!("{TOGGLE_CLASS} collapsed")
        } else {
            TOGGLE_CLASS.to_string()
        };
        format!(
            r#"<div class="discord-members-section"><div class="discord-members-header {HEADER_CLASS}" style="user-select:none;cursor:pointer;"><span class="discord-section-title">Online Members</span><span class="{toggle_class}">{glyph}</span></div><div class="{list_class} {state}">{rows}</div></div>"#
        )
    } else {
        format!(
            r#"<div class="discord-members-section"><div class="discord-section-title" style="padding:14px 0 4px 0;">Online Members</div><div class="{list_class}">{rows}</div></div>"#
        )
    }
}
