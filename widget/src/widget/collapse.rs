use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::WidgetConfig;
use crate::dom::{Element, EventKind, Subscription};
use crate::render::members::{
    COLLAPSED_GLYPH, EXPANDED_GLYPH, HEADER_CLASS, LIST_CLASS, TOGGLE_CLASS,
};

/// Expanded/collapsed state of one widget's member list.
pub struct CollapseController {
    expanded: AtomicBool,
    list: Element,
    toggle: Element,
}

impl CollapseController {
    /// Wire the header of a freshly rendered member section inside `mount`.
    ///
    /// Returns `None` when members aren't shown, the list isn't collapsible,
    /// or the expected header/list/toggle elements are missing. The listener
    /// stays registered for as long as the returned subscription is held.
    pub fn attach(mount: &Element, config: &WidgetConfig) -> Option<(Arc<Self>, Subscription)> {
        if !config.collapse_enabled() {
            return None;
        }
        let header = mount.query_selector(&format!(".{HEADER_CLASS}"))?;
        let list = mount.query_selector(&format!(".{LIST_CLASS}"))?;
        let toggle = header.query_selector(&format!(".{TOGGLE_CLASS}"))?;

        let controller = Arc::new(Self {
            expanded: AtomicBool::new(!config.members_collapsed_by_default),
            list,
            toggle,
        });
        let handler = controller.clone();
        let subscription = header.add_event_listener(EventKind::Click, move || {
            handler.toggle();
        });
        Some((controller, subscription))
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::SeqCst)
    }

    /// Flip the state and reflect it onto the list and the toggle glyph.
    /// Returns the new expanded flag.
    pub fn toggle(&self) -> bool {
        let expanded = !self.expanded.fetch_xor(true, Ordering::SeqCst);
        self.list.toggle_class("expanded", expanded);
        self.list.toggle_class("collapsed", !expanded);
        let glyph = if expanded {
            EXPANDED_GLYPH
        } else {
            COLLAPSED_GLYPH
        };
        self.toggle.set_inner_html(glyph);
        self.toggle.toggle_class("collapsed", !expanded);
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetOptions;
    use crate::engine::shaper::ShapedView;
    use crate::render::members::render_members;

    fn mounted(config: &WidgetConfig) -> Element {
        let view = ShapedView {
            channels: vec![],
            members: vec![],
            online_count: 0,
            presence_count: 0,
            overflow_count: 0,
            invite_url: None,
        };
        let mount = Element::new("div");
        mount.set_inner_html(&render_members(&view, config));
        mount
    }

    fn collapsed_by_default() -> WidgetConfig {
        WidgetConfig::resolve(WidgetOptions {
            members_collapsed_by_default: Some(true),
            ..Default::default()
        })
    }

    #[test]
    fn test_toggle_from_collapsed() {
        let config = collapsed_by_default();
        let mount = mounted(&config);
        let (controller, _sub) = CollapseController::attach(&mount, &config).unwrap();
        let list = mount.query_selector(".discord-members-list").unwrap();
        let toggle = mount.query_selector(".discord-members-toggle").unwrap();
        let header = mount.query_selector(".collapsible-header").unwrap();

        assert!(!controller.is_expanded());
        assert!(list.has_class("collapsed"));

        assert_eq!(header.click(), 1);
        assert!(controller.is_expanded());
        assert!(list.has_class("expanded"));
        assert!(!list.has_class("collapsed"));
        assert_eq!(toggle.inner_html(), EXPANDED_GLYPH);
        assert!(!toggle.has_class("collapsed"));

        header.click();
        assert!(!controller.is_expanded());
        assert!(list.has_class("collapsed"));
        assert!(!list.has_class("expanded"));
        assert_eq!(toggle.inner_html(), COLLAPSED_GLYPH);
        assert!(toggle.has_class("collapsed"));
    }

    #[test]
    fn test_toggle_from_expanded() {
        let config = WidgetConfig::default();
        let mount = mounted(&config);
        let (controller, _sub) = CollapseController::attach(&mount, &config).unwrap();
        assert!(controller.is_expanded());
        assert!(!controller.toggle());
        let toggle = mount.query_selector(".discord-members-toggle").unwrap();
        assert_eq!(toggle.text_content(), "▶");
    }

    #[test]
    fn test_not_attached_when_static() {
        let config = WidgetConfig::resolve(WidgetOptions {
            members_collapsible: Some(false),
            ..Default::default()
        });
        let mount = mounted(&config);
        assert!(CollapseController::attach(&mount, &config).is_none());
    }

    #[test]
    fn test_not_attached_without_markup() {
        let mount = Element::new("div");
        assert!(CollapseController::attach(&mount, &WidgetConfig::default()).is_none());
    }

    #[test]
    fn test_dropping_subscription_stops_toggling() {
        let config = WidgetConfig::default();
        let mount = mounted(&config);
        let (controller, sub) = CollapseController::attach(&mount, &config).unwrap();
        drop(sub);
        let header = mount.query_selector(".collapsible-header").unwrap();
        assert_eq!(header.click(), 0);
        assert!(controller.is_expanded());
    }
}
