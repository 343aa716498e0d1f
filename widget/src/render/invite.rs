use super::escape::{escape_html, safe_url};
use crate::config::WidgetConfig;

/// Resolve the invite target: custom URL, then the API invite, then `#`.
/// The result is already escaped for use in an `href`.
pub fn invite_href(api_invite: Option<&str>, config: &WidgetConfig) -> String {
    let custom = config.custom_invite_url.trim();
    let target = if custom.is_empty() {
        api_invite.unwrap_or("")
    } else {
        custom
    };
    safe_url(target).unwrap_or_else(|| "#".to_string())
}

/// Join button; always rendered.
pub fn render_invite(api_invite: Option<&str>, config: &WidgetConfig) -> String {
    format!(
        r#"<a class="discord-invite-btn" href="{href}" target="_blank" rel="noopener">{label}</a>"#,
        href = invite_href(api_invite, config),
        label = escape_html(&config.join_button_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetOptions;

    fn with_custom(url: &str) -> WidgetConfig {
        WidgetConfig::resolve(WidgetOptions {
            custom_invite_url: Some(url.into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_fallback_anchor() {
        let html = render_invite(None, &WidgetConfig::default());
        assert!(html.contains(r##"href="#""##));
        assert!(html.contains(">Join Server</a>"));
    }

    #[test]
    fn test_api_invite_used() {
        let href = invite_href(Some("https://discord.com/invite/abc"), &WidgetConfig::default());
        assert_eq!(href, "https:&#47;&#47;discord.com&#47;invite&#47;abc");
    }

    #[test]
    fn test_custom_invite_wins() {
        let href = invite_href(
            Some("https://discord.com/invite/abc"),
            &with_custom("  https://discord.gg/mine  "),
        );
        assert_eq!(href, "https:&#47;&#47;discord.gg&#47;mine");
    }

    #[test]
    fn test_blank_custom_invite_ignored() {
        let href = invite_href(Some("https://discord.com/invite/abc"), &with_custom("   "));
        assert_eq!(href, "https:&#47;&#47;discord.com&#47;invite&#47;abc");
    }

    #[test]
    fn test_non_web_invite_falls_back() {
        assert_eq!(invite_href(None, &with_custom("javascript:alert(1)")), "#");
    }

    #[test]
    fn test_label_escaped() {
        let config = WidgetConfig::resolve(WidgetOptions {
            join_button_text: Some("<Join & play>".into()),
            ..Default::default()
        });
        let html = render_invite(None, &config);
        assert!(html.contains(">&lt;Join &amp; play&gt;</a>"));
    }
}
