use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, WidgetError};

pub const DEFAULT_SELECTOR: &str = ".discord-widget";
pub const DEFAULT_CONTENT_SELECTOR: &str = ".discord-content";
pub const DEFAULT_PRESENCE_COUNTER_SELECTOR: &str = ".discord-online-count";
pub const DEFAULT_JOIN_BUTTON_TEXT: &str = "Join Server";
pub const DEFAULT_MAX_DISPLAYED_MEMBERS: usize = 20;
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com";

/// Hides placeholder usernames such as "a..." that the embed API hands out
/// for members who have not opted into being listed.
pub const DEFAULT_FILTER_USER_PATTERN: &str = r"^[a-zA-Z]\.\.\.$";

/// Caller-supplied overrides. Every field is optional; anything left as
/// `None` falls back to the default when resolved into a [`WidgetConfig`].
/// Unknown keys in a TOML document are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    pub selector: Option<String>,
    pub content_selector: Option<String>,
    pub presence_counter_selector: Option<String>,
    pub show_channels: Option<bool>,
    pub hide_all_channels: Option<bool>,
    pub channels_alphabetical: Option<bool>,
    pub show_members: Option<bool>,
    pub members_collapsible: Option<bool>,
    pub members_collapsed_by_default: Option<bool>,
    /// Falls back to the invite from the API when blank.
    pub custom_invite_url: Option<String>,
    pub members_list_always_scrollable: Option<bool>,
    pub show_presence_count_outside: Option<bool>,
    pub show_online_more: Option<bool>,
    pub max_displayed_members: Option<usize>,
    pub server_id: Option<String>,
    pub join_button_text: Option<String>,
    /// An empty string disables username filtering.
    pub filter_user_pattern: Option<String>,
    pub api_base_url: Option<String>,
}

impl WidgetOptions {
    /// Load options from a TOML file. Falls back to empty options if the file
    /// doesn't exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Result<Self> {
        let mut options = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                WidgetError::Config(format!("failed to read config file {path}: {e}"))
            })?;
            Self::from_toml(&contents).map_err(|e| {
                WidgetError::Config(format!("failed to parse config file {path}: {e}"))
            })?
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        options.apply_env_overrides();
        Ok(options)
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DISCORD_WIDGET_SERVER_ID") {
            self.server_id = Some(v);
        }
        if let Ok(v) = std::env::var("DISCORD_WIDGET_INVITE_URL") {
            self.custom_invite_url = Some(v);
        }
        if let Ok(v) = std::env::var("DISCORD_WIDGET_API_BASE_URL") {
            self.api_base_url = Some(v);
        }
        if let Ok(v) = std::env::var("DISCORD_WIDGET_JOIN_TEXT") {
            self.join_button_text = Some(v);
        }
        if let Ok(v) = std::env::var("DISCORD_WIDGET_MAX_MEMBERS")
            && let Ok(max) = v.parse()
        {
            self.max_displayed_members = Some(max);
        }
    }
}

/// Fully resolved, immutable configuration for one initialization call.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub selector: String,
    pub content_selector: String,
    pub presence_counter_selector: String,
    pub show_channels: bool,
    pub hide_all_channels: bool,
    pub channels_alphabetical: bool,
    pub show_members: bool,
    pub members_collapsible: bool,
    pub members_collapsed_by_default: bool,
    pub custom_invite_url: String,
    pub members_list_always_scrollable: bool,
    pub show_presence_count_outside: bool,
    pub show_online_more: bool,
    pub max_displayed_members: usize,
    pub server_id: String,
    pub join_button_text: String,
    pub filter_user_pattern: Option<Regex>,
    pub api_base_url: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::resolve(WidgetOptions::default())
    }
}

impl WidgetConfig {
    /// Overlay the supplied options onto the defaults.
    ///
    /// Never fails: a missing server id is reported when the widget renders,
    /// and an exclusion pattern that doesn't compile is dropped with a warning.
    pub fn resolve(options: WidgetOptions) -> Self {
        let filter_user_pattern = match options.filter_user_pattern.as_deref() {
            None => compile_pattern(DEFAULT_FILTER_USER_PATTERN),
            Some("") => None,
            Some(pattern) => compile_pattern(pattern),
        };

        Self {
            selector: options.selector.unwrap_or_else(|| DEFAULT_SELECTOR.into()),
            content_selector: options
                .content_selector
                .unwrap_or_else(|| DEFAULT_CONTENT_SELECTOR.into()),
            presence_counter_selector: options
                .presence_counter_selector
                .unwrap_or_else(|| DEFAULT_PRESENCE_COUNTER_SELECTOR.into()),
            show_channels: options.show_channels.unwrap_or(true),
            hide_all_channels: options.hide_all_channels.unwrap_or(false),
            channels_alphabetical: options.channels_alphabetical.unwrap_or(false),
            show_members: options.show_members.unwrap_or(true),
            members_collapsible: options.members_collapsible.unwrap_or(true),
            members_collapsed_by_default: options.members_collapsed_by_default.unwrap_or(false),
            custom_invite_url: options.custom_invite_url.unwrap_or_default(),
            members_list_always_scrollable: options
                .members_list_always_scrollable
                .unwrap_or(false),
            show_presence_count_outside: options.show_presence_count_outside.unwrap_or(false),
            show_online_more: options.show_online_more.unwrap_or(true),
            max_displayed_members: options
                .max_displayed_members
                .unwrap_or(DEFAULT_MAX_DISPLAYED_MEMBERS),
            server_id: options.server_id.unwrap_or_default(),
            join_button_text: options
                .join_button_text
                .unwrap_or_else(|| DEFAULT_JOIN_BUTTON_TEXT.into()),
            filter_user_pattern,
            api_base_url: options
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.into()),
        }
    }

    /// Whether the collapse controller should be wired after rendering.
    pub fn collapse_enabled(&self) -> bool {
        self.show_members && self.members_collapsible && self.max_displayed_members > 0
    }
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "invalid username filter pattern, filtering disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.selector, ".discord-widget");
        assert_eq!(config.content_selector, ".discord-content");
        assert!(config.show_channels);
        assert!(!config.hide_all_channels);
        assert!(config.members_collapsible);
        assert!(!config.members_collapsed_by_default);
        assert_eq!(config.max_displayed_members, 20);
        assert_eq!(config.join_button_text, "Join Server");
        assert!(config.server_id.is_empty());
        assert!(config.filter_user_pattern.is_some());
        assert_eq!(config.api_base_url, "https://discord.com");
    }

    #[test]
    fn test_overrides_replace_by_key() {
        let config = WidgetConfig::resolve(WidgetOptions {
            server_id: Some("123".into()),
            max_displayed_members: Some(5),
            channels_alphabetical: Some(true),
            ..Default::default()
        });
        assert_eq!(config.server_id, "123");
        assert_eq!(config.max_displayed_members, 5);
        assert!(config.channels_alphabetical);
        // untouched keys keep their defaults
        assert!(config.show_members);
        assert_eq!(config.selector, DEFAULT_SELECTOR);
    }

    #[test]
    fn test_empty_pattern_disables_filter() {
        let config = WidgetConfig::resolve(WidgetOptions {
            filter_user_pattern: Some(String::new()),
            ..Default::default()
        });
        assert!(config.filter_user_pattern.is_none());
    }

    #[test]
    fn test_invalid_pattern_disables_filter() {
        let config = WidgetConfig::resolve(WidgetOptions {
            filter_user_pattern: Some("([unclosed".into()),
            ..Default::default()
        });
        assert!(config.filter_user_pattern.is_none());
    }

    #[test]
    fn test_default_pattern_matches_placeholders() {
        let config = WidgetConfig::default();
        let re = config.filter_user_pattern.unwrap();
        assert!(re.is_match("a..."));
        assert!(re.is_match("Z..."));
        assert!(!re.is_match("ab..."));
        assert!(!re.is_match("alice"));
    }

    #[test]
    fn test_from_toml_ignores_unknown_keys() {
        let options = WidgetOptions::from_toml(
            r#"
            server_id = "42"
            show_channels = false
            some_future_option = "whatever"
            "#,
        )
        .unwrap();
        assert_eq!(options.server_id.as_deref(), Some("42"));
        assert_eq!(options.show_channels, Some(false));
        assert!(options.selector.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let options = WidgetOptions::load("/nonexistent/discord-widget.toml").unwrap();
        assert!(options.selector.is_none());
    }

    #[test]
    fn test_collapse_enabled() {
        assert!(WidgetConfig::default().collapse_enabled());
        let config = WidgetConfig::resolve(WidgetOptions {
            members_collapsible: Some(false),
            ..Default::default()
        });
        assert!(!config.collapse_enabled());
        let config = WidgetConfig::resolve(WidgetOptions {
            max_displayed_members: Some(0),
            ..Default::default()
        });
        assert!(!config.collapse_enabled());
    }
}
