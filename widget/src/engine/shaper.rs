use crate::config::WidgetConfig;
use crate::provider::model::{Channel, Member, RemoteSnapshot};

use super::collation::{LocaleCollator, NameCollator, NoFilter, UsernameFilter};

/// The subset of a snapshot that actually gets rendered in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedView {
    pub channels: Vec<Channel>,
    /// Members to render, already truncated to the display cap.
    pub members: Vec<Member>,
    /// Present members that survived filtering (before truncation).
    pub online_count: usize,
    /// Reported `presence_count`, or `online_count` when the API omits it.
    pub presence_count: u64,
    /// Present members not rendered because of the display cap.
    pub overflow_count: u64,
    pub invite_url: Option<String>,
}

/// Filters, sorts and truncates snapshots according to one configuration.
///
/// Collation and username exclusion are pluggable; by default names compare
/// case-insensitively and the configured pattern decides exclusion.
pub struct Shaper<'a> {
    config: &'a WidgetConfig,
    collator: &'a dyn NameCollator,
    filter: &'a dyn UsernameFilter,
}

impl<'a> Shaper<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        let filter: &'a dyn UsernameFilter = match &config.filter_user_pattern {
            Some(re) => re,
            None => &NoFilter,
        };
        Self {
            config,
            collator: &LocaleCollator,
            filter,
        }
    }

    pub fn with_collator(mut self, collator: &'a dyn NameCollator) -> Self {
        self.collator = collator;
        self
    }

    pub fn with_filter(mut self, filter: &'a dyn UsernameFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn shape(&self, snapshot: &RemoteSnapshot) -> ShapedView {
        let channels = self.sort_channels(&snapshot.channels);
        let present = self.filter_members(&snapshot.members);
        let online_count = present.len();
        let presence_count = snapshot.presence_count.unwrap_or(online_count as u64);

        let cap = self.config.max_displayed_members;
        let (members, overflow_count) = if cap > 0 {
            let shown: Vec<Member> = present.into_iter().take(cap).collect();
            (shown, presence_count.saturating_sub(cap as u64))
        } else {
            (present, 0)
        };

        ShapedView {
            channels,
            members,
            online_count,
            presence_count,
            overflow_count,
            invite_url: snapshot
                .instant_invite
                .clone()
                .filter(|invite| !invite.is_empty()),
        }
    }

    /// Sorted copy of `channels`; the input is left untouched.
    pub fn sort_channels(&self, channels: &[Channel]) -> Vec<Channel> {
        let mut sorted = channels.to_vec();
        if self.config.channels_alphabetical {
            sorted.sort_by(|a, b| self.collator.compare(&a.name, &b.name));
        } else {
            sorted.sort_by_key(|ch| ch.position);
        }
        sorted
    }

    /// Present members whose username is not excluded, in API order.
    pub fn filter_members(&self, members: &[Member]) -> Vec<Member> {
        members
            .iter()
            .filter(|m| m.status.is_present())
            .filter(|m| !self.filter.excludes(&m.username))
            .cloned()
            .collect()
    }
}
