use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// One server's embed data, as returned by `GET /api/servers/{id}/embed.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteSnapshot {
    #[serde(default)]
    pub instant_invite: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub channels: Vec<Channel>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub members: Vec<Member>,
    /// `None` when absent or not a usable count; the shaper then falls back
    /// to the number of listed online members.
    #[serde(default, deserialize_with = "lenient_count")]
    pub presence_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
    /// Anything else renders like a text channel.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: PresenceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    Dnd,
    #[default]
    Offline,
    #[serde(other)]
    Unknown,
}

impl PresenceStatus {
    /// Online, idle and do-not-disturb members count as present.
    pub fn is_present(self) -> bool {
        matches!(self, Self::Online | Self::Idle | Self::Dnd)
    }
}

/// Accept a JSON array of records; anything that isn't an array (null, an
/// object, a string) becomes an empty list, and records that don't fit the
/// expected shape are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Accept any JSON number that denotes a whole, non-negative count (`3`,
/// `3.0`). Negative, fractional or non-numeric values read as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Number(n) = value else {
        return Ok(None);
    };
    if let Some(count) = n.as_u64() {
        return Ok(Some(count));
    }
    let Some(f) = n.as_f64() else {
        return Ok(None);
    };
    let whole = f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64;
    Ok(whole.then_some(f as u64))
}
