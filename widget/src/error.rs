/// Everything that can go wrong while loading one widget instance.
///
/// The `Display` text of each variant is what ends up (escaped) inside the
/// inline error fragment, so keep the messages short and user-facing.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("No server ID provided.")]
    MissingServerId,

    #[error("Failed to fetch server info")]
    FetchFailed { status: u16 },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_message_is_generic() {
        let err = WidgetError::FetchFailed { status: 503 };
        assert_eq!(err.to_string(), "Failed to fetch server info");
    }

    #[test]
    fn test_parse_error_carries_underlying_text() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let expected = parse.to_string();
        let err = WidgetError::from(parse);
        assert_eq!(err.to_string(), expected);
    }
}
