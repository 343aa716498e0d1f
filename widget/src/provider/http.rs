use tracing::debug;

use super::SnapshotProvider;
use super::model::RemoteSnapshot;
use crate::error::{Result, WidgetError};

/// Fetches `{base_url}/api/servers/{server_id}/embed.json` over HTTP.
///
/// No timeout, no retry: a single GET per call.
#[derive(Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn embed_url(&self, server_id: &str) -> String {
        format!(
            "{}/api/servers/{}/embed.json",
            self.base_url,
            urlencoding::encode(server_id)
        )
    }
}

impl SnapshotProvider for HttpProvider {
    async fn fetch(&self, server_id: &str) -> Result<RemoteSnapshot> {
        let url = self.embed_url(server_id);
        debug!(%url, "fetching server embed");

        let resp = self
            .client
            .get(&url)
            .header("User-Agent", "discord-widget/0.1 (embed)")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(WidgetError::FetchFailed {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_embed_url() {
        let provider = HttpProvider::new("https://discord.com/");
        assert_eq!(
            provider.embed_url("81384788765712384"),
            "https://discord.com/api/servers/81384788765712384/embed.json"
        );
    }

    #[test]
    fn test_embed_url_encodes_server_id() {
        let provider = HttpProvider::new("https://discord.com");
        assert_eq!(
            provider.embed_url("../x y"),
            "https://discord.com/api/servers/..%2Fx%20y/embed.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/servers/42/embed.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "instant_invite": "https://discord.com/invite/xyz",
                "channels": [{"name": "general", "position": 0}],
                "members": [{"username": "Ann", "avatar_url": "u", "status": "online"}],
                "presence_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let snapshot = provider.fetch("42").await.unwrap();
        assert_eq!(snapshot.channels.len(), 1);
        assert_eq!(snapshot.members[0].username, "Ann");
        assert_eq!(snapshot.presence_count, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/servers/42/embed.json"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Widget Disabled", "code": 50004
            })))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider.fetch("42").await.unwrap_err();
        assert!(matches!(err, WidgetError::FetchFailed { status: 403 }));
    }

    #[tokio::test]
    async fn test_fetch_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/servers/42/embed.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider.fetch("42").await.unwrap_err();
        assert!(matches!(err, WidgetError::Parse(_)));
    }
}
