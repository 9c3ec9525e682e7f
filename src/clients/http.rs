//! HTTP implementation of [`HubClient`] against a workbench hub server.

use async_stream::stream;
use futures::{future::BoxFuture, stream::BoxStream, FutureExt, StreamExt, TryStreamExt};
use serde::Deserialize;
use url::Url;

use crate::clients::HubClient;
use crate::errors::{Error, Result};
use crate::protocol::{
    CatalogEntry, DownloadReceipt, ExplorationResult, LiveEvent, Settings, TokenReceipt,
};

/// The catalog endpoint wraps the list together with machine profile and
/// disk data this client doesn't consume.
#[derive(Clone, Debug, Deserialize)]
struct CatalogResponse {
    models: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TokenResponse {
    storage: String,
}

#[derive(Clone, Debug)]
pub struct HttpHubClient {
    address: String,
    client: reqwest::Client,
}

impl HttpHubClient {
    pub fn new(address: String) -> Self {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build reqwest client");

        Self { address, client }
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        client: reqwest::Client,
        url: String,
    ) -> Result<T> {
        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Error::transport(format!("server error: {}", resp.status())));
        }
        resp.json::<T>()
            .await
            .map_err(|e| Error::transport(format!("failed to parse response: {e}")))
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        client: reqwest::Client,
        url: String,
        body: serde_json::Value,
    ) -> Result<T> {
        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(Error::transport(format!("server error: {}", resp.status())));
        }
        resp.json::<T>()
            .await
            .map_err(|e| Error::transport(format!("failed to parse response: {e}")))
    }
}

impl HubClient for HttpHubClient {
    fn fetch_catalog(&self) -> BoxFuture<'static, Result<Vec<CatalogEntry>>> {
        let url = format!("{}/models", self.address);
        let client = self.client.clone();

        async move {
            let catalog: CatalogResponse = Self::get_json(client, url).await?;
            Ok(catalog.models)
        }
        .boxed()
    }

    fn explore(
        &self,
        model_id: &str,
        variant_id: &str,
    ) -> BoxFuture<'static, Result<ExplorationResult>> {
        let url = format!("{}/models/explore", self.address);
        let client = self.client.clone();
        let body = serde_json::json!({
            "model_id": model_id,
            "variant_id": variant_id,
        });

        async move { Self::post_json(client, url, body).await }.boxed()
    }

    fn download(
        &self,
        model_id: &str,
        variant_id: &str,
    ) -> BoxFuture<'static, Result<DownloadReceipt>> {
        let url = format!("{}/models/download", self.address);
        let client = self.client.clone();
        let body = serde_json::json!({
            "model_id": model_id,
            "variant_id": variant_id,
        });

        async move { Self::post_json(client, url, body).await }.boxed()
    }

    fn fetch_settings(&self) -> BoxFuture<'static, Result<Settings>> {
        let url = format!("{}/settings", self.address);
        let client = self.client.clone();

        async move { Self::get_json(client, url).await }.boxed()
    }

    fn save_settings(&self, settings: &Settings) -> BoxFuture<'static, Result<Settings>> {
        let url = format!("{}/settings", self.address);
        let client = self.client.clone();
        let body = serde_json::json!({
            "model_cache_dir": settings.cache_dir,
            "reserve_gb": settings.reserve_gb,
        });

        async move { Self::post_json(client, url, body).await }.boxed()
    }

    fn save_token(&self, token: &str) -> BoxFuture<'static, Result<TokenReceipt>> {
        let url = format!("{}/settings/token", self.address);
        let client = self.client.clone();
        let body = serde_json::json!({ "token": token });

        async move {
            let resp: TokenResponse = Self::post_json(client, url, body).await?;
            Ok(TokenReceipt {
                storage: resp.storage,
            })
        }
        .boxed()
    }

    fn subscribe_events(&self) -> BoxStream<'static, LiveEvent> {
        let url = Url::parse(&format!("{}/events/stream", self.address))
            .expect("Invalid hub server URL");
        let client = self.client.clone();

        let events = stream! {
            let response = match client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("event feed unavailable: {e}");
                    return;
                }
            };

            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();

            while let Ok(Some(chunk)) = bytes.try_next().await {
                let Ok(text) = String::from_utf8(chunk.to_vec()) else {
                    continue;
                };
                buffer.push_str(&text);

                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim().to_string();
                    buffer = buffer[pos + 1..].to_string();

                    if let Some(event) = parse_event_line(&line) {
                        yield event;
                    }
                }
            }
        };

        events.boxed()
    }

    fn clone_box(&self) -> Box<dyn HubClient> {
        Box::new(self.clone())
    }
}

/// Parses one newline-delimited JSON line from the event feed.
///
/// Malformed lines are skipped rather than terminating the feed; tags we
/// don't know deserialize to [`LiveEvent::Unknown`] and get dropped later
/// by the event log.
fn parse_event_line(line: &str) -> Option<LiveEvent> {
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            log::debug!("skipping malformed event line: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_line() {
        assert_eq!(parse_event_line(""), None);
        assert_eq!(parse_event_line("not json"), None);
        assert_eq!(
            parse_event_line(r#"{"type":"download_complete","repo_id":"org/repo","total_gb":4.2}"#),
            Some(LiveEvent::Complete {
                repo_id: "org/repo".into(),
                total_gb: 4.2
            })
        );
        assert_eq!(
            parse_event_line(r#"{"type":"something_else"}"#),
            Some(LiveEvent::Unknown)
        );
    }
}
